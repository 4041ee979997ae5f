//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` so binaries can prepare the data
//! directory through `service::runtime::ensure_env`.

use std::path::Path;

/// Make sure the data directory exists before any collection is opened.
pub async fn ensure_env(data_dir: &Path) -> anyhow::Result<()> {
    common::env::ensure_data_dir(data_dir).await
}
