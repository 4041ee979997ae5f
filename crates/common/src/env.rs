//! Environment/runtime helpers
//!
//! Sanity checks run once at startup.

use std::path::Path;

use tracing::{info, warn};

/// Create the data directory if missing and make sure it is a directory.
pub async fn ensure_data_dir(data_dir: &Path) -> anyhow::Result<()> {
    match tokio::fs::metadata(data_dir).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(anyhow::anyhow!("{} exists but is not a directory", data_dir.display())),
        Err(_) => {
            warn!(data_dir = %data_dir.display(), "data directory missing; creating it");
            tokio::fs::create_dir_all(data_dir)
                .await
                .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", data_dir.display()))?;
            info!(data_dir = %data_dir.display(), "data directory created");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_dir() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("campus_env_{}", uuid::Uuid::new_v4()));
        ensure_data_dir(&dir).await?;
        assert!(tokio::fs::metadata(&dir).await?.is_dir());
        // second call is a no-op
        ensure_data_dir(&dir).await?;
        Ok(())
    }

    #[tokio::test]
    async fn rejects_a_plain_file() -> anyhow::Result<()> {
        let file = std::env::temp_dir().join(format!("campus_env_{}.txt", uuid::Uuid::new_v4()));
        tokio::fs::write(&file, b"x").await?;
        assert!(ensure_data_dir(&file).await.is_err());
        Ok(())
    }
}
