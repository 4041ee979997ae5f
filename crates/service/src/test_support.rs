use std::path::PathBuf;

use uuid::Uuid;

/// Unique JSON file path under the system temp dir for one test's collection.
pub fn temp_file(prefix: &str) -> PathBuf {
    std::env::temp_dir()
        .join("campus_services_tests")
        .join(format!("{prefix}_{}.json", Uuid::new_v4()))
}

/// Unique directory for tests that open a whole service.
pub fn temp_dir() -> PathBuf {
    std::env::temp_dir()
        .join("campus_services_tests")
        .join(Uuid::new_v4().to_string())
}
