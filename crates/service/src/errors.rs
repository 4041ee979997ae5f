use models::errors::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("{entity} not found")]
    NotFound { entity: &'static str, key: String },
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("{entity} was modified concurrently (read version {expected}, stored version {found})")]
    VersionMismatch { entity: &'static str, expected: u64, found: u64 },
    #[error("storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound { entity, key: key.into() }
    }
}

impl From<ModelError> for ServiceError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Validation(msg) => Self::Validation(msg),
            ModelError::InvalidState(msg) => Self::InvalidState(msg),
        }
    }
}
