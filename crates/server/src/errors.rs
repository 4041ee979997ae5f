use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

/// Error body returned by every handler: `{"error": ..., "details": ...}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, details: Option<String>) -> Self {
        Self { status, error: error.into(), details }
    }

    /// Translate a service failure. `action` describes what the handler was
    /// doing, e.g. "Failed to add faculty".
    pub fn from_service(action: &str, err: ServiceError) -> Self {
        let status = status_of(&err);
        let api = match &err {
            ServiceError::NotFound { key, .. } => Self::new(status, err.to_string(), Some(key.clone())),
            _ => Self::new(status, action, Some(err.to_string())),
        };
        if status.is_server_error() {
            error!(%action, error = %err, "request failed");
        }
        api
    }

    /// Body that is not JSON or does not fit the expected shape.
    pub fn bad_body(action: &str, rejection: JsonRejection) -> Self {
        warn!(%action, error = %rejection.body_text(), "invalid request body");
        Self::new(StatusCode::BAD_REQUEST, action, Some(rejection.body_text()))
    }
}

pub fn status_of(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::Validation(_) | ServiceError::Conflict(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
        ServiceError::VersionMismatch { .. } => StatusCode::CONFLICT,
        ServiceError::InvalidState(_) | ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Unwrap a JSON body extracted as `Result` so malformed input is a 400.
pub fn json_body<T>(action: &str, payload: Result<Json<T>, JsonRejection>) -> Result<T, JsonApiError> {
    payload.map(|Json(v)| v).map_err(|e| JsonApiError::bad_body(action, e))
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.error, "details": self.details });
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
