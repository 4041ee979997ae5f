use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use models::attendance::{AttendanceRecord, NewAttendance};
use service::attendance::AttendanceService;
use tracing::info;

use crate::errors::{json_body, JsonApiError};

type Svc = State<Arc<AttendanceService>>;

pub fn router(svc: Arc<AttendanceService>) -> Router {
    Router::new()
        .route("/attendance", post(record))
        .route("/attendance/:user_id", get(for_user))
        .with_state(svc)
}

#[utoipa::path(
    post, path = "/attendance", tag = "attendance",
    request_body = crate::openapi::NewAttendanceDoc,
    responses(
        (status = 201, description = "Recorded"),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn record(
    State(svc): Svc,
    payload: Result<Json<NewAttendance>, JsonRejection>,
) -> Result<(StatusCode, Json<AttendanceRecord>), JsonApiError> {
    const ACTION: &str = "Failed to record attendance";
    let input = json_body(ACTION, payload)?;
    let rec = svc.record(input).await.map_err(|e| JsonApiError::from_service(ACTION, e))?;
    info!(id = %rec.id, user_id = %rec.user_id, status = %rec.status, "attendance recorded");
    Ok((StatusCode::CREATED, Json(rec)))
}

#[utoipa::path(
    get, path = "/attendance/{user_id}", tag = "attendance",
    params(("user_id" = String, Path, description = "User whose marks to list")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "No attendance records for this user")
    )
)]
pub async fn for_user(
    State(svc): Svc,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<AttendanceRecord>>, JsonApiError> {
    svc.for_user(&user_id)
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service("Failed to fetch attendance records", e))
}
