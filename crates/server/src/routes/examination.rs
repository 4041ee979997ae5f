use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use models::examination::{ExamResult, ExamSchedule, NewResult, NewSchedule};
use service::examination::ExaminationService;
use tracing::info;

use crate::errors::{json_body, JsonApiError};

type Svc = State<Arc<ExaminationService>>;

pub fn router(svc: Arc<ExaminationService>) -> Router {
    Router::new()
        .route("/schedule", post(schedule))
        .route("/results", post(add_result))
        .route("/performance/:student_id", get(performance))
        .with_state(svc)
}

#[utoipa::path(
    post, path = "/schedule", tag = "examination",
    request_body = crate::openapi::NewScheduleDoc,
    responses(
        (status = 201, description = "Scheduled"),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn schedule(
    State(svc): Svc,
    payload: Result<Json<NewSchedule>, JsonRejection>,
) -> Result<(StatusCode, Json<ExamSchedule>), JsonApiError> {
    const ACTION: &str = "Failed to schedule exam";
    let input = json_body(ACTION, payload)?;
    let exam = svc.schedule(input).await.map_err(|e| JsonApiError::from_service(ACTION, e))?;
    info!(id = %exam.id, title = %exam.title, "exam scheduled");
    Ok((StatusCode::CREATED, Json(exam)))
}

#[utoipa::path(
    post, path = "/results", tag = "examination",
    request_body = crate::openapi::NewResultDoc,
    responses(
        (status = 201, description = "Result stored"),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn add_result(
    State(svc): Svc,
    payload: Result<Json<NewResult>, JsonRejection>,
) -> Result<(StatusCode, Json<ExamResult>), JsonApiError> {
    const ACTION: &str = "Failed to add results";
    let input = json_body(ACTION, payload)?;
    let result = svc.add_result(input).await.map_err(|e| JsonApiError::from_service(ACTION, e))?;
    info!(id = %result.id, student_id = %result.student_id, "exam result stored");
    Ok((StatusCode::CREATED, Json(result)))
}

#[utoipa::path(
    get, path = "/performance/{student_id}", tag = "examination",
    params(("student_id" = String, Path, description = "Student whose results to list")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "No results for this student")
    )
)]
pub async fn performance(
    State(svc): Svc,
    Path(student_id): Path<String>,
) -> Result<Json<Vec<ExamResult>>, JsonApiError> {
    svc.performance(&student_id)
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service("Failed to fetch performance", e))
}
