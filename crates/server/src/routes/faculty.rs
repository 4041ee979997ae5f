use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use models::faculty::{Faculty, FacultyPatch, NewFaculty, NewTask, Task, TaskPatch};
use service::faculty::FacultyService;
use tracing::info;

use crate::errors::{json_body, JsonApiError};

type Svc = State<Arc<FacultyService>>;

pub fn router(svc: Arc<FacultyService>) -> Router {
    Router::new()
        .route("/faculty", post(create))
        .route("/faculty/:faculty_id", get(get_one).put(update).delete(delete))
        .route("/faculty/:faculty_id/tasks", get(tasks).post(add_task))
        .route("/faculty/:faculty_id/tasks/:task_id", put(update_task))
        .with_state(svc)
}

#[utoipa::path(
    post, path = "/faculty", tag = "faculty",
    request_body = crate::openapi::NewFacultyDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error or duplicate faculty_id")
    )
)]
pub async fn create(
    State(svc): Svc,
    payload: Result<Json<NewFaculty>, JsonRejection>,
) -> Result<(StatusCode, Json<Faculty>), JsonApiError> {
    const ACTION: &str = "Failed to add faculty";
    let input = json_body(ACTION, payload)?;
    let member = svc.create(input).await.map_err(|e| JsonApiError::from_service(ACTION, e))?;
    info!(id = %member.id, faculty_id = %member.faculty_id, "created faculty");
    Ok((StatusCode::CREATED, Json(member)))
}

#[utoipa::path(
    get, path = "/faculty/{faculty_id}", tag = "faculty",
    params(("faculty_id" = String, Path, description = "Faculty business key")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Faculty not found")
    )
)]
pub async fn get_one(State(svc): Svc, Path(faculty_id): Path<String>) -> Result<Json<Faculty>, JsonApiError> {
    svc.get(&faculty_id)
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service("Failed to fetch faculty details", e))
}

#[utoipa::path(
    put, path = "/faculty/{faculty_id}", tag = "faculty",
    params(("faculty_id" = String, Path, description = "Faculty business key")),
    request_body = crate::openapi::FacultyPatchDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Faculty not found"),
        (status = 409, description = "Modified concurrently")
    )
)]
pub async fn update(
    State(svc): Svc,
    Path(faculty_id): Path<String>,
    payload: Result<Json<FacultyPatch>, JsonRejection>,
) -> Result<Json<Faculty>, JsonApiError> {
    const ACTION: &str = "Failed to update faculty details";
    let patch = json_body(ACTION, payload)?;
    let member = svc
        .update(&faculty_id, patch)
        .await
        .map_err(|e| JsonApiError::from_service(ACTION, e))?;
    info!(faculty_id = %member.faculty_id, version = member.version, "updated faculty");
    Ok(Json(member))
}

#[utoipa::path(
    delete, path = "/faculty/{faculty_id}", tag = "faculty",
    params(("faculty_id" = String, Path, description = "Faculty business key")),
    responses(
        (status = 200, description = "Deleted, returns the removed record"),
        (status = 404, description = "Faculty not found")
    )
)]
pub async fn delete(State(svc): Svc, Path(faculty_id): Path<String>) -> Result<Json<Faculty>, JsonApiError> {
    let removed = svc
        .delete(&faculty_id)
        .await
        .map_err(|e| JsonApiError::from_service("Failed to delete faculty", e))?;
    info!(faculty_id = %removed.faculty_id, tasks = removed.tasks.len(), "deleted faculty");
    Ok(Json(removed))
}

#[utoipa::path(
    post, path = "/faculty/{faculty_id}/tasks", tag = "faculty",
    params(("faculty_id" = String, Path, description = "Faculty business key")),
    request_body = crate::openapi::NewTaskDoc,
    responses(
        (status = 200, description = "Task appended, returns the faculty"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Faculty not found")
    )
)]
pub async fn add_task(
    State(svc): Svc,
    Path(faculty_id): Path<String>,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> Result<Json<Faculty>, JsonApiError> {
    const ACTION: &str = "Failed to add task";
    let task = json_body(ACTION, payload)?;
    svc.add_task(&faculty_id, task)
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service(ACTION, e))
}

#[utoipa::path(
    put, path = "/faculty/{faculty_id}/tasks/{task_id}", tag = "faculty",
    params(
        ("faculty_id" = String, Path, description = "Faculty business key"),
        ("task_id" = String, Path, description = "Task id within the faculty")
    ),
    request_body = crate::openapi::TaskPatchDoc,
    responses(
        (status = 200, description = "Task updated, returns the faculty"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Faculty or task not found")
    )
)]
pub async fn update_task(
    State(svc): Svc,
    Path((faculty_id, task_id)): Path<(String, String)>,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> Result<Json<Faculty>, JsonApiError> {
    const ACTION: &str = "Failed to update task";
    let patch = json_body(ACTION, payload)?;
    svc.update_task(&faculty_id, &task_id, patch)
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service(ACTION, e))
}

#[utoipa::path(
    get, path = "/faculty/{faculty_id}/tasks", tag = "faculty",
    params(("faculty_id" = String, Path, description = "Faculty business key")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Faculty not found")
    )
)]
pub async fn tasks(State(svc): Svc, Path(faculty_id): Path<String>) -> Result<Json<Vec<Task>>, JsonApiError> {
    svc.tasks(&faculty_id)
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service("Failed to fetch tasks", e))
}
