use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use models::student::{NewStudent, NewSubject, Student, StudentPatch, StudentProgress};
use service::student::StudentService;
use tracing::info;

use crate::errors::{json_body, JsonApiError};

type Svc = State<Arc<StudentService>>;

pub fn router(svc: Arc<StudentService>) -> Router {
    Router::new()
        .route("/students", post(create))
        .route("/students/:student_id", get(get_one).put(update).delete(delete))
        .route("/students/:student_id/subjects", post(add_subject))
        .route("/students/:student_id/progress", get(progress))
        .with_state(svc)
}

#[utoipa::path(
    post, path = "/students", tag = "student",
    request_body = crate::openapi::NewStudentDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error or duplicate student_id")
    )
)]
pub async fn create(
    State(svc): Svc,
    payload: Result<Json<NewStudent>, JsonRejection>,
) -> Result<(StatusCode, Json<Student>), JsonApiError> {
    const ACTION: &str = "Failed to add student";
    let input = json_body(ACTION, payload)?;
    let student = svc.create(input).await.map_err(|e| JsonApiError::from_service(ACTION, e))?;
    info!(id = %student.id, student_id = %student.student_id, "created student");
    Ok((StatusCode::CREATED, Json(student)))
}

#[utoipa::path(
    get, path = "/students/{student_id}", tag = "student",
    params(("student_id" = String, Path, description = "Student business key")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn get_one(State(svc): Svc, Path(student_id): Path<String>) -> Result<Json<Student>, JsonApiError> {
    svc.get(&student_id)
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service("Failed to fetch student details", e))
}

#[utoipa::path(
    put, path = "/students/{student_id}", tag = "student",
    params(("student_id" = String, Path, description = "Student business key")),
    request_body = crate::openapi::StudentPatchDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Student not found"),
        (status = 409, description = "Modified concurrently")
    )
)]
pub async fn update(
    State(svc): Svc,
    Path(student_id): Path<String>,
    payload: Result<Json<StudentPatch>, JsonRejection>,
) -> Result<Json<Student>, JsonApiError> {
    const ACTION: &str = "Failed to update student details";
    let patch = json_body(ACTION, payload)?;
    let student = svc
        .update(&student_id, patch)
        .await
        .map_err(|e| JsonApiError::from_service(ACTION, e))?;
    info!(student_id = %student.student_id, version = student.version, "updated student");
    Ok(Json(student))
}

#[utoipa::path(
    delete, path = "/students/{student_id}", tag = "student",
    params(("student_id" = String, Path, description = "Student business key")),
    responses(
        (status = 200, description = "Deleted, returns the removed record"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn delete(State(svc): Svc, Path(student_id): Path<String>) -> Result<Json<Student>, JsonApiError> {
    let removed = svc
        .delete(&student_id)
        .await
        .map_err(|e| JsonApiError::from_service("Failed to delete student", e))?;
    info!(student_id = %removed.student_id, subjects = removed.subjects.len(), "deleted student");
    Ok(Json(removed))
}

#[utoipa::path(
    post, path = "/students/{student_id}/subjects", tag = "student",
    params(("student_id" = String, Path, description = "Student business key")),
    request_body = crate::openapi::NewSubjectDoc,
    responses(
        (status = 200, description = "Subject appended, returns the student"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn add_subject(
    State(svc): Svc,
    Path(student_id): Path<String>,
    payload: Result<Json<NewSubject>, JsonRejection>,
) -> Result<Json<Student>, JsonApiError> {
    const ACTION: &str = "Failed to add subject and grade";
    let subject = json_body(ACTION, payload)?;
    svc.add_subject(&student_id, subject)
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service(ACTION, e))
}

#[utoipa::path(
    get, path = "/students/{student_id}/progress", tag = "student",
    params(("student_id" = String, Path, description = "Student business key")),
    responses(
        (status = 200, description = "Overall grade computed from the subjects"),
        (status = 404, description = "Student not found"),
        (status = 500, description = "No subjects to aggregate")
    )
)]
pub async fn progress(
    State(svc): Svc,
    Path(student_id): Path<String>,
) -> Result<Json<StudentProgress>, JsonApiError> {
    svc.progress(&student_id)
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service("Failed to fetch student progress", e))
}
