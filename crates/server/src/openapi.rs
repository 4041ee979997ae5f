use utoipa::OpenApi;
use utoipa::ToSchema;

use crate::context::ServiceKind;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String, pub service: String }

#[derive(ToSchema)]
pub struct NewAttendanceDoc {
    pub user_id: String,
    /// Calendar date, e.g. `2024-03-01`
    pub date: String,
    /// `Present` or `Absent`
    pub status: String,
}

#[derive(ToSchema)]
pub struct NewScheduleDoc { pub title: String, pub date: String, pub description: Option<String> }

#[derive(ToSchema)]
pub struct NewResultDoc { pub student_id: String, pub subject: String, pub marks: f64 }

#[derive(ToSchema)]
pub struct NewFacultyDoc { pub faculty_id: String, pub name: String, pub department: String, pub schedule: String }

#[derive(ToSchema)]
pub struct FacultyPatchDoc {
    pub faculty_id: Option<String>,
    pub name: Option<String>,
    pub department: Option<String>,
    pub schedule: Option<String>,
}

#[derive(ToSchema)]
pub struct NewTaskDoc {
    pub title: String,
    pub description: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`
    pub due_date: Option<String>,
    /// `Pending` (default) or `Completed`
    pub status: Option<String>,
}

#[derive(ToSchema)]
pub struct TaskPatchDoc {
    pub title: Option<String>,
    /// `null` clears the description
    pub description: Option<String>,
    /// `null` clears the due date
    pub due_date: Option<String>,
    pub status: Option<String>,
}

#[derive(ToSchema)]
pub struct NewStudentDoc { pub student_id: String, pub name: String, pub grade: String, pub progress: String }

#[derive(ToSchema)]
pub struct StudentPatchDoc {
    pub student_id: Option<String>,
    pub name: Option<String>,
    pub grade: Option<String>,
    pub progress: Option<String>,
}

#[derive(ToSchema)]
pub struct NewSubjectDoc { pub name: String, pub marks: f64 }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::attendance::record,
        crate::routes::attendance::for_user,
    ),
    components(schemas(HealthResponse, NewAttendanceDoc)),
    tags((name = "health"), (name = "attendance"))
)]
pub struct AttendanceApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::examination::schedule,
        crate::routes::examination::add_result,
        crate::routes::examination::performance,
    ),
    components(schemas(HealthResponse, NewScheduleDoc, NewResultDoc)),
    tags((name = "health"), (name = "examination"))
)]
pub struct ExaminationApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::faculty::create,
        crate::routes::faculty::get_one,
        crate::routes::faculty::update,
        crate::routes::faculty::delete,
        crate::routes::faculty::add_task,
        crate::routes::faculty::update_task,
        crate::routes::faculty::tasks,
    ),
    components(schemas(HealthResponse, NewFacultyDoc, FacultyPatchDoc, NewTaskDoc, TaskPatchDoc)),
    tags((name = "health"), (name = "faculty"))
)]
pub struct FacultyApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::students::create,
        crate::routes::students::get_one,
        crate::routes::students::update,
        crate::routes::students::delete,
        crate::routes::students::add_subject,
        crate::routes::students::progress,
    ),
    components(schemas(HealthResponse, NewStudentDoc, StudentPatchDoc, NewSubjectDoc)),
    tags((name = "health"), (name = "student"))
)]
pub struct StudentApi;

pub fn document(kind: ServiceKind) -> utoipa::openapi::OpenApi {
    match kind {
        ServiceKind::Attendance => AttendanceApi::openapi(),
        ServiceKind::Examination => ExaminationApi::openapi(),
        ServiceKind::Faculty => FacultyApi::openapi(),
        ServiceKind::Student => StudentApi::openapi(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_document_lists_only_its_own_paths() {
        let faculty = document(ServiceKind::Faculty);
        assert!(faculty.paths.paths.contains_key("/faculty/{faculty_id}/tasks/{task_id}"));
        assert!(!faculty.paths.paths.contains_key("/students"));

        let attendance = document(ServiceKind::Attendance);
        assert!(attendance.paths.paths.contains_key("/attendance/{user_id}"));
        assert!(attendance.paths.paths.contains_key("/health"));
    }
}
