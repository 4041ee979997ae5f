use std::path::Path;

use models::student::{NewStudent, NewSubject, Student, StudentPatch, StudentProgress};
use tracing::{instrument, warn};

use crate::collection::{KeyedCollection, WritePolicy};
use crate::errors::ServiceError;

/// Students and their subject marks.
pub struct StudentService {
    students: KeyedCollection<Student>,
}

impl StudentService {
    pub async fn open(data_dir: &Path, policy: WritePolicy) -> Result<Self, ServiceError> {
        let students = KeyedCollection::open(data_dir.join("students.json"), policy).await?;
        Ok(Self { students })
    }

    pub async fn create(&self, input: NewStudent) -> Result<Student, ServiceError> {
        self.students.create(input).await
    }

    pub async fn get(&self, student_id: &str) -> Result<Student, ServiceError> {
        self.students.get(student_id).await
    }

    pub async fn update(&self, student_id: &str, patch: StudentPatch) -> Result<Student, ServiceError> {
        self.students.update(student_id, patch).await
    }

    pub async fn delete(&self, student_id: &str) -> Result<Student, ServiceError> {
        self.students.delete(student_id).await
    }

    /// Append a subject; its grade is computed from the marks now and kept.
    pub async fn add_subject(&self, student_id: &str, subject: NewSubject) -> Result<Student, ServiceError> {
        self.students.append_item(student_id, subject).await
    }

    /// Overall grade projection. The stored student is not modified.
    #[instrument(skip(self))]
    pub async fn progress(&self, student_id: &str) -> Result<StudentProgress, ServiceError> {
        let student = self.students.get(student_id).await?;
        student.progress_report().map_err(|e| {
            warn!(%student_id, error = %e, "overall grade unavailable");
            ServiceError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::temp_dir;
    use models::grade::Grade;

    async fn service() -> StudentService {
        StudentService::open(&temp_dir(), WritePolicy::default()).await.expect("open service")
    }

    fn student(id: &str) -> NewStudent {
        NewStudent {
            student_id: Some(id.into()),
            name: Some("Grace".into()),
            grade: Some("C".into()),
            progress: Some("improving".into()),
        }
    }

    fn subject(name: &str, marks: f64) -> NewSubject {
        NewSubject { name: Some(name.into()), marks: Some(marks) }
    }

    #[tokio::test]
    async fn subject_grade_is_stored_and_student_grade_untouched() -> anyhow::Result<()> {
        let svc = service().await;
        svc.create(student("S-1")).await?;
        let parent = svc.add_subject("S-1", subject("Math", 85.0)).await?;
        assert_eq!(parent.subjects[0].grade, Grade::A);
        assert_eq!(parent.grade, "C");
        assert_eq!(svc.get("S-1").await?.grade, "C");
        Ok(())
    }

    #[tokio::test]
    async fn progress_reports_the_mean_grade() -> anyhow::Result<()> {
        let svc = service().await;
        svc.create(student("S-2")).await?;
        svc.add_subject("S-2", subject("Math", 90.0)).await?;
        svc.add_subject("S-2", subject("History", 70.0)).await?;

        let report = svc.progress("S-2").await?;
        assert_eq!(report.grade, Grade::A);
        assert_eq!(report.progress, "improving");
        assert_eq!(svc.get("S-2").await?.grade, "C");
        Ok(())
    }

    #[tokio::test]
    async fn progress_without_subjects_fails() -> anyhow::Result<()> {
        let svc = service().await;
        svc.create(student("S-3")).await?;
        let err = svc.progress("S-3").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(ref m) if m == "no subjects to aggregate"));
        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_subjects_and_record() -> anyhow::Result<()> {
        let svc = service().await;
        svc.create(student("S-4")).await?;
        svc.add_subject("S-4", subject("Art", 55.0)).await?;
        let removed = svc.delete("S-4").await?;
        assert_eq!(removed.subjects.len(), 1);
        assert!(matches!(svc.get("S-4").await, Err(ServiceError::NotFound { .. })));
        assert!(matches!(svc.progress("S-4").await, Err(ServiceError::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn empty_update_returns_student_unchanged() -> anyhow::Result<()> {
        let svc = service().await;
        let created = svc.create(student("S-5")).await?;
        assert_eq!(svc.update("S-5", StudentPatch::default()).await?, created);
        Ok(())
    }
}
