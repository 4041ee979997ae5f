use std::path::Path;

use models::examination::{ExamResult, ExamSchedule, NewResult, NewSchedule};
use tracing::instrument;

use crate::errors::ServiceError;
use crate::record_log::RecordLog;

/// Exam schedules and per-student results.
pub struct ExaminationService {
    schedules: RecordLog<ExamSchedule>,
    results: RecordLog<ExamResult>,
}

impl ExaminationService {
    pub async fn open(data_dir: &Path) -> Result<Self, ServiceError> {
        let schedules = RecordLog::open(data_dir.join("exam_schedules.json")).await?;
        let results = RecordLog::open(data_dir.join("exam_results.json")).await?;
        Ok(Self { schedules, results })
    }

    #[instrument(skip_all)]
    pub async fn schedule(&self, input: NewSchedule) -> Result<ExamSchedule, ServiceError> {
        self.schedules.create(input).await
    }

    #[instrument(skip_all)]
    pub async fn add_result(&self, input: NewResult) -> Result<ExamResult, ServiceError> {
        self.results.create(input).await
    }

    /// Every result recorded for `student_id`, oldest first.
    #[instrument(skip(self))]
    pub async fn performance(&self, student_id: &str) -> Result<Vec<ExamResult>, ServiceError> {
        self.results
            .matching("Results", student_id, |r| r.student_id == student_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::temp_dir;

    fn result(student: &str, subject: &str, marks: f64) -> NewResult {
        NewResult {
            student_id: Some(student.into()),
            subject: Some(subject.into()),
            marks: Some(marks),
        }
    }

    #[tokio::test]
    async fn performance_collects_only_that_student() -> anyhow::Result<()> {
        let svc = ExaminationService::open(&temp_dir()).await?;
        svc.add_result(result("s-1", "Math", 81.0)).await?;
        svc.add_result(result("s-2", "Math", 40.0)).await?;
        svc.add_result(result("s-1", "Physics", 67.5)).await?;

        let rows = svc.performance("s-1").await?;
        let subjects: Vec<&str> = rows.iter().map(|r| r.subject.as_str()).collect();
        assert_eq!(subjects, vec!["Math", "Physics"]);
        Ok(())
    }

    #[tokio::test]
    async fn no_results_is_not_found() -> anyhow::Result<()> {
        let svc = ExaminationService::open(&temp_dir()).await?;
        svc.add_result(result("s-1", "Math", 81.0)).await?;
        assert!(matches!(svc.performance("s-9").await, Err(ServiceError::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn schedule_requires_title_and_date() -> anyhow::Result<()> {
        let svc = ExaminationService::open(&temp_dir()).await?;
        let err = svc.schedule(NewSchedule::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m.contains("title is required")));
        let ok = svc
            .schedule(NewSchedule {
                title: Some("Finals".into()),
                date: Some("2024-06-20".into()),
                description: Some("Hall B".into()),
            })
            .await?;
        assert_eq!(ok.description.as_deref(), Some("Hall B"));
        Ok(())
    }
}
