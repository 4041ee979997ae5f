use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::record::LoggedRecord;
use crate::validation::Checks;

/// A scheduled exam sitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamSchedule {
    pub id: Uuid,
    pub title: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSchedule {
    pub title: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
}

impl LoggedRecord for ExamSchedule {
    type Input = NewSchedule;

    const ENTITY: &'static str = "Schedule";

    fn from_input(input: NewSchedule) -> Result<Self, ModelError> {
        let mut checks = Checks::new();
        let title = checks.text("title", input.title);
        let date = checks.text("date", input.date);
        checks.finish(Self::ENTITY)?;
        Ok(Self { id: Uuid::now_v7(), title, date, description: input.description })
    }

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Marks one student obtained in one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamResult {
    pub id: Uuid,
    pub student_id: String,
    pub subject: String,
    pub marks: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewResult {
    pub student_id: Option<String>,
    pub subject: Option<String>,
    pub marks: Option<f64>,
}

impl LoggedRecord for ExamResult {
    type Input = NewResult;

    const ENTITY: &'static str = "Result";

    fn from_input(input: NewResult) -> Result<Self, ModelError> {
        let mut checks = Checks::new();
        let student_id = checks.text("student_id", input.student_id);
        let subject = checks.text("subject", input.subject);
        let marks = checks.number("marks", input.marks);
        checks.finish(Self::ENTITY)?;
        Ok(Self { id: Uuid::now_v7(), student_id, subject, marks })
    }

    fn id(&self) -> Uuid {
        self.id
    }
}
