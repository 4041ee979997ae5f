use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::grade::{self, Grade};
use crate::record::{Embeds, KeyedRecord, SubRecord};
use crate::validation::Checks;

/// Marks in one subject. `grade` is fixed when the subject is added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: u64,
    pub name: String,
    pub marks: f64,
    pub grade: Grade,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSubject {
    pub name: Option<String>,
    pub marks: Option<f64>,
}

impl SubRecord for Subject {
    type Input = NewSubject;

    const ENTITY: &'static str = "Subject";

    fn build(id: u64, input: NewSubject) -> Result<Self, ModelError> {
        let mut checks = Checks::new();
        let name = checks.text("name", input.name);
        let marks = checks.number("marks", input.marks);
        checks.finish(Self::ENTITY)?;
        Ok(Self { id, name, marks, grade: grade::grade_of(marks) })
    }

    fn id(&self) -> u64 {
        self.id
    }
}

/// Student with their embedded subject marks.
///
/// `grade` is the label supplied by the caller; the computed overall grade
/// lives only in [`StudentProgress`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: Uuid,
    pub student_id: String,
    pub name: String,
    pub grade: String,
    pub progress: String,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub subject_seq: u64,
    #[serde(default)]
    pub version: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewStudent {
    pub student_id: Option<String>,
    pub name: Option<String>,
    pub grade: Option<String>,
    pub progress: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StudentPatch {
    pub student_id: Option<String>,
    pub name: Option<String>,
    pub grade: Option<String>,
    pub progress: Option<String>,
}

/// Read-time view with the overall grade computed from the subjects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProgress {
    pub student_id: String,
    pub name: String,
    pub grade: Grade,
    pub progress: String,
    pub subjects: Vec<Subject>,
}

impl Student {
    pub fn progress_report(&self) -> Result<StudentProgress, ModelError> {
        let overall = grade::aggregate(self.subjects.iter().map(|s| s.marks))?;
        Ok(StudentProgress {
            student_id: self.student_id.clone(),
            name: self.name.clone(),
            grade: overall,
            progress: self.progress.clone(),
            subjects: self.subjects.clone(),
        })
    }
}

impl KeyedRecord for Student {
    type Input = NewStudent;
    type Patch = StudentPatch;

    const ENTITY: &'static str = "Student";
    const KEY_FIELD: &'static str = "student_id";

    fn from_input(input: NewStudent) -> Result<Self, ModelError> {
        let mut checks = Checks::new();
        let student_id = checks.text("student_id", input.student_id);
        let name = checks.text("name", input.name);
        let grade = checks.text("grade", input.grade);
        let progress = checks.text("progress", input.progress);
        checks.finish(Self::ENTITY)?;
        Ok(Self {
            id: Uuid::now_v7(),
            student_id,
            name,
            grade,
            progress,
            subjects: Vec::new(),
            subject_seq: 0,
            version: 1,
        })
    }

    fn key(&self) -> &str {
        &self.student_id
    }

    fn apply(&mut self, patch: StudentPatch) {
        if let Some(v) = patch.student_id {
            self.student_id = v;
        }
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.grade {
            self.grade = v;
        }
        if let Some(v) = patch.progress {
            self.progress = v;
        }
    }

    fn validate(&self) -> Result<(), ModelError> {
        let mut checks = Checks::new();
        checks.non_blank("student_id", &self.student_id);
        checks.non_blank("name", &self.name);
        checks.non_blank("grade", &self.grade);
        checks.non_blank("progress", &self.progress);
        for subject in &self.subjects {
            checks.finite("subjects.marks", subject.marks);
        }
        checks.finish(Self::ENTITY)
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}

impl Embeds for Student {
    type Item = Subject;

    fn items(&self) -> &[Subject] {
        &self.subjects
    }

    fn items_mut(&mut self) -> &mut Vec<Subject> {
        &mut self.subjects
    }

    fn next_item_id(&mut self) -> u64 {
        self.subject_seq += 1;
        self.subject_seq
    }
}
