use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::record::{Embeds, KeyedRecord, PatchableSubRecord, SubRecord};
use crate::validation::{nullable, Checks};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Completed" => Ok(Self::Completed),
            other => Err(format!("`{other}` is not one of Pending, Completed")),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("Pending"),
            Self::Completed => f.write_str("Completed"),
        }
    }
}

/// Work item assigned to a faculty member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskPatch {
    pub title: Option<String>,
    /// Missing keeps the value, `null` clears it.
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub due_date: Option<Option<String>>,
    pub status: Option<String>,
}

impl SubRecord for Task {
    type Input = NewTask;

    const ENTITY: &'static str = "Task";

    fn build(id: u64, input: NewTask) -> Result<Self, ModelError> {
        let mut checks = Checks::new();
        let title = checks.text("title", input.title);
        let due_date = checks.optional_date("due_date", input.due_date);
        let status = checks.optional_choice::<TaskStatus>("status", input.status);
        checks.finish(Self::ENTITY)?;
        Ok(Self {
            id,
            title,
            description: input.description,
            due_date,
            status: status.unwrap_or_default(),
        })
    }

    fn id(&self) -> u64 {
        self.id
    }
}

impl PatchableSubRecord for Task {
    type Patch = TaskPatch;

    fn apply(&mut self, patch: TaskPatch) -> Result<(), ModelError> {
        let mut checks = Checks::new();
        if let Some(title) = patch.title {
            self.title = title;
        }
        checks.non_blank("title", &self.title);
        if let Some(description) = patch.description {
            self.description = description;
        }
        match patch.due_date {
            Some(Some(raw)) => {
                if let Some(due) = checks.optional_date("due_date", Some(raw)) {
                    self.due_date = Some(due);
                }
            }
            Some(None) => self.due_date = None,
            None => {}
        }
        if let Some(status) = checks.optional_choice::<TaskStatus>("status", patch.status) {
            self.status = status;
        }
        checks.finish(Self::ENTITY)
    }
}

/// Faculty member with their embedded task list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faculty {
    pub id: Uuid,
    pub faculty_id: String,
    pub name: String,
    pub department: String,
    pub schedule: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub task_seq: u64,
    #[serde(default)]
    pub version: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewFaculty {
    pub faculty_id: Option<String>,
    pub name: Option<String>,
    pub department: Option<String>,
    pub schedule: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FacultyPatch {
    pub faculty_id: Option<String>,
    pub name: Option<String>,
    pub department: Option<String>,
    pub schedule: Option<String>,
}

impl KeyedRecord for Faculty {
    type Input = NewFaculty;
    type Patch = FacultyPatch;

    const ENTITY: &'static str = "Faculty";
    const KEY_FIELD: &'static str = "faculty_id";

    fn from_input(input: NewFaculty) -> Result<Self, ModelError> {
        let mut checks = Checks::new();
        let faculty_id = checks.text("faculty_id", input.faculty_id);
        let name = checks.text("name", input.name);
        let department = checks.text("department", input.department);
        let schedule = checks.text("schedule", input.schedule);
        checks.finish(Self::ENTITY)?;
        Ok(Self {
            id: Uuid::now_v7(),
            faculty_id,
            name,
            department,
            schedule,
            tasks: Vec::new(),
            task_seq: 0,
            version: 1,
        })
    }

    fn key(&self) -> &str {
        &self.faculty_id
    }

    fn apply(&mut self, patch: FacultyPatch) {
        if let Some(v) = patch.faculty_id {
            self.faculty_id = v;
        }
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.department {
            self.department = v;
        }
        if let Some(v) = patch.schedule {
            self.schedule = v;
        }
    }

    fn validate(&self) -> Result<(), ModelError> {
        let mut checks = Checks::new();
        checks.non_blank("faculty_id", &self.faculty_id);
        checks.non_blank("name", &self.name);
        checks.non_blank("department", &self.department);
        checks.non_blank("schedule", &self.schedule);
        checks.finish(Self::ENTITY)
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}

impl Embeds for Faculty {
    type Item = Task;

    fn items(&self) -> &[Task] {
        &self.tasks
    }

    fn items_mut(&mut self) -> &mut Vec<Task> {
        &mut self.tasks
    }

    fn next_item_id(&mut self) -> u64 {
        self.task_seq += 1;
        self.task_seq
    }
}
