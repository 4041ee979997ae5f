use std::path::Path;

use models::faculty::{Faculty, FacultyPatch, NewFaculty, NewTask, Task, TaskPatch};

use crate::collection::{KeyedCollection, WritePolicy};
use crate::errors::ServiceError;

/// Faculty members and their task lists.
pub struct FacultyService {
    members: KeyedCollection<Faculty>,
}

impl FacultyService {
    pub async fn open(data_dir: &Path, policy: WritePolicy) -> Result<Self, ServiceError> {
        let members = KeyedCollection::open(data_dir.join("faculty.json"), policy).await?;
        Ok(Self { members })
    }

    pub async fn create(&self, input: NewFaculty) -> Result<Faculty, ServiceError> {
        self.members.create(input).await
    }

    pub async fn get(&self, faculty_id: &str) -> Result<Faculty, ServiceError> {
        self.members.get(faculty_id).await
    }

    pub async fn update(&self, faculty_id: &str, patch: FacultyPatch) -> Result<Faculty, ServiceError> {
        self.members.update(faculty_id, patch).await
    }

    pub async fn delete(&self, faculty_id: &str) -> Result<Faculty, ServiceError> {
        self.members.delete(faculty_id).await
    }

    pub async fn add_task(&self, faculty_id: &str, task: NewTask) -> Result<Faculty, ServiceError> {
        self.members.append_item(faculty_id, task).await
    }

    pub async fn update_task(
        &self,
        faculty_id: &str,
        task_id: &str,
        patch: TaskPatch,
    ) -> Result<Faculty, ServiceError> {
        self.members.update_item(faculty_id, task_id, patch).await
    }

    pub async fn tasks(&self, faculty_id: &str) -> Result<Vec<Task>, ServiceError> {
        self.members.list_items(faculty_id).await
    }
}
