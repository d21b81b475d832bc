use crate::model::{
    Project, ProjectInput, ProjectStatus, Task, TaskInput, TaskStatus, TaskWithAssignees,
    Volunteer, VolunteerInput,
};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

pub mod memory;
pub mod mongo;

#[derive(Debug)]
pub struct RepoError(pub String);

impl std::fmt::Display for RepoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for RepoError {}

impl From<mongodb::error::Error> for RepoError {
    fn from(err: mongodb::error::Error) -> Self {
        Self(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for RepoError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        Self(err.to_string())
    }
}

impl From<mongodb::bson::de::Error> for RepoError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        Self(err.to_string())
    }
}

/// Typed accessors over the volunteers collection. Every call is
/// independently consistent; there are no cross-repository transactions.
#[async_trait]
pub trait VolunteerStore: Send + Sync + 'static {
    async fn create(&self, input: VolunteerInput) -> Result<Volunteer, RepoError>;
    async fn list(&self) -> Result<Vec<Volunteer>, RepoError>;
    async fn get(&self, id: ObjectId) -> Result<Option<Volunteer>, RepoError>;
    async fn update(&self, id: ObjectId, input: VolunteerInput)
        -> Result<Option<Volunteer>, RepoError>;
    /// Returns false when no record carried the identifier. Tasks still
    /// referencing the volunteer keep their identifiers; the expand
    /// operation drops references that no longer resolve.
    async fn delete(&self, id: ObjectId) -> Result<bool, RepoError>;
    async fn count(&self) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync + 'static {
    async fn create(&self, input: TaskInput) -> Result<Task, RepoError>;
    async fn list(&self) -> Result<Vec<Task>, RepoError>;
    async fn get(&self, id: ObjectId) -> Result<Option<Task>, RepoError>;
    async fn update(&self, id: ObjectId, input: TaskInput) -> Result<Option<Task>, RepoError>;
    async fn delete(&self, id: ObjectId) -> Result<bool, RepoError>;
    /// Read-time join: tasks with the given status, each `assigned_to`
    /// reference expanded into the full volunteer record.
    async fn find_by_status_expanded(
        &self,
        status: TaskStatus,
    ) -> Result<Vec<TaskWithAssignees>, RepoError>;
}

#[async_trait]
pub trait ProjectStore: Send + Sync + 'static {
    async fn create(&self, input: ProjectInput) -> Result<Project, RepoError>;
    async fn list(&self) -> Result<Vec<Project>, RepoError>;
    async fn get(&self, id: ObjectId) -> Result<Option<Project>, RepoError>;
    async fn update(&self, id: ObjectId, input: ProjectInput)
        -> Result<Option<Project>, RepoError>;
    async fn delete(&self, id: ObjectId) -> Result<bool, RepoError>;
    async fn find_by_status_in(
        &self,
        statuses: &[ProjectStatus],
    ) -> Result<Vec<Project>, RepoError>;
    /// One bulk update: `$inc`-style increments on every active project.
    /// Returns the count of affected records.
    async fn increment_metrics_for_active(
        &self,
        hours: i64,
        people: i64,
    ) -> Result<u64, RepoError>;
}
