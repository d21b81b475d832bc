use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A person who volunteers for the organization. Referenced by tasks through
/// weak `assigned_to` identifiers; deleting a volunteer never touches tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volunteer {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct VolunteerInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "In Progress" => Ok(Self::InProgress),
            "Completed" => Ok(Self::Completed),
            other => Err(format!(
                "unknown task status {other:?}; expected Pending, In Progress, or Completed"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    /// Weak references into the volunteers collection. Followed at read time
    /// via an expand operation; identifiers that no longer resolve are
    /// dropped silently.
    #[serde(default)]
    pub assigned_to: Vec<ObjectId>,
}

#[derive(Debug, Clone)]
pub struct TaskInput {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub assigned_to: Vec<ObjectId>,
}

/// A task with its `assigned_to` references expanded into full volunteer
/// records. Produced only by the repository expand operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskWithAssignees {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(default)]
    pub assigned_to: Vec<ObjectId>,
    #[serde(default)]
    pub assignees: Vec<Volunteer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Planning,
    Active,
    Completed,
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planning" => Ok(Self::Planning),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(format!(
                "unknown project status {other:?}; expected planning, active, or completed"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ProjectStatus,
    // Rollup accumulators. Absent stored fields read as 0 and the scheduled
    // job only ever increments them.
    #[serde(default)]
    pub hours_worked: i64,
    #[serde(default)]
    pub people_helped: i64,
}

#[derive(Debug, Clone)]
pub struct ProjectInput {
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub hours_worked: i64,
    pub people_helped: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn task_status_round_trips_wire_strings() {
        for (status, wire) in [
            (TaskStatus::Pending, "Pending"),
            (TaskStatus::InProgress, "In Progress"),
            (TaskStatus::Completed, "Completed"),
        ] {
            assert_eq!(serde_json::to_value(status).expect("serialize"), json!(wire));
            assert_eq!(wire.parse::<TaskStatus>().expect("parse"), status);
        }
        assert!("Done".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn project_status_uses_lowercase_wire_strings() {
        assert_eq!(
            serde_json::to_value(ProjectStatus::Active).expect("serialize"),
            json!("active")
        );
        assert_eq!(
            "planning".parse::<ProjectStatus>().expect("parse"),
            ProjectStatus::Planning
        );
        assert!("archived".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn absent_project_accumulators_read_as_zero() {
        let project: Project = serde_json::from_value(json!({
            "name": "Well digging",
            "status": "active"
        }))
        .expect("deserialize project without accumulators");
        assert_eq!(project.hours_worked, 0);
        assert_eq!(project.people_helped, 0);
    }

    #[test]
    fn absent_task_assignments_read_as_empty() {
        let task: Task = serde_json::from_value(json!({
            "title": "Sort donations",
            "status": "Pending"
        }))
        .expect("deserialize task without assignments");
        assert!(task.assigned_to.is_empty());
    }
}
