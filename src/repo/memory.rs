use super::{ProjectStore, RepoError, TaskStore, VolunteerStore};
use crate::model::{
    Project, ProjectInput, ProjectStatus, Task, TaskInput, TaskStatus, TaskWithAssignees,
    Volunteer, VolunteerInput,
};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

/// In-memory stand-in for all three repositories, used by tests and by the
/// integration suite that drives the router without a database.
#[derive(Default)]
pub struct MemoryStore {
    volunteers: Mutex<HashMap<ObjectId, Volunteer>>,
    tasks: Mutex<HashMap<ObjectId, Task>>,
    projects: Mutex<HashMap<ObjectId, Project>>,
    pub fail_reads: AtomicBool,
    pub slow_writes: AtomicBool,
}

impl MemoryStore {
    fn check_reads(&self) -> Result<(), RepoError> {
        if self.fail_reads.load(Ordering::Relaxed) {
            return Err(RepoError("injected read failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl VolunteerStore for MemoryStore {
    async fn create(&self, input: VolunteerInput) -> Result<Volunteer, RepoError> {
        let id = ObjectId::new();
        let volunteer = Volunteer {
            id: Some(id),
            name: input.name,
            email: input.email,
            phone: input.phone,
        };
        self.volunteers.lock().await.insert(id, volunteer.clone());
        Ok(volunteer)
    }

    async fn list(&self) -> Result<Vec<Volunteer>, RepoError> {
        self.check_reads()?;
        let mut volunteers: Vec<Volunteer> =
            self.volunteers.lock().await.values().cloned().collect();
        volunteers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(volunteers)
    }

    async fn get(&self, id: ObjectId) -> Result<Option<Volunteer>, RepoError> {
        self.check_reads()?;
        Ok(self.volunteers.lock().await.get(&id).cloned())
    }

    async fn update(
        &self,
        id: ObjectId,
        input: VolunteerInput,
    ) -> Result<Option<Volunteer>, RepoError> {
        let mut volunteers = self.volunteers.lock().await;
        Ok(volunteers.get_mut(&id).map(|volunteer| {
            volunteer.name = input.name;
            volunteer.email = input.email;
            volunteer.phone = input.phone;
            volunteer.clone()
        }))
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, RepoError> {
        Ok(self.volunteers.lock().await.remove(&id).is_some())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        self.check_reads()?;
        Ok(self.volunteers.lock().await.len() as u64)
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create(&self, input: TaskInput) -> Result<Task, RepoError> {
        let id = ObjectId::new();
        let task = Task {
            id: Some(id),
            title: input.title,
            description: input.description,
            status: input.status,
            assigned_to: input.assigned_to,
        };
        self.tasks.lock().await.insert(id, task.clone());
        Ok(task)
    }

    async fn list(&self) -> Result<Vec<Task>, RepoError> {
        self.check_reads()?;
        let mut tasks: Vec<Task> = self.tasks.lock().await.values().cloned().collect();
        tasks.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(tasks)
    }

    async fn get(&self, id: ObjectId) -> Result<Option<Task>, RepoError> {
        self.check_reads()?;
        Ok(self.tasks.lock().await.get(&id).cloned())
    }

    async fn update(&self, id: ObjectId, input: TaskInput) -> Result<Option<Task>, RepoError> {
        let mut tasks = self.tasks.lock().await;
        Ok(tasks.get_mut(&id).map(|task| {
            task.title = input.title;
            task.description = input.description;
            task.status = input.status;
            task.assigned_to = input.assigned_to;
            task.clone()
        }))
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, RepoError> {
        Ok(self.tasks.lock().await.remove(&id).is_some())
    }

    async fn find_by_status_expanded(
        &self,
        status: TaskStatus,
    ) -> Result<Vec<TaskWithAssignees>, RepoError> {
        self.check_reads()?;
        let volunteers = self.volunteers.lock().await;
        let tasks = self.tasks.lock().await;
        let mut expanded: Vec<TaskWithAssignees> = tasks
            .values()
            .filter(|task| task.status == status)
            .map(|task| TaskWithAssignees {
                id: task.id,
                title: task.title.clone(),
                description: task.description.clone(),
                status: task.status,
                assigned_to: task.assigned_to.clone(),
                // Dangling references expand to nothing.
                assignees: task
                    .assigned_to
                    .iter()
                    .filter_map(|id| volunteers.get(id).cloned())
                    .collect(),
            })
            .collect();
        expanded.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(expanded)
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn create(&self, input: ProjectInput) -> Result<Project, RepoError> {
        let id = ObjectId::new();
        let project = Project {
            id: Some(id),
            name: input.name,
            description: input.description,
            status: input.status,
            hours_worked: input.hours_worked,
            people_helped: input.people_helped,
        };
        self.projects.lock().await.insert(id, project.clone());
        Ok(project)
    }

    async fn list(&self) -> Result<Vec<Project>, RepoError> {
        self.check_reads()?;
        let mut projects: Vec<Project> = self.projects.lock().await.values().cloned().collect();
        projects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(projects)
    }

    async fn get(&self, id: ObjectId) -> Result<Option<Project>, RepoError> {
        self.check_reads()?;
        Ok(self.projects.lock().await.get(&id).cloned())
    }

    async fn update(
        &self,
        id: ObjectId,
        input: ProjectInput,
    ) -> Result<Option<Project>, RepoError> {
        let mut projects = self.projects.lock().await;
        Ok(projects.get_mut(&id).map(|project| {
            project.name = input.name;
            project.description = input.description;
            project.status = input.status;
            project.hours_worked = input.hours_worked;
            project.people_helped = input.people_helped;
            project.clone()
        }))
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, RepoError> {
        Ok(self.projects.lock().await.remove(&id).is_some())
    }

    async fn find_by_status_in(
        &self,
        statuses: &[ProjectStatus],
    ) -> Result<Vec<Project>, RepoError> {
        self.check_reads()?;
        let mut projects: Vec<Project> = self
            .projects
            .lock()
            .await
            .values()
            .filter(|project| statuses.contains(&project.status))
            .cloned()
            .collect();
        projects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(projects)
    }

    async fn increment_metrics_for_active(
        &self,
        hours: i64,
        people: i64,
    ) -> Result<u64, RepoError> {
        if self.slow_writes.load(Ordering::Relaxed) {
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        let mut projects = self.projects.lock().await;
        let mut affected = 0;
        for project in projects.values_mut() {
            if project.status == ProjectStatus::Active {
                project.hours_worked += hours;
                project.people_helped += people;
                affected += 1;
            }
        }
        Ok(affected)
    }
}
