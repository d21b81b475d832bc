use crate::model::{ProjectStatus, TaskStatus, TaskWithAssignees};
use crate::repo::RepoError;
use crate::Repositories;
use serde::Serialize;

/// Statuses whose project rollups feed the report totals.
const REPORTED_STATUSES: [ProjectStatus; 3] = [
    ProjectStatus::Planning,
    ProjectStatus::Active,
    ProjectStatus::Completed,
];

#[derive(Debug, Serialize)]
pub struct ImpactReport {
    pub volunteers_count: u64,
    pub total_people_helped: i64,
    pub total_hours: i64,
    pub tasks: Vec<TaskWithAssignees>,
}

/// Fans out three repository reads concurrently and joins on all of them;
/// one failure fails the whole report, there is no partial degradation.
/// Project rollups are authoritative, so the totals are a linear reduction
/// over already-denormalized fields rather than a recomputation from task
/// detail.
pub async fn build_impact_report(repos: &Repositories) -> Result<ImpactReport, RepoError> {
    let (volunteers_count, tasks, projects) = tokio::try_join!(
        repos.volunteers.count(),
        repos.tasks.find_by_status_expanded(TaskStatus::Completed),
        repos.projects.find_by_status_in(&REPORTED_STATUSES),
    )?;

    let total_people_helped = projects.iter().map(|p| p.people_helped).sum();
    let total_hours = projects.iter().map(|p| p.hours_worked).sum();

    Ok(ImpactReport {
        volunteers_count,
        total_people_helped,
        total_hours,
        tasks,
    })
}
