use crate::repo::ProjectStore;
use chrono::{DateTime, Days, TimeZone};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

pub const DAILY_HOURS_INCREMENT: i64 = 6;
pub const DAILY_PEOPLE_INCREMENT: i64 = 10;

const FALLBACK_SLEEP: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    Updated(u64),
    /// The previous run was still in progress, so this fire was skipped
    /// rather than overlapped.
    SkippedOverlap,
    Failed,
}

/// Daily metrics job with two states, idle and running. Fires at the start
/// of each day (server local time) and bulk-increments the rollup fields on
/// every active project. Failures are logged and swallowed; the next fire
/// proceeds independently.
pub struct MetricsJob {
    projects: Arc<dyn ProjectStore>,
    running: AtomicBool,
}

impl MetricsJob {
    #[must_use]
    pub fn new(projects: Arc<dyn ProjectStore>) -> Arc<Self> {
        Arc::new(Self {
            projects,
            running: AtomicBool::new(false),
        })
    }

    pub fn spawn_daily(self: &Arc<Self>) {
        let me = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                let sleep = duration_until_next_midnight(chrono::Local::now());
                tokio::time::sleep(sleep).await;
                me.fire().await;
            }
        });
    }

    pub async fn fire(&self) -> FireOutcome {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("previous metrics run still in progress; skipping this fire");
            return FireOutcome::SkippedOverlap;
        }
        let outcome = match self
            .projects
            .increment_metrics_for_active(DAILY_HOURS_INCREMENT, DAILY_PEOPLE_INCREMENT)
            .await
        {
            Ok(affected) => {
                info!(
                    projects = affected,
                    "daily project metrics updated (+{DAILY_HOURS_INCREMENT} hours, +{DAILY_PEOPLE_INCREMENT} people)"
                );
                FireOutcome::Updated(affected)
            }
            Err(err) => {
                error!(error = %err, "daily metrics update failed");
                FireOutcome::Failed
            }
        };
        self.running.store(false, Ordering::SeqCst);
        outcome
    }
}

/// Time until the next top-of-day in `now`'s timezone. Falls back to a flat
/// 24 hours when the next midnight is unrepresentable locally (DST gaps).
pub(crate) fn duration_until_next_midnight<Tz: TimeZone>(now: DateTime<Tz>) -> Duration {
    let Some(tomorrow) = now.date_naive().checked_add_days(Days::new(1)) else {
        return FALLBACK_SLEEP;
    };
    let Some(next) = tomorrow.and_hms_opt(0, 0, 0) else {
        return FALLBACK_SLEEP;
    };
    match now.timezone().from_local_datetime(&next).earliest() {
        Some(next_midnight) => (next_midnight - now).to_std().unwrap_or(FALLBACK_SLEEP),
        None => FALLBACK_SLEEP,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProjectInput, ProjectStatus};
    use crate::Repositories;
    use chrono::Utc;

    fn project(name: &str, status: ProjectStatus, hours: i64, people: i64) -> ProjectInput {
        ProjectInput {
            name: name.to_string(),
            description: None,
            status,
            hours_worked: hours,
            people_helped: people,
        }
    }

    #[test]
    fn next_midnight_is_top_of_tomorrow() {
        let now = Utc.with_ymd_and_hms(2026, 8, 25, 23, 59, 0).unwrap();
        assert_eq!(duration_until_next_midnight(now), Duration::from_secs(60));

        let now = Utc.with_ymd_and_hms(2026, 8, 25, 0, 0, 0).unwrap();
        assert_eq!(
            duration_until_next_midnight(now),
            Duration::from_secs(24 * 60 * 60)
        );
    }

    #[tokio::test]
    async fn fire_increments_active_projects_only() {
        let (repos, store) = Repositories::in_memory();
        let active = ProjectStore::create(store.as_ref(), project("Well", ProjectStatus::Active, 10, 5))
            .await
            .expect("create project");
        let completed = ProjectStore::create(
            store.as_ref(),
            project("School", ProjectStatus::Completed, 20, 15),
        )
        .await
        .expect("create project");

        let job = MetricsJob::new(Arc::clone(&repos.projects));
        assert_eq!(job.fire().await, FireOutcome::Updated(1));

        let active = repos
            .projects
            .get(active.id.expect("id"))
            .await
            .expect("read project")
            .expect("project present");
        assert_eq!(active.hours_worked, 16);
        assert_eq!(active.people_helped, 15);

        let completed = repos
            .projects
            .get(completed.id.expect("id"))
            .await
            .expect("read project")
            .expect("project present");
        assert_eq!(completed.hours_worked, 20);
        assert_eq!(completed.people_helped, 15);
    }

    #[tokio::test]
    async fn overlapping_fire_is_skipped() {
        let (repos, store) = Repositories::in_memory();
        ProjectStore::create(store.as_ref(), project("Well", ProjectStatus::Active, 0, 0))
            .await
            .expect("create project");
        store
            .slow_writes
            .store(true, std::sync::atomic::Ordering::Relaxed);

        let job = MetricsJob::new(Arc::clone(&repos.projects));
        let slow = {
            let job = Arc::clone(&job);
            tokio::spawn(async move { job.fire().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(job.fire().await, FireOutcome::SkippedOverlap);
        assert_eq!(slow.await.expect("join"), FireOutcome::Updated(1));
    }

    #[tokio::test]
    async fn failed_fire_returns_to_idle() {
        struct FailingProjects;
        #[async_trait::async_trait]
        impl ProjectStore for FailingProjects {
            async fn create(
                &self,
                _: ProjectInput,
            ) -> Result<crate::model::Project, crate::repo::RepoError> {
                Err(crate::repo::RepoError("unused".to_string()))
            }
            async fn list(&self) -> Result<Vec<crate::model::Project>, crate::repo::RepoError> {
                Err(crate::repo::RepoError("unused".to_string()))
            }
            async fn get(
                &self,
                _: mongodb::bson::oid::ObjectId,
            ) -> Result<Option<crate::model::Project>, crate::repo::RepoError> {
                Err(crate::repo::RepoError("unused".to_string()))
            }
            async fn update(
                &self,
                _: mongodb::bson::oid::ObjectId,
                _: ProjectInput,
            ) -> Result<Option<crate::model::Project>, crate::repo::RepoError> {
                Err(crate::repo::RepoError("unused".to_string()))
            }
            async fn delete(
                &self,
                _: mongodb::bson::oid::ObjectId,
            ) -> Result<bool, crate::repo::RepoError> {
                Err(crate::repo::RepoError("unused".to_string()))
            }
            async fn find_by_status_in(
                &self,
                _: &[ProjectStatus],
            ) -> Result<Vec<crate::model::Project>, crate::repo::RepoError> {
                Err(crate::repo::RepoError("unused".to_string()))
            }
            async fn increment_metrics_for_active(
                &self,
                _: i64,
                _: i64,
            ) -> Result<u64, crate::repo::RepoError> {
                Err(crate::repo::RepoError("bulk update rejected".to_string()))
            }
        }

        let job = MetricsJob::new(Arc::new(FailingProjects));
        assert_eq!(job.fire().await, FireOutcome::Failed);
        // The job returned to idle, so the next fire runs instead of skipping.
        assert_eq!(job.fire().await, FireOutcome::Failed);
    }
}
