//! Read-only aggregation of a user's tasks for the dashboard.

use crate::task::{
    domain::{PriorityCounts, StatusCounts, Task, TaskStatus},
    ports::{TaskCountFilter, TaskRepository, TaskRepositoryError},
};
use crate::user::domain::UserId;
use mockable::Clock;
use std::sync::Arc;

/// Number of tasks listed in [`DashboardSnapshot::recent`].
pub const RECENT_TASK_LIMIT: usize = 10;

/// Headline counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStatistics {
    /// Every owned task.
    pub total: u64,
    /// Tasks in [`TaskStatus::Pending`].
    pub pending: u64,
    /// Tasks in [`TaskStatus::Completed`].
    pub completed: u64,
    /// Unfinished tasks past their due date.
    pub overdue: u64,
}

/// Everything the dashboard shows for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSnapshot {
    /// Headline counts.
    pub statistics: DashboardStatistics,
    /// Counts per status.
    pub status_distribution: StatusCounts,
    /// Counts per priority.
    pub priority_levels: PriorityCounts,
    /// Most recently created tasks, newest first.
    pub recent: Vec<Task>,
}

/// Dashboard aggregation service.
pub struct DashboardService<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for DashboardService<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> DashboardService<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new dashboard service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Builds the snapshot for `owner` as of the clock's current time.
    ///
    /// # Errors
    ///
    /// Returns the first repository error encountered.
    pub async fn snapshot(&self, owner: UserId) -> Result<DashboardSnapshot, TaskRepositoryError> {
        let now = self.clock.utc();
        let repo = &self.repository;

        let (total, pending, completed, overdue, status_distribution, priority_levels, recent) =
            tokio::try_join!(
                repo.count(owner, TaskCountFilter::All),
                repo.count(owner, TaskCountFilter::Status(TaskStatus::Pending)),
                repo.count(owner, TaskCountFilter::Status(TaskStatus::Completed)),
                repo.count(owner, TaskCountFilter::OverdueAt(now)),
                repo.count_by_status(owner),
                repo.count_by_priority(owner),
                repo.recent(owner, RECENT_TASK_LIMIT),
            )?;

        Ok(DashboardSnapshot {
            statistics: DashboardStatistics {
                total,
                pending,
                completed,
                overdue,
            },
            status_distribution,
            priority_levels,
            recent,
        })
    }
}
