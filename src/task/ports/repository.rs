//! Repository port for owner-scoped task persistence and counting.

use crate::task::domain::{PriorityCounts, StatusCounts, Task, TaskId, TaskStatus};
use crate::user::domain::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Which of an owner's tasks to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskCountFilter {
    /// Every task.
    All,
    /// Tasks with exactly this status.
    Status(TaskStatus),
    /// Unfinished tasks whose due date is before the given instant.
    OverdueAt(DateTime<Utc>),
}

impl TaskCountFilter {
    /// Returns `true` when `task` is selected by this filter.
    #[must_use]
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Status(status) => task.status() == status,
            Self::OverdueAt(now) => task.is_overdue(now),
        }
    }
}

/// Task persistence contract.
///
/// Every read and delete is scoped to an owner; a task owned by someone else
/// is indistinguishable from a missing one.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists every field of an existing task. Last write wins.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier among those owned by `owner`.
    async fn find_owned(&self, owner: UserId, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Lists the tasks owned by `owner`, oldest first, optionally restricted
    /// to one status.
    async fn list_owned(
        &self,
        owner: UserId,
        status: Option<TaskStatus>,
    ) -> TaskRepositoryResult<Vec<Task>>;

    /// Deletes a task if `owner` owns it. Returns whether a row was removed.
    async fn delete_owned(&self, owner: UserId, id: TaskId) -> TaskRepositoryResult<bool>;

    /// Counts the tasks owned by `owner` that match `filter`.
    async fn count(&self, owner: UserId, filter: TaskCountFilter) -> TaskRepositoryResult<u64>;

    /// Counts the tasks owned by `owner` per status.
    async fn count_by_status(&self, owner: UserId) -> TaskRepositoryResult<StatusCounts>;

    /// Counts the tasks owned by `owner` per priority.
    async fn count_by_priority(&self, owner: UserId) -> TaskRepositoryResult<PriorityCounts>;

    /// Returns up to `limit` of the owner's tasks, newest first.
    async fn recent(&self, owner: UserId, limit: usize) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
