//! In-memory task repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{PriorityCounts, StatusCounts, Task, TaskId, TaskStatus},
    ports::{TaskCountFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use crate::user::domain::UserId;

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
}

impl InMemoryTaskState {
    fn owned_by(&self, owner: UserId) -> impl Iterator<Item = &Task> {
        self.tasks.values().filter(move |task| task.is_owned_by(owner))
    }
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn count_u64(count: usize) -> u64 {
    u64::try_from(count).unwrap_or(u64::MAX)
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let slot = state
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        *slot = task.clone();
        Ok(())
    }

    async fn find_owned(&self, owner: UserId, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .tasks
            .get(&id)
            .filter(|task| task.is_owned_by(owner))
            .cloned())
    }

    async fn list_owned(
        &self,
        owner: UserId,
        status: Option<TaskStatus>,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut tasks: Vec<Task> = state
            .owned_by(owner)
            .filter(|task| status.is_none_or(|wanted| task.status() == wanted))
            .cloned()
            .collect();
        tasks.sort_by_key(|task| (task.created_at(), task.id().into_inner()));
        Ok(tasks)
    }

    async fn delete_owned(&self, owner: UserId, id: TaskId) -> TaskRepositoryResult<bool> {
        let mut state = self.state.write().map_err(lock_error)?;
        let owned = state
            .tasks
            .get(&id)
            .is_some_and(|task| task.is_owned_by(owner));
        if owned {
            state.tasks.remove(&id);
        }
        Ok(owned)
    }

    async fn count(&self, owner: UserId, filter: TaskCountFilter) -> TaskRepositoryResult<u64> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(count_u64(
            state.owned_by(owner).filter(|task| filter.matches(task)).count(),
        ))
    }

    async fn count_by_status(&self, owner: UserId) -> TaskRepositoryResult<StatusCounts> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(StatusCounts::from_pairs(
            state.owned_by(owner).map(|task| (task.status(), 1)),
        ))
    }

    async fn count_by_priority(&self, owner: UserId) -> TaskRepositoryResult<PriorityCounts> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(PriorityCounts::from_pairs(
            state.owned_by(owner).map(|task| (task.priority(), 1)),
        ))
    }

    async fn recent(&self, owner: UserId, limit: usize) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut tasks: Vec<Task> = state.owned_by(owner).cloned().collect();
        tasks.sort_by_key(|task| std::cmp::Reverse((task.created_at(), task.id().into_inner())));
        tasks.truncate(limit);
        Ok(tasks)
    }
}
