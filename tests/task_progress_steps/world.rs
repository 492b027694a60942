//! Shared world state for checklist progress scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskdeck::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{ChecklistItem, Task},
    services::{TaskListing, TaskService},
};
use taskdeck::user::domain::UserId;

/// Service type used by the scenario world.
pub type TestTaskService = TaskService<InMemoryTaskRepository, DefaultClock>;

/// Scenario world for checklist progress behaviour tests.
pub struct ProgressWorld {
    pub service: TestTaskService,
    pub owner: UserId,
    pub task: Option<Task>,
    pub listing: Option<TaskListing>,
    pub pin_results: Vec<bool>,
}

impl ProgressWorld {
    /// Creates a world with a fresh store and owner.
    #[must_use]
    pub fn new() -> Self {
        Self {
            service: TaskService::new(
                Arc::new(InMemoryTaskRepository::new()),
                Arc::new(DefaultClock),
            ),
            owner: UserId::new(),
            task: None,
            listing: None,
            pin_results: Vec::new(),
        }
    }

    /// Returns the task under test.
    pub fn current_task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }
}

impl Default for ProgressWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ProgressWorld {
    ProgressWorld::default()
}

/// Builds `total` items with the first `done` completed.
#[must_use]
pub fn checklist(total: usize, done: usize) -> Vec<ChecklistItem> {
    (0..total)
        .map(|index| ChecklistItem::new(format!("Step {}", index + 1), index < done))
        .collect()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
