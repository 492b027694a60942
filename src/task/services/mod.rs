//! Application services for task management.

mod dashboard;
mod tasks;

pub use dashboard::{DashboardService, DashboardSnapshot, DashboardStatistics, RECENT_TASK_LIMIT};
pub use tasks::{
    CreateTaskRequest, TaskListing, TaskService, TaskServiceError, TaskServiceResult,
    UpdateTaskRequest,
};
