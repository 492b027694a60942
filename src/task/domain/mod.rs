//! Domain model for tasks.
//!
//! A task belongs to exactly one user. Its progress and status follow its
//! checklist through [`derive_progress`], except when a caller sets the
//! status explicitly.

mod checklist;
mod error;
mod ids;
mod progress;
mod status;
mod summary;
mod task;

pub use checklist::{ChecklistItem, normalize_checklist};
pub use error::TaskDomainError;
pub use ids::{TaskId, TaskTitle};
pub use progress::{Progress, derive_progress};
pub use status::{TaskPriority, TaskStatus};
pub use summary::{PriorityCounts, StatusCounts};
pub use task::{PersistedTaskData, Task, TaskChanges, TaskDraft, parse_due_date};
