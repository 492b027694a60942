//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("Task title is required")]
    EmptyTitle,

    /// A checklist item has an empty title after trimming.
    #[error("Checklist item title is required")]
    EmptyChecklistItemTitle,

    /// The identifier is not a valid task ID.
    #[error("Invalid task ID")]
    InvalidTaskId(String),

    /// The due date could not be parsed.
    #[error("Invalid due date: {0}")]
    InvalidDueDate(String),

    /// The status label is not one of the known states.
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    /// The priority label is not one of the known levels.
    #[error("Invalid priority: {0}")]
    InvalidPriority(String),
}
