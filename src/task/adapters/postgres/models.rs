//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning user.
    pub owner_id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Priority label.
    pub priority: String,
    /// Status label.
    pub status: String,
    /// Due date.
    pub due_date: DateTime<Utc>,
    /// Checklist JSON payload.
    pub checklist: Value,
    /// Attachments JSON payload.
    pub attachments: Value,
    /// Completion percentage.
    pub progress: i16,
    /// Pin flag.
    pub pinned: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning user.
    pub owner_id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Priority label.
    pub priority: String,
    /// Status label.
    pub status: String,
    /// Due date.
    pub due_date: DateTime<Utc>,
    /// Checklist JSON payload.
    pub checklist: Value,
    /// Attachments JSON payload.
    pub attachments: Value,
    /// Completion percentage.
    pub progress: i16,
    /// Pin flag.
    pub pinned: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
