//! Checklist items attached to a task.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};

/// A titled sub-task within a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Item text.
    pub title: String,
    /// Whether the item is done.
    #[serde(default)]
    pub completed: bool,
}

impl ChecklistItem {
    /// Creates a checklist item.
    #[must_use]
    pub fn new(title: impl Into<String>, completed: bool) -> Self {
        Self {
            title: title.into(),
            completed,
        }
    }
}

/// Trims item titles and rejects blank ones.
///
/// # Errors
///
/// Returns [`TaskDomainError::EmptyChecklistItemTitle`] when any item has a
/// blank title.
pub fn normalize_checklist(
    items: impl IntoIterator<Item = ChecklistItem>,
) -> Result<Vec<ChecklistItem>, TaskDomainError> {
    items
        .into_iter()
        .map(|item| {
            let title = item.title.trim();
            if title.is_empty() {
                return Err(TaskDomainError::EmptyChecklistItemTitle);
            }
            Ok(ChecklistItem::new(title, item.completed))
        })
        .collect()
}
