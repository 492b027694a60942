//! Task aggregate root and the values used to create and change it.

use super::{
    ChecklistItem, Progress, TaskDomainError, TaskId, TaskPriority, TaskStatus, TaskTitle,
    derive_progress, normalize_checklist,
};
use crate::user::domain::UserId;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use mockable::Clock;

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    owner: UserId,
    title: TaskTitle,
    description: String,
    priority: TaskPriority,
    status: TaskStatus,
    due_date: DateTime<Utc>,
    checklist: Vec<ChecklistItem>,
    attachments: Vec<String>,
    progress: Progress,
    pinned: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Owning user.
    pub owner: UserId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: String,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted due date.
    pub due_date: DateTime<Utc>,
    /// Persisted checklist, in order.
    pub checklist: Vec<ChecklistItem>,
    /// Persisted attachment links and paths.
    pub attachments: Vec<String>,
    /// Persisted progress.
    pub progress: Progress,
    /// Persisted pin flag.
    pub pinned: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    title: TaskTitle,
    due_date: DateTime<Utc>,
    description: String,
    priority: TaskPriority,
    checklist: Vec<ChecklistItem>,
    attachments: Vec<String>,
}

impl TaskDraft {
    /// Creates a draft with the required fields.
    #[must_use]
    pub const fn new(title: TaskTitle, due_date: DateTime<Utc>) -> Self {
        Self {
            title,
            due_date,
            description: String::new(),
            priority: TaskPriority::Medium,
            checklist: Vec::new(),
            attachments: Vec::new(),
        }
    }

    /// Sets the description; surrounding whitespace is dropped.
    #[must_use]
    pub fn with_description(mut self, description: impl AsRef<str>) -> Self {
        description.as_ref().trim().clone_into(&mut self.description);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the checklist.
    #[must_use]
    pub fn with_checklist(mut self, checklist: Vec<ChecklistItem>) -> Self {
        self.checklist = checklist;
        self
    }

    /// Sets the attachment links and paths.
    #[must_use]
    pub fn with_attachments(mut self, attachments: Vec<String>) -> Self {
        self.attachments = attachments;
        self
    }
}

/// Partial update of a task. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    /// New title.
    pub title: Option<TaskTitle>,
    /// New description.
    pub description: Option<String>,
    /// New priority.
    pub priority: Option<TaskPriority>,
    /// New due date.
    pub due_date: Option<DateTime<Utc>>,
    /// New status. A checklist in the same change set takes precedence.
    pub status: Option<TaskStatus>,
    /// Replacement attachment list.
    pub attachments: Option<Vec<String>>,
    /// Replacement checklist.
    pub checklist: Option<Vec<ChecklistItem>>,
}

impl Task {
    /// Creates a task owned by `owner`.
    ///
    /// A non-empty checklist sets progress and status immediately.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyChecklistItemTitle`] when a checklist
    /// item has a blank title.
    pub fn create(
        owner: UserId,
        draft: TaskDraft,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let timestamp = clock.utc();
        let TaskDraft {
            title,
            due_date,
            description,
            priority,
            checklist,
            attachments,
        } = draft;
        let checklist = normalize_checklist(checklist)?;
        let (progress, status) = derive_progress(&checklist);

        Ok(Self {
            id: TaskId::new(),
            owner,
            title,
            description,
            priority,
            status,
            due_date,
            checklist,
            attachments,
            progress,
            pinned: false,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            title: data.title,
            description: data.description,
            priority: data.priority,
            status: data.status,
            due_date: data.due_date,
            checklist: data.checklist,
            attachments: data.attachments,
            progress: data.progress,
            pinned: data.pinned,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns `true` when `user` owns this task.
    #[must_use]
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner == user
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    /// Returns the checklist in order.
    #[must_use]
    pub fn checklist(&self) -> &[ChecklistItem] {
        &self.checklist
    }

    /// Returns the attachment links and paths.
    #[must_use]
    pub fn attachments(&self) -> &[String] {
        &self.attachments
    }

    /// Returns the progress.
    #[must_use]
    pub const fn progress(&self) -> Progress {
        self.progress
    }

    /// Returns whether the task is pinned.
    #[must_use]
    pub const fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Number of completed checklist items.
    #[must_use]
    pub fn completed_checklist_count(&self) -> usize {
        self.checklist.iter().filter(|item| item.completed).count()
    }

    /// Returns `true` when the task is unfinished and its due date has passed.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status != TaskStatus::Completed && self.due_date < now
    }

    /// Applies a partial update.
    ///
    /// Plain fields overwrite first. A replacement checklist is applied last
    /// and re-derives progress and status, overriding `changes.status`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyChecklistItemTitle`] when the
    /// replacement checklist has a blank item; the task is left unchanged.
    pub fn apply(&mut self, changes: TaskChanges, clock: &impl Clock) -> Result<(), TaskDomainError> {
        let TaskChanges {
            title,
            description,
            priority,
            due_date,
            status,
            attachments,
            checklist,
        } = changes;
        let checklist = checklist.map(normalize_checklist).transpose()?;

        if let Some(new_title) = title {
            self.title = new_title;
        }
        if let Some(new_description) = description {
            new_description.trim().clone_into(&mut self.description);
        }
        if let Some(new_priority) = priority {
            self.priority = new_priority;
        }
        if let Some(new_due_date) = due_date {
            self.due_date = new_due_date;
        }
        if let Some(new_status) = status {
            self.status = new_status;
        }
        if let Some(new_attachments) = attachments {
            self.attachments = new_attachments;
        }
        if let Some(items) = checklist {
            self.set_checklist(items);
        }
        self.touch(clock);
        Ok(())
    }

    /// Sets the status explicitly.
    ///
    /// Moving to [`TaskStatus::Completed`] marks every checklist item done
    /// and sets progress to 100. Other statuses leave checklist and progress
    /// as they are.
    pub fn change_status(&mut self, status: TaskStatus, clock: &impl Clock) {
        self.status = status;
        if status == TaskStatus::Completed {
            for item in &mut self.checklist {
                item.completed = true;
            }
            self.progress = Progress::COMPLETE;
        }
        self.touch(clock);
    }

    /// Replaces the checklist and re-derives progress and status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyChecklistItemTitle`] when an item has
    /// a blank title; the task is left unchanged.
    pub fn replace_checklist(
        &mut self,
        items: Vec<ChecklistItem>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let normalized = normalize_checklist(items)?;
        self.set_checklist(normalized);
        self.touch(clock);
        Ok(())
    }

    /// Flips the pin flag and returns the new value.
    pub fn toggle_pinned(&mut self, clock: &impl Clock) -> bool {
        self.pinned = !self.pinned;
        self.touch(clock);
        self.pinned
    }

    fn set_checklist(&mut self, items: Vec<ChecklistItem>) {
        let (progress, status) = derive_progress(&items);
        self.checklist = items;
        self.progress = progress;
        self.status = status;
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

/// Parses a due date.
///
/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS[.fff]` values
/// (read as UTC), and plain `YYYY-MM-DD` dates (midnight UTC).
///
/// # Errors
///
/// Returns [`TaskDomainError::InvalidDueDate`] for anything else.
pub fn parse_due_date(raw: &str) -> Result<DateTime<Utc>, TaskDomainError> {
    let value = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TaskDomainError::InvalidDueDate(raw.to_owned()))
}
