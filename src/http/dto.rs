//! Wire shapes for requests and responses.
//!
//! Field names are camelCase; status and priority use their display labels.

use super::{ApiError, extract::MultipartForm};
use crate::task::{
    domain::{ChecklistItem, PriorityCounts, StatusCounts, Task, TaskId, TaskPriority, TaskStatus},
    services::{CreateTaskRequest, DashboardSnapshot, UpdateTaskRequest},
};
use crate::user::domain::{UserId, UserProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A task as returned to its owner.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    id: TaskId,
    title: String,
    description: String,
    priority: TaskPriority,
    status: TaskStatus,
    due_date: DateTime<Utc>,
    user: UserId,
    checklist: Vec<ChecklistItem>,
    attachments: Vec<String>,
    progress: u8,
    pinned: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed_checklist_count: Option<usize>,
}

impl TaskView {
    /// Adds the number of completed checklist items, as list responses do.
    #[must_use]
    pub fn with_checklist_count(task: &Task) -> Self {
        Self {
            completed_checklist_count: Some(task.completed_checklist_count()),
            ..Self::from(task)
        }
    }
}

impl From<&Task> for TaskView {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id(),
            title: task.title().as_str().to_owned(),
            description: task.description().to_owned(),
            priority: task.priority(),
            status: task.status(),
            due_date: task.due_date(),
            user: task.owner(),
            checklist: task.checklist().to_vec(),
            attachments: task.attachments().to_vec(),
            progress: task.progress().value(),
            pinned: task.is_pinned(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
            completed_checklist_count: None,
        }
    }
}

/// Per-status counts over every task the caller owns.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummaryView {
    all: u64,
    pending_tasks: u64,
    in_progress_tasks: u64,
    completed_tasks: u64,
}

impl From<StatusCounts> for StatusSummaryView {
    fn from(counts: StatusCounts) -> Self {
        Self {
            all: counts.total(),
            pending_tasks: counts.pending,
            in_progress_tasks: counts.in_progress,
            completed_tasks: counts.completed,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatisticsView {
    total_tasks: u64,
    pending_tasks: u64,
    completed_tasks: u64,
    overdue_task: u64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "PascalCase")]
struct DistributionView {
    pending: u64,
    in_progress: u64,
    completed: u64,
    all: u64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChartsView {
    task_distribution: DistributionView,
    task_priorities_levels: PriorityCounts,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecentTaskView {
    id: TaskId,
    title: String,
    status: TaskStatus,
    priority: TaskPriority,
    due_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

/// The dashboard response body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    success: bool,
    statistics: StatisticsView,
    charts: ChartsView,
    recent_task: Vec<RecentTaskView>,
}

impl From<DashboardSnapshot> for DashboardView {
    fn from(snapshot: DashboardSnapshot) -> Self {
        let DashboardSnapshot {
            statistics,
            status_distribution,
            priority_levels,
            recent,
        } = snapshot;
        Self {
            success: true,
            statistics: StatisticsView {
                total_tasks: statistics.total,
                pending_tasks: statistics.pending,
                completed_tasks: statistics.completed,
                overdue_task: statistics.overdue,
            },
            charts: ChartsView {
                task_distribution: DistributionView {
                    pending: status_distribution.pending,
                    in_progress: status_distribution.in_progress,
                    completed: status_distribution.completed,
                    all: statistics.total,
                },
                task_priorities_levels: priority_levels,
            },
            recent_task: recent
                .iter()
                .map(|task| RecentTaskView {
                    id: task.id(),
                    title: task.title().as_str().to_owned(),
                    status: task.status(),
                    priority: task.priority(),
                    due_date: task.due_date(),
                    created_at: task.created_at(),
                })
                .collect(),
        }
    }
}

/// A user profile plus the caller's task counts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummaryView {
    #[serde(flatten)]
    profile: UserProfile,
    pending_task: u64,
    #[serde(rename = "inprogressTask")]
    in_progress_task: u64,
    completed_task: u64,
}

impl ProfileSummaryView {
    /// Joins a profile with its owner's status counts.
    #[must_use]
    pub const fn new(profile: UserProfile, counts: StatusCounts) -> Self {
        Self {
            profile,
            pending_task: counts.pending,
            in_progress_task: counts.in_progress,
            completed_task: counts.completed,
        }
    }
}

/// Task fields accepted by create and update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    title: Option<String>,
    description: Option<String>,
    priority: Option<String>,
    due_date: Option<String>,
    status: Option<String>,
    checklist: Option<Vec<ChecklistItem>>,
    attachments: Option<Vec<String>>,
}

impl TaskPayload {
    /// Reads the text fields of a multipart task body.
    ///
    /// `checklist` is JSON array text; `attachments` may repeat.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadRequest`] when `checklist` is not a JSON array
    /// of items.
    pub fn from_form(form: &MultipartForm) -> Result<Self, ApiError> {
        let text = |name: &str| form.text(name).map(str::to_owned);
        let checklist = form
            .text("checklist")
            .map(serde_json::from_str::<Vec<ChecklistItem>>)
            .transpose()
            .map_err(|err| ApiError::bad_request(format!("Invalid checklist: {err}")))?;
        let attachments = form
            .has_text("attachments")
            .then(|| form.texts_named("attachments").map(str::to_owned).collect());

        Ok(Self {
            title: text("title"),
            description: text("description"),
            priority: text("priority"),
            due_date: text("dueDate"),
            status: text("status"),
            checklist,
            attachments,
        })
    }

    /// Builds a create request; `uploaded` follows the body links.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadRequest`] when `dueDate` is missing.
    pub fn into_create_request(self, uploaded: Vec<String>) -> Result<CreateTaskRequest, ApiError> {
        let Some(due_date) = self.due_date else {
            return Err(ApiError::bad_request("Due date is required"));
        };
        let mut request = CreateTaskRequest::new(self.title.unwrap_or_default(), due_date)
            .with_uploaded_paths(uploaded);
        if let Some(description) = self.description {
            request = request.with_description(description);
        }
        if let Some(priority) = self.priority {
            request = request.with_priority(priority);
        }
        if let Some(checklist) = self.checklist {
            request = request.with_checklist(checklist);
        }
        if let Some(links) = self.attachments {
            request = request.with_attachment_links(links);
        }
        Ok(request)
    }

    /// Builds an update request; absent fields stay untouched.
    #[must_use]
    pub fn into_update_request(self, uploaded: Vec<String>) -> UpdateTaskRequest {
        let Self {
            title,
            description,
            priority,
            due_date,
            status,
            checklist,
            attachments,
        } = self;
        let mut request = UpdateTaskRequest::new().with_uploaded_paths(uploaded);
        if let Some(value) = title {
            request = request.with_title(value);
        }
        if let Some(value) = description {
            request = request.with_description(value);
        }
        if let Some(value) = priority {
            request = request.with_priority(value);
        }
        if let Some(value) = due_date {
            request = request.with_due_date(value);
        }
        if let Some(value) = status {
            request = request.with_status(value);
        }
        if let Some(value) = checklist {
            request = request.with_checklist(value);
        }
        if let Some(value) = attachments {
            request = request.with_attachment_links(value);
        }
        request
    }
}

/// Body of `PATCH /api/tasks/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusPayload {
    /// Status label, e.g. `"In Progress"`.
    pub status: Option<String>,
}

/// Body of `PATCH /api/tasks/{id}/checklist`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChecklistPayload {
    /// Replacement checklist.
    pub checklist: Option<Vec<ChecklistItem>>,
}

/// Query string of `GET /api/tasks`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskListQuery {
    /// Exact status label to filter by; blank means no filter.
    pub status: Option<String>,
}

/// Account fields accepted by register.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Plain-text password.
    #[serde(default)]
    pub password: String,
    /// Profile image URL, e.g. from a prior upload.
    pub profile_image_url: Option<String>,
}

impl RegisterPayload {
    /// Reads the text fields of a multipart register body.
    #[must_use]
    pub fn from_form(form: &MultipartForm) -> Self {
        let text = |name: &str| form.text(name).unwrap_or_default().to_owned();
        Self {
            name: text("name"),
            email: text("email"),
            password: text("password"),
            profile_image_url: form.text("profileImageUrl").map(str::to_owned),
        }
    }
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginPayload {
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Plain-text password.
    #[serde(default)]
    pub password: String,
}

/// Body of the profile update routes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePayload {
    /// New display name.
    pub name: Option<String>,
    /// New password.
    pub password: Option<String>,
    /// New profile image URL.
    pub profile_image_url: Option<String>,
}
