//! Owner-scoped task operations.

use crate::task::{
    domain::{
        ChecklistItem, StatusCounts, Task, TaskChanges, TaskDomainError, TaskDraft, TaskId,
        TaskPriority, TaskStatus, TaskTitle, parse_due_date,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use crate::user::domain::UserId;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    due_date: String,
    description: Option<String>,
    priority: Option<String>,
    checklist: Vec<ChecklistItem>,
    attachment_links: Vec<String>,
    uploaded_paths: Vec<String>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, due_date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            due_date: due_date.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority label.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets the checklist.
    #[must_use]
    pub fn with_checklist(mut self, checklist: impl IntoIterator<Item = ChecklistItem>) -> Self {
        self.checklist = checklist.into_iter().collect();
        self
    }

    /// Sets attachment links supplied in the request body.
    #[must_use]
    pub fn with_attachment_links(mut self, links: impl IntoIterator<Item = String>) -> Self {
        self.attachment_links = links.into_iter().collect();
        self
    }

    /// Sets public paths of files uploaded with the request.
    #[must_use]
    pub fn with_uploaded_paths(mut self, paths: impl IntoIterator<Item = String>) -> Self {
        self.uploaded_paths = paths.into_iter().collect();
        self
    }
}

/// Request payload for a partial task update.
///
/// Absent fields leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    title: Option<String>,
    description: Option<String>,
    priority: Option<String>,
    due_date: Option<String>,
    status: Option<String>,
    checklist: Option<Vec<ChecklistItem>>,
    attachment_links: Option<Vec<String>>,
    uploaded_paths: Vec<String>,
}

impl UpdateTaskRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a new title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets a new description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets a new priority label.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets a new due date.
    #[must_use]
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    /// Sets a new status label.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets a replacement checklist.
    #[must_use]
    pub fn with_checklist(mut self, checklist: impl IntoIterator<Item = ChecklistItem>) -> Self {
        self.checklist = Some(checklist.into_iter().collect());
        self
    }

    /// Sets replacement attachment links.
    #[must_use]
    pub fn with_attachment_links(mut self, links: impl IntoIterator<Item = String>) -> Self {
        self.attachment_links = Some(links.into_iter().collect());
        self
    }

    /// Sets public paths of files uploaded with the request.
    #[must_use]
    pub fn with_uploaded_paths(mut self, paths: impl IntoIterator<Item = String>) -> Self {
        self.uploaded_paths = paths.into_iter().collect();
        self
    }

    fn into_changes(self) -> Result<TaskChanges, TaskDomainError> {
        let Self {
            title,
            description,
            priority,
            due_date,
            status,
            checklist,
            attachment_links,
            uploaded_paths,
        } = self;

        let attachments = if attachment_links.is_none() && uploaded_paths.is_empty() {
            None
        } else {
            Some(merge_attachments(
                attachment_links.unwrap_or_default(),
                uploaded_paths,
            ))
        };

        Ok(TaskChanges {
            title: title.map(TaskTitle::new).transpose()?,
            description,
            priority: priority.as_deref().map(str::parse).transpose()?,
            due_date: due_date.as_deref().map(parse_due_date).transpose()?,
            status: status.as_deref().map(str::parse).transpose()?,
            attachments,
            checklist,
        })
    }
}

/// Owned tasks plus counts over the full owned set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListing {
    /// Tasks matching the requested filter, oldest first.
    pub tasks: Vec<Task>,
    /// Per-status counts over every owned task, regardless of the filter.
    pub summary: StatusCounts,
}

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// No task with this ID is owned by the caller.
    #[error("Task not found")]
    NotFound(TaskId),
    /// The task is missing or owned by someone else.
    #[error("Not authorized or task not found")]
    Forbidden(TaskId),
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task orchestration service.
pub struct TaskService<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for TaskService<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> TaskService<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Lists the owner's tasks, optionally restricted to one status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when a store query fails.
    pub async fn list_tasks(
        &self,
        owner: UserId,
        status: Option<TaskStatus>,
    ) -> TaskServiceResult<TaskListing> {
        let (tasks, summary) = tokio::try_join!(
            self.repository.list_owned(owner, status),
            self.repository.count_by_status(owner),
        )?;
        Ok(TaskListing { tasks, summary })
    }

    /// Returns one owned task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the owner has no task with
    /// this ID.
    pub async fn get_task(&self, owner: UserId, id: TaskId) -> TaskServiceResult<Task> {
        self.repository
            .find_owned(owner, id)
            .await?
            .ok_or(TaskServiceError::NotFound(id))
    }

    /// Creates a task for `owner`.
    ///
    /// Attachments are the body links followed by the uploaded paths.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] when a field is invalid.
    pub async fn create_task(
        &self,
        owner: UserId,
        request: CreateTaskRequest,
    ) -> TaskServiceResult<Task> {
        let task = self.prepare_create(owner, request)?;
        self.commit_create(task).await
    }

    /// Validates a create request and builds the task without storing it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] when a field is invalid.
    pub fn prepare_create(
        &self,
        owner: UserId,
        request: CreateTaskRequest,
    ) -> TaskServiceResult<Task> {
        let CreateTaskRequest {
            title,
            due_date,
            description,
            priority,
            checklist,
            attachment_links,
            uploaded_paths,
        } = request;

        let mut draft = TaskDraft::new(TaskTitle::new(title)?, parse_due_date(&due_date)?)
            .with_checklist(checklist)
            .with_attachments(merge_attachments(attachment_links, uploaded_paths));
        if let Some(text) = description {
            draft = draft.with_description(text);
        }
        if let Some(label) = priority {
            draft = draft.with_priority(label.parse::<TaskPriority>()?);
        }

        Ok(Task::create(owner, draft, &*self.clock)?)
    }

    /// Stores a task built by [`Self::prepare_create`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the insert fails.
    pub async fn commit_create(&self, task: Task) -> TaskServiceResult<Task> {
        self.repository.store(&task).await?;
        tracing::info!(task_id = %task.id(), owner = %task.owner(), "task created");
        Ok(task)
    }

    /// Applies a partial update to an owned task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Forbidden`] when the owner has no task
    /// with this ID and [`TaskServiceError::Domain`] when a field is invalid.
    pub async fn update_task(
        &self,
        owner: UserId,
        id: TaskId,
        request: UpdateTaskRequest,
    ) -> TaskServiceResult<Task> {
        let task = self.prepare_update(owner, id, request).await?;
        self.commit_update(task).await
    }

    /// Loads an owned task and applies `request` to it without storing the
    /// result.
    ///
    /// # Errors
    ///
    /// Same as [`Self::update_task`], minus write failures.
    pub async fn prepare_update(
        &self,
        owner: UserId,
        id: TaskId,
        request: UpdateTaskRequest,
    ) -> TaskServiceResult<Task> {
        let mut task = self.owned_or_forbidden(owner, id).await?;
        let changes = request.into_changes()?;
        task.apply(changes, &*self.clock)?;
        Ok(task)
    }

    /// Stores a task returned by [`Self::prepare_update`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task was deleted in the
    /// meantime and [`TaskServiceError::Repository`] when the write fails.
    pub async fn commit_update(&self, task: Task) -> TaskServiceResult<Task> {
        self.save(&task).await?;
        tracing::debug!(task_id = %task.id(), status = %task.status(), "task updated");
        Ok(task)
    }

    /// Deletes an owned task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Forbidden`] when the owner has no task
    /// with this ID.
    pub async fn delete_task(&self, owner: UserId, id: TaskId) -> TaskServiceResult<()> {
        if !self.repository.delete_owned(owner, id).await? {
            return Err(TaskServiceError::Forbidden(id));
        }
        tracing::info!(task_id = %id, owner = %owner, "task deleted");
        Ok(())
    }

    /// Sets the status of an owned task.
    ///
    /// [`TaskStatus::Completed`] also completes every checklist item.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Forbidden`] when the owner has no task
    /// with this ID.
    pub async fn set_status(
        &self,
        owner: UserId,
        id: TaskId,
        status: TaskStatus,
    ) -> TaskServiceResult<Task> {
        let mut task = self.owned_or_forbidden(owner, id).await?;
        task.change_status(status, &*self.clock);
        self.save(&task).await?;
        Ok(task)
    }

    /// Replaces the checklist of an owned task and re-derives its progress.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Forbidden`] when the owner has no task
    /// with this ID and [`TaskServiceError::Domain`] when an item is invalid.
    pub async fn set_checklist(
        &self,
        owner: UserId,
        id: TaskId,
        checklist: Vec<ChecklistItem>,
    ) -> TaskServiceResult<Task> {
        let mut task = self.owned_or_forbidden(owner, id).await?;
        task.replace_checklist(checklist, &*self.clock)?;
        self.save(&task).await?;
        tracing::debug!(task_id = %id, progress = %task.progress(), "checklist replaced");
        Ok(task)
    }

    /// Flips the pin flag of an owned task and returns the task with the new
    /// flag value.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the owner has no task with
    /// this ID.
    pub async fn toggle_pinned(&self, owner: UserId, id: TaskId) -> TaskServiceResult<(Task, bool)> {
        let mut task = self.get_task(owner, id).await?;
        let pinned = task.toggle_pinned(&*self.clock);
        self.save(&task).await?;
        Ok((task, pinned))
    }

    /// Per-status counts over the owner's tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the store query fails.
    pub async fn status_counts(&self, owner: UserId) -> TaskServiceResult<StatusCounts> {
        Ok(self.repository.count_by_status(owner).await?)
    }

    async fn owned_or_forbidden(&self, owner: UserId, id: TaskId) -> TaskServiceResult<Task> {
        self.repository
            .find_owned(owner, id)
            .await?
            .ok_or(TaskServiceError::Forbidden(id))
    }

    async fn save(&self, task: &Task) -> TaskServiceResult<()> {
        self.repository.update(task).await.map_err(|err| match err {
            TaskRepositoryError::NotFound(id) => TaskServiceError::NotFound(id),
            other => TaskServiceError::Repository(other),
        })
    }
}

fn merge_attachments(links: Vec<String>, uploaded: Vec<String>) -> Vec<String> {
    links
        .into_iter()
        .map(|link| link.trim().to_owned())
        .filter(|link| !link.is_empty())
        .chain(uploaded)
        .collect()
}
