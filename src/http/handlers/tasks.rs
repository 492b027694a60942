//! `/api/tasks` handlers.

use super::{public_paths, stage_parts, write_staged};
use crate::http::{
    ApiError, AppState,
    dto::{
        ChecklistPayload, DashboardView, StatusPayload, StatusSummaryView, TaskListQuery,
        TaskPayload, TaskView,
    },
    extract::{CurrentUser, JsonBody, JsonOrMultipart, TaskIdPath},
};
use crate::task::domain::TaskStatus;
use crate::upload::StagedFile;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde_json::{Value, json};

const ATTACHMENTS_FIELD: &str = "attachments";

type JsonResult = Result<Json<Value>, ApiError>;

/// Splits a task body into its fields and the attachment files it carries.
fn read_task_body(
    body: JsonOrMultipart<TaskPayload>,
) -> Result<(TaskPayload, Vec<StagedFile>), ApiError> {
    match body {
        JsonOrMultipart::Json(payload) => Ok((payload, Vec::new())),
        JsonOrMultipart::Multipart(mut form) => {
            let payload = TaskPayload::from_form(&form)?;
            let staged = stage_parts(form.take_files(ATTACHMENTS_FIELD))?;
            Ok((payload, staged))
        }
    }
}

/// `GET /api/tasks?status=`
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<TaskListQuery>,
) -> JsonResult {
    let status = query
        .status
        .filter(|label| !label.trim().is_empty())
        .map(|label| label.parse::<TaskStatus>())
        .transpose()
        .map_err(|err| ApiError::bad_request(err.to_string()))?;

    let listing = state.tasks.list_tasks(user.id, status).await?;
    let tasks: Vec<TaskView> = listing.tasks.iter().map(TaskView::with_checklist_count).collect();
    Ok(Json(json!({
        "success": true,
        "tasks": tasks,
        "statusSummary": StatusSummaryView::from(listing.summary),
    })))
}

/// `GET /api/tasks/dashboard-data`
pub async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<DashboardView>, ApiError> {
    let snapshot = state.dashboard.snapshot(user.id).await?;
    Ok(Json(DashboardView::from(snapshot)))
}

/// `GET /api/tasks/{id}`
pub async fn get(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    TaskIdPath(id): TaskIdPath,
) -> JsonResult {
    let task = state.tasks.get_task(user.id, id).await?;
    Ok(Json(json!({ "success": true, "task": TaskView::from(&task) })))
}

/// `POST /api/tasks`
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    body: JsonOrMultipart<TaskPayload>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (payload, staged) = read_task_body(body)?;
    let request = payload.into_create_request(public_paths(&staged))?;
    let task = state.tasks.prepare_create(user.id, request)?;
    write_staged(&*state.files, staged).await?;
    let task = state.tasks.commit_create(task).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Task created successfully",
            "task": TaskView::from(&task),
        })),
    ))
}

/// `PUT /api/tasks/{id}`
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    TaskIdPath(id): TaskIdPath,
    body: JsonOrMultipart<TaskPayload>,
) -> JsonResult {
    let (payload, staged) = read_task_body(body)?;
    let task = state
        .tasks
        .prepare_update(user.id, id, payload.into_update_request(public_paths(&staged)))
        .await?;
    write_staged(&*state.files, staged).await?;
    let task = state.tasks.commit_update(task).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Task updated successfully",
        "task": TaskView::from(&task),
    })))
}

/// `DELETE /api/tasks/{id}`
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    TaskIdPath(id): TaskIdPath,
) -> JsonResult {
    state.tasks.delete_task(user.id, id).await?;
    Ok(Json(json!({ "success": true, "message": "Task deleted successfully" })))
}

/// `PATCH /api/tasks/{id}/status`
pub async fn set_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    TaskIdPath(id): TaskIdPath,
    JsonBody(payload): JsonBody<StatusPayload>,
) -> JsonResult {
    let status = payload
        .status
        .ok_or_else(|| ApiError::bad_request("Status is required"))?
        .parse::<TaskStatus>()
        .map_err(|err| ApiError::bad_request(err.to_string()))?;
    let task = state.tasks.set_status(user.id, id, status).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Task status updated",
        "task": TaskView::from(&task),
    })))
}

/// `PATCH /api/tasks/{id}/checklist`
pub async fn set_checklist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    TaskIdPath(id): TaskIdPath,
    JsonBody(payload): JsonBody<ChecklistPayload>,
) -> JsonResult {
    let checklist = payload
        .checklist
        .ok_or_else(|| ApiError::bad_request("Checklist is required"))?;
    let task = state.tasks.set_checklist(user.id, id, checklist).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Checklist updated",
        "task": TaskView::from(&task),
    })))
}

/// `PATCH /api/tasks/{id}/pin`
pub async fn toggle_pin(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    TaskIdPath(id): TaskIdPath,
) -> JsonResult {
    let (task, pinned) = state.tasks.toggle_pinned(user.id, id).await?;
    let message = if pinned {
        "Task pinned successfully"
    } else {
        "Task unpinned successfully"
    };
    Ok(Json(json!({
        "success": true,
        "message": message,
        "pinned": pinned,
        "task": TaskView::from(&task),
    })))
}
