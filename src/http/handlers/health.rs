//! Liveness and fallback responses.

use crate::http::ApiError;
use axum::Json;
use serde_json::{Value, json};

/// `GET /`
#[expect(clippy::unused_async, reason = "axum handlers are async functions")]
pub async fn health() -> Json<Value> {
    Json(json!({ "success": true, "message": "Task Manager API is running" }))
}

/// Any unmatched route.
#[expect(clippy::unused_async, reason = "axum handlers are async functions")]
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_owned())
}
