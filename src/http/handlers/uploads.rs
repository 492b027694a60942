//! `POST /api/uploads/upload-image`

use crate::http::{
    ApiError, AppState,
    extract::{CurrentUser, MultipartForm},
};
use super::{INVALID_IMAGE, stage_image};
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use serde_json::{Value, json};

const IMAGE_FIELD: &str = "image";

/// Stores one jpg/jpeg/png image and returns where it is served.
pub async fn upload_image(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let multipart = multipart.map_err(|_| ApiError::bad_request(INVALID_IMAGE))?;
    let mut form = MultipartForm::read(multipart).await?;
    let part = form
        .take_files(IMAGE_FIELD)
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::bad_request(INVALID_IMAGE))?;

    let stored = state.files.write(stage_image(part)?).await?;
    tracing::info!(user_id = %user.id, file = %stored.filename, "image uploaded");
    Ok(Json(json!({
        "success": true,
        "message": "File uploaded successfully",
        "data": {
            "filePath": stored.public_path,
            "filename": stored.filename,
            "url": state.public_url(&stored.public_path),
        },
    })))
}
