//! Account handlers under `/api/auth` and `/api/users`.

use super::stage_image;
use crate::http::{
    ApiError, AppState,
    dto::{LoginPayload, ProfilePayload, ProfileSummaryView, RegisterPayload},
    extract::{CurrentUser, JsonBody, JsonOrMultipart},
};
use crate::user::services::{RegisterRequest, UpdateProfileRequest};
use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

const PROFILE_IMAGE_FIELD: &str = "profileImage";

/// `POST /api/auth/register`
///
/// A multipart body may carry a jpg/jpeg/png `profileImage` file, which is
/// used as the profile image URL. It is written only once the registration
/// itself is accepted.
pub async fn register(
    State(state): State<AppState>,
    body: JsonOrMultipart<RegisterPayload>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (payload, image) = match body {
        JsonOrMultipart::Json(payload) => (payload, None),
        JsonOrMultipart::Multipart(mut form) => {
            let mut payload = RegisterPayload::from_form(&form);
            let image = form
                .take_files(PROFILE_IMAGE_FIELD)
                .into_iter()
                .next()
                .map(stage_image)
                .transpose()?;
            if let Some(staged) = &image {
                payload.profile_image_url = Some(state.public_url(&staged.file().public_path));
            }
            (payload, image)
        }
    };

    let RegisterPayload {
        name,
        email,
        password,
        profile_image_url,
    } = payload;
    let mut request = RegisterRequest::new(name, email, password);
    if let Some(url) = profile_image_url {
        request = request.with_profile_image_url(url);
    }

    let user = state.accounts.prepare_registration(request).await?;
    if let Some(staged) = image {
        state.files.write(staged).await?;
    }
    let session = state.accounts.complete_registration(user).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "User registered successfully",
            "user": session.profile,
            "token": session.token,
        })),
    ))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginPayload>,
) -> Result<Json<Value>, ApiError> {
    let session = state.accounts.login(&payload.email, &payload.password).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Login successful",
        "user": session.profile,
        "token": session.token,
    })))
}

/// `GET /api/auth/profile` and `GET /api/users`
pub async fn profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Value>, ApiError> {
    let (profile, counts) = tokio::try_join!(
        async { state.accounts.find_profile(user.id).await.map_err(ApiError::from) },
        async { state.tasks.status_counts(user.id).await.map_err(ApiError::from) },
    )?;
    Ok(Json(json!({
        "success": true,
        "user": ProfileSummaryView::new(profile, counts),
    })))
}

/// `PUT /api/auth/profile` and `PUT /api/users/profile`
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    JsonBody(payload): JsonBody<ProfilePayload>,
) -> Result<Json<Value>, ApiError> {
    let mut request = UpdateProfileRequest::new();
    if let Some(name) = payload.name {
        request = request.with_name(name);
    }
    if let Some(password) = payload.password {
        request = request.with_password(password);
    }
    if let Some(url) = payload.profile_image_url {
        request = request.with_profile_image_url(url);
    }

    let profile = state.accounts.update_profile(user.id, request).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Profile updated successfully",
        "user": profile,
    })))
}
