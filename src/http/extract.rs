//! Request extractors: the acting user, path IDs and request bodies.

use super::{ApiError, AppState};
use crate::task::domain::{TaskDomainError, TaskId};
use crate::user::domain::UserProfile;
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Multipart, Path, Request},
    http::{header, request::Parts},
};
use bytes::Bytes;
use serde::de::DeserializeOwned;

/// The authenticated caller, resolved from the bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserProfile);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let authorization = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        let profile = state.gate.authenticate(authorization).await?;
        Ok(Self(profile))
    }
}

/// A `{id}` path segment parsed as a task ID.
#[derive(Debug, Clone, Copy)]
pub struct TaskIdPath(pub TaskId);

impl<S> FromRequestParts<S> for TaskIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, ApiError> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state).await?;
        raw.parse()
            .map(Self)
            .map_err(|err: TaskDomainError| ApiError::bad_request(err.to_string()))
    }
}

/// JSON body whose rejections use the API envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// One file part of a multipart body.
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Form field name.
    pub field: String,
    /// Client-supplied file name.
    pub file_name: String,
    /// File contents.
    pub bytes: Bytes,
}

/// A fully read `multipart/form-data` body.
///
/// Parts with a file name are files; the rest are text fields. File parts
/// with an empty name are skipped, as browsers send one for an empty input.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    texts: Vec<(String, String)>,
    files: Vec<FilePart>,
}

impl MultipartForm {
    /// Drains every part of `multipart`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadRequest`] when the body is malformed.
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_owned();
            match field.file_name().map(str::to_owned) {
                Some(file_name) => {
                    let bytes = field.bytes().await?;
                    if !file_name.is_empty() {
                        form.files.push(FilePart {
                            field: name,
                            file_name,
                            bytes,
                        });
                    }
                }
                None => {
                    let text = field.text().await?;
                    form.texts.push((name, text));
                }
            }
        }
        Ok(form)
    }

    /// Builds a form from already-split parts.
    #[must_use]
    pub const fn from_parts(texts: Vec<(String, String)>, files: Vec<FilePart>) -> Self {
        Self { texts, files }
    }

    /// Returns the first text value of `name`.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts_named(name).next()
    }

    /// Returns every text value of `name`, in body order.
    pub fn texts_named<'s>(&'s self, name: &str) -> impl Iterator<Item = &'s str> {
        self.texts
            .iter()
            .filter(move |(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns `true` when at least one text field is called `name`.
    #[must_use]
    pub fn has_text(&self, name: &str) -> bool {
        self.text(name).is_some()
    }

    /// Removes and returns every file part of `name`, in body order.
    pub fn take_files(&mut self, name: &str) -> Vec<FilePart> {
        let (taken, kept): (Vec<FilePart>, Vec<FilePart>) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|part| part.field == name);
        self.files = kept;
        taken
    }
}

/// A body sent either as JSON or as `multipart/form-data`.
#[derive(Debug)]
pub enum JsonOrMultipart<T> {
    /// `application/json` (or any non-multipart type).
    Json(T),
    /// `multipart/form-data`.
    Multipart(MultipartForm),
}

impl<T, S> FromRequest<S> for JsonOrMultipart<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, ApiError> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state).await?;
            Ok(Self::Multipart(MultipartForm::read(multipart).await?))
        } else {
            let Json(value) = Json::<T>::from_request(req, state).await?;
            Ok(Self::Json(value))
        }
    }
}
