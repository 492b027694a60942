//! The HTTP error envelope.
//!
//! Every failure leaves the API as `{"success": false, "message": ...}`.
//! Server errors also carry the underlying message in `error`.

use crate::auth::AuthError;
use crate::task::{ports::TaskRepositoryError, services::TaskServiceError};
use crate::upload::FileStoreError;
use crate::user::services::AccountError;
use axum::{
    Json,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Message returned for every 5xx response.
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

/// An API failure and the status it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Missing or malformed input (400).
    #[error("{0}")]
    BadRequest(String),
    /// Authentication failed (401).
    #[error("{0}")]
    Unauthorized(String),
    /// The caller may not touch the resource (403).
    #[error("{0}")]
    Forbidden(String),
    /// Nothing matched (404).
    #[error("{0}")]
    NotFound(String),
    /// Store or infrastructure failure (500).
    #[error("{0}")]
    Server(String),
}

impl ApiError {
    /// Builds a 400 error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Builds a 500 error from any displayable cause.
    #[must_use]
    pub fn server(cause: &impl std::fmt::Display) -> Self {
        Self::Server(cause.to_string())
    }

    /// Returns the HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Server(cause) => {
                tracing::error!(error = %cause, "request failed");
                ErrorBody {
                    success: false,
                    message: SERVER_ERROR_MESSAGE,
                    error: Some(cause),
                }
            }
            Self::BadRequest(message)
            | Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::NotFound(message) => ErrorBody {
                success: false,
                message,
                error: None,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<TaskServiceError> for ApiError {
    fn from(err: TaskServiceError) -> Self {
        match err {
            TaskServiceError::Domain(domain) => Self::BadRequest(domain.to_string()),
            TaskServiceError::Repository(repo) => Self::from(repo),
            TaskServiceError::NotFound(_) => Self::NotFound(err.to_string()),
            TaskServiceError::Forbidden(_) => Self::Forbidden(err.to_string()),
        }
    }
}

impl From<TaskRepositoryError> for ApiError {
    fn from(err: TaskRepositoryError) -> Self {
        Self::server(&err)
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Domain(domain) => Self::BadRequest(domain.to_string()),
            AccountError::EmailTaken(_) => Self::BadRequest(err.to_string()),
            AccountError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            AccountError::NotFound(_) => Self::NotFound(err.to_string()),
            AccountError::Auth(auth) => Self::from(auth),
            AccountError::Repository(repo) => Self::server(&repo),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        if err.is_unauthorized() {
            Self::Unauthorized(err.to_string())
        } else {
            Self::server(&err)
        }
    }
}

impl From<FileStoreError> for ApiError {
    fn from(err: FileStoreError) -> Self {
        match err {
            FileStoreError::Empty => Self::BadRequest(err.to_string()),
            FileStoreError::Io(_) | FileStoreError::Join(_) => Self::server(&err),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::BadRequest(err.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}
