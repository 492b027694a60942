//! Error types for token handling and request authentication.

use crate::user::ports::UserRepositoryError;
use thiserror::Error;

/// Errors produced while issuing tokens or authenticating a request.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The `Authorization` header is absent or not a bearer token.
    #[error("Authorization token missing or malformed")]
    MissingToken,

    /// The token is valid but its subject no longer exists.
    #[error("User not found")]
    UnknownSubject,

    /// The token's expiry has passed.
    #[error("Token has expired. Please log in again.")]
    TokenExpired,

    /// The token failed verification for any other reason.
    #[error("Invalid token")]
    InvalidToken,

    /// Token signing failed.
    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// Password hashing or hash parsing failed.
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// Credential lookup failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
}

impl AuthError {
    /// Returns `true` when the error should be reported as HTTP 401.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::MissingToken | Self::UnknownSubject | Self::TokenExpired | Self::InvalidToken
        )
    }
}
