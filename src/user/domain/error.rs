//! Error types for user domain validation.

use thiserror::Error;

/// Errors returned while constructing user domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserDomainError {
    /// The display name is empty after trimming.
    #[error("name must not be empty")]
    EmptyName,

    /// The email address is not of the form `local@domain.tld`.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// The password is shorter than the minimum length.
    #[error("password must be at least {minimum} characters long")]
    PasswordTooShort {
        /// Minimum accepted length in characters.
        minimum: usize,
    },

    /// The user identifier is not a valid UUID.
    #[error("invalid user identifier '{0}'")]
    InvalidUserId(String),
}
