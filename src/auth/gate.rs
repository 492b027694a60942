//! Request authentication: bearer token to acting user.

use super::{AuthError, TokenKeys};
use crate::user::{domain::UserProfile, ports::UserRepository};
use std::sync::Arc;

/// Resolves the acting user from an `Authorization` header value.
pub struct AuthGate<R>
where
    R: UserRepository + ?Sized,
{
    users: Arc<R>,
    keys: TokenKeys,
}

impl<R> Clone for AuthGate<R>
where
    R: UserRepository + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            keys: self.keys.clone(),
        }
    }
}

impl<R> AuthGate<R>
where
    R: UserRepository + ?Sized,
{
    /// Creates a gate over the credential store.
    #[must_use]
    pub const fn new(users: Arc<R>, keys: TokenKeys) -> Self {
        Self { users, keys }
    }

    /// Authenticates a request from its raw `Authorization` header.
    ///
    /// # Errors
    ///
    /// - [`AuthError::MissingToken`] when the header is absent or malformed.
    /// - [`AuthError::TokenExpired`] / [`AuthError::InvalidToken`] when
    ///   verification fails.
    /// - [`AuthError::UnknownSubject`] when the subject has no account.
    /// - [`AuthError::Repository`] when the lookup itself fails.
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<UserProfile, AuthError> {
        let token = bearer_token(authorization)?;
        let user_id = self.keys.verify(token).inspect_err(|err| {
            tracing::debug!(error = %err, "bearer token rejected");
        })?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UnknownSubject)?;
        Ok(user.profile())
    }
}

/// Extracts the token from a `Bearer <token>` header value.
///
/// # Errors
///
/// Returns [`AuthError::MissingToken`] when the header is absent, uses
/// another scheme, or carries an empty token.
pub fn bearer_token(authorization: Option<&str>) -> Result<&str, AuthError> {
    authorization
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)
}
