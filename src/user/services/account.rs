//! Service layer for registration, login, and profile maintenance.

use crate::auth::{AuthError, PasswordHasher, TokenKeys};
use crate::user::{
    domain::{EmailAddress, PlainPassword, User, UserDomainError, UserId, UserName, UserProfile},
    ports::{UserRepository, UserRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for registering a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    name: String,
    email: String,
    password: String,
    profile_image_url: Option<String>,
}

impl RegisterRequest {
    /// Creates a request with the required account fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            profile_image_url: None,
        }
    }

    /// Sets the profile image URL.
    #[must_use]
    pub fn with_profile_image_url(mut self, url: impl Into<String>) -> Self {
        self.profile_image_url = Some(url.into());
        self
    }
}

/// Request payload for editing the caller's profile.
///
/// Blank values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProfileRequest {
    name: Option<String>,
    password: Option<String>,
    profile_image_url: Option<String>,
}

impl UpdateProfileRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a new display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets a new password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets a new profile image URL.
    #[must_use]
    pub fn with_profile_image_url(mut self, url: impl Into<String>) -> Self {
        self.profile_image_url = Some(url.into());
        self
    }
}

/// An authenticated session: the user and a freshly issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Client-safe user projection.
    pub profile: UserProfile,
    /// Signed bearer token.
    pub token: String,
}

/// Service-level errors for account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] UserDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
    /// Hashing or token issuance failed.
    #[error(transparent)]
    Auth(#[from] AuthError),
    /// The email address is already registered.
    #[error("User already exists")]
    EmailTaken(EmailAddress),
    /// Unknown email or wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,
    /// The account no longer exists.
    #[error("User not found")]
    NotFound(UserId),
}

/// Result type for account service operations.
pub type AccountResult<T> = Result<T, AccountError>;

/// Account orchestration service.
pub struct AccountService<R, C>
where
    R: UserRepository + ?Sized,
    C: Clock + Send + Sync,
{
    users: Arc<R>,
    clock: Arc<C>,
    keys: TokenKeys,
    hasher: PasswordHasher,
}

impl<R, C> Clone for AccountService<R, C>
where
    R: UserRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            clock: Arc::clone(&self.clock),
            keys: self.keys.clone(),
            hasher: self.hasher,
        }
    }
}

impl<R, C> AccountService<R, C>
where
    R: UserRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new account service.
    #[must_use]
    pub const fn new(users: Arc<R>, clock: Arc<C>, keys: TokenKeys) -> Self {
        Self {
            users,
            clock,
            keys,
            hasher: PasswordHasher::new(),
        }
    }

    /// Registers an account and signs the new user in.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Domain`] for invalid input,
    /// [`AccountError::EmailTaken`] when the address is registered, or
    /// [`AccountError::Repository`] / [`AccountError::Auth`] on
    /// infrastructure failure.
    pub async fn register(&self, request: RegisterRequest) -> AccountResult<Session> {
        let user = self.prepare_registration(request).await?;
        self.complete_registration(user).await
    }

    /// Validates a registration and hashes its password without storing
    /// the account.
    ///
    /// # Errors
    ///
    /// Same as [`Self::register`], minus insert failures.
    pub async fn prepare_registration(&self, request: RegisterRequest) -> AccountResult<User> {
        let RegisterRequest {
            name,
            email,
            password,
            profile_image_url,
        } = request;

        let user_name = UserName::new(name)?;
        let email_address = EmailAddress::new(email)?;
        let plain_password = PlainPassword::new(password)?;

        if self.users.find_by_email(&email_address).await?.is_some() {
            return Err(AccountError::EmailTaken(email_address));
        }

        let password_hash = self.hasher.hash(plain_password).await?;
        Ok(User::register(
            user_name,
            email_address,
            password_hash,
            profile_image_url,
            &*self.clock,
        ))
    }

    /// Stores a user built by [`Self::prepare_registration`] and signs it in.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::EmailTaken`] when another registration for the
    /// same address won the race.
    pub async fn complete_registration(&self, user: User) -> AccountResult<Session> {
        self.users.store(&user).await.map_err(|err| match err {
            UserRepositoryError::DuplicateEmail(email) => AccountError::EmailTaken(email),
            other => AccountError::Repository(other),
        })?;

        tracing::info!(user_id = %user.id(), "user registered");
        self.session_for(&user)
    }

    /// Authenticates by email and password.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidCredentials`] when the email is unknown
    /// or the password does not match.
    pub async fn login(&self, email: &str, password: &str) -> AccountResult<Session> {
        let Ok(email_address) = EmailAddress::new(email) else {
            return Err(AccountError::InvalidCredentials);
        };
        let Some(user) = self.users.find_by_email(&email_address).await? else {
            return Err(AccountError::InvalidCredentials);
        };
        if !self.hasher.verify(password, user.password_hash()).await? {
            tracing::debug!(user_id = %user.id(), "password mismatch");
            return Err(AccountError::InvalidCredentials);
        }
        self.session_for(&user)
    }

    /// Returns the current profile of a user.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::NotFound`] when the account does not exist.
    pub async fn find_profile(&self, user_id: UserId) -> AccountResult<UserProfile> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AccountError::NotFound(user_id))?;
        Ok(user.profile())
    }

    /// Applies the non-blank fields of `request` to the user's profile.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::NotFound`] when the account does not exist and
    /// [`AccountError::Domain`] when a supplied value is invalid.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        request: UpdateProfileRequest,
    ) -> AccountResult<UserProfile> {
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AccountError::NotFound(user_id))?;

        let UpdateProfileRequest {
            name,
            password,
            profile_image_url,
        } = request;

        if let Some(new_name) = non_blank(name) {
            user.rename(UserName::new(new_name)?, &*self.clock);
        }
        if let Some(new_password) = non_blank(password) {
            let hash = self.hasher.hash(PlainPassword::new(new_password)?).await?;
            user.change_password(hash, &*self.clock);
        }
        if let Some(url) = non_blank(profile_image_url) {
            user.set_profile_image_url(url, &*self.clock);
        }

        self.users.update(&user).await.map_err(|err| match err {
            UserRepositoryError::NotFound(id) => AccountError::NotFound(id),
            other => AccountError::Repository(other),
        })?;
        Ok(user.profile())
    }

    fn session_for(&self, user: &User) -> AccountResult<Session> {
        let token = self.keys.issue(user.id(), &*self.clock)?;
        Ok(Session {
            profile: user.profile(),
            token,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
