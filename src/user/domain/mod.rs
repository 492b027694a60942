//! Domain model for user accounts.
//!
//! Plain-text passwords never live on the aggregate; only the hash produced
//! by the auth layer is stored, and [`UserProfile`] is the projection handed
//! to anything outside the credential boundary.

mod error;
mod ids;
mod user;

pub use error::UserDomainError;
pub use ids::{EmailAddress, PlainPassword, UserId, UserName};
pub use user::{PasswordHash, PersistedUserData, User, UserProfile};
