//! Authentication for Taskdeck.
//!
//! - [`TokenKeys`] signs and verifies bearer tokens.
//! - [`PasswordHasher`] hashes and checks passwords with Argon2.
//! - [`AuthGate`] turns an `Authorization` header into the acting user.

mod error;
mod gate;
mod password;
mod token;

pub use error::AuthError;
pub use gate::{AuthGate, bearer_token};
pub use password::PasswordHasher;
pub use token::{Claims, TokenKeys};
