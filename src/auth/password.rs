//! Argon2 password hashing.

use super::AuthError;
use crate::user::domain::{PasswordHash, PlainPassword};
use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash as PhcHash, PasswordHasher as _, PasswordVerifier, SaltString,
};
use rand::RngCore;

/// Hashes and verifies passwords with Argon2 default parameters.
///
/// Hashing runs on the blocking pool so request workers are not stalled.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Creates a hasher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Hashes a validated plain-text password into PHC format.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Hashing`] when salt generation or hashing fails.
    pub async fn hash(&self, password: PlainPassword) -> Result<PasswordHash, AuthError> {
        tokio::task::spawn_blocking(move || hash_blocking(password.expose()))
            .await
            .map_err(|err| AuthError::Hashing(err.to_string()))?
    }

    /// Checks a candidate password against a stored hash.
    ///
    /// Returns `Ok(false)` on mismatch.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Hashing`] when the stored hash cannot be parsed.
    pub async fn verify(&self, candidate: &str, hash: &PasswordHash) -> Result<bool, AuthError> {
        let candidate_owned = candidate.to_owned();
        let encoded = hash.as_str().to_owned();
        tokio::task::spawn_blocking(move || verify_blocking(&candidate_owned, &encoded))
            .await
            .map_err(|err| AuthError::Hashing(err.to_string()))?
    }
}

fn hash_blocking(password: &str) -> Result<PasswordHash, AuthError> {
    let mut salt_bytes = [0_u8; 16];
    rand::rng().fill_bytes(&mut salt_bytes);
    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|err| AuthError::Hashing(err.to_string()))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| PasswordHash::from_encoded(hash.to_string()))
        .map_err(|err| AuthError::Hashing(err.to_string()))
}

fn verify_blocking(candidate: &str, encoded: &str) -> Result<bool, AuthError> {
    let parsed = PhcHash::new(encoded).map_err(|err| AuthError::Hashing(err.to_string()))?;
    Ok(Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok())
}
