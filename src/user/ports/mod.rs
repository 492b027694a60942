//! Port contracts for user accounts.

pub mod repository;

pub use repository::{UserRepository, UserRepositoryError, UserRepositoryResult};
