//! JSON REST surface over axum.
//!
//! Handlers authenticate through [`extract::CurrentUser`], call one service
//! and wrap the result in `{"success": true, ...}`. Failures become
//! [`ApiError`] envelopes.

pub mod dto;
mod error;
pub mod extract;
pub mod handlers;
mod routes;
mod state;

pub use error::{ApiError, SERVER_ERROR_MESSAGE};
pub use routes::{MAX_BODY_BYTES, cors_layer, router};
pub use state::AppState;
