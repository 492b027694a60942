//! Taskdeck: a task-management REST backend.
//!
//! Users register, sign in with a bearer token, and manage their own tasks.
//! A task carries a checklist whose completion drives its progress and
//! status, optional attachments, and a pin flag. A dashboard summarises a
//! user's tasks.
//!
//! # Architecture
//!
//! Taskdeck follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, files)
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle, progress derivation and dashboard aggregation
//! - [`user`]: Accounts and profiles
//! - [`auth`]: Bearer tokens, password hashing and request authentication
//! - [`upload`]: Uploaded file storage
//! - [`http`]: The axum REST surface
//! - [`config`] and [`database`]: Process wiring

pub mod auth;
pub mod config;
pub mod database;
pub mod http;
pub mod task;
pub mod upload;
pub mod user;
