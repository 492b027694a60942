//! Shared handler state.

use crate::auth::{AuthGate, TokenKeys};
use crate::task::{
    ports::TaskRepository,
    services::{DashboardService, TaskService},
};
use crate::upload::FileStore;
use crate::user::{ports::UserRepository, services::AccountService};
use mockable::DefaultClock;
use std::sync::Arc;

/// Services and stores available to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Registration, login and profile maintenance.
    pub accounts: AccountService<dyn UserRepository, DefaultClock>,
    /// Owner-scoped task operations.
    pub tasks: TaskService<dyn TaskRepository, DefaultClock>,
    /// Dashboard aggregation.
    pub dashboard: DashboardService<dyn TaskRepository, DefaultClock>,
    /// Bearer token check.
    pub gate: AuthGate<dyn UserRepository>,
    /// Upload storage.
    pub files: Arc<dyn FileStore>,
    /// Origin prepended to upload paths when building absolute URLs.
    pub public_base_url: Arc<str>,
}

impl AppState {
    /// Wires the services over the given stores.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        tasks: Arc<dyn TaskRepository>,
        files: Arc<dyn FileStore>,
        keys: TokenKeys,
        public_base_url: &str,
    ) -> Self {
        let clock = Arc::new(DefaultClock);
        Self {
            accounts: AccountService::new(Arc::clone(&users), Arc::clone(&clock), keys.clone()),
            tasks: TaskService::new(Arc::clone(&tasks), Arc::clone(&clock)),
            dashboard: DashboardService::new(tasks, clock),
            gate: AuthGate::new(users, keys),
            files,
            public_base_url: Arc::from(public_base_url.trim_end_matches('/')),
        }
    }

    /// Returns the absolute URL of a server-relative path.
    #[must_use]
    pub fn public_url(&self, path: &str) -> String {
        format!("{}{path}", self.public_base_url)
    }
}
