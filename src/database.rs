//! `PostgreSQL` connection pool lifecycle.
//!
//! Startup retries the initial connection a bounded number of times so the
//! service can come up alongside its database container.

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use std::time::Duration;
use thiserror::Error;

/// Pooled `PostgreSQL` connections shared by the diesel adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

const SCHEMA_SQL: &str =
    include_str!("../migrations/2025-03-01-000000_create_users_and_tasks/up.sql");

/// How hard to try before giving up on the database at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total connection attempts; at least one is always made.
    pub attempts: u32,
    /// Pause between failed attempts.
    pub delay: Duration,
    /// Per-attempt wait for a connection.
    pub connect_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Errors raised while connecting to or preparing the database.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Checking a connection out of the pool failed.
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),

    /// A schema statement failed.
    #[error("schema statement failed: {0}")]
    Query(#[from] diesel::result::Error),

    /// The blocking worker panicked or was cancelled.
    #[error("database worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Every startup attempt failed.
    #[error("database unreachable after {attempts} attempts: {source}")]
    Exhausted {
        /// Attempts made.
        attempts: u32,
        /// Error from the final attempt.
        #[source]
        source: PoolError,
    },
}

/// A connected database handle.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Builds the pool, retrying per `policy` until a connection succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::Exhausted`] when every attempt fails and
    /// [`DatabaseError::Join`] when the blocking worker dies.
    pub async fn connect(url: &str, policy: RetryPolicy) -> Result<Self, DatabaseError> {
        let attempts = policy.attempts.max(1);
        let mut attempt = 1;
        loop {
            let manager = ConnectionManager::<PgConnection>::new(url);
            let timeout = policy.connect_timeout;
            let built = tokio::task::spawn_blocking(move || {
                Pool::builder().connection_timeout(timeout).build(manager)
            })
            .await?;

            match built {
                Ok(pool) => {
                    tracing::info!(attempt, "connected to PostgreSQL");
                    return Ok(Self { pool });
                }
                Err(source) if attempt >= attempts => {
                    return Err(DatabaseError::Exhausted { attempts, source });
                }
                Err(err) => {
                    tracing::warn!(
                        attempt,
                        attempts,
                        error = %err,
                        retry_in = ?policy.delay,
                        "PostgreSQL connection failed"
                    );
                    tokio::time::sleep(policy.delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Creates the users and tasks tables when they are absent.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::Pool`] or [`DatabaseError::Query`] when the
    /// statements cannot be run.
    pub async fn apply_schema(&self) -> Result<(), DatabaseError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<(), DatabaseError> {
            let mut connection = pool.get()?;
            connection.batch_execute(SCHEMA_SQL)?;
            Ok(())
        })
        .await??;
        tracing::debug!("database schema ensured");
        Ok(())
    }

    /// Returns a handle to the shared pool.
    #[must_use]
    pub fn pool(&self) -> PgPool {
        self.pool.clone()
    }

    /// Releases this handle's pool.
    ///
    /// Connections close once every repository sharing the pool is dropped.
    pub fn close(self) {
        let state = self.pool.state();
        tracing::info!(
            connections = state.connections,
            idle = state.idle_connections,
            "closing database pool"
        );
        drop(self.pool);
    }
}
