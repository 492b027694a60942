//! Taskdeck HTTP server.

use std::sync::Arc;
use taskdeck::auth::TokenKeys;
use taskdeck::config::{AppConfig, ConfigError, StorageMode};
use taskdeck::database::{Database, DatabaseError, RetryPolicy};
use taskdeck::http::{AppState, cors_layer, router};
use taskdeck::task::adapters::{memory::InMemoryTaskRepository, postgres::PostgresTaskRepository};
use taskdeck::task::ports::TaskRepository;
use taskdeck::upload::{FileStoreError, LocalFileStore};
use taskdeck::user::adapters::{memory::InMemoryUserRepository, postgres::PostgresUserRepository};
use taskdeck::user::ports::UserRepository;
use thiserror::Error;
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Error)]
enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("upload directory error: {0}")]
    Uploads(#[from] FileStoreError),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

struct Stores {
    users: Arc<dyn UserRepository>,
    tasks: Arc<dyn TaskRepository>,
    database: Option<Database>,
}

async fn open_stores(config: &AppConfig) -> Result<Stores, StartupError> {
    match (config.storage_mode, config.database_url.as_deref()) {
        (StorageMode::Postgres, Some(url)) => {
            let policy = RetryPolicy {
                attempts: config.db_connect_attempts,
                delay: config.db_retry_delay,
                ..RetryPolicy::default()
            };
            let database = Database::connect(url, policy).await?;
            database.apply_schema().await?;
            Ok(Stores {
                users: Arc::new(PostgresUserRepository::new(database.pool())),
                tasks: Arc::new(PostgresTaskRepository::new(database.pool())),
                database: Some(database),
            })
        }
        (StorageMode::Postgres, None) => Err(ConfigError::MissingDatabaseUrl.into()),
        (StorageMode::InMemory, _) => Ok(Stores {
            users: Arc::new(InMemoryUserRepository::new()),
            tasks: Arc::new(InMemoryTaskRepository::new()),
            database: None,
        }),
    }
}

async fn run() -> Result<(), StartupError> {
    let config = AppConfig::from_env()?;
    tracing::info!(
        storage_mode = ?config.storage_mode,
        upload_dir = %config.upload_dir,
        "configuration loaded"
    );

    let stores = open_stores(&config).await?;
    let files = Arc::new(LocalFileStore::open(&config.upload_dir)?);
    let keys = TokenKeys::new(config.jwt_secret.as_bytes(), config.jwt_ttl);
    let state = AppState::new(
        stores.users,
        stores.tasks,
        files,
        keys,
        &config.public_base_url,
    );
    let app = router(
        state,
        &config.upload_dir,
        cors_layer(config.client_url.as_deref()),
    );

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(database) = stores.database {
        database.close();
    }
    tracing::info!("server stopped");
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskdeck=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(error) = run().await {
        tracing::error!(%error, "taskdeck failed");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
