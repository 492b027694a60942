//! Runtime configuration read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `5000` |
//! | `STORAGE_MODE` | `in_memory` (or `postgres`) |
//! | `DATABASE_URL` | required when `STORAGE_MODE=postgres` |
//! | `DB_CONNECT_ATTEMPTS` | `5` |
//! | `DB_RETRY_DELAY_SECS` | `5` |
//! | `JWT_SECRET` | required |
//! | `JWT_TTL_HOURS` | `168` |
//! | `UPLOAD_DIR` | `uploads` |
//! | `PUBLIC_BASE_URL` | `http://localhost:<PORT>` |
//! | `CLIENT_URL` | unset: any origin |

use camino::Utf8PathBuf;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_CONNECT_ATTEMPTS: u32 = 5;
const DEFAULT_RETRY_DELAY_SECS: u64 = 5;
const DEFAULT_JWT_TTL_HOURS: i64 = 24 * 7;
const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Where users and tasks are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    /// Process-local maps; data is lost on exit.
    #[default]
    InMemory,
    /// `PostgreSQL` through a connection pool.
    Postgres,
}

impl FromStr for StorageMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "in_memory" | "inmemory" | "memory" => Ok(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            _ => Err(ConfigError::InvalidStorageMode(value.to_owned())),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `STORAGE_MODE` holds an unknown value.
    #[error("invalid STORAGE_MODE '{0}', expected in_memory or postgres")]
    InvalidStorageMode(String),

    /// `DATABASE_URL` is missing while `STORAGE_MODE=postgres`.
    #[error("DATABASE_URL is required when STORAGE_MODE=postgres")]
    MissingDatabaseUrl,

    /// `JWT_SECRET` is missing or blank.
    #[error("JWT_SECRET is required")]
    MissingJwtSecret,

    /// A numeric variable could not be parsed or is out of range.
    #[error("invalid value '{value}' for {key}")]
    InvalidNumber {
        /// Variable name.
        key: &'static str,
        /// Rejected value.
        value: String,
    },

    /// `HOST` and `PORT` do not form a socket address.
    #[error("invalid listen address '{0}'")]
    InvalidAddress(String),
}

/// Settings for the HTTP server and its backing stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Selected storage backend.
    pub storage_mode: StorageMode,
    /// `PostgreSQL` connection URL.
    pub database_url: Option<String>,
    /// Startup connection attempts before giving up.
    pub db_connect_attempts: u32,
    /// Pause between startup connection attempts.
    pub db_retry_delay: Duration,
    /// HMAC secret for bearer tokens.
    pub jwt_secret: String,
    /// Bearer token lifetime.
    pub jwt_ttl: chrono::Duration,
    /// Directory that receives uploads.
    pub upload_dir: Utf8PathBuf,
    /// Origin used to build absolute upload URLs, without trailing slash.
    pub public_base_url: String,
    /// Allowed CORS origin; `None` allows any.
    pub client_url: Option<String>,
}

impl AppConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value is missing or malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value is missing or malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let host = read("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = parse_number(read("PORT"), "PORT", DEFAULT_PORT)?;
        let storage_mode = read("STORAGE_MODE")
            .map(|value| value.parse::<StorageMode>())
            .transpose()?
            .unwrap_or_default();
        let database_url = read("DATABASE_URL");
        if storage_mode == StorageMode::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        let db_connect_attempts = parse_number(
            read("DB_CONNECT_ATTEMPTS"),
            "DB_CONNECT_ATTEMPTS",
            DEFAULT_CONNECT_ATTEMPTS,
        )?;
        if db_connect_attempts == 0 {
            return Err(ConfigError::InvalidNumber {
                key: "DB_CONNECT_ATTEMPTS",
                value: "0".to_owned(),
            });
        }
        let retry_secs = parse_number(
            read("DB_RETRY_DELAY_SECS"),
            "DB_RETRY_DELAY_SECS",
            DEFAULT_RETRY_DELAY_SECS,
        )?;

        let jwt_secret = read("JWT_SECRET").ok_or(ConfigError::MissingJwtSecret)?;
        let ttl_hours: i64 =
            parse_number(read("JWT_TTL_HOURS"), "JWT_TTL_HOURS", DEFAULT_JWT_TTL_HOURS)?;
        let jwt_ttl = chrono::Duration::try_hours(ttl_hours)
            .filter(|ttl| *ttl > chrono::Duration::zero())
            .ok_or_else(|| ConfigError::InvalidNumber {
                key: "JWT_TTL_HOURS",
                value: ttl_hours.to_string(),
            })?;

        let upload_dir = Utf8PathBuf::from(
            read("UPLOAD_DIR").unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_owned()),
        );
        let public_base_url = read("PUBLIC_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_owned())
            .unwrap_or_else(|| format!("http://localhost:{port}"));
        let client_url = read("CLIENT_URL");

        Ok(Self {
            host,
            port,
            storage_mode,
            database_url,
            db_connect_attempts,
            db_retry_delay: Duration::from_secs(retry_secs),
            jwt_secret,
            jwt_ttl,
            upload_dir,
            public_base_url,
            client_url,
        })
    }

    /// Returns the socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAddress`] when `host` is not an IP
    /// address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::InvalidAddress(raw))
    }
}

fn parse_number<T: FromStr>(
    value: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    value.map_or(Ok(default), |raw| {
        raw.parse()
            .map_err(|_| ConfigError::InvalidNumber { key, value: raw })
    })
}
