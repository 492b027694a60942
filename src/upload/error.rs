//! Errors raised while storing uploads.

use thiserror::Error;

/// Errors returned by [`super::FileStore`] implementations.
#[derive(Debug, Error)]
pub enum FileStoreError {
    /// The upload carried no bytes.
    #[error("uploaded file is empty")]
    Empty,

    /// Reading or writing the storage directory failed.
    #[error("upload storage error: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking write task did not complete.
    #[error("upload task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
