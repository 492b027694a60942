//! Upload port and content-addressed naming.

use super::FileStoreError;
use async_trait::async_trait;
use bytes::Bytes;
use camino::Utf8Path;
use sha2::{Digest, Sha256};

/// URL path prefix under which stored files are served.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Extensions accepted for standalone image uploads.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

const MAX_EXTENSION_LEN: usize = 10;

/// A file persisted by a [`FileStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Name of the file inside the store.
    pub filename: String,
    /// Server-relative path the file is served from, e.g. `/uploads/ab12.png`.
    pub public_path: String,
}

impl StoredFile {
    /// Builds the record for `filename` under [`PUBLIC_PREFIX`].
    #[must_use]
    pub fn new(filename: String) -> Self {
        let public_path = format!("{PUBLIC_PREFIX}/{filename}");
        Self {
            filename,
            public_path,
        }
    }
}

/// An upload whose stored name is fixed but whose bytes are not written yet.
///
/// Naming is content-addressed, so callers can reference [`Self::file`]
/// before deciding whether to write it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    file: StoredFile,
    bytes: Bytes,
}

impl StagedFile {
    /// Names `bytes` after their content and the extension of
    /// `original_name`.
    ///
    /// # Errors
    ///
    /// Returns [`FileStoreError::Empty`] when `bytes` is empty.
    pub fn new(original_name: &str, bytes: Bytes) -> Result<Self, FileStoreError> {
        if bytes.is_empty() {
            return Err(FileStoreError::Empty);
        }
        let file = StoredFile::new(stored_name(original_name, &bytes));
        Ok(Self { file, bytes })
    }

    /// Where the file will be served once written.
    #[must_use]
    pub const fn file(&self) -> &StoredFile {
        &self.file
    }

    /// Splits into the record and the contents.
    #[must_use]
    pub fn into_parts(self) -> (StoredFile, Bytes) {
        (self.file, self.bytes)
    }
}

/// Upload persistence contract.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Writes a staged file and returns where it can be fetched.
    ///
    /// # Errors
    ///
    /// Returns [`FileStoreError::Io`] when the write fails.
    async fn write(&self, staged: StagedFile) -> Result<StoredFile, FileStoreError>;
}

/// Returns `true` when `name` ends in an accepted image extension.
#[must_use]
pub fn is_image_filename(name: &str) -> bool {
    extension_of(name).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Content-addressed file name: hex SHA-256 of `bytes` plus the lowercase
/// extension of `original_name`, when it has a usable one.
#[must_use]
pub fn stored_name(original_name: &str, bytes: &[u8]) -> String {
    let mut name: String = Sha256::digest(bytes)
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect();
    if let Some(ext) = extension_of(original_name) {
        name.push('.');
        name.push_str(&ext);
    }
    name
}

fn extension_of(name: &str) -> Option<String> {
    Utf8Path::new(name)
        .extension()
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|ch| ch.is_ascii_alphanumeric())
        })
        .map(str::to_ascii_lowercase)
}
