//! Directory-backed upload store.

use super::{FileStore, FileStoreError, StagedFile, StoredFile};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::sync::Arc;

/// Stores uploads as flat files inside one directory.
///
/// All writes go through a capability handle on that directory, so a stored
/// name can never escape it.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: Utf8PathBuf,
    dir: Arc<Dir>,
}

impl LocalFileStore {
    /// Opens `root`, creating it first when missing.
    ///
    /// # Errors
    ///
    /// Returns [`FileStoreError::Io`] when the directory cannot be created or
    /// opened.
    pub fn open(root: impl AsRef<Utf8Path>) -> Result<Self, FileStoreError> {
        let path = root.as_ref();
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self {
            root: path.to_owned(),
            dir: Arc::new(dir),
        })
    }

    /// Returns the directory that holds stored files.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn write(&self, staged: StagedFile) -> Result<StoredFile, FileStoreError> {
        let (file, bytes) = staged.into_parts();
        let dir = Arc::clone(&self.dir);
        let target = file.filename.clone();

        tokio::task::spawn_blocking(move || -> Result<(), FileStoreError> {
            if !dir.exists(&target) {
                dir.write(&target, &bytes)?;
            }
            Ok(())
        })
        .await??;

        tracing::debug!(filename = %file.filename, "upload stored");
        Ok(file)
    }
}
