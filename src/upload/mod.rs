//! Storage for uploaded files.
//!
//! [`FileStore`] is the port; [`LocalFileStore`] keeps files in a directory
//! that the HTTP layer serves under [`PUBLIC_PREFIX`].

mod error;
mod local;
mod store;

pub use error::FileStoreError;
pub use local::LocalFileStore;
pub use store::{
    FileStore, IMAGE_EXTENSIONS, PUBLIC_PREFIX, StagedFile, StoredFile, is_image_filename, stored_name,
};
