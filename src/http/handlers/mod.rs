//! Route handlers.
//!
//! Uploads are staged first and written only once the request they belong
//! to has passed validation.

pub mod auth;
pub mod health;
pub mod tasks;
pub mod uploads;

use super::{ApiError, extract::FilePart};
use crate::upload::{FileStore, StagedFile, is_image_filename};

const INVALID_IMAGE: &str = "No file uploaded or invalid file format";

fn stage_parts(parts: Vec<FilePart>) -> Result<Vec<StagedFile>, ApiError> {
    parts
        .into_iter()
        .map(|part| StagedFile::new(&part.file_name, part.bytes).map_err(ApiError::from))
        .collect()
}

/// Stages a jpg/jpeg/png part; anything else is a 400.
fn stage_image(part: FilePart) -> Result<StagedFile, ApiError> {
    if !is_image_filename(&part.file_name) {
        return Err(ApiError::bad_request(INVALID_IMAGE));
    }
    StagedFile::new(&part.file_name, part.bytes).map_err(|_| ApiError::bad_request(INVALID_IMAGE))
}

fn public_paths(staged: &[StagedFile]) -> Vec<String> {
    staged
        .iter()
        .map(|file| file.file().public_path.clone())
        .collect()
}

async fn write_staged(files: &dyn FileStore, staged: Vec<StagedFile>) -> Result<(), ApiError> {
    for file in staged {
        files.write(file).await?;
    }
    Ok(())
}
