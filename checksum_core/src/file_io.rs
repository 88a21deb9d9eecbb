//! Pre-flight checks on the file to be digested
//!
//! A file that fails here never reaches the engine, so no progress is
//! reported for it.

use crate::error::ValidationError;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A validated input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub path: PathBuf,
    /// Length reported by metadata at validation time
    pub size: u64,
}

/// Check that `path` names a readable regular file
pub async fn inspect_file(path: &Path) -> Result<FileInfo> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| not_accessible(path, &e))?;

    if !metadata.is_file() {
        let reason = if metadata.is_dir() {
            "is a directory"
        } else {
            "is not a regular file"
        };
        return Err(Error::Validation(ValidationError::file_not_accessible(
            path, reason,
        )));
    }

    // Metadata can succeed on files we cannot read
    tokio::fs::File::open(path)
        .await
        .map_err(|e| not_accessible(path, &e))?;

    log::debug!("Validated {} ({} bytes)", path.display(), metadata.len());

    Ok(FileInfo {
        path: path.to_path_buf(),
        size: metadata.len(),
    })
}

fn not_accessible(path: &Path, error: &std::io::Error) -> Error {
    let reason = match error.kind() {
        ErrorKind::NotFound => "no such file".to_string(),
        ErrorKind::PermissionDenied => "permission denied".to_string(),
        _ => error.to_string(),
    };
    Error::Validation(ValidationError::file_not_accessible(path, reason))
}
