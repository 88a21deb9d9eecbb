//! Validation related error types
//!
//! Everything in here is detected before a digest pass opens the file.

use std::path::PathBuf;
use thiserror::Error;

/// Errors detected before any file is streamed
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Algorithm identifier outside the supported set
    #[error("Invalid algorithm '{name}': expected one of {supported}")]
    InvalidAlgorithm { name: String, supported: String },

    /// Path missing, not a regular file, or unreadable
    #[error("File not accessible: {path}: {reason}")]
    FileNotAccessible { path: PathBuf, reason: String },

    /// Empty algorithm list
    #[error("At least one hash algorithm must be specified")]
    NoAlgorithms,

    /// Empty expected digest for verification
    #[error("Expected checksum must not be empty")]
    EmptyChecksum,

    /// Invalid input parameter
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter { parameter: String, reason: String },
}

impl ValidationError {
    /// Create an invalid algorithm error
    pub fn invalid_algorithm(name: &str) -> Self {
        Self::InvalidAlgorithm {
            name: name.to_string(),
            supported: crate::hashing::HashAlgorithm::ALL
                .iter()
                .map(|a| a.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Create a file not accessible error
    pub fn file_not_accessible(path: &std::path::Path, reason: impl Into<String>) -> Self {
        Self::FileNotAccessible {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: &str, reason: &str) -> Self {
        Self::InvalidParameter {
            parameter: parameter.to_string(),
            reason: reason.to_string(),
        }
    }
}
