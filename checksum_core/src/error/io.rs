//! I/O related error types

use std::path::PathBuf;
use thiserror::Error;

/// I/O error raised while a digest pass is streaming a file
#[derive(Error, Debug)]
#[error("{}", format_io_error(self))]
pub struct IoError {
    /// The kind of I/O error
    pub kind: IoErrorKind,
    /// Path associated with the error (if any)
    pub path: Option<PathBuf>,
    /// Algorithm whose pass was interrupted (if any)
    pub algorithm: Option<String>,
    /// Underlying I/O error (if any)
    #[source]
    pub source: Option<std::io::Error>,
}

/// Kind of I/O error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IoErrorKind {
    /// File not found
    FileNotFound,
    /// Permission denied
    PermissionDenied,
    /// Generic I/O error
    Other,
}

impl IoError {
    /// Create a file not found error
    pub fn file_not_found(path: &std::path::Path) -> Self {
        Self {
            kind: IoErrorKind::FileNotFound,
            path: Some(path.to_path_buf()),
            algorithm: None,
            source: None,
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(path: &std::path::Path, source: std::io::Error) -> Self {
        Self {
            kind: IoErrorKind::PermissionDenied,
            path: Some(path.to_path_buf()),
            algorithm: None,
            source: Some(source),
        }
    }

    /// Create an I/O error from a standard I/O error
    pub fn from_std(source: std::io::Error) -> Self {
        let kind = match source.kind() {
            std::io::ErrorKind::NotFound => IoErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => IoErrorKind::PermissionDenied,
            _ => IoErrorKind::Other,
        };

        Self {
            kind,
            path: None,
            algorithm: None,
            source: Some(source),
        }
    }

    /// Attach the path being read
    pub fn with_path(mut self, path: &std::path::Path) -> Self {
        self.path = Some(path.to_path_buf());
        self
    }

    /// Attach the algorithm whose pass failed
    pub fn with_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = Some(algorithm.into());
        self
    }
}

fn format_io_error(error: &IoError) -> String {
    let subject = match (&error.path, &error.algorithm) {
        (Some(path), Some(algorithm)) => format!(" ({algorithm} pass over {})", path.display()),
        (Some(path), None) => format!(" ({})", path.display()),
        (None, Some(algorithm)) => format!(" ({algorithm} pass)"),
        (None, None) => String::new(),
    };

    match error.kind {
        IoErrorKind::FileNotFound => format!("File not found{subject}"),
        IoErrorKind::PermissionDenied => format!("Permission denied{subject}"),
        IoErrorKind::Other => match &error.source {
            Some(source) => format!("I/O error{subject}: {source}"),
            None => format!("I/O error{subject}"),
        },
    }
}
