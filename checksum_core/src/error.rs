//! Error types for the checksum core library
//!
//! Errors are grouped by when they can happen:
//! - Validation errors are raised before any file is streamed
//! - I/O errors are raised while a digest pass is reading the file
//! - Internal errors cover worker tasks and cancellation

use thiserror::Error;

pub mod internal;
pub mod io;
pub mod validation;

pub use self::io::{IoError, IoErrorKind};
pub use self::validation::ValidationError;
pub use internal::InternalError;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the checksum core library
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error(transparent)]
    Io(#[from] IoError),

    /// Validation related errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Internal library errors
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl Error {
    /// True when an algorithm identifier was rejected
    pub fn is_invalid_algorithm(&self) -> bool {
        matches!(
            self,
            Self::Validation(ValidationError::InvalidAlgorithm { .. })
        )
    }

    /// True when the input file failed the pre-flight check
    pub fn is_file_not_accessible(&self) -> bool {
        matches!(
            self,
            Self::Validation(ValidationError::FileNotAccessible { .. })
        )
    }

    /// True when the error happened while streaming
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io(IoError::from_std(source))
    }
}
