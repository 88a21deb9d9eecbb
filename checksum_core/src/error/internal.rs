//! Internal library error types

use thiserror::Error;

/// Internal library errors
#[derive(Error, Debug)]
pub enum InternalError {
    /// Hash calculation error
    #[error("Hash calculation failed for algorithm '{algorithm}': {message}")]
    HashCalculation { algorithm: String, message: String },

    /// A worker task panicked or was aborted
    #[error("Worker task for '{algorithm}' failed: {message}")]
    TaskFailed { algorithm: String, message: String },

    /// The pass was cancelled between chunk reads
    #[error("Digest pass for '{algorithm}' was cancelled")]
    Cancelled { algorithm: String },
}

impl InternalError {
    /// Create a hash calculation error
    pub fn hash_calculation(algorithm: &str, message: &str) -> Self {
        Self::HashCalculation {
            algorithm: algorithm.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a task failure error
    pub fn task_failed(algorithm: &str, message: impl Into<String>) -> Self {
        Self::TaskFailed {
            algorithm: algorithm.to_string(),
            message: message.into(),
        }
    }

    /// Create a cancellation error
    pub fn cancelled(algorithm: &str) -> Self {
        Self::Cancelled {
            algorithm: algorithm.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_calculation_error() {
        let error = InternalError::hash_calculation("SHA512", "no result returned");
        assert!(error.to_string().contains("Hash calculation failed"));
        assert!(error.to_string().contains("SHA512"));
        assert!(error.to_string().contains("no result returned"));
    }

    #[test]
    fn test_task_failed_error() {
        let error = InternalError::task_failed("MD5", "task panicked");
        assert!(error.to_string().contains("MD5"));
        assert!(error.to_string().contains("task panicked"));
    }

    #[test]
    fn test_cancelled_error() {
        let error = InternalError::cancelled("SHA1");
        assert!(error.to_string().contains("cancelled"));
        assert!(error.to_string().contains("SHA1"));
    }
}
