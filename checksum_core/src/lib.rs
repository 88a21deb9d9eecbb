//! Checksum Core Library
//!
//! Streams a single local file through one or more incremental hash
//! accumulators, tracks per-algorithm progress, and verifies digests.

pub mod api;
pub mod engine;
pub mod error;
pub mod file_io;
pub mod hashing;
pub mod progress;
pub mod verify;

// Re-export main types
pub use api::ChecksumClient;
pub use engine::{CancellationFlag, DEFAULT_CHUNK_SIZE, DigestEngine};
pub use error::{Error, Result};
pub use file_io::{FileInfo, inspect_file};
pub use hashing::{DigestResult, HashAlgorithm, HashingStrategy, StrategyKind};
pub use progress::{
    BoardProvider, NullProvider, ProgressBoard, ProgressProvider, ProgressUpdate, SharedProvider,
    SlotReporter,
};
pub use verify::{Verification, Verifier, digests_match};

/// Core client configuration
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClientConfig {
    /// Bytes read per chunk
    pub chunk_size: usize,
    /// How passes are scheduled
    pub strategy: StrategyKind,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            strategy: StrategyKind::Sequential,
        }
    }
}

impl ClientConfig {
    /// Create a test configuration
    pub fn test() -> Self {
        Self {
            chunk_size: 1024, // 1KB chunks for more progress events
            strategy: StrategyKind::Sequential,
        }
    }
}
