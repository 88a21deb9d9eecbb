//! Progress reporting abstractions for the checksum engine
//!
//! This module provides a trait-based abstraction for progress reporting,
//! allowing the core library to report progress without depending on
//! specific channel implementations or UI concerns.
//!
//! Each digest pass writes through a [`SlotReporter`] bound to its own slot,
//! so a pass can never touch another algorithm's progress.

use crate::{Error, HashAlgorithm};
use std::path::PathBuf;
use std::sync::Arc;

pub mod board;

pub use board::{BoardProvider, Palette, PlainPalette, ProgressBoard, Slot, SlotEvent, SlotState};

/// Core trait for progress reporting
///
/// This trait abstracts away the progress reporting mechanism,
/// allowing different implementations (channels, boards, null, etc.)
pub trait ProgressProvider: Send + Sync {
    /// Report a progress update
    fn report(&self, update: ProgressUpdate);

    /// Create a child provider for a pass running on another task
    fn create_child(&self, name: &str) -> Box<dyn ProgressProvider>;

    /// Signal that the session is complete
    fn complete(&self);
}

/// Unified progress update type
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressUpdate {
    /// A digest session has validated its input and is about to stream
    SessionStarted {
        path: PathBuf,
        total_bytes: u64,
        algorithms: Vec<HashAlgorithm>,
    },

    /// One chunk has been fed into the accumulator of a slot
    HashProgress {
        slot: usize,
        algorithm: HashAlgorithm,
        bytes_processed: u64,
        total_bytes: u64,
        percentage: f64,
    },

    /// A slot has produced its final digest
    HashComplete {
        slot: usize,
        algorithm: HashAlgorithm,
        digest: String,
    },

    /// A slot's pass was aborted
    HashFailed {
        slot: usize,
        algorithm: HashAlgorithm,
        message: String,
    },

    /// Generic status message
    Status { message: String },
}

/// Null implementation for when no progress is needed
pub struct NullProvider;

impl ProgressProvider for NullProvider {
    fn report(&self, _update: ProgressUpdate) {}

    fn create_child(&self, _name: &str) -> Box<dyn ProgressProvider> {
        Box::new(NullProvider)
    }

    fn complete(&self) {}
}

/// Arc-wrapped provider for easy sharing across async tasks
pub struct SharedProvider {
    inner: Arc<dyn ProgressProvider>,
}

impl SharedProvider {
    /// Create a new shared provider wrapping the given provider
    pub fn new(provider: Arc<dyn ProgressProvider>) -> Self {
        Self { inner: provider }
    }
}

impl ProgressProvider for SharedProvider {
    fn report(&self, update: ProgressUpdate) {
        self.inner.report(update);
    }

    fn create_child(&self, _name: &str) -> Box<dyn ProgressProvider> {
        Box::new(SharedProvider {
            inner: Arc::clone(&self.inner),
        })
    }

    fn complete(&self) {
        self.inner.complete();
    }
}

/// Helper functions for creating providers
impl dyn ProgressProvider {
    /// Create a null provider (useful for tests and when progress isn't needed)
    pub fn null() -> Box<dyn ProgressProvider> {
        Box::new(NullProvider)
    }
}

/// Write capability for exactly one progress slot
pub struct SlotReporter<'a> {
    slot: usize,
    algorithm: HashAlgorithm,
    provider: &'a dyn ProgressProvider,
}

impl<'a> SlotReporter<'a> {
    pub fn new(slot: usize, algorithm: HashAlgorithm, provider: &'a dyn ProgressProvider) -> Self {
        Self {
            slot,
            algorithm,
            provider,
        }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Report that `bytes_processed` of `total_bytes` have been hashed
    pub fn progress(&self, bytes_processed: u64, total_bytes: u64) {
        self.provider.report(ProgressUpdate::HashProgress {
            slot: self.slot,
            algorithm: self.algorithm,
            bytes_processed,
            total_bytes,
            percentage: percentage(bytes_processed, total_bytes),
        });
    }

    /// Report the terminal 100% event for a pass that reached end of file
    pub fn progress_done(&self, bytes_processed: u64, total_bytes: u64) {
        self.provider.report(ProgressUpdate::HashProgress {
            slot: self.slot,
            algorithm: self.algorithm,
            bytes_processed,
            total_bytes,
            percentage: 100.0,
        });
    }

    pub fn finished(&self, digest: &str) {
        self.provider.report(ProgressUpdate::HashComplete {
            slot: self.slot,
            algorithm: self.algorithm,
            digest: digest.to_string(),
        });
    }

    pub fn failed(&self, error: &Error) {
        self.provider.report(ProgressUpdate::HashFailed {
            slot: self.slot,
            algorithm: self.algorithm,
            message: error.to_string(),
        });
    }
}

/// Fraction of `total` covered by `consumed`, as a percentage in `[0, 100]`
///
/// An empty input counts as fully consumed.
pub fn percentage(consumed: u64, total: u64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (consumed as f64 / total as f64 * 100.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Capture(Mutex<Vec<ProgressUpdate>>);

    impl Capture {
        fn take(&self) -> Vec<ProgressUpdate> {
            std::mem::take(&mut *self.0.lock().unwrap())
        }
    }

    impl ProgressProvider for Arc<Capture> {
        fn report(&self, update: ProgressUpdate) {
            self.0.lock().unwrap().push(update);
        }

        fn create_child(&self, _name: &str) -> Box<dyn ProgressProvider> {
            Box::new(Arc::clone(self))
        }

        fn complete(&self) {}
    }

    #[test]
    fn test_null_provider_accepts_everything() {
        let provider = <dyn ProgressProvider>::null();
        let reporter = SlotReporter::new(0, HashAlgorithm::MD5, provider.as_ref());

        reporter.progress(1, 2);
        reporter.finished("00");
        provider.create_child("md5").complete();
    }

    #[test]
    fn test_shared_provider_children_report_to_one_sink() {
        let capture = Arc::new(Capture::default());
        let shared = SharedProvider::new(Arc::new(Arc::clone(&capture)));

        let first = shared.create_child("sha1");
        let second = shared.create_child("md5");
        SlotReporter::new(0, HashAlgorithm::SHA1, first.as_ref()).progress(1, 4);
        SlotReporter::new(1, HashAlgorithm::MD5, second.as_ref()).progress(2, 4);

        let slots: Vec<_> = capture
            .take()
            .into_iter()
            .filter_map(|update| match update {
                ProgressUpdate::HashProgress { slot, .. } => Some(slot),
                _ => None,
            })
            .collect();
        assert_eq!(slots, vec![0, 1]);
    }

    #[test]
    fn test_failed_carries_error_message() {
        let capture = Arc::new(Capture::default());
        let reporter = SlotReporter::new(3, HashAlgorithm::SHA256, &capture);

        reporter.failed(&Error::Validation(ValidationError::EmptyChecksum));

        assert_eq!(
            capture.take(),
            vec![ProgressUpdate::HashFailed {
                slot: 3,
                algorithm: HashAlgorithm::SHA256,
                message: "Expected checksum must not be empty".to_string(),
            }]
        );
    }

    #[test]
    fn test_slot_reporter_tags_its_own_slot() {
        let capture = Arc::new(Capture::default());
        let reporter = SlotReporter::new(2, HashAlgorithm::SHA384, &capture);

        reporter.progress(50, 200);
        reporter.progress_done(200, 200);
        reporter.finished("abcd");

        let updates = capture.take();
        assert_eq!(
            updates[0],
            ProgressUpdate::HashProgress {
                slot: 2,
                algorithm: HashAlgorithm::SHA384,
                bytes_processed: 50,
                total_bytes: 200,
                percentage: 25.0,
            }
        );
        assert!(matches!(
            updates[1],
            ProgressUpdate::HashProgress { percentage, .. } if percentage == 100.0
        ));
        assert_eq!(
            updates[2],
            ProgressUpdate::HashComplete {
                slot: 2,
                algorithm: HashAlgorithm::SHA384,
                digest: "abcd".to_string(),
            }
        );
    }

    #[test]
    fn test_percentage_bounds() {
        assert_eq!(percentage(0, 0), 100.0);
        assert_eq!(percentage(0, 10), 0.0);
        assert_eq!(percentage(5, 10), 50.0);
        assert_eq!(percentage(10, 10), 100.0);
        // A file that grew while streaming never exceeds 100
        assert_eq!(percentage(15, 10), 100.0);
    }
}
