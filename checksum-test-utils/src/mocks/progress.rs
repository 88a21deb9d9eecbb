//! Progress provider that records every update

use checksum_core::{HashAlgorithm, ProgressProvider, ProgressUpdate};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Recording {
    updates: Vec<ProgressUpdate>,
    completions: usize,
}

/// Records every [`ProgressUpdate`] for later assertions
///
/// Child providers share the same recording, so updates from parallel
/// passes end up in one log in arrival order.
#[derive(Clone, Default)]
pub struct RecordingProvider {
    recording: Arc<Mutex<Recording>>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// All updates received so far
    pub fn updates(&self) -> Vec<ProgressUpdate> {
        self.recording.lock().unwrap().updates.clone()
    }

    /// Number of times `complete` was called
    pub fn completions(&self) -> usize {
        self.recording.lock().unwrap().completions
    }

    /// Percentages reported for one slot, in order
    pub fn percentages(&self, slot: usize) -> Vec<f64> {
        self.updates()
            .into_iter()
            .filter_map(|update| match update {
                ProgressUpdate::HashProgress {
                    slot: s, percentage, ..
                } if s == slot => Some(percentage),
                _ => None,
            })
            .collect()
    }

    /// Final digests by slot
    pub fn digests(&self) -> Vec<(usize, HashAlgorithm, String)> {
        self.updates()
            .into_iter()
            .filter_map(|update| match update {
                ProgressUpdate::HashComplete {
                    slot,
                    algorithm,
                    digest,
                } => Some((slot, algorithm, digest)),
                _ => None,
            })
            .collect()
    }

    /// Failure messages by slot
    pub fn failures(&self) -> Vec<(usize, String)> {
        self.updates()
            .into_iter()
            .filter_map(|update| match update {
                ProgressUpdate::HashFailed { slot, message, .. } => Some((slot, message)),
                _ => None,
            })
            .collect()
    }

    /// True if a session was announced
    pub fn session_started(&self) -> bool {
        self.updates()
            .iter()
            .any(|update| matches!(update, ProgressUpdate::SessionStarted { .. }))
    }
}

impl ProgressProvider for RecordingProvider {
    fn report(&self, update: ProgressUpdate) {
        self.recording.lock().unwrap().updates.push(update);
    }

    fn create_child(&self, _name: &str) -> Box<dyn ProgressProvider> {
        Box::new(self.clone())
    }

    fn complete(&self) {
        self.recording.lock().unwrap().completions += 1;
    }
}
