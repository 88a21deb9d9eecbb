//! Progress provider implementation for CLI
//!
//! Bridges the core library's progress reporting with the renderer task.
//! Every pass reports through its own child provider; all of them share one
//! channel so the renderer is the only writer of the board.

use checksum_core::{ProgressProvider, ProgressUpdate};
use std::sync::{Mutex, PoisonError};
use tokio::sync::mpsc;

/// Channel-based progress provider for CLI rendering
///
/// The channel is unbounded so that completion and failure events are never
/// dropped; the renderer drains it far faster than a disk can be read.
pub struct ChannelProvider {
    tx: Mutex<Option<mpsc::UnboundedSender<ProgressUpdate>>>,
    name: Option<String>,
}

impl ChannelProvider {
    /// Create a new channel provider
    pub fn new(tx: mpsc::UnboundedSender<ProgressUpdate>) -> Self {
        Self {
            tx: Mutex::new(Some(tx)),
            name: None,
        }
    }

    /// Create a new channel provider with a name
    pub fn with_name(tx: Option<mpsc::UnboundedSender<ProgressUpdate>>, name: String) -> Self {
        Self {
            tx: Mutex::new(tx),
            name: Some(name),
        }
    }

    fn sender(&self) -> Option<mpsc::UnboundedSender<ProgressUpdate>> {
        self.tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ProgressProvider for ChannelProvider {
    fn report(&self, update: ProgressUpdate) {
        let update = match (&self.name, update) {
            (Some(name), ProgressUpdate::Status { message }) => ProgressUpdate::Status {
                message: format!("[{name}] {message}"),
            },
            (_, other) => other,
        };

        // A closed renderer is not an error for the digest passes
        if let Some(tx) = self.sender() {
            let _ = tx.send(update);
        }
    }

    fn create_child(&self, name: &str) -> Box<dyn ProgressProvider> {
        let child_name = match &self.name {
            Some(parent_name) => format!("{parent_name}/{name}"),
            None => name.to_string(),
        };
        Box::new(ChannelProvider::with_name(self.sender(), child_name))
    }

    fn complete(&self) {
        // Drop our sender so the renderer can exit its loop
        *self.tx.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Create a provider and the receiving end for a renderer
pub fn create_progress_infrastructure() -> (
    ChannelProvider,
    mpsc::UnboundedReceiver<ProgressUpdate>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelProvider::new(tx), rx)
}
