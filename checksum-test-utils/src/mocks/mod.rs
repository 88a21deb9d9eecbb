//! Mock implementations for testing

mod progress;

pub use progress::RecordingProvider;
