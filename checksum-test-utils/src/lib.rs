//! Test utilities for the checksum workspace
//!
//! This crate provides fixture builders and a recording progress provider
//! shared by the core and CLI test suites.

pub mod builders;
pub mod mocks;

// Re-export commonly used types
pub use builders::TestFileBuilder;
pub use mocks::RecordingProvider;
