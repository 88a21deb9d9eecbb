//! Library half of the `checksum` binary
//!
//! Everything the command handlers need lives here so the integration tests
//! can reach it.

pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod prompt;
pub mod terminal;
