//! Progress reporting module for the CLI
//!
//! Digest passes report through a [`ChannelProvider`]; a single renderer task
//! owns the board and draws it.

pub mod provider;
pub mod renderer;

pub use provider::{ChannelProvider, create_progress_infrastructure};
pub use renderer::{ColoredPalette, ProgressRenderer, render_progress};
