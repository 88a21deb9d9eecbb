//! Progress rendering for the CLI
//!
//! The renderer owns the board. It applies updates in arrival order and,
//! when live output is enabled, redraws the whole snapshot as the message of
//! a single indicatif bar on stderr.

use checksum_core::progress::Palette;
use checksum_core::{ProgressBoard, ProgressUpdate};
use colored::*;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::Write;
use tokio::sync::mpsc;

const HIDE_CURSOR: &str = "\x1b[?25l";
const SHOW_CURSOR: &str = "\x1b[?25h";

/// Board colors for terminals
#[derive(Debug, Clone, Copy, Default)]
pub struct ColoredPalette;

impl Palette for ColoredPalette {
    fn heading(&self, text: &str) -> String {
        text.bold().to_string()
    }

    fn detail(&self, text: &str) -> String {
        text.cyan().to_string()
    }

    fn algorithm(&self, text: &str) -> String {
        text.blue().to_string()
    }

    fn value(&self, text: &str) -> String {
        text.green().to_string()
    }

    fn pending(&self, text: &str) -> String {
        text.yellow().to_string()
    }

    fn failure(&self, text: &str) -> String {
        text.red().to_string()
    }
}

/// Render progress updates from a channel until every sender is gone
///
/// Returns the final board, or `None` if no session was ever started.
pub async fn render_progress(
    mut rx: mpsc::UnboundedReceiver<ProgressUpdate>,
    mut renderer: ProgressRenderer,
) -> Option<ProgressBoard> {
    while let Some(update) = rx.recv().await {
        renderer.handle_update(update);
    }

    renderer.finish()
}

/// Progress renderer that manages the live board display
pub struct ProgressRenderer {
    board: Option<ProgressBoard>,
    bar: ProgressBar,
    live: bool,
    palette: ColoredPalette,
}

impl ProgressRenderer {
    /// Create a renderer; `live` draws to stderr, otherwise updates are only collected
    pub fn new(live: bool) -> Self {
        let bar = if live {
            let bar = ProgressBar::with_draw_target(Some(100), ProgressDrawTarget::stderr());
            bar.set_style(
                ProgressStyle::with_template("{msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            let mut stderr = std::io::stderr();
            let _ = write!(stderr, "{HIDE_CURSOR}");
            let _ = stderr.flush();
            bar
        } else {
            ProgressBar::hidden()
        };

        Self {
            board: None,
            bar,
            live,
            palette: ColoredPalette,
        }
    }

    /// Current board, if a session has started
    pub fn board(&self) -> Option<&ProgressBoard> {
        self.board.as_ref()
    }

    /// Handle a progress update
    pub fn handle_update(&mut self, update: ProgressUpdate) {
        if let ProgressUpdate::Status { message } = &update {
            if self.live {
                self.bar.println(message);
            }
            log::info!("{message}");
            return;
        }

        let changed = if let Some(board) = self.board.as_mut() {
            board.apply(&update)
        } else if let ProgressUpdate::SessionStarted {
            path,
            total_bytes,
            algorithms,
        } = &update
        {
            self.board = Some(ProgressBoard::new(path.clone(), *total_bytes, algorithms));
            true
        } else {
            false
        };

        if changed && let Some(board) = &self.board {
            self.bar.set_position(board.aggregate_percentage().floor() as u64);
            self.bar.set_message(board.render_with(&self.palette));
        }
    }

    /// Clear the live display and hand back the final board
    pub fn finish(mut self) -> Option<ProgressBoard> {
        self.bar.finish_and_clear();
        self.board.take()
    }
}

impl Drop for ProgressRenderer {
    fn drop(&mut self) {
        if self.live {
            let mut stderr = std::io::stderr();
            let _ = write!(stderr, "{SHOW_CURSOR}");
            let _ = stderr.flush();
        }
    }
}
