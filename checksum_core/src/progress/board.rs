//! Progress aggregation across the algorithms of one session
//!
//! The board keeps one slot per requested algorithm, in request order, and
//! renders a deterministic text snapshot:
//!
//! ```text
//! File: /data/disk.img
//! Size: 1.50 MB | 1572864 bytes
//!
//! SHA256: 6d1f...
//! MD5 Progress: 50.00%
//!
//! Total Progress: 75.00%
//! ```

use super::{ProgressProvider, ProgressUpdate};
use crate::HashAlgorithm;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Lifecycle of one slot
#[derive(Debug, Clone, PartialEq)]
pub enum SlotState {
    Queued,
    Streaming,
    Finalized(String),
    Failed(String),
}

impl SlotState {
    /// Finalized and failed slots accept no further events
    pub fn is_terminal(&self) -> bool {
        matches!(self, SlotState::Finalized(_) | SlotState::Failed(_))
    }
}

/// Event addressed to a single slot
#[derive(Debug, Clone, PartialEq)]
pub enum SlotEvent {
    Progress(f64),
    Finalized(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub algorithm: HashAlgorithm,
    pub percentage: f64,
    pub state: SlotState,
}

/// Styling hooks for rendered snapshots
///
/// Every hook defaults to the identity so [`PlainPalette`] renders bare text.
pub trait Palette {
    fn heading(&self, text: &str) -> String {
        text.to_string()
    }

    fn detail(&self, text: &str) -> String {
        text.to_string()
    }

    fn algorithm(&self, text: &str) -> String {
        text.to_string()
    }

    fn value(&self, text: &str) -> String {
        text.to_string()
    }

    fn pending(&self, text: &str) -> String {
        text.to_string()
    }

    fn failure(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Palette without any styling
pub struct PlainPalette;

impl Palette for PlainPalette {}

/// Ordered per-algorithm progress for one file
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressBoard {
    path: PathBuf,
    total_bytes: u64,
    slots: Vec<Slot>,
}

impl ProgressBoard {
    /// Create a board with every slot queued at 0%
    pub fn new(path: impl Into<PathBuf>, total_bytes: u64, algorithms: &[HashAlgorithm]) -> Self {
        let slots = algorithms
            .iter()
            .map(|&algorithm| Slot {
                algorithm,
                percentage: 0.0,
                state: SlotState::Queued,
            })
            .collect();

        Self {
            path: path.into(),
            total_bytes,
            slots,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Apply an event to slot `index`
    ///
    /// Returns `false` when the slot does not exist or is already terminal.
    pub fn update(&mut self, index: usize, event: SlotEvent) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        if slot.state.is_terminal() {
            return false;
        }

        match event {
            SlotEvent::Progress(percentage) => {
                slot.percentage = percentage.clamp(0.0, 100.0);
                slot.state = SlotState::Streaming;
            }
            SlotEvent::Finalized(digest) => {
                slot.percentage = 100.0;
                slot.state = SlotState::Finalized(digest);
            }
            SlotEvent::Failed(reason) => {
                slot.state = SlotState::Failed(reason);
            }
        }
        true
    }

    /// Fold a provider update into the board
    ///
    /// A new session resets the board. Returns `true` when anything changed.
    pub fn apply(&mut self, update: &ProgressUpdate) -> bool {
        match update {
            ProgressUpdate::SessionStarted {
                path,
                total_bytes,
                algorithms,
            } => {
                *self = ProgressBoard::new(path.clone(), *total_bytes, algorithms);
                true
            }
            ProgressUpdate::HashProgress {
                slot, percentage, ..
            } => self.update(*slot, SlotEvent::Progress(*percentage)),
            ProgressUpdate::HashComplete { slot, digest, .. } => {
                self.update(*slot, SlotEvent::Finalized(digest.clone()))
            }
            ProgressUpdate::HashFailed { slot, message, .. } => {
                self.update(*slot, SlotEvent::Failed(message.clone()))
            }
            ProgressUpdate::Status { .. } => false,
        }
    }

    /// Arithmetic mean of every slot's percentage
    pub fn aggregate_percentage(&self) -> f64 {
        if self.slots.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.slots.iter().map(|slot| slot.percentage).sum();
        sum / self.slots.len() as f64
    }

    /// True once every slot has reached a terminal state
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|slot| slot.state.is_terminal())
    }

    pub fn format_line(&self, index: usize) -> Option<String> {
        self.format_line_with(index, &PlainPalette)
    }

    pub fn format_line_with(&self, index: usize, palette: &dyn Palette) -> Option<String> {
        let slot = self.slots.get(index)?;
        let label = palette.algorithm(slot.algorithm.display_name());

        let line = match &slot.state {
            SlotState::Queued => format!("{label} Progress: {}", palette.pending("Queued")),
            SlotState::Streaming => format!(
                "{label} Progress: {}%",
                palette.value(&format!("{:.2}", slot.percentage))
            ),
            SlotState::Finalized(digest) => format!("{label}: {}", palette.value(digest)),
            SlotState::Failed(reason) => format!("{label} Failed: {}", palette.failure(reason)),
        };
        Some(line)
    }

    pub fn render(&self) -> String {
        self.render_with(&PlainPalette)
    }

    /// Render the full snapshot with the given styling
    pub fn render_with(&self, palette: &dyn Palette) -> String {
        let mut lines = Vec::with_capacity(self.slots.len() + 5);
        lines.push(format!(
            "{} {}",
            palette.heading("File:"),
            palette.detail(&self.path.display().to_string())
        ));
        lines.push(format!(
            "{} {} | {} bytes",
            palette.heading("Size:"),
            palette.detail(&format_bytes(self.total_bytes)),
            palette.detail(&self.total_bytes.to_string())
        ));
        lines.push(String::new());
        lines.extend((0..self.slots.len()).filter_map(|i| self.format_line_with(i, palette)));
        lines.push(String::new());
        lines.push(format!(
            "{} {}%",
            palette.heading("Total Progress:"),
            palette.value(&format!("{:.2}", self.aggregate_percentage()))
        ));
        lines.join("\n")
    }
}

/// Human readable size: `0 Byte`, otherwise two decimals in the largest
/// fitting unit up to TB
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 Byte".to_string();
    }

    let mut unit = 0;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && unit < UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }
    format!("{scaled:.2} {}", UNITS[unit])
}

struct BoardState<W> {
    board: Option<ProgressBoard>,
    sink: W,
}

/// Progress provider that keeps a board and re-renders it into a sink
///
/// Updates from every child provider are serialized through one mutex, so
/// concurrent passes never interleave their writes.
pub struct BoardProvider<W: Write + Send + 'static> {
    state: Arc<Mutex<BoardState<W>>>,
}

impl<W: Write + Send + 'static> BoardProvider<W> {
    pub fn new(sink: W) -> Self {
        Self {
            state: Arc::new(Mutex::new(BoardState { board: None, sink })),
        }
    }

    /// Current board, if a session has started
    pub fn snapshot(&self) -> Option<ProgressBoard> {
        self.lock().board.clone()
    }

    /// Recover the sink once every child provider has been dropped
    pub fn into_inner(self) -> Option<W> {
        Arc::try_unwrap(self.state)
            .ok()
            .map(|state| state.into_inner().unwrap_or_else(PoisonError::into_inner).sink)
    }

    fn lock(&self) -> MutexGuard<'_, BoardState<W>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send + 'static> BoardState<W> {
    fn draw(&mut self) {
        let Some(board) = &self.board else {
            return;
        };
        if let Err(e) = writeln!(self.sink, "{}\n", board.render()) {
            log::warn!("Failed to render progress: {e}");
        }
    }
}

impl<W: Write + Send + 'static> ProgressProvider for BoardProvider<W> {
    fn report(&self, update: ProgressUpdate) {
        let mut state = self.lock();
        let changed = if let Some(board) = state.board.as_mut() {
            board.apply(&update)
        } else if let ProgressUpdate::SessionStarted {
            path,
            total_bytes,
            algorithms,
        } = &update
        {
            state.board = Some(ProgressBoard::new(path.clone(), *total_bytes, algorithms));
            true
        } else {
            false
        };
        if changed {
            state.draw();
        }
    }

    fn create_child(&self, _name: &str) -> Box<dyn ProgressProvider> {
        Box::new(BoardProvider {
            state: Arc::clone(&self.state),
        })
    }

    fn complete(&self) {
        let mut state = self.lock();
        state.draw();
        if let Err(e) = state.sink.flush() {
            log::warn!("Failed to flush progress output: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> ProgressBoard {
        ProgressBoard::new(
            "/data/file.bin",
            2048,
            &[HashAlgorithm::SHA256, HashAlgorithm::MD5],
        )
    }

    #[test]
    fn test_new_board_is_queued() {
        let board = board();
        assert_eq!(board.aggregate_percentage(), 0.0);
        assert_eq!(board.format_line(0).unwrap(), "SHA256 Progress: Queued");
        assert_eq!(board.format_line(1).unwrap(), "MD5 Progress: Queued");
        assert!(board.format_line(2).is_none());
        assert!(!board.is_complete());
    }

    #[test]
    fn test_aggregate_is_mean_of_slots() {
        let mut board = board();
        board.update(0, SlotEvent::Progress(40.0));
        board.update(1, SlotEvent::Progress(60.0));

        assert_eq!(board.aggregate_percentage(), 50.0);
        assert!(board.render().ends_with("Total Progress: 50.00%"));
    }

    #[test]
    fn test_line_labels_follow_slot_state() {
        let mut board = board();
        board.update(0, SlotEvent::Progress(12.5));
        assert_eq!(board.format_line(0).unwrap(), "SHA256 Progress: 12.50%");

        board.update(0, SlotEvent::Finalized("abc123".to_string()));
        assert_eq!(board.format_line(0).unwrap(), "SHA256: abc123");
        assert_eq!(board.slots()[0].percentage, 100.0);

        board.update(1, SlotEvent::Failed("read error".to_string()));
        assert_eq!(board.format_line(1).unwrap(), "MD5 Failed: read error");
        assert!(board.is_complete());
    }

    #[test]
    fn test_terminal_slots_ignore_events() {
        let mut board = board();
        assert!(board.update(0, SlotEvent::Finalized("abc".to_string())));
        assert!(!board.update(0, SlotEvent::Progress(10.0)));
        assert!(!board.update(0, SlotEvent::Failed("late".to_string())));
        assert!(!board.update(7, SlotEvent::Progress(10.0)));

        assert_eq!(board.slots()[0].state, SlotState::Finalized("abc".to_string()));
    }

    #[test]
    fn test_render_layout() {
        let mut board = board();
        board.update(0, SlotEvent::Finalized("deadbeef".to_string()));
        board.update(1, SlotEvent::Progress(50.0));

        let expected = "File: /data/file.bin\n\
                        Size: 2.00 KB | 2048 bytes\n\
                        \n\
                        SHA256: deadbeef\n\
                        MD5 Progress: 50.00%\n\
                        \n\
                        Total Progress: 75.00%";
        assert_eq!(board.render(), expected);
        // Rendering is pure
        assert_eq!(board.render(), expected);
    }

    #[test]
    fn test_repeated_algorithms_keep_separate_slots() {
        let mut board = ProgressBoard::new("f", 1, &[HashAlgorithm::MD5, HashAlgorithm::MD5]);
        board.update(1, SlotEvent::Progress(100.0));

        assert_eq!(board.slots()[0].state, SlotState::Queued);
        assert_eq!(board.aggregate_percentage(), 50.0);
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 Byte");
        assert_eq!(format_bytes(1), "1.00 Bytes");
        assert_eq!(format_bytes(1023), "1023.00 Bytes");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.00 GB");
        assert_eq!(format_bytes(2048 * 1024 * 1024 * 1024 * 1024), "2048.00 TB");
    }

    #[test]
    fn test_board_provider_renders_each_change() {
        let provider = BoardProvider::new(Vec::new());
        provider.report(ProgressUpdate::Status {
            message: "before session".to_string(),
        });
        provider.report(ProgressUpdate::SessionStarted {
            path: PathBuf::from("a.txt"),
            total_bytes: 3,
            algorithms: vec![HashAlgorithm::SHA1],
        });
        provider.report(ProgressUpdate::HashComplete {
            slot: 0,
            algorithm: HashAlgorithm::SHA1,
            digest: "a9993e364706816aba3e25717850c26c9cd0d89d".to_string(),
        });
        provider.complete();

        let snapshot = provider.snapshot().unwrap();
        assert!(snapshot.is_complete());

        let output = String::from_utf8(provider.into_inner().unwrap()).unwrap();
        assert_eq!(output.matches("File: a.txt").count(), 3);
        assert!(output.contains("SHA1 Progress: Queued"));
        assert!(output.contains("SHA1: a9993e364706816aba3e25717850c26c9cd0d89d"));
    }

    #[test]
    fn test_session_started_resets_board() {
        let mut board = board();
        board.update(0, SlotEvent::Progress(80.0));
        board.apply(&ProgressUpdate::SessionStarted {
            path: PathBuf::from("other"),
            total_bytes: 0,
            algorithms: vec![HashAlgorithm::SHA512],
        });

        assert_eq!(board.path(), Path::new("other"));
        assert_eq!(board.slots().len(), 1);
        assert_eq!(board.aggregate_percentage(), 0.0);
    }
}
