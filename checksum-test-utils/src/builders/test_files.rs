//! Fixture files for digest tests

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test file builder for creating fixture files in a scratch directory
///
/// The directory and everything in it are removed when the builder drops.
///
/// # Examples
///
/// ```rust
/// use checksum_test_utils::TestFileBuilder;
///
/// let files = TestFileBuilder::new().unwrap();
/// let path = files.with_content("abc.txt", b"abc").unwrap();
/// assert_eq!(std::fs::read(path).unwrap(), b"abc");
/// ```
pub struct TestFileBuilder {
    dir: TempDir,
}

impl TestFileBuilder {
    /// Create a builder backed by a fresh temporary directory
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    /// Directory the fixtures are written to
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Path a fixture named `name` would have, without creating it
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a file with exact content
    pub fn with_content(&self, name: &str, content: &[u8]) -> io::Result<PathBuf> {
        let path = self.path(name);
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Write a file of `size` zero bytes
    pub fn zeroed(&self, name: &str, size: usize) -> io::Result<PathBuf> {
        self.with_content(name, &vec![0u8; size])
    }

    /// Write a file of `size` pseudo-random bytes derived from `seed`
    ///
    /// Returns the path along with the content so tests can digest it in
    /// memory.
    pub fn deterministic(
        &self,
        name: &str,
        size: usize,
        seed: u64,
    ) -> io::Result<(PathBuf, Vec<u8>)> {
        let content = deterministic_bytes(size, seed);
        let path = self.with_content(name, &content)?;
        Ok((path, content))
    }
}

/// Linear congruential byte stream, stable across platforms
pub fn deterministic_bytes(size: usize, seed: u64) -> Vec<u8> {
    let mut state = seed;
    (0..size)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (state >> 56) as u8
        })
        .collect()
}
