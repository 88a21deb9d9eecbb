//! Streaming digest engine
//!
//! Reads a file in fixed-size chunks and feeds every chunk into one or more
//! incremental accumulators. Memory use is bounded by the chunk size, never
//! by the file size.

use crate::error::{InternalError, IoError, ValidationError};
use crate::hashing::{DigestResult, HashAlgorithm, HashAlgorithmExt, StreamingHasher};
use crate::progress::{NullProvider, SlotReporter};
use crate::{Error, Result};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Default read size per chunk (64 KiB)
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Cooperative cancellation shared between a caller and running passes
///
/// Passes check the flag between chunk reads.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Computes digests of files by streaming them through accumulators
#[derive(Debug, Clone)]
pub struct DigestEngine {
    chunk_size: usize,
    cancellation: Option<CancellationFlag>,
}

impl Default for DigestEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DigestEngine {
    /// Create an engine reading [`DEFAULT_CHUNK_SIZE`] bytes at a time
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            cancellation: None,
        }
    }

    /// Create an engine with a custom chunk size
    pub fn with_chunk_size(chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::Validation(ValidationError::invalid_parameter(
                "chunk_size",
                "must be greater than zero",
            )));
        }
        Ok(Self {
            chunk_size,
            cancellation: None,
        })
    }

    /// Attach a cancellation flag checked before every read
    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancellation = Some(flag);
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Digest an in-memory buffer with the same accumulator the file path uses
    pub fn digest_bytes(algorithm: HashAlgorithm, data: &[u8]) -> String {
        algorithm.to_impl().hash_bytes(data)
    }

    /// Digest a file without reporting progress
    pub async fn digest_file(&self, path: &Path, algorithm: HashAlgorithm) -> Result<DigestResult> {
        let provider = NullProvider;
        let reporter = SlotReporter::new(0, algorithm, &provider);
        self.compute_digest(path, &reporter).await
    }

    /// Stream `path` through the reporter's algorithm
    ///
    /// Emits one progress event per chunk and a terminal 100% event at end
    /// of file, then the finalized digest. An empty file produces exactly
    /// one progress event.
    pub async fn compute_digest(
        &self,
        path: &Path,
        reporter: &SlotReporter<'_>,
    ) -> Result<DigestResult> {
        let mut results = self
            .compute_digests_single_pass(path, std::slice::from_ref(reporter))
            .await?;
        results.pop().ok_or_else(|| {
            Error::Internal(InternalError::hash_calculation(
                reporter.algorithm().id(),
                "pass produced no digest",
            ))
        })
    }

    /// Stream `path` once, feeding every chunk into each reporter's accumulator
    ///
    /// Results are returned in reporter order. On failure every slot is
    /// reported as failed.
    pub async fn compute_digests_single_pass(
        &self,
        path: &Path,
        reporters: &[SlotReporter<'_>],
    ) -> Result<Vec<DigestResult>> {
        let start = Instant::now();
        let label = pass_label(reporters);
        log::debug!("Starting {label} pass over {}", path.display());

        match self.stream(path, reporters, &label).await {
            Ok((digests, input_size)) => {
                let duration = start.elapsed();
                log::debug!(
                    "Finished {label} pass over {} ({input_size} bytes in {duration:?})",
                    path.display()
                );
                Ok(reporters
                    .iter()
                    .zip(digests)
                    .map(|(reporter, digest)| {
                        reporter.finished(&digest);
                        DigestResult {
                            algorithm: reporter.algorithm(),
                            digest,
                            input_size,
                            duration,
                        }
                    })
                    .collect())
            }
            Err(error) => {
                log::debug!("{label} pass over {} failed: {error}", path.display());
                for reporter in reporters {
                    reporter.failed(&error);
                }
                Err(error)
            }
        }
    }

    async fn stream(
        &self,
        path: &Path,
        reporters: &[SlotReporter<'_>],
        label: &str,
    ) -> Result<(Vec<String>, u64)> {
        let io_error = |e: std::io::Error| {
            Error::Io(IoError::from_std(e).with_path(path).with_algorithm(label))
        };

        let total = tokio::fs::metadata(path).await.map_err(io_error)?.len();
        let mut file = File::open(path).await.map_err(io_error)?;

        let mut hashers: Vec<Box<dyn StreamingHasher>> = reporters
            .iter()
            .map(|reporter| reporter.algorithm().to_impl().create_hasher())
            .collect();
        let mut buffer = vec![0u8; self.chunk_size];
        let mut consumed = 0u64;
        let mut reached_end = false;

        loop {
            if let Some(flag) = &self.cancellation
                && flag.is_cancelled()
            {
                return Err(Error::Internal(InternalError::cancelled(label)));
            }

            let n = file.read(&mut buffer).await.map_err(io_error)?;
            if n == 0 {
                break;
            }

            for hasher in hashers.iter_mut() {
                hasher.update(&buffer[..n]);
            }
            consumed += n as u64;

            reached_end = consumed >= total;
            for reporter in reporters {
                reporter.progress(consumed, total);
            }
        }

        // The last chunk already reported 100 unless the file shrank or is empty
        if !reached_end {
            for reporter in reporters {
                reporter.progress_done(consumed, total);
            }
        }

        let digests = hashers.into_iter().map(|hasher| hasher.finalize()).collect();
        Ok((digests, consumed))
    }
}

fn pass_label(reporters: &[SlotReporter<'_>]) -> String {
    reporters
        .iter()
        .map(|reporter| reporter.algorithm().display_name())
        .collect::<Vec<_>>()
        .join("+")
}
