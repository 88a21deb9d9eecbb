//! Parallel hash calculation strategy
//!
//! Spawns one tokio task per algorithm. Each task opens its own handle on the
//! file and reports only to its own slot through a child provider.

use super::{HashingContext, HashingStrategy, ensure_algorithms};
use crate::engine::DigestEngine;
use crate::error::InternalError;
use crate::hashing::{DigestResult, HashAlgorithm};
use crate::progress::{ProgressProvider, ProgressUpdate, SlotReporter};
use crate::{Error, Result};
use async_trait::async_trait;
use futures::future::try_join_all;
use tokio::task::AbortHandle;

const ABORTED: &str = "aborted";

/// Parallel strategy - one task per algorithm
pub struct ParallelStrategy {
    engine: DigestEngine,
}

impl ParallelStrategy {
    pub fn new(engine: DigestEngine) -> Self {
        Self { engine }
    }
}

impl Default for ParallelStrategy {
    fn default() -> Self {
        Self::new(DigestEngine::new())
    }
}

#[async_trait]
impl HashingStrategy for ParallelStrategy {
    fn name(&self) -> &'static str {
        "parallel"
    }

    async fn execute_with_progress(
        &self,
        context: HashingContext,
        progress_provider: &dyn ProgressProvider,
    ) -> Result<Vec<DigestResult>> {
        ensure_algorithms(&context)?;

        let workers: Vec<_> = context
            .algorithms
            .iter()
            .enumerate()
            .map(|(slot, &algorithm)| {
                let engine = self.engine.clone();
                let path = context.file_path.clone();
                let provider = progress_provider.create_child(algorithm.id());
                tokio::spawn(async move {
                    let reporter = SlotReporter::new(slot, algorithm, provider.as_ref());
                    engine.compute_digest(&path, &reporter).await
                })
            })
            .collect();

        let abort_handles: Vec<_> = workers.iter().map(|w| w.abort_handle()).collect();

        let outcome = try_join_all(workers.into_iter().zip(&context.algorithms).map(
            |(worker, algorithm)| async move {
                match worker.await {
                    Ok(result) => result,
                    Err(e) => Err(Error::Internal(InternalError::task_failed(
                        algorithm.id(),
                        e.to_string(),
                    ))),
                }
            },
        ))
        .await;

        // The first failure aborts the session, so stop the remaining passes
        if outcome.is_err() {
            abort_unfinished(&abort_handles, &context.algorithms, progress_provider);
        }
        outcome
    }
}

/// Abort passes that are still running and mark their slots failed
fn abort_unfinished(
    handles: &[AbortHandle],
    algorithms: &[HashAlgorithm],
    provider: &dyn ProgressProvider,
) {
    for (slot, (handle, &algorithm)) in handles.iter().zip(algorithms).enumerate() {
        if handle.is_finished() {
            continue;
        }
        handle.abort();
        log::debug!("Aborted {} pass in slot {slot}", algorithm.display_name());
        provider.report(ProgressUpdate::HashFailed {
            slot,
            algorithm,
            message: ABORTED.to_string(),
        });
    }
}
