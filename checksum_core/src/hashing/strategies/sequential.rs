//! Sequential hash calculation strategy
//!
//! One stream and one accumulator at a time, in request order. A failed pass
//! aborts the session; later slots stay queued.

use super::{HashingContext, HashingStrategy, ensure_algorithms};
use crate::Result;
use crate::engine::DigestEngine;
use crate::hashing::DigestResult;
use crate::progress::{ProgressProvider, SlotReporter};
use async_trait::async_trait;

/// Sequential strategy - one pass per algorithm
pub struct SequentialStrategy {
    engine: DigestEngine,
}

impl SequentialStrategy {
    pub fn new(engine: DigestEngine) -> Self {
        Self { engine }
    }
}

impl Default for SequentialStrategy {
    fn default() -> Self {
        Self::new(DigestEngine::new())
    }
}

#[async_trait]
impl HashingStrategy for SequentialStrategy {
    fn name(&self) -> &'static str {
        "sequential"
    }

    async fn execute_with_progress(
        &self,
        context: HashingContext,
        progress_provider: &dyn ProgressProvider,
    ) -> Result<Vec<DigestResult>> {
        ensure_algorithms(&context)?;

        let mut results = Vec::with_capacity(context.algorithms.len());
        for (slot, &algorithm) in context.algorithms.iter().enumerate() {
            let reporter = SlotReporter::new(slot, algorithm, progress_provider);
            results.push(
                self.engine
                    .compute_digest(&context.file_path, &reporter)
                    .await?,
            );
        }
        Ok(results)
    }
}
