//! Multiple hash calculation strategy
//!
//! Calculates every requested digest in a single read of the file. Each slot
//! still receives its own progress events.

use super::{HashingContext, HashingStrategy, ensure_algorithms};
use crate::Result;
use crate::engine::DigestEngine;
use crate::hashing::DigestResult;
use crate::progress::{ProgressProvider, SlotReporter};
use async_trait::async_trait;

/// Multiple strategy - one shared read pass for all algorithms
pub struct MultipleStrategy {
    engine: DigestEngine,
}

impl MultipleStrategy {
    pub fn new(engine: DigestEngine) -> Self {
        Self { engine }
    }
}

impl Default for MultipleStrategy {
    fn default() -> Self {
        Self::new(DigestEngine::new())
    }
}

#[async_trait]
impl HashingStrategy for MultipleStrategy {
    fn name(&self) -> &'static str {
        "multiple"
    }

    async fn execute_with_progress(
        &self,
        context: HashingContext,
        progress_provider: &dyn ProgressProvider,
    ) -> Result<Vec<DigestResult>> {
        ensure_algorithms(&context)?;

        let reporters: Vec<SlotReporter<'_>> = context
            .algorithms
            .iter()
            .enumerate()
            .map(|(slot, &algorithm)| SlotReporter::new(slot, algorithm, progress_provider))
            .collect();

        self.engine
            .compute_digests_single_pass(&context.file_path, &reporters)
            .await
    }
}
