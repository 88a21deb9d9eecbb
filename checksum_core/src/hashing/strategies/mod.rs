//! Scheduling strategies for digest passes
//!
//! - `SequentialStrategy`: one pass per algorithm, in request order
//! - `MultipleStrategy`: one read of the file feeding every accumulator
//! - `ParallelStrategy`: one task per algorithm, each with its own handle
//!
//! Every strategy returns results in request order and gives each slot its
//! own progress events.

use crate::engine::DigestEngine;
use crate::error::ValidationError;
use crate::hashing::{DigestResult, HashAlgorithm};
use crate::progress::{NullProvider, ProgressProvider};
use crate::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod multiple;
mod parallel;
mod sequential;

pub use multiple::MultipleStrategy;
pub use parallel::ParallelStrategy;
pub use sequential::SequentialStrategy;

/// Context information passed to hashing strategies
#[derive(Debug, Clone)]
pub struct HashingContext {
    /// Path to the file being hashed
    pub file_path: PathBuf,
    /// Size of the file in bytes at validation time
    pub file_size: u64,
    /// Algorithms to compute, one slot each
    pub algorithms: Vec<HashAlgorithm>,
}

/// Core trait for hash calculation strategies
#[async_trait]
pub trait HashingStrategy: Send + Sync {
    /// Strategy identifier for logging
    fn name(&self) -> &'static str;

    /// Execute the hashing strategy without progress reporting
    async fn execute(&self, context: HashingContext) -> Result<Vec<DigestResult>> {
        self.execute_with_progress(context, &NullProvider).await
    }

    /// Execute the hashing strategy with progress reporting
    async fn execute_with_progress(
        &self,
        context: HashingContext,
        progress_provider: &dyn ProgressProvider,
    ) -> Result<Vec<DigestResult>>;
}

/// Strategy selector used by configuration and the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Sequential,
    Multiple,
    Parallel,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::Sequential,
        StrategyKind::Multiple,
        StrategyKind::Parallel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Sequential => "sequential",
            StrategyKind::Multiple => "multiple",
            StrategyKind::Parallel => "parallel",
        }
    }

    /// Build the strategy around an engine
    pub fn build(self, engine: DigestEngine) -> Box<dyn HashingStrategy> {
        match self {
            StrategyKind::Sequential => Box::new(SequentialStrategy::new(engine)),
            StrategyKind::Multiple => Box::new(MultipleStrategy::new(engine)),
            StrategyKind::Parallel => Box::new(ParallelStrategy::new(engine)),
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::Validation(ValidationError::invalid_parameter(
                    "strategy",
                    &format!("'{s}' is not one of sequential, multiple, parallel"),
                ))
            })
    }
}

fn ensure_algorithms(context: &HashingContext) -> Result<()> {
    if context.algorithms.is_empty() {
        return Err(Error::Validation(ValidationError::NoAlgorithms));
    }
    Ok(())
}
