//! Core API module for the checksum library
//!
//! [`ChecksumClient`] is the orchestrator: it validates input, opens a
//! progress session, and hands the file to the configured strategy.

use crate::{
    ClientConfig, Error, HashAlgorithm, Result,
    engine::{CancellationFlag, DigestEngine},
    error::ValidationError,
    file_io::inspect_file,
    hashing::{DigestResult, HashingContext},
    progress::{ProgressProvider, ProgressUpdate},
    verify::{Verification, Verifier},
};
use std::path::Path;

/// Entry point for generating and verifying file digests
///
/// # Examples
///
/// ```no_run
/// use checksum_core::{ChecksumClient, ClientConfig, HashAlgorithm, NullProvider};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ChecksumClient::new(ClientConfig::default())?;
/// let results = client
///     .generate(
///         Path::new("disk.img"),
///         &[HashAlgorithm::SHA256, HashAlgorithm::MD5],
///         &NullProvider,
///     )
///     .await?;
/// for result in results {
///     println!("{}: {}", result.algorithm, result.digest);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ChecksumClient {
    config: ClientConfig,
    engine: DigestEngine,
}

impl ChecksumClient {
    /// Create a client, validating the chunk size
    pub fn new(config: ClientConfig) -> Result<Self> {
        let engine = DigestEngine::with_chunk_size(config.chunk_size)?;
        Ok(Self { config, engine })
    }

    /// Abort running passes when `flag` is raised
    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.engine = self.engine.with_cancellation(flag);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Compute every requested digest of `path`
    ///
    /// Results are in request order. The file is validated before any
    /// progress is reported, and the first failed pass aborts the session.
    pub async fn generate(
        &self,
        path: &Path,
        algorithms: &[HashAlgorithm],
        provider: &dyn ProgressProvider,
    ) -> Result<Vec<DigestResult>> {
        if algorithms.is_empty() {
            return Err(Error::Validation(ValidationError::NoAlgorithms));
        }

        let file = inspect_file(path).await?;
        let strategy = self.config.strategy.build(self.engine.clone());
        log::debug!(
            "Generating {} digest(s) for {} with the {} strategy",
            algorithms.len(),
            file.path.display(),
            strategy.name()
        );

        provider.report(ProgressUpdate::SessionStarted {
            path: file.path.clone(),
            total_bytes: file.size,
            algorithms: algorithms.to_vec(),
        });

        let context = HashingContext {
            file_path: file.path,
            file_size: file.size,
            algorithms: algorithms.to_vec(),
        };
        let results = strategy.execute_with_progress(context, provider).await;
        provider.complete();
        results
    }

    /// Parse algorithm identifiers, then [`generate`](Self::generate)
    ///
    /// An unknown identifier is rejected before the file is touched.
    pub async fn generate_from_names<S: AsRef<str>>(
        &self,
        path: &Path,
        names: &[S],
        provider: &dyn ProgressProvider,
    ) -> Result<Vec<DigestResult>> {
        let algorithms = HashAlgorithm::parse_list(names)?;
        self.generate(path, &algorithms, provider).await
    }

    /// Compute one digest and compare it with `expected`
    pub async fn verify(
        &self,
        path: &Path,
        expected: &str,
        algorithm: HashAlgorithm,
        provider: &dyn ProgressProvider,
    ) -> Result<Verification> {
        Verifier::new(self.engine.clone())
            .verify(path, expected, algorithm, provider)
            .await
    }

    /// Parse the algorithm identifier, then [`verify`](Self::verify)
    pub async fn verify_from_names(
        &self,
        path: &Path,
        expected: &str,
        algorithm: &str,
        provider: &dyn ProgressProvider,
    ) -> Result<Verification> {
        let algorithm = algorithm.parse()?;
        self.verify(path, expected, algorithm, provider).await
    }
}
