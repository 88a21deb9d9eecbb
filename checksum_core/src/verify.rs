//! Digest verification
//!
//! Computes one digest and compares it with a user supplied value. A
//! mismatch is a normal outcome, reported through [`Verification::matched`];
//! only failures to compute the digest are errors.

use crate::engine::DigestEngine;
use crate::error::ValidationError;
use crate::file_io::inspect_file;
use crate::hashing::{DigestResult, HashAlgorithm};
use crate::progress::{ProgressProvider, ProgressUpdate, SlotReporter};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Outcome of comparing a computed digest with an expected one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    pub algorithm: HashAlgorithm,
    /// Expected digest exactly as supplied
    pub expected: String,
    pub computed: DigestResult,
    pub matched: bool,
}

/// Compare two hex digests ignoring case and surrounding whitespace
pub fn digests_match(expected: &str, computed: &str) -> bool {
    let expected = expected.trim();
    let computed = computed.trim();
    expected.len() == computed.len() && expected.eq_ignore_ascii_case(computed)
}

/// Runs single-algorithm digest passes for comparison
#[derive(Debug, Clone, Default)]
pub struct Verifier {
    engine: DigestEngine,
}

impl Verifier {
    pub fn new(engine: DigestEngine) -> Self {
        Self { engine }
    }

    /// Digest `path` with `algorithm` and compare against `expected`
    pub async fn verify(
        &self,
        path: &Path,
        expected: &str,
        algorithm: HashAlgorithm,
        provider: &dyn ProgressProvider,
    ) -> Result<Verification> {
        if expected.trim().is_empty() {
            return Err(Error::Validation(ValidationError::EmptyChecksum));
        }

        let file = inspect_file(path).await?;
        provider.report(ProgressUpdate::SessionStarted {
            path: file.path.clone(),
            total_bytes: file.size,
            algorithms: vec![algorithm],
        });

        let reporter = SlotReporter::new(0, algorithm, provider);
        let computed = self.engine.compute_digest(&file.path, &reporter).await;
        provider.complete();
        let computed = computed?;

        let matched = digests_match(expected, &computed.digest);
        log::debug!(
            "Verification of {} with {algorithm}: {}",
            path.display(),
            if matched { "match" } else { "mismatch" }
        );

        Ok(Verification {
            algorithm,
            expected: expected.to_string(),
            computed,
            matched,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullProvider;
    use tempfile::TempDir;

    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn test_digests_match_ignores_case() {
        assert!(digests_match("ABC123", "abc123"));
        assert!(digests_match(" abc123\n", "abc123"));
        assert!(!digests_match("abc12", "abc123"));
        assert!(!digests_match("abc124", "abc123"));
    }

    #[tokio::test]
    async fn test_verify_match_and_mismatch() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("abc.txt");
        std::fs::write(&path, b"abc").unwrap();
        let verifier = Verifier::default();

        let upper = ABC_SHA256.to_uppercase();
        let outcome = verifier
            .verify(&path, &upper, HashAlgorithm::SHA256, &NullProvider)
            .await
            .unwrap();
        assert!(outcome.matched);
        assert_eq!(outcome.computed.digest, ABC_SHA256);
        assert_eq!(outcome.expected, upper);

        let outcome = verifier
            .verify(&path, "00", HashAlgorithm::SHA256, &NullProvider)
            .await
            .unwrap();
        assert!(!outcome.matched);
    }

    #[tokio::test]
    async fn test_verify_propagates_missing_file() {
        let dir = TempDir::new().unwrap();
        let error = Verifier::default()
            .verify(
                &dir.path().join("nope"),
                ABC_SHA256,
                HashAlgorithm::SHA256,
                &NullProvider,
            )
            .await
            .unwrap_err();
        assert!(error.is_file_not_accessible());
    }

    #[tokio::test]
    async fn test_verify_rejects_empty_expected() {
        let error = Verifier::default()
            .verify(Path::new("unused"), "  ", HashAlgorithm::MD5, &NullProvider)
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            Error::Validation(ValidationError::EmptyChecksum)
        ));
    }
}
