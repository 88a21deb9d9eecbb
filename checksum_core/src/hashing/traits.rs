//! Core traits for the hash algorithm implementations

use super::HashAlgorithm;
use std::sync::Arc;

/// Core trait that all hash algorithms must implement
pub trait HashAlgorithmImpl: Send + Sync {
    /// The closed-set identifier this implementation serves
    fn algorithm(&self) -> HashAlgorithm;

    /// Display name for user interfaces
    fn display_name(&self) -> &'static str {
        self.algorithm().display_name()
    }

    /// Create a new streaming hasher instance
    fn create_hasher(&self) -> Box<dyn StreamingHasher>;

    /// Calculate hash for in-memory data
    fn hash_bytes(&self, data: &[u8]) -> String {
        let mut hasher = self.create_hasher();
        hasher.update(data);
        hasher.finalize()
    }
}

/// Incremental hash accumulator fed one chunk at a time
pub trait StreamingHasher: Send {
    /// Update the hasher with new data
    fn update(&mut self, data: &[u8]);

    /// Finalize into a lowercase hexadecimal digest
    fn finalize(self: Box<Self>) -> String;
}

/// Resolves an algorithm identifier to its implementation
pub trait HashAlgorithmExt {
    /// Convert enum to trait implementation
    fn to_impl(&self) -> Arc<dyn HashAlgorithmImpl>;
}
