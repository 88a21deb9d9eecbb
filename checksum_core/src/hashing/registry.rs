//! Central registry for hash algorithm implementations

use super::HashAlgorithm;
use super::traits::HashAlgorithmImpl;
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Registry holding one implementation per supported algorithm
///
/// Slots are indexed by [`HashAlgorithm::index`], so every member of the
/// closed set always resolves.
pub struct AlgorithmRegistry {
    algorithms: Vec<Arc<dyn HashAlgorithmImpl>>,
}

impl AlgorithmRegistry {
    fn new() -> Self {
        let algorithms = HashAlgorithm::ALL
            .iter()
            .map(|&algorithm| super::algorithms::implementation(algorithm))
            .collect();
        Self { algorithms }
    }

    /// Get the global registry instance
    pub fn global() -> &'static Self {
        static INSTANCE: OnceCell<AlgorithmRegistry> = OnceCell::new();
        INSTANCE.get_or_init(Self::new)
    }

    /// Get the implementation for an algorithm
    pub fn get(&self, algorithm: HashAlgorithm) -> Arc<dyn HashAlgorithmImpl> {
        Arc::clone(&self.algorithms[algorithm.index()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_algorithm_resolves_to_itself() {
        let registry = AlgorithmRegistry::global();
        for algorithm in HashAlgorithm::ALL {
            assert_eq!(registry.get(algorithm).algorithm(), algorithm);
        }
    }
}
