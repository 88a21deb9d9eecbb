//! SHA1 hash algorithm implementation

use crate::hashing::HashAlgorithm;
use crate::hashing::traits::{HashAlgorithmImpl, StreamingHasher};
use sha1::{Digest as Sha1Digest, Sha1};

pub struct Sha1Algorithm;

/// SHA1 streaming hasher
struct Sha1StreamingHasher {
    hasher: Sha1,
}

impl StreamingHasher for Sha1StreamingHasher {
    fn update(&mut self, data: &[u8]) {
        Sha1Digest::update(&mut self.hasher, data);
    }

    fn finalize(self: Box<Self>) -> String {
        format!("{:x}", Sha1Digest::finalize(self.hasher))
    }
}

impl HashAlgorithmImpl for Sha1Algorithm {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::SHA1
    }

    fn create_hasher(&self) -> Box<dyn StreamingHasher> {
        Box::new(Sha1StreamingHasher {
            hasher: Sha1::new(),
        })
    }
}
