//! MD5 hash algorithm implementation

use crate::hashing::HashAlgorithm;
use crate::hashing::traits::{HashAlgorithmImpl, StreamingHasher};
use md5::{Digest as Md5Digest, Md5};

pub struct Md5Algorithm;

/// MD5 streaming hasher
struct Md5StreamingHasher {
    hasher: Md5,
}

impl Md5StreamingHasher {
    fn new() -> Self {
        Self { hasher: Md5::new() }
    }
}

impl StreamingHasher for Md5StreamingHasher {
    fn update(&mut self, data: &[u8]) {
        Md5Digest::update(&mut self.hasher, data);
    }

    fn finalize(self: Box<Self>) -> String {
        format!("{:x}", Md5Digest::finalize(self.hasher))
    }
}

impl HashAlgorithmImpl for Md5Algorithm {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::MD5
    }

    fn create_hasher(&self) -> Box<dyn StreamingHasher> {
        Box::new(Md5StreamingHasher::new())
    }
}
