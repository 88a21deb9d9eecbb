//! SHA-2 family implementations (SHA256, SHA384, SHA512)
//!
//! The three variants share one streaming hasher that is generic over the
//! `sha2` core type.

use crate::hashing::HashAlgorithm;
use crate::hashing::traits::{HashAlgorithmImpl, StreamingHasher};
use sha2::{Digest, Sha256, Sha384, Sha512};

pub struct Sha256Algorithm;
pub struct Sha384Algorithm;
pub struct Sha512Algorithm;

struct Sha2StreamingHasher<D> {
    hasher: D,
}

impl<D> StreamingHasher for Sha2StreamingHasher<D>
where
    D: Digest + Send,
    sha2::digest::Output<D>: std::fmt::LowerHex,
{
    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.hasher, data);
    }

    fn finalize(self: Box<Self>) -> String {
        format!("{:x}", self.hasher.finalize())
    }
}

impl HashAlgorithmImpl for Sha256Algorithm {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::SHA256
    }

    fn create_hasher(&self) -> Box<dyn StreamingHasher> {
        Box::new(Sha2StreamingHasher {
            hasher: Sha256::new(),
        })
    }
}

impl HashAlgorithmImpl for Sha384Algorithm {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::SHA384
    }

    fn create_hasher(&self) -> Box<dyn StreamingHasher> {
        Box::new(Sha2StreamingHasher {
            hasher: Sha384::new(),
        })
    }
}

impl HashAlgorithmImpl for Sha512Algorithm {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::SHA512
    }

    fn create_hasher(&self) -> Box<dyn StreamingHasher> {
        Box::new(Sha2StreamingHasher {
            hasher: Sha512::new(),
        })
    }
}
