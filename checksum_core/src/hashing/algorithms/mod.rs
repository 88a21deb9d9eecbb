//! Hash algorithm implementations

use super::HashAlgorithm;
use super::traits::HashAlgorithmImpl;
use std::sync::Arc;

mod md5;
mod sha1;
mod sha2;

/// Build the implementation backing an algorithm identifier
pub(crate) fn implementation(algorithm: HashAlgorithm) -> Arc<dyn HashAlgorithmImpl> {
    match algorithm {
        HashAlgorithm::SHA1 => Arc::new(sha1::Sha1Algorithm),
        HashAlgorithm::SHA256 => Arc::new(sha2::Sha256Algorithm),
        HashAlgorithm::SHA384 => Arc::new(sha2::Sha384Algorithm),
        HashAlgorithm::SHA512 => Arc::new(sha2::Sha512Algorithm),
        HashAlgorithm::MD5 => Arc::new(md5::Md5Algorithm),
    }
}
