//! Hash algorithm identifiers, digest results, and scheduling strategies
//!
//! The supported algorithms form a closed set. Anything outside it is
//! rejected while parsing, before a file is ever opened.

use crate::{Error, Result, error::ValidationError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

mod algorithms;
mod registry;
pub mod strategies;
mod traits;

pub use registry::AlgorithmRegistry;
pub use strategies::{
    HashingContext, HashingStrategy, MultipleStrategy, ParallelStrategy, SequentialStrategy,
    StrategyKind,
};
pub use traits::{HashAlgorithmExt, HashAlgorithmImpl, StreamingHasher};

/// Hash algorithms supported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-1 (160-bit)
    SHA1,
    /// SHA-256
    SHA256,
    /// SHA-384
    SHA384,
    /// SHA-512
    SHA512,
    /// MD5 (128-bit)
    MD5,
}

impl HashAlgorithm {
    /// Every supported algorithm, in canonical order
    pub const ALL: [HashAlgorithm; 5] = [
        HashAlgorithm::SHA1,
        HashAlgorithm::SHA256,
        HashAlgorithm::SHA384,
        HashAlgorithm::SHA512,
        HashAlgorithm::MD5,
    ];

    /// Lowercase identifier used on the command line and in config files
    pub fn id(self) -> &'static str {
        match self {
            HashAlgorithm::SHA1 => "sha1",
            HashAlgorithm::SHA256 => "sha256",
            HashAlgorithm::SHA384 => "sha384",
            HashAlgorithm::SHA512 => "sha512",
            HashAlgorithm::MD5 => "md5",
        }
    }

    /// Uppercase label used in progress lines
    pub fn display_name(self) -> &'static str {
        match self {
            HashAlgorithm::SHA1 => "SHA1",
            HashAlgorithm::SHA256 => "SHA256",
            HashAlgorithm::SHA384 => "SHA384",
            HashAlgorithm::SHA512 => "SHA512",
            HashAlgorithm::MD5 => "MD5",
        }
    }

    /// Length of the hex digest in characters
    pub fn hex_len(self) -> usize {
        match self {
            HashAlgorithm::SHA1 => 40,
            HashAlgorithm::SHA256 => 64,
            HashAlgorithm::SHA384 => 96,
            HashAlgorithm::SHA512 => 128,
            HashAlgorithm::MD5 => 32,
        }
    }

    /// Position in [`HashAlgorithm::ALL`]
    pub(crate) fn index(self) -> usize {
        match self {
            HashAlgorithm::SHA1 => 0,
            HashAlgorithm::SHA256 => 1,
            HashAlgorithm::SHA384 => 2,
            HashAlgorithm::SHA512 => 3,
            HashAlgorithm::MD5 => 4,
        }
    }

    /// Parse an ordered list of identifiers
    ///
    /// Repeats are kept, order is preserved, and the first unknown
    /// identifier fails the whole list.
    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> Result<Vec<HashAlgorithm>> {
        if names.is_empty() {
            return Err(Error::Validation(ValidationError::NoAlgorithms));
        }
        names.iter().map(|name| name.as_ref().parse()).collect()
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sha1" => Ok(HashAlgorithm::SHA1),
            "sha256" => Ok(HashAlgorithm::SHA256),
            "sha384" => Ok(HashAlgorithm::SHA384),
            "sha512" => Ok(HashAlgorithm::SHA512),
            "md5" => Ok(HashAlgorithm::MD5),
            _ => Err(Error::Validation(ValidationError::invalid_algorithm(s))),
        }
    }
}

impl HashAlgorithmExt for HashAlgorithm {
    fn to_impl(&self) -> Arc<dyn HashAlgorithmImpl> {
        AlgorithmRegistry::global().get(*self)
    }
}

/// Final digest of one algorithm over one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestResult {
    pub algorithm: HashAlgorithm,
    /// Lowercase hexadecimal digest
    pub digest: String,
    /// Number of bytes fed into the accumulator
    pub input_size: u64,
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
