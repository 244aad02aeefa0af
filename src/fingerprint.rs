//! Content fingerprints for response bodies and favicons.
//!
//! Cryptographic digests (MD5, SHA-1, SHA-256) identify body content for
//! dedup and integrity comparison. The fast 32-bit hash is only meant for
//! comparing favicons across hosts.

use std::fmt;
use std::str::FromStr;

use md5::Md5;
use serde::Serialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use thiserror::Error;
use xxhash_rust::xxh32::xxh32;

/// Seed for the fast favicon hash. Fixed so hashes compare across runs.
const FAST_HASH_SEED: u32 = 0;

/// Errors raised while selecting a fingerprint algorithm.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FingerprintError {
    /// The requested algorithm name is not one of the supported set.
    #[error("unsupported hash algorithm '{name}' (expected one of: md5, sha1, sha256, fast)")]
    UnsupportedAlgorithm {
        /// The name that was requested.
        name: String,
    },
}

/// Supported fingerprint algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashAlgorithm {
    /// 128-bit MD5 hex digest. Default for body content.
    #[default]
    Md5,
    /// 160-bit SHA-1 hex digest.
    Sha1,
    /// 256-bit SHA-256 hex digest.
    Sha256,
    /// 32-bit xxHash32 integer, used for favicons.
    Fast,
}

impl HashAlgorithm {
    /// Returns the stable lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Fast => "fast",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = FingerprintError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            "fast" | "xxh32" => Ok(Self::Fast),
            _ => Err(FingerprintError::UnsupportedAlgorithm {
                name: name.to_string(),
            }),
        }
    }
}

/// A computed fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum HashValue {
    /// Lowercase hex digest from a cryptographic algorithm.
    Hex(String),
    /// Integer digest from the fast algorithm.
    Int(u32),
}

impl fmt::Display for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hex(digest) => f.write_str(digest),
            Self::Int(value) => write!(f, "{value}"),
        }
    }
}

impl HashValue {
    /// Renders the digest as lowercase hex; the fast hash is zero-padded to 8 digits.
    #[must_use]
    pub fn to_hex(&self) -> String {
        match self {
            Self::Hex(digest) => digest.clone(),
            Self::Int(value) => format!("{value:08x}"),
        }
    }
}

/// Hashes `content` with the given algorithm.
///
/// Deterministic for identical input; never touches anything but its
/// arguments.
#[must_use]
pub fn hash(content: &[u8], algorithm: HashAlgorithm) -> HashValue {
    match algorithm {
        HashAlgorithm::Md5 => HashValue::Hex(hex::encode(Md5::digest(content))),
        HashAlgorithm::Sha1 => HashValue::Hex(hex::encode(Sha1::digest(content))),
        HashAlgorithm::Sha256 => HashValue::Hex(hex::encode(Sha256::digest(content))),
        HashAlgorithm::Fast => HashValue::Int(fast_hash(content)),
    }
}

/// 32-bit xxHash32 of `content`, the integer form of [`HashAlgorithm::Fast`].
#[must_use]
pub fn fast_hash(content: &[u8]) -> u32 {
    xxh32(content, FAST_HASH_SEED)
}

/// Hashes `content` with an algorithm given by name.
///
/// # Errors
///
/// Returns [`FingerprintError::UnsupportedAlgorithm`] when `algorithm` is
/// not a supported name.
pub fn hash_named(content: &[u8], algorithm: &str) -> Result<HashValue, FingerprintError> {
    Ok(hash(content, algorithm.parse()?))
}
