//! Supported hash algorithms and dispatch to their primitives

use crate::{Digest, HashError};
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::str::FromStr;

/// Process-wide keys for the platform hash. Stable for the life of the
/// process, different on every run.
static PLATFORM_HASHER: Lazy<RandomState> = Lazy::new(RandomState::new);

/// Closed set of hash algorithms a [`crate::Generator`] can use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// SHA-256, 32-byte output
    Sha256,
    /// SHA-384, 48-byte output
    Sha384,
    /// SHA-512, 64-byte output
    Sha512,
    /// SHA-1, 20-byte output
    Sha1,
    /// MD5, 16-byte output
    Md5,
    /// Non-cryptographic, per-process seeded platform hash.
    ///
    /// Output is the decimal text of a `u64` encoded as UTF-8, so its length
    /// varies. Values differ between runs of the program.
    PlatformDefault,
    /// Provenance sentinel for digests concatenated across algorithms.
    ///
    /// Never produced by hashing; computing a digest with it panics.
    Invalid,
}

impl Algorithm {
    /// Every algorithm that can compute a digest
    pub const ALL: [Algorithm; 6] = [
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
        Self::Sha1,
        Self::Md5,
        Self::PlatformDefault,
    ];

    /// Human-readable name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sha256 => "SHA256",
            Self::Sha384 => "SHA384",
            Self::Sha512 => "SHA512",
            Self::Sha1 => "SHA1",
            Self::Md5 => "MD5",
            Self::PlatformDefault => "PlatformDefault",
            Self::Invalid => "INVALID",
        }
    }

    /// Digest length in bytes, `None` for variable or undefined lengths
    #[must_use]
    pub const fn output_len(self) -> Option<usize> {
        match self {
            Self::Sha256 => Some(32),
            Self::Sha384 => Some(48),
            Self::Sha512 => Some(64),
            Self::Sha1 => Some(20),
            Self::Md5 => Some(16),
            Self::PlatformDefault | Self::Invalid => None,
        }
    }

    /// Whether the algorithm is backed by a cryptographic primitive
    #[must_use]
    pub const fn is_cryptographic(self) -> bool {
        self.output_len().is_some()
    }

    /// Hash `input` and wrap the output in a [`Digest`] tagged with `self`.
    ///
    /// # Panics
    ///
    /// Panics when called on [`Algorithm::Invalid`]; that is a bug in the caller.
    #[must_use]
    pub fn compute_digest(self, input: &[u8]) -> Digest {
        tracing::trace!(algorithm = self.name(), input_len = input.len(), "computing digest");
        let bytes = match self {
            Self::Sha256 => digest_of::<sha2::Sha256>(input),
            Self::Sha384 => digest_of::<sha2::Sha384>(input),
            Self::Sha512 => digest_of::<sha2::Sha512>(input),
            Self::Sha1 => digest_of::<sha1::Sha1>(input),
            Self::Md5 => digest_of::<md5::Md5>(input),
            Self::PlatformDefault => return platform_digest(platform_hash(input)),
            Self::Invalid => panic!(
                "digest computation requested with the {} sentinel algorithm",
                self.name()
            ),
        };
        Digest::from_parts(bytes, self)
    }
}

fn digest_of<D: digest::Digest>(input: &[u8]) -> Vec<u8> {
    D::digest(input).to_vec()
}

/// Platform hash of `value` under the process-wide keys
pub fn platform_hash<T: Hash + ?Sized>(value: &T) -> u64 {
    PLATFORM_HASHER.hash_one(value)
}

/// Hasher keyed like [`platform_hash`], for mixing several inputs
pub(crate) fn platform_hasher() -> <RandomState as BuildHasher>::Hasher {
    PLATFORM_HASHER.build_hasher()
}

/// Wrap a platform hash value as a `PlatformDefault` digest
pub(crate) fn platform_digest(hash: u64) -> Digest {
    Digest::from_parts(hash.to_string().into_bytes(), Algorithm::PlatformDefault)
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = HashError;

    /// Case-insensitive; `-` and `_` are ignored, so `SHA-256` and `sha_256`
    /// both parse. The sentinel is not accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            "sha1" => Ok(Self::Sha1),
            "md5" => Ok(Self::Md5),
            "platformdefault" | "platform" => Ok(Self::PlatformDefault),
            _ => Err(HashError::unsupported_algorithm(s)),
        }
    }
}

impl Serialize for Algorithm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if *self == Self::Invalid {
            return Err(serde::ser::Error::custom(
                "the INVALID sentinel algorithm cannot be serialized",
            ));
        }
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Algorithm {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
