//! Digest value with provenance and on-demand formatting

use crate::{Algorithm, HashError, Result, Salt};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Add;
use std::str::FromStr;
use subtle::ConstantTimeEq;

/// Immutable output of a hash operation.
///
/// Carries the raw bytes, the algorithm that produced them and the salt that was
/// appended or prepended to the input, if any. Equality and hashing look at the
/// raw bytes only.
#[derive(Clone)]
pub struct Digest {
    bytes: Vec<u8>,
    algorithm: Algorithm,
    appended_salt: Option<Salt>,
    prepended_salt: Option<Salt>,
}

impl Digest {
    pub(crate) fn from_parts(bytes: Vec<u8>, algorithm: Algorithm) -> Self {
        Self {
            bytes,
            algorithm,
            appended_salt: None,
            prepended_salt: None,
        }
    }

    pub(crate) fn with_salts(mut self, prepended: Option<Salt>, appended: Option<Salt>) -> Self {
        self.prepended_salt = prepended;
        self.appended_salt = appended;
        self
    }

    /// Decode a digest produced by `algorithm` from its hex form.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::InvalidHex`] for malformed hex and
    /// [`HashError::InvalidDigestLength`] when `algorithm` has a fixed output
    /// length that the decoded bytes do not match.
    pub fn from_hex(hex: &str, algorithm: Algorithm) -> Result<Self> {
        let bytes = hex::decode(hex)?;
        if let Some(expected) = algorithm.output_len() {
            if bytes.len() != expected {
                return Err(HashError::InvalidDigestLength {
                    algorithm: algorithm.name(),
                    expected,
                    actual: bytes.len(),
                });
            }
        }
        Ok(Self::from_parts(bytes, algorithm))
    }

    /// Raw digest bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the digest, returning its raw bytes
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Algorithm that produced the digest
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Salt appended to the input, as the caller supplied it
    #[must_use]
    pub fn appended_salt(&self) -> Option<&Salt> {
        self.appended_salt.as_ref()
    }

    /// Salt prepended to the input, as the caller supplied it
    #[must_use]
    pub fn prepended_salt(&self) -> Option<&Salt> {
        self.prepended_salt.as_ref()
    }

    /// Lowercase hex, two characters per byte, no separators
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Standard base64 with padding
    #[must_use]
    pub fn to_base64(&self) -> String {
        use base64::{engine::general_purpose, Engine as _};
        general_purpose::STANDARD.encode(&self.bytes)
    }

    /// Render the digest in the requested representation
    #[must_use]
    pub fn format(&self, kind: DigestFormat) -> FormattedDigest {
        match kind {
            DigestFormat::Bytes => FormattedDigest::Bytes(self.bytes.clone()),
            DigestFormat::ByteArray => FormattedDigest::ByteArray(self.bytes.clone().into_boxed_slice()),
            DigestFormat::String => FormattedDigest::String(self.to_hex()),
        }
    }

    /// Length in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the digest holds no bytes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl PartialEq for Digest {
    fn eq(&self, other: &Self) -> bool {
        self.bytes.as_slice().ct_eq(other.bytes.as_slice()).into()
    }
}

impl Eq for Digest {}

impl Hash for Digest {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl Add for &Digest {
    type Output = Digest;

    /// Byte-wise join. Keeps the algorithm when both sides agree, otherwise
    /// tags the result [`Algorithm::Invalid`]. Salt provenance is dropped.
    fn add(self, rhs: &Digest) -> Digest {
        let algorithm = if self.algorithm == rhs.algorithm {
            self.algorithm
        } else {
            Algorithm::Invalid
        };
        let mut bytes = Vec::with_capacity(self.bytes.len() + rhs.bytes.len());
        bytes.extend_from_slice(&self.bytes);
        bytes.extend_from_slice(&rhs.bytes);
        Digest::from_parts(bytes, algorithm)
    }
}

impl Add for Digest {
    type Output = Digest;

    fn add(self, rhs: Digest) -> Digest {
        &self + &rhs
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Digest> for Vec<u8> {
    fn from(digest: Digest) -> Self {
        digest.bytes
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Digest")
            .field("algorithm", &self.algorithm)
            .field("hex", &self.to_hex())
            .field("appended_salt", &self.appended_salt)
            .field("prepended_salt", &self.prepended_salt)
            .finish()
    }
}

/// Representation requested from [`Digest::format`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestFormat {
    /// Owned raw bytes
    Bytes,
    /// Fixed byte-sequence view
    ByteArray,
    /// Lowercase hex string
    String,
}

impl FromStr for DigestFormat {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bytes" | "data" => Ok(Self::Bytes),
            "bytearray" | "byte-array" | "array" => Ok(Self::ByteArray),
            "string" | "hex" => Ok(Self::String),
            _ => Err(HashError::unsupported_format(s)),
        }
    }
}

/// Output of [`Digest::format`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormattedDigest {
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Byte-sequence view
    ByteArray(Box<[u8]>),
    /// Lowercase hex
    String(String),
}
