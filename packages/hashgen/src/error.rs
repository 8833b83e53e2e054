//! Error types for digest generation and random byte sources

use thiserror::Error;

/// Recoverable errors surfaced to callers of the generator
#[derive(Debug, Error)]
pub enum HashError {
    /// Text input supplied as raw bytes was not valid UTF-8
    #[error("Input is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// An algorithm name did not match any supported algorithm
    #[error("Unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// A digest format token did not match any supported format
    #[error("Unsupported digest format: {0}")]
    UnsupportedFormat(String),

    /// A digest could not be decoded from its hex form
    #[error("Invalid hex digest: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// A decoded digest does not have the algorithm's output length
    #[error("Invalid digest length for {algorithm}: expected {expected}, got {actual}")]
    InvalidDigestLength {
        /// Name of the algorithm the digest was decoded for
        algorithm: &'static str,
        /// Output length of that algorithm in bytes
        expected: usize,
        /// Length of the decoded bytes
        actual: usize,
    },
}

impl HashError {
    /// Create an `UnsupportedAlgorithm` error
    #[must_use]
    pub fn unsupported_algorithm(name: impl Into<String>) -> Self {
        Self::UnsupportedAlgorithm(name.into())
    }

    /// Create an `UnsupportedFormat` error
    #[must_use]
    pub fn unsupported_format(token: impl Into<String>) -> Self {
        Self::UnsupportedFormat(token.into())
    }
}

/// Failure of a single entropy source.
///
/// Never reaches callers of [`crate::RandomByteSource::generate`]; the fallback
/// chain absorbs it.
#[derive(Debug, Error)]
pub enum EntropyError {
    /// The source is unavailable or failed to produce bytes
    #[error("Entropy source {source_name} not available: {reason}")]
    EntropyNotAvailable {
        /// Name of the failing source
        source_name: &'static str,
        /// Underlying failure description
        reason: String,
    },
}

impl EntropyError {
    /// Create an `EntropyNotAvailable` error for the named source
    #[must_use]
    pub fn not_available(source_name: &'static str, reason: impl ToString) -> Self {
        Self::EntropyNotAvailable {
            source_name,
            reason: reason.to_string(),
        }
    }
}

/// Result type for hashing operations
pub type Result<T> = std::result::Result<T, HashError>;
