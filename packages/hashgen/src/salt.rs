//! Salt values and random salt generation

use crate::random::{random_bytes, RandomByteSource};
use crate::Algorithm;
use once_cell::sync::OnceCell;
use uuid::Uuid;

/// Pad character for string salts, fixed once per process
static PAD_CHARACTER: OnceCell<char> = OnceCell::new();

/// Salt material, recorded in the representation it was supplied in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Salt {
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Fixed byte sequence
    ByteArray(Box<[u8]>),
    /// Text, mixed into the input as its UTF-8 bytes
    Text(String),
}

impl Salt {
    /// Bytes mixed into the hash input
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Bytes(bytes) => bytes,
            Self::ByteArray(bytes) => bytes,
            Self::Text(text) => text.as_bytes(),
        }
    }

    /// Representation of this salt
    #[must_use]
    pub fn kind(&self) -> SaltKind {
        match self {
            Self::Bytes(_) => SaltKind::Bytes,
            Self::ByteArray(_) => SaltKind::ByteArray,
            Self::Text(_) => SaltKind::String,
        }
    }

    /// Length of the mixed-in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Whether the salt contributes no bytes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl From<Vec<u8>> for Salt {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for Salt {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for Salt {
    fn from(bytes: [u8; N]) -> Self {
        Self::ByteArray(Box::new(bytes))
    }
}

impl From<Box<[u8]>> for Salt {
    fn from(bytes: Box<[u8]>) -> Self {
        Self::ByteArray(bytes)
    }
}

impl From<String> for Salt {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Salt {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl AsRef<[u8]> for Salt {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Representation requested from [`SaltGenerator::generate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaltKind {
    /// `length` random bytes
    Bytes,
    /// `length` random bytes as a fixed sequence
    ByteArray,
    /// `length` lowercase hex characters derived from random bytes
    String,
}

/// Builds random salts from a [`RandomByteSource`]
#[derive(Default)]
pub struct SaltGenerator {
    source: RandomByteSource,
}

impl SaltGenerator {
    /// Generator over the standard random chain
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator over a caller-supplied random source
    #[must_use]
    pub fn with_source(source: RandomByteSource) -> Self {
        Self { source }
    }

    /// Generate a salt.
    ///
    /// For [`SaltKind::String`] `length` counts characters, otherwise bytes.
    pub fn generate(&mut self, length: usize, kind: SaltKind) -> Salt {
        shape_salt(self.source.generate(length), length, kind)
    }
}

/// Generate a salt through this thread's standard random chain
#[must_use]
pub fn generate_salt(length: usize, kind: SaltKind) -> Salt {
    shape_salt(random_bytes(length), length, kind)
}

fn shape_salt(bytes: Vec<u8>, length: usize, kind: SaltKind) -> Salt {
    match kind {
        SaltKind::Bytes => Salt::Bytes(bytes),
        SaltKind::ByteArray => Salt::ByteArray(bytes.into_boxed_slice()),
        SaltKind::String => Salt::Text(fit_to_length(hex::encode(bytes), length)),
    }
}

/// Character used to pad string salts.
///
/// Picked once per process: a random hex digit of the SHA-256 of a random
/// UUID. The value carries no security weight.
pub fn pad_character() -> char {
    *PAD_CHARACTER.get_or_init(|| {
        let seed = Uuid::new_v4();
        let hex = Algorithm::Sha256.compute_digest(seed.as_bytes()).to_hex();
        let index = usize::from(random_bytes(1).first().copied().unwrap_or_default()) % hex.len();
        let pad = char::from(hex.as_bytes()[index]);
        tracing::trace!("string salt pad character initialised");
        pad
    })
}

/// Cut or pad an ASCII hex string to exactly `length` characters
fn fit_to_length(mut hex: String, length: usize) -> String {
    if hex.len() >= length {
        hex.truncate(length);
    } else {
        let missing = length - hex.len();
        hex.extend(std::iter::repeat_n(pad_character(), missing));
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_byte_kinds_have_requested_length() {
        for length in [0, 1, 16, 33] {
            let bytes = generate_salt(length, SaltKind::Bytes);
            let array = generate_salt(length, SaltKind::ByteArray);
            assert_eq!(bytes.len(), length);
            assert_eq!(array.len(), length);
            assert_eq!(bytes.kind(), SaltKind::Bytes);
            assert_eq!(array.kind(), SaltKind::ByteArray);
        }
    }

    #[test]
    fn test_string_salt_is_lowercase_hex() {
        let salt = generate_salt(40, SaltKind::String);
        let Salt::Text(text) = &salt else {
            panic!("expected text salt, got {salt:?}");
        };
        assert_eq!(text.chars().count(), 40);
        assert!(text.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn test_generated_salts_are_unique() {
        let seen: HashSet<Vec<u8>> = (0..1000)
            .map(|_| generate_salt(16, SaltKind::Bytes).as_bytes().to_vec())
            .collect();
        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn test_pad_character_is_stable_hex() {
        let pad = pad_character();
        assert!(pad.is_ascii_hexdigit());
        assert!(!pad.is_ascii_uppercase());
        assert_eq!(pad, pad_character());
    }

    #[test]
    fn test_fit_to_length_truncates_and_pads() {
        assert_eq!(fit_to_length("abcdef".to_owned(), 3), "abc");
        assert_eq!(fit_to_length("abc".to_owned(), 3), "abc");

        let padded = fit_to_length("ab".to_owned(), 5);
        let pad = pad_character().to_string();
        assert_eq!(padded, format!("ab{}", pad.repeat(3)));
    }

    #[test]
    fn test_from_impls_record_representation() {
        assert_eq!(Salt::from(vec![1u8, 2]).kind(), SaltKind::Bytes);
        assert_eq!(Salt::from(&[1u8, 2][..]).kind(), SaltKind::Bytes);
        assert_eq!(Salt::from([1u8, 2]).kind(), SaltKind::ByteArray);
        assert_eq!(Salt::from("pepper").kind(), SaltKind::String);
        assert_eq!(Salt::from("pepper").as_bytes(), b"pepper");
        assert!(Salt::from(String::new()).is_empty());
    }

    proptest! {
        #[test]
        fn prop_string_salt_has_exact_char_length(length in 1usize..512) {
            let salt = generate_salt(length, SaltKind::String);
            prop_assert_eq!(salt.kind(), SaltKind::String);
            prop_assert_eq!(salt.len(), length);
        }
    }
}
