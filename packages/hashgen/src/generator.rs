//! Stateful digest generator with one-shot salt staging
//!
//! Salt staged with [`Generator::append_salt`] or [`Generator::prepend_salt`]
//! applies to exactly the next hash call, whichever `hash_*` method it is, and
//! is cleared by that call.
//!
//! A `Generator` is plain mutable state. Share it across threads only behind a
//! lock, or use one instance per thread.

use crate::algorithm::{platform_digest, platform_hash, platform_hasher};
use crate::salt::{generate_salt, Salt, SaltKind};
use crate::{Algorithm, Digest, Result};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::hash::{Hash, Hasher};

/// Values hashed through their in-memory byte representation.
///
/// Bytes are native-endian, so digests of these values are only reproducible
/// on machines with the same layout.
pub trait RawLayout {
    /// Native in-memory bytes of the value
    fn raw_bytes(&self) -> Vec<u8>;
}

macro_rules! impl_raw_layout {
    ($($ty:ty),* $(,)?) => {
        $(
            impl RawLayout for $ty {
                fn raw_bytes(&self) -> Vec<u8> {
                    self.to_ne_bytes().to_vec()
                }
            }
        )*
    };
}

impl_raw_layout!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

impl RawLayout for bool {
    fn raw_bytes(&self) -> Vec<u8> {
        vec![u8::from(*self)]
    }
}

impl RawLayout for char {
    fn raw_bytes(&self) -> Vec<u8> {
        u32::from(*self).to_ne_bytes().to_vec()
    }
}

impl<T: RawLayout, const N: usize> RawLayout for [T; N] {
    fn raw_bytes(&self) -> Vec<u8> {
        self.iter().flat_map(RawLayout::raw_bytes).collect()
    }
}

/// Which salts are staged when a hash call begins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaltState {
    /// Input is hashed unchanged
    NoPending,
    /// `input ++ append`
    AppendOnly,
    /// `prepend ++ input`
    PrependOnly,
    /// `prepend ++ input ++ append`
    Both,
}

/// Engine settings loadable with serde
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Algorithm the generator starts with
    pub algorithm: Algorithm,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Sha256,
        }
    }
}

/// Per-call salt for [`Generator::hash_with`], an alternative to staging
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaltOptions {
    /// Salt placed before the input
    pub prepend: Option<Salt>,
    /// Salt placed after the input
    pub append: Option<Salt>,
}

impl SaltOptions {
    /// No salt
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the prepended salt
    #[must_use]
    pub fn with_prepend(mut self, salt: impl Into<Salt>) -> Self {
        self.prepend = Some(salt.into());
        self
    }

    /// Set the appended salt
    #[must_use]
    pub fn with_append(mut self, salt: impl Into<Salt>) -> Self {
        self.append = Some(salt.into());
        self
    }

    /// Prepend `length` fresh random bytes
    #[must_use]
    pub fn with_random_prepend(self, length: usize) -> Self {
        self.with_prepend(generate_salt(length, SaltKind::Bytes))
    }

    /// Append `length` fresh random bytes
    #[must_use]
    pub fn with_random_append(self, length: usize) -> Self {
        self.with_append(generate_salt(length, SaltKind::Bytes))
    }
}

/// Digest engine holding the current algorithm and any staged salt
#[derive(Debug, Clone)]
pub struct Generator {
    algorithm: Algorithm,
    pending_append: Option<Salt>,
    pending_prepend: Option<Salt>,
}

impl Generator {
    /// Create a generator with no staged salt
    #[must_use]
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            pending_append: None,
            pending_prepend: None,
        }
    }

    /// Create a generator from loaded settings
    #[must_use]
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.algorithm)
    }

    /// Current algorithm
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Switch algorithm. Staged salt is kept.
    pub fn set_algorithm(&mut self, algorithm: Algorithm) -> &mut Self {
        tracing::debug!(from = %self.algorithm, to = %algorithm, "switching algorithm");
        self.algorithm = algorithm;
        self
    }

    /// Stage salt to append to the next hash input
    pub fn append_salt(&mut self, salt: impl Into<Salt>) -> &mut Self {
        self.pending_append = Some(salt.into());
        self
    }

    /// Stage `length` fresh random bytes to append to the next hash input
    pub fn append_random_salt(&mut self, length: usize) -> &mut Self {
        self.append_salt(generate_salt(length, SaltKind::Bytes))
    }

    /// Stage salt to prepend to the next hash input
    pub fn prepend_salt(&mut self, salt: impl Into<Salt>) -> &mut Self {
        self.pending_prepend = Some(salt.into());
        self
    }

    /// Stage `length` fresh random bytes to prepend to the next hash input
    pub fn prepend_random_salt(&mut self, length: usize) -> &mut Self {
        self.prepend_salt(generate_salt(length, SaltKind::Bytes))
    }

    /// Staging state the next hash call will see
    #[must_use]
    pub fn salt_state(&self) -> SaltState {
        match (&self.pending_prepend, &self.pending_append) {
            (None, None) => SaltState::NoPending,
            (None, Some(_)) => SaltState::AppendOnly,
            (Some(_), None) => SaltState::PrependOnly,
            (Some(_), Some(_)) => SaltState::Both,
        }
    }

    /// Whether any salt is staged
    #[must_use]
    pub fn has_pending_salt(&self) -> bool {
        self.salt_state() != SaltState::NoPending
    }

    /// Drop staged salt without hashing
    pub fn clear_salt(&mut self) -> &mut Self {
        self.pending_prepend = None;
        self.pending_append = None;
        self
    }

    /// Hash raw bytes, consuming staged salt.
    ///
    /// # Panics
    ///
    /// Panics if the current algorithm is [`Algorithm::Invalid`].
    pub fn hash_bytes(&mut self, data: &[u8]) -> Digest {
        let (prepend, append) = self.take_pending();
        salted_digest(self.algorithm, data, prepend, append)
    }

    /// Hash the UTF-8 bytes of `text`, consuming staged salt
    pub fn hash_str(&mut self, text: &str) -> Digest {
        self.hash_bytes(text.as_bytes())
    }

    /// Hash text that arrives as raw bytes.
    ///
    /// Staged salt is consumed only when the bytes decode.
    ///
    /// # Errors
    ///
    /// Returns [`crate::HashError::InvalidUtf8`] if `text` is not valid UTF-8.
    pub fn hash_utf8(&mut self, text: &[u8]) -> Result<Digest> {
        let text = std::str::from_utf8(text)?;
        Ok(self.hash_str(text))
    }

    /// Hash the in-memory bytes of a fixed-layout value, consuming staged salt
    pub fn hash_raw<T: RawLayout + ?Sized>(&mut self, value: &T) -> Digest {
        self.hash_bytes(&value.raw_bytes())
    }

    /// Hash any `Hash` value, consuming staged salt.
    ///
    /// Under [`Algorithm::PlatformDefault`], byte buffers (`Vec<u8>`,
    /// `Box<[u8]>`, `&'static [u8]`) and strings (`String`, `Box<str>`, `&str`)
    /// go through [`Self::hash_bytes`]/[`Self::hash_str`]; anything else is fed
    /// to the platform hasher directly, between the staged salts. Fixed-size
    /// arrays count as "anything else". Other algorithms hash the decimal text
    /// of the value's platform hash.
    pub fn hash_value<T: Hash + Any>(&mut self, value: &T) -> Digest {
        if self.algorithm != Algorithm::PlatformDefault {
            return self.hash_str(&platform_hash(value).to_string());
        }

        let any: &dyn Any = value;
        if let Some(bytes) = any.downcast_ref::<Vec<u8>>() {
            return self.hash_bytes(bytes);
        }
        if let Some(bytes) = any.downcast_ref::<Box<[u8]>>() {
            return self.hash_bytes(bytes);
        }
        if let Some(bytes) = any.downcast_ref::<&'static [u8]>() {
            return self.hash_bytes(bytes);
        }
        if let Some(text) = any.downcast_ref::<String>() {
            return self.hash_str(text);
        }
        if let Some(text) = any.downcast_ref::<Box<str>>() {
            return self.hash_str(text);
        }
        if let Some(text) = any.downcast_ref::<&'static str>() {
            return self.hash_str(text);
        }

        let (prepend, append) = self.take_pending();
        let mut hasher = platform_hasher();
        if let Some(salt) = &prepend {
            hasher.write(salt.as_bytes());
        }
        value.hash(&mut hasher);
        if let Some(salt) = &append {
            hasher.write(salt.as_bytes());
        }
        platform_digest(hasher.finish()).with_salts(prepend, append)
    }

    /// Hash `data` with per-call salt. Staged salt is left untouched.
    pub fn hash_with(&self, options: &SaltOptions, data: &[u8]) -> Digest {
        salted_digest(
            self.algorithm,
            data,
            options.prepend.clone(),
            options.append.clone(),
        )
    }

    fn take_pending(&mut self) -> (Option<Salt>, Option<Salt>) {
        (self.pending_prepend.take(), self.pending_append.take())
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::from_config(&GeneratorConfig::default())
    }
}

fn salted_digest(
    algorithm: Algorithm,
    data: &[u8],
    prepend: Option<Salt>,
    append: Option<Salt>,
) -> Digest {
    if prepend.is_none() && append.is_none() {
        return algorithm.compute_digest(data);
    }

    let prepend_len = prepend.as_ref().map_or(0, Salt::len);
    let append_len = append.as_ref().map_or(0, Salt::len);
    tracing::debug!(%algorithm, prepend_len, append_len, "applying salt");

    let mut input = Vec::with_capacity(prepend_len + data.len() + append_len);
    if let Some(salt) = &prepend {
        input.extend_from_slice(salt.as_bytes());
    }
    input.extend_from_slice(data);
    if let Some(salt) = &append {
        input.extend_from_slice(salt.as_bytes());
    }

    algorithm.compute_digest(&input).with_salts(prepend, append)
}
