//! Salted one-shot digest generation
//!
//! A [`Generator`] hashes bytes, strings, fixed-layout values or any `Hash`
//! value with a selectable [`Algorithm`]. Salt can be staged to be appended
//! and/or prepended to the input of exactly the next hash call:
//!
//! ```
//! use hashgen::{Algorithm, Generator};
//!
//! let mut generator = Generator::new(Algorithm::Sha256);
//! let salted = generator.prepend_random_salt(16).append_salt("pepper").hash_str("Hello");
//! let plain = generator.hash_str("Hello");
//!
//! assert_ne!(salted, plain);
//! assert_eq!(plain.to_string().len(), 64);
//! assert!(salted.prepended_salt().is_some());
//! ```
//!
//! Random bytes come from [`RandomByteSource`], which walks a chain of secure
//! sources and ends in a generator that cannot fail.

#![forbid(unsafe_code)]

pub mod algorithm;
pub mod digest;
pub mod error;
pub mod generator;
pub mod random;
pub mod salt;

pub use algorithm::{platform_hash, Algorithm};
pub use digest::{Digest, DigestFormat, FormattedDigest};
pub use error::{EntropyError, HashError, Result};
pub use generator::{Generator, GeneratorConfig, RawLayout, SaltOptions, SaltState};
pub use random::{random_bytes, BulkCsprng, EntropySource, OsEntropy, PerByteFallback, RandomByteSource};
pub use salt::{generate_salt, pad_character, Salt, SaltGenerator, SaltKind};
