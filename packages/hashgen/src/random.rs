//! Layered random byte source
//!
//! Bytes are drawn from a priority list of entropy sources. Each source is tried
//! once, in order; a failing source hands over to the next one. The chain ends in
//! [`PerByteFallback`], which cannot fail, so [`RandomByteSource::generate`] always
//! returns exactly the requested number of bytes.

use crate::error::EntropyError;
use rand::rngs::{SmallRng, StdRng};
use rand::{Rng, RngCore, SeedableRng};
use std::cell::RefCell;
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};

thread_local! {
    /// Standard chain reused by every free-function draw on this thread
    static THREAD_SOURCE: RefCell<RandomByteSource> = RefCell::new(RandomByteSource::new());
}

/// A fallible provider of random bytes
pub trait EntropySource: Send {
    /// Short, stable name used in log output
    fn name(&self) -> &'static str;

    /// Fill `dest` completely or report failure
    ///
    /// # Errors
    ///
    /// Returns [`EntropyError::EntropyNotAvailable`] when the source cannot
    /// produce bytes. `dest` may be partially written in that case.
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), EntropyError>;
}

/// ChaCha-based CSPRNG seeded from the OS, optimised for bulk output.
///
/// Seeding happens lazily on first use; a seeding failure is reported as a
/// source failure and retried on the next call.
#[derive(Default)]
pub struct BulkCsprng {
    rng: Option<StdRng>,
}

impl BulkCsprng {
    const NAME: &'static str = "bulk-csprng";

    /// Create an unseeded bulk generator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntropySource for BulkCsprng {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), EntropyError> {
        let rng = match self.rng.take() {
            Some(rng) => rng,
            None => StdRng::try_from_os_rng()
                .map_err(|e| EntropyError::not_available(Self::NAME, e))?,
        };
        self.rng.insert(rng).fill_bytes(dest);
        Ok(())
    }
}

/// The operating system's random-bytes service via `getrandom`
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn name(&self) -> &'static str {
        "os-entropy"
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), EntropyError> {
        getrandom::fill(dest).map_err(|e| EntropyError::not_available(self.name(), e))
    }
}

/// Last-resort generator drawing one byte at a time in `0..=255`.
///
/// Seeded without touching the OS so construction and use never fail. Output is
/// not cryptographically strong; it only runs when every secure source failed.
pub struct PerByteFallback {
    rng: SmallRng,
}

impl PerByteFallback {
    /// Create a fallback generator seeded from process-local state
    #[must_use]
    pub fn new() -> Self {
        let mut hasher = RandomState::new().build_hasher();
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or_default()
            .hash(&mut hasher);
        std::process::id().hash(&mut hasher);
        std::thread::current().id().hash(&mut hasher);

        Self {
            rng: SmallRng::seed_from_u64(hasher.finish()),
        }
    }

    /// Fill `dest` byte by byte
    pub fn fill(&mut self, dest: &mut [u8]) {
        for byte in dest.iter_mut() {
            *byte = self.rng.random_range(0..=u8::MAX);
        }
    }
}

impl Default for PerByteFallback {
    fn default() -> Self {
        Self::new()
    }
}

/// Random byte generator with a fixed fallback chain
pub struct RandomByteSource {
    sources: Vec<Box<dyn EntropySource>>,
    fallback: PerByteFallback,
}

impl RandomByteSource {
    /// Standard chain: [`BulkCsprng`], then [`OsEntropy`], then [`PerByteFallback`]
    #[must_use]
    pub fn new() -> Self {
        Self::with_sources(vec![Box::new(BulkCsprng::new()), Box::new(OsEntropy)])
    }

    /// Use `sources` in the given order ahead of the per-byte fallback
    #[must_use]
    pub fn with_sources(sources: Vec<Box<dyn EntropySource>>) -> Self {
        Self {
            sources,
            fallback: PerByteFallback::new(),
        }
    }

    /// Produce exactly `count` random bytes
    pub fn generate(&mut self, count: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; count];
        if count == 0 {
            return bytes;
        }

        for source in &mut self.sources {
            match source.fill_bytes(&mut bytes) {
                Ok(()) => return bytes,
                Err(error) => {
                    tracing::warn!(source = source.name(), %error, "entropy source failed, falling back");
                }
            }
        }

        tracing::warn!(count, "all secure entropy sources failed, using per-byte fallback");
        self.fallback.fill(&mut bytes);
        bytes
    }
}

impl Default for RandomByteSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate `count` random bytes through this thread's standard chain.
///
/// The chain is built on first use and kept for the life of the thread, so the
/// bulk CSPRNG is seeded once per thread.
#[must_use]
pub fn random_bytes(count: usize) -> Vec<u8> {
    with_thread_source(|source| source.generate(count))
}

/// Run `f` against this thread's standard chain
pub(crate) fn with_thread_source<R>(f: impl FnOnce(&mut RandomByteSource) -> R) -> R {
    THREAD_SOURCE.with(|source| f(&mut source.borrow_mut()))
}
