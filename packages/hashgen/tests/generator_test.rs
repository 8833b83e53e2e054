//! End-to-end checks of the public generator API

use hashgen::{
    generate_salt, Algorithm, Digest, DigestFormat, EntropyError, EntropySource, FormattedDigest,
    Generator, RandomByteSource, Salt, SaltGenerator, SaltKind,
};
use proptest::prelude::*;
use std::collections::HashSet;

struct BrokenSource(&'static str);

impl EntropySource for BrokenSource {
    fn name(&self) -> &'static str {
        self.0
    }

    fn fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), EntropyError> {
        Err(EntropyError::not_available(self.0, "offline"))
    }
}

#[test]
fn test_hello_vectors() {
    let mut generator = Generator::new(Algorithm::Sha256);
    assert_eq!(
        generator.hash_str("Hello").to_string(),
        "185f8db32271fe25f561a6fc938b2e264306ec304eda518007d1764826381969"
    );

    generator.set_algorithm(Algorithm::Sha1);
    assert_eq!(
        generator.hash_str("Hello").to_string(),
        "f7ff9e8b7bb2e09b70935a5d785e0cc5d9d0abf0"
    );

    generator.set_algorithm(Algorithm::Md5);
    assert_eq!(
        generator.hash_str("Hello").to_string(),
        "8b1a9953c4611296a827abf8c47804d7"
    );

    generator.set_algorithm(Algorithm::Sha384);
    assert_eq!(generator.hash_str("Hello").to_string().len(), 96);

    generator.set_algorithm(Algorithm::Sha512);
    assert_eq!(
        generator.hash_str("").to_string(),
        "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e"
    );
}

#[test]
fn test_determinism_and_one_shot_salt() {
    for algorithm in Algorithm::ALL {
        let mut generator = Generator::new(algorithm);
        let first = generator.hash_bytes(b"payload");
        let second = generator.hash_bytes(b"payload");
        assert_eq!(first, second, "{algorithm}");

        let salted = generator.append_random_salt(16).hash_bytes(b"payload");
        assert_ne!(salted, first, "{algorithm}");

        let after = generator.hash_bytes(b"payload");
        assert_eq!(after, first, "{algorithm}");
    }
}

#[test]
fn test_random_salts_are_distinct() {
    let salts: HashSet<Vec<u8>> = (0..1000)
        .map(|_| generate_salt(16, SaltKind::Bytes).as_bytes().to_vec())
        .collect();
    assert_eq!(salts.len(), 1000);
}

#[test]
fn test_concatenation_provenance() {
    for a in Algorithm::ALL {
        for b in Algorithm::ALL {
            let left = a.compute_digest(b"left");
            let right = b.compute_digest(b"right");
            let joined = &left + &right;

            let expected = if a == b { a } else { Algorithm::Invalid };
            assert_eq!(joined.algorithm(), expected);
            assert_eq!(
                joined.as_bytes(),
                [left.as_bytes(), right.as_bytes()].concat()
            );
        }
    }
}

#[test]
fn test_format_round_trip() {
    let digest = Generator::new(Algorithm::Sha384).hash_str("format me");
    assert_eq!(
        digest.format(DigestFormat::String),
        FormattedDigest::String(digest.to_string())
    );
    assert_eq!(
        digest.format(DigestFormat::Bytes),
        FormattedDigest::Bytes(digest.as_bytes().to_vec())
    );

    let restored = Digest::from_hex(&digest.to_hex(), Algorithm::Sha384).unwrap();
    assert_eq!(restored, digest);
}

#[test]
fn test_fallback_chain_with_failing_secure_sources() {
    let mut source = RandomByteSource::with_sources(vec![
        Box::new(BrokenSource("primary")),
        Box::new(BrokenSource("secondary")),
    ]);
    for count in [0, 1, 16, 100, 4096] {
        assert_eq!(source.generate(count).len(), count);
    }

    let mut salts = SaltGenerator::with_source(source);
    let salt = salts.generate(12, SaltKind::String);
    assert_eq!(salt.len(), 12);
    assert!(matches!(salt, Salt::Text(_)));
}

proptest! {
    #[test]
    fn prop_staged_salt_matches_direct_hash(
        prepend in proptest::collection::vec(any::<u8>(), 0..64),
        input in proptest::collection::vec(any::<u8>(), 0..256),
        append in proptest::collection::vec(any::<u8>(), 0..64),
        index in 0usize..5,
    ) {
        let algorithm = Algorithm::ALL[index];
        let mut generator = Generator::new(algorithm);
        let staged = generator
            .prepend_salt(prepend.clone())
            .append_salt(append.clone())
            .hash_bytes(&input);

        let joined = [prepend.as_slice(), input.as_slice(), append.as_slice()].concat();
        prop_assert_eq!(&staged, &algorithm.compute_digest(&joined));
        prop_assert_eq!(staged.prepended_salt(), Some(&Salt::Bytes(prepend)));
        prop_assert_eq!(staged.appended_salt(), Some(&Salt::Bytes(append)));
    }

    #[test]
    fn prop_string_salt_length(length in 1usize..300) {
        prop_assert_eq!(generate_salt(length, SaltKind::String).len(), length);
    }
}
