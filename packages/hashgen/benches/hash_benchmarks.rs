//! Throughput benchmarks for digest computation and salt generation

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hashgen::{generate_salt, Algorithm, Generator, SaltKind};

/// Benchmark each algorithm across input sizes
fn benchmark_hash_algorithms(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_throughput");

    for size in [1024usize, 65536, 1_048_576] {
        group.throughput(Throughput::Bytes(size as u64));
        let data = vec![0u8; size];

        for algorithm in Algorithm::ALL {
            let mut generator = Generator::new(algorithm);
            group.bench_with_input(BenchmarkId::new(algorithm.name(), size), &data, |b, data| {
                b.iter(|| std::hint::black_box(generator.hash_bytes(data)));
            });
        }
    }
    group.finish();
}

/// Benchmark the cost of staging salt before a hash
fn benchmark_salted_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("salted_hash");
    let data = vec![0u8; 1024];
    let mut generator = Generator::new(Algorithm::Sha256);

    group.bench_function("unsalted", |b| {
        b.iter(|| std::hint::black_box(generator.hash_bytes(&data)));
    });

    group.bench_function("random_prepend_append_16", |b| {
        b.iter(|| {
            std::hint::black_box(
                generator
                    .prepend_random_salt(16)
                    .append_random_salt(16)
                    .hash_bytes(&data),
            )
        });
    });
    group.finish();
}

/// Benchmark salt generation in each representation
fn benchmark_salt_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("salt_generation");
    for (label, kind) in [
        ("bytes", SaltKind::Bytes),
        ("byte_array", SaltKind::ByteArray),
        ("string", SaltKind::String),
    ] {
        group.bench_function(label, |b| {
            b.iter(|| std::hint::black_box(generate_salt(32, kind)));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_hash_algorithms,
    benchmark_salted_hash,
    benchmark_salt_generation
);
criterion_main!(benches);
