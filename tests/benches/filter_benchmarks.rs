//! # Nonce Bloom Benchmarks
//!
//! | Operation | Cost driver |
//! |-----------|-------------|
//! | insert | k SHA-256 digests, k bit writes |
//! | exists | up to k SHA-256 digests, k bit reads |
//! | allocate | closed-form length plus byte-wise correction |
//!
//! Filter length only affects the final modulo, so insert and exists times
//! should stay flat across lengths and scale linearly with the hash count.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use std::time::Duration;

use nonce_bloom::{allocate_parameters, Bloom512, BloomFilter, MembershipFilter};

const ENTRIES: usize = 100;

fn entries() -> Vec<String> {
    (0..ENTRIES).map(|i| i.to_string()).collect()
}

// ============================================================================
// Insert across filter lengths
// ============================================================================

fn bench_insert_by_length(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert-by-length");
    group.measurement_time(Duration::from_secs(5));
    group.throughput(Throughput::Elements(ENTRIES as u64));

    let entries = entries();
    for len_bytes in (512..10_000).step_by(2048) {
        group.bench_with_input(
            BenchmarkId::new("len_bytes", len_bytes),
            &len_bytes,
            |b, &len_bytes| {
                b.iter(|| {
                    let mut filter = BloomFilter::with_hash_count(len_bytes, 4).unwrap();
                    for entry in &entries {
                        black_box(filter.insert(entry).unwrap());
                    }
                    filter
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// Exists across filter lengths
// ============================================================================

fn bench_exists_by_length(c: &mut Criterion) {
    let mut group = c.benchmark_group("exists-by-length");
    group.measurement_time(Duration::from_secs(5));
    group.throughput(Throughput::Elements(ENTRIES as u64));

    let entries = entries();
    for len_bytes in (512..10_000).step_by(2048) {
        let mut filter = BloomFilter::with_hash_count(len_bytes, 4).unwrap();
        for entry in &entries {
            filter.insert(entry).unwrap();
        }

        group.bench_with_input(
            BenchmarkId::new("len_bytes", len_bytes),
            &filter,
            |b, filter| {
                b.iter(|| {
                    for entry in &entries {
                        black_box(filter.exists(entry));
                    }
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// Hash count scaling
// ============================================================================

fn bench_exists_by_hash_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("exists-by-hash-count");

    for k in [1, 4, 16, 64] {
        let mut filter = Bloom512::with_hash_count(k).unwrap();
        filter.insert("member").unwrap();

        group.bench_with_input(BenchmarkId::new("member", k), &filter, |b, filter| {
            b.iter(|| black_box(filter.exists("member")))
        });

        group.bench_with_input(BenchmarkId::new("random", k), &filter, |b, filter| {
            let mut rng = rand::thread_rng();
            b.iter(|| {
                let mut candidate = [0u8; 32];
                rng.fill(&mut candidate);
                black_box(filter.exists(candidate))
            })
        });
    }

    group.finish();
}

// ============================================================================
// Allocation
// ============================================================================

fn bench_allocation(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocation");

    for capacity in [100, 10_000, 1_000_000] {
        group.bench_with_input(
            BenchmarkId::new("parameters", capacity),
            &capacity,
            |b, &capacity| b.iter(|| black_box(allocate_parameters(capacity, 0.01))),
        );
    }

    group.bench_function("allocate_filter_10k", |b| {
        b.iter(|| black_box(BloomFilter::allocate(10_000, 0.01).unwrap()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_by_length,
    bench_exists_by_length,
    bench_exists_by_hash_count,
    bench_allocation,
);

criterion_main!(benches);
