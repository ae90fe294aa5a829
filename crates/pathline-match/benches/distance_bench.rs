//! Criterion benchmarks for pathline-match.
//!
//! Targets:
//! - pairwise subsequence distance (200 frames) < 0.5ms
//! - pairwise substring distance (200 frames) < 0.5ms
//! - full matrix, 32 pathways x 64 frames, serial < 100ms
//! - full matrix, 32 pathways x 64 frames, rayon pool < 50ms

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use pathline_core::config::MetricKind;
use pathline_core::types::{Frame, Pathway, PathwayEnsemble, StateId, SymbolTable};
use pathline_match::distance::lcs::pairwise_distance;
use pathline_match::distance::{compute_distance_matrix, DistanceOptions};
use pathline_match::padding::pad_to_uniform;

const N_STATES: usize = 4;

/// Helper: deterministic pseudo-random state sequence (xorshift).
fn make_sequence(seed: u64, len: usize) -> Vec<StateId> {
    let mut x = seed | 1;
    (0..len)
        .map(|_| {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            (x % N_STATES as u64) as StateId
        })
        .collect()
}

/// Helper: ensemble of pathways with varying lengths, padded rectangular.
fn make_ensemble(n_pathways: usize, max_frames: usize) -> (PathwayEnsemble, SymbolTable) {
    let pathways = (0..n_pathways)
        .map(|p| {
            let len = max_frames - (p % 5);
            let frames = make_sequence(p as u64 + 11, len)
                .into_iter()
                .enumerate()
                .map(|(i, state)| Frame {
                    iteration: i as u32 + 1,
                    segment: p as i64,
                    state,
                    aux: 0.0,
                    weight: 1.0 / n_pathways as f64,
                })
                .collect();
            Pathway::new(frames)
        })
        .collect();
    let mut ensemble = PathwayEnsemble::new(pathways);
    let table = SymbolTable::numeric(N_STATES);
    pad_to_uniform(&mut ensemble, &table);
    (ensemble, table)
}

// BENCH-01: pairwise subsequence distance (200 frames) < 0.5ms
fn bench_pairwise_subsequence(c: &mut Criterion) {
    let a = make_sequence(3, 200);
    let b = make_sequence(7, 200);

    c.bench_function("pairwise_subsequence_200_frames", |bench| {
        bench.iter(|| black_box(pairwise_distance(&a, &b, MetricKind::Subsequence)));
    });
}

// BENCH-02: pairwise substring distance (200 frames) < 0.5ms
fn bench_pairwise_substring(c: &mut Criterion) {
    let a = make_sequence(3, 200);
    let b = make_sequence(7, 200);

    c.bench_function("pairwise_substring_200_frames", |bench| {
        bench.iter(|| black_box(pairwise_distance(&a, &b, MetricKind::Substring)));
    });
}

// BENCH-03: full matrix, 32 pathways x 64 frames, serial < 100ms
fn bench_matrix_serial(c: &mut Criterion) {
    let (ensemble, table) = make_ensemble(32, 64);
    let options = DistanceOptions::default();

    c.bench_function("matrix_32x64_serial", |bench| {
        bench.iter(|| black_box(compute_distance_matrix(&ensemble, &table, &options).unwrap()));
    });
}

// BENCH-04: full matrix, 32 pathways x 64 frames, rayon pool < 50ms
fn bench_matrix_parallel(c: &mut Criterion) {
    let (ensemble, table) = make_ensemble(32, 64);
    let options = DistanceOptions {
        jobs: Some(0),
        ..DistanceOptions::default()
    };

    c.bench_function("matrix_32x64_parallel", |bench| {
        bench.iter(|| black_box(compute_distance_matrix(&ensemble, &table, &options).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_pairwise_subsequence,
    bench_pairwise_substring,
    bench_matrix_serial,
    bench_matrix_parallel,
);
criterion_main!(benches);
