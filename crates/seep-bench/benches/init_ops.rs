//! Criterion benchmarks for initial-state construction.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use seep_bench::{equil_profile, restart_profile};
use seep_init::{InitOptions, StateInitializer};

/// Benchmark: equilibrate a 100x100x10 box (100K cells).
fn bench_equil_100k(c: &mut Criterion) {
    let mut profile = equil_profile([100, 100, 10]);
    let init = StateInitializer::default();

    c.bench_function("equil_100k", |b| {
        b.iter(|| {
            let state = init
                .initialize(&profile.deck, &profile.grid, &mut profile.properties)
                .unwrap();
            black_box(state);
        });
    });
}

/// Benchmark: read a 100x100x10 box from per-cell records, half of the
/// pressures completed hydrostatically.
fn bench_restart_100k(c: &mut Criterion) {
    let mut profile = restart_profile([100, 100, 10]);
    let init = StateInitializer::default();

    c.bench_function("restart_100k", |b| {
        b.iter(|| {
            let state = init
                .initialize(&profile.deck, &profile.grid, &mut profile.properties)
                .unwrap();
            black_box(state);
        });
    });
}

/// Benchmark: uniform saturation over the same box, including the
/// gas-oil ratio pass.
fn bench_explicit_100k(c: &mut Criterion) {
    let mut profile = equil_profile([100, 100, 10]);
    let init = StateInitializer::new(InitOptions {
        init_saturation: Some(0.3),
        ..InitOptions::default()
    });

    c.bench_function("explicit_100k", |b| {
        b.iter(|| {
            let state = init
                .initialize(&profile.deck, &profile.grid, &mut profile.properties)
                .unwrap();
            black_box(state);
        });
    });
}

criterion_group!(benches, bench_equil_100k, bench_restart_100k, bench_explicit_100k);
criterion_main!(benches);
