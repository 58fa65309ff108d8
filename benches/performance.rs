// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Performance benchmarks for BeatBox
//!
//! Run with: cargo bench
//!
//! These benchmarks measure:
//! - Grid compilation at different densities
//! - Pattern record encoding and decoding
//! - Tick lookups and timing conversion used by the clock loop

use beatbox::grid::{self, CELLS};
use beatbox::{compile, GridState, InstrumentTable};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_grid(density: f64) -> GridState {
    let mut rng = StdRng::seed_from_u64(7);
    let cells: Vec<bool> = (0..CELLS).map(|_| rng.gen_bool(density)).collect();
    GridState::from_cells(&cells).expect("grid has 256 cells")
}

/// Benchmark grid-to-timeline compilation
fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    let instruments = InstrumentTable::general_midi();

    for density in [0.0, 0.25, 1.0] {
        let grid = random_grid(density);
        group.bench_with_input(
            BenchmarkId::from_parameter(density),
            &grid,
            |b, grid| b.iter(|| black_box(compile(black_box(grid), &instruments))),
        );
    }

    group.finish();
}

/// Benchmark the binary pattern record
fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let grid = random_grid(0.5);
    let record = grid::encode(&grid);

    group.bench_function("encode", |b| b.iter(|| black_box(grid::encode(black_box(&grid)))));
    group.bench_function("decode", |b| {
        b.iter(|| black_box(grid::decode(black_box(&record)).expect("valid record")))
    });

    group.finish();
}

/// Benchmark per-tick work done by the clock thread
fn bench_tick_lookup(c: &mut Criterion) {
    let timeline = compile(&random_grid(1.0), &InstrumentTable::general_midi());

    c.bench_function("events_at_full_loop", |b| {
        b.iter(|| {
            let mut sent = 0;
            for tick in 0..=timeline.loop_ticks() {
                sent += timeline.events_at(black_box(tick)).len();
            }
            black_box(sent)
        })
    });

    c.bench_function("tick_duration", |b| {
        b.iter(|| black_box(timeline.tick_duration(black_box(123.6))))
    });

    c.bench_function("ticks_to_micros", |b| {
        b.iter(|| black_box(timeline.ticks_to_micros(black_box(16), black_box(120.0))))
    });
}

criterion_group!(benches, bench_compile, bench_codec, bench_tick_lookup);

criterion_main!(benches);
