// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Pacer step microbenchmarks
//!
//! The loop body runs at flush_hz on a dedicated thread; these keep an eye on the
//! per-cycle cost of the rate curve and the state transition.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use browscroll_pacer::{rate_for_amount, PacerConfig, PacerState};

fn bench_rate_curve(c: &mut Criterion) {
    let config = PacerConfig::default();
    let mut group = c.benchmark_group("rate_curve");
    for amount in [0.01_f64, 0.35, 1.0, 4.0] {
        group.bench_with_input(BenchmarkId::from_parameter(amount), &amount, |b, &amount| {
            b.iter(|| rate_for_amount(black_box(amount), &config))
        });
    }
    group.finish();
}

fn bench_advance(c: &mut Criterion) {
    let config = PacerConfig::default();

    c.bench_function("advance_sustained", |b| {
        let mut state = PacerState::new();
        b.iter(|| state.advance(black_box(0.8), &config))
    });

    c.bench_function("advance_alternating", |b| {
        let mut state = PacerState::new();
        let mut sign = 1.0;
        b.iter(|| {
            sign = -sign;
            state.advance(black_box(0.5 * sign), &config)
        })
    });
}

criterion_group!(benches, bench_rate_curve, bench_advance);
criterion_main!(benches);
