// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rangecov_core::time::{TimeDelta, TimePoint, TimeRange};
use rangecov_tracker::pending::Reservation;
use rangecov_tracker::tracker::{CoverageMode, RangeCoverageTracker};
use std::{env, hint::black_box, ops::RangeInclusive};

type Tp = TimePoint<i64>;

#[inline]
fn tp(x: i64) -> Tp {
    TimePoint::new(x)
}

#[derive(Clone, Copy)]
struct Window {
    start: Tp,
    width: TimeDelta<i64>,
}

impl Window {
    #[inline]
    fn range(self) -> RangeInclusive<Tp> {
        self.start..=self.start + self.width
    }
}

fn gen_windows(horizon: i64, n: usize, max_width: i64, rng: &mut impl Rng) -> Vec<Window> {
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let a = rng.random_range(0..=horizon);
        let w = rng.random_range(0..=max_width).min(horizon - a);
        out.push(Window {
            start: tp(a),
            width: TimeDelta::new(w),
        });
    }
    out
}

fn fresh_tracker(horizon: i64) -> RangeCoverageTracker<Tp> {
    let mid = tp(horizon / 2);
    RangeCoverageTracker::new(
        TimeRange::new(tp(0), tp(horizon)),
        TimeRange::new(mid - TimeDelta::new(8), mid + TimeDelta::new(8)),
    )
}

/// A tracker left fragmented by many narrow, spread out commits.
fn fragmented_tracker(horizon: i64, windows: &[Window]) -> RangeCoverageTracker<Tp> {
    let mut tracker = fresh_tracker(horizon);
    for w in windows {
        let _ = tracker.get_missing_ranges(w.range(), CoverageMode::Commit);
    }
    tracker
}

fn register_commit(c: &mut Criterion, horizon: i64, ops_n: usize) {
    let mut group = c.benchmark_group("coverage_commit");
    group.throughput(Throughput::Elements(ops_n as u64));

    let mut rng = ChaCha8Rng::seed_from_u64(0xC0FF_EE00_D15C);
    for &width in &[8i64, 256, 4096] {
        let windows = gen_windows(horizon, ops_n, width, &mut rng);
        group.bench_function(BenchmarkId::new("commit", width), |b| {
            b.iter_batched(
                || fresh_tracker(horizon),
                |mut tracker| {
                    for w in &windows {
                        let _ = tracker.get_missing_ranges(w.range(), CoverageMode::Commit);
                    }
                    black_box(tracker);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn register_check(c: &mut Criterion, horizon: i64, ops_n: usize, queries_n: usize) {
    let mut group = c.benchmark_group("coverage_check");
    group.throughput(Throughput::Elements(queries_n as u64));

    let mut rng = ChaCha8Rng::seed_from_u64(0xFEED_FACE_CAFE_BABE);
    let seed_windows = gen_windows(horizon, ops_n, 4, &mut rng);
    let tracker = fragmented_tracker(horizon, &seed_windows);

    for &width in &[16i64, 1024] {
        let queries = gen_windows(horizon, queries_n, width, &mut rng);
        group.bench_function(BenchmarkId::new("check", width), |b| {
            b.iter(|| {
                let mut gaps = 0usize;
                for w in &queries {
                    if let Ok(missing) = tracker.peek_missing_ranges(w.range()) {
                        gaps += missing.len();
                    }
                }
                black_box(gaps)
            })
        });
    }
    group.finish();
}

fn register_reserve(c: &mut Criterion, horizon: i64, ops_n: usize) {
    let mut group = c.benchmark_group("coverage_reserve");
    group.throughput(Throughput::Elements(ops_n as u64));

    let mut rng = ChaCha8Rng::seed_from_u64(0xA11CE_DEAD_BEEF);
    let windows = gen_windows(horizon, ops_n, 256, &mut rng);
    group.bench_function(BenchmarkId::new("reserve_confirm", 256), |b| {
        b.iter_batched(
            || fresh_tracker(horizon),
            |mut tracker| {
                for w in &windows {
                    if let Ok(Reservation::Pending(fetch)) = tracker.reserve(w.range()) {
                        let _ = tracker.confirm(fetch.id());
                    }
                }
                black_box(tracker);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn coverage_benches(c: &mut Criterion) {
    let horizon = env::var("COVERAGE_HORIZON")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1_000_000i64);
    let ops_n = env::var("COVERAGE_OPS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(2_000usize);
    let queries_n = env::var("COVERAGE_QUERIES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10_000usize);

    register_commit(c, horizon, ops_n);
    register_check(c, horizon, ops_n, queries_n);
    register_reserve(c, horizon, ops_n);
}

criterion_group!(benches, coverage_benches);
criterion_main!(benches);
