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

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rangecov_core::primitives::ClosedRange;
use rangecov_tracker::prelude::*;
use serde::Serialize;
use std::{fs::File, io::BufWriter, time::Instant};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

type Ts = DateTime<Utc>;

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// Parameters of one simulated chart session.
#[derive(Debug, Clone, Serialize)]
struct SessionConfig {
    seed: u64,
    year: i32,
    /// Days loaded up front, counted back from the end of the year.
    initial_days: i64,
    pans: usize,
    min_viewport_days: i64,
    max_viewport_days: i64,
    max_pan_days: i64,
    /// Chance that a simulated fetch fails and its reservation is released.
    failure_rate: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            year: 2022,
            initial_days: 14,
            pans: 200,
            min_viewport_days: 3,
            max_viewport_days: 45,
            max_pan_days: 20,
            failure_rate: 0.1,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
struct SessionStats {
    pans: usize,
    satisfied: usize,
    fetched_ranges: usize,
    confirmed: usize,
    released: usize,
    fetched_days: f64,
}

#[derive(Debug, Clone, Serialize)]
struct SessionReport {
    description: String,
    config: SessionConfig,
    stats: SessionStats,
    elapsed_ms: u128,
    coverage: CoverageSnapshot<Ts>,
}

fn midnight(year: i32, month: u32, day: u32) -> Ts {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
        .expect("valid calendar date")
}

fn run_session(cfg: &SessionConfig) -> Result<SessionReport, CoverageError<Ts>> {
    let start = midnight(cfg.year, 1, 1);
    let end = midnight(cfg.year + 1, 1, 1);
    let total = ClosedRange::try_new(start, end)?;
    let seed = ClosedRange::try_new(end - TimeDelta::days(cfg.initial_days), end)?;

    let mut tracker = RangeCoverageTracker::new(total, seed);
    let mut rng = ChaCha8Rng::seed_from_u64(cfg.seed);
    let mut stats = SessionStats::default();

    // The viewport starts on the preloaded tail and pans from there.
    let mut view_end = end;
    let t0 = Instant::now();
    for _ in 0..cfg.pans {
        let width = TimeDelta::days(rng.random_range(cfg.min_viewport_days..=cfg.max_viewport_days));
        let pan = TimeDelta::days(rng.random_range(-cfg.max_pan_days..=cfg.max_pan_days));
        view_end = (view_end + pan).clamp(start + width, end);
        let view_start = view_end - width;
        stats.pans += 1;

        let reservation = tracker.reserve(view_start..=view_end)?;
        if reservation.is_satisfied() {
            stats.satisfied += 1;
            continue;
        }
        stats.fetched_ranges += reservation.missing().len();
        if let Reservation::Pending(fetch) = reservation {
            if rng.random_bool(cfg.failure_rate) {
                tracker.release(fetch.id())?;
                stats.released += 1;
            } else {
                stats.fetched_days += fetch
                    .missing()
                    .iter()
                    .map(|r| (r.end() - r.start()).num_milliseconds() as f64 / 86_400_000.0)
                    .sum::<f64>();
                tracker.confirm(fetch.id())?;
                stats.confirmed += 1;
            }
        }
    }
    let elapsed = t0.elapsed();

    info!(
        pans = stats.pans,
        satisfied = stats.satisfied,
        confirmed = stats.confirmed,
        released = stats.released,
        loaded = tracker.loaded_ranges().len(),
        pending = tracker.pending_count(),
        unit = ?tracker.unit(),
        "session finished"
    );
    for (id, entry) in tracker.pending() {
        warn!(%id, wanted = %entry.wanted, "reservation left open");
    }
    info!("{tracker}");

    Ok(SessionReport {
        description: "Replay of a seeded timeline-panning session against the coverage tracker."
            .into(),
        config: cfg.clone(),
        stats,
        elapsed_ms: elapsed.as_millis(),
        coverage: tracker.snapshot(),
    })
}

fn main() {
    enable_tracing();

    let cfg = SessionConfig::default();
    let report = match run_session(&cfg) {
        Ok(report) => report,
        Err(e) => {
            error!("session failed: {e}");
            std::process::exit(1);
        }
    };

    let file = File::create("coverage_report.json").expect("create coverage_report.json");
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &report).expect("write json report");

    println!();
    println!("Wrote: coverage_report.json");
}
