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

//! # Range Coverage Tracker
//!
//! Remembers which stretches of a bounded timeline have already been fetched
//! and answers, for a newly wanted window, which stretches still have to be
//! fetched. Fetching itself happens elsewhere; the tracker only sees instants.
//!
//! Two ways of recording fetches are offered:
//!
//! - [`RangeCoverageTracker::get_missing_ranges`] with [`CoverageMode::Commit`]
//!   marks the whole wanted window as loaded as soon as anything in it is
//!   missing, before the fetch has actually happened.
//! - [`RangeCoverageTracker::reserve`] hands out a [`PendingFetch`] whose
//!   claims only join the loaded ranges on [`RangeCoverageTracker::confirm`],
//!   and are dropped again on [`RangeCoverageTracker::release`].

use crate::config::TrackerConfig;
use crate::err::{CoverageError, ReservationError};
use crate::pending::{PendingEntry, PendingLedger, Reservation, ReservationId};
use crate::rangeset::RangeSet;
use rangecov_core::err::{InvalidRangeError, InvalidRangeKind};
use rangecov_core::instant::Instant;
use rangecov_core::primitives::ClosedRange;
use serde::Serialize;
use std::fmt::Display;
use std::ops::RangeInclusive;
use tracing::{debug, instrument, trace, warn};

/// Whether a query may record the wanted window as loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CoverageMode {
    /// Dry run. Never changes the tracker.
    #[default]
    Check,
    /// Records the clamped wanted window as loaded if anything was missing.
    Commit,
}

impl Display for CoverageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoverageMode::Check => write!(f, "Check"),
            CoverageMode::Commit => write!(f, "Commit"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingSnapshot<I> {
    pub id: ReservationId,
    pub wanted: ClosedRange<I>,
    pub claims: Vec<ClosedRange<I>>,
}

/// A serializable view of the tracker's state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageSnapshot<I> {
    pub total: ClosedRange<I>,
    pub loaded: Vec<ClosedRange<I>>,
    pub pending: Vec<PendingSnapshot<I>>,
}

#[derive(Debug, Clone)]
pub struct RangeCoverageTracker<I: Instant> {
    total: ClosedRange<I>,
    loaded: RangeSet<I>,
    pending: PendingLedger<I>,
}

impl<I: Instant> RangeCoverageTracker<I> {
    /// Creates a tracker over `total` with `seed` already loaded, using the
    /// smallest unit of `I` as the boundary step.
    ///
    /// The seed is taken as is and not clamped into `total`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rangecov_core::primitives::ClosedRange;
    /// use rangecov_tracker::tracker::{CoverageMode, RangeCoverageTracker};
    ///
    /// let mut tracker = RangeCoverageTracker::new(
    ///     ClosedRange::new(0.0, 100.0),
    ///     ClosedRange::new(50.0, 100.0),
    /// );
    /// let missing = tracker
    ///     .get_missing_ranges(20.0..=60.0, CoverageMode::Check)
    ///     .unwrap();
    /// assert_eq!(missing, vec![ClosedRange::new(20.0, 49.0)]);
    /// ```
    pub fn new(total: ClosedRange<I>, seed: ClosedRange<I>) -> Self {
        Self::with_config(total, seed, TrackerConfig::for_instant::<I>())
    }

    /// Creates a tracker with an explicit configuration.
    ///
    /// # Panics
    ///
    /// Panics if `config.unit` is not strictly positive.
    pub fn with_config(
        total: ClosedRange<I>,
        seed: ClosedRange<I>,
        config: TrackerConfig<I::Unit>,
    ) -> Self {
        assert!(
            I::is_positive_unit(config.unit),
            "tracker unit must be positive, got {:?}",
            config.unit
        );
        let mut loaded = RangeSet::with_capacity(config.unit, config.capacity_hint.max(1));
        loaded.insert_and_merge(seed);
        Self {
            total,
            loaded,
            pending: PendingLedger::new(),
        }
    }

    #[inline]
    pub fn total_range(&self) -> ClosedRange<I> {
        self.total
    }

    /// The loaded ranges, ascending, pairwise disjoint and non-adjacent.
    #[inline]
    pub fn loaded_ranges(&self) -> &[ClosedRange<I>] {
        self.loaded.as_slice()
    }

    #[inline]
    pub fn unit(&self) -> I::Unit {
        self.loaded.unit()
    }

    /// Outstanding reservations, in the order they were issued.
    #[inline]
    pub fn pending(&self) -> impl Iterator<Item = (ReservationId, &PendingEntry<I>)> + '_ {
        self.pending.iter()
    }

    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Clamps `range` into the total range.
    fn limit_range(&self, range: ClosedRange<I>) -> Result<ClosedRange<I>, InvalidRangeError<I>> {
        let (start, end) = (range.start(), range.end());
        if !start.is_valid() || !end.is_valid() {
            return Err(InvalidRangeError::new(
                InvalidRangeKind::NotAnInstant,
                start,
                end,
            ));
        }
        let clamped = range.clamp_to(&self.total);
        if clamped.end() < clamped.start() {
            return Err(InvalidRangeError::new(
                InvalidRangeKind::EmptyAfterClamp,
                clamped.start(),
                clamped.end(),
            ));
        }
        Ok(clamped)
    }

    fn validate_and_limit(
        &self,
        wanted: RangeInclusive<I>,
    ) -> Result<ClosedRange<I>, InvalidRangeError<I>> {
        self.limit_range(ClosedRange::try_from(wanted)?)
    }

    /// Returns the stretches of `wanted` that are not loaded yet, ascending.
    ///
    /// `wanted` is clamped into the total range first. A missing range that
    /// runs into a loaded range stops one unit before it, unless the gap is
    /// narrower than one unit; a missing range that follows a loaded range
    /// starts on that range's end.
    ///
    /// In [`CoverageMode::Commit`] the clamped window is recorded as loaded
    /// whenever the result is non-empty. Pending reservations are not
    /// consulted here.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidRangeError`] if a bound is not a valid instant or
    /// `wanted` ends before it starts. The tracker is left untouched.
    #[instrument(level = "debug", skip_all, fields(mode = %mode))]
    pub fn get_missing_ranges(
        &mut self,
        wanted: RangeInclusive<I>,
        mode: CoverageMode,
    ) -> Result<Vec<ClosedRange<I>>, InvalidRangeError<I>> {
        let clamped = self.validate_and_limit(wanted)?;
        let missing = self.missing_fetches(clamped);
        if mode == CoverageMode::Commit && !missing.is_empty() {
            self.sort_and_merge(clamped);
        }
        Ok(missing)
    }

    /// Dry-run query that never needs `&mut self`.
    pub fn peek_missing_ranges(
        &self,
        wanted: RangeInclusive<I>,
    ) -> Result<Vec<ClosedRange<I>>, InvalidRangeError<I>> {
        let clamped = self.validate_and_limit(wanted)?;
        Ok(self.missing_fetches(clamped))
    }

    fn missing_fetches(&self, clamped: ClosedRange<I>) -> Vec<ClosedRange<I>> {
        self.loaded
            .missing_within(clamped)
            .into_iter()
            .map(|gap| {
                trace!(gap = ?gap.fetch, "missing range");
                gap.fetch
            })
            .collect()
    }

    /// Returns `true` if the clamped `wanted` window is entirely loaded.
    pub fn is_covered(&self, wanted: RangeInclusive<I>) -> Result<bool, InvalidRangeError<I>> {
        let clamped = self.validate_and_limit(wanted)?;
        Ok(self.loaded.covers(clamped))
    }

    fn sort_and_merge(&mut self, range: ClosedRange<I>) {
        let absorbed = self.loaded.insert_and_merge(range);
        debug!(
            range = ?range,
            absorbed,
            loaded = self.loaded.len(),
            "merged into loaded ranges"
        );
    }

    /// Reserves the stretches of `wanted` that are neither loaded nor claimed
    /// by another pending reservation.
    ///
    /// Returns [`Reservation::Satisfied`] without recording anything when
    /// nothing needs fetching.
    ///
    /// # Errors
    ///
    /// Returns [`CoverageError::InvalidRange`] for the same inputs
    /// [`get_missing_ranges`](Self::get_missing_ranges) rejects.
    #[instrument(level = "debug", skip_all)]
    pub fn reserve(&mut self, wanted: RangeInclusive<I>) -> Result<Reservation<I>, CoverageError<I>> {
        let clamped = self.validate_and_limit(wanted)?;

        let gaps = if self.pending.is_empty() {
            self.loaded.missing_within(clamped)
        } else {
            let mut known = self.loaded.clone();
            for claim in self.pending.claims() {
                known.insert_and_merge(claim);
            }
            known.missing_within(clamped)
        };

        if gaps.is_empty() {
            trace!(wanted = ?clamped, "already loaded or reserved");
            return Ok(Reservation::Satisfied);
        }

        let (missing, claims): (Vec<_>, Vec<_>) =
            gaps.into_iter().map(|gap| (gap.fetch, gap.claim)).unzip();
        for range in &missing {
            trace!(gap = ?range, "missing range");
        }
        let fetch = self.pending.open(clamped, missing, claims);
        debug!(id = %fetch.id(), gaps = fetch.missing().len(), "opened reservation");
        Ok(Reservation::Pending(fetch))
    }

    /// Records the claims of reservation `id` as loaded.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::Unknown`] if `id` is not pending.
    #[instrument(level = "debug", skip_all, fields(id = %id))]
    pub fn confirm(&mut self, id: ReservationId) -> Result<(), ReservationError> {
        let entry = self.pending.close(id).ok_or(ReservationError::Unknown(id))?;
        for claim in entry.claims {
            self.sort_and_merge(claim);
        }
        debug!(loaded = self.loaded.len(), "confirmed reservation");
        Ok(())
    }

    /// Drops the claims of reservation `id` so the stretches show up as
    /// missing again.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::Unknown`] if `id` is not pending.
    pub fn release(&mut self, id: ReservationId) -> Result<(), ReservationError> {
        let entry = self.pending.close(id).ok_or(ReservationError::Unknown(id))?;
        warn!(
            id = %id,
            wanted = ?entry.wanted,
            claims = entry.claims.len(),
            "released reservation"
        );
        Ok(())
    }

    pub fn snapshot(&self) -> CoverageSnapshot<I> {
        CoverageSnapshot {
            total: self.total,
            loaded: self.loaded.to_vec(),
            pending: self
                .pending
                .iter()
                .map(|(id, entry)| PendingSnapshot {
                    id,
                    wanted: entry.wanted,
                    claims: entry.claims.clone(),
                })
                .collect(),
        }
    }

    /// Renders [`snapshot`](Self::snapshot) as JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error>
    where
        I: Serialize,
    {
        serde_json::to_string(&self.snapshot())
    }
}

impl<I: Instant + Display> Display for RangeCoverageTracker<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{total: {}, loaded: [", self.total)?;
        for (i, range) in self.loaded.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", range)?;
        }
        write!(f, "], pending: {}}}", self.pending.len())
    }
}
