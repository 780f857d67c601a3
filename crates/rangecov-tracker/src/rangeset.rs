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

//! RangeSet: sorted, disjoint, non-adjacent set of closed ranges.
//!
//! Invariants (always held):
//!    - ranges are sorted by `start()`
//!    - for neighbours `a`, `b`: `a.end() < b.start()`, and for discrete
//!      instants `a.end() + unit < b.start()`
//!    - semantics are closed `[start, end]`
//!
//! Complexity:
//!    - insert_and_merge: `O(log n + k)` search, `O(n)` worst-case shift
//!    - covers: `O(log n)`
//!    - missing_within: `O(log n + k)`

use core::ops::Deref;
use rangecov_core::instant::{Instant, latest, leaves_no_gap, step_back};
use rangecov_core::primitives::ClosedRange;

/// One uncovered stretch found by [`RangeSet::missing_within`].
///
/// `fetch` is what the caller should load. It stops one unit short of an
/// already loaded boundary, or of the wanted end when the wanted window runs
/// out first. `claim` is the same stretch extended up to that boundary, which
/// is what becomes covered once `fetch` has been loaded. A stretch narrower
/// than one unit is fetched whole, so `fetch == claim`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap<I> {
    pub fetch: ClosedRange<I>,
    pub claim: ClosedRange<I>,
}

/// A collection of sorted, disjoint closed ranges over instants `I`.
///
/// Two ranges that overlap or share an instant are merged into one. For
/// discrete instants, ranges within one `unit` of each other merge too.
/// After any sequence of inserts the set never holds two entries that touch.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeSet<I: Instant> {
    ranges: Vec<ClosedRange<I>>,
    unit: I::Unit,
}

impl<I: Instant> RangeSet<I> {
    /// Creates a new, empty `RangeSet` merging neighbours within `unit`.
    #[inline]
    pub fn new(unit: I::Unit) -> Self {
        Self {
            ranges: Vec::new(),
            unit,
        }
    }

    /// Creates a new, empty `RangeSet` with at least the specified capacity.
    #[inline]
    pub fn with_capacity(unit: I::Unit, capacity: usize) -> Self {
        Self {
            ranges: Vec::with_capacity(capacity),
            unit,
        }
    }

    /// Returns the number of disjoint ranges in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Returns `true` if the set contains no ranges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The merge distance.
    #[inline]
    pub fn unit(&self) -> I::Unit {
        self.unit
    }

    /// Returns a slice containing all ranges in the set, sorted and disjoint.
    #[inline]
    pub fn as_slice(&self) -> &[ClosedRange<I>] {
        &self.ranges
    }

    /// Finds the index of the first range whose start is at or after `point`.
    #[inline]
    fn find_first_starting_at_or_after(&self, point: I) -> usize {
        self.ranges.partition_point(|range| range.start() < point)
    }

    /// Finds the index of the first range whose end is at or after `point`.
    ///
    /// Every range before this index lies strictly before `point` and can
    /// neither contain it nor be reached from it.
    #[inline]
    fn find_first_ending_at_or_after(&self, point: I) -> usize {
        self.ranges.partition_point(|range| range.end() < point)
    }

    /// Inserts a range, merging it with every entry it overlaps, touches, or
    /// lies within one unit of.
    ///
    /// Returns the number of existing entries that were absorbed.
    pub fn insert_and_merge(&mut self, new_range: ClosedRange<I>) -> usize {
        let unit = self.unit;
        let mut insertion_index = self.find_first_starting_at_or_after(new_range.start());
        let ranges = &mut self.ranges;

        let mut merged_start = new_range.start();
        let mut merged_end = new_range.end();

        // The entry to the left starts before us; it merges if it reaches us.
        if insertion_index > 0 && leaves_no_gap(ranges[insertion_index - 1].end(), merged_start, unit)
        {
            insertion_index -= 1;
            merged_start = ranges[insertion_index].start();
            merged_end = latest(merged_end, ranges[insertion_index].end());
        }

        // Absorb every following entry we reach.
        let mut scan_index = insertion_index;
        while scan_index < ranges.len() && leaves_no_gap(merged_end, ranges[scan_index].start(), unit)
        {
            merged_end = latest(merged_end, ranges[scan_index].end());
            scan_index += 1;
        }

        let merged_range = ClosedRange::new(merged_start, merged_end);
        let absorbed = scan_index - insertion_index;

        if absorbed == 0 {
            ranges.insert(insertion_index, merged_range);
        } else {
            ranges[insertion_index] = merged_range;
            if absorbed > 1 {
                ranges.drain(insertion_index + 1..scan_index);
            }
        }
        debug_assert!(Self::are_invariants_held(&self.ranges, unit));
        absorbed
    }

    /// Returns `true` if `required` lies entirely inside one range of the set.
    ///
    /// Entries never touch, so a range covered by the union is always covered
    /// by a single entry.
    #[inline]
    pub fn covers(&self, required: ClosedRange<I>) -> bool {
        let candidate_index = self.find_first_ending_at_or_after(required.start());
        candidate_index < self.len() && self.ranges[candidate_index].contains_range(&required)
    }

    /// Walks the set from `wanted.start()` and collects every stretch of
    /// `wanted` the set does not cover.
    ///
    /// A gap ending at a loaded entry stops one unit before that entry. A gap
    /// cut off by the wanted window stops one unit before `wanted.end()`,
    /// unless it is the trailing gap after the last entry, which runs up to
    /// `wanted.end()` itself. No gap ever ends before it starts.
    pub fn missing_within(&self, wanted: ClosedRange<I>) -> Vec<Gap<I>> {
        let unit = self.unit;
        let wanted_end = wanted.end();
        let mut gaps = Vec::new();
        let mut cursor = wanted.start();
        // Whether `cursor` sits on a loaded instant.
        let mut cursor_loaded = false;

        for entry in &self.ranges[self.find_first_ending_at_or_after(cursor)..] {
            if cursor < entry.start() {
                let by_entry = step_back(entry.start(), unit);
                let by_wanted = step_back(wanted_end, unit);
                let clipped = by_wanted <= by_entry;
                let (fetch_end, claim_end) = if clipped {
                    (by_wanted, wanted_end)
                } else {
                    (by_entry, entry.start())
                };
                let claim = ClosedRange::new(cursor, claim_end);
                let fetch = if fetch_end < cursor {
                    claim
                } else {
                    ClosedRange::new(cursor, fetch_end)
                };
                gaps.push(Gap { fetch, claim });
                if clipped {
                    return gaps;
                }
            }
            cursor = entry.end();
            cursor_loaded = true;
            if wanted_end <= entry.end() {
                return gaps;
            }
        }

        if cursor < wanted_end || !cursor_loaded {
            let tail = ClosedRange::new(cursor, wanted_end);
            gaps.push(Gap {
                fetch: tail,
                claim: tail,
            });
        }
        gaps
    }

    /// A debug-only check that the set's invariants hold.
    #[inline]
    #[cfg(debug_assertions)]
    fn are_invariants_held(ranges: &[ClosedRange<I>], unit: I::Unit) -> bool {
        ranges.windows(2).all(|window| {
            window[0].start() < window[1].start()
                && !leaves_no_gap(window[0].end(), window[1].start(), unit)
        })
    }

    /// A release-build stub for `are_invariants_held`. Always returns `true`.
    #[inline]
    #[cfg(not(debug_assertions))]
    fn are_invariants_held(_ranges: &[ClosedRange<I>], _unit: I::Unit) -> bool {
        true
    }
}

/// Allows a `RangeSet` to be treated as a slice `&[ClosedRange<I>]`.
impl<I: Instant> Deref for RangeSet<I> {
    type Target = [ClosedRange<I>];
    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.ranges
    }
}
