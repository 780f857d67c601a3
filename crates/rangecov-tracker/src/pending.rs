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

//! Reservations for fetches that are in flight.
//!
//! A reservation holds the stretches of a wanted window that one caller has
//! promised to fetch. They count as covered for later reservations, so two
//! overlapping requests never fetch the same data twice, but they only join
//! the loaded ranges once the caller confirms the fetch succeeded.

use rangecov_core::instant::Instant;
use rangecov_core::primitives::ClosedRange;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ReservationId(u64);

impl ReservationId {
    #[inline]
    pub const fn new(id: u64) -> Self {
        ReservationId(id)
    }
}

impl Display for ReservationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Reservation({})", self.0)
    }
}

/// A fetch the caller has to perform and then confirm or release.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFetch<I> {
    id: ReservationId,
    missing: Vec<ClosedRange<I>>,
}

impl<I> PendingFetch<I> {
    #[inline]
    pub fn id(&self) -> ReservationId {
        self.id
    }

    /// The ranges to fetch, ascending.
    #[inline]
    pub fn missing(&self) -> &[ClosedRange<I>] {
        &self.missing
    }
}

/// Outcome of [`RangeCoverageTracker::reserve`](crate::tracker::RangeCoverageTracker::reserve).
#[derive(Debug, Clone, PartialEq)]
pub enum Reservation<I> {
    /// Everything wanted is loaded or already reserved by someone else.
    Satisfied,
    /// Some ranges must be fetched.
    Pending(PendingFetch<I>),
}

impl<I> Reservation<I> {
    #[inline]
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Reservation::Satisfied)
    }

    /// The ranges to fetch; empty when satisfied.
    #[inline]
    pub fn missing(&self) -> &[ClosedRange<I>] {
        match self {
            Reservation::Satisfied => &[],
            Reservation::Pending(fetch) => fetch.missing(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingEntry<I> {
    pub wanted: ClosedRange<I>,
    pub claims: Vec<ClosedRange<I>>,
}

/// Outstanding reservations keyed by id, in issue order.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingLedger<I> {
    next_id: u64,
    entries: BTreeMap<ReservationId, PendingEntry<I>>,
}

impl<I> Default for PendingLedger<I> {
    fn default() -> Self {
        Self {
            next_id: 1,
            entries: BTreeMap::new(),
        }
    }
}

impl<I: Instant> PendingLedger<I> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records a new reservation and hands out the fetch the caller owes.
    pub fn open(
        &mut self,
        wanted: ClosedRange<I>,
        missing: Vec<ClosedRange<I>>,
        claims: Vec<ClosedRange<I>>,
    ) -> PendingFetch<I> {
        let id = ReservationId::new(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, PendingEntry { wanted, claims });
        PendingFetch { id, missing }
    }

    /// Removes and returns the reservation `id`, if it is still pending.
    #[inline]
    pub fn close(&mut self, id: ReservationId) -> Option<PendingEntry<I>> {
        self.entries.remove(&id)
    }

    /// Every claimed stretch across all pending reservations.
    pub fn claims(&self) -> impl Iterator<Item = ClosedRange<I>> + '_ {
        self.entries
            .values()
            .flat_map(|entry| entry.claims.iter().copied())
    }

    pub fn iter(&self) -> impl Iterator<Item = (ReservationId, &PendingEntry<I>)> + '_ {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(a: f64, b: f64) -> ClosedRange<f64> {
        ClosedRange::new(a, b)
    }

    #[test]
    fn test_open_hands_out_increasing_ids() {
        let mut ledger = PendingLedger::new();
        let a = ledger.open(r(0.0, 10.0), vec![r(0.0, 9.0)], vec![r(0.0, 10.0)]);
        let b = ledger.open(r(20.0, 30.0), vec![r(20.0, 30.0)], vec![r(20.0, 30.0)]);
        assert!(a.id() < b.id());
        assert_eq!(ledger.len(), 2);
        assert_eq!(a.missing(), &[r(0.0, 9.0)]);
    }

    #[test]
    fn test_close_removes_once() {
        let mut ledger = PendingLedger::new();
        let fetch = ledger.open(r(0.0, 1.0), vec![r(0.0, 1.0)], vec![r(0.0, 1.0)]);
        assert!(ledger.close(fetch.id()).is_some());
        assert!(ledger.close(fetch.id()).is_none());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_claims_flatten_in_id_order() {
        let mut ledger = PendingLedger::new();
        ledger.open(r(5.0, 6.0), vec![], vec![r(5.0, 6.0)]);
        ledger.open(r(0.0, 3.0), vec![], vec![r(0.0, 1.0), r(2.0, 3.0)]);
        let claims: Vec<_> = ledger.claims().collect();
        assert_eq!(claims, vec![r(5.0, 6.0), r(0.0, 1.0), r(2.0, 3.0)]);
    }

    #[test]
    fn test_reservation_missing_is_empty_when_satisfied() {
        let res: Reservation<f64> = Reservation::Satisfied;
        assert!(res.is_satisfied());
        assert!(res.missing().is_empty());
    }

    #[test]
    fn test_reservation_id_display() {
        assert_eq!(ReservationId::new(3).to_string(), "Reservation(3)");
    }
}
