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

//! # Instants
//!
//! The coverage tracker never looks inside the points it compares. All it
//! needs is an ordering, a way to tell a malformed value apart from a real
//! point in time, and the ability to move one explicit unit back or forward.
//! The [`Instant`] trait captures exactly that.
//!
//! Implementations are provided for:
//!
//! - [`TimePoint<T>`](crate::time::TimePoint) with [`TimeDelta<T>`](crate::time::TimeDelta) units,
//! - [`chrono::DateTime<Utc>`] and [`chrono::NaiveDateTime`] with [`chrono::TimeDelta`] units,
//! - `f64` (for example epoch seconds) with `f64` units, where `NaN` is not an instant.
//!
//! Only [`TimePoint<T>`](crate::time::TimePoint) is discrete: nothing lies
//! between `t` and `t + 1`. Chrono and `f64` instants have values between
//! any two unit steps.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use std::cmp::Ordering;
use std::fmt::Debug;

/// A totally ordered point on a timeline.
///
/// Ordering is expressed through `PartialOrd` so that float-backed instants
/// can participate; values for which [`Instant::is_valid`] returns `false`
/// must never be compared and are rejected before any range is built.
pub trait Instant: Copy + PartialOrd + Debug {
    /// The step used to move between neighbouring instants.
    type Unit: Copy + Debug;

    /// `true` if bounds only ever sit on the grid of the configured unit,
    /// so nothing lies strictly between `t` and `t + unit`.
    const DISCRETE: bool;

    /// The smallest meaningful step for this instant type.
    fn smallest_unit() -> Self::Unit;

    /// Returns `true` if `unit` is strictly positive.
    fn is_positive_unit(unit: Self::Unit) -> bool;

    /// Moves one `unit` back, or `None` if that leaves the representable range.
    fn checked_sub_unit(self, unit: Self::Unit) -> Option<Self>;

    /// Moves one `unit` forward, or `None` if that leaves the representable range.
    fn checked_add_unit(self, unit: Self::Unit) -> Option<Self>;

    /// Returns `false` for values that are not points in time at all.
    #[inline]
    fn is_valid(&self) -> bool {
        true
    }
}

/// Returns the earlier of two valid instants, preferring `a` on ties.
#[inline]
pub fn earliest<I: Instant>(a: I, b: I) -> I {
    match b.partial_cmp(&a) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

/// Returns the later of two valid instants, preferring `a` on ties.
#[inline]
pub fn latest<I: Instant>(a: I, b: I) -> I {
    match b.partial_cmp(&a) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

/// Steps `t` one `unit` back, saturating at the lowest representable instant.
#[inline]
pub fn step_back<I: Instant>(t: I, unit: I::Unit) -> I {
    t.checked_sub_unit(unit).unwrap_or(t)
}

/// Returns `true` if a range ending at `a_end` and one starting at `b_start`
/// leave no uncovered instant between them.
///
/// Discrete instants merge when at most one `unit` apart. Everything else
/// merges only on overlap or a shared instant.
#[inline]
pub fn leaves_no_gap<I: Instant>(a_end: I, b_start: I, unit: I::Unit) -> bool {
    if I::DISCRETE {
        within_one_unit(a_end, b_start, unit)
    } else {
        a_end >= b_start
    }
}

/// Returns `true` if `b` starts no later than one `unit` after `a` ends,
/// i.e. the two points are equal, ordered the other way round, or neighbours.
#[inline]
pub fn within_one_unit<I: Instant>(a_end: I, b_start: I, unit: I::Unit) -> bool {
    match a_end.checked_add_unit(unit) {
        Some(next) => next >= b_start,
        // `a_end` is already the last representable instant.
        None => true,
    }
}

impl Instant for DateTime<Utc> {
    type Unit = TimeDelta;
    const DISCRETE: bool = false;

    #[inline]
    fn smallest_unit() -> Self::Unit {
        TimeDelta::milliseconds(1)
    }

    #[inline]
    fn is_positive_unit(unit: Self::Unit) -> bool {
        unit > TimeDelta::zero()
    }

    #[inline]
    fn checked_sub_unit(self, unit: Self::Unit) -> Option<Self> {
        self.checked_sub_signed(unit)
    }

    #[inline]
    fn checked_add_unit(self, unit: Self::Unit) -> Option<Self> {
        self.checked_add_signed(unit)
    }
}

impl Instant for NaiveDateTime {
    type Unit = TimeDelta;
    const DISCRETE: bool = false;

    #[inline]
    fn smallest_unit() -> Self::Unit {
        TimeDelta::milliseconds(1)
    }

    #[inline]
    fn is_positive_unit(unit: Self::Unit) -> bool {
        unit > TimeDelta::zero()
    }

    #[inline]
    fn checked_sub_unit(self, unit: Self::Unit) -> Option<Self> {
        self.checked_sub_signed(unit)
    }

    #[inline]
    fn checked_add_unit(self, unit: Self::Unit) -> Option<Self> {
        self.checked_add_signed(unit)
    }
}

impl Instant for f64 {
    type Unit = f64;
    const DISCRETE: bool = false;

    #[inline]
    fn smallest_unit() -> Self::Unit {
        1.0
    }

    #[inline]
    fn is_positive_unit(unit: Self::Unit) -> bool {
        unit > 0.0
    }

    #[inline]
    fn checked_sub_unit(self, unit: Self::Unit) -> Option<Self> {
        let v = self - unit;
        v.is_finite().then_some(v)
    }

    #[inline]
    fn checked_add_unit(self, unit: Self::Unit) -> Option<Self> {
        let v = self + unit;
        v.is_finite().then_some(v)
    }

    #[inline]
    fn is_valid(&self) -> bool {
        !self.is_nan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).single().unwrap()
    }

    #[test]
    fn test_datetime_step_back_one_millisecond() {
        let t = utc(2022, 2, 15);
        let back = step_back(t, DateTime::<Utc>::smallest_unit());
        assert_eq!(back.to_rfc3339(), "2022-02-14T23:59:59.999+00:00");
    }

    #[test]
    fn test_datetime_step_back_saturates_at_min() {
        let t = DateTime::<Utc>::MIN_UTC;
        assert_eq!(step_back(t, TimeDelta::milliseconds(1)), t);
    }

    #[test]
    fn test_naive_datetime_add_and_sub_unit() {
        let t = utc(2022, 1, 1).naive_utc();
        let unit = TimeDelta::days(1);
        assert_eq!(t.checked_add_unit(unit), Some(utc(2022, 1, 2).naive_utc()));
        assert_eq!(t.checked_sub_unit(unit), Some(utc(2021, 12, 31).naive_utc()));
    }

    #[test]
    fn test_f64_nan_is_not_valid() {
        assert!(!f64::NAN.is_valid());
        assert!(1.5f64.is_valid());
        assert!(f64::INFINITY.is_valid());
    }

    #[test]
    fn test_f64_step_past_finite_range_is_none() {
        assert_eq!(f64::MAX.checked_add_unit(f64::MAX), None);
        assert_eq!(10.0f64.checked_sub_unit(1.0), Some(9.0));
    }

    #[test]
    fn test_earliest_and_latest_prefer_first_on_ties() {
        assert_eq!(earliest(3.0f64, 5.0), 3.0);
        assert_eq!(earliest(5.0f64, 3.0), 3.0);
        assert_eq!(latest(3.0f64, 5.0), 5.0);
        assert_eq!(latest(4.0f64, 4.0), 4.0);
    }

    #[test]
    fn test_within_one_unit() {
        assert!(within_one_unit(5.0f64, 6.0, 1.0));
        assert!(within_one_unit(5.0f64, 5.0, 1.0));
        assert!(within_one_unit(5.0f64, 2.0, 1.0));
        assert!(!within_one_unit(5.0f64, 6.5, 1.0));
    }

    #[test]
    fn test_continuous_instants_merge_only_on_contact() {
        assert!(leaves_no_gap(5.0f64, 5.0, 1.0));
        assert!(leaves_no_gap(5.0f64, 4.0, 1.0));
        assert!(!leaves_no_gap(5.0f64, 5.5, 1.0));

        let end = utc(2022, 1, 1);
        let later = end + TimeDelta::microseconds(900);
        assert!(!leaves_no_gap(end, later, TimeDelta::milliseconds(1)));
    }

    #[test]
    fn test_positive_units() {
        assert!(DateTime::<Utc>::is_positive_unit(TimeDelta::milliseconds(1)));
        assert!(!DateTime::<Utc>::is_positive_unit(TimeDelta::zero()));
        assert!(!f64::is_positive_unit(-1.0));
        assert!(!f64::is_positive_unit(f64::NAN));
    }
}
