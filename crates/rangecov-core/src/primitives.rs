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

//! # Core Primitives
//!
//! The closed range `[start, end]` every other part of the workspace is
//! built on.

use crate::err::{InvalidRangeError, InvalidRangeKind};
use crate::instant::{Instant, earliest, latest};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::ops::RangeInclusive;

/// A closed interval `[start, end]`.
///
/// Both bounds belong to the range, so `[5, 5]` contains exactly the point `5`
/// and is not empty. The invariant `start <= end` holds for every value of
/// this type.
///
/// # Examples
///
/// ```
/// use rangecov_core::primitives::ClosedRange;
/// let range = ClosedRange::new(1, 5);
/// assert!(range.start() == 1);
/// assert!(range.end() == 5);
/// assert!(range.contains_range(&ClosedRange::new(1, 1)));
/// assert!(range.contains_range(&ClosedRange::new(5, 5)));
/// assert!(!range.contains_range(&ClosedRange::new(5, 6)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ClosedRange<T> {
    start: T,
    end: T,
}

impl<T> ClosedRange<T> {
    /// Creates a new closed range from two bounds given in any order.
    ///
    /// If `b < a` the bounds are swapped, so the result always satisfies
    /// `start <= end`. Use [`ClosedRange::try_new`] to reject reversed input
    /// instead.
    ///
    /// # Panics
    ///
    /// If `a` and `b` are not comparable (e.g. `NaN`), this function will panic.
    ///
    /// # Examples
    ///
    /// ```
    /// use rangecov_core::primitives::ClosedRange;
    ///
    /// let range = ClosedRange::new(5, 3);
    /// assert_eq!(range.start(), 3);
    /// assert_eq!(range.end(), 5);
    /// ```
    #[inline]
    pub fn new(a: T, b: T) -> Self
    where
        T: PartialOrd + Copy,
    {
        let ord = a
            .partial_cmp(&b)
            .expect("ClosedRange::new: non-comparable bounds (NaN?)");
        let (start, end) = match ord {
            Ordering::Greater => (b, a),
            _ => (a, b),
        };
        Self { start, end }
    }

    /// Creates a new closed range, failing if either bound is not a valid
    /// instant or if `end` is strictly before `start`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rangecov_core::err::InvalidRangeKind;
    /// use rangecov_core::primitives::ClosedRange;
    ///
    /// assert!(ClosedRange::try_new(1.0, 2.0).is_ok());
    /// let err = ClosedRange::try_new(2.0, 1.0).unwrap_err();
    /// assert_eq!(err.kind(), InvalidRangeKind::Reversed);
    /// let err = ClosedRange::try_new(f64::NAN, 1.0).unwrap_err();
    /// assert_eq!(err.kind(), InvalidRangeKind::NotAnInstant);
    /// ```
    #[inline]
    pub fn try_new(start: T, end: T) -> Result<Self, InvalidRangeError<T>>
    where
        T: Instant,
    {
        if !start.is_valid() || !end.is_valid() {
            return Err(InvalidRangeError::new(
                InvalidRangeKind::NotAnInstant,
                start,
                end,
            ));
        }
        if end < start {
            return Err(InvalidRangeError::new(InvalidRangeKind::Reversed, start, end));
        }
        Ok(Self { start, end })
    }

    /// Returns the first point of the range.
    #[inline]
    pub fn start(&self) -> T
    where
        T: Copy,
    {
        self.start
    }

    /// Returns the last point of the range.
    #[inline]
    pub fn end(&self) -> T
    where
        T: Copy,
    {
        self.end
    }

    /// Checks if the range fully contains another range.
    ///
    /// # Examples
    ///
    /// ```
    /// use rangecov_core::primitives::ClosedRange;
    ///
    /// let a = ClosedRange::new(1, 5);
    /// assert!(a.contains_range(&ClosedRange::new(2, 4)));
    /// assert!(a.contains_range(&ClosedRange::new(1, 5)));
    /// assert!(!a.contains_range(&ClosedRange::new(0, 6)));
    /// ```
    #[inline]
    pub fn contains_range(&self, other: &Self) -> bool
    where
        T: PartialOrd,
    {
        other.start >= self.start && other.end <= self.end
    }

    /// Clamps both bounds into `boundary`.
    ///
    /// Bounds before `boundary.start()` are raised to it, bounds after
    /// `boundary.end()` are lowered to it. A range lying entirely outside the
    /// boundary collapses onto the nearest boundary point.
    ///
    /// # Examples
    ///
    /// ```
    /// use rangecov_core::primitives::ClosedRange;
    ///
    /// let bounds = ClosedRange::new(10.0, 20.0);
    /// assert_eq!(ClosedRange::new(5.0, 15.0).clamp_to(&bounds), ClosedRange::new(10.0, 15.0));
    /// assert_eq!(ClosedRange::new(0.0, 99.0).clamp_to(&bounds), bounds);
    /// assert_eq!(ClosedRange::new(25.0, 30.0).clamp_to(&bounds), ClosedRange::new(20.0, 20.0));
    /// ```
    #[inline]
    pub fn clamp_to(&self, boundary: &Self) -> Self
    where
        T: Instant,
    {
        let clamp = |x: T| earliest(latest(x, boundary.start), boundary.end);
        Self {
            start: clamp(self.start),
            end: clamp(self.end),
        }
    }
}

impl<T: fmt::Display> fmt::Display for ClosedRange<T> {
    /// Formats the range as `[start, end]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rangecov_core::primitives::ClosedRange;
    ///
    /// assert_eq!(format!("{}", ClosedRange::new(1, 5)), "[1, 5]");
    /// ```
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

impl<T: Instant> TryFrom<RangeInclusive<T>> for ClosedRange<T> {
    type Error = InvalidRangeError<T>;

    /// Validates a `start..=end` range.
    ///
    /// # Examples
    ///
    /// ```
    /// use rangecov_core::primitives::ClosedRange;
    ///
    /// let range = ClosedRange::try_from(1.0..=5.0).unwrap();
    /// assert_eq!((range.start(), range.end()), (1.0, 5.0));
    /// assert!(ClosedRange::try_from(5.0..=1.0).is_err());
    /// ```
    #[inline]
    fn try_from(r: RangeInclusive<T>) -> Result<Self, Self::Error> {
        let (start, end) = r.into_inner();
        Self::try_new(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_new_normalizes_order() {
        let r = ClosedRange::new(5i32, 3i32);
        assert_eq!((r.start(), r.end()), (3, 5));
    }

    #[test]
    #[should_panic]
    fn test_new_panics_on_nan() {
        let _ = ClosedRange::new(f64::NAN, 1.0f64);
    }

    #[test]
    fn test_try_new_accepts_single_point() {
        let r = ClosedRange::try_new(4.0f64, 4.0).unwrap();
        assert_eq!((r.start(), r.end()), (4.0, 4.0));
    }

    #[test]
    fn test_try_new_rejects_reversed_and_nan() {
        let err = ClosedRange::try_new(3.0f64, 2.0).unwrap_err();
        assert_eq!(err.kind(), InvalidRangeKind::Reversed);
        assert_eq!((err.start(), err.end()), (3.0, 2.0));

        let err = ClosedRange::try_new(1.0f64, f64::NAN).unwrap_err();
        assert_eq!(err.kind(), InvalidRangeKind::NotAnInstant);
    }

    #[test]
    fn test_contains_range_is_inclusive_on_both_ends() {
        let r = ClosedRange::new(10i32, 20i32);
        assert!(r.contains_range(&ClosedRange::new(10, 10)));
        assert!(r.contains_range(&ClosedRange::new(20, 20)));
        assert!(!r.contains_range(&ClosedRange::new(9, 12)));
        assert!(!r.contains_range(&ClosedRange::new(18, 21)));
    }

    #[test]
    fn test_clamp_to_inside_is_identity() {
        let bounds = ClosedRange::new(0.0f64, 100.0);
        let r = ClosedRange::new(10.0f64, 20.0);
        assert_eq!(r.clamp_to(&bounds), r);
    }

    #[test]
    fn test_clamp_to_before_bounds_collapses_on_start() {
        let bounds = ClosedRange::new(10.0f64, 100.0);
        let r = ClosedRange::new(0.0f64, 5.0);
        assert_eq!(r.clamp_to(&bounds), ClosedRange::new(10.0, 10.0));
    }

    #[test]
    fn test_try_from_range_inclusive() {
        let r = ClosedRange::try_from(-2.0f64..=5.0).unwrap();
        assert_eq!((r.start(), r.end()), (-2.0, 5.0));
        let err = ClosedRange::try_from(5.0f64..=-2.0).unwrap_err();
        assert_eq!(err.kind(), InvalidRangeKind::Reversed);
    }

    #[test]
    fn test_hash_and_eq_allow_dedup_in_set() {
        let mut set = HashSet::new();
        set.insert(ClosedRange::new(5i32, 3i32));
        set.insert(ClosedRange::new(3i32, 5i32));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_serialize_as_start_end_object() {
        let r = ClosedRange::new(1i64, 2i64);
        assert_eq!(
            serde_json::to_string(&r).unwrap(),
            r#"{"start":1,"end":2}"#
        );
    }
}
