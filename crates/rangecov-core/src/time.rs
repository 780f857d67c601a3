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

//! # Discrete Time
//!
//! Integer-backed instants for timelines measured in ticks (days, slots,
//! epoch milliseconds, ...).
//!
//! - `TimePoint<T>`: a specific point on the timeline.
//! - `TimeDelta<T>`: a signed distance between two time points.
//! - `TimeRange<T>`: a closed range `[start, end]` of time points.
//!
//! The newtypes keep points and distances apart at compile time; adding two
//! `TimePoint`s does not type-check. Operators panic on overflow, the
//! `checked_*` variants do not.

use crate::instant::Instant;
use crate::primitives::ClosedRange;
use num_traits::{PrimInt, Signed};
use serde::Serialize;
use std::{
    fmt::Display,
    ops::{Add, Sub},
};

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TimePoint<T: PrimInt>(T);

impl<T: PrimInt + Display> Display for TimePoint<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TimePoint({})", self.value())
    }
}

pub type TimeRange<T> = ClosedRange<TimePoint<T>>;

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TimeDelta<T: PrimInt + Signed>(T);

impl<T: PrimInt + Signed> TimeDelta<T> {
    #[inline]
    pub const fn new(value: T) -> Self {
        Self(value)
    }

    #[inline]
    pub fn zero() -> Self {
        Self(T::zero())
    }

    #[inline]
    pub fn one() -> Self {
        Self(T::one())
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.0.is_positive()
    }
}

impl<T: PrimInt> TimePoint<T> {
    #[inline]
    pub const fn new(value: T) -> Self {
        TimePoint(value)
    }

    #[inline]
    pub const fn value(self) -> T {
        self.0
    }
}

impl<T: PrimInt + Signed> TimePoint<T> {
    #[inline]
    pub fn checked_add(self, delta: TimeDelta<T>) -> Option<Self> {
        self.0.checked_add(&delta.0).map(TimePoint)
    }

    #[inline]
    pub fn checked_sub(self, delta: TimeDelta<T>) -> Option<Self> {
        self.0.checked_sub(&delta.0).map(TimePoint)
    }
}

impl<T: PrimInt + Signed> Add<TimeDelta<T>> for TimePoint<T> {
    type Output = TimePoint<T>;

    #[inline]
    fn add(self, rhs: TimeDelta<T>) -> Self::Output {
        self.checked_add(rhs)
            .expect("overflow in TimePoint + TimeDelta")
    }
}

impl<T: PrimInt + Signed> Sub<TimeDelta<T>> for TimePoint<T> {
    type Output = TimePoint<T>;

    #[inline]
    fn sub(self, rhs: TimeDelta<T>) -> Self::Output {
        self.checked_sub(rhs)
            .expect("underflow in TimePoint - TimeDelta")
    }
}

impl<T> Instant for TimePoint<T>
where
    T: PrimInt + Signed + std::fmt::Debug,
{
    type Unit = TimeDelta<T>;
    const DISCRETE: bool = true;

    #[inline]
    fn smallest_unit() -> Self::Unit {
        TimeDelta::one()
    }

    #[inline]
    fn is_positive_unit(unit: Self::Unit) -> bool {
        unit.is_positive()
    }

    #[inline]
    fn checked_sub_unit(self, unit: Self::Unit) -> Option<Self> {
        self.checked_sub(unit)
    }

    #[inline]
    fn checked_add_unit(self, unit: Self::Unit) -> Option<Self> {
        self.checked_add(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_point_display() {
        let tp = TimePoint::new(42);
        assert_eq!(format!("{}", tp), "TimePoint(42)");
    }

    #[test]
    fn test_time_range_display_is_closed() {
        let range: TimeRange<i32> = TimeRange::new(TimePoint::new(10), TimePoint::new(20));
        assert_eq!(format!("{}", range), "[TimePoint(10), TimePoint(20)]");
    }

    #[test]
    fn test_timepoint_add_and_sub_timedelta() {
        let tp = TimePoint::new(10);
        assert_eq!(tp + TimeDelta::new(5), TimePoint::new(15));
        assert_eq!(tp - TimeDelta::new(5), TimePoint::new(5));
        assert_eq!(tp.checked_add(TimeDelta::new(-3)), Some(TimePoint::new(7)));
    }

    #[test]
    fn test_instant_unit_steps() {
        let tp = TimePoint::new(i32::MIN);
        assert_eq!(tp.checked_sub_unit(TimeDelta::one()), None);
        assert_eq!(
            TimePoint::new(3i32).checked_add_unit(TimePoint::<i32>::smallest_unit()),
            Some(TimePoint::new(4))
        );
        assert!(TimePoint::<i64>::DISCRETE);
        assert!(TimePoint::<i64>::is_positive_unit(TimeDelta::new(2)));
        assert!(!TimePoint::<i64>::is_positive_unit(TimeDelta::zero()));
    }

    #[test]
    fn test_serialize_is_transparent() {
        let tp = TimePoint::new(7i64);
        assert_eq!(serde_json::to_string(&tp).unwrap(), "7");
    }

    #[test]
    #[should_panic(expected = "overflow in TimePoint + TimeDelta")]
    fn test_timepoint_add_panic_on_overflow() {
        let _ = TimePoint::new(i32::MAX) + TimeDelta::new(1);
    }

    #[test]
    #[should_panic(expected = "underflow in TimePoint - TimeDelta")]
    fn test_timepoint_sub_panic_on_underflow() {
        let _ = TimePoint::new(i32::MIN) - TimeDelta::new(1);
    }
}
