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

use std::fmt::{Debug, Display};

/// Why a pair of bounds does not form a valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidRangeKind {
    /// At least one bound is not a point in time (e.g. `NaN`).
    NotAnInstant,
    /// `end` is strictly before `start`.
    Reversed,
    /// Clamping into the outer bound produced `end < start`.
    EmptyAfterClamp,
}

impl Display for InvalidRangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidRangeKind::NotAnInstant => write!(f, "bound is not a valid instant"),
            InvalidRangeKind::Reversed => write!(f, "end is before start"),
            InvalidRangeKind::EmptyAfterClamp => write!(f, "range is empty after clamping"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvalidRangeError<I> {
    kind: InvalidRangeKind,
    start: I,
    end: I,
}

impl<I> InvalidRangeError<I> {
    #[inline]
    pub fn new(kind: InvalidRangeKind, start: I, end: I) -> Self {
        Self { kind, start, end }
    }

    #[inline]
    pub fn kind(&self) -> InvalidRangeKind {
        self.kind
    }

    #[inline]
    pub fn start(&self) -> I
    where
        I: Copy,
    {
        self.start
    }

    #[inline]
    pub fn end(&self) -> I
    where
        I: Copy,
    {
        self.end
    }
}

impl<I: Debug> Display for InvalidRangeError<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid range [{:?}, {:?}]: {}",
            self.start, self.end, self.kind
        )
    }
}

impl<I: Debug> std::error::Error for InvalidRangeError<I> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_bounds_and_kind() {
        let err = InvalidRangeError::new(InvalidRangeKind::Reversed, 5, 3);
        assert_eq!(format!("{err}"), "Invalid range [5, 3]: end is before start");
    }

    #[test]
    fn test_is_std_error() {
        let err: Box<dyn std::error::Error> =
            Box::new(InvalidRangeError::new(InvalidRangeKind::NotAnInstant, 1.0, f64::NAN));
        assert!(err.to_string().contains("not a valid instant"));
    }
}
