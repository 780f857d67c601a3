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

use crate::pending::ReservationId;
use rangecov_core::err::InvalidRangeError;
use std::fmt::{Debug, Display};

/// Errors that can occur while settling a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservationError {
    /// No pending reservation with this id exists. It was never issued,
    /// or it has already been confirmed or released.
    Unknown(ReservationId),
}

impl Display for ReservationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReservationError::Unknown(id) => write!(f, "No pending reservation {}", id),
        }
    }
}

impl std::error::Error for ReservationError {}

/// Any error the tracker can return.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoverageError<I> {
    InvalidRange(InvalidRangeError<I>),
    Reservation(ReservationError),
}

impl<I: Debug> Display for CoverageError<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoverageError::InvalidRange(e) => write!(f, "{e}"),
            CoverageError::Reservation(e) => write!(f, "{e}"),
        }
    }
}

impl<I: Debug> std::error::Error for CoverageError<I> {}

impl<I> From<InvalidRangeError<I>> for CoverageError<I> {
    fn from(value: InvalidRangeError<I>) -> Self {
        CoverageError::InvalidRange(value)
    }
}

impl<I> From<ReservationError> for CoverageError<I> {
    fn from(value: ReservationError) -> Self {
        CoverageError::Reservation(value)
    }
}
