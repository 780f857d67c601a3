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

use rangecov_core::instant::Instant;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerConfig<U> {
    /// Boundary step. Missing ranges stop one unit short of loaded data,
    /// and loaded ranges closer than one unit are merged.
    pub unit: U,
    /// Initial capacity of the loaded-range list.
    pub capacity_hint: usize,
}

impl<U> TrackerConfig<U> {
    #[inline]
    pub fn with_unit(unit: U) -> Self {
        Self {
            unit,
            capacity_hint: 8,
        }
    }

    /// The default configuration for instants of type `I`.
    #[inline]
    pub fn for_instant<I>() -> Self
    where
        I: Instant<Unit = U>,
    {
        Self::with_unit(I::smallest_unit())
    }
}
