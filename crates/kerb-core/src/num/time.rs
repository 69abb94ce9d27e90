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

//! Numeric bound for relative time offsets.
//!
//! Offsets are signed distances from a shared reference instant. The unit
//! is the caller's choice (seconds, minutes, nanoseconds); the engine only
//! relies on exact integer arithmetic and lossless conversion to `i64`.
//!
//! The `From<i64> + Into<i64>` bound is only met by `i64` among the
//! primitive integers, so in practice offsets are `i64`. Narrower types
//! would need a fallible conversion in [`TimeNumeric::narrow`].

use num_traits::{PrimInt, Signed};
use std::hash::Hash;

/// Signed integer usable as a relative time offset.
pub trait TimeNumeric:
    PrimInt + Signed + From<i64> + Into<i64> + std::fmt::Debug + std::fmt::Display + Hash
{
    /// Widens the offset for intermediate products that must not overflow.
    #[inline]
    fn widen(self) -> i128 {
        let value: i64 = self.into();
        value as i128
    }

    /// Narrows a widened intermediate back to an offset, saturating at the
    /// `i64` bounds.
    #[inline]
    fn narrow(value: i128) -> Self {
        let clamped = value.clamp(i64::MIN as i128, i64::MAX as i128) as i64;
        <Self as From<i64>>::from(clamped)
    }
}

impl<T> TimeNumeric for T where
    T: PrimInt + Signed + From<i64> + Into<i64> + std::fmt::Debug + std::fmt::Display + Hash
{
}
