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

use num_traits::{PrimInt, Signed};
use smallvec::SmallVec;
use std::cmp::{max, min};

/// How a higher-priority span `blocker` lies relative to a candidate span.
///
/// The classification is evaluated in declaration order: the first matching
/// variant wins, so a blocker sharing both bounds with the candidate is
/// [`Overlap::Covered`], never [`Overlap::Tail`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Overlap {
    /// The spans do not share any instant.
    Disjoint,
    /// The blocker covers the whole candidate.
    Covered,
    /// The blocker covers the end of the candidate.
    Tail,
    /// The blocker covers the start of the candidate.
    Head,
    /// The blocker lies strictly inside the candidate.
    Inside,
}

impl Overlap {
    /// Returns `true` if the spans share at least one instant.
    #[inline]
    pub fn is_conflict(&self) -> bool {
        !matches!(self, Overlap::Disjoint)
    }
}

impl std::fmt::Display for Overlap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Overlap::Disjoint => "disjoint",
            Overlap::Covered => "covered",
            Overlap::Tail => "tail",
            Overlap::Head => "head",
            Overlap::Inside => "inside",
        };
        write!(f, "{}", name)
    }
}

/// A half-open span `[from, to)` of signed offsets relative to a shared
/// reference instant.
///
/// # Invariants
/// `from` must always be less than or equal to `to`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelativeTimeSpan<T>
where
    T: PrimInt + Signed,
{
    from: T,
    to: T,
}

impl<T> RelativeTimeSpan<T>
where
    T: PrimInt + Signed,
{
    /// Creates a new `RelativeTimeSpan`.
    ///
    /// # Panics
    ///
    /// Panics if `from > to`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use kerb_core::math::span::RelativeTimeSpan;
    ///
    /// let span = RelativeTimeSpan::new(10, 25);
    /// assert_eq!(span.duration(), 15);
    /// ```
    #[inline]
    pub fn new(from: T, to: T) -> Self {
        assert!(
            from <= to,
            "Invalid span: from must be less than or equal to to"
        );
        Self { from, to }
    }

    /// Creates a new `RelativeTimeSpan` if `from <= to`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use kerb_core::math::span::RelativeTimeSpan;
    ///
    /// assert!(RelativeTimeSpan::try_new(0, 10).is_some());
    /// assert!(RelativeTimeSpan::try_new(10, 0).is_none());
    /// ```
    #[inline]
    pub fn try_new(from: T, to: T) -> Option<Self> {
        if from <= to { Some(Self { from, to }) } else { None }
    }

    /// Creates a span starting at `from` lasting `duration`.
    ///
    /// # Panics
    ///
    /// Panics if `duration` is negative.
    #[inline]
    pub fn with_duration(from: T, duration: T) -> Self {
        assert!(
            duration >= T::zero(),
            "called `RelativeTimeSpan::with_duration` with negative duration"
        );
        Self::new(from, from + duration)
    }

    /// Returns the inclusive start offset.
    #[inline]
    pub const fn from(&self) -> T {
        self.from
    }

    /// Returns the exclusive end offset.
    #[inline]
    pub const fn to(&self) -> T {
        self.to
    }

    /// Returns `to - from`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use kerb_core::math::span::RelativeTimeSpan;
    ///
    /// assert_eq!(RelativeTimeSpan::new(-5, 5).duration(), 10);
    /// ```
    #[inline]
    pub fn duration(&self) -> T {
        self.to - self.from
    }

    /// Returns `true` if the span contains no instant.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    /// Returns `true` if this span shares at least one instant with `other`.
    ///
    /// Adjacent spans do not intersect.
    #[inline]
    pub fn intersects(&self, other: Self) -> bool {
        self.from < other.to && other.from < self.to
    }

    /// Returns `true` if `value` lies in `[from, to)`.
    #[inline]
    pub fn contains_point(&self, value: T) -> bool {
        self.from <= value && value < self.to
    }

    /// Returns `true` if `other` lies entirely within `self`.
    #[inline]
    pub fn contains_span(&self, other: Self) -> bool {
        self.from <= other.from && other.to <= self.to
    }

    /// Returns the shared part of both spans, or `None` if they do not intersect.
    #[inline]
    pub fn intersection(&self, other: Self) -> Option<Self> {
        let from = max(self.from, other.from);
        let to = min(self.to, other.to);
        if from < to { Some(Self { from, to }) } else { None }
    }

    /// Calculates the set difference `self - other`.
    ///
    /// # Returns
    ///
    /// * 0 spans: if `other` covers `self`.
    /// * 1 span: if `other` clips one side of `self` or is disjoint.
    /// * 2 spans: if `other` lies strictly inside `self`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use kerb_core::math::span::RelativeTimeSpan;
    ///
    /// let diff = RelativeTimeSpan::new(0, 10).difference(RelativeTimeSpan::new(4, 6));
    /// assert_eq!(diff.as_slice(), &[RelativeTimeSpan::new(0, 4), RelativeTimeSpan::new(6, 10)]);
    /// ```
    pub fn difference(&self, other: Self) -> SmallVec<[Self; 2]> {
        if other.is_empty() || !self.intersects(other) {
            return smallvec::smallvec![*self];
        }

        let mut result = SmallVec::new();
        if self.from < other.from {
            result.push(Self {
                from: self.from,
                to: other.from,
            });
        }
        if self.to > other.to {
            result.push(Self {
                from: other.to,
                to: self.to,
            });
        }
        result
    }

    /// Returns a span of the same duration starting at `from`.
    #[inline]
    pub fn shifted_to(&self, from: T) -> Self {
        Self {
            from,
            to: from + self.duration(),
        }
    }

    /// Classifies how `blocker` lies relative to `self`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use kerb_core::math::span::{Overlap, RelativeTimeSpan};
    ///
    /// let candidate = RelativeTimeSpan::new(10, 20);
    /// assert_eq!(candidate.overlap(RelativeTimeSpan::new(15, 25)), Overlap::Tail);
    /// assert_eq!(candidate.overlap(RelativeTimeSpan::new(5, 15)), Overlap::Head);
    /// assert_eq!(candidate.overlap(RelativeTimeSpan::new(12, 18)), Overlap::Inside);
    /// ```
    #[inline]
    pub fn overlap(&self, blocker: Self) -> Overlap {
        if blocker.to <= self.from || blocker.from >= self.to {
            Overlap::Disjoint
        } else if blocker.from <= self.from && blocker.to >= self.to {
            Overlap::Covered
        } else if blocker.from >= self.from && blocker.to >= self.to {
            Overlap::Tail
        } else if blocker.from <= self.from && blocker.to <= self.to {
            Overlap::Head
        } else {
            Overlap::Inside
        }
    }
}

impl<T> Default for RelativeTimeSpan<T>
where
    T: PrimInt + Signed,
{
    #[inline]
    fn default() -> Self {
        Self {
            from: T::zero(),
            to: T::zero(),
        }
    }
}

impl<T> std::fmt::Debug for RelativeTimeSpan<T>
where
    T: PrimInt + Signed + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelativeTimeSpan")
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}

impl<T> std::fmt::Display for RelativeTimeSpan<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.from, self.to)
    }
}

impl<T> From<std::ops::Range<T>> for RelativeTimeSpan<T>
where
    T: PrimInt + Signed,
{
    #[inline]
    fn from(range: std::ops::Range<T>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl<T> From<RelativeTimeSpan<T>> for std::ops::Range<T>
where
    T: PrimInt + Signed,
{
    #[inline]
    fn from(span: RelativeTimeSpan<T>) -> Self {
        span.from..span.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(from: i64, to: i64) -> RelativeTimeSpan<i64> {
        RelativeTimeSpan::new(from, to)
    }

    #[test]
    fn test_construction_valid() {
        let s = span(10, 20);
        assert_eq!(s.from(), 10);
        assert_eq!(s.to(), 20);
        assert_eq!(s.duration(), 10);
        assert!(!s.is_empty());
    }

    #[test]
    fn test_negative_offsets() {
        let s = span(-30, -10);
        assert_eq!(s.duration(), 20);
        assert!(s.contains_point(-30));
        assert!(!s.contains_point(-10));
    }

    #[test]
    #[should_panic(expected = "Invalid span")]
    fn test_new_panic() {
        span(10, 5);
    }

    #[test]
    fn test_try_new() {
        assert!(RelativeTimeSpan::try_new(5, 5).is_some());
        assert!(RelativeTimeSpan::try_new(6, 5).is_none());
    }

    #[test]
    fn test_with_duration() {
        assert_eq!(RelativeTimeSpan::with_duration(40i64, 15), span(40, 55));
    }

    #[test]
    #[should_panic(expected = "negative duration")]
    fn test_with_duration_negative_panics() {
        RelativeTimeSpan::with_duration(0i64, -1);
    }

    #[test]
    fn test_intersects_excludes_adjacent() {
        let a = span(0, 10);
        assert!(a.intersects(span(5, 15)));
        assert!(!a.intersects(span(10, 15)));
        assert!(!a.intersects(span(-5, 0)));
        assert!(a.intersects(a));
    }

    #[test]
    fn test_contains_span() {
        let a = span(0, 10);
        assert!(a.contains_span(span(0, 10)));
        assert!(a.contains_span(span(2, 8)));
        assert!(!a.contains_span(span(5, 11)));
    }

    #[test]
    fn test_intersection() {
        let a = span(0, 10);
        assert_eq!(a.intersection(span(5, 15)), Some(span(5, 10)));
        assert_eq!(a.intersection(span(10, 20)), None);
    }

    #[test]
    fn test_difference() {
        let base = span(0, 10);

        // Disjoint
        assert_eq!(base.difference(span(12, 15)).as_slice(), &[base]);
        // Covered
        assert!(base.difference(span(-5, 15)).is_empty());
        // Clip right and left
        assert_eq!(base.difference(span(8, 15)).as_slice(), &[span(0, 8)]);
        assert_eq!(base.difference(span(-5, 2)).as_slice(), &[span(2, 10)]);
        // Hole
        assert_eq!(
            base.difference(span(4, 6)).as_slice(),
            &[span(0, 4), span(6, 10)]
        );
    }

    #[test]
    fn test_shifted_to_keeps_duration() {
        let s = span(0, 20).shifted_to(40);
        assert_eq!(s, span(40, 60));
    }

    #[test]
    fn test_overlap_disjoint() {
        let c = span(10, 20);
        assert_eq!(c.overlap(span(0, 10)), Overlap::Disjoint);
        assert_eq!(c.overlap(span(20, 30)), Overlap::Disjoint);
        assert!(!Overlap::Disjoint.is_conflict());
    }

    #[test]
    fn test_overlap_covered_takes_precedence() {
        let c = span(10, 20);
        assert_eq!(c.overlap(span(10, 20)), Overlap::Covered);
        assert_eq!(c.overlap(span(5, 25)), Overlap::Covered);
        assert_eq!(c.overlap(span(10, 30)), Overlap::Covered);
        assert_eq!(c.overlap(span(0, 20)), Overlap::Covered);
    }

    #[test]
    fn test_overlap_tail_head_inside() {
        let c = span(10, 20);
        assert_eq!(c.overlap(span(15, 25)), Overlap::Tail);
        assert_eq!(c.overlap(span(15, 20)), Overlap::Tail);
        assert_eq!(c.overlap(span(5, 15)), Overlap::Head);
        assert_eq!(c.overlap(span(10, 15)), Overlap::Head);
        assert_eq!(c.overlap(span(12, 18)), Overlap::Inside);
        assert!(Overlap::Inside.is_conflict());
    }

    #[test]
    fn test_display_debug() {
        let s = span(10, 20);
        assert_eq!(format!("{}", s), "[10, 20)");
        assert_eq!(format!("{:?}", s), "RelativeTimeSpan { from: 10, to: 20 }");
        assert_eq!(format!("{}", Overlap::Tail), "tail");
    }

    #[test]
    fn test_range_conversions() {
        let s: RelativeTimeSpan<i64> = (3..7).into();
        assert_eq!(s, span(3, 7));
        let r: std::ops::Range<i64> = s.into();
        assert_eq!(r, 3..7);
    }
}
