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

//! Pairwise resolution of a low-priority candidate against a
//! higher-priority blocker.
//!
//! Only the candidate is ever transformed. The blocker was accepted earlier
//! and stays untouched.

use kerb_core::{
    math::span::{Overlap, RelativeTimeSpan},
    num::time::TimeNumeric,
};
use kerb_model::{policy::ResolutionPolicy, rule::Rule};

/// Outcome of resolving a candidate against a single blocker.
#[derive(Clone, PartialEq, Eq)]
pub enum Resolution<T>
where
    T: TimeNumeric,
{
    /// The spans do not overlap; the candidate is kept as is.
    Untouched,
    /// The candidate is dropped.
    Deleted,
    /// The candidate is replaced by a truncated or shifted copy.
    Replaced(Rule<T>),
    /// The candidate is cut in two: a leading part ending before the
    /// blocker and a trailing part starting after it.
    Split(Rule<T>, Rule<T>),
}

impl<T> Resolution<T>
where
    T: TimeNumeric,
{
    /// Returns `true` if the candidate was affected.
    #[inline]
    pub fn is_changed(&self) -> bool {
        !matches!(self, Resolution::Untouched)
    }

    #[inline]
    pub fn kind(&self) -> &'static str {
        match self {
            Resolution::Untouched => "untouched",
            Resolution::Deleted => "deleted",
            Resolution::Replaced(_) => "replaced",
            Resolution::Split(_, _) => "split",
        }
    }
}

impl<T> std::fmt::Debug for Resolution<T>
where
    T: TimeNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolution::Untouched => write!(f, "Untouched"),
            Resolution::Deleted => write!(f, "Deleted"),
            Resolution::Replaced(rule) => f.debug_tuple("Replaced").field(rule).finish(),
            Resolution::Split(leading, trailing) => {
                f.debug_tuple("Split").field(leading).field(trailing).finish()
            }
        }
    }
}

impl<T> std::fmt::Display for Resolution<T>
where
    T: TimeNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolution::Untouched | Resolution::Deleted => write!(f, "{}", self.kind()),
            Resolution::Replaced(rule) => write!(f, "replaced by {}", rule),
            Resolution::Split(leading, trailing) => {
                write!(f, "split into {} and {}", leading, trailing)
            }
        }
    }
}

/// Resolves `candidate` against the span of a blocker purely geometrically.
///
/// | blocker position | result |
/// |---|---|
/// | disjoint | untouched |
/// | covers the candidate | deleted |
/// | covers the end | truncated after `blocker.from` |
/// | covers the start | truncated before `blocker.to` |
/// | strictly inside | split around the blocker |
pub fn truncate<T>(candidate: &Rule<T>, blocker: RelativeTimeSpan<T>) -> Resolution<T>
where
    T: TimeNumeric,
{
    match candidate.span().overlap(blocker) {
        Overlap::Disjoint => Resolution::Untouched,
        Overlap::Covered => Resolution::Deleted,
        Overlap::Tail => Resolution::Replaced(candidate.truncate_after(blocker.from())),
        Overlap::Head => Resolution::Replaced(candidate.truncate_before(blocker.to())),
        Overlap::Inside => {
            let [leading, trailing] = candidate.truncate_between(blocker.from(), blocker.to());
            Resolution::Split(leading, trailing)
        }
    }
}

/// Resolves `candidate` against `blocker` according to the candidate's
/// own resolution policy.
///
/// # Examples
///
/// ```rust
/// # use kerb_core::math::span::RelativeTimeSpan;
/// # use kerb_engine::resolution::{resolve, Resolution};
/// # use kerb_model::{amount::Amount, rule::Rule};
///
/// let blocker = Rule::linear_fixed("hp", RelativeTimeSpan::new(0i64, 10), Amount::UNIT);
/// let candidate = Rule::linear_sequential("lp", 20i64, Amount::UNIT);
///
/// // A resolving candidate that starts under the blocker is pushed behind it.
/// match resolve(&candidate, &blocker) {
///     Resolution::Replaced(rule) => assert_eq!(rule.span(), RelativeTimeSpan::new(10, 30)),
///     other => panic!("unexpected {}", other),
/// }
/// ```
pub fn resolve<T>(candidate: &Rule<T>, blocker: &Rule<T>) -> Resolution<T>
where
    T: TimeNumeric,
{
    if !candidate.span().overlap(blocker.span()).is_conflict() {
        return Resolution::Untouched;
    }

    match candidate.resolution_policy() {
        ResolutionPolicy::Truncate => truncate(candidate, blocker.span()),
        ResolutionPolicy::Delete => Resolution::Deleted,
        ResolutionPolicy::Resolve => {
            if blocker.from() <= candidate.from() {
                Resolution::Replaced(candidate.shifted(blocker.to()))
            } else {
                let (leading, trailing) = candidate.split(blocker.from(), blocker.to());
                Resolution::Split(leading, trailing)
            }
        }
    }
}
