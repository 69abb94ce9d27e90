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

//! Flat-rate crossing
//!
//! An absolute flat rate caps what relative rules may charge inside its
//! window. Its threshold is its own amount plus the amounts of every flat
//! rate activated before it. When the running total of a relative
//! candidate reaches the threshold inside the window, the rest of the
//! window becomes a free filler rule that blocks further billing.

use kerb_core::num::time::TimeNumeric;
use kerb_model::{amount::Amount, rule::Rule};

/// Running totals of a solver that the crossing test depends on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    /// Sum of the end amounts of every piece committed so far.
    pub committed: Amount,
    /// Sum of the flat rates already activated.
    pub activated: Amount,
}

/// A flat rate together with the instant a candidate reaches its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing<'r, T>
where
    T: TimeNumeric,
{
    pub flat_rate: &'r Rule<T>,
    pub at: T,
}

/// Returns the instant at which `candidate` reaches the threshold of
/// `flat_rate`, or `None` if it does not within the flat-rate window.
pub fn crossing_instant<T>(candidate: &Rule<T>, flat_rate: &Rule<T>, totals: Totals) -> Option<T>
where
    T: TimeNumeric,
{
    if !flat_rate.is_absolute_flat_rate() || !candidate.is_relative() {
        return None;
    }

    let threshold = flat_rate.end_amount() + totals.activated;
    let start = totals.committed + candidate.start_amount();
    let end = totals.committed + candidate.end_amount();
    if !(start < threshold && threshold <= end) {
        return None;
    }
    if !(candidate.from() < flat_rate.to() && candidate.to() >= flat_rate.from()) {
        return None;
    }

    let gained = (threshold - start).micros() as i128;
    let slope = (end - start).micros() as i128;
    let at = candidate.from() + T::narrow(gained * candidate.duration().widen() / slope);

    // Reached only after the window closed: nothing left to cap.
    if at >= flat_rate.to() { None } else { Some(at) }
}

/// Finds the cheapest flat rate crossed by `candidate`. Ties go to the
/// first flat rate in iteration order.
pub fn cheapest_crossing<'r, T, I>(flat_rates: I, candidate: &Rule<T>, totals: Totals) -> Option<Crossing<'r, T>>
where
    T: TimeNumeric,
    I: IntoIterator<Item = &'r Rule<T>>,
{
    flat_rates
        .into_iter()
        .filter_map(|flat_rate| {
            crossing_instant(candidate, flat_rate, totals).map(|at| Crossing { flat_rate, at })
        })
        .min_by_key(|crossing| crossing.flat_rate.end_amount())
}

/// Builds the free rule covering the part of the flat-rate window that
/// follows the crossing.
pub fn filler<T>(crossing: &Crossing<'_, T>, candidate: &Rule<T>) -> Rule<T>
where
    T: TimeNumeric,
{
    let flat_rate = crossing.flat_rate;
    flat_rate
        .truncate_before(crossing.at.max(flat_rate.from()))
        .with_amounts(Amount::ZERO, Amount::ZERO)
        .traced(format!(
            "derived from flat rate {}, crossed by {}",
            flat_rate.name(),
            candidate.name()
        ))
}
