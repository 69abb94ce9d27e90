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

//! Billable segments
//!
//! Flattens the ascending rules of a solver into consecutive segments,
//! each carrying its own duration and amount. The running amount at any
//! elapsed duration can then be read back with [`Output::amount_at`].

use kerb_core::num::time::TimeNumeric;
use kerb_model::{
    amount::Amount,
    policy::DurationType,
    rule::{Metadata, Rule},
};

/// What to do when the next rule does not start where the previous one ended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GapPolicy {
    /// End the output at the gap.
    #[default]
    Stop,
    /// Fill the gap with a free, non-paying segment.
    PadWithZero,
}

/// Result of [`Output::amount_at`] past the covered duration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExceededPolicy {
    /// Report zero.
    #[default]
    Zero,
    /// Report the accumulated total.
    Total,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OutputOptions {
    detailed: bool,
    gap_policy: GapPolicy,
    exceeded_policy: ExceededPolicy,
}

impl OutputOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps rule names and traces in the segments.
    #[inline]
    pub fn with_detailed(mut self, detailed: bool) -> Self {
        self.detailed = detailed;
        self
    }

    #[inline]
    pub fn with_gap_policy(mut self, policy: GapPolicy) -> Self {
        self.gap_policy = policy;
        self
    }

    #[inline]
    pub fn with_exceeded_policy(mut self, policy: ExceededPolicy) -> Self {
        self.exceeded_policy = policy;
        self
    }

    #[inline]
    pub fn detailed(&self) -> bool {
        self.detailed
    }

    #[inline]
    pub fn gap_policy(&self) -> GapPolicy {
        self.gap_policy
    }

    #[inline]
    pub fn exceeded_policy(&self) -> ExceededPolicy {
        self.exceeded_policy
    }
}

/// One billable piece of the timeline.
#[derive(Clone, PartialEq, Eq)]
pub struct OutputSegment<T>
where
    T: TimeNumeric,
{
    /// Name of the originating rule, in detailed output only.
    pub name: Option<String>,
    /// Trace of the originating rule, empty unless detailed.
    pub trace: Vec<String>,
    /// Time elapsed since the end of the previous segment.
    pub duration: T,
    /// Amount charged over the segment.
    pub amount: Amount,
    /// `true` if the amount accrues linearly, `false` if it is due at once.
    pub linear: bool,
    pub duration_type: DurationType,
    pub meta: Metadata,
}

impl<T> OutputSegment<T>
where
    T: TimeNumeric,
{
    fn from_rule(rule: &Rule<T>, duration: T, detailed: bool) -> Self {
        Self {
            name: detailed.then(|| rule.name().to_string()),
            trace: if detailed {
                rule.trace().to_vec()
            } else {
                Vec::new()
            },
            duration,
            amount: rule.end_amount(),
            linear: !rule.is_flat_rate(),
            duration_type: rule.duration_type(),
            meta: rule.meta().clone(),
        }
    }

    fn gap(duration: T, detailed: bool) -> Self {
        Self {
            name: detailed.then(|| "gap".to_string()),
            trace: Vec::new(),
            duration,
            amount: Amount::ZERO,
            linear: false,
            duration_type: DurationType::NonPaying,
            meta: Metadata::new(),
        }
    }
}

impl<T> std::fmt::Debug for OutputSegment<T>
where
    T: TimeNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSegment")
            .field("name", &self.name)
            .field("duration", &self.duration)
            .field("amount", &self.amount)
            .field("linear", &self.linear)
            .field("duration_type", &self.duration_type)
            .finish()
    }
}

impl<T> std::fmt::Display for OutputSegment<T>
where
    T: TimeNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.linear { "linear" } else { "step" };
        match &self.name {
            Some(name) => write!(f, "{}: {} over {} ({})", name, self.amount, self.duration, kind),
            None => write!(f, "{} over {} ({})", self.amount, self.duration, kind),
        }
    }
}

/// Consecutive billable segments starting at offset zero.
#[derive(Clone, PartialEq, Eq)]
pub struct Output<T>
where
    T: TimeNumeric,
{
    segments: Vec<OutputSegment<T>>,
    exceeded_policy: ExceededPolicy,
}

impl<T> Output<T>
where
    T: TimeNumeric,
{
    /// Builds segments from rules sorted by start. The first rule is
    /// expected at offset zero. A rule starting before the end of the
    /// previous one always ends the output.
    pub fn from_rules<'r, I>(rules: I, options: &OutputOptions) -> Self
    where
        T: 'r,
        I: IntoIterator<Item = &'r Rule<T>>,
    {
        let mut segments = Vec::new();
        let mut previous_end = T::zero();

        for rule in rules {
            if rule.from() != previous_end {
                let padding = options.gap_policy == GapPolicy::PadWithZero && rule.from() > previous_end;
                if !padding {
                    log::debug!("output stops at {} before {}", previous_end, rule);
                    break;
                }
                segments.push(OutputSegment::gap(rule.from() - previous_end, options.detailed));
            }

            segments.push(OutputSegment::from_rule(
                rule,
                rule.to() - rule.from(),
                options.detailed,
            ));
            previous_end = rule.to();
        }

        Self {
            segments,
            exceeded_policy: options.exceeded_policy,
        }
    }

    #[inline]
    pub fn segments(&self) -> &[OutputSegment<T>] {
        &self.segments
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    pub fn total_amount(&self) -> Amount {
        self.segments.iter().map(|segment| segment.amount).sum()
    }

    #[inline]
    pub fn total_duration(&self) -> T {
        self.segments
            .iter()
            .fold(T::zero(), |total, segment| total + segment.duration)
    }

    /// Amount owed after `elapsed` time units.
    ///
    /// Linear segments are interpolated, step segments are due in full as
    /// soon as they are reached. Past the covered duration the result
    /// follows the [`ExceededPolicy`] of the output; a negative duration
    /// costs nothing.
    pub fn amount_at(&self, elapsed: T) -> Amount {
        if elapsed < T::zero() {
            return Amount::ZERO;
        }

        let mut total = Amount::ZERO;
        let mut start = T::zero();
        for segment in &self.segments {
            let end = start + segment.duration;
            if segment.linear {
                if end > elapsed {
                    return total
                        + segment
                            .amount
                            .scale((elapsed - start).widen(), segment.duration.widen());
                }
            } else if end >= elapsed {
                return total + segment.amount;
            }
            total += segment.amount;
            start = end;
        }

        if elapsed > start {
            match self.exceeded_policy {
                ExceededPolicy::Zero => Amount::ZERO,
                ExceededPolicy::Total => total,
            }
        } else {
            total
        }
    }
}

impl<T> std::fmt::Debug for Output<T>
where
    T: TimeNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Output")
            .field("segments", &self.segments)
            .field("exceeded_policy", &self.exceeded_policy)
            .finish()
    }
}

impl<T> std::fmt::Display for Output<T>
where
    T: TimeNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Output ({} segments):", self.segments.len())?;
        for segment in &self.segments {
            writeln!(f, " - {}", segment)?;
        }
        write!(f, "Total: {}", self.total_amount())
    }
}
