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

use crate::{
    amount::Amount,
    policy::{DurationType, ResolutionPolicy, StartTimePolicy},
};
use kerb_core::{math::span::RelativeTimeSpan, num::time::TimeNumeric};
use std::collections::BTreeMap;

/// Free-form key/value annotations carried from a rule into its output segments.
pub type Metadata = BTreeMap<String, String>;

/// A billing rule: a time span whose cost grows linearly from
/// `start_amount` at `from` to `end_amount` at `to`, together with the
/// policies that decide how it yields to higher-priority rules.
///
/// Every transformation returns a new rule and appends a line to its
/// trace; the receiver is never modified.
#[derive(Clone, PartialEq, Eq)]
pub struct Rule<T>
where
    T: TimeNumeric,
{
    name: String,
    span: RelativeTimeSpan<T>,
    start_amount: Amount,
    end_amount: Amount,
    start_time_policy: StartTimePolicy,
    resolution_policy: ResolutionPolicy,
    duration_type: DurationType,
    trace: Vec<String>,
    meta: Metadata,
}

impl<T> Rule<T>
where
    T: TimeNumeric,
{
    /// Creates a new rule. The duration type is derived from `end_amount`.
    pub fn new(
        name: impl Into<String>,
        span: RelativeTimeSpan<T>,
        start_amount: Amount,
        end_amount: Amount,
        start_time_policy: StartTimePolicy,
        resolution_policy: ResolutionPolicy,
    ) -> Self {
        Self {
            name: name.into(),
            span,
            start_amount,
            end_amount,
            start_time_policy,
            resolution_policy,
            duration_type: DurationType::from_amount(end_amount),
            trace: Vec::new(),
            meta: Metadata::new(),
        }
    }

    /// A shiftable linear rule lasting `duration`, charging `amount` in total.
    ///
    /// # Panics
    ///
    /// Panics if `duration` is negative.
    pub fn linear_sequential(name: impl Into<String>, duration: T, amount: Amount) -> Self {
        Self::new(
            name,
            RelativeTimeSpan::with_duration(T::zero(), duration),
            Amount::ZERO,
            amount,
            StartTimePolicy::Shiftable,
            ResolutionPolicy::Resolve,
        )
    }

    /// A shiftable step rule lasting `duration`, charging `amount` as soon as it starts.
    ///
    /// # Panics
    ///
    /// Panics if `duration` is negative.
    pub fn fixed_rate_sequential(name: impl Into<String>, duration: T, amount: Amount) -> Self {
        Self::new(
            name,
            RelativeTimeSpan::with_duration(T::zero(), duration),
            amount,
            amount,
            StartTimePolicy::Shiftable,
            ResolutionPolicy::Resolve,
        )
    }

    /// A linear rule pinned to `span`, charging `amount` over the whole span.
    pub fn linear_fixed(name: impl Into<String>, span: RelativeTimeSpan<T>, amount: Amount) -> Self {
        Self::new(
            name,
            span,
            Amount::ZERO,
            amount,
            StartTimePolicy::Fixed,
            ResolutionPolicy::Truncate,
        )
    }

    /// A step rule pinned to `span`.
    pub fn fixed_rate_fixed(name: impl Into<String>, span: RelativeTimeSpan<T>, amount: Amount) -> Self {
        Self::new(
            name,
            span,
            amount,
            amount,
            StartTimePolicy::Fixed,
            ResolutionPolicy::Truncate,
        )
    }

    /// A flat-rate cap over `span`: once relative rules have accumulated
    /// `amount` inside the span, the rest of the span is free.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is zero; use [`Rule::non_paying_fixed`] for free holes.
    pub fn flat_rate_fixed(name: impl Into<String>, span: RelativeTimeSpan<T>, amount: Amount) -> Self {
        assert!(
            !amount.is_zero(),
            "called `Rule::flat_rate_fixed` with a zero amount"
        );
        Self::fixed_rate_fixed(name, span, amount)
    }

    /// A zero-amount rule pinned to `span`, marking time that is not billed.
    pub fn non_paying_fixed(name: impl Into<String>, span: RelativeTimeSpan<T>) -> Self {
        Self::fixed_rate_fixed(name, span, Amount::ZERO).with_duration_type(DurationType::NonPaying)
    }

    /// Attaches a metadata entry.
    #[inline]
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    #[inline]
    pub fn with_duration_type(mut self, duration_type: DurationType) -> Self {
        self.duration_type = duration_type;
        self
    }

    #[inline]
    pub fn with_start_time_policy(mut self, policy: StartTimePolicy) -> Self {
        self.start_time_policy = policy;
        self
    }

    #[inline]
    pub fn with_resolution_policy(mut self, policy: ResolutionPolicy) -> Self {
        self.resolution_policy = policy;
        self
    }

    /// Replaces both amounts, keeping the span and the duration type.
    #[inline]
    pub fn with_amounts(mut self, start_amount: Amount, end_amount: Amount) -> Self {
        self.start_amount = start_amount;
        self.end_amount = end_amount;
        self
    }

    /// Appends a line to the trace.
    #[inline]
    pub fn traced(mut self, note: impl Into<String>) -> Self {
        self.trace.push(note.into());
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn span(&self) -> RelativeTimeSpan<T> {
        self.span
    }

    #[inline]
    pub fn from(&self) -> T {
        self.span.from()
    }

    #[inline]
    pub fn to(&self) -> T {
        self.span.to()
    }

    #[inline]
    pub fn duration(&self) -> T {
        self.span.duration()
    }

    #[inline]
    pub fn start_amount(&self) -> Amount {
        self.start_amount
    }

    #[inline]
    pub fn end_amount(&self) -> Amount {
        self.end_amount
    }

    #[inline]
    pub fn start_time_policy(&self) -> StartTimePolicy {
        self.start_time_policy
    }

    #[inline]
    pub fn resolution_policy(&self) -> ResolutionPolicy {
        self.resolution_policy
    }

    #[inline]
    pub fn duration_type(&self) -> DurationType {
        self.duration_type
    }

    #[inline]
    pub fn trace(&self) -> &[String] {
        &self.trace
    }

    #[inline]
    pub fn meta(&self) -> &Metadata {
        &self.meta
    }

    /// Returns `true` if the amount does not vary over the span.
    #[inline]
    pub fn is_flat_rate(&self) -> bool {
        self.start_amount == self.end_amount
    }

    /// Returns `true` for fixed, non-zero flat rates. These act as caps on
    /// relative rules instead of being billed directly.
    #[inline]
    pub fn is_absolute_flat_rate(&self) -> bool {
        self.is_flat_rate()
            && self.start_time_policy == StartTimePolicy::Fixed
            && !self.end_amount.is_zero()
    }

    #[inline]
    pub fn is_relative(&self) -> bool {
        self.start_time_policy == StartTimePolicy::Shiftable
    }

    /// Amount gained after `elapsed` time units, ignoring the start amount.
    ///
    /// Returns zero for rules without duration.
    #[inline]
    pub fn slope_amount(&self, elapsed: T) -> Amount {
        let duration = self.duration();
        if duration.is_zero() {
            return Amount::ZERO;
        }
        (self.end_amount - self.start_amount).scale(elapsed.widen(), duration.widen())
    }

    /// Amount reached after `elapsed` time units from the rule start.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use kerb_core::math::span::RelativeTimeSpan;
    /// # use kerb_model::{amount::Amount, rule::Rule};
    ///
    /// let rule = Rule::linear_fixed("hourly", RelativeTimeSpan::new(0i64, 60), Amount::from_units(2));
    /// assert_eq!(rule.interpolate(15), Amount::from_micros(500_000));
    /// ```
    #[inline]
    pub fn interpolate(&self, elapsed: T) -> Amount {
        self.start_amount + self.slope_amount(elapsed)
    }

    /// Returns a copy moved to start at `from`, keeping duration and amounts.
    pub fn shifted(&self, from: T) -> Self {
        let mut rule = self.clone();
        rule.span = self.span.shifted_to(from);
        rule.trace.push(format!("shift to {}", from));
        rule
    }

    /// Returns a copy ending at `at`. The start amount is kept and the end
    /// amount follows the original slope.
    ///
    /// # Panics
    ///
    /// Panics if `at` lies before the rule start.
    pub fn truncate_after(&self, at: T) -> Self {
        assert!(
            at >= self.from(),
            "called `Rule::truncate_after` with an offset before the rule start"
        );
        let mut rule = self.clone();
        rule.span = RelativeTimeSpan::new(self.from(), at);
        if !self.duration().is_zero() {
            rule.end_amount = self.interpolate(rule.duration());
        }
        rule.trace.push(format!("truncate after {}", at));
        rule
    }

    /// Returns a copy starting at `at`. The start amount drops to zero and
    /// the end amount is the original slope applied to the retained duration.
    ///
    /// # Panics
    ///
    /// Panics if `at` lies after the rule end.
    pub fn truncate_before(&self, at: T) -> Self {
        assert!(
            at <= self.to(),
            "called `Rule::truncate_before` with an offset after the rule end"
        );
        let mut rule = self.clone();
        rule.span = RelativeTimeSpan::new(at, self.to());
        rule.start_amount = Amount::ZERO;
        if !self.duration().is_zero() {
            rule.end_amount = self.slope_amount(rule.duration());
        }
        rule.trace.push(format!("truncate before {}", at));
        rule
    }

    /// Cuts `[start, end)` out of the rule, returning the leading and the
    /// trailing part.
    pub fn truncate_between(&self, start: T, end: T) -> [Self; 2] {
        [self.truncate_after(start), self.truncate_before(end)]
    }

    /// Opens a hole `[start, end)` in the rule and pushes the remainder
    /// behind it.
    ///
    /// The leading part ends at `start`. The trailing part starts at `end`,
    /// keeps the remaining duration and carries the remaining amount, so
    /// both parts together preserve the original duration and end amount.
    ///
    /// # Panics
    ///
    /// Panics if `start > end` or `start` lies before the rule start.
    pub fn split(&self, start: T, end: T) -> (Self, Self) {
        assert!(
            start <= end,
            "called `Rule::split` with start greater than end"
        );
        let leading = self.truncate_after(start);

        let mut trailing = self.clone();
        trailing.span = RelativeTimeSpan::new(end, self.to() + (end - start));
        trailing.start_amount = Amount::ZERO;
        trailing.end_amount = self.end_amount - leading.end_amount;
        trailing
            .trace
            .push(format!("split between {} and {}", start, end));

        (leading, trailing)
    }

    /// Returns a copy whose end amount does not exceed `limit`.
    ///
    /// A linear rule is cut where it reaches `limit`; a step rule keeps its
    /// span and has its amounts clamped.
    pub fn truncate_after_amount(&self, limit: Amount) -> Self {
        if self.end_amount <= limit {
            return self.clone();
        }

        if self.is_flat_rate() || limit <= self.start_amount || self.duration().is_zero() {
            let mut rule = self.clone();
            rule.start_amount = rule.start_amount.min(limit);
            rule.end_amount = limit;
            rule.trace.push(format!("clamp amount to {}", limit));
            return rule;
        }

        let gained = (limit - self.start_amount).micros() as i128;
        let slope = (self.end_amount - self.start_amount).micros() as i128;
        let elapsed = gained * self.duration().widen() / slope;
        let at = self.from() + T::narrow(elapsed);

        let mut rule = self.truncate_after(at);
        rule.end_amount = limit;
        rule.trace.push(format!("limit amount to {}", limit));
        rule
    }
}

impl<T> std::fmt::Debug for Rule<T>
where
    T: TimeNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("span", &self.span)
            .field("start_amount", &self.start_amount)
            .field("end_amount", &self.end_amount)
            .field("start_time_policy", &self.start_time_policy)
            .field("resolution_policy", &self.resolution_policy)
            .field("duration_type", &self.duration_type)
            .finish()
    }
}

impl<T> std::fmt::Display for Rule<T>
where
    T: TimeNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({} -> {}; {} -> {})",
            self.name,
            self.from(),
            self.to(),
            self.start_amount,
            self.end_amount
        )
    }
}
