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

//! Upper bounds on the amount and duration of a solved tariff.

use kerb_core::num::time::TimeNumeric;
use kerb_model::{amount::Amount, policy::DurationType, rule::Rule};

/// Optional caps applied to the ascending output of a solver.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TariffLimits<T>
where
    T: TimeNumeric,
{
    max_amount: Option<Amount>,
    max_duration: Option<T>,
}

impl<T> Default for TariffLimits<T>
where
    T: TimeNumeric,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TariffLimits<T>
where
    T: TimeNumeric,
{
    /// Limits that let everything through.
    #[inline]
    pub fn new() -> Self {
        Self {
            max_amount: None,
            max_duration: None,
        }
    }

    #[inline]
    pub fn with_max_amount(mut self, amount: Amount) -> Self {
        self.max_amount = Some(amount);
        self
    }

    #[inline]
    pub fn with_max_duration(mut self, duration: T) -> Self {
        self.max_duration = Some(duration);
        self
    }

    #[inline]
    pub fn max_amount(&self) -> Option<Amount> {
        self.max_amount
    }

    #[inline]
    pub fn max_duration(&self) -> Option<T> {
        self.max_duration
    }

    #[inline]
    pub fn is_unlimited(&self) -> bool {
        self.max_amount.is_none() && self.max_duration.is_none()
    }

    /// Moves the limits that are set by the given offsets. Limits that are
    /// not set stay unset.
    pub fn add_offset(&mut self, amount: Amount, duration: T) {
        if let Some(max_amount) = self.max_amount.as_mut() {
            *max_amount += amount;
        }
        if let Some(max_duration) = self.max_duration.as_mut() {
            *max_duration = *max_duration + duration;
        }
    }

    /// Walks `rules` in order and cuts the walk at the first limit hit.
    ///
    /// A rule starting at or after the maximum duration ends the walk and
    /// is dropped. A rule straddling it is truncated there. Non-paying rules
    /// are exempt from the duration limit. A rule that would push the
    /// running total above the maximum amount is cut at the amount instead.
    /// The walk stops right after the first truncated rule.
    pub fn apply(&self, rules: &[Rule<T>]) -> Vec<Rule<T>> {
        if self.is_unlimited() {
            return rules.to_vec();
        }

        let mut total = Amount::ZERO;
        let mut limited = Vec::with_capacity(rules.len());

        for rule in rules {
            let mut rule = rule.clone();
            let mut overflow = false;

            if let Some(max_duration) = self.max_duration {
                if rule.duration_type() != DurationType::NonPaying {
                    if rule.from() >= max_duration {
                        log::debug!("maximum duration {} reached before {}", max_duration, rule);
                        break;
                    }
                    if rule.to() > max_duration {
                        rule = rule.truncate_after(max_duration);
                        overflow = true;
                    }
                }
            }

            if let Some(max_amount) = self.max_amount {
                if total + rule.end_amount() > max_amount {
                    rule = rule.truncate_after_amount(max_amount - total);
                    overflow = true;
                }
            }

            total += rule.end_amount();
            limited.push(rule);

            if overflow {
                log::debug!("tariff limits {} reached at {}", self, total);
                break;
            }
        }

        limited
    }
}

impl<T> std::fmt::Debug for TariffLimits<T>
where
    T: TimeNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TariffLimits")
            .field("max_amount", &self.max_amount)
            .field("max_duration", &self.max_duration)
            .finish()
    }
}

impl<T> std::fmt::Display for TariffLimits<T>
where
    T: TimeNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.max_amount {
            Some(amount) => write!(f, "max amount {}", amount)?,
            None => write!(f, "no max amount")?,
        }
        match self.max_duration {
            Some(duration) => write!(f, ", max duration {}", duration),
            None => write!(f, ", no max duration"),
        }
    }
}

/// Returns the sum of the end amounts of `rules` and the end of the last one.
pub fn sum_all<T>(rules: &[Rule<T>]) -> (Amount, T)
where
    T: TimeNumeric,
{
    let total = rules.iter().map(|rule| rule.end_amount()).sum();
    let end = rules.last().map_or(T::zero(), |rule| rule.to());
    (total, end)
}
