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

use crate::amount::Amount;

/// Whether a rule keeps its declared start or is placed after the rules
/// already billed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StartTimePolicy {
    /// The rule stays at its declared offsets.
    #[default]
    Fixed,
    /// The rule is moved to the next free relative start before resolution.
    Shiftable,
}

impl std::fmt::Display for StartTimePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartTimePolicy::Fixed => write!(f, "fixed"),
            StartTimePolicy::Shiftable => write!(f, "shiftable"),
        }
    }
}

/// How a rule gives way when it overlaps a higher-priority rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResolutionPolicy {
    /// Cut away the overlapping part, splitting around an inner blocker.
    #[default]
    Truncate,
    /// Keep the full duration by moving the rule, or the part of it that
    /// overlaps, behind the blocker.
    Resolve,
    /// Drop the rule on any overlap.
    Delete,
}

impl std::fmt::Display for ResolutionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionPolicy::Truncate => write!(f, "truncate"),
            ResolutionPolicy::Resolve => write!(f, "resolve"),
            ResolutionPolicy::Delete => write!(f, "delete"),
        }
    }
}

/// Billing classification of the time covered by a rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DurationType {
    #[default]
    Free,
    Paying,
    NonPaying,
    Banned,
}

impl DurationType {
    /// Classifies a rule by its amount: zero is free, anything else paying.
    #[inline]
    pub fn from_amount(amount: Amount) -> Self {
        if amount.is_zero() { DurationType::Free } else { DurationType::Paying }
    }

    /// Returns the short code used in compact output tables.
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            DurationType::Free => "f",
            DurationType::Paying => "p",
            DurationType::NonPaying => "np",
            DurationType::Banned => "b",
        }
    }
}

impl std::fmt::Display for DurationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DurationType::Free => write!(f, "free"),
            DurationType::Paying => write!(f, "paying"),
            DurationType::NonPaying => write!(f, "nonpaying"),
            DurationType::Banned => write!(f, "banned"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_type_from_amount() {
        assert_eq!(DurationType::from_amount(Amount::ZERO), DurationType::Free);
        assert_eq!(DurationType::from_amount(Amount::UNIT), DurationType::Paying);
        assert_eq!(DurationType::from_amount(-Amount::UNIT), DurationType::Paying);
    }

    #[test]
    fn test_codes_and_display() {
        assert_eq!(DurationType::NonPaying.code(), "np");
        assert_eq!(DurationType::Banned.to_string(), "banned");
        assert_eq!(StartTimePolicy::Shiftable.to_string(), "shiftable");
        assert_eq!(ResolutionPolicy::Delete.to_string(), "delete");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(StartTimePolicy::default(), StartTimePolicy::Fixed);
        assert_eq!(ResolutionPolicy::default(), ResolutionPolicy::Truncate);
    }
}
