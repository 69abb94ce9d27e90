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

//! Compact duration notation such as `1w2d3h4m5s`.
//!
//! Units are weeks, days, hours, minutes and seconds. Each unit is optional
//! but they must appear in that order, and at least one must be present.
//! Parsed durations are expressed in whole seconds.

use crate::error::ParseDurationError;
use regex::Regex;
use std::sync::LazyLock;

static DURATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([0-9]+)w)?(?:([0-9]+)d)?(?:([0-9]+)h)?(?:([0-9]+)m)?(?:([0-9]+)s)?$")
        .expect("duration pattern is a valid regex")
});

pub const SECONDS_PER_MINUTE: i64 = 60;
pub const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
pub const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;
pub const SECONDS_PER_WEEK: i64 = 7 * SECONDS_PER_DAY;

/// Multipliers in capture-group order.
const UNIT_SECONDS: [i64; 5] = [
    SECONDS_PER_WEEK,
    SECONDS_PER_DAY,
    SECONDS_PER_HOUR,
    SECONDS_PER_MINUTE,
    1,
];

/// Parses a duration string into a number of seconds.
///
/// # Examples
///
/// ```rust
/// # use kerb_model::duration::parse_duration;
///
/// assert_eq!(parse_duration("1h30m").unwrap(), 5400);
/// assert!(parse_duration("30m1h").is_err());
/// ```
pub fn parse_duration(s: &str) -> Result<i64, ParseDurationError> {
    if s.is_empty() {
        return Err(ParseDurationError::InvalidPattern(s.to_string()));
    }
    let captures = DURATION_PATTERN
        .captures(s)
        .ok_or_else(|| ParseDurationError::InvalidPattern(s.to_string()))?;

    let out_of_range = || ParseDurationError::OutOfRange(s.to_string());
    let mut total: i64 = 0;
    for (index, multiplier) in UNIT_SECONDS.iter().enumerate() {
        let Some(group) = captures.get(index + 1) else {
            continue;
        };
        let count: i64 = group.as_str().parse().map_err(|_| out_of_range())?;
        total = count
            .checked_mul(*multiplier)
            .and_then(|seconds| total.checked_add(seconds))
            .ok_or_else(out_of_range)?;
    }
    Ok(total)
}
