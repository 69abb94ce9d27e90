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

use crate::error::ParseAmountError;
use regex::Regex;
use std::{
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
    sync::LazyLock,
};

static AMOUNT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?)([0-9]+)(?:\.([0-9]*))?$").expect("amount pattern is a valid regex")
});

/// Number of micro units in one monetary unit.
const MICROS_PER_UNIT: i64 = 1_000_000;

/// Maximum number of decimal places accepted by [`Amount::parse`].
const MAX_DECIMALS: usize = 6;

/// A signed monetary amount stored as a fixed-point number of micro units.
///
/// `1.50` is stored as `1_500_000`. All arithmetic is exact integer
/// arithmetic; interpolation truncates toward zero.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount(0);

    /// One monetary unit.
    pub const UNIT: Amount = Amount(MICROS_PER_UNIT);

    /// The largest representable amount.
    pub const MAX: Amount = Amount(i64::MAX);

    /// Creates an amount from a raw number of micro units.
    #[inline]
    pub const fn from_micros(micros: i64) -> Self {
        Self(micros)
    }

    /// Creates an amount from a whole number of monetary units.
    ///
    /// # Panics
    ///
    /// Panics if the result does not fit into the fixed-point representation.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        match units.checked_mul(MICROS_PER_UNIT) {
            Some(micros) => Self(micros),
            None => panic!("called `Amount::from_units` with a value that overflows"),
        }
    }

    /// Returns the raw number of micro units.
    #[inline]
    pub const fn micros(&self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns `self * numerator / denominator`, truncated toward zero and
    /// saturated to the representable range.
    ///
    /// # Panics
    ///
    /// Panics if `denominator` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use kerb_model::amount::Amount;
    ///
    /// let hundred = Amount::from_units(100);
    /// assert_eq!(hundred.scale(1, 3), Amount::from_micros(33_333_333));
    /// ```
    #[inline]
    pub fn scale(self, numerator: i128, denominator: i128) -> Self {
        assert!(
            denominator != 0,
            "called `Amount::scale` with a zero denominator"
        );
        let scaled = (self.0 as i128) * numerator / denominator;
        Self(scaled.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Computes the charge of `rate` per `period` over `elapsed`.
    ///
    /// Both durations must be expressed in the same unit.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use kerb_model::amount::Amount;
    ///
    /// // 2.00 per hour over 90 minutes, expressed in seconds.
    /// let charge = Amount::per_period(Amount::from_units(2), 5400, 3600);
    /// assert_eq!(charge, Amount::from_units(3));
    /// ```
    #[inline]
    pub fn per_period(rate: Amount, elapsed: i64, period: i64) -> Self {
        assert!(
            period > 0,
            "called `Amount::per_period` with a non-positive period"
        );
        rate.scale(elapsed as i128, period as i128)
    }

    /// Parses a decimal string such as `"3.50"`, `"-2"` or `"+0.000001"`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use kerb_model::amount::Amount;
    ///
    /// assert_eq!(Amount::parse("1.50").unwrap(), Amount::from_micros(1_500_000));
    /// assert!(Amount::parse("1.1234567").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, ParseAmountError> {
        let captures = AMOUNT_PATTERN
            .captures(s)
            .ok_or_else(|| ParseAmountError::InvalidFormat(s.to_string()))?;

        let negative = &captures[1] == "-";
        let whole: i64 = captures[2]
            .parse()
            .map_err(|_| ParseAmountError::OutOfRange(s.to_string()))?;

        let fraction = captures.get(3).map_or("", |m| m.as_str());
        if fraction.len() > MAX_DECIMALS {
            return Err(ParseAmountError::TooPrecise(s.to_string()));
        }

        let mut fraction_micros: i64 = 0;
        for digit in fraction.bytes() {
            fraction_micros = fraction_micros * 10 + i64::from(digit - b'0');
        }
        for _ in fraction.len()..MAX_DECIMALS {
            fraction_micros *= 10;
        }

        let magnitude = whole
            .checked_mul(MICROS_PER_UNIT)
            .and_then(|micros| micros.checked_add(fraction_micros))
            .ok_or_else(|| ParseAmountError::OutOfRange(s.to_string()))?;

        Ok(Self(if negative { -magnitude } else { magnitude }))
    }
}

impl FromStr for Amount {
    type Err = ParseAmountError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Add for Amount {
    type Output = Amount;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Amount {
    type Output = Amount;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl SubAssign for Amount {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Amount {
    type Output = Amount;

    #[inline]
    fn neg(self) -> Self::Output {
        Amount(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, a| acc + a)
    }
}

impl std::fmt::Debug for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Amount").field(&self.0).finish()
    }
}

/// Formats the amount with three decimals, truncating sub-milli units.
impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let unit = MICROS_PER_UNIT as u64;
        write!(
            f,
            "{}{}.{:03}",
            sign,
            magnitude / unit,
            (magnitude % unit) / 1_000
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let cases = [
            ("0", 0),
            ("2.5", 2_500_000),
            ("1.50", 1_500_000),
            ("5", 5_000_000),
            ("123.5678", 123_567_800),
            ("-2.5", -2_500_000),
            ("-5", -5_000_000),
            ("+1.50", 1_500_000),
            ("1.123456", 1_123_456),
            ("7.", 7_000_000),
            ("2147.50", 2_147_500_000),
        ];
        for (input, micros) in cases {
            assert_eq!(
                Amount::parse(input),
                Ok(Amount::from_micros(micros)),
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn test_parse_negative_below_one() {
        // The sign applies to the fraction even when the whole part is zero.
        assert_eq!(Amount::parse("-0.5"), Ok(Amount::from_micros(-500_000)));
    }

    #[test]
    fn test_parse_invalid_format() {
        for input in ["", "abc", "1,5", "--1", "1.2.3", " 1"] {
            assert!(
                matches!(Amount::parse(input), Err(ParseAmountError::InvalidFormat(_))),
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn test_parse_rejects_non_ascii_digits() {
        for input in ["1.\u{0661}", "\u{0661}", "\u{0663}.5", "\u{FF11}"] {
            assert_eq!(
                Amount::parse(input),
                Err(ParseAmountError::InvalidFormat(input.to_string())),
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn test_parse_too_precise() {
        assert_eq!(
            Amount::parse("1.1234567"),
            Err(ParseAmountError::TooPrecise("1.1234567".to_string()))
        );
    }

    #[test]
    fn test_parse_out_of_range() {
        assert!(matches!(
            Amount::parse("99999999999999999999"),
            Err(ParseAmountError::OutOfRange(_))
        ));
        assert!(matches!(
            Amount::parse("9223372036855"),
            Err(ParseAmountError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_from_str() {
        let a: Amount = "3.25".parse().unwrap();
        assert_eq!(a, Amount::from_micros(3_250_000));
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::from_micros(3_500_000).to_string(), "3.500");
        assert_eq!(Amount::from_micros(-1_500_000).to_string(), "-1.500");
        assert_eq!(Amount::from_micros(1_234_567).to_string(), "1.234");
        assert_eq!(Amount::ZERO.to_string(), "0.000");
        assert_eq!(Amount::from_micros(-500).to_string(), "-0.000");
    }

    #[test]
    fn test_arithmetic() {
        let mut a = Amount::from_units(3);
        a += Amount::from_units(2);
        assert_eq!(a, Amount::from_units(5));
        a -= Amount::UNIT;
        assert_eq!(a, Amount::from_units(4));
        assert_eq!(-a, Amount::from_units(-4));
        assert_eq!(a - Amount::from_units(6), Amount::from_units(-2));
        let total: Amount = [Amount::UNIT, Amount::UNIT, Amount::ZERO].into_iter().sum();
        assert_eq!(total, Amount::from_units(2));
    }

    #[test]
    fn test_scale_truncates_toward_zero() {
        assert_eq!(Amount::from_micros(10).scale(1, 3), Amount::from_micros(3));
        assert_eq!(Amount::from_micros(-10).scale(1, 3), Amount::from_micros(-3));
        assert_eq!(Amount::MAX.scale(2, 1), Amount::MAX);
    }

    #[test]
    #[should_panic(expected = "zero denominator")]
    fn test_scale_zero_denominator_panics() {
        Amount::UNIT.scale(1, 0);
    }

    #[test]
    fn test_per_period() {
        // 1.20 per hour for 25 minutes, in minutes.
        assert_eq!(
            Amount::per_period(Amount::from_micros(1_200_000), 25, 60),
            Amount::from_micros(500_000)
        );
    }
}
