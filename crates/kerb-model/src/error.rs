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

//! Error types for the text formats accepted by the model.

use thiserror::Error;

/// Errors that can occur when parsing an [`crate::amount::Amount`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    /// The input is empty or does not match `[+-]digits[.digits]`.
    #[error("Invalid amount format: {0:?}")]
    InvalidFormat(String),

    /// The fractional part has more than six digits.
    #[error("Amount {0:?} has more than 6 decimal places")]
    TooPrecise(String),

    /// The value does not fit into the fixed-point representation.
    #[error("Amount {0:?} is out of range")]
    OutOfRange(String),
}

/// Errors that can occur when parsing a duration such as `1w2d3h4m5s`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseDurationError {
    /// The input is empty, uses an unknown unit or lists units out of order.
    #[error("Invalid duration pattern: {0:?}")]
    InvalidPattern(String),

    /// The total number of seconds does not fit into an `i64`.
    #[error("Duration {0:?} is out of range")]
    OutOfRange(String),
}
