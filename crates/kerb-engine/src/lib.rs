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

//! Conflict resolution for prioritized billing intervals.
//!
//! The crate turns an ordered batch of possibly overlapping rules into a
//! non-overlapping, time-ordered partition of the timeline.
//!
//! Components
//! - `store`: ordered collection keyed by a total order over entries.
//! - `resolution`: pairwise resolution of a candidate against a blocker.
//! - `scheduler`: geometry-only partition of sequences over time.
//! - `solver`: amount-aware insertion with shiftable rules and flat-rate caps.
//! - `flat_rate`: detection of the instant a relative rule reaches a cap.
//! - `monitor`: observation hooks for the solver.
//! - `stats`: counters collected while solving.
//! - `limits`: maximum amount and duration applied to solved rules.
//! - `output`: flattening of solved rules into billable segments.
//! - `stitch`: concatenation of per-sequence results along a schedule.

pub mod flat_rate;
pub mod limits;
pub mod monitor;
pub mod output;
pub mod priority;
pub mod resolution;
pub mod scheduler;
pub mod solver;
pub mod stats;
pub mod stitch;
pub mod store;
