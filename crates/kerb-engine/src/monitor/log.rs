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
    monitor::solver_monitor::SolverMonitor, priority::Priority, resolution::Resolution,
    stats::SolverStatistics,
};
use kerb_core::num::time::TimeNumeric;
use kerb_model::rule::Rule;

/// Reports every solver event through the `log` facade at a fixed level.
#[derive(Debug, Clone)]
pub struct LogMonitor<T>
where
    T: TimeNumeric,
{
    level: ::log::Level,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> LogMonitor<T>
where
    T: TimeNumeric,
{
    pub fn new(level: ::log::Level) -> Self {
        Self {
            level,
            _phantom: std::marker::PhantomData,
        }
    }

    #[inline]
    pub fn level(&self) -> ::log::Level {
        self.level
    }
}

impl<T> Default for LogMonitor<T>
where
    T: TimeNumeric,
{
    fn default() -> Self {
        Self::new(::log::Level::Debug)
    }
}

impl<T> std::fmt::Display for LogMonitor<T>
where
    T: TimeNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LogMonitor(level: {})", self.level)
    }
}

impl<T> SolverMonitor<T> for LogMonitor<T>
where
    T: TimeNumeric,
{
    fn on_rule_received(&mut self, rule: &Rule<T>, priority: Priority, statistics: &SolverStatistics) {
        ::log::log!(
            self.level,
            "#{} solving {} at {} ({}, {})",
            statistics.rules_received,
            rule,
            priority,
            rule.start_time_policy(),
            rule.resolution_policy()
        );
    }

    fn on_conflict(
        &mut self,
        candidate: &Rule<T>,
        blocker: &Rule<T>,
        resolution: &Resolution<T>,
        _statistics: &SolverStatistics,
    ) {
        ::log::log!(
            self.level,
            "{} vs {}: {}",
            candidate.name(),
            blocker.name(),
            resolution
        );
    }

    fn on_flat_rate_activated(
        &mut self,
        flat_rate: &Rule<T>,
        candidate: &Rule<T>,
        crossing: T,
        _statistics: &SolverStatistics,
    ) {
        ::log::log!(
            self.level,
            "flat rate {} crossed by {} at {}",
            flat_rate,
            candidate.name(),
            crossing
        );
    }

    fn on_fragment_committed(&mut self, fragment: &Rule<T>, _statistics: &SolverStatistics) {
        ::log::log!(self.level, "committed {}", fragment);
    }

    fn on_rule_discarded(&mut self, rule: &Rule<T>, _statistics: &SolverStatistics) {
        ::log::log!(self.level, "discarded {}", rule);
    }

    fn name(&self) -> &str {
        "LogMonitor"
    }
}
