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

/// A monitor that ignores every event.
#[repr(transparent)]
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct NoOperationMonitor<T>
where
    T: TimeNumeric,
{
    _phantom: std::marker::PhantomData<T>,
}

impl<T> NoOperationMonitor<T>
where
    T: TimeNumeric,
{
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T> SolverMonitor<T> for NoOperationMonitor<T>
where
    T: TimeNumeric,
{
    #[inline(always)]
    fn name(&self) -> &str {
        "NoOperationMonitor"
    }

    #[inline(always)]
    fn on_rule_received(&mut self, _rule: &Rule<T>, _priority: Priority, _statistics: &SolverStatistics) {}

    #[inline(always)]
    fn on_conflict(
        &mut self,
        _candidate: &Rule<T>,
        _blocker: &Rule<T>,
        _resolution: &Resolution<T>,
        _statistics: &SolverStatistics,
    ) {
    }

    #[inline(always)]
    fn on_flat_rate_activated(
        &mut self,
        _flat_rate: &Rule<T>,
        _candidate: &Rule<T>,
        _crossing: T,
        _statistics: &SolverStatistics,
    ) {
    }

    #[inline(always)]
    fn on_fragment_committed(&mut self, _fragment: &Rule<T>, _statistics: &SolverStatistics) {}

    #[inline(always)]
    fn on_rule_discarded(&mut self, _rule: &Rule<T>, _statistics: &SolverStatistics) {}
}
