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

//! Fan-out monitor
//!
//! `CompositeMonitor` forwards every event to its children in insertion
//! order, so logging, counting and test probes can be combined without
//! coupling them to the solver.

use crate::{
    monitor::solver_monitor::SolverMonitor, priority::Priority, resolution::Resolution,
    stats::SolverStatistics,
};
use kerb_core::num::time::TimeNumeric;
use kerb_model::rule::Rule;

/// A monitor that aggregates multiple monitors and forwards events to all of them.
pub struct CompositeMonitor<'a, T>
where
    T: TimeNumeric,
{
    monitors: Vec<Box<dyn SolverMonitor<T> + 'a>>,
}

impl<'a, T> Default for CompositeMonitor<'a, T>
where
    T: TimeNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> CompositeMonitor<'a, T>
where
    T: TimeNumeric,
{
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    /// Adds a new monitor.
    #[inline(always)]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: SolverMonitor<T> + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    #[inline(always)]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn SolverMonitor<T> + 'a>) {
        self.monitors.push(monitor);
    }

    #[inline(always)]
    pub fn monitors(&self) -> &[Box<dyn SolverMonitor<T> + 'a>] {
        &self.monitors
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a, T> FromIterator<Box<dyn SolverMonitor<T> + 'a>> for CompositeMonitor<'a, T>
where
    T: TimeNumeric,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn SolverMonitor<T> + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> SolverMonitor<T> for CompositeMonitor<'a, T>
where
    T: TimeNumeric,
{
    #[inline(always)]
    fn name(&self) -> &str {
        "CompositeMonitor"
    }

    fn on_rule_received(&mut self, rule: &Rule<T>, priority: Priority, statistics: &SolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_rule_received(rule, priority, statistics);
        }
    }

    fn on_conflict(
        &mut self,
        candidate: &Rule<T>,
        blocker: &Rule<T>,
        resolution: &Resolution<T>,
        statistics: &SolverStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_conflict(candidate, blocker, resolution, statistics);
        }
    }

    fn on_flat_rate_activated(
        &mut self,
        flat_rate: &Rule<T>,
        candidate: &Rule<T>,
        crossing: T,
        statistics: &SolverStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_flat_rate_activated(flat_rate, candidate, crossing, statistics);
        }
    }

    fn on_fragment_committed(&mut self, fragment: &Rule<T>, statistics: &SolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_fragment_committed(fragment, statistics);
        }
    }

    fn on_rule_discarded(&mut self, rule: &Rule<T>, statistics: &SolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_rule_discarded(rule, statistics);
        }
    }
}
