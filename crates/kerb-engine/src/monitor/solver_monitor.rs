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

use crate::{priority::Priority, resolution::Resolution, stats::SolverStatistics};
use kerb_core::num::time::TimeNumeric;
use kerb_model::rule::Rule;

/// Trait for observing the conflict resolution performed by the solver.
pub trait SolverMonitor<T>
where
    T: TimeNumeric,
{
    /// Called when a rule is handed to the solver, before any resolution.
    fn on_rule_received(&mut self, rule: &Rule<T>, priority: Priority, statistics: &SolverStatistics);

    /// Called when resolving `candidate` against the accepted `blocker`
    /// changed the candidate.
    fn on_conflict(
        &mut self,
        candidate: &Rule<T>,
        blocker: &Rule<T>,
        resolution: &Resolution<T>,
        statistics: &SolverStatistics,
    );

    /// Called when `candidate` reaches the threshold of `flat_rate` at `crossing`.
    fn on_flat_rate_activated(
        &mut self,
        flat_rate: &Rule<T>,
        candidate: &Rule<T>,
        crossing: T,
        statistics: &SolverStatistics,
    );

    /// Called after a piece has been inserted into the store.
    fn on_fragment_committed(&mut self, fragment: &Rule<T>, statistics: &SolverStatistics);

    /// Called when a candidate is dropped without leaving any piece behind.
    fn on_rule_discarded(&mut self, rule: &Rule<T>, statistics: &SolverStatistics);

    /// Returns the name of the monitor.
    fn name(&self) -> &str;
}

impl<T> std::fmt::Debug for dyn SolverMonitor<T> + '_
where
    T: TimeNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SolverMonitor({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn SolverMonitor<T> + '_
where
    T: TimeNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SolverMonitor({})", self.name())
    }
}
