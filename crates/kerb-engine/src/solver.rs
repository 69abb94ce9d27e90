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

//! Amount-aware conflict resolution.
//!
//! The `Solver` accepts rules in priority order and keeps an ordered,
//! non-overlapping store of accepted pieces. Every incoming rule is
//! resolved against the store according to its own resolution policy:
//!
//! - shiftable rules are first moved to the next free relative start,
//! - each change restarts the scan against the whole store,
//! - the leading piece of a split is committed at once,
//! - absolute flat rates are kept aside and turn into free filler rules
//!   once a relative rule reaches their threshold.
//!
//! ```rust
//! use kerb_core::math::span::RelativeTimeSpan;
//! use kerb_engine::solver::SolverBuilder;
//! use kerb_model::{amount::Amount, rule::Rule};
//!
//! let mut solver = SolverBuilder::<i64>::new().build();
//! solver.append(Rule::non_paying_fixed("lunch", RelativeTimeSpan::new(60, 90)));
//! solver.append(Rule::linear_sequential("hourly", 120, Amount::from_units(2)));
//!
//! let spans: Vec<_> = solver.rules().map(|rule| (rule.name().to_string(), rule.span())).collect();
//! assert_eq!(
//!     spans,
//!     vec![
//!         ("hourly".to_string(), RelativeTimeSpan::new(0, 60)),
//!         ("lunch".to_string(), RelativeTimeSpan::new(60, 90)),
//!         ("hourly".to_string(), RelativeTimeSpan::new(90, 150)),
//!     ]
//! );
//! ```

use crate::{
    flat_rate::{self, Totals},
    monitor::{no_op::NoOperationMonitor, solver_monitor::SolverMonitor},
    priority::Priority,
    resolution::{self, Resolution},
    stats::SolverStatistics,
    store::{OrderedStore, StoreEntry},
};
use kerb_core::{math::span::RelativeTimeSpan, num::time::TimeNumeric};
use kerb_model::{amount::Amount, rule::Rule};

/// An absolute flat rate in registration order. Rates sharing window and
/// amount are told apart by `sequence`, the earlier one sorting first.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RegisteredFlatRate<T>
where
    T: TimeNumeric,
{
    rule: Rule<T>,
    sequence: usize,
}

impl<T> StoreEntry for RegisteredFlatRate<T>
where
    T: TimeNumeric,
{
    type Key = (T, Amount, T, usize);

    #[inline]
    fn key(&self) -> Self::Key {
        (
            self.rule.from(),
            self.rule.start_amount(),
            self.rule.to(),
            self.sequence,
        )
    }
}

pub struct Solver<'a, T>
where
    T: TimeNumeric,
{
    rules: OrderedStore<Rule<T>>,
    flat_rates: OrderedStore<RegisteredFlatRate<T>>,
    next_relative_start: T,
    totals: Totals,
    last_priority: Option<Priority>,
    monitor: Box<dyn SolverMonitor<T> + 'a>,
    statistics: SolverStatistics,
}

impl<'a, T> Default for Solver<'a, T>
where
    T: TimeNumeric + 'a,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> Solver<'a, T>
where
    T: TimeNumeric + 'a,
{
    /// Creates an empty solver starting at offset zero with nothing committed.
    #[inline]
    pub fn new() -> Self {
        SolverBuilder::new().build()
    }

    /// Appends `rule` with the priority following the last accepted one.
    #[inline]
    pub fn append(&mut self, rule: Rule<T>) {
        let priority = self
            .last_priority
            .map_or(Priority::HIGHEST, |priority| priority.next());
        self.insert(priority, rule);
    }

    /// Appends every rule in declaration order.
    pub fn append_all<I>(&mut self, rules: I)
    where
        I: IntoIterator<Item = Rule<T>>,
    {
        for rule in rules {
            self.append(rule);
        }
    }

    /// Inserts `rule` with an explicit `priority`.
    ///
    /// # Panics
    ///
    /// Panics if `priority` precedes a priority that was already accepted.
    pub fn insert(&mut self, priority: Priority, rule: Rule<T>) {
        if let Some(last) = self.last_priority {
            assert!(
                !priority.precedes(last),
                "called `Solver::insert` with a priority higher than an accepted one: {} < {}",
                priority,
                last
            );
        }
        self.last_priority = Some(priority);

        self.statistics.on_rule_received();
        self.monitor
            .on_rule_received(&rule, priority, &self.statistics);

        if rule.is_absolute_flat_rate() {
            self.statistics.on_flat_rate_registered();
            let sequence = self.flat_rates.len();
            self.flat_rates.insert(RegisteredFlatRate { rule, sequence });
            return;
        }

        self.solve_and_commit(rule);
    }

    /// Inserts a batch of explicitly prioritized rules.
    ///
    /// The batch is sorted by priority first. Rules sharing a priority keep
    /// their relative order.
    ///
    /// # Panics
    ///
    /// Panics if the highest priority of the batch precedes a priority that
    /// was already accepted.
    pub fn solve_all<I>(&mut self, rules: I)
    where
        I: IntoIterator<Item = (Priority, Rule<T>)>,
    {
        let mut batch: Vec<(Priority, Rule<T>)> = rules.into_iter().collect();
        batch.sort_by_key(|(priority, _)| *priority);
        for (priority, rule) in batch {
            self.insert(priority, rule);
        }
    }

    /// Accepted rules in ascending order.
    #[inline]
    pub fn rules(&self) -> impl DoubleEndedIterator<Item = &Rule<T>> + ExactSizeIterator + '_ {
        self.rules.iter()
    }

    /// Registered absolute flat rates in ascending order.
    #[inline]
    pub fn flat_rates(&self) -> impl DoubleEndedIterator<Item = &Rule<T>> + ExactSizeIterator + '_ {
        self.flat_rates.iter().map(|registered| &registered.rule)
    }

    #[inline]
    pub fn to_vec(&self) -> Vec<Rule<T>> {
        self.rules.to_vec()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the accepted rules intersecting `span`, with rules that
    /// straddle a boundary truncated to it.
    pub fn extract(&self, span: RelativeTimeSpan<T>) -> Vec<Rule<T>> {
        self.rules
            .iter()
            .filter(|rule| rule.span().intersects(span))
            .map(|rule| {
                let mut piece = rule.clone();
                if piece.from() < span.from() {
                    piece = piece.truncate_before(span.from());
                }
                if piece.to() > span.to() {
                    piece = piece.truncate_after(span.to());
                }
                piece
            })
            .collect()
    }

    /// Offset at which the next shiftable rule starts.
    #[inline]
    pub fn next_relative_start(&self) -> T {
        self.next_relative_start
    }

    /// Sum of the end amounts of every committed piece.
    #[inline]
    pub fn committed_amount(&self) -> Amount {
        self.totals.committed
    }

    /// Sum of the flat rates activated so far.
    #[inline]
    pub fn activated_flat_rates(&self) -> Amount {
        self.totals.activated
    }

    #[inline]
    pub fn statistics(&self) -> &SolverStatistics {
        &self.statistics
    }

    #[inline]
    pub fn monitor(&self) -> &dyn SolverMonitor<T> {
        &*self.monitor
    }

    fn solve_and_commit(&mut self, rule: Rule<T>) {
        let mut candidate = rule;
        let mut advance = T::zero();
        if candidate.is_relative() {
            candidate = candidate.shifted(self.next_relative_start);
            advance = candidate.duration();
        }

        if let Some(survivor) = self.resolve_against_store(candidate) {
            self.commit(survivor);
        }

        self.next_relative_start = self.next_relative_start + advance;
    }

    /// Runs the restart loop. Returns the piece left once a full scan
    /// changes nothing, or `None` if the candidate was dropped.
    fn resolve_against_store(&mut self, mut candidate: Rule<T>) -> Option<Rule<T>> {
        loop {
            if candidate.duration().is_zero() {
                self.discard(&candidate);
                return None;
            }

            if candidate.is_relative() {
                self.activate_flat_rate(&candidate);
            }

            let conflict = self.rules.iter().find_map(|blocker| {
                let resolution = resolution::resolve(&candidate, blocker);
                resolution.is_changed().then_some((blocker, resolution))
            });
            let Some((blocker, resolution)) = conflict else {
                return Some(candidate);
            };

            self.statistics.on_conflict();
            self.monitor
                .on_conflict(&candidate, blocker, &resolution, &self.statistics);

            match resolution {
                Resolution::Untouched => return Some(candidate),
                Resolution::Deleted => {
                    self.discard(&candidate);
                    return None;
                }
                Resolution::Replaced(next) => candidate = next,
                Resolution::Split(leading, trailing) => {
                    self.commit(leading);
                    candidate = trailing;
                }
            }

            self.statistics.on_scan_restart();
        }
    }

    fn activate_flat_rate(&mut self, candidate: &Rule<T>) {
        let Some(crossing) = flat_rate::cheapest_crossing(
            self.flat_rates.iter().map(|registered| &registered.rule),
            candidate,
            self.totals,
        )
        else {
            return;
        };

        let filler = flat_rate::filler(&crossing, candidate);
        self.statistics.on_flat_rate_activated();
        self.monitor.on_flat_rate_activated(
            crossing.flat_rate,
            candidate,
            crossing.at,
            &self.statistics,
        );
        self.totals.activated += crossing.flat_rate.end_amount();

        for piece in self.carve(filler) {
            self.commit(piece);
        }
    }

    /// Cuts the parts of `filler` already covered by accepted rules.
    fn carve(&self, filler: Rule<T>) -> Vec<Rule<T>> {
        let mut pieces = Vec::new();
        let mut current = Some(filler);

        for blocker in self.rules.iter() {
            let Some(candidate) = current.take() else {
                break;
            };
            match resolution::truncate(&candidate, blocker.span()) {
                Resolution::Untouched => current = Some(candidate),
                Resolution::Deleted => {}
                Resolution::Replaced(next) => current = Some(next),
                Resolution::Split(leading, trailing) => {
                    pieces.push(leading);
                    current = Some(trailing);
                }
            }
        }

        pieces.extend(current);
        pieces.retain(|piece| !piece.duration().is_zero());
        pieces
    }

    fn commit(&mut self, fragment: Rule<T>) {
        if fragment.duration().is_zero() {
            self.discard(&fragment);
            return;
        }

        self.totals.committed += fragment.end_amount();
        self.statistics.on_fragment_committed();
        self.monitor
            .on_fragment_committed(&fragment, &self.statistics);
        self.rules.insert(fragment);
    }

    #[inline]
    fn discard(&mut self, rule: &Rule<T>) {
        self.statistics.on_rule_discarded();
        self.monitor.on_rule_discarded(rule, &self.statistics);
    }
}

impl<'a, T> std::fmt::Debug for Solver<'a, T>
where
    T: TimeNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solver")
            .field("rules", &self.rules)
            .field("flat_rates", &self.flat_rates)
            .field("next_relative_start", &self.next_relative_start)
            .field("totals", &self.totals)
            .field("last_priority", &self.last_priority)
            .field("monitor", &self.monitor.name())
            .finish()
    }
}

impl<'a, T> std::fmt::Display for Solver<'a, T>
where
    T: TimeNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solver ({} rules, {} flat rates)", self.rules.len(), self.flat_rates.len())?;
        for rule in self.rules.iter() {
            writeln!(f, "  {}", rule)?;
        }
        write!(f, "  committed: {}", self.totals.committed)
    }
}

/// Configures a [`Solver`] before any rule is inserted.
pub struct SolverBuilder<'a, T>
where
    T: TimeNumeric,
{
    relative_start: T,
    committed_amount: Amount,
    monitor: Option<Box<dyn SolverMonitor<T> + 'a>>,
}

impl<'a, T> Default for SolverBuilder<'a, T>
where
    T: TimeNumeric + 'a,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> SolverBuilder<'a, T>
where
    T: TimeNumeric + 'a,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            relative_start: T::zero(),
            committed_amount: Amount::ZERO,
            monitor: None,
        }
    }

    /// Sets the offset at which the first shiftable rule starts.
    #[inline]
    pub fn with_relative_start(mut self, start: T) -> Self {
        self.relative_start = start;
        self
    }

    /// Sets the amount considered already committed, for example by an
    /// earlier stay that counts towards the same flat rates.
    #[inline]
    pub fn with_committed_amount(mut self, amount: Amount) -> Self {
        self.committed_amount = amount;
        self
    }

    #[inline]
    pub fn with_monitor<M>(mut self, monitor: M) -> Self
    where
        M: SolverMonitor<T> + 'a,
    {
        self.monitor = Some(Box::new(monitor));
        self
    }

    #[inline]
    pub fn with_monitor_boxed(mut self, monitor: Box<dyn SolverMonitor<T> + 'a>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    #[inline]
    pub fn build(self) -> Solver<'a, T> {
        let monitor: Box<dyn SolverMonitor<T> + 'a> = match self.monitor {
            Some(monitor) => monitor,
            None => Box::new(NoOperationMonitor::new()),
        };

        Solver {
            rules: OrderedStore::new(),
            flat_rates: OrderedStore::new(),
            next_relative_start: self.relative_start,
            totals: Totals {
                committed: self.committed_amount,
                activated: Amount::ZERO,
            },
            last_priority: None,
            monitor,
            statistics: SolverStatistics::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kerb_model::policy::{ResolutionPolicy, StartTimePolicy};
    use proptest::prelude::*;
    use std::{cell::RefCell, rc::Rc};

    fn span(from: i64, to: i64) -> RelativeTimeSpan<i64> {
        RelativeTimeSpan::new(from, to)
    }

    fn units(value: i64) -> Amount {
        Amount::from_units(value)
    }

    fn fixed(name: &str, from: i64, to: i64, policy: ResolutionPolicy) -> Rule<i64> {
        Rule::new(
            name,
            span(from, to),
            Amount::ZERO,
            Amount::ZERO,
            StartTimePolicy::Fixed,
            policy,
        )
    }

    fn shiftable(name: &str, from: i64, to: i64) -> Rule<i64> {
        Rule::new(
            name,
            span(from, to),
            Amount::ZERO,
            Amount::ZERO,
            StartTimePolicy::Shiftable,
            ResolutionPolicy::Truncate,
        )
    }

    fn layout(solver: &Solver<'_, i64>) -> Vec<(String, i64, i64)> {
        solver
            .rules()
            .map(|rule| (rule.name().to_string(), rule.from(), rule.to()))
            .collect()
    }

    fn expected(entries: &[(&str, i64, i64)]) -> Vec<(String, i64, i64)> {
        entries
            .iter()
            .map(|(name, from, to)| (name.to_string(), *from, *to))
            .collect()
    }

    fn policies(a: ResolutionPolicy, b: ResolutionPolicy, c: ResolutionPolicy) -> Solver<'static, i64> {
        let mut solver = Solver::new();
        solver.append(fixed("A", 10, 20, a));
        solver.append(fixed("B", 15, 25, b));
        solver.append(fixed("C", 25, 35, c));
        solver
    }

    struct EventLog {
        events: Rc<RefCell<Vec<String>>>,
    }

    impl SolverMonitor<i64> for EventLog {
        fn on_rule_received(&mut self, rule: &Rule<i64>, priority: Priority, _s: &SolverStatistics) {
            self.events
                .borrow_mut()
                .push(format!("received {} {}", rule.name(), priority));
        }

        fn on_conflict(
            &mut self,
            candidate: &Rule<i64>,
            blocker: &Rule<i64>,
            resolution: &Resolution<i64>,
            _s: &SolverStatistics,
        ) {
            self.events.borrow_mut().push(format!(
                "conflict {} {} {}",
                candidate.name(),
                blocker.name(),
                resolution.kind()
            ));
        }

        fn on_flat_rate_activated(
            &mut self,
            flat_rate: &Rule<i64>,
            candidate: &Rule<i64>,
            crossing: i64,
            _s: &SolverStatistics,
        ) {
            self.events.borrow_mut().push(format!(
                "activated {} by {} at {}",
                flat_rate.name(),
                candidate.name(),
                crossing
            ));
        }

        fn on_fragment_committed(&mut self, fragment: &Rule<i64>, _s: &SolverStatistics) {
            self.events
                .borrow_mut()
                .push(format!("committed {}", fragment.name()));
        }

        fn on_rule_discarded(&mut self, rule: &Rule<i64>, _s: &SolverStatistics) {
            self.events
                .borrow_mut()
                .push(format!("discarded {}", rule.name()));
        }

        fn name(&self) -> &str {
            "EventLog"
        }
    }

    #[test]
    fn test_disjoint_rules_are_kept() {
        let mut solver = Solver::new();
        solver.append(fixed("A", 10, 20, ResolutionPolicy::Truncate));
        solver.append(fixed("B", 30, 40, ResolutionPolicy::Truncate));
        solver.append(fixed("C", 0, 10, ResolutionPolicy::Truncate));

        assert_eq!(
            layout(&solver),
            expected(&[("C", 0, 10), ("A", 10, 20), ("B", 30, 40)])
        );
        assert_eq!(solver.statistics().conflicts, 0);
    }

    #[test]
    fn test_resolve_policy_pushes_rules_back() {
        use ResolutionPolicy::Resolve;
        let solver = policies(Resolve, Resolve, Resolve);
        assert_eq!(
            layout(&solver),
            expected(&[("A", 10, 20), ("B", 20, 30), ("C", 30, 40)])
        );
    }

    #[test]
    fn test_truncate_policy_cuts_overlaps() {
        use ResolutionPolicy::Truncate;
        let solver = policies(Truncate, Truncate, Truncate);
        assert_eq!(
            layout(&solver),
            expected(&[("A", 10, 20), ("B", 20, 25), ("C", 25, 35)])
        );
    }

    #[test]
    fn test_delete_policy_drops_overlapping_rules() {
        use ResolutionPolicy::Delete;
        let solver = policies(Delete, Delete, Delete);
        assert_eq!(layout(&solver), expected(&[("A", 10, 20), ("C", 25, 35)]));
        assert_eq!(solver.statistics().rules_discarded, 1);
    }

    #[test]
    fn test_mixed_policies() {
        use ResolutionPolicy::*;
        let solver = policies(Delete, Resolve, Truncate);
        assert_eq!(
            layout(&solver),
            expected(&[("A", 10, 20), ("B", 20, 30), ("C", 30, 35)])
        );
    }

    #[test]
    fn test_shiftable_rules_fill_free_time() {
        let mut solver = Solver::new();
        solver.append(fixed("A", 10, 20, ResolutionPolicy::Truncate));
        solver.append(fixed("B", 30, 40, ResolutionPolicy::Truncate));
        solver.append(shiftable("C", 0, 10));
        solver.append(shiftable("D", 0, 15));
        solver.append(fixed("Z", 60, 90, ResolutionPolicy::Truncate));
        solver.append(shiftable("E", 5, 15));
        solver.append(shiftable("F", 0, 20));

        assert_eq!(
            layout(&solver),
            expected(&[
                ("C", 0, 10),
                ("A", 10, 20),
                ("D", 20, 25),
                ("E", 25, 30),
                ("B", 30, 40),
                ("F", 40, 55),
                ("Z", 60, 90),
            ])
        );
        assert_eq!(solver.next_relative_start(), 55);
    }

    #[test]
    fn test_shiftable_rules_fill_free_time_in_declared_order() {
        let mut solver = Solver::new();
        solver.append(fixed("A", 10, 20, ResolutionPolicy::Truncate));
        solver.append(fixed("B", 30, 40, ResolutionPolicy::Truncate));
        solver.append(shiftable("C", 0, 10));
        solver.append(shiftable("D", 0, 15));
        solver.append(shiftable("E", 5, 15));
        solver.append(fixed("Z", 60, 90, ResolutionPolicy::Truncate));
        solver.append(shiftable("F", 0, 20));

        assert_eq!(
            layout(&solver),
            expected(&[
                ("C", 0, 10),
                ("A", 10, 20),
                ("D", 20, 25),
                ("E", 25, 30),
                ("B", 30, 40),
                ("F", 40, 55),
                ("Z", 60, 90),
            ])
        );
        assert_eq!(solver.next_relative_start(), 55);
    }

    #[test]
    fn test_split_commits_leading_piece() {
        let mut solver = Solver::new();
        solver.append(fixed("A", 10, 20, ResolutionPolicy::Truncate));
        solver.append(fixed("B", 30, 40, ResolutionPolicy::Truncate));
        solver.append(shiftable("C", 15, 25));
        solver.append(shiftable("D", 0, 35));
        solver.append(fixed("Z", 60, 90, ResolutionPolicy::Truncate));
        solver.append(shiftable("E", 5, 25));

        assert_eq!(
            layout(&solver),
            expected(&[
                ("C", 0, 10),
                ("A", 10, 20),
                ("D", 20, 30),
                ("B", 30, 40),
                ("D", 40, 45),
                ("E", 45, 60),
                ("Z", 60, 90),
            ])
        );

        let statistics = solver.statistics();
        assert_eq!(statistics.rules_received, 6);
        assert_eq!(statistics.conflicts, 3);
        assert_eq!(statistics.scan_restarts, 3);
        assert_eq!(statistics.fragments_committed, 7);
        assert_eq!(statistics.rules_discarded, 0);
    }

    #[test]
    fn test_explicit_priority_overrides_declaration_order() {
        let mut solver = Solver::new();
        solver.solve_all(vec![
            (Priority::new(1), fixed("A", 10, 20, ResolutionPolicy::Truncate)),
            (Priority::new(0), fixed("B", 5, 35, ResolutionPolicy::Truncate)),
        ]);

        assert_eq!(layout(&solver), expected(&[("B", 5, 35)]));
        assert_eq!(solver.statistics().rules_discarded, 1);
    }

    #[test]
    fn test_equal_priorities_keep_declaration_order() {
        let mut solver = Solver::new();
        solver.solve_all(vec![
            (Priority::new(2), fixed("late", 0, 10, ResolutionPolicy::Truncate)),
            (Priority::new(1), fixed("first", 5, 15, ResolutionPolicy::Truncate)),
            (Priority::new(1), fixed("second", 0, 10, ResolutionPolicy::Truncate)),
        ]);

        assert_eq!(
            layout(&solver),
            expected(&[("second", 0, 5), ("first", 5, 15)])
        );
    }

    #[test]
    #[should_panic(expected = "called `Solver::insert` with a priority higher than an accepted one")]
    fn test_insert_rejects_higher_priority() {
        let mut solver = Solver::new();
        solver.insert(Priority::new(3), fixed("A", 0, 10, ResolutionPolicy::Truncate));
        solver.insert(Priority::new(1), fixed("B", 10, 20, ResolutionPolicy::Truncate));
    }

    #[test]
    fn test_append_continues_after_explicit_priority() {
        let mut solver = Solver::new();
        solver.insert(Priority::new(4), fixed("A", 0, 10, ResolutionPolicy::Truncate));
        solver.append(fixed("B", 5, 15, ResolutionPolicy::Truncate));

        assert_eq!(layout(&solver), expected(&[("A", 0, 10), ("B", 10, 15)]));
    }

    #[test]
    fn test_absolute_flat_rates_are_kept_aside() {
        let mut solver = Solver::new();
        solver.append(Rule::flat_rate_fixed("day", span(0, 1440), units(4)));
        solver.append(Rule::linear_fixed("entry", span(0, 10), units(1)));

        assert_eq!(layout(&solver), expected(&[("entry", 0, 10)]));
        assert_eq!(solver.flat_rates().count(), 1);
        assert_eq!(solver.statistics().flat_rates_registered, 1);
        assert_eq!(solver.activated_flat_rates(), Amount::ZERO);
    }

    #[test]
    fn test_flat_rates_sharing_window_and_amount_are_all_kept() {
        let mut solver = Solver::new();
        solver.append(Rule::flat_rate_fixed("zone-a", span(120, 840), units(4)));
        solver.append(Rule::flat_rate_fixed("zone-b", span(120, 840), units(4)));
        solver.append(Rule::linear_sequential("hourly", 600, units(10)));

        let names: Vec<&str> = solver.flat_rates().map(|rule| rule.name()).collect();
        assert_eq!(names, vec!["zone-a", "zone-b"]);
        assert_eq!(
            solver.statistics().flat_rates_registered,
            solver.flat_rates().len() as u64
        );

        assert_eq!(
            layout(&solver),
            expected(&[("hourly", 0, 240), ("zone-a", 240, 840), ("hourly", 840, 1200)])
        );
        assert_eq!(solver.activated_flat_rates(), units(4));
    }

    #[test]
    fn test_flat_rate_caps_resolving_rule() {
        let mut solver = Solver::new();
        solver.append(Rule::flat_rate_fixed("day", span(120, 840), units(4)));
        solver.append(Rule::linear_sequential("hourly", 600, units(10)));

        let rules = solver.to_vec();
        assert_eq!(
            layout(&solver),
            expected(&[("hourly", 0, 240), ("day", 240, 840), ("hourly", 840, 1200)])
        );
        assert_eq!(rules[0].end_amount(), units(4));
        assert_eq!(rules[1].end_amount(), Amount::ZERO);
        assert_eq!(rules[2].start_amount(), Amount::ZERO);
        assert_eq!(rules[2].end_amount(), units(6));

        assert_eq!(solver.committed_amount(), units(10));
        assert_eq!(solver.activated_flat_rates(), units(4));
        assert_eq!(solver.next_relative_start(), 600);
        assert_eq!(solver.statistics().flat_rate_activations, 1);
        assert_eq!(solver.statistics().fragments_committed, 3);
    }

    #[test]
    fn test_flat_rate_caps_truncating_rule() {
        let mut solver = Solver::new();
        solver.append(Rule::flat_rate_fixed("day", span(120, 840), units(4)));
        solver.append(
            Rule::linear_sequential("hourly", 600, units(10))
                .with_resolution_policy(ResolutionPolicy::Truncate),
        );

        assert_eq!(
            layout(&solver),
            expected(&[("hourly", 0, 240), ("day", 240, 840)])
        );
        assert_eq!(solver.committed_amount(), units(4));
        assert!(
            solver.rules().nth(1).is_some_and(|filler| filler
                .trace()
                .iter()
                .any(|note| note == "derived from flat rate day, crossed by hourly"))
        );
    }

    #[test]
    fn test_activated_flat_rates_raise_later_thresholds() {
        let mut solver = Solver::new();
        solver.append(Rule::flat_rate_fixed("morning", span(0, 240), units(3)));
        solver.append(Rule::flat_rate_fixed("day", span(0, 1440), units(7)));
        solver.append(Rule::linear_sequential("hourly", 600, units(10)));

        assert_eq!(
            layout(&solver),
            expected(&[
                ("hourly", 0, 180),
                ("morning", 180, 240),
                ("hourly", 240, 660),
                ("day", 660, 1440),
            ])
        );
        assert_eq!(solver.activated_flat_rates(), units(10));
        assert_eq!(solver.committed_amount(), units(10));
    }

    #[test]
    fn test_flat_rate_outside_window_is_ignored() {
        let mut solver = Solver::new();
        solver.append(Rule::flat_rate_fixed("night", span(1200, 1440), units(1)));
        solver.append(Rule::linear_sequential("hourly", 600, units(10)));

        assert_eq!(layout(&solver), expected(&[("hourly", 0, 600)]));
        assert_eq!(solver.activated_flat_rates(), Amount::ZERO);
    }

    #[test]
    fn test_builder_sets_initial_offsets() {
        let mut solver = SolverBuilder::<i64>::new()
            .with_relative_start(30)
            .with_committed_amount(units(2))
            .build();
        solver.append(Rule::linear_sequential("hourly", 60, units(1)));

        assert_eq!(layout(&solver), expected(&[("hourly", 30, 90)]));
        assert_eq!(solver.next_relative_start(), 90);
        assert_eq!(solver.committed_amount(), units(3));
    }

    #[test]
    fn test_zero_duration_rules_are_discarded() {
        let mut solver = Solver::new();
        solver.append(fixed("empty", 10, 10, ResolutionPolicy::Truncate));

        assert!(solver.is_empty());
        assert_eq!(solver.statistics().rules_discarded, 1);
    }

    #[test]
    fn test_extract_truncates_boundaries() {
        let mut solver = Solver::new();
        solver.append(Rule::linear_fixed("hourly", span(0, 60), units(6)));
        solver.append(Rule::non_paying_fixed("free", span(60, 90)));
        solver.append(Rule::linear_fixed("late", span(120, 180), units(1)));

        let pieces = solver.extract(span(30, 75));
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].span(), span(30, 60));
        assert_eq!(pieces[0].start_amount(), Amount::ZERO);
        assert_eq!(pieces[0].end_amount(), units(3));
        assert_eq!(pieces[1].span(), span(60, 75));

        let inner = solver.extract(span(35, 45));
        assert_eq!(inner.len(), 1);
        assert_eq!(inner[0].span(), span(35, 45));
        assert_eq!(inner[0].end_amount(), units(1));

        // Extraction leaves the store untouched.
        assert_eq!(solver.len(), 3);
    }

    #[test]
    fn test_monitor_receives_events() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut solver = SolverBuilder::new()
            .with_monitor(EventLog {
                events: Rc::clone(&events),
            })
            .build();
        solver.append(fixed("A", 10, 20, ResolutionPolicy::Delete));
        solver.append(fixed("B", 15, 25, ResolutionPolicy::Delete));

        assert_eq!(
            *events.borrow(),
            vec![
                "received A P0",
                "committed A",
                "received B P1",
                "conflict B A deleted",
                "discarded B",
            ]
        );
        assert_eq!(solver.monitor().name(), "EventLog");
    }

    #[test]
    fn test_monitor_sees_flat_rate_activation() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut solver = SolverBuilder::new()
            .with_monitor(EventLog {
                events: Rc::clone(&events),
            })
            .build();
        solver.append(Rule::flat_rate_fixed("day", span(120, 840), units(4)));
        solver.append(Rule::linear_sequential("hourly", 600, units(10)));

        assert!(
            events
                .borrow()
                .iter()
                .any(|event| event == "activated day by hourly at 240")
        );
    }

    fn arbitrary_rule() -> impl Strategy<Value = Rule<i64>> {
        (0i64..200, 0i64..60, 0usize..3, any::<bool>(), 0i64..5, any::<bool>()).prop_map(
            |(from, length, policy, relative, amount, linear)| {
                let policy = [
                    ResolutionPolicy::Truncate,
                    ResolutionPolicy::Resolve,
                    ResolutionPolicy::Delete,
                ][policy];
                let start_time_policy = if relative {
                    StartTimePolicy::Shiftable
                } else {
                    StartTimePolicy::Fixed
                };
                let start = if linear { Amount::ZERO } else { units(amount) };
                Rule::new(
                    "rule",
                    span(from, from + length),
                    start,
                    units(amount),
                    start_time_policy,
                    policy,
                )
            },
        )
    }

    proptest! {
        #[test]
        fn prop_accepted_rules_never_overlap(rules in prop::collection::vec(arbitrary_rule(), 0..24)) {
            let mut solver = Solver::new();
            solver.append_all(rules);

            let accepted = solver.to_vec();
            for rule in &accepted {
                prop_assert!(rule.duration() > 0);
            }
            for pair in accepted.windows(2) {
                prop_assert!(pair[0].to() <= pair[1].from());
            }
        }

        #[test]
        fn prop_resolve_preserves_duration_and_amount(
            blockers in prop::collection::vec((0i64..200, 1i64..40), 0..10),
            duration in 1i64..120,
        ) {
            let mut solver = Solver::new();
            for (from, length) in blockers {
                solver.append(Rule::non_paying_fixed("blocker", span(from, from + length)));
            }
            solver.append(Rule::linear_sequential("candidate", duration, units(3)));

            let pieces: Vec<_> = solver.rules().filter(|rule| rule.name() == "candidate").collect();
            let total_duration: i64 = pieces.iter().map(|rule| rule.duration()).sum();
            let total_amount: Amount = pieces.iter().map(|rule| rule.end_amount()).sum();
            prop_assert_eq!(total_duration, duration);
            prop_assert_eq!(total_amount, units(3));
        }

        #[test]
        fn prop_reading_twice_is_identical(rules in prop::collection::vec(arbitrary_rule(), 0..16)) {
            let mut solver = Solver::new();
            solver.append_all(rules);

            let first = solver.to_vec();
            prop_assert_eq!(&first, &solver.to_vec());

            if let (Some(head), Some(tail)) = (first.first(), first.last()) {
                prop_assert_eq!(&solver.extract(span(head.from(), tail.to())), &first);
            }
        }
    }
}
