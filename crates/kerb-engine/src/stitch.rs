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

use crate::{scheduler::Scheduler, solver::Solver};
use kerb_core::num::time::TimeNumeric;
use kerb_model::rule::Rule;

/// Concatenates the solved rules of every sequence over the spans the
/// scheduler assigned to it.
///
/// `solver_for` maps a sequence to the solver holding its rules. Entries
/// whose sequence has no solver are skipped.
pub fn stitch<'s, 'a, T, S, F>(scheduler: &Scheduler<T, S>, mut solver_for: F) -> Vec<Rule<T>>
where
    'a: 's,
    T: TimeNumeric + 'a,
    S: Clone,
    F: FnMut(&S) -> Option<&'s Solver<'a, T>>,
{
    let mut rules = Vec::new();
    for entry in scheduler.entries() {
        match solver_for(entry.sequence()) {
            Some(solver) => rules.extend(solver.extract(entry.span())),
            None => log::debug!("no solved rules for the sequence scheduled over {}", entry.span()),
        }
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use kerb_core::math::span::RelativeTimeSpan;
    use kerb_model::amount::Amount;
    use std::collections::HashMap;

    fn span(from: i64, to: i64) -> RelativeTimeSpan<i64> {
        RelativeTimeSpan::new(from, to)
    }

    fn solver_with(rule: Rule<i64>) -> Solver<'static, i64> {
        let mut solver = Solver::new();
        solver.append(rule);
        solver
    }

    #[test]
    fn test_stitch_follows_schedule() {
        let mut solvers = HashMap::new();
        solvers.insert(
            "day",
            solver_with(Rule::linear_fixed("day rate", span(0, 1440), Amount::from_units(24))),
        );
        solvers.insert(
            "night",
            solver_with(Rule::linear_fixed("night rate", span(0, 1440), Amount::from_units(48))),
        );

        let mut scheduler = Scheduler::new();
        scheduler.append(span(60, 120), "night");
        scheduler.append(span(0, 180), "day");
        scheduler.append(span(180, 240), "unknown");

        let rules = stitch(&scheduler, |sequence| solvers.get(sequence));
        let shape: Vec<_> = rules
            .iter()
            .map(|rule| (rule.name().to_string(), rule.span(), rule.end_amount()))
            .collect();
        assert_eq!(
            shape,
            vec![
                ("day rate".to_string(), span(0, 60), Amount::from_units(1)),
                ("night rate".to_string(), span(60, 120), Amount::from_units(2)),
                ("day rate".to_string(), span(120, 180), Amount::from_units(1)),
            ]
        );
    }

    #[test]
    fn test_stitch_of_empty_schedule() {
        let scheduler: Scheduler<i64, &str> = Scheduler::new();
        let rules = stitch(&scheduler, |_| None::<&Solver<'static, i64>>);
        assert!(rules.is_empty());
    }
}
