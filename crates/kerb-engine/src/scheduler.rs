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

//! Geometry-only partition of sequences over time.
//!
//! Each entry maps a span to the sequence that applies during it. Entries
//! are appended in priority order; a new entry only fills the time not yet
//! claimed by earlier ones.

use crate::store::{OrderedStore, StoreEntry};
use kerb_core::{math::span::RelativeTimeSpan, num::time::TimeNumeric};

/// A span together with the sequence it belongs to.
#[derive(Clone, PartialEq, Eq)]
pub struct SchedulerEntry<T, S>
where
    T: TimeNumeric,
{
    span: RelativeTimeSpan<T>,
    sequence: S,
}

impl<T, S> SchedulerEntry<T, S>
where
    T: TimeNumeric,
{
    #[inline]
    pub fn new(span: RelativeTimeSpan<T>, sequence: S) -> Self {
        Self { span, sequence }
    }

    #[inline]
    pub fn span(&self) -> RelativeTimeSpan<T> {
        self.span
    }

    #[inline]
    pub fn sequence(&self) -> &S {
        &self.sequence
    }
}

impl<T, S> StoreEntry for SchedulerEntry<T, S>
where
    T: TimeNumeric,
{
    type Key = T;

    #[inline]
    fn key(&self) -> T {
        self.span.from()
    }
}

impl<T, S> std::fmt::Debug for SchedulerEntry<T, S>
where
    T: TimeNumeric,
    S: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerEntry")
            .field("span", &self.span)
            .field("sequence", &self.sequence)
            .finish()
    }
}

impl<T, S> std::fmt::Display for SchedulerEntry<T, S>
where
    T: TimeNumeric,
    S: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.span, self.sequence)
    }
}

/// Partitions the timeline between sequences appended in priority order.
#[derive(Clone)]
pub struct Scheduler<T, S>
where
    T: TimeNumeric,
{
    entries: OrderedStore<SchedulerEntry<T, S>>,
}

impl<T, S> Default for Scheduler<T, S>
where
    T: TimeNumeric,
    S: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> Scheduler<T, S>
where
    T: TimeNumeric,
    S: Clone,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: OrderedStore::new(),
        }
    }

    /// Appends `sequence` over `span` with a priority lower than every entry
    /// appended so far.
    ///
    /// The span is cut around every accepted entry it overlaps. Pieces of
    /// zero duration are dropped.
    pub fn append(&mut self, span: RelativeTimeSpan<T>, sequence: S) {
        let mut pieces: Vec<RelativeTimeSpan<T>> = Vec::new();
        let mut current = Some(span);

        for accepted in self.entries.iter() {
            let Some(candidate) = current else {
                break;
            };
            let remaining = candidate.difference(accepted.span());
            match remaining.as_slice() {
                [] => current = None,
                [single] => current = Some(*single),
                [leading, trailing] => {
                    pieces.push(*leading);
                    current = Some(*trailing);
                }
                _ => unreachable!("span difference yields at most two spans"),
            }
        }

        pieces.extend(current);
        for piece in pieces.into_iter().filter(|p| !p.is_empty()) {
            log::trace!("scheduler accepted {}", piece);
            self.entries
                .insert(SchedulerEntry::new(piece, sequence.clone()));
        }
    }

    /// Appends `sequence` over each validity window.
    ///
    /// Windows are relative to the start of the billing window: negative
    /// starts are clamped to zero and windows ending at or before zero are
    /// ignored.
    pub fn add_windows<I>(&mut self, sequence: S, windows: I)
    where
        I: IntoIterator<Item = RelativeTimeSpan<T>>,
    {
        for window in windows {
            if window.to() <= T::zero() {
                log::trace!("scheduler ignored window {} ending before zero", window);
                continue;
            }
            let from = window.from().max(T::zero());
            self.append(RelativeTimeSpan::new(from, window.to()), sequence.clone());
        }
    }

    /// Returns the sequence active at instant `at`, if any.
    pub fn sequence_at(&self, at: T) -> Option<&S> {
        self.entries
            .last_at_or_before(at)
            .filter(|entry| entry.span().contains_point(at))
            .map(|entry| entry.sequence())
    }

    /// Iterates over the partition in ascending time order.
    #[inline]
    pub fn entries(&self) -> impl Iterator<Item = &SchedulerEntry<T, S>> + '_ {
        self.entries.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T, S> std::fmt::Display for Scheduler<T, S>
where
    T: TimeNumeric,
    S: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Scheduler entries:")?;
        for entry in self.entries.iter() {
            writeln!(f, "  - {}", entry)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(from: i64, to: i64) -> RelativeTimeSpan<i64> {
        RelativeTimeSpan::new(from, to)
    }

    fn partition(scheduler: &Scheduler<i64, &'static str>) -> Vec<(&'static str, i64, i64)> {
        scheduler
            .entries()
            .map(|e| (*e.sequence(), e.span().from(), e.span().to()))
            .collect()
    }

    #[test]
    fn test_lower_priority_fills_gaps() {
        let mut scheduler = Scheduler::new();
        scheduler.append(span(0, 10), "A");
        scheduler.append(span(20, 30), "B");
        scheduler.append(span(5, 25), "C");

        assert_eq!(
            partition(&scheduler),
            vec![("A", 0, 10), ("C", 10, 20), ("B", 20, 30)]
        );
    }

    #[test]
    fn test_split_around_several_entries() {
        let mut scheduler = Scheduler::new();
        scheduler.append(span(10, 20), "A");
        scheduler.append(span(30, 40), "B");
        scheduler.append(span(0, 50), "C");

        assert_eq!(
            partition(&scheduler),
            vec![
                ("C", 0, 10),
                ("A", 10, 20),
                ("C", 20, 30),
                ("B", 30, 40),
                ("C", 40, 50)
            ]
        );
    }

    #[test]
    fn test_covered_entry_is_dropped() {
        let mut scheduler = Scheduler::new();
        scheduler.append(span(0, 100), "A");
        scheduler.append(span(10, 20), "B");
        assert_eq!(partition(&scheduler), vec![("A", 0, 100)]);
    }

    #[test]
    fn test_empty_span_is_ignored() {
        let mut scheduler: Scheduler<i64, &str> = Scheduler::new();
        scheduler.append(span(5, 5), "A");
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_add_windows_clamps_negative_starts() {
        let mut scheduler = Scheduler::new();
        scheduler.add_windows("A", [span(-30, -10), span(-5, 10), span(20, 30)]);
        assert_eq!(partition(&scheduler), vec![("A", 0, 10), ("A", 20, 30)]);
    }

    #[test]
    fn test_sequence_at() {
        let mut scheduler = Scheduler::new();
        scheduler.append(span(0, 10), "A");
        scheduler.append(span(20, 30), "B");

        assert_eq!(scheduler.sequence_at(0), Some(&"A"));
        assert_eq!(scheduler.sequence_at(9), Some(&"A"));
        assert_eq!(scheduler.sequence_at(10), None);
        assert_eq!(scheduler.sequence_at(25), Some(&"B"));
        assert_eq!(scheduler.sequence_at(-1), None);
        assert_eq!(scheduler.sequence_at(30), None);
    }

    #[test]
    fn test_display() {
        let mut scheduler = Scheduler::new();
        scheduler.append(span(0, 10), "A");
        assert_eq!(scheduler.to_string(), "Scheduler entries:\n  - [0, 10) A\n");
    }
}
