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

//! Ordered interval store
//!
//! `OrderedStore` keeps entries sorted by a key derived from the entry
//! itself. Inserting an entry whose key equals a stored one replaces it.
//! The solver keys rules by `(from, start_amount, to)` and the scheduler
//! keys entries by `from`.

use kerb_core::num::time::TimeNumeric;
use kerb_model::{amount::Amount, rule::Rule};
use std::collections::BTreeMap;

/// An entry that can be kept in an [`OrderedStore`].
pub trait StoreEntry {
    /// Total order used by the store.
    type Key: Ord + Copy;

    /// Returns the key of this entry.
    fn key(&self) -> Self::Key;
}

impl<T> StoreEntry for Rule<T>
where
    T: TimeNumeric,
{
    type Key = (T, Amount, T);

    #[inline]
    fn key(&self) -> Self::Key {
        (self.from(), self.start_amount(), self.to())
    }
}

/// A sorted collection of entries owning value copies.
#[derive(Clone, PartialEq, Eq)]
pub struct OrderedStore<E>
where
    E: StoreEntry,
{
    entries: BTreeMap<E::Key, E>,
}

impl<E> Default for OrderedStore<E>
where
    E: StoreEntry,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> OrderedStore<E>
where
    E: StoreEntry,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts `entry`, returning the entry it replaced, if any.
    #[inline]
    pub fn insert(&mut self, entry: E) -> Option<E> {
        self.entries.insert(entry.key(), entry)
    }

    /// Iterates over the entries in ascending key order.
    #[inline]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &E> + ExactSizeIterator + '_ {
        self.entries.values()
    }

    /// Returns the entry with the greatest key less than or equal to `key`.
    #[inline]
    pub fn last_at_or_before(&self, key: E::Key) -> Option<&E> {
        self.entries.range(..=key).next_back().map(|(_, entry)| entry)
    }

    #[inline]
    pub fn first(&self) -> Option<&E> {
        self.entries.values().next()
    }

    #[inline]
    pub fn last(&self) -> Option<&E> {
        self.entries.values().next_back()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<E> OrderedStore<E>
where
    E: StoreEntry + Clone,
{
    /// Copies the entries into a vector in ascending key order.
    #[inline]
    pub fn to_vec(&self) -> Vec<E> {
        self.entries.values().cloned().collect()
    }
}

impl<E> std::fmt::Debug for OrderedStore<E>
where
    E: StoreEntry + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries.values()).finish()
    }
}

impl<'s, E> IntoIterator for &'s OrderedStore<E>
where
    E: StoreEntry,
{
    type Item = &'s E;
    type IntoIter = std::collections::btree_map::Values<'s, E::Key, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

impl<E> Extend<E> for OrderedStore<E>
where
    E: StoreEntry,
{
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        for entry in iter {
            self.insert(entry);
        }
    }
}
