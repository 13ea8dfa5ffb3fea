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

//! Tie-break aware reductions.
//!
//! A reduction is described by a single comparator `prefer(candidate, incumbent)` that
//! returns `true` when `candidate` must replace `incumbent`. As long as the comparator is
//! a strict total order over the candidates, the winner does not depend on the order in
//! which candidates are offered. The sequential fold ([`best_by`]) and the concurrent
//! compare-and-swap cell ([`AtomicBestIndex`]) take the very same comparator, so the two
//! execution strategies cannot drift apart.

use std::sync::atomic::{AtomicUsize, Ordering};

const UNSET: usize = usize::MAX;

/// Folds `items` down to the preferred element.
///
/// Returns `None` if `items` is empty.
#[inline]
pub fn best_by<T, I, P>(items: I, mut prefer: P) -> Option<T>
where
    I: IntoIterator<Item = T>,
    P: FnMut(&T, &T) -> bool,
{
    items.into_iter().fold(None, |best, item| match best {
        Some(incumbent) if !prefer(&item, &incumbent) => Some(incumbent),
        _ => Some(item),
    })
}

/// Sequential counterpart of [`AtomicBestIndex`] over plain indices.
#[inline]
pub fn best_index_by<I, P>(candidates: I, prefer: P) -> Option<usize>
where
    I: IntoIterator<Item = usize>,
    P: Fn(usize, usize) -> bool,
{
    best_by(candidates, |&a, &b| prefer(a, b))
}

/// A shared "current best index" cell updated by a compare-and-swap retry loop.
///
/// `usize::MAX` is reserved as the empty marker and can never be offered.
#[derive(Debug)]
pub struct AtomicBestIndex {
    best: AtomicUsize,
}

impl AtomicBestIndex {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self {
            best: AtomicUsize::new(UNSET),
        }
    }

    /// Offers `candidate`, replacing the current best if `prefer(candidate, current)`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `candidate` is `usize::MAX`.
    #[inline]
    pub fn offer<P>(&self, candidate: usize, prefer: P)
    where
        P: Fn(usize, usize) -> bool,
    {
        debug_assert!(
            candidate != UNSET,
            "called `AtomicBestIndex::offer` with the reserved index usize::MAX"
        );

        let mut current = self.best.load(Ordering::Acquire);
        loop {
            if current != UNSET && !prefer(candidate, current) {
                return;
            }
            match self.best.compare_exchange_weak(
                current,
                candidate,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }

    /// Returns the best index offered so far.
    #[inline]
    pub fn get(&self) -> Option<usize> {
        match self.best.load(Ordering::Acquire) {
            UNSET => None,
            index => Some(index),
        }
    }
}

impl Default for AtomicBestIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // Higher value wins, lower index breaks ties.
    fn prefer_max(values: &[i32]) -> impl Fn(usize, usize) -> bool + '_ {
        move |a, b| values[a] > values[b] || (values[a] == values[b] && a < b)
    }

    #[test]
    fn test_best_by_empty_is_none() {
        assert_eq!(best_by(Vec::<u8>::new(), |a, b| a < b), None);
        assert_eq!(AtomicBestIndex::new().get(), None);
    }

    #[test]
    fn test_best_index_breaks_ties_with_comparator() {
        let values = [3, 7, 1, 7, 2];
        assert_eq!(best_index_by(0..values.len(), prefer_max(&values)), Some(1));
    }

    #[test]
    fn test_atomic_cell_matches_fold_regardless_of_offer_order() {
        let values = [3, 7, 1, 7, 2];
        let cell = AtomicBestIndex::new();
        for i in [4, 3, 2, 1, 0] {
            cell.offer(i, prefer_max(&values));
        }
        assert_eq!(cell.get(), Some(1));
    }

    #[test]
    fn test_atomic_cell_under_contention() {
        let values: Vec<i32> = (0..2000).map(|i| (i * 7919 % 613) as i32).collect();
        let expected = best_index_by(0..values.len(), prefer_max(&values));
        let cell = AtomicBestIndex::new();
        std::thread::scope(|s| {
            for t in 0..4 {
                let cell = &cell;
                let values = &values;
                s.spawn(move || {
                    for i in (t..values.len()).step_by(4) {
                        cell.offer(i, prefer_max(values));
                    }
                });
            }
        });
        assert_eq!(cell.get(), expected);
    }

    proptest! {
        #[test]
        fn test_fold_is_order_independent(values in proptest::collection::vec(-50i32..50, 1..40)) {
            let forward = best_index_by(0..values.len(), prefer_max(&values)).unwrap();
            let backward = best_index_by((0..values.len()).rev(), prefer_max(&values)).unwrap();
            prop_assert_eq!(forward, backward);
            let max = *values.iter().max().unwrap();
            prop_assert_eq!(values.iter().position(|&v| v == max).unwrap(), forward);
        }
    }
}
