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

//! Search for the cycle a non-basic cell closes with the basis.
//!
//! The target cell is temporarily made basic and a depth-first search walks from it over
//! basic cells, alternating between hops within a row and hops within a column. From the
//! target the row direction is tried first. Each step takes the first admissible cell in
//! index order: basic, not the current cell, and not yet proven to be a dead end. The
//! search succeeds when a hop lands on the target again.
//!
//! Since the basic cells form a forest, at most one such cycle exists, and the order in
//! which neighbors are examined fully determines the path reported. The forest also means
//! no hop can lead back onto the current path other than at the target, so only dead ends
//! need to be marked.
//!
//! With a parallel strategy the search first discovers, on the worker pool, the row and
//! column neighbors of every cell reachable from the target. Workers share a queue of cells
//! to expand, a set of cells already expanded and a counter of outstanding queue entries;
//! the worker that retires the last entry releases everyone. The backtracking itself then
//! runs unchanged on the precomputed neighbor lists, which keep index order.

use crossbeam_channel::unbounded;
use dashmap::{DashMap, DashSet};
use fixedbitset::FixedBitSet;
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;
use std::sync::atomic::{AtomicUsize, Ordering};
use stevedore_core::{parallel::Parallelism, sync::Semaphore};
use stevedore_model::{allocation_matrix::AllocationMatrix, point::Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hop {
    Row,
    Col,
}

/// Basic neighbors of a cell, in index order.
#[derive(Debug, Clone, Default)]
struct Adjacency {
    in_row: SmallVec<[Point; 8]>,
    in_col: SmallVec<[Point; 8]>,
}

impl Adjacency {
    fn collect(allocation: &AllocationMatrix, point: Point) -> Self {
        let in_row = (0..allocation.num_cols())
            .filter(|&j| j != point.col())
            .map(|j| Point::new(point.row(), j))
            .filter(|&p| allocation.is_basic(p))
            .collect();
        let in_col = (0..allocation.num_rows())
            .filter(|&i| i != point.row())
            .map(|i| Point::new(i, point.col()))
            .filter(|&p| allocation.is_basic(p))
            .collect();
        Self { in_row, in_col }
    }

    #[inline]
    fn along(&self, hop: Hop) -> &[Point] {
        match hop {
            Hop::Row => &self.in_row,
            Hop::Col => &self.in_col,
        }
    }
}

/// Finds the closed alternating path through basic cells starting at a non-basic cell.
///
/// The searcher keeps its scratch buffers between calls and may be used repeatedly
/// against an evolving allocation of the shape it was created for.
#[derive(Debug)]
pub struct CycleSearcher {
    rows: usize,
    cols: usize,
    parallelism: Parallelism,
    visited: FixedBitSet,
    path: Vec<Point>,
    adjacency: DashMap<Point, Adjacency, FxBuildHasher>,
    expanded: DashSet<Point, FxBuildHasher>,
}

impl CycleSearcher {
    /// Creates a searcher for `rows x cols` allocations.
    pub fn new(rows: usize, cols: usize, parallelism: Parallelism) -> Self {
        Self {
            rows,
            cols,
            parallelism,
            visited: FixedBitSet::with_capacity(rows * cols),
            path: Vec::with_capacity(rows + cols),
            adjacency: DashMap::with_hasher(FxBuildHasher),
            expanded: DashSet::with_hasher(FxBuildHasher),
        }
    }

    #[inline]
    pub fn parallelism(&self) -> &Parallelism {
        &self.parallelism
    }

    /// Returns the cycle closed by `target`, starting with `target` itself.
    ///
    /// Cells at odd positions of the cycle are the ones that give up quantity in a pivot.
    /// Returns `None` if making `target` basic would not close a cycle. The allocation is
    /// left exactly as it was passed in.
    ///
    /// # Panics
    ///
    /// Panics if `target` is basic or the allocation does not have the searcher's shape.
    pub fn search_closed(
        &mut self,
        allocation: &mut AllocationMatrix,
        target: Point,
    ) -> Option<&[Point]> {
        assert!(
            allocation.num_rows() == self.rows && allocation.num_cols() == self.cols,
            "called `CycleSearcher::search_closed` with a [{}, {}] allocation on a [{}, {}] searcher",
            allocation.num_rows(),
            allocation.num_cols(),
            self.rows,
            self.cols
        );
        assert!(
            !allocation.is_basic(target),
            "called `CycleSearcher::search_closed` from basic cell {}",
            target
        );

        allocation.make_basic(target);

        let cols = self.cols;
        let found = if self.parallelism.is_sequential() {
            let grid = &*allocation;
            trace(
                &mut self.visited,
                &mut self.path,
                cols,
                target,
                |current, hop, visited| scan(grid, current, hop, visited),
            )
        } else {
            self.discover_adjacency(allocation, target);
            let adjacency = &self.adjacency;
            trace(
                &mut self.visited,
                &mut self.path,
                cols,
                target,
                |current, hop, visited| {
                    let neighbors = adjacency.get(&current)?;
                    neighbors
                        .along(hop)
                        .iter()
                        .copied()
                        .find(|p| !visited.contains(p.to_index(cols)))
                },
            )
        };

        allocation.make_non_basic(target);

        if found {
            Some(self.path.as_slice())
        } else {
            None
        }
    }

    /// Computes the neighbor lists of every cell reachable from `target`.
    fn discover_adjacency(&self, allocation: &AllocationMatrix, target: Point) {
        self.adjacency.clear();
        self.expanded.clear();

        let (sender, receiver) = unbounded::<Point>();
        let outstanding = AtomicUsize::new(1);
        let permits = Semaphore::new(0);
        let workers = self.parallelism.degree();
        if sender.send(target).is_ok() {
            permits.release(1);
        }

        self.parallelism.run_workers(|_| {
            loop {
                permits.acquire();
                // Item permits never outnumber queued cells, so an empty queue means shutdown.
                let Ok(point) = receiver.try_recv() else {
                    break;
                };

                if self.expanded.insert(point) {
                    let neighbors = Adjacency::collect(allocation, point);
                    for &next in neighbors.in_row.iter().chain(neighbors.in_col.iter()) {
                        if self.expanded.contains(&next) {
                            continue;
                        }
                        outstanding.fetch_add(1, Ordering::AcqRel);
                        match sender.send(next) {
                            Ok(()) => permits.release(1),
                            Err(_) => {
                                outstanding.fetch_sub(1, Ordering::AcqRel);
                            }
                        }
                    }
                    self.adjacency.insert(point, neighbors);
                }

                if outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
                    permits.release(workers);
                    break;
                }
            }
        });

        log::trace!(
            "adjacency of {} cells discovered from {}",
            self.adjacency.len(),
            target
        );
    }
}

/// Backtracking over basic cells; `next` yields the first admissible neighbor along a hop.
fn trace<F>(
    visited: &mut FixedBitSet,
    path: &mut Vec<Point>,
    cols: usize,
    target: Point,
    mut next: F,
) -> bool
where
    F: FnMut(Point, Hop, &FixedBitSet) -> Option<Point>,
{
    visited.clear();
    path.clear();
    path.push(target);

    loop {
        let len = path.len();
        let current = path[len - 1];
        let candidate = if len == 1 {
            match next(current, Hop::Row, visited) {
                Some(point) => Some(point),
                None => next(current, Hop::Col, visited),
            }
        } else if path[len - 2].row() == current.row() {
            next(current, Hop::Col, visited)
        } else {
            next(current, Hop::Row, visited)
        };

        match candidate {
            Some(point) if point == target => return true,
            Some(point) => path.push(point),
            None if len == 1 => return false,
            None => {
                visited.insert(current.to_index(cols));
                path.pop();
            }
        }
    }
}

/// First basic, non-dead-end cell along `hop` from `current`, scanning the allocation.
fn scan(
    allocation: &AllocationMatrix,
    current: Point,
    hop: Hop,
    visited: &FixedBitSet,
) -> Option<Point> {
    let cols = allocation.num_cols();
    let admissible =
        |p: &Point| *p != current && allocation.is_basic(*p) && !visited.contains(p.to_index(cols));
    match hop {
        Hop::Row => (0..cols)
            .map(|j| Point::new(current.row(), j))
            .find(admissible),
        Hop::Col => (0..allocation.num_rows())
            .map(|i| Point::new(i, current.col()))
            .find(admissible),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: usize, col: usize) -> Point {
        Point::new(row, col)
    }

    fn plan(rows: &[[u32; 4]]) -> AllocationMatrix {
        AllocationMatrix::from_rows(rows).unwrap()
    }

    fn searchers(rows: usize, cols: usize) -> Vec<CycleSearcher> {
        [1, 2, 4]
            .into_iter()
            .map(|degree| CycleSearcher::new(rows, cols, Parallelism::with_degree(degree).unwrap()))
            .collect()
    }

    #[test]
    fn test_row_direction_is_tried_first() {
        for mut searcher in searchers(3, 4) {
            let mut m = plan(&[[0, 2, 0, 10], [0, 7, 10, 0], [10, 1, 0, 0]]);
            let cycle = searcher.search_closed(&mut m, p(2, 3)).map(<[Point]>::to_vec);
            assert_eq!(cycle, Some(vec![p(2, 3), p(2, 1), p(0, 1), p(0, 3)]));
        }
    }

    #[test]
    fn test_backtracks_out_of_dead_ends() {
        for mut searcher in searchers(3, 4) {
            let mut m = plan(&[[0, 2, 0, 10], [0, 7, 10, 0], [10, 1, 0, 0]]);
            let cycle = searcher.search_closed(&mut m, p(1, 0)).map(<[Point]>::to_vec);
            assert_eq!(cycle, Some(vec![p(1, 0), p(1, 1), p(2, 1), p(2, 0)]));

            let cycle = searcher.search_closed(&mut m, p(0, 2)).map(<[Point]>::to_vec);
            assert_eq!(cycle, Some(vec![p(0, 2), p(0, 1), p(1, 1), p(1, 2)]));
        }
    }

    #[test]
    fn test_no_cycle_restores_target() {
        for mut searcher in searchers(3, 4) {
            let mut m = plan(&[[1, 0, 0, 0], [0, 1, 0, 0], [1, 0, 0, 1]]);
            let before = m.clone();
            assert!(searcher.search_closed(&mut m, p(2, 1)).is_none());
            assert_eq!(m, before);
        }
    }

    #[test]
    fn test_allocation_is_unchanged_after_success() {
        for mut searcher in searchers(3, 4) {
            let mut m = plan(&[[0, 2, 0, 10], [0, 7, 10, 0], [10, 1, 0, 0]]);
            let before = m.clone();
            assert!(searcher.search_closed(&mut m, p(0, 0)).is_some());
            assert_eq!(m, before);
            assert!(!m.is_basic(p(0, 0)));
        }
    }

    #[test]
    fn test_cycle_alternates_rows_and_columns() {
        for mut searcher in searchers(3, 4) {
            let mut m = plan(&[[0, 2, 0, 10], [0, 7, 10, 0], [10, 1, 0, 0]]);
            for target in [p(0, 0), p(1, 3), p(2, 2)] {
                let cycle = searcher.search_closed(&mut m, target).unwrap().to_vec();
                assert_eq!(cycle.len() % 2, 0);
                for k in 0..cycle.len() {
                    let (a, b) = (cycle[k], cycle[(k + 1) % cycle.len()]);
                    if k % 2 == 0 {
                        assert_eq!(a.row(), b.row(), "hop {} of {:?}", k, cycle);
                    } else {
                        assert_eq!(a.col(), b.col(), "hop {} of {:?}", k, cycle);
                    }
                }
            }
        }
    }

    #[test]
    #[should_panic(expected = "from basic cell")]
    fn test_basic_target_is_rejected() {
        let mut searcher = CycleSearcher::new(3, 4, Parallelism::sequential());
        let mut m = plan(&[[0, 2, 0, 10], [0, 7, 10, 0], [10, 1, 0, 0]]);
        let _ = searcher.search_closed(&mut m, p(0, 1));
    }
}
