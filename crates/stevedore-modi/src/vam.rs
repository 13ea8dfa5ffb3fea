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

//! Vogel's approximation method.
//!
//! Each step computes, for every open row and column, the *penalty*: the gap between the
//! two cheapest open cells of the line (zero if only one cell is left). The line with the
//! largest penalty is served through its cheapest open cell, which receives as much as
//! the residual supply and demand allow. Lines whose residual reaches zero are closed.
//!
//! Ties are resolved as follows: rows are numbered before columns in one shared line
//! index, so equal penalties favor rows and then the lower index; equal costs inside the
//! served line favor the lower cell index.
//!
//! With a parallel strategy the penalties are computed on the worker pool into disjoint
//! slots, and both selections run as compare-and-swap reductions over shared best-index
//! cells that use the comparators of the sequential scan.

use crate::{
    stages,
    tiebreak::{higher_first, local_best, lower_first},
};
use fixedbitset::FixedBitSet;
use stevedore_core::{
    parallel::Parallelism,
    profile::{NoOpProfiler, StageProfiler},
    reduce::{AtomicBestIndex, best_index_by},
};
use stevedore_model::{
    allocation::AllocationValue, allocation_matrix::AllocationMatrix, num::CostNumeric,
    point::Point, problem::TransportProblem,
};

/// A line of the transportation tableau.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Line {
    Row(usize),
    Col(usize),
}

/// Builds an initial basic feasible solution with Vogel's approximation method.
#[derive(Debug, Clone)]
pub struct Vam<'a, C> {
    problem: &'a TransportProblem<C>,
    parallelism: Parallelism,
}

impl<'a, C> Vam<'a, C>
where
    C: CostNumeric,
{
    #[inline]
    pub fn new(problem: &'a TransportProblem<C>, parallelism: Parallelism) -> Self {
        Self {
            problem,
            parallelism,
        }
    }

    /// Runs the method to completion.
    #[inline]
    pub fn search(&self) -> AllocationMatrix {
        self.search_with_profiler(&mut NoOpProfiler)
    }

    /// Runs the method to completion, reporting stage timings to `profiler`.
    pub fn search_with_profiler<P>(&self, profiler: &mut P) -> AllocationMatrix
    where
        P: StageProfiler,
    {
        let mut state = VamState::new(self.problem);

        while state.has_open_rows() && state.has_open_cols() {
            profiler.enter_stage(stages::ARGMAX_PENALTY);
            let line = self.argmax_penalty(&mut state);
            profiler.exit_stage(stages::ARGMAX_PENALTY);

            profiler.enter_stage(stages::ARGMIN_COST);
            let point = self.argmin_cost(&state, line);
            profiler.exit_stage(stages::ARGMIN_COST);

            state.allocate(point);
        }

        // Only lines with nothing left to ship can remain open here.
        state.close_remaining();
        state.allocation
    }

    fn argmax_penalty(&self, state: &mut VamState<C>) -> Line {
        let m = self.problem.num_sources();
        let problem = self.problem;
        let VamState {
            row_done,
            col_done,
            penalties,
            ..
        } = state;
        let (row_done, col_done) = (&*row_done, &*col_done);

        self.parallelism.fill_slots(penalties, |line, slot| {
            *slot = if line < m {
                (!row_done.contains(line)).then(|| row_penalty(problem, col_done, line))
            } else {
                (!col_done.contains(line - m)).then(|| col_penalty(problem, row_done, line - m))
            };
        });

        let penalties = &*penalties;
        let prefer = |a: usize, b: usize| match (penalties[a], penalties[b]) {
            (Some(pa), Some(pb)) => higher_first(&(pa, a), &(pb, b)),
            (Some(_), None) => true,
            _ => false,
        };

        let best = if self.parallelism.is_sequential() {
            best_index_by(
                (0..penalties.len()).filter(|&line| penalties[line].is_some()),
                prefer,
            )
        } else {
            let best = AtomicBestIndex::new();
            self.parallelism.for_each_index(0..penalties.len(), |line| {
                if penalties[line].is_some() {
                    best.offer(line, prefer);
                }
            });
            best.get()
        };

        match best {
            Some(line) if line < m => Line::Row(line),
            Some(line) => Line::Col(line - m),
            None => unreachable!("called `Vam::argmax_penalty` without open rows and columns"),
        }
    }

    fn argmin_cost(&self, state: &VamState<C>, line: Line) -> Point {
        let n = self.problem.num_destinations();
        let len = match line {
            Line::Row(_) => n,
            Line::Col(_) => self.problem.num_sources(),
        };
        let to_point = move |position: usize| match line {
            Line::Row(i) => Point::new(i, position),
            Line::Col(j) => Point::new(position, j),
        };
        let open = |point: Point| {
            !state.row_done.contains(point.row()) && !state.col_done.contains(point.col())
        };

        let best = if self.parallelism.is_sequential() {
            let cost = |position: usize| {
                let point = to_point(position);
                open(point).then(|| self.problem.cost_at(point))
            };
            local_best(0..len, cost, lower_first).map(|(_, position)| to_point(position))
        } else {
            let best = AtomicBestIndex::new();
            let cost_of = |index: usize| self.problem.cost_at(Point::from_index(index, n));
            let prefer = |a: usize, b: usize| lower_first(&(cost_of(a), a), &(cost_of(b), b));
            self.parallelism.for_each_index(0..len, |position| {
                let point = to_point(position);
                if open(point) {
                    best.offer(point.to_index(n), prefer);
                }
            });
            best.get().map(|index| Point::from_index(index, n))
        };

        match best {
            Some(point) => point,
            None => unreachable!("called `Vam::argmin_cost` on {:?} without open cells", line),
        }
    }
}

/// Gap between the two smallest costs among the open cells of row `i`.
fn row_penalty<C>(problem: &TransportProblem<C>, col_done: &FixedBitSet, i: usize) -> C
where
    C: CostNumeric,
{
    let costs = problem.cost().row(i);
    penalty((0..costs.len()).filter(|&j| !col_done.contains(j)).map(|j| costs[j]))
}

/// Gap between the two smallest costs among the open cells of column `j`.
fn col_penalty<C>(problem: &TransportProblem<C>, row_done: &FixedBitSet, j: usize) -> C
where
    C: CostNumeric,
{
    penalty(
        (0..problem.num_sources())
            .filter(|&i| !row_done.contains(i))
            .map(|i| problem.cost_at(Point::new(i, j))),
    )
}

#[inline]
fn penalty<C, I>(costs: I) -> C
where
    C: CostNumeric,
    I: Iterator<Item = C>,
{
    let mut smallest = C::infinity();
    let mut second = C::infinity();
    for c in costs {
        if c < smallest {
            second = smallest;
            smallest = c;
        } else if c < second {
            second = c;
        }
    }
    if second.is_finite() {
        second - smallest
    } else {
        C::zero()
    }
}

struct VamState<C> {
    supply: Vec<u32>,
    demand: Vec<u32>,
    row_done: FixedBitSet,
    col_done: FixedBitSet,
    open_rows: usize,
    open_cols: usize,
    penalties: Vec<Option<C>>,
    allocation: AllocationMatrix,
}

impl<C> VamState<C>
where
    C: CostNumeric,
{
    fn new(problem: &TransportProblem<C>) -> Self {
        let (m, n) = (problem.num_sources(), problem.num_destinations());
        Self {
            supply: problem.supply().to_vec(),
            demand: problem.demand().to_vec(),
            row_done: FixedBitSet::with_capacity(m),
            col_done: FixedBitSet::with_capacity(n),
            open_rows: m,
            open_cols: n,
            penalties: vec![None; m + n],
            allocation: AllocationMatrix::zeros(m, n),
        }
    }

    #[inline]
    fn has_open_rows(&self) -> bool {
        self.open_rows > 0
    }

    #[inline]
    fn has_open_cols(&self) -> bool {
        self.open_cols > 0
    }

    fn allocate(&mut self, point: Point) {
        let (i, j) = (point.row(), point.col());
        let quantity = self.supply[i].min(self.demand[j]);
        self.allocation
            .set(point, AllocationValue::new(quantity).to_basic());
        self.supply[i] -= quantity;
        self.demand[j] -= quantity;

        if self.supply[i] == 0 {
            self.row_done.insert(i);
            self.open_rows -= 1;
        }
        if self.demand[j] == 0 {
            self.col_done.insert(j);
            self.open_cols -= 1;
        }
    }

    fn close_remaining(&mut self) {
        debug_assert!(
            self.supply.iter().chain(&self.demand).all(|&q| q == 0),
            "called `VamState::close_remaining` with undistributed quantity left"
        );
        self.row_done.insert_range(..);
        self.col_done.insert_range(..);
        self.open_rows = 0;
        self.open_cols = 0;
    }
}
