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

//! Degeneracy repair by epsilon-perturbation.
//!
//! A plan with fewer than `m + n - 1` basic cells does not span the transportation graph,
//! so potentials are not determined. The repair repeatedly takes the cheapest cell that is
//! neither basic nor already rejected, ties broken by the smaller point. If the cell would
//! close a cycle with the basis it is rejected for good; otherwise it joins the basis as a
//! basic zero.
//!
//! With a parallel strategy the candidate scan is split into contiguous ranges of the
//! compound cell index, each worker reports its local minimum, and the minima are reduced
//! sequentially with the same tie-break.

use crate::{
    cycle::CycleSearcher,
    tiebreak::{local_best, lower_first},
};
use fixedbitset::FixedBitSet;
use stevedore_core::{parallel::Parallelism, reduce::best_by};
use stevedore_model::{
    allocation_matrix::AllocationMatrix, num::CostNumeric, point::Point,
    problem::TransportProblem,
};

/// Turns a degenerate plan into one whose basic cells span the transportation graph.
#[derive(Debug, Clone)]
pub struct EpsilonPerturbation<'a, C> {
    problem: &'a TransportProblem<C>,
    parallelism: Parallelism,
    rejected: FixedBitSet,
    committed_cells: usize,
    rejected_cells: usize,
}

impl<'a, C> EpsilonPerturbation<'a, C>
where
    C: CostNumeric,
{
    pub fn new(problem: &'a TransportProblem<C>, parallelism: Parallelism) -> Self {
        let cells = problem.num_sources() * problem.num_destinations();
        Self {
            problem,
            parallelism,
            rejected: FixedBitSet::with_capacity(cells),
            committed_cells: 0,
            rejected_cells: 0,
        }
    }

    /// Returns the number of cells made basic so far.
    #[inline]
    pub fn committed(&self) -> usize {
        self.committed_cells
    }

    /// Returns the number of cells rejected because they close a cycle.
    #[inline]
    pub fn rejected(&self) -> usize {
        self.rejected_cells
    }

    /// Makes `count` additional cells basic.
    ///
    /// Returns `false` if the candidates ran out first; the cells committed up to that
    /// point stay basic.
    pub fn try_perturb(
        &mut self,
        allocation: &mut AllocationMatrix,
        searcher: &mut CycleSearcher,
        count: usize,
    ) -> bool {
        let mut committed = 0;
        while committed < count {
            let Some(candidate) = self.cheapest_candidate(allocation) else {
                log::debug!(
                    "perturbation ran out of candidates after {} of {} cells",
                    committed,
                    count
                );
                return false;
            };

            if searcher.search_closed(allocation, candidate).is_some() {
                self.rejected
                    .insert(candidate.to_index(self.problem.num_destinations()));
                self.rejected_cells += 1;
                log::trace!("perturbation rejected {}: closes a cycle", candidate);
            } else {
                allocation.make_basic(candidate);
                committed += 1;
                self.committed_cells += 1;
                log::trace!("perturbation committed {} as basic zero", candidate);
            }
        }
        true
    }

    fn cheapest_candidate(&self, allocation: &AllocationMatrix) -> Option<Point> {
        let n = self.problem.num_destinations();
        let cells = self.problem.num_sources() * n;
        let cost = |index: usize| {
            let point = Point::from_index(index, n);
            (!allocation.is_basic(point) && !self.rejected.contains(index))
                .then(|| self.problem.cost_at(point))
        };

        let minima = self
            .parallelism
            .map_chunks(cells, |range| local_best(range, cost, lower_first));
        best_by(minima.into_iter().flatten(), lower_first)
            .map(|(_, index)| Point::from_index(index, n))
    }
}
