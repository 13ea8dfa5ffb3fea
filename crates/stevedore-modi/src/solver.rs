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

//! # MODI Solver
//!
//! Drives a transportation problem from Vogel's initial plan to an optimal one.
//!
//! ## Flow
//!
//! 1. Vogel's approximation builds a feasible plan (`BfsSearch`).
//! 2. A plan with fewer than `m + n - 1` basic cells is repaired by epsilon-perturbation
//!    (`Perturbation`). Running out of candidates is reported as
//!    [`SolveError::PerturbationExhausted`].
//! 3. Until no lane improves the plan:
//!    - potentials are recomputed for the current basis (`PotentialsCalculation`),
//!    - the non-basic cell with the most negative reduced cost is selected
//!      (`MinReducedCost`), ties broken by the smaller cell,
//!    - the cycle it closes is traced (`CycleSearch`) and the plan pivots along it (`Pivot`).
//!
//! Every step takes the solver's [`Parallelism`]. The pivot itself always runs on the
//! calling thread.
//!
//! ## Usage
//!
//! ```rust
//! use stevedore_core::profile::TimingProfiler;
//! use stevedore_model::problem::TransportProblem;
//! use stevedore_modi::solver::ModiSolverBuilder;
//!
//! let problem = TransportProblem::from_rows(
//!     &[[1.0, 1.0, 9.0, 9.0], [9.0, 2.0, 2.0, 9.0], [9.0, 9.0, 3.0, 3.0], [9.0, 9.0, 9.0, 4.0]],
//!     &[10, 10, 10, 5],
//!     &[5, 10, 10, 10],
//! )
//! .unwrap();
//!
//! let solver = ModiSolverBuilder::new().with_degree(2).unwrap().build();
//! let mut profiler = TimingProfiler::new();
//! let outcome = solver.solve_with_profiler(&problem, &mut profiler).unwrap();
//!
//! assert_eq!(outcome.pivots(), 0);
//! assert_eq!(profiler.stage("Total").unwrap().hits(), 1);
//! ```

use crate::{
    cycle::CycleSearcher,
    perturbation::EpsilonPerturbation,
    potentials::{Potentials, PotentialsCalculator},
    result::ModiOutcome,
    stages,
    stats::ModiStatistics,
    tiebreak::{local_best, lower_first},
    vam::Vam,
};
use std::time::Instant;
use stevedore_core::{
    parallel::{Parallelism, ParallelismError},
    profile::{NoOpProfiler, StageProfiler},
    reduce::best_by,
};
use stevedore_model::{
    allocation_matrix::AllocationMatrix, num::CostNumeric, point::Point,
    problem::TransportProblem,
};

/// Reasons a solve ends without an optimal plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// The degenerate initial plan could not be completed to a spanning basis.
    PerturbationExhausted { required: usize, committed: usize },
    /// The configured pivot limit was reached before optimality was proven.
    PivotLimitReached { limit: u64 },
}

impl std::fmt::Display for SolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveError::PerturbationExhausted {
                required,
                committed,
            } => write!(
                f,
                "Perturbation exhausted its candidates: {} of {} required basic cells committed",
                committed, required
            ),
            SolveError::PivotLimitReached { limit } => {
                write!(f, "Pivot limit of {} reached before optimality", limit)
            }
        }
    }
}

impl std::error::Error for SolveError {}

/// The MODI solver. Create one with [`ModiSolverBuilder`].
#[derive(Debug, Clone, Default)]
pub struct ModiSolver {
    parallelism: Parallelism,
    max_pivots: Option<u64>,
    tolerance: f64,
}

impl ModiSolver {
    #[inline]
    pub fn parallelism(&self) -> &Parallelism {
        &self.parallelism
    }

    #[inline]
    pub fn max_pivots(&self) -> Option<u64> {
        self.max_pivots
    }

    /// Returns the amount by which a reduced cost must fall below zero to trigger a pivot.
    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Solves `problem` to optimality.
    #[inline]
    pub fn solve<C>(&self, problem: &TransportProblem<C>) -> Result<ModiOutcome<C>, SolveError>
    where
        C: CostNumeric,
    {
        self.solve_with_profiler(problem, &mut NoOpProfiler)
    }

    /// Solves `problem` to optimality, reporting stage timings to `profiler`.
    ///
    /// # Panics
    ///
    /// Panics if the basis stops spanning the transportation graph or an entering cell
    /// closes no cycle. Both indicate a corrupted basis.
    pub fn solve_with_profiler<C, P>(
        &self,
        problem: &TransportProblem<C>,
        profiler: &mut P,
    ) -> Result<ModiOutcome<C>, SolveError>
    where
        C: CostNumeric,
        P: StageProfiler,
    {
        let start = Instant::now();
        let mut statistics = ModiStatistics::default();
        statistics.set_threads(self.parallelism.degree());

        profiler.enter_stage(stages::TOTAL);
        let solved = self.run(problem, profiler, &mut statistics);
        profiler.exit_stage(stages::TOTAL);
        statistics.set_total_time(start.elapsed());

        let (allocation, potentials) = solved?;
        statistics.set_final_cost(allocation.total_cost(problem.cost()));
        log::debug!(
            "solved {}x{} problem in {:.2?}: cost {} after {} pivots",
            problem.num_sources(),
            problem.num_destinations(),
            statistics.time_total,
            statistics.final_cost,
            statistics.pivots
        );
        Ok(ModiOutcome::new(allocation, potentials, statistics))
    }

    fn run<C, P>(
        &self,
        problem: &TransportProblem<C>,
        profiler: &mut P,
        statistics: &mut ModiStatistics<C>,
    ) -> Result<(AllocationMatrix, Potentials<C>), SolveError>
    where
        C: CostNumeric,
        P: StageProfiler,
    {
        let (m, n) = (problem.num_sources(), problem.num_destinations());

        profiler.enter_stage(stages::BFS_SEARCH);
        let mut allocation =
            Vam::new(problem, self.parallelism.clone()).search_with_profiler(profiler);
        profiler.exit_stage(stages::BFS_SEARCH);

        let basic = allocation.count_basic();
        statistics.set_initial_plan(basic, allocation.total_cost(problem.cost()));
        log::debug!(
            "initial plan has {} of {} basic cells at cost {}",
            basic,
            problem.basis_size(),
            statistics.initial_cost
        );

        let mut searcher = CycleSearcher::new(m, n, self.parallelism.clone());
        if basic < problem.basis_size() {
            let required = problem.basis_size() - basic;
            let mut perturbation = EpsilonPerturbation::new(problem, self.parallelism.clone());

            profiler.enter_stage(stages::PERTURBATION);
            let repaired = perturbation.try_perturb(&mut allocation, &mut searcher, required);
            profiler.exit_stage(stages::PERTURBATION);

            statistics.on_perturbation(perturbation.committed(), perturbation.rejected());
            if !repaired {
                return Err(SolveError::PerturbationExhausted {
                    required,
                    committed: perturbation.committed(),
                });
            }
            log::debug!(
                "perturbation added {} basic zeros, rejected {} candidates",
                perturbation.committed(),
                perturbation.rejected()
            );
        }

        let threshold = -C::from_f64(self.tolerance).unwrap_or_else(C::zero);
        let mut calculator = PotentialsCalculator::new(m, n, self.parallelism.clone());
        let mut potentials = Potentials::zeros(m, n);

        loop {
            profiler.enter_stage(stages::POTENTIALS_CALCULATION);
            let labeled = calculator.calc_potentials(problem, &allocation, &mut potentials);
            profiler.exit_stage(stages::POTENTIALS_CALCULATION);
            statistics.on_potentials();

            assert!(
                labeled == m + n,
                "basis of {} cells reaches only {} of {} lines",
                allocation.count_basic(),
                labeled,
                m + n
            );

            profiler.enter_stage(stages::MIN_REDUCED_COST);
            let candidate = self.min_reduced_cost(problem, &allocation, &potentials);
            profiler.exit_stage(stages::MIN_REDUCED_COST);

            let Some((reduced, index)) = candidate.filter(|(reduced, _)| *reduced < threshold)
            else {
                log::debug!("plan is optimal after {} pivots", statistics.pivots);
                return Ok((allocation, potentials));
            };

            if let Some(limit) = self.max_pivots.filter(|&limit| statistics.pivots >= limit) {
                log::debug!("stopping at pivot limit {}", limit);
                return Err(SolveError::PivotLimitReached { limit });
            }

            let entering = Point::from_index(index, n);

            profiler.enter_stage(stages::CYCLE_SEARCH);
            let cycle = searcher.search_closed(&mut allocation, entering);
            profiler.exit_stage(stages::CYCLE_SEARCH);

            let Some(cycle) = cycle else {
                panic!(
                    "cycle invariant violated: entering cell {} closes no cycle",
                    entering
                );
            };

            profiler.enter_stage(stages::PIVOT);
            let outcome = allocation.pivot(cycle);
            profiler.exit_stage(stages::PIVOT);

            statistics.on_pivot(outcome.is_degenerate());
            log::trace!(
                "pivot {}: {} enters at reduced cost {}, {:?} leaves, {} cells moved by {}",
                statistics.pivots,
                entering,
                reduced,
                outcome.leaving,
                cycle.len(),
                outcome.step
            );
        }
    }

    fn min_reduced_cost<C>(
        &self,
        problem: &TransportProblem<C>,
        allocation: &AllocationMatrix,
        potentials: &Potentials<C>,
    ) -> Option<(C, usize)>
    where
        C: CostNumeric,
    {
        let n = problem.num_destinations();
        let reduced = |index: usize| {
            let point = Point::from_index(index, n);
            (!allocation.is_basic(point)).then(|| potentials.reduced_cost(problem, point))
        };

        let cells = problem.num_sources() * n;
        let minima = self
            .parallelism
            .map_chunks(cells, |range| local_best(range, reduced, lower_first));
        best_by(minima.into_iter().flatten(), lower_first)
    }
}

/// Builder for [`ModiSolver`].
#[derive(Debug, Clone, Default)]
pub struct ModiSolverBuilder {
    parallelism: Parallelism,
    max_pivots: Option<u64>,
    tolerance: f64,
}

impl ModiSolverBuilder {
    /// Creates a builder for a sequential solver without pivot limit.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Uses a dedicated pool of `degree` workers; a degree of one runs sequentially.
    #[inline]
    pub fn with_degree(self, degree: usize) -> Result<Self, ParallelismError> {
        Ok(self.with_parallelism(Parallelism::with_degree(degree)?))
    }

    #[inline]
    pub fn with_max_pivots(mut self, limit: u64) -> Self {
        self.max_pivots = Some(limit);
        self
    }

    /// Pivots only on reduced costs below `-tolerance`.
    ///
    /// # Panics
    ///
    /// Panics if `tolerance` is negative or not finite.
    #[inline]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        assert!(
            tolerance.is_finite() && tolerance >= 0.0,
            "called `ModiSolverBuilder::with_tolerance` with invalid tolerance {}",
            tolerance
        );
        self.tolerance = tolerance;
        self
    }

    #[inline]
    pub fn build(self) -> ModiSolver {
        ModiSolver {
            parallelism: self.parallelism,
            max_pivots: self.max_pivots,
            tolerance: self.tolerance,
        }
    }
}
