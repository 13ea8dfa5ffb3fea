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

//! # Stevedore MODI
//!
//! **Optimal shipment plans for the balanced Transportation Problem.**
//!
//! The solver follows the classic stepping-stone scheme:
//!
//! 1. **Initial basis** (`vam`): Vogel's approximation method builds a feasible plan by
//!    repeatedly serving the line with the largest regret.
//! 2. **Degeneracy repair** (`perturbation`): if the plan has fewer than `m + n - 1` basic
//!    cells, the cheapest cells that do not close a cycle join the basis as basic zeros.
//! 3. **Optimization** (`solver`): dual potentials (`potentials`) price every lane; the
//!    lane with the most negative reduced cost enters the basis along its unique cycle
//!    (`cycle`) until no lane can improve the plan.
//!
//! ## Execution Strategies
//!
//! Every phase takes a [`Parallelism`](stevedore_core::parallel::Parallelism). A degree
//! of one runs sequentially; larger degrees distribute penalty computation, cost scans,
//! adjacency discovery and potential labeling over a worker pool. All reductions share
//! their tie-break keys (`tiebreak`) with the sequential code, so both strategies produce
//! identical plans, pivot for pivot.
//!
//! ## Usage
//!
//! ```rust
//! use stevedore_model::problem::TransportProblem;
//! use stevedore_modi::solver::ModiSolverBuilder;
//!
//! let problem = TransportProblem::from_rows(
//!     &[[8.0, 13.0, 4.0, 7.0], [11.0, 14.0, 6.0, 10.0], [6.0, 12.0, 8.0, 9.0]],
//!     &[12, 17, 11],
//!     &[10, 10, 10, 10],
//! )
//! .unwrap();
//!
//! let solver = ModiSolverBuilder::new().build();
//! let outcome = solver.solve(&problem).unwrap();
//! assert_eq!(outcome.total_cost(), 324.0);
//! ```

pub mod cycle;
pub mod perturbation;
pub mod potentials;
pub mod result;
pub mod solver;
pub mod stages;
pub mod stats;
pub mod tiebreak;
pub mod vam;
