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

//! Names of the stages reported to a [`StageProfiler`](stevedore_core::profile::StageProfiler).

/// The whole solve.
pub const TOTAL: &str = "Total";
/// Construction of the initial basic feasible solution.
pub const BFS_SEARCH: &str = "BfsSearch";
/// Penalty computation and selection of the line to serve.
pub const ARGMAX_PENALTY: &str = "ArgmaxPenalty";
/// Selection of the cheapest cell within the served line.
pub const ARGMIN_COST: &str = "ArgminCost";
/// Degeneracy repair.
pub const PERTURBATION: &str = "Perturbation";
/// Labeling of the basis tree with dual potentials.
pub const POTENTIALS_CALCULATION: &str = "PotentialsCalculation";
/// Search for the entering cell.
pub const MIN_REDUCED_COST: &str = "MinReducedCost";
/// Search for the cycle closed by a cell.
pub const CYCLE_SEARCH: &str = "CycleSearch";
/// Quantity exchange along a cycle.
pub const PIVOT: &str = "Pivot";
