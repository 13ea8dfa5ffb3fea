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

//! # Stevedore Model
//!
//! **The domain model of the balanced Transportation Problem.**
//!
//! A transportation problem ships goods from `m` sources to `n` destinations. Source `i`
//! offers `supply[i]` units, destination `j` requires `demand[j]` units, and shipping one
//! unit over the lane `(i, j)` costs `cost[i, j]`. This crate holds the data the solver
//! operates on:
//!
//! * **`point`**: The `(row, col)` coordinate of a lane. Its ordering is the single
//!   tie-break key used by every reduction of the solver.
//! * **`allocation`**: One cell of a shipment plan. A zero-valued cell can be part of the
//!   basis ("basic zero") or absent from it ("non-basic zero").
//! * **`matrix`**: A dense, row-major matrix stored as one flat vector.
//! * **`allocation_matrix`**: The shipment plan, including the pivot along a cycle.
//! * **`problem`**: The validated, immutable problem instance.
//! * **`generator`**: Random balanced instances for tests and benchmarks.
//!
//! ## Design Philosophy
//!
//! 1.  **Fail-Fast**: Constructors validate shapes, balance and values eagerly. The solver
//!     never sees a malformed instance.
//! 2.  **Memory Layout**: All matrices are flattened vectors for cache locality in the
//!     full-matrix scans of the solver.

pub mod allocation;
pub mod allocation_matrix;
pub mod generator;
pub mod matrix;
pub mod num;
pub mod point;
pub mod problem;
