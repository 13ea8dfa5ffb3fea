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

//! # Stevedore Core
//!
//! **Execution primitives shared by the Stevedore transportation solver.**
//!
//! Every phase of the solver exists once and is parameterized by a
//! [`Parallelism`](parallel::Parallelism) strategy instead of being duplicated into
//! sequential and parallel class hierarchies. This crate owns the pieces those phases
//! share:
//!
//! * **`parallel`**: The execution strategy. A degree of one runs everything inline on the
//!   calling thread, larger degrees fan out onto a dedicated `rayon` pool and block until
//!   the phase is drained.
//! * **`reduce`**: Tie-break aware reductions. The same comparator drives the sequential
//!   fold and the lock-free compare-and-swap reduction, which is what keeps both execution
//!   strategies bit-identical.
//! * **`sync`**: A counting semaphore used to gate worker waves.
//! * **`profile`**: The optional stage-timing collaborator. The no-op profiler compiles
//!   away entirely.

pub mod parallel;
pub mod profile;
pub mod reduce;
pub mod sync;
