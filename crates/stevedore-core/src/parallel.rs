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

//! Execution strategy for the solver phases.
//!
//! A [`Parallelism`] value is injected into every component. With a degree of one all
//! work runs inline on the caller. With a larger degree the strategy owns a dedicated
//! `rayon` thread pool of exactly that many threads; each parallel phase is a synchronous
//! fan-out/fan-in: the caller blocks until every spawned task has finished. Nothing is
//! cancellable and no phase carries a timeout.

use rayon::prelude::*;
use std::{ops::Range, sync::Arc};

/// The error type for building a [`Parallelism`] strategy.
#[derive(Debug)]
pub enum ParallelismError {
    /// The requested degree of parallelism was zero.
    InvalidDegree(usize),
    /// The backing thread pool could not be created.
    PoolBuild(rayon::ThreadPoolBuildError),
}

impl std::fmt::Display for ParallelismError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDegree(degree) => write!(
                f,
                "Degree of parallelism must be at least 1, but {} was requested",
                degree
            ),
            Self::PoolBuild(e) => write!(f, "Failed to build worker pool: {}", e),
        }
    }
}

impl std::error::Error for ParallelismError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidDegree(_) => None,
            Self::PoolBuild(e) => Some(e),
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for ParallelismError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        Self::PoolBuild(e)
    }
}

/// Splits `0..len` into at most `parts` contiguous, non-empty ranges.
///
/// Every range has the base size `len / parts`; the residue `len % parts` is spread one
/// element at a time over the leading ranges. Returns an empty vector when `len` is zero.
///
/// # Panics
///
/// Panics if `parts` is zero.
pub fn partition(len: usize, parts: usize) -> Vec<Range<usize>> {
    assert!(
        parts > 0,
        "called `partition` with zero parts: cannot split {} elements",
        len
    );

    if len == 0 {
        return Vec::new();
    }

    let parts = parts.min(len);
    let base = len / parts;
    let residue = len % parts;

    let mut ranges = Vec::with_capacity(parts);
    let mut from = 0;
    for part in 0..parts {
        let to = from + base + usize::from(part < residue);
        ranges.push(from..to);
        from = to;
    }

    debug_assert_eq!(from, len);
    ranges
}

/// Strategy deciding how solver phases are executed.
///
/// Cloning is cheap: clones share the same worker pool.
#[derive(Clone)]
pub struct Parallelism {
    degree: usize,
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl Parallelism {
    /// Creates the sequential strategy (degree one). Nothing is ever spawned.
    #[inline]
    pub fn sequential() -> Self {
        Self {
            degree: 1,
            pool: None,
        }
    }

    /// Creates a strategy with exactly `degree` workers.
    ///
    /// A degree of one is identical to [`Parallelism::sequential`].
    pub fn with_degree(degree: usize) -> Result<Self, ParallelismError> {
        match degree {
            0 => Err(ParallelismError::InvalidDegree(degree)),
            1 => Ok(Self::sequential()),
            _ => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(degree)
                    .thread_name(|index| format!("stevedore-worker-{}", index))
                    .build()?;
                Ok(Self {
                    degree,
                    pool: Some(Arc::new(pool)),
                })
            }
        }
    }

    /// Creates a strategy sized to the parallelism reported by the operating system.
    pub fn available() -> Result<Self, ParallelismError> {
        let degree = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::with_degree(degree)
    }

    /// Returns the maximum number of concurrently running workers.
    #[inline]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Returns `true` if this strategy runs everything on the calling thread.
    #[inline]
    pub fn is_sequential(&self) -> bool {
        self.pool.is_none()
    }

    /// Calls `f` for every index in `range`.
    pub fn for_each_index<F>(&self, range: Range<usize>, f: F)
    where
        F: Fn(usize) + Sync + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(|| range.into_par_iter().for_each(f)),
            None => range.for_each(f),
        }
    }

    /// Calls `f(index, slot)` for every element of `slots`.
    ///
    /// Each invocation owns its slot exclusively, so workers never share a write target.
    pub fn fill_slots<T, F>(&self, slots: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize, &mut T) + Sync + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(|| {
                slots
                    .par_iter_mut()
                    .enumerate()
                    .for_each(|(index, slot)| f(index, slot))
            }),
            None => slots
                .iter_mut()
                .enumerate()
                .for_each(|(index, slot)| f(index, slot)),
        }
    }

    /// Partitions `0..len` into one contiguous range per worker and maps each range.
    ///
    /// The results are returned in range order. The sequential strategy maps the whole
    /// range in a single call.
    pub fn map_chunks<R, F>(&self, len: usize, f: F) -> Vec<R>
    where
        R: Send,
        F: Fn(Range<usize>) -> R + Sync + Send,
    {
        if len == 0 {
            return Vec::new();
        }

        match &self.pool {
            Some(pool) => {
                let ranges = partition(len, self.degree);
                pool.install(|| ranges.into_par_iter().map(f).collect())
            }
            None => vec![f(0..len)],
        }
    }

    /// Runs `f(worker)` once on each of `degree` long-lived workers and waits for all of
    /// them to return.
    ///
    /// Used by phases whose workers coordinate among themselves (work queues gated by a
    /// semaphore). Such protocols must make progress with any single worker running,
    /// since the pool does not promise that all workers are scheduled at once.
    pub fn run_workers<F>(&self, f: F)
    where
        F: Fn(usize) + Sync + Send,
    {
        match &self.pool {
            Some(pool) => {
                let f = &f;
                pool.scope(|scope| {
                    for worker in 0..self.degree {
                        scope.spawn(move |_| f(worker));
                    }
                });
            }
            None => f(0),
        }
    }
}

impl Default for Parallelism {
    fn default() -> Self {
        Self::sequential()
    }
}

impl std::fmt::Debug for Parallelism {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parallelism")
            .field("degree", &self.degree)
            .finish()
    }
}

impl std::fmt::Display for Parallelism {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_sequential() {
            write!(f, "Parallelism(sequential)")
        } else {
            write!(f, "Parallelism(degree: {})", self.degree)
        }
    }
}
