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

//! Dual potentials of the basis tree.
//!
//! Row potentials `u` and column potentials `v` satisfy `u[i] + v[j] = cost[i, j]` on every
//! basic cell. Anchoring `u[0] = 0` determines all other values by spreading labels
//! breadth-first over the tree: a labeled row labels the columns of its basic cells and
//! vice versa. On a spanning tree every value has exactly one derivation, so the result does
//! not depend on the labeling order.
//!
//! The parallel calculator processes the frontier in waves that alternate between rows and
//! columns. A semaphore hands out exactly as many permits as the current wave has lines;
//! the worker that finishes the last line of a wave releases the next wave, or every
//! worker once no new line was labeled. Labels are claimed with an atomic test-and-set,
//! and values are stored as raw bits in atomic slots.

use crate::vam::Line;
use crossbeam_channel::unbounded;
use fixedbitset::FixedBitSet;
use std::{
    collections::VecDeque,
    sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
};
use stevedore_core::{parallel::Parallelism, sync::Semaphore};
use stevedore_model::{
    allocation_matrix::AllocationMatrix, num::CostNumeric, point::Point,
    problem::TransportProblem,
};

/// Row and column potentials of the current basis.
#[derive(Debug, Clone, PartialEq)]
pub struct Potentials<C> {
    rows: Vec<C>,
    cols: Vec<C>,
}

impl<C> Potentials<C>
where
    C: CostNumeric,
{
    /// Creates zeroed potentials for an `m x n` problem.
    pub fn zeros(m: usize, n: usize) -> Self {
        Self {
            rows: vec![C::zero(); m],
            cols: vec![C::zero(); n],
        }
    }

    #[inline]
    pub fn rows(&self) -> &[C] {
        &self.rows
    }

    #[inline]
    pub fn cols(&self) -> &[C] {
        &self.cols
    }

    #[inline(always)]
    pub fn row(&self, i: usize) -> C {
        self.rows[i]
    }

    #[inline(always)]
    pub fn col(&self, j: usize) -> C {
        self.cols[j]
    }

    /// Returns `cost[i, j] - u[i] - v[j]`.
    #[inline(always)]
    pub fn reduced_cost(&self, problem: &TransportProblem<C>, point: Point) -> C {
        problem.cost_at(point) - self.rows[point.row()] - self.cols[point.col()]
    }
}

/// Labels the basis tree with potentials.
#[derive(Debug)]
pub struct PotentialsCalculator {
    parallelism: Parallelism,
    row_labeled: FixedBitSet,
    col_labeled: FixedBitSet,
    queue: VecDeque<Line>,
}

impl PotentialsCalculator {
    pub fn new(rows: usize, cols: usize, parallelism: Parallelism) -> Self {
        Self {
            parallelism,
            row_labeled: FixedBitSet::with_capacity(rows),
            col_labeled: FixedBitSet::with_capacity(cols),
            queue: VecDeque::with_capacity(rows + cols),
        }
    }

    /// Recomputes `potentials` from scratch for the basis of `allocation`.
    ///
    /// Returns the number of labeled lines. It equals `m + n` exactly when the basic cells
    /// connect every row and column; unreached lines keep the value zero.
    pub fn calc_potentials<C>(
        &mut self,
        problem: &TransportProblem<C>,
        allocation: &AllocationMatrix,
        potentials: &mut Potentials<C>,
    ) -> usize
    where
        C: CostNumeric,
    {
        potentials.rows.fill(C::zero());
        potentials.cols.fill(C::zero());

        if self.parallelism.is_sequential() {
            self.label_sequential(problem, allocation, potentials)
        } else {
            self.label_in_waves(problem, allocation, potentials)
        }
    }

    fn label_sequential<C>(
        &mut self,
        problem: &TransportProblem<C>,
        allocation: &AllocationMatrix,
        potentials: &mut Potentials<C>,
    ) -> usize
    where
        C: CostNumeric,
    {
        let (m, n) = (problem.num_sources(), problem.num_destinations());
        self.row_labeled.clear();
        self.col_labeled.clear();
        self.queue.clear();

        self.row_labeled.insert(0);
        self.queue.push_back(Line::Row(0));
        let mut labeled = 1;

        while let Some(line) = self.queue.pop_front() {
            match line {
                Line::Row(i) => {
                    for j in 0..n {
                        let point = Point::new(i, j);
                        if allocation.is_basic(point) && !self.col_labeled.put(j) {
                            potentials.cols[j] = problem.cost_at(point) - potentials.rows[i];
                            self.queue.push_back(Line::Col(j));
                            labeled += 1;
                        }
                    }
                }
                Line::Col(j) => {
                    for i in 0..m {
                        let point = Point::new(i, j);
                        if allocation.is_basic(point) && !self.row_labeled.put(i) {
                            potentials.rows[i] = problem.cost_at(point) - potentials.cols[j];
                            self.queue.push_back(Line::Row(i));
                            labeled += 1;
                        }
                    }
                }
            }
        }
        labeled
    }

    fn label_in_waves<C>(
        &self,
        problem: &TransportProblem<C>,
        allocation: &AllocationMatrix,
        potentials: &mut Potentials<C>,
    ) -> usize
    where
        C: CostNumeric,
    {
        let (m, n) = (problem.num_sources(), problem.num_destinations());
        let zero = C::zero().to_bits64();
        let row_values: Vec<AtomicU64> = (0..m).map(|_| AtomicU64::new(zero)).collect();
        let col_values: Vec<AtomicU64> = (0..n).map(|_| AtomicU64::new(zero)).collect();
        let row_labeled: Vec<AtomicBool> = (0..m).map(|_| AtomicBool::new(false)).collect();
        let col_labeled: Vec<AtomicBool> = (0..n).map(|_| AtomicBool::new(false)).collect();

        let (sender, receiver) = unbounded::<Line>();
        let remaining = AtomicUsize::new(1);
        let next_wave = AtomicUsize::new(0);
        let labeled = AtomicUsize::new(1);
        let finished = AtomicBool::new(false);
        let permits = Semaphore::new(0);
        let workers = self.parallelism.degree();

        row_labeled[0].store(true, Ordering::Release);
        if sender.send(Line::Row(0)).is_ok() {
            permits.release(1);
        }

        let load = |slot: &AtomicU64| C::from_bits64(slot.load(Ordering::Acquire));
        let store = |slot: &AtomicU64, value: C| slot.store(value.to_bits64(), Ordering::Release);

        self.parallelism.run_workers(|_| {
            loop {
                permits.acquire();
                if finished.load(Ordering::Acquire) {
                    break;
                }
                // The current wave was queued before any line of the next one.
                let Ok(line) = receiver.try_recv() else {
                    break;
                };

                let mut produced = 0;
                match line {
                    Line::Row(i) => {
                        let u = load(&row_values[i]);
                        for j in 0..n {
                            let point = Point::new(i, j);
                            if allocation.is_basic(point) && !col_labeled[j].swap(true, Ordering::AcqRel) {
                                store(&col_values[j], problem.cost_at(point) - u);
                                if sender.send(Line::Col(j)).is_ok() {
                                    produced += 1;
                                }
                            }
                        }
                    }
                    Line::Col(j) => {
                        let v = load(&col_values[j]);
                        for i in 0..m {
                            let point = Point::new(i, j);
                            if allocation.is_basic(point) && !row_labeled[i].swap(true, Ordering::AcqRel) {
                                store(&row_values[i], problem.cost_at(point) - v);
                                if sender.send(Line::Row(i)).is_ok() {
                                    produced += 1;
                                }
                            }
                        }
                    }
                }

                if produced > 0 {
                    next_wave.fetch_add(produced, Ordering::AcqRel);
                    labeled.fetch_add(produced, Ordering::AcqRel);
                }

                if remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
                    let wave = next_wave.swap(0, Ordering::AcqRel);
                    if wave == 0 {
                        finished.store(true, Ordering::Release);
                        permits.release(workers);
                        break;
                    }
                    remaining.store(wave, Ordering::Release);
                    permits.release(wave);
                }
            }
        });

        for (target, slot) in potentials.rows.iter_mut().zip(&row_values) {
            *target = load(slot);
        }
        for (target, slot) in potentials.cols.iter_mut().zip(&col_values) {
            *target = load(slot);
        }
        labeled.into_inner()
    }
}
