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

//! Random generation of balanced transportation problems.
//!
//! Supplies, demands and costs are drawn uniformly from half-open ranges. If the drawn
//! totals differ, a dummy source or destination with zero shipping cost absorbs the
//! difference, so every generated instance is balanced and may therefore be one row or
//! one column larger than requested.

use crate::{
    matrix::Matrix,
    num::CostNumeric,
    point::Point,
    problem::{ProblemError, TransportProblem},
};
use rand::Rng;
use std::ops::Range;

/// The error type for invalid generator bounds.
#[derive(Debug, Clone, PartialEq)]
pub enum LimitsError {
    /// The supply range is empty.
    EmptySupplyRange(Range<u32>),
    /// The demand range is empty.
    EmptyDemandRange(Range<u32>),
    /// The cost range is inverted or not finite.
    InvalidCostRange(Range<f64>),
}

impl std::fmt::Display for LimitsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySupplyRange(r) => write!(f, "Supply range {:?} is empty", r),
            Self::EmptyDemandRange(r) => write!(f, "Demand range {:?} is empty", r),
            Self::InvalidCostRange(r) => write!(f, "Cost range {:?} is invalid", r),
        }
    }
}

impl std::error::Error for LimitsError {}

/// Bounds for generated values. Lower bounds are inclusive, upper bounds exclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueLimits {
    supply: Range<u32>,
    demand: Range<u32>,
    cost: Range<f64>,
}

impl ValueLimits {
    pub fn new(supply: Range<u32>, demand: Range<u32>, cost: Range<f64>) -> Result<Self, LimitsError> {
        if supply.is_empty() {
            return Err(LimitsError::EmptySupplyRange(supply));
        }
        if demand.is_empty() {
            return Err(LimitsError::EmptyDemandRange(demand));
        }
        if !(cost.start.is_finite() && cost.end.is_finite() && cost.start <= cost.end) {
            return Err(LimitsError::InvalidCostRange(cost));
        }
        Ok(Self {
            supply,
            demand,
            cost,
        })
    }

    #[inline]
    pub fn supply(&self) -> &Range<u32> {
        &self.supply
    }

    #[inline]
    pub fn demand(&self) -> &Range<u32> {
        &self.demand
    }

    #[inline]
    pub fn cost(&self) -> &Range<f64> {
        &self.cost
    }
}

impl Default for ValueLimits {
    fn default() -> Self {
        Self {
            supply: 20..201,
            demand: 20..201,
            cost: 1.0..50.0,
        }
    }
}

/// Draws random balanced problems from a caller-provided random number generator.
#[derive(Debug, Clone)]
pub struct InstanceGenerator<R> {
    rng: R,
    limits: ValueLimits,
}

impl<R> InstanceGenerator<R>
where
    R: Rng,
{
    #[inline]
    pub fn new(rng: R, limits: ValueLimits) -> Self {
        Self { rng, limits }
    }

    /// Creates a generator using [`ValueLimits::default`].
    #[inline]
    pub fn with_default_limits(rng: R) -> Self {
        Self::new(rng, ValueLimits::default())
    }

    #[inline]
    pub fn limits(&self) -> &ValueLimits {
        &self.limits
    }

    /// Generates a balanced problem with at least `sources x destinations` lanes.
    pub fn generate<C>(
        &mut self,
        sources: usize,
        destinations: usize,
    ) -> Result<TransportProblem<C>, ProblemError>
    where
        C: CostNumeric,
    {
        if sources == 0 || destinations == 0 {
            return Err(ProblemError::Empty);
        }

        let mut supply: Vec<u32> = (0..sources)
            .map(|_| self.rng.random_range(self.limits.supply.clone()))
            .collect();
        let mut demand: Vec<u32> = (0..destinations)
            .map(|_| self.rng.random_range(self.limits.demand.clone()))
            .collect();

        let span = self.limits.cost.end - self.limits.cost.start;
        let mut costs = Vec::with_capacity(sources * destinations);
        for index in 0..sources * destinations {
            let value = self.limits.cost.start + span * self.rng.random::<f64>();
            let cost = C::from_f64(value)
                .ok_or_else(|| ProblemError::InvalidCost(Point::from_index(index, destinations)))?;
            costs.push(cost);
        }

        let total_supply: u64 = supply.iter().map(|&s| u64::from(s)).sum();
        let total_demand: u64 = demand.iter().map(|&d| u64::from(d)).sum();
        let gap = total_supply.abs_diff(total_demand);
        let dummy = u32::try_from(gap).map_err(|_| ProblemError::QuantityOverflow(gap))?;

        let cost = if total_supply > total_demand {
            demand.push(dummy);
            let cols = destinations + 1;
            Matrix::from_fn(sources, cols, |p| {
                if p.col() == destinations {
                    C::zero()
                } else {
                    costs[p.row() * destinations + p.col()]
                }
            })
        } else if total_demand > total_supply {
            supply.push(dummy);
            costs.resize(costs.len() + destinations, C::zero());
            Matrix::from_vec(sources + 1, destinations, costs)?
        } else {
            Matrix::from_vec(sources, destinations, costs)?
        };

        TransportProblem::new(cost, supply, demand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_generated_problems_are_balanced() {
        let mut generator = InstanceGenerator::with_default_limits(ChaCha8Rng::seed_from_u64(42));
        for size in [1usize, 2, 5, 17] {
            let tp: TransportProblem<f64> = generator.generate(size, size + 3).unwrap();
            let demand: u64 = tp.demand().iter().map(|&d| u64::from(d)).sum();
            assert_eq!(tp.total_supply(), demand);
            assert!(tp.num_sources() >= size && tp.num_sources() <= size + 1);
            assert!(tp.num_destinations() >= size + 3 && tp.num_destinations() <= size + 4);
        }
    }

    #[test]
    fn test_values_respect_limits() {
        let limits = ValueLimits::new(5..9, 5..9, 2.0..3.0).unwrap();
        let mut generator = InstanceGenerator::new(ChaCha8Rng::seed_from_u64(7), limits);
        let tp: TransportProblem<f64> = generator.generate(6, 6).unwrap();
        for (i, &s) in tp.supply().iter().enumerate().take(6) {
            assert!((5..9).contains(&s), "supply {} at {} out of range", s, i);
        }
        for (p, &c) in tp.cost().iter_points() {
            if p.row() < 6 && p.col() < 6 {
                assert!((2.0..3.0).contains(&c));
            } else {
                assert_eq!(c, 0.0);
            }
        }
    }

    #[test]
    fn test_constant_limits_need_no_dummy() {
        let limits = ValueLimits::new(10..11, 10..11, 1.0..50.0).unwrap();
        let mut generator = InstanceGenerator::new(ChaCha8Rng::seed_from_u64(1), limits);
        let tp: TransportProblem<f32> = generator.generate(4, 4).unwrap();
        assert_eq!(tp.num_sources(), 4);
        assert_eq!(tp.num_destinations(), 4);
        assert!(tp.supply().iter().chain(tp.demand()).all(|&q| q == 10));
    }

    #[test]
    fn test_same_seed_same_instance() {
        let a: TransportProblem<f64> =
            InstanceGenerator::with_default_limits(ChaCha8Rng::seed_from_u64(9))
                .generate(8, 5)
                .unwrap();
        let b: TransportProblem<f64> =
            InstanceGenerator::with_default_limits(ChaCha8Rng::seed_from_u64(9))
                .generate(8, 5)
                .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_limits_are_rejected() {
        assert!(matches!(
            ValueLimits::new(5..5, 1..2, 0.0..1.0),
            Err(LimitsError::EmptySupplyRange(_))
        ));
        assert!(matches!(
            ValueLimits::new(1..2, 3..1, 0.0..1.0),
            Err(LimitsError::EmptyDemandRange(_))
        ));
        assert!(matches!(
            ValueLimits::new(1..2, 1..2, 5.0..1.0),
            Err(LimitsError::InvalidCostRange(_))
        ));
        let mut generator = InstanceGenerator::with_default_limits(ChaCha8Rng::seed_from_u64(0));
        assert_eq!(
            generator.generate::<f64>(0, 3).unwrap_err(),
            ProblemError::Empty
        );
    }
}
