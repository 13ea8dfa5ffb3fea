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

use crate::{potentials::Potentials, stats::ModiStatistics};
use stevedore_model::{allocation_matrix::AllocationMatrix, num::CostNumeric};

/// Optimal plan returned by a successful solve.
#[derive(Debug, Clone)]
pub struct ModiOutcome<C> {
    allocation: AllocationMatrix,
    potentials: Potentials<C>,
    statistics: ModiStatistics<C>,
}

impl<C> ModiOutcome<C>
where
    C: CostNumeric,
{
    #[inline]
    pub fn new(
        allocation: AllocationMatrix,
        potentials: Potentials<C>,
        statistics: ModiStatistics<C>,
    ) -> Self {
        Self {
            allocation,
            potentials,
            statistics,
        }
    }

    /// Returns the optimal allocation with its basis.
    #[inline]
    pub fn allocation(&self) -> &AllocationMatrix {
        &self.allocation
    }

    #[inline]
    pub fn into_allocation(self) -> AllocationMatrix {
        self.allocation
    }

    /// Returns the potentials that certify optimality of the allocation.
    #[inline]
    pub fn potentials(&self) -> &Potentials<C> {
        &self.potentials
    }

    #[inline]
    pub fn statistics(&self) -> &ModiStatistics<C> {
        &self.statistics
    }

    /// Returns the number of pivots the optimization loop performed.
    #[inline]
    pub fn pivots(&self) -> u64 {
        self.statistics.pivots
    }

    #[inline]
    pub fn total_cost(&self) -> C {
        self.statistics.final_cost
    }
}

impl<C> std::fmt::Display for ModiOutcome<C>
where
    C: CostNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Optimal plan (cost {}):", self.total_cost())?;
        write!(f, "{}", self.allocation)?;
        write!(f, "{}", self.statistics)
    }
}
