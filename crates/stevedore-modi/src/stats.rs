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

use num_traits::Zero;
use std::time::Duration;

/// Statistics collected during one run of the MODI solver.
#[derive(Debug, Clone, PartialEq)]
pub struct ModiStatistics<C> {
    /// Basis exchanges performed.
    pub pivots: u64,
    /// Pivots that moved a zero quantity.
    pub degenerate_pivots: u64,
    /// Times the potentials were recomputed.
    pub potentials_rounds: u64,
    /// Cells promoted to basic zeros to repair a degenerate initial plan.
    pub perturbed_cells: u64,
    /// Candidates dismissed during perturbation because they closed a cycle.
    pub rejected_candidates: u64,
    /// Basic cells in the plan produced by Vogel's approximation.
    pub initial_basic_cells: u64,
    /// Cost of the initial plan.
    pub initial_cost: C,
    /// Cost of the returned plan.
    pub final_cost: C,
    /// Worker count of the execution strategy.
    pub threads: usize,
    /// Total time spent in the solver.
    pub time_total: Duration,
}

impl<C> Default for ModiStatistics<C>
where
    C: Zero,
{
    fn default() -> Self {
        Self {
            pivots: 0,
            degenerate_pivots: 0,
            potentials_rounds: 0,
            perturbed_cells: 0,
            rejected_candidates: 0,
            initial_basic_cells: 0,
            initial_cost: C::zero(),
            final_cost: C::zero(),
            threads: 1,
            time_total: Duration::ZERO,
        }
    }
}

impl<C> ModiStatistics<C> {
    #[inline]
    pub fn on_pivot(&mut self, degenerate: bool) {
        self.pivots = self.pivots.saturating_add(1);
        if degenerate {
            self.degenerate_pivots = self.degenerate_pivots.saturating_add(1);
        }
    }

    #[inline]
    pub fn on_potentials(&mut self) {
        self.potentials_rounds = self.potentials_rounds.saturating_add(1);
    }

    #[inline]
    pub fn on_perturbation(&mut self, committed: usize, rejected: usize) {
        self.perturbed_cells = self.perturbed_cells.saturating_add(committed as u64);
        self.rejected_candidates = self.rejected_candidates.saturating_add(rejected as u64);
    }

    #[inline]
    pub fn set_initial_plan(&mut self, basic_cells: usize, cost: C) {
        self.initial_basic_cells = basic_cells as u64;
        self.initial_cost = cost;
    }

    #[inline]
    pub fn set_final_cost(&mut self, cost: C) {
        self.final_cost = cost;
    }

    #[inline]
    pub fn set_threads(&mut self, threads: usize) {
        self.threads = threads;
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }
}

impl<C> std::fmt::Display for ModiStatistics<C>
where
    C: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Stevedore MODI Solver Statistics:")?;
        writeln!(f, "  Threads:              {}", self.threads)?;
        writeln!(f, "  Initial basic cells:  {}", self.initial_basic_cells)?;
        writeln!(f, "  Perturbed cells:      {}", self.perturbed_cells)?;
        writeln!(f, "  Rejected candidates:  {}", self.rejected_candidates)?;
        writeln!(f, "  Pivots:               {}", self.pivots)?;
        writeln!(f, "  Degenerate pivots:    {}", self.degenerate_pivots)?;
        writeln!(f, "  Potential rounds:     {}", self.potentials_rounds)?;
        writeln!(f, "  Initial cost:         {}", self.initial_cost)?;
        writeln!(f, "  Final cost:           {}", self.final_cost)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let mut stats = ModiStatistics::<f64>::default();
        stats.on_pivot(false);
        stats.on_pivot(true);
        stats.on_potentials();
        stats.on_perturbation(2, 1);
        assert_eq!(stats.pivots, 2);
        assert_eq!(stats.degenerate_pivots, 1);
        assert_eq!(stats.potentials_rounds, 1);
        assert_eq!(stats.perturbed_cells, 2);
        assert_eq!(stats.rejected_candidates, 1);
    }

    #[test]
    fn test_pivot_counter_saturates() {
        let mut stats = ModiStatistics::<f64> {
            pivots: u64::MAX,
            ..Default::default()
        };
        stats.on_pivot(false);
        assert_eq!(stats.pivots, u64::MAX);
    }

    #[test]
    fn test_display_lists_costs() {
        let mut stats = ModiStatistics::<f64>::default();
        stats.set_initial_plan(6, 326.0);
        stats.set_final_cost(324.0);
        let text = stats.to_string();
        assert!(text.contains("Initial cost:         326"));
        assert!(text.contains("Final cost:           324"));
    }
}
