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

//! The validated transportation problem instance.

use crate::{
    matrix::{Matrix, MatrixError},
    num::CostNumeric,
    point::Point,
};

/// The error type for problem construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProblemError {
    /// The problem has no source or no destination.
    Empty,
    /// The cost matrix disagrees with the supply or demand vector.
    DimensionMismatch {
        cost_rows: usize,
        cost_cols: usize,
        supply_len: usize,
        demand_len: usize,
    },
    /// Total supply differs from total demand.
    Unbalanced { total_supply: u64, total_demand: u64 },
    /// A cost entry is NaN or infinite.
    InvalidCost(Point),
    /// A balancing quantity does not fit into a single cell.
    QuantityOverflow(u64),
    /// The cost rows could not be assembled into a matrix.
    Matrix(MatrixError),
}

impl std::fmt::Display for ProblemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Problem must have at least one source and one destination"),
            Self::DimensionMismatch {
                cost_rows,
                cost_cols,
                supply_len,
                demand_len,
            } => write!(
                f,
                "Cost matrix is [{}, {}] but supply has {} entries and demand has {}",
                cost_rows, cost_cols, supply_len, demand_len
            ),
            Self::Unbalanced {
                total_supply,
                total_demand,
            } => write!(
                f,
                "Problem is unbalanced: total supply {} differs from total demand {}",
                total_supply, total_demand
            ),
            Self::InvalidCost(p) => write!(f, "Cost at {} is not a finite number", p),
            Self::QuantityOverflow(q) => {
                write!(f, "Quantity {} exceeds the capacity of a single cell", q)
            }
            Self::Matrix(e) => write!(f, "Invalid cost matrix: {}", e),
        }
    }
}

impl std::error::Error for ProblemError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Matrix(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MatrixError> for ProblemError {
    fn from(e: MatrixError) -> Self {
        Self::Matrix(e)
    }
}

/// A balanced transportation problem.
///
/// Immutable once constructed. Every instance satisfies `sum(supply) == sum(demand)`,
/// has at least one source and one destination, and only finite costs.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportProblem<C> {
    cost: Matrix<C>,
    supply: Vec<u32>,
    demand: Vec<u32>,
}

impl<C> TransportProblem<C>
where
    C: CostNumeric,
{
    /// Validates and creates a problem.
    pub fn new(cost: Matrix<C>, supply: Vec<u32>, demand: Vec<u32>) -> Result<Self, ProblemError> {
        if cost.num_rows() != supply.len() || cost.num_cols() != demand.len() {
            return Err(ProblemError::DimensionMismatch {
                cost_rows: cost.num_rows(),
                cost_cols: cost.num_cols(),
                supply_len: supply.len(),
                demand_len: demand.len(),
            });
        }
        if supply.is_empty() || demand.is_empty() {
            return Err(ProblemError::Empty);
        }
        if let Some((point, _)) = cost.iter_points().find(|(_, c)| !c.is_finite()) {
            return Err(ProblemError::InvalidCost(point));
        }

        let total_supply: u64 = supply.iter().map(|&s| u64::from(s)).sum();
        let total_demand: u64 = demand.iter().map(|&d| u64::from(d)).sum();
        if total_supply != total_demand {
            return Err(ProblemError::Unbalanced {
                total_supply,
                total_demand,
            });
        }

        Ok(Self {
            cost,
            supply,
            demand,
        })
    }

    /// Creates a problem from cost rows.
    pub fn from_rows<R>(cost: &[R], supply: &[u32], demand: &[u32]) -> Result<Self, ProblemError>
    where
        R: AsRef<[C]>,
    {
        let cost = Matrix::from_rows(cost)?;
        Self::new(cost, supply.to_vec(), demand.to_vec())
    }

    /// Returns the number of sources `m`.
    #[inline]
    pub fn num_sources(&self) -> usize {
        self.supply.len()
    }

    /// Returns the number of destinations `n`.
    #[inline]
    pub fn num_destinations(&self) -> usize {
        self.demand.len()
    }

    /// Returns the size of a spanning tree of the transportation graph, `m + n - 1`.
    #[inline]
    pub fn basis_size(&self) -> usize {
        self.num_sources() + self.num_destinations() - 1
    }

    #[inline]
    pub fn cost(&self) -> &Matrix<C> {
        &self.cost
    }

    #[inline(always)]
    pub fn cost_at(&self, point: Point) -> C {
        self.cost[point]
    }

    #[inline]
    pub fn supply(&self) -> &[u32] {
        &self.supply
    }

    #[inline]
    pub fn demand(&self) -> &[u32] {
        &self.demand
    }

    /// Returns the total quantity to be shipped.
    #[inline]
    pub fn total_supply(&self) -> u64 {
        self.supply.iter().map(|&s| u64::from(s)).sum()
    }
}

impl<C> std::fmt::Display for TransportProblem<C>
where
    C: CostNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "TransportProblem({} sources, {} destinations, {} units)",
            self.num_sources(),
            self.num_destinations(),
            self.total_supply()
        )?;
        for row in 0..self.num_sources() {
            let line: Vec<String> = self
                .cost
                .row(row)
                .iter()
                .map(|c| format!("{:>8.2}", c))
                .collect();
            writeln!(f, "{} | {:>6}", line.join(" "), self.supply[row])?;
        }
        let demand: Vec<String> = self.demand.iter().map(|d| format!("{:>8}", d)).collect();
        writeln!(f, "{}", demand.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_a() -> Result<TransportProblem<f64>, ProblemError> {
        TransportProblem::from_rows(
            &[
                [8.0, 13.0, 4.0, 7.0],
                [11.0, 14.0, 6.0, 10.0],
                [6.0, 12.0, 8.0, 9.0],
            ],
            &[12, 17, 11],
            &[10, 10, 10, 10],
        )
    }

    #[test]
    fn test_new_accepts_balanced_problem() {
        let tp = scenario_a().unwrap();
        assert_eq!(tp.num_sources(), 3);
        assert_eq!(tp.num_destinations(), 4);
        assert_eq!(tp.basis_size(), 6);
        assert_eq!(tp.total_supply(), 40);
        assert_eq!(tp.cost_at(Point::new(2, 0)), 6.0);
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let err =
            TransportProblem::from_rows(&[[1.0f64, 2.0], [3.0, 4.0]], &[1, 1, 1], &[2, 1]).unwrap_err();
        assert_eq!(
            err,
            ProblemError::DimensionMismatch {
                cost_rows: 2,
                cost_cols: 2,
                supply_len: 3,
                demand_len: 2
            }
        );
    }

    #[test]
    fn test_unbalanced_is_rejected() {
        let err = TransportProblem::from_rows(&[[1.0f64, 2.0]], &[5], &[2, 2]).unwrap_err();
        assert_eq!(
            err,
            ProblemError::Unbalanced {
                total_supply: 5,
                total_demand: 4
            }
        );
        assert!(err.to_string().contains("unbalanced"));
    }

    #[test]
    fn test_empty_and_non_finite_are_rejected() {
        let empty: [[f64; 0]; 0] = [];
        assert_eq!(
            TransportProblem::from_rows(&empty, &[], &[]).unwrap_err(),
            ProblemError::Empty
        );
        let err = TransportProblem::from_rows(&[[1.0, f64::NAN]], &[2], &[1, 1]).unwrap_err();
        assert_eq!(err, ProblemError::InvalidCost(Point::new(0, 1)));
    }

    #[test]
    fn test_ragged_cost_rows_are_reported() {
        let rows: Vec<Vec<f64>> = vec![vec![1.0, 2.0], vec![3.0]];
        let err = TransportProblem::from_rows(&rows, &[1, 1], &[1, 1]).unwrap_err();
        assert!(matches!(err, ProblemError::Matrix(MatrixError::RaggedRows { .. })));
        assert!(std::error::Error::source(&err).is_some());
    }
}
