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

//! The shipment plan and the pivot along an alternating cycle.

use crate::{
    allocation::AllocationValue,
    matrix::{Matrix, MatrixError},
    num::CostNumeric,
    point::Point,
};

/// What a single pivot changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PivotOutcome {
    /// The cell that entered the basis.
    pub entering: Point,
    /// The cell that left the basis.
    pub leaving: Option<Point>,
    /// The quantity moved along the cycle.
    pub step: u32,
}

impl PivotOutcome {
    /// Returns `true` if the pivot changed the basis without moving any quantity.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.step == 0
    }
}

/// An `m x n` grid of [`AllocationValue`]s.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AllocationMatrix {
    cells: Matrix<AllocationValue>,
}

impl AllocationMatrix {
    /// Creates an all non-basic-zero plan.
    #[inline]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            cells: Matrix::from_elem(rows, cols, AllocationValue::NON_BASIC_ZERO),
        }
    }

    /// Creates a plan from plain quantities: zeros are non-basic, the rest basic.
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, MatrixError>
    where
        R: AsRef<[u32]>,
    {
        let quantities = Matrix::from_rows(rows)?;
        Ok(Self {
            cells: quantities.map(|&q| AllocationValue::new(q)),
        })
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.cells.num_rows()
    }

    #[inline]
    pub fn num_cols(&self) -> usize {
        self.cells.num_cols()
    }

    #[inline(always)]
    pub fn get(&self, point: Point) -> AllocationValue {
        self.cells[point]
    }

    #[inline(always)]
    pub fn set(&mut self, point: Point, value: AllocationValue) {
        self.cells[point] = value;
    }

    #[inline(always)]
    pub fn is_basic(&self, point: Point) -> bool {
        self.cells[point].is_basic()
    }

    #[inline(always)]
    pub fn quantity(&self, point: Point) -> u32 {
        self.cells[point].quantity()
    }

    /// Marks the cell at `point` as basic, keeping its quantity.
    #[inline]
    pub fn make_basic(&mut self, point: Point) {
        let cell = &mut self.cells[point];
        *cell = cell.to_basic();
    }

    /// Removes a zero cell from the basis.
    ///
    /// # Panics
    ///
    /// Panics if the cell carries a positive quantity.
    #[inline]
    pub fn make_non_basic(&mut self, point: Point) {
        let cell = &mut self.cells[point];
        assert!(
            cell.is_zero(),
            "called `AllocationMatrix::make_non_basic` on {} which carries {}",
            point,
            cell.quantity()
        );
        *cell = AllocationValue::NON_BASIC_ZERO;
    }

    /// Returns the number of basic cells.
    #[inline]
    pub fn count_basic(&self) -> usize {
        self.cells.count(|c| c.is_basic())
    }

    /// Iterates the basic cells in row-major order.
    pub fn basic_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells
            .iter_points()
            .filter(|(_, c)| c.is_basic())
            .map(|(p, _)| p)
    }

    /// Returns `sum(cost[i, j] * x[i, j])`.
    ///
    /// # Panics
    ///
    /// Panics if `cost` does not have the shape of the plan.
    pub fn total_cost<C>(&self, cost: &Matrix<C>) -> C
    where
        C: CostNumeric,
    {
        assert!(
            cost.num_rows() == self.num_rows() && cost.num_cols() == self.num_cols(),
            "called `AllocationMatrix::total_cost` with a [{}, {}] cost matrix for a [{}, {}] plan",
            cost.num_rows(),
            cost.num_cols(),
            self.num_rows(),
            self.num_cols()
        );

        self.cells
            .as_slice()
            .iter()
            .zip(cost.as_slice())
            .filter(|(cell, _)| !cell.is_zero())
            .fold(C::zero(), |acc, (cell, &c)| {
                acc + c * C::from_quantity(cell.quantity())
            })
    }

    /// Returns the shipped quantity of every row.
    pub fn row_sums(&self) -> Vec<u64> {
        (0..self.num_rows())
            .map(|i| self.cells.row(i).iter().map(|&c| u64::from(c)).sum())
            .collect()
    }

    /// Returns the received quantity of every column.
    pub fn col_sums(&self) -> Vec<u64> {
        let mut sums = vec![0u64; self.num_cols()];
        for (point, &cell) in self.cells.iter_points() {
            sums[point.col()] += u64::from(cell);
        }
        sums
    }

    /// Returns the plain quantities, forgetting the distinction between the two zeros.
    pub fn quantities(&self) -> Matrix<u32> {
        self.cells.map(|c| c.quantity())
    }

    /// Moves quantity along `cycle` and exchanges one basic cell for the entering cell.
    ///
    /// `cycle[0]` is the entering cell; cells at odd positions give up quantity and cells at
    /// even positions receive it. The step is the smallest quantity among the odd cells.
    /// Afterwards every cell of the cycle is basic except the first cell past the entering
    /// one whose quantity reached zero, which leaves the basis. The number of basic cells is
    /// therefore unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the cycle has an odd length or fewer than four cells.
    pub fn pivot(&mut self, cycle: &[Point]) -> PivotOutcome {
        assert!(
            cycle.len() >= 4 && cycle.len() % 2 == 0,
            "called `AllocationMatrix::pivot` with a malformed cycle of length {}",
            cycle.len()
        );

        let step = cycle
            .iter()
            .skip(1)
            .step_by(2)
            .map(|&p| self.cells[p].quantity())
            .fold(u32::MAX, u32::min);
        let step_value = AllocationValue::new(step);

        let entering = cycle[0];
        self.cells[entering] = (self.cells[entering] + step_value).to_basic();

        let mut leaving = None;
        for (position, &point) in cycle.iter().enumerate().skip(1) {
            let updated = if position % 2 == 0 {
                self.cells[point] + step_value
            } else {
                self.cells[point] - step_value
            };

            self.cells[point] = if updated.is_zero() && leaving.is_none() {
                leaving = Some(point);
                AllocationValue::NON_BASIC_ZERO
            } else {
                updated.to_basic()
            };
        }

        PivotOutcome {
            entering,
            leaving,
            step,
        }
    }
}

impl std::ops::Index<Point> for AllocationMatrix {
    type Output = AllocationValue;

    #[inline(always)]
    fn index(&self, point: Point) -> &AllocationValue {
        &self.cells[point]
    }
}

impl std::fmt::Display for AllocationMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..self.num_rows() {
            let line: Vec<String> = self
                .cells
                .row(row)
                .iter()
                .map(|c| format!("{:>6}", c.to_string()))
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: usize, col: usize) -> Point {
        Point::new(row, col)
    }

    fn plan(rows: &[[u32; 4]]) -> AllocationMatrix {
        AllocationMatrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_from_rows_marks_positive_cells_basic() {
        let m = plan(&[[0, 2, 0, 10], [0, 7, 10, 0], [10, 1, 0, 0]]);
        assert_eq!(m.count_basic(), 6);
        assert!(m.is_basic(p(0, 1)));
        assert!(!m.is_basic(p(0, 0)));
        assert_eq!(m.row_sums(), vec![12, 17, 11]);
        assert_eq!(m.col_sums(), vec![10, 10, 10, 10]);
    }

    #[test]
    fn test_total_cost() {
        let m = plan(&[[0, 2, 0, 10], [0, 7, 10, 0], [10, 1, 0, 0]]);
        let cost =
            Matrix::from_rows(&[[8.0, 13.0, 4.0, 7.0], [11.0, 14.0, 6.0, 10.0], [6.0, 12.0, 8.0, 9.0]])
                .unwrap();
        assert_eq!(m.total_cost(&cost), 326.0);
    }

    #[test]
    fn test_pivot_moves_step_and_retires_one_cell() {
        let mut m = plan(&[[0, 2, 0, 10], [0, 7, 10, 0], [10, 1, 0, 0]]);
        let outcome = m.pivot(&[p(0, 2), p(0, 1), p(1, 1), p(1, 2)]);

        assert_eq!(outcome.step, 2);
        assert_eq!(outcome.leaving, Some(p(0, 1)));
        assert!(!outcome.is_degenerate());
        assert_eq!(
            m.quantities(),
            Matrix::from_rows(&[[0u32, 0, 2, 10], [0, 9, 8, 0], [10, 1, 0, 0]]).unwrap()
        );
        assert_eq!(m.count_basic(), 6);
        assert!(m.is_basic(p(0, 2)));
        assert!(!m.is_basic(p(0, 1)));
    }

    #[test]
    fn test_degenerate_pivot_keeps_basis_size() {
        let mut m = plan(&[[0, 0, 0, 0], [4, 3, 0, 0], [0, 0, 0, 0]]);
        m.make_basic(p(0, 0));
        assert_eq!(m.count_basic(), 3);

        let outcome = m.pivot(&[p(0, 1), p(0, 0), p(1, 0), p(1, 1)]);

        assert!(outcome.is_degenerate());
        assert_eq!(outcome.leaving, Some(p(0, 0)));
        assert_eq!(m.count_basic(), 3);
        assert_eq!(m.get(p(0, 1)), AllocationValue::BASIC_ZERO);
        assert_eq!(m.quantity(p(1, 0)), 4);
        assert_eq!(m.quantity(p(1, 1)), 3);
    }

    #[test]
    fn test_degenerate_pivot_retires_first_zero_even_if_receiving() {
        let mut m = plan(&[[5, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        m.make_basic(p(1, 0));
        m.make_basic(p(1, 1));

        let outcome = m.pivot(&[p(0, 1), p(0, 0), p(1, 0), p(1, 1)]);

        assert_eq!(outcome.leaving, Some(p(1, 0)));
        assert_eq!(m.get(p(1, 1)), AllocationValue::BASIC_ZERO);
        assert_eq!(m.get(p(0, 1)), AllocationValue::BASIC_ZERO);
        assert_eq!(m.count_basic(), 3);
    }

    #[test]
    fn test_first_zero_leaves_when_several_cells_reach_zero() {
        let mut m = plan(&[[0, 5, 0, 0], [0, 5, 5, 0], [0, 0, 0, 0]]);
        let outcome = m.pivot(&[p(0, 2), p(0, 1), p(1, 1), p(1, 2)]);
        assert_eq!(outcome.step, 5);
        assert_eq!(outcome.leaving, Some(p(0, 1)));
        assert_eq!(m.get(p(1, 2)), AllocationValue::BASIC_ZERO);
        assert_eq!(m.get(p(0, 1)), AllocationValue::NON_BASIC_ZERO);
        assert_eq!(m.quantity(p(1, 1)), 10);
    }

    #[test]
    #[should_panic(expected = "malformed cycle")]
    fn test_pivot_rejects_odd_cycles() {
        let mut m = AllocationMatrix::zeros(2, 2);
        m.pivot(&[p(0, 0), p(0, 1), p(1, 1)]);
    }

    #[test]
    #[should_panic(expected = "make_non_basic")]
    fn test_make_non_basic_rejects_positive_cells() {
        let mut m = plan(&[[1, 0, 0, 0]]);
        m.make_non_basic(p(0, 0));
    }

    #[test]
    fn test_basic_points_are_row_major() {
        let mut m = plan(&[[0, 1, 0, 0], [2, 0, 0, 3]]);
        m.make_basic(p(0, 3));
        let points: Vec<_> = m.basic_points().collect();
        assert_eq!(points, vec![p(0, 1), p(0, 3), p(1, 0), p(1, 3)]);
        m.make_non_basic(p(0, 3));
        assert_eq!(m.count_basic(), 3);
    }

    #[test]
    fn test_display_marks_basic_zero() {
        let mut m = AllocationMatrix::zeros(1, 2);
        m.make_basic(p(0, 1));
        assert_eq!(m.to_string(), "     0     0*\n");
    }
}
