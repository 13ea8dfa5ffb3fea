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

/// The coordinate of a lane: source `row`, destination `col`.
///
/// Points are ordered row-major and lexicographically, `(row, col)`. This is a strict total
/// order that coincides with the order of the compound index `row * cols + col`, so scans
/// that walk the matrix in storage order and keep the first strict improvement always
/// select the smallest point among equal candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Point {
    row: usize,
    col: usize,
}

impl Point {
    #[inline(always)]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Reconstructs a point from its compound index in a matrix with `cols` columns.
    #[inline(always)]
    pub const fn from_index(index: usize, cols: usize) -> Self {
        Self {
            row: index / cols,
            col: index % cols,
        }
    }

    #[inline(always)]
    pub const fn row(&self) -> usize {
        self.row
    }

    #[inline(always)]
    pub const fn col(&self) -> usize {
        self.col
    }

    /// Returns the compound index `row * cols + col`.
    #[inline(always)]
    pub const fn to_index(&self, cols: usize) -> usize {
        self.row * cols + self.col
    }
}

impl From<(usize, usize)> for Point {
    #[inline]
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_row_major() {
        let mut points = vec![
            Point::new(1, 0),
            Point::new(0, 2),
            Point::new(1, 1),
            Point::new(0, 0),
        ];
        points.sort();
        assert_eq!(
            points,
            vec![
                Point::new(0, 0),
                Point::new(0, 2),
                Point::new(1, 0),
                Point::new(1, 1)
            ]
        );
    }

    #[test]
    fn test_points_differing_only_in_row_are_comparable() {
        let a = Point::new(0, 3);
        let b = Point::new(2, 3);
        assert!(a < b);
        assert!(b > a);
        assert_ne!(a, b);
    }

    #[test]
    fn test_order_matches_compound_index() {
        let cols = 5;
        for a in 0..20 {
            for b in 0..20 {
                let (pa, pb) = (Point::from_index(a, cols), Point::from_index(b, cols));
                assert_eq!(pa.cmp(&pb), a.cmp(&b));
                assert_eq!(pa.to_index(cols), a);
            }
        }
    }

    #[test]
    fn test_display_and_from_tuple() {
        let p: Point = (3, 4).into();
        assert_eq!(p.to_string(), "(3, 4)");
        assert_eq!((p.row(), p.col()), (3, 4));
    }
}
