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

use crate::point::Point;

/// The error type for matrix construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixError {
    /// A row had a different length than the first row.
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// The flat buffer does not hold `rows * cols` elements.
    LengthMismatch { expected: usize, found: usize },
    /// `rows * cols` does not fit into `usize`.
    TooLarge { rows: usize, cols: usize },
}

impl std::fmt::Display for MatrixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RaggedRows {
                row,
                expected,
                found,
            } => write!(
                f,
                "Row {} has {} columns, but the first row has {}",
                row, found, expected
            ),
            Self::LengthMismatch { expected, found } => write!(
                f,
                "Matrix buffer holds {} elements, but {} were expected",
                found, expected
            ),
            Self::TooLarge { rows, cols } => {
                write!(f, "Matrix size [{}, {}] overflows the index space", rows, cols)
            }
        }
    }
}

impl std::error::Error for MatrixError {}

/// A dense row-major matrix backed by a single flat vector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T> Matrix<T> {
    /// Wraps a row-major buffer of `rows * cols` elements.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, MatrixError> {
        let expected = rows
            .checked_mul(cols)
            .ok_or(MatrixError::TooLarge { rows, cols })?;
        if data.len() != expected {
            return Err(MatrixError::LengthMismatch {
                expected,
                found: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Builds a matrix by calling `f` for every point in row-major order.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(Point) -> T,
    {
        let mut data = Vec::with_capacity(rows.saturating_mul(cols));
        for row in 0..rows {
            for col in 0..cols {
                data.push(f(Point::new(row, col)));
            }
        }
        Self { rows, cols, data }
    }

    /// Builds a matrix from a slice of rows of equal length.
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, MatrixError>
    where
        R: AsRef<[T]>,
        T: Clone,
    {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len().saturating_mul(cols));
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != cols {
                return Err(MatrixError::RaggedRows {
                    row,
                    expected: cols,
                    found: values.len(),
                });
            }
            data.extend_from_slice(values);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn num_cols(&self) -> usize {
        self.cols
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the element at `point`, or `None` if it is out of bounds.
    #[inline]
    pub fn get(&self, point: Point) -> Option<&T> {
        if point.row() < self.rows && point.col() < self.cols {
            Some(&self.data[point.to_index(self.cols)])
        } else {
            None
        }
    }

    /// Returns the elements of `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    #[inline]
    pub fn row(&self, row: usize) -> &[T] {
        assert!(
            row < self.rows,
            "called `Matrix::row` with row out of bounds: the len is {} but the row is {}",
            self.rows,
            row
        );
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Returns the underlying row-major buffer.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Iterates all elements in row-major order together with their point.
    pub fn iter_points(&self) -> impl Iterator<Item = (Point, &T)> + '_ {
        let cols = self.cols;
        self.data
            .iter()
            .enumerate()
            .map(move |(index, value)| (Point::from_index(index, cols), value))
    }

    /// Overwrites every element with `f(point)`.
    pub fn fill_with<F>(&mut self, mut f: F)
    where
        F: FnMut(Point) -> T,
    {
        let cols = self.cols;
        for (index, slot) in self.data.iter_mut().enumerate() {
            *slot = f(Point::from_index(index, cols));
        }
    }

    /// Counts the elements satisfying `predicate`.
    pub fn count<P>(&self, mut predicate: P) -> usize
    where
        P: FnMut(&T) -> bool,
    {
        self.data.iter().filter(|v| predicate(v)).count()
    }

    /// Returns a matrix of the same shape with `f` applied to every element.
    pub fn map<U, F>(&self, f: F) -> Matrix<U>
    where
        F: FnMut(&T) -> U,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }

    #[inline(always)]
    fn flat_index(&self, point: Point) -> usize {
        assert!(
            point.row() < self.rows && point.col() < self.cols,
            "called `Matrix` index with point out of bounds: the shape is [{}, {}] but the point is {}",
            self.rows,
            self.cols,
            point
        );
        point.to_index(self.cols)
    }
}

impl<T> Matrix<T>
where
    T: Clone,
{
    /// Creates a `rows x cols` matrix filled with `value`.
    #[inline]
    pub fn from_elem(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows.saturating_mul(cols)],
        }
    }
}

impl<T> std::ops::Index<Point> for Matrix<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, point: Point) -> &T {
        &self.data[self.flat_index(point)]
    }
}

impl<T> std::ops::IndexMut<Point> for Matrix<T> {
    #[inline(always)]
    fn index_mut(&mut self, point: Point) -> &mut T {
        let index = self.flat_index(point);
        &mut self.data[index]
    }
}

impl<T> std::ops::Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        &self[Point::new(row, col)]
    }
}

impl<T> std::ops::IndexMut<(usize, usize)> for Matrix<T> {
    #[inline(always)]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        &mut self[Point::new(row, col)]
    }
}
