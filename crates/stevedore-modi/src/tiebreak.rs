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

//! Tie-break keys shared by all reductions.
//!
//! Candidates are `(metric, index)` pairs where the index is either a line index or the
//! compound cell index `row * cols + col`. Compound indices order exactly like
//! [`Point`](stevedore_model::point::Point)s, so breaking ties by the smaller index is the
//! same as breaking them by the smaller point. Every comparator is a strict total order
//! over distinct indices, which makes the winner independent of evaluation order.

/// Prefers the smaller metric, then the smaller index.
#[inline(always)]
pub fn lower_first<C>(candidate: &(C, usize), incumbent: &(C, usize)) -> bool
where
    C: PartialOrd,
{
    candidate.0 < incumbent.0 || (candidate.0 == incumbent.0 && candidate.1 < incumbent.1)
}

/// Prefers the larger metric, then the smaller index.
#[inline(always)]
pub fn higher_first<C>(candidate: &(C, usize), incumbent: &(C, usize)) -> bool
where
    C: PartialOrd,
{
    candidate.0 > incumbent.0 || (candidate.0 == incumbent.0 && candidate.1 < incumbent.1)
}

/// Returns the preferred candidate of `range` under `prefer`, skipping `None` entries.
#[inline]
pub fn local_best<C, F, P>(range: std::ops::Range<usize>, mut metric: F, prefer: P) -> Option<(C, usize)>
where
    F: FnMut(usize) -> Option<C>,
    P: Fn(&(C, usize), &(C, usize)) -> bool,
{
    stevedore_core::reduce::best_by(
        range.filter_map(|index| metric(index).map(|value| (value, index))),
        prefer,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lower_first_breaks_ties_by_index() {
        assert!(lower_first(&(1.0, 5), &(2.0, 0)));
        assert!(lower_first(&(1.0, 3), &(1.0, 4)));
        assert!(!lower_first(&(1.0, 4), &(1.0, 3)));
    }

    #[test]
    fn test_higher_first_breaks_ties_by_index() {
        assert!(higher_first(&(3.0, 9), &(2.0, 0)));
        assert!(higher_first(&(3.0, 1), &(3.0, 2)));
        assert!(!higher_first(&(3.0, 2), &(3.0, 1)));
    }

    #[test]
    fn test_local_best_skips_missing_entries() {
        let values = [Some(4.0), None, Some(1.0), Some(1.0), None];
        assert_eq!(local_best(0..5, |i| values[i], lower_first), Some((1.0, 2)));
        assert_eq!(local_best(3..5, |i| values[i], lower_first), Some((1.0, 3)));
        assert_eq!(local_best(4..5, |i| values[i], lower_first), None);
    }
}
