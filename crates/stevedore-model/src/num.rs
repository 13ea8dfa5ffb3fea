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

use num_traits::{Float, FromPrimitive};

/// Numeric requirements on the cost type of a transportation problem.
///
/// Besides ordinary floating point arithmetic, a cost must survive a lossless round trip
/// through a `u64` so that potentials can live in atomic slots while workers label the
/// basis tree concurrently.
pub trait CostNumeric:
    Float + FromPrimitive + Send + Sync + std::fmt::Debug + std::fmt::Display + 'static
{
    /// Returns the raw bit pattern of `self`, widened to 64 bits.
    fn to_bits64(self) -> u64;

    /// Reconstructs a value from a pattern produced by [`CostNumeric::to_bits64`].
    fn from_bits64(bits: u64) -> Self;

    /// Converts a shipment quantity into the cost domain.
    fn from_quantity(quantity: u32) -> Self;
}

impl CostNumeric for f64 {
    #[inline(always)]
    fn to_bits64(self) -> u64 {
        self.to_bits()
    }

    #[inline(always)]
    fn from_bits64(bits: u64) -> Self {
        f64::from_bits(bits)
    }

    #[inline(always)]
    fn from_quantity(quantity: u32) -> Self {
        f64::from(quantity)
    }
}

impl CostNumeric for f32 {
    #[inline(always)]
    fn to_bits64(self) -> u64 {
        u64::from(self.to_bits())
    }

    #[inline(always)]
    fn from_bits64(bits: u64) -> Self {
        // Patterns always originate from `to_bits64`, so the upper half is zero.
        f32::from_bits(bits as u32)
    }

    #[inline(always)]
    fn from_quantity(quantity: u32) -> Self {
        quantity as f32
    }
}
