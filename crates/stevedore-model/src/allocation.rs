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

//! A single cell of a shipment plan.
//!
//! The magnitude of a cell and its membership in the basis are independent. A zero can be
//! a *basic zero*, a structural edge of the spanning tree that happens to carry nothing,
//! or a *non-basic zero*, a lane outside the tree. Positive cells are always basic.
//!
//! Arithmetic follows the magnitudes only: the result of `+` or `-` is basic exactly when
//! it is positive. Converting to `u32` yields the magnitude, so the basic flag of a zero
//! does not survive a round trip through a plain integer.

/// The error type for allocation arithmetic and construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationError {
    /// A negative magnitude was requested.
    InvalidValue(i64),
    /// A subtraction would have produced a negative magnitude.
    Underflow { minuend: u32, subtrahend: u32 },
    /// An addition or conversion exceeded the representable range.
    Overflow,
}

impl std::fmt::Display for AllocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue(v) => write!(f, "Allocation can not be negative, but got {}", v),
            Self::Underflow {
                minuend,
                subtrahend,
            } => write!(
                f,
                "Allocation underflow: cannot subtract {} from {}",
                subtrahend, minuend
            ),
            Self::Overflow => write!(f, "Allocation exceeds the representable range"),
        }
    }
}

impl std::error::Error for AllocationError {}

/// A non-negative shipment quantity carrying a basis flag.
///
/// The default value is a non-basic zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AllocationValue {
    quantity: u32,
    basic: bool,
}

impl AllocationValue {
    /// A zero outside the basis.
    pub const NON_BASIC_ZERO: Self = Self {
        quantity: 0,
        basic: false,
    };

    /// A zero that is part of the basis.
    pub const BASIC_ZERO: Self = Self {
        quantity: 0,
        basic: true,
    };

    /// Creates a value of `quantity`. Zero is non-basic, any positive quantity is basic.
    #[inline(always)]
    pub const fn new(quantity: u32) -> Self {
        Self {
            quantity,
            basic: quantity != 0,
        }
    }

    /// Returns the same magnitude marked as basic.
    #[inline(always)]
    pub const fn to_basic(self) -> Self {
        Self {
            quantity: self.quantity,
            basic: true,
        }
    }

    #[inline(always)]
    pub const fn is_basic(&self) -> bool {
        self.basic
    }

    /// Returns the magnitude; both kinds of zero yield `0`.
    #[inline(always)]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    #[inline(always)]
    pub const fn is_zero(&self) -> bool {
        self.quantity == 0
    }

    /// Adds two magnitudes; the result is basic exactly when it is positive.
    #[inline]
    pub fn checked_add(self, rhs: Self) -> Result<Self, AllocationError> {
        self.quantity
            .checked_add(rhs.quantity)
            .map(Self::new)
            .ok_or(AllocationError::Overflow)
    }

    /// Subtracts two magnitudes; the result is basic exactly when it is positive.
    #[inline]
    pub fn checked_sub(self, rhs: Self) -> Result<Self, AllocationError> {
        self.quantity
            .checked_sub(rhs.quantity)
            .map(Self::new)
            .ok_or(AllocationError::Underflow {
                minuend: self.quantity,
                subtrahend: rhs.quantity,
            })
    }
}

impl std::ops::Add for AllocationValue {
    type Output = Self;

    /// # Panics
    ///
    /// Panics if the sum exceeds `u32::MAX`.
    #[inline]
    fn add(self, rhs: Self) -> Self {
        match self.checked_add(rhs) {
            Ok(v) => v,
            Err(e) => panic!("called `AllocationValue::add` with {} + {}: {}", self, rhs, e),
        }
    }
}

impl std::ops::Sub for AllocationValue {
    type Output = Self;

    /// # Panics
    ///
    /// Panics if `rhs` is larger than `self`.
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        match self.checked_sub(rhs) {
            Ok(v) => v,
            Err(e) => panic!("called `AllocationValue::sub` with {} - {}: {}", self, rhs, e),
        }
    }
}

impl std::ops::AddAssign for AllocationValue {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::SubAssign for AllocationValue {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl From<u32> for AllocationValue {
    #[inline]
    fn from(quantity: u32) -> Self {
        Self::new(quantity)
    }
}

impl From<AllocationValue> for u32 {
    #[inline]
    fn from(value: AllocationValue) -> Self {
        value.quantity
    }
}

impl From<AllocationValue> for u64 {
    #[inline]
    fn from(value: AllocationValue) -> Self {
        u64::from(value.quantity)
    }
}

macro_rules! impl_try_from_signed {
    ($t:ty) => {
        impl TryFrom<$t> for AllocationValue {
            type Error = AllocationError;

            #[inline]
            fn try_from(value: $t) -> Result<Self, Self::Error> {
                if value < 0 {
                    return Err(AllocationError::InvalidValue(i64::from(value)));
                }
                u32::try_from(value)
                    .map(Self::new)
                    .map_err(|_| AllocationError::Overflow)
            }
        }
    };
}

impl_try_from_signed!(i32);
impl_try_from_signed!(i64);

impl std::fmt::Display for AllocationValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.basic && self.quantity == 0 {
            write!(f, "0*")
        } else {
            write!(f, "{}", self.quantity)
        }
    }
}
