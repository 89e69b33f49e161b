//! Arbitrary precision integers.
//!
//! A thin wrapper around `dashu::integer::IBig` exposing the operations the
//! symbolic layers need: construction, sign queries, gcd, exact roots.

use dashu::base::{Abs, Gcd, Signed as DashuSigned};
use dashu::integer::IBig;
use num_traits::{One, Zero};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// An arbitrary precision signed integer.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Integer(IBig);

impl Integer {
    /// Creates an integer from an `i64`.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(IBig::from(value))
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.clone().abs())
    }

    /// Returns the sign: -1, 0, or 1.
    #[must_use]
    pub fn signum(&self) -> i8 {
        if self.0.is_zero() {
            0
        } else if DashuSigned::is_positive(&self.0) {
            1
        } else {
            -1
        }
    }

    /// Returns true if this integer is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        DashuSigned::is_negative(&self.0)
    }

    /// Computes the greatest common divisor.
    #[must_use]
    pub fn gcd(&self, other: &Self) -> Self {
        Self(IBig::from(self.0.clone().gcd(other.0.clone())))
    }

    /// Raises this integer to a non-negative power by binary exponentiation.
    #[must_use]
    pub fn pow(&self, mut exp: u64) -> Self {
        let mut base = self.clone();
        let mut acc = Self::one();
        while exp > 0 {
            if exp & 1 == 1 {
                acc = &acc * &base;
            }
            base = &base * &base;
            exp >>= 1;
        }
        acc
    }

    /// Returns the exact integer square root, if this value is a perfect
    /// square. Limited to magnitudes that fit in a `u128`; larger values
    /// report `None` and callers fall back to approximation.
    #[must_use]
    pub fn sqrt_exact(&self) -> Option<Self> {
        if self.is_negative() {
            return None;
        }
        let n: u128 = self.0.clone().try_into().ok()?;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        #[allow(clippy::cast_precision_loss)]
        let mut r = (n as f64).sqrt() as u128;
        while r.checked_mul(r).map_or(true, |sq| sq > n) {
            r -= 1;
        }
        while (r + 1).checked_mul(r + 1).is_some_and(|sq| sq <= n) {
            r += 1;
        }
        (r * r == n).then(|| Self(IBig::from(r)))
    }

    /// Returns the inner `dashu` integer.
    #[must_use]
    pub fn into_inner(self) -> IBig {
        self.0
    }

    /// Returns a reference to the inner `dashu` integer.
    #[must_use]
    pub fn as_inner(&self) -> &IBig {
        &self.0
    }

    /// Attempts a lossless conversion to `i64`.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        self.0.clone().try_into().ok()
    }

    /// Converts to the nearest machine double.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().value()
    }
}

impl From<IBig> for Integer {
    fn from(value: IBig) -> Self {
        Self(value)
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl Zero for Integer {
    fn zero() -> Self {
        Self(IBig::ZERO)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for Integer {
    fn one() -> Self {
        Self(IBig::ONE)
    }
}

impl Add for Integer {
    type Output = Integer;
    fn add(self, rhs: Self) -> Integer {
        Integer(self.0 + rhs.0)
    }
}

impl Add for &Integer {
    type Output = Integer;
    fn add(self, rhs: Self) -> Integer {
        Integer(&self.0 + &rhs.0)
    }
}

impl Sub for Integer {
    type Output = Integer;
    fn sub(self, rhs: Self) -> Integer {
        Integer(self.0 - rhs.0)
    }
}

impl Mul for Integer {
    type Output = Integer;
    fn mul(self, rhs: Self) -> Integer {
        Integer(self.0 * rhs.0)
    }
}

impl Mul for &Integer {
    type Output = Integer;
    fn mul(self, rhs: Self) -> Integer {
        Integer(&self.0 * &rhs.0)
    }
}

impl Neg for Integer {
    type Output = Integer;
    fn neg(self) -> Integer {
        Integer(-self.0)
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
