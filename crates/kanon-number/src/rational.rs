//! Arbitrary precision rationals.
//!
//! Exact fractions backed by `dashu::rational::RBig`, always in lowest
//! terms with a positive denominator. The symbolic layers keep literal
//! quotients of integers in this form for as long as the computation stays
//! exact.

use dashu::base::{Abs, Inverse, Signed as DashuSigned, UnsignedAbs};
use dashu::rational::RBig;
use num_traits::{One, Zero};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::integer::Integer;

/// An exact rational number.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Rational(RBig);

impl Rational {
    /// Creates a rational from a numerator and denominator, normalising the
    /// sign into the numerator.
    ///
    /// # Panics
    ///
    /// Panics if the denominator is zero; callers screen literal zero
    /// denominators before reaching the kernel.
    #[must_use]
    pub fn new(numerator: Integer, denominator: Integer) -> Self {
        assert!(!denominator.is_zero(), "zero denominator");
        let numerator = if denominator.is_negative() {
            -numerator
        } else {
            numerator
        };
        Self(RBig::from_parts(
            numerator.into_inner(),
            denominator.into_inner().unsigned_abs(),
        ))
    }

    /// Creates a rational equal to the given integer.
    #[must_use]
    pub fn from_integer(n: Integer) -> Self {
        Self(RBig::from(n.into_inner()))
    }

    /// Creates a rational from machine integers.
    ///
    /// # Panics
    ///
    /// Panics if the denominator is zero.
    #[must_use]
    pub fn from_i64(numerator: i64, denominator: i64) -> Self {
        Self::new(Integer::new(numerator), Integer::new(denominator))
    }

    /// Returns the numerator (sign-carrying).
    #[must_use]
    pub fn numerator(&self) -> Integer {
        Integer::from(self.0.numerator().clone())
    }

    /// Returns the denominator (always positive).
    #[must_use]
    pub fn denominator(&self) -> Integer {
        Integer::from(dashu::integer::IBig::from(self.0.denominator().clone()))
    }

    /// Returns true if the denominator is one.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.0.denominator().is_one()
    }

    /// Extracts the integer value when the denominator is one.
    #[must_use]
    pub fn to_integer(&self) -> Option<Integer> {
        self.is_integer().then(|| self.numerator())
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.clone().abs())
    }

    /// Returns the reciprocal.
    ///
    /// # Panics
    ///
    /// Panics on zero; callers screen zero before inverting.
    #[must_use]
    pub fn recip(&self) -> Self {
        assert!(!self.is_zero(), "reciprocal of zero");
        Self(self.0.clone().inv())
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

    /// Returns true if negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        DashuSigned::is_negative(&self.0)
    }

    /// Raises to an integer power. Negative exponents invert; `0^-n` is the
    /// caller's responsibility.
    #[must_use]
    pub fn pow(&self, exp: i64) -> Self {
        let positive = self.pow_unsigned(exp.unsigned_abs());
        if exp < 0 {
            positive.recip()
        } else {
            positive
        }
    }

    fn pow_unsigned(&self, mut exp: u64) -> Self {
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

    /// Converts to the nearest machine double.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        let num = self.numerator().to_f64();
        let den = self.denominator().to_f64();
        num / den
    }

    /// Returns the inner `dashu` rational.
    #[must_use]
    pub fn as_inner(&self) -> &RBig {
        &self.0
    }
}

impl From<i64> for Rational {
    fn from(value: i64) -> Self {
        Self::from_integer(Integer::new(value))
    }
}

impl From<Integer> for Rational {
    fn from(value: Integer) -> Self {
        Self::from_integer(value)
    }
}

impl Zero for Rational {
    fn zero() -> Self {
        Self(RBig::ZERO)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for Rational {
    fn one() -> Self {
        Self(RBig::ONE)
    }
}

impl Add for Rational {
    type Output = Rational;
    fn add(self, rhs: Self) -> Rational {
        Rational(self.0 + rhs.0)
    }
}

impl Add for &Rational {
    type Output = Rational;
    fn add(self, rhs: Self) -> Rational {
        Rational(&self.0 + &rhs.0)
    }
}

impl Sub for Rational {
    type Output = Rational;
    fn sub(self, rhs: Self) -> Rational {
        Rational(self.0 - rhs.0)
    }
}

impl Mul for Rational {
    type Output = Rational;
    fn mul(self, rhs: Self) -> Rational {
        Rational(self.0 * rhs.0)
    }
}

impl Mul for &Rational {
    type Output = Rational;
    fn mul(self, rhs: Self) -> Rational {
        Rational(&self.0 * &rhs.0)
    }
}

impl Div for Rational {
    type Output = Rational;
    fn div(self, rhs: Self) -> Rational {
        Rational(self.0 / rhs.0)
    }
}

impl Neg for Rational {
    type Output = Rational;
    fn neg(self) -> Rational {
        Rational(-self.0)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numerator())
        } else {
            write!(f, "{}/{}", self.numerator(), self.denominator())
        }
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowest_terms() {
        let r = Rational::from_i64(4, 6);
        assert_eq!(r.numerator(), Integer::new(2));
        assert_eq!(r.denominator(), Integer::new(3));
    }

    #[test]
    fn test_sign_normalisation() {
        let r = Rational::from_i64(1, -2);
        assert_eq!(r.numerator(), Integer::new(-1));
        assert_eq!(r.denominator(), Integer::new(2));
        assert!(r.is_negative());
    }

    #[test]
    fn test_arithmetic() {
        let a = Rational::from_i64(2, 3);
        let b = Rational::from_i64(1, 3);
        assert_eq!(a.clone() + b.clone(), Rational::from_i64(1, 1));
        assert_eq!(a.clone() - b.clone(), Rational::from_i64(1, 3));
        assert_eq!(a * b, Rational::from_i64(2, 9));
    }

    #[test]
    fn test_pow() {
        let r = Rational::from_i64(2, 3);
        assert_eq!(r.pow(2), Rational::from_i64(4, 9));
        assert_eq!(r.pow(-1), Rational::from_i64(3, 2));
        assert_eq!(r.pow(0), Rational::from_i64(1, 1));
    }

    #[test]
    fn test_to_f64() {
        let r = Rational::from_i64(1, 4);
        assert!((r.to_f64() - 0.25).abs() < f64::EPSILON);
    }
}
