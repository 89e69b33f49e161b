//! Arbitrary precision decimals.
//!
//! A wrapper around `dashu::float::DBig` carrying an explicit working
//! precision in decimal digits. Field operations run at the operands'
//! precision; transcendental trigonometry is routed through the machine
//! kernel (the engine documents this precision limitation).

use dashu::base::SquareRoot;
use dashu::float::DBig;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use crate::integer::Integer;
use crate::rational::Rational;

/// Machine doubles hold just under 16 decimal digits; below this a decimal
/// adds nothing over an `f64`.
pub const MACHINE_DIGITS: usize = 15;

/// An arbitrary precision decimal number.
#[derive(Clone, PartialEq, PartialOrd)]
pub struct Decimal(DBig);

impl Decimal {
    /// Creates a decimal from an integer at the given precision.
    #[must_use]
    pub fn from_integer(n: &Integer, precision: usize) -> Self {
        let d = DBig::from(n.as_inner().clone());
        Self(d.with_precision(precision.max(MACHINE_DIGITS)).value())
    }

    /// Creates a decimal from a rational at the given precision.
    #[must_use]
    pub fn from_rational(r: &Rational, precision: usize) -> Self {
        let num = Self::from_integer(&r.numerator(), precision);
        let den = Self::from_integer(&r.denominator(), precision);
        num / den
    }

    /// Creates a decimal from a machine double at the given precision.
    #[must_use]
    pub fn from_f64(x: f64, precision: usize) -> Self {
        // Shortest round-trip formatting, reparsed at the working precision.
        let s = format!("{x:e}");
        Self::parse(&s, precision).unwrap_or_else(|| Self::from_integer(&Integer::new(0), precision))
    }

    /// Parses a decimal literal (plain or scientific notation).
    #[must_use]
    pub fn parse(s: &str, precision: usize) -> Option<Self> {
        let d = DBig::from_str(s).ok()?;
        Some(Self(d.with_precision(precision.max(MACHINE_DIGITS)).value()))
    }

    /// Returns the working precision in decimal digits.
    #[must_use]
    pub fn precision(&self) -> usize {
        self.0.precision()
    }

    /// Converts to the nearest machine double.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().value()
    }

    /// Returns true if exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == DBig::ZERO
    }

    /// Returns the sign: -1, 0, or 1.
    #[must_use]
    pub fn signum(&self) -> i8 {
        if self.is_zero() {
            0
        } else if self.0 < DBig::ZERO {
            -1
        } else {
            1
        }
    }

    /// Square root at the working precision.
    #[must_use]
    pub fn sqrt(&self) -> Self {
        Self(self.0.sqrt())
    }

    /// Natural logarithm at the working precision. The caller screens
    /// non-positive arguments.
    #[must_use]
    pub fn ln(&self) -> Self {
        Self(self.0.ln())
    }

    /// Natural exponential at the working precision.
    #[must_use]
    pub fn exp(&self) -> Self {
        Self(self.0.exp())
    }

    /// Raises to an integer power by binary exponentiation.
    #[must_use]
    pub fn pow_int(&self, exp: i64) -> Self {
        let mut e = exp.unsigned_abs();
        let mut base = self.clone();
        let mut acc = Self::from_integer(&Integer::new(1), self.precision());
        while e > 0 {
            if e & 1 == 1 {
                acc = acc * base.clone();
            }
            base = base.clone() * base;
            e >>= 1;
        }
        if exp < 0 {
            Self::from_integer(&Integer::new(1), self.precision()) / acc
        } else {
            acc
        }
    }

    /// Returns the inner `dashu` decimal.
    #[must_use]
    pub fn as_inner(&self) -> &DBig {
        &self.0
    }
}

// DBig is a total value type (no NaN), so value equality is an equivalence.
impl Eq for Decimal {}

impl Hash for Decimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Equal decimals have equal machine images; collisions are fine.
        state.write_u64(self.to_f64().to_bits());
    }
}

impl Add for Decimal {
    type Output = Decimal;
    fn add(self, rhs: Self) -> Decimal {
        Decimal(self.0 + rhs.0)
    }
}

impl Sub for Decimal {
    type Output = Decimal;
    fn sub(self, rhs: Self) -> Decimal {
        Decimal(self.0 - rhs.0)
    }
}

impl Mul for Decimal {
    type Output = Decimal;
    fn mul(self, rhs: Self) -> Decimal {
        Decimal(self.0 * rhs.0)
    }
}

impl Div for Decimal {
    type Output = Decimal;
    fn div(self, rhs: Self) -> Decimal {
        Decimal(self.0 / rhs.0)
    }
}

impl Neg for Decimal {
    type Output = Decimal;
    fn neg(self) -> Decimal {
        Decimal(-self.0)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_integer_roundtrip() {
        let d = Decimal::from_integer(&Integer::new(42), 50);
        assert!((d.to_f64() - 42.0).abs() < 1e-12);
    }

    #[test]
    fn test_rational_division() {
        let d = Decimal::from_rational(&Rational::from_i64(1, 4), 30);
        assert!((d.to_f64() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_parse_scientific() {
        let d = Decimal::parse("2.5e2", 20).unwrap();
        assert!((d.to_f64() - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_pow_int() {
        let d = Decimal::from_integer(&Integer::new(2), 20);
        assert!((d.pow_int(10).to_f64() - 1024.0).abs() < 1e-6);
        assert!((d.pow_int(-2).to_f64() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_signum() {
        assert_eq!(Decimal::from_integer(&Integer::new(-5), 20).signum(), -1);
        assert_eq!(Decimal::from_integer(&Integer::new(0), 20).signum(), 0);
    }
}
