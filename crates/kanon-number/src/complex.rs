//! Machine-precision complex numbers.
//!
//! The engine recognises `a + b·i` literals and closes square roots of
//! negative reals; both land here. Components are machine doubles; the
//! structural equality and hashing used by the expression arena normalise
//! zero and NaN bit patterns so equal values intern identically.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Normalises a double for structural identity: one NaN, one zero.
#[must_use]
pub(crate) fn canonical_bits(x: f64) -> u64 {
    if x.is_nan() {
        0x7ff8_0000_0000_0000
    } else if x == 0.0 {
        0
    } else {
        x.to_bits()
    }
}

/// A complex number with machine-precision components.
#[derive(Clone, Copy)]
pub struct Complex {
    /// Real component.
    pub re: f64,
    /// Imaginary component.
    pub im: f64,
}

impl Complex {
    /// Creates a complex number from components.
    #[must_use]
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// The imaginary unit.
    #[must_use]
    pub fn i() -> Self {
        Self::new(0.0, 1.0)
    }

    /// Returns true if the imaginary component is exactly zero.
    #[must_use]
    pub fn is_real(&self) -> bool {
        self.im == 0.0
    }

    /// Returns the modulus.
    #[must_use]
    pub fn abs(&self) -> f64 {
        self.re.hypot(self.im)
    }

    /// Componentwise sum.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        Self::new(self.re + other.re, self.im + other.im)
    }

    /// Complex product.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        Self::new(
            self.re * other.re - self.im * other.im,
            self.re * other.im + self.im * other.re,
        )
    }

    /// Complex quotient.
    #[must_use]
    pub fn div(&self, other: &Self) -> Self {
        let d = other.re * other.re + other.im * other.im;
        Self::new(
            (self.re * other.re + self.im * other.im) / d,
            (self.im * other.re - self.re * other.im) / d,
        )
    }

    /// Negation.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self::new(-self.re, -self.im)
    }

    /// Principal square root.
    #[must_use]
    pub fn sqrt(&self) -> Self {
        let m = self.abs();
        let re = ((m + self.re) / 2.0).sqrt();
        let im = ((m - self.re) / 2.0).sqrt();
        Self::new(re, if self.im < 0.0 { -im } else { im })
    }

    /// Natural exponential.
    #[must_use]
    pub fn exp(&self) -> Self {
        let r = self.re.exp();
        Self::new(r * self.im.cos(), r * self.im.sin())
    }

    /// Principal natural logarithm.
    #[must_use]
    pub fn ln(&self) -> Self {
        Self::new(self.abs().ln(), self.im.atan2(self.re))
    }

    /// Raises to a real power via the exponential form.
    #[must_use]
    pub fn powf(&self, exp: f64) -> Self {
        if self.re == 0.0 && self.im == 0.0 {
            return Self::new(0.0, 0.0);
        }
        self.ln().scale(exp).exp()
    }

    /// Componentwise scale by a real factor.
    #[must_use]
    pub fn scale(&self, k: f64) -> Self {
        Self::new(self.re * k, self.im * k)
    }

    /// Tolerance comparison on both components.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        (self.re - other.re).abs() <= tolerance && (self.im - other.im).abs() <= tolerance
    }
}

impl PartialEq for Complex {
    fn eq(&self, other: &Self) -> bool {
        canonical_bits(self.re) == canonical_bits(other.re)
            && canonical_bits(self.im) == canonical_bits(other.im)
    }
}

impl Eq for Complex {}

impl Hash for Complex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(canonical_bits(self.re));
        state.write_u64(canonical_bits(self.im));
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im < 0.0 {
            write!(f, "({}-{}i)", self.re, -self.im)
        } else {
            write!(f, "({}+{}i)", self.re, self.im)
        }
    }
}

impl fmt::Debug for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
