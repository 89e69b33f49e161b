//! The tagged numeric value stored in expression trees.
//!
//! [`NumericValue`] is the sum of the kernel's four representations:
//! machine doubles, exact rationals, arbitrary-precision decimals, and
//! machine complex numbers. Arithmetic promotes operands pairwise: exact
//! stays exact while it can, decimals absorb machine values at their own
//! precision, and a complex operand makes the result complex.
//!
//! Structural equality and hashing are exact (normalised bit patterns),
//! which is what the expression arena needs for interning; the separate
//! [`NumericValue::approx_eq`] comparison applies the engine tolerance.

use num_traits::{One, Zero};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::complex::{canonical_bits, Complex};
use crate::decimal::Decimal;
use crate::rational::Rational;

/// A literal numeric value.
#[derive(Clone)]
pub enum NumericValue {
    /// A machine double.
    Machine(f64),
    /// An exact big rational (integers have denominator one).
    Rational(Rational),
    /// An arbitrary-precision decimal.
    Decimal(Decimal),
    /// A machine-precision complex number.
    Complex(Complex),
}

impl NumericValue {
    /// The canonical zero (exact).
    #[must_use]
    pub fn zero() -> Self {
        Self::Rational(Rational::zero())
    }

    /// The canonical one (exact).
    #[must_use]
    pub fn one() -> Self {
        Self::Rational(Rational::one())
    }

    /// An exact integer literal.
    #[must_use]
    pub fn int(n: i64) -> Self {
        Self::Rational(Rational::from(n))
    }

    /// An exact quotient; a zero denominator follows machine semantics
    /// (`±∞` or NaN) rather than panicking.
    #[must_use]
    pub fn rational(num: i64, den: i64) -> Self {
        if den == 0 {
            #[allow(clippy::cast_precision_loss)]
            return Self::Machine(num as f64 / 0.0);
        }
        Self::Rational(Rational::from_i64(num, den))
    }

    /// Not-a-number.
    #[must_use]
    pub fn nan() -> Self {
        Self::Machine(f64::NAN)
    }

    /// Positive infinity.
    #[must_use]
    pub fn pos_infinity() -> Self {
        Self::Machine(f64::INFINITY)
    }

    /// Negative infinity.
    #[must_use]
    pub fn neg_infinity() -> Self {
        Self::Machine(f64::NEG_INFINITY)
    }

    /// Returns true if exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Machine(x) => *x == 0.0,
            Self::Rational(r) => r.is_zero(),
            Self::Decimal(d) => d.is_zero(),
            Self::Complex(z) => z.re == 0.0 && z.im == 0.0,
        }
    }

    /// Returns true if exactly one.
    #[must_use]
    pub fn is_one(&self) -> bool {
        match self {
            Self::Machine(x) => *x == 1.0,
            Self::Rational(r) => r.is_one(),
            Self::Decimal(d) => d.to_f64() == 1.0,
            Self::Complex(z) => z.re == 1.0 && z.im == 0.0,
        }
    }

    /// Returns true if NaN (possibly in a component).
    #[must_use]
    pub fn is_nan(&self) -> bool {
        match self {
            Self::Machine(x) => x.is_nan(),
            Self::Rational(_) | Self::Decimal(_) => false,
            Self::Complex(z) => z.re.is_nan() || z.im.is_nan(),
        }
    }

    /// Returns true for finite values.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Machine(x) => x.is_finite(),
            Self::Rational(_) | Self::Decimal(_) => true,
            Self::Complex(z) => z.re.is_finite() && z.im.is_finite(),
        }
    }

    /// Returns true if the imaginary part is exactly zero.
    #[must_use]
    pub fn is_real(&self) -> bool {
        match self {
            Self::Complex(z) => z.is_real(),
            _ => true,
        }
    }

    /// Returns true for mathematically integral values.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        match self {
            Self::Machine(x) => x.is_finite() && x.fract() == 0.0,
            Self::Rational(r) => r.is_integer(),
            Self::Decimal(d) => d.to_f64().fract() == 0.0,
            Self::Complex(z) => z.is_real() && z.re.fract() == 0.0,
        }
    }

    /// Extracts a machine integer when the value is integral and fits.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Rational(r) => r.to_integer().and_then(|n| n.to_i64()),
            Self::Machine(x) if x.is_finite() && x.fract() == 0.0 => {
                #[allow(clippy::cast_possible_truncation)]
                (x.abs() < 9.0e15).then(|| *x as i64)
            }
            _ => None,
        }
    }

    /// The machine image. Complex values report their real component;
    /// callers that care should test [`NumericValue::is_real`] first.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        match self {
            Self::Machine(x) => *x,
            Self::Rational(r) => r.to_f64(),
            Self::Decimal(d) => d.to_f64(),
            Self::Complex(z) => z.re,
        }
    }

    /// The complex image.
    #[must_use]
    pub fn as_complex(&self) -> Complex {
        match self {
            Self::Complex(z) => *z,
            _ => Complex::new(self.to_f64(), 0.0),
        }
    }

    /// The sign of a real value: -1, 0, or 1; `None` when undefined (NaN)
    /// or when the value is not real.
    #[must_use]
    pub fn sign(&self) -> Option<i8> {
        match self {
            Self::Machine(x) => {
                if x.is_nan() {
                    None
                } else if *x == 0.0 {
                    Some(0)
                } else if *x > 0.0 {
                    Some(1)
                } else {
                    Some(-1)
                }
            }
            Self::Rational(r) => Some(r.signum()),
            Self::Decimal(d) => Some(d.signum()),
            Self::Complex(z) => {
                if z.is_real() {
                    Self::Machine(z.re).sign()
                } else {
                    None
                }
            }
        }
    }

    /// Tolerance comparison on the complex images.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        if let (Self::Rational(a), Self::Rational(b)) = (self, other) {
            return a == b;
        }
        self.as_complex().approx_eq(&other.as_complex(), tolerance)
    }

    /// Promotes a finite real value to a decimal at the given precision;
    /// complex, infinite and NaN values are returned unchanged.
    #[must_use]
    pub fn promote_to_decimal(&self, precision: usize) -> Self {
        match self {
            Self::Complex(_) | Self::Decimal(_) => self.clone(),
            Self::Machine(x) if !x.is_finite() => self.clone(),
            _ => Self::Decimal(to_decimal(self, precision)),
        }
    }

    /// Collapses a complex value with zero imaginary part to a real, and
    /// drops a decimal that fits machine precision to a machine double.
    #[must_use]
    pub fn downcast(self) -> Self {
        match self {
            Self::Complex(z) if z.is_real() => Self::Machine(z.re),
            Self::Decimal(d) => Self::Machine(d.to_f64()),
            other => other,
        }
    }

    /// Negation.
    #[must_use]
    pub fn neg(&self) -> Self {
        match self {
            Self::Machine(x) => Self::Machine(-x),
            Self::Rational(r) => Self::Rational(-r.clone()),
            Self::Decimal(d) => Self::Decimal(-d.clone()),
            Self::Complex(z) => Self::Complex(z.neg()),
        }
    }

    /// Sum with pairwise promotion.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Rational(a), Self::Rational(b)) => Self::Rational(a + b),
            (Self::Complex(_), _) | (_, Self::Complex(_)) => {
                Self::Complex(self.as_complex().add(&other.as_complex())).downcast_complex()
            }
            (Self::Decimal(_), _) | (_, Self::Decimal(_)) => {
                let (a, b) = promote_decimal(self, other);
                Self::Decimal(a + b)
            }
            _ => Self::Machine(self.to_f64() + other.to_f64()),
        }
    }

    /// Product with pairwise promotion.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Rational(a), Self::Rational(b)) => Self::Rational(a * b),
            (Self::Complex(_), _) | (_, Self::Complex(_)) => {
                Self::Complex(self.as_complex().mul(&other.as_complex())).downcast_complex()
            }
            (Self::Decimal(_), _) | (_, Self::Decimal(_)) => {
                let (a, b) = promote_decimal(self, other);
                Self::Decimal(a * b)
            }
            _ => Self::Machine(self.to_f64() * other.to_f64()),
        }
    }

    /// Quotient with pairwise promotion; division by exact zero follows
    /// machine semantics.
    #[must_use]
    pub fn div(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Rational(a), Self::Rational(b)) if !b.is_zero() => {
                Self::Rational(a.clone() / b.clone())
            }
            (Self::Complex(_), _) | (_, Self::Complex(_)) => {
                Self::Complex(self.as_complex().div(&other.as_complex())).downcast_complex()
            }
            (Self::Decimal(_), _) | (_, Self::Decimal(_)) if !other.is_zero() => {
                let (a, b) = promote_decimal(self, other);
                Self::Decimal(a / b)
            }
            _ => Self::Machine(self.to_f64() / other.to_f64()),
        }
    }

    /// Power. Exact when the base is rational and the exponent a machine
    /// integer; otherwise through the machine or complex kernels. A
    /// negative real base with fractional exponent goes complex only when
    /// `complex_ok` holds.
    #[must_use]
    pub fn pow(&self, exp: &Self, complex_ok: bool) -> Self {
        if let (Self::Rational(base), Some(e)) = (self, exp.as_i64()) {
            if !base.is_zero() || e >= 0 {
                return Self::Rational(base.pow(e));
            }
        }
        if let (Self::Decimal(base), Some(e)) = (self, exp.as_i64()) {
            return Self::Decimal(base.pow_int(e));
        }
        if !self.is_real() || !exp.is_real() {
            let z = self.as_complex().ln().mul(&exp.as_complex()).exp();
            return Self::Complex(z).downcast_complex();
        }
        let b = self.to_f64();
        let e = exp.to_f64();
        let machine = b.powf(e);
        if machine.is_nan() && b < 0.0 {
            if complex_ok {
                return Self::Complex(Complex::new(b, 0.0).powf(e)).downcast_complex();
            }
            return Self::nan();
        }
        Self::Machine(machine)
    }

    /// Square root. Exact for rationals with perfect-square numerator and
    /// denominator; negative reals go complex when permitted.
    #[must_use]
    pub fn sqrt(&self, complex_ok: bool) -> Self {
        match self {
            Self::Rational(r) if !r.is_negative() => {
                if let Some(exact) = rational_sqrt_exact(r) {
                    return Self::Rational(exact);
                }
                Self::Machine(r.to_f64().sqrt())
            }
            Self::Rational(r) => {
                if !complex_ok {
                    return Self::nan();
                }
                let magnitude = match rational_sqrt_exact(&r.abs()) {
                    Some(exact) => exact.to_f64(),
                    None => r.abs().to_f64().sqrt(),
                };
                Self::Complex(Complex::new(0.0, magnitude))
            }
            Self::Decimal(d) if d.signum() >= 0 => Self::Decimal(d.sqrt()),
            Self::Complex(z) => Self::Complex(z.sqrt()).downcast_complex(),
            _ => {
                let x = self.to_f64();
                if x >= 0.0 || x.is_nan() {
                    Self::Machine(x.sqrt())
                } else if complex_ok {
                    Self::Complex(Complex::new(0.0, (-x).sqrt()))
                } else {
                    Self::nan()
                }
            }
        }
    }

    /// Natural logarithm. Non-positive reals go complex when permitted;
    /// zero maps to `-∞`.
    #[must_use]
    pub fn ln(&self, complex_ok: bool) -> Self {
        if self.is_zero() {
            return Self::neg_infinity();
        }
        match self {
            Self::Decimal(d) if d.signum() > 0 => Self::Decimal(d.ln()),
            Self::Complex(z) => Self::Complex(z.ln()).downcast_complex(),
            _ => {
                let x = self.to_f64();
                if x > 0.0 || x.is_nan() {
                    Self::Machine(x.ln())
                } else if complex_ok {
                    Self::Complex(Complex::new(x, 0.0).ln())
                } else {
                    Self::nan()
                }
            }
        }
    }

    /// Natural exponential.
    #[must_use]
    pub fn exp(&self) -> Self {
        match self {
            Self::Decimal(d) => Self::Decimal(d.exp()),
            Self::Complex(z) => Self::Complex(z.exp()).downcast_complex(),
            _ => Self::Machine(self.to_f64().exp()),
        }
    }

    /// Absolute value (modulus for complex values).
    #[must_use]
    pub fn abs(&self) -> Self {
        match self {
            Self::Machine(x) => Self::Machine(x.abs()),
            Self::Rational(r) => Self::Rational(r.abs()),
            Self::Decimal(d) => {
                if d.signum() < 0 {
                    Self::Decimal(-d.clone())
                } else {
                    self.clone()
                }
            }
            Self::Complex(z) => Self::Machine(z.abs()),
        }
    }

    /// Sine through the machine kernel.
    #[must_use]
    pub fn sin(&self) -> Self {
        Self::Machine(self.to_f64().sin())
    }

    /// Cosine through the machine kernel.
    #[must_use]
    pub fn cos(&self) -> Self {
        Self::Machine(self.to_f64().cos())
    }

    /// Tangent through the machine kernel.
    #[must_use]
    pub fn tan(&self) -> Self {
        Self::Machine(self.to_f64().tan())
    }

    fn downcast_complex(self) -> Self {
        match self {
            Self::Complex(z) if z.is_real() => Self::Machine(z.re),
            other => other,
        }
    }
}

/// Promotes a real pair so both sides are decimals at a shared precision.
fn promote_decimal(a: &NumericValue, b: &NumericValue) -> (Decimal, Decimal) {
    let precision = match (a, b) {
        (NumericValue::Decimal(x), NumericValue::Decimal(y)) => x.precision().max(y.precision()),
        (NumericValue::Decimal(x), _) | (_, NumericValue::Decimal(x)) => x.precision(),
        _ => crate::decimal::MACHINE_DIGITS,
    };
    (to_decimal(a, precision), to_decimal(b, precision))
}

fn to_decimal(v: &NumericValue, precision: usize) -> Decimal {
    match v {
        NumericValue::Decimal(d) => d.clone(),
        NumericValue::Rational(r) => Decimal::from_rational(r, precision),
        _ => Decimal::from_f64(v.to_f64(), precision),
    }
}

fn rational_sqrt_exact(r: &Rational) -> Option<Rational> {
    let num = r.numerator().sqrt_exact()?;
    let den = r.denominator().sqrt_exact()?;
    Some(Rational::new(num, den))
}

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Machine(x) => write!(f, "{x}"),
            Self::Rational(r) => write!(f, "{r}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Complex(z) => write!(f, "{z}"),
        }
    }
}

impl fmt::Debug for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

// Machine doubles need normalised bits for Eq/Hash (the derive on f64 is
// not an equivalence because of NaN).
#[derive(PartialEq, Eq, Hash)]
struct MachineKey(u64);

impl NumericValue {
    fn machine_key(x: f64) -> MachineKey {
        MachineKey(canonical_bits(x))
    }
}

impl PartialEq for NumericValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Machine(a), Self::Machine(b)) => {
                Self::machine_key(*a) == Self::machine_key(*b)
            }
            (Self::Rational(a), Self::Rational(b)) => a == b,
            (Self::Decimal(a), Self::Decimal(b)) => a == b,
            (Self::Complex(a), Self::Complex(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for NumericValue {}

impl Hash for NumericValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Machine(x) => Self::machine_key(*x).hash(state),
            Self::Rational(r) => r.hash(state),
            Self::Decimal(d) => d.hash(state),
            Self::Complex(z) => z.hash(state),
        }
    }
}
