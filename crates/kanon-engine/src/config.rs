//! Engine configuration and resource limits.

use std::time::Duration;

use kanon_number::decimal::MACHINE_DIGITS;

/// How numeric approximation represents its results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum NumericMode {
    /// Pick the representation the computation calls for: decimals when
    /// the precision demands them, complex values when a real operation
    /// leaves the real line.
    #[default]
    Auto,
    /// Machine doubles only.
    Machine,
    /// Arbitrary-precision decimals, no complex values.
    Bignum,
    /// Machine precision, complex values permitted.
    Complex,
}

/// Per-scope resource limits. Copied from parent to child on scope push.
#[derive(Clone, Copy, Debug)]
pub struct Limits {
    /// Bound on rule-engine and series fixed-point iterations.
    pub iteration_limit: usize,
    /// Bound on scope-stack depth.
    pub recursion_limit: usize,
    /// Wall-clock budget for a top-level operation.
    pub time_limit: Option<Duration>,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            iteration_limit: 1024,
            recursion_limit: 256,
            time_limit: Some(Duration::from_secs(2)),
        }
    }
}

/// Engine construction parameters.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Numeric representation policy.
    pub numeric_mode: NumericMode,
    /// Working precision in decimal digits, clamped below at machine
    /// precision.
    pub precision: usize,
    /// Equality threshold for numeric comparison and pattern matching.
    pub tolerance: f64,
    /// Acceptance ratio of the rule engine: a rewrite is kept when
    /// `cost(new) <= cost_bias * cost(old)`.
    pub cost_bias: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            numeric_mode: NumericMode::Auto,
            precision: 100,
            tolerance: 1e-10,
            cost_bias: 1.2,
        }
    }
}

impl EngineConfig {
    /// Effective precision, never below machine precision.
    #[must_use]
    pub fn precision(&self) -> usize {
        self.precision.max(MACHINE_DIGITS)
    }

    /// True if results may leave the real line.
    #[must_use]
    pub fn allows_complex(&self) -> bool {
        matches!(self.numeric_mode, NumericMode::Auto | NumericMode::Complex)
    }

    /// True if inexact results should be arbitrary-precision decimals.
    #[must_use]
    pub fn prefers_bignum(&self) -> bool {
        match self.numeric_mode {
            NumericMode::Bignum => true,
            NumericMode::Auto => self.precision() > MACHINE_DIGITS,
            NumericMode::Machine | NumericMode::Complex => false,
        }
    }
}
