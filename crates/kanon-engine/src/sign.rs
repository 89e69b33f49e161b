//! Sign inference.
//!
//! `sgn` answers "what is the sign of this expression's value" without
//! full numeric evaluation: literal signs, constant symbols, recorded
//! assumptions, per-head handlers, and a numeric fallback, in that order.

use kanon_core::{heads, ExprHandle, ExprNode};
use kanon_domain::Domain;

use crate::engine::Engine;

/// The inferred sign of an expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sign {
    /// Provably negative.
    Negative,
    /// Provably zero.
    Zero,
    /// Provably positive.
    Positive,
    /// Real, but the sign could not be determined (or NaN).
    Unknown,
    /// Known to lie off the real line.
    NonReal,
}

impl Sign {
    /// The sign of the negation.
    #[must_use]
    pub fn negate(self) -> Sign {
        match self {
            Sign::Negative => Sign::Positive,
            Sign::Positive => Sign::Negative,
            other => other,
        }
    }

    /// The sign of a product of two values with these signs.
    #[must_use]
    pub fn product(self, other: Sign) -> Sign {
        use Sign::{Negative, NonReal, Positive, Unknown, Zero};
        match (self, other) {
            (NonReal, _) | (_, NonReal) => NonReal,
            (Zero, _) | (_, Zero) => Zero,
            (Unknown, _) | (_, Unknown) => Unknown,
            (Positive, Positive) | (Negative, Negative) => Positive,
            _ => Negative,
        }
    }

    /// Conversion from a kernel sign.
    #[must_use]
    pub fn from_i8(sign: i8) -> Sign {
        match sign {
            0 => Sign::Zero,
            s if s > 0 => Sign::Positive,
            _ => Sign::Negative,
        }
    }
}

impl Engine {
    /// Infers the sign of an expression's value.
    pub fn sgn(&mut self, expr: ExprHandle) -> Sign {
        let expr = self.canonical(expr);
        if let Some(value) = self.as_numeric_literal(expr) {
            if !value.is_real() {
                return Sign::NonReal;
            }
            return value.sign().map_or(Sign::Unknown, Sign::from_i8);
        }
        match self.node(expr).clone() {
            ExprNode::Symbol(id) => self.symbol_sign(id),
            ExprNode::Function { head, ops } => {
                if let kanon_core::Head::Sym(sym) = head {
                    if let Some(handler) =
                        self.function_def(sym).and_then(|def| def.handlers.sgn)
                    {
                        if let Some(sign) = handler(self, &ops) {
                            return sign;
                        }
                    }
                }
                self.numeric_sign(expr)
            }
            _ => Sign::Unknown,
        }
    }

    fn symbol_sign(&mut self, id: kanon_core::SymbolId) -> Sign {
        match id {
            heads::PI | heads::EXPONENTIAL_E => return Sign::Positive,
            heads::IMAGINARY_UNIT => return Sign::NonReal,
            _ => {}
        }
        if let Some(sign) = self.assumed_sign(id) {
            return sign;
        }
        if let Some(def) = self.symbol_def(id) {
            if def.domain == Domain::PositiveIntegers {
                return Sign::Positive;
            }
            if let Some(value) = def.value {
                return self.sgn(value);
            }
        }
        Sign::Unknown
    }

    fn numeric_sign(&mut self, expr: ExprHandle) -> Sign {
        match self.numeric_value(expr) {
            Some(value) if !value.is_real() => Sign::NonReal,
            Some(value) => value.sign().map_or(Sign::Unknown, Sign::from_i8),
            None => Sign::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product() {
        assert_eq!(Sign::Negative.product(Sign::Negative), Sign::Positive);
        assert_eq!(Sign::Negative.product(Sign::Positive), Sign::Negative);
        assert_eq!(Sign::Zero.product(Sign::NonReal), Sign::NonReal);
        assert_eq!(Sign::Zero.product(Sign::Unknown), Sign::Zero);
    }

    #[test]
    fn test_negate() {
        assert_eq!(Sign::Negative.negate(), Sign::Positive);
        assert_eq!(Sign::Zero.negate(), Sign::Zero);
        assert_eq!(Sign::NonReal.negate(), Sign::NonReal);
    }
}
