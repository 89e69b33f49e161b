//! Numeric evaluation down to kernel values.
//!
//! `numeric_value` reduces a canonical expression to a [`NumericValue`]
//! when every leaf is numerically known: literals, the named constants,
//! bound symbols, and the numeric heads. Representation follows the
//! engine configuration: exact rationals survive exact operations,
//! inexact operations promote to decimals when the precision asks for
//! them, and negative-real roots and logarithms go complex only when the
//! mode permits.

use kanon_core::{heads, ExprHandle, ExprNode, Head, SymbolId};
use kanon_number::{Decimal, NumericValue};

use crate::engine::Engine;

/// 100 decimal digits of π.
const PI_DIGITS: &str = "3.1415926535897932384626433832795028841971693993751058209749445923078164062862089986280348253421170679";

/// 100 decimal digits of e.
const E_DIGITS: &str = "2.7182818284590452353602874713526624977572470936999595749669676277240766303535475945713821785251664274";

impl Engine {
    /// The numeric value of an expression, or `None` when it is not
    /// numerically known. Memoised for pure expressions; the memo is
    /// flushed on configuration change.
    pub fn numeric_value(&mut self, expr: ExprHandle) -> Option<NumericValue> {
        let expr = self.canonical(expr);
        if let Some(cached) = self.numeric_memo.get(&expr) {
            return Some(cached.clone());
        }
        let value = self.numeric_value_rec(expr)?;
        if self.is_pure(expr) {
            self.numeric_memo.insert(expr, value.clone());
        }
        Some(value)
    }

    fn numeric_value_rec(&mut self, expr: ExprHandle) -> Option<NumericValue> {
        if let Some(value) = self.as_numeric_literal(expr) {
            return Some(value);
        }
        match self.node(expr).clone() {
            ExprNode::Symbol(id) => self.constant_value(id),
            ExprNode::Function {
                head: Head::Sym(sym),
                ops,
            } => self.numeric_apply(sym, &ops),
            _ => None,
        }
    }

    fn constant_value(&mut self, id: SymbolId) -> Option<NumericValue> {
        match id {
            heads::PI => Some(self.constant_digits(PI_DIGITS, std::f64::consts::PI)),
            heads::EXPONENTIAL_E => {
                Some(self.constant_digits(E_DIGITS, std::f64::consts::E))
            }
            _ => {
                let value = self.symbol_def(id)?.value?;
                self.numeric_value(value)
            }
        }
    }

    fn constant_digits(&self, digits: &str, machine: f64) -> NumericValue {
        if self.config.prefers_bignum() {
            match Decimal::parse(digits, self.config.precision()) {
                Some(d) => NumericValue::Decimal(d),
                None => NumericValue::Machine(machine),
            }
        } else {
            NumericValue::Machine(machine)
        }
    }

    fn numeric_apply(&mut self, sym: SymbolId, ops: &[ExprHandle]) -> Option<NumericValue> {
        let mut values = Vec::with_capacity(ops.len());
        for &op in ops {
            values.push(self.numeric_value(op)?);
        }
        let complex_ok = self.config.allows_complex();
        Some(match (sym, values.as_slice()) {
            (heads::ADD, _) => values
                .iter()
                .skip(1)
                .fold(values[0].clone(), |acc, v| acc.add(v)),
            (heads::MULTIPLY, _) => values
                .iter()
                .skip(1)
                .fold(values[0].clone(), |acc, v| acc.mul(v)),
            (heads::NEGATE, [v]) => v.neg(),
            (heads::DIVIDE, [a, b]) => a.div(b),
            (heads::POWER, [base, exp]) => {
                if exp.as_i64().is_some() {
                    base.pow(exp, complex_ok)
                } else {
                    self.inexact(base).pow(exp, complex_ok)
                }
            }
            (heads::SQRT, [v]) => {
                let exact = v.clone().sqrt(complex_ok);
                match (&exact, v) {
                    // A machine-approximated root of an exact value is
                    // recomputed at the working precision instead.
                    (NumericValue::Machine(_), NumericValue::Rational(_)) => {
                        self.inexact(v).sqrt(complex_ok)
                    }
                    _ => exact,
                }
            }
            (heads::EXP, [v]) => self.inexact(v).exp(),
            (heads::LN, [v]) => self.inexact(v).ln(complex_ok),
            (heads::SIN, [v]) => v.sin(),
            (heads::COS, [v]) => v.cos(),
            (heads::TAN, [v]) => v.tan(),
            (heads::ABS, [v]) => v.abs(),
            _ => return None,
        })
    }

    /// Promotes an exact operand ahead of an inexact operation when the
    /// configuration prefers decimals.
    fn inexact(&self, value: &NumericValue) -> NumericValue {
        if self.config.prefers_bignum() {
            value.promote_to_decimal(self.config.precision())
        } else {
            value.clone()
        }
    }
}
