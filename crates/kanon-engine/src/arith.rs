//! The arithmetic builder: canonicalisation short paths for the numeric
//! heads.
//!
//! `Add`, `Multiply`, `Negate`, `Subtract`, `Divide`, `Power`, `Square`,
//! `Sqrt`, `Exp` and `Ln` bypass the general canonicalisation pipeline
//! and come here. The builder performs numeric reduction over literal
//! operands (exact while it can), recognises complex literals (`a + b·i`),
//! preserves rationals (`Divide` of integer literals), and applies the
//! `Power` rule family. Canonicalisation never *approximates* an exact
//! value: `Sqrt(2)` stays symbolic, while `Sqrt(2.0)` folds.

use smallvec::SmallVec;

use kanon_core::{heads, ExprHandle, ExprNode};
use kanon_number::NumericValue;

use crate::engine::Engine;

impl Engine {
    /// Reads a node as a numeric literal. The constant symbols
    /// `ImaginaryUnit`, `PositiveInfinity`, `NegativeInfinity` and
    /// `NotANumber` count as literals here so that folding closes over
    /// them.
    #[must_use]
    pub fn as_numeric_literal(&self, expr: ExprHandle) -> Option<NumericValue> {
        match self.node(expr) {
            ExprNode::Number(value) => Some(value.clone()),
            ExprNode::Symbol(heads::IMAGINARY_UNIT) => {
                Some(NumericValue::Complex(kanon_number::Complex::i()))
            }
            ExprNode::Symbol(heads::POSITIVE_INFINITY) => Some(NumericValue::pos_infinity()),
            ExprNode::Symbol(heads::NEGATIVE_INFINITY) => Some(NumericValue::neg_infinity()),
            ExprNode::Symbol(heads::NOT_A_NUMBER) => Some(NumericValue::nan()),
            _ => None,
        }
    }

    /// Splices `Sequence` operands in place of themselves.
    pub(crate) fn splice_sequences(
        &self,
        ops: &[ExprHandle],
    ) -> SmallVec<[ExprHandle; 4]> {
        let mut out: SmallVec<[ExprHandle; 4]> = SmallVec::new();
        for &op in ops {
            if self.is_function(op, heads::SEQUENCE) {
                let (_, inner) = self.function_parts(op).expect("sequence node");
                out.extend(inner);
            } else {
                out.push(op);
            }
        }
        out
    }

    /// Canonical n-ary sum over canonical operands.
    pub(crate) fn canonical_add(&mut self, ops: &[ExprHandle]) -> ExprHandle {
        let mut terms: Vec<ExprHandle> = Vec::with_capacity(ops.len());
        for &op in &self.splice_sequences(ops) {
            if self.is_function(op, heads::ADD) {
                let (_, inner) = self.function_parts(op).expect("add node");
                terms.extend(inner);
            } else {
                terms.push(op);
            }
        }

        let mut folded = NumericValue::zero();
        let mut symbolic: Vec<ExprHandle> = Vec::with_capacity(terms.len());
        for term in terms {
            match self.as_numeric_literal(term) {
                Some(value) => folded = folded.add(&value),
                None => symbolic.push(term),
            }
        }
        if folded.is_nan() {
            return self.consts.nan;
        }
        if !folded.is_zero() || symbolic.is_empty() {
            let literal = self.num(folded);
            symbolic.push(literal);
        }

        self.sort_operands(&mut symbolic, false);
        match symbolic.len() {
            1 if !self.is_indexable(symbolic[0]) => symbolic[0],
            _ => self.function(heads::ADD, &symbolic),
        }
    }

    /// Canonical n-ary product over canonical operands.
    pub(crate) fn canonical_mul(&mut self, ops: &[ExprHandle]) -> ExprHandle {
        let mut factors: Vec<ExprHandle> = Vec::with_capacity(ops.len());
        for &op in &self.splice_sequences(ops) {
            if self.is_function(op, heads::MULTIPLY) {
                let (_, inner) = self.function_parts(op).expect("multiply node");
                factors.extend(inner);
            } else {
                factors.push(op);
            }
        }

        let mut folded = NumericValue::one();
        let mut symbolic: Vec<ExprHandle> = Vec::with_capacity(factors.len());
        for factor in factors {
            match self.as_numeric_literal(factor) {
                Some(value) => folded = folded.mul(&value),
                None => symbolic.push(factor),
            }
        }
        if folded.is_nan() {
            return self.consts.nan;
        }
        if folded.is_zero() {
            return self.consts.zero;
        }
        if !folded.is_one() || symbolic.is_empty() {
            let literal = self.num(folded);
            symbolic.push(literal);
        }

        self.sort_operands(&mut symbolic, true);
        match symbolic.len() {
            1 if !self.is_indexable(symbolic[0]) => symbolic[0],
            _ => self.function(heads::MULTIPLY, &symbolic),
        }
    }

    /// Canonical negation over a canonical operand.
    pub(crate) fn canonical_negate(&mut self, op: ExprHandle) -> ExprHandle {
        if let Some(value) = self.as_numeric_literal(op) {
            return self.num(value.neg());
        }
        // Negate is an involution.
        if self.is_function(op, heads::NEGATE) {
            let (_, inner) = self.function_parts(op).expect("negate node");
            if inner.len() == 1 {
                return inner[0];
            }
        }
        self.function(heads::NEGATE, &[op])
    }

    /// Canonical difference, expressed as `Add(a, Negate(b))`.
    pub(crate) fn canonical_subtract(&mut self, a: ExprHandle, b: ExprHandle) -> ExprHandle {
        let neg_b = self.canonical_negate(b);
        self.canonical_add(&[a, neg_b])
    }

    /// Canonical quotient over canonical operands. Integer quotients stay
    /// exact rationals.
    pub(crate) fn canonical_divide(&mut self, num: ExprHandle, den: ExprHandle) -> ExprHandle {
        let num_value = self.as_numeric_literal(num);
        let den_value = self.as_numeric_literal(den);
        if let (Some(a), Some(b)) = (&num_value, &den_value) {
            return self.num(a.div(b));
        }
        if den_value.as_ref().is_some_and(NumericValue::is_one) {
            return num;
        }
        if num_value.as_ref().is_some_and(NumericValue::is_zero) {
            return self.consts.zero;
        }
        self.function(heads::DIVIDE, &[num, den])
    }

    /// Canonical power over canonical operands.
    pub(crate) fn canonical_power(&mut self, base: ExprHandle, exp: ExprHandle) -> ExprHandle {
        let base_value = self.as_numeric_literal(base);
        let exp_value = self.as_numeric_literal(exp);

        if let Some(e) = &exp_value {
            if e.is_zero() {
                return self.consts.one;
            }
            if e.is_one() {
                return base;
            }
            if !e.is_finite() && !e.is_nan() {
                if let Some(b) = &base_value {
                    return self.power_at_infinity(b, e.sign() == Some(1));
                }
            }
            // x^(1/2) is a square root.
            if *e == NumericValue::rational(1, 2) {
                return self.canonical_sqrt(base);
            }
        }
        if let Some(b) = &base_value {
            if b.is_one() {
                return self.consts.one;
            }
            if b.is_zero() {
                if let Some(sign) = exp_value.as_ref().and_then(NumericValue::sign) {
                    return match sign {
                        1 => self.consts.zero,
                        -1 => self.consts.pos_infinity,
                        _ => self.consts.one,
                    };
                }
            }
        }

        // Exact or machine numeric folding, never approximating an exact
        // base at a fractional exponent.
        if let (Some(b), Some(e)) = (&base_value, &exp_value) {
            let exact_exp = e.as_i64().is_some();
            let inexact_base = matches!(
                b,
                NumericValue::Machine(_) | NumericValue::Decimal(_) | NumericValue::Complex(_)
            );
            if exact_exp || inexact_base {
                let complex_ok = self.config.allows_complex();
                return self.num(b.pow(e, complex_ok));
            }
        }

        // (x^a)^b with integer a, b and real x collapses to x^(a·b).
        if let Some(n) = exp_value.as_ref().and_then(NumericValue::as_i64) {
            if let Some((inner_base, inner_exp)) = self.integer_power_parts(base) {
                let real_base = self
                    .domain_of(inner_base)
                    .is_compatible(kanon_domain::Domain::RealNumbers);
                if real_base {
                    let combined = self.int(inner_exp.saturating_mul(n));
                    return self.canonical_power(inner_base, combined);
                }
            }
            // Integer exponents distribute over products.
            if self.is_function(base, heads::MULTIPLY) {
                let (_, factors) = self.function_parts(base).expect("multiply node");
                let powered: Vec<ExprHandle> = factors
                    .iter()
                    .map(|&f| self.canonical_power(f, exp))
                    .collect();
                return self.canonical_mul(&powered);
            }
        }

        self.function(heads::POWER, &[base, exp])
    }

    fn integer_power_parts(&self, expr: ExprHandle) -> Option<(ExprHandle, i64)> {
        if !self.is_function(expr, heads::POWER) {
            return None;
        }
        let (_, ops) = self.function_parts(expr)?;
        let exp = self.node(*ops.get(1)?).as_number()?.as_i64()?;
        Some((ops[0], exp))
    }

    fn power_at_infinity(&mut self, base: &NumericValue, positive: bool) -> ExprHandle {
        let magnitude = base.abs().to_f64();
        if !base.is_real() || base.sign() == Some(-1) {
            return self.consts.nan;
        }
        let grows = magnitude > 1.0;
        let shrinks = magnitude < 1.0;
        match (positive, grows, shrinks) {
            (_, false, false) => self.consts.one,
            (true, true, _) | (false, _, true) => self.consts.pos_infinity,
            _ => self.consts.zero,
        }
    }

    /// Canonical square root over a canonical operand.
    pub(crate) fn canonical_sqrt(&mut self, op: ExprHandle) -> ExprHandle {
        if let Some(value) = self.as_numeric_literal(op) {
            match &value {
                NumericValue::Rational(_) => {
                    // Exact only: a non-perfect-square rational stays
                    // symbolic.
                    let complex_ok = self.config.allows_complex();
                    let result = value.sqrt(complex_ok);
                    let exact = match &result {
                        NumericValue::Rational(_) => true,
                        NumericValue::Complex(z) => z.im.fract() == 0.0,
                        _ => false,
                    };
                    if exact {
                        return self.num(result);
                    }
                }
                _ => {
                    let complex_ok = self.config.allows_complex();
                    return self.num(value.sqrt(complex_ok));
                }
            }
        }
        self.function(heads::SQRT, &[op])
    }

    /// Canonical natural exponential over a canonical operand.
    pub(crate) fn canonical_exp(&mut self, op: ExprHandle) -> ExprHandle {
        if let Some(value) = self.as_numeric_literal(op) {
            if value.is_zero() {
                return self.consts.one;
            }
            if value.is_one() {
                return self.consts.e;
            }
        }
        self.function(heads::EXP, &[op])
    }

    /// Canonical natural logarithm over a canonical operand.
    pub(crate) fn canonical_ln(&mut self, op: ExprHandle) -> ExprHandle {
        if let Some(value) = self.as_numeric_literal(op) {
            if value.is_one() {
                return self.consts.zero;
            }
            if value.is_zero() {
                return self.consts.neg_infinity;
            }
        }
        if op == self.consts.e {
            return self.consts.one;
        }
        self.function(heads::LN, &[op])
    }

    /// True for expressions with a known finite length and element
    /// access.
    #[must_use]
    pub fn is_indexable(&self, expr: ExprHandle) -> bool {
        self.collection_len(expr).is_some()
    }

    /// The length of an indexable collection, through the registered
    /// `size` handler or the tensor shape.
    #[must_use]
    pub fn collection_len(&self, expr: ExprHandle) -> Option<usize> {
        if let ExprNode::Tensor { shape, .. } = self.node(expr) {
            return shape.first().copied();
        }
        let (head, ops) = self.function_parts(expr)?;
        let kanon_core::Head::Sym(sym) = head else {
            return None;
        };
        let handler = self.function_def(sym)?.handlers.size?;
        handler(self, &ops)
    }

    /// Element `index` of an indexable collection.
    pub fn collection_at(&mut self, expr: ExprHandle, index: usize) -> Option<ExprHandle> {
        match self.node(expr).clone() {
            ExprNode::Tensor {
                dtype,
                shape,
                data,
            } => {
                if shape.len() <= 1 {
                    return data.get(index).copied();
                }
                let stride = data.len() / shape[0];
                let row = data.get(index * stride..(index + 1) * stride)?.to_vec();
                Some(self.arena.tensor(dtype, &shape[1..], row))
            }
            ExprNode::Function { head, ops } => match head {
                kanon_core::Head::Sym(heads::LIST | heads::SET | heads::SEQUENCE) => {
                    ops.get(index).copied()
                }
                kanon_core::Head::Sym(heads::RANGE) => self.range_at(&ops, index),
                _ => None,
            },
            _ => None,
        }
    }

    fn range_at(&mut self, ops: &[ExprHandle], index: usize) -> Option<ExprHandle> {
        let first = self.node(*ops.first()?).as_number()?.clone();
        let step = match ops.get(2) {
            Some(&s) => self.node(s).as_number()?.clone(),
            None => NumericValue::one(),
        };
        #[allow(clippy::cast_possible_wrap)]
        let offset = step.mul(&NumericValue::int(index as i64));
        Some(self.num(first.add(&offset)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_folds_literals() {
        let mut eng = Engine::new();
        let terms = [eng.int(1), eng.int(2), eng.int(3)];
        let sum = eng.canonical_add(&terms);
        assert_eq!(eng.repr(sum), "6");
    }

    #[test]
    fn test_add_drops_zero_and_unwraps() {
        let mut eng = Engine::new();
        let x = eng.symbol("x");
        let zero = eng.int(0);
        let sum = eng.canonical_add(&[zero, x]);
        assert!(eng.is_same(sum, x));
    }

    #[test]
    fn test_complex_recognition() {
        let mut eng = Engine::new();
        let three = eng.int(3);
        let i = eng.sym(heads::IMAGINARY_UNIT);
        let bi = eng.canonical_mul(&[three, i]);
        let two = eng.int(2);
        let z = eng.canonical_add(&[two, bi]);
        assert_eq!(eng.repr(z), "(2+3i)");
    }

    #[test]
    fn test_mul_annihilates_on_zero() {
        let mut eng = Engine::new();
        let x = eng.symbol("x");
        let zero = eng.int(0);
        let product = eng.canonical_mul(&[x, zero]);
        assert_eq!(eng.repr(product), "0");
    }

    #[test]
    fn test_divide_preserves_rationals() {
        let mut eng = Engine::new();
        let two = eng.int(2);
        let three = eng.int(3);
        let q = eng.canonical_divide(two, three);
        assert_eq!(eng.repr(q), "2/3");
    }

    #[test]
    fn test_power_rules() {
        let mut eng = Engine::new();
        let x = eng.symbol("x");
        let zero = eng.int(0);
        let one = eng.int(1);
        assert_eq!(eng.canonical_power(x, zero), eng.consts.one);
        assert_eq!(eng.canonical_power(x, one), x);
        assert_eq!(eng.canonical_power(one, x), eng.consts.one);
    }

    #[test]
    fn test_power_half_is_sqrt() {
        let mut eng = Engine::new();
        let four = eng.int(4);
        let half = eng.rational(1, 2);
        let root = eng.canonical_power(four, half);
        assert_eq!(eng.repr(root), "2");

        let x = eng.symbol("x");
        let sym_root = eng.canonical_power(x, half);
        assert_eq!(eng.repr(sym_root), "Sqrt(x)");
    }

    #[test]
    fn test_sqrt_stays_exact() {
        let mut eng = Engine::new();
        let two = eng.int(2);
        let root = eng.canonical_sqrt(two);
        assert_eq!(eng.repr(root), "Sqrt(2)");

        let neg_one = eng.int(-1);
        let i = eng.canonical_sqrt(neg_one);
        assert_eq!(eng.repr(i), "(0+1i)");
    }

    #[test]
    fn test_nested_integer_powers_collapse() {
        let mut eng = Engine::new();
        let two = eng.int(2);
        let three = eng.int(3);
        let base = eng.int(5);
        let inner = eng.canonical_power(base, two);
        let outer = eng.canonical_power(inner, three);
        assert_eq!(eng.repr(outer), "15625");

        // Symbolic real base
        let id = eng
            .declare_symbol("r", crate::defs::SymbolDef::in_domain(kanon_domain::Domain::RealNumbers))
            .unwrap();
        let r = eng.sym(id);
        let r2 = eng.canonical_power(r, two);
        let r6 = eng.canonical_power(r2, three);
        assert_eq!(eng.repr(r6), "Power(r, 6)");
    }

    #[test]
    fn test_exp_ln_special_values() {
        let mut eng = Engine::new();
        let zero = eng.int(0);
        let one = eng.int(1);
        assert_eq!(eng.canonical_exp(zero), eng.consts.one);
        assert_eq!(eng.canonical_exp(one), eng.consts.e);
        assert_eq!(eng.canonical_ln(one), eng.consts.zero);
        let e = eng.consts.e;
        assert_eq!(eng.canonical_ln(e), eng.consts.one);
    }
}
