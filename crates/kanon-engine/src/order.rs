//! The canonical total order on expressions.
//!
//! Commutative operands sort under this order: degree-major in
//! multiplicative contexts, then literal class (numbers, then symbols,
//! then compounds), then value/name/recursive comparison, with the arena
//! index as the final tie-break. Hash-consing makes the index stable, so
//! the order is total, deterministic and acyclic.

use std::cmp::Ordering;

use kanon_core::{heads, ExprHandle, ExprNode, Head};

use crate::engine::Engine;

/// Polynomial total degree in the union of free variables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Degree {
    /// A polynomial dependence of this total degree (0 when no free
    /// variable occurs).
    Finite(u64),
    /// Non-polynomial dependence.
    Infinite,
}

impl Degree {
    fn add(self, other: Degree) -> Degree {
        match (self, other) {
            (Degree::Finite(a), Degree::Finite(b)) => Degree::Finite(a.saturating_add(b)),
            _ => Degree::Infinite,
        }
    }

    fn scale(self, factor: u64) -> Degree {
        match self {
            Degree::Finite(d) => Degree::Finite(d.saturating_mul(factor)),
            Degree::Infinite => Degree::Infinite,
        }
    }

    fn is_constant(self) -> bool {
        self == Degree::Finite(0)
    }
}

impl Engine {
    /// The polynomial total degree of an expression, treating every
    /// non-constant symbol as a variable.
    #[must_use]
    pub fn degree(&self, expr: ExprHandle) -> Degree {
        match self.node(expr) {
            ExprNode::Number(_)
            | ExprNode::Str(_)
            | ExprNode::Domain(_)
            | ExprNode::Error { .. } => Degree::Finite(0),
            ExprNode::Symbol(id) => self.symbol_degree(*id),
            ExprNode::Tensor { data, .. } => {
                if data.iter().all(|&h| self.degree(h).is_constant()) {
                    Degree::Finite(0)
                } else {
                    Degree::Infinite
                }
            }
            ExprNode::Function { head, ops } => {
                let ops = ops.clone();
                match head {
                    Head::Sym(heads::ADD) => ops
                        .iter()
                        .map(|&op| self.degree(op))
                        .max()
                        .unwrap_or(Degree::Finite(0)),
                    Head::Sym(heads::MULTIPLY) => ops
                        .iter()
                        .map(|&op| self.degree(op))
                        .fold(Degree::Finite(0), Degree::add),
                    Head::Sym(heads::NEGATE) => {
                        ops.first().map_or(Degree::Finite(0), |&op| self.degree(op))
                    }
                    Head::Sym(heads::POWER) => self.power_degree(&ops),
                    Head::Sym(heads::DIVIDE) => {
                        let num = ops.first().map_or(Degree::Finite(0), |&n| self.degree(n));
                        let den = ops.get(1).map_or(Degree::Finite(0), |&d| self.degree(d));
                        if den.is_constant() {
                            num
                        } else {
                            Degree::Infinite
                        }
                    }
                    _ => {
                        if ops.iter().all(|&op| self.degree(op).is_constant()) {
                            Degree::Finite(0)
                        } else {
                            Degree::Infinite
                        }
                    }
                }
            }
        }
    }

    fn symbol_degree(&self, id: kanon_core::SymbolId) -> Degree {
        let constant = matches!(
            id,
            heads::PI
                | heads::EXPONENTIAL_E
                | heads::IMAGINARY_UNIT
                | heads::POSITIVE_INFINITY
                | heads::NEGATIVE_INFINITY
                | heads::NOT_A_NUMBER
                | heads::TRUE
                | heads::FALSE
        ) || self
            .symbol_def(id)
            .is_some_and(|def| def.constant);
        if constant {
            Degree::Finite(0)
        } else {
            Degree::Finite(1)
        }
    }

    fn power_degree(&self, ops: &[ExprHandle]) -> Degree {
        let base = ops.first().map_or(Degree::Finite(0), |&b| self.degree(b));
        let exp_literal = ops
            .get(1)
            .and_then(|&e| self.node(e).as_number())
            .and_then(kanon_number::NumericValue::as_i64);
        match exp_literal {
            Some(n) if n >= 0 => {
                #[allow(clippy::cast_sign_loss)]
                base.scale(n as u64)
            }
            Some(_) => {
                if base.is_constant() {
                    Degree::Finite(0)
                } else {
                    Degree::Infinite
                }
            }
            None => {
                let exp = ops.get(1).map_or(Degree::Finite(0), |&e| self.degree(e));
                if base.is_constant() && exp.is_constant() {
                    Degree::Finite(0)
                } else {
                    Degree::Infinite
                }
            }
        }
    }

    /// Compares two canonical expressions. `multiplicative` selects the
    /// degree-major variant used for product operands.
    #[must_use]
    pub fn canonical_cmp(
        &self,
        a: ExprHandle,
        b: ExprHandle,
        multiplicative: bool,
    ) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        if multiplicative {
            let by_degree = self.degree(a).cmp(&self.degree(b));
            if by_degree != Ordering::Equal {
                return by_degree;
            }
        }
        let rank = class_rank(self.node(a)).cmp(&class_rank(self.node(b)));
        if rank != Ordering::Equal {
            return rank;
        }
        let structural = self.same_class_cmp(a, b);
        if structural != Ordering::Equal {
            return structural;
        }
        a.index().cmp(&b.index())
    }

    fn same_class_cmp(&self, a: ExprHandle, b: ExprHandle) -> Ordering {
        match (self.node(a), self.node(b)) {
            (ExprNode::Number(x), ExprNode::Number(y)) => x
                .to_f64()
                .partial_cmp(&y.to_f64())
                .unwrap_or(Ordering::Equal),
            (ExprNode::Symbol(x), ExprNode::Symbol(y)) => self
                .arena()
                .symbol_name(*x)
                .cmp(self.arena().symbol_name(*y)),
            (ExprNode::Str(x), ExprNode::Str(y)) => {
                self.arena().string(*x).cmp(self.arena().string(*y))
            }
            (ExprNode::Domain(x), ExprNode::Domain(y)) => x.name().cmp(y.name()),
            (
                ExprNode::Function { head: ha, ops: xa },
                ExprNode::Function { head: hb, ops: xb },
            ) => {
                let name_a = self.head_label(*ha);
                let name_b = self.head_label(*hb);
                name_a
                    .cmp(name_b)
                    .then_with(|| {
                        for (&oa, &ob) in xa.iter().zip(xb.iter()) {
                            let c = self.canonical_cmp(oa, ob, false);
                            if c != Ordering::Equal {
                                return c;
                            }
                        }
                        xa.len().cmp(&xb.len())
                    })
            }
            _ => Ordering::Equal,
        }
    }

    fn head_label(&self, head: Head) -> &str {
        match head {
            Head::Sym(s) => self.arena().symbol_name(s),
            Head::Expr(_) => "",
        }
    }

    /// Sorts commutative operands into canonical order.
    pub fn sort_operands(&self, ops: &mut [ExprHandle], multiplicative: bool) {
        ops.sort_by(|&a, &b| self.canonical_cmp(a, b, multiplicative));
    }
}

fn class_rank(node: &ExprNode) -> u8 {
    match node {
        ExprNode::Number(_) => 0,
        ExprNode::Symbol(_) => 1,
        ExprNode::Str(_) => 2,
        ExprNode::Domain(_) => 3,
        ExprNode::Tensor { .. } => 4,
        ExprNode::Function { .. } => 5,
        ExprNode::Error { .. } => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degree_of_monomials() {
        let mut eng = Engine::new();
        let x = eng.symbol("x");
        let five = eng.int(5);
        let two = eng.int(2);
        assert_eq!(eng.degree(five), Degree::Finite(0));
        assert_eq!(eng.degree(x), Degree::Finite(1));
        let sq = eng.pow(x, two);
        assert_eq!(eng.degree(sq), Degree::Finite(2));
        let product = eng.mul(&[five, x, sq]);
        assert_eq!(eng.degree(product), Degree::Finite(3));
    }

    #[test]
    fn test_degree_of_transcendental() {
        let mut eng = Engine::new();
        let x = eng.symbol("x");
        let sin = eng.function(heads::SIN, &[x]);
        assert_eq!(eng.degree(sin), Degree::Infinite);
        let pi = eng.sym(heads::PI);
        let sin_const = eng.function(heads::SIN, &[pi]);
        assert_eq!(eng.degree(sin_const), Degree::Finite(0));
    }

    #[test]
    fn test_numbers_sort_before_symbols() {
        let mut eng = Engine::new();
        let x = eng.symbol("x");
        let five = eng.int(5);
        assert_eq!(eng.canonical_cmp(five, x, true), Ordering::Less);
        assert_eq!(eng.canonical_cmp(x, five, true), Ordering::Greater);
    }

    #[test]
    fn test_symbols_sort_by_name() {
        let mut eng = Engine::new();
        let x = eng.symbol("x");
        let y = eng.symbol("y");
        let z = eng.symbol("z");
        let mut ops = [z, x, y];
        eng.sort_operands(&mut ops, true);
        assert_eq!(ops, [x, y, z]);
    }

    #[test]
    fn test_degree_major_in_products() {
        // A constant factor sorts before any variable factor even when
        // its name would sort later.
        let mut eng = Engine::new();
        let m = eng.symbol("M");
        let pi = eng.sym(heads::PI);
        assert_eq!(eng.canonical_cmp(pi, m, true), Ordering::Less);
        // In an additive context the comparison is purely lexical.
        assert_eq!(eng.canonical_cmp(pi, m, false), Ordering::Greater);
    }
}
