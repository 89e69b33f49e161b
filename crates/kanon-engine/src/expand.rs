//! Best-effort algebraic expansion.
//!
//! Distributes products over sums and unrolls small integer powers of
//! sums. The simplifier races the expanded form against the original and
//! keeps the cheaper one; the solver expands as a last resort before
//! re-matching its root rules.

use kanon_core::{heads, ExprHandle, ExprNode, Head};

use crate::engine::Engine;

/// Integer powers of sums above this are left alone.
const MAX_UNROLLED_POWER: i64 = 4;

impl Engine {
    /// Expands an expression, canonicalising the result.
    pub fn expand(&mut self, expr: ExprHandle) -> ExprHandle {
        let expr = self.canonical(expr);
        let expanded = self.expand_rec(expr);
        self.canonical(expanded)
    }

    fn expand_rec(&mut self, expr: ExprHandle) -> ExprHandle {
        let ExprNode::Function { head, ops } = self.node(expr).clone() else {
            return expr;
        };
        let Head::Sym(sym) = head else {
            return expr;
        };
        let children: Vec<ExprHandle> = ops.iter().map(|&op| self.expand_rec(op)).collect();

        match sym {
            heads::MULTIPLY => self.distribute_product(&children),
            heads::POWER => {
                if let [base, exp] = children.as_slice() {
                    if let Some(n) = self.node(*exp).as_number().and_then(|v| v.as_i64()) {
                        if (2..=MAX_UNROLLED_POWER).contains(&n)
                            && self.is_function(*base, heads::ADD)
                        {
                            let factors = vec![*base; usize::try_from(n).expect("small power")];
                            return self.distribute_product(&factors);
                        }
                    }
                }
                self.function(heads::POWER, &children)
            }
            _ => self.function(sym, &children),
        }
    }

    /// Distributes a product over any `Add` factors: the cartesian
    /// product of terms, summed.
    fn distribute_product(&mut self, factors: &[ExprHandle]) -> ExprHandle {
        if !factors.iter().any(|&f| self.is_function(f, heads::ADD)) {
            return self.function(heads::MULTIPLY, factors);
        }
        let mut terms: Vec<Vec<ExprHandle>> = vec![Vec::new()];
        for &factor in factors {
            let alternatives: Vec<ExprHandle> = if self.is_function(factor, heads::ADD) {
                let (_, summands) = self.function_parts(factor).expect("add node");
                summands.to_vec()
            } else {
                vec![factor]
            };
            let mut next = Vec::with_capacity(terms.len() * alternatives.len());
            for prefix in &terms {
                for &alt in &alternatives {
                    let mut extended = prefix.clone();
                    extended.push(alt);
                    next.push(extended);
                }
            }
            terms = next;
        }
        let summands: Vec<ExprHandle> = terms
            .into_iter()
            .map(|product| self.function(heads::MULTIPLY, &product))
            .collect();
        self.function(heads::ADD, &summands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distributes_over_sum() {
        let mut eng = Engine::new();
        let x = eng.symbol("x");
        let one = eng.int(1);
        let two = eng.int(2);
        let sum = eng.add(&[x, one]);
        let product = eng.mul(&[two, sum]);
        let expanded = eng.expand(product);
        assert_eq!(eng.repr(expanded), "Add(2, Multiply(2, x))");
    }

    #[test]
    fn test_binomial_square() {
        let mut eng = Engine::new();
        let x = eng.symbol("x");
        let one = eng.int(1);
        let two = eng.int(2);
        let sum = eng.add(&[x, one]);
        let squared = eng.pow(sum, two);
        let expanded = eng.expand(squared);
        // (x + 1)^2 = 1 + x + x + x·x; expansion does not collect like
        // terms, and power collection is the simplifier's business.
        assert_eq!(eng.repr(expanded), "Add(1, x, x, Multiply(x, x))");
    }

    #[test]
    fn test_atoms_unchanged() {
        let mut eng = Engine::new();
        let x = eng.symbol("x");
        let expanded = eng.expand(x);
        assert!(eng.is_same(expanded, x));
    }
}
