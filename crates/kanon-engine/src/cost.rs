//! Expression cost.
//!
//! The rule engine and the simplifier pick between equivalent forms by
//! cost: per-head complexity weights (from the function registry) summed
//! over the tree, so depth is paid for implicitly. A configurable bias
//! ratio gives fresh rewrites a small headroom, which is what keeps
//! fixed-point rewriting from oscillating between forms of similar size.

use kanon_core::{ExprHandle, ExprNode, Head};

use crate::engine::Engine;

/// Weight of a head with no registered definition.
const DEFAULT_HEAD_WEIGHT: u64 = 3;

/// Weight of an in-band error; errors should never win a cost race.
const ERROR_WEIGHT: u64 = 50;

impl Engine {
    /// The cost of an expression: head weight plus the cost of every
    /// child.
    #[must_use]
    pub fn cost(&self, expr: ExprHandle) -> u64 {
        let head_weight = match self.node(expr) {
            ExprNode::Number(_) | ExprNode::Str(_) | ExprNode::Domain(_) => 1,
            ExprNode::Symbol(_) => 1,
            ExprNode::Tensor { .. } => 2,
            ExprNode::Error { .. } => ERROR_WEIGHT,
            ExprNode::Function { head, .. } => match head {
                Head::Sym(sym) => self
                    .function_def(*sym)
                    .map_or(DEFAULT_HEAD_WEIGHT, |def| u64::from(def.complexity)),
                Head::Expr(_) => DEFAULT_HEAD_WEIGHT,
            },
        };
        self.node(expr)
            .children()
            .iter()
            .fold(head_weight, |acc, &child| {
                acc.saturating_add(self.cost(child))
            })
    }

    /// The cost-biased acceptance rule: a candidate replaces the current
    /// form iff its cost stays within the bias ratio.
    #[must_use]
    pub fn cost_accept(&self, candidate: ExprHandle, current: ExprHandle) -> bool {
        #[allow(clippy::cast_precision_loss)]
        let (new_cost, old_cost) = (self.cost(candidate) as f64, self.cost(current) as f64);
        new_cost <= self.config.cost_bias * old_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atoms_are_cheap() {
        let mut eng = Engine::new();
        let five = eng.int(5);
        let x = eng.symbol("x");
        assert_eq!(eng.cost(five), 1);
        assert_eq!(eng.cost(x), 1);
    }

    #[test]
    fn test_cost_grows_with_depth() {
        let mut eng = Engine::new();
        let x = eng.symbol("x");
        let flat = eng.add(&[x, x]);
        let nested = eng.add(&[flat, x]);
        assert!(eng.cost(nested) > eng.cost(flat));
    }

    #[test]
    fn test_transcendental_heads_cost_more() {
        let mut eng = Engine::new();
        let x = eng.symbol("x");
        let sum = eng.add(&[x, x]);
        let sine = eng.function(kanon_core::heads::SIN, &[x]);
        assert!(eng.cost(sine) > eng.cost(sum));
    }

    #[test]
    fn test_acceptance_bias() {
        let mut eng = Engine::new();
        let x = eng.symbol("x");
        let y = eng.symbol("y");
        let small = eng.add(&[x, y]);
        let z = eng.symbol("z");
        let big = eng.add(&[x, y, z, z, z, z]);
        assert!(eng.cost_accept(small, big));
        assert!(!eng.cost_accept(big, small));
        // Equal cost is always accepted.
        assert!(eng.cost_accept(small, small));
    }
}
