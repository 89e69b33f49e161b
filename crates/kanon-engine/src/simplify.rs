//! The simplify pass.
//!
//! Canonicalise, recurse under the hold policy, race the expanded form
//! against the original, consult the `simplify` handler under the cost
//! rule, drive the standard rule set to fixed point, and return the
//! cheapest form seen.

use std::rc::Rc;

use smallvec::SmallVec;

use kanon_core::{ExprHandle, ExprNode, Head};

use crate::engine::Engine;
use crate::error::EngineResult;
use crate::rewrite::RuleSet;

/// Options for `simplify_with`.
#[derive(Clone, Default)]
pub struct SimplifyOptions {
    /// Simplify operands recursively (default) or only the top node.
    pub top_only: bool,
    /// A replacement rule set; the standard set when absent.
    pub rules: Option<Rc<RuleSet>>,
}

impl Engine {
    /// Simplifies an expression with the default options.
    ///
    /// # Errors
    ///
    /// `Timeout` when the deadline expires.
    pub fn simplify(&mut self, expr: ExprHandle) -> EngineResult<ExprHandle> {
        self.simplify_with(expr, &SimplifyOptions::default())
    }

    /// Simplifies an expression.
    ///
    /// # Errors
    ///
    /// `Timeout` when the deadline expires.
    pub fn simplify_with(
        &mut self,
        expr: ExprHandle,
        options: &SimplifyOptions,
    ) -> EngineResult<ExprHandle> {
        let options = options.clone();
        self.with_deadline(|eng| eng.simplify_rec(expr, &options))
    }

    fn simplify_rec(
        &mut self,
        expr: ExprHandle,
        options: &SimplifyOptions,
    ) -> EngineResult<ExprHandle> {
        self.should_continue()?;
        let expr = self.canonical(expr);
        let ExprNode::Function { head, ops } = self.node(expr).clone() else {
            return Ok(expr);
        };
        let Head::Sym(sym) = head else {
            return Ok(expr);
        };
        let def = self.function_def(sym);

        let mut current = expr;
        if !options.top_only {
            let arity = ops.len();
            let mut simplified: SmallVec<[ExprHandle; 4]> = SmallVec::with_capacity(arity);
            for (index, &op) in ops.iter().enumerate() {
                let held = self.is_function(op, kanon_core::heads::HOLD)
                    || def
                        .as_ref()
                        .map_or(false, |d| d.hold.holds(index, arity));
                if held {
                    simplified.push(op);
                } else {
                    simplified.push(self.simplify_rec(op, options)?);
                }
            }
            let rebuilt = self.function(sym, &simplified);
            current = self.canonical(rebuilt);
        }

        let mut best = current;

        // Race the expanded form; keep it only when strictly cheaper.
        let expanded = self.expand(current);
        if self.cost(expanded) < self.cost(best) {
            best = expanded;
        }

        if let Some(def) = &def {
            if def.flags.inert {
                return Ok(match self.function_parts(current) {
                    Some((_, current_ops)) => current_ops.first().copied().unwrap_or(current),
                    None => current,
                });
            }
            if let Some(handler) = def.handlers.simplify.clone() {
                let current_ops = self.ops_of(current);
                if let Some(result) = handler(self, &current_ops)? {
                    let result = self.canonical(result);
                    if self.cost_accept(result, current) {
                        current = result;
                        if self.cost(current) < self.cost(best) {
                            best = current;
                        }
                    }
                }
            }
        }

        // The rule set, to fixed point.
        let rules = match &options.rules {
            Some(rules) => Rc::clone(rules),
            None => self.standard_rules(),
        };
        if let Some(rewritten) = self.replace(current, &rules)? {
            if self.cost(rewritten) <= self.cost(best) {
                best = rewritten;
            }
        }

        Ok(best)
    }

    /// The operands of a function node, or an empty list.
    fn ops_of(&self, expr: ExprHandle) -> SmallVec<[ExprHandle; 4]> {
        self.function_parts(expr)
            .map(|(_, ops)| ops)
            .unwrap_or_default()
    }

    /// The standard simplification rule set, built once per
    /// configuration epoch.
    pub fn standard_rules(&mut self) -> Rc<RuleSet> {
        if let Some(rules) = &self.simplify_rules {
            return Rc::clone(rules);
        }
        let rules = Rc::new(crate::rules::standard_rules(self));
        self.simplify_rules = Some(Rc::clone(&rules));
        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simplify_folds_and_cancels() {
        let mut eng = Engine::new();
        let x = eng.symbol("x");
        let zero = eng.int(0);
        let sum = eng.add(&[x, zero]);
        let result = eng.simplify(sum).unwrap();
        assert!(eng.is_same(result, x));
    }

    #[test]
    fn test_simplify_collects_squares() {
        let mut eng = Engine::new();
        let x = eng.symbol("x");
        let product = eng.mul(&[x, x]);
        let result = eng.simplify(product).unwrap();
        assert_eq!(eng.repr(result), "Power(x, 2)");
    }

    #[test]
    fn test_simplify_pythagorean() {
        let mut eng = Engine::new();
        let x = eng.symbol("x");
        let two = eng.int(2);
        let sin = eng.function(kanon_core::heads::SIN, &[x]);
        let cos = eng.function(kanon_core::heads::COS, &[x]);
        let sin2 = eng.pow(sin, two);
        let cos2 = eng.pow(cos, two);
        let sum = eng.add(&[sin2, cos2]);
        let result = eng.simplify(sum).unwrap();
        assert_eq!(eng.repr(result), "1");
    }

    #[test]
    fn test_simplify_exp_ln_roundtrip() {
        let mut eng = Engine::new();
        let x = eng.symbol("x");
        let ln = eng.function(kanon_core::heads::LN, &[x]);
        let exp_ln = eng.function(kanon_core::heads::EXP, &[ln]);
        let result = eng.simplify(exp_ln).unwrap();
        assert!(eng.is_same(result, x));
    }

    #[test]
    fn test_simplify_cancels_difference() {
        let mut eng = Engine::new();
        let x = eng.symbol("x");
        let neg_x = eng.neg(x);
        let sum = eng.add(&[x, neg_x]);
        let result = eng.simplify(sum).unwrap();
        assert_eq!(eng.repr(result), "0");
    }
}
