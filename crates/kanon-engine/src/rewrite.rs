//! Rules, rule sets, and fixed-point rewriting.
//!
//! A rule pairs a match pattern with one or more replacement patterns and
//! an optional condition over the binding map and the engine. Rule sets
//! are ordered; `match_rules` collects every successful top-level
//! rewrite, while `replace` drives a bottom-up fixed point under the
//! cost-biased acceptance rule, bounded by the iteration limit and the
//! deadline.

use std::rc::Rc;

use smallvec::SmallVec;

use kanon_core::{ExprHandle, ExprNode, Head};

use crate::engine::Engine;
use crate::error::EngineResult;
use crate::pattern::Substitution;

/// A side condition: receives the bindings and the engine, returns
/// whether the rule applies.
pub type RuleCondition = Rc<dyn Fn(&mut Engine, &Substitution) -> bool>;

/// A rewrite rule.
#[derive(Clone)]
pub struct Rule {
    /// Diagnostic name.
    pub id: Option<&'static str>,
    /// The match pattern.
    pub pattern: ExprHandle,
    /// Replacement patterns; most rules have one, the quadratic formula
    /// has two.
    pub replaces: SmallVec<[ExprHandle; 1]>,
    /// Optional side condition.
    pub condition: Option<RuleCondition>,
}

impl Rule {
    /// A rule with a single replacement and no condition.
    #[must_use]
    pub fn new(id: &'static str, pattern: ExprHandle, replace: ExprHandle) -> Self {
        Self {
            id: Some(id),
            pattern,
            replaces: SmallVec::from_slice(&[replace]),
            condition: None,
        }
    }

    /// A rule with several replacements.
    #[must_use]
    pub fn with_replaces(
        id: &'static str,
        pattern: ExprHandle,
        replaces: &[ExprHandle],
    ) -> Self {
        Self {
            id: Some(id),
            pattern,
            replaces: SmallVec::from_slice(replaces),
            condition: None,
        }
    }

    /// Attaches a condition.
    #[must_use]
    pub fn when(mut self, condition: impl Fn(&mut Engine, &Substitution) -> bool + 'static) -> Self {
        self.condition = Some(Rc::new(condition));
        self
    }
}

/// An ordered sequence of rules.
#[derive(Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// An empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A rule set from a vector, keeping order.
    #[must_use]
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Appends a rule.
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Appends many rules.
    pub fn extend(&mut self, rules: impl IntoIterator<Item = Rule>) {
        self.rules.extend(rules);
    }

    /// The rules in order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no rules are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Engine {
    /// Tries every rule in order against `expr` (top level only) and
    /// collects every successful, canonicalised rewrite.
    ///
    /// # Errors
    ///
    /// `Timeout` when the deadline expires mid-scan.
    pub fn match_rules(
        &mut self,
        expr: ExprHandle,
        rules: &RuleSet,
        initial: Option<&Substitution>,
    ) -> EngineResult<Vec<ExprHandle>> {
        let mut results = Vec::new();
        for rule in rules.rules() {
            self.should_continue()?;
            let Some(bindings) = self.match_pattern(expr, rule.pattern, initial) else {
                continue;
            };
            if let Some(condition) = rule.condition.clone() {
                if !condition(self, &bindings) {
                    continue;
                }
            }
            for &replace in &rule.replaces {
                results.push(self.instantiate(replace, &bindings));
            }
        }
        Ok(results)
    }

    /// Applies the rule set to fixed point, bottom-up, accepting rewrites
    /// under the cost rule. Returns `None` when no rule ever fired;
    /// exhausting the iteration limit returns the partial result.
    ///
    /// # Errors
    ///
    /// `Timeout` when the deadline expires.
    pub fn replace(
        &mut self,
        expr: ExprHandle,
        rules: &RuleSet,
    ) -> EngineResult<Option<ExprHandle>> {
        self.with_deadline(|eng| {
            let mut budget = eng.current_limits().iteration_limit;
            let mut fired = false;
            let result = eng.replace_rec(expr, rules, &mut budget, &mut fired)?;
            Ok(fired.then_some(result))
        })
    }

    fn replace_rec(
        &mut self,
        expr: ExprHandle,
        rules: &RuleSet,
        budget: &mut usize,
        fired: &mut bool,
    ) -> EngineResult<ExprHandle> {
        self.should_continue()?;

        // Children first.
        let rebuilt = match self.node(expr).clone() {
            ExprNode::Function { head, ops } => {
                let mut new_ops: SmallVec<[ExprHandle; 4]> = SmallVec::with_capacity(ops.len());
                for &op in &ops {
                    new_ops.push(self.replace_rec(op, rules, budget, fired)?);
                }
                let new_head = match head {
                    Head::Expr(h) => Head::Expr(self.replace_rec(h, rules, budget, fired)?),
                    sym => sym,
                };
                self.arena.apply(new_head, new_ops)
            }
            ExprNode::Tensor { dtype, shape, data } => {
                let mut new_data = Vec::with_capacity(data.len());
                for &h in &data {
                    new_data.push(self.replace_rec(h, rules, budget, fired)?);
                }
                self.arena.tensor(dtype, shape, new_data)
            }
            _ => expr,
        };

        // Then this node, reprocessing after every accepted rewrite.
        let mut current = rebuilt;
        while *budget > 0 {
            self.should_continue()?;
            let mut changed = false;
            for rule in rules.rules() {
                let Some(bindings) = self.match_pattern(current, rule.pattern, None) else {
                    continue;
                };
                if let Some(condition) = rule.condition.clone() {
                    if !condition(self, &bindings) {
                        continue;
                    }
                }
                let candidate = self.instantiate(rule.replaces[0], &bindings);
                if candidate == current || !self.cost_accept(candidate, current) {
                    continue;
                }
                *budget -= 1;
                *fired = true;
                current = candidate;
                changed = true;
                break;
            }
            if !changed {
                break;
            }
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conditional_rewrite_to_zero() {
        // Multiply(_x, __a) -> 0 when __a does not contain _x.
        let mut eng = Engine::new();
        let wx = eng.wildcard("x");
        let wa = eng.symbol("__a");
        let pattern = eng.mul(&[wx, wa]);
        let zero = eng.int(0);
        let rule = Rule::new("annihilate", pattern, zero).when(|eng, bindings| {
            let (x, a) = (bindings.get("x").unwrap(), bindings.get("a").unwrap());
            eng.free_of(a, x)
        });
        let rules = RuleSet::from_rules(vec![rule]);

        let five = eng.int(5);
        let x = eng.symbol("x");
        let raw = eng.mul(&[five, x]);
        let subject = eng.canonical(raw);
        let result = eng.replace(subject, &rules).unwrap().unwrap();
        assert_eq!(eng.repr(result), "0");
    }

    #[test]
    fn test_replace_returns_none_when_nothing_fires() {
        let mut eng = Engine::new();
        let wa = eng.wildcard("a");
        let pattern = eng.function(kanon_core::heads::SIN, &[wa]);
        let rule = Rule::new("noop", pattern, wa);
        let rules = RuleSet::from_rules(vec![rule]);
        let x = eng.symbol("x");
        let subject = eng.add(&[x, x]);
        assert!(eng.replace(subject, &rules).unwrap().is_none());
    }

    #[test]
    fn test_match_rules_collects_every_branch() {
        let mut eng = Engine::new();
        let wa = eng.wildcard("a");
        let abs = eng.function(kanon_core::heads::ABS, &[wa]);
        let neg = eng.neg(wa);
        let rule = Rule::with_replaces("split", abs, &[wa, neg]);
        let rules = RuleSet::from_rules(vec![rule]);

        let x = eng.symbol("x");
        let subject_raw = eng.function(kanon_core::heads::ABS, &[x]);
        let subject = eng.canonical(subject_raw);
        let results = eng.match_rules(subject, &rules, None).unwrap();
        assert_eq!(results.len(), 2);
        assert!(eng.is_same(results[0], x));
        assert_eq!(eng.repr(results[1]), "Negate(x)");
    }

    #[test]
    fn test_cost_bias_blocks_growing_rewrites() {
        // Rewriting sin(_a) into an eight-term sum costs far more; the
        // rule must not be accepted by `replace`.
        let mut eng = Engine::new();
        let wa = eng.wildcard("a");
        let pattern = eng.function(kanon_core::heads::SIN, &[wa]);
        let grown = eng.add(&[wa, wa, wa, wa, wa, wa, wa, wa]);
        let rule = Rule::new("grow", pattern, grown);
        let rules = RuleSet::from_rules(vec![rule]);
        let x = eng.symbol("x");
        let subject_raw = eng.function(kanon_core::heads::SIN, &[x]);
        let subject = eng.canonical(subject_raw);
        assert!(eng.replace(subject, &rules).unwrap().is_none());
    }

    #[test]
    fn test_rewrite_terminates_within_budget() {
        // x -> x is the degenerate oscillator; identical candidates are
        // skipped, so the loop exits immediately.
        let mut eng = Engine::new();
        let wa = eng.wildcard("a");
        let neg_neg = {
            let inner = eng.neg(wa);
            eng.neg(inner)
        };
        let rule = Rule::new("unwrap", neg_neg, wa);
        let rules = RuleSet::from_rules(vec![rule]);
        let x = eng.symbol("x");
        let subject = {
            let n1 = eng.neg(x);
            eng.neg(n1)
        };
        let result = eng.replace(subject, &rules).unwrap().unwrap();
        assert!(eng.is_same(result, x));
    }
}
