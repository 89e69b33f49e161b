//! The standard simplification rule library, organised by category.
//!
//! Canonicalisation already folds literals, flattens and sorts; these
//! rules cover the algebraic identities beyond it. They are ordinary
//! engine rules (patterns built in the engine's arena), applied to fixed
//! point by the simplifier under the cost rule.

pub mod arithmetic;
pub mod exp_log;
pub mod trig;

use crate::engine::Engine;
use crate::rewrite::RuleSet;

/// Builds the full standard rule set, keeping category order.
pub fn standard_rules(eng: &mut Engine) -> RuleSet {
    let mut rules = RuleSet::new();
    rules.extend(arithmetic::rules(eng));
    rules.extend(trig::rules(eng));
    rules.extend(exp_log::rules(eng));
    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_rules_nonempty() {
        let mut eng = Engine::new();
        let rules = standard_rules(&mut eng);
        assert!(rules.len() > 10);
    }
}
