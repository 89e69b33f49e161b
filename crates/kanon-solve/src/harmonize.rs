//! The harmonisation rule library.
//!
//! When no root rule matches, the solver rewrites the subject into
//! equivalent (or deliberately approximate) forms and retries: absolute
//! values split into their two sign branches, products of exponentials
//! merge, logarithmic differences unwrap into exponential ones, and
//! trigonometric factors collapse to their small-angle approximations.
//! Branch-producing rules act through `match_rules` at the top level;
//! the shrinking rules also run to fixed point over the whole tree.

use kanon_core::heads;
use kanon_engine::{Engine, Rule, RuleSet};

/// Builds the harmonisation rule set.
pub fn harmonization_rules(eng: &mut Engine) -> RuleSet {
    let a = eng.wildcard("a");
    let b = eng.wildcard("b");
    let c = eng.wildcard("c");
    let k = eng.wildcard("k");

    let mut rules = RuleSet::new();

    // |a| + c → ±a + c, and bare |a| → ±a.
    let abs_a = eng.function(heads::ABS, &[a]);
    let neg_a = eng.neg(a);
    let shifted = eng.add(&[c, abs_a]);
    let shifted_plus = eng.add(&[c, a]);
    let shifted_minus = eng.add(&[c, neg_a]);
    rules.push(Rule::with_replaces(
        "abs-branches-shifted",
        shifted,
        &[shifted_plus, shifted_minus],
    ));
    rules.push(Rule::with_replaces("abs-branches", abs_a, &[a, neg_a]));

    // e^a · e^b → e^(a+b), with or without a leading factor.
    let exp_a = eng.function(heads::EXP, &[a]);
    let exp_b = eng.function(heads::EXP, &[b]);
    let a_plus_b = eng.add(&[a, b]);
    let exp_sum = eng.function(heads::EXP, &[a_plus_b]);
    let product = eng.mul(&[exp_a, exp_b]);
    rules.push(Rule::new("exp-merge", product, exp_sum));
    let scaled_product = eng.mul(&[k, exp_a, exp_b]);
    let scaled_merged = eng.mul(&[k, exp_sum]);
    rules.push(Rule::new("exp-merge-scaled", scaled_product, scaled_merged));

    // ln unwrap: k·ln(a) + c vanishes exactly when a - e^(-c/k) does,
    // so a logarithmic difference becomes an exponential one the root
    // rules already cover.
    let ln_a = eng.function(heads::LN, &[a]);
    let k_ln_a = eng.mul(&[k, ln_a]);
    let neg_c = eng.neg(c);
    let exp_neg_c = eng.function(heads::EXP, &[neg_c]);
    let neg_exp = eng.neg(exp_neg_c);
    let shifted_ln = eng.add(&[c, ln_a]);
    let unwrapped = eng.add(&[a, neg_exp]);
    rules.push(Rule::new("ln-unwrap", shifted_ln, unwrapped));
    let c_over_k = eng.divide(c, k);
    let neg_ratio = eng.neg(c_over_k);
    let exp_ratio = eng.function(heads::EXP, &[neg_ratio]);
    let neg_exp_ratio = eng.neg(exp_ratio);
    let shifted_scaled_ln = eng.add(&[c, k_ln_a]);
    let unwrapped_scaled = eng.add(&[a, neg_exp_ratio]);
    rules.push(Rule::new("ln-unwrap-scaled", shifted_scaled_ln, unwrapped_scaled));
    let one = eng.consts().one;
    let neg_one = eng.neg(one);
    let unwrapped_bare = eng.add(&[a, neg_one]);
    rules.push(Rule::new("ln-unwrap-bare", ln_a, unwrapped_bare));

    // Small-angle approximations: sin f(x) → f(x), tan f(x) → f(x).
    let sin_a = eng.function(heads::SIN, &[a]);
    let tan_a = eng.function(heads::TAN, &[a]);
    rules.push(Rule::new("sin-approximation", sin_a, a));
    rules.push(Rule::new("tan-approximation", tan_a, a));

    rules
}
