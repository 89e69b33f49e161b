//! Exponential and logarithmic simplification rules.

use kanon_core::heads;

use crate::engine::Engine;
use crate::rewrite::Rule;
use crate::sign::Sign;

/// Returns the exponential and logarithmic rewrite rules.
pub fn rules(eng: &mut Engine) -> Vec<Rule> {
    let a = eng.wildcard("a");
    let b = eng.wildcard("b");
    let n = eng.wildcard("n");

    let ln_a = eng.function(heads::LN, &[a]);
    let exp_a = eng.function(heads::EXP, &[a]);
    let exp_b = eng.function(heads::EXP, &[b]);

    // exp(ln(a)) = a
    let exp_ln = eng.function(heads::EXP, &[ln_a]);
    // ln(exp(a)) = a
    let ln_exp = eng.function(heads::LN, &[exp_a]);

    // exp(a)·exp(b) = exp(a + b)
    let exp_product = eng.mul(&[exp_a, exp_b]);
    let a_plus_b = eng.add(&[a, b]);
    let exp_sum = eng.function(heads::EXP, &[a_plus_b]);

    // exp(a)ⁿ = exp(n·a)
    let exp_pow = eng.pow(exp_a, n);
    let n_times_a = eng.mul(&[n, a]);
    let exp_scaled = eng.function(heads::EXP, &[n_times_a]);

    // ln(aⁿ) = n·ln(a), for positive a
    let pow_a_n = eng.pow(a, n);
    let ln_pow = eng.function(heads::LN, &[pow_a_n]);
    let n_ln_a = eng.mul(&[n, ln_a]);

    // sqrt(a²) = |a|
    let two = eng.consts.two;
    let a_squared = eng.pow(a, two);
    let sqrt_sq = eng.sqrt(a_squared);
    let abs_a = eng.function(heads::ABS, &[a]);

    vec![
        Rule::new("exp-ln", exp_ln, a),
        Rule::new("ln-exp", ln_exp, a),
        Rule::new("exp-product", exp_product, exp_sum),
        Rule::new("exp-pow", exp_pow, exp_scaled),
        Rule::new("ln-pow", ln_pow, n_ln_a).when(|eng, bindings| {
            bindings
                .get("a")
                .map_or(false, |a| eng.sgn(a) == Sign::Positive)
        }),
        Rule::new("sqrt-sq", sqrt_sq, abs_a),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::RuleSet;

    #[test]
    fn test_exp_ln_inverse_pair() {
        let mut eng = Engine::new();
        let rules = RuleSet::from_rules(rules(&mut eng));
        let x = eng.symbol("x");
        let ln = eng.function(heads::LN, &[x]);
        let raw = eng.function(heads::EXP, &[ln]);
        let subject = eng.canonical(raw);
        let result = eng.replace(subject, &rules).unwrap().unwrap();
        assert!(eng.is_same(result, x));
    }

    #[test]
    fn test_exp_product_merges() {
        let mut eng = Engine::new();
        let rules = RuleSet::from_rules(rules(&mut eng));
        let x = eng.symbol("x");
        let y = eng.symbol("y");
        let ex = eng.function(heads::EXP, &[x]);
        let ey = eng.function(heads::EXP, &[y]);
        let raw = eng.mul(&[ex, ey]);
        let subject = eng.canonical(raw);
        let result = eng.replace(subject, &rules).unwrap().unwrap();
        assert_eq!(eng.repr(result), "Exp(Add(x, y))");
    }

    #[test]
    fn test_sqrt_of_square_is_abs() {
        let mut eng = Engine::new();
        let rules = RuleSet::from_rules(rules(&mut eng));
        let x = eng.symbol("x");
        let two = eng.int(2);
        let sq = eng.pow(x, two);
        let raw = eng.sqrt(sq);
        let subject = eng.canonical(raw);
        let result = eng.replace(subject, &rules).unwrap().unwrap();
        assert_eq!(eng.repr(result), "Abs(x)");
    }
}
