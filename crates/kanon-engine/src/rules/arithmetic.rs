//! Basic algebraic simplification rules.

use kanon_core::heads;

use crate::engine::Engine;
use crate::rewrite::Rule;
use crate::sign::Sign;

/// Returns the arithmetic rewrite rules.
pub fn rules(eng: &mut Engine) -> Vec<Rule> {
    let a = eng.wildcard("a");
    let m = eng.wildcard("m");
    let n = eng.wildcard("n");
    let zero = eng.consts.zero;
    let one = eng.consts.one;
    let two = eng.consts.two;
    let neg_one = eng.consts.neg_one;

    let add_same = eng.add(&[a, a]);
    let two_a = eng.mul(&[two, a]);

    let mul_same = eng.mul(&[a, a]);
    let a_squared = eng.pow(a, two);

    let pow_a_m = eng.pow(a, m);
    let pow_a_n = eng.pow(a, n);
    let mul_pows = eng.mul(&[pow_a_m, pow_a_n]);
    let m_plus_n = eng.add(&[m, n]);
    let pow_sum = eng.pow(a, m_plus_n);

    let mul_sym_pow = eng.mul(&[a, pow_a_n]);
    let n_plus_one = eng.add(&[n, one]);
    let pow_succ = eng.pow(a, n_plus_one);

    let pow_pow = eng.pow(pow_a_m, n);
    let m_times_n = eng.mul(&[m, n]);
    let pow_product = eng.pow(a, m_times_n);

    let div_self = eng.divide(a, a);

    let neg_a = eng.neg(a);
    let minus_one_a = eng.mul(&[neg_one, a]);

    let add_neg_self = eng.add(&[a, neg_a]);

    let abs_a = eng.function(heads::ABS, &[a]);
    let abs_neg = eng.function(heads::ABS, &[neg_a]);

    vec![
        // a + a = 2a
        Rule::new("add-same", add_same, two_a),
        // a·a = a²
        Rule::new("mul-same", mul_same, a_squared),
        // aᵐ·aⁿ = aᵐ⁺ⁿ
        Rule::new("mul-pow", mul_pows, pow_sum),
        // a·aⁿ = aⁿ⁺¹
        Rule::new("mul-sym-pow", mul_sym_pow, pow_succ),
        // (aᵐ)ⁿ = aᵐ·ⁿ
        Rule::new("pow-pow", pow_pow, pow_product),
        // a + (-a) = 0
        Rule::new("add-neg-self", add_neg_self, zero),
        // a/a = 1, unless a is provably zero
        Rule::new("div-self", div_self, one)
            .when(|eng, bindings| {
                bindings
                    .get("a")
                    .map_or(false, |a| eng.sgn(a) != Sign::Zero)
            }),
        // (-1)·a = -a
        Rule::new("neg-mul", minus_one_a, neg_a),
        // |-a| = |a|
        Rule::new("abs-neg", abs_neg, abs_a),
        // |a| = a for non-negative a
        Rule::new("abs-known-sign", abs_a, a).when(|eng, bindings| {
            bindings.get("a").map_or(false, |a| {
                matches!(eng.sgn(a), Sign::Positive | Sign::Zero)
            })
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::RuleSet;

    #[test]
    fn test_add_same() {
        let mut eng = Engine::new();
        let rules = RuleSet::from_rules(rules(&mut eng));
        let x = eng.symbol("x");
        let raw = eng.add(&[x, x]);
        let subject = eng.canonical(raw);
        let result = eng.replace(subject, &rules).unwrap().unwrap();
        assert_eq!(eng.repr(result), "Multiply(2, x)");
    }

    #[test]
    fn test_pow_collection() {
        let mut eng = Engine::new();
        let x = eng.symbol("x");
        let two = eng.int(2);
        let three = eng.int(3);
        let x2 = eng.pow(x, two);
        let x3 = eng.pow(x, three);
        let raw = eng.mul(&[x2, x3]);
        let subject = eng.canonical(raw);
        let rules = RuleSet::from_rules(rules(&mut eng));
        let result = eng.replace(subject, &rules).unwrap().unwrap();
        assert_eq!(eng.repr(result), "Power(x, 5)");
    }

    #[test]
    fn test_abs_with_assumption() {
        let mut eng = Engine::new();
        let id = eng
            .declare_symbol("w", crate::defs::SymbolDef::default())
            .unwrap();
        eng.assume_sign(id, Sign::Positive);
        let w = eng.sym(id);
        let raw = eng.function(heads::ABS, &[w]);
        let subject = eng.canonical(raw);
        let rules = RuleSet::from_rules(rules(&mut eng));
        let result = eng.replace(subject, &rules).unwrap().unwrap();
        assert!(eng.is_same(result, w));
    }
}
