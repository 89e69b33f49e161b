//! The root rule library.
//!
//! Seven rule families in fixed order: degenerate and linear forms,
//! reciprocal, monomial power, the quadratic formula (two branches), and
//! exponential forms. Each family is realised as the set of structural
//! variants its canonical subject arrangements produce (coefficients
//! folded away, operand order as the canonical ordering yields it).
//! Every variant's condition requires the `x` capture to be the active
//! solver placeholder and every coefficient capture to be free of it.

use kanon_core::{heads, ExprHandle};
use kanon_engine::{Engine, Rule, RuleSet, Substitution};

/// True when the `x` capture bound the reserved placeholder itself.
fn x_is_placeholder(eng: &Engine, bindings: &Substitution) -> bool {
    match (bindings.get("x"), eng.solve_placeholder()) {
        (Some(x), Some(placeholder)) => x == placeholder,
        _ => false,
    }
}

/// True when every listed capture is absent or free of the placeholder.
fn coefficients_free(eng: &Engine, bindings: &Substitution, keys: &[&str]) -> bool {
    let Some(placeholder) = eng.solve_placeholder() else {
        return false;
    };
    keys.iter().all(|key| {
        bindings
            .get(key)
            .map_or(true, |bound| eng.free_of(bound, placeholder))
    })
}

fn coefficient_rule(
    id: &'static str,
    pattern: ExprHandle,
    replace: ExprHandle,
    keys: &'static [&'static str],
) -> Rule {
    Rule::new(id, pattern, replace)
        .when(move |eng, bindings| {
            x_is_placeholder(eng, bindings) && coefficients_free(eng, bindings, keys)
        })
}

/// The argument of a prospective logarithm must not be provably
/// non-positive: `-c/a` with `a` defaulting to one.
fn ln_argument_admissible(eng: &mut Engine, bindings: &Substitution) -> bool {
    let Some(c) = bindings.get("c") else {
        return false;
    };
    let neg_c = eng.neg(c);
    let argument = match bindings.get("a") {
        Some(a) => eng.divide(neg_c, a),
        None => neg_c,
    };
    let argument = eng.canonical(argument);
    match eng.numeric_value(argument) {
        Some(value) => value.sign() == Some(1),
        None => true,
    }
}

/// Builds the ordered root rule set.
#[allow(clippy::too_many_lines)]
pub fn root_rules(eng: &mut Engine) -> RuleSet {
    let x = eng.wildcard("x");
    let a = eng.wildcard("a");
    let b = eng.wildcard("b");
    let c = eng.wildcard("c");
    let n = eng.wildcard("n");
    let zero = eng.consts().zero;
    let one = eng.consts().one;
    let pos_infinity = eng.consts().pos_infinity;

    let mut rules = RuleSet::new();

    // 0. The bare unknown: x = 0.
    rules.push(coefficient_rule("bare", x, zero, &[]));

    // 1. a·x = 0 has the root 0.
    let ax = eng.mul(&[a, x]);
    let xa = eng.mul(&[x, a]);
    rules.push(coefficient_rule("product", ax, zero, &["a"]));
    rules.push(coefficient_rule("product-swapped", xa, zero, &["a"]));

    // 2. a/x + b = 0 diverges.
    let a_over_x = eng.divide(a, x);
    for (id, pattern) in [
        ("reciprocal-shifted", eng.add(&[b, a_over_x])),
        ("reciprocal-shifted-swapped", eng.add(&[a_over_x, b])),
        ("reciprocal", a_over_x),
    ] {
        rules.push(coefficient_rule(id, pattern, pos_infinity, &["a", "b"]));
    }

    // 3. a·x + b = 0 has the root -b/a.
    let b_over_a = eng.divide(b, a);
    let neg_b_over_a = eng.neg(b_over_a);
    let neg_b = eng.neg(b);
    for (id, pattern, replace) in [
        ("linear", eng.add(&[b, ax]), neg_b_over_a),
        ("linear-swapped", eng.add(&[b, xa]), neg_b_over_a),
        ("linear-trailing", eng.add(&[ax, b]), neg_b_over_a),
        ("linear-trailing-swapped", eng.add(&[xa, b]), neg_b_over_a),
        ("linear-monic", eng.add(&[b, x]), neg_b),
        ("linear-monic-trailing", eng.add(&[x, b]), neg_b),
    ] {
        rules.push(coefficient_rule(id, pattern, replace, &["a", "b"]));
    }

    // 4. a·xⁿ + b = 0 has the root (-b)^(1/n)/a.
    let x_to_n = eng.pow(x, n);
    let ax_to_n = eng.mul(&[a, x_to_n]);
    let recip_n = eng.divide(one, n);
    let nth_root = eng.pow(neg_b, recip_n);
    let nth_root_over_a = eng.divide(nth_root, a);
    for (id, pattern, replace) in [
        ("monomial", eng.add(&[b, ax_to_n]), nth_root_over_a),
        ("monomial-trailing", eng.add(&[ax_to_n, b]), nth_root_over_a),
        ("monomial-monic", eng.add(&[b, x_to_n]), nth_root),
        ("monomial-monic-trailing", eng.add(&[x_to_n, b]), nth_root),
    ] {
        rules.push(coefficient_rule(id, pattern, replace, &["a", "b", "n"]));
    }
    let positive_degree = |eng: &mut Engine, bindings: &Substitution| {
        bindings
            .get("n")
            .and_then(|n| eng.node(n).as_number().cloned())
            .and_then(|v| v.sign())
            == Some(1)
    };
    let monomial_zero = coefficient_rule("monomial-zero", ax_to_n, zero, &["a", "n"])
        .when(move |eng, bindings| {
            x_is_placeholder(eng, bindings)
                && coefficients_free(eng, bindings, &["a", "n"])
                && positive_degree(eng, bindings)
        });
    rules.push(monomial_zero);

    // 5. The quadratic formula, both branches.
    push_quadratic_rules(eng, &mut rules, x, a, b, c);

    // 6. a·e^(b·x) + c = 0 has the root ln(-c/a)/b.
    let bx = eng.mul(&[b, x]);
    let exp_bx = eng.function(heads::EXP, &[bx]);
    let a_exp_bx = eng.mul(&[a, exp_bx]);
    let neg_c = eng.neg(c);
    let neg_c_over_a = eng.divide(neg_c, a);
    let ln_full = eng.function(heads::LN, &[neg_c_over_a]);
    let ln_full_over_b = eng.divide(ln_full, b);
    let ln_monic = eng.function(heads::LN, &[neg_c]);
    let ln_monic_over_b = eng.divide(ln_monic, b);
    let scaled_variants: [(&'static str, ExprHandle, ExprHandle, &'static [&'static str]); 2] = [
        (
            "exponential-scaled",
            eng.add(&[c, a_exp_bx]),
            ln_full_over_b,
            &["a", "b", "c"],
        ),
        (
            "exponential-scaled-monic",
            eng.add(&[c, exp_bx]),
            ln_monic_over_b,
            &["b", "c"],
        ),
    ];
    for (id, pattern, replace, keys) in scaled_variants {
        rules.push(
            Rule::new(id, pattern, replace).when(move |eng, bindings| {
                x_is_placeholder(eng, bindings)
                    && coefficients_free(eng, bindings, keys)
                    && ln_argument_admissible(eng, bindings)
            }),
        );
    }

    // 7. a·e^x + c = 0 has the root ln(-c/a).
    let exp_x = eng.function(heads::EXP, &[x]);
    let a_exp_x = eng.mul(&[a, exp_x]);
    let plain_variants: [(&'static str, ExprHandle, ExprHandle, &'static [&'static str]); 2] = [
        ("exponential", eng.add(&[c, a_exp_x]), ln_full, &["a", "c"]),
        ("exponential-monic", eng.add(&[c, exp_x]), ln_monic, &["c"]),
    ];
    for (id, pattern, replace, keys) in plain_variants {
        rules.push(
            Rule::new(id, pattern, replace).when(move |eng, bindings| {
                x_is_placeholder(eng, bindings)
                    && coefficients_free(eng, bindings, keys)
                    && ln_argument_admissible(eng, bindings)
            }),
        );
    }

    rules
}

/// The quadratic variants: coefficients present, folded to one, or (for
/// the constant term) absent, in every operand arrangement the canonical
/// ordering produces.
fn push_quadratic_rules(
    eng: &mut Engine,
    rules: &mut RuleSet,
    x: ExprHandle,
    a: ExprHandle,
    b: ExprHandle,
    c: ExprHandle,
) {
    let two = eng.consts().two;
    let one = eng.consts().one;
    let zero = eng.consts().zero;
    let x_sq = eng.pow(x, two);
    let ax_sq = eng.mul(&[a, x_sq]);
    let bx = eng.mul(&[b, x]);

    let variants: Vec<(&'static str, ExprHandle, [ExprHandle; 3], &'static [&'static str])> = vec![
        (
            "quadratic",
            eng.add(&[c, ax_sq, bx]),
            [a, b, c],
            &["a", "b", "c"],
        ),
        (
            "quadratic-swapped",
            eng.add(&[c, bx, ax_sq]),
            [a, b, c],
            &["a", "b", "c"],
        ),
        (
            "quadratic-monic",
            eng.add(&[c, bx, x_sq]),
            [one, b, c],
            &["b", "c"],
        ),
        (
            "quadratic-unit-linear",
            eng.add(&[c, x, ax_sq]),
            [a, one, c],
            &["a", "c"],
        ),
        (
            "quadratic-monic-unit-linear",
            eng.add(&[c, x, x_sq]),
            [one, one, c],
            &["c"],
        ),
        (
            "quadratic-homogeneous",
            eng.add(&[ax_sq, bx]),
            [a, b, zero],
            &["a", "b"],
        ),
        (
            "quadratic-homogeneous-swapped",
            eng.add(&[bx, ax_sq]),
            [a, b, zero],
            &["a", "b"],
        ),
        (
            "quadratic-homogeneous-unit-linear",
            eng.add(&[x, ax_sq]),
            [a, one, zero],
            &["a"],
        ),
        (
            "quadratic-homogeneous-monic",
            eng.add(&[x, x_sq]),
            [one, one, zero],
            &[],
        ),
    ];

    for (id, pattern, [qa, qb, qc], keys) in variants {
        let replaces = quadratic_branches(eng, qa, qb, qc);
        rules.push(
            Rule::with_replaces(id, pattern, &replaces).when(move |eng, bindings| {
                x_is_placeholder(eng, bindings) && coefficients_free(eng, bindings, keys)
            }),
        );
    }
}

/// `(-b ± √(b² - 4ac)) / 2a` as a pair of replacement trees.
fn quadratic_branches(
    eng: &mut Engine,
    a: ExprHandle,
    b: ExprHandle,
    c: ExprHandle,
) -> [ExprHandle; 2] {
    let two = eng.consts().two;
    let four = eng.int(4);
    let b_sq = eng.pow(b, two);
    let four_ac = eng.mul(&[four, a, c]);
    let neg_four_ac = eng.neg(four_ac);
    let discriminant = eng.add(&[b_sq, neg_four_ac]);
    let radical = eng.sqrt(discriminant);
    let neg_radical = eng.neg(radical);
    let neg_b = eng.neg(b);
    let two_a = eng.mul(&[two, a]);
    let plus_numerator = eng.add(&[neg_b, radical]);
    let minus_numerator = eng.add(&[neg_b, neg_radical]);
    [
        eng.divide(plus_numerator, two_a),
        eng.divide(minus_numerator, two_a),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_order_starts_degenerate() {
        let mut eng = Engine::new();
        let rules = root_rules(&mut eng);
        assert_eq!(rules.rules()[0].id, Some("bare"));
        assert!(rules.len() > 20);
    }

    #[test]
    fn test_conditions_require_placeholder() {
        let mut eng = Engine::new();
        let rules = root_rules(&mut eng);
        // Without an active placeholder nothing may fire.
        let five = eng.int(5);
        let x = eng.symbol("_x");
        let product_raw = eng.mul(&[five, x]);
        let product = eng.canonical(product_raw);
        let results = eng.match_rules(product, &rules, None).unwrap();
        assert!(results.is_empty());
    }
}
