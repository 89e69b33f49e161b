//! Trigonometric simplification rules.

use kanon_core::heads;

use crate::engine::Engine;
use crate::rewrite::Rule;

/// Returns the trigonometric rewrite rules.
pub fn rules(eng: &mut Engine) -> Vec<Rule> {
    let a = eng.wildcard("a");
    let zero = eng.consts.zero;
    let one = eng.consts.one;
    let neg_one = eng.consts.neg_one;
    let two = eng.consts.two;
    let pi = eng.consts.pi;

    let sin_a = eng.function(heads::SIN, &[a]);
    let cos_a = eng.function(heads::COS, &[a]);
    let tan_a = eng.function(heads::TAN, &[a]);

    let sin_zero = eng.function(heads::SIN, &[zero]);
    let cos_zero = eng.function(heads::COS, &[zero]);
    let tan_zero = eng.function(heads::TAN, &[zero]);
    let sin_pi = eng.function(heads::SIN, &[pi]);
    let cos_pi = eng.function(heads::COS, &[pi]);

    let neg_a = eng.neg(a);
    let sin_neg = eng.function(heads::SIN, &[neg_a]);
    let cos_neg = eng.function(heads::COS, &[neg_a]);
    let tan_neg = eng.function(heads::TAN, &[neg_a]);
    let neg_sin = eng.neg(sin_a);
    let neg_tan = eng.neg(tan_a);

    // cos²(a) + sin²(a) = 1, in canonical operand order.
    let sin_sq = eng.pow(sin_a, two);
    let cos_sq = eng.pow(cos_a, two);
    let pythagorean = eng.add(&[cos_sq, sin_sq]);

    vec![
        Rule::new("sin-zero", sin_zero, zero),
        Rule::new("cos-zero", cos_zero, one),
        Rule::new("tan-zero", tan_zero, zero),
        Rule::new("sin-pi", sin_pi, zero),
        Rule::new("cos-pi", cos_pi, neg_one),
        Rule::new("sin-odd", sin_neg, neg_sin),
        Rule::new("cos-even", cos_neg, cos_a),
        Rule::new("tan-odd", tan_neg, neg_tan),
        Rule::new("pythagorean", pythagorean, one),
    ]
}
