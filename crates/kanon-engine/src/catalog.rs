//! The standard identifier catalog.
//!
//! Registers the well-known heads with their flags, hold policies,
//! complexities and handlers, plus the named constants. The engine
//! installs this catalog at construction unless a replacement library is
//! supplied.

use kanon_core::ExprHandle;
use kanon_domain::Domain;
use kanon_number::NumericValue;

use crate::defs::{FunctionDef, Hold, Signature, SymbolDef};
use crate::engine::Engine;
use crate::sign::Sign;

/// Installs the standard catalog into the engine's root scope.
///
/// # Panics
///
/// Never in practice: every registered name satisfies the identifier
/// grammar and the root scope starts empty.
pub fn standard_catalog(eng: &mut Engine) {
    register_arithmetic(eng);
    register_elementary(eng);
    register_structural(eng);
    register_constants(eng);
}

fn register_arithmetic(eng: &mut Engine) {
    eng.declare_function(
        "Add",
        FunctionDef::new()
            .signature(Signature::variadic_numeric())
            .associative()
            .commutative()
            .threadable()
            .complexity(2)
            .on_sgn(sum_sign),
    )
    .expect("catalog");

    eng.declare_function(
        "Multiply",
        FunctionDef::new()
            .signature(Signature::variadic_numeric())
            .associative()
            .commutative()
            .threadable()
            .complexity(2)
            .on_sgn(product_sign),
    )
    .expect("catalog");

    eng.declare_function(
        "Negate",
        FunctionDef::new()
            .signature(Signature::numeric(1))
            .involution()
            .threadable()
            .complexity(1)
            .on_sgn(|eng, ops| ops.first().map(|&op| eng.sgn(op).negate())),
    )
    .expect("catalog");

    eng.declare_function(
        "Subtract",
        FunctionDef::new()
            .signature(Signature::numeric(2))
            .threadable()
            .complexity(2),
    )
    .expect("catalog");

    eng.declare_function(
        "Divide",
        FunctionDef::new()
            .signature(Signature::numeric(2))
            .threadable()
            .complexity(3)
            .on_sgn(|eng, ops| match ops {
                [num, den] => Some(eng.sgn(*num).product(eng.sgn(*den))),
                _ => None,
            }),
    )
    .expect("catalog");

    eng.declare_function(
        "Power",
        FunctionDef::new()
            .signature(Signature::numeric(2))
            .threadable()
            .complexity(2)
            .on_sgn(power_sign),
    )
    .expect("catalog");

    eng.declare_function(
        "Square",
        FunctionDef::new()
            .signature(Signature::numeric(1))
            .threadable()
            .complexity(2),
    )
    .expect("catalog");
}

fn register_elementary(eng: &mut Engine) {
    eng.declare_function(
        "Sqrt",
        FunctionDef::new()
            .signature(Signature::numeric(1))
            .threadable()
            .complexity(3)
            .on_sgn(|eng, ops| {
                ops.first().map(|&op| match eng.sgn(op) {
                    Sign::Positive => Sign::Positive,
                    Sign::Zero => Sign::Zero,
                    Sign::Negative => Sign::NonReal,
                    other => other,
                })
            }),
    )
    .expect("catalog");

    eng.declare_function(
        "Exp",
        FunctionDef::new()
            .signature(Signature::numeric(1))
            .threadable()
            .complexity(4)
            .on_sgn(|eng, ops| {
                ops.first().map(|&op| match eng.sgn(op) {
                    Sign::NonReal => Sign::NonReal,
                    Sign::Unknown => Sign::Unknown,
                    _ => Sign::Positive,
                })
            }),
    )
    .expect("catalog");

    eng.declare_function(
        "Ln",
        FunctionDef::new()
            .signature(Signature::numeric(1))
            .threadable()
            .complexity(4),
    )
    .expect("catalog");

    for name in ["Sin", "Cos", "Tan"] {
        eng.declare_function(
            name,
            FunctionDef::new()
                .signature(Signature::numeric(1))
                .threadable()
                .complexity(6),
        )
        .expect("catalog");
    }

    eng.declare_function(
        "Abs",
        FunctionDef::new()
            .signature(Signature::numeric(1))
            .idempotent()
            .threadable()
            .complexity(2)
            .on_sgn(|eng, ops| {
                ops.first().map(|&op| match eng.sgn(op) {
                    Sign::Zero => Sign::Zero,
                    Sign::Positive | Sign::Negative | Sign::NonReal => Sign::Positive,
                    Sign::Unknown => Sign::Unknown,
                })
            }),
    )
    .expect("catalog");

    for name in ["Integrate", "NIntegrate", "Limit", "NLimit"] {
        eng.declare_function(name, FunctionDef::new().complexity(8))
            .expect("catalog");
    }
}

fn register_structural(eng: &mut Engine) {
    eng.declare_function(
        "List",
        FunctionDef::new()
            .complexity(1)
            .on_size(|_, ops| Some(ops.len())),
    )
    .expect("catalog");

    eng.declare_function(
        "Set",
        FunctionDef::new()
            .commutative()
            .complexity(1)
            .on_size(|_, ops| Some(ops.len())),
    )
    .expect("catalog");

    eng.declare_function("Sequence", FunctionDef::new().complexity(1))
        .expect("catalog");

    eng.declare_function(
        "Range",
        FunctionDef::new()
            .signature(Signature {
                params: vec![Domain::Numbers, Domain::Numbers],
                variadic: Some(Domain::Numbers),
                result: Domain::Anything,
            })
            .complexity(1)
            .on_size(range_len),
    )
    .expect("catalog");

    eng.declare_function("Hold", FunctionDef::new().hold(Hold::All).complexity(1))
        .expect("catalog");
    eng.declare_function("ReleaseHold", FunctionDef::new().complexity(1))
        .expect("catalog");
    eng.declare_function("Equal", FunctionDef::new().complexity(2))
        .expect("catalog");
    eng.declare_function("Function", FunctionDef::new().hold(Hold::All).complexity(2))
        .expect("catalog");
}

fn register_constants(eng: &mut Engine) {
    eng.declare_symbol("Pi", SymbolDef::constant(Domain::RealNumbers, None))
        .expect("catalog");
    eng.declare_symbol(
        "ExponentialE",
        SymbolDef::constant(Domain::RealNumbers, None),
    )
    .expect("catalog");
    eng.declare_symbol(
        "ImaginaryUnit",
        SymbolDef::constant(Domain::ImaginaryNumbers, None),
    )
    .expect("catalog");
    eng.declare_symbol(
        "PositiveInfinity",
        SymbolDef::constant(Domain::ExtendedRealNumbers, None),
    )
    .expect("catalog");
    eng.declare_symbol(
        "NegativeInfinity",
        SymbolDef::constant(Domain::ExtendedRealNumbers, None),
    )
    .expect("catalog");
    eng.declare_symbol("NotANumber", SymbolDef::constant(Domain::Numbers, None))
        .expect("catalog");
    eng.declare_symbol("True", SymbolDef::constant(Domain::Booleans, None))
        .expect("catalog");
    eng.declare_symbol("False", SymbolDef::constant(Domain::Booleans, None))
        .expect("catalog");
}

fn sum_sign(eng: &mut Engine, ops: &[ExprHandle]) -> Option<Sign> {
    let mut acc = Sign::Zero;
    for &op in ops {
        let sign = eng.sgn(op);
        acc = match (acc, sign) {
            (_, Sign::NonReal) | (Sign::NonReal, _) => return Some(Sign::NonReal),
            (_, Sign::Unknown) | (Sign::Unknown, _) => return None,
            (Sign::Zero, s) | (s, Sign::Zero) => s,
            (a, b) if a == b => a,
            _ => return None,
        };
    }
    Some(acc)
}

fn product_sign(eng: &mut Engine, ops: &[ExprHandle]) -> Option<Sign> {
    let mut acc = Sign::Positive;
    for &op in ops {
        acc = acc.product(eng.sgn(op));
        if acc == Sign::Unknown {
            return None;
        }
    }
    Some(acc)
}

fn power_sign(eng: &mut Engine, ops: &[ExprHandle]) -> Option<Sign> {
    let [base, exp] = ops else { return None };
    let base_sign = eng.sgn(*base);
    if base_sign == Sign::Positive {
        return Some(Sign::Positive);
    }
    let even_exponent = eng
        .node(*exp)
        .as_number()
        .and_then(NumericValue::as_i64)
        .map_or(false, |n| n % 2 == 0);
    if even_exponent {
        return match base_sign {
            Sign::Negative => Some(Sign::Positive),
            Sign::Zero => Some(Sign::Zero),
            _ => None,
        };
    }
    None
}

fn range_len(eng: &Engine, ops: &[ExprHandle]) -> Option<usize> {
    let first = eng.node(*ops.first()?).as_number()?.to_f64();
    let last = eng.node(*ops.get(1)?).as_number()?.to_f64();
    let step = match ops.get(2) {
        Some(&s) => eng.node(s).as_number()?.to_f64(),
        None => 1.0,
    };
    if step == 0.0 || !step.is_finite() {
        return None;
    }
    let count = ((last - first) / step).floor() + 1.0;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    (count.is_finite() && count >= 0.0).then(|| count as usize)
}
