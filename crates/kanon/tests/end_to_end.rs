//! End-to-end scenarios across the whole engine: canonicalisation,
//! evaluation, rewriting, and solving.

use kanon::prelude::*;
use kanon_engine::Limits;

fn engine() -> Engine {
    Engine::new()
}

fn machine_engine() -> Engine {
    Engine::with_config(EngineConfig {
        numeric_mode: NumericMode::Machine,
        ..EngineConfig::default()
    })
}

fn variable(eng: &mut Engine, name: &str) -> (ExprHandle, kanon_core::SymbolId) {
    let handle = eng.symbol(name);
    let id = eng.arena().find_symbol(name).unwrap();
    (handle, id)
}

#[test]
fn linear_root() {
    let mut eng = engine();
    let (x, x_id) = variable(&mut eng, "x");
    let five = eng.int(5);
    let ten = eng.int(10);
    let five_x = eng.mul(&[five, x]);
    let neg_ten = eng.neg(ten);
    let lhs = eng.add(&[five_x, neg_ten]);
    let zero = eng.int(0);
    let equation = eng.equal(lhs, zero);

    let roots = solve(&mut eng, equation, x_id).unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(eng.repr(roots[0]), "2");
}

#[test]
fn quadratic_with_negative_discriminant() {
    let mut eng = engine();
    let (x, x_id) = variable(&mut eng, "x");
    let two = eng.int(2);
    let one = eng.int(1);
    let x_sq = eng.pow(x, two);
    let lhs = eng.add(&[x_sq, one]);
    let zero = eng.int(0);
    let equation = eng.equal(lhs, zero);

    let roots = solve(&mut eng, equation, x_id).unwrap();
    assert_eq!(roots.len(), 1);
    let value = eng.node(roots[0]).as_number().unwrap().clone();
    assert!(value.approx_eq(&NumericValue::Complex(Complex::i()), 1e-10));
}

#[test]
fn quadratic_with_real_roots() {
    let mut eng = engine();
    let (x, x_id) = variable(&mut eng, "x");
    let two = eng.int(2);
    let six = eng.int(6);
    let four = eng.int(4);
    let x_sq = eng.pow(x, two);
    let two_x_sq = eng.mul(&[two, x_sq]);
    let six_x = eng.mul(&[six, x]);
    let lhs = eng.add(&[two_x_sq, six_x, four]);

    let mut roots = solve(&mut eng, lhs, x_id)
        .unwrap()
        .iter()
        .map(|&r| eng.node(r).as_number().unwrap().to_f64())
        .collect::<Vec<_>>();
    roots.sort_by(f64::total_cmp);
    assert_eq!(roots.len(), 2);
    assert!((roots[0] - -2.0).abs() < 1e-10);
    assert!((roots[1] - -1.0).abs() < 1e-10);
}

#[test]
fn fractional_equation() {
    // (2/3)·x + 1/3 = 5 has the root 7.
    let mut eng = engine();
    let (x, x_id) = variable(&mut eng, "x");
    let two_thirds = eng.rational(2, 3);
    let third = eng.rational(1, 3);
    let five = eng.int(5);
    let scaled = eng.mul(&[two_thirds, x]);
    let lhs = eng.add(&[scaled, third]);
    let equation = eng.equal(lhs, five);

    let roots = solve(&mut eng, equation, x_id).unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(eng.repr(roots[0]), "7");
}

#[test]
fn quasi_quadratic_is_unsolvable() {
    // x² + 3x + 2 + sin(x) defeats the rule library.
    let mut eng = engine();
    let (x, x_id) = variable(&mut eng, "x");
    let two = eng.int(2);
    let three = eng.int(3);
    let x_sq = eng.pow(x, two);
    let three_x = eng.mul(&[three, x]);
    let sin_x = eng.function(heads::SIN, &[x]);
    let lhs = eng.add(&[x_sq, three_x, two, sin_x]);

    let roots = solve(&mut eng, lhs, x_id).unwrap();
    assert!(roots.is_empty());
}

#[test]
fn commutative_factors_order() {
    let mut eng = engine();
    let x = eng.symbol("x");
    let y = eng.symbol("y");
    let z = eng.symbol("z");
    let five = eng.int(5);
    let product = eng.mul(&[y, x, five, z]);
    let canonical = eng.canonical(product);
    assert_eq!(eng.repr(canonical), "Multiply(5, x, y, z)");
}

#[test]
fn hold_first_shields_the_first_operand() {
    let mut eng = engine();
    eng.declare_function("f", FunctionDef::new().hold(Hold::First))
        .unwrap();
    let one = eng.int(1);
    let two = eng.int(2);
    let left = eng.add(&[one, one]);
    let right = eng.add(&[two, two]);
    let f = eng.arena().find_symbol("f").unwrap();
    let call = eng.function(f, &[left, right]);

    let result = eng.evaluate(call).unwrap();
    let (_, ops) = eng.function_parts(result).unwrap();
    assert_eq!(eng.repr(ops[0]), "Add(1, 1)");
    assert_eq!(eng.repr(ops[1]), "4");
}

#[test]
fn threading_exp_over_list() {
    let mut eng = machine_engine();
    let zero = eng.int(0);
    let one = eng.int(1);
    let items = eng.list(&[zero, one]);
    let call = eng.function(heads::EXP, &[items]);

    let result = eng.n(call).unwrap();
    assert_eq!(eng.head_sym(result), Some(heads::LIST));
    let (_, ops) = eng.function_parts(result).unwrap();
    assert_eq!(ops.len(), 2);
    let first = eng.node(ops[0]).as_number().unwrap().to_f64();
    let second = eng.node(ops[1]).as_number().unwrap().to_f64();
    assert!((first - 1.0).abs() < 1e-10);
    assert!((second - std::f64::consts::E).abs() < 1e-10);
}

#[test]
fn conditional_rule_annihilates_product() {
    let mut eng = engine();
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
    let product = eng.mul(&[five, x]);
    let subject = eng.canonical(product);
    let result = eng.replace(subject, &rules).unwrap().unwrap();
    assert_eq!(eng.repr(result), "0");
}

#[test]
fn complex_quadratic_roots() {
    // x² + 2x + 5 = 0 has the roots -1 ± 2i.
    let mut eng = engine();
    let (x, x_id) = variable(&mut eng, "x");
    let two = eng.int(2);
    let five = eng.int(5);
    let x_sq = eng.pow(x, two);
    let two_x = eng.mul(&[two, x]);
    let lhs = eng.add(&[x_sq, two_x, five]);

    let roots = solve(&mut eng, lhs, x_id).unwrap();
    assert_eq!(roots.len(), 2);
    let values: Vec<Complex> = roots
        .iter()
        .map(|&r| eng.node(r).as_number().unwrap().as_complex())
        .collect();
    assert!(values
        .iter()
        .any(|z| z.approx_eq(&Complex::new(-1.0, 2.0), 1e-10)));
    assert!(values
        .iter()
        .any(|z| z.approx_eq(&Complex::new(-1.0, -2.0), 1e-10)));
}

#[test]
fn invalid_expression_evaluates_to_nan() {
    let mut eng = engine();
    let x = eng.symbol("x");
    // Power with a missing exponent carries an in-band error.
    let truncated = eng.function(heads::POWER, &[x]);
    let canonical = eng.canonical(truncated);
    assert!(!eng.is_valid(canonical));
    assert!(!eng.is_canonical(canonical));

    let numeric = eng.n(canonical).unwrap();
    assert!(eng.node(numeric).as_number().unwrap().is_nan());

    // Pattern matching against an invalid subject always fails.
    let w = eng.wildcard("a");
    assert!(eng.match_pattern(canonical, w, None).is_none());
}

#[test]
fn expired_deadline_aborts() {
    let mut eng = engine();
    eng.set_limits(Limits {
        time_limit: Some(std::time::Duration::ZERO),
        ..Limits::default()
    });
    let x = eng.symbol("x");
    let sum = eng.add(&[x, x]);
    let result = eng.simplify(sum);
    assert!(matches!(result, Err(EngineError::Timeout(_))));
}

#[test]
fn precision_change_flushes_numeric_caches() {
    let mut eng = engine();
    let pi = eng.symbol("Pi");
    let big = eng.n(pi).unwrap();
    assert!(matches!(
        eng.node(big).as_number().unwrap(),
        NumericValue::Decimal(_)
    ));

    eng.set_precision(10); // clamps to machine precision
    let small = eng.n(pi).unwrap();
    assert!(matches!(
        eng.node(small).as_number().unwrap(),
        NumericValue::Machine(_)
    ));
}

#[test]
fn tensor_and_list_view_agree() {
    let mut eng = engine();
    let data: Vec<ExprHandle> = (1..=6).map(|n| eng.int(n)).collect();
    let tensor = eng.tensor(TensorKind::Number, &[2, 3], data);
    let view = eng.tensor_to_list(tensor);
    assert_eq!(eng.repr(view), "List(List(1, 2, 3), List(4, 5, 6))");
    assert_eq!(eng.collection_len(tensor), Some(2));
}

#[test]
fn substitution_and_equality() {
    let mut eng = engine();
    let x = eng.symbol("x");
    let x_id = eng.arena().find_symbol("x").unwrap();
    let one = eng.int(1);
    let sum = eng.add(&[x, one]);

    let three = eng.int(3);
    let mut map = rustc_hash::FxHashMap::default();
    map.insert(x_id, three);
    let substituted = eng.subs(sum, &map);
    assert_eq!(eng.repr(substituted), "4");

    let half = eng.rational(1, 2);
    let half_machine = eng.machine(0.5);
    assert!(eng.is_equal(half, half_machine).unwrap());
    assert!(!eng.is_same(half, half_machine));
}

#[test]
fn sign_inference() {
    let mut eng = engine();
    let neg_three = eng.int(-3);
    assert_eq!(eng.sgn(neg_three), Sign::Negative);

    let id = eng.declare_symbol("p", SymbolDef::default()).unwrap();
    eng.assume_sign(id, Sign::Positive);
    let p = eng.sym(id);
    let two = eng.int(2);
    let product = eng.mul(&[two, p]);
    assert_eq!(eng.sgn(product), Sign::Positive);
    let neg = eng.neg(p);
    assert_eq!(eng.sgn(neg), Sign::Negative);

    let i = eng.complex(0.0, 1.0);
    assert_eq!(eng.sgn(i), Sign::NonReal);
}
