//! The solve pipeline.

use rustc_hash::FxHashMap;

use kanon_core::{heads, ExprHandle, ExprNode, SymbolId};
use kanon_engine::{Engine, EngineResult, RuleSet};

use crate::harmonize::harmonization_rules;
use crate::roots::root_rules;

/// Finds the roots of a univariate expression (or `Equal` equation) in
/// `variable`.
///
/// The unknown is replaced by a reserved placeholder that survives
/// matching verbatim; candidate roots come from the ordered root rule
/// library, with harmonised and expanded forms as fallbacks. Roots are
/// evaluated and deduplicated; an empty list means the rule library
/// cannot solve the equation.
///
/// # Errors
///
/// `Timeout` when the deadline expires mid-search.
pub fn solve(
    eng: &mut Engine,
    expr: ExprHandle,
    variable: SymbolId,
) -> EngineResult<Vec<ExprHandle>> {
    // An equation becomes a difference with root at equality.
    let expr = if eng.is_function(expr, heads::EQUAL) {
        let (_, ops) = eng.function_parts(expr).expect("equation node");
        match ops.as_slice() {
            [lhs, rhs] => {
                let neg_rhs = eng.neg(*rhs);
                eng.add(&[*lhs, neg_rhs])
            }
            _ => expr,
        }
    } else {
        expr
    };

    let simplified = eng.simplify(expr)?;

    let placeholder_name = fresh_placeholder_name(eng, simplified);
    let placeholder = eng.symbol(&placeholder_name);
    let mut map = FxHashMap::default();
    map.insert(variable, placeholder);
    // Raw substitution: the placeholder must survive as-is through
    // matching, not be canonicalised into a rearranged tree.
    let subject = eng.subs_raw(simplified, &map);

    eng.set_solve_placeholder(Some(placeholder));
    let outcome = candidate_roots(eng, subject);
    eng.set_solve_placeholder(None);
    let candidates = outcome?;

    let mut roots = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let root = eng.evaluate(candidate)?;
        if !roots.contains(&root) {
            roots.push(root);
        }
    }
    Ok(roots)
}

fn candidate_roots(eng: &mut Engine, subject: ExprHandle) -> EngineResult<Vec<ExprHandle>> {
    let rules = root_rules(eng);
    let harmonize = harmonization_rules(eng);

    let direct = eng.match_rules(subject, &rules, None)?;
    if !direct.is_empty() {
        return Ok(direct);
    }

    if let Some(found) = try_harmonized(eng, subject, &rules, &harmonize)? {
        return Ok(found);
    }

    let expanded = eng.expand(subject);
    if expanded != subject {
        let direct = eng.match_rules(expanded, &rules, None)?;
        if !direct.is_empty() {
            return Ok(direct);
        }
        if let Some(found) = try_harmonized(eng, expanded, &rules, &harmonize)? {
            return Ok(found);
        }
    }

    Ok(Vec::new())
}

/// Produces harmonised forms of the subject and matches each against the
/// root rules, first branch-splitting at the top level, then rewriting
/// to fixed point.
fn try_harmonized(
    eng: &mut Engine,
    subject: ExprHandle,
    rules: &RuleSet,
    harmonize: &RuleSet,
) -> EngineResult<Option<Vec<ExprHandle>>> {
    let mut forms = eng.match_rules(subject, harmonize, None)?;
    if let Some(rewritten) = eng.replace(subject, harmonize)? {
        if !forms.contains(&rewritten) {
            forms.push(rewritten);
        }
    }
    let mut collected = Vec::new();
    for form in forms {
        let candidates = eng.match_rules(form, rules, None)?;
        collected.extend(candidates);
    }
    Ok((!collected.is_empty()).then_some(collected))
}

/// `_x`, or `_x1`, `_x2`, … when the subject already mentions the
/// preceding name.
fn fresh_placeholder_name(eng: &Engine, expr: ExprHandle) -> String {
    let mut name = String::from("_x");
    let mut counter = 0u32;
    loop {
        let clash = eng
            .arena()
            .find_symbol(&name)
            .and_then(|id| eng.arena().find_node(&ExprNode::Symbol(id)))
            .map_or(false, |handle| eng.contains(expr, handle));
        if !clash {
            return name;
        }
        counter += 1;
        name = format!("_x{counter}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(eng: &mut Engine, name: &str) -> (ExprHandle, SymbolId) {
        let handle = eng.symbol(name);
        let id = eng.arena().find_symbol(name).unwrap();
        (handle, id)
    }

    #[test]
    fn test_linear_root() {
        let mut eng = Engine::new();
        let (x, x_id) = var(&mut eng, "x");
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
    fn test_bare_variable() {
        let mut eng = Engine::new();
        let (x, x_id) = var(&mut eng, "x");
        let roots = solve(&mut eng, x, x_id).unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(eng.repr(roots[0]), "0");
    }

    #[test]
    fn test_placeholder_collision_avoided() {
        let mut eng = Engine::new();
        // The subject already mentions a symbol literally named `_x`.
        let ph_like = eng.symbol("_x");
        let (x, x_id) = var(&mut eng, "x");
        let sum = eng.add(&[x, ph_like]);
        // `_x` is an unknown coefficient-like leftover; the root of
        // x + _x is -_x.
        let roots = solve(&mut eng, sum, x_id).unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(eng.repr(roots[0]), "Negate(_x)");
    }

    #[test]
    fn test_logarithmic_equation() {
        // 2·ln(x) - 4 = 0 unwraps to x - e² = 0.
        let mut eng = Engine::new();
        let (x, x_id) = var(&mut eng, "x");
        let two = eng.int(2);
        let four = eng.int(4);
        let ln = eng.function(heads::LN, &[x]);
        let scaled = eng.mul(&[two, ln]);
        let neg_four = eng.neg(four);
        let lhs = eng.add(&[scaled, neg_four]);
        let roots = solve(&mut eng, lhs, x_id).unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(eng.repr(roots[0]), "Exp(2)");
    }

    #[test]
    fn test_bare_logarithm() {
        // ln(x) = 0 at x = 1.
        let mut eng = Engine::new();
        let (x, x_id) = var(&mut eng, "x");
        let ln = eng.function(heads::LN, &[x]);
        let roots = solve(&mut eng, ln, x_id).unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(eng.repr(roots[0]), "1");
    }

    #[test]
    fn test_reciprocal_diverges() {
        let mut eng = Engine::new();
        let (x, x_id) = var(&mut eng, "x");
        let three = eng.int(3);
        let recip = eng.divide(three, x);
        let one = eng.int(1);
        let shifted = eng.add(&[recip, one]);
        let roots = solve(&mut eng, shifted, x_id).unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(eng.repr(roots[0]), "inf");
    }
}
