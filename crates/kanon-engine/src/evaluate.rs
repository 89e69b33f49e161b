//! The evaluate and N passes.
//!
//! `evaluate` resolves to canonical form, threads threadable heads over
//! indexable collections, processes operands under the hold policy,
//! applies inert heads and compound (anonymous-function) heads, consults
//! the registered handlers, and reconstructs with evaluated operands. In
//! numeric mode it additionally falls back to the numeric kernel and
//! applies the complex/bignum post-filter. `N` is `evaluate` in numeric
//! mode, with `Integrate` and `Limit` rewritten to their numeric
//! counterparts before descent.

use smallvec::SmallVec;

use kanon_core::{heads, ErrorKind, ExprHandle, ExprNode, Head, SymbolId};
use kanon_number::NumericValue;

use crate::defs::FunctionDef;
use crate::engine::Engine;
use crate::error::EngineResult;
use crate::scope::{is_wildcard, wildcard_key};

impl Engine {
    /// Evaluates an expression.
    ///
    /// # Errors
    ///
    /// `Timeout` when the deadline expires; `RecursionLimit` from nested
    /// handler scopes.
    pub fn evaluate(&mut self, expr: ExprHandle) -> EngineResult<ExprHandle> {
        self.with_deadline(|eng| eng.eval_with(expr, false))
    }

    /// Numeric approximation: `evaluate` in numeric mode.
    ///
    /// # Errors
    ///
    /// `Timeout` when the deadline expires.
    pub fn n(&mut self, expr: ExprHandle) -> EngineResult<ExprHandle> {
        self.with_deadline(|eng| eng.eval_with(expr, true))
    }

    pub(crate) fn eval_with(&mut self, expr: ExprHandle, numeric: bool) -> EngineResult<ExprHandle> {
        self.should_continue()?;
        let expr = self.canonical(expr);
        if numeric && !self.is_valid(expr) {
            return Ok(self.consts.nan);
        }
        match self.node(expr).clone() {
            ExprNode::Number(value) => Ok(self.post_filter(expr, &value, numeric)),
            ExprNode::Str(_) | ExprNode::Domain(_) | ExprNode::Error { .. } => Ok(expr),
            ExprNode::Symbol(id) => self.eval_symbol(expr, id, numeric),
            ExprNode::Tensor { dtype, shape, data } => {
                let mut evaluated = Vec::with_capacity(data.len());
                for &h in &data {
                    evaluated.push(self.eval_with(h, numeric)?);
                }
                Ok(self.arena.tensor(dtype, shape, evaluated))
            }
            ExprNode::Function { head, ops } => self.eval_function(expr, head, &ops, numeric),
        }
    }

    fn eval_symbol(
        &mut self,
        expr: ExprHandle,
        id: SymbolId,
        numeric: bool,
    ) -> EngineResult<ExprHandle> {
        if let Some(value) = self.symbol_def(id).and_then(|def| def.value) {
            return self.eval_with(value, numeric);
        }
        if numeric {
            if let Some(value) = self.numeric_value(expr) {
                let literal = self.num(value.clone());
                return Ok(self.post_filter(literal, &value, numeric));
            }
        }
        Ok(expr)
    }

    fn eval_function(
        &mut self,
        expr: ExprHandle,
        head: Head,
        ops: &[ExprHandle],
        numeric: bool,
    ) -> EngineResult<ExprHandle> {
        let sym = match head {
            Head::Expr(anonymous) => return self.apply_anonymous(anonymous, ops, numeric),
            Head::Sym(sym) => sym,
        };

        // Numeric-mode rewrites ahead of descent.
        if numeric {
            if let Some(rewritten) = self.numeric_alias(sym) {
                let replacement = self.function(rewritten, ops);
                return self.eval_with(replacement, numeric);
            }
        }

        let def = self.function_def(sym);

        if let Some(def) = &def {
            if def.flags.threadable {
                if let Some(threaded) = self.thread_over(sym, ops, numeric)? {
                    return Ok(threaded);
                }
            }
        }

        let processed = self.eval_operands(def.as_ref(), ops, numeric)?;

        if let Some(def) = &def {
            if def.flags.inert {
                return Ok(processed.first().copied().unwrap_or(expr));
            }
            if let Some(handler) = def.handlers.evaluate.clone() {
                if let Some(result) = handler(self, &processed)? {
                    return Ok(self.canonical(result));
                }
            }
            if numeric {
                if let Some(handler) = def.handlers.n.clone() {
                    if let Some(result) = handler(self, &processed)? {
                        return Ok(self.canonical(result));
                    }
                }
            }
        }

        let rebuilt_raw = self.function(sym, &processed);
        let rebuilt = self.canonical(rebuilt_raw);
        if numeric {
            if let Some(value) = self.numeric_value(rebuilt) {
                let literal = self.num(value.clone());
                return Ok(self.post_filter(literal, &value, numeric));
            }
        }
        if let Some(value) = self.node(rebuilt).as_number().cloned() {
            return Ok(self.post_filter(rebuilt, &value, numeric));
        }
        Ok(rebuilt)
    }

    fn numeric_alias(&self, sym: SymbolId) -> Option<SymbolId> {
        match sym {
            heads::INTEGRATE => Some(heads::N_INTEGRATE),
            heads::LIMIT => Some(heads::N_LIMIT),
            _ => None,
        }
    }

    /// Evaluates operands under the hold policy. `Hold(x)` operands are
    /// always skipped; `ReleaseHold(x)` operands are always processed and
    /// unwrapped.
    fn eval_operands(
        &mut self,
        def: Option<&FunctionDef>,
        ops: &[ExprHandle],
        numeric: bool,
    ) -> EngineResult<SmallVec<[ExprHandle; 4]>> {
        let arity = ops.len();
        let mut out: SmallVec<[ExprHandle; 4]> = SmallVec::with_capacity(arity);
        for (index, &op) in ops.iter().enumerate() {
            if self.is_function(op, heads::HOLD) {
                out.push(op);
                continue;
            }
            if let Some(released) = self.release_hold(op) {
                out.push(self.eval_with(released, numeric)?);
                continue;
            }
            let held = def.map_or(false, |d| d.hold.holds(index, arity));
            if held {
                out.push(op);
            } else {
                out.push(self.eval_with(op, numeric)?);
            }
        }
        Ok(out)
    }

    /// Zips a threadable head over its indexable operands: the longest
    /// collection drives, scalars broadcast, and each tuple is evaluated
    /// recursively. A single tuple collapses to its element; an empty
    /// zip yields an empty `Sequence`.
    fn thread_over(
        &mut self,
        sym: SymbolId,
        ops: &[ExprHandle],
        numeric: bool,
    ) -> EngineResult<Option<ExprHandle>> {
        let lengths: Vec<Option<usize>> = ops.iter().map(|&op| self.collection_len(op)).collect();
        let Some(longest) = lengths.iter().flatten().copied().max() else {
            return Ok(None);
        };
        let mut results = Vec::with_capacity(longest);
        for index in 0..longest {
            self.should_continue()?;
            let mut elements: SmallVec<[ExprHandle; 4]> = SmallVec::with_capacity(ops.len());
            for (&op, &len) in ops.iter().zip(lengths.iter()) {
                let element = match len {
                    Some(len) => self
                        .collection_at(op, index.min(len.saturating_sub(1)))
                        .unwrap_or(op),
                    None => op,
                };
                elements.push(element);
            }
            let call = self.function(sym, &elements);
            results.push(self.eval_with(call, numeric)?);
        }
        Ok(Some(match results.len() {
            0 => self.function(heads::SEQUENCE, &[]),
            1 => results[0],
            _ => self.list(&results),
        }))
    }

    /// Applies a function-valued head: `Function(body, params…)` heads
    /// substitute evaluated operands for declared parameters, or for the
    /// implicit wildcards `_`, `_1`, `_2`, … when no parameters are
    /// declared.
    fn apply_anonymous(
        &mut self,
        head_expr: ExprHandle,
        ops: &[ExprHandle],
        numeric: bool,
    ) -> EngineResult<ExprHandle> {
        if matches!(self.node(head_expr), ExprNode::Error { .. }) {
            return Ok(self.error(ErrorKind::UnexpectedCommand, Some(head_expr)));
        }
        let mut evaluated: SmallVec<[ExprHandle; 4]> = SmallVec::with_capacity(ops.len());
        for &op in ops {
            evaluated.push(self.eval_with(op, numeric)?);
        }

        if !self.is_function(head_expr, heads::FUNCTION) {
            // Not a function constructor: leave the application in place
            // with evaluated operands.
            let rebuilt = self.arena.apply(Head::Expr(head_expr), evaluated);
            return Ok(rebuilt);
        }
        let (_, parts) = self.function_parts(head_expr).expect("function node");
        let Some((&body, params)) = parts.split_first() else {
            return Ok(self.error(ErrorKind::Missing, Some(head_expr)));
        };

        let mut map = rustc_hash::FxHashMap::default();
        if params.is_empty() {
            self.collect_implicit_params(body, &evaluated, &mut map);
        } else {
            for (param, &arg) in params.iter().zip(evaluated.iter()) {
                if let Some(id) = self.node(*param).as_symbol() {
                    map.insert(id, arg);
                }
            }
        }
        let substituted = self.subs_raw(body, &map);
        self.with_scope(|eng| eng.eval_with(substituted, numeric))
    }

    /// Finds `_`, `_1`, `_2`, … in a body and maps them to positional
    /// arguments (`_` is `_1`).
    fn collect_implicit_params(
        &mut self,
        body: ExprHandle,
        args: &[ExprHandle],
        map: &mut rustc_hash::FxHashMap<SymbolId, ExprHandle>,
    ) {
        if let Some(id) = self.node(body).as_symbol() {
            let name = self.arena.symbol_name(id);
            if is_wildcard(name) {
                let key = wildcard_key(name);
                let position = if key.is_empty() {
                    Some(0)
                } else {
                    key.parse::<usize>().ok().map(|n| n.saturating_sub(1))
                };
                if let Some(position) = position {
                    if let Some(&arg) = args.get(position) {
                        map.insert(id, arg);
                    }
                }
            }
            return;
        }
        for child in self.node(body).children() {
            self.collect_implicit_params(child, args, map);
        }
    }

    /// The numeric-mode result filter: complex results are NaN when the
    /// mode disallows them, and decimals downcast to machine doubles when
    /// decimals are not preferred.
    fn post_filter(&mut self, expr: ExprHandle, value: &NumericValue, numeric: bool) -> ExprHandle {
        if !numeric {
            return expr;
        }
        if !self.config.allows_complex() && !value.is_real() {
            return self.consts.nan;
        }
        if !self.config.prefers_bignum() {
            if let NumericValue::Decimal(_) = value {
                return self.num(value.clone().downcast());
            }
        }
        expr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::{FunctionDef, Hold};

    #[test]
    fn test_hold_first_policy() {
        let mut eng = Engine::new();
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
    fn test_hold_wrapper_always_skipped() {
        let mut eng = Engine::new();
        eng.declare_function("f", FunctionDef::new()).unwrap();
        let one = eng.int(1);
        let sum = eng.add(&[one, one]);
        let held = eng.function(heads::HOLD, &[sum]);
        let f = eng.arena().find_symbol("f").unwrap();
        let call = eng.function(f, &[held]);
        let result = eng.evaluate(call).unwrap();
        let (_, ops) = eng.function_parts(result).unwrap();
        assert_eq!(eng.repr(ops[0]), "Hold(Add(1, 1))");
    }

    #[test]
    fn test_threading_over_list() {
        let mut eng = Engine::new();
        let zero = eng.int(0);
        let one = eng.int(1);
        let items = eng.list(&[zero, one]);
        let call = eng.function(heads::EXP, &[items]);
        let result = eng.evaluate(call).unwrap();
        assert_eq!(eng.repr(result), "List(1, ExponentialE)");
    }

    #[test]
    fn test_threading_broadcasts_scalars() {
        let mut eng = Engine::new();
        let one = eng.int(1);
        let two = eng.int(2);
        let ten = eng.int(10);
        let items = eng.list(&[one, two]);
        let call = eng.add(&[items, ten]);
        let result = eng.evaluate(call).unwrap();
        assert_eq!(eng.repr(result), "List(11, 12)");
    }

    #[test]
    fn test_inert_head() {
        let mut eng = Engine::new();
        eng.declare_function("opaque", FunctionDef::new().inert())
            .unwrap();
        let x = eng.symbol("x");
        let y = eng.symbol("y");
        let id = eng.arena().find_symbol("opaque").unwrap();
        let call = eng.function(id, &[x, y]);
        let result = eng.evaluate(call).unwrap();
        assert!(eng.is_same(result, x));
    }

    #[test]
    fn test_anonymous_application_positional() {
        let mut eng = Engine::new();
        // Function(Add(a, b), a, b) applied to (1, 2).
        let a = eng.symbol("a");
        let b = eng.symbol("b");
        let body = eng.add(&[a, b]);
        let lambda = eng.function(heads::FUNCTION, &[body, a, b]);
        let one = eng.int(1);
        let two = eng.int(2);
        let call = eng.apply(Head::Expr(lambda), &[one, two]);
        let result = eng.evaluate(call).unwrap();
        assert_eq!(eng.repr(result), "3");
    }

    #[test]
    fn test_anonymous_application_implicit() {
        let mut eng = Engine::new();
        // Function(Multiply(_, _2)) applied to (3, 4).
        let slot1 = eng.symbol("_");
        let slot2 = eng.symbol("_2");
        let body = eng.mul(&[slot1, slot2]);
        let lambda = eng.function(heads::FUNCTION, &[body]);
        let three = eng.int(3);
        let four = eng.int(4);
        let call = eng.apply(Head::Expr(lambda), &[three, four]);
        let result = eng.evaluate(call).unwrap();
        assert_eq!(eng.repr(result), "12");
    }

    #[test]
    fn test_symbol_value_resolution() {
        let mut eng = Engine::new();
        let forty_two = eng.int(42);
        eng.declare_symbol(
            "answer",
            crate::defs::SymbolDef {
                value: Some(forty_two),
                ..crate::defs::SymbolDef::default()
            },
        )
        .unwrap();
        let sym = eng.symbol("answer");
        let result = eng.evaluate(sym).unwrap();
        assert_eq!(eng.repr(result), "42");
    }

    #[test]
    fn test_n_of_pi() {
        let mut eng = Engine::with_config(crate::config::EngineConfig {
            numeric_mode: crate::config::NumericMode::Machine,
            ..crate::config::EngineConfig::default()
        });
        let pi = eng.consts.pi;
        let result = eng.n(pi).unwrap();
        let value = eng.node(result).as_number().unwrap().to_f64();
        assert!((value - std::f64::consts::PI).abs() < 1e-15);
    }

    #[test]
    fn test_n_rewrites_integrate() {
        let mut eng = Engine::new();
        let x = eng.symbol("x");
        let integral = eng.function(heads::INTEGRATE, &[x, x]);
        let result = eng.n(integral).unwrap();
        assert_eq!(eng.head_sym(result), Some(heads::N_INTEGRATE));
    }
}
