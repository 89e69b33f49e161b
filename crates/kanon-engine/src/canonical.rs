//! The canonicalisation pipeline.
//!
//! `canonical` turns a raw tree into the representative of its
//! equivalence class: compound heads resolved, numeric short paths taken,
//! hold policies applied, `Sequence` operands spliced, associative heads
//! flattened, arity and domains checked against the signature,
//! involution and idempotence applied, and commutative operands sorted.
//!
//! The result is memoised per source handle (pure nodes only) and
//! registered as canonical unless it contains an `Error` node or kept a
//! compound head.

use smallvec::SmallVec;

use kanon_core::{heads, ErrorKind, ExprHandle, ExprNode, Head, SymbolId};
use kanon_domain::Domain;

use crate::defs::Signature;
use crate::engine::Engine;

impl Engine {
    /// The canonical form of an expression. Memoised; atoms and `Error`
    /// nodes are their own canonical form.
    pub fn canonical(&mut self, expr: ExprHandle) -> ExprHandle {
        if self.canonical_set.contains(&expr) {
            return expr;
        }
        if let Some(&cached) = self.canonical_memo.get(&expr) {
            return cached;
        }
        let result = self.canonicalize(expr);
        let compound_head = matches!(
            self.node(result),
            ExprNode::Function {
                head: Head::Expr(_),
                ..
            }
        );
        if !compound_head && self.is_valid(result) {
            self.canonical_set.insert(result);
        }
        if self.is_pure(expr) {
            self.canonical_memo.insert(expr, result);
        }
        result
    }

    fn canonicalize(&mut self, expr: ExprHandle) -> ExprHandle {
        match self.node(expr).clone() {
            ExprNode::Number(_)
            | ExprNode::Symbol(_)
            | ExprNode::Str(_)
            | ExprNode::Domain(_)
            | ExprNode::Error { .. } => expr,
            ExprNode::Tensor { dtype, shape, data } => {
                let canonical_data: Vec<ExprHandle> =
                    data.iter().map(|&h| self.canonical(h)).collect();
                self.arena.tensor(dtype, shape, canonical_data)
            }
            ExprNode::Function { head, ops } => self.canonical_function(head, &ops),
        }
    }

    fn canonical_function(&mut self, head: Head, ops: &[ExprHandle]) -> ExprHandle {
        let head_sym = match head {
            Head::Sym(sym) => sym,
            Head::Expr(inner) => {
                let resolved = self.canonical(inner);
                match self.node(resolved).as_symbol() {
                    Some(sym) => sym,
                    None => {
                        // Not resolvable to a name: keep the compound
                        // head; the node stays non-canonical and is
                        // applied at evaluation time.
                        let processed: SmallVec<[ExprHandle; 4]> =
                            ops.iter().map(|&op| self.canonical_operand(op)).collect();
                        return self.arena.apply(Head::Expr(resolved), processed);
                    }
                }
            }
        };

        if let Some(result) = self.numeric_short_path(head_sym, ops) {
            return result;
        }

        let Some(def) = self.function_def(head_sym) else {
            let processed: SmallVec<[ExprHandle; 4]> =
                ops.iter().map(|&op| self.canonical_operand(op)).collect();
            let processed = self.splice_sequences(&processed);
            return self.function(head_sym, &processed);
        };

        // Hold policy decides which operands are canonicalised;
        // ReleaseHold overrides the policy.
        let arity = ops.len();
        let mut processed: SmallVec<[ExprHandle; 4]> = SmallVec::with_capacity(arity);
        for (index, &op) in ops.iter().enumerate() {
            if let Some(released) = self.release_hold(op) {
                processed.push(released);
            } else if def.hold.holds(index, arity) {
                processed.push(op);
            } else {
                processed.push(self.canonical(op));
            }
        }

        if let Some(handler) = def.handlers.canonical.clone() {
            match handler(self, &processed) {
                Ok(Some(result)) => return result,
                Ok(None) => {}
                Err(_) => return self.function(head_sym, ops),
            }
        }

        let mut processed = self.splice_sequences(&processed);
        if def.flags.associative {
            processed = self.flatten_associative(head_sym, &processed);
        }
        let mut processed = self.check_signature(&def.signature, processed);

        if processed.len() == 1 {
            let child = processed[0];
            if self.is_function(child, head_sym) {
                let (_, inner) = self.function_parts(child).expect("function node");
                if def.flags.involution && inner.len() == 1 {
                    return inner[0];
                }
                if def.flags.idempotent {
                    return child;
                }
            }
        }

        if def.flags.commutative {
            self.sort_operands(&mut processed, head_sym == heads::MULTIPLY);
        }
        self.function(head_sym, &processed)
    }

    /// Canonicalises one operand position: `ReleaseHold` wrappers are
    /// stripped and their payload processed regardless of policy.
    pub(crate) fn canonical_operand(&mut self, op: ExprHandle) -> ExprHandle {
        self.release_hold(op)
            .unwrap_or_else(|| self.canonical(op))
    }

    /// If `op` is `ReleaseHold(x)`, canonicalises and returns `x`.
    pub(crate) fn release_hold(&mut self, op: ExprHandle) -> Option<ExprHandle> {
        if !self.is_function(op, heads::RELEASE_HOLD) {
            return None;
        }
        let (_, inner) = self.function_parts(op)?;
        let payload = inner.first().copied()?;
        Some(self.canonical(payload))
    }

    fn numeric_short_path(
        &mut self,
        head_sym: SymbolId,
        ops: &[ExprHandle],
    ) -> Option<ExprHandle> {
        let fixed_arity = match head_sym {
            heads::ADD | heads::MULTIPLY => None,
            heads::NEGATE | heads::SQRT | heads::SQUARE | heads::EXP | heads::LN => Some(1),
            heads::SUBTRACT | heads::DIVIDE | heads::POWER => Some(2),
            _ => return None,
        };

        let mut processed: SmallVec<[ExprHandle; 4]> = ops
            .iter()
            .map(|&op| self.canonical_operand(op))
            .collect();
        processed = self.splice_sequences(&processed);
        let mut processed = self.coerce_numeric(processed);

        if let Some(arity) = fixed_arity {
            if processed.len() != arity {
                while processed.len() < arity {
                    let missing = self.error(ErrorKind::Missing, None);
                    processed.push(missing);
                }
                for op in processed.iter_mut().skip(arity) {
                    *op = self.arena.error(ErrorKind::UnexpectedArgument, Some(*op));
                }
                return Some(self.function(head_sym, &processed));
            }
        }
        if !self.is_valid_ops(&processed) {
            return Some(self.function(head_sym, &processed));
        }

        Some(match head_sym {
            heads::ADD => self.canonical_add(&processed),
            heads::MULTIPLY => self.canonical_mul(&processed),
            heads::NEGATE => self.canonical_negate(processed[0]),
            heads::SUBTRACT => self.canonical_subtract(processed[0], processed[1]),
            heads::DIVIDE => self.canonical_divide(processed[0], processed[1]),
            heads::POWER => self.canonical_power(processed[0], processed[1]),
            heads::SQUARE => {
                let two = self.consts.two;
                self.canonical_power(processed[0], two)
            }
            heads::SQRT => self.canonical_sqrt(processed[0]),
            heads::EXP => self.canonical_exp(processed[0]),
            heads::LN => self.canonical_ln(processed[0]),
            _ => unreachable!("not a numeric head"),
        })
    }

    fn is_valid_ops(&mut self, ops: &[ExprHandle]) -> bool {
        ops.iter().all(|&op| self.is_valid(op))
    }

    /// Wraps operands provably outside the numeric domains in an
    /// `incompatible-domain` error.
    fn coerce_numeric(&mut self, ops: SmallVec<[ExprHandle; 4]>) -> SmallVec<[ExprHandle; 4]> {
        ops.into_iter()
            .map(|op| {
                if self.domain_of(op).narrow(Domain::Numbers) == Domain::Void {
                    self.arena.error(ErrorKind::IncompatibleDomain, Some(op))
                } else {
                    op
                }
            })
            .collect()
    }

    fn flatten_associative(
        &self,
        head_sym: SymbolId,
        ops: &[ExprHandle],
    ) -> SmallVec<[ExprHandle; 4]> {
        let mut out: SmallVec<[ExprHandle; 4]> = SmallVec::new();
        for &op in ops {
            if self.is_function(op, head_sym) {
                let (_, inner) = self.function_parts(op).expect("function node");
                out.extend(inner);
            } else {
                out.push(op);
            }
        }
        out
    }

    fn check_signature(
        &mut self,
        signature: &Signature,
        ops: SmallVec<[ExprHandle; 4]>,
    ) -> SmallVec<[ExprHandle; 4]> {
        let mut out = ops;
        while out.len() < signature.min_arity() {
            let missing = self.error(ErrorKind::Missing, None);
            out.push(missing);
        }
        if let Some(max) = signature.max_arity() {
            for op in out.iter_mut().skip(max) {
                *op = self.arena.error(ErrorKind::UnexpectedArgument, Some(*op));
            }
        }
        for (index, op) in out.iter_mut().enumerate() {
            if matches!(self.arena.node(*op), ExprNode::Error { .. }) {
                continue;
            }
            if let Some(declared) = signature.param_domain(index) {
                if self.domain_of(*op).narrow(declared) == Domain::Void {
                    *op = self.arena.error(ErrorKind::IncompatibleDomain, Some(*op));
                }
            }
        }
        out
    }

    /// The nested-`List` view of a tensor, derived lazily and cached.
    /// Non-tensor input is returned unchanged.
    pub fn tensor_to_list(&mut self, expr: ExprHandle) -> ExprHandle {
        if let Some(&cached) = self.tensor_views.get(&expr) {
            return cached;
        }
        let ExprNode::Tensor { shape, data, .. } = self.node(expr).clone() else {
            return expr;
        };
        let view = self.build_list_view(&shape, &data);
        self.tensor_views.insert(expr, view);
        view
    }

    fn build_list_view(&mut self, shape: &[usize], data: &[ExprHandle]) -> ExprHandle {
        if shape.len() <= 1 || shape[0] == 0 {
            return self.function(heads::LIST, data);
        }
        let stride = data.len() / shape[0];
        let rows: Vec<ExprHandle> = (0..shape[0])
            .map(|row| self.build_list_view(&shape[1..], &data[row * stride..(row + 1) * stride]))
            .collect();
        self.function(heads::LIST, &rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::{FunctionDef, Hold};

    #[test]
    fn test_canonical_idempotent() {
        let mut eng = Engine::new();
        let x = eng.symbol("x");
        let one = eng.int(1);
        let raw = eng.add(&[x, one, one]);
        let c1 = eng.canonical(raw);
        let c2 = eng.canonical(c1);
        assert!(eng.is_same(c1, c2));
        assert_eq!(eng.repr(c1), "Add(2, x)");
    }

    #[test]
    fn test_flatten_nested_add() {
        let mut eng = Engine::new();
        let x = eng.symbol("x");
        let y = eng.symbol("y");
        let one = eng.int(1);
        let inner = eng.add(&[y, one]);
        let outer = eng.add(&[x, inner]);
        let c = eng.canonical(outer);
        assert_eq!(eng.repr(c), "Add(1, x, y)");
    }

    #[test]
    fn test_commutative_sort_with_degree() {
        let mut eng = Engine::new();
        let x = eng.symbol("x");
        let y = eng.symbol("y");
        let z = eng.symbol("z");
        let five = eng.int(5);
        let raw = eng.mul(&[y, x, five, z]);
        let c = eng.canonical(raw);
        assert_eq!(eng.repr(c), "Multiply(5, x, y, z)");
    }

    #[test]
    fn test_sequence_splicing() {
        let mut eng = Engine::new();
        let x = eng.symbol("x");
        let y = eng.symbol("y");
        let seq = eng.function(heads::SEQUENCE, &[x, y]);
        let one = eng.int(1);
        let raw = eng.add(&[seq, one]);
        let c = eng.canonical(raw);
        assert_eq!(eng.repr(c), "Add(1, x, y)");
    }

    #[test]
    fn test_missing_operand_is_error_wrapped() {
        let mut eng = Engine::new();
        let x = eng.symbol("x");
        let raw = eng.function(heads::POWER, &[x]);
        let c = eng.canonical(raw);
        assert!(!eng.is_valid(c));
        assert!(!eng.is_canonical(c));
        assert_eq!(eng.repr(c), "Power(x, Error(missing operand))");
    }

    #[test]
    fn test_string_operand_to_numeric_head() {
        let mut eng = Engine::new();
        let s = eng.string("oops");
        let one = eng.int(1);
        let raw = eng.add(&[one, s]);
        let c = eng.canonical(raw);
        assert!(!eng.is_valid(c));
        assert_eq!(eng.repr(c), "Add(1, Error(incompatible domain, 'oops'))");
    }

    #[test]
    fn test_hold_shields_canonicalisation() {
        let mut eng = Engine::new();
        eng.declare_function("f", FunctionDef::new().hold(Hold::First))
            .unwrap();
        let one = eng.int(1);
        let raw_sum = eng.add(&[one, one]);
        let two_sum = eng.add(&[raw_sum, raw_sum]);
        let f = eng.arena().find_symbol("f").unwrap();
        let call = eng.function(f, &[raw_sum, two_sum]);
        let c = eng.canonical(call);
        let (_, ops) = eng.function_parts(c).unwrap();
        assert_eq!(eng.repr(ops[0]), "Add(1, 1)");
        assert_eq!(eng.repr(ops[1]), "4");
    }

    #[test]
    fn test_release_hold_overrides_policy() {
        let mut eng = Engine::new();
        eng.declare_function("g", FunctionDef::new().hold(Hold::All))
            .unwrap();
        let one = eng.int(1);
        let raw_sum = eng.add(&[one, one]);
        let release = eng.function(heads::RELEASE_HOLD, &[raw_sum]);
        let g = eng.arena().find_symbol("g").unwrap();
        let call = eng.function(g, &[release]);
        let c = eng.canonical(call);
        let (_, ops) = eng.function_parts(c).unwrap();
        assert_eq!(eng.repr(ops[0]), "2");
    }

    #[test]
    fn test_involution() {
        let mut eng = Engine::new();
        let x = eng.symbol("x");
        let inner = eng.neg(x);
        let outer = eng.neg(inner);
        let c = eng.canonical(outer);
        assert!(eng.is_same(c, x));
    }

    #[test]
    fn test_idempotence() {
        let mut eng = Engine::new();
        let x = eng.symbol("x");
        let inner = eng.function(heads::ABS, &[x]);
        let outer = eng.function(heads::ABS, &[inner]);
        let c_outer = eng.canonical(outer);
        let c_inner = eng.canonical(inner);
        assert!(eng.is_same(c_outer, c_inner));
    }

    #[test]
    fn test_tensor_list_view() {
        let mut eng = Engine::new();
        let data: Vec<ExprHandle> = (1..=4).map(|n| eng.int(n)).collect();
        let t = eng.tensor(kanon_core::TensorKind::Number, &[2, 2], data);
        let view = eng.tensor_to_list(t);
        assert_eq!(eng.repr(view), "List(List(1, 2), List(3, 4))");
        // Derived lazily, once.
        let again = eng.tensor_to_list(t);
        assert!(eng.is_same(view, again));
    }
}
