//! Structural pattern matching.
//!
//! A pattern is an ordinary expression in which symbols whose name starts
//! with an underscore act as capture variables (`_x` and `__x` share the
//! capture key `x`; a bare `_` matches without binding). Matching is
//! structural, not mathematical: `Add(1, x)` does not match `Add(x, 1)`
//! unless the subject was canonicalised first. Number leaves compare at
//! the engine tolerance; everything else compares by interned identity.

use kanon_core::{ExprHandle, ExprNode, Head};

use crate::engine::Engine;
use crate::scope::{is_wildcard, wildcard_key};

/// An insertion-ordered binding of capture keys to matched subjects.
///
/// Captures are few, so a linear vector beats a hash map here and keeps
/// the insertion order the replacement pass observes.
#[derive(Clone, Debug, Default)]
pub struct Substitution {
    entries: Vec<(String, ExprHandle)>,
}

impl Substitution {
    /// An empty substitution.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The subject bound to a capture key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<ExprHandle> {
        self.entries
            .iter()
            .find_map(|(k, h)| (k == key).then_some(*h))
    }

    /// Binds a key. The caller has already checked any prior binding.
    pub fn insert(&mut self, key: &str, subject: ExprHandle) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == key) {
            entry.1 = subject;
        } else {
            self.entries.push((key.to_string(), subject));
        }
    }

    /// Iterates bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ExprHandle)> {
        self.entries.iter().map(|(k, h)| (k.as_str(), *h))
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Engine {
    /// Matches `pattern` against `subject`, unifying captures
    /// left-to-right on top of `initial`. Returns the substitution on
    /// success.
    #[must_use]
    pub fn match_pattern(
        &self,
        subject: ExprHandle,
        pattern: ExprHandle,
        initial: Option<&Substitution>,
    ) -> Option<Substitution> {
        if self.has_error(subject) {
            return None;
        }
        let mut bindings = initial.cloned().unwrap_or_default();
        self.match_inner(subject, pattern, &mut bindings)
            .then_some(bindings)
    }

    fn match_inner(
        &self,
        subject: ExprHandle,
        pattern: ExprHandle,
        bindings: &mut Substitution,
    ) -> bool {
        if let Some(key) = self.capture_key(pattern) {
            return self.bind(key, subject, bindings);
        }
        if subject == pattern {
            // Interning makes identical trees the same handle; an Error
            // subject still never matches.
            return !matches!(self.node(subject), ExprNode::Error { .. });
        }
        match (self.node(subject), self.node(pattern)) {
            (ExprNode::Number(s), ExprNode::Number(p)) => {
                s.approx_eq(p, self.config.tolerance)
            }
            (
                ExprNode::Function {
                    head: sh,
                    ops: s_ops,
                },
                ExprNode::Function {
                    head: ph,
                    ops: p_ops,
                },
            ) => {
                if s_ops.len() != p_ops.len() {
                    return false;
                }
                let (sh, ph) = (*sh, *ph);
                let (s_ops, p_ops) = (s_ops.clone(), p_ops.clone());
                if !self.match_heads(sh, ph, bindings) {
                    return false;
                }
                s_ops
                    .iter()
                    .zip(p_ops.iter())
                    .all(|(&s, &p)| self.match_inner(s, p, bindings))
            }
            _ => false,
        }
    }

    fn match_heads(&self, subject: Head, pattern: Head, bindings: &mut Substitution) -> bool {
        match (subject, pattern) {
            (Head::Sym(s), Head::Sym(p)) => {
                if s == p {
                    return true;
                }
                let name = self.arena().symbol_name(p);
                if !is_wildcard(name) {
                    return false;
                }
                // A capture in head position binds the head's symbol
                // node. Matching is read-only, so the node must already
                // be interned; a head that was never built as a symbol
                // cannot be captured.
                let key = wildcard_key(name).to_string();
                if key.is_empty() {
                    return true;
                }
                match self.arena().find_node(&ExprNode::Symbol(s)) {
                    Some(handle) => self.bind(key, handle, bindings),
                    None => false,
                }
            }
            (Head::Expr(s), Head::Expr(p)) => self.match_inner(s, p, bindings),
            _ => false,
        }
    }

    fn bind(&self, key: String, subject: ExprHandle, bindings: &mut Substitution) -> bool {
        if matches!(self.node(subject), ExprNode::Error { .. }) {
            return false;
        }
        if key.is_empty() {
            // The anonymous wildcard matches without binding.
            return true;
        }
        match bindings.get(&key) {
            Some(existing) => existing == subject,
            None => {
                bindings.insert(&key, subject);
                true
            }
        }
    }

    fn capture_key(&self, pattern: ExprHandle) -> Option<String> {
        let id = self.node(pattern).as_symbol()?;
        let name = self.arena().symbol_name(id);
        is_wildcard(name).then(|| wildcard_key(name).to_string())
    }

    /// Instantiates a replacement pattern: bound captures are substituted,
    /// unbound symbols stay literal, and the result is canonicalised.
    pub fn instantiate(&mut self, pattern: ExprHandle, bindings: &Substitution) -> ExprHandle {
        let raw = self.instantiate_raw(pattern, bindings);
        self.canonical(raw)
    }

    pub(crate) fn instantiate_raw(
        &mut self,
        pattern: ExprHandle,
        bindings: &Substitution,
    ) -> ExprHandle {
        match self.node(pattern).clone() {
            ExprNode::Symbol(id) => {
                let name = self.arena.symbol_name(id).to_string();
                if is_wildcard(&name) {
                    if let Some(bound) = bindings.get(wildcard_key(&name)) {
                        return bound;
                    }
                }
                pattern
            }
            ExprNode::Function { head, ops } => {
                let new_head = match head {
                    Head::Sym(sym) => {
                        let name = self.arena.symbol_name(sym).to_string();
                        if is_wildcard(&name) {
                            match bindings
                                .get(wildcard_key(&name))
                                .and_then(|h| self.node(h).as_symbol())
                            {
                                Some(bound_sym) => Head::Sym(bound_sym),
                                None => Head::Sym(sym),
                            }
                        } else {
                            Head::Sym(sym)
                        }
                    }
                    Head::Expr(h) => Head::Expr(self.instantiate_raw(h, bindings)),
                };
                let new_ops: smallvec::SmallVec<[ExprHandle; 4]> = ops
                    .iter()
                    .map(|&op| self.instantiate_raw(op, bindings))
                    .collect();
                self.arena.apply(new_head, new_ops)
            }
            _ => pattern,
        }
    }
}
