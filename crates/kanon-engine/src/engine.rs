//! The engine instance.
//!
//! An [`Engine`] owns the expression arena, the scope stack, the caches,
//! and the configuration. Every operation on boxed expressions is a
//! method on the engine taking and returning handles; the engine outlives
//! every handle it hands out.
//!
//! Engines are single-threaded by design: handlers and rule conditions
//! are `Rc` closures, and nothing here is `Send`.

use std::rc::Rc;
use std::time::Instant;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use kanon_core::{heads, ErrorKind, ExprArena, ExprHandle, ExprNode, Head, SymbolId, TensorKind};
use kanon_domain::Domain;
use kanon_number::{Complex, NumericValue};

use crate::config::{EngineConfig, Limits, NumericMode};
use crate::defs::{Definition, FunctionDef, SymbolDef};
use crate::error::{EngineError, EngineResult};
use crate::rewrite::RuleSet;
use crate::scope::{is_valid_identifier, Scope};
use crate::sign::Sign;

/// Handles to the precomputed common values.
#[derive(Clone, Copy, Debug)]
pub struct Constants {
    /// `0`.
    pub zero: ExprHandle,
    /// `1`.
    pub one: ExprHandle,
    /// `-1`.
    pub neg_one: ExprHandle,
    /// `2`.
    pub two: ExprHandle,
    /// `1/2`.
    pub half: ExprHandle,
    /// Not-a-number.
    pub nan: ExprHandle,
    /// `+∞`.
    pub pos_infinity: ExprHandle,
    /// `-∞`.
    pub neg_infinity: ExprHandle,
    /// The imaginary unit as a literal.
    pub i: ExprHandle,
    /// The symbol `Pi`.
    pub pi: ExprHandle,
    /// The symbol `ExponentialE`.
    pub e: ExprHandle,
}

/// A symbolic computation engine instance.
pub struct Engine {
    pub(crate) arena: ExprArena,
    pub(crate) scopes: Vec<Scope>,
    pub(crate) config: EngineConfig,
    pub(crate) consts: Constants,
    pub(crate) canonical_set: FxHashSet<ExprHandle>,
    pub(crate) canonical_memo: FxHashMap<ExprHandle, ExprHandle>,
    pub(crate) numeric_memo: FxHashMap<ExprHandle, NumericValue>,
    pub(crate) valid_memo: FxHashMap<ExprHandle, bool>,
    pub(crate) tensor_views: FxHashMap<ExprHandle, ExprHandle>,
    pub(crate) simplify_rules: Option<Rc<RuleSet>>,
    pub(crate) deadline: Option<Instant>,
    pub(crate) solve_placeholder: Option<ExprHandle>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// An engine with the default configuration and the standard catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// An engine with the given configuration and the standard catalog.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_catalog(config, crate::catalog::standard_catalog)
    }

    /// An engine with a replacement identifier catalog.
    #[must_use]
    pub fn with_catalog(config: EngineConfig, catalog: impl FnOnce(&mut Engine)) -> Self {
        let mut arena = ExprArena::new();
        let consts = Constants {
            zero: arena.int(0),
            one: arena.int(1),
            neg_one: arena.int(-1),
            two: arena.int(2),
            half: arena.number(NumericValue::rational(1, 2)),
            nan: arena.number(NumericValue::nan()),
            pos_infinity: arena.number(NumericValue::pos_infinity()),
            neg_infinity: arena.number(NumericValue::neg_infinity()),
            i: arena.number(NumericValue::Complex(Complex::i())),
            pi: arena.symbol_by_id(heads::PI),
            e: arena.symbol_by_id(heads::EXPONENTIAL_E),
        };
        let mut engine = Self {
            arena,
            scopes: vec![Scope::root(Limits::default())],
            config,
            consts,
            canonical_set: FxHashSet::default(),
            canonical_memo: FxHashMap::default(),
            numeric_memo: FxHashMap::default(),
            valid_memo: FxHashMap::default(),
            tensor_views: FxHashMap::default(),
            simplify_rules: None,
            deadline: None,
            solve_placeholder: None,
        };
        catalog(&mut engine);
        engine
    }

    // === Configuration ===

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The precomputed common values.
    #[must_use]
    pub fn consts(&self) -> &Constants {
        &self.consts
    }

    /// Changes the working precision, flushing every cache.
    pub fn set_precision(&mut self, precision: usize) {
        self.config.precision = precision;
        self.flush_caches();
    }

    /// Changes the numeric mode, flushing every cache.
    pub fn set_numeric_mode(&mut self, mode: NumericMode) {
        self.config.numeric_mode = mode;
        self.flush_caches();
    }

    /// Changes the comparison tolerance. Does not flush caches.
    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.config.tolerance = tolerance;
    }

    /// Drops every configuration-dependent cache. Interned nodes survive;
    /// derived values are recomputed on demand.
    pub fn flush_caches(&mut self) {
        self.canonical_set.clear();
        self.canonical_memo.clear();
        self.numeric_memo.clear();
        self.tensor_views.clear();
        self.simplify_rules = None;
    }

    // === Arena access ===

    /// The expression arena (read-only).
    #[must_use]
    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    /// The node behind a handle.
    #[must_use]
    pub fn node(&self, handle: ExprHandle) -> &ExprNode {
        self.arena.node(handle)
    }

    /// Serialises an expression.
    #[must_use]
    pub fn repr(&self, handle: ExprHandle) -> String {
        self.arena.repr(handle)
    }

    /// The head and operands of a function node, cloned out of the arena.
    #[must_use]
    pub fn function_parts(
        &self,
        handle: ExprHandle,
    ) -> Option<(Head, SmallVec<[ExprHandle; 4]>)> {
        match self.node(handle) {
            ExprNode::Function { head, ops } => Some((*head, ops.clone())),
            _ => None,
        }
    }

    /// The symbol head of a function node, if it has one.
    #[must_use]
    pub fn head_sym(&self, handle: ExprHandle) -> Option<SymbolId> {
        match self.node(handle) {
            ExprNode::Function {
                head: Head::Sym(s), ..
            } => Some(*s),
            _ => None,
        }
    }

    /// True if `handle` is a function application of `head`.
    #[must_use]
    pub fn is_function(&self, handle: ExprHandle, head: SymbolId) -> bool {
        self.head_sym(handle) == Some(head)
    }

    /// The synthesised head name of any node: the function head for
    /// applications, `"Number"`, `"Symbol"`, `"String"`, `"Tensor"`,
    /// `"Domain"` or `"Error"` for the other variants.
    #[must_use]
    pub fn head_name(&self, handle: ExprHandle) -> &str {
        match self.node(handle) {
            ExprNode::Number(_) => "Number",
            ExprNode::Symbol(_) => "Symbol",
            ExprNode::Str(_) => "String",
            ExprNode::Tensor { .. } => "Tensor",
            ExprNode::Domain(_) => "Domain",
            ExprNode::Error { .. } => "Error",
            ExprNode::Function { head, .. } => match head {
                Head::Sym(s) => self.arena.symbol_name(*s),
                Head::Expr(_) => "Function",
            },
        }
    }

    // === Builders ===
    //
    // Builders intern raw structure; canonicalisation happens on demand.

    /// A numeric literal.
    pub fn num(&mut self, value: NumericValue) -> ExprHandle {
        self.arena.number(value)
    }

    /// An exact integer literal.
    pub fn int(&mut self, value: i64) -> ExprHandle {
        self.arena.int(value)
    }

    /// An exact rational literal.
    pub fn rational(&mut self, num: i64, den: i64) -> ExprHandle {
        let value = NumericValue::rational(num, den);
        self.arena.number(value)
    }

    /// A machine double literal.
    pub fn machine(&mut self, value: f64) -> ExprHandle {
        self.arena.number(NumericValue::Machine(value))
    }

    /// A complex literal.
    pub fn complex(&mut self, re: f64, im: f64) -> ExprHandle {
        self.arena.number(NumericValue::Complex(Complex::new(re, im)))
    }

    /// A symbol by name. Any name is accepted here; the declaration
    /// grammar is enforced only by `declare_symbol`/`declare_function`.
    pub fn symbol(&mut self, name: &str) -> ExprHandle {
        self.arena.symbol(name)
    }

    /// A symbol by pre-interned id.
    pub fn sym(&mut self, id: SymbolId) -> ExprHandle {
        self.arena.symbol_by_id(id)
    }

    /// A string literal.
    pub fn string(&mut self, text: &str) -> ExprHandle {
        self.arena.string_literal(text)
    }

    /// A function application with a named head.
    pub fn function(&mut self, head: SymbolId, ops: &[ExprHandle]) -> ExprHandle {
        self.arena.function(head, ops)
    }

    /// A function application with an arbitrary head.
    pub fn apply(&mut self, head: Head, ops: &[ExprHandle]) -> ExprHandle {
        self.arena.apply(head, ops)
    }

    /// An n-ary sum (raw).
    pub fn add(&mut self, ops: &[ExprHandle]) -> ExprHandle {
        self.function(heads::ADD, ops)
    }

    /// An n-ary product (raw).
    pub fn mul(&mut self, ops: &[ExprHandle]) -> ExprHandle {
        self.function(heads::MULTIPLY, ops)
    }

    /// A power (raw).
    pub fn pow(&mut self, base: ExprHandle, exp: ExprHandle) -> ExprHandle {
        self.function(heads::POWER, &[base, exp])
    }

    /// A negation (raw).
    pub fn neg(&mut self, op: ExprHandle) -> ExprHandle {
        self.function(heads::NEGATE, &[op])
    }

    /// A quotient (raw).
    pub fn divide(&mut self, num: ExprHandle, den: ExprHandle) -> ExprHandle {
        self.function(heads::DIVIDE, &[num, den])
    }

    /// A square root (raw).
    pub fn sqrt(&mut self, op: ExprHandle) -> ExprHandle {
        self.function(heads::SQRT, &[op])
    }

    /// A list (raw).
    pub fn list(&mut self, ops: &[ExprHandle]) -> ExprHandle {
        self.function(heads::LIST, ops)
    }

    /// An equation (raw).
    pub fn equal(&mut self, lhs: ExprHandle, rhs: ExprHandle) -> ExprHandle {
        self.function(heads::EQUAL, &[lhs, rhs])
    }

    /// An in-band error node.
    pub fn error(&mut self, kind: ErrorKind, arg: Option<ExprHandle>) -> ExprHandle {
        self.arena.error(kind, arg)
    }

    /// A tensor. Reports `missing`/`unexpected-argument` in-band when the
    /// shape does not cover the data.
    pub fn tensor(
        &mut self,
        dtype: TensorKind,
        shape: &[usize],
        data: Vec<ExprHandle>,
    ) -> ExprHandle {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            let kind = if data.len() < expected {
                ErrorKind::Missing
            } else {
                ErrorKind::UnexpectedArgument
            };
            return self.arena.error(kind, None);
        }
        self.arena.tensor(dtype, shape, data)
    }

    /// A pattern capture variable: `wildcard("a")` is the symbol `_a`.
    pub fn wildcard(&mut self, key: &str) -> ExprHandle {
        let name = format!("_{key}");
        self.arena.symbol(&name)
    }

    // === Structural queries ===

    /// Structural equality. Handles are interned, so this is identity.
    #[must_use]
    pub fn is_same(&self, a: ExprHandle, b: ExprHandle) -> bool {
        a == b
    }

    /// True if `target` occurs anywhere in `expr` (including `expr`
    /// itself).
    #[must_use]
    pub fn contains(&self, expr: ExprHandle, target: ExprHandle) -> bool {
        if expr == target {
            return true;
        }
        self.node(expr)
            .children()
            .iter()
            .any(|&child| self.contains(child, target))
    }

    /// True if `target` does not occur in `expr`.
    #[must_use]
    pub fn free_of(&self, expr: ExprHandle, target: ExprHandle) -> bool {
        !self.contains(expr, target)
    }

    /// Read-only error scan, for callers that cannot touch the validity
    /// memo.
    #[must_use]
    pub fn has_error(&self, expr: ExprHandle) -> bool {
        if matches!(self.node(expr), ExprNode::Error { .. }) {
            return true;
        }
        self.node(expr)
            .children()
            .iter()
            .any(|&child| self.has_error(child))
    }

    /// True if the tree contains no `Error` node.
    pub fn is_valid(&mut self, expr: ExprHandle) -> bool {
        if let Some(&known) = self.valid_memo.get(&expr) {
            return known;
        }
        let valid = if matches!(self.node(expr), ExprNode::Error { .. }) {
            false
        } else {
            let children = self.node(expr).children();
            children.into_iter().all(|child| self.is_valid(child))
        };
        self.valid_memo.insert(expr, valid);
        valid
    }

    /// True if the expression is canonical (the representative of its
    /// equivalence class).
    #[must_use]
    pub fn is_canonical(&self, expr: ExprHandle) -> bool {
        self.canonical_set.contains(&expr)
    }

    /// True if the node and all children are free of side effects.
    #[must_use]
    pub fn is_pure(&self, expr: ExprHandle) -> bool {
        match self.node(expr) {
            ExprNode::Error { .. } => false,
            ExprNode::Function { head, ops } => {
                let head_pure = match head {
                    Head::Sym(s) => self
                        .lookup_function(*s)
                        .map_or(true, |def| def.flags.pure),
                    Head::Expr(h) => self.is_pure(*h),
                };
                head_pure && ops.iter().all(|&op| self.is_pure(op))
            }
            ExprNode::Tensor { data, .. } => data.iter().all(|&h| self.is_pure(h)),
            _ => true,
        }
    }

    /// The narrowest domain known to contain the expression's value.
    #[must_use]
    pub fn domain_of(&self, expr: ExprHandle) -> Domain {
        match self.node(expr) {
            ExprNode::Number(value) => numeric_domain(value),
            ExprNode::Str(_) => Domain::Strings,
            ExprNode::Domain(_) => Domain::Values,
            ExprNode::Error { .. } => Domain::Void,
            ExprNode::Tensor { .. } => Domain::Values,
            ExprNode::Symbol(id) => self.symbol_domain(*id),
            ExprNode::Function { head, .. } => match head {
                Head::Sym(s) => self
                    .lookup_function(*s)
                    .map_or(Domain::Anything, |def| def.signature.result),
                Head::Expr(_) => Domain::Anything,
            },
        }
    }

    fn symbol_domain(&self, id: SymbolId) -> Domain {
        match id {
            heads::PI | heads::EXPONENTIAL_E => return Domain::RealNumbers,
            heads::IMAGINARY_UNIT => return Domain::ImaginaryNumbers,
            heads::POSITIVE_INFINITY | heads::NEGATIVE_INFINITY => {
                return Domain::ExtendedRealNumbers
            }
            heads::NOT_A_NUMBER => return Domain::Numbers,
            heads::TRUE | heads::FALSE => return Domain::Booleans,
            _ => {}
        }
        if let Some(domain) = self.assumed_domain(id) {
            return domain;
        }
        self.lookup_symbol(id)
            .map_or(Domain::Anything, |def| def.domain)
    }

    // === Scopes and declarations ===

    /// Pushes a child scope.
    ///
    /// # Errors
    ///
    /// `RecursionLimit` when the stack is already at the limit.
    pub fn push_scope(&mut self) -> EngineResult<()> {
        let limit = self.current_limits().recursion_limit;
        if self.scopes.len() >= limit {
            return Err(EngineError::RecursionLimit(limit));
        }
        let child = self.scopes.last().expect("root scope").child();
        self.scopes.push(child);
        Ok(())
    }

    /// Pops the current scope.
    ///
    /// # Errors
    ///
    /// `MissingScope` when only the root scope remains.
    pub fn pop_scope(&mut self) -> EngineResult<()> {
        if self.scopes.len() <= 1 {
            return Err(EngineError::MissingScope);
        }
        self.scopes.pop();
        Ok(())
    }

    /// Runs `f` inside a fresh child scope, restoring the stack on every
    /// exit path.
    pub fn with_scope<T>(
        &mut self,
        f: impl FnOnce(&mut Engine) -> EngineResult<T>,
    ) -> EngineResult<T> {
        self.push_scope()?;
        let result = f(self);
        self.scopes.pop();
        result
    }

    /// The limits of the current scope.
    #[must_use]
    pub fn current_limits(&self) -> Limits {
        self.scopes.last().expect("root scope").limits
    }

    /// Replaces the current scope's limits. Child scopes copy these on
    /// push.
    pub fn set_limits(&mut self, limits: Limits) {
        self.scopes.last_mut().expect("root scope").limits = limits;
    }

    /// Declares a symbol in the current scope.
    ///
    /// # Errors
    ///
    /// `InvalidIdentifier` on a grammar violation; `AlreadyDeclared` when
    /// a non-inferred definition exists in the current scope.
    pub fn declare_symbol(&mut self, name: &str, def: SymbolDef) -> EngineResult<SymbolId> {
        let id = self.declare_name(name)?;
        self.scopes
            .last_mut()
            .expect("root scope")
            .ids
            .insert(id, Definition::Symbol(def));
        Ok(id)
    }

    /// Declares a function in the current scope.
    ///
    /// # Errors
    ///
    /// `InvalidIdentifier` on a grammar violation; `AlreadyDeclared` when
    /// a non-inferred definition exists in the current scope.
    pub fn declare_function(&mut self, name: &str, def: FunctionDef) -> EngineResult<SymbolId> {
        let id = self.declare_name(name)?;
        self.scopes
            .last_mut()
            .expect("root scope")
            .ids
            .insert(id, Definition::Function(def));
        Ok(id)
    }

    fn declare_name(&mut self, name: &str) -> EngineResult<SymbolId> {
        if !is_valid_identifier(name) {
            return Err(EngineError::InvalidIdentifier(name.to_string()));
        }
        let id = self.arena.intern_symbol(name);
        let scope = self.scopes.last().expect("root scope");
        if let Some(existing) = scope.ids.get(&id) {
            let replaceable = matches!(
                existing,
                Definition::Symbol(SymbolDef {
                    inferred_domain: true,
                    ..
                })
            );
            if !replaceable {
                return Err(EngineError::AlreadyDeclared(name.to_string()));
            }
        }
        Ok(id)
    }

    /// Looks an identifier up through the scope chain, innermost first.
    #[must_use]
    pub fn lookup(&self, id: SymbolId) -> Option<&Definition> {
        self.scopes.iter().rev().find_map(|scope| scope.ids.get(&id))
    }

    fn lookup_function(&self, id: SymbolId) -> Option<&FunctionDef> {
        match self.lookup(id) {
            Some(Definition::Function(def)) => Some(def),
            _ => None,
        }
    }

    fn lookup_symbol(&self, id: SymbolId) -> Option<&SymbolDef> {
        match self.lookup(id) {
            Some(Definition::Symbol(def)) => Some(def),
            _ => None,
        }
    }

    /// The function definition for a head, cloned out of the scope chain.
    #[must_use]
    pub fn function_def(&self, id: SymbolId) -> Option<FunctionDef> {
        self.lookup_function(id).cloned()
    }

    /// The symbol definition for an identifier, cloned out of the scope
    /// chain.
    #[must_use]
    pub fn symbol_def(&self, id: SymbolId) -> Option<SymbolDef> {
        self.lookup_symbol(id).cloned()
    }

    /// Records a sign assumption in the current scope.
    pub fn assume_sign(&mut self, symbol: SymbolId, sign: Sign) {
        self.scopes
            .last_mut()
            .expect("root scope")
            .assumptions
            .assume_sign(symbol, sign);
    }

    /// Records a domain assumption in the current scope.
    pub fn assume_domain(&mut self, symbol: SymbolId, domain: Domain) {
        self.scopes
            .last_mut()
            .expect("root scope")
            .assumptions
            .assume_domain(symbol, domain);
    }

    /// The assumed sign of a symbol, if one is recorded.
    #[must_use]
    pub fn assumed_sign(&self, symbol: SymbolId) -> Option<Sign> {
        self.scopes
            .last()
            .expect("root scope")
            .assumptions
            .sign_of(symbol)
    }

    /// The assumed domain of a symbol, if one is recorded.
    #[must_use]
    pub fn assumed_domain(&self, symbol: SymbolId) -> Option<Domain> {
        self.scopes
            .last()
            .expect("root scope")
            .assumptions
            .domain_of(symbol)
    }

    // === Deadline ===

    /// Polled by long-running loops between iterations.
    ///
    /// # Errors
    ///
    /// `Timeout` once the deadline has passed.
    pub fn should_continue(&self) -> EngineResult<()> {
        if let Some(deadline) = self.deadline {
            if Instant::now() > deadline {
                let limit = self.current_limits().time_limit.unwrap_or_default();
                return Err(EngineError::Timeout(limit));
            }
        }
        Ok(())
    }

    /// Arms the deadline for a top-level call; nested calls inherit the
    /// outer deadline. Disarms on exit iff this call armed it.
    pub(crate) fn with_deadline<T>(
        &mut self,
        f: impl FnOnce(&mut Engine) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let armed = if self.deadline.is_none() {
            if let Some(budget) = self.current_limits().time_limit {
                self.deadline = Some(Instant::now() + budget);
                true
            } else {
                false
            }
        } else {
            false
        };
        let result = f(self);
        if armed {
            self.deadline = None;
        }
        result
    }

    // === Substitution ===

    /// Structural substitution of symbols, canonicalising the result.
    pub fn subs(
        &mut self,
        expr: ExprHandle,
        map: &FxHashMap<SymbolId, ExprHandle>,
    ) -> ExprHandle {
        let raw = self.subs_raw(expr, map);
        self.canonical(raw)
    }

    /// Structural substitution of symbols without canonicalisation. The
    /// solver relies on this so its placeholder survives verbatim.
    pub fn subs_raw(
        &mut self,
        expr: ExprHandle,
        map: &FxHashMap<SymbolId, ExprHandle>,
    ) -> ExprHandle {
        match self.node(expr).clone() {
            ExprNode::Symbol(id) => map.get(&id).copied().unwrap_or(expr),
            ExprNode::Function { head, ops } => {
                let new_head = match head {
                    Head::Expr(h) => Head::Expr(self.subs_raw(h, map)),
                    sym => sym,
                };
                let new_ops: SmallVec<[ExprHandle; 4]> =
                    ops.iter().map(|&op| self.subs_raw(op, map)).collect();
                self.arena.apply(new_head, new_ops)
            }
            ExprNode::Tensor { dtype, shape, data } => {
                let new_data: Vec<ExprHandle> =
                    data.iter().map(|&h| self.subs_raw(h, map)).collect();
                self.arena.tensor(dtype, shape, new_data)
            }
            _ => expr,
        }
    }

    /// The placeholder the solver is currently matching against, if a
    /// solve is in progress.
    #[must_use]
    pub fn solve_placeholder(&self) -> Option<ExprHandle> {
        self.solve_placeholder
    }

    /// Installs or clears the solver placeholder.
    pub fn set_solve_placeholder(&mut self, placeholder: Option<ExprHandle>) {
        self.solve_placeholder = placeholder;
    }

    // === Equality ===

    /// Mathematical equality: structural identity of canonical forms, or
    /// a difference that vanishes under simplification and numeric
    /// evaluation at the engine tolerance.
    pub fn is_equal(&mut self, a: ExprHandle, b: ExprHandle) -> EngineResult<bool> {
        let ca = self.canonical(a);
        let cb = self.canonical(b);
        if ca == cb {
            return Ok(true);
        }
        let neg_b = self.neg(cb);
        let diff = self.add(&[ca, neg_b]);
        let diff = self.simplify(diff)?;
        if let Some(value) = self.numeric_value(diff) {
            let tolerance = self.config.tolerance;
            return Ok(value.approx_eq(&NumericValue::zero(), tolerance));
        }
        Ok(false)
    }
}

fn numeric_domain(value: &NumericValue) -> Domain {
    match value {
        NumericValue::Rational(r) => {
            if r.is_integer() {
                if r.signum() > 0 {
                    Domain::PositiveIntegers
                } else {
                    Domain::Integers
                }
            } else {
                Domain::RationalNumbers
            }
        }
        NumericValue::Decimal(_) => Domain::RealNumbers,
        NumericValue::Machine(x) => {
            if x.is_nan() {
                Domain::Numbers
            } else if x.is_infinite() {
                Domain::ExtendedRealNumbers
            } else {
                Domain::RealNumbers
            }
        }
        NumericValue::Complex(z) => {
            if z.is_real() {
                Domain::RealNumbers
            } else if z.re == 0.0 {
                Domain::ImaginaryNumbers
            } else {
                Domain::ComplexNumbers
            }
        }
    }
}
