//! Symbol and function definitions.
//!
//! A definition binds an identifier to its semantics: a symbol's domain
//! and optional value, or a function's signature, behavioural flags, hold
//! policy and handlers. Definitions live in scopes (see `scope`); the
//! engine looks them up through the scope stack.

use std::rc::Rc;

use kanon_core::ExprHandle;
use kanon_domain::Domain;

use crate::engine::Engine;
use crate::error::EngineResult;
use crate::sign::Sign;

/// Which operand positions a function shields from recursive processing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Hold {
    /// Every position is shielded.
    All,
    /// No position is shielded.
    #[default]
    None,
    /// Only position 0.
    First,
    /// Positions `1..n`.
    Rest,
    /// Only position `n-1`.
    Last,
    /// Positions `0..n-1`.
    Most,
}

impl Hold {
    /// Returns true if operand `index` of an `arity`-operand application
    /// is shielded.
    #[must_use]
    pub fn holds(self, index: usize, arity: usize) -> bool {
        match self {
            Hold::All => true,
            Hold::None => false,
            Hold::First => index == 0,
            Hold::Rest => index >= 1,
            Hold::Last => arity > 0 && index == arity - 1,
            Hold::Most => arity > 0 && index < arity - 1,
        }
    }
}

/// A function's declared parameter and result domains.
#[derive(Clone, Debug)]
pub struct Signature {
    /// Required positional parameter domains.
    pub params: Vec<Domain>,
    /// Domain of a trailing variadic tail, if any.
    pub variadic: Option<Domain>,
    /// Result domain.
    pub result: Domain,
}

impl Default for Signature {
    fn default() -> Self {
        Self {
            params: Vec::new(),
            variadic: Some(Domain::Anything),
            result: Domain::Anything,
        }
    }
}

impl Signature {
    /// A fixed arity signature with every domain numeric.
    #[must_use]
    pub fn numeric(arity: usize) -> Self {
        Self {
            params: vec![Domain::Numbers; arity],
            variadic: None,
            result: Domain::Numbers,
        }
    }

    /// A fully variadic numeric signature.
    #[must_use]
    pub fn variadic_numeric() -> Self {
        Self {
            params: Vec::new(),
            variadic: Some(Domain::Numbers),
            result: Domain::Numbers,
        }
    }

    /// Smallest accepted operand count.
    #[must_use]
    pub fn min_arity(&self) -> usize {
        self.params.len()
    }

    /// Largest accepted operand count, `None` when variadic.
    #[must_use]
    pub fn max_arity(&self) -> Option<usize> {
        self.variadic.is_none().then(|| self.params.len())
    }

    /// The declared domain of operand `index`.
    #[must_use]
    pub fn param_domain(&self, index: usize) -> Option<Domain> {
        self.params
            .get(index)
            .copied()
            .or(self.variadic)
    }
}

/// A handler for the canonical/simplify/evaluate/N passes. `Ok(None)`
/// declines and lets the pass fall through to its default behaviour.
pub type EvalHandler = Rc<dyn Fn(&mut Engine, &[ExprHandle]) -> EngineResult<Option<ExprHandle>>>;

/// A sign-inference handler.
pub type SignHandler = Rc<dyn Fn(&mut Engine, &[ExprHandle]) -> Option<Sign>>;

/// A collection-length handler.
pub type SizeHandler = Rc<dyn Fn(&Engine, &[ExprHandle]) -> Option<usize>>;

/// Optional per-function handlers.
#[derive(Clone, Default)]
pub struct Handlers {
    /// Full replacement of the canonicalisation pipeline.
    pub canonical: Option<EvalHandler>,
    /// Simplification step; the result competes under the cost rule.
    pub simplify: Option<EvalHandler>,
    /// Evaluation step.
    pub evaluate: Option<EvalHandler>,
    /// Numeric-mode evaluation step.
    pub n: Option<EvalHandler>,
    /// Sign inference.
    pub sgn: Option<SignHandler>,
    /// Length, for indexable collections.
    pub size: Option<SizeHandler>,
}

/// Behavioural flags of a function head.
#[derive(Clone, Copy, Debug, Default)]
pub struct FunctionFlags {
    /// No observable side effects; results may be cached.
    pub pure: bool,
    /// Nested applications flatten: `f(a, f(b, c)) = f(a, b, c)`.
    pub associative: bool,
    /// Operand order is irrelevant; canonical form sorts.
    pub commutative: bool,
    /// `f(f(x)) = f(x)`.
    pub idempotent: bool,
    /// `f(f(x)) = x`.
    pub involution: bool,
    /// Maps over indexable collection operands.
    pub threadable: bool,
    /// Evaluates to its first operand.
    pub inert: bool,
}

/// A function definition.
#[derive(Clone)]
pub struct FunctionDef {
    /// Parameter and result domains.
    pub signature: Signature,
    /// Behavioural flags.
    pub flags: FunctionFlags,
    /// Operand shielding policy.
    pub hold: Hold,
    /// Relative cost weight used by the rule engine.
    pub complexity: u32,
    /// Optional pass handlers.
    pub handlers: Handlers,
}

impl Default for FunctionDef {
    fn default() -> Self {
        Self {
            signature: Signature::default(),
            flags: FunctionFlags {
                pure: true,
                ..FunctionFlags::default()
            },
            hold: Hold::None,
            complexity: 3,
            handlers: Handlers::default(),
        }
    }
}

impl FunctionDef {
    /// A pure definition with default flags.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the signature.
    #[must_use]
    pub fn signature(mut self, signature: Signature) -> Self {
        self.signature = signature;
        self
    }

    /// Marks associative.
    #[must_use]
    pub fn associative(mut self) -> Self {
        self.flags.associative = true;
        self
    }

    /// Marks commutative.
    #[must_use]
    pub fn commutative(mut self) -> Self {
        self.flags.commutative = true;
        self
    }

    /// Marks idempotent.
    #[must_use]
    pub fn idempotent(mut self) -> Self {
        self.flags.idempotent = true;
        self
    }

    /// Marks an involution.
    #[must_use]
    pub fn involution(mut self) -> Self {
        self.flags.involution = true;
        self
    }

    /// Marks threadable.
    #[must_use]
    pub fn threadable(mut self) -> Self {
        self.flags.threadable = true;
        self
    }

    /// Marks inert.
    #[must_use]
    pub fn inert(mut self) -> Self {
        self.flags.inert = true;
        self
    }

    /// Marks impure; results will not be cached.
    #[must_use]
    pub fn impure(mut self) -> Self {
        self.flags.pure = false;
        self
    }

    /// Sets the hold policy.
    #[must_use]
    pub fn hold(mut self, hold: Hold) -> Self {
        self.hold = hold;
        self
    }

    /// Sets the cost weight.
    #[must_use]
    pub fn complexity(mut self, complexity: u32) -> Self {
        self.complexity = complexity;
        self
    }

    /// Installs a canonical handler.
    #[must_use]
    pub fn on_canonical(
        mut self,
        f: impl Fn(&mut Engine, &[ExprHandle]) -> EngineResult<Option<ExprHandle>> + 'static,
    ) -> Self {
        self.handlers.canonical = Some(Rc::new(f));
        self
    }

    /// Installs a simplify handler.
    #[must_use]
    pub fn on_simplify(
        mut self,
        f: impl Fn(&mut Engine, &[ExprHandle]) -> EngineResult<Option<ExprHandle>> + 'static,
    ) -> Self {
        self.handlers.simplify = Some(Rc::new(f));
        self
    }

    /// Installs an evaluate handler.
    #[must_use]
    pub fn on_evaluate(
        mut self,
        f: impl Fn(&mut Engine, &[ExprHandle]) -> EngineResult<Option<ExprHandle>> + 'static,
    ) -> Self {
        self.handlers.evaluate = Some(Rc::new(f));
        self
    }

    /// Installs a numeric-mode handler.
    #[must_use]
    pub fn on_n(
        mut self,
        f: impl Fn(&mut Engine, &[ExprHandle]) -> EngineResult<Option<ExprHandle>> + 'static,
    ) -> Self {
        self.handlers.n = Some(Rc::new(f));
        self
    }

    /// Installs a sign handler.
    #[must_use]
    pub fn on_sgn(
        mut self,
        f: impl Fn(&mut Engine, &[ExprHandle]) -> Option<Sign> + 'static,
    ) -> Self {
        self.handlers.sgn = Some(Rc::new(f));
        self
    }

    /// Installs a size handler.
    #[must_use]
    pub fn on_size(
        mut self,
        f: impl Fn(&Engine, &[ExprHandle]) -> Option<usize> + 'static,
    ) -> Self {
        self.handlers.size = Some(Rc::new(f));
        self
    }
}

/// A symbol definition.
#[derive(Clone, Debug)]
pub struct SymbolDef {
    /// The narrowest domain known to contain the symbol's value.
    pub domain: Domain,
    /// Bound value, if any.
    pub value: Option<ExprHandle>,
    /// Constants cannot be reassigned.
    pub constant: bool,
    /// True while the domain came from a first assignment and may still
    /// be narrowed; such definitions may be redeclared.
    pub inferred_domain: bool,
}

impl Default for SymbolDef {
    fn default() -> Self {
        Self {
            domain: Domain::Anything,
            value: None,
            constant: false,
            inferred_domain: true,
        }
    }
}

impl SymbolDef {
    /// An unbound symbol in the given domain.
    #[must_use]
    pub fn in_domain(domain: Domain) -> Self {
        Self {
            domain,
            inferred_domain: false,
            ..Self::default()
        }
    }

    /// A constant with a fixed value.
    #[must_use]
    pub fn constant(domain: Domain, value: Option<ExprHandle>) -> Self {
        Self {
            domain,
            value,
            constant: true,
            inferred_domain: false,
        }
    }
}

/// An identifier's definition.
#[derive(Clone)]
pub enum Definition {
    /// A symbol binding.
    Symbol(SymbolDef),
    /// A function binding.
    Function(FunctionDef),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hold_positions() {
        assert!(Hold::All.holds(0, 3) && Hold::All.holds(2, 3));
        assert!(!Hold::None.holds(0, 3));
        assert!(Hold::First.holds(0, 3) && !Hold::First.holds(1, 3));
        assert!(!Hold::Rest.holds(0, 3) && Hold::Rest.holds(2, 3));
        assert!(Hold::Last.holds(2, 3) && !Hold::Last.holds(1, 3));
        assert!(Hold::Most.holds(0, 3) && Hold::Most.holds(1, 3) && !Hold::Most.holds(2, 3));
    }

    #[test]
    fn test_signature_arity() {
        let fixed = Signature::numeric(2);
        assert_eq!(fixed.min_arity(), 2);
        assert_eq!(fixed.max_arity(), Some(2));

        let variadic = Signature::variadic_numeric();
        assert_eq!(variadic.min_arity(), 0);
        assert_eq!(variadic.max_arity(), None);
        assert_eq!(variadic.param_domain(7), Some(Domain::Numbers));
    }

    #[test]
    fn test_builder() {
        let def = FunctionDef::new()
            .associative()
            .commutative()
            .hold(Hold::First)
            .complexity(2);
        assert!(def.flags.associative && def.flags.commutative);
        assert_eq!(def.hold, Hold::First);
        assert_eq!(def.complexity, 2);
        assert!(def.flags.pure);
    }
}
