//! Expression node types.
//!
//! The tagged sum stored in the arena, the handle type that refers to it,
//! and the table of well-known head symbols.

use smallvec::SmallVec;
use std::fmt;

use kanon_domain::Domain;
use kanon_number::NumericValue;

/// Unique identifier for an interned symbol name.
pub type SymbolId = u32;

/// Unique identifier for an interned string literal.
pub type StringId = u32;

/// A handle to an expression in the arena.
///
/// A lightweight 32-bit index. Because the arena hash-conses, two handles
/// are equal if and only if the expressions are structurally identical.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprHandle(u32);

impl ExprHandle {
    /// Creates a handle from a raw index (arena-internal).
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// The raw arena index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ExprHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr#{}", self.0)
    }
}

/// The head of a function application.
///
/// Canonical nodes always carry a symbol head; an expression head survives
/// only in non-canonical nodes (the canonicaliser resolves it or reports
/// `unexpected-command`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Head {
    /// A named head.
    Sym(SymbolId),
    /// A compound head, e.g. an anonymous function.
    Expr(ExprHandle),
}

/// Element type of a tensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TensorKind {
    /// Arbitrary expressions.
    Expr,
    /// Numeric literals only.
    Number,
    /// Boolean literals only.
    Boolean,
}

/// The kind of an in-band error value.
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required operand was absent.
    #[error("missing operand")]
    Missing,
    /// A surplus operand was passed to a fixed-arity function.
    #[error("unexpected argument")]
    UnexpectedArgument,
    /// An operand's domain is disjoint from the declared parameter domain.
    #[error("incompatible domain")]
    IncompatibleDomain,
    /// An identifier violating the identifier grammar.
    #[error("invalid identifier")]
    InvalidIdentifier,
    /// A head that could not be resolved to a function.
    #[error("unexpected command")]
    UnexpectedCommand,
    /// A fixed-point loop gave up before converging.
    #[error("iteration limit reached")]
    IterationLimit,
    /// A handler failed unexpectedly.
    #[error("internal error")]
    Internal,
}

/// An expression node stored in the arena.
///
/// Nodes are immutable; `SmallVec` keeps short operand lists inline.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExprNode {
    /// A numeric literal.
    Number(NumericValue),

    /// An identifier, resolved through the scope stack at evaluation time.
    Symbol(SymbolId),

    /// An opaque text literal.
    Str(StringId),

    /// A function application: head plus ordered operands.
    Function {
        /// The applied head.
        head: Head,
        /// The operands, possibly empty.
        ops: SmallVec<[ExprHandle; 4]>,
    },

    /// A multi-dimensional array with contiguous row-major data.
    Tensor {
        /// Element type.
        dtype: TensorKind,
        /// Dimension sizes, outermost first.
        shape: SmallVec<[usize; 4]>,
        /// Row-major elements; `shape` sizes multiply to `data.len()`.
        data: Vec<ExprHandle>,
    },

    /// A domain used as a value.
    Domain(Domain),

    /// An in-band failure value. Canonical, but invalidates `is_valid`
    /// for every ancestor.
    Error {
        /// What went wrong.
        kind: ErrorKind,
        /// The offending operand, if there is one.
        arg: Option<ExprHandle>,
    },
}

impl ExprNode {
    /// Returns true for leaf nodes.
    #[must_use]
    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            ExprNode::Number(_) | ExprNode::Symbol(_) | ExprNode::Str(_) | ExprNode::Domain(_)
        )
    }

    /// Returns true for numeric literals.
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, ExprNode::Number(_))
    }

    /// The numeric payload, if any.
    #[must_use]
    pub fn as_number(&self) -> Option<&NumericValue> {
        match self {
            ExprNode::Number(v) => Some(v),
            _ => None,
        }
    }

    /// The symbol payload, if any.
    #[must_use]
    pub fn as_symbol(&self) -> Option<SymbolId> {
        match self {
            ExprNode::Symbol(id) => Some(*id),
            _ => None,
        }
    }

    /// The children of this node, in order.
    #[must_use]
    pub fn children(&self) -> SmallVec<[ExprHandle; 4]> {
        match self {
            ExprNode::Number(_) | ExprNode::Symbol(_) | ExprNode::Str(_) | ExprNode::Domain(_) => {
                SmallVec::new()
            }
            ExprNode::Function { head, ops } => {
                let mut out: SmallVec<[ExprHandle; 4]> = SmallVec::new();
                if let Head::Expr(h) = head {
                    out.push(*h);
                }
                out.extend(ops.iter().copied());
                out
            }
            ExprNode::Tensor { data, .. } => data.iter().copied().collect(),
            ExprNode::Error { arg, .. } => arg.iter().copied().collect(),
        }
    }
}

/// Well-known head and constant symbols, pre-interned at fixed ids.
pub mod heads {
    use super::SymbolId;

    /// N-ary sum.
    pub const ADD: SymbolId = 0;
    /// N-ary product.
    pub const MULTIPLY: SymbolId = 1;
    /// Additive inverse.
    pub const NEGATE: SymbolId = 2;
    /// Binary difference (canonicalised away).
    pub const SUBTRACT: SymbolId = 3;
    /// Binary quotient.
    pub const DIVIDE: SymbolId = 4;
    /// Base raised to an exponent.
    pub const POWER: SymbolId = 5;
    /// Second power (canonicalised away).
    pub const SQUARE: SymbolId = 6;
    /// Principal square root.
    pub const SQRT: SymbolId = 7;
    /// Natural exponential.
    pub const EXP: SymbolId = 8;
    /// Natural logarithm.
    pub const LN: SymbolId = 9;
    /// Operand splice, never an operand in canonical form.
    pub const SEQUENCE: SymbolId = 10;
    /// Ordered finite collection.
    pub const LIST: SymbolId = 11;
    /// Unordered finite collection.
    pub const SET: SymbolId = 12;
    /// Arithmetic progression.
    pub const RANGE: SymbolId = 13;
    /// Evaluation shield.
    pub const HOLD: SymbolId = 14;
    /// Evaluation shield release.
    pub const RELEASE_HOLD: SymbolId = 15;
    /// Equation head.
    pub const EQUAL: SymbolId = 16;
    /// Anonymous function constructor.
    pub const FUNCTION: SymbolId = 17;
    /// Sine.
    pub const SIN: SymbolId = 18;
    /// Cosine.
    pub const COS: SymbolId = 19;
    /// Tangent.
    pub const TAN: SymbolId = 20;
    /// Absolute value.
    pub const ABS: SymbolId = 21;
    /// Symbolic integral.
    pub const INTEGRATE: SymbolId = 22;
    /// Numeric integral.
    pub const N_INTEGRATE: SymbolId = 23;
    /// Symbolic limit.
    pub const LIMIT: SymbolId = 24;
    /// Numeric limit.
    pub const N_LIMIT: SymbolId = 25;
    /// The circle constant.
    pub const PI: SymbolId = 26;
    /// Euler's number.
    pub const EXPONENTIAL_E: SymbolId = 27;
    /// The imaginary unit.
    pub const IMAGINARY_UNIT: SymbolId = 28;
    /// `+∞`.
    pub const POSITIVE_INFINITY: SymbolId = 29;
    /// `-∞`.
    pub const NEGATIVE_INFINITY: SymbolId = 30;
    /// Not-a-number.
    pub const NOT_A_NUMBER: SymbolId = 31;
    /// Boolean truth.
    pub const TRUE: SymbolId = 32;
    /// Boolean falsehood.
    pub const FALSE: SymbolId = 33;

    /// Number of pre-interned symbols.
    pub const COUNT: u32 = 34;

    /// Names, indexed by the constants above.
    pub const NAMES: [&str; COUNT as usize] = [
        "Add",
        "Multiply",
        "Negate",
        "Subtract",
        "Divide",
        "Power",
        "Square",
        "Sqrt",
        "Exp",
        "Ln",
        "Sequence",
        "List",
        "Set",
        "Range",
        "Hold",
        "ReleaseHold",
        "Equal",
        "Function",
        "Sin",
        "Cos",
        "Tan",
        "Abs",
        "Integrate",
        "NIntegrate",
        "Limit",
        "NLimit",
        "Pi",
        "ExponentialE",
        "ImaginaryUnit",
        "PositiveInfinity",
        "NegativeInfinity",
        "NotANumber",
        "True",
        "False",
    ];
}
