//! # Kanon
//!
//! A symbolic computation engine for mathematical expressions: boxed
//! (arena-interned) expression trees with a canonicalisation pipeline, a
//! pattern/rule rewriting engine with cost-biased fixed points, the
//! simplify/evaluate/N passes with hold semantics and threading, and a
//! rule-driven univariate solver.
//!
//! ## Quick start
//!
//! ```
//! use kanon::prelude::*;
//!
//! let mut eng = Engine::new();
//! let x = eng.symbol("x");
//! let x_id = eng.arena().find_symbol("x").unwrap();
//!
//! // 5x - 10 = 0 has the root 2.
//! let five = eng.int(5);
//! let ten = eng.int(10);
//! let five_x = eng.mul(&[five, x]);
//! let neg_ten = eng.neg(ten);
//! let lhs = eng.add(&[five_x, neg_ten]);
//! let zero = eng.int(0);
//! let equation = eng.equal(lhs, zero);
//!
//! let roots = solve(&mut eng, equation, x_id).unwrap();
//! assert_eq!(eng.repr(roots[0]), "2");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use kanon_core as core;
pub use kanon_domain as domain;
pub use kanon_engine as engine;
pub use kanon_number as number;
pub use kanon_solve as solve;

/// Convenient imports for typical use.
pub mod prelude {
    pub use kanon_core::{heads, ErrorKind, ExprHandle, ExprNode, Head, TensorKind};
    pub use kanon_domain::Domain;
    pub use kanon_engine::{
        Engine, EngineConfig, EngineError, FunctionDef, Hold, NumericMode, Rule, RuleSet, Sign,
        Signature, Substitution, SymbolDef,
    };
    pub use kanon_number::{Complex, Integer, NumericValue, Rational};
    pub use kanon_solve::solve;
}
