//! # kanon-engine
//!
//! The engine of the Kanon symbolic computation system: scopes and
//! identifier definitions, the canonicalisation pipeline, the canonical
//! ordering, structural pattern matching, the rule engine with
//! cost-biased fixed-point rewriting, the simplify/evaluate/N passes,
//! sign inference, assumptions, and the standard catalog.
//!
//! An [`Engine`] instance owns every expression it builds; operations
//! take and return [`kanon_core::ExprHandle`]s. Engines are
//! single-threaded: handlers and rule conditions are `Rc` closures and
//! nothing here is `Send`.
//!
//! ```
//! use kanon_engine::Engine;
//!
//! let mut eng = Engine::new();
//! let x = eng.symbol("x");
//! let five = eng.int(5);
//! let product = eng.mul(&[x, five]);
//! let canonical = eng.canonical(product);
//! assert_eq!(eng.repr(canonical), "Multiply(5, x)");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod arith;
mod canonical;
pub mod catalog;
pub mod config;
mod cost;
pub mod defs;
mod engine;
pub mod error;
mod evaluate;
mod expand;
mod numeric;
mod order;
pub mod pattern;
mod proptests;
pub mod rewrite;
pub mod rules;
pub mod scope;
pub mod sign;
mod simplify;

pub use config::{EngineConfig, Limits, NumericMode};
pub use defs::{Definition, FunctionDef, Hold, Signature, SymbolDef};
pub use engine::{Constants, Engine};
pub use error::{EngineError, EngineResult};
pub use order::Degree;
pub use pattern::Substitution;
pub use rewrite::{Rule, RuleSet};
pub use sign::Sign;
pub use simplify::SimplifyOptions;
