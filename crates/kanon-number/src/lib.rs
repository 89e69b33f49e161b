//! # kanon-number
//!
//! The number kernel for the Kanon symbolic computation engine.
//!
//! This crate is the engine's only window onto concrete arithmetic. It
//! provides:
//! - Arbitrary precision integers and rationals (backed by `dashu`)
//! - Arbitrary precision decimals with an explicit working precision
//! - Machine-precision complex numbers
//! - [`NumericValue`], the tagged union the expression tree stores, with
//!   the promotion rules used by the evaluator
//!
//! The kernel is deliberately value-oriented: every operation returns a new
//! value, and nothing here knows about expressions, scopes or rules.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod complex;
pub mod decimal;
pub mod integer;
mod proptests;
pub mod rational;
pub mod value;

pub use complex::Complex;
pub use decimal::Decimal;
pub use integer::Integer;
pub use rational::Rational;
pub use value::NumericValue;
