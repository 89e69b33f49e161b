//! # kanon-core
//!
//! The expression model for the Kanon symbolic computation engine.
//!
//! This crate provides:
//! - Arena-allocated expression storage with hash-consing
//! - Tagged expression nodes: numbers, symbols, strings, function
//!   applications, tensors, domains, and in-band errors
//! - Type-safe 32-bit expression handles
//! - A stable textual serialisation used by ordering and diagnostics
//!
//! ## Design
//!
//! Every structurally distinct expression is stored exactly once, so
//! structural equality is handle equality and shared sub-expressions form
//! a DAG by construction. Nodes are immutable after interning; all
//! derived state (canonical forms, numeric values, domains) lives in the
//! engine that owns the arena.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod expr;
pub mod repr;

pub use arena::ExprArena;
pub use expr::{heads, ErrorKind, ExprHandle, ExprNode, Head, StringId, SymbolId, TensorKind};
