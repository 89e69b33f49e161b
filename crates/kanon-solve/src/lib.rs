//! # kanon-solve
//!
//! Univariate root finding over the Kanon engine.
//!
//! The solver is rule-driven: the subject is simplified, the unknown is
//! replaced by a reserved placeholder, and an ordered library of root
//! rules is matched against the result. When nothing matches, a
//! harmonisation stage produces equivalent forms (absolute values split
//! into branches, exponential products merged, small-angle
//! approximations) and matching is retried, then once more after
//! algebraic expansion. Candidate roots are evaluated and deduplicated.
//!
//! Multi-variable systems are out of scope: one unknown in, a (possibly
//! empty) list of roots out.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod harmonize;
pub mod roots;
mod univariate;

pub use univariate::solve;
