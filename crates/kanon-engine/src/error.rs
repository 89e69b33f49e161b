//! Out-of-band engine failures.
//!
//! Routine failures (bad arity, disjoint domains, unresolvable heads) are
//! in-band `Error` nodes; see `kanon_core::ErrorKind`. The variants here
//! are the ones that abort the outermost call instead: resource exhaustion
//! and contract violations.

use std::time::Duration;
use thiserror::Error;

/// An error that aborts an engine operation.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The deadline derived from the time limit expired.
    #[error("evaluation timed out after {0:?}")]
    Timeout(Duration),

    /// The scope stack grew past the recursion limit.
    #[error("recursion limit of {0} exceeded")]
    RecursionLimit(usize),

    /// A declared name violates the identifier grammar.
    #[error("invalid identifier `{0}`")]
    InvalidIdentifier(String),

    /// A non-inferred definition already exists for the name.
    #[error("identifier `{0}` is already declared")]
    AlreadyDeclared(String),

    /// An attempt to pop the root scope.
    #[error("no scope to pop")]
    MissingScope,

    /// A handler failed in a way it should not have.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Engine operation result.
pub type EngineResult<T> = Result<T, EngineError>;
