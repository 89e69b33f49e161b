//! Lexical scopes, the identifier grammar, and assumptions.
//!
//! A scope holds identifier definitions, assumptions, and resource
//! limits. Scopes stack: lookup walks from the innermost scope outward,
//! first match wins. Pushing a scope copies the parent's limits and
//! assumptions; definitions are not copied (the chain provides them).

use rustc_hash::FxHashMap;

use kanon_core::SymbolId;
use kanon_domain::Domain;

use crate::config::Limits;
use crate::defs::Definition;
use crate::sign::Sign;

/// Returns true for names the declaration grammar accepts: a leading
/// alphabetic character followed by alphanumerics or underscores. Leading
/// underscores are reserved for pattern wildcards and anonymous-function
/// parameters.
#[must_use]
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Returns true for capture-variable names (`_x`, `__a`, ...).
#[must_use]
pub fn is_wildcard(name: &str) -> bool {
    name.starts_with('_')
}

/// The capture key of a wildcard name: the base with every leading
/// underscore stripped, so `_a` and `__a` share a key. An empty key is
/// the anonymous wildcard, which matches without binding.
#[must_use]
pub fn wildcard_key(name: &str) -> &str {
    name.trim_start_matches('_')
}

/// A predicate recorded about a symbol, consulted by sign and domain
/// queries.
#[derive(Clone, Copy, Debug, Default)]
pub struct Assumption {
    /// Asserted domain, if any.
    pub domain: Option<Domain>,
    /// Asserted sign, if any.
    pub sign: Option<Sign>,
}

/// Per-scope assumption store.
#[derive(Clone, Debug, Default)]
pub struct Assumptions {
    map: FxHashMap<SymbolId, Assumption>,
}

impl Assumptions {
    /// Records a sign assumption, merging with any prior record.
    pub fn assume_sign(&mut self, symbol: SymbolId, sign: Sign) {
        self.map.entry(symbol).or_default().sign = Some(sign);
    }

    /// Records a domain assumption, merging with any prior record.
    pub fn assume_domain(&mut self, symbol: SymbolId, domain: Domain) {
        let entry = self.map.entry(symbol).or_default();
        entry.domain = Some(match entry.domain {
            Some(existing) => existing.narrow(domain),
            None => domain,
        });
    }

    /// The asserted sign, if one was recorded.
    #[must_use]
    pub fn sign_of(&self, symbol: SymbolId) -> Option<Sign> {
        self.map.get(&symbol).and_then(|a| a.sign)
    }

    /// The asserted domain, if one was recorded.
    #[must_use]
    pub fn domain_of(&self, symbol: SymbolId) -> Option<Domain> {
        self.map.get(&symbol).and_then(|a| a.domain)
    }
}

/// A lexical frame.
pub struct Scope {
    /// Identifier definitions introduced in this frame.
    pub ids: FxHashMap<SymbolId, Definition>,
    /// Assumptions visible in this frame (copied from the parent on push).
    pub assumptions: Assumptions,
    /// Resource limits (copied from the parent on push).
    pub limits: Limits,
}

impl Scope {
    /// The root scope.
    #[must_use]
    pub fn root(limits: Limits) -> Self {
        Self {
            ids: FxHashMap::default(),
            assumptions: Assumptions::default(),
            limits,
        }
    }

    /// A child frame: fresh identifiers, inherited assumptions and limits.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            ids: FxHashMap::default(),
            assumptions: self.assumptions.clone(),
            limits: self.limits,
        }
    }
}
