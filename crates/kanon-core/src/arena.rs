//! Arena allocator and interning tables.
//!
//! All expressions live contiguously in one arena per engine. Interning
//! makes structural equality a handle comparison and deduplicates shared
//! sub-expressions, so the expression graph is a DAG by construction.

use hashbrown::HashMap;
use smallvec::SmallVec;

use kanon_domain::Domain;
use kanon_number::NumericValue;

use crate::expr::{heads, ErrorKind, ExprHandle, ExprNode, Head, StringId, SymbolId, TensorKind};

/// The expression arena: node storage plus symbol and string tables.
#[derive(Debug, Default)]
pub struct ExprArena {
    nodes: Vec<ExprNode>,
    interned: HashMap<ExprNode, ExprHandle>,
    symbol_ids: HashMap<String, SymbolId>,
    symbol_names: Vec<String>,
    string_ids: HashMap<String, StringId>,
    strings: Vec<String>,
}

impl ExprArena {
    /// Creates an arena with the well-known symbols pre-interned at their
    /// fixed ids.
    #[must_use]
    pub fn new() -> Self {
        let mut arena = Self::default();
        for name in heads::NAMES {
            arena.intern_symbol(name);
        }
        debug_assert_eq!(arena.symbol_names.len() as u32, heads::COUNT);
        arena
    }

    /// Interns a node, returning the handle of the unique copy.
    pub fn intern(&mut self, node: ExprNode) -> ExprHandle {
        if let Some(&handle) = self.interned.get(&node) {
            return handle;
        }
        let index = self.nodes.len();
        assert!(index < u32::MAX as usize, "expression arena exhausted");
        #[allow(clippy::cast_possible_truncation)]
        let handle = ExprHandle::new(index as u32);
        self.nodes.push(node.clone());
        self.interned.insert(node, handle);
        handle
    }

    /// The node behind a handle.
    ///
    /// # Panics
    ///
    /// Panics on a handle from a different arena.
    #[must_use]
    pub fn node(&self, handle: ExprHandle) -> &ExprNode {
        &self.nodes[handle.index() as usize]
    }

    /// The handle of an already-interned node, without interning.
    #[must_use]
    pub fn find_node(&self, node: &ExprNode) -> Option<ExprHandle> {
        self.interned.get(node).copied()
    }

    /// Number of interned nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // === Symbols and strings ===

    /// Interns a symbol name, returning its stable id.
    pub fn intern_symbol(&mut self, name: &str) -> SymbolId {
        if let Some(&id) = self.symbol_ids.get(name) {
            return id;
        }
        #[allow(clippy::cast_possible_truncation)]
        let id = self.symbol_names.len() as SymbolId;
        self.symbol_ids.insert(name.to_string(), id);
        self.symbol_names.push(name.to_string());
        id
    }

    /// The name behind a symbol id.
    #[must_use]
    pub fn symbol_name(&self, id: SymbolId) -> &str {
        &self.symbol_names[id as usize]
    }

    /// Looks up a symbol id without interning.
    #[must_use]
    pub fn find_symbol(&self, name: &str) -> Option<SymbolId> {
        self.symbol_ids.get(name).copied()
    }

    /// Interns a string literal.
    pub fn intern_string(&mut self, text: &str) -> StringId {
        if let Some(&id) = self.string_ids.get(text) {
            return id;
        }
        #[allow(clippy::cast_possible_truncation)]
        let id = self.strings.len() as StringId;
        self.string_ids.insert(text.to_string(), id);
        self.strings.push(text.to_string());
        id
    }

    /// The text behind a string id.
    #[must_use]
    pub fn string(&self, id: StringId) -> &str {
        &self.strings[id as usize]
    }

    // === Node constructors ===
    //
    // Constructors intern raw structure; canonicalisation is the engine's
    // job and happens on demand.

    /// A numeric literal node.
    pub fn number(&mut self, value: NumericValue) -> ExprHandle {
        self.intern(ExprNode::Number(value))
    }

    /// An exact integer literal node.
    pub fn int(&mut self, value: i64) -> ExprHandle {
        self.number(NumericValue::int(value))
    }

    /// A symbol node.
    pub fn symbol(&mut self, name: &str) -> ExprHandle {
        let id = self.intern_symbol(name);
        self.intern(ExprNode::Symbol(id))
    }

    /// A symbol node from an already-interned id.
    pub fn symbol_by_id(&mut self, id: SymbolId) -> ExprHandle {
        self.intern(ExprNode::Symbol(id))
    }

    /// A string literal node.
    pub fn string_literal(&mut self, text: &str) -> ExprHandle {
        let id = self.intern_string(text);
        self.intern(ExprNode::Str(id))
    }

    /// A function application with a named head.
    pub fn function(
        &mut self,
        head: SymbolId,
        ops: impl Into<SmallVec<[ExprHandle; 4]>>,
    ) -> ExprHandle {
        self.intern(ExprNode::Function {
            head: Head::Sym(head),
            ops: ops.into(),
        })
    }

    /// A function application with an arbitrary head.
    pub fn apply(
        &mut self,
        head: Head,
        ops: impl Into<SmallVec<[ExprHandle; 4]>>,
    ) -> ExprHandle {
        self.intern(ExprNode::Function {
            head,
            ops: ops.into(),
        })
    }

    /// A domain value node.
    pub fn domain(&mut self, domain: Domain) -> ExprHandle {
        self.intern(ExprNode::Domain(domain))
    }

    /// An in-band error node.
    pub fn error(&mut self, kind: ErrorKind, arg: Option<ExprHandle>) -> ExprHandle {
        self.intern(ExprNode::Error { kind, arg })
    }

    /// A tensor node. The shape product must equal the data length; the
    /// caller validates and reports `missing`/`unexpected-argument`
    /// otherwise.
    pub fn tensor(
        &mut self,
        dtype: TensorKind,
        shape: impl Into<SmallVec<[usize; 4]>>,
        data: Vec<ExprHandle>,
    ) -> ExprHandle {
        self.intern(ExprNode::Tensor {
            dtype,
            shape: shape.into(),
            data,
        })
    }
}
