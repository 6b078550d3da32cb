//! Shared compilation state.
//!
//! A `Session` owns the source map, the interner, the definition table,
//! the module tree, the resolution table, and the `NodeId → Span` map.
//! Stages mutate disjoint fields and run to completion before the next
//! begins, so no interior synchronization is needed; the whole front-end
//! is single-threaded.

use junco_core::{Interner, Kw, Symbol};

use crate::ast::NodeId;
use crate::resolve::{DefTable, ModuleTree, Resolutions, RibSnapshot};
use crate::source_map::SourceMap;
use crate::span::{Ident, Span};

/// How far the pipeline runs before stopping for inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum CompileDepth {
    /// Lex, parse, and validate only.
    Parser,
    /// Additionally build the module tree, imports, and resolutions.
    NameResolution,
    /// The full front-end, ending with HIR.
    #[default]
    Lowering,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub source_map: SourceMap,
    pub interner: Interner,
    pub def_table: DefTable,
    pub modules: ModuleTree,
    pub resolutions: Resolutions,
    /// Rib frames preserved by the name resolver, in pop
    /// (innermost-first) order.
    pub rib_snapshots: Vec<RibSnapshot>,
    /// Span of every allocated node; index 0 backs `NodeId::DUMMY`.
    node_spans: Vec<Span>,
}

impl Session {
    pub fn new() -> Self {
        let interner = Interner::new();
        let root_ident = Ident::new(Symbol::from_kw(Kw::Root), Span::DUMMY);
        Self {
            source_map: SourceMap::new(),
            interner,
            def_table: DefTable::new(root_ident),
            modules: ModuleTree::new(),
            resolutions: Resolutions::new(),
            rib_snapshots: Vec::new(),
            node_spans: vec![Span::DUMMY],
        }
    }

    /// Allocate the next `NodeId`, recording its span.
    pub fn alloc_node(&mut self, span: Span) -> NodeId {
        let id = NodeId(self.node_spans.len() as u32);
        self.node_spans.push(span);
        id
    }

    /// Span of a node. Total: every allocated id has one.
    pub fn node_span(&self, id: NodeId) -> Span {
        match self.node_spans.get(id.as_usize()) {
            Some(&span) => span,
            None => junco_core::ice!("Session::node_span: unknown node {id:?}"),
        }
    }

    /// Number of allocated nodes, the dummy included.
    pub fn node_count(&self) -> usize {
        self.node_spans.len()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
