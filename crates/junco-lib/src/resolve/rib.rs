//! Lexical scope frames.

use std::collections::HashMap;

use junco_core::Symbol;

use crate::ast::NodeId;

use super::module::ModuleId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RibKind {
    /// Plain frame (function params, match arms, generic params).
    Raw,
    /// The party root.
    Root,
    /// A `mod` body.
    Mod,
}

/// One lexical scope frame. Name lookup walks the rib stack from
/// innermost to outermost; a rib may also contribute a module's
/// namespace into lexical scope (`bound_module`).
#[derive(Debug, Clone)]
pub struct Rib {
    pub kind: RibKind,
    /// Locals introduced by patterns: name to the binding pattern's node.
    pub locals: HashMap<Symbol, NodeId>,
    pub bound_module: Option<ModuleId>,
}

/// A rib frame preserved after resolution for inspection
/// (`--print=ribs`), together with the stack depth it occupied.
#[derive(Debug, Clone)]
pub struct RibSnapshot {
    pub depth: usize,
    pub rib: Rib,
}

impl Rib {
    pub fn new(kind: RibKind) -> Self {
        Self {
            kind,
            locals: HashMap::new(),
            bound_module: None,
        }
    }

    pub fn bound_to(kind: RibKind, module: ModuleId) -> Self {
        Self {
            kind,
            locals: HashMap::new(),
            bound_module: Some(module),
        }
    }

    /// Define a local; returns the previously bound node when the name
    /// is already taken in this rib.
    pub fn define_local(&mut self, name: Symbol, node: NodeId) -> Option<NodeId> {
        match self.locals.get(&name) {
            Some(&prev) => Some(prev),
            None => {
                self.locals.insert(name, node);
                None
            }
        }
    }

    pub fn find_local(&self, name: Symbol) -> Option<NodeId> {
        self.locals.get(&name).copied()
    }
}
