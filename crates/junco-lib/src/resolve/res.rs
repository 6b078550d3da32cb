//! Resolution results.

use std::collections::HashMap;

use serde::Serialize;

use crate::ast::NodeId;

use super::def::{DefId, FOSId};
use super::module::PrimType;

/// What a name reference resolved to.
///
/// Failed resolutions are stored as `Error` (with a diagnostic already
/// emitted), so lookups by later passes are total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Res {
    Def(DefId),
    /// A function overload set, when the reference site carried no
    /// suffix information; disambiguated by a later pass.
    Fos(FOSId),
    Local(NodeId),
    PrimType(PrimType),
    Error,
}

impl Res {
    pub fn is_error(self) -> bool {
        self == Res::Error
    }

    pub fn as_def(self) -> Option<DefId> {
        match self {
            Res::Def(def) => Some(def),
            _ => None,
        }
    }

    pub fn as_local(self) -> Option<NodeId> {
        match self {
            Res::Local(node) => Some(node),
            _ => None,
        }
    }
}

/// `NodeId → Res` map filled by the name resolver.
#[derive(Debug, Clone, Default)]
pub struct Resolutions {
    map: HashMap<NodeId, Res>,
}

impl Resolutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, node: NodeId, res: Res) {
        self.map.insert(node, res);
    }

    /// Resolution of a node the resolver visited; `None` for nodes it
    /// never reached (callers treat that as `Res::Error`).
    pub fn get(&self, node: NodeId) -> Option<Res> {
        self.map.get(&node).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Entries sorted by node id, for deterministic dumps.
    pub fn sorted(&self) -> Vec<(NodeId, Res)> {
        let mut entries: Vec<_> = self.map.iter().map(|(&node, &res)| (node, res)).collect();
        entries.sort_by_key(|&(node, _)| node);
        entries
    }
}
