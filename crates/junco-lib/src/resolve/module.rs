//! Module tree: namespace scopes as an arena of parent-linked nodes.
//!
//! Modules form parent/child cycles, so the tree is an arena indexed by
//! `ModuleId` with `parent: Option<ModuleId>` instead of shared
//! pointers. A module is either a `Def` scope (mod, enum, struct,
//! trait, impl, func, init, and the party root) or a `Block` scope keyed
//! by its block's `NodeId`.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;

use junco_core::{Symbol, ice};

use crate::ast::NodeId;

use super::def::{DefId, NameBinding, Namespace, PerNS};

/// Arena index of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ModuleId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModuleKind {
    Block(NodeId),
    Def(DefId),
}

/// Built-in primitive types. The discriminant doubles as the bit index
/// in a module's shadowing mask, so order matters and `Str` stays last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u16)]
pub enum PrimType {
    Bool = 0,
    Int,
    Uint,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    Char,
    Str,
}

/// One bit per `PrimType` variant.
pub type PrimTypeSet = u16;

impl PrimType {
    pub const ALL: [PrimType; 13] = [
        PrimType::Bool,
        PrimType::Int,
        PrimType::Uint,
        PrimType::I8,
        PrimType::I16,
        PrimType::I32,
        PrimType::I64,
        PrimType::U8,
        PrimType::U16,
        PrimType::U32,
        PrimType::U64,
        PrimType::Char,
        PrimType::Str,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PrimType::Bool => "bool",
            PrimType::Int => "int",
            PrimType::Uint => "uint",
            PrimType::I8 => "i8",
            PrimType::I16 => "i16",
            PrimType::I32 => "i32",
            PrimType::I64 => "i64",
            PrimType::U8 => "u8",
            PrimType::U16 => "u16",
            PrimType::U32 => "u32",
            PrimType::U64 => "u64",
            PrimType::Char => "char",
            PrimType::Str => "str",
        }
    }

    pub fn from_str(name: &str) -> Option<PrimType> {
        PrimType::ALL.into_iter().find(|prim| prim.as_str() == name)
    }

    pub fn mask(self) -> PrimTypeSet {
        1 << self as u16
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Module {
    pub kind: ModuleKind,
    pub parent: Option<ModuleId>,
    /// Nearest enclosing `mod` definition (or the root); the unit of
    /// visibility.
    pub nearest_mod_def: DefId,
    pub per_ns: PerNS<IndexMap<Symbol, NameBinding>>,
    /// Primitive type names shadowed by user bindings in this module.
    pub shadowed_prim_types: PrimTypeSet,
}

impl Module {
    pub fn find(&self, ns: Namespace, name: Symbol) -> Option<NameBinding> {
        self.per_ns.get(ns).get(&name).copied()
    }

    /// Search all namespaces; used to suggest alternatives for failed
    /// resolutions.
    pub fn find_all(&self, name: Symbol) -> PerNS<Option<NameBinding>> {
        PerNS {
            value: self.find(Namespace::Value, name),
            ty: self.find(Namespace::Type, name),
            lifetime: self.find(Namespace::Lifetime, name),
        }
    }

    /// Bind `name`, returning the previous binding on collision without
    /// replacing it.
    pub fn try_define(
        &mut self,
        ns: Namespace,
        name: Symbol,
        binding: NameBinding,
    ) -> Option<NameBinding> {
        match self.per_ns.get_mut(ns).entry(name) {
            indexmap::map::Entry::Occupied(entry) => Some(*entry.get()),
            indexmap::map::Entry::Vacant(entry) => {
                entry.insert(binding);
                None
            }
        }
    }

    pub fn def_id(&self) -> DefId {
        match self.kind {
            ModuleKind::Def(def) => def,
            ModuleKind::Block(node) => {
                ice!("expected a def module, found block module of node {node:?}")
            }
        }
    }
}

/// The arena of all modules of a session.
#[derive(Debug, Clone)]
pub struct ModuleTree {
    modules: Vec<Module>,
    def_modules: HashMap<DefId, ModuleId>,
    block_modules: HashMap<NodeId, ModuleId>,
    /// Module each `use` declaration appeared in; filled by the module
    /// tree builder, consumed by the importer.
    use_decl_modules: HashMap<NodeId, ModuleId>,
}

impl ModuleTree {
    pub const ROOT: ModuleId = ModuleId(0);

    pub fn new() -> Self {
        let root = Module {
            kind: ModuleKind::Def(DefId::ROOT),
            parent: None,
            nearest_mod_def: DefId::ROOT,
            per_ns: PerNS::default(),
            shadowed_prim_types: 0,
        };
        let mut tree = Self {
            modules: vec![root],
            def_modules: HashMap::new(),
            block_modules: HashMap::new(),
            use_decl_modules: HashMap::new(),
        };
        tree.def_modules.insert(DefId::ROOT, ModuleTree::ROOT);
        tree
    }

    pub fn module(&self, id: ModuleId) -> &Module {
        match self.modules.get(id.0 as usize) {
            Some(module) => module,
            None => ice!("ModuleTree::module called with non-existent {id:?}"),
        }
    }

    pub fn module_mut(&mut self, id: ModuleId) -> &mut Module {
        match self.modules.get_mut(id.0 as usize) {
            Some(module) => module,
            None => ice!("ModuleTree::module_mut called with non-existent {id:?}"),
        }
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ModuleId, &Module)> {
        self.modules
            .iter()
            .enumerate()
            .map(|(idx, module)| (ModuleId(idx as u32), module))
    }

    pub fn add_def_module(&mut self, def: DefId, parent: ModuleId, nearest_mod_def: DefId) -> ModuleId {
        let id = self.push(Module {
            kind: ModuleKind::Def(def),
            parent: Some(parent),
            nearest_mod_def,
            per_ns: PerNS::default(),
            shadowed_prim_types: 0,
        });
        self.def_modules.insert(def, id);
        id
    }

    pub fn add_block_module(&mut self, node: NodeId, parent: ModuleId, nearest_mod_def: DefId) -> ModuleId {
        let id = self.push(Module {
            kind: ModuleKind::Block(node),
            parent: Some(parent),
            nearest_mod_def,
            per_ns: PerNS::default(),
            shadowed_prim_types: 0,
        });
        self.block_modules.insert(node, id);
        id
    }

    fn push(&mut self, module: Module) -> ModuleId {
        let id = ModuleId(self.modules.len() as u32);
        self.modules.push(module);
        id
    }

    /// Module scoped by a definition (mod, struct, func, ...).
    pub fn def_module(&self, def: DefId) -> Option<ModuleId> {
        self.def_modules.get(&def).copied()
    }

    pub fn block_module(&self, node: NodeId) -> Option<ModuleId> {
        self.block_modules.get(&node).copied()
    }

    pub fn set_use_decl_module(&mut self, node: NodeId, module: ModuleId) {
        self.use_decl_modules.insert(node, module);
    }

    pub fn use_decl_module(&self, node: NodeId) -> Option<ModuleId> {
        self.use_decl_modules.get(&node).copied()
    }

    /// Accumulated primitive-shadowing mask along the parent chain
    /// starting at `from`.
    pub fn shadowed_prims(&self, from: ModuleId) -> PrimTypeSet {
        let mut mask = 0;
        let mut cursor = Some(from);
        while let Some(id) = cursor {
            let module = self.module(id);
            mask |= module.shadowed_prim_types;
            cursor = module.parent;
        }
        mask
    }

    /// Whether `target_mod_def` (the `mod` owning a private binding) is
    /// on the `mod` chain of `from` — the visibility rule for non-`pub`
    /// bindings.
    pub fn is_inside_mod(&self, from: ModuleId, target_mod_def: DefId) -> bool {
        let mut cursor = Some(from);
        while let Some(id) = cursor {
            let module = self.module(id);
            if module.nearest_mod_def == target_mod_def {
                return true;
            }
            if let ModuleKind::Def(def) = module.kind {
                if def == target_mod_def {
                    return true;
                }
            }
            cursor = module.parent;
        }
        false
    }
}

impl Default for ModuleTree {
    fn default() -> Self {
        Self::new()
    }
}
