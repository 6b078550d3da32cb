//! Definitions and the definition table.
//!
//! Every named declaration gets a dense `DefId`. Functions are special:
//! a module binds their base name to a *function overload set* (`FOSId`),
//! a map from call-shape suffix (`f(x:)`, `f(_:times:)`) to the overload's
//! `DefId`. Import aliases are definitions too, with a recorded target;
//! `unwind_def_id` follows alias chains to the real definition.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;

use junco_core::{Symbol, ice};

use crate::ast::NodeId;
use crate::span::{Ident, Span};

/// Dense id of a definition. `ROOT` is pre-allocated for the party root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DefId(pub u32);

impl DefId {
    pub const ROOT: DefId = DefId(0);

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    pub fn is_root(self) -> bool {
        self == DefId::ROOT
    }
}

/// Id of a function overload set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FOSId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DefKind {
    Const,
    ConstParam,
    DefaultInit,
    Enum,
    Func,
    Impl,
    ImportAlias,
    Init,
    Lifetime,
    Mod,
    Struct,
    Trait,
    TypeAlias,
    TypeParam,
    Variant,
}

impl DefKind {
    /// The namespace a definition of this kind binds in. Fixed.
    pub fn ns(self) -> Namespace {
        match self {
            DefKind::Enum
            | DefKind::Impl
            | DefKind::Mod
            | DefKind::Struct
            | DefKind::Trait
            | DefKind::TypeAlias
            | DefKind::TypeParam
            | DefKind::Variant => Namespace::Type,
            DefKind::Const
            | DefKind::ConstParam
            | DefKind::DefaultInit
            | DefKind::Func
            | DefKind::ImportAlias
            | DefKind::Init => Namespace::Value,
            DefKind::Lifetime => Namespace::Lifetime,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DefKind::Const => "`const`",
            DefKind::ConstParam => "`const` parameter",
            DefKind::DefaultInit => "default initializer",
            DefKind::Enum => "`enum`",
            DefKind::Func => "`func`",
            DefKind::Impl => "`impl`",
            DefKind::ImportAlias => "import",
            DefKind::Init => "`init` (initializer)",
            DefKind::Lifetime => "lifetime parameter",
            DefKind::Mod => "`mod`",
            DefKind::Struct => "`struct`",
            DefKind::Trait => "`trait`",
            DefKind::TypeAlias => "`type` alias",
            DefKind::TypeParam => "type parameter",
            DefKind::Variant => "`enum` variant",
        }
    }

    /// Kinds that scope a module of their own.
    pub fn is_module_like(self) -> bool {
        matches!(
            self,
            DefKind::Mod
                | DefKind::Enum
                | DefKind::Struct
                | DefKind::Trait
                | DefKind::Impl
                | DefKind::Func
                | DefKind::Init
        )
    }
}

/// The three disjoint binding spaces of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Namespace {
    Value,
    Type,
    Lifetime,
}

impl Namespace {
    pub const ALL: [Namespace; 3] = [Namespace::Value, Namespace::Type, Namespace::Lifetime];

    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Value => "value",
            Namespace::Type => "type",
            Namespace::Lifetime => "lifetime",
        }
    }
}

/// Per-namespace carrier.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PerNS<T> {
    pub value: T,
    pub ty: T,
    pub lifetime: T,
}

impl<T> PerNS<T> {
    pub fn get(&self, ns: Namespace) -> &T {
        match ns {
            Namespace::Value => &self.value,
            Namespace::Type => &self.ty,
            Namespace::Lifetime => &self.lifetime,
        }
    }

    pub fn get_mut(&mut self, ns: Namespace) -> &mut T {
        match ns {
            Namespace::Value => &mut self.value,
            Namespace::Type => &mut self.ty,
            Namespace::Lifetime => &mut self.lifetime,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Namespace, &T)> {
        Namespace::ALL.iter().map(|&ns| (ns, self.get(ns)))
    }
}

/// Definition visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Vis {
    #[default]
    Unset,
    Pub,
}

impl Vis {
    pub fn is_pub(self) -> bool {
        self == Vis::Pub
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Def {
    pub id: DefId,
    pub kind: DefKind,
    pub ident: Ident,
}

/// What a name binds to inside a module: a single definition or a
/// function overload set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NameBinding {
    Def(DefId),
    Fos(FOSId),
}

/// Suffixes that collided while importing a whole overload set.
#[derive(Debug, Clone, Default)]
pub struct FosRedefs {
    pub suffixes: Vec<Symbol>,
}

impl FosRedefs {
    pub fn ok(&self) -> bool {
        self.suffixes.is_empty()
    }
}

/// The definition table: dense definitions plus the ancillary per-def
/// maps, function overload sets, and import aliases.
#[derive(Debug, Clone)]
pub struct DefTable {
    defs: Vec<Def>,
    vis: Vec<Vis>,
    /// Originating AST node per def; `NodeId::DUMMY` for the root and
    /// synthesized defs.
    def_node: Vec<NodeId>,
    node_def: HashMap<NodeId, DefId>,
    fos_list: Vec<IndexMap<Symbol, DefId>>,
    import_aliases: HashMap<DefId, DefId>,
}

impl DefTable {
    pub fn new(root_ident: Ident) -> Self {
        Self {
            defs: vec![Def {
                id: DefId::ROOT,
                kind: DefKind::Mod,
                ident: root_ident,
            }],
            vis: vec![Vis::Pub],
            def_node: vec![NodeId::DUMMY],
            node_def: HashMap::new(),
            fos_list: Vec::new(),
            import_aliases: HashMap::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.defs.len()
    }

    pub fn defs(&self) -> &[Def] {
        &self.defs
    }

    /// Allocate the next `DefId`. Total for valid ids, ICE otherwise.
    pub fn define(&mut self, vis: Vis, node_id: NodeId, kind: DefKind, ident: Ident) -> DefId {
        let id = DefId(self.defs.len() as u32);
        self.defs.push(Def { id, kind, ident });
        self.vis.push(vis);
        self.def_node.push(node_id);
        if node_id != NodeId::DUMMY {
            self.node_def.insert(node_id, id);
        }
        id
    }

    pub fn def(&self, id: DefId) -> &Def {
        match self.defs.get(id.as_usize()) {
            Some(def) => def,
            None => ice!("DefTable::def called with non-existent {id:?}"),
        }
    }

    pub fn vis_of(&self, id: DefId) -> Vis {
        match self.vis.get(id.as_usize()) {
            Some(&vis) => vis,
            None => ice!("DefTable::vis_of called with non-existent {id:?}"),
        }
    }

    pub fn node_of(&self, id: DefId) -> NodeId {
        match self.def_node.get(id.as_usize()) {
            Some(&node) => node,
            None => ice!("DefTable::node_of called with non-existent {id:?}"),
        }
    }

    pub fn def_of_node(&self, node: NodeId) -> Option<DefId> {
        self.node_def.get(&node).copied()
    }

    /// Span of the definition's name, for "previously defined here"
    /// labels.
    pub fn name_span(&self, id: DefId) -> Span {
        self.def(id).ident.span
    }

    // Function overload sets //

    pub fn new_fos(&mut self) -> FOSId {
        let id = FOSId(self.fos_list.len() as u32);
        self.fos_list.push(IndexMap::new());
        id
    }

    pub fn fos(&self, id: FOSId) -> &IndexMap<Symbol, DefId> {
        match self.fos_list.get(id.0 as usize) {
            Some(fos) => fos,
            None => ice!("DefTable::fos called with non-existent {id:?}"),
        }
    }

    pub fn fos_list(&self) -> &[IndexMap<Symbol, DefId>] {
        &self.fos_list
    }

    /// Add an overload to a set (allocating the set when `fos_id` is
    /// `None`). `Err` carries the set and the previous definition of the
    /// colliding suffix.
    pub fn try_define_func(
        &mut self,
        def_id: DefId,
        fos_id: Option<FOSId>,
        suffix: Symbol,
    ) -> Result<FOSId, (FOSId, DefId)> {
        let fos_id = fos_id.unwrap_or_else(|| self.new_fos());
        let fos = &mut self.fos_list[fos_id.0 as usize];
        if let Some(&prev) = fos.get(&suffix) {
            return Err((fos_id, prev));
        }
        fos.insert(suffix, def_id);
        Ok(fos_id)
    }

    /// First overload of a set; every set has at least one.
    pub fn fos_first_def(&self, id: FOSId) -> DefId {
        match self.fos(id).values().next() {
            Some(&def) => def,
            None => ice!("empty function overload set {id:?}"),
        }
    }

    pub fn fos_first_span(&self, id: FOSId) -> Span {
        self.name_span(self.fos_first_def(id))
    }

    // Import aliases //

    /// Allocate an `ImportAlias` definition pointing at `target`.
    pub fn define_import_alias(
        &mut self,
        vis: Vis,
        path_node_id: NodeId,
        target: DefId,
        ident: Ident,
    ) -> DefId {
        let alias = self.define(vis, path_node_id, DefKind::ImportAlias, ident);
        self.import_aliases.insert(alias, target);
        alias
    }

    pub fn import_alias_target(&self, alias: DefId) -> DefId {
        match self.import_aliases.get(&alias) {
            Some(&target) => target,
            None => ice!("DefTable::import_alias_target: {alias:?} is not an alias"),
        }
    }

    /// Follow alias chains to the real definition. Total.
    pub fn unwind_def_id(&self, id: DefId) -> DefId {
        let mut unwound = id;
        while self.def(unwound).kind == DefKind::ImportAlias {
            unwound = self.import_alias_target(unwound);
        }
        unwound
    }

    /// The definition an id names, aliases unwound.
    pub fn def_unwind(&self, id: DefId) -> &Def {
        self.def(self.unwind_def_id(id))
    }

    /// Span to point at for a binding: the definition's name, or the
    /// first overload for a set.
    pub fn binding_span(&self, binding: NameBinding) -> Span {
        match binding {
            NameBinding::Def(def) => self.name_span(def),
            NameBinding::Fos(fos) => self.fos_first_span(fos),
        }
    }

    pub fn binding_kind_str(&self, binding: NameBinding) -> &'static str {
        match binding {
            NameBinding::Def(def) => self.def(def).kind.as_str(),
            NameBinding::Fos(_) => DefKind::Func.as_str(),
        }
    }
}
