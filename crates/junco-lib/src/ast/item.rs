//! Item nodes.

use serde::Serialize;

use crate::span::{Ident, Span};

use super::{
    AnonConst, Attr, Body, FuncSig, GenericParam, NodeId, PExpr, PR, PTy, Path, UseTree, Vis,
    WithSpan, pr_span,
};

#[derive(Debug, Clone, Serialize)]
pub struct Item {
    pub id: NodeId,
    pub vis: Vis,
    pub attrs: Vec<Attr>,
    pub kind: ItemKind,
    pub span: Span,
}

impl WithSpan for Item {
    fn span(&self) -> Span {
        self.span
    }
}

impl Item {
    /// The item's declared name. `Impl` and `UseDecl` are unnamed.
    pub fn name(&self) -> Option<&PR<Ident>> {
        match &self.kind {
            ItemKind::Enum(item) => Some(&item.name),
            ItemKind::Struct(item) => Some(&item.name),
            ItemKind::Func(item) => Some(&item.name),
            ItemKind::Mod(item) => Some(&item.name),
            ItemKind::Trait(item) => Some(&item.name),
            ItemKind::TypeAlias(item) => Some(&item.name),
            ItemKind::Const(item) => Some(&item.name),
            ItemKind::Impl(_) | ItemKind::Use(_) | ItemKind::Init(_) => None,
        }
    }

    pub fn generics(&self) -> Option<&[GenericParam]> {
        match &self.kind {
            ItemKind::Enum(item) => Some(&item.generics),
            ItemKind::Struct(item) => Some(&item.generics),
            ItemKind::Func(item) => Some(&item.generics),
            ItemKind::Trait(item) => Some(&item.generics),
            ItemKind::TypeAlias(item) => Some(&item.generics),
            ItemKind::Impl(item) => Some(&item.generics),
            ItemKind::Init(item) => Some(&item.generics),
            ItemKind::Mod(_) | ItemKind::Use(_) | ItemKind::Const(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub enum ItemKind {
    Enum(EnumItem),
    Struct(StructItem),
    Func(FuncItem),
    Impl(ImplItem),
    Mod(ModItem),
    Trait(TraitItem),
    TypeAlias(TypeAliasItem),
    Use(UseDecl),
    Init(InitItem),
    Const(ConstItem),
}

#[derive(Debug, Clone, Serialize)]
pub struct EnumItem {
    pub name: PR<Ident>,
    pub generics: Vec<GenericParam>,
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Variant {
    pub id: NodeId,
    pub name: PR<Ident>,
    pub kind: VariantKind,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub enum VariantKind {
    /// `Red` or `Red = expr`.
    Unit(Option<AnonConst>),
    /// `Rgb(u8, u8, u8)`.
    Tuple(Vec<StructField>),
    /// `Rgb { r: u8, ... }`.
    Struct(Vec<StructField>),
}

#[derive(Debug, Clone, Serialize)]
pub struct StructItem {
    pub name: PR<Ident>,
    pub generics: Vec<GenericParam>,
    pub fields: Vec<StructField>,
}

/// Field of a struct or enum variant; tuple fields have no name.
#[derive(Debug, Clone, Serialize)]
pub struct StructField {
    pub id: NodeId,
    pub vis: Vis,
    pub name: Option<PR<Ident>>,
    pub ty: PTy,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct FuncItem {
    pub name: PR<Ident>,
    pub generics: Vec<GenericParam>,
    pub sig: FuncSig,
    /// Absent in trait method declarations.
    pub body: Option<Body>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImplItem {
    pub generics: Vec<GenericParam>,
    /// `impl Trait for Ty` carries the trait path.
    pub trait_path: Option<PR<Path>>,
    pub ty: PTy,
    pub members: Vec<PR<Item>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModItem {
    pub name: PR<Ident>,
    pub items: Vec<PR<Item>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TraitItem {
    pub name: PR<Ident>,
    pub generics: Vec<GenericParam>,
    pub super_traits: Vec<PR<Path>>,
    pub members: Vec<PR<Item>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeAliasItem {
    pub name: PR<Ident>,
    pub generics: Vec<GenericParam>,
    /// Absent in trait associated type declarations.
    pub ty: Option<PTy>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UseDecl {
    pub use_tree: PR<UseTree>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InitItem {
    pub generics: Vec<GenericParam>,
    pub sig: FuncSig,
    pub body: Option<Body>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConstItem {
    pub name: PR<Ident>,
    pub ty: PTy,
    pub value: Option<PExpr>,
}

impl ConstItem {
    pub fn value_span(&self) -> Option<Span> {
        self.value.as_ref().map(pr_span)
    }
}
