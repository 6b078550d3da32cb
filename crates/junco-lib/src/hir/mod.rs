//! High-level intermediate representation.
//!
//! The HIR mirrors the AST with the syntax-only layers stripped: parens
//! are gone, `for`/`while` and the keyword logic operators are
//! desugared, paths carry their resolution. Items are keyed by
//! `ItemId` (a `DefId`) and collected in `Party::owners`; function and
//! constant bodies are split off into `Party::bodies` so a later pass
//! can type-check each one independently.
//!
//! Every node carries an owner-scoped `HirId`: the owner definition plus
//! a dense per-owner counter, where child `0` is the owner itself.

pub mod lower;
pub mod printer;

#[cfg(test)]
mod lower_tests;

use indexmap::IndexMap;
use serde::Serialize;

use junco_core::Symbol;

use crate::ast::{BinOp, Lit, NodeId, PostfixOp, PrefixOp};
use crate::resolve::{DefId, Res, Vis};
use crate::span::{Ident, Span, Spanned};

/// Owner-scoped node id, unique across the HIR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct HirId {
    pub owner: DefId,
    pub child: u32,
}

impl HirId {
    /// The id designating the owner node itself.
    pub const fn owner_of(owner: DefId) -> HirId {
        HirId { owner, child: 0 }
    }
}

/// Id of a separated body: the `NodeId` of its value expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BodyId(pub NodeId);

/// Items are referenced by their definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ItemId(pub DefId);

/// The lowered compilation unit. Immutable once produced.
#[derive(Debug, Clone, Serialize)]
pub struct Party {
    /// The synthesized root module item (`DefId::ROOT`).
    pub root_mod: ItemId,
    pub owners: IndexMap<DefId, Item>,
    pub bodies: IndexMap<BodyId, Body>,
    /// Owners that are modules, root first.
    pub modules: Vec<DefId>,
}

impl Party {
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.owners.get(&id.0)
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(&id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Item {
    pub hir_id: HirId,
    pub def_id: DefId,
    pub ident: Ident,
    pub vis: Vis,
    pub kind: ItemKind,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub enum ItemKind {
    Mod(Mod),
    Enum { variants: Vec<Variant> },
    Struct { fields: Vec<FieldDef> },
    Trait { members: Vec<ItemId> },
    Impl { members: Vec<ItemId> },
    Func(FuncItem),
    Init(FuncItem),
    TypeAlias { ty: Option<Ty> },
    Const { ty: Ty, body: Option<BodyId> },
}

#[derive(Debug, Clone, Serialize)]
pub struct Mod {
    pub items: Vec<ItemId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Variant {
    pub hir_id: HirId,
    pub def_id: DefId,
    pub ident: Ident,
    pub fields: Vec<FieldDef>,
    pub disc: Option<BodyId>,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldDef {
    pub hir_id: HirId,
    pub ident: Option<Ident>,
    pub ty: Ty,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct FuncItem {
    pub sig: FuncSig,
    /// Absent for trait method declarations.
    pub body: Option<BodyId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FuncSig {
    pub has_self: bool,
    pub inputs: Vec<Ty>,
    /// Call-site labels, positionally aligned with `inputs`.
    pub labels: Vec<Option<Symbol>>,
    /// `None` is the default (unit) return type.
    pub output: Option<Ty>,
    pub span: Span,
}

/// A separated, independently type-checkable body.
#[derive(Debug, Clone, Serialize)]
pub struct Body {
    pub params: Vec<Pat>,
    pub value: Expr,
}

#[derive(Debug, Clone, Serialize)]
pub struct Block {
    pub hir_id: HirId,
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct Stmt {
    pub hir_id: HirId,
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub enum StmtKind {
    Let(LetStmt),
    Item(ItemId),
    Expr(Expr),
}

#[derive(Debug, Clone, Serialize)]
pub struct LetStmt {
    pub pat: Pat,
    pub ty: Option<Ty>,
    pub value: Option<Expr>,
}

/// A path with its resolution; segments are kept for diagnostics and
/// later re-resolution of symbolic (desugared) names.
#[derive(Debug, Clone, Serialize)]
pub struct Path {
    pub res: Res,
    pub segs: Vec<Ident>,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct Expr {
    pub hir_id: HirId,
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub enum ExprKind {
    /// Plain `=`; compound assignments were expanded.
    Assign {
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Block(Block),
    Borrow {
        is_mut: bool,
        expr: Box<Expr>,
    },
    Break {
        expr: Option<Box<Expr>>,
    },
    Cast {
        expr: Box<Expr>,
        ty: Box<Ty>,
    },
    Continue,
    Field {
        lhs: Box<Expr>,
        field: Ident,
    },
    If {
        cond: Box<Expr>,
        then: Block,
        els: Option<Box<Expr>>,
    },
    Infix {
        lhs: Box<Expr>,
        op: Spanned<BinOp>,
        rhs: Box<Expr>,
    },
    Invoke {
        callee: Box<Expr>,
        args: Vec<Arg>,
    },
    Lambda {
        params: Vec<Pat>,
        body: Box<Expr>,
    },
    List(Vec<Expr>),
    Lit(Lit),
    Loop {
        body: Block,
    },
    Match {
        subject: Box<Expr>,
        arms: Vec<Arm>,
    },
    Path(Path),
    Postfix {
        lhs: Box<Expr>,
        op: Spanned<PostfixOp>,
    },
    Prefix {
        op: Spanned<PrefixOp>,
        rhs: Box<Expr>,
    },
    Return {
        expr: Option<Box<Expr>>,
    },
    Spread(Box<Expr>),
    Struct {
        path: Path,
        fields: Vec<StructExprField>,
    },
    Subscript {
        lhs: Box<Expr>,
        indices: Vec<Expr>,
    },
    Tuple(Vec<Expr>),
    Unit,
    /// Recovery marker carried over from a failed parse.
    Err,
}

#[derive(Debug, Clone, Serialize)]
pub struct Arg {
    pub label: Option<Ident>,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub enum StructExprField {
    Full(Ident, Expr),
    Base(Expr),
}

#[derive(Debug, Clone, Serialize)]
pub struct Arm {
    pub hir_id: HirId,
    pub pat: Pat,
    pub guard: Option<Expr>,
    pub body: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct Pat {
    pub hir_id: HirId,
    pub kind: PatKind,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub enum PatKind {
    Multi(Vec<Pat>),
    Lit {
        neg: bool,
        lit: Lit,
    },
    Ident {
        is_ref: bool,
        is_mut: bool,
        ident: Ident,
        /// The AST node that names this local in `Res::Local`.
        node: NodeId,
        sub: Option<Box<Pat>>,
    },
    Ref {
        is_mut: bool,
        pat: Box<Pat>,
    },
    Path(Path),
    Wildcard,
    Rest,
    Struct {
        path: Path,
        fields: Vec<PatField>,
        rest: bool,
    },
    Tuple {
        els: Vec<Pat>,
        rest_idx: Option<usize>,
    },
    Slice(Vec<Pat>),
    Err,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatField {
    pub ident: Ident,
    pub pat: Pat,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct Ty {
    pub hir_id: HirId,
    pub kind: TyKind,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub enum TyKind {
    Tuple(Vec<Ty>),
    Func {
        params: Vec<Ty>,
        ret: Box<Ty>,
    },
    Slice(Box<Ty>),
    Array {
        ty: Box<Ty>,
        /// Array sizes are independent bodies, type-checked later.
        size: BodyId,
    },
    Path(Path),
    Unit,
    Err,
}
