//! Pattern nodes.

use serde::Serialize;

use crate::span::{Ident, Span};

use super::{Lit, NodeId, PR, Path, WithSpan};

pub type PPat = PR<Box<Pat>>;

#[derive(Debug, Clone, Serialize)]
pub struct Pat {
    pub id: NodeId,
    pub kind: PatKind,
    pub span: Span,
}

impl WithSpan for Pat {
    fn span(&self) -> Span {
        self.span
    }
}

#[derive(Debug, Clone, Serialize)]
pub enum PatKind {
    /// `p | p | p`.
    Multi(Vec<PPat>),
    Paren(PPat),
    Lit(LitPat),
    Ident(IdentPat),
    /// `& mut? pat`.
    Ref(RefPat),
    Path(Path),
    /// `_`.
    Wildcard,
    /// `...`; only valid inside struct, tuple, and slice patterns.
    Rest,
    Struct(StructPat),
    Tuple(TuplePat),
    Slice(SlicePat),
}

#[derive(Debug, Clone, Serialize)]
pub struct LitPat {
    /// Leading `-` on a numeric literal.
    pub neg: bool,
    pub lit: Lit,
}

/// `ref? mut? name (@ subpattern)?` — introduces a local named by the
/// pattern node's id.
#[derive(Debug, Clone, Serialize)]
pub struct IdentPat {
    pub is_ref: bool,
    pub is_mut: bool,
    pub ident: PR<Ident>,
    pub sub: Option<PPat>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefPat {
    pub is_mut: bool,
    pub pat: PPat,
}

#[derive(Debug, Clone, Serialize)]
pub struct StructPat {
    pub path: PR<Path>,
    pub fields: Vec<StructPatField>,
}

#[derive(Debug, Clone, Serialize)]
pub enum StructPatField {
    /// `field: pat`.
    Named {
        id: NodeId,
        ident: PR<Ident>,
        pat: PPat,
        span: Span,
    },
    /// `ref? mut? field` shortcut.
    Shortcut {
        id: NodeId,
        is_ref: bool,
        is_mut: bool,
        ident: PR<Ident>,
        span: Span,
    },
    /// `...`; must be the last field.
    Rest { span: Span },
}

impl StructPatField {
    pub fn span(&self) -> Span {
        match self {
            StructPatField::Named { span, .. }
            | StructPatField::Shortcut { span, .. }
            | StructPatField::Rest { span } => *span,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TuplePat {
    pub els: Vec<PPat>,
    /// Index of the `...` element, when present.
    pub rest_idx: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlicePat {
    pub els: Vec<PPat>,
}
