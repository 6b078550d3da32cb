//! Type nodes.

use serde::Serialize;

use crate::span::{Ident, Span};

use super::{AnonConst, NodeId, PR, Path, WithSpan};

pub type PTy = PR<Box<Ty>>;

#[derive(Debug, Clone, Serialize)]
pub struct Ty {
    pub id: NodeId,
    pub kind: TyKind,
    pub span: Span,
}

impl WithSpan for Ty {
    fn span(&self) -> Span {
        self.span
    }
}

#[derive(Debug, Clone, Serialize)]
pub enum TyKind {
    Paren(PTy),
    /// `(T, U)` or `(name: T, other: U)`.
    Tuple(Vec<TupleTyEl>),
    /// `(T, U) -> R`.
    Func(FuncTy),
    /// `[T]`.
    Slice(PTy),
    /// `[T; N]`.
    Array(PTy, AnonConst),
    Path(Path),
    /// `()`.
    Unit,
}

#[derive(Debug, Clone, Serialize)]
pub struct TupleTyEl {
    pub id: NodeId,
    pub name: Option<PR<Ident>>,
    pub ty: PTy,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct FuncTy {
    pub params: Vec<TupleTyEl>,
    pub ret: PTy,
}
