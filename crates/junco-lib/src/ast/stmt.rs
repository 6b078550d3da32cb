//! Statement nodes.

use serde::Serialize;

use crate::span::Span;

use super::{Item, NodeId, PExpr, PPat, PR, PTy, WithSpan};

#[derive(Debug, Clone, Serialize)]
pub struct Stmt {
    pub id: NodeId,
    pub kind: StmtKind,
    pub span: Span,
}

impl WithSpan for Stmt {
    fn span(&self) -> Span {
        self.span
    }
}

#[derive(Debug, Clone, Serialize)]
pub enum StmtKind {
    Let(LetStmt),
    Item(PR<Box<Item>>),
    Expr(PExpr),
}

#[derive(Debug, Clone, Serialize)]
pub struct LetStmt {
    pub pat: PPat,
    pub ty: Option<PTy>,
    pub value: Option<PExpr>,
}
