//! Expression nodes.

use serde::Serialize;

use crate::span::{Ident, Span, Spanned};

use super::{Arg, Lit, NodeId, PBlock, PPat, PR, PTy, Path, WithSpan};

pub type PExpr = PR<Box<Expr>>;

#[derive(Debug, Clone, Serialize)]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
    pub span: Span,
}

impl WithSpan for Expr {
    fn span(&self) -> Span {
        self.span
    }
}

#[derive(Debug, Clone, Serialize)]
pub enum ExprKind {
    Assign(AssignExpr),
    Block(PBlock),
    Borrow(BorrowExpr),
    Break(BreakExpr),
    Cast(CastExpr),
    Continue,
    Field(FieldExpr),
    For(ForExpr),
    If(IfExpr),
    Infix(InfixExpr),
    Invoke(InvokeExpr),
    Lambda(LambdaExpr),
    List(Vec<PExpr>),
    Literal(Lit),
    Loop(PBlock),
    Match(MatchExpr),
    Paren(PExpr),
    Path(Path),
    Postfix(PostfixExpr),
    Prefix(PrefixExpr),
    Return(ReturnExpr),
    SelfExpr,
    Spread(PExpr),
    Struct(StructExpr),
    Subscript(SubscriptExpr),
    Tuple(Vec<PExpr>),
    Unit,
    While(WhileExpr),
}

/// Binary operators, including the keyword operators `and`/`or` which
/// lowering desugars away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    And,
    Or,
    BitAnd,
    BitOr,
    Xor,
    Shl,
    Shr,
    Eq,
    NotEq,
    RefEq,
    RefNotEq,
    Lt,
    Le,
    Gt,
    Ge,
    Spaceship,
    Range,
    RangeEq,
}

impl BinOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Pow => "**",
            BinOp::And => "and",
            BinOp::Or => "or",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::Xor => "^",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::RefEq => "===",
            BinOp::RefNotEq => "!==",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Spaceship => "<=>",
            BinOp::Range => "..",
            BinOp::RangeEq => "..=",
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOp::Eq
                | BinOp::NotEq
                | BinOp::RefEq
                | BinOp::RefNotEq
                | BinOp::Lt
                | BinOp::Le
                | BinOp::Gt
                | BinOp::Ge
                | BinOp::Spaceship
        )
    }
}

/// Assignment operators; compound forms desugar to `lhs = lhs op rhs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Shl,
    Shr,
    BitAnd,
    BitOr,
    Xor,
}

impl AssignOp {
    /// The binary operator a compound assignment expands to.
    pub fn bin_op(self) -> Option<BinOp> {
        Some(match self {
            AssignOp::Assign => return None,
            AssignOp::Add => BinOp::Add,
            AssignOp::Sub => BinOp::Sub,
            AssignOp::Mul => BinOp::Mul,
            AssignOp::Div => BinOp::Div,
            AssignOp::Rem => BinOp::Rem,
            AssignOp::Pow => BinOp::Pow,
            AssignOp::Shl => BinOp::Shl,
            AssignOp::Shr => BinOp::Shr,
            AssignOp::BitAnd => BinOp::BitAnd,
            AssignOp::BitOr => BinOp::BitOr,
            AssignOp::Xor => BinOp::Xor,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrefixOp {
    Neg,
    Not,
    Deref,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PostfixOp {
    Quest,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignExpr {
    pub lhs: PExpr,
    pub op: Spanned<AssignOp>,
    pub rhs: PExpr,
}

#[derive(Debug, Clone, Serialize)]
pub struct BorrowExpr {
    pub is_mut: bool,
    pub expr: PExpr,
}

#[derive(Debug, Clone, Serialize)]
pub struct BreakExpr {
    pub expr: Option<PExpr>,
}

/// `expr as Ty`.
#[derive(Debug, Clone, Serialize)]
pub struct CastExpr {
    pub expr: PExpr,
    pub ty: PTy,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldExpr {
    pub lhs: PExpr,
    pub field: PR<Ident>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForExpr {
    pub pat: PPat,
    pub iter: PExpr,
    pub body: PBlock,
}

#[derive(Debug, Clone, Serialize)]
pub struct IfExpr {
    pub cond: PExpr,
    pub if_branch: Option<PBlock>,
    /// A block or a chained `if` (from `elif` / `else if`).
    pub else_branch: Option<PExpr>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InfixExpr {
    pub lhs: PExpr,
    pub op: Spanned<BinOp>,
    pub rhs: PExpr,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvokeExpr {
    pub callee: PExpr,
    pub args: Vec<Arg>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LambdaParam {
    pub id: NodeId,
    pub pat: PPat,
    pub ty: Option<PTy>,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct LambdaExpr {
    pub params: Vec<LambdaParam>,
    pub body: PExpr,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchExpr {
    pub subject: PExpr,
    pub arms: Vec<MatchArm>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchArm {
    pub id: NodeId,
    pub pat: PPat,
    pub guard: Option<PExpr>,
    pub body: PExpr,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostfixExpr {
    pub lhs: PExpr,
    pub op: Spanned<PostfixOp>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrefixExpr {
    pub op: Spanned<PrefixOp>,
    pub rhs: PExpr,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReturnExpr {
    pub expr: Option<PExpr>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StructExpr {
    pub path: Path,
    pub fields: Vec<StructExprField>,
}

#[derive(Debug, Clone, Serialize)]
pub enum StructExprField {
    /// `name: expr`.
    Full(PR<Ident>, PExpr),
    /// `name` shortcut for `name: name`.
    Shortcut(PR<Ident>),
    /// `...base` functional update.
    Base(PExpr),
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptExpr {
    pub lhs: PExpr,
    pub indices: Vec<PExpr>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WhileExpr {
    pub cond: PExpr,
    pub body: PBlock,
}
