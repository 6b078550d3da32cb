//! Expression and statement grammar.
//!
//! Binary operators go through a precedence table (lowest binds first in
//! `BIN_LEVELS`); assignment sits above it, `as`-casts, prefix and
//! postfix below. Comparison operators are parsed left-associatively
//! and the validator rejects chains.

use junco_core::Kw;

use crate::ast::*;
use crate::span::{Ident, Span, Spanned};
use crate::token::TokenKind;

use super::Parser;

struct PrecLevel {
    ops: &'static [(TokenKind, BinOp)],
    right_assoc: bool,
    multiple: bool,
}

const BIN_LEVELS: &[PrecLevel] = &[
    PrecLevel {
        ops: &[(TokenKind::Kw(Kw::Or), BinOp::Or)],
        right_assoc: false,
        multiple: true,
    },
    PrecLevel {
        ops: &[(TokenKind::Kw(Kw::And), BinOp::And)],
        right_assoc: false,
        multiple: true,
    },
    // Comparison is syntactically non-associative; chains parse
    // left-leaning and the validator reports them.
    PrecLevel {
        ops: &[
            (TokenKind::Eq, BinOp::Eq),
            (TokenKind::NotEq, BinOp::NotEq),
            (TokenKind::RefEq, BinOp::RefEq),
            (TokenKind::RefNotEq, BinOp::RefNotEq),
            (TokenKind::Le, BinOp::Le),
            (TokenKind::Ge, BinOp::Ge),
            (TokenKind::Spaceship, BinOp::Spaceship),
            (TokenKind::LAngle, BinOp::Lt),
            (TokenKind::RAngle, BinOp::Gt),
        ],
        right_assoc: false,
        multiple: true,
    },
    PrecLevel {
        ops: &[
            (TokenKind::RangeEq, BinOp::RangeEq),
            (TokenKind::Range, BinOp::Range),
        ],
        right_assoc: false,
        multiple: false,
    },
    PrecLevel {
        ops: &[(TokenKind::BitOr, BinOp::BitOr)],
        right_assoc: false,
        multiple: true,
    },
    PrecLevel {
        ops: &[(TokenKind::Xor, BinOp::Xor)],
        right_assoc: false,
        multiple: true,
    },
    PrecLevel {
        ops: &[(TokenKind::Ampersand, BinOp::BitAnd)],
        right_assoc: false,
        multiple: true,
    },
    PrecLevel {
        ops: &[(TokenKind::Shl, BinOp::Shl), (TokenKind::Shr, BinOp::Shr)],
        right_assoc: false,
        multiple: true,
    },
    PrecLevel {
        ops: &[(TokenKind::Add, BinOp::Add), (TokenKind::Sub, BinOp::Sub)],
        right_assoc: false,
        multiple: true,
    },
    PrecLevel {
        ops: &[
            (TokenKind::Mul, BinOp::Mul),
            (TokenKind::Div, BinOp::Div),
            (TokenKind::Rem, BinOp::Rem),
        ],
        right_assoc: false,
        multiple: true,
    },
    PrecLevel {
        ops: &[(TokenKind::Power, BinOp::Pow)],
        right_assoc: true,
        multiple: false,
    },
];

impl Parser<'_> {
    // Statements //

    pub(crate) fn parse_stmt(&mut self) -> PR<Stmt> {
        let lo = self.cspan();

        if self.eat_kw(Kw::Let) {
            let pat = self.parse_pat();
            let ty = if self.eat(TokenKind::Colon) {
                Some(self.parse_ty("type of the binding"))
            } else {
                None
            };
            let value = if self.eat(TokenKind::Assign) {
                Some(self.parse_expr("initializer expression"))
            } else {
                None
            };
            let span = lo.to(self.pspan());
            let id = self.node_id(span);
            return Ok(Stmt {
                id,
                kind: StmtKind::Let(LetStmt { pat, ty, value }),
                span,
            });
        }

        if self.at_item_start() {
            if let Some(item) = self.parse_opt_item() {
                let span = lo.to(self.pspan());
                let id = self.node_id(span);
                return Ok(Stmt {
                    id,
                    kind: StmtKind::Item(item.map(Box::new)),
                    span,
                });
            }
        }

        match self.parse_opt_expr() {
            Some(expr) => {
                let span = lo.to(self.pspan());
                let id = self.node_id(span);
                Ok(Stmt {
                    id,
                    kind: StmtKind::Expr(expr),
                    span,
                })
            }
            None => {
                // Recovery parks at `;`, `}`, or an item head; the
                // block loop consumes those.
                self.error_expected("a statement");
                Err(self.recover())
            }
        }
    }

    pub(crate) fn parse_block(&mut self) -> PR<Block> {
        let lo = self.cspan();
        if !self.expect(TokenKind::LBrace, "`{` to open a block") {
            return self.err_node(lo);
        }
        let mut stmts = Vec::new();
        loop {
            self.skip_semis();
            if self.is(TokenKind::RBrace) || self.eof() {
                break;
            }
            stmts.push(self.parse_stmt());
        }
        self.expect(TokenKind::RBrace, "`}` to close the block");
        let span = lo.to(self.pspan());
        let id = self.node_id(span);
        Ok(Block { id, stmts, span })
    }

    /// A block in expression position, wrapped as `ExprKind::Block`.
    pub(crate) fn parse_block_expr(&mut self) -> PExpr {
        let block = self.parse_block();
        let span = match &block {
            Ok(block) => block.span,
            Err(err) => err.span,
        };
        let id = self.node_id(span);
        Ok(Box::new(Expr {
            id,
            kind: ExprKind::Block(block),
            span,
        }))
    }

    // Expressions //

    pub(crate) fn parse_expr(&mut self, expected: &str) -> PExpr {
        match self.parse_opt_expr() {
            Some(expr) => expr,
            None => {
                self.error_expected(expected);
                self.err_node(self.cspan())
            }
        }
    }

    /// Assignment level: right-associative, at most one operator.
    pub(crate) fn parse_opt_expr(&mut self) -> Option<PExpr> {
        let lhs = self.parse_binary(0)?;
        let lhs = self.reject_custom_infix(lhs);
        match self.assign_op() {
            Some(op) => Some(self.finish_assign(lhs, op)),
            None => Some(lhs),
        }
    }

    /// `` a `op` b `` — backtick-quoted identifier operators are
    /// reserved syntax. Parse and discard the operator and right side so
    /// recovery stays local.
    fn reject_custom_infix(&mut self, lhs: PExpr) -> PExpr {
        while self.is(TokenKind::Backtick) {
            let op_lo = self.advance().span;
            let _ = self.parse_ident("operator identifier");
            self.expect(TokenKind::Backtick, "closing backtick");
            let op_span = op_lo.to(self.pspan());
            self.msg
                .error("Custom infix operators feature is reserved, but not implemented")
                .primary(op_span, "Cannot use identifier as operator")
                .emit();
            let _ = self.parse_binary(0);
        }
        lhs
    }

    fn finish_assign(&mut self, lhs: PExpr, op: Spanned<AssignOp>) -> PExpr {
        self.advance();
        let rhs = match self.parse_opt_expr() {
            Some(rhs) => rhs,
            None => {
                self.error_expected("an expression after the assignment operator");
                self.err_node(self.cspan())
            }
        };
        let span = pr_span(&lhs).to(pr_span(&rhs));
        let id = self.node_id(span);
        Ok(Box::new(Expr {
            id,
            kind: ExprKind::Assign(AssignExpr { lhs, op, rhs }),
            span,
        }))
    }

    fn assign_op(&self) -> Option<Spanned<AssignOp>> {
        let op = match self.peek().kind {
            TokenKind::Assign => AssignOp::Assign,
            TokenKind::AddAssign => AssignOp::Add,
            TokenKind::SubAssign => AssignOp::Sub,
            TokenKind::MulAssign => AssignOp::Mul,
            TokenKind::DivAssign => AssignOp::Div,
            TokenKind::ModAssign => AssignOp::Rem,
            TokenKind::PowerAssign => AssignOp::Pow,
            TokenKind::ShlAssign => AssignOp::Shl,
            TokenKind::ShrAssign => AssignOp::Shr,
            TokenKind::BitAndAssign => AssignOp::BitAnd,
            TokenKind::BitOrAssign => AssignOp::BitOr,
            TokenKind::XorAssign => AssignOp::Xor,
            _ => return None,
        };
        Some(Spanned::new(op, self.cspan()))
    }

    fn parse_binary(&mut self, level: usize) -> Option<PExpr> {
        let Some(prec) = BIN_LEVELS.get(level) else {
            return self.parse_cast();
        };
        let mut lhs = self.parse_binary(level + 1)?;
        loop {
            let Some(&(_, op)) = prec.ops.iter().find(|&&(tk, _)| self.is(tk)) else {
                break;
            };
            let op_span = self.advance().span;
            let next = if prec.right_assoc { level } else { level + 1 };
            let rhs = match self.parse_binary(next) {
                Some(rhs) => rhs,
                None => {
                    self.error_expected(&format!("an expression after `{}`", op.as_str()));
                    self.err_node(self.cspan())
                }
            };
            let span = pr_span(&lhs).to(pr_span(&rhs));
            let id = self.node_id(span);
            lhs = Ok(Box::new(Expr {
                id,
                kind: ExprKind::Infix(InfixExpr {
                    lhs,
                    op: Spanned::new(op, op_span),
                    rhs,
                }),
                span,
            }));
            if !prec.multiple {
                break;
            }
        }
        Some(lhs)
    }

    fn parse_cast(&mut self) -> Option<PExpr> {
        let mut expr = self.parse_prefix()?;
        while self.eat_kw(Kw::As) {
            let ty = self.parse_ty("cast target type");
            let span = pr_span(&expr).to(self.pspan());
            let id = self.node_id(span);
            expr = Ok(Box::new(Expr {
                id,
                kind: ExprKind::Cast(CastExpr { expr, ty }),
                span,
            }));
        }
        Some(expr)
    }

    fn parse_prefix(&mut self) -> Option<PExpr> {
        // Borrows carry mutability, so they are a distinct node.
        if self.is(TokenKind::Ampersand) {
            let lo = self.advance().span;
            let is_mut = self.eat_kw(Kw::Mut);
            let expr = match self.parse_prefix() {
                Some(expr) => expr,
                None => {
                    self.error_expected("an expression after `&`");
                    self.err_node(self.cspan())
                }
            };
            let span = lo.to(pr_span(&expr));
            let id = self.node_id(span);
            return Some(Ok(Box::new(Expr {
                id,
                kind: ExprKind::Borrow(BorrowExpr { is_mut, expr }),
                span,
            })));
        }

        let op = match self.peek().kind {
            TokenKind::Sub => Some(PrefixOp::Neg),
            TokenKind::Kw(Kw::Not) => Some(PrefixOp::Not),
            TokenKind::Mul => Some(PrefixOp::Deref),
            _ => None,
        };
        if let Some(op) = op {
            let op_span = self.advance().span;
            let rhs = match self.parse_prefix() {
                Some(rhs) => rhs,
                None => {
                    self.error_expected("an expression after the prefix operator");
                    self.err_node(self.cspan())
                }
            };
            let span = op_span.to(pr_span(&rhs));
            let id = self.node_id(span);
            return Some(Ok(Box::new(Expr {
                id,
                kind: ExprKind::Prefix(PrefixExpr {
                    op: Spanned::new(op, op_span),
                    rhs,
                }),
                span,
            })));
        }

        self.parse_postfix()
    }

    /// `? . (args) [index]` — all left-associative with equal binding.
    fn parse_postfix(&mut self) -> Option<PExpr> {
        let mut lhs = self.parse_primary()?;
        loop {
            match self.peek().kind {
                TokenKind::Quest => {
                    let op_span = self.advance().span;
                    let span = pr_span(&lhs).to(op_span);
                    let id = self.node_id(span);
                    lhs = Ok(Box::new(Expr {
                        id,
                        kind: ExprKind::Postfix(PostfixExpr {
                            lhs,
                            op: Spanned::new(PostfixOp::Quest, op_span),
                        }),
                        span,
                    }));
                }
                TokenKind::Dot => {
                    self.advance();
                    let field = self.parse_ident("field or method name");
                    let span = pr_span(&lhs).to(self.pspan());
                    let id = self.node_id(span);
                    lhs = Ok(Box::new(Expr {
                        id,
                        kind: ExprKind::Field(FieldExpr { lhs, field }),
                        span,
                    }));
                }
                TokenKind::LParen => {
                    let args = self.parse_arg_list();
                    let span = pr_span(&lhs).to(self.pspan());
                    let id = self.node_id(span);
                    lhs = Ok(Box::new(Expr {
                        id,
                        kind: ExprKind::Invoke(InvokeExpr { callee: lhs, args }),
                        span,
                    }));
                }
                TokenKind::LBracket => {
                    self.advance();
                    let mut indices = Vec::new();
                    while !self.is(TokenKind::RBracket) && !self.eof() {
                        indices.push(self.parse_expr("subscript index"));
                        if !self.eat(TokenKind::Comma) {
                            break;
                        }
                    }
                    self.expect(TokenKind::RBracket, "`]` to close the subscript");
                    let span = pr_span(&lhs).to(self.pspan());
                    let id = self.node_id(span);
                    lhs = Ok(Box::new(Expr {
                        id,
                        kind: ExprKind::Subscript(SubscriptExpr { lhs, indices }),
                        span,
                    }));
                }
                _ => break,
            }
        }
        Some(lhs)
    }

    /// `(label: expr, ...expr, expr)`.
    pub(crate) fn parse_arg_list(&mut self) -> Vec<Arg> {
        let mut args = Vec::new();
        if !self.expect(TokenKind::LParen, "`(` to open the argument list") {
            return args;
        }
        while !self.is(TokenKind::RParen) && !self.eof() {
            let lo = self.cspan();
            let label = match (self.peek().kind, self.lookup(1).kind) {
                (TokenKind::Id(sym), TokenKind::Colon) => {
                    let span = self.advance().span;
                    self.advance(); // `:`
                    Some(Ident::new(sym, span))
                }
                _ => None,
            };
            let value = self.parse_expr("argument expression");
            let span = lo.to(self.pspan());
            let id = self.node_id(span);
            args.push(Arg {
                id,
                label,
                value,
                span,
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "`)` to close the argument list");
        args
    }

    fn parse_primary(&mut self) -> Option<PExpr> {
        let token = self.peek();
        let lo = token.span;
        match token.kind {
            TokenKind::Lit(lit) => {
                self.advance();
                let id = self.node_id(lo);
                Some(Ok(Box::new(Expr {
                    id,
                    kind: ExprKind::Literal(Lit {
                        kind: lit.kind,
                        sym: lit.sym,
                        suffix: lit.suffix,
                    }),
                    span: lo,
                })))
            }
            TokenKind::Kw(Kw::SelfLower) => {
                self.advance();
                let id = self.node_id(lo);
                Some(Ok(Box::new(Expr {
                    id,
                    kind: ExprKind::SelfExpr,
                    span: lo,
                })))
            }
            TokenKind::Id(_) | TokenKind::Kw(Kw::Party | Kw::Super) | TokenKind::Path => {
                Some(self.parse_path_or_struct_expr())
            }
            TokenKind::LParen => Some(self.parse_paren_like()),
            TokenKind::LBracket => Some(self.parse_list_expr()),
            TokenKind::LBrace => Some(self.parse_block_expr()),
            TokenKind::Backslash => Some(self.parse_lambda()),
            TokenKind::Spread => {
                let lo = self.advance().span;
                let inner = self.parse_expr("an expression after `...`");
                let span = lo.to(pr_span(&inner));
                let id = self.node_id(span);
                Some(Ok(Box::new(Expr {
                    id,
                    kind: ExprKind::Spread(inner),
                    span,
                })))
            }
            TokenKind::Kw(Kw::If) => Some(self.parse_if_expr()),
            TokenKind::Kw(Kw::Match) => Some(self.parse_match_expr()),
            TokenKind::Kw(Kw::Loop) => Some(self.parse_loop_expr()),
            TokenKind::Kw(Kw::While) => Some(self.parse_while_expr()),
            TokenKind::Kw(Kw::For) => Some(self.parse_for_expr()),
            TokenKind::Kw(Kw::Break) => {
                self.advance();
                let expr = self.parse_trailing_value();
                let span = lo.to(self.pspan());
                let id = self.node_id(span);
                Some(Ok(Box::new(Expr {
                    id,
                    kind: ExprKind::Break(BreakExpr { expr }),
                    span,
                })))
            }
            TokenKind::Kw(Kw::Continue) => {
                self.advance();
                let id = self.node_id(lo);
                Some(Ok(Box::new(Expr {
                    id,
                    kind: ExprKind::Continue,
                    span: lo,
                })))
            }
            TokenKind::Kw(Kw::Return) => {
                self.advance();
                let expr = self.parse_trailing_value();
                let span = lo.to(self.pspan());
                let id = self.node_id(span);
                Some(Ok(Box::new(Expr {
                    id,
                    kind: ExprKind::Return(ReturnExpr { expr }),
                    span,
                })))
            }
            _ => None,
        }
    }

    /// Optional value of `break`/`return`.
    fn parse_trailing_value(&mut self) -> Option<PExpr> {
        match self.peek().kind {
            TokenKind::Semi
            | TokenKind::RBrace
            | TokenKind::RParen
            | TokenKind::RBracket
            | TokenKind::Comma
            | TokenKind::Eof => None,
            _ => self.parse_opt_expr(),
        }
    }

    fn parse_path_or_struct_expr(&mut self) -> PExpr {
        let path = self.parse_path(true);
        let path = match path {
            Ok(path) => path,
            Err(err) => return Err(err),
        };

        if self.is(TokenKind::LBrace) && !self.no_struct {
            return self.parse_struct_expr(path);
        }

        let span = path.span;
        let id = self.node_id(span);
        Ok(Box::new(Expr {
            id,
            kind: ExprKind::Path(path),
            span,
        }))
    }

    fn parse_struct_expr(&mut self, path: Path) -> PExpr {
        let lo = path.span;
        self.expect(TokenKind::LBrace, "`{` to open the struct literal");
        let mut fields = Vec::new();
        while !self.is(TokenKind::RBrace) && !self.eof() {
            if self.is(TokenKind::Spread) {
                self.advance();
                let base = self.parse_expr("base expression after `...`");
                fields.push(StructExprField::Base(base));
            } else {
                let name = self.parse_ident("field name");
                if self.eat(TokenKind::Colon) {
                    let value = self.parse_expr("field value");
                    fields.push(StructExprField::Full(name, value));
                } else {
                    fields.push(StructExprField::Shortcut(name));
                }
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "`}` to close the struct literal");
        let span = lo.to(self.pspan());
        let id = self.node_id(span);
        Ok(Box::new(Expr {
            id,
            kind: ExprKind::Struct(StructExpr { path, fields }),
            span,
        }))
    }

    /// `()`, `(expr)`, `(a, b)`.
    fn parse_paren_like(&mut self) -> PExpr {
        let lo = self.advance().span;
        if self.is(TokenKind::RParen) {
            self.advance();
            let span = lo.to(self.pspan());
            let id = self.node_id(span);
            return Ok(Box::new(Expr {
                id,
                kind: ExprKind::Unit,
                span,
            }));
        }

        let mut els = Vec::new();
        let mut trailing_comma = false;
        while !self.is(TokenKind::RParen) && !self.eof() {
            els.push(self.parse_expr("an expression"));
            trailing_comma = self.eat(TokenKind::Comma);
            if !trailing_comma {
                break;
            }
        }
        self.expect(TokenKind::RParen, "`)`");
        let span = lo.to(self.pspan());
        let id = self.node_id(span);
        let kind = if els.len() == 1 && !trailing_comma {
            ExprKind::Paren(els.pop().unwrap())
        } else {
            ExprKind::Tuple(els)
        };
        Ok(Box::new(Expr { id, kind, span }))
    }

    fn parse_list_expr(&mut self) -> PExpr {
        let lo = self.advance().span;
        let mut els = Vec::new();
        while !self.is(TokenKind::RBracket) && !self.eof() {
            els.push(self.parse_expr("a list element"));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBracket, "`]` to close the list");
        let span = lo.to(self.pspan());
        let id = self.node_id(span);
        Ok(Box::new(Expr {
            id,
            kind: ExprKind::List(els),
            span,
        }))
    }

    /// `\x, y: int -> body`.
    fn parse_lambda(&mut self) -> PExpr {
        let lo = self.advance().span;
        let mut params = Vec::new();
        while !self.is(TokenKind::Arrow) && !self.eof() {
            let param_lo = self.cspan();
            let pat = self.parse_pat();
            let ty = if self.eat(TokenKind::Colon) {
                Some(self.parse_ty("lambda parameter type"))
            } else {
                None
            };
            let span = param_lo.to(self.pspan());
            let id = self.node_id(span);
            params.push(LambdaParam { id, pat, ty, span });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Arrow, "`->` before the lambda body");
        let body = self.parse_expr("lambda body");
        let span = lo.to(pr_span(&body));
        let id = self.node_id(span);
        Ok(Box::new(Expr {
            id,
            kind: ExprKind::Lambda(LambdaExpr { params, body }),
            span,
        }))
    }

    fn parse_if_expr(&mut self) -> PExpr {
        let lo = self.advance().span; // `if`
        let cond = self.with_no_struct(|p| p.parse_expr("`if` condition"));
        let if_branch = Some(self.parse_block());

        let else_branch = if self.is_kw(Kw::Elif) {
            // `elif` re-enters as a nested `if` keeping its own span.
            let elif_lo = self.cspan();
            self.advance();
            Some(self.parse_if_tail(elif_lo))
        } else if self.eat_kw(Kw::Else) {
            if self.is_kw(Kw::If) {
                Some(self.parse_if_expr())
            } else {
                Some(self.parse_block_expr())
            }
        } else {
            None
        };

        let span = lo.to(self.pspan());
        let id = self.node_id(span);
        Ok(Box::new(Expr {
            id,
            kind: ExprKind::If(IfExpr {
                cond,
                if_branch,
                else_branch,
            }),
            span,
        }))
    }

    /// Body of an `elif`: condition, block, optional further chain.
    fn parse_if_tail(&mut self, lo: Span) -> PExpr {
        let cond = self.with_no_struct(|p| p.parse_expr("`elif` condition"));
        let if_branch = Some(self.parse_block());
        let else_branch = if self.is_kw(Kw::Elif) {
            let elif_lo = self.cspan();
            self.advance();
            Some(self.parse_if_tail(elif_lo))
        } else if self.eat_kw(Kw::Else) {
            Some(self.parse_block_expr())
        } else {
            None
        };
        let span = lo.to(self.pspan());
        let id = self.node_id(span);
        Ok(Box::new(Expr {
            id,
            kind: ExprKind::If(IfExpr {
                cond,
                if_branch,
                else_branch,
            }),
            span,
        }))
    }

    fn parse_match_expr(&mut self) -> PExpr {
        let lo = self.advance().span; // `match`
        let subject = self.with_no_struct(|p| p.parse_expr("`match` subject"));
        self.expect(TokenKind::LBrace, "`{` to open the `match` arms");
        let mut arms = Vec::new();
        while !self.is(TokenKind::RBrace) && !self.eof() {
            arms.push(self.parse_match_arm());
            self.eat(TokenKind::Comma);
        }
        self.expect(TokenKind::RBrace, "`}` to close the `match`");
        let span = lo.to(self.pspan());
        let id = self.node_id(span);
        Ok(Box::new(Expr {
            id,
            kind: ExprKind::Match(MatchExpr { subject, arms }),
            span,
        }))
    }

    fn parse_match_arm(&mut self) -> MatchArm {
        let lo = self.cspan();
        let pat = self.parse_pat();
        let guard = if self.eat_kw(Kw::If) {
            Some(self.with_no_struct(|p| p.parse_expr("arm guard expression")))
        } else {
            None
        };
        self.expect(TokenKind::DoubleArrow, "`=>` before the arm body");
        let body = self.parse_expr("arm body");
        let span = lo.to(self.pspan());
        let id = self.node_id(span);
        MatchArm {
            id,
            pat,
            guard,
            body,
            span,
        }
    }

    fn parse_loop_expr(&mut self) -> PExpr {
        let lo = self.advance().span;
        let body = self.parse_block();
        let span = lo.to(self.pspan());
        let id = self.node_id(span);
        Ok(Box::new(Expr {
            id,
            kind: ExprKind::Loop(body),
            span,
        }))
    }

    fn parse_while_expr(&mut self) -> PExpr {
        let lo = self.advance().span;
        let cond = self.with_no_struct(|p| p.parse_expr("`while` condition"));
        let body = self.parse_block();
        let span = lo.to(self.pspan());
        let id = self.node_id(span);
        Ok(Box::new(Expr {
            id,
            kind: ExprKind::While(WhileExpr { cond, body }),
            span,
        }))
    }

    fn parse_for_expr(&mut self) -> PExpr {
        let lo = self.advance().span;
        let pat = self.parse_pat();
        self.expect_kw(Kw::In, "`in` between the pattern and the iterated expression");
        let iter = self.with_no_struct(|p| p.parse_expr("iterated expression"));
        let body = self.parse_block();
        let span = lo.to(self.pspan());
        let id = self.node_id(span);
        Ok(Box::new(Expr {
            id,
            kind: ExprKind::For(ForExpr { pat, iter, body }),
            span,
        }))
    }

    // Paths //

    /// Path with segments and generic arguments. In expression position
    /// generic arguments need the turbofish (`::<`); in type position a
    /// plain `<` opens them.
    pub(crate) fn parse_path(&mut self, in_expr: bool) -> PR<Path> {
        let lo = self.cspan();
        let global = self.eat(TokenKind::Path);
        let mut segments = Vec::new();

        loop {
            let seg_lo = self.cspan();
            let ident = self.parse_path_seg_ident("a path segment");
            if ident.is_err() {
                let span = seg_lo.to(self.pspan());
                let id = self.node_id(span);
                segments.push(Ok(PathSeg {
                    id,
                    ident,
                    generics: None,
                    span,
                }));
                break;
            }

            let generics = if in_expr {
                // Turbofish: `seg::<args>`.
                if self.is(TokenKind::Path) && self.lookup(1).is(TokenKind::LAngle) {
                    self.advance();
                    Some(self.parse_generic_args())
                } else {
                    None
                }
            } else if self.is(TokenKind::LAngle) {
                Some(self.parse_generic_args())
            } else {
                None
            };

            let span = seg_lo.to(self.pspan());
            let id = self.node_id(span);
            segments.push(Ok(PathSeg {
                id,
                ident,
                generics,
                span,
            }));

            if self.is(TokenKind::Path)
                && !matches!(self.lookup(1).kind, TokenKind::Mul | TokenKind::LBrace)
            {
                self.advance();
                continue;
            }
            break;
        }

        let span = lo.to(self.pspan());
        let id = self.node_id(span);
        Ok(Path {
            id,
            global,
            segments,
            span,
        })
    }

    pub(crate) fn parse_generic_args(&mut self) -> Vec<GenericArg> {
        let mut args = Vec::new();
        if !self.expect(TokenKind::LAngle, "`<` to open the generic argument list") {
            return args;
        }
        while !self.at_close_angle() && !self.eof() {
            match self.peek().kind {
                TokenKind::Lifetime(sym) => {
                    let span = self.advance().span;
                    let id = self.node_id(span);
                    args.push(GenericArg::Lifetime {
                        id,
                        name: Ident::new(sym, span),
                    });
                }
                TokenKind::LBrace => {
                    // `{ const-expr }` argument.
                    let expr = self.parse_block_expr();
                    let id = self.node_id(super::pr_expr_span(&expr));
                    args.push(GenericArg::Const(AnonConst { id, expr }));
                }
                TokenKind::Lit(_) => {
                    let expr = self.parse_expr("const generic argument");
                    let id = self.node_id(super::pr_expr_span(&expr));
                    args.push(GenericArg::Const(AnonConst { id, expr }));
                }
                _ => {
                    args.push(GenericArg::Type(self.parse_ty("generic argument")));
                }
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        if !self.eat_close_angle() {
            self.error_expected("`>` to close the generic argument list");
        }
        args
    }

    pub(crate) fn at_close_angle(&self) -> bool {
        matches!(self.peek().kind, TokenKind::RAngle | TokenKind::Shr)
    }

    /// Consume `>`, splitting a `>>` token in half for nested generics.
    pub(crate) fn eat_close_angle(&mut self) -> bool {
        if self.eat(TokenKind::RAngle) {
            return true;
        }
        if self.is(TokenKind::Shr) {
            let token = self.peek();
            let mid = token.span.lo() + 1;
            self.split_current(TokenKind::RAngle, mid);
            return true;
        }
        false
    }

    pub(crate) fn parse_lit_token(&mut self) -> Option<(Lit, Span)> {
        match self.peek().kind {
            TokenKind::Lit(lit) => {
                let span = self.advance().span;
                Some((
                    Lit {
                        kind: lit.kind,
                        sym: lit.sym,
                        suffix: lit.suffix,
                    },
                    span,
                ))
            }
            _ => None,
        }
    }
}
