//! Parser.
//!
//! Recursive descent over the non-hidden token stream, with a
//! precedence-table layer for expression operators. Every produced node
//! gets a fresh `NodeId` and its span is recorded in the session.
//!
//! ## Error recovery
//!
//! Item- and statement-level productions are wrapped in panic-mode
//! recovery: on an unexpected token the parser records one message,
//! skips to a safe token (`;`, `}`, or an item-head keyword), and leaves
//! an `ErrorNode` covering the skipped span. Expression-level failures
//! propagate as the `Err` side of `PR` and downstream passes skip them.
//! Consecutive errors at the same position are suppressed.

mod exprs;
mod items;
mod pats;
mod types;

#[cfg(test)]
mod tests;

use junco_core::Kw;

use crate::ast::{ErrorNode, NodeId, PExpr, PR, Party, pr_span};
use crate::diagnostics::MessageHolder;
use crate::session::Session;
use crate::span::{FileId, Ident, Span};
use crate::token::{Token, TokenKind};

/// Span of either side of an expression `PR`.
pub(crate) fn pr_expr_span(expr: &PExpr) -> Span {
    pr_span(expr)
}

/// Parse one file's token stream into a `Party`.
pub fn parse(
    sess: &mut Session,
    file: FileId,
    tokens: Vec<Token>,
) -> (Party, MessageHolder) {
    let mut parser = Parser::new(sess, file, tokens);
    let party = parser.parse_party();
    (party, parser.msg)
}

pub(crate) struct Parser<'s> {
    pub(crate) sess: &'s mut Session,
    /// Non-hidden tokens only; always ends with `Eof`.
    tokens: Vec<Token>,
    pos: usize,
    /// Suppresses cascading errors at one position.
    last_error_pos: Option<u32>,
    /// Struct literals are forbidden directly in `if`/`while`/`for`/
    /// `match` heads, where `{` starts the body instead.
    pub(crate) no_struct: bool,
    pub(crate) msg: MessageHolder,
}

impl<'s> Parser<'s> {
    fn new(sess: &'s mut Session, file: FileId, tokens: Vec<Token>) -> Self {
        let mut tokens: Vec<Token> = tokens.into_iter().filter(|t| !t.is_hidden()).collect();
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let end = tokens.last().map(|t| t.span.hi()).unwrap_or(0);
            tokens.push(Token::new(TokenKind::Eof, Span::from_bounds(file, end, end)));
        }
        Self {
            sess,
            tokens,
            pos: 0,
            last_error_pos: None,
            no_struct: false,
            msg: MessageHolder::new(),
        }
    }

    // Token access //

    pub(crate) fn peek(&self) -> Token {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Lookahead by `dist` tokens without advancing.
    pub(crate) fn lookup(&self, dist: usize) -> Token {
        let idx = (self.pos + dist).min(self.tokens.len() - 1);
        self.tokens[idx]
    }

    pub(crate) fn prev(&self) -> Token {
        self.tokens[self.pos.saturating_sub(1)]
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn eof(&self) -> bool {
        self.peek().is_eof()
    }

    /// Span of the current token.
    pub(crate) fn cspan(&self) -> Span {
        self.peek().span
    }

    /// Span of the last consumed token.
    pub(crate) fn pspan(&self) -> Span {
        self.prev().span
    }

    // Checks //

    pub(crate) fn is(&self, kind: TokenKind) -> bool {
        self.peek().is(kind)
    }

    pub(crate) fn is_kw(&self, kw: Kw) -> bool {
        self.peek().is_kw(kw)
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.is(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_kw(&mut self, kw: Kw) -> bool {
        if self.is_kw(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expect a specific token; on mismatch report and stay put so the
    /// caller can recover.
    pub(crate) fn expect(&mut self, kind: TokenKind, expected: &str) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error_expected(expected);
        false
    }

    pub(crate) fn expect_kw(&mut self, kw: Kw, expected: &str) -> bool {
        if self.eat_kw(kw) {
            return true;
        }
        self.error_expected(expected);
        false
    }

    /// Consume any number of `;` separators.
    pub(crate) fn skip_semis(&mut self) {
        while self.eat(TokenKind::Semi) {}
    }

    // Nodes //

    pub(crate) fn node_id(&mut self, span: Span) -> NodeId {
        self.sess.alloc_node(span)
    }

    /// Struct-literal restriction guard for `if`/`while`/`for`/`match`
    /// heads.
    pub(crate) fn with_no_struct<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.no_struct;
        self.no_struct = true;
        let result = f(self);
        self.no_struct = saved;
        result
    }

    pub(crate) fn err_node<T>(&mut self, span: Span) -> PR<T> {
        Err(ErrorNode { span })
    }

    // Identifiers //

    pub(crate) fn parse_ident(&mut self, expected: &str) -> PR<Ident> {
        match self.peek().kind {
            TokenKind::Id(sym) => {
                let span = self.advance().span;
                Ok(Ident::new(sym, span))
            }
            _ => {
                self.error_expected(expected);
                self.err_node(self.cspan())
            }
        }
    }

    // Errors //

    pub(crate) fn error(&mut self, text: impl Into<String>, span: Span) {
        if self.last_error_pos == Some(span.lo()) {
            return;
        }
        self.last_error_pos = Some(span.lo());
        self.msg
            .error(text)
            .primary(span, "unexpected here")
            .emit();
    }

    pub(crate) fn error_expected(&mut self, expected: &str) {
        let token = self.peek();
        let found = self.describe_token(token);
        self.error(format!("expected {expected}, found {found}"), token.span);
    }

    fn describe_token(&self, token: Token) -> String {
        match token.kind {
            TokenKind::Eof => "end of file".into(),
            TokenKind::Error => "unlexable characters".into(),
            _ => format!("`{}`", self.sess.source_map.slice_by_span(token.span)),
        }
    }

    /// True when the current token can start an item.
    pub(crate) fn at_item_start(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Kw(
                Kw::Pub
                    | Kw::Func
                    | Kw::Fn
                    | Kw::Mod
                    | Kw::Use
                    | Kw::Type
                    | Kw::Struct
                    | Kw::Enum
                    | Kw::Trait
                    | Kw::Impl
                    | Kw::Init
                    | Kw::Const
            ) | TokenKind::At
        )
    }

    /// Replace the current token with `kind` spanning from `mid` to the
    /// token's end. Used to split `>>` into two `>` in nested generics.
    pub(crate) fn split_current(&mut self, kind: TokenKind, mid: u32) {
        let token = self.tokens[self.pos];
        self.tokens[self.pos] =
            Token::new(kind, Span::from_bounds(token.span.file, mid, token.span.hi()));
    }

    /// Panic-mode recovery: skip to a safe token and produce the error
    /// marker covering what was skipped.
    pub(crate) fn recover(&mut self) -> ErrorNode {
        let start = self.cspan();
        let mut end = start;
        while !self.eof()
            && !self.is(TokenKind::Semi)
            && !self.is(TokenKind::RBrace)
            && !self.at_item_start()
        {
            end = self.advance().span;
        }
        ErrorNode {
            span: start.to(end),
        }
    }
}
