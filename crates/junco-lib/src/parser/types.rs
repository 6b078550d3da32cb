//! Type grammar.

use junco_core::Kw;

use crate::ast::*;
use crate::token::TokenKind;

use super::Parser;

impl Parser<'_> {
    pub(crate) fn parse_ty(&mut self, expected: &str) -> PTy {
        let token = self.peek();
        let lo = token.span;
        match token.kind {
            TokenKind::LParen => self.parse_paren_like_ty(),
            TokenKind::LBracket => self.parse_bracket_ty(),
            TokenKind::Id(_)
            | TokenKind::Kw(Kw::Party | Kw::Super | Kw::SelfLower)
            | TokenKind::Path => {
                let path = self.parse_path(false);
                let span = lo.to(self.pspan());
                match path {
                    Ok(path) => Ok(self.make_ty(TyKind::Path(path), span)),
                    Err(err) => Err(err),
                }
            }
            _ => {
                self.error_expected(expected);
                self.err_node(lo)
            }
        }
    }

    fn make_ty(&mut self, kind: TyKind, span: crate::span::Span) -> Box<Ty> {
        let id = self.node_id(span);
        Box::new(Ty { id, kind, span })
    }

    /// `()`, `(T)`, `(name: T, U)`, `(T, U) -> R`.
    fn parse_paren_like_ty(&mut self) -> PTy {
        let lo = self.advance().span;
        let mut els = Vec::new();
        let mut trailing_comma = false;
        while !self.is(TokenKind::RParen) && !self.eof() {
            els.push(self.parse_tuple_ty_el());
            trailing_comma = self.eat(TokenKind::Comma);
            if !trailing_comma {
                break;
            }
        }
        self.expect(TokenKind::RParen, "`)`");

        if self.eat(TokenKind::Arrow) {
            let ret = self.parse_ty("function return type");
            let span = lo.to(self.pspan());
            return Ok(self.make_ty(TyKind::Func(FuncTy { params: els, ret }), span));
        }

        let span = lo.to(self.pspan());
        if els.is_empty() {
            return Ok(self.make_ty(TyKind::Unit, span));
        }
        if els.len() == 1 && !trailing_comma && els[0].name.is_none() {
            let el = els.pop().unwrap();
            return Ok(self.make_ty(TyKind::Paren(el.ty), span));
        }
        Ok(self.make_ty(TyKind::Tuple(els), span))
    }

    fn parse_tuple_ty_el(&mut self) -> TupleTyEl {
        let lo = self.cspan();
        let name = match (self.peek().kind, self.lookup(1).kind) {
            (TokenKind::Id(sym), TokenKind::Colon) => {
                let span = self.advance().span;
                self.advance(); // `:`
                Some(Ok(crate::span::Ident::new(sym, span)))
            }
            _ => None,
        };
        let ty = self.parse_ty("a type");
        let span = lo.to(self.pspan());
        let id = self.node_id(span);
        TupleTyEl { id, name, ty, span }
    }

    /// `[T]` slice or `[T; N]` array.
    fn parse_bracket_ty(&mut self) -> PTy {
        let lo = self.advance().span;
        let ty = self.parse_ty("element type");
        if self.eat(TokenKind::Semi) {
            let expr = self.parse_expr("array size");
            let id = self.node_id(super::pr_expr_span(&expr));
            let size = AnonConst { id, expr };
            self.expect(TokenKind::RBracket, "`]` to close the array type");
            let span = lo.to(self.pspan());
            return Ok(self.make_ty(TyKind::Array(ty, size), span));
        }
        self.expect(TokenKind::RBracket, "`]` to close the slice type");
        let span = lo.to(self.pspan());
        Ok(self.make_ty(TyKind::Slice(ty), span))
    }

    /// Path in type position (trait bounds, supertraits, impl traits).
    pub(crate) fn parse_type_path(&mut self, expected: &str) -> PR<Path> {
        match self.peek().kind {
            TokenKind::Id(_)
            | TokenKind::Kw(Kw::Party | Kw::Super | Kw::SelfLower)
            | TokenKind::Path => self.parse_path(false),
            _ => {
                self.error_expected(expected);
                self.err_node(self.cspan())
            }
        }
    }
}
