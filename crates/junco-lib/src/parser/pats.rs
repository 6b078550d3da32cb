//! Pattern grammar.

use junco_core::Kw;

use crate::ast::*;
use crate::token::TokenKind;

use super::Parser;

impl Parser<'_> {
    /// Top level: `p | p | p` folds into a `Multi` pattern.
    pub(crate) fn parse_pat(&mut self) -> PPat {
        let first = self.parse_pat_single();
        if !self.is(TokenKind::BitOr) {
            return first;
        }
        let lo = pr_span(&first);
        let mut pats = vec![first];
        while self.eat(TokenKind::BitOr) {
            pats.push(self.parse_pat_single());
        }
        let span = lo.to(self.pspan());
        let id = self.node_id(span);
        Ok(Box::new(Pat {
            id,
            kind: PatKind::Multi(pats),
            span,
        }))
    }

    fn parse_pat_single(&mut self) -> PPat {
        let token = self.peek();
        let lo = token.span;
        match token.kind {
            TokenKind::Kw(Kw::Underscore) => {
                self.advance();
                Ok(self.make_pat(PatKind::Wildcard, lo))
            }
            TokenKind::Spread => {
                self.advance();
                Ok(self.make_pat(PatKind::Rest, lo))
            }
            TokenKind::Lit(_) => self.parse_lit_pat(false),
            TokenKind::Sub => {
                self.advance();
                self.parse_lit_pat(true)
            }
            TokenKind::Ampersand => {
                self.advance();
                let is_mut = self.eat_kw(Kw::Mut);
                let pat = self.parse_pat_single();
                let span = lo.to(self.pspan());
                Ok(self.make_pat(PatKind::Ref(RefPat { is_mut, pat }), span))
            }
            TokenKind::Kw(Kw::Ref | Kw::Mut) => self.parse_ident_pat(),
            TokenKind::Id(_) | TokenKind::Kw(Kw::Party | Kw::Super | Kw::SelfLower)
            | TokenKind::Path => self.parse_path_like_pat(),
            TokenKind::LParen => self.parse_tuple_or_paren_pat(),
            TokenKind::LBracket => self.parse_slice_pat(),
            _ => {
                self.error_expected("a pattern");
                self.err_node(lo)
            }
        }
    }

    fn make_pat(&mut self, kind: PatKind, span: crate::span::Span) -> Box<Pat> {
        let id = self.node_id(span);
        Box::new(Pat { id, kind, span })
    }

    fn parse_lit_pat(&mut self, neg: bool) -> PPat {
        let lo = if neg { self.pspan() } else { self.cspan() };
        match self.parse_lit_token() {
            Some((lit, span)) => {
                let full = lo.to(span);
                Ok(self.make_pat(PatKind::Lit(LitPat { neg, lit }), full))
            }
            None => {
                self.error_expected("a literal pattern");
                self.err_node(self.cspan())
            }
        }
    }

    /// `ref? mut? IDENT (@ pat)?`.
    fn parse_ident_pat(&mut self) -> PPat {
        let lo = self.cspan();
        let is_ref = self.eat_kw(Kw::Ref);
        let is_mut = self.eat_kw(Kw::Mut);
        let ident = self.parse_ident("binding name");
        let sub = if self.eat(TokenKind::At) {
            Some(self.parse_pat_single())
        } else {
            None
        };
        let span = lo.to(self.pspan());
        Ok(self.make_pat(
            PatKind::Ident(IdentPat {
                is_ref,
                is_mut,
                ident,
                sub,
            }),
            span,
        ))
    }

    /// Bare identifier (binding), multi-segment path, or `Path { ... }`
    /// struct pattern.
    fn parse_path_like_pat(&mut self) -> PPat {
        // A lone identifier (no `::`, no `{`, no `@` special casing
        // needed) is a binding, not a path.
        if let TokenKind::Id(_) = self.peek().kind {
            let next = self.lookup(1).kind;
            if next != TokenKind::Path && next != TokenKind::LBrace {
                return self.parse_ident_pat();
            }
            if next == TokenKind::LBrace && self.no_struct {
                return self.parse_ident_pat();
            }
        }

        let lo = self.cspan();
        let path = self.parse_path(true);
        if self.is(TokenKind::LBrace) && !self.no_struct {
            return self.parse_struct_pat(path);
        }
        let span = lo.to(self.pspan());
        match path {
            Ok(path) => Ok(self.make_pat(PatKind::Path(path), span)),
            Err(err) => Err(err),
        }
    }

    fn parse_struct_pat(&mut self, path: PR<Path>) -> PPat {
        let lo = match &path {
            Ok(path) => path.span,
            Err(err) => err.span,
        };
        self.expect(TokenKind::LBrace, "`{` to open the struct pattern");
        let mut fields = Vec::new();
        while !self.is(TokenKind::RBrace) && !self.eof() {
            if self.is(TokenKind::Spread) {
                let span = self.advance().span;
                fields.push(StructPatField::Rest { span });
            } else {
                fields.push(self.parse_struct_pat_field());
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "`}` to close the struct pattern");
        let span = lo.to(self.pspan());
        Ok(self.make_pat(PatKind::Struct(StructPat { path, fields }), span))
    }

    fn parse_struct_pat_field(&mut self) -> StructPatField {
        let lo = self.cspan();
        let is_ref = self.eat_kw(Kw::Ref);
        let is_mut = self.eat_kw(Kw::Mut);
        let ident = self.parse_ident("field name");

        if !is_ref && !is_mut && self.eat(TokenKind::Colon) {
            let pat = self.parse_pat();
            let span = lo.to(self.pspan());
            let id = self.node_id(span);
            return StructPatField::Named {
                id,
                ident,
                pat,
                span,
            };
        }

        let span = lo.to(self.pspan());
        let id = self.node_id(span);
        StructPatField::Shortcut {
            id,
            is_ref,
            is_mut,
            ident,
            span,
        }
    }

    /// `(p, p, ..., p)` — tracks the `...` position; a single pattern
    /// without a comma is a paren pattern.
    fn parse_tuple_or_paren_pat(&mut self) -> PPat {
        let lo = self.advance().span;
        let mut els: Vec<PPat> = Vec::new();
        let mut rest_idx = None;
        let mut trailing_comma = false;
        while !self.is(TokenKind::RParen) && !self.eof() {
            if self.is(TokenKind::Spread) && rest_idx.is_none() {
                rest_idx = Some(els.len());
            }
            els.push(self.parse_pat());
            trailing_comma = self.eat(TokenKind::Comma);
            if !trailing_comma {
                break;
            }
        }
        self.expect(TokenKind::RParen, "`)` to close the pattern");
        let span = lo.to(self.pspan());
        if els.len() == 1 && !trailing_comma && rest_idx.is_none() {
            let inner = els.pop().unwrap();
            return Ok(self.make_pat(PatKind::Paren(inner), span));
        }
        Ok(self.make_pat(PatKind::Tuple(TuplePat { els, rest_idx }), span))
    }

    fn parse_slice_pat(&mut self) -> PPat {
        let lo = self.advance().span;
        let mut els = Vec::new();
        while !self.is(TokenKind::RBracket) && !self.eof() {
            els.push(self.parse_pat());
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBracket, "`]` to close the slice pattern");
        let span = lo.to(self.pspan());
        Ok(self.make_pat(PatKind::Slice(SlicePat { els }), span))
    }
}
