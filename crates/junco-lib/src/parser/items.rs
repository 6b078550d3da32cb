//! Item-level grammar.

use junco_core::Kw;

use crate::ast::*;
use crate::span::Ident;
use crate::token::TokenKind;

use super::Parser;

impl Parser<'_> {
    pub(crate) fn parse_party(&mut self) -> Party {
        let mut items = Vec::new();
        loop {
            self.skip_semis();
            if self.eof() {
                break;
            }
            match self.parse_opt_item() {
                Some(item) => items.push(item),
                None => {
                    self.error_expected("an item");
                    let err = self.recover();
                    // At the top level `;` and `}` are junk, not
                    // boundaries; drop them to guarantee progress.
                    if !self.eof() && !self.at_item_start() {
                        self.advance();
                    }
                    items.push(Err(err));
                }
            }
        }
        Party { items }
    }

    /// Try to parse one item; `None` when the current token cannot start
    /// one.
    pub(crate) fn parse_opt_item(&mut self) -> Option<PR<Item>> {
        if !self.at_item_start() {
            return None;
        }
        let lo = self.cspan();
        let attrs = self.parse_attr_list();
        let vis = self.parse_vis();

        let kind = match self.peek().kind {
            TokenKind::Kw(Kw::Func | Kw::Fn) => {
                self.advance();
                self.parse_func()
            }
            TokenKind::Kw(Kw::Mod) => {
                self.advance();
                self.parse_mod()
            }
            TokenKind::Kw(Kw::Use) => {
                self.advance();
                self.parse_use_decl()
            }
            TokenKind::Kw(Kw::Type) => {
                self.advance();
                self.parse_type_alias()
            }
            TokenKind::Kw(Kw::Struct) => {
                self.advance();
                self.parse_struct()
            }
            TokenKind::Kw(Kw::Enum) => {
                self.advance();
                self.parse_enum()
            }
            TokenKind::Kw(Kw::Trait) => {
                self.advance();
                self.parse_trait()
            }
            TokenKind::Kw(Kw::Impl) => {
                self.advance();
                self.parse_impl()
            }
            TokenKind::Kw(Kw::Init) => {
                self.advance();
                self.parse_init()
            }
            TokenKind::Kw(Kw::Const) => {
                self.advance();
                self.parse_const()
            }
            _ => {
                // `pub` or attributes with no item head behind them.
                self.error_expected("an item after visibility or attributes");
                return Some(Err(self.recover()));
            }
        };

        let span = lo.to(self.pspan());
        let id = self.node_id(span);
        Some(Ok(Item {
            id,
            vis,
            attrs,
            kind,
            span,
        }))
    }

    fn parse_attr_list(&mut self) -> Vec<Attr> {
        let mut attrs = Vec::new();
        while self.is(TokenKind::At) {
            let lo = self.advance().span;
            let name = self.parse_ident("attribute name");
            let args = if self.is(TokenKind::LParen) {
                self.parse_arg_list()
            } else {
                Vec::new()
            };
            let span = lo.to(self.pspan());
            let id = self.node_id(span);
            attrs.push(Attr {
                id,
                name,
                args,
                span,
            });
        }
        attrs
    }

    fn parse_vis(&mut self) -> Vis {
        if self.is_kw(Kw::Pub) {
            Vis::Pub(self.advance().span)
        } else {
            Vis::Unset
        }
    }

    fn parse_func(&mut self) -> ItemKind {
        let name = self.parse_ident("function name");
        let generics = self.parse_opt_generics();
        let sig = self.parse_func_sig();
        let body = self.parse_opt_func_body();
        ItemKind::Func(FuncItem {
            name,
            generics,
            sig,
            body,
        })
    }

    fn parse_init(&mut self) -> ItemKind {
        let generics = self.parse_opt_generics();
        let sig = self.parse_func_sig();
        let body = self.parse_opt_func_body();
        ItemKind::Init(InitItem {
            generics,
            sig,
            body,
        })
    }

    pub(crate) fn parse_func_sig(&mut self) -> FuncSig {
        let lo = self.cspan();
        let mut self_param = None;
        let mut params = Vec::new();

        if self.expect(TokenKind::LParen, "`(` to open the parameter list") {
            let mut first = true;
            while !self.is(TokenKind::RParen) && !self.eof() {
                if first {
                    self_param = self.parse_opt_self_param();
                    first = false;
                    if self_param.is_some() {
                        if !self.eat(TokenKind::Comma) {
                            break;
                        }
                        continue;
                    }
                }
                params.push(self.parse_func_param());
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RParen, "`)` to close the parameter list");
        }

        let ret = if self.eat(TokenKind::Arrow) {
            FuncRetTy::Some(self.parse_ty("return type"))
        } else {
            FuncRetTy::Default
        };

        FuncSig {
            self_param,
            params,
            ret,
            span: lo.to(self.pspan()),
        }
    }

    /// `self`, `&self`, `&mut self` in first-parameter position.
    fn parse_opt_self_param(&mut self) -> Option<SelfParam> {
        let (is_ref, is_mut, dist) = match self.peek().kind {
            TokenKind::Kw(Kw::SelfLower) => (false, false, 0),
            TokenKind::Ampersand => {
                if self.lookup(1).is_kw(Kw::SelfLower) {
                    (true, false, 1)
                } else if self.lookup(1).is_kw(Kw::Mut) && self.lookup(2).is_kw(Kw::SelfLower) {
                    (true, true, 2)
                } else {
                    return None;
                }
            }
            _ => return None,
        };
        let lo = self.cspan();
        for _ in 0..=dist {
            self.advance();
        }
        let span = lo.to(self.pspan());
        let id = self.node_id(span);
        Some(SelfParam {
            id,
            is_ref,
            is_mut,
            span,
        })
    }

    /// `label? pat: ty (= default)?`.
    ///
    /// A single identifier doubles as label and binding; an explicit `_`
    /// label makes the parameter positional-only.
    fn parse_func_param(&mut self) -> FuncParam {
        let lo = self.cspan();

        let explicit_label = match (self.peek().kind, self.lookup(1).kind) {
            // `label name: ...`, `label _: ...`, `label mut name: ...`
            (
                TokenKind::Id(_) | TokenKind::Kw(Kw::Underscore),
                TokenKind::Id(_)
                | TokenKind::Kw(Kw::Underscore | Kw::Ref | Kw::Mut)
                | TokenKind::LParen,
            ) => {
                let token = self.advance();
                match token.kind {
                    TokenKind::Id(sym) => Some(Some(Ident::new(sym, token.span))),
                    // `_` label: positional-only.
                    _ => Some(None),
                }
            }
            _ => None,
        };

        let pat = self.parse_pat();
        let label = match explicit_label {
            Some(label) => label,
            // No explicit label: an identifier binding is its own label.
            None => match &pat {
                Ok(pat) => match &pat.kind {
                    PatKind::Ident(ident_pat) => ident_pat.ident.as_ref().ok().copied(),
                    _ => None,
                },
                Err(_) => None,
            },
        };

        if !self.expect(TokenKind::Colon, "`:` before the parameter type") {
            let span = lo.to(self.pspan());
            let id = self.node_id(span);
            let err = self.err_node(span);
            return FuncParam {
                id,
                label,
                pat,
                ty: err,
                default: None,
                span,
            };
        }
        let ty = self.parse_ty("parameter type");
        let default = if self.eat(TokenKind::Assign) {
            Some(self.parse_expr("parameter default value"))
        } else {
            None
        };
        let span = lo.to(self.pspan());
        let id = self.node_id(span);
        FuncParam {
            id,
            label,
            pat,
            ty,
            default,
            span,
        }
    }

    /// Block body, `= expr` short form, or none (trait declarations).
    fn parse_opt_func_body(&mut self) -> Option<Body> {
        if self.is(TokenKind::LBrace) {
            let value = self.parse_block_expr();
            return Some(Body { value });
        }
        if self.eat(TokenKind::Assign) {
            let value = self.parse_expr("function body expression");
            return Some(Body { value });
        }
        None
    }

    fn parse_mod(&mut self) -> ItemKind {
        let name = self.parse_ident("module name");
        self.expect(TokenKind::LBrace, "`{` to open the module body");
        let items = self.parse_member_list();
        self.expect(TokenKind::RBrace, "`}` to close the module body");
        ItemKind::Mod(ModItem { name, items })
    }

    /// Items until `}`.
    pub(crate) fn parse_member_list(&mut self) -> Vec<PR<Item>> {
        let mut members = Vec::new();
        loop {
            self.skip_semis();
            if self.is(TokenKind::RBrace) || self.eof() {
                break;
            }
            match self.parse_opt_item() {
                Some(item) => members.push(item),
                None => {
                    // Recovery parks at `;`, `}`, or an item head, all
                    // of which the loop around us consumes.
                    self.error_expected("an item");
                    members.push(Err(self.recover()));
                }
            }
        }
        members
    }

    fn parse_use_decl(&mut self) -> ItemKind {
        let use_tree = self.parse_use_tree();
        self.eat(TokenKind::Semi);
        ItemKind::Use(UseDecl { use_tree })
    }

    fn parse_use_tree(&mut self) -> PR<UseTree> {
        let lo = self.cspan();

        // `use *` / `use {..}` with no prefix.
        if self.is(TokenKind::Mul) {
            self.advance();
            return Ok(self.make_use_tree(lo, UseTreeKind::All(None)));
        }
        if self.is(TokenKind::LBrace) {
            let trees = self.parse_use_tree_group();
            return Ok(self.make_use_tree(
                lo,
                UseTreeKind::Specific {
                    prefix: None,
                    trees,
                },
            ));
        }

        let path = match self.parse_simple_path("`use` path") {
            Ok(path) => path,
            Err(err) => return Err(err),
        };

        // The path parser stops before `*` / `{`, leaving `::` unconsumed.
        if self.is(TokenKind::Path) {
            self.advance();
            if self.eat(TokenKind::Mul) {
                return Ok(self.make_use_tree(lo, UseTreeKind::All(Some(path))));
            }
            if self.is(TokenKind::LBrace) {
                let trees = self.parse_use_tree_group();
                return Ok(self.make_use_tree(
                    lo,
                    UseTreeKind::Specific {
                        prefix: Some(path),
                        trees,
                    },
                ));
            }
            self.error_expected("`*`, `{` or a path segment after `::`");
            return Err(self.recover());
        }

        if self.eat_kw(Kw::As) {
            let name = self.parse_ident("rebinding name after `as`");
            return Ok(self.make_use_tree(lo, UseTreeKind::Rebind { path, name }));
        }

        Ok(self.make_use_tree(lo, UseTreeKind::Raw(path)))
    }

    fn make_use_tree(&mut self, lo: crate::span::Span, kind: UseTreeKind) -> UseTree {
        let span = lo.to(self.pspan());
        let id = self.node_id(span);
        UseTree { id, kind, span }
    }

    fn parse_use_tree_group(&mut self) -> Vec<PR<UseTree>> {
        self.expect(TokenKind::LBrace, "`{` to open the import group");
        let mut trees = Vec::new();
        while !self.is(TokenKind::RBrace) && !self.eof() {
            trees.push(self.parse_use_tree());
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "`}` to close the import group");
        trees
    }

    /// Generics-free path: `a::b::c`, stopping before `::*` and `::{`.
    pub(crate) fn parse_simple_path(&mut self, expected: &str) -> PR<SimplePath> {
        let lo = self.cspan();
        let global = self.eat(TokenKind::Path);
        let mut segments = Vec::new();

        loop {
            let seg_lo = self.cspan();
            let ident = self.parse_path_seg_ident(expected);
            let failed = ident.is_err();
            let span = seg_lo.to(self.pspan());
            let id = self.node_id(span);
            segments.push(Ok(SimplePathSeg { id, ident, span }));
            if failed {
                break;
            }
            // Stop before `::*` / `::{` so `use` trees can take over.
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
        Ok(SimplePath {
            id,
            global,
            segments,
            span,
        })
    }

    /// Path segment identifier; also accepts the path-root keywords
    /// `party`, `super` and `self`.
    pub(crate) fn parse_path_seg_ident(&mut self, expected: &str) -> PR<Ident> {
        match self.peek().kind {
            TokenKind::Id(sym) => {
                let span = self.advance().span;
                Ok(Ident::new(sym, span))
            }
            TokenKind::Kw(kw @ (Kw::Party | Kw::Super | Kw::SelfLower)) => {
                let span = self.advance().span;
                Ok(Ident::new(junco_core::Symbol::from_kw(kw), span))
            }
            _ => {
                self.error_expected(expected);
                self.err_node(self.cspan())
            }
        }
    }

    fn parse_type_alias(&mut self) -> ItemKind {
        let name = self.parse_ident("type alias name");
        let generics = self.parse_opt_generics();
        let ty = if self.eat(TokenKind::Assign) {
            Some(self.parse_ty("aliased type"))
        } else {
            None
        };
        self.eat(TokenKind::Semi);
        ItemKind::TypeAlias(TypeAliasItem { name, generics, ty })
    }

    fn parse_struct(&mut self) -> ItemKind {
        let name = self.parse_ident("struct name");
        let generics = self.parse_opt_generics();
        let fields = if self.eat(TokenKind::Semi) {
            Vec::new()
        } else {
            self.parse_struct_fields()
        };
        ItemKind::Struct(StructItem {
            name,
            generics,
            fields,
        })
    }

    fn parse_struct_fields(&mut self) -> Vec<StructField> {
        let mut fields = Vec::new();
        if !self.expect(TokenKind::LBrace, "`{` to open the field list") {
            return fields;
        }
        while !self.is(TokenKind::RBrace) && !self.eof() {
            let lo = self.cspan();
            let vis = self.parse_vis();
            let name = self.parse_ident("field name");
            self.expect(TokenKind::Colon, "`:` before the field type");
            let ty = self.parse_ty("field type");
            let span = lo.to(self.pspan());
            let id = self.node_id(span);
            fields.push(StructField {
                id,
                vis,
                name: Some(name),
                ty,
                span,
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "`}` to close the field list");
        fields
    }

    fn parse_enum(&mut self) -> ItemKind {
        let name = self.parse_ident("enum name");
        let generics = self.parse_opt_generics();
        let mut variants = Vec::new();
        self.expect(TokenKind::LBrace, "`{` to open the variant list");
        while !self.is(TokenKind::RBrace) && !self.eof() {
            variants.push(self.parse_variant());
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "`}` to close the variant list");
        ItemKind::Enum(EnumItem {
            name,
            generics,
            variants,
        })
    }

    fn parse_variant(&mut self) -> Variant {
        let lo = self.cspan();
        let name = self.parse_ident("variant name");
        let kind = if self.is(TokenKind::LParen) {
            VariantKind::Tuple(self.parse_tuple_fields())
        } else if self.is(TokenKind::LBrace) {
            VariantKind::Struct(self.parse_struct_fields())
        } else if self.eat(TokenKind::Assign) {
            let expr = self.parse_expr("variant discriminant");
            let id = self.node_id(super::pr_expr_span(&expr));
            VariantKind::Unit(Some(AnonConst { id, expr }))
        } else {
            VariantKind::Unit(None)
        };
        let span = lo.to(self.pspan());
        let id = self.node_id(span);
        Variant {
            id,
            name,
            kind,
            span,
        }
    }

    fn parse_tuple_fields(&mut self) -> Vec<StructField> {
        let mut fields = Vec::new();
        self.expect(TokenKind::LParen, "`(` to open the tuple field list");
        while !self.is(TokenKind::RParen) && !self.eof() {
            let lo = self.cspan();
            let ty = self.parse_ty("tuple field type");
            let span = lo.to(self.pspan());
            let id = self.node_id(span);
            fields.push(StructField {
                id,
                vis: Vis::Unset,
                name: None,
                ty,
                span,
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "`)` to close the tuple field list");
        fields
    }

    fn parse_trait(&mut self) -> ItemKind {
        let name = self.parse_ident("trait name");
        let generics = self.parse_opt_generics();
        let mut super_traits = Vec::new();
        if self.eat(TokenKind::Colon) {
            loop {
                super_traits.push(self.parse_type_path("supertrait path"));
                if !self.eat(TokenKind::Add) {
                    break;
                }
            }
        }
        self.expect(TokenKind::LBrace, "`{` to open the trait body");
        let members = self.parse_member_list();
        self.expect(TokenKind::RBrace, "`}` to close the trait body");
        ItemKind::Trait(TraitItem {
            name,
            generics,
            super_traits,
            members,
        })
    }

    fn parse_impl(&mut self) -> ItemKind {
        let generics = self.parse_opt_generics();
        let first = self.parse_ty("implemented type or trait");
        let (trait_path, ty) = if self.eat_kw(Kw::For) {
            let trait_path = match first {
                Ok(ty) => match ty.kind {
                    TyKind::Path(path) => Ok(path),
                    _ => {
                        self.error("`impl ... for` expects a trait path", ty.span);
                        Err(ErrorNode { span: ty.span })
                    }
                },
                Err(err) => Err(err),
            };
            (Some(trait_path), self.parse_ty("implemented type"))
        } else {
            (None, first)
        };
        self.expect(TokenKind::LBrace, "`{` to open the `impl` body");
        let members = self.parse_member_list();
        self.expect(TokenKind::RBrace, "`}` to close the `impl` body");
        ItemKind::Impl(ImplItem {
            generics,
            trait_path,
            ty,
            members,
        })
    }

    fn parse_const(&mut self) -> ItemKind {
        let name = self.parse_ident("constant name");
        self.expect(TokenKind::Colon, "`:` before the constant type");
        let ty = self.parse_ty("constant type");
        let value = if self.eat(TokenKind::Assign) {
            Some(self.parse_expr("constant value"))
        } else {
            None
        };
        self.eat(TokenKind::Semi);
        ItemKind::Const(ConstItem { name, ty, value })
    }

    // Generics //

    pub(crate) fn parse_opt_generics(&mut self) -> Vec<GenericParam> {
        let mut params = Vec::new();
        if !self.eat(TokenKind::LAngle) {
            return params;
        }
        while !self.is(TokenKind::RAngle) && !self.eof() {
            params.push(self.parse_generic_param());
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RAngle, "`>` to close the generic parameter list");
        params
    }

    fn parse_generic_param(&mut self) -> GenericParam {
        let lo = self.cspan();
        let kind = match self.peek().kind {
            TokenKind::Lifetime(sym) => {
                let span = self.advance().span;
                GenericParamKind::Lifetime {
                    name: Ok(Ident::new(sym, span)),
                }
            }
            TokenKind::Kw(Kw::Const) => {
                self.advance();
                let name = self.parse_ident("const parameter name");
                self.expect(TokenKind::Colon, "`:` before the const parameter type");
                let ty = self.parse_ty("const parameter type");
                let default = if self.eat(TokenKind::Assign) {
                    let expr = self.parse_expr("const parameter default");
                    let id = self.node_id(super::pr_expr_span(&expr));
                    Some(AnonConst { id, expr })
                } else {
                    None
                };
                GenericParamKind::Const { name, ty, default }
            }
            _ => {
                let name = self.parse_ident("generic parameter");
                let bound = if self.eat(TokenKind::Colon) {
                    Some(self.parse_ty("type parameter bound"))
                } else {
                    None
                };
                GenericParamKind::Type { name, bound }
            }
        };
        let span = lo.to(self.pspan());
        let id = self.node_id(span);
        GenericParam { id, kind, span }
    }
}
