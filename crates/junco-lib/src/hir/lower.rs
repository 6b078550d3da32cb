//! AST → HIR lowering.
//!
//! One pass over the AST with an owner stack: entering an owner-like
//! item (mod, func, init, impl, trait, enum, struct, type alias) resets
//! the child counter, and every produced node takes the next owner-
//! scoped id. Bodies are split off under the `NodeId` of their value
//! expression.
//!
//! Desugarings performed here:
//! - `for pat in e { .. }` → `{ let it = IntoIter::into_iter(e);
//!   loop { match it.next() { Some(pat) => .., None => break } } }`
//!   with the library names left symbolic (`Res::Error`);
//! - `while cond { .. }` → `loop { if cond { .. } else { break } }`;
//! - `a and b` / `a or b` → `if` expressions;
//! - compound assignment → `lhs = lhs op rhs` with the left side
//!   duplicated under fresh ids but shared resolutions;
//! - parens dropped, `self` turned into a resolved path.

use indexmap::IndexMap;

use junco_core::{Kw, Symbol};

use crate::ast::{self, Lit, NodeId, PR};
use crate::diagnostics::MessageHolder;
use crate::resolve::{DefId, DefKind, Res, Vis};
use crate::session::Session;
use crate::span::{Ident, Span, Spanned};

use super::*;

/// Lower the party. Run only after name resolution succeeded.
pub fn lower(sess: &mut Session, party: &ast::Party) -> (Party, MessageHolder) {
    let mut ctx = Lowering {
        sess,
        owners: IndexMap::new(),
        bodies: IndexMap::new(),
        modules: vec![DefId::ROOT],
        owner_stack: vec![OwnerCtx {
            def: DefId::ROOT,
            next_child: 1,
        }],
        msg: MessageHolder::new(),
    };

    let mut root_items = Vec::new();
    for item in party.items.iter().flatten() {
        if let Some(id) = ctx.lower_item(item) {
            root_items.push(id);
        }
    }

    let root_ident = ctx.sess.def_table.def(DefId::ROOT).ident;
    ctx.owners.insert(
        DefId::ROOT,
        Item {
            hir_id: HirId::owner_of(DefId::ROOT),
            def_id: DefId::ROOT,
            ident: root_ident,
            vis: Vis::Pub,
            kind: ItemKind::Mod(Mod { items: root_items }),
            span: Span::DUMMY,
        },
    );

    let party = Party {
        root_mod: ItemId(DefId::ROOT),
        owners: ctx.owners,
        bodies: ctx.bodies,
        modules: ctx.modules,
    };
    (party, ctx.msg)
}

struct OwnerCtx {
    def: DefId,
    next_child: u32,
}

struct Lowering<'s> {
    sess: &'s mut Session,
    owners: IndexMap<DefId, Item>,
    bodies: IndexMap<BodyId, Body>,
    modules: Vec<DefId>,
    owner_stack: Vec<OwnerCtx>,
    msg: MessageHolder,
}

impl Lowering<'_> {
    fn next_hir_id(&mut self) -> HirId {
        let top = match self.owner_stack.last_mut() {
            Some(top) => top,
            None => junco_core::ice!("lowering outside of any owner"),
        };
        let child = top.next_child;
        top.next_child += 1;
        HirId {
            owner: top.def,
            child,
        }
    }

    fn res_of(&self, node: NodeId) -> Res {
        self.sess.resolutions.get(node).unwrap_or(Res::Error)
    }

    fn synth_node(&mut self) -> NodeId {
        self.sess.alloc_node(Span::DUMMY)
    }

    fn sym(&mut self, text: &str) -> Symbol {
        self.sess.interner.intern(text)
    }

    // Items //

    fn lower_item(&mut self, item: &ast::Item) -> Option<ItemId> {
        if matches!(item.kind, ast::ItemKind::Use(_)) {
            return None;
        }
        let def_id = self.sess.def_table.def_of_node(item.id)?;
        let def = *self.sess.def_table.def(def_id);
        let vis = match item.vis {
            ast::Vis::Unset => Vis::Unset,
            ast::Vis::Pub(_) => Vis::Pub,
        };

        // `const` items are not owners; their bodies belong to the
        // enclosing owner.
        if def.kind == DefKind::Const {
            if let ast::ItemKind::Const(const_item) = &item.kind {
                let kind = self.lower_const(const_item);
                let hir_id = self.next_hir_id();
                self.owners.insert(
                    def_id,
                    Item {
                        hir_id,
                        def_id,
                        ident: def.ident,
                        vis,
                        kind,
                        span: item.span,
                    },
                );
                return Some(ItemId(def_id));
            }
        }

        self.owner_stack.push(OwnerCtx {
            def: def_id,
            next_child: 1,
        });
        let kind = self.lower_item_kind(item);
        self.owner_stack.pop();

        let kind = kind?;
        if matches!(kind, ItemKind::Mod(_)) {
            self.modules.push(def_id);
        }
        self.owners.insert(
            def_id,
            Item {
                hir_id: HirId::owner_of(def_id),
                def_id,
                ident: def.ident,
                vis,
                kind,
                span: item.span,
            },
        );
        Some(ItemId(def_id))
    }

    fn lower_item_kind(&mut self, item: &ast::Item) -> Option<ItemKind> {
        Some(match &item.kind {
            ast::ItemKind::Mod(module) => {
                let items = self.lower_item_list(&module.items);
                ItemKind::Mod(Mod { items })
            }
            ast::ItemKind::Enum(enum_item) => {
                let variants = enum_item
                    .variants
                    .iter()
                    .filter_map(|variant| self.lower_variant(variant))
                    .collect();
                ItemKind::Enum { variants }
            }
            ast::ItemKind::Struct(struct_item) => {
                let fields = struct_item
                    .fields
                    .iter()
                    .map(|field| self.lower_field(field))
                    .collect();
                ItemKind::Struct { fields }
            }
            ast::ItemKind::Trait(trait_item) => {
                let members = self.lower_item_list(&trait_item.members);
                ItemKind::Trait { members }
            }
            ast::ItemKind::Impl(impl_item) => {
                let members = self.lower_item_list(&impl_item.members);
                ItemKind::Impl { members }
            }
            ast::ItemKind::Func(func_item) => {
                let sig = self.lower_sig(&func_item.sig);
                let body = func_item
                    .body
                    .as_ref()
                    .and_then(|body| self.lower_fn_body(&func_item.sig, body));
                ItemKind::Func(FuncItem { sig, body })
            }
            ast::ItemKind::Init(init_item) => {
                let sig = self.lower_sig(&init_item.sig);
                let body = init_item
                    .body
                    .as_ref()
                    .and_then(|body| self.lower_fn_body(&init_item.sig, body));
                ItemKind::Init(FuncItem { sig, body })
            }
            ast::ItemKind::TypeAlias(alias) => {
                let ty = match &alias.ty {
                    Some(Ok(ty)) => Some(self.lower_ty(ty)),
                    Some(Err(_)) | None => None,
                };
                ItemKind::TypeAlias { ty }
            }
            ast::ItemKind::Const(const_item) => self.lower_const(const_item),
            ast::ItemKind::Use(_) => return None,
        })
    }

    fn lower_const(&mut self, const_item: &ast::ConstItem) -> ItemKind {
        let ty = self.lower_pr_ty(&const_item.ty);
        let body = match &const_item.value {
            Some(Ok(value)) => {
                let value_id = value.id;
                let expr = self.lower_expr(value);
                Some(self.register_body(value_id, Vec::new(), expr))
            }
            _ => None,
        };
        ItemKind::Const { ty, body }
    }

    fn lower_item_list(&mut self, items: &[PR<ast::Item>]) -> Vec<ItemId> {
        items
            .iter()
            .flatten()
            .filter_map(|item| self.lower_item(item))
            .collect()
    }

    fn lower_variant(&mut self, variant: &ast::Variant) -> Option<Variant> {
        let def_id = self.sess.def_table.def_of_node(variant.id)?;
        let ident = self.sess.def_table.def(def_id).ident;
        let (fields, disc) = match &variant.kind {
            ast::VariantKind::Unit(disc) => {
                let disc = disc.as_ref().map(|anon| self.lower_anon_const(anon));
                (Vec::new(), disc)
            }
            ast::VariantKind::Tuple(fields) | ast::VariantKind::Struct(fields) => {
                let fields = fields.iter().map(|field| self.lower_field(field)).collect();
                (fields, None)
            }
        };
        Some(Variant {
            hir_id: self.next_hir_id(),
            def_id,
            ident,
            fields,
            disc,
            span: variant.span,
        })
    }

    fn lower_field(&mut self, field: &ast::StructField) -> FieldDef {
        FieldDef {
            hir_id: self.next_hir_id(),
            ident: field.name.as_ref().and_then(|name| name.as_ref().ok()).copied(),
            ty: self.lower_pr_ty(&field.ty),
            span: field.span,
        }
    }

    fn lower_sig(&mut self, sig: &ast::FuncSig) -> FuncSig {
        let inputs = sig
            .params
            .iter()
            .map(|param| self.lower_pr_ty(&param.ty))
            .collect();
        let labels = sig
            .params
            .iter()
            .map(|param| param.label.map(|label| label.sym))
            .collect();
        let output = match &sig.ret {
            ast::FuncRetTy::Default => None,
            ast::FuncRetTy::Some(ty) => Some(self.lower_pr_ty(ty)),
        };
        FuncSig {
            has_self: sig.self_param.is_some(),
            inputs,
            labels,
            output,
            span: sig.span,
        }
    }

    /// Split the function body off as an independently checkable unit.
    fn lower_fn_body(&mut self, sig: &ast::FuncSig, body: &ast::Body) -> Option<BodyId> {
        let value = body.value.as_ref().ok()?;
        let params = sig
            .params
            .iter()
            .map(|param| self.lower_pr_pat(&param.pat))
            .collect();
        let expr = self.lower_expr(value);
        Some(self.register_body(value.id, params, expr))
    }

    fn register_body(&mut self, node: NodeId, params: Vec<Pat>, value: Expr) -> BodyId {
        let id = BodyId(node);
        self.bodies.insert(id, Body { params, value });
        id
    }

    /// Anonymous consts (array sizes, const-param defaults, variant
    /// discriminants) become bodies of their own.
    fn lower_anon_const(&mut self, anon: &ast::AnonConst) -> BodyId {
        let (node, value) = match &anon.expr {
            Ok(expr) => (expr.id, self.lower_expr(expr)),
            Err(err) => (anon.id, self.err_expr(err.span)),
        };
        self.register_body(node, Vec::new(), value)
    }

    // Types //

    fn lower_pr_ty(&mut self, ty: &ast::PTy) -> Ty {
        match ty {
            Ok(ty) => self.lower_ty(ty),
            Err(err) => Ty {
                hir_id: self.next_hir_id(),
                kind: TyKind::Err,
                span: err.span,
            },
        }
    }

    fn lower_ty(&mut self, ty: &ast::Ty) -> Ty {
        let kind = match &ty.kind {
            // Parens vanish; the inner type is promoted.
            ast::TyKind::Paren(inner) => return self.lower_pr_ty(inner),
            ast::TyKind::Unit => TyKind::Unit,
            ast::TyKind::Tuple(els) => {
                TyKind::Tuple(els.iter().map(|el| self.lower_pr_ty(&el.ty)).collect())
            }
            ast::TyKind::Func(func) => TyKind::Func {
                params: func
                    .params
                    .iter()
                    .map(|el| self.lower_pr_ty(&el.ty))
                    .collect(),
                ret: Box::new(self.lower_pr_ty(&func.ret)),
            },
            ast::TyKind::Slice(inner) => TyKind::Slice(Box::new(self.lower_pr_ty(inner))),
            ast::TyKind::Array(inner, size) => TyKind::Array {
                ty: Box::new(self.lower_pr_ty(inner)),
                size: self.lower_anon_const(size),
            },
            ast::TyKind::Path(path) => TyKind::Path(self.lower_path(path)),
        };
        Ty {
            hir_id: self.next_hir_id(),
            kind,
            span: ty.span,
        }
    }

    // Paths //

    fn lower_path(&mut self, path: &ast::Path) -> Path {
        let segs = path
            .segments
            .iter()
            .flatten()
            .filter_map(|seg| seg.ident.as_ref().ok())
            .copied()
            .collect();
        Path {
            res: self.res_of(path.id),
            segs,
            span: path.span,
        }
    }

    /// Synthetic path with symbolic segments; resolution comes later
    /// when the library items exist.
    fn symbolic_path(&mut self, segs: &[&str], res: Res, span: Span) -> Path {
        let segs = segs
            .iter()
            .map(|text| {
                let sym = self.sym(text);
                Ident::new(sym, span)
            })
            .collect();
        Path { res, segs, span }
    }

    // Patterns //

    fn lower_pr_pat(&mut self, pat: &ast::PPat) -> Pat {
        match pat {
            Ok(pat) => self.lower_pat(pat),
            Err(err) => Pat {
                hir_id: self.next_hir_id(),
                kind: PatKind::Err,
                span: err.span,
            },
        }
    }

    fn lower_pat(&mut self, pat: &ast::Pat) -> Pat {
        let kind = match &pat.kind {
            // Parens vanish here too.
            ast::PatKind::Paren(inner) => return self.lower_pr_pat(inner),
            ast::PatKind::Multi(pats) => {
                PatKind::Multi(pats.iter().map(|sub| self.lower_pr_pat(sub)).collect())
            }
            ast::PatKind::Lit(lit_pat) => PatKind::Lit {
                neg: lit_pat.neg,
                lit: lit_pat.lit,
            },
            ast::PatKind::Ident(ident_pat) => {
                let ident = match &ident_pat.ident {
                    Ok(ident) => *ident,
                    Err(err) => Ident::new(Symbol::from_kw(Kw::Empty), err.span),
                };
                PatKind::Ident {
                    is_ref: ident_pat.is_ref,
                    is_mut: ident_pat.is_mut,
                    ident,
                    node: pat.id,
                    sub: ident_pat
                        .sub
                        .as_ref()
                        .map(|sub| Box::new(self.lower_pr_pat(sub))),
                }
            }
            ast::PatKind::Ref(ref_pat) => PatKind::Ref {
                is_mut: ref_pat.is_mut,
                pat: Box::new(self.lower_pr_pat(&ref_pat.pat)),
            },
            ast::PatKind::Path(path) => PatKind::Path(self.lower_path(path)),
            ast::PatKind::Wildcard => PatKind::Wildcard,
            ast::PatKind::Rest => PatKind::Rest,
            ast::PatKind::Struct(struct_pat) => {
                let path = match &struct_pat.path {
                    Ok(path) => self.lower_path(path),
                    Err(err) => Path {
                        res: Res::Error,
                        segs: Vec::new(),
                        span: err.span,
                    },
                };
                let mut rest = false;
                let mut fields = Vec::new();
                for field in &struct_pat.fields {
                    match field {
                        ast::StructPatField::Named {
                            ident, pat, span, ..
                        } => {
                            let Ok(ident) = ident else { continue };
                            fields.push(PatField {
                                ident: *ident,
                                pat: self.lower_pr_pat(pat),
                                span: *span,
                            });
                        }
                        ast::StructPatField::Shortcut {
                            id,
                            is_ref,
                            is_mut,
                            ident,
                            span,
                        } => {
                            let Ok(ident) = ident else { continue };
                            let hir_id = self.next_hir_id();
                            fields.push(PatField {
                                ident: *ident,
                                pat: Pat {
                                    hir_id,
                                    kind: PatKind::Ident {
                                        is_ref: *is_ref,
                                        is_mut: *is_mut,
                                        ident: *ident,
                                        node: *id,
                                        sub: None,
                                    },
                                    span: *span,
                                },
                                span: *span,
                            });
                        }
                        ast::StructPatField::Rest { .. } => rest = true,
                    }
                }
                PatKind::Struct { path, fields, rest }
            }
            ast::PatKind::Tuple(tuple) => PatKind::Tuple {
                els: tuple.els.iter().map(|el| self.lower_pr_pat(el)).collect(),
                rest_idx: tuple.rest_idx,
            },
            ast::PatKind::Slice(slice) => {
                PatKind::Slice(slice.els.iter().map(|el| self.lower_pr_pat(el)).collect())
            }
        };
        Pat {
            hir_id: self.next_hir_id(),
            kind,
            span: pat.span,
        }
    }

    // Statements and blocks //

    fn lower_block(&mut self, block: &ast::Block) -> Block {
        let stmts = block
            .stmts
            .iter()
            .flatten()
            .filter_map(|stmt| self.lower_stmt(stmt))
            .collect();
        Block {
            hir_id: self.next_hir_id(),
            stmts,
            span: block.span,
        }
    }

    fn lower_pr_block(&mut self, block: &ast::PBlock, fallback: Span) -> Block {
        match block {
            Ok(block) => self.lower_block(block),
            Err(err) => Block {
                hir_id: self.next_hir_id(),
                stmts: Vec::new(),
                span: if err.span.is_dummy() { fallback } else { err.span },
            },
        }
    }

    fn lower_stmt(&mut self, stmt: &ast::Stmt) -> Option<Stmt> {
        let kind = match &stmt.kind {
            ast::StmtKind::Let(let_stmt) => StmtKind::Let(LetStmt {
                pat: self.lower_pr_pat(&let_stmt.pat),
                ty: match &let_stmt.ty {
                    Some(Ok(ty)) => Some(self.lower_ty(ty)),
                    Some(Err(err)) => Some(Ty {
                        hir_id: self.next_hir_id(),
                        kind: TyKind::Err,
                        span: err.span,
                    }),
                    None => None,
                },
                value: match &let_stmt.value {
                    Some(Ok(value)) => Some(self.lower_expr(value)),
                    Some(Err(err)) => Some(self.err_expr(err.span)),
                    None => None,
                },
            }),
            ast::StmtKind::Item(item) => {
                let item = item.as_ref().ok()?;
                let id = self.lower_item(item)?;
                StmtKind::Item(id)
            }
            ast::StmtKind::Expr(expr) => match expr {
                Ok(expr) => StmtKind::Expr(self.lower_expr(expr)),
                Err(err) => StmtKind::Expr(self.err_expr(err.span)),
            },
        };
        Some(Stmt {
            hir_id: self.next_hir_id(),
            kind,
            span: stmt.span,
        })
    }

    // Expressions //

    fn err_expr(&mut self, span: Span) -> Expr {
        Expr {
            hir_id: self.next_hir_id(),
            kind: ExprKind::Err,
            span,
        }
    }

    fn lower_pr_expr(&mut self, expr: &ast::PExpr) -> Expr {
        match expr {
            Ok(expr) => self.lower_expr(expr),
            Err(err) => self.err_expr(err.span),
        }
    }

    fn lower_opt_expr(&mut self, expr: &Option<ast::PExpr>) -> Option<Box<Expr>> {
        expr.as_ref().map(|expr| Box::new(self.lower_pr_expr(expr)))
    }

    fn lower_expr(&mut self, expr: &ast::Expr) -> Expr {
        let kind = match &expr.kind {
            // Parens are discarded; the inner expression is promoted.
            ast::ExprKind::Paren(inner) => return self.lower_pr_expr(inner),
            ast::ExprKind::Assign(assign) => return self.lower_assign(expr, assign),
            ast::ExprKind::Infix(infix) => return self.lower_infix(expr, infix),
            ast::ExprKind::While(while_expr) => return self.lower_while(expr, while_expr),
            ast::ExprKind::For(for_expr) => return self.lower_for(expr, for_expr),
            ast::ExprKind::Block(block) => {
                ExprKind::Block(self.lower_pr_block(block, expr.span))
            }
            ast::ExprKind::Borrow(borrow) => ExprKind::Borrow {
                is_mut: borrow.is_mut,
                expr: Box::new(self.lower_pr_expr(&borrow.expr)),
            },
            ast::ExprKind::Break(brk) => ExprKind::Break {
                expr: self.lower_opt_expr(&brk.expr),
            },
            ast::ExprKind::Cast(cast) => ExprKind::Cast {
                expr: Box::new(self.lower_pr_expr(&cast.expr)),
                ty: Box::new(self.lower_pr_ty(&cast.ty)),
            },
            ast::ExprKind::Continue => ExprKind::Continue,
            ast::ExprKind::Field(field) => ExprKind::Field {
                lhs: Box::new(self.lower_pr_expr(&field.lhs)),
                field: match &field.field {
                    Ok(ident) => *ident,
                    Err(err) => Ident::new(Symbol::from_kw(Kw::Empty), err.span),
                },
            },
            ast::ExprKind::If(if_expr) => ExprKind::If {
                cond: Box::new(self.lower_pr_expr(&if_expr.cond)),
                then: match &if_expr.if_branch {
                    Some(block) => self.lower_pr_block(block, expr.span),
                    None => Block {
                        hir_id: self.next_hir_id(),
                        stmts: Vec::new(),
                        span: expr.span,
                    },
                },
                els: self.lower_opt_expr(&if_expr.else_branch),
            },
            ast::ExprKind::Invoke(invoke) => ExprKind::Invoke {
                callee: Box::new(self.lower_pr_expr(&invoke.callee)),
                args: invoke.args.iter().map(|arg| self.lower_arg(arg)).collect(),
            },
            ast::ExprKind::Lambda(lambda) => ExprKind::Lambda {
                params: lambda
                    .params
                    .iter()
                    .map(|param| self.lower_pr_pat(&param.pat))
                    .collect(),
                body: Box::new(self.lower_pr_expr(&lambda.body)),
            },
            ast::ExprKind::List(els) => {
                ExprKind::List(els.iter().map(|el| self.lower_pr_expr(el)).collect())
            }
            ast::ExprKind::Literal(lit) => ExprKind::Lit(*lit),
            ast::ExprKind::Loop(block) => ExprKind::Loop {
                body: self.lower_pr_block(block, expr.span),
            },
            ast::ExprKind::Match(match_expr) => ExprKind::Match {
                subject: Box::new(self.lower_pr_expr(&match_expr.subject)),
                arms: match_expr
                    .arms
                    .iter()
                    .map(|arm| self.lower_arm(arm))
                    .collect(),
            },
            ast::ExprKind::Path(path) => ExprKind::Path(self.lower_path(path)),
            ast::ExprKind::Postfix(postfix) => ExprKind::Postfix {
                lhs: Box::new(self.lower_pr_expr(&postfix.lhs)),
                op: postfix.op,
            },
            ast::ExprKind::Prefix(prefix) => ExprKind::Prefix {
                op: prefix.op,
                rhs: Box::new(self.lower_pr_expr(&prefix.rhs)),
            },
            ast::ExprKind::Return(ret) => ExprKind::Return {
                expr: self.lower_opt_expr(&ret.expr),
            },
            // Syntactic `self` becomes a path carrying its resolution.
            ast::ExprKind::SelfExpr => {
                let res = self.res_of(expr.id);
                ExprKind::Path(self.symbolic_path(&["self"], res, expr.span))
            }
            ast::ExprKind::Spread(inner) => {
                ExprKind::Spread(Box::new(self.lower_pr_expr(inner)))
            }
            ast::ExprKind::Struct(struct_expr) => ExprKind::Struct {
                path: self.lower_path(&struct_expr.path),
                fields: struct_expr
                    .fields
                    .iter()
                    .filter_map(|field| self.lower_struct_field(field))
                    .collect(),
            },
            ast::ExprKind::Subscript(subscript) => ExprKind::Subscript {
                lhs: Box::new(self.lower_pr_expr(&subscript.lhs)),
                indices: subscript
                    .indices
                    .iter()
                    .map(|index| self.lower_pr_expr(index))
                    .collect(),
            },
            ast::ExprKind::Tuple(els) => {
                ExprKind::Tuple(els.iter().map(|el| self.lower_pr_expr(el)).collect())
            }
            ast::ExprKind::Unit => ExprKind::Unit,
        };
        Expr {
            hir_id: self.next_hir_id(),
            kind,
            span: expr.span,
        }
    }

    fn lower_arg(&mut self, arg: &ast::Arg) -> Arg {
        Arg {
            label: arg.label,
            value: self.lower_pr_expr(&arg.value),
            span: arg.span,
        }
    }

    fn lower_arm(&mut self, arm: &ast::MatchArm) -> Arm {
        Arm {
            hir_id: self.next_hir_id(),
            pat: self.lower_pr_pat(&arm.pat),
            guard: arm
                .guard
                .as_ref()
                .map(|guard| self.lower_pr_expr(guard)),
            body: self.lower_pr_expr(&arm.body),
            span: arm.span,
        }
    }

    fn lower_struct_field(&mut self, field: &ast::StructExprField) -> Option<StructExprField> {
        match field {
            ast::StructExprField::Full(name, value) => {
                let name = name.as_ref().ok()?;
                Some(StructExprField::Full(*name, self.lower_pr_expr(value)))
            }
            // `Point { x }` is `Point { x: x }` with a path value.
            ast::StructExprField::Shortcut(name) => {
                let name = name.as_ref().ok()?;
                let hir_id = self.next_hir_id();
                let value = Expr {
                    hir_id,
                    kind: ExprKind::Path(Path {
                        res: Res::Error,
                        segs: vec![*name],
                        span: name.span,
                    }),
                    span: name.span,
                };
                Some(StructExprField::Full(*name, value))
            }
            ast::StructExprField::Base(base) => {
                Some(StructExprField::Base(self.lower_pr_expr(base)))
            }
        }
    }

    /// Compound assignment expands to `lhs = lhs op rhs`; the duplicated
    /// left side takes fresh ids but shares the original resolution.
    fn lower_assign(&mut self, expr: &ast::Expr, assign: &ast::AssignExpr) -> Expr {
        let lhs = self.lower_pr_expr(&assign.lhs);
        let rhs = self.lower_pr_expr(&assign.rhs);

        let rhs = match assign.op.node.bin_op() {
            None => rhs,
            Some(op) => {
                let lhs_again = self.lower_pr_expr(&assign.lhs);
                Expr {
                    hir_id: self.next_hir_id(),
                    kind: ExprKind::Infix {
                        lhs: Box::new(lhs_again),
                        op: Spanned::new(op, assign.op.span),
                        rhs: Box::new(rhs),
                    },
                    span: expr.span,
                }
            }
        };

        Expr {
            hir_id: self.next_hir_id(),
            kind: ExprKind::Assign {
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            span: expr.span,
        }
    }

    /// `a and b` → `if a { b } else { false }`;
    /// `a or b`  → `if a { true } else { b }`.
    fn lower_infix(&mut self, expr: &ast::Expr, infix: &ast::InfixExpr) -> Expr {
        match infix.op.node {
            ast::BinOp::And | ast::BinOp::Or => {
                let is_and = infix.op.node == ast::BinOp::And;
                let cond = self.lower_pr_expr(&infix.lhs);
                let rhs = self.lower_pr_expr(&infix.rhs);
                let short = self.bool_expr(!is_and, infix.op.span);

                let (then_value, els) = if is_and {
                    (rhs, short)
                } else {
                    (short, rhs)
                };
                let then = self.block_of(then_value, expr.span);
                Expr {
                    hir_id: self.next_hir_id(),
                    kind: ExprKind::If {
                        cond: Box::new(cond),
                        then,
                        els: Some(Box::new(els)),
                    },
                    span: expr.span,
                }
            }
            op => {
                let lhs = self.lower_pr_expr(&infix.lhs);
                let rhs = self.lower_pr_expr(&infix.rhs);
                Expr {
                    hir_id: self.next_hir_id(),
                    kind: ExprKind::Infix {
                        lhs: Box::new(lhs),
                        op: Spanned::new(op, infix.op.span),
                        rhs: Box::new(rhs),
                    },
                    span: expr.span,
                }
            }
        }
    }

    /// `while cond { body }` → `loop { if cond { body } else { break } }`.
    fn lower_while(&mut self, expr: &ast::Expr, while_expr: &ast::WhileExpr) -> Expr {
        let cond = self.lower_pr_expr(&while_expr.cond);
        let then = self.lower_pr_block(&while_expr.body, expr.span);
        let brk = Expr {
            hir_id: self.next_hir_id(),
            kind: ExprKind::Break { expr: None },
            span: expr.span,
        };
        let if_expr = Expr {
            hir_id: self.next_hir_id(),
            kind: ExprKind::If {
                cond: Box::new(cond),
                then,
                els: Some(Box::new(brk)),
            },
            span: expr.span,
        };
        let body = self.block_of(if_expr, expr.span);
        Expr {
            hir_id: self.next_hir_id(),
            kind: ExprKind::Loop { body },
            span: expr.span,
        }
    }

    /// The canonical iterator expansion; library names stay symbolic
    /// until a later pass knows them.
    fn lower_for(&mut self, expr: &ast::Expr, for_expr: &ast::ForExpr) -> Expr {
        let span = expr.span;
        let iter_node = self.synth_node();
        let iter_sym = self.sym("it");

        // let it = IntoIter::into_iter(<iter>)
        let into_iter_path = self.symbolic_path(&["IntoIter", "into_iter"], Res::Error, span);
        let iter_value = self.lower_pr_expr(&for_expr.iter);
        let into_iter_callee = Expr {
            hir_id: self.next_hir_id(),
            kind: ExprKind::Path(into_iter_path),
            span,
        };
        let into_iter_call = Expr {
            hir_id: self.next_hir_id(),
            kind: ExprKind::Invoke {
                callee: Box::new(into_iter_callee),
                args: vec![Arg {
                    label: None,
                    value: iter_value,
                    span,
                }],
            },
            span,
        };
        let iter_pat = Pat {
            hir_id: self.next_hir_id(),
            kind: PatKind::Ident {
                is_ref: false,
                is_mut: true,
                ident: Ident::new(iter_sym, span),
                node: iter_node,
                sub: None,
            },
            span,
        };
        let let_stmt = Stmt {
            hir_id: self.next_hir_id(),
            kind: StmtKind::Let(LetStmt {
                pat: iter_pat,
                ty: None,
                value: Some(into_iter_call),
            }),
            span,
        };

        // it.next()
        let iter_ref = Expr {
            hir_id: self.next_hir_id(),
            kind: ExprKind::Path(Path {
                res: Res::Local(iter_node),
                segs: vec![Ident::new(iter_sym, span)],
                span,
            }),
            span,
        };
        let next_sym = self.sym("next");
        let next_field = Expr {
            hir_id: self.next_hir_id(),
            kind: ExprKind::Field {
                lhs: Box::new(iter_ref),
                field: Ident::new(next_sym, span),
            },
            span,
        };
        let next_call = Expr {
            hir_id: self.next_hir_id(),
            kind: ExprKind::Invoke {
                callee: Box::new(next_field),
                args: Vec::new(),
            },
            span,
        };

        // Some(pat) => body
        let some_path = self.symbolic_path(&["Some"], Res::Error, span);
        let user_pat = self.lower_pr_pat(&for_expr.pat);
        let value_sym = self.sym("value");
        let some_pat = Pat {
            hir_id: self.next_hir_id(),
            kind: PatKind::Struct {
                path: some_path,
                fields: vec![PatField {
                    ident: Ident::new(value_sym, span),
                    pat: user_pat,
                    span,
                }],
                rest: false,
            },
            span,
        };
        let body_block = self.lower_pr_block(&for_expr.body, span);
        let some_body = Expr {
            hir_id: self.next_hir_id(),
            kind: ExprKind::Block(body_block),
            span,
        };
        let some_arm = Arm {
            hir_id: self.next_hir_id(),
            pat: some_pat,
            guard: None,
            body: some_body,
            span,
        };

        // None => break
        let none_path = self.symbolic_path(&["None"], Res::Error, span);
        let none_pat = Pat {
            hir_id: self.next_hir_id(),
            kind: PatKind::Path(none_path),
            span,
        };
        let none_body = Expr {
            hir_id: self.next_hir_id(),
            kind: ExprKind::Break { expr: None },
            span,
        };
        let none_arm = Arm {
            hir_id: self.next_hir_id(),
            pat: none_pat,
            guard: None,
            body: none_body,
            span,
        };

        let match_expr = Expr {
            hir_id: self.next_hir_id(),
            kind: ExprKind::Match {
                subject: Box::new(next_call),
                arms: vec![some_arm, none_arm],
            },
            span,
        };
        let loop_body = self.block_of(match_expr, span);
        let loop_expr = Expr {
            hir_id: self.next_hir_id(),
            kind: ExprKind::Loop { body: loop_body },
            span,
        };
        let loop_stmt = Stmt {
            hir_id: self.next_hir_id(),
            kind: StmtKind::Expr(loop_expr),
            span,
        };

        Expr {
            hir_id: self.next_hir_id(),
            kind: ExprKind::Block(Block {
                hir_id: self.next_hir_id(),
                stmts: vec![let_stmt, loop_stmt],
                span,
            }),
            span,
        }
    }

    fn bool_expr(&mut self, value: bool, span: Span) -> Expr {
        let kw = if value { Kw::True } else { Kw::False };
        Expr {
            hir_id: self.next_hir_id(),
            kind: ExprKind::Lit(Lit {
                kind: crate::token::LitKind::Bool,
                sym: Symbol::from_kw(kw),
                suffix: None,
            }),
            span,
        }
    }

    /// Wrap an expression as a single-statement block.
    fn block_of(&mut self, value: Expr, span: Span) -> Block {
        let stmt = Stmt {
            hir_id: self.next_hir_id(),
            kind: StmtKind::Expr(value),
            span,
        };
        Block {
            hir_id: self.next_hir_id(),
            stmts: vec![stmt],
            span,
        }
    }
}
