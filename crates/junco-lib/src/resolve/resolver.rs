//! Name resolution.
//!
//! Walks the AST with a rib stack: one frame per module body, function
//! (generics, then params), lambda, block, `for` head, and match arm.
//! Every path or identifier reference gets an entry in `Resolutions`;
//! failures are recorded as `Res::Error` after reporting, so later
//! passes never miss a key.

use junco_core::Symbol;

use crate::ast::visit::{self, Visitor};
use crate::ast::*;
use crate::diagnostics::MessageHolder;
use crate::session::Session;
use crate::span::Ident;

use super::def::Namespace;
use super::module::{ModuleId, ModuleTree};
use super::path::{PathOutcome, PathResolver, ResMode, segs_of_path};
use super::res::Res;
use super::rib::{Rib, RibKind, RibSnapshot};

/// Resolve every name reference of the party.
pub fn resolve_names(sess: &mut Session, party: &Party) -> MessageHolder {
    let mut resolver = NameResolver {
        sess,
        module: ModuleTree::ROOT,
        ribs: Vec::new(),
        current_self: None,
        msg: MessageHolder::new(),
    };
    resolver.ribs.push(Rib::bound_to(RibKind::Root, ModuleTree::ROOT));
    resolver.visit_party(party);
    if let Some(rib) = resolver.ribs.pop() {
        resolver
            .sess
            .rib_snapshots
            .push(RibSnapshot { depth: 0, rib });
    }
    resolver.msg
}

struct NameResolver<'s> {
    sess: &'s mut Session,
    /// Module path resolution starts from.
    module: ModuleId,
    ribs: Vec<Rib>,
    /// `self` parameter of the enclosing function, when there is one.
    current_self: Option<NodeId>,
    msg: MessageHolder,
}

impl NameResolver<'_> {
    fn item_module(&self, item: &Item) -> Option<ModuleId> {
        let def = self.sess.def_table.def_of_node(item.id)?;
        self.sess.modules.def_module(def)
    }

    fn in_rib(&mut self, rib: Rib, f: impl FnOnce(&mut Self)) {
        self.ribs.push(rib);
        f(self);
        let rib = match self.ribs.pop() {
            Some(rib) => rib,
            None => junco_core::ice!("rib stack underflow"),
        };
        // Popped frames are kept around so `--print=ribs` can show the
        // lexical scopes after the stage completes.
        self.sess.rib_snapshots.push(RibSnapshot {
            depth: self.ribs.len(),
            rib,
        });
    }

    fn in_module_rib(&mut self, kind: RibKind, module: ModuleId, f: impl FnOnce(&mut Self)) {
        let saved = std::mem::replace(&mut self.module, module);
        self.in_rib(Rib::bound_to(kind, module), f);
        self.module = saved;
    }

    // Path resolution //

    fn resolve_path_in(&mut self, path: &Path, ns: Namespace, suffix: Option<Symbol>) {
        let Some(segs) = segs_of_path(path) else {
            self.sess.resolutions.set(path.id, Res::Error);
            return;
        };
        let res = {
            let resolver = PathResolver {
                def_table: &self.sess.def_table,
                modules: &self.sess.modules,
                interner: &self.sess.interner,
            };
            match resolver.resolve(
                self.module,
                ns,
                path.global,
                &segs,
                suffix,
                ResMode::Specific,
                &self.ribs,
            ) {
                Ok(PathOutcome::Res(res)) => res,
                Ok(PathOutcome::Module(module)) => {
                    Res::Def(resolver.modules.module(module).def_id())
                }
                Err(err) => {
                    resolver.report(&err, &mut self.msg);
                    Res::Error
                }
            }
        };
        self.sess.resolutions.set(path.id, res);
    }

    /// Pattern paths name constants (value namespace) or enum variants
    /// (type namespace); try the former quietly, report from the latter.
    fn resolve_pat_path(&mut self, path: &Path) {
        let Some(segs) = segs_of_path(path) else {
            self.sess.resolutions.set(path.id, Res::Error);
            return;
        };
        let res = {
            let resolver = PathResolver {
                def_table: &self.sess.def_table,
                modules: &self.sess.modules,
                interner: &self.sess.interner,
            };
            let value = resolver.resolve(
                self.module,
                Namespace::Value,
                path.global,
                &segs,
                None,
                ResMode::Specific,
                &self.ribs,
            );
            match value {
                Ok(PathOutcome::Res(res)) => res,
                _ => match resolver.resolve(
                    self.module,
                    Namespace::Type,
                    path.global,
                    &segs,
                    None,
                    ResMode::Specific,
                    &self.ribs,
                ) {
                    Ok(PathOutcome::Res(res)) => res,
                    Ok(PathOutcome::Module(module)) => {
                        Res::Def(resolver.modules.module(module).def_id())
                    }
                    Err(err) => {
                        resolver.report(&err, &mut self.msg);
                        Res::Error
                    }
                },
            }
        };
        self.sess.resolutions.set(path.id, res);
    }

    fn resolve_lifetime(&mut self, id: NodeId, name: Ident) {
        let res = {
            let resolver = PathResolver {
                def_table: &self.sess.def_table,
                modules: &self.sess.modules,
                interner: &self.sess.interner,
            };
            let seg = super::path::Seg {
                sym: name.sym,
                span: name.span,
            };
            match resolver.resolve(
                self.module,
                Namespace::Lifetime,
                false,
                &[seg],
                None,
                ResMode::Specific,
                &self.ribs,
            ) {
                Ok(PathOutcome::Res(res)) => res,
                Ok(PathOutcome::Module(_)) => Res::Error,
                Err(err) => {
                    resolver.report(&err, &mut self.msg);
                    Res::Error
                }
            }
        };
        self.sess.resolutions.set(id, res);
    }

    // Locals //

    /// Declare every binding a pattern introduces into the innermost
    /// rib, and resolve path patterns along the way.
    fn declare_pat(&mut self, pat: &Pat) {
        match &pat.kind {
            PatKind::Ident(ident_pat) => {
                if let Ok(ident) = &ident_pat.ident {
                    self.define_local(ident.sym, pat.id, ident.span);
                }
                if let Some(Ok(sub)) = &ident_pat.sub {
                    self.declare_pat(sub);
                }
            }
            PatKind::Multi(pats) => {
                for sub in pats.iter().flatten() {
                    self.declare_pat(sub);
                }
            }
            PatKind::Paren(Ok(sub)) | PatKind::Ref(RefPat { pat: Ok(sub), .. }) => {
                self.declare_pat(sub);
            }
            PatKind::Path(path) => self.resolve_pat_path(path),
            PatKind::Lit(_)
            | PatKind::Wildcard
            | PatKind::Rest
            | PatKind::Paren(Err(_))
            | PatKind::Ref(RefPat { pat: Err(_), .. }) => {}
            PatKind::Struct(struct_pat) => {
                if let Ok(path) = &struct_pat.path {
                    self.resolve_path_in(path, Namespace::Type, None);
                }
                for field in &struct_pat.fields {
                    match field {
                        StructPatField::Named { pat: Ok(sub), .. } => self.declare_pat(sub),
                        StructPatField::Shortcut { id, ident, .. } => {
                            if let Ok(ident) = ident {
                                self.define_local(ident.sym, *id, ident.span);
                            }
                        }
                        _ => {}
                    }
                }
            }
            PatKind::Tuple(tuple) => {
                for el in tuple.els.iter().flatten() {
                    self.declare_pat(el);
                }
            }
            PatKind::Slice(slice) => {
                for el in slice.els.iter().flatten() {
                    self.declare_pat(el);
                }
            }
        }
    }

    fn declare_pr_pat(&mut self, pat: &PPat) {
        if let Ok(pat) = pat {
            self.declare_pat(pat);
        }
    }

    fn define_local(&mut self, name: Symbol, node: NodeId, span: crate::span::Span) {
        let Some(rib) = self.ribs.last_mut() else {
            junco_core::ice!("define_local with no rib on the stack");
        };
        if let Some(prev) = rib.define_local(name, node) {
            let name = self.sess.interner.resolve(name).to_owned();
            let prev_span = self.sess.node_span(prev);
            self.msg
                .error(format!("identifier `{name}` is bound more than once"))
                .primary(span, "rebound here")
                .aux(prev_span, "first binding is here")
                .emit();
        }
    }

    /// Reconstruct a call-shape suffix (`f(x:_:)`) from argument
    /// labels.
    fn call_suffix(&mut self, base: Symbol, args: &[Arg]) -> Symbol {
        let mut name = self.sess.interner.resolve(base).to_owned();
        name.push('(');
        for arg in args {
            match &arg.label {
                Some(label) => {
                    let label = self.sess.interner.resolve(label.sym).to_owned();
                    name.push_str(&label);
                    name.push(':');
                }
                None => name.push_str("_:"),
            }
        }
        name.push(')');
        self.sess.interner.intern(&name)
    }
}

impl Visitor for NameResolver<'_> {
    fn visit_item(&mut self, item: &Item) {
        match &item.kind {
            ItemKind::Mod(_) => match self.item_module(item) {
                Some(module) => {
                    self.in_module_rib(RibKind::Mod, module, |this| {
                        visit::walk_item(this, item);
                    });
                }
                None => visit::walk_item(self, item),
            },
            ItemKind::Func(func_item) => {
                let module = self.item_module(item);
                self.resolve_func_like(
                    module,
                    &func_item.generics,
                    &func_item.sig,
                    func_item.body.as_ref(),
                );
            }
            ItemKind::Init(init_item) => {
                let module = self.item_module(item);
                self.resolve_func_like(
                    module,
                    &init_item.generics,
                    &init_item.sig,
                    init_item.body.as_ref(),
                );
            }
            ItemKind::Struct(_)
            | ItemKind::Enum(_)
            | ItemKind::Trait(_)
            | ItemKind::Impl(_)
            | ItemKind::TypeAlias(_) => match self.item_module(item) {
                Some(module) => {
                    self.in_module_rib(RibKind::Raw, module, |this| {
                        visit::walk_item(this, item);
                    });
                }
                None => visit::walk_item(self, item),
            },
            ItemKind::Const(_) => visit::walk_item(self, item),
            // Imports were fully handled by the importer.
            ItemKind::Use(_) => {}
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        if let StmtKind::Let(let_stmt) = &stmt.kind {
            // Initializer first: `let x = x` refers to the outer `x`.
            if let Some(Ok(ty)) = &let_stmt.ty {
                self.visit_ty(ty);
            }
            if let Some(Ok(value)) = &let_stmt.value {
                self.visit_expr(value);
            }
            self.declare_pr_pat(&let_stmt.pat);
            return;
        }
        visit::walk_stmt(self, stmt);
    }

    fn visit_block(&mut self, block: &Block) {
        match self.sess.modules.block_module(block.id) {
            Some(module) => {
                self.in_module_rib(RibKind::Raw, module, |this| {
                    visit::walk_block(this, block);
                });
            }
            None => {
                self.in_rib(Rib::new(RibKind::Raw), |this| {
                    visit::walk_block(this, block);
                });
            }
        }
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Path(path) => {
                self.resolve_path_in(path, Namespace::Value, None);
                visit::walk_path(self, path);
            }
            ExprKind::Invoke(invoke) => {
                // A path callee resolves through the overload set using
                // the reconstructed argument-label suffix.
                match invoke.callee.as_deref() {
                    Ok(callee) if matches!(callee.kind, ExprKind::Path(_)) => {
                        let ExprKind::Path(path) = &callee.kind else {
                            unreachable!()
                        };
                        let suffix = path.last_sym().map(|base| self.call_suffix(base, &invoke.args));
                        self.resolve_path_in(path, Namespace::Value, suffix);
                        visit::walk_path(self, path);
                    }
                    Ok(callee) => self.visit_expr(callee),
                    Err(_) => {}
                }
                for arg in &invoke.args {
                    self.visit_arg(arg);
                }
            }
            ExprKind::SelfExpr => {
                let res = match self.current_self {
                    Some(node) => Res::Local(node),
                    None => Res::Error,
                };
                self.sess.resolutions.set(expr.id, res);
            }
            ExprKind::Struct(struct_expr) => {
                self.resolve_path_in(&struct_expr.path, Namespace::Type, None);
                visit::walk_expr(self, expr);
            }
            ExprKind::Lambda(lambda) => {
                self.in_rib(Rib::new(RibKind::Raw), |this| {
                    for param in &lambda.params {
                        if let Some(Ok(ty)) = &param.ty {
                            this.visit_ty(ty);
                        }
                        this.declare_pr_pat(&param.pat);
                    }
                    if let Ok(body) = &lambda.body {
                        this.visit_expr(body);
                    }
                });
            }
            ExprKind::For(for_expr) => {
                if let Ok(iter) = &for_expr.iter {
                    self.visit_expr(iter);
                }
                self.in_rib(Rib::new(RibKind::Raw), |this| {
                    this.declare_pr_pat(&for_expr.pat);
                    if let Ok(body) = &for_expr.body {
                        this.visit_block(body);
                    }
                });
            }
            ExprKind::Match(match_expr) => {
                if let Ok(subject) = &match_expr.subject {
                    self.visit_expr(subject);
                }
                for arm in &match_expr.arms {
                    self.in_rib(Rib::new(RibKind::Raw), |this| {
                        this.declare_pr_pat(&arm.pat);
                        if let Some(Ok(guard)) = &arm.guard {
                            this.visit_expr(guard);
                        }
                        if let Ok(body) = &arm.body {
                            this.visit_expr(body);
                        }
                    });
                }
            }
            _ => visit::walk_expr(self, expr),
        }
    }

    fn visit_ty(&mut self, ty: &Ty) {
        if let TyKind::Path(path) = &ty.kind {
            self.resolve_path_in(path, Namespace::Type, None);
            visit::walk_path(self, path);
            return;
        }
        visit::walk_ty(self, ty);
    }

    fn visit_pat(&mut self, pat: &Pat) {
        // Patterns reached outside a binding context (e.g. through the
        // default walk of a function signature) only resolve their
        // embedded paths; locals were declared by `declare_pat`.
        match &pat.kind {
            PatKind::Path(path) => self.resolve_pat_path(path),
            PatKind::Struct(struct_pat) => {
                if let Ok(path) = &struct_pat.path {
                    self.resolve_path_in(path, Namespace::Type, None);
                }
            }
            _ => visit::walk_pat(self, pat),
        }
    }

    fn visit_generic_arg(&mut self, arg: &GenericArg) {
        if let GenericArg::Lifetime { id, name } = arg {
            self.resolve_lifetime(*id, *name);
            return;
        }
        visit::walk_generic_arg(self, arg);
    }
}

impl NameResolver<'_> {
    /// Shared resolution scaffolding of `func` and `init`: a rib bound
    /// to the item's module (generic parameters), then a params rib with
    /// `self` and pattern locals, then the body.
    fn resolve_func_like(
        &mut self,
        module: Option<ModuleId>,
        generics: &[GenericParam],
        sig: &FuncSig,
        body: Option<&Body>,
    ) {
        let saved_self = self.current_self;
        let run = |this: &mut Self| {
            for param in generics {
                this.visit_generic_param(param);
            }
            this.in_rib(Rib::new(RibKind::Raw), |this| {
                this.current_self = sig.self_param.map(|param| param.id);
                for param in &sig.params {
                    if let Ok(ty) = &param.ty {
                        this.visit_ty(ty);
                    }
                    if let Some(Ok(default)) = &param.default {
                        this.visit_expr(default);
                    }
                    this.declare_pr_pat(&param.pat);
                }
                if let FuncRetTy::Some(Ok(ret)) = &sig.ret {
                    this.visit_ty(ret);
                }
                if let Some(body) = body {
                    if let Ok(value) = &body.value {
                        this.visit_expr(value);
                    }
                }
            });
        };
        match module {
            Some(module) => self.in_module_rib(RibKind::Raw, module, run),
            None => run(self),
        }
        self.current_self = saved_self;
    }
}
