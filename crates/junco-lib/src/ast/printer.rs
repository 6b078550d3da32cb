//! AST dump.
//!
//! Indented tree rendering for `--print=ast` and `--print=ast-names`.
//! Symbols are resolved through the session's interner; every line
//! carries the node id so dumps line up with resolutions.

use junco_core::Interner;

use crate::session::Session;
use crate::span::Ident;

use super::*;

pub struct AstPrinter<'a> {
    interner: &'a Interner,
    out: String,
    indent: usize,
    /// Names-only mode: items and their identifiers, no bodies.
    names_only: bool,
}

impl<'a> AstPrinter<'a> {
    pub fn new(sess: &'a Session) -> Self {
        Self {
            interner: &sess.interner,
            out: String::new(),
            indent: 0,
            names_only: false,
        }
    }

    pub fn names_only(mut self) -> Self {
        self.names_only = true;
        self
    }

    pub fn print(mut self, party: &Party) -> String {
        self.line("Party");
        self.nested(|this| {
            for item in &party.items {
                this.print_pr_item(item);
            }
        });
        self.out
    }

    fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.indent += 1;
        f(self);
        self.indent -= 1;
    }

    fn sym_str(&self, ident: &PR<Ident>) -> String {
        match ident {
            Ok(ident) => format!("`{}`", self.interner.resolve(ident.sym)),
            Err(_) => "<error>".into(),
        }
    }

    fn print_pr_item(&mut self, item: &PR<Item>) {
        match item {
            Ok(item) => self.print_item(item),
            Err(err) => self.line(format!("Error @ {:?}", err.span)),
        }
    }

    fn print_item(&mut self, item: &Item) {
        let vis = match item.vis {
            Vis::Pub(_) => "pub ",
            Vis::Unset => "",
        };
        let head = match &item.kind {
            ItemKind::Enum(e) => format!("{vis}Enum {} #{}", self.sym_str(&e.name), item.id.0),
            ItemKind::Struct(s) => {
                format!("{vis}Struct {} #{}", self.sym_str(&s.name), item.id.0)
            }
            ItemKind::Func(f) => format!("{vis}Func {} #{}", self.sym_str(&f.name), item.id.0),
            ItemKind::Impl(_) => format!("{vis}Impl #{}", item.id.0),
            ItemKind::Mod(m) => format!("{vis}Mod {} #{}", self.sym_str(&m.name), item.id.0),
            ItemKind::Trait(t) => format!("{vis}Trait {} #{}", self.sym_str(&t.name), item.id.0),
            ItemKind::TypeAlias(t) => {
                format!("{vis}TypeAlias {} #{}", self.sym_str(&t.name), item.id.0)
            }
            ItemKind::Use(_) => format!("{vis}UseDecl #{}", item.id.0),
            ItemKind::Init(_) => format!("{vis}Init #{}", item.id.0),
            ItemKind::Const(c) => format!("{vis}Const {} #{}", self.sym_str(&c.name), item.id.0),
        };
        self.line(head);

        self.nested(|this| match &item.kind {
            ItemKind::Enum(e) => {
                for variant in &e.variants {
                    this.line(format!(
                        "Variant {} #{}",
                        this.sym_str(&variant.name),
                        variant.id.0
                    ));
                }
            }
            ItemKind::Struct(s) => {
                for field in &s.fields {
                    let name = match &field.name {
                        Some(name) => this.sym_str(name),
                        None => "<positional>".into(),
                    };
                    this.line(format!("Field {} #{}", name, field.id.0));
                    if !this.names_only {
                        this.nested(|this| this.print_pr_ty(&field.ty));
                    }
                }
            }
            ItemKind::Func(f) => {
                this.print_sig(&f.sig);
                if !this.names_only {
                    if let Some(body) = &f.body {
                        this.line("Body");
                        this.nested(|this| this.print_pr_expr(&body.value));
                    }
                }
            }
            ItemKind::Init(f) => {
                this.print_sig(&f.sig);
                if !this.names_only {
                    if let Some(body) = &f.body {
                        this.line("Body");
                        this.nested(|this| this.print_pr_expr(&body.value));
                    }
                }
            }
            ItemKind::Impl(i) => {
                for member in &i.members {
                    this.print_pr_item(member);
                }
            }
            ItemKind::Mod(m) => {
                for sub in &m.items {
                    this.print_pr_item(sub);
                }
            }
            ItemKind::Trait(t) => {
                for member in &t.members {
                    this.print_pr_item(member);
                }
            }
            ItemKind::TypeAlias(t) => {
                if !this.names_only {
                    if let Some(ty) = &t.ty {
                        this.print_pr_ty(ty);
                    }
                }
            }
            ItemKind::Use(u) => {
                if let Ok(tree) = &u.use_tree {
                    this.print_use_tree(tree);
                }
            }
            ItemKind::Const(c) => {
                if !this.names_only {
                    this.print_pr_ty(&c.ty);
                    if let Some(Ok(value)) = &c.value {
                        this.print_expr(value);
                    }
                }
            }
        });
    }

    fn print_sig(&mut self, sig: &FuncSig) {
        if let Some(self_param) = &sig.self_param {
            let prefix = match (self_param.is_ref, self_param.is_mut) {
                (true, true) => "&mut ",
                (true, false) => "&",
                _ => "",
            };
            self.line(format!("SelfParam {prefix}self #{}", self_param.id.0));
        }
        for param in &sig.params {
            let label = match &param.label {
                Some(label) => format!("`{}`", self.interner.resolve(label.sym)),
                None => "_".into(),
            };
            self.line(format!("Param label={label} #{}", param.id.0));
            if !self.names_only {
                self.nested(|this| {
                    this.print_pr_pat(&param.pat);
                    this.print_pr_ty(&param.ty);
                });
            }
        }
    }

    fn print_use_tree(&mut self, tree: &UseTree) {
        match &tree.kind {
            UseTreeKind::Raw(path) => {
                let path = self.simple_path_str(path);
                self.line(format!("Use {path} #{}", tree.id.0));
            }
            UseTreeKind::All(prefix) => {
                let path = prefix
                    .as_ref()
                    .map(|p| self.simple_path_str(p))
                    .unwrap_or_default();
                self.line(format!("UseAll {path}::* #{}", tree.id.0));
            }
            UseTreeKind::Specific { prefix, trees } => {
                let path = prefix
                    .as_ref()
                    .map(|p| self.simple_path_str(p))
                    .unwrap_or_default();
                self.line(format!("UseSpecific {path} #{}", tree.id.0));
                self.nested(|this| {
                    for sub in trees.iter().flatten() {
                        this.print_use_tree(sub);
                    }
                });
            }
            UseTreeKind::Rebind { path, name } => {
                let path = self.simple_path_str(path);
                self.line(format!(
                    "UseRebind {path} as {} #{}",
                    self.sym_str(name),
                    tree.id.0
                ));
            }
        }
    }

    fn simple_path_str(&self, path: &SimplePath) -> String {
        let mut out = String::new();
        if path.global {
            out.push_str("::");
        }
        for (idx, seg) in path.segments.iter().enumerate() {
            if idx > 0 {
                out.push_str("::");
            }
            match seg {
                Ok(seg) => match &seg.ident {
                    Ok(ident) => out.push_str(self.interner.resolve(ident.sym)),
                    Err(_) => out.push_str("<error>"),
                },
                Err(_) => out.push_str("<error>"),
            }
        }
        out
    }

    fn path_str(&self, path: &Path) -> String {
        let mut out = String::new();
        if path.global {
            out.push_str("::");
        }
        for (idx, seg) in path.segments.iter().enumerate() {
            if idx > 0 {
                out.push_str("::");
            }
            match seg {
                Ok(seg) => match &seg.ident {
                    Ok(ident) => out.push_str(self.interner.resolve(ident.sym)),
                    Err(_) => out.push_str("<error>"),
                },
                Err(_) => out.push_str("<error>"),
            }
        }
        out
    }

    fn print_pr_expr(&mut self, expr: &PExpr) {
        match expr {
            Ok(expr) => self.print_expr(expr),
            Err(err) => self.line(format!("Error @ {:?}", err.span)),
        }
    }

    fn print_expr(&mut self, expr: &Expr) {
        let id = expr.id.0;
        match &expr.kind {
            ExprKind::Assign(assign) => {
                self.line(format!("Assign #{id}"));
                self.nested(|this| {
                    this.print_pr_expr(&assign.lhs);
                    this.print_pr_expr(&assign.rhs);
                });
            }
            ExprKind::Block(block) => self.print_pr_block(block),
            ExprKind::Borrow(borrow) => {
                let head = if borrow.is_mut { "Borrow mut" } else { "Borrow" };
                self.line(format!("{head} #{id}"));
                self.nested(|this| this.print_pr_expr(&borrow.expr));
            }
            ExprKind::Break(brk) => {
                self.line(format!("Break #{id}"));
                if let Some(inner) = &brk.expr {
                    self.nested(|this| this.print_pr_expr(inner));
                }
            }
            ExprKind::Cast(cast) => {
                self.line(format!("Cast #{id}"));
                self.nested(|this| {
                    this.print_pr_expr(&cast.expr);
                    this.print_pr_ty(&cast.ty);
                });
            }
            ExprKind::Continue => self.line(format!("Continue #{id}")),
            ExprKind::Field(field) => {
                self.line(format!("Field {} #{id}", self.sym_str(&field.field)));
                self.nested(|this| this.print_pr_expr(&field.lhs));
            }
            ExprKind::For(for_expr) => {
                self.line(format!("For #{id}"));
                self.nested(|this| {
                    this.print_pr_pat(&for_expr.pat);
                    this.print_pr_expr(&for_expr.iter);
                    this.print_pr_block(&for_expr.body);
                });
            }
            ExprKind::If(if_expr) => {
                self.line(format!("If #{id}"));
                self.nested(|this| {
                    this.print_pr_expr(&if_expr.cond);
                    if let Some(block) = &if_expr.if_branch {
                        this.print_pr_block(block);
                    }
                    if let Some(els) = &if_expr.else_branch {
                        this.print_pr_expr(els);
                    }
                });
            }
            ExprKind::Infix(infix) => {
                self.line(format!("Infix `{}` #{id}", infix.op.node.as_str()));
                self.nested(|this| {
                    this.print_pr_expr(&infix.lhs);
                    this.print_pr_expr(&infix.rhs);
                });
            }
            ExprKind::Invoke(invoke) => {
                self.line(format!("Invoke #{id}"));
                self.nested(|this| {
                    this.print_pr_expr(&invoke.callee);
                    for arg in &invoke.args {
                        let label = match &arg.label {
                            Some(label) => format!("`{}`", this.interner.resolve(label.sym)),
                            None => "_".into(),
                        };
                        this.line(format!("Arg label={label} #{}", arg.id.0));
                        this.nested(|this| this.print_pr_expr(&arg.value));
                    }
                });
            }
            ExprKind::Lambda(lambda) => {
                self.line(format!("Lambda #{id}"));
                self.nested(|this| {
                    for param in &lambda.params {
                        this.print_pr_pat(&param.pat);
                    }
                    this.print_pr_expr(&lambda.body);
                });
            }
            ExprKind::List(els) => {
                self.line(format!("List #{id}"));
                self.nested(|this| {
                    for el in els {
                        this.print_pr_expr(el);
                    }
                });
            }
            ExprKind::Literal(lit) => {
                self.line(format!(
                    "Literal {:?} `{}` #{id}",
                    lit.kind,
                    self.interner.resolve(lit.sym)
                ));
            }
            ExprKind::Loop(block) => {
                self.line(format!("Loop #{id}"));
                self.nested(|this| this.print_pr_block(block));
            }
            ExprKind::Match(match_expr) => {
                self.line(format!("Match #{id}"));
                self.nested(|this| {
                    this.print_pr_expr(&match_expr.subject);
                    for arm in &match_expr.arms {
                        this.line(format!("Arm #{}", arm.id.0));
                        this.nested(|this| {
                            this.print_pr_pat(&arm.pat);
                            if let Some(guard) = &arm.guard {
                                this.print_pr_expr(guard);
                            }
                            this.print_pr_expr(&arm.body);
                        });
                    }
                });
            }
            ExprKind::Paren(inner) => {
                self.line(format!("Paren #{id}"));
                self.nested(|this| this.print_pr_expr(inner));
            }
            ExprKind::Path(path) => {
                self.line(format!("Path {} #{}", self.path_str(path), path.id.0));
            }
            ExprKind::Postfix(postfix) => {
                self.line(format!("Postfix `?` #{id}"));
                self.nested(|this| this.print_pr_expr(&postfix.lhs));
            }
            ExprKind::Prefix(prefix) => {
                let op = match prefix.op.node {
                    PrefixOp::Neg => "-",
                    PrefixOp::Not => "not",
                    PrefixOp::Deref => "*",
                };
                self.line(format!("Prefix `{op}` #{id}"));
                self.nested(|this| this.print_pr_expr(&prefix.rhs));
            }
            ExprKind::Return(ret) => {
                self.line(format!("Return #{id}"));
                if let Some(inner) = &ret.expr {
                    self.nested(|this| this.print_pr_expr(inner));
                }
            }
            ExprKind::SelfExpr => self.line(format!("Self #{id}")),
            ExprKind::Spread(inner) => {
                self.line(format!("Spread #{id}"));
                self.nested(|this| this.print_pr_expr(inner));
            }
            ExprKind::Struct(struct_expr) => {
                self.line(format!(
                    "Struct {} #{id}",
                    self.path_str(&struct_expr.path)
                ));
                self.nested(|this| {
                    for field in &struct_expr.fields {
                        match field {
                            StructExprField::Full(name, value) => {
                                this.line(format!("Field {}", this.sym_str(name)));
                                this.nested(|this| this.print_pr_expr(value));
                            }
                            StructExprField::Shortcut(name) => {
                                this.line(format!("FieldShortcut {}", this.sym_str(name)));
                            }
                            StructExprField::Base(base) => {
                                this.line("Base");
                                this.nested(|this| this.print_pr_expr(base));
                            }
                        }
                    }
                });
            }
            ExprKind::Subscript(subscript) => {
                self.line(format!("Subscript #{id}"));
                self.nested(|this| {
                    this.print_pr_expr(&subscript.lhs);
                    for index in &subscript.indices {
                        this.print_pr_expr(index);
                    }
                });
            }
            ExprKind::Tuple(els) => {
                self.line(format!("Tuple #{id}"));
                self.nested(|this| {
                    for el in els {
                        this.print_pr_expr(el);
                    }
                });
            }
            ExprKind::Unit => self.line(format!("Unit #{id}")),
            ExprKind::While(while_expr) => {
                self.line(format!("While #{id}"));
                self.nested(|this| {
                    this.print_pr_expr(&while_expr.cond);
                    this.print_pr_block(&while_expr.body);
                });
            }
        }
    }

    fn print_pr_block(&mut self, block: &PBlock) {
        match block {
            Ok(block) => {
                self.line(format!("Block #{}", block.id.0));
                self.nested(|this| {
                    for stmt in &block.stmts {
                        this.print_pr_stmt(stmt);
                    }
                });
            }
            Err(err) => self.line(format!("Error @ {:?}", err.span)),
        }
    }

    fn print_pr_stmt(&mut self, stmt: &PR<Stmt>) {
        let stmt = match stmt {
            Ok(stmt) => stmt,
            Err(err) => {
                self.line(format!("Error @ {:?}", err.span));
                return;
            }
        };
        match &stmt.kind {
            StmtKind::Let(let_stmt) => {
                self.line(format!("Let #{}", stmt.id.0));
                self.nested(|this| {
                    this.print_pr_pat(&let_stmt.pat);
                    if let Some(ty) = &let_stmt.ty {
                        this.print_pr_ty(ty);
                    }
                    if let Some(value) = &let_stmt.value {
                        this.print_pr_expr(value);
                    }
                });
            }
            StmtKind::Item(item) => match item {
                Ok(item) => self.print_item(item),
                Err(err) => self.line(format!("Error @ {:?}", err.span)),
            },
            StmtKind::Expr(expr) => self.print_pr_expr(expr),
        }
    }

    fn print_pr_ty(&mut self, ty: &PTy) {
        let ty = match ty {
            Ok(ty) => ty,
            Err(err) => {
                self.line(format!("Error @ {:?}", err.span));
                return;
            }
        };
        let id = ty.id.0;
        match &ty.kind {
            TyKind::Paren(inner) => {
                self.line(format!("ParenType #{id}"));
                self.nested(|this| this.print_pr_ty(inner));
            }
            TyKind::Tuple(els) => {
                self.line(format!("TupleType #{id}"));
                self.nested(|this| {
                    for el in els {
                        this.print_pr_ty(&el.ty);
                    }
                });
            }
            TyKind::Func(func) => {
                self.line(format!("FuncType #{id}"));
                self.nested(|this| {
                    for el in &func.params {
                        this.print_pr_ty(&el.ty);
                    }
                    this.print_pr_ty(&func.ret);
                });
            }
            TyKind::Slice(inner) => {
                self.line(format!("SliceType #{id}"));
                self.nested(|this| this.print_pr_ty(inner));
            }
            TyKind::Array(inner, _) => {
                self.line(format!("ArrayType #{id}"));
                self.nested(|this| this.print_pr_ty(inner));
            }
            TyKind::Path(path) => {
                self.line(format!("TypePath {} #{}", self.path_str(path), path.id.0));
            }
            TyKind::Unit => self.line(format!("UnitType #{id}")),
        }
    }

    fn print_pr_pat(&mut self, pat: &PPat) {
        let pat = match pat {
            Ok(pat) => pat,
            Err(err) => {
                self.line(format!("Error @ {:?}", err.span));
                return;
            }
        };
        let id = pat.id.0;
        match &pat.kind {
            PatKind::Multi(pats) => {
                self.line(format!("MultiPat #{id}"));
                self.nested(|this| {
                    for sub in pats {
                        this.print_pr_pat(sub);
                    }
                });
            }
            PatKind::Paren(inner) => {
                self.line(format!("ParenPat #{id}"));
                self.nested(|this| this.print_pr_pat(inner));
            }
            PatKind::Lit(lit_pat) => {
                let neg = if lit_pat.neg { "-" } else { "" };
                self.line(format!(
                    "LitPat {neg}`{}` #{id}",
                    self.interner.resolve(lit_pat.lit.sym)
                ));
            }
            PatKind::Ident(ident_pat) => {
                let mut mods = String::new();
                if ident_pat.is_ref {
                    mods.push_str("ref ");
                }
                if ident_pat.is_mut {
                    mods.push_str("mut ");
                }
                self.line(format!(
                    "IdentPat {mods}{} #{id}",
                    self.sym_str(&ident_pat.ident)
                ));
                if let Some(sub) = &ident_pat.sub {
                    self.nested(|this| this.print_pr_pat(sub));
                }
            }
            PatKind::Ref(ref_pat) => {
                let head = if ref_pat.is_mut { "RefPat mut" } else { "RefPat" };
                self.line(format!("{head} #{id}"));
                self.nested(|this| this.print_pr_pat(&ref_pat.pat));
            }
            PatKind::Path(path) => {
                self.line(format!("PathPat {} #{}", self.path_str(path), path.id.0));
            }
            PatKind::Wildcard => self.line(format!("WildcardPat #{id}")),
            PatKind::Rest => self.line(format!("RestPat #{id}")),
            PatKind::Struct(struct_pat) => {
                let path = match &struct_pat.path {
                    Ok(path) => self.path_str(path),
                    Err(_) => "<error>".into(),
                };
                self.line(format!("StructPat {path} #{id}"));
                self.nested(|this| {
                    for field in &struct_pat.fields {
                        match field {
                            StructPatField::Named { ident, pat, .. } => {
                                this.line(format!("Field {}", this.sym_str(ident)));
                                this.nested(|this| this.print_pr_pat(pat));
                            }
                            StructPatField::Shortcut { ident, .. } => {
                                this.line(format!("FieldShortcut {}", this.sym_str(ident)));
                            }
                            StructPatField::Rest { .. } => this.line("Rest"),
                        }
                    }
                });
            }
            PatKind::Tuple(tuple) => {
                self.line(format!("TuplePat #{id}"));
                self.nested(|this| {
                    for el in &tuple.els {
                        this.print_pr_pat(el);
                    }
                });
            }
            PatKind::Slice(slice) => {
                self.line(format!("SlicePat #{id}"));
                self.nested(|this| {
                    for el in &slice.els {
                        this.print_pr_pat(el);
                    }
                });
            }
        }
    }
}
