//! External AST traversal.
//!
//! `Visitor` methods default to walking; passes override the nodes they
//! care about and call the matching `walk_*` to continue downward.
//! `Err` sides of `PR` sub-trees are skipped: recovery markers carry no
//! structure to visit.

use super::*;

pub trait Visitor: Sized {
    fn visit_party(&mut self, party: &Party) {
        walk_party(self, party);
    }

    fn visit_item(&mut self, item: &Item) {
        walk_item(self, item);
    }

    fn visit_variant(&mut self, variant: &Variant) {
        walk_variant(self, variant);
    }

    fn visit_struct_field(&mut self, field: &StructField) {
        walk_struct_field(self, field);
    }

    fn visit_generic_param(&mut self, param: &GenericParam) {
        walk_generic_param(self, param);
    }

    fn visit_generic_arg(&mut self, arg: &GenericArg) {
        walk_generic_arg(self, arg);
    }

    fn visit_func_sig(&mut self, sig: &FuncSig) {
        walk_func_sig(self, sig);
    }

    fn visit_body(&mut self, body: &Body) {
        walk_body(self, body);
    }

    fn visit_use_tree(&mut self, tree: &UseTree) {
        walk_use_tree(self, tree);
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block);
    }

    fn visit_match_arm(&mut self, arm: &MatchArm) {
        walk_match_arm(self, arm);
    }

    fn visit_ty(&mut self, ty: &Ty) {
        walk_ty(self, ty);
    }

    fn visit_pat(&mut self, pat: &Pat) {
        walk_pat(self, pat);
    }

    fn visit_path(&mut self, path: &Path) {
        walk_path(self, path);
    }

    fn visit_simple_path(&mut self, _path: &SimplePath) {}

    fn visit_anon_const(&mut self, anon: &AnonConst) {
        walk_anon_const(self, anon);
    }

    fn visit_arg(&mut self, arg: &Arg) {
        walk_arg(self, arg);
    }
}

pub fn walk_party<V: Visitor>(v: &mut V, party: &Party) {
    for item in party.items.iter().flatten() {
        v.visit_item(item);
    }
}

pub fn walk_item<V: Visitor>(v: &mut V, item: &Item) {
    if let Some(generics) = item.generics() {
        for param in generics {
            v.visit_generic_param(param);
        }
    }
    match &item.kind {
        ItemKind::Enum(item) => {
            for variant in &item.variants {
                v.visit_variant(variant);
            }
        }
        ItemKind::Struct(item) => {
            for field in &item.fields {
                v.visit_struct_field(field);
            }
        }
        ItemKind::Func(item) => {
            v.visit_func_sig(&item.sig);
            if let Some(body) = &item.body {
                v.visit_body(body);
            }
        }
        ItemKind::Impl(item) => {
            if let Some(Ok(path)) = &item.trait_path {
                v.visit_path(path);
            }
            if let Ok(ty) = &item.ty {
                v.visit_ty(ty);
            }
            for member in item.members.iter().flatten() {
                v.visit_item(member);
            }
        }
        ItemKind::Mod(item) => {
            for sub in item.items.iter().flatten() {
                v.visit_item(sub);
            }
        }
        ItemKind::Trait(item) => {
            for path in item.super_traits.iter().flatten() {
                v.visit_path(path);
            }
            for member in item.members.iter().flatten() {
                v.visit_item(member);
            }
        }
        ItemKind::TypeAlias(item) => {
            if let Some(Ok(ty)) = &item.ty {
                v.visit_ty(ty);
            }
        }
        ItemKind::Use(decl) => {
            if let Ok(tree) = &decl.use_tree {
                v.visit_use_tree(tree);
            }
        }
        ItemKind::Init(item) => {
            v.visit_func_sig(&item.sig);
            if let Some(body) = &item.body {
                v.visit_body(body);
            }
        }
        ItemKind::Const(item) => {
            if let Ok(ty) = &item.ty {
                v.visit_ty(ty);
            }
            if let Some(Ok(value)) = &item.value {
                v.visit_expr(value);
            }
        }
    }
}

pub fn walk_variant<V: Visitor>(v: &mut V, variant: &Variant) {
    match &variant.kind {
        VariantKind::Unit(disc) => {
            if let Some(anon) = disc {
                v.visit_anon_const(anon);
            }
        }
        VariantKind::Tuple(fields) | VariantKind::Struct(fields) => {
            for field in fields {
                v.visit_struct_field(field);
            }
        }
    }
}

pub fn walk_struct_field<V: Visitor>(v: &mut V, field: &StructField) {
    if let Ok(ty) = &field.ty {
        v.visit_ty(ty);
    }
}

pub fn walk_generic_param<V: Visitor>(v: &mut V, param: &GenericParam) {
    match &param.kind {
        GenericParamKind::Lifetime { .. } => {}
        GenericParamKind::Type { bound, .. } => {
            if let Some(Ok(ty)) = bound {
                v.visit_ty(ty);
            }
        }
        GenericParamKind::Const { ty, default, .. } => {
            if let Ok(ty) = ty {
                v.visit_ty(ty);
            }
            if let Some(anon) = default {
                v.visit_anon_const(anon);
            }
        }
    }
}

pub fn walk_generic_arg<V: Visitor>(v: &mut V, arg: &GenericArg) {
    match arg {
        GenericArg::Lifetime { .. } => {}
        GenericArg::Type(ty) => {
            if let Ok(ty) = ty {
                v.visit_ty(ty);
            }
        }
        GenericArg::Const(anon) => v.visit_anon_const(anon),
    }
}

pub fn walk_func_sig<V: Visitor>(v: &mut V, sig: &FuncSig) {
    for param in &sig.params {
        if let Ok(pat) = &param.pat {
            v.visit_pat(pat);
        }
        if let Ok(ty) = &param.ty {
            v.visit_ty(ty);
        }
        if let Some(Ok(default)) = &param.default {
            v.visit_expr(default);
        }
    }
    if let FuncRetTy::Some(Ok(ty)) = &sig.ret {
        v.visit_ty(ty);
    }
}

pub fn walk_body<V: Visitor>(v: &mut V, body: &Body) {
    if let Ok(value) = &body.value {
        v.visit_expr(value);
    }
}

pub fn walk_use_tree<V: Visitor>(v: &mut V, tree: &UseTree) {
    match &tree.kind {
        UseTreeKind::Raw(path) => v.visit_simple_path(path),
        UseTreeKind::All(prefix) => {
            if let Some(path) = prefix {
                v.visit_simple_path(path);
            }
        }
        UseTreeKind::Specific { prefix, trees } => {
            if let Some(path) = prefix {
                v.visit_simple_path(path);
            }
            for sub in trees.iter().flatten() {
                v.visit_use_tree(sub);
            }
        }
        UseTreeKind::Rebind { path, .. } => v.visit_simple_path(path),
    }
}

pub fn walk_stmt<V: Visitor>(v: &mut V, stmt: &Stmt) {
    match &stmt.kind {
        StmtKind::Let(let_stmt) => {
            if let Ok(pat) = &let_stmt.pat {
                v.visit_pat(pat);
            }
            if let Some(Ok(ty)) = &let_stmt.ty {
                v.visit_ty(ty);
            }
            if let Some(Ok(value)) = &let_stmt.value {
                v.visit_expr(value);
            }
        }
        StmtKind::Item(item) => {
            if let Ok(item) = item {
                v.visit_item(item);
            }
        }
        StmtKind::Expr(expr) => {
            if let Ok(expr) = expr {
                v.visit_expr(expr);
            }
        }
    }
}

pub fn walk_block<V: Visitor>(v: &mut V, block: &Block) {
    for stmt in block.stmts.iter().flatten() {
        v.visit_stmt(stmt);
    }
}

fn walk_opt_expr<V: Visitor>(v: &mut V, expr: &Option<PExpr>) {
    if let Some(Ok(expr)) = expr {
        v.visit_expr(expr);
    }
}

pub fn walk_expr<V: Visitor>(v: &mut V, expr: &Expr) {
    match &expr.kind {
        ExprKind::Assign(assign) => {
            if let Ok(lhs) = &assign.lhs {
                v.visit_expr(lhs);
            }
            if let Ok(rhs) = &assign.rhs {
                v.visit_expr(rhs);
            }
        }
        ExprKind::Block(block) => {
            if let Ok(block) = block {
                v.visit_block(block);
            }
        }
        ExprKind::Borrow(borrow) => {
            if let Ok(inner) = &borrow.expr {
                v.visit_expr(inner);
            }
        }
        ExprKind::Break(brk) => walk_opt_expr(v, &brk.expr),
        ExprKind::Cast(cast) => {
            if let Ok(inner) = &cast.expr {
                v.visit_expr(inner);
            }
            if let Ok(ty) = &cast.ty {
                v.visit_ty(ty);
            }
        }
        ExprKind::Continue | ExprKind::SelfExpr | ExprKind::Unit | ExprKind::Literal(_) => {}
        ExprKind::Field(field) => {
            if let Ok(lhs) = &field.lhs {
                v.visit_expr(lhs);
            }
        }
        ExprKind::For(for_expr) => {
            if let Ok(pat) = &for_expr.pat {
                v.visit_pat(pat);
            }
            if let Ok(iter) = &for_expr.iter {
                v.visit_expr(iter);
            }
            if let Ok(body) = &for_expr.body {
                v.visit_block(body);
            }
        }
        ExprKind::If(if_expr) => {
            if let Ok(cond) = &if_expr.cond {
                v.visit_expr(cond);
            }
            if let Some(Ok(block)) = &if_expr.if_branch {
                v.visit_block(block);
            }
            walk_opt_expr(v, &if_expr.else_branch);
        }
        ExprKind::Infix(infix) => {
            if let Ok(lhs) = &infix.lhs {
                v.visit_expr(lhs);
            }
            if let Ok(rhs) = &infix.rhs {
                v.visit_expr(rhs);
            }
        }
        ExprKind::Invoke(invoke) => {
            if let Ok(callee) = &invoke.callee {
                v.visit_expr(callee);
            }
            for arg in &invoke.args {
                v.visit_arg(arg);
            }
        }
        ExprKind::Lambda(lambda) => {
            for param in &lambda.params {
                if let Ok(pat) = &param.pat {
                    v.visit_pat(pat);
                }
                if let Some(Ok(ty)) = &param.ty {
                    v.visit_ty(ty);
                }
            }
            if let Ok(body) = &lambda.body {
                v.visit_expr(body);
            }
        }
        ExprKind::List(els) | ExprKind::Tuple(els) => {
            for el in els.iter().flatten() {
                v.visit_expr(el);
            }
        }
        ExprKind::Loop(block) => {
            if let Ok(block) = block {
                v.visit_block(block);
            }
        }
        ExprKind::Match(match_expr) => {
            if let Ok(subject) = &match_expr.subject {
                v.visit_expr(subject);
            }
            for arm in &match_expr.arms {
                v.visit_match_arm(arm);
            }
        }
        ExprKind::Paren(inner) => {
            if let Ok(inner) = inner {
                v.visit_expr(inner);
            }
        }
        ExprKind::Path(path) => v.visit_path(path),
        ExprKind::Postfix(postfix) => {
            if let Ok(lhs) = &postfix.lhs {
                v.visit_expr(lhs);
            }
        }
        ExprKind::Prefix(prefix) => {
            if let Ok(rhs) = &prefix.rhs {
                v.visit_expr(rhs);
            }
        }
        ExprKind::Return(ret) => walk_opt_expr(v, &ret.expr),
        ExprKind::Spread(inner) => {
            if let Ok(inner) = inner {
                v.visit_expr(inner);
            }
        }
        ExprKind::Struct(struct_expr) => {
            v.visit_path(&struct_expr.path);
            for field in &struct_expr.fields {
                match field {
                    StructExprField::Full(_, value) => {
                        if let Ok(value) = value {
                            v.visit_expr(value);
                        }
                    }
                    StructExprField::Shortcut(_) => {}
                    StructExprField::Base(base) => {
                        if let Ok(base) = base {
                            v.visit_expr(base);
                        }
                    }
                }
            }
        }
        ExprKind::Subscript(subscript) => {
            if let Ok(lhs) = &subscript.lhs {
                v.visit_expr(lhs);
            }
            for index in subscript.indices.iter().flatten() {
                v.visit_expr(index);
            }
        }
        ExprKind::While(while_expr) => {
            if let Ok(cond) = &while_expr.cond {
                v.visit_expr(cond);
            }
            if let Ok(body) = &while_expr.body {
                v.visit_block(body);
            }
        }
    }
}

pub fn walk_match_arm<V: Visitor>(v: &mut V, arm: &MatchArm) {
    if let Ok(pat) = &arm.pat {
        v.visit_pat(pat);
    }
    walk_opt_expr(v, &arm.guard);
    if let Ok(body) = &arm.body {
        v.visit_expr(body);
    }
}

pub fn walk_ty<V: Visitor>(v: &mut V, ty: &Ty) {
    match &ty.kind {
        TyKind::Paren(inner) | TyKind::Slice(inner) => {
            if let Ok(inner) = inner {
                v.visit_ty(inner);
            }
        }
        TyKind::Tuple(els) => {
            for el in els {
                if let Ok(el_ty) = &el.ty {
                    v.visit_ty(el_ty);
                }
            }
        }
        TyKind::Func(func) => {
            for el in &func.params {
                if let Ok(el_ty) = &el.ty {
                    v.visit_ty(el_ty);
                }
            }
            if let Ok(ret) = &func.ret {
                v.visit_ty(ret);
            }
        }
        TyKind::Array(inner, size) => {
            if let Ok(inner) = inner {
                v.visit_ty(inner);
            }
            v.visit_anon_const(size);
        }
        TyKind::Path(path) => v.visit_path(path),
        TyKind::Unit => {}
    }
}

pub fn walk_pat<V: Visitor>(v: &mut V, pat: &Pat) {
    match &pat.kind {
        PatKind::Multi(pats) => {
            for sub in pats.iter().flatten() {
                v.visit_pat(sub);
            }
        }
        PatKind::Paren(inner) => {
            if let Ok(inner) = inner {
                v.visit_pat(inner);
            }
        }
        PatKind::Lit(_) | PatKind::Wildcard | PatKind::Rest => {}
        PatKind::Ident(ident_pat) => {
            if let Some(Ok(sub)) = &ident_pat.sub {
                v.visit_pat(sub);
            }
        }
        PatKind::Ref(ref_pat) => {
            if let Ok(inner) = &ref_pat.pat {
                v.visit_pat(inner);
            }
        }
        PatKind::Path(path) => v.visit_path(path),
        PatKind::Struct(struct_pat) => {
            if let Ok(path) = &struct_pat.path {
                v.visit_path(path);
            }
            for field in &struct_pat.fields {
                if let StructPatField::Named { pat, .. } = field {
                    if let Ok(pat) = pat {
                        v.visit_pat(pat);
                    }
                }
            }
        }
        PatKind::Tuple(tuple) => {
            for el in tuple.els.iter().flatten() {
                v.visit_pat(el);
            }
        }
        PatKind::Slice(slice) => {
            for el in slice.els.iter().flatten() {
                v.visit_pat(el);
            }
        }
    }
}

pub fn walk_path<V: Visitor>(v: &mut V, path: &Path) {
    for seg in path.segments.iter().flatten() {
        if let Some(args) = &seg.generics {
            for arg in args {
                v.visit_generic_arg(arg);
            }
        }
    }
}

pub fn walk_anon_const<V: Visitor>(v: &mut V, anon: &AnonConst) {
    if let Ok(expr) = &anon.expr {
        v.visit_expr(expr);
    }
}

pub fn walk_arg<V: Visitor>(v: &mut V, arg: &Arg) {
    if let Ok(value) = &arg.value {
        v.visit_expr(value);
    }
}
