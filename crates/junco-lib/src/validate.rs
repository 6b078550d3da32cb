//! Post-parse structural validation.
//!
//! Context-sensitive rules the grammar cannot enforce: `break`/
//! `continue`/`return`/`self` placement, place expressions on the left
//! of `=`, rest-pattern positioning, chained comparison, and a couple of
//! style warnings. Contexts are tracked with a small stack pushed on
//! entry to functions, lambdas, loops, and type-like items.

use crate::ast::visit::{self, Visitor};
use crate::ast::*;
use crate::diagnostics::MessageHolder;

/// Run all checks over the party, producing the stage's messages.
pub fn validate(party: &Party) -> MessageHolder {
    let mut validator = Validator {
        msg: MessageHolder::new(),
        ctx: Vec::new(),
        rest_ok: false,
    };
    validator.visit_party(party);
    validator.msg
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ctx {
    Func,
    Init,
    Lambda,
    Loop,
    Struct,
    Trait,
    Impl,
}

struct Validator {
    msg: MessageHolder,
    ctx: Vec<Ctx>,
    /// Whether a `...` pattern is legal at the current pattern position.
    rest_ok: bool,
}

impl Validator {
    fn inside(&mut self, ctx: Ctx, f: impl FnOnce(&mut Self)) {
        self.ctx.push(ctx);
        f(self);
        self.ctx.pop();
    }

    /// `break`/`continue` legality: a loop context not cut off by a
    /// function boundary.
    fn in_loop(&self) -> bool {
        for &ctx in self.ctx.iter().rev() {
            match ctx {
                Ctx::Loop => return true,
                Ctx::Func | Ctx::Init | Ctx::Lambda => return false,
                _ => {}
            }
        }
        false
    }

    /// `return` legality: any enclosing function-like context.
    fn in_func(&self) -> bool {
        self.ctx
            .iter()
            .any(|ctx| matches!(ctx, Ctx::Func | Ctx::Init | Ctx::Lambda))
    }

    /// `self` legality: the nearest function is a member of a `struct`,
    /// `trait` or `impl`. Lambdas and loops are transparent.
    fn in_method(&self) -> bool {
        let mut idx = self.ctx.len();
        while idx > 0 {
            idx -= 1;
            match self.ctx[idx] {
                Ctx::Loop | Ctx::Lambda => {}
                Ctx::Func | Ctx::Init => {
                    return idx > 0
                        && matches!(self.ctx[idx - 1], Ctx::Struct | Ctx::Trait | Ctx::Impl);
                }
                _ => return false,
            }
        }
        false
    }

    fn check_assign(&mut self, assign: &AssignExpr) {
        let Ok(lhs) = &assign.lhs else { return };

        if let ExprKind::Assign(_) = &unwrap_parens(lhs).kind {
            self.msg
                .error("Chained assignment is not allowed")
                .primary(lhs.span, "Chained assignment is not allowed")
                .emit();
            return;
        }

        if !is_place_expr(lhs) {
            self.msg
                .error("Invalid left-hand side expression in assignment")
                .primary(lhs.span, "Not a place expression")
                .emit();
        }
    }

    fn check_chained_comparison(&mut self, infix: &InfixExpr) {
        if !infix.op.node.is_comparison() {
            return;
        }
        let chained = [&infix.lhs, &infix.rhs].into_iter().any(|side| {
            matches!(
                side.as_deref().map(|expr| &expr.kind),
                Ok(ExprKind::Infix(inner)) if inner.op.node.is_comparison()
            )
        });
        if chained {
            self.msg
                .error("Chained comparison is not allowed")
                .primary(infix.op.span, "Parenthesize one of the comparisons")
                .emit();
        }
    }

    fn check_paren(&mut self, expr: &Expr, inner: &PExpr) {
        let Ok(inner) = inner else { return };
        match &inner.kind {
            ExprKind::Paren(_) => {
                self.msg
                    .warn("Useless double-wrapped parenthesized expression")
                    .primary(expr.span, "Remove the second parentheses")
                    .emit();
            }
            ExprKind::Literal(_) | ExprKind::Path(_) | ExprKind::Unit | ExprKind::SelfExpr => {
                self.msg
                    .warn("Useless parentheses around simple expression")
                    .primary(expr.span, "Remove the parentheses")
                    .emit();
            }
            _ => {}
        }
    }

    fn check_struct_pat_rest(&mut self, pat: &StructPat) {
        for (idx, field) in pat.fields.iter().enumerate() {
            if matches!(field, StructPatField::Rest { .. }) && idx + 1 != pat.fields.len() {
                self.msg
                    .error("Rest pattern `...` must go last in structure pattern")
                    .primary(field.span(), "`...` must go last")
                    .emit();
            }
        }
    }
}

/// Strip paren wrappers to find the effective expression.
fn unwrap_parens(expr: &Expr) -> &Expr {
    match &expr.kind {
        ExprKind::Paren(Ok(inner)) => unwrap_parens(inner),
        _ => expr,
    }
}

/// Place expressions may stand on the left of `=`: paths, field
/// accesses, subscripts, and parenthesized places.
fn is_place_expr(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Path(_) | ExprKind::Field(_) | ExprKind::Subscript(_) => true,
        ExprKind::Paren(Ok(inner)) => is_place_expr(inner),
        _ => false,
    }
}

impl Visitor for Validator {
    fn visit_item(&mut self, item: &Item) {
        let ctx = match &item.kind {
            ItemKind::Func(_) => Some(Ctx::Func),
            ItemKind::Init(_) => Some(Ctx::Init),
            ItemKind::Struct(_) => Some(Ctx::Struct),
            ItemKind::Trait(_) => Some(Ctx::Trait),
            ItemKind::Impl(_) => Some(Ctx::Impl),
            _ => None,
        };
        match ctx {
            Some(ctx) => self.inside(ctx, |this| visit::walk_item(this, item)),
            None => visit::walk_item(self, item),
        }
    }

    fn visit_ty(&mut self, ty: &Ty) {
        if let TyKind::Tuple(els) = &ty.kind {
            if els.len() == 1 && els[0].name.is_some() {
                self.msg
                    .error("Cannot declare single-element named tuple type")
                    .primary(ty.span, "Cannot have a name")
                    .emit();
            }
        }
        visit::walk_ty(self, ty);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Assign(assign) => self.check_assign(assign),
            ExprKind::Infix(infix) => self.check_chained_comparison(infix),
            ExprKind::Paren(inner) => self.check_paren(expr, inner),
            ExprKind::Break(_) => {
                if !self.in_loop() {
                    self.msg
                        .error("`break` cannot be used outside of a loop")
                        .primary(expr.span, "`break` is not allowed here")
                        .emit();
                }
            }
            ExprKind::Continue => {
                if !self.in_loop() {
                    self.msg
                        .error("`continue` cannot be used outside of a loop")
                        .primary(expr.span, "`continue` is not allowed here")
                        .emit();
                }
            }
            ExprKind::Return(_) => {
                if !self.in_func() {
                    self.msg
                        .error("`return` cannot be used outside of a function")
                        .primary(expr.span, "`return` is not allowed here")
                        .emit();
                }
            }
            ExprKind::SelfExpr => {
                if !self.in_method() {
                    self.msg
                        .error("`self` can only be used inside a method")
                        .primary(expr.span, "`self` is not allowed here")
                        .emit();
                }
            }
            _ => {}
        }

        match &expr.kind {
            ExprKind::Loop(_) | ExprKind::While(_) | ExprKind::For(_) => {
                self.inside(Ctx::Loop, |this| visit::walk_expr(this, expr));
            }
            ExprKind::Lambda(_) => {
                self.inside(Ctx::Lambda, |this| visit::walk_expr(this, expr));
            }
            _ => visit::walk_expr(self, expr),
        }
    }

    fn visit_pat(&mut self, pat: &Pat) {
        let rest_ok = std::mem::replace(&mut self.rest_ok, false);

        match &pat.kind {
            PatKind::Rest => {
                if !rest_ok {
                    self.msg
                        .error(
                            "Rest pattern `...` is disallowed here, you can use it \
                             only in structure, tuple or slice patterns",
                        )
                        .primary(pat.span, "`...` is disallowed here")
                        .emit();
                }
            }
            PatKind::Struct(struct_pat) => {
                self.check_struct_pat_rest(struct_pat);
                visit::walk_pat(self, pat);
            }
            PatKind::Tuple(tuple) => {
                for el in tuple.els.iter().flatten() {
                    self.rest_ok = true;
                    self.visit_pat(el);
                }
                self.rest_ok = false;
            }
            PatKind::Slice(slice) => {
                for el in slice.els.iter().flatten() {
                    self.rest_ok = true;
                    self.visit_pat(el);
                }
                self.rest_ok = false;
            }
            _ => visit::walk_pat(self, pat),
        }
    }
}
