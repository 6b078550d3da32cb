use std::collections::HashMap;

use indoc::indoc;

use crate::ast::BinOp;
use crate::hir::*;
use crate::resolve::{DefId, DefKind, Res};
use crate::session::{CompileDepth, Session};
use crate::stages::{self, CompileResult};

fn lower_src(src: &str) -> (Session, CompileResult) {
    let mut sess = Session::new();
    let result = stages::compile(&mut sess, "test.jc", src.to_owned(), CompileDepth::Lowering);
    (sess, result)
}

fn hir_of(result: &CompileResult) -> &Party {
    assert!(
        result.is_ok(),
        "unexpected failure: {:?}",
        result.messages.as_slice()
    );
    result.hir.as_ref().expect("lowering output")
}

fn func_body<'a>(sess: &Session, party: &'a Party, name: &str) -> &'a Body {
    let def = party
        .owners
        .values()
        .find(|item| sess.interner.resolve(item.ident.sym) == name)
        .unwrap_or_else(|| panic!("no owner named `{name}`"));
    let body_id = match &def.kind {
        ItemKind::Func(func) | ItemKind::Init(func) => func.body.expect("function body"),
        other => panic!("`{name}` is not a function: {other:?}"),
    };
    party.body(body_id).expect("registered body")
}

#[test]
fn every_ast_item_has_an_owner_keyed_by_its_def_id() {
    let src = indoc! {"
        mod geo {
            struct Point { x: int, y: int }
            func dist(a: Point, b: Point) -> int { 0 }
        }
        func main() {}
    "};
    let (sess, result) = lower_src(src);
    let party = hir_of(&result);

    for def in sess.def_table.defs() {
        if matches!(
            def.kind,
            DefKind::Mod | DefKind::Struct | DefKind::Func
        ) && !def.id.is_root()
        {
            let item = party
                .owners
                .get(&def.id)
                .unwrap_or_else(|| panic!("missing owner for {:?}", def.id));
            assert_eq!(item.def_id, def.id);
            assert_eq!(item.hir_id, HirId::owner_of(def.id));
        }
    }

    // The root module is synthesized under `DefId::ROOT`.
    assert_eq!(party.root_mod, ItemId(DefId::ROOT));
    assert!(party.modules.contains(&DefId::ROOT));
}

#[test]
fn bodies_are_keyed_by_their_value_expression() {
    let (sess, result) = lower_src("func main() { 42 }");
    let party = hir_of(&result);
    assert_eq!(party.bodies.len(), 1);
    let body = func_body(&sess, party, "main()");
    assert!(matches!(&body.value.kind, ExprKind::Block(_)));
}

#[test]
fn while_desugars_to_loop_with_conditional_break() {
    let (sess, result) = lower_src("func main() { let go = true; while go {} }");
    let party = hir_of(&result);
    let body = func_body(&sess, party, "main()");

    let ExprKind::Block(block) = &body.value.kind else {
        panic!("expected block body");
    };
    let StmtKind::Expr(loop_expr) = &block.stmts[1].kind else {
        panic!("expected the while statement");
    };
    let ExprKind::Loop { body: loop_body } = &loop_expr.kind else {
        panic!("`while` must lower to `loop`, got {:?}", loop_expr.kind);
    };
    let StmtKind::Expr(if_expr) = &loop_body.stmts[0].kind else {
        panic!("loop body should hold the conditional");
    };
    let ExprKind::If { els, .. } = &if_expr.kind else {
        panic!("expected `if` inside the loop");
    };
    let els = els.as_ref().expect("else branch");
    assert!(matches!(els.kind, ExprKind::Break { expr: None }));
}

#[test]
fn for_desugars_to_iterator_loop_with_symbolic_names() {
    let (sess, result) = lower_src("func main() { for x in xs() {} }\nfunc xs() {}");
    let party = hir_of(&result);
    let body = func_body(&sess, party, "main()");

    // { let it = IntoIter::into_iter(xs()); loop { match it.next() { .. } } }
    let ExprKind::Block(outer) = &body.value.kind else {
        panic!("expected block body");
    };
    let StmtKind::Expr(for_block) = &outer.stmts[0].kind else {
        panic!()
    };
    let ExprKind::Block(desugared) = &for_block.kind else {
        panic!("`for` must lower to a block, got {:?}", for_block.kind);
    };
    assert_eq!(desugared.stmts.len(), 2);

    let StmtKind::Let(let_stmt) = &desugared.stmts[0].kind else {
        panic!("first statement should bind the iterator");
    };
    let init = let_stmt.value.as_ref().unwrap();
    let ExprKind::Invoke { callee, .. } = &init.kind else {
        panic!("iterator binding should call into_iter");
    };
    let ExprKind::Path(path) = &callee.kind else {
        panic!()
    };
    assert_eq!(path.res, Res::Error, "library names stay symbolic");
    let segs: Vec<&str> = path
        .segs
        .iter()
        .map(|seg| sess.interner.resolve(seg.sym))
        .collect();
    assert_eq!(segs, vec!["IntoIter", "into_iter"]);

    let StmtKind::Expr(loop_expr) = &desugared.stmts[1].kind else {
        panic!()
    };
    let ExprKind::Loop { body: loop_body } = &loop_expr.kind else {
        panic!("expected loop");
    };
    let StmtKind::Expr(match_expr) = &loop_body.stmts[0].kind else {
        panic!()
    };
    let ExprKind::Match { subject, arms } = &match_expr.kind else {
        panic!("expected match on it.next()");
    };
    let ExprKind::Invoke { callee, .. } = &subject.kind else {
        panic!()
    };
    let ExprKind::Field { field, .. } = &callee.kind else {
        panic!("expected a method call")
    };
    assert_eq!(sess.interner.resolve(field.sym), "next");

    assert_eq!(arms.len(), 2);
    assert!(matches!(&arms[0].pat.kind, PatKind::Struct { .. }));
    assert!(matches!(&arms[1].pat.kind, PatKind::Path(_)));
    assert!(matches!(&arms[1].body.kind, ExprKind::Break { expr: None }));
}

#[test]
fn logic_operators_desugar_to_if() {
    let (sess, result) = lower_src("func main() { let a = true; let b = false; a and b; a or b }");
    let party = hir_of(&result);
    let body = func_body(&sess, party, "main()");
    let ExprKind::Block(block) = &body.value.kind else {
        panic!()
    };

    let StmtKind::Expr(and_expr) = &block.stmts[2].kind else {
        panic!()
    };
    let ExprKind::If { then, els, .. } = &and_expr.kind else {
        panic!("`and` must lower to `if`, got {:?}", and_expr.kind);
    };
    // `a and b`: then-branch is `b`, else is `false`.
    assert!(matches!(&then.stmts[0].kind, StmtKind::Expr(e) if matches!(e.kind, ExprKind::Path(_))));
    let els = els.as_ref().unwrap();
    assert!(matches!(&els.kind, ExprKind::Lit(lit) if sess.interner.resolve(lit.sym) == "false"));

    let StmtKind::Expr(or_expr) = &block.stmts[3].kind else {
        panic!()
    };
    let ExprKind::If { then, els, .. } = &or_expr.kind else {
        panic!("`or` must lower to `if`");
    };
    assert!(
        matches!(&then.stmts[0].kind, StmtKind::Expr(e) if matches!(&e.kind, ExprKind::Lit(lit) if sess.interner.resolve(lit.sym) == "true"))
    );
    assert!(matches!(els.as_ref().unwrap().kind, ExprKind::Path(_)));
}

#[test]
fn compound_assignment_expands_with_shared_resolution() {
    let (sess, result) = lower_src("func main() { let mut x = 1; x += 2 }");
    let party = hir_of(&result);
    let body = func_body(&sess, party, "main()");
    let ExprKind::Block(block) = &body.value.kind else {
        panic!()
    };
    let StmtKind::Expr(assign) = &block.stmts[1].kind else {
        panic!()
    };
    let ExprKind::Assign { lhs, rhs } = &assign.kind else {
        panic!("expected plain assignment, got {:?}", assign.kind);
    };
    let ExprKind::Infix { lhs: dup, op, rhs: _ } = &rhs.kind else {
        panic!("rhs should be the expanded infix");
    };
    assert_eq!(op.node, BinOp::Add);

    // Both left-hand sides carry the same local resolution but distinct
    // hir ids.
    let (ExprKind::Path(left), ExprKind::Path(dup_path)) = (&lhs.kind, &dup.kind) else {
        panic!("both sides should be paths");
    };
    assert_eq!(left.res, dup_path.res);
    assert!(matches!(left.res, Res::Local(_)));
    assert_ne!(lhs.hir_id, dup.hir_id);
}

#[test]
fn parens_are_discarded() {
    let (sess, result) = lower_src("func main() { ((42)) }");
    let party = hir_of(&result);
    let body = func_body(&sess, party, "main()");
    let ExprKind::Block(block) = &body.value.kind else {
        panic!()
    };
    let StmtKind::Expr(expr) = &block.stmts[0].kind else {
        panic!()
    };
    assert!(
        matches!(&expr.kind, ExprKind::Lit(_)),
        "parens should vanish, got {:?}",
        expr.kind
    );
}

#[test]
fn match_guards_survive_lowering() {
    let src = indoc! {"
        func main() {
            let x = 1;
            match x {
                y if y => 1,
                _ => 2,
            }
        }
    "};
    let (sess, result) = lower_src(src);
    let party = hir_of(&result);
    let body = func_body(&sess, party, "main()");
    let ExprKind::Block(block) = &body.value.kind else {
        panic!()
    };
    let StmtKind::Expr(match_expr) = &block.stmts[1].kind else {
        panic!()
    };
    let ExprKind::Match { arms, .. } = &match_expr.kind else {
        panic!()
    };
    assert!(arms[0].guard.is_some());
    assert!(arms[1].guard.is_none());
}

#[test]
fn anon_consts_become_independent_bodies() {
    let (sess, result) = lower_src("func main() { let a: [int; 4] = b() }\nfunc b() {}");
    let party = hir_of(&result);
    // One body for main, one for b, one for the array size.
    assert_eq!(party.bodies.len(), 3);
    let _ = sess;
}

/// Collect every `HirId` reachable from an owner's item and body.
fn collect_ids(party: &Party, owner: DefId) -> Vec<u32> {
    let mut ids = Vec::new();
    let item = party.owners.get(&owner).expect("owner");
    ids.push(item.hir_id.child);
    assert_eq!(item.hir_id.owner, owner);

    if let ItemKind::Func(func) | ItemKind::Init(func) = &item.kind {
        if let Some(body_id) = func.body {
            let body = party.body(body_id).unwrap();
            for pat in &body.params {
                collect_pat(pat, owner, &mut ids);
            }
            collect_expr(&body.value, owner, &mut ids);
        }
    }
    ids
}

fn push(id: HirId, owner: DefId, ids: &mut Vec<u32>) {
    assert_eq!(id.owner, owner, "hir id escaped its owner");
    ids.push(id.child);
}

fn collect_expr(expr: &Expr, owner: DefId, ids: &mut Vec<u32>) {
    push(expr.hir_id, owner, ids);
    match &expr.kind {
        ExprKind::Assign { lhs, rhs } => {
            collect_expr(lhs, owner, ids);
            collect_expr(rhs, owner, ids);
        }
        ExprKind::Block(block) => collect_block(block, owner, ids),
        ExprKind::Borrow { expr, .. }
        | ExprKind::Spread(expr)
        | ExprKind::Cast { expr, .. } => collect_expr(expr, owner, ids),
        ExprKind::Break { expr } | ExprKind::Return { expr } => {
            if let Some(expr) = expr {
                collect_expr(expr, owner, ids);
            }
        }
        ExprKind::Continue | ExprKind::Lit(_) | ExprKind::Path(_) | ExprKind::Unit
        | ExprKind::Err => {}
        ExprKind::Field { lhs, .. } | ExprKind::Postfix { lhs, .. } => {
            collect_expr(lhs, owner, ids)
        }
        ExprKind::If { cond, then, els } => {
            collect_expr(cond, owner, ids);
            collect_block(then, owner, ids);
            if let Some(els) = els {
                collect_expr(els, owner, ids);
            }
        }
        ExprKind::Infix { lhs, rhs, .. } => {
            collect_expr(lhs, owner, ids);
            collect_expr(rhs, owner, ids);
        }
        ExprKind::Invoke { callee, args } => {
            collect_expr(callee, owner, ids);
            for arg in args {
                collect_expr(&arg.value, owner, ids);
            }
        }
        ExprKind::Lambda { params, body } => {
            for pat in params {
                collect_pat(pat, owner, ids);
            }
            collect_expr(body, owner, ids);
        }
        ExprKind::List(els) | ExprKind::Tuple(els) => {
            for el in els {
                collect_expr(el, owner, ids);
            }
        }
        ExprKind::Loop { body } => collect_block(body, owner, ids),
        ExprKind::Match { subject, arms } => {
            collect_expr(subject, owner, ids);
            for arm in arms {
                push(arm.hir_id, owner, ids);
                collect_pat(&arm.pat, owner, ids);
                if let Some(guard) = &arm.guard {
                    collect_expr(guard, owner, ids);
                }
                collect_expr(&arm.body, owner, ids);
            }
        }
        ExprKind::Prefix { rhs, .. } => collect_expr(rhs, owner, ids),
        ExprKind::Struct { fields, .. } => {
            for field in fields {
                match field {
                    StructExprField::Full(_, value) => collect_expr(value, owner, ids),
                    StructExprField::Base(base) => collect_expr(base, owner, ids),
                }
            }
        }
        ExprKind::Subscript { lhs, indices } => {
            collect_expr(lhs, owner, ids);
            for index in indices {
                collect_expr(index, owner, ids);
            }
        }
    }
}

fn collect_block(block: &Block, owner: DefId, ids: &mut Vec<u32>) {
    push(block.hir_id, owner, ids);
    for stmt in &block.stmts {
        push(stmt.hir_id, owner, ids);
        match &stmt.kind {
            StmtKind::Let(let_stmt) => {
                collect_pat(&let_stmt.pat, owner, ids);
                if let Some(ty) = &let_stmt.ty {
                    collect_ty(ty, owner, ids);
                }
                if let Some(value) = &let_stmt.value {
                    collect_expr(value, owner, ids);
                }
            }
            StmtKind::Item(_) => {}
            StmtKind::Expr(expr) => collect_expr(expr, owner, ids),
        }
    }
}

fn collect_pat(pat: &Pat, owner: DefId, ids: &mut Vec<u32>) {
    push(pat.hir_id, owner, ids);
    match &pat.kind {
        PatKind::Multi(pats) | PatKind::Slice(pats) => {
            for sub in pats {
                collect_pat(sub, owner, ids);
            }
        }
        PatKind::Ident { sub, .. } => {
            if let Some(sub) = sub {
                collect_pat(sub, owner, ids);
            }
        }
        PatKind::Ref { pat, .. } => collect_pat(pat, owner, ids),
        PatKind::Struct { fields, .. } => {
            for field in fields {
                collect_pat(&field.pat, owner, ids);
            }
        }
        PatKind::Tuple { els, .. } => {
            for el in els {
                collect_pat(el, owner, ids);
            }
        }
        PatKind::Lit { .. }
        | PatKind::Path(_)
        | PatKind::Wildcard
        | PatKind::Rest
        | PatKind::Err => {}
    }
}

fn collect_ty(ty: &Ty, owner: DefId, ids: &mut Vec<u32>) {
    push(ty.hir_id, owner, ids);
    match &ty.kind {
        TyKind::Tuple(els) => {
            for el in els {
                collect_ty(el, owner, ids);
            }
        }
        TyKind::Func { params, ret } => {
            for el in params {
                collect_ty(el, owner, ids);
            }
            collect_ty(ret, owner, ids);
        }
        TyKind::Slice(inner) | TyKind::Array { ty: inner, .. } => collect_ty(inner, owner, ids),
        TyKind::Path(_) | TyKind::Unit | TyKind::Err => {}
    }
}

#[test]
fn owner_child_ids_are_dense_and_unique() {
    let src = indoc! {"
        func main() {
            let x = 1;
            let y = x + 2;
            if y > 0 { y } else { x }
        }
    "};
    let (sess, result) = lower_src(src);
    let party = hir_of(&result);

    let main_def = sess
        .def_table
        .defs()
        .iter()
        .find(|def| sess.interner.resolve(def.ident.sym) == "main()")
        .unwrap()
        .id;

    let mut ids = collect_ids(party, main_def);
    ids.sort_unstable();
    let unique: HashMap<u32, ()> = ids.iter().map(|&id| (id, ())).collect();
    assert_eq!(unique.len(), ids.len(), "duplicate hir ids");
    // Dense: 0..=max without gaps.
    assert_eq!(ids[0], 0);
    assert_eq!(*ids.last().unwrap() as usize, ids.len() - 1);
}

#[test]
fn lowering_is_deterministic() {
    let src = indoc! {"
        func main() {
            let flag = true;
            while flag { for x in items() {} }
        }
        func items() {}
    "};
    let (_, result_a) = lower_src(src);
    let (_, result_b) = lower_src(src);
    let json_a = serde_json::to_string(hir_of(&result_a)).unwrap();
    let json_b = serde_json::to_string(hir_of(&result_b)).unwrap();
    assert_eq!(json_a, json_b);
}
