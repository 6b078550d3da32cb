use indoc::indoc;

use crate::ast::printer::AstPrinter;
use crate::ast::*;
use crate::diagnostics::MessageHolder;
use crate::lexer;
use crate::session::Session;
use crate::span::FileId;

fn parse_src(src: &str) -> (Session, Party, MessageHolder) {
    let mut sess = Session::new();
    let file = sess.source_map.register_source("test.jc");
    let mut messages = MessageHolder::new();
    let lexed = lexer::lex(&mut sess.interner, file, src, &mut messages);
    sess.source_map.set_file(file, src.to_owned(), lexed.newlines);
    let (party, parse_msg) = super::parse(&mut sess, file, lexed.tokens);
    messages.extend(parse_msg);
    (sess, party, messages)
}

fn only_item<'a>(party: &'a Party) -> &'a Item {
    assert_eq!(party.items.len(), 1, "expected exactly one item");
    party.items[0].as_ref().expect("item should have parsed")
}

/// The tail expression of the first function's block body.
fn func_tail_expr<'a>(party: &'a Party) -> &'a Expr {
    let item = party
        .items
        .iter()
        .flatten()
        .find(|item| matches!(item.kind, ItemKind::Func(_)))
        .expect("a function item");
    let ItemKind::Func(func) = &item.kind else {
        unreachable!()
    };
    let body = func.body.as_ref().expect("function body");
    let value = body.value.as_ref().expect("body value");
    let ExprKind::Block(Ok(block)) = &value.kind else {
        panic!("expected block body");
    };
    let stmt = block
        .stmts
        .last()
        .expect("non-empty body")
        .as_ref()
        .expect("statement parsed");
    match &stmt.kind {
        StmtKind::Expr(Ok(expr)) => expr,
        other => panic!("expected expression statement, got {other:?}"),
    }
}

#[test]
fn hello_parses_into_a_func_item() {
    let (sess, party, msg) = parse_src("func main() { print(\"hi\") }");
    assert!(msg.is_empty(), "unexpected messages: {:?}", msg.as_slice());

    let item = only_item(&party);
    let ItemKind::Func(func) = &item.kind else {
        panic!("expected a func item");
    };
    let name = func.name.as_ref().unwrap();
    assert_eq!(sess.interner.resolve(name.sym), "main");
    assert!(func.sig.params.is_empty());
    assert!(func.body.is_some());
}

#[test]
fn fn_is_an_alias_for_func() {
    let (_, party, msg) = parse_src("fn short() {}");
    assert!(msg.is_empty());
    assert!(matches!(only_item(&party).kind, ItemKind::Func(_)));
}

#[test]
fn multiplicative_binds_tighter_than_additive() {
    let (_, party, msg) = parse_src("func f() { 1 + 2 * 3 }");
    assert!(msg.is_empty());
    let expr = func_tail_expr(&party);
    let ExprKind::Infix(add) = &expr.kind else {
        panic!("expected infix");
    };
    assert_eq!(add.op.node, BinOp::Add);
    let rhs = add.rhs.as_ref().unwrap();
    let ExprKind::Infix(mul) = &rhs.kind else {
        panic!("expected nested infix on the right");
    };
    assert_eq!(mul.op.node, BinOp::Mul);
}

#[test]
fn power_is_right_associative() {
    let (_, party, msg) = parse_src("func f() { 2 ** 3 ** 4 }");
    assert!(msg.is_empty());
    let expr = func_tail_expr(&party);
    let ExprKind::Infix(outer) = &expr.kind else {
        panic!("expected infix");
    };
    assert_eq!(outer.op.node, BinOp::Pow);
    let rhs = outer.rhs.as_ref().unwrap();
    assert!(matches!(&rhs.kind, ExprKind::Infix(inner) if inner.op.node == BinOp::Pow));
    let lhs = outer.lhs.as_ref().unwrap();
    assert!(matches!(&lhs.kind, ExprKind::Literal(_)));
}

#[test]
fn keyword_operators_and_cast() {
    let (_, party, msg) = parse_src("func f() { a and b or c as int }");
    assert!(msg.is_empty());
    let expr = func_tail_expr(&party);
    // `or` is the loosest binder.
    let ExprKind::Infix(or) = &expr.kind else {
        panic!("expected infix `or`");
    };
    assert_eq!(or.op.node, BinOp::Or);
    let lhs = or.lhs.as_ref().unwrap();
    assert!(matches!(&lhs.kind, ExprKind::Infix(and) if and.op.node == BinOp::And));
    let rhs = or.rhs.as_ref().unwrap();
    assert!(matches!(&rhs.kind, ExprKind::Cast(_)));
}

#[test]
fn assignment_produces_an_assign_node() {
    let (_, party, msg) = parse_src("func f() { x += 1 }");
    assert!(msg.is_empty());
    let expr = func_tail_expr(&party);
    let ExprKind::Assign(assign) = &expr.kind else {
        panic!("expected assignment");
    };
    assert_eq!(assign.op.node, AssignOp::Add);
}

#[test]
fn postfix_chain_is_left_associative() {
    let (sess, party, msg) = parse_src("func f() { a.b(c)[0]? }");
    assert!(msg.is_empty());
    let expr = func_tail_expr(&party);
    // ((((a).b)(c))[0])?
    let ExprKind::Postfix(quest) = &expr.kind else {
        panic!("expected `?`");
    };
    let ExprKind::Subscript(subscript) = &quest.lhs.as_ref().unwrap().kind else {
        panic!("expected subscript under `?`");
    };
    let ExprKind::Invoke(invoke) = &subscript.lhs.as_ref().unwrap().kind else {
        panic!("expected invoke under subscript");
    };
    let ExprKind::Field(field) = &invoke.callee.as_ref().unwrap().kind else {
        panic!("expected field access as callee");
    };
    assert_eq!(
        sess.interner.resolve(field.field.as_ref().unwrap().sym),
        "b"
    );
}

#[test]
fn struct_literal_is_banned_in_if_heads() {
    let (_, party, msg) = parse_src("func f() { if x { y } else { z } }");
    assert!(msg.is_empty());
    let expr = func_tail_expr(&party);
    let ExprKind::If(if_expr) = &expr.kind else {
        panic!("expected if, got {:?}", expr.kind);
    };
    let cond = if_expr.cond.as_ref().unwrap();
    assert!(matches!(&cond.kind, ExprKind::Path(_)));
    assert!(if_expr.else_branch.is_some());
}

#[test]
fn struct_literal_parses_in_plain_position() {
    let (_, party, msg) = parse_src("func f() { let p = Point { x: 1, y } }");
    assert!(msg.is_empty());
    let item = only_item(&party);
    let ItemKind::Func(func) = &item.kind else {
        panic!()
    };
    let value = func.body.as_ref().unwrap().value.as_ref().unwrap();
    let ExprKind::Block(Ok(block)) = &value.kind else {
        panic!()
    };
    let Ok(stmt) = &block.stmts[0] else { panic!() };
    let StmtKind::Let(let_stmt) = &stmt.kind else {
        panic!("expected let");
    };
    let init = let_stmt.value.as_ref().unwrap().as_ref().unwrap();
    let ExprKind::Struct(struct_expr) = &init.kind else {
        panic!("expected struct literal");
    };
    assert_eq!(struct_expr.fields.len(), 2);
    assert!(matches!(struct_expr.fields[1], StructExprField::Shortcut(_)));
}

#[test]
fn elif_chains_into_nested_ifs() {
    let (_, party, msg) = parse_src("func f() { if a { 1 } elif b { 2 } else { 3 } }");
    assert!(msg.is_empty());
    let expr = func_tail_expr(&party);
    let ExprKind::If(if_expr) = &expr.kind else {
        panic!()
    };
    let els = if_expr.else_branch.as_ref().unwrap().as_ref().unwrap();
    assert!(matches!(&els.kind, ExprKind::If(_)));
}

#[test]
fn lambda_with_params() {
    let (_, party, msg) = parse_src(r"func f() { \x, y: int -> x }");
    assert!(msg.is_empty());
    let expr = func_tail_expr(&party);
    let ExprKind::Lambda(lambda) = &expr.kind else {
        panic!("expected lambda, got {:?}", expr.kind);
    };
    assert_eq!(lambda.params.len(), 2);
    assert!(lambda.params[1].ty.is_some());
}

#[test]
fn match_arms_with_patterns_and_guards() {
    let src = indoc! {"
        func f() {
            match p {
                Point { x, ... } if x => 1,
                (a, ..., b) => 2,
                1 | 2 | -3 => 3,
                _ => 4,
            }
        }
    "};
    let (_, party, msg) = parse_src(src);
    assert!(msg.is_empty(), "unexpected: {:?}", msg.as_slice());
    let expr = func_tail_expr(&party);
    let ExprKind::Match(match_expr) = &expr.kind else {
        panic!()
    };
    assert_eq!(match_expr.arms.len(), 4);

    let arm0 = &match_expr.arms[0];
    assert!(arm0.guard.is_some());
    let Ok(pat0) = arm0.pat.as_deref() else { panic!() };
    let PatKind::Struct(struct_pat) = &pat0.kind else {
        panic!("expected struct pattern");
    };
    assert!(matches!(
        struct_pat.fields.last(),
        Some(StructPatField::Rest { .. })
    ));

    let Ok(pat1) = match_expr.arms[1].pat.as_deref() else {
        panic!()
    };
    let PatKind::Tuple(tuple) = &pat1.kind else {
        panic!("expected tuple pattern");
    };
    assert_eq!(tuple.rest_idx, Some(1));

    let Ok(pat2) = match_expr.arms[2].pat.as_deref() else {
        panic!()
    };
    let PatKind::Multi(alts) = &pat2.kind else {
        panic!("expected multi pattern");
    };
    assert_eq!(alts.len(), 3);
    let Ok(neg) = alts[2].as_deref() else { panic!() };
    assert!(matches!(&neg.kind, PatKind::Lit(lit) if lit.neg));
}

#[test]
fn use_tree_shapes() {
    let src = indoc! {"
        use a::b
        use a::*
        use a::{b, c::d}
        use a::b as c
    "};
    let (_, party, msg) = parse_src(src);
    assert!(msg.is_empty(), "unexpected: {:?}", msg.as_slice());
    assert_eq!(party.items.len(), 4);

    let kinds: Vec<&UseTreeKind> = party
        .items
        .iter()
        .flatten()
        .map(|item| {
            let ItemKind::Use(decl) = &item.kind else {
                panic!("expected use decl");
            };
            &decl.use_tree.as_ref().unwrap().kind
        })
        .collect();

    assert!(matches!(kinds[0], UseTreeKind::Raw(_)));
    assert!(matches!(kinds[1], UseTreeKind::All(Some(_))));
    match kinds[2] {
        UseTreeKind::Specific { prefix, trees } => {
            assert!(prefix.is_some());
            assert_eq!(trees.len(), 2);
        }
        other => panic!("expected specific use tree, got {other:?}"),
    }
    assert!(matches!(kinds[3], UseTreeKind::Rebind { .. }));
}

#[test]
fn generics_with_lifetimes_and_consts() {
    let (_, party, msg) = parse_src("func f<'a, T: Ord, const N: int = 3>(x: T) -> T { x }");
    assert!(msg.is_empty(), "unexpected: {:?}", msg.as_slice());
    let item = only_item(&party);
    let generics = item.generics().unwrap();
    assert_eq!(generics.len(), 3);
    assert!(matches!(
        generics[0].kind,
        GenericParamKind::Lifetime { .. }
    ));
    assert!(matches!(
        &generics[1].kind,
        GenericParamKind::Type { bound: Some(_), .. }
    ));
    assert!(matches!(
        &generics[2].kind,
        GenericParamKind::Const {
            default: Some(_),
            ..
        }
    ));
}

#[test]
fn nested_generic_args_split_shift_right() {
    let (_, party, msg) = parse_src("type M = Map<int, Vec<str>>;");
    assert!(msg.is_empty(), "unexpected: {:?}", msg.as_slice());
    let item = only_item(&party);
    let ItemKind::TypeAlias(alias) = &item.kind else {
        panic!()
    };
    let ty = alias.ty.as_ref().unwrap().as_ref().unwrap();
    let TyKind::Path(path) = &ty.kind else { panic!() };
    let seg = path.segments[0].as_ref().unwrap();
    let args = seg.generics.as_ref().unwrap();
    assert_eq!(args.len(), 2);
    let GenericArg::Type(Ok(inner)) = &args[1] else {
        panic!("expected type argument");
    };
    let TyKind::Path(inner_path) = &inner.kind else {
        panic!()
    };
    let inner_seg = inner_path.segments[0].as_ref().unwrap();
    assert_eq!(inner_seg.generics.as_ref().unwrap().len(), 1);
}

#[test]
fn self_receivers_take_no_param_slot() {
    let src = indoc! {"
        impl Point {
            func len(&self) -> int { 0 }
            func set(&mut self, x: int) {}
        }
    "};
    let (_, party, msg) = parse_src(src);
    assert!(msg.is_empty(), "unexpected: {:?}", msg.as_slice());
    let item = only_item(&party);
    let ItemKind::Impl(impl_item) = &item.kind else {
        panic!()
    };
    let funcs: Vec<&FuncItem> = impl_item
        .members
        .iter()
        .flatten()
        .map(|member| match &member.kind {
            ItemKind::Func(func) => func,
            other => panic!("expected func, got {other:?}"),
        })
        .collect();
    assert!(funcs[0].sig.self_param.is_some());
    assert!(funcs[0].sig.params.is_empty());
    let second_self = funcs[1].sig.self_param.unwrap();
    assert!(second_self.is_ref && second_self.is_mut);
    assert_eq!(funcs[1].sig.params.len(), 1);
}

#[test]
fn function_param_labels() {
    let (sess, party, msg) = parse_src("func greet(_ name: str, times: int, to whom: str) {}");
    assert!(msg.is_empty(), "unexpected: {:?}", msg.as_slice());
    let item = only_item(&party);
    let ItemKind::Func(func) = &item.kind else {
        panic!()
    };
    let labels: Vec<Option<String>> = func
        .sig
        .params
        .iter()
        .map(|param| {
            param
                .label
                .map(|label| sess.interner.resolve(label.sym).to_owned())
        })
        .collect();
    assert_eq!(
        labels,
        vec![None, Some("times".into()), Some("to".into())]
    );
}

#[test]
fn recovery_leaves_an_error_node_and_continues() {
    let (_, party, msg) = parse_src("? ? func ok() {}");
    assert!(msg.has_errors());
    assert_eq!(party.items.len(), 2);
    assert!(party.items[0].is_err());
    let second = party.items[1].as_ref().expect("second item recovered");
    assert!(matches!(second.kind, ItemKind::Func(_)));
}

#[test]
fn every_node_id_is_unique_with_a_span_inside_the_file() {
    let src = "func f(x: int) -> int { if x > 0 { x } else { 0 - x } }";
    let (sess, _, msg) = parse_src(src);
    assert!(msg.is_empty());
    // Ids are allocation indices, so uniqueness is structural; check
    // spans instead.
    for raw in 1..sess.node_count() as u32 {
        let span = sess.node_span(NodeId(raw));
        assert!(span.hi() as usize <= src.len());
        assert_eq!(span.file, FileId(1));
    }
}

#[test]
fn parsing_is_idempotent_modulo_node_allocation() {
    let src = indoc! {"
        mod geo {
            struct Point { x: int, y: int }
            func dist(a: Point, b: Point) -> int { 0 }
        }
        func main() { geo::dist(a: p, b: q) }
    "};
    let (sess_a, party_a, msg_a) = parse_src(src);
    let (sess_b, party_b, msg_b) = parse_src(src);
    assert!(msg_a.is_empty());
    assert!(msg_b.is_empty());
    let dump_a = AstPrinter::new(&sess_a).print(&party_a);
    let dump_b = AstPrinter::new(&sess_b).print(&party_b);
    assert_eq!(dump_a, dump_b);
}
