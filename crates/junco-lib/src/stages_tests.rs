//! End-to-end scenarios over the staged pipeline.

use indoc::indoc;

use crate::diagnostics::LabelKind;
use crate::resolve::{DefKind, NameBinding, Namespace, Res};
use crate::session::{CompileDepth, Session};
use crate::stages::{self, CompileResult, Stage};

fn run(src: &str, depth: CompileDepth) -> (Session, CompileResult) {
    let mut sess = Session::new();
    let result = stages::compile(&mut sess, "main.jc", src.to_owned(), depth);
    (sess, result)
}

fn run_full(src: &str) -> (Session, CompileResult) {
    run(src, CompileDepth::Lowering)
}

#[test]
fn valid_hello() {
    let src = indoc! {r#"
        mod io {
            pub func print(_: str) {}
        }
        use io::print
        func main() { print("hi") }
    "#};
    let (sess, result) = run_full(src);
    assert!(
        result.is_ok(),
        "unexpected messages: {:?}",
        result.messages.as_slice()
    );
    assert_eq!(result.messages.error_count(), 0);

    // `main` is registered with its call-shape suffix.
    let main_def = sess
        .def_table
        .defs()
        .iter()
        .find(|def| sess.interner.resolve(def.ident.sym) == "main()")
        .expect("main defined");
    assert_eq!(main_def.kind, DefKind::Func);

    // The `print` path resolves to the imported definition.
    let print_def = sess
        .def_table
        .defs()
        .iter()
        .find(|def| {
            def.kind == DefKind::Func && sess.interner.resolve(def.ident.sym) == "print(_:)"
        })
        .expect("print defined")
        .id;
    let call_resolves = sess.resolutions.sorted().into_iter().any(|(_, res)| {
        matches!(res, Res::Def(def) if sess.def_table.unwind_def_id(def) == print_def)
    });
    assert!(call_resolves);
    assert!(result.hir.is_some());
}

#[test]
fn unresolved_name() {
    let src = "func main() { foo() }";
    let (sess, result) = run_full(src);

    assert_eq!(result.messages.error_count(), 1);
    assert_eq!(result.failed_at, Some(Stage::NameResolution));

    let msg = &result.messages.as_slice()[0];
    assert!(
        msg.text.contains("cannot find name"),
        "text: {}",
        msg.text
    );
    let foo_at = src.find("foo").unwrap();
    let primary = msg.primary_label().unwrap();
    assert_eq!(primary.span.lo() as usize, foo_at);
    assert_eq!(primary.span.hi() as usize, foo_at + 3);

    // The failing path is recorded as an error resolution.
    let has_error_res = sess
        .resolutions
        .sorted()
        .into_iter()
        .any(|(_, res)| res == Res::Error);
    assert!(has_error_res);
}

#[test]
fn overload_set_resolution() {
    let src = indoc! {r#"
        func f(x: int) {}
        func f(y: str) {}
        func main() { f(x: 1); f(y: "a") }
    "#};
    let (sess, result) = run_full(src);
    assert_eq!(
        result.messages.error_count(),
        0,
        "unexpected: {:?}",
        result.messages.as_slice()
    );

    let f_sym = sess.interner.lookup("f").unwrap();
    let binding = sess
        .modules
        .module(crate::resolve::ModuleTree::ROOT)
        .find(Namespace::Value, f_sym)
        .expect("f bound at root");
    let NameBinding::Fos(fos) = binding else {
        panic!("f should bind an overload set");
    };
    let overloads = sess.def_table.fos(fos);
    assert_eq!(overloads.len(), 2);

    let d1 = overloads[&sess.interner.lookup("f(x:)").unwrap()];
    let d2 = overloads[&sess.interner.lookup("f(y:)").unwrap()];
    let resolved: Vec<Res> = sess
        .resolutions
        .sorted()
        .into_iter()
        .map(|(_, res)| res)
        .collect();
    assert!(resolved.contains(&Res::Def(d1)));
    assert!(resolved.contains(&Res::Def(d2)));
}

#[test]
fn overload_collision() {
    let src = "func f(x: int) {}\nfunc f(x: str) {}";
    let (_, result) = run_full(src);

    assert_eq!(result.messages.error_count(), 1);
    assert_eq!(result.failed_at, Some(Stage::ModuleTree));

    let msg = &result.messages.as_slice()[0];
    assert!(msg.text.contains("f(x:)"), "text: {}", msg.text);

    let first_f = src.find("func f").unwrap() + 5;
    let second_f = src.rfind("func f").unwrap() + 5;
    assert_eq!(msg.primary_label().unwrap().span.lo() as usize, second_f);
    let aux = msg
        .labels
        .iter()
        .find(|label| label.kind == LabelKind::Aux)
        .expect("aux label pointing at the first overload");
    assert_eq!(aux.span.lo() as usize, first_f);
}

#[test]
fn break_outside_loop() {
    let src = "func main() { break }";
    let (_, result) = run_full(src);

    assert_eq!(result.messages.error_count(), 1);
    assert_eq!(result.failed_at, Some(Stage::Validator));

    let msg = &result.messages.as_slice()[0];
    assert_eq!(msg.text, "`break` cannot be used outside of a loop");
    let break_at = src.find("break").unwrap();
    let primary = msg.primary_label().unwrap();
    assert_eq!(primary.span.lo() as usize, break_at);
    assert_eq!(primary.span.hi() as usize, break_at + 5);
}

#[test]
fn chained_comparison() {
    let src = "func main() { let a = 1 < 2 < 3 }";
    let (_, result) = run_full(src);

    assert_eq!(result.messages.error_count(), 1);
    assert_eq!(result.failed_at, Some(Stage::Validator));

    let msg = &result.messages.as_slice()[0];
    assert!(
        msg.text.to_lowercase().contains("chained comparison"),
        "text: {}",
        msg.text
    );
    // Primary label sits on the second `<`.
    let second_lt = src.rfind('<').unwrap();
    assert_eq!(msg.primary_label().unwrap().span.lo() as usize, second_lt);
}

#[test]
fn custom_infix_operators_are_reserved() {
    let src = "func main() { 1 `plus` 2 }";
    let (_, result) = run_full(src);
    assert_eq!(result.failed_at, Some(Stage::Parser));
    assert_eq!(result.messages.error_count(), 1);
    assert!(result.messages.as_slice()[0].text.contains("reserved"));
}

#[test]
fn assignment_target_must_be_a_place() {
    let src = "func main() { 1 + 2 = 3 }";
    let (_, result) = run_full(src);
    assert_eq!(result.failed_at, Some(Stage::Validator));
    assert_eq!(result.messages.error_count(), 1);
    assert!(
        result.messages.as_slice()[0]
            .text
            .contains("Invalid left-hand side")
    );
}

#[test]
fn deref_and_self_are_not_place_expressions() {
    let src = indoc! {"
        struct Cell { value: int }
        impl Cell {
            func clobber(&mut self, other: int) {
                self = other;
                *other = 1
            }
        }
    "};
    let (_, result) = run_full(src);
    assert_eq!(result.failed_at, Some(Stage::Validator));
    assert_eq!(result.messages.error_count(), 2);
    for msg in result.messages.as_slice() {
        assert!(
            msg.text.contains("Invalid left-hand side"),
            "text: {}",
            msg.text
        );
    }
}

#[test]
fn fields_and_subscripts_are_places() {
    let src = indoc! {"
        func main() {
            let mut p = 1;
            p = 2;
            p.x = 3;
            p[0] = 4;
            (p) = 5
        }
    "};
    let (_, result) = run_full(src);
    assert!(
        result.is_ok(),
        "unexpected failure: {:?}",
        result.messages.as_slice()
    );
}

#[test]
fn rest_pattern_outside_aggregate_patterns() {
    let src = "func main() { let ... = 1 }";
    let (_, result) = run_full(src);
    assert_eq!(result.failed_at, Some(Stage::Validator));
    assert_eq!(result.messages.error_count(), 1);
    assert!(result.messages.as_slice()[0].text.contains("Rest pattern"));
}

#[test]
fn self_outside_a_method() {
    let src = "func main() { self }";
    let (_, result) = run_full(src);
    assert_eq!(result.failed_at, Some(Stage::Validator));
    assert_eq!(result.messages.error_count(), 1);
    assert!(
        result.messages.as_slice()[0]
            .text
            .contains("inside a method")
    );
}

#[test]
fn named_single_element_tuple_type_is_rejected() {
    let src = "func f(x: (name: int)) {}";
    let (_, result) = run_full(src);
    assert_eq!(result.failed_at, Some(Stage::Validator));
    assert_eq!(result.messages.error_count(), 1);
    assert!(
        result.messages.as_slice()[0]
            .text
            .contains("single-element named tuple")
    );
}

#[test]
fn self_resolves_inside_methods() {
    let src = indoc! {"
        struct Point { x: int }
        impl Point {
            func x_of(&self) -> int { self }
        }
    "};
    let (sess, result) = run_full(src);
    assert!(
        result.is_ok(),
        "unexpected failure: {:?}",
        result.messages.as_slice()
    );
    let self_local = sess
        .resolutions
        .sorted()
        .into_iter()
        .any(|(_, res)| matches!(res, Res::Local(_)));
    assert!(self_local, "`self` should resolve to its receiver");
}

#[test]
fn parser_depth_stops_before_resolution() {
    let src = "func main() { foo() }";
    let (sess, result) = run(src, CompileDepth::Parser);
    // `foo` would fail to resolve, but resolution never ran.
    assert!(result.is_ok());
    assert!(result.party.is_some());
    assert!(result.hir.is_none());
    assert_eq!(sess.resolutions.len(), 0);
    assert_eq!(sess.def_table.size(), 1); // only the root
}

#[test]
fn name_resolution_depth_stops_before_lowering() {
    let src = "func main() {}";
    let (sess, result) = run(src, CompileDepth::NameResolution);
    assert!(result.is_ok());
    assert!(result.hir.is_none());
    assert!(sess.def_table.size() > 1);
}

#[test]
fn parse_errors_abort_before_the_module_tree() {
    let src = "func main( {";
    let (sess, result) = run_full(src);
    assert_eq!(result.failed_at, Some(Stage::Parser));
    assert!(result.messages.has_errors());
    // The module tree was never built.
    assert_eq!(sess.def_table.size(), 1);
    assert!(result.party.is_some(), "partial AST stays inspectable");
}

#[test]
fn lex_errors_abort_before_the_parser() {
    let src = "func main() { \u{1F980} }";
    let (_, result) = run_full(src);
    assert_eq!(result.failed_at, Some(Stage::Lexer));
    assert!(result.party.is_none());
}

#[test]
fn warnings_do_not_abort_the_pipeline() {
    let src = "func main() { (42) }";
    let (_, result) = run_full(src);
    assert!(result.is_ok(), "warnings must not stop compilation");
    assert_eq!(result.messages.warn_count(), 1);
    assert!(result.hir.is_some());
}

#[test]
fn messages_are_emitted_in_source_order() {
    let src = indoc! {"
        func a() { (1) }
        func b() { (2) }
    "};
    let (_, result) = run_full(src);
    assert_eq!(result.messages.warn_count(), 2);
    let spans: Vec<u32> = result
        .messages
        .iter()
        .map(|msg| msg.span().lo())
        .collect();
    let mut sorted = spans.clone();
    sorted.sort_unstable();
    assert_eq!(spans, sorted);
}

#[test]
fn into_result_surfaces_the_failed_stage() {
    let src = "func main() { break }";
    let (_, result) = run_full(src);
    let err = result.into_result().unwrap_err();
    assert!(err.to_string().contains("validator"));
}
