use indoc::indoc;

use junco_core::Symbol;

use crate::resolve::{DefKind, NameBinding, Namespace, Res};
use crate::session::{CompileDepth, Session};
use crate::stages::{self, CompileResult, Stage};

fn analyze(src: &str) -> (Session, CompileResult) {
    let mut sess = Session::new();
    let result = stages::compile(
        &mut sess,
        "test.jc",
        src.to_owned(),
        CompileDepth::NameResolution,
    );
    (sess, result)
}

fn find_def(sess: &Session, name: &str) -> Option<crate::resolve::DefId> {
    sess.def_table
        .defs()
        .iter()
        .find(|def| sess.interner.resolve(def.ident.sym) == name)
        .map(|def| def.id)
}

fn root_value_binding(sess: &Session, name: &str) -> Option<NameBinding> {
    let sym = sess.interner.lookup(name)?;
    sess.modules
        .module(crate::resolve::ModuleTree::ROOT)
        .find(Namespace::Value, sym)
}

#[test]
fn definitions_are_allocated_for_every_named_item() {
    let src = indoc! {"
        mod geo {
            struct Point { x: int, y: int }
            enum Axis { X, Y }
            trait Measure {}
            type Alias = Point;
            const ORIGIN: Point = Point { x: 0, y: 0 };
            func dist(a: Point, b: Point) -> int { 0 }
        }
    "};
    let (sess, result) = analyze(src);
    assert!(
        result.is_ok(),
        "unexpected failure: {:?}",
        result.messages.as_slice()
    );

    for (name, kind) in [
        ("geo", DefKind::Mod),
        ("Point", DefKind::Struct),
        ("Axis", DefKind::Enum),
        ("X", DefKind::Variant),
        ("Y", DefKind::Variant),
        ("Measure", DefKind::Trait),
        ("Alias", DefKind::TypeAlias),
        ("ORIGIN", DefKind::Const),
        ("dist(a:b:)", DefKind::Func),
    ] {
        let def = find_def(&sess, name)
            .unwrap_or_else(|| panic!("expected a definition named `{name}`"));
        assert_eq!(sess.def_table.def(def).kind, kind, "kind of `{name}`");
    }
}

#[test]
fn function_slots_bind_overload_sets() {
    let src = indoc! {r#"
        func f(x: int) {}
        func f(y: str) {}
        func main() { f(x: 1); f(y: "a") }
    "#};
    let (sess, result) = analyze(src);
    assert!(
        result.is_ok(),
        "unexpected failure: {:?}",
        result.messages.as_slice()
    );

    let Some(NameBinding::Fos(fos)) = root_value_binding(&sess, "f") else {
        panic!("`f` should bind an overload set");
    };
    let overloads = sess.def_table.fos(fos);
    assert_eq!(overloads.len(), 2);
    let suffixes: Vec<&str> = overloads
        .keys()
        .map(|&suffix| sess.interner.resolve(suffix))
        .collect();
    assert_eq!(suffixes, vec!["f(x:)", "f(y:)"]);

    // Both call sites resolve to the matching overload via suffix
    // reconstruction.
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
fn overload_suffix_collision_is_a_redefinition() {
    let src = "func f(x: int) {}\nfunc f(x: str) {}";
    let (sess, result) = analyze(src);
    assert_eq!(result.failed_at, Some(Stage::ModuleTree));
    assert_eq!(result.messages.error_count(), 1);

    let msg = &result.messages.as_slice()[0];
    assert!(msg.text.contains("f(x:)"), "text: {}", msg.text);

    // Primary on the second `f`, auxiliary on the first.
    let second_f = src.rfind("func f").unwrap() + 5;
    let first_f = src.find("func f").unwrap() + 5;
    assert_eq!(msg.primary_label().unwrap().span.lo() as usize, second_f);
    let aux = msg
        .labels
        .iter()
        .find(|label| label.kind == crate::diagnostics::LabelKind::Aux)
        .unwrap();
    assert_eq!(aux.span.lo() as usize, first_f);
    let _ = sess;
}

#[test]
fn distinct_base_names_do_not_collide() {
    let src = "func f(x: int) {}\nfunc g(x: int) {}";
    let (_, result) = analyze(src);
    assert!(result.is_ok());
}

#[test]
fn locals_resolve_to_their_binding_pattern() {
    let src = "func main() { let x = 1; x }";
    let (sess, result) = analyze(src);
    assert!(
        result.is_ok(),
        "unexpected failure: {:?}",
        result.messages.as_slice()
    );

    let locals: Vec<_> = sess
        .resolutions
        .sorted()
        .into_iter()
        .filter_map(|(node, res)| match res {
            Res::Local(local) => Some((node, local)),
            _ => None,
        })
        .collect();
    assert_eq!(locals.len(), 1);
    let (use_node, local) = locals[0];
    // The binding precedes the use in source order.
    assert!(sess.node_span(local).lo() < sess.node_span(use_node).lo());
}

#[test]
fn duplicate_locals_in_one_rib_are_reported() {
    let src = "func f(a: int, a: str) {}";
    let (_, result) = analyze(src);
    assert_eq!(result.failed_at, Some(Stage::NameResolution));
    assert_eq!(result.messages.error_count(), 1);
    assert!(
        result.messages.as_slice()[0]
            .text
            .contains("bound more than once")
    );
}

#[test]
fn shadowing_across_blocks_is_allowed() {
    let src = "func f() { let x = 1; { let x = 2; x }; x }";
    let (_, result) = analyze(src);
    assert!(
        result.is_ok(),
        "unexpected failure: {:?}",
        result.messages.as_slice()
    );
}

#[test]
fn private_items_are_inaccessible_through_paths() {
    let src = indoc! {"
        mod m {
            func secret() {}
        }
        func main() { m::secret() }
    "};
    let (_, result) = analyze(src);
    assert_eq!(result.failed_at, Some(Stage::NameResolution));
    assert_eq!(result.messages.error_count(), 1);
    assert!(result.messages.as_slice()[0].text.contains("private"));
}

#[test]
fn pub_items_resolve_through_paths() {
    let src = indoc! {"
        mod m {
            pub func open() {}
        }
        func main() { m::open() }
    "};
    let (_, result) = analyze(src);
    assert!(
        result.is_ok(),
        "unexpected failure: {:?}",
        result.messages.as_slice()
    );
}

#[test]
fn imports_create_aliases_that_unwind_to_their_target() {
    let src = indoc! {r#"
        mod io {
            pub func print(_: str) {}
        }
        use io::print
        func main() { print("hi") }
    "#};
    let (sess, result) = analyze(src);
    assert!(
        result.is_ok(),
        "unexpected failure: {:?}",
        result.messages.as_slice()
    );

    let print_def = find_def(&sess, "print(_:)").expect("print definition");
    // The call resolves through the imported alias and unwinds to the
    // real definition.
    let resolved_to_print = sess.resolutions.sorted().into_iter().any(|(_, res)| {
        matches!(res, Res::Def(def) if sess.def_table.unwind_def_id(def) == print_def
            && sess.def_table.def(def).kind == DefKind::ImportAlias)
    });
    assert!(resolved_to_print, "call should resolve via the import alias");
}

#[test]
fn glob_imports_bring_public_bindings() {
    let src = indoc! {"
        mod m {
            pub struct S {}
            pub func f() {}
            func hidden() {}
        }
        use m::*
        func g(x: S) { f() }
    "};
    let (sess, result) = analyze(src);
    assert!(
        result.is_ok(),
        "unexpected failure: {:?}",
        result.messages.as_slice()
    );
    // The private function was not imported.
    assert!(root_value_binding(&sess, "hidden").is_none());
}

#[test]
fn pub_use_reexports() {
    let src = indoc! {"
        mod a {
            pub func h() {}
        }
        mod c {
            pub use a::h
        }
        func main() { c::h() }
    "};
    let (_, result) = analyze(src);
    assert!(
        result.is_ok(),
        "unexpected failure: {:?}",
        result.messages.as_slice()
    );
}

#[test]
fn primitive_types_resolve_in_type_position() {
    let src = "func f(x: int, s: str) -> bool { true }";
    let (sess, result) = analyze(src);
    assert!(result.is_ok());
    let prims: Vec<_> = sess
        .resolutions
        .sorted()
        .into_iter()
        .filter(|(_, res)| matches!(res, Res::PrimType(_)))
        .collect();
    assert_eq!(prims.len(), 3);
}

#[test]
fn user_types_shadow_primitives() {
    let src = "struct int {}\nfunc f(x: int) {}";
    let (sess, result) = analyze(src);
    assert!(
        result.is_ok(),
        "unexpected failure: {:?}",
        result.messages.as_slice()
    );
    let int_def = find_def(&sess, "int").expect("user `int` struct");
    let uses_struct = sess
        .resolutions
        .sorted()
        .into_iter()
        .any(|(_, res)| matches!(res, Res::Def(def) if sess.def_table.unwind_def_id(def) == int_def));
    assert!(uses_struct);
    let any_prim = sess
        .resolutions
        .sorted()
        .into_iter()
        .any(|(_, res)| matches!(res, Res::PrimType(_)));
    assert!(!any_prim, "shadowed primitive must not resolve");
}

#[test]
fn wrong_namespace_reports_with_alternative() {
    let src = "func main() { let y: main = 1 }";
    let (_, result) = analyze(src);
    assert_eq!(result.failed_at, Some(Stage::NameResolution));
    let msg = &result.messages.as_slice()[0];
    assert!(msg.text.contains("expected a type"), "text: {}", msg.text);
    // The value-namespace `main` rides along as an auxiliary label.
    assert!(msg.labels.len() >= 2);
}

#[test]
fn bare_function_references_resolve_to_the_overload_set() {
    let src = indoc! {"
        func f(x: int) {}
        func main() { let g = f }
    "};
    let (sess, result) = analyze(src);
    assert!(
        result.is_ok(),
        "unexpected failure: {:?}",
        result.messages.as_slice()
    );
    let any_fos = sess
        .resolutions
        .sorted()
        .into_iter()
        .any(|(_, res)| matches!(res, Res::Fos(_)));
    assert!(any_fos, "a bare `f` should resolve to its overload set");
}

#[test]
fn struct_literals_resolve_through_the_type_namespace() {
    let src = indoc! {"
        struct Point { x: int, y: int }
        func main() { let p = Point { x: 1, y: 2 } }
    "};
    let (sess, result) = analyze(src);
    assert!(
        result.is_ok(),
        "unexpected failure: {:?}",
        result.messages.as_slice()
    );
    let point = find_def(&sess, "Point").unwrap();
    let resolved = sess
        .resolutions
        .sorted()
        .into_iter()
        .any(|(_, res)| res == Res::Def(point));
    assert!(resolved);
}

#[test]
fn default_initializer_is_registered_for_structs() {
    let src = "struct Point { x: int, y: int }";
    let (sess, result) = analyze(src);
    assert!(result.is_ok());
    let init = find_def(&sess, "init(x:y:)").expect("default initializer");
    assert_eq!(sess.def_table.def(init).kind, DefKind::DefaultInit);
}

#[test]
fn redefinition_of_a_type_name_is_reported() {
    let src = "struct S {}\nstruct S {}";
    let (_, result) = analyze(src);
    assert_eq!(result.failed_at, Some(Stage::ModuleTree));
    assert_eq!(result.messages.error_count(), 1);
    assert!(
        result.messages.as_slice()[0]
            .text
            .contains("already been declared")
    );
}

#[test]
fn party_prefix_resolves_from_the_root() {
    let src = indoc! {"
        pub func top() {}
        mod inner {
            func call() { party::top() }
        }
    "};
    let (_, result) = analyze(src);
    assert!(
        result.is_ok(),
        "unexpected failure: {:?}",
        result.messages.as_slice()
    );
}

#[test]
fn rib_frames_are_preserved_for_inspection() {
    let src = "func main() { let x = 1; x }";
    let (sess, result) = analyze(src);
    assert!(
        result.is_ok(),
        "unexpected failure: {:?}",
        result.messages.as_slice()
    );
    assert!(!sess.rib_snapshots.is_empty());

    // The block rib carries the `x` local.
    let x_sym = sess.interner.lookup("x").unwrap();
    let has_local = sess
        .rib_snapshots
        .iter()
        .any(|snap| snap.rib.find_local(x_sym).is_some());
    assert!(has_local, "a preserved rib should hold the local `x`");

    // Frames come out in pop order: the root frame is last, at depth 0,
    // and every recorded depth is consistent with a stack.
    let root = sess.rib_snapshots.last().unwrap();
    assert_eq!(root.depth, 0);
    assert_eq!(root.rib.kind, crate::resolve::RibKind::Root);
}

#[test]
fn fos_symbols_are_plain_symbols() {
    // Guard against accidental keyword interning of synthesized names.
    let mut sess = Session::new();
    let sym: Symbol = sess.interner.intern("f(x:)");
    assert!(!sym.is_some_kw());
}
