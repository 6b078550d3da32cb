use crate::diagnostics::{LabelKind, MessageHolder, Severity};
use crate::source_map::SourceMap;
use crate::span::Span;

fn sample_map() -> (SourceMap, crate::span::FileId) {
    let mut map = SourceMap::new();
    let file = map.register_source("main.jc");
    let src = "func main() {\n    broken\n}\n";
    let newlines = src
        .bytes()
        .enumerate()
        .filter(|&(_, b)| b == b'\n')
        .map(|(i, _)| i as u32)
        .collect();
    map.set_file(file, src.to_owned(), newlines);
    (map, file)
}

#[test]
fn builder_emits_into_holder() {
    let (_, file) = sample_map();
    let mut holder = MessageHolder::new();
    holder
        .error("cannot find name `broken`")
        .primary(Span::from_bounds(file, 18, 24), "not found")
        .emit();

    assert_eq!(holder.len(), 1);
    assert!(holder.has_errors());
    let msg = &holder.as_slice()[0];
    assert_eq!(msg.severity, Severity::Error);
    assert_eq!(msg.primary_label().unwrap().kind, LabelKind::Primary);
}

#[test]
fn aux_labels_ride_on_the_same_message() {
    let (_, file) = sample_map();
    let mut holder = MessageHolder::new();
    holder
        .error("redefinition of `f`")
        .primary(Span::from_bounds(file, 5, 9), "redefined here")
        .aux(Span::from_bounds(file, 0, 4), "previously defined here")
        .emit();

    let msg = &holder.as_slice()[0];
    assert_eq!(msg.labels.len(), 2);
    assert_eq!(msg.labels[1].kind, LabelKind::Aux);
}

#[test]
fn counts_split_by_severity() {
    let (_, file) = sample_map();
    let mut holder = MessageHolder::new();
    holder
        .error("bad")
        .primary(Span::from_bounds(file, 0, 4), "here")
        .emit();
    holder
        .warn("iffy")
        .primary(Span::from_bounds(file, 5, 9), "here")
        .emit();

    assert_eq!(holder.error_count(), 1);
    assert_eq!(holder.warn_count(), 1);
    assert!(holder.has_errors());
}

#[test]
fn renderer_includes_text_and_path() {
    let (map, file) = sample_map();
    let mut holder = MessageHolder::new();
    holder
        .error("cannot find name `broken`")
        .primary(Span::from_bounds(file, 18, 24), "not found")
        .emit();

    let out = holder.printer(&map).render();
    assert!(out.contains("cannot find name `broken`"));
    assert!(out.contains("main.jc"));
    assert!(out.contains("not found"));
}

#[test]
fn renderer_handles_empty_holder() {
    let (map, _) = sample_map();
    let holder = MessageHolder::new();
    assert_eq!(holder.printer(&map).render(), "");
}
