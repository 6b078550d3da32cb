//! Renders accumulated messages against the source map.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};

use super::message::{LabelKind, Message, Severity};
use super::MessageHolder;
use crate::source_map::SourceMap;
use crate::span::Span;

/// Builder-pattern renderer for diagnostics.
pub struct MessagesPrinter<'a> {
    messages: &'a MessageHolder,
    source_map: &'a SourceMap,
    colored: bool,
}

impl<'a> MessagesPrinter<'a> {
    pub fn new(messages: &'a MessageHolder, source_map: &'a SourceMap) -> Self {
        Self {
            messages,
            source_map,
            colored: false,
        }
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        if self.messages.is_empty() {
            return Ok(());
        }

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, msg) in self.messages.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            self.format_one(w, &renderer, msg)?;
        }
        Ok(())
    }

    fn format_one(
        &self,
        w: &mut impl Write,
        renderer: &Renderer,
        msg: &Message,
    ) -> std::fmt::Result {
        let level = severity_to_level(msg.severity);

        // Messages on dummy spans have no source to annotate.
        let primary_span = msg.span();
        if primary_span.is_dummy() {
            return write!(w, "{msg}");
        }

        let file = primary_span.file;
        let source = self.source_map.source(file);
        let path = self.source_map.path(file);

        let mut snippet = Snippet::source(source).line_start(1).path(path);
        for label in &msg.labels {
            // Labels in other files are rare (cross-file imports); the
            // renderer works per snippet, so they are skipped here and
            // preserved in the structured message.
            if label.span.file != file {
                continue;
            }
            let kind = match label.kind {
                LabelKind::Primary => AnnotationKind::Primary,
                LabelKind::Aux => AnnotationKind::Context,
            };
            snippet = snippet.annotation(kind.span(adjust(label.span, source.len())).label(&label.text));
        }

        let report: Vec<Group> = vec![level.primary_title(&msg.text).element(snippet)];
        write!(w, "{}", renderer.render(&report))
    }
}

impl MessageHolder {
    pub fn printer<'a>(&'a self, source_map: &'a SourceMap) -> MessagesPrinter<'a> {
        MessagesPrinter::new(self, source_map)
    }
}

fn severity_to_level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warn => Level::WARNING,
    }
}

/// Widen empty spans to one byte so the caret is visible.
fn adjust(span: Span, limit: usize) -> std::ops::Range<usize> {
    let start = span.lo() as usize;
    let end = span.hi() as usize;
    if start == end {
        return start..(start + 1).min(limit);
    }
    start..end
}
