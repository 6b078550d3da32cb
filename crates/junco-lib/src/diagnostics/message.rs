//! Diagnostic message types.

use serde::Serialize;

use crate::span::Span;

/// Severity level of a diagnostic. Any `Error` aborts the pipeline at
/// the next stage boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Severity {
    #[default]
    Error,
    Warn,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warning"),
        }
    }
}

/// Whether a label is the diagnostic's anchor or supporting context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LabelKind {
    Primary,
    Aux,
}

/// A located annotation attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Label {
    pub kind: LabelKind,
    pub span: Span,
    pub text: String,
}

impl Label {
    pub fn primary(span: Span, text: impl Into<String>) -> Self {
        Self {
            kind: LabelKind::Primary,
            span,
            text: text.into(),
        }
    }

    pub fn aux(span: Span, text: impl Into<String>) -> Self {
        Self {
            kind: LabelKind::Aux,
            span,
            text: text.into(),
        }
    }
}

/// A diagnostic: severity, text, an optional stable error id, and one
/// primary label plus any number of auxiliary labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub severity: Severity,
    pub text: String,
    /// Stable error id, e.g. `E0001`. Optional.
    pub eid: Option<u16>,
    pub labels: Vec<Label>,
}

impl Message {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warn(&self) -> bool {
        self.severity == Severity::Warn
    }

    /// The primary label. Every emitted message has exactly one.
    pub fn primary_label(&self) -> Option<&Label> {
        self.labels.iter().find(|l| l.kind == LabelKind::Primary)
    }

    /// Span of the primary label.
    pub fn span(&self) -> Span {
        self.primary_label().map(|l| l.span).unwrap_or(Span::DUMMY)
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.severity, self.text)?;
        if let Some(label) = self.primary_label() {
            write!(f, " at {:?}", label.span)?;
        }
        Ok(())
    }
}
