//! Message accumulation.
//!
//! Stages collect diagnostics into a [`MessageHolder`] through a fluent
//! builder: `holder.error("...").primary(span, "...").emit()`. The
//! builder is `#[must_use]`; a message only lands in the holder when
//! `emit()` is called, so a forgotten emit is a compile-time lint rather
//! than a silently dropped diagnostic.

mod message;
mod printer;

#[cfg(test)]
mod tests;

pub use message::{Label, LabelKind, Message, Severity};
pub use printer::MessagesPrinter;

/// Collection of diagnostics produced by one stage.
#[derive(Debug, Clone, Default)]
pub struct MessageHolder {
    messages: Vec<Message>,
}

/// In-flight diagnostic; push it with [`MessageBuilder::emit`].
#[must_use = "message not emitted, call .emit()"]
pub struct MessageBuilder<'a> {
    holder: &'a mut MessageHolder,
    message: Message,
}

impl MessageHolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, text: impl Into<String>) -> MessageBuilder<'_> {
        self.build(Severity::Error, text)
    }

    pub fn warn(&mut self, text: impl Into<String>) -> MessageBuilder<'_> {
        self.build(Severity::Warn, text)
    }

    fn build(&mut self, severity: Severity, text: impl Into<String>) -> MessageBuilder<'_> {
        MessageBuilder {
            holder: self,
            message: Message {
                severity,
                text: text.into(),
                eid: None,
                labels: Vec::new(),
            },
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn extend(&mut self, other: MessageHolder) {
        self.messages.extend(other.messages);
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|m| m.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_error()).count()
    }

    pub fn warn_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_warn()).count()
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    pub fn into_vec(self) -> Vec<Message> {
        self.messages
    }
}

impl IntoIterator for MessageHolder {
    type Item = Message;
    type IntoIter = std::vec::IntoIter<Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

impl<'a> MessageBuilder<'a> {
    /// Attach the primary label. Exactly one per message.
    pub fn primary(mut self, span: crate::span::Span, text: impl Into<String>) -> Self {
        debug_assert!(
            self.message.primary_label().is_none(),
            "message already has a primary label"
        );
        self.message.labels.push(Label::primary(span, text));
        self
    }

    /// Attach an auxiliary label ("defined here", "did you mean ...").
    pub fn aux(mut self, span: crate::span::Span, text: impl Into<String>) -> Self {
        self.message.labels.push(Label::aux(span, text));
        self
    }

    pub fn eid(mut self, eid: u16) -> Self {
        self.message.eid = Some(eid);
        self
    }

    pub fn emit(self) {
        debug_assert!(
            self.message.primary_label().is_some(),
            "emitted message without a primary label"
        );
        self.holder.messages.push(self.message);
    }
}
