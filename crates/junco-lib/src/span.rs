//! Source positions.
//!
//! A `Span` is a `(file, offset, length)` triple. Offsets are byte
//! offsets into the file's source; the range is stored as a
//! [`rowan::TextRange`] so span arithmetic composes with the renderer.

use rowan::{TextRange, TextSize};
use serde::Serialize;

use junco_core::Symbol;
use junco_core::ice;

/// Handle to a registered source file.
///
/// Id `0` is reserved for synthetic spans ([`Span::DUMMY`]); real files
/// are registered from `1` upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FileId(pub u32);

impl FileId {
    pub const DUMMY: FileId = FileId(0);
}

/// A contiguous byte slice of one source file.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub file: FileId,
    pub range: TextRange,
}

impl Span {
    /// Span of synthetic nodes with no source location.
    pub const DUMMY: Span = Span {
        file: FileId::DUMMY,
        range: TextRange::empty(TextSize::new(0)),
    };

    pub fn new(file: FileId, range: TextRange) -> Self {
        Self { file, range }
    }

    pub fn from_bounds(file: FileId, lo: u32, hi: u32) -> Self {
        Self {
            file,
            range: TextRange::new(TextSize::new(lo), TextSize::new(hi)),
        }
    }

    pub fn is_dummy(self) -> bool {
        self.file == FileId::DUMMY
    }

    /// Byte offset of the span start.
    pub fn lo(self) -> u32 {
        self.range.start().into()
    }

    /// Byte offset one past the span end.
    pub fn hi(self) -> u32 {
        self.range.end().into()
    }

    pub fn len(self) -> u32 {
        self.range.len().into()
    }

    pub fn is_empty(self) -> bool {
        self.range.is_empty()
    }

    /// The enclosing span of `self` and `end`.
    ///
    /// ICEs when the spans come from different files; a dummy operand
    /// yields the other span unchanged.
    pub fn to(self, end: Span) -> Span {
        if self.is_dummy() {
            return end;
        }
        if end.is_dummy() {
            return self;
        }
        if self.file != end.file {
            ice!("Span::to called with spans from different files");
        }
        Span::from_bounds(
            self.file,
            self.lo().min(end.lo()),
            self.hi().max(end.hi()),
        )
    }

    /// A zero-length span at the end of this span.
    pub fn shrink_to_hi(self) -> Span {
        Span::from_bounds(self.file, self.hi(), self.hi())
    }
}

impl std::fmt::Debug for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}..{}", self.file.0, self.lo(), self.hi())
    }
}

impl Serialize for Span {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{self:?}"))
    }
}

/// An identifier: interned name plus its source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ident {
    pub sym: Symbol,
    pub span: Span,
}

impl Ident {
    pub fn new(sym: Symbol, span: Span) -> Self {
        Self { sym, span }
    }
}

/// A value paired with the span it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_takes_the_enclosing_range() {
        let a = Span::from_bounds(FileId(1), 4, 10);
        let b = Span::from_bounds(FileId(1), 8, 20);
        let joined = a.to(b);
        assert_eq!(joined.lo(), 4);
        assert_eq!(joined.hi(), 20);
        // Order does not matter.
        assert_eq!(b.to(a), joined);
    }

    #[test]
    fn to_with_dummy_keeps_the_real_span() {
        let a = Span::from_bounds(FileId(1), 4, 10);
        assert_eq!(a.to(Span::DUMMY), a);
        assert_eq!(Span::DUMMY.to(a), a);
    }

    #[test]
    #[should_panic(expected = "[ICE]")]
    fn to_across_files_ices() {
        let a = Span::from_bounds(FileId(1), 0, 1);
        let b = Span::from_bounds(FileId(2), 0, 1);
        let _ = a.to(b);
    }

    #[test]
    fn dummy_span_is_file_zero() {
        assert_eq!(Span::DUMMY.file, FileId(0));
        assert!(Span::DUMMY.is_dummy());
        assert_eq!(Span::DUMMY.len(), 0);
    }

    #[test]
    fn debug_format_is_file_and_byte_range() {
        insta::assert_snapshot!(
            format!("{:?}", Span::from_bounds(FileId(1), 4, 10)),
            @"1:4..10"
        );
    }
}
