//! Registry of source files and span-to-location resolution.
//!
//! Files are registered up front by path (before their contents are
//! lexed); the lexer later installs the contents together with the
//! newline offset table it built. Span resolution is a binary search
//! into that table.

use junco_core::ice;

use crate::span::{FileId, Span};

/// Line/column location of a span start, plus the line's slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Loc<'a> {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based byte column within the line.
    pub col: usize,
    pub line_str: &'a str,
}

#[derive(Debug, Clone, Default)]
struct SourceFile {
    path: String,
    /// Installed by `set_file` after lexing.
    src: Option<String>,
    /// Byte offsets of every `\n` in `src`, ascending.
    newlines: Vec<u32>,
}

/// Owns all source file contents for a session.
#[derive(Debug, Clone)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        // Index 0 backs `Span::DUMMY`.
        Self {
            files: vec![SourceFile {
                path: "<synthetic>".into(),
                src: Some(String::new()),
                newlines: Vec::new(),
            }],
        }
    }

    /// Register a source file by path, without contents yet.
    pub fn register_source(&mut self, path: impl Into<String>) -> FileId {
        let id = FileId(self.files.len() as u32);
        self.files.push(SourceFile {
            path: path.into(),
            src: None,
            newlines: Vec::new(),
        });
        id
    }

    /// Install the contents and newline table produced by the lexer.
    pub fn set_file(&mut self, file: FileId, src: String, newlines: Vec<u32>) {
        let entry = self.file_mut(file);
        entry.src = Some(src);
        entry.newlines = newlines;
    }

    pub fn path(&self, file: FileId) -> &str {
        &self.file(file).path
    }

    /// Full source of a file. ICEs if contents were never installed.
    pub fn source(&self, file: FileId) -> &str {
        match &self.file(file).src {
            Some(src) => src,
            None => ice!("SourceMap::source: file {:?} has no contents", file),
        }
    }

    /// Number of registered files, the synthetic slot excluded.
    pub fn len(&self) -> usize {
        self.files.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn files(&self) -> impl Iterator<Item = FileId> {
        (1..self.files.len() as u32).map(FileId)
    }

    pub fn lines_count(&self, file: FileId) -> usize {
        self.file(file).newlines.len() + 1
    }

    /// Slice of line `index` (zero-based), without its terminating newline.
    pub fn line(&self, file: FileId, index: usize) -> &str {
        let entry = self.file(file);
        let src = self.source(file);
        let start = if index == 0 {
            0
        } else {
            match entry.newlines.get(index - 1) {
                Some(&nl) => nl as usize + 1,
                None => ice!("SourceMap::line: line {index} out of range for {:?}", file),
            }
        };
        let end = entry
            .newlines
            .get(index)
            .map(|&nl| nl as usize)
            .unwrap_or(src.len());
        &src[start..end]
    }

    /// The source text the span covers.
    pub fn slice_by_span(&self, span: Span) -> &str {
        let src = self.source(span.file);
        &src[span.lo() as usize..span.hi() as usize]
    }

    /// Resolve a span start to its line and column.
    pub fn lookup(&self, span: Span) -> Loc<'_> {
        let entry = self.file(span.file);
        let pos = span.lo();
        // `partition_point` gives the number of newlines strictly before
        // `pos`, which is exactly the zero-based line index.
        let line = entry.newlines.partition_point(|&nl| nl < pos);
        let line_start = if line == 0 {
            0
        } else {
            entry.newlines[line - 1] + 1
        };
        Loc {
            line,
            col: (pos - line_start) as usize,
            line_str: self.line(span.file, line),
        }
    }

    fn file(&self, file: FileId) -> &SourceFile {
        match self.files.get(file.0 as usize) {
            Some(entry) => entry,
            None => ice!("SourceMap: unknown file id {:?}", file),
        }
    }

    fn file_mut(&mut self, file: FileId) -> &mut SourceFile {
        match self.files.get_mut(file.0 as usize) {
            Some(entry) => entry,
            None => ice!("SourceMap: unknown file id {:?}", file),
        }
    }
}

impl Default for SourceMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_with(src: &str) -> (SourceMap, FileId) {
        let mut map = SourceMap::new();
        let file = map.register_source("main.jc");
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
    fn register_assigns_sequential_ids_from_one() {
        let mut map = SourceMap::new();
        assert_eq!(map.register_source("a.jc"), FileId(1));
        assert_eq!(map.register_source("b.jc"), FileId(2));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn line_lookup() {
        let (map, file) = map_with("first\nsecond\nthird");
        assert_eq!(map.lines_count(file), 3);
        assert_eq!(map.line(file, 0), "first");
        assert_eq!(map.line(file, 1), "second");
        assert_eq!(map.line(file, 2), "third");
    }

    #[test]
    fn span_to_loc() {
        let (map, file) = map_with("first\nsecond\nthird");
        // `c` of "second": offset 6 + 2.
        let loc = map.lookup(Span::from_bounds(file, 8, 9));
        assert_eq!(loc.line, 1);
        assert_eq!(loc.col, 2);
        assert_eq!(loc.line_str, "second");
    }

    #[test]
    fn loc_at_line_starts() {
        let (map, file) = map_with("ab\ncd\n");
        assert_eq!(map.lookup(Span::from_bounds(file, 0, 1)).line, 0);
        assert_eq!(map.lookup(Span::from_bounds(file, 3, 4)).line, 1);
        assert_eq!(map.lookup(Span::from_bounds(file, 3, 4)).col, 0);
        // Position of the newline itself belongs to its line.
        assert_eq!(map.lookup(Span::from_bounds(file, 2, 3)).line, 0);
    }

    #[test]
    fn slice_by_span() {
        let (map, file) = map_with("let x = 42");
        assert_eq!(map.slice_by_span(Span::from_bounds(file, 4, 5)), "x");
        assert_eq!(map.slice_by_span(Span::from_bounds(file, 8, 10)), "42");
    }
}
