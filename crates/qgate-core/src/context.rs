//! Per-file context handed to rules.

use std::path::{Path, PathBuf};

use crate::tree::{Span, SyntaxTree};
use crate::types::Location;

/// One analyzed file: path, raw text and syntax tree.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    /// Path relative to the project root.
    pub path: PathBuf,
    /// Raw file contents.
    pub text: String,
    /// Syntax tree built from `text`.
    pub tree: SyntaxTree,
}

impl SourceUnit {
    /// Creates a source unit.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>, tree: SyntaxTree) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            tree,
        }
    }

    /// Borrows this unit as a rule context.
    #[must_use]
    pub fn context(&self) -> FileContext<'_> {
        FileContext {
            path: &self.path,
            content: &self.text,
            tree: &self.tree,
        }
    }
}

/// Context provided to rules while one file is walked.
#[derive(Debug, Clone, Copy)]
pub struct FileContext<'a> {
    /// Path relative to the project root.
    pub path: &'a Path,
    /// File contents.
    pub content: &'a str,
    /// The file's syntax tree.
    pub tree: &'a SyntaxTree,
}

impl FileContext<'_> {
    /// Builds a violation location at the start of `span`.
    #[must_use]
    pub fn location(&self, span: Span) -> Location {
        self.location_at(span.line, span.column)
    }

    /// Builds a violation location at an explicit position.
    #[must_use]
    pub fn location_at(&self, line: usize, column: usize) -> Location {
        let offset = self.offset_for(line, column);
        let length = self
            .content
            .lines()
            .nth(line.saturating_sub(1))
            .map_or(0, |l| l.len().saturating_sub(column.saturating_sub(1)));
        Location::new(self.path.to_path_buf(), line, column).with_span(offset, length)
    }

    /// Calculates byte offset for a given line and column.
    ///
    /// # Arguments
    ///
    /// * `line` - 1-indexed line number
    /// * `column` - 1-indexed column number
    ///
    /// # Returns
    ///
    /// Byte offset from the start of the file, or 0 if out of bounds.
    #[must_use]
    pub fn offset_for(&self, line: usize, column: usize) -> usize {
        if line == 0 {
            return 0;
        }

        let mut offset = 0;
        for (i, line_content) in self.content.lines().enumerate() {
            if i + 1 == line {
                return offset + column.saturating_sub(1);
            }
            offset += line_content.len() + 1; // +1 for newline
        }

        offset
    }

    /// Number of lines in the file.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_calculation() {
        let unit = SourceUnit::new("Test.java", "line1\nline2\nline3", SyntaxTree::new());
        let ctx = unit.context();

        assert_eq!(ctx.offset_for(1, 1), 0); // Start of line 1
        assert_eq!(ctx.offset_for(2, 1), 6); // Start of line 2
        assert_eq!(ctx.offset_for(2, 3), 8); // "ne" in line2
    }

    #[test]
    fn location_spans_rest_of_line() {
        let unit = SourceUnit::new("Test.java", "class A {\n    void m() {}\n}", SyntaxTree::new());
        let loc = unit.context().location_at(2, 5);

        assert_eq!(loc.file, PathBuf::from("Test.java"));
        assert_eq!(loc.offset, 14);
        assert_eq!(loc.length, "void m() {}".len());
    }
}
