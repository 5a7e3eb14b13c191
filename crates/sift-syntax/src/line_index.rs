//! Offset to line/column conversion.

use crate::position::{Position, Span};
use std::sync::Arc;

/// Precomputed line-start table for one file's text.
///
/// Built once per file and shared read-only between the detection and
/// rewriting passes.
#[derive(Debug, Clone)]
pub struct LineIndex {
    source: Arc<str>,
    /// Byte offset of each line start.
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Builds the index for `source`.
    pub fn new(source: impl Into<Arc<str>>) -> Self {
        let source = source.into();
        let mut line_starts = vec![0];
        for (i, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    /// Converts a position to 1-based line and column.
    #[must_use]
    pub fn location(&self, position: Position) -> (usize, usize) {
        let offset = position.offset().min(self.source.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };
        let line_start = self.line_starts[line];
        let column = self.source[line_start..offset].chars().count();
        (line + 1, column + 1)
    }

    /// Returns the 1-based line containing `position`.
    #[must_use]
    pub fn line_of(&self, position: Position) -> usize {
        self.location(position).0
    }

    /// Number of lines in the file (a trailing newline opens a final
    /// empty line).
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Span of the 1-based `line`, including its terminating newline.
    ///
    /// Out-of-range lines yield an empty span at end of file.
    #[must_use]
    pub fn line_span(&self, line: usize) -> Span {
        let len = self.source.len();
        let start = line
            .checked_sub(1)
            .and_then(|idx| self.line_starts.get(idx).copied())
            .unwrap_or(len);
        let end = self.line_starts.get(line).copied().unwrap_or(len);
        Span::new(start, end)
    }

    /// End-of-file position.
    #[must_use]
    pub fn end_of_file(&self) -> Position {
        Position(self.source.len())
    }
}
