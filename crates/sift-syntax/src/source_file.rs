//! A parsed file, bundled with its text and line index.

use crate::lexer::ParseError;
use crate::line_index::LineIndex;
use crate::parser::parse;
use crate::tree::SyntaxTree;
use std::sync::Arc;

/// One file's source text, syntax tree, and line index.
///
/// This is the per-file record handed to rules. It is immutable; a
/// correction pass produces a fresh tree rather than touching this one.
#[derive(Debug, Clone)]
pub struct SourceFile {
    source: Arc<str>,
    tree: SyntaxTree,
    line_index: LineIndex,
}

impl SourceFile {
    /// Parses `source` and builds the line index.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the text cannot be lexed or grouped
    /// into a tree.
    pub fn parse(source: impl Into<Arc<str>>) -> Result<Self, ParseError> {
        let source = source.into();
        let tree = parse(&source)?;
        let line_index = LineIndex::new(Arc::clone(&source));
        Ok(Self {
            source,
            tree,
            line_index,
        })
    }

    /// The original text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The parsed tree.
    #[must_use]
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// The offset-to-line/column converter for this file.
    #[must_use]
    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_text() {
        let file = SourceFile::parse("var myVar: Int? = nil; myVar ?? nil\n").unwrap();
        assert_eq!(file.tree().text(), file.source());
    }

    #[test]
    fn parse_errors_propagate() {
        assert!(SourceFile::parse("let x = @").is_err());
    }
}
