//! # sift-syntax
//!
//! Source-accurate token and syntax-tree model for the sift linter.
//!
//! This crate owns everything between raw source text and the tree the
//! lint engine consumes:
//!
//! - [`Position`] / [`Span`] byte-offset locations
//! - [`LineIndex`] offset-to-line/column conversion
//! - [`Token`] with leading/trailing trivia, and the closed [`TokenKind`] tag set
//! - [`SyntaxTree`], an arena of [`Node`]s addressed by [`NodeId`]
//! - a lexer and a minimal recursive-descent parser covering the Swift
//!   declaration and expression subset the bundled rules exercise
//!
//! Trees are immutable once built. Rewriting allocates new arena entries
//! for changed subtrees and reuses ids for untouched ones; serializing a
//! tree with [`SyntaxTree::text`] concatenates token trivia and text and
//! round-trips the original source exactly.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod lexer;
mod line_index;
mod parser;
mod position;
mod source_file;
mod token;
mod tree;

pub use lexer::ParseError;
pub use line_index::LineIndex;
pub use parser::parse;
pub use position::{Position, Span};
pub use source_file::SourceFile;
pub use token::{Keyword, Token, TokenKind};
pub use tree::{Element, Node, NodeId, NodeKind, Nodes, SyntaxTree, Tokens};
