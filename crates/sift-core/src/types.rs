//! Core types for lint violations and corrections.

use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use sift_syntax::{LineIndex, Position, SyntaxTree};

/// Severity level for lint violations, ordered `style < warning < error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Stylistic nit, lowest rank.
    Style,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Style => write!(f, "style"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Resolved source location of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Byte offset in the original text.
    pub position: Position,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl Location {
    /// Resolves a position through the file's line index.
    #[must_use]
    pub fn resolve(position: Position, index: &LineIndex) -> Self {
        let (line, column) = index.location(position);
        Self {
            position,
            line,
            column,
        }
    }
}

/// A lint violation found during detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Rule code (e.g. "SF001").
    pub code: String,
    /// Rule identifier (e.g. "redundant-nil-coalescing").
    pub rule: String,
    /// Severity after configuration overrides.
    pub severity: Severity,
    /// Where the pattern matched.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Whether the owning rule can rewrite this construct away.
    pub correctable: bool,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            correctable: false,
        }
    }

    /// Marks the violation as correctable by its rule.
    #[must_use]
    pub fn correctable(mut self, correctable: bool) -> Self {
        self.correctable = correctable;
        self
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {} [{}] {}",
            self.location.line, self.location.column, self.severity, self.code, self.message
        )
    }
}

/// Result of running a rule's rewriter over a file.
#[derive(Debug, Clone)]
pub struct CorrectionResult {
    /// The rewritten tree. Shares arena entries with the original for
    /// untouched subtrees.
    pub tree: SyntaxTree,
    /// Post-removal boundary positions, in source order. One entry per
    /// correction performed.
    pub corrections: Vec<Position>,
}

impl CorrectionResult {
    /// True when the rewriter changed nothing.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.corrections.is_empty()
    }

    /// Serializes the corrected tree back into source text.
    #[must_use]
    pub fn text(&self) -> String {
        self.tree.text()
    }
}

/// Converts a [`Violation`] to a miette diagnostic for rich display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[label("{label}")]
    span: SourceSpan,
    label: String,
}

impl From<&Violation> for ViolationDiagnostic {
    fn from(violation: &Violation) -> Self {
        Self {
            message: format!("[{}] {}", violation.code, violation.message),
            span: SourceSpan::from((violation.location.position.offset(), 0)),
            label: violation.rule.clone(),
        }
    }
}
