//! Byte-offset positions and half-open spans.

use serde::{Deserialize, Serialize};

/// An absolute byte offset into a file's original text.
///
/// Positions locate constructs in the source; they carry no semantic
/// identity and are totally ordered.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Position(pub usize);

impl Position {
    /// Returns the raw byte offset.
    #[must_use]
    pub fn offset(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A half-open `[start, end)` range of positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive start offset.
    pub start: Position,
    /// Exclusive end offset.
    pub end: Position,
}

impl Span {
    /// Creates a span from byte offsets.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {start} past end {end}");
        Self {
            start: Position(start),
            end: Position(end),
        }
    }

    /// Length of the span in bytes.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.0 - self.start.0
    }

    /// Returns true for a zero-length span.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Returns true if `other` lies entirely within this span.
    ///
    /// Partial overlap does not count as containment.
    #[must_use]
    pub fn contains(self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns true if `position` falls inside the span.
    #[must_use]
    pub fn contains_position(self, position: Position) -> bool {
        self.start <= position && position < self.end
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
