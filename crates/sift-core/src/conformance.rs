//! Executable rule-contract harness.
//!
//! Every rule ships non-triggering, triggering, and correction examples
//! in its description; [`verify_rule`] runs them against the rule's own
//! detect/correct functions. A contract violation panics with the
//! example's identity and an expected-vs-actual report, so it surfaces
//! as an ordinary test failure and can never reach lint time.

use crate::engine::RuleEvaluation;
use crate::rule::RuleHandle;
use sift_syntax::{Position, SourceFile};

/// Marks an expected violation (or correction) position inside example
/// code. Stripped before parsing.
pub const VIOLATION_MARKER: char = '»';

/// A marker-free source plus the positions the markers pointed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedSource {
    /// Source with markers removed.
    pub source: String,
    /// Byte positions the markers occupied, in order.
    pub positions: Vec<Position>,
}

/// Splits [`VIOLATION_MARKER`] characters out of example code.
#[must_use]
pub fn strip_markers(code: &str) -> MarkedSource {
    let mut source = String::with_capacity(code.len());
    let mut positions = Vec::new();
    for ch in code.chars() {
        if ch == VIOLATION_MARKER {
            positions.push(Position(source.len()));
        } else {
            source.push(ch);
        }
    }
    MarkedSource { source, positions }
}

/// Runs a rule's complete example contract.
///
/// # Panics
///
/// Panics when any example disagrees with the rule's behavior: a
/// non-triggering example that yields violations, a triggering example
/// whose violations miss the marked positions, or a correction example
/// whose rewritten output differs from its declared "after" text.
pub fn verify_rule(handle: &RuleHandle) {
    let description = handle.description();

    for (index, example) in description.non_triggering.iter().enumerate() {
        let marked = strip_markers(&example.code);
        let file = parse_example(handle, "non-triggering", index, &marked.source);
        let found = violation_positions(handle, &file);
        assert!(
            found.is_empty(),
            "rule {}: non-triggering example {} produced violations at {:?}\nsource:\n{}",
            description.identifier,
            index,
            found,
            marked.source,
        );
    }

    for (index, example) in description.triggering.iter().enumerate() {
        let marked = strip_markers(&example.code);
        assert!(
            !marked.positions.is_empty(),
            "rule {}: triggering example {} has no position markers\nsource:\n{}",
            description.identifier,
            index,
            marked.source,
        );
        let file = parse_example(handle, "triggering", index, &marked.source);
        let found = violation_positions(handle, &file);
        assert_eq!(
            found, marked.positions,
            "rule {}: triggering example {} violations diverge from markers\nsource:\n{}\nexpected: {:?}\nactual:   {:?}",
            description.identifier, index, marked.source, marked.positions, found,
        );
    }

    if !description.corrections.is_empty() {
        assert!(
            handle.is_correctable(),
            "rule {} declares correction examples but has no rewriter",
            description.identifier,
        );
    }
    for (index, example) in description.corrections.iter().enumerate() {
        let marked = strip_markers(&example.before);
        let file = parse_example(handle, "correction", index, &marked.source);
        let evaluation = RuleEvaluation::new(&file, handle, None);
        let Some(result) = evaluation.corrections() else {
            continue;
        };
        let output = result.text();
        assert_eq!(
            output, example.after,
            "rule {}: correction example {} output diverges\nbefore:\n{}\nexpected:\n{}\nactual:\n{}",
            description.identifier, index, marked.source, example.after, output,
        );
        assert_eq!(
            result.corrections, marked.positions,
            "rule {}: correction example {} positions diverge from markers\nbefore:\n{}\nexpected: {:?}\nactual:   {:?}",
            description.identifier, index, marked.source, marked.positions, result.corrections,
        );
    }
}

fn violation_positions(handle: &RuleHandle, file: &SourceFile) -> Vec<Position> {
    RuleEvaluation::new(file, handle, None)
        .violations()
        .iter()
        .map(|violation| violation.location.position)
        .collect()
}

fn parse_example(handle: &RuleHandle, set: &str, index: usize, source: &str) -> SourceFile {
    match SourceFile::parse(source) {
        Ok(file) => file,
        Err(error) => panic!(
            "rule {}: {set} example {index} failed to parse: {error}\nsource:\n{source}",
            handle.identifier(),
        ),
    }
}
