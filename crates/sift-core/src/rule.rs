//! Rule contracts: descriptions, examples, traits, and capability records.

use crate::suppression::SuppressedRegions;
use crate::types::{CorrectionResult, Severity};
use sift_syntax::{Position, SourceFile};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Category a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleCategory {
    /// Encourages idiomatic constructs.
    Idiomatic,
    /// Flags likely bugs.
    Lint,
    /// Naming and formatting conventions.
    Style,
    /// Flags constructs with avoidable cost.
    Performance,
}

/// A source snippet in a rule's self-test contract.
///
/// Triggering examples mark expected violation positions with
/// [`crate::conformance::VIOLATION_MARKER`].
#[derive(Debug, Clone)]
pub struct Example {
    /// The example source, possibly containing position markers.
    pub code: String,
}

impl Example {
    /// Creates an example.
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

/// A before/after pair the rule's rewriter must reproduce exactly.
///
/// Markers in `before` pin the expected correction positions; `after`
/// is the exact serialized output, trivia included.
#[derive(Debug, Clone)]
pub struct CorrectionExample {
    /// Input source, possibly with correction-position markers.
    pub before: String,
    /// Expected output after rewriting.
    pub after: String,
}

impl CorrectionExample {
    /// Creates a correction example.
    pub fn new(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
        }
    }
}

/// Static metadata and self-test contract for a rule.
#[derive(Debug, Clone)]
pub struct RuleDescription {
    /// Stable kebab-case identifier (e.g. "redundant-nil-coalescing").
    pub identifier: &'static str,
    /// Short code (e.g. "SF001").
    pub code: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// One-line description; doubles as the violation message.
    pub description: &'static str,
    /// Category.
    pub category: RuleCategory,
    /// Severity before configuration overrides.
    pub default_severity: Severity,
    /// Examples that must produce no violations.
    pub non_triggering: Vec<Example>,
    /// Examples that must produce exactly their marked violations.
    pub triggering: Vec<Example>,
    /// Before/after pairs for rules with a rewriter.
    pub corrections: Vec<CorrectionExample>,
}

/// Detection half of a rule.
///
/// Detection is a pure function over the file's tree: no I/O, no shared
/// state, deterministic output in source order.
pub trait Rule: Send + Sync {
    /// The rule's metadata and example contract.
    fn description(&self) -> RuleDescription;

    /// Scans the file and returns violation positions in source order.
    fn detect(&self, file: &SourceFile) -> Vec<Position>;
}

/// Rewriting half, for rules that can remove the construct they flag.
pub trait Correcting: Rule {
    /// Rebuilds the tree without the violating constructs.
    ///
    /// A match whose span lies entirely inside a suppressed region is
    /// left as-is and records no correction. Rewriting is idempotent:
    /// correcting the corrected tree again yields no further corrections.
    fn correct(&self, file: &SourceFile, suppressed: &SuppressedRegions) -> CorrectionResult;
}

type DetectFn = dyn Fn(&SourceFile) -> Vec<Position> + Send + Sync;
type CorrectFn = dyn Fn(&SourceFile, &SuppressedRegions) -> CorrectionResult + Send + Sync;

/// Capability record for a registered rule.
///
/// Built once at registration time from a [`Rule`] (and optionally a
/// [`Correcting`]) implementation; dispatch afterwards goes through the
/// record, not through downcasting.
pub struct RuleHandle {
    description: RuleDescription,
    detect: Arc<DetectFn>,
    correct: Option<Arc<CorrectFn>>,
}

impl RuleHandle {
    /// Wraps a detection-only rule.
    pub fn new<R: Rule + 'static>(rule: R) -> Self {
        let description = rule.description();
        let rule = Arc::new(rule);
        Self {
            description,
            detect: Arc::new(move |file| rule.detect(file)),
            correct: None,
        }
    }

    /// Wraps a rule that can also correct.
    pub fn correcting<R: Correcting + 'static>(rule: R) -> Self {
        let description = rule.description();
        let rule = Arc::new(rule);
        let detector = Arc::clone(&rule);
        Self {
            description,
            detect: Arc::new(move |file| detector.detect(file)),
            correct: Some(Arc::new(move |file, suppressed| {
                rule.correct(file, suppressed)
            })),
        }
    }

    /// The rule's metadata.
    #[must_use]
    pub fn description(&self) -> &RuleDescription {
        &self.description
    }

    /// The rule's stable identifier.
    #[must_use]
    pub fn identifier(&self) -> &'static str {
        self.description.identifier
    }

    /// True when the rule carries a rewriter.
    #[must_use]
    pub fn is_correctable(&self) -> bool {
        self.correct.is_some()
    }

    /// Runs detection.
    #[must_use]
    pub fn detect(&self, file: &SourceFile) -> Vec<Position> {
        (self.detect.as_ref())(file)
    }

    /// Runs the rewriter, if any.
    #[must_use]
    pub fn correct(
        &self,
        file: &SourceFile,
        suppressed: &SuppressedRegions,
    ) -> Option<CorrectionResult> {
        self.correct.as_ref().map(|f| (f.as_ref())(file, suppressed))
    }
}

impl std::fmt::Debug for RuleHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleHandle")
            .field("identifier", &self.description.identifier)
            .field("correctable", &self.is_correctable())
            .finish_non_exhaustive()
    }
}

/// Errors from registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Two rules claimed the same identifier.
    #[error("duplicate rule identifier {0:?}")]
    DuplicateIdentifier(&'static str),
}

/// Identifier-keyed rule collection.
///
/// Iteration order is the identifier order, so output across rules is
/// deterministic.
#[derive(Debug, Default)]
pub struct Registry {
    rules: BTreeMap<&'static str, RuleHandle>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule handle under its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateIdentifier`] if the identifier
    /// is already taken.
    pub fn register(&mut self, handle: RuleHandle) -> Result<(), RegistryError> {
        let identifier = handle.identifier();
        if self.rules.contains_key(identifier) {
            return Err(RegistryError::DuplicateIdentifier(identifier));
        }
        self.rules.insert(identifier, handle);
        Ok(())
    }

    /// Looks up a rule by identifier.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&RuleHandle> {
        self.rules.get(identifier)
    }

    /// Iterates the registered handles in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &RuleHandle> {
        self.rules.values()
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestRule;

    impl Rule for TestRule {
        fn description(&self) -> RuleDescription {
            RuleDescription {
                identifier: "test-rule",
                code: "T001",
                name: "Test Rule",
                description: "a rule for tests",
                category: RuleCategory::Lint,
                default_severity: Severity::Warning,
                non_triggering: Vec::new(),
                triggering: Vec::new(),
                corrections: Vec::new(),
            }
        }

        fn detect(&self, _file: &SourceFile) -> Vec<Position> {
            vec![Position(0)]
        }
    }

    #[test]
    fn detection_only_handles_have_no_corrector() {
        let handle = RuleHandle::new(TestRule);
        assert!(!handle.is_correctable());
        assert_eq!(handle.identifier(), "test-rule");

        let file = SourceFile::parse("let a = 1\n").unwrap();
        assert_eq!(handle.detect(&file), vec![Position(0)]);
        assert!(handle
            .correct(&file, &SuppressedRegions::default())
            .is_none());
    }

    #[test]
    fn registry_rejects_duplicates() {
        let mut registry = Registry::new();
        registry.register(RuleHandle::new(TestRule)).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(matches!(
            registry.register(RuleHandle::new(TestRule)),
            Err(RegistryError::DuplicateIdentifier("test-rule"))
        ));
        assert!(registry.get("test-rule").is_some());
        assert!(registry.get("missing").is_none());
    }
}
