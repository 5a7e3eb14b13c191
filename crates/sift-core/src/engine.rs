//! Single-file rule evaluation.

use crate::config::RuleConfig;
use crate::rule::RuleHandle;
use crate::suppression::SuppressedRegions;
use crate::types::{CorrectionResult, Location, Severity, Violation};
use sift_syntax::SourceFile;
use tracing::debug;

/// One rule applied to one file.
///
/// The suppressed-region set is resolved once at construction and shared
/// by the detection and correction passes, so "this position is silenced"
/// and "this position is excluded from correction" can never disagree.
///
/// Evaluation is synchronous and pure; the types involved are `Send` and
/// `Sync`, so callers are free to evaluate different files on different
/// threads.
pub struct RuleEvaluation<'a> {
    file: &'a SourceFile,
    handle: &'a RuleHandle,
    severity: Severity,
    enabled: bool,
    suppressed: SuppressedRegions,
}

impl<'a> RuleEvaluation<'a> {
    /// Prepares an evaluation, resolving the file's suppressed regions
    /// for this rule.
    #[must_use]
    pub fn new(file: &'a SourceFile, handle: &'a RuleHandle, config: Option<&RuleConfig>) -> Self {
        let suppressed =
            SuppressedRegions::resolve(file.source(), file.line_index(), handle.identifier());
        if !suppressed.is_empty() {
            debug!(
                rule = handle.identifier(),
                regions = suppressed.len(),
                "resolved suppressed regions"
            );
        }
        Self {
            file,
            handle,
            severity: config
                .and_then(|c| c.severity)
                .unwrap_or(handle.description().default_severity),
            enabled: config.map_or(true, RuleConfig::is_enabled),
            suppressed,
        }
    }

    /// Runs detection and returns the surviving violations, ordered by
    /// position and deduplicated.
    #[must_use]
    pub fn violations(&self) -> Vec<Violation> {
        if !self.enabled {
            return Vec::new();
        }
        let description = self.handle.description();
        let mut positions = self.handle.detect(self.file);
        positions.sort_unstable();
        positions.dedup();

        let violations: Vec<Violation> = positions
            .into_iter()
            .filter(|position| !self.suppressed.contains_position(*position))
            .map(|position| {
                Violation::new(
                    description.code,
                    description.identifier,
                    self.severity,
                    Location::resolve(position, self.file.line_index()),
                    description.description,
                )
                .correctable(self.handle.is_correctable())
            })
            .collect();

        debug!(
            rule = description.identifier,
            count = violations.len(),
            "detection finished"
        );
        violations
    }

    /// Runs the rewriter, if the rule has one, against the same
    /// suppressed-region set as detection.
    #[must_use]
    pub fn corrections(&self) -> Option<CorrectionResult> {
        if !self.enabled {
            return None;
        }
        let result = self.handle.correct(self.file, &self.suppressed)?;
        debug!(
            rule = self.handle.identifier(),
            count = result.corrections.len(),
            "correction finished"
        );
        Some(result)
    }

    /// The resolved suppressed-region set shared by both passes.
    #[must_use]
    pub fn suppressed(&self) -> &SuppressedRegions {
        &self.suppressed
    }
}
