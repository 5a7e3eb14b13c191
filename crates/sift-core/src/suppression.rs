//! Comment directives that disable rule enforcement over source regions.
//!
//! Supported forms:
//!
//! ```text
//! // sift: disable(rule-a, rule-b)
//! ...
//! // sift: enable(rule-a)
//! // sift: disable-line(rule-a)
//! ```
//!
//! `all` matches every rule. A `disable` with no matching `enable` runs
//! to the end of the file. Regions are resolved once per file per rule
//! and shared between the detection and rewriting passes.

use sift_syntax::{LineIndex, Position, Span};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DirectiveKind {
    Disable,
    Enable,
    DisableLine,
}

fn parse_directive(line: &str) -> Option<(DirectiveKind, HashSet<String>)> {
    let comment = &line[line.find("//")?..];
    let body = comment.trim_start_matches('/').trim();
    let rest = body.strip_prefix("sift:")?.trim();

    let (kind, rest) = if let Some(rest) = rest.strip_prefix("disable-line(") {
        (DirectiveKind::DisableLine, rest)
    } else if let Some(rest) = rest.strip_prefix("disable(") {
        (DirectiveKind::Disable, rest)
    } else if let Some(rest) = rest.strip_prefix("enable(") {
        (DirectiveKind::Enable, rest)
    } else {
        return None;
    };

    let close = rest.find(')')?;
    let rules: HashSet<String> = rest[..close]
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if rules.is_empty() {
        return None;
    }
    Some((kind, rules))
}

/// Ordered, disjoint source regions where one rule must not report or
/// correct.
#[derive(Debug, Clone, Default)]
pub struct SuppressedRegions {
    regions: Vec<Span>,
}

impl SuppressedRegions {
    /// Resolves the suppressed regions for `rule` over `source`.
    ///
    /// A `disable` region starts at the beginning of the directive's line
    /// and ends after the matching `enable` directive's line (or at end
    /// of file); `disable-line` covers exactly its own line.
    #[must_use]
    pub fn resolve(source: &str, index: &LineIndex, rule: &str) -> Self {
        let mut regions: Vec<Span> = Vec::new();
        let mut open: Option<usize> = None;

        for (idx, line) in source.lines().enumerate() {
            let line_no = idx + 1;
            let Some((kind, rules)) = parse_directive(line) else {
                continue;
            };
            if !rules.contains(rule) && !rules.contains("all") {
                continue;
            }
            match kind {
                DirectiveKind::DisableLine => {
                    if open.is_none() {
                        regions.push(index.line_span(line_no));
                    }
                }
                DirectiveKind::Disable => {
                    if open.is_none() {
                        open = Some(line_no);
                    }
                }
                DirectiveKind::Enable => {
                    if let Some(start_line) = open.take() {
                        let start = index.line_span(start_line).start;
                        let end = index.line_span(line_no).end;
                        regions.push(Span {
                            start,
                            end,
                        });
                    }
                }
            }
        }
        if let Some(start_line) = open {
            regions.push(Span {
                start: index.line_span(start_line).start,
                end: index.end_of_file(),
            });
        }

        Self {
            regions: normalize(regions),
        }
    }

    /// True if `span` lies entirely inside some region.
    #[must_use]
    pub fn contains(&self, span: Span) -> bool {
        self.regions.iter().any(|region| region.contains(span))
    }

    /// True if `position` falls inside some region.
    #[must_use]
    pub fn contains_position(&self, position: Position) -> bool {
        self.regions
            .iter()
            .any(|region| region.contains_position(position))
    }

    /// The resolved regions, ordered and disjoint.
    #[must_use]
    pub fn regions(&self) -> &[Span] {
        &self.regions
    }

    /// Number of regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// True when nothing is suppressed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Sorts regions and merges any that touch or overlap.
fn normalize(mut regions: Vec<Span>) -> Vec<Span> {
    regions.sort_by_key(|span| span.start);
    let mut merged: Vec<Span> = Vec::with_capacity(regions.len());
    for region in regions {
        match merged.last_mut() {
            Some(last) if region.start <= last.end => {
                last.end = last.end.max(region.end);
            }
            _ => merged.push(region),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULE: &str = "redundant-nil-coalescing";

    fn resolve(source: &str) -> SuppressedRegions {
        let index = LineIndex::new(source);
        SuppressedRegions::resolve(source, &index, RULE)
    }

    #[test]
    fn no_directives_means_no_regions() {
        let regions = resolve("let a = b ?? nil\n");
        assert!(regions.is_empty());
    }

    #[test]
    fn bracketed_region_covers_both_directive_lines() {
        let source = "\
// sift: disable(redundant-nil-coalescing)
let a = b ?? nil
// sift: enable(redundant-nil-coalescing)
let c = d ?? nil
";
        let regions = resolve(source);
        assert_eq!(regions.len(), 1);
        let region = regions.regions()[0];
        assert_eq!(region.start, Position(0));

        let inside = source.find("b ?? nil").unwrap();
        let outside = source.find("d ?? nil").unwrap();
        assert!(regions.contains_position(Position(inside)));
        assert!(!regions.contains_position(Position(outside)));
    }

    #[test]
    fn unmatched_disable_runs_to_end_of_file() {
        let source = "// sift: disable(redundant-nil-coalescing)\nlet a = b ?? nil\n";
        let regions = resolve(source);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions.regions()[0], Span::new(0, source.len()));
    }

    #[test]
    fn disable_line_covers_only_its_line() {
        let source = "let a = b ?? nil // sift: disable-line(redundant-nil-coalescing)\nlet c = d ?? nil\n";
        let regions = resolve(source);
        assert_eq!(regions.len(), 1);
        assert!(regions.contains_position(Position(8)));
        let second = source.find("d ?? nil").unwrap();
        assert!(!regions.contains_position(Position(second)));
    }

    #[test]
    fn other_rules_are_unaffected() {
        let source = "// sift: disable(type-name)\nlet a = b ?? nil\n";
        assert!(resolve(source).is_empty());

        let source = "// sift: disable(all)\nlet a = b ?? nil\n";
        assert_eq!(resolve(source).len(), 1);
    }

    #[test]
    fn partial_overlap_is_not_contained() {
        let source = "// sift: disable(redundant-nil-coalescing)\nab\n// sift: enable(redundant-nil-coalescing)\ncd\n";
        let regions = resolve(source);
        let region = regions.regions()[0];
        // a span straddling the region boundary stays unsuppressed
        assert!(!regions.contains(Span::new(region.start.offset(), region.end.offset() + 1)));
        assert!(regions.contains(Span::new(region.start.offset() + 1, region.end.offset())));
    }

    #[test]
    fn overlapping_regions_merge() {
        let spans = normalize(vec![Span::new(10, 20), Span::new(0, 12), Span::new(30, 40)]);
        assert_eq!(spans, vec![Span::new(0, 20), Span::new(30, 40)]);
    }

    #[test]
    fn malformed_directives_are_ignored() {
        assert!(resolve("// sift: disable()\nlet a = b ?? nil\n").is_empty());
        assert!(resolve("// sift: disable redundant-nil-coalescing\n").is_empty());
        assert!(resolve("// nothing here\n").is_empty());
    }
}
