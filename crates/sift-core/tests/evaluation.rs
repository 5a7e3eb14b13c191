//! Integration test: a rule evaluated end-to-end through the engine.
//!
//! Uses a small inline rule so the test exercises exactly the framework:
//! registration, suppression resolution, severity overrides, and ordered
//! violation output.

use sift_core::{
    Registry, Rule, RuleCategory, RuleConfig, RuleDescription, RuleEvaluation, RuleHandle,
    Severity,
};
use sift_syntax::{Position, SourceFile, TokenKind};

/// Flags every integer literal in the file.
struct NoIntegerLiterals;

impl Rule for NoIntegerLiterals {
    fn description(&self) -> RuleDescription {
        RuleDescription {
            identifier: "no-integer-literals",
            code: "T100",
            name: "No Integer Literals",
            description: "integer literals are banned in this test",
            category: RuleCategory::Lint,
            default_severity: Severity::Style,
            non_triggering: Vec::new(),
            triggering: Vec::new(),
            corrections: Vec::new(),
        }
    }

    fn detect(&self, file: &SourceFile) -> Vec<Position> {
        file.tree()
            .tokens()
            .filter(|token| token.kind == TokenKind::IntegerLiteral)
            .map(sift_syntax::Token::position)
            .collect()
    }
}

fn parse(source: &str) -> SourceFile {
    SourceFile::parse(source).expect("test source should parse")
}

// ── Detection through the engine ──

#[test]
fn violations_come_out_ordered_with_rule_metadata() {
    let handle = RuleHandle::new(NoIntegerLiterals);
    let file = parse("let a = 1; let b = 22\n");

    let violations = RuleEvaluation::new(&file, &handle, None).violations();
    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0].code, "T100");
    assert_eq!(violations[0].rule, "no-integer-literals");
    assert_eq!(violations[0].severity, Severity::Style);
    assert!(!violations[0].correctable);
    assert!(violations[0].location.position < violations[1].location.position);
    assert_eq!(violations[0].location.line, 1);
    assert_eq!(violations[0].location.column, 9);
}

#[test]
fn suppressed_positions_are_silenced() {
    let handle = RuleHandle::new(NoIntegerLiterals);
    let file = parse(
        "\
let a = 1 // sift: disable-line(no-integer-literals)
let b = 2
",
    );

    let violations = RuleEvaluation::new(&file, &handle, None).violations();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].location.line, 2);
}

#[test]
fn bracketed_suppression_covers_a_region() {
    let handle = RuleHandle::new(NoIntegerLiterals);
    let file = parse(
        "\
// sift: disable(all)
let a = 1
let b = 2
// sift: enable(all)
let c = 3
",
    );

    let violations = RuleEvaluation::new(&file, &handle, None).violations();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].location.line, 5);
}

// ── Configuration ──

#[test]
fn severity_override_applies() {
    let handle = RuleHandle::new(NoIntegerLiterals);
    let file = parse("let a = 1\n");
    let config = RuleConfig::parse("severity = \"error\"").expect("config should parse");

    let violations = RuleEvaluation::new(&file, &handle, Some(&config)).violations();
    assert_eq!(violations[0].severity, Severity::Error);
}

#[test]
fn disabled_rules_produce_nothing() {
    let handle = RuleHandle::new(NoIntegerLiterals);
    let file = parse("let a = 1\n");
    let config = RuleConfig::parse("enabled = false").expect("config should parse");

    let evaluation = RuleEvaluation::new(&file, &handle, Some(&config));
    assert!(evaluation.violations().is_empty());
    assert!(evaluation.corrections().is_none());
}

// ── Registry ──

#[test]
fn registry_round_trips_handles() {
    let mut registry = Registry::new();
    registry
        .register(RuleHandle::new(NoIntegerLiterals))
        .expect("first registration succeeds");

    let handle = registry
        .get("no-integer-literals")
        .expect("rule is registered");
    let file = parse("let a = 7\n");
    assert_eq!(RuleEvaluation::new(&file, handle, None).violations().len(), 1);
}
