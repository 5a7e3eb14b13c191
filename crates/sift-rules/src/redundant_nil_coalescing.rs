//! Rule that flags and removes `?? nil`.
//!
//! The nil-coalescing operator only evaluates its right-hand side when
//! the left-hand side is nil, so coalescing to `nil` can never change the
//! result. Detection matches the operator token adjacency (`??` directly
//! followed by `nil`, spaced or unspaced); the rewriter drops the
//! trailing operator/literal pair from the enclosing expression sequence.
//!
//! # Suppression
//!
//! - `// sift: disable(redundant-nil-coalescing)` / `enable(...)`
//! - `// sift: disable-line(redundant-nil-coalescing)`

use sift_core::{
    Correcting, CorrectionExample, CorrectionResult, Example, Rule, RuleCategory, RuleDescription,
    RuleHandle, Severity, SuppressedRegions,
};
use sift_syntax::{Element, Node, NodeId, NodeKind, Position, SourceFile, SyntaxTree, Token};
use tracing::debug;

/// Rule code for redundant-nil-coalescing.
pub const CODE: &str = "SF001";

/// Rule identifier for redundant-nil-coalescing.
pub const NAME: &str = "redundant-nil-coalescing";

/// Flags `?? nil` and rewrites it away.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedundantNilCoalescing;

impl RedundantNilCoalescing {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Wraps the rule in a registration handle.
    #[must_use]
    pub fn handle() -> RuleHandle {
        RuleHandle::correcting(Self::new())
    }
}

impl Rule for RedundantNilCoalescing {
    fn description(&self) -> RuleDescription {
        RuleDescription {
            identifier: NAME,
            code: CODE,
            name: "Redundant Nil Coalescing",
            description: "nil coalescing operator is only evaluated if the lhs is nil; \
                          coalescing with nil as rhs is redundant",
            category: RuleCategory::Idiomatic,
            default_severity: Severity::Warning,
            non_triggering: vec![
                Example::new("var myVar: Int?; myVar ?? 0\n"),
                Example::new("var myVar: Int?; myVar ?? (nil)\n"),
            ],
            triggering: vec![
                Example::new("var myVar: Int? = nil; myVar »?? nil\n"),
                Example::new("var myVar: Int? = nil; myVar »??nil\n"),
                Example::new("var a: Int? = nil; var b: Int? = nil; a ?? b »?? nil\n"),
            ],
            corrections: vec![
                CorrectionExample::new(
                    "var myVar: Int? = nil; let foo = myVar» ?? nil\n",
                    "var myVar: Int? = nil; let foo = myVar\n",
                ),
                CorrectionExample::new(
                    "let a = x» ?? nil; let b = y» ?? nil\n",
                    "let a = x; let b = y\n",
                ),
                CorrectionExample::new(
                    "// sift: disable(redundant-nil-coalescing)\nlet foo = myVar ?? nil\n",
                    "// sift: disable(redundant-nil-coalescing)\nlet foo = myVar ?? nil\n",
                ),
            ],
        }
    }

    fn detect(&self, file: &SourceFile) -> Vec<Position> {
        let mut violations = Vec::new();
        let mut previous: Option<&Token> = None;
        for token in file.tree().tokens() {
            if let Some(prev) = previous {
                if prev.is_nil_coalescing() && token.is_nil_keyword() {
                    violations.push(prev.position());
                }
            }
            previous = Some(token);
        }
        violations
    }
}

impl Correcting for RedundantNilCoalescing {
    fn correct(&self, file: &SourceFile, suppressed: &SuppressedRegions) -> CorrectionResult {
        let mut tree = file.tree().clone();
        let mut rewriter = Rewriter {
            suppressed,
            corrections: Vec::new(),
        };
        let root_id = tree.root();
        let root = rewriter.rewrite(&mut tree, root_id);
        tree.set_root(root);
        rewriter.corrections.sort_unstable();
        debug!(count = rewriter.corrections.len(), "removed redundant fallbacks");
        CorrectionResult {
            tree,
            corrections: rewriter.corrections,
        }
    }
}

struct Rewriter<'a> {
    suppressed: &'a SuppressedRegions,
    corrections: Vec<Position>,
}

impl Rewriter<'_> {
    /// Rewrites one node, returning its (possibly new) id. Untouched
    /// subtrees keep their original ids.
    fn rewrite(&mut self, tree: &mut SyntaxTree, id: NodeId) -> NodeId {
        let node = tree.node(id).clone();
        let mut children = node.children;
        let mut changed = false;

        if node.kind == NodeKind::ExprSequence && !self.is_suppressed(tree, id) {
            // reapply the tail match until it no longer fits, so chains
            // like `a ?? nil ?? nil` fully reduce in one pass
            while ends_with_redundant_fallback(tree, &children) {
                children.truncate(children.len() - 2);
                if let Some(tail) = children.last_mut() {
                    tree.strip_trailing_trivia(tail);
                    if let Some(end) = tree.element_end_position(tail) {
                        self.corrections.push(end);
                    }
                }
                changed = true;
            }
        }

        for child in &mut children {
            if let Element::Node(child_id) = child {
                let rewritten = self.rewrite(tree, *child_id);
                if rewritten != *child_id {
                    *child_id = rewritten;
                    changed = true;
                }
            }
        }

        if changed {
            tree.alloc(Node::new(node.kind, children))
        } else {
            id
        }
    }

    fn is_suppressed(&self, tree: &SyntaxTree, id: NodeId) -> bool {
        tree.span(id)
            .is_some_and(|span| self.suppressed.contains(span))
    }
}

/// True when the sequence ends `[..., ??-operator, nil-literal]` with at
/// least one operand before the pair.
fn ends_with_redundant_fallback(tree: &SyntaxTree, children: &[Element]) -> bool {
    if children.len() <= 2 {
        return false;
    }
    let [.., operator, operand] = children else {
        return false;
    };
    let (Element::Node(operator), Element::Node(operand)) = (operator, operand) else {
        return false;
    };
    if tree.node(*operand).kind != NodeKind::NilLiteralExpr {
        return false;
    }
    let operator = tree.node(*operator);
    operator.kind == NodeKind::BinaryOperatorExpr
        && matches!(
            operator.children.first(),
            Some(Element::Token(token)) if token.is_nil_coalescing()
        )
}
