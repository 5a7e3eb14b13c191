//! Arena syntax tree.
//!
//! Nodes live in a flat arena addressed by [`NodeId`]; children are either
//! tokens or ids of other nodes. Rewriting never mutates a reachable node:
//! it allocates new entries for changed subtrees and reuses the ids of
//! untouched ones, so a rewritten tree shares structure with its original.

use crate::position::{Position, Span};
use crate::token::Token;

/// Index of a node in the tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Arena slot of this id.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Structural kind of a composite node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Top-level statement list.
    SourceFile,
    /// `class` / `struct` / `enum` / `protocol` declaration.
    TypeDecl,
    /// `typealias` declaration.
    TypeAliasDecl,
    /// `associatedtype` declaration.
    AssociatedTypeDecl,
    /// `var` / `let` binding, optionally with an initializer.
    VariableDecl,
    /// `case` member of an enum.
    CaseDecl,
    /// Brace-delimited member list of a type declaration.
    MemberBlock,
    /// Flat operator sequence: operands interleaved with operator
    /// expressions, unfolded.
    ExprSequence,
    /// A bare name used as an expression.
    IdentifierExpr,
    /// The `nil` literal.
    NilLiteralExpr,
    /// An integer literal.
    IntegerLiteralExpr,
    /// A binary operator occupying an operand slot of a sequence.
    BinaryOperatorExpr,
    /// A parenthesized expression.
    ParenExpr,
}

/// A child of a node: a token or another node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// A leaf token.
    Token(Token),
    /// A nested node, by arena id.
    Node(NodeId),
}

/// A typed composite of children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Structural kind.
    pub kind: NodeKind,
    /// Children in source order.
    pub children: Vec<Element>,
}

impl Node {
    /// Creates a node.
    #[must_use]
    pub fn new(kind: NodeKind, children: Vec<Element>) -> Self {
        Self { kind, children }
    }
}

/// An immutable syntax tree backed by a node arena.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl SyntaxTree {
    /// Creates a tree whose root is `root`.
    #[must_use]
    pub fn new(root: Node) -> Self {
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    /// The root node id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Borrows a node by id.
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Number of arena entries, including entries only reachable from
    /// superseded roots.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Allocates a new node, returning its id.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Re-points the root at `id`.
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this tree.
    pub fn set_root(&mut self, id: NodeId) {
        assert!(id.index() < self.nodes.len(), "root id out of bounds");
        self.root = id;
    }

    pub(crate) fn replace(&mut self, id: NodeId, node: Node) {
        self.nodes[id.index()] = node;
    }

    /// In-order iterator over the tokens reachable from the root.
    #[must_use]
    pub fn tokens(&self) -> Tokens<'_> {
        self.tokens_of(self.root)
    }

    /// In-order iterator over the tokens of one subtree.
    #[must_use]
    pub fn tokens_of(&self, id: NodeId) -> Tokens<'_> {
        Tokens {
            tree: self,
            stack: vec![self.node(id).children.iter()],
        }
    }

    /// Preorder iterator over node ids, starting at the root.
    #[must_use]
    pub fn preorder(&self) -> Nodes<'_> {
        Nodes {
            tree: self,
            stack: vec![self.root],
        }
    }

    /// First token of a subtree, in source order.
    #[must_use]
    pub fn first_token(&self, id: NodeId) -> Option<&Token> {
        for element in &self.node(id).children {
            match element {
                Element::Token(token) => return Some(token),
                Element::Node(child) => {
                    if let Some(token) = self.first_token(*child) {
                        return Some(token);
                    }
                }
            }
        }
        None
    }

    /// Last token of a subtree, in source order.
    #[must_use]
    pub fn last_token(&self, id: NodeId) -> Option<&Token> {
        for element in self.node(id).children.iter().rev() {
            match element {
                Element::Token(token) => return Some(token),
                Element::Node(child) => {
                    if let Some(token) = self.last_token(*child) {
                        return Some(token);
                    }
                }
            }
        }
        None
    }

    /// Span of a subtree's text, trivia excluded. `None` for a node with
    /// no tokens.
    #[must_use]
    pub fn span(&self, id: NodeId) -> Option<Span> {
        let first = self.first_token(id)?;
        let last = self.last_token(id)?;
        Some(Span::new(first.offset, last.offset + last.text.len()))
    }

    /// End position of an element's text, trailing trivia excluded.
    #[must_use]
    pub fn element_end_position(&self, element: &Element) -> Option<Position> {
        match element {
            Element::Token(token) => Some(token.end_position()),
            Element::Node(id) => self.last_token(*id).map(Token::end_position),
        }
    }

    /// Strips the trailing trivia from the last token under `element`.
    ///
    /// A nested node is not mutated in place; its changed spine is
    /// reallocated and `element` is re-pointed at the copy.
    pub fn strip_trailing_trivia(&mut self, element: &mut Element) {
        match element {
            Element::Token(token) => token.trailing.clear(),
            Element::Node(id) => {
                let needs_strip = self.last_token(*id).is_some_and(|t| !t.trailing.is_empty());
                if !needs_strip {
                    return;
                }
                let mut node = self.node(*id).clone();
                if let Some(last) = node.children.last_mut() {
                    self.strip_trailing_trivia(last);
                }
                *id = self.alloc(node);
            }
        }
    }

    /// Serializes the tree back into source text.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        for token in self.tokens() {
            token.write_to(&mut out);
        }
        out
    }
}

/// In-order token iterator, see [`SyntaxTree::tokens`].
pub struct Tokens<'a> {
    tree: &'a SyntaxTree,
    stack: Vec<std::slice::Iter<'a, Element>>,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a Token;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(top) = self.stack.last_mut() {
            match top.next() {
                Some(Element::Token(token)) => return Some(token),
                Some(Element::Node(id)) => {
                    self.stack.push(self.tree.node(*id).children.iter());
                }
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

/// Preorder node iterator, see [`SyntaxTree::preorder`].
pub struct Nodes<'a> {
    tree: &'a SyntaxTree,
    stack: Vec<NodeId>,
}

impl Iterator for Nodes<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.node(id);
        for element in node.children.iter().rev() {
            if let Element::Node(child) = element {
                self.stack.push(*child);
            }
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn token(text: &str, offset: usize) -> Token {
        Token {
            kind: TokenKind::Identifier,
            text: text.to_string(),
            leading: String::new(),
            trailing: " ".to_string(),
            offset,
        }
    }

    fn sample_tree() -> SyntaxTree {
        // (a b) c
        let mut tree = SyntaxTree::new(Node::new(NodeKind::SourceFile, Vec::new()));
        let inner = tree.alloc(Node::new(
            NodeKind::ExprSequence,
            vec![
                Element::Token(token("a", 0)),
                Element::Token(token("b", 2)),
            ],
        ));
        let root = Node::new(
            NodeKind::SourceFile,
            vec![Element::Node(inner), Element::Token(token("c", 4))],
        );
        tree.replace(tree.root(), root);
        tree
    }

    #[test]
    fn tokens_iterate_in_source_order() {
        let tree = sample_tree();
        let texts: Vec<&str> = tree.tokens().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["a", "b", "c"]);
    }

    #[test]
    fn spans_cover_first_to_last_token() {
        let tree = sample_tree();
        assert_eq!(tree.span(tree.root()), Some(Span::new(0, 5)));
        let texts = tree.text();
        assert_eq!(texts, "a b c ");
    }

    #[test]
    fn strip_trailing_trivia_reallocates_nested_spines() {
        let mut tree = sample_tree();
        let before = tree.node_count();
        let mut element = tree.node(tree.root()).children[0].clone();
        tree.strip_trailing_trivia(&mut element);

        let Element::Node(new_id) = element else {
            panic!("expected a node element");
        };
        assert_eq!(tree.node_count(), before + 1, "spine copy allocated");
        let last = tree.last_token(new_id).unwrap();
        assert_eq!(last.text, "b");
        assert!(last.trailing.is_empty());

        // the original subtree is untouched
        let Element::Node(old_id) = &tree.node(tree.root()).children[0] else {
            panic!("expected a node element");
        };
        assert_eq!(tree.last_token(*old_id).unwrap().trailing, " ");
    }

    #[test]
    fn strip_trailing_trivia_is_a_no_op_when_clean() {
        let mut tree = sample_tree();
        let Element::Node(id) = tree.node(tree.root()).children[0].clone() else {
            panic!("expected a node element");
        };
        let mut node = tree.node(id).clone();
        for child in &mut node.children {
            if let Element::Token(t) = child {
                t.trailing.clear();
            }
        }
        let clean = tree.alloc(node);
        let mut element = Element::Node(clean);

        let before = tree.node_count();
        tree.strip_trailing_trivia(&mut element);
        assert_eq!(tree.node_count(), before, "no allocation for clean subtree");
    }

    #[test]
    fn preorder_visits_parents_before_children() {
        let tree = sample_tree();
        let kinds: Vec<NodeKind> = tree.preorder().map(|id| tree.node(id).kind).collect();
        assert_eq!(kinds, [NodeKind::SourceFile, NodeKind::ExprSequence]);
    }
}
