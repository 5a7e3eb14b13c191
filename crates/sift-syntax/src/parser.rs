//! Minimal recursive-descent parser.
//!
//! Covers the declaration and expression subset the bundled rules
//! exercise: nominal type declarations with modifiers, inheritance
//! clauses and member blocks, `typealias` / `associatedtype`, `var` /
//! `let` bindings, enum cases, and flat expression sequences (operands
//! interleaved with binary operators, parentheses allowed). The grammar
//! is deliberately lenient; a linter needs shape, not semantics.

use crate::lexer::{tokenize, ParseError};
use crate::token::{Keyword, Token, TokenKind};
use crate::tree::{Element, Node, NodeId, NodeKind, SyntaxTree};

/// Parses `source` into a syntax tree rooted at a
/// [`NodeKind::SourceFile`] node.
///
/// # Errors
///
/// Returns a [`ParseError`] for characters no token can start with,
/// unterminated backtick identifiers, unbalanced braces or parentheses,
/// and tokens the expression grammar cannot place.
pub fn parse(source: &str) -> Result<SyntaxTree, ParseError> {
    let tokens = tokenize(source)?;
    Parser::new(tokens).parse_source_file()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    tree: SyntaxTree,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            tree: SyntaxTree::new(Node::new(NodeKind::SourceFile, Vec::new())),
        }
    }

    fn peek(&self) -> &Token {
        // the token stream always ends with EOF
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn at_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn bump(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    /// True when the next token starts on a new line.
    fn at_line_break(&self) -> bool {
        self.peek().leading.contains('\n')
    }

    fn parse_source_file(mut self) -> Result<SyntaxTree, ParseError> {
        let mut children = Vec::new();
        while !self.at_eof() {
            match self.peek().kind {
                TokenKind::Semicolon => children.push(Element::Token(self.bump())),
                TokenKind::RightBrace => {
                    let token = self.peek();
                    return Err(ParseError::UnbalancedDelimiter {
                        delimiter: '}',
                        offset: token.offset,
                    });
                }
                _ => self.parse_statement(&mut children)?,
            }
        }
        children.push(Element::Token(self.bump()));

        let root = self.tree.root();
        self.tree.replace(root, Node::new(NodeKind::SourceFile, children));
        Ok(self.tree)
    }

    /// Parses one statement, pushing its elements into `out`.
    fn parse_statement(&mut self, out: &mut Vec<Element>) -> Result<(), ParseError> {
        let mut modifiers = Vec::new();
        while let TokenKind::Keyword(kw) = self.peek().kind {
            if kw.is_modifier() {
                modifiers.push(Element::Token(self.bump()));
            } else {
                break;
            }
        }

        let node = match self.peek().kind {
            TokenKind::Keyword(kw) if kw.declares_type() => self.parse_type_decl(modifiers)?,
            TokenKind::Keyword(Keyword::Typealias) => self.parse_type_alias(modifiers)?,
            TokenKind::Keyword(Keyword::Associatedtype) => {
                self.parse_associated_type(modifiers)?
            }
            TokenKind::Keyword(Keyword::Var | Keyword::Let) => {
                self.parse_variable_decl(modifiers)?
            }
            TokenKind::Keyword(Keyword::Case) => self.parse_case_decl(modifiers)?,
            _ => {
                // stray modifiers before an expression become sibling tokens
                out.append(&mut modifiers);
                self.parse_expr_sequence()?
            }
        };
        out.push(Element::Node(node));
        Ok(())
    }

    fn parse_type_decl(&mut self, mut children: Vec<Element>) -> Result<NodeId, ParseError> {
        children.push(Element::Token(self.bump()));
        if self.peek().kind == TokenKind::Identifier {
            children.push(Element::Token(self.bump()));
        }
        if self.peek().kind == TokenKind::Colon {
            children.push(Element::Token(self.bump()));
            self.parse_inheritance_list(&mut children);
        }
        if self.peek().kind == TokenKind::LeftBrace {
            let block = self.parse_member_block()?;
            children.push(Element::Node(block));
        }
        Ok(self.tree.alloc(Node::new(NodeKind::TypeDecl, children)))
    }

    fn parse_inheritance_list(&mut self, children: &mut Vec<Element>) {
        loop {
            if self.peek().kind != TokenKind::Identifier {
                break;
            }
            children.push(Element::Token(self.bump()));
            if self.peek().kind != TokenKind::Comma {
                break;
            }
            children.push(Element::Token(self.bump()));
        }
    }

    fn parse_member_block(&mut self) -> Result<NodeId, ParseError> {
        let open = self.bump();
        let open_offset = open.offset;
        let mut children = vec![Element::Token(open)];
        loop {
            match self.peek().kind {
                TokenKind::RightBrace => {
                    children.push(Element::Token(self.bump()));
                    break;
                }
                TokenKind::Eof => {
                    return Err(ParseError::UnbalancedDelimiter {
                        delimiter: '{',
                        offset: open_offset,
                    });
                }
                TokenKind::Semicolon => children.push(Element::Token(self.bump())),
                _ => self.parse_statement(&mut children)?,
            }
        }
        Ok(self.tree.alloc(Node::new(NodeKind::MemberBlock, children)))
    }

    fn parse_type_alias(&mut self, mut children: Vec<Element>) -> Result<NodeId, ParseError> {
        children.push(Element::Token(self.bump()));
        if self.peek().kind == TokenKind::Identifier {
            children.push(Element::Token(self.bump()));
        }
        if self.peek().kind == TokenKind::Equal {
            children.push(Element::Token(self.bump()));
            self.parse_type_tokens(&mut children);
        }
        Ok(self.tree.alloc(Node::new(NodeKind::TypeAliasDecl, children)))
    }

    fn parse_associated_type(&mut self, mut children: Vec<Element>) -> Result<NodeId, ParseError> {
        children.push(Element::Token(self.bump()));
        if self.peek().kind == TokenKind::Identifier {
            children.push(Element::Token(self.bump()));
        }
        if self.peek().kind == TokenKind::Colon {
            children.push(Element::Token(self.bump()));
            self.parse_inheritance_list(&mut children);
        }
        Ok(self
            .tree
            .alloc(Node::new(NodeKind::AssociatedTypeDecl, children)))
    }

    fn parse_variable_decl(&mut self, mut children: Vec<Element>) -> Result<NodeId, ParseError> {
        children.push(Element::Token(self.bump()));
        if self.peek().kind == TokenKind::Identifier {
            children.push(Element::Token(self.bump()));
        }
        if self.peek().kind == TokenKind::Colon {
            children.push(Element::Token(self.bump()));
            self.parse_type_tokens(&mut children);
        }
        if self.peek().kind == TokenKind::Equal {
            children.push(Element::Token(self.bump()));
            let initializer = self.parse_expr_sequence()?;
            children.push(Element::Node(initializer));
        }
        Ok(self.tree.alloc(Node::new(NodeKind::VariableDecl, children)))
    }

    fn parse_case_decl(&mut self, mut children: Vec<Element>) -> Result<NodeId, ParseError> {
        children.push(Element::Token(self.bump()));
        while matches!(
            self.peek().kind,
            TokenKind::Identifier | TokenKind::IntegerLiteral | TokenKind::Comma
        ) && !self.at_line_break()
        {
            children.push(Element::Token(self.bump()));
        }
        Ok(self.tree.alloc(Node::new(NodeKind::CaseDecl, children)))
    }

    /// Consumes the loose token run of a type annotation (`Int?`, `Void`).
    fn parse_type_tokens(&mut self, children: &mut Vec<Element>) {
        let mut first = true;
        while matches!(
            self.peek().kind,
            TokenKind::Identifier | TokenKind::Operator { .. }
        ) {
            if !first && self.at_line_break() {
                break;
            }
            children.push(Element::Token(self.bump()));
            first = false;
        }
    }

    fn parse_expr_sequence(&mut self) -> Result<NodeId, ParseError> {
        let mut elements = vec![Element::Node(self.parse_expr_primary()?)];
        while matches!(self.peek().kind, TokenKind::Operator { .. }) {
            let operator = self.bump();
            let operator_node = self
                .tree
                .alloc(Node::new(NodeKind::BinaryOperatorExpr, vec![Element::Token(operator)]));
            elements.push(Element::Node(operator_node));
            elements.push(Element::Node(self.parse_expr_primary()?));
        }
        Ok(self.tree.alloc(Node::new(NodeKind::ExprSequence, elements)))
    }

    fn parse_expr_primary(&mut self) -> Result<NodeId, ParseError> {
        let kind = match self.peek().kind {
            TokenKind::Identifier => NodeKind::IdentifierExpr,
            TokenKind::Keyword(Keyword::Nil) => NodeKind::NilLiteralExpr,
            TokenKind::IntegerLiteral => NodeKind::IntegerLiteralExpr,
            TokenKind::LeftParen => {
                let open = self.bump();
                let open_offset = open.offset;
                let mut children = vec![Element::Token(open)];
                let inner = self.parse_expr_sequence()?;
                children.push(Element::Node(inner));
                if self.peek().kind != TokenKind::RightParen {
                    return Err(ParseError::UnbalancedDelimiter {
                        delimiter: '(',
                        offset: open_offset,
                    });
                }
                children.push(Element::Token(self.bump()));
                return Ok(self.tree.alloc(Node::new(NodeKind::ParenExpr, children)));
            }
            _ => {
                let token = self.peek();
                return Err(ParseError::UnexpectedToken {
                    text: token.text.clone(),
                    offset: token.offset,
                });
            }
        };
        let token = self.bump();
        Ok(self.tree.alloc(Node::new(kind, vec![Element::Token(token)])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Span;

    fn kinds_of(tree: &SyntaxTree, id: NodeId) -> Vec<NodeKind> {
        tree.node(id)
            .children
            .iter()
            .filter_map(|el| match el {
                Element::Node(child) => Some(tree.node(*child).kind),
                Element::Token(_) => None,
            })
            .collect()
    }

    fn top_level_nodes(tree: &SyntaxTree) -> Vec<NodeKind> {
        kinds_of(tree, tree.root())
    }

    #[test]
    fn parses_type_declarations() {
        let tree = parse("private struct _MyType {}").unwrap();
        assert_eq!(top_level_nodes(&tree), [NodeKind::TypeDecl]);
        assert_eq!(tree.text(), "private struct _MyType {}");
    }

    #[test]
    fn parses_inheritance_without_a_body() {
        let tree = parse("struct MyView_Previews: PreviewProvider").unwrap();
        assert_eq!(top_level_nodes(&tree), [NodeKind::TypeDecl]);
    }

    #[test]
    fn parses_protocol_members() {
        let tree = parse("protocol Foo {\n  associatedtype Bar: Equatable\n}").unwrap();
        let decls: Vec<NodeKind> = tree.preorder().map(|id| tree.node(id).kind).collect();
        assert!(decls.contains(&NodeKind::AssociatedTypeDecl));
        assert!(decls.contains(&NodeKind::MemberBlock));
    }

    #[test]
    fn parses_enum_cases() {
        let tree = parse("enum MyType {\ncase value\n}").unwrap();
        let decls: Vec<NodeKind> = tree.preorder().map(|id| tree.node(id).kind).collect();
        assert!(decls.contains(&NodeKind::CaseDecl));
        assert_eq!(tree.text(), "enum MyType {\ncase value\n}");
    }

    #[test]
    fn variable_initializer_is_an_expression_sequence() {
        let tree = parse("var myVar: Int? = nil; let foo = myVar ?? nil\n").unwrap();
        assert_eq!(
            top_level_nodes(&tree),
            [NodeKind::VariableDecl, NodeKind::VariableDecl]
        );

        let root = tree.node(tree.root());
        let Element::Node(second) = &root.children[2] else {
            panic!("expected the second declaration after the semicolon");
        };
        let kinds = kinds_of(&tree, *second);
        assert_eq!(kinds, [NodeKind::ExprSequence]);

        let Some(Element::Node(seq)) = tree
            .node(*second)
            .children
            .iter()
            .find(|el| matches!(el, Element::Node(id) if tree.node(*id).kind == NodeKind::ExprSequence))
        else {
            panic!("initializer sequence missing");
        };
        assert_eq!(
            kinds_of(&tree, *seq),
            [
                NodeKind::IdentifierExpr,
                NodeKind::BinaryOperatorExpr,
                NodeKind::NilLiteralExpr
            ]
        );
    }

    #[test]
    fn expression_statements_unfold_into_flat_sequences() {
        let tree = parse("a ?? b ?? nil\n").unwrap();
        let root = tree.node(tree.root());
        let Element::Node(seq) = &root.children[0] else {
            panic!("expected a sequence");
        };
        assert_eq!(
            kinds_of(&tree, *seq),
            [
                NodeKind::IdentifierExpr,
                NodeKind::BinaryOperatorExpr,
                NodeKind::IdentifierExpr,
                NodeKind::BinaryOperatorExpr,
                NodeKind::NilLiteralExpr
            ]
        );
    }

    #[test]
    fn parenthesized_expressions_nest() {
        let tree = parse("myVar ?? (nil)\n").unwrap();
        let kinds: Vec<NodeKind> = tree.preorder().map(|id| tree.node(id).kind).collect();
        assert!(kinds.contains(&NodeKind::ParenExpr));
        assert_eq!(tree.text(), "myVar ?? (nil)\n");
    }

    #[test]
    fn spans_locate_constructs() {
        let tree = parse("let foo = bar\n").unwrap();
        let Element::Node(decl) = &tree.node(tree.root()).children[0] else {
            panic!("expected a declaration");
        };
        assert_eq!(tree.span(*decl), Some(Span::new(0, 13)));
    }

    #[test]
    fn unbalanced_braces_error() {
        assert!(matches!(
            parse("struct S {"),
            Err(ParseError::UnbalancedDelimiter { delimiter: '{', .. })
        ));
        assert!(matches!(
            parse("}"),
            Err(ParseError::UnbalancedDelimiter { delimiter: '}', .. })
        ));
        assert!(matches!(
            parse("a ?? (nil"),
            Err(ParseError::UnbalancedDelimiter { delimiter: '(', .. })
        ));
    }
}
