//! Tokens, token kinds, and trivia.

use crate::position::{Position, Span};

/// Reserved words recognized by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Keyword {
    Var,
    Let,
    Class,
    Struct,
    Enum,
    Protocol,
    Typealias,
    Associatedtype,
    Case,
    Nil,
    Private,
    Fileprivate,
    Internal,
    Public,
}

impl Keyword {
    /// Looks up a keyword from its surface text.
    #[must_use]
    pub fn from_text(text: &str) -> Option<Self> {
        Some(match text {
            "var" => Self::Var,
            "let" => Self::Let,
            "class" => Self::Class,
            "struct" => Self::Struct,
            "enum" => Self::Enum,
            "protocol" => Self::Protocol,
            "typealias" => Self::Typealias,
            "associatedtype" => Self::Associatedtype,
            "case" => Self::Case,
            "nil" => Self::Nil,
            "private" => Self::Private,
            "fileprivate" => Self::Fileprivate,
            "internal" => Self::Internal,
            "public" => Self::Public,
            _ => return None,
        })
    }

    /// Returns true for access-level modifiers.
    #[must_use]
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            Self::Private | Self::Fileprivate | Self::Internal | Self::Public
        )
    }

    /// Returns true for keywords that introduce a nominal type declaration.
    #[must_use]
    pub fn declares_type(self) -> bool {
        matches!(
            self,
            Self::Class | Self::Struct | Self::Enum | Self::Protocol
        )
    }
}

/// The closed tag carried by every token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A name, possibly backtick-quoted.
    Identifier,
    /// A reserved word.
    Keyword(Keyword),
    /// A run of operator characters. `spaced` records whether whitespace
    /// separates the operator from both of its neighbours.
    Operator {
        /// Whitespace on both sides of the operator text.
        spaced: bool,
    },
    /// A decimal integer literal.
    IntegerLiteral,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `=`
    Equal,
    /// End of file; carries the file's tail trivia as leading trivia.
    Eof,
}

/// An immutable lexical unit with its surrounding trivia.
///
/// Trivia attachment is source-accurate: trailing trivia runs up to (not
/// including) the first newline after the token; everything else belongs
/// to the next token's leading trivia. Concatenating
/// `leading + text + trailing` over a file's token stream reproduces the
/// original text exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Structural tag.
    pub kind: TokenKind,
    /// Surface text, trivia excluded.
    pub text: String,
    /// Whitespace and comments preceding the text.
    pub leading: String,
    /// Whitespace and comments following the text, up to the first newline.
    pub trailing: String,
    /// Byte offset of `text` in the original source.
    pub offset: usize,
}

impl Token {
    /// Start position of the token text.
    #[must_use]
    pub fn position(&self) -> Position {
        Position(self.offset)
    }

    /// End position of the token text, trailing trivia excluded.
    #[must_use]
    pub fn end_position(&self) -> Position {
        Position(self.offset + self.text.len())
    }

    /// Span of the token text.
    #[must_use]
    pub fn span(&self) -> Span {
        Span::new(self.offset, self.offset + self.text.len())
    }

    /// True for the `??` operator, spaced or unspaced.
    #[must_use]
    pub fn is_nil_coalescing(&self) -> bool {
        matches!(self.kind, TokenKind::Operator { .. }) && self.text == "??"
    }

    /// True for the `nil` keyword.
    #[must_use]
    pub fn is_nil_keyword(&self) -> bool {
        self.kind == TokenKind::Keyword(Keyword::Nil)
    }

    /// Surface text with any backtick quoting removed.
    #[must_use]
    pub fn unquoted_text(&self) -> &str {
        self.text.trim_matches('`')
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        out.push_str(&self.leading);
        out.push_str(&self.text);
        out.push_str(&self.trailing);
    }
}
