//! Lexer producing trivia-attached tokens.

use crate::token::{Keyword, Token, TokenKind};
use thiserror::Error;

/// Errors produced while turning source text into a tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A character no token can start with.
    #[error("unexpected character {character:?} at offset {offset}")]
    UnexpectedCharacter {
        /// The offending character.
        character: char,
        /// Byte offset of the character.
        offset: usize,
    },

    /// A backtick-quoted identifier with no closing backtick.
    #[error("unterminated backtick identifier starting at offset {offset}")]
    UnterminatedIdentifier {
        /// Byte offset of the opening backtick.
        offset: usize,
    },

    /// An opening delimiter with no matching closer.
    #[error("unbalanced {delimiter:?} at offset {offset}")]
    UnbalancedDelimiter {
        /// The unmatched delimiter.
        delimiter: char,
        /// Byte offset of the delimiter.
        offset: usize,
    },

    /// A token in a position the grammar cannot place.
    #[error("unexpected token {text:?} at offset {offset}")]
    UnexpectedToken {
        /// Surface text of the token.
        text: String,
        /// Byte offset of the token.
        offset: usize,
    },
}

fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        '?' | '!' | '+' | '-' | '*' | '/' | '%' | '<' | '>' | '=' | '&' | '|' | '^' | '~' | '.'
    )
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

struct RawToken {
    kind: TokenKind,
    text: String,
    offset: usize,
}

/// Splits an inter-token gap at the first newline: the head becomes the
/// previous token's trailing trivia, the rest the next token's leading.
fn split_gap(gap: &str) -> (String, String) {
    match gap.find('\n') {
        Some(i) => (gap[..i].to_string(), gap[i..].to_string()),
        None => (gap.to_string(), String::new()),
    }
}

/// Lexes `source` into trivia-attached tokens, ending with an EOF token
/// that owns the file's tail trivia.
pub(crate) fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let (raw, gaps) = lex_raw(source)?;

    let mut tokens = Vec::with_capacity(raw.len() + 1);
    let mut leading = gaps.first().cloned().unwrap_or_default();
    for (idx, raw_token) in raw.into_iter().enumerate() {
        let (trailing, next_leading) = split_gap(&gaps[idx + 1]);
        tokens.push(Token {
            kind: raw_token.kind,
            text: raw_token.text,
            leading: std::mem::take(&mut leading),
            trailing,
            offset: raw_token.offset,
        });
        leading = next_leading;
    }
    tokens.push(Token {
        kind: TokenKind::Eof,
        text: String::new(),
        leading,
        trailing: String::new(),
        offset: source.len(),
    });
    Ok(tokens)
}

fn lex_raw(source: &str) -> Result<(Vec<RawToken>, Vec<String>), ParseError> {
    let mut tokens = Vec::new();
    let mut gaps = Vec::new();
    let mut pos = 0;

    loop {
        let gap_start = pos;
        pos = skip_trivia(source, pos);
        gaps.push(source[gap_start..pos].to_string());
        if pos >= source.len() {
            break;
        }
        let token = lex_token(source, pos)?;
        pos += token.text.len();
        tokens.push(token);
    }

    Ok((tokens, gaps))
}

fn skip_trivia(source: &str, mut pos: usize) -> usize {
    while pos < source.len() {
        let rest = &source[pos..];
        if rest.starts_with("//") {
            pos += rest.find('\n').unwrap_or(rest.len());
        } else if let Some(c) = rest.chars().next().filter(|c| c.is_whitespace()) {
            pos += c.len_utf8();
        } else {
            break;
        }
    }
    pos
}

fn lex_token(source: &str, offset: usize) -> Result<RawToken, ParseError> {
    let rest = &source[offset..];
    let Some(first) = rest.chars().next() else {
        return Err(ParseError::UnexpectedCharacter {
            character: '\0',
            offset,
        });
    };

    if first == '`' {
        let Some(close) = rest[1..].find('`') else {
            return Err(ParseError::UnterminatedIdentifier { offset });
        };
        return Ok(RawToken {
            kind: TokenKind::Identifier,
            text: rest[..close + 2].to_string(),
            offset,
        });
    }

    if is_identifier_start(first) {
        let end = rest
            .char_indices()
            .find(|&(_, c)| !is_identifier_continue(c))
            .map_or(rest.len(), |(i, _)| i);
        let text = &rest[..end];
        let kind = Keyword::from_text(text).map_or(TokenKind::Identifier, TokenKind::Keyword);
        return Ok(RawToken {
            kind,
            text: text.to_string(),
            offset,
        });
    }

    if first.is_ascii_digit() {
        let end = rest
            .char_indices()
            .find(|&(_, c)| !c.is_ascii_digit())
            .map_or(rest.len(), |(i, _)| i);
        return Ok(RawToken {
            kind: TokenKind::IntegerLiteral,
            text: rest[..end].to_string(),
            offset,
        });
    }

    let punct = match first {
        '{' => Some(TokenKind::LeftBrace),
        '}' => Some(TokenKind::RightBrace),
        '(' => Some(TokenKind::LeftParen),
        ')' => Some(TokenKind::RightParen),
        ':' => Some(TokenKind::Colon),
        ';' => Some(TokenKind::Semicolon),
        ',' => Some(TokenKind::Comma),
        _ => None,
    };
    if let Some(kind) = punct {
        return Ok(RawToken {
            kind,
            text: first.to_string(),
            offset,
        });
    }

    if is_operator_char(first) {
        let mut end = 0;
        for (i, c) in rest.char_indices() {
            // a comment terminates an operator run
            if !is_operator_char(c) || rest[i..].starts_with("//") {
                break;
            }
            end = i + c.len_utf8();
        }
        let text = &rest[..end];
        let kind = if text == "=" {
            TokenKind::Equal
        } else {
            TokenKind::Operator {
                spaced: operator_is_spaced(source, offset, end),
            }
        };
        return Ok(RawToken {
            kind,
            text: text.to_string(),
            offset,
        });
    }

    Err(ParseError::UnexpectedCharacter {
        character: first,
        offset,
    })
}

fn operator_is_spaced(source: &str, offset: usize, len: usize) -> bool {
    let before = source[..offset]
        .chars()
        .next_back()
        .map_or(true, char::is_whitespace);
    let after = source[offset + len..]
        .chars()
        .next()
        .map_or(true, char::is_whitespace);
    before && after
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    fn round_trip(source: &str) -> String {
        let mut out = String::new();
        for token in tokenize(source).unwrap() {
            out.push_str(&token.leading);
            out.push_str(&token.text);
            out.push_str(&token.trailing);
        }
        out
    }

    #[test]
    fn round_trips_source_exactly() {
        for source in [
            "var myVar: Int? = nil; myVar ?? nil\n",
            "class MyType {}",
            "// comment\nlet a = 1  // trailing\n",
            "",
            "\n\n",
        ] {
            assert_eq!(round_trip(source), source);
        }
    }

    #[test]
    fn trailing_trivia_stops_at_the_newline() {
        let tokens = tokenize("a \n b").unwrap();
        assert_eq!(tokens[0].trailing, " ");
        assert_eq!(tokens[1].leading, "\n ");
    }

    #[test]
    fn eof_token_owns_tail_trivia() {
        let tokens = tokenize("a\n").unwrap();
        let eof = tokens.last().unwrap();
        assert_eq!(eof.kind, TokenKind::Eof);
        assert_eq!(eof.leading, "\n");
        assert_eq!(eof.offset, 2);
    }

    #[test]
    fn keywords_and_identifiers() {
        let tokens = tokenize("var nil value").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::Var));
        assert_eq!(tokens[1].kind, TokenKind::Keyword(Keyword::Nil));
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
    }

    #[test]
    fn operator_spacing() {
        let tokens = tokenize("a ?? b").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Operator { spaced: true });

        let tokens = tokenize("a??b").unwrap();
        assert_eq!(texts(&tokens), ["a", "??", "b", ""]);
        assert_eq!(tokens[1].kind, TokenKind::Operator { spaced: false });

        let tokens = tokenize("a ??nil").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Operator { spaced: false });
        assert!(tokens[1].is_nil_coalescing());
    }

    #[test]
    fn lone_equal_is_not_an_operator() {
        let tokens = tokenize("a = b == c").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Equal);
        assert!(matches!(tokens[3].kind, TokenKind::Operator { .. }));
    }

    #[test]
    fn backtick_identifiers_keep_their_quotes() {
        let tokens = tokenize("class `_` {}").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].text, "`_`");
        assert_eq!(tokens[1].unquoted_text(), "_");
    }

    #[test]
    fn unterminated_backtick_is_an_error() {
        assert_eq!(
            tokenize("`oops"),
            Err(ParseError::UnterminatedIdentifier { offset: 0 })
        );
    }

    #[test]
    fn unexpected_character_is_an_error() {
        assert!(matches!(
            tokenize("a @ b"),
            Err(ParseError::UnexpectedCharacter {
                character: '@',
                offset: 2
            })
        ));
    }

    #[test]
    fn comments_are_trivia_even_mid_line() {
        let tokens = tokenize("a // no ?? nil here\nb").unwrap();
        assert_eq!(texts(&tokens), ["a", "b", ""]);
    }
}
