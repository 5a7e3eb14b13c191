//! Type, alias, and associated-type name validation.
//!
//! Names must be alphanumeric, start with an uppercase character, and
//! stay within configured length bounds. A single leading underscore is
//! tolerated on private declarations, and SwiftUI preview providers keep
//! their conventional `Something_Previews` shape. Detection only; there
//! is nothing mechanical to rewrite a bad name into.
//!
//! # Configuration
//!
//! - `min_length` (default 3) and `max_length` (default 40)
//! - `require_uppercase`: require an uppercase first character (default true)
//! - `allow_private_prefix`: permit one leading underscore on private
//!   declarations (default true)
//! - `excluded`: names exempt from every check

use serde::{Deserialize, Serialize};
use sift_core::{
    ConfigError, Example, Rule, RuleCategory, RuleConfig, RuleDescription, RuleHandle, Severity,
};
use sift_syntax::{Element, Keyword, Node, NodeKind, Position, SourceFile, Token, TokenKind};
use std::collections::BTreeSet;

/// Rule code for type-name.
pub const CODE: &str = "SF002";

/// Rule identifier for type-name.
pub const NAME: &str = "type-name";

/// What kind of declaration a name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// `class` / `struct` / `enum` / `protocol`.
    Type,
    /// `typealias`.
    Alias,
    /// `associatedtype`.
    AssociatedType,
    /// A type declared to conform to `PreviewProvider`.
    PreviewProvider,
}

/// Why a name failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameIssue {
    /// Shorter than the configured minimum.
    TooShort,
    /// Longer than the configured maximum.
    TooLong,
    /// First character is not uppercase.
    WrongCase,
    /// Contains characters outside the allowed alphanumeric pattern.
    InvalidCharacters,
}

impl std::fmt::Display for NameIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooShort => write!(f, "name is shorter than the minimum length"),
            Self::TooLong => write!(f, "name is longer than the maximum length"),
            Self::WrongCase => write!(f, "name should start with an uppercase character"),
            Self::InvalidCharacters => write!(f, "name should only contain alphanumeric characters"),
        }
    }
}

/// Configuration for the type-name rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeNameConfig {
    /// Names shorter than this fail with [`NameIssue::TooShort`].
    pub min_length: usize,
    /// Names longer than this fail with [`NameIssue::TooLong`].
    pub max_length: usize,
    /// Require an uppercase first character.
    pub require_uppercase: bool,
    /// Permit one leading underscore on private declarations.
    pub allow_private_prefix: bool,
    /// Names exempt from every check.
    pub excluded: BTreeSet<String>,
}

impl Default for TypeNameConfig {
    fn default() -> Self {
        Self {
            min_length: 3,
            max_length: 40,
            require_uppercase: true,
            allow_private_prefix: true,
            excluded: BTreeSet::new(),
        }
    }
}

impl TypeNameConfig {
    /// Checks the record for contradictions.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLengthBounds`] when the minimum
    /// length exceeds the maximum.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_length > self.max_length {
            return Err(ConfigError::InvalidLengthBounds {
                min: self.min_length,
                max: self.max_length,
            });
        }
        Ok(())
    }

    /// Builds the config from a generic per-rule record.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for unreadable options or contradictory
    /// bounds. Surfaced to the caller before any file is processed.
    pub fn from_rule_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        let table: toml::map::Map<String, toml::Value> = config
            .options
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let parsed: Self =
            toml::Value::Table(table)
                .try_into()
                .map_err(|e: toml::de::Error| ConfigError::Parse {
                    message: e.to_string(),
                })?;
        parsed.validate()?;
        Ok(parsed)
    }
}

/// Validates one identifier.
///
/// `is_private` reflects an access modifier on the declaration; a single
/// leading underscore is tolerated there when the config allows it.
/// Returns `None` for a valid name. When several checks would fail, the
/// most severe single reason is reported: character-pattern problems
/// mask length problems, and length problems mask casing.
#[must_use]
pub fn validate(
    name: &str,
    kind: NameKind,
    is_private: bool,
    config: &TypeNameConfig,
) -> Option<NameIssue> {
    let name = name.trim_matches('`');
    if config.excluded.contains(name) {
        return None;
    }
    let name = if is_private && config.allow_private_prefix {
        name.strip_prefix('_').unwrap_or(name)
    } else {
        name
    };

    // preview providers keep the conventional `Something_Previews` shape
    // as long as the prefix is itself a clean type name
    if kind == NameKind::PreviewProvider {
        if let Some(prefix) = name.strip_suffix("_Previews") {
            return validate(prefix, NameKind::Type, false, config);
        }
    }

    if name.is_empty() || !name.chars().all(char::is_alphanumeric) {
        return Some(NameIssue::InvalidCharacters);
    }
    let length = name.chars().count();
    if length < config.min_length {
        return Some(NameIssue::TooShort);
    }
    if length > config.max_length {
        return Some(NameIssue::TooLong);
    }
    if config.require_uppercase && name.chars().next().is_some_and(char::is_lowercase) {
        return Some(NameIssue::WrongCase);
    }
    None
}

/// Validates type, alias, and associated-type names.
#[derive(Debug, Clone, Default)]
pub struct TypeName {
    config: TypeNameConfig,
}

impl TypeName {
    /// Creates the rule with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the rule with a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for contradictory bounds, before any
    /// file is processed.
    pub fn with_config(config: TypeNameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &TypeNameConfig {
        &self.config
    }

    /// Wraps the rule in a registration handle.
    #[must_use]
    pub fn handle() -> RuleHandle {
        RuleHandle::new(Self::new())
    }
}

impl Rule for TypeName {
    fn description(&self) -> RuleDescription {
        RuleDescription {
            identifier: NAME,
            code: CODE,
            name: "Type Name",
            description: "type name should be alphanumeric, start with an uppercase character, \
                          and span the configured length range",
            category: RuleCategory::Idiomatic,
            default_severity: Severity::Warning,
            non_triggering: type_name_non_triggering(),
            triggering: type_name_triggering(),
            corrections: Vec::new(),
        }
    }

    fn detect(&self, file: &SourceFile) -> Vec<Position> {
        let tree = file.tree();
        let mut violations = Vec::new();
        for id in tree.preorder() {
            let node = tree.node(id);
            if !matches!(
                node.kind,
                NodeKind::TypeDecl | NodeKind::TypeAliasDecl | NodeKind::AssociatedTypeDecl
            ) {
                continue;
            }
            let Some(decl) = DeclaredName::extract(node) else {
                continue;
            };
            if validate(decl.name, decl.kind, decl.is_private, &self.config).is_some() {
                violations.push(decl.position);
            }
        }
        violations
    }
}

/// The name-bearing facts of one declaration.
struct DeclaredName<'a> {
    name: &'a str,
    position: Position,
    kind: NameKind,
    is_private: bool,
}

impl<'a> DeclaredName<'a> {
    fn extract(node: &'a Node) -> Option<Self> {
        let mut is_private = false;
        let mut declaring_keyword = None;
        let mut name_token: Option<&Token> = None;
        let mut saw_colon = false;
        let mut conforms_to_preview_provider = false;

        for element in &node.children {
            let Element::Token(token) = element else {
                continue;
            };
            match token.kind {
                TokenKind::Keyword(kw) if kw.is_modifier() => {
                    if matches!(kw, Keyword::Private | Keyword::Fileprivate) {
                        is_private = true;
                    }
                }
                TokenKind::Keyword(kw) if declaring_keyword.is_none() => {
                    declaring_keyword = Some(kw);
                }
                TokenKind::Identifier if name_token.is_none() => {
                    name_token = Some(token);
                }
                TokenKind::Colon => saw_colon = true,
                TokenKind::Identifier if saw_colon => {
                    if token.text == "PreviewProvider" {
                        conforms_to_preview_provider = true;
                    }
                }
                _ => {}
            }
        }

        let name_token = name_token?;
        let kind = match declaring_keyword? {
            Keyword::Typealias => NameKind::Alias,
            Keyword::Associatedtype => NameKind::AssociatedType,
            _ if conforms_to_preview_provider => NameKind::PreviewProvider,
            _ => NameKind::Type,
        };
        Some(Self {
            name: &name_token.text,
            position: name_token.position(),
            kind,
            is_private,
        })
    }
}

fn type_name_non_triggering() -> Vec<Example> {
    vec![
        Example::new("class MyType {}"),
        Example::new("private struct _MyType {}"),
        Example::new(format!("enum {} {{}}", "A".repeat(40))),
        Example::new("struct MyView_Previews: PreviewProvider"),
        Example::new("private class _MyView_Previews: PreviewProvider"),
        Example::new("typealias Foo = Void"),
        Example::new("private typealias Foo = Void"),
        Example::new("protocol Foo {\n  associatedtype Bar\n}"),
        Example::new("protocol Foo {\n  associatedtype Bar: Equatable\n}"),
        Example::new("enum MyType {\ncase value\n}"),
    ]
}

fn type_name_triggering() -> Vec<Example> {
    vec![
        Example::new("class »myType {}"),
        Example::new("enum »_MyType {}"),
        Example::new("private struct »MyType_ {}"),
        Example::new("private class »`_` {}"),
        Example::new("struct »My {}"),
        Example::new(format!("struct »{} {{}}", "A".repeat(41))),
        Example::new("class »MyView_Previews"),
        Example::new("private struct »_MyView_Previews"),
        Example::new("struct »MyView_Previews_Previews: PreviewProvider"),
        Example::new("typealias »X = Void"),
        Example::new("private typealias »Foo_Bar = Void"),
        Example::new("private typealias »foo = Void"),
        Example::new(format!("typealias »{} = Void", "A".repeat(41))),
        Example::new("protocol Foo {\n  associatedtype »X\n}"),
        Example::new("protocol Foo {\n  associatedtype »Foo_Bar: Equatable\n}"),
        Example::new(format!("protocol Foo {{\n  associatedtype »{}\n}}", "A".repeat(41))),
    ]
}
