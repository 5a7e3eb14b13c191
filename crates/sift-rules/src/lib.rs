//! # sift-rules
//!
//! Built-in lint rules for sift.
//!
//! ## Available rules
//!
//! | Code | Identifier | Corrects | Description |
//! |------|------------|----------|-------------|
//! | SF001 | `redundant-nil-coalescing` | yes | Flags and removes `?? nil` |
//! | SF002 | `type-name` | no | Validates type/alias/associated-type names |
//!
//! Every rule carries its own example contract; run it with
//! `sift_core::conformance::verify_rule`.
//!
//! ## Usage
//!
//! ```ignore
//! use sift_core::{Registry, RuleEvaluation};
//! use sift_rules::builtin_rules;
//!
//! let mut registry = Registry::new();
//! for handle in builtin_rules() {
//!     registry.register(handle)?;
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod redundant_nil_coalescing;
pub mod type_name;

pub use redundant_nil_coalescing::RedundantNilCoalescing;
pub use type_name::{NameIssue, NameKind, TypeName, TypeNameConfig};

/// Re-export core types for convenience.
pub use sift_core::{Registry, RuleHandle, Severity, Violation};

/// Returns every bundled rule, ready for registration.
#[must_use]
pub fn builtin_rules() -> Vec<RuleHandle> {
    vec![RedundantNilCoalescing::handle(), TypeName::handle()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_identifiers_are_unique() {
        let mut registry = Registry::new();
        for handle in builtin_rules() {
            registry.register(handle).expect("identifiers are unique");
        }
        assert_eq!(registry.len(), 2);
        assert!(registry.get("redundant-nil-coalescing").is_some());
        assert!(registry.get("type-name").is_some());
    }

    #[test]
    fn correction_capability_matches_the_rules() {
        let registry: Vec<RuleHandle> = builtin_rules();
        let by_id = |id: &str| {
            registry
                .iter()
                .find(|h| h.identifier() == id)
                .expect("rule exists")
        };
        assert!(by_id("redundant-nil-coalescing").is_correctable());
        assert!(!by_id("type-name").is_correctable());
    }
}
