//! # sift-core
//!
//! Core framework for the sift linter: rule contracts, suppression-aware
//! evaluation, and the executable example harness.
//!
//! The pieces fit together like this:
//!
//! - A rule implements [`Rule`] (detection) and optionally [`Correcting`]
//!   (tree rewriting); at registration time it is folded into a
//!   [`RuleHandle`] capability record, and a [`Registry`] maps rule
//!   identifiers to handles.
//! - [`RuleEvaluation`] applies one rule to one parsed file. It resolves
//!   the file's [`SuppressedRegions`] once and shares them between the
//!   detection and correction passes, so the two can never disagree about
//!   what is excluded.
//! - Every rule ships non-triggering, triggering, and correction examples
//!   in its [`RuleDescription`]; [`conformance::verify_rule`] runs them as
//!   the rule's own conformance test.
//!
//! ## Example
//!
//! ```ignore
//! use sift_core::RuleEvaluation;
//! use sift_syntax::SourceFile;
//!
//! let file = SourceFile::parse(text)?;
//! let evaluation = RuleEvaluation::new(&file, &handle, None);
//! for violation in evaluation.violations() {
//!     println!("{violation}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod conformance;
mod config;
mod engine;
mod rule;
mod suppression;
mod types;

pub use config::{ConfigError, RuleConfig};
pub use engine::RuleEvaluation;
pub use rule::{
    Correcting, CorrectionExample, Example, Registry, RegistryError, Rule, RuleCategory,
    RuleDescription, RuleHandle,
};
pub use suppression::SuppressedRegions;
pub use types::{CorrectionResult, Location, Severity, Violation, ViolationDiagnostic};
