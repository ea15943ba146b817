//! Tizhi Core
//!
//! Rule-based constitution classification engine. Takes a free-text
//! symptom description and classifies it into one of nine fixed
//! constitution categories, returning a primary type, secondary
//! candidates, a normalized confidence, the keyword evidence that
//! fired, and clarification questions when the evidence is weak.
//!
//! This is a wellness-tendency classifier, not a diagnostic tool.
//!
//! ## Key Concepts
//!
//! - **ConstitutionType**: closed set of nine categories
//! - **Rulebook**: immutable keyword/weight tables, one entry per type
//! - **ScoreSet**: raw per-type scores plus matched-keyword evidence
//! - **Verdict**: the decision — either a classified type or an
//!   explicit insufficient-evidence outcome
//!
//! ## Architecture
//!
//! This crate has zero external dependencies and no I/O. Every
//! classification is a pure function of the rulebook (built once at
//! startup, shared read-only) and the input text, so it can be called
//! concurrently without coordination. The HTTP boundary lives in
//! tizhi-server.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod constitution;
pub mod decision;
pub mod rules;
pub mod scorer;

// Re-exports for convenience
pub use constitution::ConstitutionType;
pub use decision::{decide, DecisionConfig, EvidenceSummary, Verdict, DISCLAIMER};
pub use rules::{RuleEntry, Rulebook};
pub use scorer::{score, MatchEvidence, Polarity, ScoreResult, ScoreSet};
