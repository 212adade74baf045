//! # gs1-core — Foundational Types for GS1 Identifier Canonicalization
//!
//! This crate is the leaf of the workspace. It defines everything the
//! converter needs to reason about a GS1 Application Identifier without
//! performing a conversion itself: the descriptor table, the check-digit
//! arithmetic, the rule-chain matcher, and the front-end normalizer.
//!
//! ## Key Design Principles
//!
//! 1. **One descriptor per AI type.** [`AiType`] is a single exhaustive enum
//!    and every grammar difference between types lives in its
//!    [`AiDescriptor`]. The matcher and the converter are generic over the
//!    descriptor; there is no per-type control flow.
//!
//! 2. **Rules run in order and stop at the first failure.** A later rule may
//!    index into substrings that an earlier rule proved exist. See
//!    [`matcher`].
//!
//! 3. **Immutable tables.** Descriptors are `'static` data and rule sets are
//!    compiled once behind a `LazyLock`. Nothing in this crate holds mutable
//!    state, so every function is re-entrant.
//!
//! 4. **Errors carry the input.** Every [`ValidationError`] includes the
//!    offending string and the violated rule in its message.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `gs1-*` crates.
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests. The one `.expect()` compiles static rule
//!   patterns and is exercised by the test suite.

pub mod checksum;
pub mod descriptor;
pub mod domain;
pub mod error;
pub mod fields;
pub mod identifier;
pub mod matcher;
pub mod resolver;

// Re-export primary types for ergonomic imports.
pub use checksum::{compute_check_digit, verify_check_digit, verify_check_digit_at};
pub use descriptor::{classify, sniff, AiDescriptor, AiType, Charset, PayloadWidth, SerialPlacement};
pub use domain::{ai_code_for_short_name, canonicalize_domain, normalize, replace_short_name_alias, CANONICAL_DOMAIN};
pub use error::{
    ConversionStage, ErrorCategory, Gs1Error, UnsupportedIdentifierError, ValidationError,
};
pub use identifier::{CanonicalResult, Direction, Level, ParsedIdentifier, ValidationContext};
pub use matcher::{check, detect_level, rule_set, validate, RuleKind, RuleSet, Validated};
pub use resolver::GcpLengthResolver;
