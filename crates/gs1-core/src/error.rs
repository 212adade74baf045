//! # Error Hierarchy
//!
//! Structured error types for GS1 identifier handling, built with `thiserror`.
//! No `Box<dyn Error>`.
//!
//! Callers see exactly two outcomes on failure:
//!
//! - [`Gs1Error::Validation`]: the input is malformed, carries a bad company
//!   prefix length, or fails its check digit. Carries the original input, the
//!   last conversion stage it reached, and the violated rule.
//! - [`Gs1Error::UnsupportedIdentifier`]: the company prefix length could
//!   not be resolved automatically. Resolver errors pass through unchanged.
//!
//! [`ErrorCategory`] folds both into the four-way taxonomy used for
//! diagnostics: grammar, company prefix, checksum, resolution.

use serde::Serialize;
use thiserror::Error;

use crate::descriptor::AiType;

/// Top-level error type for every public conversion entry point.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Gs1Error {
    /// The identifier was rejected by the matcher or by the round-trip check.
    #[error("invalid identifier \"{input}\" after {stage}: {source}")]
    Validation {
        /// The identifier exactly as the caller supplied it.
        input: String,
        /// The last conversion stage the identifier reached.
        stage: ConversionStage,
        /// The violated rule.
        #[source]
        source: ValidationError,
    },

    /// The company prefix length could not be determined automatically.
    #[error(transparent)]
    UnsupportedIdentifier(#[from] UnsupportedIdentifierError),
}

impl Gs1Error {
    /// Wrap a validation failure with the caller's input and the last stage reached.
    pub fn validation(
        input: impl Into<String>,
        stage: ConversionStage,
        source: ValidationError,
    ) -> Self {
        Self::Validation {
            input: input.into(),
            stage,
            source,
        }
    }

    /// Classify this error into the diagnostic taxonomy.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { source, .. } => source.category(),
            Self::UnsupportedIdentifier(_) => ErrorCategory::Resolution,
        }
    }

    /// The last stage reached before validation failed, if this is a
    /// validation error.
    pub fn stage(&self) -> Option<ConversionStage> {
        match self {
            Self::Validation { stage, .. } => Some(*stage),
            Self::UnsupportedIdentifier(_) => None,
        }
    }
}

/// A rule violation detected by the matcher or the converter.
///
/// The `rule` field holds the violated rule's message with the offending
/// input already interpolated, so `Display` alone is enough to correlate a
/// failure with its input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The input does not match the type's grammar (prefix, digit count, charset).
    #[error("grammar violation: {rule}")]
    Grammar {
        /// The string the rule was evaluated against.
        input: String,
        /// The violated rule, input interpolated.
        rule: String,
    },

    /// The company prefix length is missing, outside 6..=12, or longer than
    /// the payload it is supposed to prefix.
    #[error("company prefix violation: {rule}")]
    CompanyPrefix {
        /// The string the rule was evaluated against.
        input: String,
        /// The violated rule, input interpolated.
        rule: String,
    },

    /// The supplied check digit disagrees with the computed one.
    #[error("checksum mismatch: {rule}")]
    ChecksumMismatch {
        /// The string the rule was evaluated against.
        input: String,
        /// The violated rule, input interpolated.
        rule: String,
    },

    /// No AI type claims the identifier.
    #[error("unrecognized GS1 identifier: \"{input}\"")]
    UnrecognizedIdentifier {
        /// The unrecognized string.
        input: String,
    },

    /// More than one mutually exclusive AI type claims the identifier.
    #[error("ambiguous GS1 identifier: \"{input}\" matches {candidates:?}")]
    AmbiguousIdentifier {
        /// The ambiguous string.
        input: String,
        /// Every type whose marker segment is present.
        candidates: Vec<AiType>,
    },

    /// A class-level (pattern) form was requested for a type that has none.
    #[error("{ai_type} has no class-level form: \"{input}\"")]
    ClassLevelUnsupported {
        /// The offending string.
        input: String,
        /// The AI type that was identified.
        ai_type: AiType,
    },

    /// The converter's own output failed re-validation.
    #[error("rendered identifier \"{rendered}\" failed re-validation: {source}")]
    RoundTrip {
        /// The freshly rendered identifier.
        rendered: String,
        /// The rule the rendered identifier violated.
        #[source]
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    /// Classify this error into the diagnostic taxonomy.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Grammar { .. }
            | Self::UnrecognizedIdentifier { .. }
            | Self::AmbiguousIdentifier { .. }
            | Self::ClassLevelUnsupported { .. } => ErrorCategory::Grammar,
            Self::CompanyPrefix { .. } => ErrorCategory::CompanyPrefix,
            Self::ChecksumMismatch { .. } => ErrorCategory::Checksum,
            Self::RoundTrip { source, .. } => source.category(),
        }
    }
}

/// The company prefix length could not be resolved.
///
/// Produced by [`GcpLengthResolver`](crate::resolver::GcpLengthResolver)
/// implementations and surfaced to callers without modification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnsupportedIdentifierError {
    /// The input was empty or whitespace.
    #[error("unsupported GS1 identifier: input is empty")]
    Empty,

    /// The input is not an http(s) Digital Link URI (for example a bare URN).
    #[error("unsupported GS1 identifier: \"{0}\" is not a Digital Link URI")]
    NotDigitalLink(String),

    /// The URI host is missing or contains characters a hostname cannot.
    #[error("unsupported GS1 identifier: \"{0}\" has a malformed domain")]
    MalformedDomain(String),

    /// The requested AI code is not a primary key this system handles, or
    /// does not occur in the URI.
    #[error("unsupported GS1 identifier: AI code \"{ai_code}\" not found in \"{input}\"")]
    UnknownAiCode {
        /// The identifier that was inspected.
        input: String,
        /// The AI code that was requested.
        ai_code: String,
    },

    /// No prefix range in the table covers the identifier.
    #[error("unsupported GS1 identifier: no company prefix range covers \"{0}\"")]
    PrefixNotFound(String),

    /// The covering prefix range is not allocated to company prefixes.
    #[error("unsupported GS1 identifier: prefix range {prefix} of \"{input}\" carries no company prefix")]
    NoCompanyPrefix {
        /// The identifier that was inspected.
        input: String,
        /// The matching range prefix.
        prefix: String,
    },

    /// Automatic resolution was requested but no resolver is configured.
    #[error("unsupported GS1 identifier: no company prefix resolver configured for \"{0}\"")]
    NoResolver(String),
}

/// The four-way diagnostic taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Wrong prefix, wrong digit count, disallowed characters.
    Grammar,
    /// Company prefix length out of bounds or longer than the payload.
    CompanyPrefix,
    /// Computed check digit disagrees with the supplied one.
    Checksum,
    /// Company prefix length could not be resolved.
    Resolution,
}

/// Conversion pipeline stages, in order.
///
/// A conversion advances `Unparsed -> TypeIdentified -> Validated ->
/// FieldsExtracted -> Rendered -> RoundTripValidated`. A failure records the
/// last stage the conversion reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionStage {
    /// Nothing is known about the input yet.
    Unparsed,
    /// The AI type and direction have been identified.
    TypeIdentified,
    /// The input passed its rule chain.
    Validated,
    /// Company prefix, reference and serial have been split out.
    FieldsExtracted,
    /// The target representation has been assembled.
    Rendered,
    /// The rendered output passed its own rule chain.
    RoundTripValidated,
}

impl ConversionStage {
    /// Returns the snake_case name of the stage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unparsed => "unparsed",
            Self::TypeIdentified => "type_identified",
            Self::Validated => "validated",
            Self::FieldsExtracted => "fields_extracted",
            Self::Rendered => "rendered",
            Self::RoundTripValidated => "round_trip_validated",
        }
    }
}

impl std::fmt::Display for ConversionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
