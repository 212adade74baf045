//! # Identifier Data Model
//!
//! The values that flow through a validation or conversion:
//!
//! - [`ValidationContext`]: what the caller knows (company prefix length)
//!   and wants checked (check digit).
//! - [`ParsedIdentifier`]: the named fields of one identifier, produced by
//!   a parse and consumed by a render. Never persisted.
//! - [`CanonicalResult`]: the public result of a Digital Link to URN
//!   conversion.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::descriptor::AiType;

/// Which representation an identifier is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// EPC URN (`urn:epc:…`).
    Urn,
    /// GS1 Digital Link Web URI (`http(s)://…`).
    DigitalLink,
}

impl Direction {
    /// Detect the representation from the identifier's scheme.
    pub fn detect(identifier: &str) -> Option<Self> {
        if identifier.starts_with("urn:") {
            Some(Self::Urn)
        } else if identifier.starts_with("https://") || identifier.starts_with("http://") {
            Some(Self::DigitalLink)
        } else {
            None
        }
    }
}

/// Whether an identifier names one object or a class of objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// A specific serialised object (or a lot, for LGTIN).
    Instance,
    /// A class pattern; the serial is the wildcard `*`.
    Class,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Instance => "instance",
            Self::Class => "class",
        })
    }
}

/// Caller-supplied facts and switches for one validation.
///
/// The company prefix length is mandatory when validating a Digital Link
/// URI and ignored for URNs, whose dots already delimit the prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationContext {
    /// Company prefix length of the identifier, when known.
    pub gcp_length: Option<usize>,
    /// Verify the supplied check digit against the computed one.
    pub validate_check_digit: bool,
}

impl ValidationContext {
    /// Context for URN validation: no prefix length, no check digit.
    pub fn urn() -> Self {
        Self::default()
    }

    /// Context for Digital Link validation with a known prefix length.
    pub fn digital_link(gcp_length: usize) -> Self {
        Self {
            gcp_length: Some(gcp_length),
            validate_check_digit: false,
        }
    }

    /// Toggle check digit verification.
    pub fn with_check_digit(mut self, validate: bool) -> Self {
        self.validate_check_digit = validate;
        self
    }
}

/// The named fields of one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedIdentifier {
    /// AI family.
    pub ai_type: AiType,
    /// Company prefix digits.
    pub gcp: String,
    /// URN item reference (indicator digit included where the type has one).
    pub item_reference: String,
    /// Fixed-width fields after the check digit (ITIP piece and total).
    pub counters: Vec<String>,
    /// Serial, lot, extension or TPX; `None` for class level or serial-less types.
    pub serial: Option<String>,
    /// Instance or class.
    pub level: Level,
    /// Check digit as captured from a Digital Link URI.
    pub check_digit: Option<char>,
}

impl ParsedIdentifier {
    /// Whether this is a class-level (pattern) identifier.
    pub fn is_class_level(&self) -> bool {
        self.level == Level::Class
    }
}

/// Result of converting a Digital Link URI to its EPC URN.
///
/// Serialises as a flat JSON object with the keys `asCaptured`, `asURN`,
/// `canonicalDL`, `serial` (when present) and one type-named key holding
/// the primary key value (`gtin`, `sscc`, `gln`, …).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalResult {
    /// AI family of the identifier.
    pub ai_type: AiType,
    /// The identifier exactly as the caller supplied it.
    pub as_captured: String,
    /// The EPC URN, or the pattern URN for class-level conversions.
    pub as_urn: String,
    /// The Digital Link URI on the canonical GS1 domain.
    pub canonical_dl: String,
    /// Serial component, when the identifier has one.
    pub serial: Option<String>,
    /// Primary key value as it appears in the canonical URI.
    pub value: String,
}

impl CanonicalResult {
    /// Name of the type-named raw value field.
    pub fn raw_field(&self) -> &'static str {
        self.ai_type.descriptor().raw_field
    }
}

impl Serialize for CanonicalResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.serial.is_some() { 5 } else { 4 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("asCaptured", &self.as_captured)?;
        map.serialize_entry("asURN", &self.as_urn)?;
        map.serialize_entry("canonicalDL", &self.canonical_dl)?;
        if let Some(serial) = &self.serial {
            map.serialize_entry("serial", serial)?;
        }
        map.serialize_entry(self.raw_field(), &self.value)?;
        map.end()
    }
}
