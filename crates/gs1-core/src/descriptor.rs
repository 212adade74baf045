//! # AI Descriptor Table — Single Source of Truth
//!
//! Defines [`AiType`], one variant per supported GS1 Application Identifier
//! family, and the static [`AiDescriptor`] each variant owns. Every grammar
//! difference between types (payload width, check digit offset, indicator
//! digit, serial placement, class-level support) is data in this table. The
//! matcher and converter read it; neither contains per-type branches.
//!
//! ## Payload Layouts
//!
//! | Type  | AI   | URI payload                         | Check | Serial                  |
//! |-------|------|-------------------------------------|-------|-------------------------|
//! | SGTIN | 01   | 14 digits, indicator first          | 13    | `/21/` segment          |
//! | LGTIN | 01   | 14 digits, indicator first          | 13    | `/10/` segment (lot)    |
//! | UPUI  | 01   | 14 digits, indicator first          | 13    | `/235/` segment (TPX)   |
//! | SSCC  | 00   | 18 digits, extension first          | 17    | —                       |
//! | SGLN  | 414  | 13 digits                           | 12    | `/254/`, default `0`    |
//! | PGLN  | 417  | 13 digits                           | 12    | —                       |
//! | GRAI  | 8003 | 13 digits                           | 12    | inline suffix           |
//! | GIAI  | 8004 | 7–30 characters                     | —     | —                       |
//! | GDTI  | 253  | 13 digits                           | 12    | inline suffix           |
//! | GINC  | 401  | 7–30 characters                     | —     | —                       |
//! | GSRN  | 8018 | 18 digits                           | 17    | —                       |
//! | GSRNP | 8017 | 18 digits                           | 17    | —                       |
//! | GSIN  | 402  | 17 digits                           | 16    | —                       |
//! | ITIP  | 8006 | 18 digits: GTIN + piece + total     | 13    | `/21/` segment          |
//! | CPI   | 8010 | 7–30 characters                     | —     | `/8011/` segment        |
//! | SGCN  | 255  | 13 digits                           | 12    | inline suffix           |
//!
//! ## Sniffing
//!
//! Three types share AI `01`. [`sniff`] tells them apart by which competing
//! marker segment (`21`, `10`, `235`) sits at a key position, independent of
//! segment order, and refuses identifiers carrying more than one.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ValidationError;
use crate::fields::DigitalLink;
use crate::identifier::Level;

/// Lowest company prefix length GS1 allocates.
pub const GCP_MIN: usize = 6;

/// Highest company prefix length GS1 allocates.
pub const GCP_MAX: usize = 12;

/// Every supported Application Identifier family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiType {
    /// Serialised GTIN (AI 01 + 21).
    Sgtin,
    /// GTIN + batch/lot (AI 01 + 10).
    Lgtin,
    /// Unit pack identifier (AI 01 + 235).
    Upui,
    /// Serial Shipping Container Code (AI 00).
    Sscc,
    /// Global Location Number with extension (AI 414 + 254).
    Sgln,
    /// Party GLN (AI 417).
    Pgln,
    /// Global Returnable Asset Identifier (AI 8003).
    Grai,
    /// Global Individual Asset Identifier (AI 8004).
    Giai,
    /// Global Document Type Identifier (AI 253).
    Gdti,
    /// Global Identification Number for Consignment (AI 401).
    Ginc,
    /// Global Service Relation Number, provider (AI 8018).
    Gsrn,
    /// Global Service Relation Number, recipient (AI 8017).
    Gsrnp,
    /// Global Shipment Identification Number (AI 402).
    Gsin,
    /// Individual Trade Item Piece (AI 8006 + 21).
    Itip,
    /// Component / Part Identifier (AI 8010 + 8011).
    Cpi,
    /// Serialised Global Coupon Number (AI 255).
    Sgcn,
}

/// Number of supported AI families. Used for compile-time assertions.
pub const AI_TYPE_COUNT: usize = 16;

/// Width of the URI payload of a type's primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadWidth {
    /// Exactly this many digits.
    Fixed(usize),
    /// Between `min` and `max` characters, inclusive.
    Range(usize, usize),
}

/// Character classes used in references and serials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Charset {
    /// ASCII digits only.
    Numeric,
    /// GS1 AI encodable character set 82, with URI-reserved characters
    /// percent-encoded.
    Cset82,
    /// GS1 AI encodable character set 39 (`0-9`, `A-Z`, `-`, and `#` / `/`
    /// as `%23` / `%2F`).
    Cset39,
}

impl Charset {
    /// Regex fragment matching one character of this set.
    pub fn regex_class(&self) -> &'static str {
        match self {
            Self::Numeric => "[0-9]",
            Self::Cset82 => r"(?:[A-Za-z0-9!'()*+,\-.:;=_]|%[0-9A-Fa-f]{2})",
            Self::Cset39 => r"(?:[0-9A-Z\-]|%2[3Ff])",
        }
    }

    /// Human-readable name used in rule messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Numeric => "digits",
            Self::Cset82 => "GS1 AI encodable characters",
            Self::Cset39 => "GS1 component/part characters",
        }
    }
}

/// Where a type's serial (or serial-like qualifier) lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SerialPlacement {
    /// The type has no serial component.
    None,
    /// A separate `/<ai>/<serial>` path segment in the URI and a trailing
    /// URN field.
    Segment {
        /// The AI code of the serial segment.
        ai: &'static str,
        /// Allowed characters.
        charset: Charset,
        /// Maximum serial length.
        max_len: usize,
        /// URN value that stands for an absent URI segment.
        default: Option<&'static str>,
    },
    /// Characters appended directly after the key's check digit in the URI
    /// and a trailing URN field.
    Inline {
        /// Allowed characters.
        charset: Charset,
        /// Maximum serial length.
        max_len: usize,
    },
}

/// Layout of a type's primary key inside the URI payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeyLayout {
    /// Payload width, check digit and counters included.
    pub width: PayloadWidth,
    /// Offset of the check digit within the payload, if the key has one.
    pub check_offset: Option<usize>,
    /// The leading digit is an indicator/extension digit that moves to the
    /// front of the URN item reference.
    pub indicator: bool,
    /// Widths of fixed fields following the check digit (ITIP piece, total).
    pub counters: &'static [usize],
    /// Characters allowed in the reference of variable-width keys.
    pub charset: Charset,
}

/// Static metadata for one AI family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AiDescriptor {
    /// The family this descriptor belongs to.
    pub ai_type: AiType,
    /// EPC scheme name (`sgtin`, `sscc`, …).
    pub scheme: &'static str,
    /// Instance-level URN prefix.
    pub urn_prefix: &'static str,
    /// Class-level (pattern) URN prefix, when the type has one.
    pub pattern_prefix: Option<&'static str>,
    /// Primary AI code in the URI path.
    pub ai_code: &'static str,
    /// Primary key layout.
    pub key: KeyLayout,
    /// Serial placement.
    pub serial: SerialPlacement,
    /// Inclusive company prefix length bounds.
    pub gcp_bounds: (usize, usize),
    /// Name of the type-named raw value in a canonical result.
    pub raw_field: &'static str,
    /// Label for the URN reference field in rule messages.
    pub reference_label: &'static str,
}

const GTIN_KEY: KeyLayout = KeyLayout {
    width: PayloadWidth::Fixed(14),
    check_offset: Some(13),
    indicator: true,
    counters: &[],
    charset: Charset::Numeric,
};

const GLN_KEY: KeyLayout = KeyLayout {
    width: PayloadWidth::Fixed(13),
    check_offset: Some(12),
    indicator: false,
    counters: &[],
    charset: Charset::Numeric,
};

const EIGHTEEN_DIGIT_KEY: KeyLayout = KeyLayout {
    width: PayloadWidth::Fixed(18),
    check_offset: Some(17),
    indicator: false,
    counters: &[],
    charset: Charset::Numeric,
};

const VARIABLE_KEY: KeyLayout = KeyLayout {
    width: PayloadWidth::Range(7, 30),
    check_offset: None,
    indicator: false,
    counters: &[],
    charset: Charset::Cset82,
};

const GS1_SERIAL_20: Charset = Charset::Cset82;

/// The descriptor table, in [`AiType`] declaration order.
pub static DESCRIPTORS: [AiDescriptor; AI_TYPE_COUNT] = [
    AiDescriptor {
        ai_type: AiType::Sgtin,
        scheme: "sgtin",
        urn_prefix: "urn:epc:id:sgtin:",
        pattern_prefix: Some("urn:epc:idpat:sgtin:"),
        ai_code: "01",
        key: GTIN_KEY,
        serial: SerialPlacement::Segment {
            ai: "21",
            charset: GS1_SERIAL_20,
            max_len: 20,
            default: None,
        },
        gcp_bounds: (GCP_MIN, GCP_MAX),
        raw_field: "gtin",
        reference_label: "indicator and item reference",
    },
    AiDescriptor {
        ai_type: AiType::Lgtin,
        scheme: "lgtin",
        urn_prefix: "urn:epc:class:lgtin:",
        pattern_prefix: None,
        ai_code: "01",
        key: GTIN_KEY,
        serial: SerialPlacement::Segment {
            ai: "10",
            charset: Charset::Cset82,
            max_len: 20,
            default: None,
        },
        gcp_bounds: (GCP_MIN, GCP_MAX),
        raw_field: "gtin",
        reference_label: "indicator and item reference",
    },
    AiDescriptor {
        ai_type: AiType::Upui,
        scheme: "upui",
        urn_prefix: "urn:epc:id:upui:",
        pattern_prefix: None,
        ai_code: "01",
        key: GTIN_KEY,
        serial: SerialPlacement::Segment {
            ai: "235",
            charset: Charset::Cset82,
            max_len: 28,
            default: None,
        },
        gcp_bounds: (GCP_MIN, GCP_MAX),
        raw_field: "gtin",
        reference_label: "indicator and item reference",
    },
    AiDescriptor {
        ai_type: AiType::Sscc,
        scheme: "sscc",
        urn_prefix: "urn:epc:id:sscc:",
        pattern_prefix: None,
        ai_code: "00",
        key: KeyLayout {
            indicator: true,
            ..EIGHTEEN_DIGIT_KEY
        },
        serial: SerialPlacement::None,
        gcp_bounds: (GCP_MIN, GCP_MAX),
        raw_field: "sscc",
        reference_label: "extension digit and serial reference",
    },
    AiDescriptor {
        ai_type: AiType::Sgln,
        scheme: "sgln",
        urn_prefix: "urn:epc:id:sgln:",
        pattern_prefix: Some("urn:epc:idpat:sgln:"),
        ai_code: "414",
        key: GLN_KEY,
        serial: SerialPlacement::Segment {
            ai: "254",
            charset: Charset::Cset82,
            max_len: 20,
            default: Some("0"),
        },
        gcp_bounds: (GCP_MIN, GCP_MAX),
        raw_field: "gln",
        reference_label: "location reference",
    },
    AiDescriptor {
        ai_type: AiType::Pgln,
        scheme: "pgln",
        urn_prefix: "urn:epc:id:pgln:",
        pattern_prefix: None,
        ai_code: "417",
        key: GLN_KEY,
        serial: SerialPlacement::None,
        gcp_bounds: (GCP_MIN, GCP_MAX),
        raw_field: "pgln",
        reference_label: "party reference",
    },
    AiDescriptor {
        ai_type: AiType::Grai,
        scheme: "grai",
        urn_prefix: "urn:epc:id:grai:",
        pattern_prefix: Some("urn:epc:idpat:grai:"),
        ai_code: "8003",
        key: GLN_KEY,
        serial: SerialPlacement::Inline {
            charset: Charset::Cset82,
            max_len: 16,
        },
        gcp_bounds: (GCP_MIN, GCP_MAX),
        raw_field: "grai",
        reference_label: "asset type",
    },
    AiDescriptor {
        ai_type: AiType::Giai,
        scheme: "giai",
        urn_prefix: "urn:epc:id:giai:",
        pattern_prefix: None,
        ai_code: "8004",
        key: VARIABLE_KEY,
        serial: SerialPlacement::None,
        gcp_bounds: (GCP_MIN, GCP_MAX),
        raw_field: "giai",
        reference_label: "individual asset reference",
    },
    AiDescriptor {
        ai_type: AiType::Gdti,
        scheme: "gdti",
        urn_prefix: "urn:epc:id:gdti:",
        pattern_prefix: Some("urn:epc:idpat:gdti:"),
        ai_code: "253",
        key: GLN_KEY,
        serial: SerialPlacement::Inline {
            charset: Charset::Cset82,
            max_len: 17,
        },
        gcp_bounds: (GCP_MIN, GCP_MAX),
        raw_field: "gdti",
        reference_label: "document type",
    },
    AiDescriptor {
        ai_type: AiType::Ginc,
        scheme: "ginc",
        urn_prefix: "urn:epc:id:ginc:",
        pattern_prefix: None,
        ai_code: "401",
        key: VARIABLE_KEY,
        serial: SerialPlacement::None,
        gcp_bounds: (GCP_MIN, GCP_MAX),
        raw_field: "ginc",
        reference_label: "consignment reference",
    },
    AiDescriptor {
        ai_type: AiType::Gsrn,
        scheme: "gsrn",
        urn_prefix: "urn:epc:id:gsrn:",
        pattern_prefix: None,
        ai_code: "8018",
        key: EIGHTEEN_DIGIT_KEY,
        serial: SerialPlacement::None,
        gcp_bounds: (GCP_MIN, GCP_MAX),
        raw_field: "gsrn",
        reference_label: "service reference",
    },
    AiDescriptor {
        ai_type: AiType::Gsrnp,
        scheme: "gsrnp",
        urn_prefix: "urn:epc:id:gsrnp:",
        pattern_prefix: None,
        ai_code: "8017",
        key: EIGHTEEN_DIGIT_KEY,
        serial: SerialPlacement::None,
        gcp_bounds: (GCP_MIN, GCP_MAX),
        raw_field: "gsrnp",
        reference_label: "service reference",
    },
    AiDescriptor {
        ai_type: AiType::Gsin,
        scheme: "gsin",
        urn_prefix: "urn:epc:id:gsin:",
        pattern_prefix: None,
        ai_code: "402",
        key: KeyLayout {
            width: PayloadWidth::Fixed(17),
            check_offset: Some(16),
            ..GLN_KEY
        },
        serial: SerialPlacement::None,
        gcp_bounds: (GCP_MIN, GCP_MAX),
        raw_field: "gsin",
        reference_label: "shipper reference",
    },
    AiDescriptor {
        ai_type: AiType::Itip,
        scheme: "itip",
        urn_prefix: "urn:epc:id:itip:",
        pattern_prefix: Some("urn:epc:idpat:itip:"),
        ai_code: "8006",
        key: KeyLayout {
            width: PayloadWidth::Fixed(18),
            counters: &[2, 2],
            ..GTIN_KEY
        },
        serial: SerialPlacement::Segment {
            ai: "21",
            charset: GS1_SERIAL_20,
            max_len: 20,
            default: None,
        },
        gcp_bounds: (GCP_MIN, GCP_MAX),
        raw_field: "itip",
        reference_label: "indicator and item reference",
    },
    AiDescriptor {
        ai_type: AiType::Cpi,
        scheme: "cpi",
        urn_prefix: "urn:epc:id:cpi:",
        pattern_prefix: Some("urn:epc:idpat:cpi:"),
        ai_code: "8010",
        key: KeyLayout {
            charset: Charset::Cset39,
            ..VARIABLE_KEY
        },
        serial: SerialPlacement::Segment {
            ai: "8011",
            charset: Charset::Numeric,
            max_len: 12,
            default: None,
        },
        gcp_bounds: (GCP_MIN, GCP_MAX),
        raw_field: "cpi",
        reference_label: "component/part reference",
    },
    AiDescriptor {
        ai_type: AiType::Sgcn,
        scheme: "sgcn",
        urn_prefix: "urn:epc:id:sgcn:",
        pattern_prefix: Some("urn:epc:idpat:sgcn:"),
        ai_code: "255",
        key: GLN_KEY,
        serial: SerialPlacement::Inline {
            charset: Charset::Numeric,
            max_len: 12,
        },
        gcp_bounds: (GCP_MIN, GCP_MAX),
        raw_field: "gcn",
        reference_label: "coupon reference",
    },
];

impl AiType {
    /// Returns all supported AI families in canonical order.
    pub fn all() -> &'static [AiType] {
        &[
            Self::Sgtin,
            Self::Lgtin,
            Self::Upui,
            Self::Sscc,
            Self::Sgln,
            Self::Pgln,
            Self::Grai,
            Self::Giai,
            Self::Gdti,
            Self::Ginc,
            Self::Gsrn,
            Self::Gsrnp,
            Self::Gsin,
            Self::Itip,
            Self::Cpi,
            Self::Sgcn,
        ]
    }

    /// The static descriptor for this family.
    pub fn descriptor(&self) -> &'static AiDescriptor {
        &DESCRIPTORS[*self as usize]
    }

    /// Returns the lowercase EPC scheme name.
    pub fn as_str(&self) -> &'static str {
        self.descriptor().scheme
    }

    /// The families whose primary key uses `ai_code`.
    pub fn for_ai_code(ai_code: &str) -> Vec<AiType> {
        DESCRIPTORS
            .iter()
            .filter(|d| d.ai_code == ai_code)
            .map(|d| d.ai_type)
            .collect()
    }

    /// Whether `ai_code` is the primary key of some supported family.
    pub fn is_primary_ai_code(ai_code: &str) -> bool {
        DESCRIPTORS.iter().any(|d| d.ai_code == ai_code)
    }
}

impl std::fmt::Display for AiType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

impl FromStr for AiType {
    type Err = ValidationError;

    /// Parse a family from its EPC scheme name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DESCRIPTORS
            .iter()
            .find(|d| d.scheme.eq_ignore_ascii_case(s))
            .map(|d| d.ai_type)
            .ok_or_else(|| ValidationError::UnrecognizedIdentifier {
                input: s.to_string(),
            })
    }
}

impl AiDescriptor {
    /// Whether the type carries a serial (or serial-like) component.
    pub fn has_serial(&self) -> bool {
        !matches!(self.serial, SerialPlacement::None)
    }

    /// Whether the primary key ends in a GS1 check digit.
    pub fn checksum_required(&self) -> bool {
        self.key.check_offset.is_some()
    }

    /// Whether class-level (pattern) identifiers exist for this type.
    pub fn class_level_supported(&self) -> bool {
        self.pattern_prefix.is_some()
    }

    /// The AI code of the serial path segment, if the serial is a segment.
    pub fn serial_uri_marker(&self) -> Option<&'static str> {
        match self.serial {
            SerialPlacement::Segment { ai, .. } => Some(ai),
            _ => None,
        }
    }

    /// Payload width of the primary key in the URI.
    pub fn payload_width(&self) -> PayloadWidth {
        self.key.width
    }

    /// URN prefix for the given level, if the level exists for this type.
    pub fn prefix_for(&self, level: Level) -> Option<&'static str> {
        match level {
            Level::Instance => Some(self.urn_prefix),
            Level::Class => self.pattern_prefix,
        }
    }

    /// Digits carried by the URN company prefix and reference fields
    /// together: the fixed key width without check digit and counters.
    ///
    /// `None` for variable-width keys.
    pub fn urn_key_digits(&self) -> Option<usize> {
        match self.key.width {
            PayloadWidth::Fixed(width) => {
                let check = usize::from(self.checksum_required());
                let counters: usize = self.key.counters.iter().sum();
                Some(width - check - counters)
            }
            PayloadWidth::Range(..) => None,
        }
    }

    /// Longest company prefix the key can hold for a fixed-width key.
    pub fn max_gcp_in_key(&self) -> Option<usize> {
        self.urn_key_digits()
            .map(|digits| digits - usize::from(self.key.indicator))
    }

    /// Human-readable URN shape for rule messages.
    pub fn urn_shape(&self, level: Level) -> String {
        let prefix = self.prefix_for(level).unwrap_or(self.urn_prefix);
        let mut shape = format!("{prefix}<company prefix>.<{}>", self.reference_label);
        if !self.key.counters.is_empty() {
            shape.push_str(".<piece>.<total>");
        }
        match (self.serial, level) {
            (SerialPlacement::None, _) => {}
            (_, Level::Class) => shape.push_str(".*"),
            (_, Level::Instance) => shape.push_str(".<serial>"),
        }
        shape
    }

    /// Human-readable URI shape for rule messages.
    pub fn uri_shape(&self, level: Level) -> String {
        let key = match self.key.width {
            PayloadWidth::Fixed(width) => format!("{width} digits"),
            PayloadWidth::Range(min, max) => format!("{min}-{max} {}", self.key.charset.label()),
        };
        let mut shape = format!("https://<domain>/{}/<{key}>", self.ai_code);
        match (self.serial, level) {
            (_, Level::Class) | (SerialPlacement::None, _) => {}
            (SerialPlacement::Segment { ai, max_len, default, .. }, Level::Instance) => {
                if default.is_some() {
                    shape.push_str(&format!("[/{ai}/<up to {max_len} characters>]"));
                } else {
                    shape.push_str(&format!("/{ai}/<up to {max_len} characters>"));
                }
            }
            (SerialPlacement::Inline { max_len, .. }, Level::Instance) => {
                shape.push_str(&format!("<serial of up to {max_len} characters>"));
            }
        }
        shape
    }
}

/// Identify the AI family of a URN or Digital Link URI.
///
/// Returns `None` when no family, or more than one mutually exclusive
/// family, claims the identifier. Use [`classify`] for the reason.
pub fn sniff(identifier: &str) -> Option<AiType> {
    classify(identifier).ok()
}

/// Identify the AI family of a URN or Digital Link URI, explaining failure.
///
/// # Errors
///
/// - [`ValidationError::UnrecognizedIdentifier`] when no family matches.
/// - [`ValidationError::AmbiguousIdentifier`] when competing marker
///   segments are present together.
pub fn classify(identifier: &str) -> Result<AiType, ValidationError> {
    let unrecognized = || ValidationError::UnrecognizedIdentifier {
        input: identifier.to_string(),
    };

    if identifier.starts_with("urn:") {
        return DESCRIPTORS
            .iter()
            .find(|d| {
                identifier.starts_with(d.urn_prefix)
                    || d.pattern_prefix.is_some_and(|p| identifier.starts_with(p))
            })
            .map(|d| d.ai_type)
            .ok_or_else(unrecognized);
    }

    let link = DigitalLink::parse(identifier).ok_or_else(unrecognized)?;
    let primary = link.primary_code().ok_or_else(unrecognized)?;
    let candidates = AiType::for_ai_code(primary);

    match candidates.as_slice() {
        [] => Err(unrecognized()),
        [only] => Ok(*only),
        _ => {
            let present: Vec<AiType> = candidates
                .iter()
                .copied()
                .filter(|t| {
                    t.descriptor()
                        .serial_uri_marker()
                        .is_some_and(|marker| link.has_key(marker))
                })
                .collect();
            match present.as_slice() {
                [only] => Ok(*only),
                // A bare key is the class-level form of the candidate that has one.
                [] => candidates
                    .iter()
                    .copied()
                    .find(|t| t.descriptor().class_level_supported())
                    .ok_or_else(unrecognized),
                _ => Err(ValidationError::AmbiguousIdentifier {
                    input: identifier.to_string(),
                    candidates: present,
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_order_matches_enum() {
        assert_eq!(AiType::all().len(), AI_TYPE_COUNT);
        for t in AiType::all() {
            assert_eq!(t.descriptor().ai_type, *t, "descriptor out of order for {t}");
        }
    }

    #[test]
    fn schemes_and_prefixes_are_unique() {
        let mut schemes = std::collections::HashSet::new();
        let mut prefixes = std::collections::HashSet::new();
        for d in &DESCRIPTORS {
            assert!(schemes.insert(d.scheme), "duplicate scheme {}", d.scheme);
            assert!(prefixes.insert(d.urn_prefix), "duplicate prefix {}", d.urn_prefix);
            assert!(d.urn_prefix.ends_with(&format!("{}:", d.scheme)));
        }
    }

    #[test]
    fn check_offsets_fit_fixed_widths() {
        for d in &DESCRIPTORS {
            if let (PayloadWidth::Fixed(width), Some(offset)) = (d.key.width, d.key.check_offset) {
                let counters: usize = d.key.counters.iter().sum();
                assert_eq!(offset + 1 + counters, width, "bad layout for {}", d.ai_type);
            }
        }
    }

    #[test]
    fn urn_key_digits_per_type() {
        assert_eq!(AiType::Sgtin.descriptor().urn_key_digits(), Some(13));
        assert_eq!(AiType::Sscc.descriptor().urn_key_digits(), Some(17));
        assert_eq!(AiType::Sgln.descriptor().urn_key_digits(), Some(12));
        assert_eq!(AiType::Grai.descriptor().urn_key_digits(), Some(12));
        assert_eq!(AiType::Gsrn.descriptor().urn_key_digits(), Some(17));
        assert_eq!(AiType::Gsin.descriptor().urn_key_digits(), Some(16));
        assert_eq!(AiType::Itip.descriptor().urn_key_digits(), Some(13));
        assert_eq!(AiType::Giai.descriptor().urn_key_digits(), None);
    }

    #[test]
    fn checksum_flags() {
        for t in [
            AiType::Sgtin,
            AiType::Sscc,
            AiType::Sgln,
            AiType::Pgln,
            AiType::Grai,
            AiType::Gdti,
            AiType::Gsrn,
            AiType::Gsrnp,
            AiType::Sgcn,
            AiType::Itip,
        ] {
            assert!(t.descriptor().checksum_required(), "{t} should carry a check digit");
        }
        for t in [AiType::Giai, AiType::Ginc, AiType::Cpi] {
            assert!(!t.descriptor().checksum_required(), "{t} has no check digit");
        }
    }

    #[test]
    fn scheme_parse_roundtrip() {
        for t in AiType::all() {
            assert_eq!(t.as_str().parse::<AiType>().unwrap(), *t);
        }
        assert!("gtin".parse::<AiType>().is_err());
    }

    #[test]
    fn sniff_urns() {
        assert_eq!(sniff("urn:epc:id:sgtin:234567.1890123.9999"), Some(AiType::Sgtin));
        assert_eq!(sniff("urn:epc:idpat:sgtin:234567.1890123.*"), Some(AiType::Sgtin));
        assert_eq!(sniff("urn:epc:class:lgtin:234567.1890123.LOT"), Some(AiType::Lgtin));
        assert_eq!(sniff("urn:epc:id:gsrnp:123456.12345678901"), Some(AiType::Gsrnp));
        assert_eq!(sniff("urn:epc:id:gsrn:123456.12345678901"), Some(AiType::Gsrn));
        assert_eq!(sniff("urn:epc:id:unknown:1.2"), None);
    }

    #[test]
    fn sniff_gtin_family_by_marker() {
        let base = "https://id.gs1.org/01/12345678901231";
        assert_eq!(sniff(base), Some(AiType::Sgtin));
        assert_eq!(sniff(&format!("{base}/21/9999")), Some(AiType::Sgtin));
        assert_eq!(sniff(&format!("{base}/10/LOT1")), Some(AiType::Lgtin));
        assert_eq!(sniff(&format!("{base}/235/TPX1")), Some(AiType::Upui));
    }

    #[test]
    fn sniff_rejects_competing_markers_in_any_order() {
        let a = "https://id.gs1.org/01/12345678901231/21/9999/10/LOT1";
        let b = "https://id.gs1.org/01/12345678901231/10/LOT1/21/9999";
        for uri in [a, b] {
            assert_eq!(sniff(uri), None);
            match classify(uri) {
                Err(ValidationError::AmbiguousIdentifier { candidates, .. }) => {
                    assert_eq!(candidates, vec![AiType::Sgtin, AiType::Lgtin]);
                }
                other => panic!("expected ambiguity, got {other:?}"),
            }
        }
    }

    #[test]
    fn sniff_other_primary_codes() {
        assert_eq!(sniff("https://example.org/00/012345666638689852"), Some(AiType::Sscc));
        assert_eq!(sniff("https://id.gs1.org/8003/12345678901284ABCD"), Some(AiType::Grai));
        assert_eq!(sniff("https://id.gs1.org/8010/1234567ABC/8011/1"), Some(AiType::Cpi));
        assert_eq!(sniff("https://id.gs1.org/99/123"), None);
        assert_eq!(sniff("not an identifier"), None);
        assert_eq!(sniff(""), None);
    }

    #[test]
    fn shapes_describe_levels() {
        let sgtin = AiType::Sgtin.descriptor();
        assert_eq!(
            sgtin.urn_shape(Level::Class),
            "urn:epc:idpat:sgtin:<company prefix>.<indicator and item reference>.*"
        );
        assert!(sgtin.uri_shape(Level::Instance).contains("/21/"));
        assert!(!sgtin.uri_shape(Level::Class).contains("/21/"));
        let itip = AiType::Itip.descriptor();
        assert!(itip.urn_shape(Level::Instance).contains(".<piece>.<total>.<serial>"));
    }

    #[test]
    fn display_is_uppercase_scheme() {
        assert_eq!(AiType::Gsrnp.to_string(), "GSRNP");
        assert_eq!(serde_json::to_string(&AiType::Sgcn).unwrap(), "\"sgcn\"");
    }
}
