//! # Prefix Table
//!
//! GS1 publishes the company prefix length of every allocated prefix range
//! as a `GCPPrefixFormatList`:
//!
//! ```json
//! {"GCPPrefixFormatList": {"entry": [{"prefix": "0614141", "gcpLength": 7}]}}
//! ```
//!
//! Entries are bucketed by prefix length. A lookup tries the longest
//! possible prefix of the key digits first and walks down to a single
//! digit, so a specific range always wins over an enclosing one.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use gs1_core::descriptor::{GCP_MAX, GCP_MIN};
use gs1_core::fields::{DigitalLink, LinkError};
use gs1_core::{AiType, GcpLengthResolver, UnsupportedIdentifierError};

/// Longest prefix a table entry may carry.
pub const MAX_PREFIX_LEN: usize = 12;

/// Errors raised while loading a prefix table.
#[derive(Error, Debug)]
pub enum TableError {
    /// The table file could not be read.
    #[error("failed to read prefix table {}: {source}", path.display())]
    Io {
        /// Path of the table file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The table is not valid `GCPPrefixFormatList` JSON.
    #[error("failed to parse prefix table: {0}")]
    Json(#[from] serde_json::Error),

    /// An entry has a malformed prefix or an impossible length.
    #[error("invalid prefix table entry \"{prefix}\" (gcpLength {gcp_length}): {reason}")]
    InvalidEntry {
        /// The entry's prefix.
        prefix: String,
        /// The entry's company prefix length.
        gcp_length: usize,
        /// What is wrong with it.
        reason: String,
    },
}

/// One prefix range and the company prefix length allocated within it.
///
/// A `gcp_length` of 0 marks a range that carries no company prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixEntry {
    /// Leading digits of the range.
    pub prefix: String,
    /// Company prefix length, or 0.
    #[serde(rename = "gcpLength")]
    pub gcp_length: usize,
}

#[derive(Debug, Deserialize)]
struct PrefixFormatDocument {
    #[serde(rename = "GCPPrefixFormatList")]
    list: PrefixFormatList,
}

#[derive(Debug, Deserialize)]
struct PrefixFormatList {
    entry: Vec<PrefixEntry>,
}

/// Company prefix lengths by prefix range.
#[derive(Debug, Clone, Default)]
pub struct PrefixTable {
    /// `buckets[n]` holds the entries whose prefix has `n` digits.
    buckets: Vec<HashMap<String, usize>>,
    len: usize,
}

impl PrefixTable {
    /// Load a `GCPPrefixFormatList` JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Io`] if the file cannot be read, otherwise as
    /// [`PrefixTable::from_json`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), entries = table.len(), "loaded prefix table");
        Ok(table)
    }

    /// Parse a `GCPPrefixFormatList` JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Json`] for malformed JSON and
    /// [`TableError::InvalidEntry`] for entries that fail validation.
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let document: PrefixFormatDocument = serde_json::from_str(json)?;
        Self::from_entries(document.list.entry)
    }

    /// Build a table from entries.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidEntry`] for a non-numeric or over-long
    /// prefix, a length outside the company prefix bounds (other than 0),
    /// or a duplicate prefix.
    pub fn from_entries(entries: impl IntoIterator<Item = PrefixEntry>) -> Result<Self, TableError> {
        let mut buckets = vec![HashMap::new(); MAX_PREFIX_LEN + 1];
        let mut len = 0;
        for entry in entries {
            let invalid = |reason: &str| TableError::InvalidEntry {
                prefix: entry.prefix.clone(),
                gcp_length: entry.gcp_length,
                reason: reason.to_string(),
            };
            if entry.prefix.is_empty() || !entry.prefix.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid("prefix must be one or more digits"));
            }
            if entry.prefix.len() > MAX_PREFIX_LEN {
                return Err(invalid("prefix must be at most 12 digits"));
            }
            if entry.gcp_length != 0 && !(GCP_MIN..=GCP_MAX).contains(&entry.gcp_length) {
                return Err(invalid("gcpLength must be 0 or between 6 and 12"));
            }
            let bucket = &mut buckets[entry.prefix.len()];
            if bucket.contains_key(&entry.prefix) {
                return Err(invalid("duplicate prefix"));
            }
            bucket.insert(entry.prefix, entry.gcp_length);
            len += 1;
        }
        Ok(Self { buckets, len })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The longest entry whose prefix starts `digits`, with its length.
    pub fn lookup<'d>(&self, digits: &'d str) -> Option<(&'d str, usize)> {
        let longest = digits.len().min(MAX_PREFIX_LEN);
        (1..=longest).rev().find_map(|n| {
            let prefix = digits.get(..n)?;
            self.buckets
                .get(n)?
                .get(prefix)
                .map(|gcp_length| (prefix, *gcp_length))
        })
    }

    /// The digits to look up for the value of `ai_code`: the leading
    /// digits of the value, after the indicator digit for keys that have one.
    fn key_digits<'v>(value: &'v str, ai_code: &str) -> &'v str {
        let skip = AiType::for_ai_code(ai_code)
            .first()
            .map_or(0, |t| usize::from(t.descriptor().key.indicator));
        let rest = value.get(skip..).unwrap_or_default();
        let end = rest
            .bytes()
            .position(|b| !b.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    }
}

impl GcpLengthResolver for PrefixTable {
    fn resolve(&self, identifier: &str, ai_code: &str) -> Result<usize, UnsupportedIdentifierError> {
        if identifier.trim().is_empty() {
            return Err(UnsupportedIdentifierError::Empty);
        }
        let link = DigitalLink::try_parse(identifier).map_err(|e| match e {
            LinkError::NotHttp => UnsupportedIdentifierError::NotDigitalLink(identifier.to_string()),
            LinkError::MalformedHost => {
                UnsupportedIdentifierError::MalformedDomain(identifier.to_string())
            }
        })?;
        let unknown = || UnsupportedIdentifierError::UnknownAiCode {
            input: identifier.to_string(),
            ai_code: ai_code.to_string(),
        };
        if !AiType::is_primary_ai_code(ai_code) {
            return Err(unknown());
        }
        let value = link.segment(ai_code).ok_or_else(unknown)?;
        let digits = Self::key_digits(value, ai_code);

        match self.lookup(digits) {
            Some((prefix, 0)) => Err(UnsupportedIdentifierError::NoCompanyPrefix {
                input: identifier.to_string(),
                prefix: prefix.to_string(),
            }),
            Some((prefix, gcp_length)) => {
                tracing::debug!(input = identifier, prefix, gcp_length, "prefix range matched");
                Ok(gcp_length)
            }
            None => Err(UnsupportedIdentifierError::PrefixNotFound(identifier.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(prefix: &str, gcp_length: usize) -> PrefixEntry {
        PrefixEntry {
            prefix: prefix.into(),
            gcp_length,
        }
    }

    fn table() -> PrefixTable {
        PrefixTable::from_entries([
            entry("0", 7),
            entry("06", 9),
            entry("061414", 7),
            entry("2", 0),
            entry("123", 6),
            entry("401", 7),
            entry("95", 12),
        ])
        .unwrap()
    }

    #[test]
    fn longest_prefix_wins() {
        let t = table();
        assert_eq!(t.lookup("0614141000036"), Some(("061414", 7)));
        assert_eq!(t.lookup("0655555555555"), Some(("06", 9)));
        assert_eq!(t.lookup("0123456789012"), Some(("0", 7)));
        assert_eq!(t.lookup("7777"), None);
        assert_eq!(t.lookup(""), None);
    }

    #[test]
    fn resolves_after_indicator_digit() {
        let t = table();
        // Indicator digit skipped: lookup starts at "123".
        assert_eq!(
            t.resolve("https://id.gs1.org/01/11234567890125/21/1", "01"),
            Ok(6)
        );
        assert_eq!(
            t.resolve("https://id.gs1.org/00/012345666638689852", "00"),
            Ok(6)
        );
    }

    #[test]
    fn resolves_from_first_digit_without_indicator() {
        let t = table();
        assert_eq!(t.resolve("https://id.gs1.org/414/0614141000036", "414"), Ok(7));
        assert_eq!(t.resolve("https://id.gs1.org/8004/401234599999", "8004"), Ok(7));
    }

    #[test]
    fn zero_length_ranges_carry_no_company_prefix() {
        let err = table()
            .resolve("https://id.gs1.org/414/2000000000008", "414")
            .unwrap_err();
        assert_eq!(
            err,
            UnsupportedIdentifierError::NoCompanyPrefix {
                input: "https://id.gs1.org/414/2000000000008".into(),
                prefix: "2".into(),
            }
        );
    }

    #[test]
    fn resolution_failures() {
        let t = table();
        assert_eq!(t.resolve("", ""), Err(UnsupportedIdentifierError::Empty));
        assert_eq!(t.resolve("   ", "01"), Err(UnsupportedIdentifierError::Empty));
        assert!(matches!(
            t.resolve("urn:epc:id:sscc:123456.06663868985", ""),
            Err(UnsupportedIdentifierError::NotDigitalLink(_))
        ));
        assert!(matches!(
            t.resolve("https://bad..host/01/11234567890125", "01"),
            Err(UnsupportedIdentifierError::MalformedDomain(_))
        ));
        assert!(matches!(
            t.resolve("https://id.gs1.org/99/123", "99"),
            Err(UnsupportedIdentifierError::UnknownAiCode { .. })
        ));
        assert!(matches!(
            t.resolve("https://id.gs1.org/01/11234567890125", "414"),
            Err(UnsupportedIdentifierError::UnknownAiCode { .. })
        ));
        assert!(matches!(
            t.resolve("https://id.gs1.org/414/7777777777777", "414"),
            Err(UnsupportedIdentifierError::PrefixNotFound(_))
        ));
    }

    #[test]
    fn rejects_invalid_entries() {
        for bad in [entry("", 7), entry("12a", 7), entry("1234567890123", 7), entry("5", 5), entry("5", 13)] {
            assert!(
                matches!(PrefixTable::from_entries([bad.clone()]), Err(TableError::InvalidEntry { .. })),
                "{bad:?} should be rejected"
            );
        }
        assert!(matches!(
            PrefixTable::from_entries([entry("5", 7), entry("5", 8)]),
            Err(TableError::InvalidEntry { .. })
        ));
    }

    #[test]
    fn parses_gcp_prefix_format_list() {
        let t = PrefixTable::from_json(
            r#"{"GCPPrefixFormatList": {"entry": [
                {"prefix": "0614141", "gcpLength": 7},
                {"prefix": "952", "gcpLength": 0}
            ]}}"#,
        )
        .unwrap();
        assert_eq!(t.len(), 2);
        assert!(!t.is_empty());
        assert_eq!(t.lookup("0614141123"), Some(("0614141", 7)));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        assert!(matches!(PrefixTable::from_json("{"), Err(TableError::Json(_))));
        assert!(matches!(
            PrefixTable::from_json(r#"{"entries": []}"#),
            Err(TableError::Json(_))
        ));
    }
}
