//! # Domain and Short-Name Normalization
//!
//! Digital Link URIs arrive on arbitrary hosts (brand resolvers, staging
//! servers, `http://` links on packaging) and sometimes use the legacy
//! short names (`/gtin/`, `/ser/`) instead of numeric AI codes. The
//! functions here bring such URIs to canonical form before conversion.
//!
//! All three functions are total: anything that is not a GS1 Digital Link
//! URI is returned unchanged.

use crate::descriptor::AiType;
use crate::fields::DigitalLink;

/// Scheme and host every canonical Digital Link URI uses.
pub const CANONICAL_DOMAIN: &str = "https://id.gs1.org";

/// Legacy path short names and the AI codes they stand for.
const SHORT_NAMES: &[(&str, &str)] = &[
    ("gtin", "01"),
    ("sscc", "00"),
    ("grai", "8003"),
    ("giai", "8004"),
    ("itip", "8006"),
    ("cpi", "8010"),
    ("cpsn", "8011"),
    ("gsrnp", "8017"),
    ("gsrn", "8018"),
    ("gdti", "253"),
    ("gcn", "255"),
    ("ginc", "401"),
    ("gsin", "402"),
    ("gln", "414"),
    ("party", "417"),
    ("lot", "10"),
    ("ser", "21"),
    ("tpx", "235"),
    ("glnx", "254"),
];

/// The AI code a short name stands for.
pub fn ai_code_for_short_name(name: &str) -> Option<&'static str> {
    SHORT_NAMES
        .iter()
        .find(|(short, _)| *short == name)
        .map(|(_, code)| *code)
}

/// Whether the first path segment names a primary AI, by code or short name.
fn is_gs1_path(link: &DigitalLink) -> bool {
    link.primary_code()
        .map(|code| ai_code_for_short_name(code).unwrap_or(code))
        .is_some_and(AiType::is_primary_ai_code)
}

/// Move a Digital Link URI onto [`CANONICAL_DOMAIN`], keeping path and query.
///
/// Non-URIs, URIs with a malformed host, and URLs whose first path segment
/// is not a primary AI code or short name are returned unchanged.
pub fn canonicalize_domain(identifier: &str) -> String {
    match DigitalLink::parse(identifier) {
        Some(link) if is_gs1_path(&link) => link.with_origin(CANONICAL_DOMAIN),
        _ => identifier.to_string(),
    }
}

/// Replace legacy short names at key positions with numeric AI codes and
/// move the URI onto [`CANONICAL_DOMAIN`].
///
/// Values are never rewritten, so `/21/gtin` keeps its serial. Strings that
/// are not GS1 Digital Link URIs (wrong scheme, malformed host, or a first
/// segment that is neither a short name nor a primary AI code) pass through
/// unchanged.
pub fn replace_short_name_alias(identifier: Option<&str>) -> Option<String> {
    let identifier = identifier?;
    let Some(link) = DigitalLink::parse(identifier).filter(is_gs1_path) else {
        return Some(identifier.to_string());
    };

    let rewritten: Vec<&str> = link
        .segments()
        .into_iter()
        .enumerate()
        .map(|(i, segment)| match i % 2 {
            0 => ai_code_for_short_name(segment).unwrap_or(segment),
            _ => segment,
        })
        .collect();

    let mut out = format!("{CANONICAL_DOMAIN}/{}", rewritten.join("/"));
    if let Some(query) = link.query() {
        out.push('?');
        out.push_str(query);
    }
    Some(out)
}

/// Short-name replacement followed by domain canonicalization.
pub fn normalize(identifier: &str) -> String {
    let replaced =
        replace_short_name_alias(Some(identifier)).unwrap_or_else(|| identifier.to_string());
    canonicalize_domain(&replaced)
}
