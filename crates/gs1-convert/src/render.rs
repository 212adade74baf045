//! Rendering: [`ParsedIdentifier`] in, canonical string out.

use gs1_core::descriptor::{AiDescriptor, PayloadWidth, SerialPlacement};
use gs1_core::{compute_check_digit, Level, ParsedIdentifier, CANONICAL_DOMAIN};

/// Assemble `prefix gcp.reference[.counters][.serial | .*]`.
pub(crate) fn urn(desc: &AiDescriptor, parsed: &ParsedIdentifier) -> String {
    let prefix = desc.prefix_for(parsed.level).unwrap_or(desc.urn_prefix);
    let mut out = format!("{prefix}{}.{}", parsed.gcp, parsed.item_reference);
    for counter in &parsed.counters {
        out.push('.');
        out.push_str(counter);
    }
    if desc.has_serial() {
        out.push('.');
        match parsed.level {
            Level::Class => out.push('*'),
            Level::Instance => out.push_str(parsed.serial.as_deref().unwrap_or_default()),
        }
    }
    out
}

/// The primary key's URI value with a freshly computed check digit.
///
/// Inline serials are included, since they are part of the AI value.
/// Returns `None` when the digits cannot carry a check digit.
pub(crate) fn primary_value(desc: &AiDescriptor, parsed: &ParsedIdentifier) -> Option<String> {
    let mut value = match desc.key.width {
        PayloadWidth::Fixed(_) => {
            let mut digits = match desc.key.indicator {
                true => {
                    let (indicator, reference) = parsed.item_reference.split_at_checked(1)?;
                    format!("{indicator}{}{reference}", parsed.gcp)
                }
                false => format!("{}{}", parsed.gcp, parsed.item_reference),
            };
            if desc.checksum_required() {
                let check = compute_check_digit(&digits)?;
                digits.push(check);
            }
            digits.extend(parsed.counters.iter().map(String::as_str));
            digits
        }
        PayloadWidth::Range(..) => format!("{}{}", parsed.gcp, parsed.item_reference),
    };
    if let (SerialPlacement::Inline { .. }, Level::Instance, Some(serial)) =
        (desc.serial, parsed.level, &parsed.serial)
    {
        value.push_str(serial);
    }
    Some(value)
}

/// Assemble the canonical Digital Link URI.
///
/// A segment serial equal to the type's default (SGLN extension `0`) is
/// omitted.
pub(crate) fn digital_link(desc: &AiDescriptor, parsed: &ParsedIdentifier) -> Option<String> {
    let value = primary_value(desc, parsed)?;
    let mut out = format!("{CANONICAL_DOMAIN}/{}/{value}", desc.ai_code);
    if let (SerialPlacement::Segment { ai, default, .. }, Level::Instance, Some(serial)) =
        (desc.serial, parsed.level, &parsed.serial)
    {
        if default != Some(serial.as_str()) {
            out.push_str(&format!("/{ai}/{serial}"));
        }
    }
    Some(out)
}
