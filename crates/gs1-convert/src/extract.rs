//! Field extraction: one identifier string in, [`ParsedIdentifier`] out.
//!
//! Both functions assume the input already passed its rule chain and
//! return `None` rather than panic when it did not.

use gs1_core::descriptor::{AiDescriptor, PayloadWidth, SerialPlacement};
use gs1_core::fields::{split_dots, split_width, DigitalLink};
use gs1_core::{Level, ParsedIdentifier};

/// Split a URN into its fields by dots.
///
/// The URN carries no check digit, so `check_digit` is always `None`.
pub(crate) fn from_urn(desc: &AiDescriptor, urn: &str, level: Level) -> Option<ParsedIdentifier> {
    let body = urn.strip_prefix(desc.prefix_for(level)?)?;
    let counters = desc.key.counters.len();
    let count = 2 + counters + usize::from(desc.has_serial());
    let fields = split_dots(body, count)?;

    let serial = match level {
        Level::Instance if desc.has_serial() => fields.last().map(|s| s.to_string()),
        _ => None,
    };

    Some(ParsedIdentifier {
        ai_type: desc.ai_type,
        gcp: fields[0].to_string(),
        item_reference: fields[1].to_string(),
        counters: fields[2..2 + counters].iter().map(|c| c.to_string()).collect(),
        serial,
        level,
        check_digit: None,
    })
}

/// Slice a Digital Link URI at the company prefix length.
pub(crate) fn from_digital_link(
    desc: &AiDescriptor,
    uri: &str,
    gcp_length: usize,
    level: Level,
) -> Option<ParsedIdentifier> {
    let link = DigitalLink::parse(uri)?;
    let payload = link.segment(desc.ai_code)?;

    let (gcp, item_reference, counters, check_digit, trailing) = match desc.key.width {
        PayloadWidth::Fixed(width) => {
            let (key, trailing) = split_width(payload, width)?;
            let check_at = desc.key.check_offset.unwrap_or(width);
            let (body, after) = split_width(key, check_at)?;
            let (check_digit, mut rest) = match desc.key.check_offset {
                Some(_) => (after.chars().next(), after.get(1..)?),
                None => (None, after),
            };
            let mut counters = Vec::with_capacity(desc.key.counters.len());
            for width in desc.key.counters {
                let (counter, remaining) = split_width(rest, *width)?;
                counters.push(counter.to_string());
                rest = remaining;
            }
            let (indicator, digits) = match desc.key.indicator {
                true => split_width(body, 1)?,
                false => ("", body),
            };
            let (gcp, reference) = split_width(digits, gcp_length)?;
            (
                gcp.to_string(),
                format!("{indicator}{reference}"),
                counters,
                check_digit,
                trailing,
            )
        }
        PayloadWidth::Range(..) => {
            let (gcp, reference) = split_width(payload, gcp_length)?;
            (gcp.to_string(), reference.to_string(), Vec::new(), None, "")
        }
    };

    let serial = match (desc.serial, level) {
        (SerialPlacement::Segment { ai, default, .. }, Level::Instance) => {
            link.segment(ai).or(default).map(str::to_string)
        }
        (SerialPlacement::Inline { .. }, Level::Instance) => {
            (!trailing.is_empty()).then(|| trailing.to_string())
        }
        _ => None,
    };

    Some(ParsedIdentifier {
        ai_type: desc.ai_type,
        gcp,
        item_reference,
        counters,
        serial,
        level,
        check_digit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gs1_core::AiType;

    #[test]
    fn urn_fields_split_by_dots() {
        let parsed = from_urn(
            AiType::Sgtin.descriptor(),
            "urn:epc:id:sgtin:234567.1890123.99.99",
            Level::Instance,
        )
        .unwrap();
        assert_eq!(parsed.gcp, "234567");
        assert_eq!(parsed.item_reference, "1890123");
        assert_eq!(parsed.serial.as_deref(), Some("99.99"));
        assert_eq!(parsed.check_digit, None);
    }

    #[test]
    fn itip_urn_counters() {
        let parsed = from_urn(
            AiType::Itip.descriptor(),
            "urn:epc:id:itip:234567.1890123.01.02.SN1",
            Level::Instance,
        )
        .unwrap();
        assert_eq!(parsed.counters, vec!["01", "02"]);
        assert_eq!(parsed.serial.as_deref(), Some("SN1"));
    }

    #[test]
    fn class_urn_has_no_serial() {
        let parsed = from_urn(
            AiType::Gdti.descriptor(),
            "urn:epc:idpat:gdti:1234567890.12.*",
            Level::Class,
        )
        .unwrap();
        assert!(parsed.is_class_level());
        assert_eq!(parsed.serial, None);
        assert_eq!(parsed.item_reference, "12");
    }

    #[test]
    fn digital_link_indicator_moves_into_reference() {
        let parsed = from_digital_link(
            AiType::Sgtin.descriptor(),
            "https://id.gs1.org/01/12345678901231/21/9999",
            6,
            Level::Instance,
        )
        .unwrap();
        assert_eq!(parsed.gcp, "234567");
        assert_eq!(parsed.item_reference, "1890123");
        assert_eq!(parsed.check_digit, Some('1'));
        assert_eq!(parsed.serial.as_deref(), Some("9999"));
    }

    #[test]
    fn digital_link_inline_serial() {
        let parsed = from_digital_link(
            AiType::Grai.descriptor(),
            "https://id.gs1.org/8003/12345678901284ABCD",
            6,
            Level::Instance,
        )
        .unwrap();
        assert_eq!(parsed.gcp, "123456");
        assert_eq!(parsed.item_reference, "789012");
        assert_eq!(parsed.check_digit, Some('8'));
        assert_eq!(parsed.serial.as_deref(), Some("4ABCD"));
    }

    #[test]
    fn digital_link_itip_counters() {
        let parsed = from_digital_link(
            AiType::Itip.descriptor(),
            "https://id.gs1.org/8006/123456789012310102/21/SN1",
            6,
            Level::Instance,
        )
        .unwrap();
        assert_eq!(parsed.item_reference, "1890123");
        assert_eq!(parsed.counters, vec!["01", "02"]);
    }

    #[test]
    fn sgln_extension_defaults_to_zero() {
        let parsed = from_digital_link(
            AiType::Sgln.descriptor(),
            "https://id.gs1.org/414/1234567890128",
            7,
            Level::Instance,
        )
        .unwrap();
        assert_eq!(parsed.serial.as_deref(), Some("0"));
    }

    #[test]
    fn variable_key_slices_at_gcp() {
        let parsed = from_digital_link(
            AiType::Giai.descriptor(),
            "https://id.gs1.org/8004/401234599999",
            7,
            Level::Instance,
        )
        .unwrap();
        assert_eq!(parsed.gcp, "4012345");
        assert_eq!(parsed.item_reference, "99999");
    }

    #[test]
    fn short_payload_is_none_not_panic() {
        assert!(from_digital_link(
            AiType::Sscc.descriptor(),
            "https://id.gs1.org/00/0123",
            6,
            Level::Instance
        )
        .is_none());
        assert!(from_urn(AiType::Sscc.descriptor(), "urn:epc:id:sscc:123456", Level::Instance).is_none());
    }
}
