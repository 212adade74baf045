//! # Converter — URN ⇄ Digital Link State Machine
//!
//! Every conversion walks the same stages:
//!
//! ```text
//! Unparsed -> TypeIdentified -> Validated -> FieldsExtracted -> Rendered -> RoundTripValidated
//! ```
//!
//! A failure at any stage aborts the conversion with a single
//! [`Gs1Error::Validation`] that records the caller's input, the last stage
//! reached, and the violated rule. There are no partial results.
//!
//! ## Round-Trip Self-Check
//!
//! The rendered output is re-run through the rule chain of the target
//! representation. A URN rendered from a Digital Link must also satisfy the
//! class/instance chain it was rendered for, so a class-level conversion
//! that somehow produced a serial fails here rather than reaching the
//! caller. Failures at this stage are wrapped in
//! [`ValidationError::RoundTrip`].
//!
//! ## Check Digits
//!
//! With [`ConversionOptions::validate_check_digit`] unset, a check digit
//! that disagrees with the computed one is logged and replaced: every
//! canonical output carries the computed digit.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use gs1_core::fields::{DigitalLink, LinkError};
use gs1_core::{
    check, classify, compute_check_digit, detect_level, normalize, AiDescriptor, AiType,
    CanonicalResult, ConversionStage, Direction, GcpLengthResolver, Gs1Error, Level,
    UnsupportedIdentifierError, ValidationContext, ValidationError,
};

use crate::{extract, render};

/// Switches that change how strictly a conversion treats its input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
    /// Reject Digital Link input whose check digit is wrong instead of
    /// logging and correcting it.
    pub validate_check_digit: bool,
}

/// Converts between EPC URNs and GS1 Digital Link URIs.
///
/// Cheap to clone; the resolver is shared.
#[derive(Clone, Default)]
pub struct Converter {
    options: ConversionOptions,
    resolver: Option<Arc<dyn GcpLengthResolver>>,
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("options", &self.options)
            .field("resolver", &self.resolver.is_some())
            .finish()
    }
}

/// Progress of one conversion. Maps step failures onto [`Gs1Error`].
struct Run<'a> {
    input: &'a str,
    stage: ConversionStage,
}

impl<'a> Run<'a> {
    fn start(input: &'a str, direction: &'static str) -> Self {
        tracing::debug!(input, direction, "conversion started");
        Self {
            input,
            stage: ConversionStage::Unparsed,
        }
    }

    fn advance(&mut self, stage: ConversionStage) {
        self.stage = stage;
        tracing::debug!(input = self.input, stage = %stage, "conversion stage reached");
    }

    fn fail(&self, source: ValidationError) -> Gs1Error {
        tracing::debug!(input = self.input, stage = %self.stage, error = %source, "conversion failed");
        Gs1Error::validation(self.input, self.stage, source)
    }

    fn grammar(&self, subject: &str, rule: String) -> Gs1Error {
        self.fail(ValidationError::Grammar {
            input: subject.to_string(),
            rule,
        })
    }

    fn round_trip(&self, rendered: &str, source: ValidationError) -> Gs1Error {
        self.fail(ValidationError::RoundTrip {
            rendered: rendered.to_string(),
            source: Box::new(source),
        })
    }
}

impl Converter {
    /// A converter with the given options and no resolver.
    pub fn new(options: ConversionOptions) -> Self {
        Self {
            options,
            resolver: None,
        }
    }

    /// Attach a company prefix length resolver.
    pub fn with_resolver(mut self, resolver: Arc<dyn GcpLengthResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// The options this converter applies.
    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Whether a resolver is attached.
    pub fn has_resolver(&self) -> bool {
        self.resolver.is_some()
    }

    /// Convert an EPC URN (instance `urn:epc:id:`/`urn:epc:class:` or
    /// pattern `urn:epc:idpat:`) to its canonical Digital Link URI.
    ///
    /// # Errors
    ///
    /// Returns [`Gs1Error::Validation`] when the URN fails its rule chain or
    /// the rendered URI fails the round-trip check.
    pub fn to_digital_link(&self, urn: &str) -> Result<String, Gs1Error> {
        let mut run = Run::start(urn, "urn_to_digital_link");

        if Direction::detect(urn) != Some(Direction::Urn) {
            return Err(run.fail(ValidationError::UnrecognizedIdentifier {
                input: urn.to_string(),
            }));
        }
        let ai_type = classify(urn).map_err(|e| run.fail(e))?;
        let desc = ai_type.descriptor();
        let level = detect_level(ai_type, Direction::Urn, urn);
        run.advance(ConversionStage::TypeIdentified);

        check(ai_type, Direction::Urn, level, urn, &ValidationContext::urn())
            .map_err(|e| run.fail(e))?;
        run.advance(ConversionStage::Validated);

        let parsed = extract::from_urn(desc, urn, level).ok_or_else(|| {
            run.grammar(urn, format!("fields of {urn} could not be split by dots"))
        })?;
        run.advance(ConversionStage::FieldsExtracted);

        let uri = render::digital_link(desc, &parsed).ok_or_else(|| {
            run.grammar(urn, format!("no check digit can be computed for {urn}"))
        })?;
        run.advance(ConversionStage::Rendered);

        let ctx = ValidationContext::digital_link(parsed.gcp.len()).with_check_digit(true);
        check(ai_type, Direction::DigitalLink, level, &uri, &ctx)
            .map_err(|e| run.round_trip(&uri, e))?;
        let back = extract::from_digital_link(desc, &uri, parsed.gcp.len(), level)
            .map(|p| render::urn(desc, &p));
        if back.as_deref() != Some(urn) {
            return Err(run.round_trip(
                &uri,
                ValidationError::Grammar {
                    input: uri.clone(),
                    rule: format!("{uri} does not convert back to {urn}"),
                },
            ));
        }
        run.advance(ConversionStage::RoundTripValidated);

        Ok(uri)
    }

    /// Convert an instance-level Digital Link URI to its EPC URN, slicing
    /// the company prefix at `gcp_length` digits.
    ///
    /// # Errors
    ///
    /// Returns [`Gs1Error::Validation`] when the URI fails its rule chain,
    /// `gcp_length` is out of bounds or too long for the key, or the
    /// rendered URN fails the round-trip check.
    pub fn to_urn(&self, uri: &str, gcp_length: usize) -> Result<CanonicalResult, Gs1Error> {
        self.digital_link_to_urn(uri, gcp_length, Level::Instance)
    }

    /// Convert a class-level Digital Link URI (no serial) to its pattern
    /// URN (`urn:epc:idpat:…`, serial `*`).
    ///
    /// # Errors
    ///
    /// As [`Converter::to_urn`], plus
    /// [`ValidationError::ClassLevelUnsupported`] for types without a
    /// pattern form.
    pub fn to_class_level_urn(
        &self,
        uri: &str,
        gcp_length: usize,
    ) -> Result<CanonicalResult, Gs1Error> {
        self.digital_link_to_urn(uri, gcp_length, Level::Class)
    }

    /// [`Converter::to_urn`] with the company prefix length looked up by
    /// the attached resolver.
    ///
    /// # Errors
    ///
    /// Resolver errors are returned unchanged as
    /// [`Gs1Error::UnsupportedIdentifier`]; without a resolver the error is
    /// [`UnsupportedIdentifierError::NoResolver`].
    pub fn to_urn_resolved(&self, uri: &str) -> Result<CanonicalResult, Gs1Error> {
        let gcp_length = self.resolve_gcp_length(uri)?;
        self.to_urn(uri, gcp_length)
    }

    /// [`Converter::to_class_level_urn`] with the company prefix length
    /// looked up by the attached resolver.
    ///
    /// # Errors
    ///
    /// As [`Converter::to_urn_resolved`].
    pub fn to_class_level_urn_resolved(&self, uri: &str) -> Result<CanonicalResult, Gs1Error> {
        let gcp_length = self.resolve_gcp_length(uri)?;
        self.to_class_level_urn(uri, gcp_length)
    }

    fn resolve_gcp_length(&self, uri: &str) -> Result<usize, Gs1Error> {
        let resolver = self
            .resolver
            .as_ref()
            .ok_or_else(|| UnsupportedIdentifierError::NoResolver(uri.to_string()))?;
        // An unparseable host survives normalization, so the resolver sees it.
        let normalized = normalize(uri);
        let ai_code = DigitalLink::parse(&normalized)
            .and_then(|link| link.primary_code().map(str::to_string))
            .unwrap_or_default();
        let gcp_length = resolver.resolve(&normalized, &ai_code).map_err(|e| {
            tracing::debug!(input = uri, error = %e, "company prefix length not resolved");
            e
        })?;
        tracing::debug!(input = uri, ai_code = %ai_code, gcp_length, "company prefix length resolved");
        Ok(gcp_length)
    }

    fn digital_link_to_urn(
        &self,
        uri: &str,
        gcp_length: usize,
        level: Level,
    ) -> Result<CanonicalResult, Gs1Error> {
        let mut run = Run::start(uri, "digital_link_to_urn");

        if Direction::detect(uri) != Some(Direction::DigitalLink) {
            return Err(run.fail(ValidationError::UnrecognizedIdentifier {
                input: uri.to_string(),
            }));
        }
        if DigitalLink::try_parse(uri) == Err(LinkError::MalformedHost) {
            return Err(run.grammar(uri, format!("{uri} has a malformed domain")));
        }
        let normalized = normalize(uri);
        let ai_type = classify(&normalized).map_err(|e| run.fail(e))?;
        let desc = ai_type.descriptor();
        run.advance(ConversionStage::TypeIdentified);

        let ctx = ValidationContext {
            gcp_length: Some(gcp_length),
            validate_check_digit: self.options.validate_check_digit,
        };
        check(ai_type, Direction::DigitalLink, level, &normalized, &ctx)
            .map_err(|e| run.fail(e))?;
        run.advance(ConversionStage::Validated);

        let parsed = extract::from_digital_link(desc, &normalized, gcp_length, level)
            .ok_or_else(|| {
                run.grammar(
                    uri,
                    format!("{uri} cannot be sliced at company prefix length {gcp_length}"),
                )
            })?;
        run.advance(ConversionStage::FieldsExtracted);

        let as_urn = render::urn(desc, &parsed);
        let (value, canonical_dl) = render::primary_value(desc, &parsed)
            .zip(render::digital_link(desc, &parsed))
            .ok_or_else(|| run.grammar(uri, format!("no check digit can be computed for {uri}")))?;
        warn_on_corrected_check_digit(ai_type, uri, &parsed, desc);
        run.advance(ConversionStage::Rendered);

        check(ai_type, Direction::Urn, level, &as_urn, &ValidationContext::urn())
            .map_err(|e| run.round_trip(&as_urn, e))?;
        run.advance(ConversionStage::RoundTripValidated);

        Ok(CanonicalResult {
            ai_type,
            as_captured: uri.to_string(),
            as_urn,
            canonical_dl,
            serial: parsed.serial,
            value,
        })
    }
}

fn warn_on_corrected_check_digit(
    ai_type: AiType,
    uri: &str,
    parsed: &gs1_core::ParsedIdentifier,
    desc: &AiDescriptor,
) {
    let Some(captured) = parsed.check_digit else {
        return;
    };
    let digits = match desc.key.indicator {
        true => match parsed.item_reference.split_at_checked(1) {
            Some((indicator, reference)) => format!("{indicator}{}{reference}", parsed.gcp),
            None => return,
        },
        false => format!("{}{}", parsed.gcp, parsed.item_reference),
    };
    if let Some(expected) = compute_check_digit(&digits) {
        if expected != captured {
            tracing::warn!(
                input = uri,
                ai_type = %ai_type,
                captured = %captured,
                expected = %expected,
                "check digit disagrees with computed value; canonical output uses the computed digit"
            );
        }
    }
}
