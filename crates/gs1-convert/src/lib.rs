//! # gs1-convert — EPC URN ⇄ GS1 Digital Link Canonicalization
//!
//! Converts between the two representations of a GS1 identifier:
//!
//! - **EPC URN**: `urn:epc:id:sgtin:234567.1890123.9999`, dot-delimited with
//!   the company prefix explicit and the check digit omitted.
//! - **Digital Link URI**: `https://id.gs1.org/01/12345678901231/21/9999`,
//!   path-encoded with the check digit present and the company prefix
//!   boundary implicit.
//!
//! Going from URI to URN requires the company prefix length, passed
//! explicitly or looked up through a
//! [`GcpLengthResolver`](gs1_core::GcpLengthResolver).
//!
//! ## Usage
//!
//! ```
//! use gs1_convert::{convert_to_digital_link, convert_to_urn};
//!
//! let result = convert_to_urn("https://id.gs1.org/01/12345678901231/21/9999", 6).unwrap();
//! assert_eq!(result.as_urn, "urn:epc:id:sgtin:234567.1890123.9999");
//!
//! let uri = convert_to_digital_link("urn:epc:id:sscc:123456.06663868985").unwrap();
//! assert_eq!(uri, "https://id.gs1.org/00/012345666638689852");
//! ```
//!
//! The free functions use a default [`Converter`]: check digits advisory,
//! no resolver. Build a [`Converter`] for anything else.

pub mod converter;
mod extract;
mod render;

use std::sync::Arc;

pub use converter::{ConversionOptions, Converter};
pub use gs1_core::{CanonicalResult, GcpLengthResolver, Gs1Error};

/// Convert an EPC URN to its canonical Digital Link URI.
///
/// # Errors
///
/// See [`Converter::to_digital_link`].
pub fn convert_to_digital_link(urn: &str) -> Result<String, Gs1Error> {
    Converter::default().to_digital_link(urn)
}

/// Convert an instance-level Digital Link URI to its EPC URN.
///
/// # Errors
///
/// See [`Converter::to_urn`].
pub fn convert_to_urn(uri: &str, gcp_length: usize) -> Result<CanonicalResult, Gs1Error> {
    Converter::default().to_urn(uri, gcp_length)
}

/// Convert a class-level Digital Link URI to its pattern URN.
///
/// # Errors
///
/// See [`Converter::to_class_level_urn`].
pub fn convert_to_urn_for_class_level_identifier(
    uri: &str,
    gcp_length: usize,
) -> Result<CanonicalResult, Gs1Error> {
    Converter::default().to_class_level_urn(uri, gcp_length)
}

/// Convert an instance-level Digital Link URI to its EPC URN, asking
/// `resolver` for the company prefix length.
///
/// # Errors
///
/// See [`Converter::to_urn_resolved`].
pub fn convert_to_urn_with_resolver(
    uri: &str,
    resolver: Arc<dyn GcpLengthResolver>,
) -> Result<CanonicalResult, Gs1Error> {
    Converter::default().with_resolver(resolver).to_urn_resolved(uri)
}
