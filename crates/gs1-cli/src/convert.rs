//! # Conversion Subcommands
//!
//! - `gs1 to-urn <uri> [--gcp-length N] [--class-level] [--check-digit]`
//!   prints the canonical result as JSON.
//! - `gs1 to-dl <urn>` prints the canonical Digital Link URI.
//!
//! Without `--gcp-length`, `to-urn` looks the length up in the configured
//! `gcp_table`.

use anyhow::{Context, Result};
use clap::Args;

use gs1_core::CanonicalResult;

use crate::config::CliConfig;

/// Arguments for `gs1 to-urn`.
#[derive(Args, Debug)]
pub struct ToUrnArgs {
    /// Digital Link URI to convert.
    pub uri: String,

    /// Company prefix length. Looked up in the configured table when omitted.
    #[arg(long)]
    pub gcp_length: Option<usize>,

    /// Convert a class-level URI (no serial) to a pattern URN.
    #[arg(long)]
    pub class_level: bool,

    /// Reject a wrong check digit instead of correcting it.
    #[arg(long)]
    pub check_digit: bool,
}

/// Arguments for `gs1 to-dl`.
#[derive(Args, Debug)]
pub struct ToDlArgs {
    /// EPC URN (`urn:epc:id:…`, `urn:epc:idpat:…` or `urn:epc:class:lgtin:…`).
    pub urn: String,
}

/// Execute `gs1 to-urn`.
pub fn run_to_urn(args: &ToUrnArgs, config: &CliConfig) -> Result<u8> {
    let result = to_urn(args, config)?;
    let json = serde_json::to_string_pretty(&result).context("failed to serialize result")?;
    println!("{json}");
    Ok(0)
}

/// Execute `gs1 to-dl`.
pub fn run_to_dl(args: &ToDlArgs, config: &CliConfig) -> Result<u8> {
    let uri = config
        .converter(false)?
        .to_digital_link(&args.urn)
        .with_context(|| format!("failed to convert {}", args.urn))?;
    println!("{uri}");
    Ok(0)
}

fn to_urn(args: &ToUrnArgs, config: &CliConfig) -> Result<CanonicalResult> {
    let converter = config.converter(args.check_digit)?;
    let result = match (args.gcp_length, args.class_level) {
        (Some(gcp_length), false) => converter.to_urn(&args.uri, gcp_length),
        (Some(gcp_length), true) => converter.to_class_level_urn(&args.uri, gcp_length),
        (None, false) => converter.to_urn_resolved(&args.uri),
        (None, true) => converter.to_class_level_urn_resolved(&args.uri),
    };
    result.with_context(|| format!("failed to convert {}", args.uri))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(uri: &str, gcp_length: Option<usize>, class_level: bool) -> ToUrnArgs {
        ToUrnArgs {
            uri: uri.into(),
            gcp_length,
            class_level,
            check_digit: false,
        }
    }

    #[test]
    fn explicit_gcp_length() {
        let result = to_urn(
            &args("https://id.gs1.org/01/12345678901231/21/9999", Some(6), false),
            &CliConfig::default(),
        )
        .unwrap();
        assert_eq!(result.as_urn, "urn:epc:id:sgtin:234567.1890123.9999");
    }

    #[test]
    fn class_level_flag() {
        let result = to_urn(
            &args("https://id.gs1.org/253/1234567890123", Some(10), true),
            &CliConfig::default(),
        )
        .unwrap();
        assert_eq!(result.as_urn, "urn:epc:idpat:gdti:1234567890.12.*");
    }

    #[test]
    fn check_digit_flag_rejects() {
        let mut strict = args("https://id.gs1.org/253/1234567890123", Some(10), true);
        strict.check_digit = true;
        let err = to_urn(&strict, &CliConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("checksum mismatch"));
    }

    #[test]
    fn table_lookup_without_gcp_length() {
        let dir = tempfile::tempdir().unwrap();
        let table = dir.path().join("prefixes.json");
        std::fs::write(
            &table,
            r#"{"GCPPrefixFormatList": {"entry": [{"prefix": "234", "gcpLength": 6}]}}"#,
        )
        .unwrap();
        let config = CliConfig {
            validate_check_digit: false,
            gcp_table: Some(table),
        };
        let result = to_urn(
            &args("https://id.gs1.org/01/12345678901231/21/9999", None, false),
            &config,
        )
        .unwrap();
        assert_eq!(result.as_urn, "urn:epc:id:sgtin:234567.1890123.9999");
    }

    #[test]
    fn no_table_and_no_length_is_an_error() {
        let err = to_urn(
            &args("https://id.gs1.org/01/12345678901231/21/9999", None, false),
            &CliConfig::default(),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("no company prefix resolver"));
    }
}
