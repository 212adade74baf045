//! # Validate Subcommand
//!
//! `gs1 validate <identifier> [--gcp-length N] [--check-digit]`
//!
//! Prints `valid <TYPE> <direction> <level>` and exits 0, or
//! `invalid: <reason>` and exits 1. Short names and foreign domains are
//! normalized before validation. Digital Link URIs need a company prefix
//! length, from `--gcp-length` or the configured `gcp_table`.

use anyhow::Result;
use clap::Args;

use gs1_core::fields::DigitalLink;
use gs1_core::{normalize, validate, Direction, GcpLengthResolver, ValidationContext};
use gs1_gcp::PrefixTable;

use crate::config::CliConfig;

/// Arguments for `gs1 validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// URN or Digital Link URI to validate.
    pub identifier: String,

    /// Company prefix length of a Digital Link URI.
    #[arg(long)]
    pub gcp_length: Option<usize>,

    /// Also verify the check digit.
    #[arg(long)]
    pub check_digit: bool,
}

/// Execute `gs1 validate`.
pub fn run_validate(args: &ValidateArgs, config: &CliConfig) -> Result<u8> {
    let (line, code) = match verdict(args, config)? {
        Ok(line) => (line, 0),
        Err(reason) => (format!("invalid: {reason}"), 1),
    };
    println!("{line}");
    Ok(code)
}

/// The outcome line, or the reason the identifier is invalid.
///
/// The outer error is reserved for configuration problems.
fn verdict(args: &ValidateArgs, config: &CliConfig) -> Result<Result<String, String>> {
    let identifier = normalize(&args.identifier);
    let gcp_length = match args.gcp_length {
        Some(n) => Some(n),
        None => match resolve_from_table(&identifier, config)? {
            Ok(n) => n,
            Err(reason) => return Ok(Err(reason)),
        },
    };
    let ctx = ValidationContext {
        gcp_length,
        validate_check_digit: args.check_digit || config.validate_check_digit,
    };
    Ok(validate(&identifier, &ctx)
        .map(|v| {
            let direction = match v.direction {
                Direction::Urn => "urn",
                Direction::DigitalLink => "digital-link",
            };
            format!("valid {} {direction} {}", v.ai_type, v.level)
        })
        .map_err(|e| e.to_string()))
}

/// Look the company prefix length up in the configured table.
///
/// `identifier` is already normalized; a URI whose host could not be parsed
/// reaches the table untouched and is rejected there.
fn resolve_from_table(
    identifier: &str,
    config: &CliConfig,
) -> Result<Result<Option<usize>, String>> {
    let Some(path) = &config.gcp_table else {
        return Ok(Ok(None));
    };
    if Direction::detect(identifier) != Some(Direction::DigitalLink) {
        return Ok(Ok(None));
    }
    let table = PrefixTable::from_path(path)?;
    let ai_code = DigitalLink::parse(identifier)
        .and_then(|link| link.primary_code().map(str::to_string))
        .unwrap_or_default();
    Ok(table
        .resolve(identifier, &ai_code)
        .map(Some)
        .map_err(|e| e.to_string()))
}
