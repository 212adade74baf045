//! # gs1 CLI entry point
//!
//! Parses command-line arguments, loads the optional YAML config, and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gs1_cli::check_digit::{run_check_digit, CheckDigitArgs};
use gs1_cli::config::CliConfig;
use gs1_cli::convert::{run_to_dl, run_to_urn, ToDlArgs, ToUrnArgs};
use gs1_cli::normalize::{run_normalize, NormalizeArgs};
use gs1_cli::validate::{run_validate, ValidateArgs};

/// GS1 identifier canonicalization.
///
/// Converts between EPC URNs and GS1 Digital Link URIs, validates either
/// notation, and computes GS1 check digits.
#[derive(Parser, Debug)]
#[command(name = "gs1", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a Digital Link URI to an EPC URN.
    ToUrn(ToUrnArgs),

    /// Convert an EPC URN to a canonical Digital Link URI.
    ToDl(ToDlArgs),

    /// Validate a URN or Digital Link URI.
    Validate(ValidateArgs),

    /// Replace short names and move a URI onto the canonical domain.
    Normalize(NormalizeArgs),

    /// Compute or verify a GS1 mod-10 check digit.
    CheckDigit(CheckDigitArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = CliConfig::load(cli.config.as_deref()).and_then(|config| match &cli.command {
        Commands::ToUrn(args) => run_to_urn(args, &config),
        Commands::ToDl(args) => run_to_dl(args, &config),
        Commands::Validate(args) => run_validate(args, &config),
        Commands::Normalize(args) => run_normalize(args),
        Commands::CheckDigit(args) => run_check_digit(args),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_to_urn() {
        let cli = Cli::try_parse_from([
            "gs1",
            "to-urn",
            "https://id.gs1.org/01/12345678901231/21/9999",
            "--gcp-length",
            "6",
        ])
        .unwrap();
        if let Commands::ToUrn(args) = cli.command {
            assert_eq!(args.gcp_length, Some(6));
            assert!(!args.class_level);
            assert!(!args.check_digit);
        } else {
            panic!("expected to-urn");
        }
    }

    #[test]
    fn cli_parse_to_urn_class_level_strict() {
        let cli = Cli::try_parse_from([
            "gs1",
            "to-urn",
            "https://id.gs1.org/253/1234567890128",
            "--class-level",
            "--check-digit",
        ])
        .unwrap();
        if let Commands::ToUrn(args) = cli.command {
            assert!(args.gcp_length.is_none());
            assert!(args.class_level);
            assert!(args.check_digit);
        } else {
            panic!("expected to-urn");
        }
    }

    #[test]
    fn cli_parse_to_dl() {
        let cli = Cli::try_parse_from(["gs1", "to-dl", "urn:epc:id:sscc:123456.06663868985"]).unwrap();
        assert!(matches!(cli.command, Commands::ToDl(ref a) if a.urn == "urn:epc:id:sscc:123456.06663868985"));
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "gs1",
            "validate",
            "urn:epc:id:sgln:123456.789012.0",
            "-vv",
            "--config",
            "gs1.yaml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("gs1.yaml")));
        assert!(matches!(cli.command, Commands::Validate(_)));
    }

    #[test]
    fn cli_parse_check_digit_verify() {
        let cli = Cli::try_parse_from(["gs1", "check-digit", "--verify", "12345678901231"]).unwrap();
        if let Commands::CheckDigit(args) = cli.command {
            assert!(args.verify);
            assert_eq!(args.digits, "12345678901231");
        } else {
            panic!("expected check-digit");
        }
    }

    #[test]
    fn cli_parse_normalize() {
        let cli = Cli::try_parse_from(["gs1", "normalize", "https://example.com/gtin/12345678901231"]).unwrap();
        assert!(matches!(cli.command, Commands::Normalize(_)));
    }

    #[test]
    fn cli_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["gs1", "lock"]).is_err());
    }

    #[test]
    fn cli_rejects_missing_identifier() {
        assert!(Cli::try_parse_from(["gs1", "to-dl"]).is_err());
    }
}
