//! # Check Digit Subcommand
//!
//! - `gs1 check-digit <digits>` prints the GS1 mod-10 check digit.
//! - `gs1 check-digit --verify <digits>` treats the last digit as the check
//!   digit, prints `valid` or `invalid`, and exits 0 or 1.

use anyhow::{bail, Result};
use clap::Args;

use gs1_core::{compute_check_digit, verify_check_digit};

/// Arguments for `gs1 check-digit`.
#[derive(Args, Debug)]
pub struct CheckDigitArgs {
    /// Digit string.
    pub digits: String,

    /// Verify the trailing check digit instead of computing one.
    #[arg(long)]
    pub verify: bool,
}

/// Execute `gs1 check-digit`.
pub fn run_check_digit(args: &CheckDigitArgs) -> Result<u8> {
    let (line, code) = check_digit(args)?;
    println!("{line}");
    Ok(code)
}

fn check_digit(args: &CheckDigitArgs) -> Result<(String, u8)> {
    if args.digits.is_empty() || !args.digits.bytes().all(|b| b.is_ascii_digit()) {
        bail!("expected a non-empty string of digits, got \"{}\"", args.digits);
    }
    if args.verify {
        return Ok(match verify_check_digit(&args.digits) {
            true => ("valid".to_string(), 0),
            false => ("invalid".to_string(), 1),
        });
    }
    match compute_check_digit(&args.digits) {
        Some(digit) => Ok((digit.to_string(), 0)),
        None => bail!("no check digit for \"{}\"", args.digits),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(digits: &str, verify: bool) -> CheckDigitArgs {
        CheckDigitArgs {
            digits: digits.into(),
            verify,
        }
    }

    #[test]
    fn computes() {
        assert_eq!(check_digit(&args("1234567890123", false)).unwrap(), ("1".into(), 0));
        assert_eq!(check_digit(&args("01234566663868985", false)).unwrap(), ("2".into(), 0));
    }

    #[test]
    fn verifies() {
        assert_eq!(check_digit(&args("12345678901231", true)).unwrap(), ("valid".into(), 0));
        assert_eq!(check_digit(&args("12345678901239", true)).unwrap(), ("invalid".into(), 1));
    }

    #[test]
    fn rejects_non_digits() {
        assert!(check_digit(&args("12a", false)).is_err());
        assert!(check_digit(&args("", true)).is_err());
    }
}
