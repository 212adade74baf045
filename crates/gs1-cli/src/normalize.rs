//! # Normalize Subcommand
//!
//! `gs1 normalize <identifier>` replaces legacy short names with AI codes
//! and moves Digital Link URIs onto the canonical GS1 domain. Anything else
//! is echoed unchanged.

use anyhow::Result;
use clap::Args;

/// Arguments for `gs1 normalize`.
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Identifier to normalize.
    pub identifier: String,
}

/// Execute `gs1 normalize`.
pub fn run_normalize(args: &NormalizeArgs) -> Result<u8> {
    println!("{}", gs1_core::normalize(&args.identifier));
    Ok(0)
}
