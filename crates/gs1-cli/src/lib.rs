//! # gs1-cli — Command-Line Front End
//!
//! Provides the `gs1` binary on top of `gs1-convert` and `gs1-gcp`.
//!
//! ## Subcommands
//!
//! - `gs1 to-urn`: Digital Link URI to EPC URN, printed as JSON.
//! - `gs1 to-dl`: EPC URN to canonical Digital Link URI.
//! - `gs1 validate`: Classify and validate either notation.
//! - `gs1 normalize`: Short-name and domain canonicalization.
//! - `gs1 check-digit`: Compute or verify a GS1 mod-10 check digit.
//!
//! ```bash
//! gs1 to-urn https://id.gs1.org/01/12345678901231/21/9999 --gcp-length 6
//! gs1 --config gs1.yaml to-urn https://id.gs1.org/00/012345666638689852
//! gs1 to-dl urn:epc:id:sscc:123456.06663868985
//! ```
//!
//! Every handler returns the process exit code: 0 on success, 1 when the
//! input is rejected.

pub mod check_digit;
pub mod config;
pub mod convert;
pub mod normalize;
pub mod validate;
