//! # gs1-gcp — Company Prefix Length Resolution
//!
//! A Digital Link URI does not mark where its GS1 Company Prefix ends.
//! [`PrefixTable`] answers that question from GS1's published prefix-format
//! list and plugs into the converter as a
//! [`GcpLengthResolver`](gs1_core::GcpLengthResolver).
//!
//! No dataset ships with this crate; load the current list from GS1.
//!
//! ```
//! use gs1_core::GcpLengthResolver;
//! use gs1_gcp::PrefixTable;
//!
//! let table = PrefixTable::from_json(
//!     r#"{"GCPPrefixFormatList": {"entry": [{"prefix": "0614141", "gcpLength": 7}]}}"#,
//! ).unwrap();
//! assert_eq!(table.resolve("https://id.gs1.org/414/0614141000036", "414"), Ok(7));
//! ```

pub mod table;

pub use table::{PrefixEntry, PrefixTable, TableError, MAX_PREFIX_LEN};
