//! # Company Prefix Length Resolution
//!
//! A Digital Link URI does not say where its company prefix ends. Callers
//! either pass the length explicitly or supply a [`GcpLengthResolver`] that
//! looks it up, typically from GS1's published prefix-format table.
//!
//! The converter never interprets resolver errors; they reach the caller
//! unchanged as [`Gs1Error::UnsupportedIdentifier`](crate::Gs1Error).

use crate::error::UnsupportedIdentifierError;

/// Looks up the company prefix length of an identifier.
///
/// `identifier` is the normalized Digital Link URI and `ai_code` the
/// primary AI code found in its path (empty when none was found).
pub trait GcpLengthResolver: Send + Sync {
    /// Resolve the company prefix length.
    ///
    /// # Errors
    ///
    /// Returns an [`UnsupportedIdentifierError`] when no length can be
    /// determined.
    fn resolve(&self, identifier: &str, ai_code: &str) -> Result<usize, UnsupportedIdentifierError>;
}

impl<F> GcpLengthResolver for F
where
    F: Fn(&str, &str) -> Result<usize, UnsupportedIdentifierError> + Send + Sync,
{
    fn resolve(&self, identifier: &str, ai_code: &str) -> Result<usize, UnsupportedIdentifierError> {
        self(identifier, ai_code)
    }
}
