//! Domain error model.

use thiserror::Error;

/// Result type used across the engine layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures (validation, malformed
/// identifiers). Infrastructure concerns such as persistence belong to the
/// batch boundary, not here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A field failed validation before any computation ran (empty sales
    /// history, non-positive price, out-of-range score). Engines raise this
    /// instead of letting malformed input degrade into NaN.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
