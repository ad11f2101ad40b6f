//! # Error Types
//!
//! Defines error types used across subsystems.

use thiserror::Error;

/// Errors parsing hex-encoded ledger values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexError {
    /// Not valid hex digits.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Decoded to the wrong number of bytes.
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Not a valid decimal integer.
    #[error("invalid number: {0}")]
    InvalidNumber(String),
}

/// Errors raised by any of the off-chain stores.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Backend unreachable or refused the operation. Retryable.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A stored value could not be decoded.
    #[error("stored value corrupt for key {key}: {message}")]
    Corrupt { key: String, message: String },
}

impl StoreError {
    /// True when the caller should fail the request and rely on redelivery.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
