//! Codec error types.

use thiserror::Error;

/// Errors mapping between internal and ledger content identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The 32-byte image carries data past the 16-byte identifier.
    #[error("content id image has non-zero padding at byte {first_offending_byte}")]
    NonZeroPadding { first_offending_byte: usize },

    /// Input text is not a hyphenated (or simple) UUID.
    #[error("malformed content id: {0}")]
    MalformedContentId(String),

    /// Input text is not 32 bytes of hex.
    #[error("malformed on-chain content id: {0}")]
    MalformedOnChainId(String),
}
