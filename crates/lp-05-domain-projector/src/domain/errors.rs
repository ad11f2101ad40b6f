use lp_01_content_codec::CodecError;
use shared_types::StoreError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    /// Store failure. Retryable when the store says so.
    #[error(transparent)]
    Storage(#[from] StoreError),

    /// The purchase log's content id is not a valid codec image. The log is
    /// skipped like any other decode failure.
    #[error("purchase references malformed content id: {0}")]
    ContentId(#[from] CodecError),
}

impl ProjectionError {
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_retryable(),
            Self::ContentId(_) => false,
        }
    }
}
