use shared_types::StoreError;
use thiserror::Error;

/// Errors from the idempotency ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The processed-event store could not be reached. The log was not
    /// admitted and must not be applied.
    #[error("processed-event store failed: {0}")]
    Storage(#[from] StoreError),
}
