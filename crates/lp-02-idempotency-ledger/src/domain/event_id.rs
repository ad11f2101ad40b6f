use serde::{Deserialize, Serialize};
use shared_types::Hash;
use std::fmt;

/// Deterministic identity of one ledger log: `0x<tx hash>:<log index>`.
///
/// The same log always yields the same id, whichever envelope shape carried it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    #[must_use]
    pub fn new(tx_hash: &Hash, log_index: u64) -> Self {
        Self(format!("{}:{}", tx_hash.to_hex(), log_index))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EventId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
