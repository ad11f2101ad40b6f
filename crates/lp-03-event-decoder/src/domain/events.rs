use serde::{Deserialize, Serialize};
use shared_types::{Address, Hash, OnChainContentId, PurchaseId, Timestamp, U256};

/// Typed ledger event, one variant per registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DomainEvent {
    /// Normal signup.
    AccountRegistered {
        wallet: Address,
        external_id: U256,
        joined_at: Timestamp,
    },
    /// Fires on every mint; only `is_admin_mint` mints create a profile.
    AccountPassMinted {
        wallet: Address,
        external_id: U256,
        is_admin_mint: bool,
    },
    /// Absolute value of the wallet's revoked flag.
    AccessRevocationChanged { wallet: Address, revoked: bool },
    ContentPurchased {
        buyer: Address,
        seller: Address,
        on_chain_content_id: OnChainContentId,
        price: U256,
        purchase_id: PurchaseId,
        tx_hash: Hash,
        log_index: u64,
        block_timestamp: Option<Timestamp>,
    },
}

impl DomainEvent {
    /// Short name for logs and metrics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AccountRegistered { .. } => "account_registered",
            Self::AccountPassMinted { .. } => "account_pass_minted",
            Self::AccessRevocationChanged { .. } => "access_revocation_changed",
            Self::ContentPurchased { .. } => "content_purchased",
        }
    }
}
