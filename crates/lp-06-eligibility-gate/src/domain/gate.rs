use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use lp_01_content_codec::to_on_chain;
use shared_types::{Address, ContentId, OnChainContentId, ProjectionStore, TimeSource};

use super::errors::EligibilityError;

/// What the buyer needs to submit the purchase transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseIdentifier {
    pub content_id: ContentId,
    pub on_chain_content_id: OnChainContentId,
}

pub struct PurchaseEligibilityGate {
    store: Arc<dyn ProjectionStore>,
    clock: Arc<dyn TimeSource>,
}

impl PurchaseEligibilityGate {
    pub fn new(store: Arc<dyn ProjectionStore>, clock: Arc<dyn TimeSource>) -> Self {
        Self { store, clock }
    }

    /// Runs the four checks in order.
    pub fn check(
        &self,
        buyer: &Address,
        content_id: &ContentId,
    ) -> Result<PurchaseIdentifier, EligibilityError> {
        let listing = self
            .store
            .get_listing(content_id)?
            .ok_or(EligibilityError::NotFound(*content_id))?;

        if !listing.is_available_at(self.clock.now()) {
            return Err(EligibilityError::Unavailable(*content_id));
        }

        if listing.seller == *buyer {
            return Err(EligibilityError::SelfPurchaseForbidden);
        }

        let seller_revoked = self
            .store
            .get_account(&listing.seller)?
            .is_some_and(|profile| profile.revoked);
        if seller_revoked {
            return Err(EligibilityError::SellerRevoked);
        }

        debug!(%buyer, %content_id, "purchase eligible");
        Ok(PurchaseIdentifier {
            content_id: *content_id,
            on_chain_content_id: to_on_chain(content_id),
        })
    }
}

impl std::fmt::Debug for PurchaseEligibilityGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PurchaseEligibilityGate").finish_non_exhaustive()
    }
}
