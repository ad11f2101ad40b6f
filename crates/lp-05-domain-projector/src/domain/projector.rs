use std::sync::Arc;
use tracing::{debug, info};

use lp_01_content_codec::from_on_chain;
use lp_03_event_decoder::DomainEvent;
use shared_types::{
    AccountProfile, Address, Hash, OnChainContentId, ProjectionStore, PurchaseId, PurchaseReceipt,
    TimeSource, Timestamp, U256,
};

use super::errors::ProjectionError;
use super::outcome::{NoOpReason, ProjectionOutcome};

/// Applies decoded ledger events to the off-chain store.
#[derive(Clone)]
pub struct DomainProjector {
    store: Arc<dyn ProjectionStore>,
    clock: Arc<dyn TimeSource>,
}

impl DomainProjector {
    pub fn new(store: Arc<dyn ProjectionStore>, clock: Arc<dyn TimeSource>) -> Self {
        Self { store, clock }
    }

    /// Dispatches `event` to its handler.
    pub fn apply(&self, event: &DomainEvent) -> Result<ProjectionOutcome, ProjectionError> {
        let now = self.clock.now();
        match event {
            DomainEvent::AccountRegistered {
                wallet,
                external_id,
                joined_at,
            } => self.on_account_registered(*wallet, *external_id, *joined_at, now),
            DomainEvent::AccountPassMinted {
                wallet,
                external_id,
                is_admin_mint,
            } => self.on_pass_minted(*wallet, *external_id, *is_admin_mint, now),
            DomainEvent::AccessRevocationChanged { wallet, revoked } => {
                self.on_revocation_changed(*wallet, *revoked, now)
            }
            DomainEvent::ContentPurchased {
                buyer,
                seller,
                on_chain_content_id,
                price,
                purchase_id,
                tx_hash,
                log_index,
                block_timestamp,
            } => self.on_content_purchased(
                PurchaseFacts {
                    buyer: *buyer,
                    seller: *seller,
                    on_chain_content_id: *on_chain_content_id,
                    price: *price,
                    purchase_id: *purchase_id,
                    tx_hash: *tx_hash,
                    log_index: *log_index,
                    purchased_at: block_timestamp.unwrap_or(now),
                },
                now,
            ),
        }
    }

    fn on_account_registered(
        &self,
        wallet: Address,
        external_id: U256,
        joined_at: Timestamp,
        now: Timestamp,
    ) -> Result<ProjectionOutcome, ProjectionError> {
        let profile = AccountProfile::registered(wallet, external_id, joined_at, now);
        if self.store.insert_account_if_absent(profile)? {
            info!(%wallet, %external_id, "account registered");
            return Ok(ProjectionOutcome::Applied);
        }
        self.fill_stand_in(wallet, external_id, joined_at, now)
    }

    fn on_pass_minted(
        &self,
        wallet: Address,
        external_id: U256,
        is_admin_mint: bool,
        now: Timestamp,
    ) -> Result<ProjectionOutcome, ProjectionError> {
        if !is_admin_mint {
            debug!(%wallet, "ordinary pass mint ignored");
            return Ok(ProjectionOutcome::NoOp {
                reason: NoOpReason::NotAdminMint,
            });
        }

        let profile = AccountProfile::admin_minted(wallet, external_id, now);
        if self.store.insert_account_if_absent(profile)? {
            info!(%wallet, %external_id, "account created by admin mint");
            return Ok(ProjectionOutcome::Applied);
        }
        self.fill_stand_in(wallet, external_id, now, now)
    }

    /// A profile that already exists is left alone unless it is a stand-in
    /// still waiting for its external id.
    fn fill_stand_in(
        &self,
        wallet: Address,
        external_id: U256,
        joined_at: Timestamp,
        now: Timestamp,
    ) -> Result<ProjectionOutcome, ProjectionError> {
        if self.store.fill_external_id(&wallet, external_id, joined_at, now)? {
            info!(%wallet, %external_id, "stand-in profile completed");
            Ok(ProjectionOutcome::Applied)
        } else {
            debug!(%wallet, "profile already exists");
            Ok(ProjectionOutcome::NoOp {
                reason: NoOpReason::ProfileExists,
            })
        }
    }

    fn on_revocation_changed(
        &self,
        wallet: Address,
        revoked: bool,
        now: Timestamp,
    ) -> Result<ProjectionOutcome, ProjectionError> {
        let profile = self.store.get_account(&wallet)?;
        let previous = profile.as_ref().is_some_and(|p| p.revoked);
        if previous == revoked {
            if profile.is_none() {
                self.store.set_revoked(&wallet, revoked, now)?;
            }
            debug!(%wallet, revoked, "revocation flag unchanged");
            return Ok(ProjectionOutcome::NoOp {
                reason: NoOpReason::RevocationUnchanged,
            });
        }

        // The flag is written last: until it lands, a redelivery still sees
        // the transition and repeats the (idempotent) dispute moves.
        let disputes_moved = if revoked {
            self.store.reopen_resolved_for_wallet(&wallet, now)?
        } else {
            self.store.resolve_open_for_wallet(&wallet, now)?
        };
        self.store.set_revoked(&wallet, revoked, now)?;

        info!(%wallet, revoked, disputes_moved, "revocation changed");
        Ok(ProjectionOutcome::Applied)
    }

    fn on_content_purchased(
        &self,
        facts: PurchaseFacts,
        now: Timestamp,
    ) -> Result<ProjectionOutcome, ProjectionError> {
        let content_id = from_on_chain(&facts.on_chain_content_id)?;

        let receipt = PurchaseReceipt {
            purchase_id: facts.purchase_id,
            content_id,
            on_chain_content_id: facts.on_chain_content_id,
            buyer: facts.buyer,
            seller: facts.seller,
            price: facts.price,
            tx_hash: facts.tx_hash,
            log_index: facts.log_index,
            purchased_at: facts.purchased_at,
        };

        if self.store.record_purchase(receipt, now)? {
            info!(
                purchase_id = %facts.purchase_id,
                %content_id,
                buyer = %facts.buyer,
                seller = %facts.seller,
                "purchase recorded"
            );
            Ok(ProjectionOutcome::Applied)
        } else {
            debug!(purchase_id = %facts.purchase_id, "receipt already exists");
            Ok(ProjectionOutcome::NoOp {
                reason: NoOpReason::ReceiptExists,
            })
        }
    }
}

impl std::fmt::Debug for DomainProjector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainProjector").finish_non_exhaustive()
    }
}

struct PurchaseFacts {
    buyer: Address,
    seller: Address,
    on_chain_content_id: OnChainContentId,
    price: U256,
    purchase_id: PurchaseId,
    tx_hash: Hash,
    log_index: u64,
    purchased_at: Timestamp,
}
