//! # Off-Chain Store Ports
//!
//! The four keyed stores the projector writes and the eligibility gate reads.
//!
//! Production: `RocksDbProjectionStore` (node-runtime/adapters/storage)
//! Default / testing: [`InMemoryProjectionStore`] (below)
//!
//! ## Concurrency contract
//!
//! Every operation is atomic per key. `insert_account_if_absent` and
//! `record_purchase` are create-if-absent: under a race exactly one caller
//! observes `true`. No operation locks across unrelated keys, except
//! `record_purchase`, which touches the receipt, the listing and both
//! profiles of one purchase as a single step.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

use crate::entities::{
    AccountProfile, Address, ContentId, ContentListing, Dispute, DisputeStatus, PurchaseId,
    PurchaseReceipt, Timestamp, U256,
};
use crate::errors::StoreError;

/// Account profiles keyed by wallet.
pub trait AccountStore: Send + Sync {
    fn get_account(&self, wallet: &Address) -> Result<Option<AccountProfile>, StoreError>;

    /// Inserts the profile unless one exists for its wallet. Never overwrites.
    ///
    /// Returns `true` when this call created the profile.
    fn insert_account_if_absent(&self, profile: AccountProfile) -> Result<bool, StoreError>;

    /// Sets `external_id` only when the stored profile has none.
    ///
    /// Returns `true` when a value was filled in.
    fn fill_external_id(
        &self,
        wallet: &Address,
        external_id: U256,
        joined_at: Timestamp,
        now: Timestamp,
    ) -> Result<bool, StoreError>;

    /// Sets the revoked flag to an absolute value, creating a stand-in
    /// profile when none exists.
    ///
    /// Returns the flag's previous value (`false` for a new stand-in).
    fn set_revoked(&self, wallet: &Address, revoked: bool, now: Timestamp)
        -> Result<bool, StoreError>;
}

/// Content listings keyed by internal content id.
pub trait ListingStore: Send + Sync {
    fn get_listing(&self, content_id: &ContentId) -> Result<Option<ContentListing>, StoreError>;

    /// Authoring path of the listing service. Replaces the authoring fields
    /// and clears `is_stand_in`, but keeps the stored `sales_count`.
    fn upsert_listing(&self, listing: ContentListing) -> Result<(), StoreError>;
}

/// Purchase receipts keyed by ledger purchase id.
pub trait ReceiptStore: Send + Sync {
    fn get_receipt(&self, purchase_id: &PurchaseId) -> Result<Option<PurchaseReceipt>, StoreError>;

    /// Records a purchase exactly once.
    ///
    /// When no receipt exists for `receipt.purchase_id`, in one step: inserts
    /// the receipt, increments the listing's and the seller's sale counters
    /// and the buyer's purchase counter by one, creating stand-ins for any
    /// missing listing or profile. Returns `true`.
    ///
    /// When a receipt exists, changes nothing and returns `false`.
    fn record_purchase(&self, receipt: PurchaseReceipt, now: Timestamp) -> Result<bool, StoreError>;
}

/// Disputes owned by the moderation service; the projector only drives
/// status transitions on revocation changes.
pub trait DisputeStore: Send + Sync {
    fn open_dispute(&self, dispute: Dispute) -> Result<(), StoreError>;

    fn disputes_for_wallet(&self, wallet: &Address) -> Result<Vec<Dispute>, StoreError>;

    /// Moves every `Resolved` dispute of `wallet` back to `Pending`.
    fn reopen_resolved_for_wallet(&self, wallet: &Address, now: Timestamp)
        -> Result<usize, StoreError>;

    /// Moves every `Pending`/`Contacted` dispute of `wallet` to `Resolved`.
    fn resolve_open_for_wallet(&self, wallet: &Address, now: Timestamp)
        -> Result<usize, StoreError>;
}

/// Everything the projector and the gate need.
pub trait ProjectionStore: AccountStore + ListingStore + ReceiptStore + DisputeStore {}

impl<T> ProjectionStore for T where T: AccountStore + ListingStore + ReceiptStore + DisputeStore {}

// =============================================================================
// IN-MEMORY ADAPTER
// =============================================================================

/// `DashMap`-backed store.
///
/// Per-key atomicity comes from `DashMap` entries; `record_purchase` is
/// serialized by a single mutex so the receipt and its three counter bumps
/// land together. The availability and corruption switches simulate backend
/// faults in tests.
#[derive(Debug, Default)]
pub struct InMemoryProjectionStore {
    accounts: DashMap<Address, AccountProfile>,
    listings: DashMap<ContentId, ContentListing>,
    receipts: DashMap<PurchaseId, PurchaseReceipt>,
    disputes: DashMap<Uuid, Dispute>,
    purchase_lock: Mutex<()>,
    unavailable: AtomicBool,
    corrupt: AtomicBool,
}

impl InMemoryProjectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent operation fail with `StoreError::Unavailable`
    /// (or succeed again with `true`).
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    /// Makes every subsequent operation fail with the non-retryable
    /// `StoreError::Corrupt`, as a backend does when a stored value no
    /// longer decodes.
    pub fn set_corrupt(&self, corrupt: bool) {
        self.corrupt.store(corrupt, Ordering::SeqCst);
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn receipt_count(&self) -> usize {
        self.receipts.len()
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store switched off".into()));
        }
        if self.corrupt.load(Ordering::SeqCst) {
            return Err(StoreError::Corrupt {
                key: "in-memory".into(),
                message: "value marked corrupt".into(),
            });
        }
        Ok(())
    }

    fn bump_account(
        &self,
        wallet: Address,
        now: Timestamp,
        bump: impl FnOnce(&mut AccountProfile),
    ) {
        let mut profile = self
            .accounts
            .entry(wallet)
            .or_insert_with(|| AccountProfile::stand_in(wallet, now));
        bump(profile.value_mut());
        profile.updated_at = now;
    }
}

impl AccountStore for InMemoryProjectionStore {
    fn get_account(&self, wallet: &Address) -> Result<Option<AccountProfile>, StoreError> {
        self.ensure_available()?;
        Ok(self.accounts.get(wallet).map(|p| p.clone()))
    }

    fn insert_account_if_absent(&self, profile: AccountProfile) -> Result<bool, StoreError> {
        self.ensure_available()?;
        match self.accounts.entry(profile.wallet) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(profile);
                Ok(true)
            }
        }
    }

    fn fill_external_id(
        &self,
        wallet: &Address,
        external_id: U256,
        joined_at: Timestamp,
        now: Timestamp,
    ) -> Result<bool, StoreError> {
        self.ensure_available()?;
        let Some(mut profile) = self.accounts.get_mut(wallet) else {
            return Ok(false);
        };
        if profile.external_id.is_some() {
            return Ok(false);
        }
        profile.external_id = Some(external_id);
        profile.joined_at.get_or_insert(joined_at);
        profile.updated_at = now;
        Ok(true)
    }

    fn set_revoked(
        &self,
        wallet: &Address,
        revoked: bool,
        now: Timestamp,
    ) -> Result<bool, StoreError> {
        self.ensure_available()?;
        let mut profile = self
            .accounts
            .entry(*wallet)
            .or_insert_with(|| AccountProfile::stand_in(*wallet, now));
        let previous = profile.revoked;
        if previous != revoked {
            profile.revoked = revoked;
            profile.updated_at = now;
        }
        Ok(previous)
    }
}

impl ListingStore for InMemoryProjectionStore {
    fn get_listing(&self, content_id: &ContentId) -> Result<Option<ContentListing>, StoreError> {
        self.ensure_available()?;
        Ok(self.listings.get(content_id).map(|l| l.clone()))
    }

    fn upsert_listing(&self, mut listing: ContentListing) -> Result<(), StoreError> {
        self.ensure_available()?;
        match self.listings.entry(listing.content_id) {
            Entry::Occupied(mut existing) => {
                listing.sales_count = existing.get().sales_count;
                listing.is_stand_in = false;
                existing.insert(listing);
            }
            Entry::Vacant(slot) => {
                listing.is_stand_in = false;
                slot.insert(listing);
            }
        }
        Ok(())
    }
}

impl ReceiptStore for InMemoryProjectionStore {
    fn get_receipt(&self, purchase_id: &PurchaseId) -> Result<Option<PurchaseReceipt>, StoreError> {
        self.ensure_available()?;
        Ok(self.receipts.get(purchase_id).map(|r| r.clone()))
    }

    fn record_purchase(
        &self,
        receipt: PurchaseReceipt,
        now: Timestamp,
    ) -> Result<bool, StoreError> {
        self.ensure_available()?;
        let _guard = self.purchase_lock.lock();

        if self.receipts.contains_key(&receipt.purchase_id) {
            return Ok(false);
        }

        // Each entry guard is dropped before the next map access.
        {
            let mut listing = self.listings.entry(receipt.content_id).or_insert_with(|| {
                ContentListing::stand_in(
                    receipt.content_id,
                    receipt.on_chain_content_id,
                    receipt.seller,
                )
            });
            listing.sales_count += 1;
        }
        self.bump_account(receipt.seller, now, |p| p.sales_count += 1);
        self.bump_account(receipt.buyer, now, |p| p.purchase_count += 1);

        self.receipts.insert(receipt.purchase_id, receipt);
        Ok(true)
    }
}

impl DisputeStore for InMemoryProjectionStore {
    fn open_dispute(&self, dispute: Dispute) -> Result<(), StoreError> {
        self.ensure_available()?;
        self.disputes.insert(dispute.id, dispute);
        Ok(())
    }

    fn disputes_for_wallet(&self, wallet: &Address) -> Result<Vec<Dispute>, StoreError> {
        self.ensure_available()?;
        let mut found: Vec<Dispute> = self
            .disputes
            .iter()
            .filter(|d| d.wallet == *wallet)
            .map(|d| d.clone())
            .collect();
        found.sort_by_key(|d| d.opened_at);
        Ok(found)
    }

    fn reopen_resolved_for_wallet(
        &self,
        wallet: &Address,
        now: Timestamp,
    ) -> Result<usize, StoreError> {
        self.ensure_available()?;
        Ok(transition_disputes(&self.disputes, wallet, now, |s| {
            (s == DisputeStatus::Resolved).then_some(DisputeStatus::Pending)
        }))
    }

    fn resolve_open_for_wallet(
        &self,
        wallet: &Address,
        now: Timestamp,
    ) -> Result<usize, StoreError> {
        self.ensure_available()?;
        Ok(transition_disputes(&self.disputes, wallet, now, |s| {
            s.is_open().then_some(DisputeStatus::Resolved)
        }))
    }
}

fn transition_disputes(
    disputes: &DashMap<Uuid, Dispute>,
    wallet: &Address,
    now: Timestamp,
    next: impl Fn(DisputeStatus) -> Option<DisputeStatus>,
) -> usize {
    let mut changed = 0;
    for mut dispute in disputes.iter_mut() {
        if dispute.wallet != *wallet {
            continue;
        }
        if let Some(status) = next(dispute.status) {
            dispute.status = status;
            dispute.updated_at = now;
            changed += 1;
        }
    }
    changed
}
