//! # RocksDB Projection Store
//!
//! Persistent implementation of the four projection store ports.
//!
//! ## Column Families
//!
//! - `accounts` - wallet (20 bytes) → `AccountProfile`
//! - `listings` - content id (16 bytes) → `ContentListing`
//! - `receipts` - decimal purchase id → `PurchaseReceipt`
//! - `disputes` - wallet (20 bytes) ‖ dispute id (16 bytes) → `Dispute`
//!
//! Values are JSON. Read-modify-write operations are serialized by one
//! writer mutex; `record_purchase` commits the receipt and its counter bumps
//! in a single `WriteBatch`.

use parking_lot::Mutex;
use rocksdb::{
    BlockBasedOptions, ColumnFamily, ColumnFamilyDescriptor, DBCompressionType, Direction,
    IteratorMode, Options, WriteBatch, WriteOptions, DB,
};
use std::path::PathBuf;

use shared_types::{
    AccountProfile, AccountStore, Address, ContentId, ContentListing, Dispute, DisputeStatus,
    DisputeStore, ListingStore, PurchaseId, PurchaseReceipt, ReceiptStore, StoreError, Timestamp,
    U256,
};

use super::{decode, encode, unavailable};

pub const CF_ACCOUNTS: &str = "accounts";
pub const CF_LISTINGS: &str = "listings";
pub const CF_RECEIPTS: &str = "receipts";
pub const CF_DISPUTES: &str = "disputes";

/// All column families used by the projection store
pub const COLUMN_FAMILIES: &[&str] = &[CF_ACCOUNTS, CF_LISTINGS, CF_RECEIPTS, CF_DISPUTES];

/// RocksDB tuning
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory
    pub path: PathBuf,
    /// Block cache size in bytes (default: 64MB)
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 16MB)
    pub write_buffer_size: usize,
    /// Enable fsync after each write (default: true for durability)
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/projection"),
            block_cache_size: 64 * 1024 * 1024,
            write_buffer_size: 16 * 1024 * 1024,
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    /// Create config for testing (smaller buffers, no sync)
    pub fn for_testing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 8 * 1024 * 1024,
            write_buffer_size: 4 * 1024 * 1024,
            sync_writes: false,
        }
    }

    pub(crate) fn db_options(&self) -> Options {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_write_buffer_size(self.write_buffer_size);
        opts.set_compression_type(DBCompressionType::Snappy);

        let mut block_opts = BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(self.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);
        opts
    }

    pub(crate) fn write_options(&self) -> WriteOptions {
        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.sync_writes);
        write_opts
    }
}

pub struct RocksDbProjectionStore {
    db: DB,
    config: RocksDbConfig,
    write_lock: Mutex<()>,
}

impl RocksDbProjectionStore {
    /// Open or create the database
    pub fn open(config: RocksDbConfig) -> Result<Self, StoreError> {
        let opts = config.db_options();
        let cf_descriptors: Vec<ColumnFamilyDescriptor> = COLUMN_FAMILIES
            .iter()
            .map(|name| {
                let mut cf_opts = Options::default();
                cf_opts.set_compression_type(DBCompressionType::Snappy);
                ColumnFamilyDescriptor::new(*name, cf_opts)
            })
            .collect();

        let db = DB::open_cf_descriptors(&opts, &config.path, cf_descriptors)
            .map_err(|e| unavailable("open", e))?;

        Ok(Self {
            db,
            config,
            write_lock: Mutex::new(()),
        })
    }

    fn cf(&self, name: &'static str) -> Result<&ColumnFamily, StoreError> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Unavailable(format!("column family {name} missing")))
    }

    fn read<T: serde::de::DeserializeOwned>(
        &self,
        cf: &'static str,
        key: &[u8],
    ) -> Result<Option<T>, StoreError> {
        let cf = self.cf(cf)?;
        match self.db.get_cf(cf, key).map_err(|e| unavailable("get", e))? {
            Some(bytes) => decode(key, &bytes).map(Some),
            None => Ok(None),
        }
    }

    fn write<T: serde::Serialize>(
        &self,
        cf: &'static str,
        key: &[u8],
        value: &T,
    ) -> Result<(), StoreError> {
        let cf = self.cf(cf)?;
        self.db
            .put_cf_opt(cf, key, encode(key, value)?, &self.config.write_options())
            .map_err(|e| unavailable("put", e))
    }

    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        self.db
            .write_opt(batch, &self.config.write_options())
            .map_err(|e| unavailable("batch write", e))
    }

    fn account_or_stand_in(
        &self,
        wallet: &Address,
        now: Timestamp,
    ) -> Result<AccountProfile, StoreError> {
        Ok(self
            .read(CF_ACCOUNTS, wallet.as_bytes())?
            .unwrap_or_else(|| AccountProfile::stand_in(*wallet, now)))
    }

    fn wallet_disputes(&self, wallet: &Address) -> Result<Vec<(Vec<u8>, Dispute)>, StoreError> {
        let cf = self.cf(CF_DISPUTES)?;
        let prefix = wallet.as_bytes();
        let mut found = Vec::new();
        for item in self
            .db
            .iterator_cf(cf, IteratorMode::From(prefix, Direction::Forward))
        {
            let (key, value) = item.map_err(|e| unavailable("iterate", e))?;
            if !key.starts_with(prefix) {
                break;
            }
            let dispute: Dispute = decode(&key, &value)?;
            found.push((key.into_vec(), dispute));
        }
        Ok(found)
    }

    fn transition_disputes(
        &self,
        wallet: &Address,
        now: Timestamp,
        next: impl Fn(DisputeStatus) -> Option<DisputeStatus>,
    ) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock();
        let cf = self.cf(CF_DISPUTES)?;
        let mut batch = WriteBatch::default();
        let mut changed = 0;
        for (key, mut dispute) in self.wallet_disputes(wallet)? {
            if let Some(status) = next(dispute.status) {
                dispute.status = status;
                dispute.updated_at = now;
                batch.put_cf(cf, &key, encode(&key, &dispute)?);
                changed += 1;
            }
        }
        if changed > 0 {
            self.commit(batch)?;
        }
        Ok(changed)
    }
}

fn receipt_key(purchase_id: &PurchaseId) -> Vec<u8> {
    purchase_id.to_string().into_bytes()
}

fn dispute_key(dispute: &Dispute) -> Vec<u8> {
    let mut key = Vec::with_capacity(Address::LEN + 16);
    key.extend_from_slice(dispute.wallet.as_bytes());
    key.extend_from_slice(dispute.id.as_bytes());
    key
}

impl AccountStore for RocksDbProjectionStore {
    fn get_account(&self, wallet: &Address) -> Result<Option<AccountProfile>, StoreError> {
        self.read(CF_ACCOUNTS, wallet.as_bytes())
    }

    fn insert_account_if_absent(&self, profile: AccountProfile) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock();
        let key = profile.wallet.as_bytes();
        if self.read::<AccountProfile>(CF_ACCOUNTS, key)?.is_some() {
            return Ok(false);
        }
        self.write(CF_ACCOUNTS, key, &profile)?;
        Ok(true)
    }

    fn fill_external_id(
        &self,
        wallet: &Address,
        external_id: U256,
        joined_at: Timestamp,
        now: Timestamp,
    ) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock();
        let Some(mut profile) = self.read::<AccountProfile>(CF_ACCOUNTS, wallet.as_bytes())? else {
            return Ok(false);
        };
        if profile.external_id.is_some() {
            return Ok(false);
        }
        profile.external_id = Some(external_id);
        profile.joined_at.get_or_insert(joined_at);
        profile.updated_at = now;
        self.write(CF_ACCOUNTS, wallet.as_bytes(), &profile)?;
        Ok(true)
    }

    fn set_revoked(
        &self,
        wallet: &Address,
        revoked: bool,
        now: Timestamp,
    ) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock();
        let existing = self.read::<AccountProfile>(CF_ACCOUNTS, wallet.as_bytes())?;
        let is_new = existing.is_none();
        let mut profile = existing.unwrap_or_else(|| AccountProfile::stand_in(*wallet, now));
        let previous = profile.revoked;
        if previous != revoked || is_new {
            profile.revoked = revoked;
            profile.updated_at = now;
            self.write(CF_ACCOUNTS, wallet.as_bytes(), &profile)?;
        }
        Ok(previous)
    }
}

impl ListingStore for RocksDbProjectionStore {
    fn get_listing(&self, content_id: &ContentId) -> Result<Option<ContentListing>, StoreError> {
        self.read(CF_LISTINGS, content_id.as_bytes())
    }

    fn upsert_listing(&self, mut listing: ContentListing) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let key = *listing.content_id.as_bytes();
        if let Some(existing) = self.read::<ContentListing>(CF_LISTINGS, &key)? {
            listing.sales_count = existing.sales_count;
        }
        listing.is_stand_in = false;
        self.write(CF_LISTINGS, &key, &listing)
    }
}

impl ReceiptStore for RocksDbProjectionStore {
    fn get_receipt(&self, purchase_id: &PurchaseId) -> Result<Option<PurchaseReceipt>, StoreError> {
        self.read(CF_RECEIPTS, &receipt_key(purchase_id))
    }

    fn record_purchase(
        &self,
        receipt: PurchaseReceipt,
        now: Timestamp,
    ) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock();
        let receipt_key = receipt_key(&receipt.purchase_id);
        if self.read::<PurchaseReceipt>(CF_RECEIPTS, &receipt_key)?.is_some() {
            return Ok(false);
        }

        let listing_key = *receipt.content_id.as_bytes();
        let mut listing = self
            .read::<ContentListing>(CF_LISTINGS, &listing_key)?
            .unwrap_or_else(|| {
                ContentListing::stand_in(
                    receipt.content_id,
                    receipt.on_chain_content_id,
                    receipt.seller,
                )
            });
        listing.sales_count += 1;

        let mut seller = self.account_or_stand_in(&receipt.seller, now)?;
        seller.sales_count += 1;
        seller.updated_at = now;

        let mut batch = WriteBatch::default();
        if receipt.buyer == receipt.seller {
            seller.purchase_count += 1;
        } else {
            let mut buyer = self.account_or_stand_in(&receipt.buyer, now)?;
            buyer.purchase_count += 1;
            buyer.updated_at = now;
            batch.put_cf(
                self.cf(CF_ACCOUNTS)?,
                buyer.wallet.as_bytes(),
                encode(buyer.wallet.as_bytes(), &buyer)?,
            );
        }
        batch.put_cf(
            self.cf(CF_ACCOUNTS)?,
            seller.wallet.as_bytes(),
            encode(seller.wallet.as_bytes(), &seller)?,
        );
        batch.put_cf(self.cf(CF_LISTINGS)?, listing_key, encode(&listing_key, &listing)?);
        batch.put_cf(self.cf(CF_RECEIPTS)?, &receipt_key, encode(&receipt_key, &receipt)?);

        self.commit(batch)?;
        Ok(true)
    }
}

impl DisputeStore for RocksDbProjectionStore {
    fn open_dispute(&self, dispute: Dispute) -> Result<(), StoreError> {
        self.write(CF_DISPUTES, &dispute_key(&dispute), &dispute)
    }

    fn disputes_for_wallet(&self, wallet: &Address) -> Result<Vec<Dispute>, StoreError> {
        let mut found: Vec<Dispute> = self
            .wallet_disputes(wallet)?
            .into_iter()
            .map(|(_, d)| d)
            .collect();
        found.sort_by_key(|d| d.opened_at);
        Ok(found)
    }

    fn reopen_resolved_for_wallet(
        &self,
        wallet: &Address,
        now: Timestamp,
    ) -> Result<usize, StoreError> {
        self.transition_disputes(wallet, now, |s| {
            (s == DisputeStatus::Resolved).then_some(DisputeStatus::Pending)
        })
    }

    fn resolve_open_for_wallet(
        &self,
        wallet: &Address,
        now: Timestamp,
    ) -> Result<usize, StoreError> {
        self.transition_disputes(wallet, now, |s| s.is_open().then_some(DisputeStatus::Resolved))
    }
}

impl std::fmt::Debug for RocksDbProjectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RocksDbProjectionStore")
            .field("path", &self.config.path)
            .finish_non_exhaustive()
    }
}
