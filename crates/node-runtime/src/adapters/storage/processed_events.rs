//! # RocksDB Processed-Event Store
//!
//! The database is opened with RocksDB's TTL support, so compaction drops
//! records older than the retention window on its own. Compaction is lazy:
//! each value also stores its first-seen time and an expired record reads as
//! absent, matching the in-memory store.

use parking_lot::Mutex;
use rocksdb::{IteratorMode, DB};
use std::time::Duration;

use lp_02_idempotency_ledger::{EventId, ProcessedEventStore};
use shared_types::{StoreError, Timestamp};

use super::{unavailable, RocksDbConfig};

pub struct RocksDbProcessedEventStore {
    db: DB,
    config: RocksDbConfig,
    retention_secs: u64,
    write_lock: Mutex<()>,
}

impl RocksDbProcessedEventStore {
    pub fn open(config: RocksDbConfig, retention_secs: u64) -> Result<Self, StoreError> {
        let opts = config.db_options();
        let db = DB::open_with_ttl(&opts, &config.path, Duration::from_secs(retention_secs))
            .map_err(|e| unavailable("open", e))?;

        Ok(Self {
            db,
            config,
            retention_secs,
            write_lock: Mutex::new(()),
        })
    }

    fn is_expired(&self, seen_at: Timestamp, now: Timestamp) -> bool {
        now.saturating_sub(seen_at) >= self.retention_secs
    }

    fn seen_at(bytes: &[u8]) -> Timestamp {
        <[u8; 8]>::try_from(bytes).map_or(0, Timestamp::from_be_bytes)
    }
}

impl ProcessedEventStore for RocksDbProcessedEventStore {
    fn insert_if_absent(&self, event_id: &EventId, now: Timestamp) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock();
        let key = event_id.as_str().as_bytes();

        let existing = self.db.get(key).map_err(|e| unavailable("get", e))?;
        if let Some(bytes) = existing {
            if !self.is_expired(Self::seen_at(&bytes), now) {
                return Ok(false);
            }
        }

        self.db
            .put_opt(key, now.to_be_bytes(), &self.config.write_options())
            .map_err(|e| unavailable("put", e))?;
        Ok(true)
    }

    fn remove(&self, event_id: &EventId) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        self.db
            .delete_opt(event_id.as_str().as_bytes(), &self.config.write_options())
            .map_err(|e| unavailable("delete", e))
    }

    fn purge_expired(&self, now: Timestamp) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock();
        let mut purged = 0;
        for item in self.db.iterator(IteratorMode::Start) {
            let (key, value) = item.map_err(|e| unavailable("iterate", e))?;
            if self.is_expired(Self::seen_at(&value), now) {
                self.db.delete(&key).map_err(|e| unavailable("delete", e))?;
                purged += 1;
            }
        }
        Ok(purged)
    }
}

impl std::fmt::Debug for RocksDbProcessedEventStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RocksDbProcessedEventStore")
            .field("path", &self.config.path)
            .field("retention_secs", &self.retention_secs)
            .finish_non_exhaustive()
    }
}
