//! In-memory processed-event store.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use shared_types::{StoreError, Timestamp};

use crate::domain::EventId;
use crate::ports::ProcessedEventStore;

/// `DashMap` of event id to first-seen time.
///
/// Expired records are replaced on insert and dropped by `purge_expired`.
#[derive(Debug)]
pub struct InMemoryProcessedEventStore {
    records: DashMap<EventId, Timestamp>,
    retention_secs: u64,
    unavailable: AtomicBool,
}

impl InMemoryProcessedEventStore {
    #[must_use]
    pub fn new(retention_secs: u64) -> Self {
        Self {
            records: DashMap::new(),
            retention_secs,
            unavailable: AtomicBool::new(false),
        }
    }

    /// Simulates an outage: every call fails with `StoreError::Unavailable`.
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn is_expired(&self, seen_at: Timestamp, now: Timestamp) -> bool {
        now.saturating_sub(seen_at) >= self.retention_secs
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("processed-event store switched off".into()));
        }
        Ok(())
    }
}

impl ProcessedEventStore for InMemoryProcessedEventStore {
    fn insert_if_absent(&self, event_id: &EventId, now: Timestamp) -> Result<bool, StoreError> {
        self.ensure_available()?;
        match self.records.entry(event_id.clone()) {
            Entry::Occupied(mut existing) => {
                if self.is_expired(*existing.get(), now) {
                    existing.insert(now);
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(now);
                Ok(true)
            }
        }
    }

    fn remove(&self, event_id: &EventId) -> Result<(), StoreError> {
        self.ensure_available()?;
        self.records.remove(event_id);
        Ok(())
    }

    fn purge_expired(&self, now: Timestamp) -> Result<usize, StoreError> {
        self.ensure_available()?;
        let before = self.records.len();
        self.records.retain(|_, seen_at| !self.is_expired(*seen_at, now));
        Ok(before.saturating_sub(self.records.len()))
    }
}
