//! # Outbound Ports (Driven Ports)

use shared_types::{StoreError, Timestamp};

use crate::domain::EventId;

/// Keyed store of processed-event records with time-based expiry.
///
/// Implementations own their retention window. A record older than the
/// window must behave as absent.
pub trait ProcessedEventStore: Send + Sync {
    /// Atomic create-if-absent. Returns `true` when this call created the
    /// record, `false` when a live record already existed.
    fn insert_if_absent(&self, event_id: &EventId, now: Timestamp) -> Result<bool, StoreError>;

    /// Deletes a record. Deleting an absent record is not an error.
    fn remove(&self, event_id: &EventId) -> Result<(), StoreError>;

    /// Deletes expired records, returning how many were dropped.
    fn purge_expired(&self, now: Timestamp) -> Result<usize, StoreError>;
}
