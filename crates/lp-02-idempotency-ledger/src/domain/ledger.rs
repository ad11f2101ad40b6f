use std::sync::Arc;
use tracing::{debug, warn};

use shared_types::TimeSource;

use super::errors::LedgerError;
use super::event_id::EventId;
use crate::ports::ProcessedEventStore;

/// Replay-suppression window: 24 hours.
pub const DEFAULT_RETENTION_SECS: u64 = 24 * 60 * 60;

/// Outcome of admitting a log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// First sighting inside the window. The caller owns this log.
    Fresh,
    /// Already admitted by an earlier (or concurrent) delivery.
    AlreadySeen,
}

impl Admission {
    #[must_use]
    pub fn is_already_seen(&self) -> bool {
        matches!(self, Self::AlreadySeen)
    }
}

/// Admission service over a [`ProcessedEventStore`].
#[derive(Clone)]
pub struct IdempotencyLedger {
    store: Arc<dyn ProcessedEventStore>,
    clock: Arc<dyn TimeSource>,
}

impl IdempotencyLedger {
    pub fn new(store: Arc<dyn ProcessedEventStore>, clock: Arc<dyn TimeSource>) -> Self {
        Self { store, clock }
    }

    /// Atomically records `event_id` unless it is already present.
    pub fn admit(&self, event_id: &EventId) -> Result<Admission, LedgerError> {
        let inserted = self
            .store
            .insert_if_absent(event_id, self.clock.now())
            .inspect_err(|e| warn!(event_id = %event_id, error = %e, "idempotency admit failed"))?;

        if inserted {
            Ok(Admission::Fresh)
        } else {
            debug!(event_id = %event_id, "duplicate log suppressed");
            Ok(Admission::AlreadySeen)
        }
    }

    /// Forgets `event_id` so a redelivery reprocesses it.
    ///
    /// Only called when applying an admitted log failed retryably.
    pub fn release(&self, event_id: &EventId) -> Result<(), LedgerError> {
        self.store.remove(event_id)?;
        debug!(event_id = %event_id, "idempotency record released");
        Ok(())
    }

    /// Drops records older than the retention window.
    pub fn purge_expired(&self) -> Result<usize, LedgerError> {
        Ok(self.store.purge_expired(self.clock.now())?)
    }
}

impl std::fmt::Debug for IdempotencyLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdempotencyLedger").finish_non_exhaustive()
    }
}
