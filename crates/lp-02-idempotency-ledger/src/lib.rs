//! # Idempotency Ledger (lp-02)
//!
//! Durable set of already-applied `(transaction hash, log index)` pairs with
//! automatic expiry. The webhook pipeline admits every log here before it is
//! projected, so a redelivered log is recognised and skipped.
//!
//! ## Semantics
//!
//! - **Write wins**: admission is a single create-if-absent on the store.
//!   Under a race between two deliveries of the same log exactly one sees
//!   [`Admission::Fresh`]; there is no check-then-write window.
//! - **Replay window, not history**: records expire after
//!   [`DEFAULT_RETENTION_SECS`] (24h).
//! - **Fail closed**: a store error is returned to the caller, which fails
//!   the whole delivery so the notifier redelivers it.
//!
//! ## Hexagonal Architecture
//!
//! - **Domain Layer** (`domain/`): `EventId`, `IdempotencyLedger`, errors
//! - **Ports Layer** (`ports/`): `ProcessedEventStore`
//! - **Adapters Layer** (`adapters/`): `InMemoryProcessedEventStore`
//!
//! The RocksDB store lives in `node-runtime` behind the `rocksdb` feature.

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
