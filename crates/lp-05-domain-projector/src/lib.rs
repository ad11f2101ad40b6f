//! # Domain Projector (lp-05)
//!
//! One handler per [`DomainEvent`](lp_03_event_decoder::DomainEvent)
//! variant, each mutating the off-chain store through the
//! [`ProjectionStore`](shared_types::ProjectionStore) port.
//!
//! ## Idempotency
//!
//! Every handler is idempotent on its own, independently of the
//! idempotency ledger:
//!
//! | Event | Guard |
//! |-------|-------|
//! | `AccountRegistered` | create-if-absent, fill-only `external_id` |
//! | `AccountPassMinted` | ignored unless `is_admin_mint`, then create-if-absent |
//! | `AccessRevocationChanged` | absolute value; dispute side effects only on a transition |
//! | `ContentPurchased` | receipt uniqueness per purchase id, counters bumped in the same step |
//!
//! ## Ordering
//!
//! Logs of unrelated wallets may arrive in any order. Handlers never fail
//! because a referenced profile or listing is missing; a stand-in is
//! created instead.

pub mod domain;

pub use domain::*;
