//! # API Gateway (lp-07)
//!
//! HTTP surface of the ledger projector.
//!
//! ## Endpoints
//!
//! | Method | Path | Auth | Purpose |
//! |--------|------|------|---------|
//! | POST | `/webhooks` | HMAC signature | Ingest a notifier delivery |
//! | GET | `/purchase-identifier/:contentId` | Bearer session | Eligibility check, returns the ledger id |
//! | GET | `/receipts/:purchaseId` | Bearer session | Receipt, for its buyer or seller |
//! | GET | `/health` | none | Liveness |
//! | GET | `/metrics` | none | JSON counters |
//!
//! ## Webhook status codes
//!
//! | Status | Meaning | Notifier action |
//! |--------|---------|-----------------|
//! | 200 | Accepted, even if every log was a duplicate | none |
//! | 400 | Stale timestamp or malformed envelope | give up |
//! | 401 | Bad signature | give up |
//! | 503 | Storage unavailable | redeliver |
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): pipeline, config, errors, sessions
//! - **Middleware** (`middleware/`): ingestion metrics
//! - **Service** (`service.rs`): axum router and handlers

pub mod domain;
pub mod middleware;
pub mod service;

#[cfg(test)]
mod test_support;

pub use domain::*;
pub use middleware::*;
pub use service::{ApiGatewayService, GatewayDeps};
