//! # Webhook Ingress (lp-04)
//!
//! First two stages of the ingestion pipeline:
//!
//! ```text
//! raw body + headers ──→ SignatureGuard ──→ normalize() ──→ Vec<NormalizedLogEntry>
//!                        (HMAC, freshness)   (two envelope shapes)
//! ```
//!
//! Both stages are pure validation. Nothing here touches storage.
//!
//! ## Security
//!
//! - HMAC-SHA256 over the exact received bytes, compared in constant time
//! - Deliveries whose claimed timestamp is more than [`MAX_EVENT_AGE_SECS`]
//!   old are rejected as stale
//! - The verification bypass is ignored in production, whatever its value

pub mod domain;

pub use domain::*;
