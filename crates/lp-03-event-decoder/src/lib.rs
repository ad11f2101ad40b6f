//! # Event Decoder (lp-03)
//!
//! Maps a [`NormalizedLogEntry`](shared_types::NormalizedLogEntry) to a typed
//! [`DomainEvent`] using a static registry keyed by the log's first topic
//! (the keccak-256 hash of the event signature).
//!
//! ## Outcomes
//!
//! | Log | Result |
//! |-----|--------|
//! | Unknown or missing `topics[0]` | `Ok(None)`, skipped silently |
//! | Emitter outside the configured allowlist | `Ok(None)` |
//! | Known topic, fields decode | `Ok(Some(event))` |
//! | Known topic, fields malformed | `Err(DecodeError)`, caller logs and skips |
//!
//! ## Registry
//!
//! | Signature | Indexed | Data | Event |
//! |-----------|---------|------|-------|
//! | `MemberJoined(address,uint256,uint256)` | wallet, externalId | joinedAt | `AccountRegistered` |
//! | `PassMinted(address,uint256,bool)` | wallet, externalId | isAdminMint | `AccountPassMinted` |
//! | `BlacklistUpdated(address,bool)` | wallet | revoked | `AccessRevocationChanged` |
//! | `ContentPurchased(address,address,bytes32,uint256,uint256)` | buyer, seller, contentId | price, purchaseId | `ContentPurchased` |

pub mod domain;

pub use domain::*;
