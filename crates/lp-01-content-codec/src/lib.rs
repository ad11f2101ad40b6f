//! # Content Identifier Codec (lp-01)
//!
//! Bijective mapping between the internal 128-bit content identifier
//! ([`ContentId`], a UUID) and the 32-byte identifier the ledger stores
//! ([`OnChainContentId`]).
//!
//! ## Layout
//!
//! ```text
//! ContentId  = b0 b1 .. b15
//! OnChain    = b0 b1 .. b15 | 00 00 .. 00
//!              (left-aligned)  (16 zero bytes)
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement |
//! |----|-----------|-------------|
//! | INVARIANT-1 | `from_on_chain(to_on_chain(x)) == x` | `domain/codec.rs` |
//! | INVARIANT-2 | Trailing 16 bytes of a decoded image are zero | `CodecError::NonZeroPadding` |
//!
//! ## Usage
//!
//! ```
//! use lp_01_content_codec::{from_on_chain, parse_content_id, to_on_chain};
//!
//! let id = parse_content_id("6f1c2a3b-4d5e-4f60-8172-93a4b5c6d7e8").unwrap();
//! let image = to_on_chain(&id);
//! assert_eq!(from_on_chain(&image).unwrap(), id);
//! ```

pub mod domain;

pub use domain::*;
pub use shared_types::{ContentId, OnChainContentId};
