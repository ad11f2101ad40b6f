//! # Purchase Eligibility Gate (lp-06)
//!
//! Synchronous, read-only check run when an authenticated buyer asks for the
//! ledger identifier of a listing. Checks run in a fixed order and the first
//! failure wins:
//!
//! 1. listing exists, else `NotFound`
//! 2. listing is active and unexpired, else `Unavailable`
//! 3. buyer is not the seller, else `SelfPurchaseForbidden`
//! 4. seller is not revoked, else `SellerRevoked`
//!
//! The gate is advisory. A purchase that reaches the ledger is projected
//! regardless of what the gate would say at that point.

pub mod domain;

pub use domain::*;
