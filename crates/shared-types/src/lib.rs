//! # Shared Types Crate
//!
//! Value objects, projected entities, and store ports shared by every
//! Ledger Projector subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: the off-chain data model is defined here once.
//! - **Ports, not backends**: subsystems depend on the store traits in
//!   [`store`]; the runtime picks the backend.
//! - **Explicit clocks**: anything time-dependent takes a [`TimeSource`].

pub mod clock;
pub mod entities;
pub mod errors;
pub mod security;
pub mod store;

pub use clock::*;
pub use entities::*;
pub use errors::*;
pub use security::*;
pub use store::*;
