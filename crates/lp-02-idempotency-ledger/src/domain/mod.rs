//! # Domain Layer
//!
//! Event identity and the admission service.

pub mod errors;
pub mod event_id;
pub mod ledger;

pub use errors::*;
pub use event_id::*;
pub use ledger::*;
