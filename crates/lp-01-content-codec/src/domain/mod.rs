//! # Domain Layer
//!
//! Pure encoding logic. No I/O.

pub mod codec;
pub mod errors;

pub use codec::*;
pub use errors::*;
