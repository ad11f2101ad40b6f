//! # Domain Layer

pub mod errors;
pub mod gate;

pub use errors::*;
pub use gate::*;
