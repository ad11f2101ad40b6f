//! # Domain Layer

pub mod errors;
pub mod outcome;
pub mod projector;

pub use errors::*;
pub use outcome::*;
pub use projector::*;
