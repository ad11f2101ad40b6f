//! # Domain Layer

pub mod config;
pub mod envelope;
pub mod errors;
pub mod guard;
pub mod normalizer;

pub use config::*;
pub use envelope::*;
pub use errors::*;
pub use guard::*;
pub use normalizer::*;
