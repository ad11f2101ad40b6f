//! # Domain Layer
//!
//! Registry, ABI word decoding and the decoder itself. No I/O.

pub mod abi;
pub mod decoder;
pub mod encoder;
pub mod errors;
pub mod events;
pub mod registry;

pub use abi::*;
pub use decoder::*;
pub use encoder::*;
pub use errors::*;
pub use events::*;
pub use registry::*;
