//! # Domain Layer
//!
//! Configuration, error mapping, the ingestion pipeline and session
//! verification. The HTTP wiring lives in `service`.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod session;

pub use config::*;
pub use error::*;
pub use pipeline::*;
pub use session::*;
