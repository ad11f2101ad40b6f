//! # Service Container
//!
//! Configuration plus the storage handles and gateway built from it.

pub mod config;
pub mod subsystems;

pub use config::{ConfigError, IngestConfig, LogFormat, NodeConfig, StorageBackend};
pub use subsystems::{open_storage, ServiceContainer, StorageHandles};
