//! # Adapters
//!
//! Persistent implementations of the store ports.

#[cfg(feature = "rocksdb")]
pub mod storage;

#[cfg(feature = "rocksdb")]
pub use storage::{RocksDbConfig, RocksDbProcessedEventStore, RocksDbProjectionStore};
