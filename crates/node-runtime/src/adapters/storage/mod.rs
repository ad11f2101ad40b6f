//! # Storage Adapters
//!
//! RocksDB implementations of the projection and processed-event store
//! ports. Compiled only with the `rocksdb` feature; the in-memory stores in
//! `shared-types` and `lp-02` are used otherwise.

pub mod processed_events;
pub mod rocksdb_adapter;

pub use processed_events::RocksDbProcessedEventStore;
pub use rocksdb_adapter::{RocksDbConfig, RocksDbProjectionStore};

use shared_types::StoreError;

pub(crate) fn unavailable(op: &str, err: rocksdb::Error) -> StoreError {
    StoreError::Unavailable(format!("RocksDB {op} failed: {err}"))
}

pub(crate) fn encode<T: serde::Serialize>(key: &[u8], value: &T) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec(value).map_err(|e| StoreError::Corrupt {
        key: shared_types::encode_hex(key),
        message: e.to_string(),
    })
}

pub(crate) fn decode<T: serde::de::DeserializeOwned>(
    key: &[u8],
    bytes: &[u8],
) -> Result<T, StoreError> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::Corrupt {
        key: shared_types::encode_hex(key),
        message: e.to_string(),
    })
}
