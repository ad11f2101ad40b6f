//! # Service Container
//!
//! Opens the configured storage backend and builds the API gateway over it.
//!
//! ```text
//! NodeConfig ──→ StorageHandles (projection store, processed events, clock)
//!                       │
//!                       ↓
//!               ApiGatewayService ──→ Router
//! ```

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use lp_02_idempotency_ledger::{InMemoryProcessedEventStore, ProcessedEventStore};
use lp_07_api_gateway::{ApiGatewayService, GatewayDeps};
use shared_types::{InMemoryProjectionStore, ProjectionStore, SystemTimeSource, TimeSource};

use crate::container::config::{NodeConfig, StorageBackend};

/// The three shared handles every component is built from.
#[derive(Clone)]
pub struct StorageHandles {
    pub store: Arc<dyn ProjectionStore>,
    pub processed_events: Arc<dyn ProcessedEventStore>,
    pub clock: Arc<dyn TimeSource>,
}

impl StorageHandles {
    /// In-memory stores and the system clock.
    pub fn in_memory(retention_secs: u64) -> Self {
        Self {
            store: Arc::new(InMemoryProjectionStore::new()),
            processed_events: Arc::new(InMemoryProcessedEventStore::new(retention_secs)),
            clock: Arc::new(SystemTimeSource),
        }
    }
}

/// Opens the backend named by `config.storage`.
pub fn open_storage(config: &NodeConfig) -> Result<StorageHandles> {
    match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage (state is lost on restart)");
            Ok(StorageHandles::in_memory(config.ingest.event_retention_secs))
        }
        StorageBackend::RocksDb => open_rocksdb(config),
    }
}

#[cfg(feature = "rocksdb")]
fn open_rocksdb(config: &NodeConfig) -> Result<StorageHandles> {
    use crate::adapters::{RocksDbConfig, RocksDbProcessedEventStore, RocksDbProjectionStore};

    let data_dir = &config.storage.data_dir;
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data dir {}", data_dir.display()))?;

    let store = RocksDbProjectionStore::open(RocksDbConfig {
        path: data_dir.join("projection"),
        ..RocksDbConfig::default()
    })
    .context("Failed to open projection store")?;

    let processed_events = RocksDbProcessedEventStore::open(
        RocksDbConfig {
            path: data_dir.join("processed_events"),
            ..RocksDbConfig::default()
        },
        config.ingest.event_retention_secs,
    )
    .context("Failed to open processed-event store")?;

    info!(data_dir = %data_dir.display(), "Using RocksDB storage");
    Ok(StorageHandles {
        store: Arc::new(store),
        processed_events: Arc::new(processed_events),
        clock: Arc::new(SystemTimeSource),
    })
}

#[cfg(not(feature = "rocksdb"))]
fn open_rocksdb(_config: &NodeConfig) -> Result<StorageHandles> {
    anyhow::bail!("LP_STORAGE_BACKEND=rocksdb requires building with --features rocksdb")
}

/// Everything the runtime serves.
pub struct ServiceContainer {
    pub config: NodeConfig,
    pub storage: StorageHandles,
    pub gateway: ApiGatewayService,
}

impl ServiceContainer {
    /// Validates `config` and wires the gateway over `storage`.
    pub fn new(config: NodeConfig, storage: StorageHandles) -> Result<Self> {
        config
            .validate_for_production()
            .context("Configuration rejected")?;

        let deps = GatewayDeps {
            store: Arc::clone(&storage.store),
            processed_events: Arc::clone(&storage.processed_events),
            clock: Arc::clone(&storage.clock),
        };
        let gateway = ApiGatewayService::new(config.gateway_config(), deps)
            .context("Failed to build API gateway")?;

        Ok(Self {
            config,
            storage,
            gateway,
        })
    }
}
