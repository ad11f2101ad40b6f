//! # Node Runtime Library
//!
//! Exposes the runtime's modules for testing. The entry point is the
//! `main.rs` binary.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from `LP_*` environment variables
//! 2. Install the tracing subscriber
//! 3. Open the storage backend
//! 4. Refuse to start in production without both secrets
//! 5. Start the processed-event purge task
//! 6. Serve HTTP until Ctrl+C

pub mod adapters;
pub mod container;
pub mod logging;

use anyhow::{Context, Result};
use std::future::Future;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use lp_02_idempotency_ledger::IdempotencyLedger;

use crate::container::ServiceContainer;

/// The runtime: a container plus its shutdown signal.
pub struct NodeRuntime {
    container: ServiceContainer,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl NodeRuntime {
    pub fn new(container: ServiceContainer) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            container,
            shutdown_tx,
            shutdown_rx,
        }
    }

    pub fn container(&self) -> &ServiceContainer {
        &self.container
    }

    /// Runs until `shutdown` resolves, then drains the HTTP server and stops
    /// the background tasks.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let config = &self.container.config;
        let addr = config.gateway_config().http.addr();

        info!("===========================================");
        info!("  Ledger Projector v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");
        info!(
            environment = %config.security.environment,
            backend = ?config.storage.backend,
            contracts = config.ingest.contract_addresses.len(),
            "Configuration loaded"
        );

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;

        let purge = spawn_purge_task(
            self.container.gateway.ledger(),
            Duration::from_secs(config.ingest.purge_interval_secs),
            self.shutdown_rx.clone(),
        );

        let shutdown_tx = self.shutdown_tx;
        let served = self
            .container
            .gateway
            .serve(listener, async move {
                shutdown.await;
                info!("Initiating graceful shutdown...");
                if shutdown_tx.send(true).is_err() {
                    debug!("Background tasks already stopped");
                }
            })
            .await;

        if let Err(e) = purge.await {
            error!(error = %e, "Purge task panicked");
        }
        served.context("HTTP server failed")?;
        info!("Shutdown complete");
        Ok(())
    }
}

/// Periodically drops expired processed-event records.
pub fn spawn_purge_task(
    ledger: IdempotencyLedger,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let ledger = ledger.clone();
                    match tokio::task::spawn_blocking(move || ledger.purge_expired()).await {
                        Ok(Ok(purged)) => debug!(purged, "Processed-event records purged"),
                        Ok(Err(e)) => warn!(error = %e, "Processed-event purge failed"),
                        Err(e) => error!(error = %e, "Purge worker failed"),
                    }
                }
                _ = shutdown.changed() => {
                    info!("[purge] Shutdown signal received");
                    break;
                }
            }
        }
    })
}
