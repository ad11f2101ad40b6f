//! # Ledger Projector Node
//!
//! Loads configuration, installs logging, opens storage and serves the
//! webhook and purchase-identifier API until Ctrl+C.

use anyhow::{Context, Result};
use tracing::{error, info};

use node_runtime::container::{open_storage, NodeConfig, ServiceContainer};
use node_runtime::logging::init_tracing;
use node_runtime::NodeRuntime;

#[tokio::main]
async fn main() -> Result<()> {
    let config = NodeConfig::from_env().context("Invalid configuration")?;
    init_tracing(config.server.log_format)?;

    let storage = open_storage(&config)?;
    let container = ServiceContainer::new(config, storage)?;

    let runtime = NodeRuntime::new(container);
    info!("Node is running. Press Ctrl+C to stop.");
    runtime
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for Ctrl+C");
            }
        })
        .await
}
