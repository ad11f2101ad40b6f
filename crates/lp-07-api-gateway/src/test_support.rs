//! Shared fixtures for this crate's unit tests.

use std::sync::Arc;

use lp_02_idempotency_ledger::{
    IdempotencyLedger, InMemoryProcessedEventStore, DEFAULT_RETENTION_SECS,
};
use lp_03_event_decoder::EventDecoder;
use lp_04_webhook_ingress::{Environment, GuardConfig, SignatureGuard};
use lp_05_domain_projector::DomainProjector;
use shared_types::{
    encode_hex, sign_message_hex, InMemoryProjectionStore, ManualTimeSource, NormalizedLogEntry,
    Timestamp,
};

use crate::domain::config::GatewayConfig;
use crate::domain::pipeline::IngestionPipeline;
use crate::middleware::IngestMetrics;
use crate::service::{ApiGatewayService, GatewayDeps};

/// 2023-11-14T22:13:20Z
pub const NOW: Timestamp = 1_700_000_000;
pub const CREATED_AT: &str = "2023-11-14T22:13:20Z";
pub const WEBHOOK_SECRET: &[u8] = b"whsec_unit";
pub const SESSION_SECRET: &[u8] = b"session_unit";

pub struct Harness {
    pub store: Arc<InMemoryProjectionStore>,
    pub processed: Arc<InMemoryProcessedEventStore>,
    pub clock: Arc<ManualTimeSource>,
    pub pipeline: IngestionPipeline,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryProjectionStore::new());
        let processed = Arc::new(InMemoryProcessedEventStore::new(DEFAULT_RETENTION_SECS));
        let clock = Arc::new(ManualTimeSource::new(NOW));

        let pipeline = IngestionPipeline::new(
            SignatureGuard::new(guard_config(), clock.clone()),
            IdempotencyLedger::new(processed.clone(), clock.clone()),
            EventDecoder::new(),
            DomainProjector::new(store.clone(), clock.clone()),
            Arc::new(IngestMetrics::new()),
        );

        Self {
            store,
            processed,
            clock,
            pipeline,
        }
    }

    pub fn sign(&self, body: &[u8]) -> String {
        sign_message_hex(body, WEBHOOK_SECRET)
    }

    /// A full gateway over this harness's stores and clock.
    pub fn gateway(&self) -> ApiGatewayService {
        let config = GatewayConfig {
            guard: guard_config(),
            session_secret: SESSION_SECRET.to_vec(),
            ..GatewayConfig::default()
        };
        let deps = GatewayDeps {
            store: self.store.clone(),
            processed_events: self.processed.clone(),
            clock: self.clock.clone(),
        };
        match ApiGatewayService::new(config, deps) {
            Ok(service) => service,
            Err(e) => panic!("test gateway config rejected: {e}"),
        }
    }
}

fn guard_config() -> GuardConfig {
    GuardConfig::new(WEBHOOK_SECRET, Environment::Production)
}

/// A `GRAPHQL` envelope carrying `logs` in one block at `NOW`.
pub fn block_body(logs: &[NormalizedLogEntry]) -> Vec<u8> {
    let logs: Vec<serde_json::Value> = logs
        .iter()
        .map(|log| {
            serde_json::json!({
                "account": { "address": log.contract_address },
                "topics": log.topics,
                "data": encode_hex(&log.data),
                "index": log.log_index,
                "transaction": { "hash": log.transaction_hash },
            })
        })
        .collect();

    serde_json::json!({
        "webhookId": "wh_unit",
        "id": "whevt_unit",
        "createdAt": CREATED_AT,
        "type": "GRAPHQL",
        "event": { "data": { "block": {
            "number": 1,
            "timestamp": NOW,
            "logs": logs,
        } } }
    })
    .to_string()
    .into_bytes()
}
