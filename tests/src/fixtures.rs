//! Shared fixtures: a gateway over in-memory stores with a pinned clock,
//! signed deliveries in both envelope shapes, and log builders.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use lp_01_content_codec::to_on_chain;
use lp_02_idempotency_ledger::{
    InMemoryProcessedEventStore, ProcessedEventStore, DEFAULT_RETENTION_SECS,
};
use lp_03_event_decoder::{encode_log, DomainEvent};
use lp_04_webhook_ingress::{Environment, GuardConfig, SIGNATURE_HEADER};
use lp_07_api_gateway::{ApiGatewayService, GatewayConfig, GatewayDeps, SignedSessionVerifier};
use shared_types::{
    encode_hex, sign_message_hex, Address, ContentId, ContentListing, Hash,
    InMemoryProjectionStore, ListingStore, ManualTimeSource, NormalizedLogEntry, ProjectionStore,
    PurchaseId, Timestamp, U256,
};

/// 2023-11-14T22:13:20Z
pub const NOW: Timestamp = 1_700_000_000;
pub const CREATED_AT: &str = "2023-11-14T22:13:20Z";
pub const WEBHOOK_SECRET: &[u8] = b"whsec_integration";
pub const SESSION_SECRET: &[u8] = b"session_integration";
pub const CONTRACT: Address = Address::new([0xCC; 20]);

pub fn wallet(b: u8) -> Address {
    Address::new([b; 20])
}

pub fn tx(b: u8) -> Hash {
    Hash::new([b; 32])
}

/// A production-configured gateway over caller-supplied stores.
pub struct TestNode {
    pub store: Arc<dyn ProjectionStore>,
    pub processed: Arc<dyn ProcessedEventStore>,
    pub clock: Arc<ManualTimeSource>,
    pub gateway: ApiGatewayService,
    router: Router,
    sessions: SignedSessionVerifier,
}

impl TestNode {
    /// In-memory stores, returned alongside the node for direct inspection.
    pub fn in_memory() -> (Self, Arc<InMemoryProjectionStore>, Arc<InMemoryProcessedEventStore>) {
        let store = Arc::new(InMemoryProjectionStore::new());
        let processed = Arc::new(InMemoryProcessedEventStore::new(DEFAULT_RETENTION_SECS));
        let node = Self::over(store.clone(), processed.clone());
        (node, store, processed)
    }

    pub fn over(store: Arc<dyn ProjectionStore>, processed: Arc<dyn ProcessedEventStore>) -> Self {
        let clock = Arc::new(ManualTimeSource::new(NOW));
        let config = GatewayConfig {
            guard: GuardConfig::new(WEBHOOK_SECRET, Environment::Production),
            session_secret: SESSION_SECRET.to_vec(),
            allowed_contracts: vec![CONTRACT],
            ..GatewayConfig::default()
        };
        let deps = GatewayDeps {
            store: Arc::clone(&store),
            processed_events: Arc::clone(&processed),
            clock: clock.clone(),
        };
        let gateway = match ApiGatewayService::new(config, deps) {
            Ok(gateway) => gateway,
            Err(e) => panic!("fixture gateway rejected: {e}"),
        };
        let router = gateway.router();
        let sessions = SignedSessionVerifier::new(SESSION_SECRET, clock.clone());

        Self {
            store,
            processed,
            clock,
            gateway,
            router,
            sessions,
        }
    }

    /// A bearer token for `wallet`, valid for an hour from the node's clock.
    pub fn token(&self, wallet: &Address) -> String {
        use shared_types::TimeSource;
        self.sessions.issue(wallet, self.clock.now() + 3_600)
    }

    /// POSTs a correctly signed delivery.
    pub async fn deliver(&self, body: Vec<u8>) -> (StatusCode, Value) {
        let signature = sign_message_hex(&body, WEBHOOK_SECRET);
        self.deliver_signed(body, &signature).await
    }

    pub async fn deliver_signed(&self, body: Vec<u8>, signature: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/webhooks")
            .header(header::CONTENT_TYPE, "application/json")
            .header(SIGNATURE_HEADER, signature)
            .body(Body::from(body))
            .expect("request builds");
        self.send(request).await
    }

    /// GETs `uri`, authenticated as `as_wallet` when given.
    pub async fn get(&self, uri: &str, as_wallet: Option<&Address>) -> (StatusCode, Value) {
        let mut builder = Request::builder().uri(uri);
        if let Some(wallet) = as_wallet {
            builder =
                builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token(wallet)));
        }
        self.send(builder.body(Body::empty()).expect("request builds")).await
    }

    pub async fn purchase_identifier(
        &self,
        content_id: &ContentId,
        buyer: &Address,
    ) -> (StatusCode, Value) {
        self.get(&format!("/purchase-identifier/{content_id}"), Some(buyer)).await
    }

    pub async fn receipt(&self, purchase_id: u64, as_wallet: &Address) -> (StatusCode, Value) {
        self.get(&format!("/receipts/{purchase_id}"), Some(as_wallet)).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    /// Authors an active listing through the listing service's write path.
    pub fn author_listing(&self, seller: Address) -> ContentId {
        let content_id = ContentId::new_v4();
        self.store
            .upsert_listing(ContentListing {
                content_id,
                on_chain_content_id: to_on_chain(&content_id),
                seller,
                price: U256::from(10u64),
                active: true,
                expires_at: None,
                sales_count: 0,
                is_stand_in: false,
            })
            .expect("listing stored");
        content_id
    }
}

// -----------------------------------------------------------------------------
// LOG BUILDERS
// -----------------------------------------------------------------------------

pub fn log(event: DomainEvent, tx_hash: Hash, log_index: u64) -> NormalizedLogEntry {
    encode_log(&event, CONTRACT, tx_hash, log_index, Some(NOW))
}

pub fn registered(
    wallet: Address,
    external_id: u64,
    tx_hash: Hash,
    log_index: u64,
) -> NormalizedLogEntry {
    log(
        DomainEvent::AccountRegistered {
            wallet,
            external_id: U256::from(external_id),
            joined_at: NOW - 60,
        },
        tx_hash,
        log_index,
    )
}

pub fn pass_minted(
    wallet: Address,
    external_id: u64,
    is_admin_mint: bool,
    tx_hash: Hash,
    log_index: u64,
) -> NormalizedLogEntry {
    log(
        DomainEvent::AccountPassMinted {
            wallet,
            external_id: U256::from(external_id),
            is_admin_mint,
        },
        tx_hash,
        log_index,
    )
}

pub fn revocation(
    wallet: Address,
    revoked: bool,
    tx_hash: Hash,
    log_index: u64,
) -> NormalizedLogEntry {
    log(DomainEvent::AccessRevocationChanged { wallet, revoked }, tx_hash, log_index)
}

pub fn purchase(
    buyer: Address,
    seller: Address,
    content_id: &ContentId,
    purchase_id: u64,
    tx_hash: Hash,
    log_index: u64,
) -> NormalizedLogEntry {
    log(
        DomainEvent::ContentPurchased {
            buyer,
            seller,
            on_chain_content_id: to_on_chain(content_id),
            price: U256::from(10u64),
            purchase_id: PurchaseId::from(purchase_id),
            tx_hash,
            log_index,
            block_timestamp: Some(NOW),
        },
        tx_hash,
        log_index,
    )
}

// -----------------------------------------------------------------------------
// ENVELOPES
// -----------------------------------------------------------------------------

/// A `GRAPHQL` delivery carrying `logs` in one block at `NOW`.
pub fn block_delivery(logs: &[NormalizedLogEntry]) -> Vec<u8> {
    let logs: Vec<Value> = logs
        .iter()
        .map(|log| {
            json!({
                "account": { "address": log.contract_address },
                "topics": log.topics,
                "data": encode_hex(&log.data),
                "index": log.log_index,
                "transaction": { "hash": log.transaction_hash },
            })
        })
        .collect();

    json!({
        "webhookId": "wh_integration",
        "id": "whevt_block",
        "createdAt": CREATED_AT,
        "type": "GRAPHQL",
        "event": { "data": { "block": {
            "number": 100,
            "timestamp": NOW,
            "logs": logs,
        } } }
    })
    .to_string()
    .into_bytes()
}

/// An `ADDRESS_ACTIVITY` delivery carrying `logs`, with hex quantities.
pub fn activity_delivery(logs: &[NormalizedLogEntry]) -> Vec<u8> {
    let activity: Vec<Value> = logs
        .iter()
        .map(|log| {
            json!({
                "blockNum": "0x64",
                "hash": log.transaction_hash,
                "log": {
                    "address": log.contract_address,
                    "topics": log.topics,
                    "data": encode_hex(&log.data),
                    "transactionHash": log.transaction_hash,
                    "logIndex": format!("{:#x}", log.log_index),
                    "removed": false,
                },
            })
        })
        .collect();

    json!({
        "webhookId": "wh_integration",
        "id": "whevt_activity",
        "createdAt": CREATED_AT,
        "type": "ADDRESS_ACTIVITY",
        "event": { "network": "ETH_MAINNET", "activity": activity }
    })
    .to_string()
    .into_bytes()
}
