//! API gateway service: wiring, router, and handlers.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap},
    routing::{get, post},
    Json, Router,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{info, warn};

use lp_01_content_codec::parse_content_id;
use lp_02_idempotency_ledger::{IdempotencyLedger, ProcessedEventStore};
use lp_03_event_decoder::EventDecoder;
use lp_04_webhook_ingress::{SignatureGuard, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use lp_05_domain_projector::DomainProjector;
use lp_06_eligibility_gate::{PurchaseEligibilityGate, PurchaseIdentifier};
use shared_types::{Address, ProjectionStore, PurchaseId, PurchaseReceipt, TimeSource};

use crate::domain::config::GatewayConfig;
use crate::domain::error::{codes, ApiError, ApiResult, GatewayError};
use crate::domain::pipeline::{DeliveryReport, IngestionPipeline, WebhookRequest};
use crate::domain::session::{SessionError, SessionResolver, SignedSessionVerifier};
use crate::middleware::IngestMetrics;

/// Storage and clock handles supplied by the runtime.
#[derive(Clone)]
pub struct GatewayDeps {
    pub store: Arc<dyn ProjectionStore>,
    pub processed_events: Arc<dyn ProcessedEventStore>,
    pub clock: Arc<dyn TimeSource>,
}

pub struct ApiGatewayService {
    config: GatewayConfig,
    state: AppState,
}

impl ApiGatewayService {
    pub fn new(config: GatewayConfig, deps: GatewayDeps) -> Result<Self, GatewayError> {
        config.validate()?;

        let metrics = Arc::new(IngestMetrics::new());
        let sessions: Arc<dyn SessionResolver> = Arc::new(SignedSessionVerifier::new(
            config.session_secret.clone(),
            Arc::clone(&deps.clock),
        ));

        let pipeline = IngestionPipeline::new(
            SignatureGuard::new(config.guard.clone(), Arc::clone(&deps.clock)),
            IdempotencyLedger::new(deps.processed_events, Arc::clone(&deps.clock)),
            EventDecoder::with_allowed_contracts(config.allowed_contracts.iter().copied()),
            DomainProjector::new(Arc::clone(&deps.store), Arc::clone(&deps.clock)),
            Arc::clone(&metrics),
        );

        let gate = PurchaseEligibilityGate::new(Arc::clone(&deps.store), deps.clock);

        Ok(Self {
            config,
            state: AppState {
                pipeline: Arc::new(pipeline),
                gate: Arc::new(gate),
                store: deps.store,
                sessions,
                metrics,
            },
        })
    }

    /// Replaces the session verifier, e.g. with a remote session service.
    #[must_use]
    pub fn with_session_resolver(mut self, sessions: Arc<dyn SessionResolver>) -> Self {
        self.state.sessions = sessions;
        self
    }

    pub fn metrics(&self) -> Arc<IngestMetrics> {
        Arc::clone(&self.state.metrics)
    }

    /// Handle for the periodic expiry sweep.
    pub fn ledger(&self) -> IdempotencyLedger {
        self.state.pipeline.ledger().clone()
    }

    pub fn router(&self) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(RequestBodyLimitLayer::new(self.config.http.max_body_bytes));

        Router::new()
            .route("/webhooks", post(handle_webhook))
            .route("/purchase-identifier/:content_id", get(purchase_identifier))
            .route("/receipts/:purchase_id", get(get_receipt))
            .route("/health", get(health_check))
            .route("/metrics", get(metrics))
            .layer(middleware)
            .with_state(self.state.clone())
    }

    /// Serves until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.router();
        info!(addr = ?listener.local_addr().ok(), "API gateway listening");
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("API gateway stopped");
        Ok(())
    }
}

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    pipeline: Arc<IngestionPipeline>,
    gate: Arc<PurchaseEligibilityGate>,
    store: Arc<dyn ProjectionStore>,
    sessions: Arc<dyn SessionResolver>,
    metrics: Arc<IngestMetrics>,
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> ApiResult<Address> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(SessionError::Missing)?;
    state.sessions.resolve(token).map_err(|e| {
        warn!(error = %e, "session rejected");
        ApiError::from(e)
    })
}

/// Runs storage-touching work off the reactor.
async fn blocking<T, F>(work: F) -> ApiResult<T>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::internal(format!("worker failed: {e}")))?
}

async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<DeliveryReport>> {
    let signature = header_str(&headers, SIGNATURE_HEADER);
    let timestamp = header_str(&headers, TIMESTAMP_HEADER);

    let report = blocking(move || {
        let request = WebhookRequest {
            body: &body,
            signature: signature.as_deref(),
            timestamp: timestamp.as_deref(),
        };
        state.pipeline.process(request).map_err(ApiError::from)
    })
    .await?;

    Ok(Json(report))
}

async fn purchase_identifier(
    State(state): State<AppState>,
    Path(content_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<PurchaseIdentifier>> {
    let buyer = authenticate(&state, &headers)?;
    let content_id = parse_content_id(&content_id)
        .map_err(|e| ApiError::bad_request(codes::INVALID_CONTENT_ID, e.to_string()))?;

    let identifier = blocking(move || {
        let result = state.gate.check(&buyer, &content_id);
        state.metrics.record_eligibility(result.as_ref().map(|_| ()));
        result.map_err(ApiError::from)
    })
    .await?;

    Ok(Json(identifier))
}

/// Receipts are visible to their buyer and seller only; anyone else gets 404.
async fn get_receipt(
    State(state): State<AppState>,
    Path(purchase_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<PurchaseReceipt>> {
    let wallet = authenticate(&state, &headers)?;
    let purchase_id = PurchaseId::from_dec_str(&purchase_id)
        .map_err(|e| ApiError::bad_request(codes::INVALID_PURCHASE_ID, e.to_string()))?;

    let receipt = blocking(move || {
        state
            .store
            .get_receipt(&purchase_id)
            .map_err(|e| ApiError::storage_unavailable(e.to_string()))
    })
    .await?
    .filter(|r| r.buyer == wallet || r.seller == wallet)
    .ok_or_else(|| ApiError::not_found(format!("receipt {purchase_id} not found")))?;

    Ok(Json(receipt))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn metrics(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(state.metrics.to_json())
}
