//! The per-delivery ingestion pipeline:
//!
//! ```text
//! Guard → Normalizer → per log: admit → decode → project
//! ```
//!
//! Runs synchronously; the HTTP handler moves it onto the blocking pool.

use serde::Serialize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, info_span, warn};
use uuid::Uuid;

use lp_02_idempotency_ledger::{Admission, EventId, IdempotencyLedger, LedgerError};
use lp_03_event_decoder::EventDecoder;
use lp_04_webhook_ingress::{
    claimed_timestamp, into_log_entries, parse_envelope, IngressError, SignatureGuard,
};
use lp_05_domain_projector::{DomainProjector, ProjectionError};
use shared_types::{NormalizedLogEntry, StoreError};

use crate::middleware::IngestMetrics;

/// What happened to each log of an accepted delivery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    pub received: usize,
    pub applied: usize,
    /// Valid events that changed nothing (already projected).
    pub no_ops: usize,
    pub duplicates: usize,
    /// Unrecognised topics and foreign emitters.
    pub ignored: usize,
    pub decode_failures: usize,
    /// Logs whose stored state could not be read back. They stay admitted
    /// and are not retried.
    pub failed: usize,
}

/// Failures that reject the whole delivery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error(transparent)]
    Ingress(#[from] IngressError),

    /// Storage failed mid-delivery. Logs applied before the failure stay
    /// applied; a retryable failure released the failing log's idempotency
    /// record.
    #[error("storage failure: {0}")]
    Storage(StoreError),
}

impl From<LedgerError> for DeliveryError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Storage(e) => Self::Storage(e),
        }
    }
}

/// Raw request pieces the pipeline needs.
#[derive(Debug, Clone, Copy)]
pub struct WebhookRequest<'a> {
    pub body: &'a [u8],
    pub signature: Option<&'a str>,
    pub timestamp: Option<&'a str>,
}

pub struct IngestionPipeline {
    guard: SignatureGuard,
    ledger: IdempotencyLedger,
    decoder: EventDecoder,
    projector: DomainProjector,
    metrics: Arc<IngestMetrics>,
}

impl IngestionPipeline {
    pub fn new(
        guard: SignatureGuard,
        ledger: IdempotencyLedger,
        decoder: EventDecoder,
        projector: DomainProjector,
        metrics: Arc<IngestMetrics>,
    ) -> Self {
        Self {
            guard,
            ledger,
            decoder,
            projector,
            metrics,
        }
    }

    pub fn ledger(&self) -> &IdempotencyLedger {
        &self.ledger
    }

    /// Processes one webhook delivery end to end.
    pub fn process(&self, request: WebhookRequest<'_>) -> Result<DeliveryReport, DeliveryError> {
        let delivery_id = Uuid::new_v4();
        let span = info_span!("webhook_delivery", %delivery_id);
        let _entered = span.enter();

        let logs = match self.authenticate_and_normalize(request) {
            Ok(logs) => logs,
            Err(err) => {
                self.metrics.record_rejection(&err);
                return Err(err.into());
            }
        };

        let mut report = DeliveryReport {
            received: logs.len(),
            ..DeliveryReport::default()
        };
        self.metrics
            .logs_received
            .fetch_add(logs.len() as u64, Ordering::Relaxed);

        for log in &logs {
            if let Err(err) = self.process_log(log, &mut report) {
                self.metrics
                    .deliveries_failed_storage
                    .fetch_add(1, Ordering::Relaxed);
                error!(error = %err, ?report, "delivery aborted, awaiting redelivery");
                return Err(err);
            }
        }

        self.metrics
            .deliveries_accepted
            .fetch_add(1, Ordering::Relaxed);
        info!(
            received = report.received,
            applied = report.applied,
            duplicates = report.duplicates,
            ignored = report.ignored,
            decode_failures = report.decode_failures,
            failed = report.failed,
            "delivery processed"
        );
        Ok(report)
    }

    fn authenticate_and_normalize(
        &self,
        request: WebhookRequest<'_>,
    ) -> Result<Vec<NormalizedLogEntry>, IngressError> {
        self.guard.authenticate(request.body, request.signature)?;
        let claimed = claimed_timestamp(request.timestamp, request.body)?;
        self.guard.check_freshness(claimed)?;

        let envelope = parse_envelope(request.body).inspect_err(|e| {
            warn!(reason = "invalid_envelope", error = %e, "webhook rejected");
        })?;
        info!(
            shape = envelope.shape(),
            webhook_id = envelope.webhook_id(),
            "delivery authenticated"
        );
        Ok(into_log_entries(envelope))
    }

    fn process_log(
        &self,
        log: &NormalizedLogEntry,
        report: &mut DeliveryReport,
    ) -> Result<(), DeliveryError> {
        let event_id = EventId::new(&log.transaction_hash, log.log_index);

        if self.ledger.admit(&event_id)? == Admission::AlreadySeen {
            report.duplicates += 1;
            self.metrics.logs_duplicate.fetch_add(1, Ordering::Relaxed);
            return Ok(());
        }

        let event = match self.decoder.decode(log) {
            Ok(Some(event)) => event,
            Ok(None) => {
                report.ignored += 1;
                self.metrics.logs_ignored.fetch_add(1, Ordering::Relaxed);
                return Ok(());
            }
            Err(err) => {
                warn!(%event_id, error = %err, "undecodable log skipped");
                report.decode_failures += 1;
                self.metrics.logs_decode_failed.fetch_add(1, Ordering::Relaxed);
                return Ok(());
            }
        };

        match self.projector.apply(&event) {
            Ok(outcome) if outcome.is_applied() => {
                report.applied += 1;
                self.metrics.logs_applied.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Ok(_) => {
                report.no_ops += 1;
                self.metrics.logs_no_op.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(ProjectionError::ContentId(err)) => {
                warn!(%event_id, event = event.name(), error = %err, "undecodable log skipped");
                report.decode_failures += 1;
                self.metrics.logs_decode_failed.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(ProjectionError::Storage(err)) if err.is_retryable() => {
                // Let the redelivery reprocess this log.
                if let Err(release_err) = self.ledger.release(&event_id) {
                    error!(%event_id, error = %release_err, "failed to release idempotency record");
                }
                Err(DeliveryError::Storage(err))
            }
            Err(ProjectionError::Storage(err)) => {
                error!(%event_id, event = event.name(), error = %err, "log not projected");
                report.failed += 1;
                self.metrics.logs_failed.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for IngestionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionPipeline")
            .field("guard", &self.guard)
            .field("decoder", &self.decoder)
            .finish_non_exhaustive()
    }
}
