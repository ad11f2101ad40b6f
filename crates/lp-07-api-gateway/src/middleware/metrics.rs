//! Ingestion and eligibility counters, exported as JSON at `/metrics`.

use std::sync::atomic::{AtomicU64, Ordering};

use lp_04_webhook_ingress::IngressError;
use lp_06_eligibility_gate::EligibilityError;

#[derive(Debug, Default)]
pub struct IngestMetrics {
    // Delivery outcomes
    pub deliveries_accepted: AtomicU64,
    pub deliveries_rejected_auth: AtomicU64,
    pub deliveries_rejected_stale: AtomicU64,
    pub deliveries_rejected_invalid: AtomicU64,
    pub deliveries_failed_storage: AtomicU64,

    // Per-log outcomes
    pub logs_received: AtomicU64,
    pub logs_applied: AtomicU64,
    pub logs_no_op: AtomicU64,
    pub logs_duplicate: AtomicU64,
    pub logs_ignored: AtomicU64,
    pub logs_decode_failed: AtomicU64,
    pub logs_failed: AtomicU64,

    // Eligibility
    pub eligibility_granted: AtomicU64,
    pub eligibility_not_found: AtomicU64,
    pub eligibility_unavailable: AtomicU64,
    pub eligibility_self_purchase: AtomicU64,
    pub eligibility_seller_revoked: AtomicU64,
    pub eligibility_storage_errors: AtomicU64,
}

impl IngestMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_rejection(&self, error: &IngressError) {
        let counter = match error {
            IngressError::Authentication(_) => &self.deliveries_rejected_auth,
            IngressError::StaleEvent { .. } => &self.deliveries_rejected_stale,
            IngressError::Validation(_) => &self.deliveries_rejected_invalid,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_eligibility(&self, result: Result<(), &EligibilityError>) {
        let counter = match result {
            Ok(()) => &self.eligibility_granted,
            Err(EligibilityError::NotFound(_)) => &self.eligibility_not_found,
            Err(EligibilityError::Unavailable(_)) => &self.eligibility_unavailable,
            Err(EligibilityError::SelfPurchaseForbidden) => &self.eligibility_self_purchase,
            Err(EligibilityError::SellerRevoked) => &self.eligibility_seller_revoked,
            Err(EligibilityError::Storage(_)) => &self.eligibility_storage_errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn to_json(&self) -> serde_json::Value {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);
        serde_json::json!({
            "deliveries": {
                "accepted": load(&self.deliveries_accepted),
                "rejected_auth": load(&self.deliveries_rejected_auth),
                "rejected_stale": load(&self.deliveries_rejected_stale),
                "rejected_invalid": load(&self.deliveries_rejected_invalid),
                "failed_storage": load(&self.deliveries_failed_storage),
            },
            "logs": {
                "received": load(&self.logs_received),
                "applied": load(&self.logs_applied),
                "no_op": load(&self.logs_no_op),
                "duplicate": load(&self.logs_duplicate),
                "ignored": load(&self.logs_ignored),
                "decode_failed": load(&self.logs_decode_failed),
                "failed": load(&self.logs_failed),
            },
            "eligibility": {
                "granted": load(&self.eligibility_granted),
                "not_found": load(&self.eligibility_not_found),
                "unavailable": load(&self.eligibility_unavailable),
                "self_purchase_forbidden": load(&self.eligibility_self_purchase),
                "seller_revoked": load(&self.eligibility_seller_revoked),
                "storage_errors": load(&self.eligibility_storage_errors),
            }
        })
    }
}
