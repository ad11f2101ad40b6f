use shared_types::Timestamp;
use thiserror::Error;

/// Why a delivery failed authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("signature header missing")]
    MissingSignature,
    #[error("signature is not hex")]
    MalformedSignature,
    #[error("signature does not match body")]
    SignatureMismatch,
    #[error("no webhook secret configured")]
    NoSecretConfigured,
}

impl AuthFailure {
    /// Stable label for logs and metrics.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingSignature => "missing_signature",
            Self::MalformedSignature => "malformed_signature",
            Self::SignatureMismatch => "signature_mismatch",
            Self::NoSecretConfigured => "no_secret_configured",
        }
    }
}

/// Errors that reject a whole delivery before any log is processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngressError {
    #[error("authentication failed: {0}")]
    Authentication(AuthFailure),

    #[error("stale event: claimed timestamp {claimed} is {age_secs}s old (limit {max_age_secs}s)")]
    StaleEvent {
        claimed: Timestamp,
        age_secs: u64,
        max_age_secs: u64,
    },

    #[error("invalid delivery: {0}")]
    Validation(String),
}
