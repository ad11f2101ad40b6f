use std::sync::Arc;
use tracing::{debug, warn};

use shared_types::{decode_hex, validate_hmac_signature, TimeSource, Timestamp};

use super::config::GuardConfig;
use super::errors::{AuthFailure, IngressError};

/// Oldest accepted delivery: 5 minutes.
pub const MAX_EVENT_AGE_SECS: u64 = 5 * 60;

/// Optional prefix some notifiers put in front of the hex signature.
const SIGNATURE_PREFIX: &str = "sha256=";

/// Authenticates and time-bounds a delivery. Pure validation.
pub struct SignatureGuard {
    config: GuardConfig,
    clock: Arc<dyn TimeSource>,
    bypass: bool,
}

impl SignatureGuard {
    pub fn new(config: GuardConfig, clock: Arc<dyn TimeSource>) -> Self {
        let bypass = config.skip_verification && !config.environment.is_production();

        if config.skip_verification && config.environment.is_production() {
            warn!("signature verification bypass requested in production; ignoring it");
        } else if bypass {
            warn!(
                environment = %config.environment,
                "webhook signature verification is DISABLED"
            );
        }

        Self {
            config,
            clock,
            bypass,
        }
    }

    /// True when signatures are not checked (never in production).
    #[must_use]
    pub fn bypasses_signatures(&self) -> bool {
        self.bypass
    }

    /// Checks the signature, then freshness.
    ///
    /// # Errors
    ///
    /// - `IngressError::Authentication`: missing, malformed or wrong signature
    /// - `IngressError::StaleEvent`: `now - claimed_timestamp` exceeds
    ///   [`MAX_EVENT_AGE_SECS`]
    pub fn verify(
        &self,
        body: &[u8],
        signature: Option<&str>,
        claimed_timestamp: Timestamp,
    ) -> Result<(), IngressError> {
        self.authenticate(body, signature)?;
        self.check_freshness(claimed_timestamp)
    }

    /// Signature half of [`verify`](Self::verify), for callers that only
    /// learn the claimed timestamp after the body is trusted.
    pub fn authenticate(&self, body: &[u8], signature: Option<&str>) -> Result<(), IngressError> {
        if self.bypass {
            debug!("signature check skipped");
            return Ok(());
        }
        self.check_signature(body, signature).inspect_err(|e| {
            if let IngressError::Authentication(reason) = e {
                warn!(reason = reason.as_str(), "webhook rejected");
            }
        })
    }

    fn check_signature(&self, body: &[u8], signature: Option<&str>) -> Result<(), IngressError> {
        if self.config.secret.is_empty() {
            return Err(IngressError::Authentication(AuthFailure::NoSecretConfigured));
        }

        let token = signature
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(IngressError::Authentication(AuthFailure::MissingSignature))?;
        let token = token.strip_prefix(SIGNATURE_PREFIX).unwrap_or(token);

        let tag = decode_hex(token)
            .map_err(|_| IngressError::Authentication(AuthFailure::MalformedSignature))?;

        if validate_hmac_signature(body, &tag, &self.config.secret) {
            Ok(())
        } else {
            Err(IngressError::Authentication(AuthFailure::SignatureMismatch))
        }
    }

    /// Freshness half of [`verify`](Self::verify).
    pub fn check_freshness(&self, claimed: Timestamp) -> Result<(), IngressError> {
        let age_secs = self.clock.now().saturating_sub(claimed);
        if age_secs > MAX_EVENT_AGE_SECS {
            warn!(
                reason = "stale_timestamp",
                claimed,
                age_secs,
                "webhook rejected"
            );
            return Err(IngressError::StaleEvent {
                claimed,
                age_secs,
                max_age_secs: MAX_EVENT_AGE_SECS,
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for SignatureGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureGuard")
            .field("config", &self.config)
            .field("bypass", &self.bypass)
            .finish_non_exhaustive()
    }
}
