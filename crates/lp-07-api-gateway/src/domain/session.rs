//! Buyer authentication.
//!
//! Sessions are issued by a separate service. This crate only needs the
//! authenticated wallet, so the seam is the [`SessionResolver`] trait.

use std::sync::Arc;
use thiserror::Error;

use shared_types::{
    decode_hex, sign_message_hex, validate_hmac_signature, Address, TimeSource, Timestamp,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("missing bearer token")]
    Missing,
    #[error("malformed session token")]
    Malformed,
    #[error("session signature invalid")]
    BadSignature,
    #[error("session expired")]
    Expired,
}

/// Maps a bearer token to the wallet it authenticates.
pub trait SessionResolver: Send + Sync {
    fn resolve(&self, token: &str) -> Result<Address, SessionError>;
}

/// Verifies `<wallet hex>.<expiry>.<hex HMAC-SHA256 of "wallet.expiry">`
/// tokens signed with the secret shared with the session service.
pub struct SignedSessionVerifier {
    secret: Vec<u8>,
    clock: Arc<dyn TimeSource>,
}

impl SignedSessionVerifier {
    pub fn new(secret: impl Into<Vec<u8>>, clock: Arc<dyn TimeSource>) -> Self {
        Self {
            secret: secret.into(),
            clock,
        }
    }

    /// Mints a token the way the session service does.
    #[must_use]
    pub fn issue(&self, wallet: &Address, expires_at: Timestamp) -> String {
        let claims = format!("{}.{}", wallet.to_hex(), expires_at);
        let tag = sign_message_hex(claims.as_bytes(), &self.secret);
        format!("{claims}.{tag}")
    }
}

impl SessionResolver for SignedSessionVerifier {
    fn resolve(&self, token: &str) -> Result<Address, SessionError> {
        if self.secret.is_empty() {
            return Err(SessionError::BadSignature);
        }

        let (claims, tag_hex) = token.trim().rsplit_once('.').ok_or(SessionError::Malformed)?;
        let (wallet_hex, expiry) = claims.split_once('.').ok_or(SessionError::Malformed)?;

        let tag = decode_hex(tag_hex).map_err(|_| SessionError::Malformed)?;
        if !validate_hmac_signature(claims.as_bytes(), &tag, &self.secret) {
            return Err(SessionError::BadSignature);
        }

        let expires_at: Timestamp = expiry.parse().map_err(|_| SessionError::Malformed)?;
        if self.clock.now() >= expires_at {
            return Err(SessionError::Expired);
        }

        Address::from_hex(wallet_hex).map_err(|_| SessionError::Malformed)
    }
}

impl std::fmt::Debug for SignedSessionVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedSessionVerifier").finish_non_exhaustive()
    }
}
