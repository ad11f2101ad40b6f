//! Gateway configuration with validation.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use lp_04_webhook_ingress::GuardConfig;
use shared_types::Address;

use super::error::GatewayError;

/// Default request body limit: 1 MiB.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
    pub max_body_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl HttpConfig {
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Everything the gateway needs besides its storage handles.
#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    pub http: HttpConfig,
    pub guard: GuardConfig,
    /// Secret shared with the session service.
    pub session_secret: Vec<u8>,
    /// Accepted log emitters. Empty accepts every emitter.
    pub allowed_contracts: Vec<Address>,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.http.max_body_bytes == 0 {
            return Err(GatewayError::Config("max_body_bytes cannot be 0".into()));
        }
        if self.guard.environment.is_production() {
            if self.guard.secret.is_empty() {
                return Err(GatewayError::Config(
                    "webhook secret is mandatory in production".into(),
                ));
            }
            if self.session_secret.is_empty() {
                return Err(GatewayError::Config(
                    "session secret is mandatory in production".into(),
                ));
            }
        }
        Ok(())
    }
}
