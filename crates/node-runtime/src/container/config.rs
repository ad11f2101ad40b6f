//! # Node Configuration
//!
//! Unified configuration for the runtime, loaded from `LP_*` environment
//! variables.
//!
//! ## Security Requirements
//!
//! - In production both the webhook secret and the session secret MUST be set
//! - All limits have sane defaults with override capability

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use thiserror::Error;

use lp_02_idempotency_ledger::DEFAULT_RETENTION_SECS;
use lp_04_webhook_ingress::{Environment, GuardConfig};
use lp_07_api_gateway::{GatewayConfig, HttpConfig, DEFAULT_MAX_BODY_BYTES};
use shared_types::Address;

/// Complete node configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// HTTP listener.
    pub server: ServerConfig,
    /// Secrets and environment.
    pub security: SecurityConfig,
    /// Webhook ingestion behaviour.
    pub ingest: IngestConfig,
    /// Storage backend selection.
    pub storage: StorageConfig,
}

impl NodeConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from any key lookup. Unset keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("LP_ENVIRONMENT") {
            config.security.environment = raw
                .parse()
                .map_err(|reason| ConfigError::invalid("LP_ENVIRONMENT", &raw, reason))?;
        }
        config.security.webhook_secret = lookup("LP_WEBHOOK_SECRET").filter(|s| !s.is_empty());
        config.security.session_secret = lookup("LP_SESSION_SECRET").filter(|s| !s.is_empty());
        if let Some(raw) = lookup("LP_SKIP_SIGNATURE_VERIFICATION") {
            config.security.skip_signature_verification =
                parse_bool("LP_SKIP_SIGNATURE_VERIFICATION", &raw)?;
        }

        if let Some(raw) = lookup("LP_HTTP_HOST") {
            config.server.host = parse("LP_HTTP_HOST", &raw)?;
        }
        if let Some(raw) = lookup("LP_HTTP_PORT") {
            config.server.port = parse("LP_HTTP_PORT", &raw)?;
        }
        if let Some(raw) = lookup("LP_MAX_BODY_BYTES") {
            config.server.max_body_bytes = parse("LP_MAX_BODY_BYTES", &raw)?;
        }

        if let Some(raw) = lookup("LP_CONTRACT_ADDRESSES") {
            config.ingest.contract_addresses = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| parse::<Address>("LP_CONTRACT_ADDRESSES", s))
                .collect::<Result<_, _>>()?;
        }
        if let Some(raw) = lookup("LP_EVENT_RETENTION_SECS") {
            config.ingest.event_retention_secs = parse("LP_EVENT_RETENTION_SECS", &raw)?;
        }
        if let Some(raw) = lookup("LP_PURGE_INTERVAL_SECS") {
            config.ingest.purge_interval_secs = parse("LP_PURGE_INTERVAL_SECS", &raw)?;
        }

        if let Some(raw) = lookup("LP_STORAGE_BACKEND") {
            config.storage.backend = raw
                .parse()
                .map_err(|reason| ConfigError::invalid("LP_STORAGE_BACKEND", &raw, reason))?;
        }
        if let Some(raw) = lookup("LP_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(raw);
        }

        if let Some(raw) = lookup("LP_LOG_FORMAT") {
            config.server.log_format = raw
                .parse()
                .map_err(|reason| ConfigError::invalid("LP_LOG_FORMAT", &raw, reason))?;
        }

        Ok(config)
    }

    /// Validate configuration for production readiness.
    ///
    /// # Returns
    ///
    /// Returns `Err` if the environment is production and either secret is
    /// missing, or if an interval is zero.
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        if self.security.environment.is_production() {
            if self.security.webhook_secret.is_none() {
                return Err(ConfigError::MissingSecret("LP_WEBHOOK_SECRET"));
            }
            if self.security.session_secret.is_none() {
                return Err(ConfigError::MissingSecret("LP_SESSION_SECRET"));
            }
        }
        if self.ingest.event_retention_secs == 0 {
            return Err(ConfigError::invalid("LP_EVENT_RETENTION_SECS", "0", "must be positive"));
        }
        if self.ingest.purge_interval_secs == 0 {
            return Err(ConfigError::invalid("LP_PURGE_INTERVAL_SECS", "0", "must be positive"));
        }
        Ok(())
    }

    /// The gateway's slice of this configuration.
    #[must_use]
    pub fn gateway_config(&self) -> GatewayConfig {
        let guard = GuardConfig::new(
            self.security.webhook_secret.clone().unwrap_or_default(),
            self.security.environment,
        )
        .with_skip_verification(self.security.skip_signature_verification);

        GatewayConfig {
            http: HttpConfig {
                host: self.server.host,
                port: self.server.port,
                max_body_bytes: self.server.max_body_bytes,
            },
            guard,
            session_secret: self
                .security
                .session_secret
                .clone()
                .unwrap_or_default()
                .into_bytes(),
            allowed_contracts: self.ingest.contract_addresses.clone(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A secret mandatory in production is not set.
    #[error("SECURITY VIOLATION: {0} must be set in production")]
    MissingSecret(&'static str),

    /// A variable could not be parsed.
    #[error("invalid {key}={value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            key,
            value: value.to_owned(),
            reason: reason.to_string(),
        }
    }
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: ToString,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::invalid(key, raw, e))
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(key, raw, "expected a boolean")),
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Request body limit in bytes.
    pub max_body_bytes: usize,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            log_format: LogFormat::default(),
        }
    }
}

/// Security configuration.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub environment: Environment,
    /// HMAC secret shared with the webhook notifier.
    /// MUST be set in production.
    pub webhook_secret: Option<String>,
    /// HMAC secret shared with the session service.
    /// MUST be set in production.
    pub session_secret: Option<String>,
    /// Development-only signature bypass. Ignored in production.
    pub skip_signature_verification: bool,
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |s: &Option<String>| s.as_ref().map(|_| "<redacted>");
        f.debug_struct("SecurityConfig")
            .field("environment", &self.environment)
            .field("webhook_secret", &redact(&self.webhook_secret))
            .field("session_secret", &redact(&self.session_secret))
            .field("skip_signature_verification", &self.skip_signature_verification)
            .finish()
    }
}

/// Webhook ingestion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Accepted log emitters. Empty accepts all.
    pub contract_addresses: Vec<Address>,
    /// Replay-suppression window for processed events.
    pub event_retention_secs: u64,
    /// How often expired processed-event records are swept.
    pub purge_interval_secs: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            contract_addresses: Vec::new(),
            event_retention_secs: DEFAULT_RETENTION_SECS,
            purge_interval_secs: 10 * 60,
        }
    }
}

/// Which store backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    RocksDb,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(Self::Memory),
            "rocksdb" => Ok(Self::RocksDb),
            other => Err(format!("unknown storage backend: {other}")),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Data directory for the RocksDB backend.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: PathBuf::from("./data"),
        }
    }
}
