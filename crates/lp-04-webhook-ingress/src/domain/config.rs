//! Guard configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    Staging,
    #[default]
    Development,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" | "dev" => Ok(Self::Development),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Production => "production",
            Self::Staging => "staging",
            Self::Development => "development",
        })
    }
}

/// Explicit inputs of the [`SignatureGuard`](super::SignatureGuard).
#[derive(Clone, Default)]
pub struct GuardConfig {
    /// Shared HMAC secret. Empty means "not configured" and fails every
    /// signature check.
    pub secret: Vec<u8>,
    pub environment: Environment,
    /// Development bypass. Ignored in production.
    pub skip_verification: bool,
}

impl GuardConfig {
    pub fn new(secret: impl Into<Vec<u8>>, environment: Environment) -> Self {
        Self {
            secret: secret.into(),
            environment,
            skip_verification: false,
        }
    }

    #[must_use]
    pub fn with_skip_verification(mut self, skip: bool) -> Self {
        self.skip_verification = skip;
        self
    }
}

impl fmt::Debug for GuardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardConfig")
            .field("secret", &"<redacted>")
            .field("environment", &self.environment)
            .field("skip_verification", &self.skip_verification)
            .finish()
    }
}
