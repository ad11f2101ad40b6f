//! Wire shapes of the two webhook envelopes.
//!
//! Both are internally tagged on `type`. Unknown fields are ignored so the
//! notifier can add fields without breaking ingestion.

use serde::de::{self, Deserializer};
use serde::Deserialize;

use shared_types::{decode_hex, Address, Hash};

/// A delivery, discriminated by its `type` tag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum WebhookEnvelope {
    /// Flat activity list.
    #[serde(rename = "ADDRESS_ACTIVITY")]
    AddressActivity(ActivityEnvelope),
    /// Block with its logs, as selected by a custom query.
    #[serde(rename = "GRAPHQL")]
    Graphql(BlockEnvelope),
}

impl WebhookEnvelope {
    /// Stable label for logs.
    #[must_use]
    pub fn shape(&self) -> &'static str {
        match self {
            Self::AddressActivity(_) => "address_activity",
            Self::Graphql(_) => "graphql",
        }
    }

    #[must_use]
    pub fn webhook_id(&self) -> Option<&str> {
        match self {
            Self::AddressActivity(e) => e.webhook_id.as_deref(),
            Self::Graphql(e) => e.webhook_id.as_deref(),
        }
    }
}

// -----------------------------------------------------------------------------
// ADDRESS_ACTIVITY
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEnvelope {
    #[serde(default)]
    pub webhook_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    pub event: ActivityEvent,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    #[serde(default)]
    pub network: Option<String>,
    pub activity: Vec<Activity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(default)]
    pub block_num: Option<Quantity>,
    /// Absent for plain value transfers.
    #[serde(default)]
    pub log: Option<ActivityLog>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub address: Address,
    pub topics: Vec<Hash>,
    pub data: HexBytes,
    pub transaction_hash: Hash,
    pub log_index: Quantity,
    #[serde(default)]
    pub block_number: Option<Quantity>,
    /// Set when a chain reorganisation dropped the log.
    #[serde(default)]
    pub removed: bool,
}

// -----------------------------------------------------------------------------
// GRAPHQL
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockEnvelope {
    #[serde(default)]
    pub webhook_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    pub event: BlockEvent,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlockEvent {
    pub data: BlockData,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlockData {
    pub block: Block,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub number: Option<Quantity>,
    pub timestamp: Quantity,
    #[serde(default)]
    pub logs: Vec<BlockLog>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlockLog {
    pub account: Account,
    pub topics: Vec<Hash>,
    pub data: HexBytes,
    pub index: Quantity,
    pub transaction: TransactionRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Account {
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransactionRef {
    pub hash: Hash,
}

// -----------------------------------------------------------------------------
// SCALARS
// -----------------------------------------------------------------------------

/// Unsigned quantity: JSON number, decimal string, or `0x` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantity(pub u64);

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Self(n)),
            Raw::Text(s) => parse_quantity(&s).map(Self).map_err(de::Error::custom),
        }
    }
}

fn parse_quantity(input: &str) -> Result<u64, String> {
    let s = input.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(digits) => u64::from_str_radix(digits, 16),
        None => s.parse::<u64>(),
    };
    parsed.map_err(|e| format!("invalid quantity {input:?}: {e}"))
}

/// Arbitrary-length `0x` hex blob.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HexBytes(pub Vec<u8>);

impl<'de> Deserialize<'de> for HexBytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        decode_hex(&s).map(Self).map_err(de::Error::custom)
    }
}
