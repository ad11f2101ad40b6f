//! # Core Domain Entities
//!
//! Value objects and projected entities shared by every subsystem.
//!
//! ## Clusters
//!
//! - **Ledger primitives**: `Address`, `Hash`, `OnChainContentId`, `PurchaseId`
//! - **Off-chain identifiers**: `ContentId`
//! - **Transient delivery data**: `NormalizedLogEntry`
//! - **Projected state**: `AccountProfile`, `ContentListing`, `PurchaseReceipt`, `Dispute`

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::HexError;

// Re-export U256 from primitive-types for use across all subsystems
pub use primitive_types::U256;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

// =============================================================================
// HEX HELPERS
// =============================================================================

/// Decodes a `0x`-prefixed (or bare) hex string into exactly `N` bytes.
pub fn decode_fixed_hex<const N: usize>(input: &str) -> Result<[u8; N], HexError> {
    let bytes = decode_hex(input)?;
    if bytes.len() != N {
        return Err(HexError::InvalidLength {
            expected: N,
            actual: bytes.len(),
        });
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Decodes a `0x`-prefixed (or bare) hex string of any even length.
pub fn decode_hex(input: &str) -> Result<Vec<u8>, HexError> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(digits).map_err(|e| HexError::InvalidHex(e.to_string()))
}

/// Encodes bytes as lowercase `0x`-prefixed hex.
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

macro_rules! hex_newtype {
    ($name:ident, $len:expr) => {
        impl $name {
            /// Byte length of this value.
            pub const LEN: usize = $len;

            /// Creates the value from a raw byte array.
            #[must_use]
            pub const fn new(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// Parses a `0x`-prefixed hex string. Case-insensitive.
            pub fn from_hex(input: &str) -> Result<Self, HexError> {
                decode_fixed_hex::<$len>(input).map(Self)
            }

            /// Returns the underlying bytes.
            #[must_use]
            pub const fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Lowercase `0x`-prefixed hex rendering.
            #[must_use]
            pub fn to_hex(&self) -> String {
                encode_hex(&self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = HexError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_hex(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

// =============================================================================
// LEDGER PRIMITIVES
// =============================================================================

/// A 20-byte ledger account address (wallet or contract).
///
/// Hex input is accepted in any case; rendering is always lowercase, so two
/// spellings of the same wallet compare equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

hex_newtype!(Address, 20);

impl Address {
    /// The zero address.
    pub const ZERO: Self = Self([0u8; 20]);
}

/// A 32-byte hash (transaction hash, event-signature topic).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash(pub [u8; 32]);

hex_newtype!(Hash, 32);

impl Hash {
    /// The zero hash.
    pub const ZERO: Self = Self([0u8; 32]);
}

/// The 32-byte ledger image of a [`ContentId`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct OnChainContentId(pub [u8; 32]);

hex_newtype!(OnChainContentId, 32);

/// Ledger-assigned purchase identifier (uint256 on chain).
///
/// Serialized as a decimal string so it survives JSON consumers that cannot
/// hold 256-bit integers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PurchaseId(pub U256);

impl PurchaseId {
    /// Parses a decimal string.
    pub fn from_dec_str(input: &str) -> Result<Self, HexError> {
        U256::from_dec_str(input.trim())
            .map(Self)
            .map_err(|e| HexError::InvalidNumber(format!("{e:?}")))
    }
}

impl From<u64> for PurchaseId {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl fmt::Debug for PurchaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PurchaseId({})", self.0)
    }
}

impl fmt::Display for PurchaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for PurchaseId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for PurchaseId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_dec_str(&s).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// OFF-CHAIN IDENTIFIERS
// =============================================================================

/// Internal 128-bit content identifier, rendered as a hyphenated UUID.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(pub Uuid);

impl ContentId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Builds an identifier from its 16 raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// The 16 raw bytes in network order.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({})", self.0.hyphenated())
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ContentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

// =============================================================================
// TRANSIENT DELIVERY DATA
// =============================================================================

/// One ledger log as delivered by the webhook notifier, after the envelope
/// shape has been normalized away. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedLogEntry {
    /// Emitting contract.
    pub contract_address: Address,
    /// `topics[0]` is the event-signature hash; the rest are indexed params.
    pub topics: Vec<Hash>,
    /// ABI-encoded non-indexed params.
    pub data: Vec<u8>,
    pub transaction_hash: Hash,
    pub log_index: u64,
    pub block_number: Option<u64>,
    /// Only the block-shaped envelope carries this.
    pub block_timestamp: Option<Timestamp>,
}

// =============================================================================
// PROJECTED STATE
// =============================================================================

/// How an account profile first came into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileOrigin {
    /// Normal signup (`MemberJoined`).
    Registration,
    /// Administrative mint that bypassed signup.
    AdminMint,
    /// Placeholder created because another event referenced the wallet first.
    StandIn,
}

/// Off-chain profile of a ledger wallet.
///
/// Never deleted. The wallet is the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub wallet: Address,
    /// Ledger membership token id; `None` only for stand-ins.
    pub external_id: Option<U256>,
    pub revoked: bool,
    pub sales_count: u64,
    pub purchase_count: u64,
    pub origin: ProfileOrigin,
    pub joined_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AccountProfile {
    /// Profile created by a normal registration.
    #[must_use]
    pub fn registered(
        wallet: Address,
        external_id: U256,
        joined_at: Timestamp,
        now: Timestamp,
    ) -> Self {
        Self {
            wallet,
            external_id: Some(external_id),
            revoked: false,
            sales_count: 0,
            purchase_count: 0,
            origin: ProfileOrigin::Registration,
            joined_at: Some(joined_at),
            created_at: now,
            updated_at: now,
        }
    }

    /// Profile created by an administrative mint.
    #[must_use]
    pub fn admin_minted(wallet: Address, external_id: U256, now: Timestamp) -> Self {
        Self {
            wallet,
            external_id: Some(external_id),
            revoked: false,
            sales_count: 0,
            purchase_count: 0,
            origin: ProfileOrigin::AdminMint,
            joined_at: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    /// Minimal placeholder for a wallet seen before its registration.
    #[must_use]
    pub fn stand_in(wallet: Address, now: Timestamp) -> Self {
        Self {
            wallet,
            external_id: None,
            revoked: false,
            sales_count: 0,
            purchase_count: 0,
            origin: ProfileOrigin::StandIn,
            joined_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A paid-content listing. Authoring fields belong to the listing service;
/// only `sales_count` is written by the projector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentListing {
    pub content_id: ContentId,
    pub on_chain_content_id: OnChainContentId,
    pub seller: Address,
    pub price: U256,
    pub active: bool,
    pub expires_at: Option<Timestamp>,
    pub sales_count: u64,
    /// Created from a purchase log before the listing service authored it.
    pub is_stand_in: bool,
}

impl ContentListing {
    /// Minimal placeholder for a listing referenced by a purchase log.
    ///
    /// Inactive until authored, so the eligibility gate never admits it.
    #[must_use]
    pub fn stand_in(
        content_id: ContentId,
        on_chain_content_id: OnChainContentId,
        seller: Address,
    ) -> Self {
        Self {
            content_id,
            on_chain_content_id,
            seller,
            price: U256::zero(),
            active: false,
            expires_at: None,
            sales_count: 0,
            is_stand_in: true,
        }
    }

    /// Active and not past its expiry.
    #[must_use]
    pub fn is_available_at(&self, now: Timestamp) -> bool {
        self.active && self.expires_at.map_or(true, |expiry| now < expiry)
    }
}

/// Proof that a purchase transaction was observed and applied. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub purchase_id: PurchaseId,
    pub content_id: ContentId,
    pub on_chain_content_id: OnChainContentId,
    pub buyer: Address,
    pub seller: Address,
    pub price: U256,
    pub tx_hash: Hash,
    pub log_index: u64,
    pub purchased_at: Timestamp,
}

/// Dispute lifecycle, owned by the moderation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisputeStatus {
    Pending,
    Contacted,
    Resolved,
}

impl DisputeStatus {
    /// Pending or contacted.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Contacted)
    }
}

/// A moderation dispute against a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispute {
    pub id: Uuid,
    pub wallet: Address,
    pub status: DisputeStatus,
    pub reason: String,
    pub opened_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Dispute {
    /// A freshly opened dispute.
    #[must_use]
    pub fn open(wallet: Address, reason: impl Into<String>, now: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            wallet,
            status: DisputeStatus::Pending,
            reason: reason.into(),
            opened_at: now,
            updated_at: now,
        }
    }
}
