use sha3::{Digest, Keccak256};
use shared_types::Hash;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Registered ledger events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MemberJoined,
    PassMinted,
    BlacklistUpdated,
    ContentPurchased,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::MemberJoined,
        EventKind::PassMinted,
        EventKind::BlacklistUpdated,
        EventKind::ContentPurchased,
    ];

    /// Canonical signature, hashed to produce `topic0`.
    #[must_use]
    pub const fn signature(&self) -> &'static str {
        match self {
            Self::MemberJoined => "MemberJoined(address,uint256,uint256)",
            Self::PassMinted => "PassMinted(address,uint256,bool)",
            Self::BlacklistUpdated => "BlacklistUpdated(address,bool)",
            Self::ContentPurchased => "ContentPurchased(address,address,bytes32,uint256,uint256)",
        }
    }

    /// Indexed params, i.e. topics after `topic0`.
    #[must_use]
    pub const fn indexed(&self) -> usize {
        match self {
            Self::MemberJoined | Self::PassMinted => 2,
            Self::BlacklistUpdated => 1,
            Self::ContentPurchased => 3,
        }
    }

    /// 32-byte words required in `data`.
    #[must_use]
    pub const fn data_words(&self) -> usize {
        match self {
            Self::ContentPurchased => 2,
            _ => 1,
        }
    }

    #[must_use]
    pub fn topic0(&self) -> Hash {
        event_topic(self.signature())
    }
}

/// keccak-256 of a canonical event signature.
#[must_use]
pub fn event_topic(signature: &str) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(signature.as_bytes());
    Hash::new(hasher.finalize().into())
}

/// Known events keyed by `topic0`, hashed once on first use.
pub static EVENT_REGISTRY: LazyLock<HashMap<Hash, EventKind>> =
    LazyLock::new(|| EventKind::ALL.into_iter().map(|k| (k.topic0(), k)).collect());

/// Looks up a topic in the registry.
#[must_use]
pub fn lookup(topic0: &Hash) -> Option<EventKind> {
    EVENT_REGISTRY.get(topic0).copied()
}
