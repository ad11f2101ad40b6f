use std::collections::HashSet;
use tracing::trace;

use shared_types::{Address, NormalizedLogEntry, OnChainContentId, PurchaseId};

use super::abi::{
    data_word, word_to_address, word_to_bool, word_to_u256, word_to_u64, WordError, WORD,
};
use super::errors::DecodeError;
use super::events::DomainEvent;
use super::registry::{lookup, EventKind};

/// Stateless log decoder with an optional emitter allowlist.
#[derive(Debug, Clone, Default)]
pub struct EventDecoder {
    allowed_contracts: Option<HashSet<Address>>,
}

impl EventDecoder {
    /// Decodes logs from any emitter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only decodes logs emitted by one of `contracts`. An empty list means
    /// no restriction.
    #[must_use]
    pub fn with_allowed_contracts(contracts: impl IntoIterator<Item = Address>) -> Self {
        let set: HashSet<Address> = contracts.into_iter().collect();
        Self {
            allowed_contracts: (!set.is_empty()).then_some(set),
        }
    }

    /// `Ok(None)` for logs this system does not act on.
    pub fn decode(&self, log: &NormalizedLogEntry) -> Result<Option<DomainEvent>, DecodeError> {
        if let Some(allowed) = &self.allowed_contracts {
            if !allowed.contains(&log.contract_address) {
                trace!(contract = %log.contract_address, "log from foreign emitter ignored");
                return Ok(None);
            }
        }

        let Some(kind) = log.topics.first().and_then(lookup) else {
            return Ok(None);
        };

        let fields = LogFields::check(kind, log)?;

        let event = match kind {
            EventKind::MemberJoined => DomainEvent::AccountRegistered {
                wallet: fields.topic_address(1, "wallet")?,
                external_id: fields.topic_u256(2),
                joined_at: fields.data_u64(0, "joinedAt")?,
            },
            EventKind::PassMinted => DomainEvent::AccountPassMinted {
                wallet: fields.topic_address(1, "wallet")?,
                external_id: fields.topic_u256(2),
                is_admin_mint: fields.data_bool(0, "isAdminMint")?,
            },
            EventKind::BlacklistUpdated => DomainEvent::AccessRevocationChanged {
                wallet: fields.topic_address(1, "wallet")?,
                revoked: fields.data_bool(0, "revoked")?,
            },
            EventKind::ContentPurchased => DomainEvent::ContentPurchased {
                buyer: fields.topic_address(1, "buyer")?,
                seller: fields.topic_address(2, "seller")?,
                on_chain_content_id: OnChainContentId::new(*log.topics[3].as_bytes()),
                price: fields.data_u256(0),
                purchase_id: PurchaseId(fields.data_u256(1)),
                tx_hash: log.transaction_hash,
                log_index: log.log_index,
                block_timestamp: log.block_timestamp,
            },
        };

        Ok(Some(event))
    }
}

/// A log whose shape has been checked against its registry entry, so word
/// accessors index in bounds.
struct LogFields<'a> {
    kind: EventKind,
    log: &'a NormalizedLogEntry,
}

impl<'a> LogFields<'a> {
    fn check(kind: EventKind, log: &'a NormalizedLogEntry) -> Result<Self, DecodeError> {
        let expected = kind.indexed() + 1;
        if log.topics.len() != expected {
            return Err(DecodeError::TopicCount {
                event: kind,
                expected,
                actual: log.topics.len(),
            });
        }

        let required = kind.data_words() * WORD;
        if log.data.len() < required {
            return Err(DecodeError::DataTooShort {
                event: kind,
                required,
                actual: log.data.len(),
            });
        }

        Ok(Self { kind, log })
    }

    fn word(&self, index: usize) -> &[u8; WORD] {
        // Length checked in `check`.
        data_word(&self.log.data, index).unwrap_or(&[0u8; WORD])
    }

    fn reject(&self, field: &'static str, err: WordError) -> DecodeError {
        match err {
            WordError::DirtyAddress => DecodeError::InvalidAddress { event: self.kind, field },
            WordError::NotBool => DecodeError::InvalidBool { event: self.kind, field },
            WordError::Overflow => DecodeError::Overflow { event: self.kind, field },
        }
    }

    fn topic_address(&self, index: usize, field: &'static str) -> Result<Address, DecodeError> {
        word_to_address(self.log.topics[index].as_bytes()).map_err(|e| self.reject(field, e))
    }

    fn topic_u256(&self, index: usize) -> shared_types::U256 {
        word_to_u256(self.log.topics[index].as_bytes())
    }

    fn data_u256(&self, index: usize) -> shared_types::U256 {
        word_to_u256(self.word(index))
    }

    fn data_u64(&self, index: usize, field: &'static str) -> Result<u64, DecodeError> {
        word_to_u64(self.word(index)).map_err(|e| self.reject(field, e))
    }

    fn data_bool(&self, index: usize, field: &'static str) -> Result<bool, DecodeError> {
        word_to_bool(self.word(index)).map_err(|e| self.reject(field, e))
    }
}
