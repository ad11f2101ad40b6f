//! Inverse of the decoder: renders a [`DomainEvent`] as the log the ledger
//! would emit. Used to build deliveries for replay tooling and tests.

use shared_types::{Address, Hash, NormalizedLogEntry, Timestamp, U256};

use super::abi::{address_word, u256_word};
use super::events::DomainEvent;
use super::registry::EventKind;

/// Encodes `event` as a log emitted by `contract`.
///
/// For `ContentPurchased` the event's own `tx_hash`/`log_index` are ignored in
/// favour of the arguments, so one event value can be placed anywhere.
#[must_use]
pub fn encode_log(
    event: &DomainEvent,
    contract: Address,
    transaction_hash: Hash,
    log_index: u64,
    block_timestamp: Option<Timestamp>,
) -> NormalizedLogEntry {
    let (kind, indexed, words): (EventKind, Vec<Hash>, Vec<[u8; 32]>) = match event {
        DomainEvent::AccountRegistered {
            wallet,
            external_id,
            joined_at,
        } => (
            EventKind::MemberJoined,
            vec![address_word(wallet), Hash::new(u256_word(*external_id))],
            vec![u256_word(U256::from(*joined_at))],
        ),
        DomainEvent::AccountPassMinted {
            wallet,
            external_id,
            is_admin_mint,
        } => (
            EventKind::PassMinted,
            vec![address_word(wallet), Hash::new(u256_word(*external_id))],
            vec![bool_word(*is_admin_mint)],
        ),
        DomainEvent::AccessRevocationChanged { wallet, revoked } => (
            EventKind::BlacklistUpdated,
            vec![address_word(wallet)],
            vec![bool_word(*revoked)],
        ),
        DomainEvent::ContentPurchased {
            buyer,
            seller,
            on_chain_content_id,
            price,
            purchase_id,
            ..
        } => (
            EventKind::ContentPurchased,
            vec![
                address_word(buyer),
                address_word(seller),
                Hash::new(*on_chain_content_id.as_bytes()),
            ],
            vec![u256_word(*price), u256_word(purchase_id.0)],
        ),
    };

    let mut topics = Vec::with_capacity(indexed.len() + 1);
    topics.push(kind.topic0());
    topics.extend(indexed);

    NormalizedLogEntry {
        contract_address: contract,
        topics,
        data: words.concat(),
        transaction_hash,
        log_index,
        block_number: None,
        block_timestamp,
    }
}

fn bool_word(flag: bool) -> [u8; 32] {
    u256_word(if flag { U256::one() } else { U256::zero() })
}
