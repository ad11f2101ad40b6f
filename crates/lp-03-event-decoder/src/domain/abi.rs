//! 32-byte ABI word readers.

use shared_types::{Address, Hash, U256};

/// Size of one ABI word.
pub const WORD: usize = 32;

/// Why a word was rejected. The decoder attaches the event and field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordError {
    DirtyAddress,
    NotBool,
    Overflow,
}

/// An `address` word: 12 zero bytes then the 20-byte address.
pub fn word_to_address(word: &[u8; WORD]) -> Result<Address, WordError> {
    if word[..12].iter().any(|b| *b != 0) {
        return Err(WordError::DirtyAddress);
    }
    let mut out = [0u8; 20];
    out.copy_from_slice(&word[12..]);
    Ok(Address::new(out))
}

/// A `bool` word: exactly 0 or 1.
pub fn word_to_bool(word: &[u8; WORD]) -> Result<bool, WordError> {
    match word_to_u256(word) {
        v if v.is_zero() => Ok(false),
        v if v == U256::one() => Ok(true),
        _ => Err(WordError::NotBool),
    }
}

/// A `uint256` word, big-endian.
#[must_use]
pub fn word_to_u256(word: &[u8; WORD]) -> U256 {
    U256::from_big_endian(word)
}

/// A `uint256` word that must fit in 64 bits.
pub fn word_to_u64(word: &[u8; WORD]) -> Result<u64, WordError> {
    let value = word_to_u256(word);
    if value > U256::from(u64::MAX) {
        return Err(WordError::Overflow);
    }
    Ok(value.low_u64())
}

/// The `index`-th word of `data`, if present.
#[must_use]
pub fn data_word(data: &[u8], index: usize) -> Option<&[u8; WORD]> {
    data.get(index * WORD..(index + 1) * WORD)
        .and_then(|slice| slice.try_into().ok())
}

/// Encodes an address as a left-padded topic/word. Used to build fixtures.
#[must_use]
pub fn address_word(address: &Address) -> Hash {
    let mut word = [0u8; WORD];
    word[12..].copy_from_slice(address.as_bytes());
    Hash::new(word)
}

/// Encodes a `uint256` as a big-endian word.
#[must_use]
pub fn u256_word(value: U256) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    value.to_big_endian(&mut word);
    word
}
