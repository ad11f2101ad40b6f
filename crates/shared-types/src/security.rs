//! # Shared Signing Primitives
//!
//! HMAC-SHA256 signing and verification used by the webhook guard and the
//! session verifier, plus a constant-time string comparison.
//!
//! ## Security Properties
//!
//! - **HMAC-SHA256**: keyed hash over the exact bytes received
//! - **Constant-time comparison**: `Mac::verify_slice` and `subtle::ConstantTimeEq`

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Length of an HMAC-SHA256 tag in bytes.
pub const HMAC_TAG_LEN: usize = 32;

/// Signs `message` with HMAC-SHA256 under `secret`.
pub fn sign_message(message: &[u8], secret: &[u8]) -> [u8; HMAC_TAG_LEN] {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(message);

    let mut tag = [0u8; HMAC_TAG_LEN];
    tag.copy_from_slice(&mac.finalize().into_bytes());
    tag
}

/// Signs `message` and renders the tag as lowercase hex.
pub fn sign_message_hex(message: &[u8], secret: &[u8]) -> String {
    hex::encode(sign_message(message, secret))
}

/// Verifies an HMAC-SHA256 tag in constant time.
///
/// Returns `false` for a tag of the wrong length.
pub fn validate_hmac_signature(message: &[u8], tag: &[u8], secret: &[u8]) -> bool {
    let mut mac = match HmacSha256::new_from_slice(secret) {
        Ok(m) => m,
        Err(_) => return false,
    };
    mac.update(message);
    mac.verify_slice(tag).is_ok()
}

/// Constant-time string comparison.
///
/// Pads both inputs to the longer length with different filler bytes so a
/// length mismatch can never compare equal.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    use subtle::ConstantTimeEq;

    let max_len = std::cmp::max(a.len(), b.len());

    let mut a_padded = vec![0u8; max_len];
    let mut b_padded = vec![0xFFu8; max_len];

    a_padded[..a.len()].copy_from_slice(a.as_bytes());
    b_padded[..b.len()].copy_from_slice(b.as_bytes());

    let lengths_equal = a.len().ct_eq(&b.len());
    let contents_equal = a_padded.ct_eq(&b_padded);

    (lengths_equal & contents_equal).into()
}
