use shared_types::{ContentId, OnChainContentId};

use super::errors::CodecError;

/// Width of the internal identifier inside the 32-byte image.
pub const CONTENT_ID_LEN: usize = 16;

/// Encodes a content id for the ledger: its 16 bytes left-aligned, then 16
/// zero bytes.
#[must_use]
pub fn to_on_chain(content_id: &ContentId) -> OnChainContentId {
    let mut image = [0u8; OnChainContentId::LEN];
    image[..CONTENT_ID_LEN].copy_from_slice(content_id.as_bytes());
    OnChainContentId::new(image)
}

/// Decodes a ledger image back to the content id.
///
/// Total only over well-formed images: any non-zero byte in the trailing
/// half fails.
pub fn from_on_chain(image: &OnChainContentId) -> Result<ContentId, CodecError> {
    let bytes = image.as_bytes();

    if let Some(offset) = bytes[CONTENT_ID_LEN..].iter().position(|b| *b != 0) {
        return Err(CodecError::NonZeroPadding {
            first_offending_byte: CONTENT_ID_LEN + offset,
        });
    }

    let mut id = [0u8; CONTENT_ID_LEN];
    id.copy_from_slice(&bytes[..CONTENT_ID_LEN]);
    Ok(ContentId::from_bytes(id))
}

/// Parses the textual form of a content id (e.g. a URL path segment).
pub fn parse_content_id(input: &str) -> Result<ContentId, CodecError> {
    input
        .trim()
        .parse::<ContentId>()
        .map_err(|e| CodecError::MalformedContentId(e.to_string()))
}

/// Parses and decodes a `0x`-prefixed 64-hex-digit ledger image.
pub fn from_on_chain_hex(input: &str) -> Result<ContentId, CodecError> {
    let image = OnChainContentId::from_hex(input)
        .map_err(|e| CodecError::MalformedOnChainId(e.to_string()))?;
    from_on_chain(&image)
}
