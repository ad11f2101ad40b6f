use chrono::DateTime;
use serde::Deserialize;
use tracing::debug;

use shared_types::{NormalizedLogEntry, Timestamp};

use super::envelope::{ActivityEnvelope, BlockEnvelope, WebhookEnvelope};
use super::errors::IngressError;

/// Header carrying the notifier's claimed send time, in unix seconds.
pub const TIMESTAMP_HEADER: &str = "x-webhook-timestamp";

/// Header carrying the hex HMAC of the body.
pub const SIGNATURE_HEADER: &str = "x-webhook-signature";

/// Parses either envelope shape. Anything else fails the whole delivery.
pub fn parse_envelope(body: &[u8]) -> Result<WebhookEnvelope, IngressError> {
    serde_json::from_slice(body).map_err(|e| IngressError::Validation(e.to_string()))
}

/// Flattens an envelope into logs, preserving delivery order.
///
/// Activities without a log and logs marked `removed` are dropped.
#[must_use]
pub fn into_log_entries(envelope: WebhookEnvelope) -> Vec<NormalizedLogEntry> {
    match envelope {
        WebhookEnvelope::AddressActivity(e) => from_activity(e),
        WebhookEnvelope::Graphql(e) => from_block(e),
    }
}

/// `parse_envelope` then `into_log_entries`.
pub fn normalize(body: &[u8]) -> Result<Vec<NormalizedLogEntry>, IngressError> {
    parse_envelope(body).map(into_log_entries)
}

fn from_activity(envelope: ActivityEnvelope) -> Vec<NormalizedLogEntry> {
    envelope
        .event
        .activity
        .into_iter()
        .filter_map(|activity| {
            let log = activity.log?;
            if log.removed {
                debug!(
                    tx_hash = %log.transaction_hash,
                    log_index = log.log_index.0,
                    "skipping log removed by reorg"
                );
                return None;
            }
            Some(NormalizedLogEntry {
                contract_address: log.address,
                topics: log.topics,
                data: log.data.0,
                transaction_hash: log.transaction_hash,
                log_index: log.log_index.0,
                block_number: log.block_number.or(activity.block_num).map(|q| q.0),
                block_timestamp: None,
            })
        })
        .collect()
}

fn from_block(envelope: BlockEnvelope) -> Vec<NormalizedLogEntry> {
    let block = envelope.event.data.block;
    let block_number = block.number.map(|q| q.0);
    let block_timestamp = Some(block.timestamp.0);

    block
        .logs
        .into_iter()
        .map(|log| NormalizedLogEntry {
            contract_address: log.account.address,
            topics: log.topics,
            data: log.data.0,
            transaction_hash: log.transaction.hash,
            log_index: log.index.0,
            block_number,
            block_timestamp,
        })
        .collect()
}

/// The delivery's claimed send time.
///
/// Taken from the timestamp header when present, otherwise from the
/// envelope's `createdAt` (RFC 3339). Having neither is a validation error.
pub fn claimed_timestamp(header: Option<&str>, body: &[u8]) -> Result<Timestamp, IngressError> {
    if let Some(raw) = header {
        return raw
            .trim()
            .parse::<Timestamp>()
            .map_err(|_| IngressError::Validation(format!("invalid {TIMESTAMP_HEADER}: {raw:?}")));
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Peek {
        #[serde(default)]
        created_at: Option<String>,
    }

    let peek: Peek =
        serde_json::from_slice(body).map_err(|e| IngressError::Validation(e.to_string()))?;
    let created_at = peek
        .created_at
        .ok_or_else(|| IngressError::Validation("delivery carries no timestamp".into()))?;

    let parsed = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| IngressError::Validation(format!("invalid createdAt {created_at:?}: {e}")))?;
    Timestamp::try_from(parsed.timestamp())
        .map_err(|_| IngressError::Validation(format!("createdAt before epoch: {created_at:?}")))
}
