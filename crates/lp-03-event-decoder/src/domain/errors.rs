use thiserror::Error;

use super::registry::EventKind;

/// A recognised log whose fields could not be decoded.
///
/// Recovered locally: the log is skipped and the rest of the delivery
/// continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{event:?}: expected {expected} topics, got {actual}")]
    TopicCount {
        event: EventKind,
        expected: usize,
        actual: usize,
    },

    #[error("{event:?}: data is {actual} bytes, need at least {required}")]
    DataTooShort {
        event: EventKind,
        required: usize,
        actual: usize,
    },

    #[error("{event:?}.{field}: address word has non-zero high bytes")]
    InvalidAddress { event: EventKind, field: &'static str },

    #[error("{event:?}.{field}: bool word is neither 0 nor 1")]
    InvalidBool { event: EventKind, field: &'static str },

    #[error("{event:?}.{field}: value does not fit in 64 bits")]
    Overflow { event: EventKind, field: &'static str },
}
