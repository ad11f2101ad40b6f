//! Cross-crate flows.

mod concurrency;
mod end_to_end;
mod replay;
mod revocation;
