//! Middleware and cross-cutting concerns.

pub mod metrics;

pub use metrics::*;
