//! # Ledger Projector Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Test node, signed deliveries, event builders
//! └── integration/      # Cross-crate flows driven through the HTTP router
//!     ├── end_to_end.rs
//!     ├── replay.rs
//!     ├── revocation.rs
//!     ├── concurrency.rs
//!     └── rocksdb_backend.rs   (feature "rocksdb")
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p lp-tests
//! cargo test -p lp-tests --features rocksdb
//! cargo bench -p lp-tests
//! ```

pub mod fixtures;
pub mod integration;
