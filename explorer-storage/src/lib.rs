//! # Explorer Storage
//!
//! Storage backends and the read-only query engine for a pre-built
//! blockchain explorer index.
//!
//! This crate provides:
//! - The key schema of the index's six prefixed key spaces
//! - Key-value backends (RocksDB for production, in-memory for tests)
//! - A query engine that assembles denormalized blocks, transactions,
//!   and address summaries out of point reads and range scans
//!
//! ## Architecture
//!
//! The index is written by a separate ingestion process; this crate
//! never mutates it. A single long-lived store handle is shared across
//! queries via `Arc`, relying on the backend's own reader concurrency
//! rather than any process-wide lock. Each query is a self-contained
//! synchronous sequence of reads with no state carried between calls.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod engine;
pub mod error;
pub mod keys;
pub mod kv;

pub use engine::{AddressView, BlockView, Lookup, QueryEngine, TxFilter};
pub use error::StoreError;
pub use keys::KeySpace;
pub use kv::{KvStore, MemoryStore, RocksStore};
