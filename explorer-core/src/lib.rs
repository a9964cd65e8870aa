//! # Explorer Core
//!
//! Domain records and the wire codec for a pre-built blockchain explorer
//! index.
//!
//! This crate provides the foundation for the storage and query crates:
//! - Typed records for blocks, transactions, and addresses
//! - The wire codec that (de)serializes records to the on-disk format
//! - Codec error types
//!
//! The index itself is built by an external ingester; everything here is
//! read-side. Records are immutable once written, so the codec is the
//! single place where the on-disk representation is interpreted.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod error;
pub mod record;

// Re-export commonly used types at crate root
pub use error::CodecError;
pub use record::{Address, Block, Transaction, TxRef, TxSpan};
