//! Storage error types.

use thiserror::Error;

/// Errors that can occur during store operations.
///
/// These are the unexpected failures: backend I/O and records that fail
/// to decode at all. Expected absence and index-consistency violations
/// are reported through [`crate::engine::Lookup`] instead.
#[derive(Debug, Error)]
pub enum StoreError {
    /// RocksDB error.
    #[error("RocksDB error: {0}")]
    Backend(String),

    /// Record codec error.
    #[error("codec error: {0}")]
    Codec(#[from] explorer_core::CodecError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rocksdb::Error> for StoreError {
    fn from(e: rocksdb::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}
