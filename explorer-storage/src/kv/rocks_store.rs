//! RocksDB key-value backend for production use.

use std::path::Path;
use std::sync::Arc;

use rocksdb::{Direction, IteratorMode, Options, DB};

use super::{KvIter, KvStore};
use crate::error::StoreError;

/// RocksDB-based key-value backend.
///
/// One handle is opened for the lifetime of the process and shared via
/// `Arc`; RocksDB supports concurrent readers on a single handle, so
/// queries never serialize behind a process-wide lock.
pub struct RocksStore {
    db: Arc<DB>,
}

impl RocksStore {
    /// Open or create a RocksDB database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        opts.set_write_buffer_size(64 * 1024 * 1024);
        opts.set_max_open_files(10_000);

        let db = DB::open(&opts, path)?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Open an existing index read-only.
    ///
    /// This is the deployment mode: the index is built by a separate
    /// ingestion process and served here without write access.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.set_max_open_files(10_000);

        let db = DB::open_for_read_only(&opts, path, false)?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Get a reference to the underlying RocksDB instance.
    pub fn inner(&self) -> &DB {
        &self.db
    }

    /// Get estimated number of keys in the database.
    pub fn estimate_num_keys(&self) -> Option<u64> {
        self.db
            .property_int_value("rocksdb.estimate-num-keys")
            .ok()
            .flatten()
    }
}

impl KvStore for RocksStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.db.get(key)?)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.db.put(key, value)?;
        Ok(())
    }

    fn range_iter(&self, start: &[u8], end: &[u8]) -> Result<KvIter<'_>, StoreError> {
        let end_vec = end.to_vec();
        let iter = self
            .db
            .iterator(IteratorMode::From(start, Direction::Forward));

        let range_iter = iter
            .map(|result| result.map(|(k, v)| (k.to_vec(), v.to_vec())))
            .take_while(move |result| match result {
                Ok((k, _)) => k.as_slice() <= end_vec.as_slice(),
                Err(_) => false,
            })
            .filter_map(|result| result.ok());

        Ok(Box::new(range_iter))
    }

    fn prefix_iter(&self, prefix: &[u8]) -> Result<KvIter<'_>, StoreError> {
        let prefix_vec = prefix.to_vec();
        let iter = self
            .db
            .iterator(IteratorMode::From(prefix, Direction::Forward));

        let prefix_iter = iter
            .map(|result| result.map(|(k, v)| (k.to_vec(), v.to_vec())))
            .take_while(move |result| match result {
                Ok((k, _)) => k.starts_with(&prefix_vec),
                Err(_) => false,
            })
            .filter_map(|result| result.ok());

        Ok(Box::new(prefix_iter))
    }
}
