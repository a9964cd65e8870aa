//! Key-value storage backends.
//!
//! This module provides an abstraction over key-value storage with two
//! implementations:
//! - `MemoryStore`: In-memory BTreeMap-based storage for testing
//! - `RocksStore`: RocksDB-based persistent storage for production
//!
//! The query engine only reads; `put` exists as the seam the ingestion
//! tooling and tests load fixtures through. Backends are `Send + Sync`
//! so one long-lived handle can serve concurrent readers without any
//! external serialization gate.

mod memory_store;
mod rocks_store;

pub use memory_store::MemoryStore;
pub use rocks_store::RocksStore;

use crate::error::StoreError;

/// Type alias for the iterator returned by the scan methods.
pub type KvIter<'a> = Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + 'a>;

/// Trait for key-value storage backends.
///
/// Implementations must iterate in ascending lexicographic key order.
pub trait KvStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Put a key-value pair.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Iterate over `[start, end]`, both bounds inclusive, ascending.
    fn range_iter(&self, start: &[u8], end: &[u8]) -> Result<KvIter<'_>, StoreError>;

    /// Iterate over all keys with a given prefix, ascending.
    fn prefix_iter(&self, prefix: &[u8]) -> Result<KvIter<'_>, StoreError>;

    /// Check if a key exists.
    fn exists(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store_basic<S: KvStore>(store: S) {
        store.put(b"key1", b"value1").unwrap();
        assert_eq!(store.get(b"key1").unwrap(), Some(b"value1".to_vec()));
        assert!(store.get(b"nonexistent").unwrap().is_none());

        assert!(store.exists(b"key1").unwrap());
        assert!(!store.exists(b"nonexistent").unwrap());
    }

    fn test_store_range_iter<S: KvStore>(store: S) {
        store.put(b"k-a", b"1").unwrap();
        store.put(b"k-b", b"2").unwrap();
        store.put(b"k-c", b"3").unwrap();
        store.put(b"k-d", b"4").unwrap();

        // Both bounds inclusive
        let items: Vec<_> = store.range_iter(b"k-b", b"k-c").unwrap().collect();
        assert_eq!(
            items,
            vec![
                (b"k-b".to_vec(), b"2".to_vec()),
                (b"k-c".to_vec(), b"3".to_vec()),
            ]
        );

        // Bounds need not be present keys
        let items: Vec<_> = store.range_iter(b"k-aa", b"k-cc").unwrap().collect();
        assert_eq!(items.len(), 2);

        // Empty interval
        let items: Vec<_> = store.range_iter(b"k-x", b"k-z").unwrap().collect();
        assert!(items.is_empty());
    }

    fn test_store_prefix_iter<S: KvStore>(store: S) {
        store.put(b"prefix-a", b"1").unwrap();
        store.put(b"prefix-b", b"2").unwrap();
        store.put(b"other-x", b"3").unwrap();

        let items: Vec<_> = store.prefix_iter(b"prefix-").unwrap().collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].0, b"prefix-a".to_vec());
        assert_eq!(items[1].0, b"prefix-b".to_vec());
    }

    #[test]
    fn test_memory_store_basic() {
        test_store_basic(MemoryStore::new());
    }

    #[test]
    fn test_memory_store_range_iter() {
        test_store_range_iter(MemoryStore::new());
    }

    #[test]
    fn test_memory_store_prefix_iter() {
        test_store_prefix_iter(MemoryStore::new());
    }
}
