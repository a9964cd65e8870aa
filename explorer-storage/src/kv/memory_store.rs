//! In-memory key-value backend for testing.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::RwLock;

use super::{KvIter, KvStore};
use crate::error::StoreError;

/// In-memory key-value backend using a BTreeMap.
///
/// Thread-safe and sorted, so range and prefix scans behave exactly
/// like the RocksDB backend. Useful for tests and development.
pub struct MemoryStore {
    data: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            data: RwLock::new(BTreeMap::new()),
        }
    }

    /// Get the number of entries in the store.
    pub fn len(&self) -> usize {
        self.data.read().unwrap().len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.data.read().unwrap().is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.data.read().unwrap().get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.data
            .write()
            .unwrap()
            .insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn range_iter(&self, start: &[u8], end: &[u8]) -> Result<KvIter<'_>, StoreError> {
        if start > end {
            return Ok(Box::new(std::iter::empty()));
        }
        let data = self.data.read().unwrap();
        let entries: Vec<(Vec<u8>, Vec<u8>)> = data
            .range::<[u8], _>((Bound::Included(start), Bound::Included(end)))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(Box::new(entries.into_iter()))
    }

    fn prefix_iter(&self, prefix: &[u8]) -> Result<KvIter<'_>, StoreError> {
        let data = self.data.read().unwrap();
        let prefix_vec = prefix.to_vec();
        let entries: Vec<(Vec<u8>, Vec<u8>)> = data
            .range(prefix_vec.clone()..)
            .take_while(|(k, _)| k.starts_with(&prefix_vec))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(Box::new(entries.into_iter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_overwrite() {
        let store = MemoryStore::new();
        store.put(b"key", b"value1").unwrap();
        store.put(b"key", b"value2").unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(b"key").unwrap(), Some(b"value2".to_vec()));
    }

    #[test]
    fn test_range_iter_inverted_bounds_is_empty() {
        let store = MemoryStore::new();
        store.put(b"a", b"1").unwrap();
        store.put(b"b", b"2").unwrap();

        let items: Vec<_> = store.range_iter(b"b", b"a").unwrap().collect();
        assert!(items.is_empty());
    }
}
