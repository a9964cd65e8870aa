//! Key schema for the explorer index.
//!
//! The ingester carves six logical key spaces out of one store by
//! prefixing every key with a fixed ASCII tag. Keys inside each space
//! are UTF-8 strings: decimal integers for numbers, lowercase hex for
//! hashes and addresses. The prefixes and encodings are a stable
//! contract shared with the ingester; changing either orphans an
//! existing index.
//!
//! Because numbers are stored as decimal strings, range scans order
//! keys lexicographically, which diverges from numeric order once digit
//! counts differ (`"9"` sorts after `"10"`). Callers that scan a
//! numeric key space must either keep both bounds at the same digit
//! count or re-check the numeric bounds on what the scan returns, as
//! [`crate::engine::QueryEngine::blocks_by_time`] does.

/// Logical key spaces of the explorer index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeySpace {
    /// Block records by number: `block-<number>`
    Block,
    /// Block number by block hash: `hash-block-<hash>`
    BlockByHash,
    /// Block number by block timestamp: `timestamp-block-<seconds>`
    BlockByTimestamp,
    /// Transaction records by global index: `transaction-<index>`
    Transaction,
    /// Transaction index by transaction hash: `tx-hash-<hash>`
    TxByHash,
    /// Address records by address: `address-<address>`
    Address,
}

impl KeySpace {
    /// The fixed key prefix of this space.
    pub const fn prefix(self) -> &'static [u8] {
        match self {
            KeySpace::Block => b"block-",
            KeySpace::BlockByHash => b"hash-block-",
            KeySpace::BlockByTimestamp => b"timestamp-block-",
            KeySpace::Transaction => b"transaction-",
            KeySpace::TxByHash => b"tx-hash-",
            KeySpace::Address => b"address-",
        }
    }

    /// Build a full key from this space's prefix and a string suffix.
    pub fn key(self, suffix: &str) -> Vec<u8> {
        let prefix = self.prefix();
        let mut key = Vec::with_capacity(prefix.len() + suffix.len());
        key.extend_from_slice(prefix);
        key.extend_from_slice(suffix.as_bytes());
        key
    }
}

/// Key of a block record.
pub fn block_key(number: u64) -> Vec<u8> {
    KeySpace::Block.key(&number.to_string())
}

/// Key of the hash-to-number block mapping.
pub fn block_by_hash_key(hash: &str) -> Vec<u8> {
    KeySpace::BlockByHash.key(hash)
}

/// Key of the timestamp-to-number block mapping.
pub fn block_by_timestamp_key(timestamp: u64) -> Vec<u8> {
    KeySpace::BlockByTimestamp.key(&timestamp.to_string())
}

/// Key of a transaction record.
pub fn transaction_key(index: u64) -> Vec<u8> {
    KeySpace::Transaction.key(&index.to_string())
}

/// Key of the hash-to-index transaction mapping.
pub fn tx_by_hash_key(hash: &str) -> Vec<u8> {
    KeySpace::TxByHash.key(hash)
}

/// Key of an address record.
pub fn address_key(address: &str) -> Vec<u8> {
    KeySpace::Address.key(address)
}

/// Parse a stored decimal index value (the payload of the secondary
/// maps). Returns `None` for anything that is not a decimal integer.
pub fn decode_index(value: &[u8]) -> Option<u64> {
    std::str::from_utf8(value).ok()?.parse().ok()
}
