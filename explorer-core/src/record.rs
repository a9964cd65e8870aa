//! Typed records decoded from the explorer index.
//!
//! The on-disk format keeps a block's transaction ownership as a
//! `"<start>-<end>"` string and an address's transaction references as
//! delimited triples. The codec resolves those into [`TxSpan`] and
//! [`TxRef`] so that query code never parses delimiters itself.

use serde::{Deserialize, Serialize};

/// Inclusive range of global transaction indexes owned by one block.
///
/// A block with no transactions carries no span at all rather than an
/// empty one; `start <= end` always holds for a constructed span.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxSpan {
    /// First owned transaction index.
    pub start: u64,
    /// Last owned transaction index (inclusive).
    pub end: u64,
}

impl TxSpan {
    /// Create a span, rejecting inverted bounds.
    pub fn new(start: u64, end: u64) -> Option<Self> {
        if start <= end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Number of transaction indexes the span covers.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// A constructed span always covers at least one index.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate the covered indexes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u64> {
        self.start..=self.end
    }
}

/// One entry of an address's transaction reference list.
///
/// References carry the timestamp and transferred value alongside the
/// index so that time/value filters can run without dereferencing the
/// transaction record first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxRef {
    /// Global index of the referenced transaction.
    pub tx_index: u64,
    /// Timestamp of the referenced transaction, seconds.
    pub timestamp: u64,
    /// Transferred value in the smallest currency unit.
    pub value: u128,
}

/// A block record as stored in the index.
///
/// `number` is the primary key; the hash and timestamp secondary maps
/// both resolve to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Block hash, lowercase hex with `0x` prefix.
    pub hash: String,
    /// Hash of the preceding block.
    pub parent_hash: String,
    /// Block number, the primary key.
    pub number: u64,
    /// Unix timestamp in seconds.
    pub timestamp: u64,
    /// Address credited with the block.
    pub miner: String,
    /// Total gas consumed by the block's transactions.
    pub gas_used: u64,
    /// Gas limit at this block.
    pub gas_limit: u64,
    /// Owned transaction indexes, `None` for an empty block.
    pub tx_span: Option<TxSpan>,
}

/// A transaction record as stored in the index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction hash, lowercase hex with `0x` prefix.
    pub hash: String,
    /// Global transaction index, the primary key.
    pub index: u64,
    /// Number of the containing block.
    pub block_number: u64,
    /// Sending address.
    pub sender: String,
    /// Receiving address; empty for contract creation.
    pub recipient: String,
    /// Transferred value, decimal string in the smallest currency unit.
    pub value: String,
    /// Gas provided by the sender.
    pub gas: u64,
    /// Gas price, decimal string.
    pub gas_price: String,
    /// Call data, hex string.
    pub input: String,
    /// Timestamp inherited from the containing block, seconds.
    pub timestamp: u64,
}

/// An address record as stored in the index.
///
/// The reference lists are ordered as the ingester wrote them; query
/// code preserves that order when filtering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Balance, decimal string in the smallest currency unit.
    pub balance: String,
    /// Transactions this address received.
    pub input_refs: Vec<TxRef>,
    /// Transactions this address sent.
    pub output_refs: Vec<TxRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_rejects_inverted_bounds() {
        assert!(TxSpan::new(3, 2).is_none());
        assert_eq!(TxSpan::new(2, 2), Some(TxSpan { start: 2, end: 2 }));
    }

    #[test]
    fn test_span_len_and_iter() {
        let span = TxSpan::new(4, 7).unwrap();
        assert_eq!(span.len(), 4);
        let indexes: Vec<u64> = span.iter().collect();
        assert_eq!(indexes, vec![4, 5, 6, 7]);
    }

    #[test]
    fn test_single_element_span() {
        let span = TxSpan::new(9, 9).unwrap();
        assert_eq!(span.len(), 1);
        assert_eq!(span.iter().collect::<Vec<_>>(), vec![9]);
    }
}
