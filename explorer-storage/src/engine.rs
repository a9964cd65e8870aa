//! Read-only query engine over the explorer index.
//!
//! Every operation is a stateless composition of point reads and range
//! scans against the prefixed key spaces in [`crate::keys`], decoded
//! through `explorer-core`'s codec and reshaped into denormalized
//! response records: blocks embed their full transaction lists,
//! addresses embed their filtered ones.
//!
//! Absence and corruption are distinct outcomes. A primary key that was
//! never written is [`Lookup::NotFound`]; a secondary reference (a
//! transaction index inside a block's declared span, or inside an
//! address's reference list) that fails to resolve is
//! [`Lookup::Corrupt`], logged at `warn`, and never produces a partial
//! record. Backend I/O failures propagate as [`StoreError`].

use std::sync::Arc;

use tracing::{debug, warn};

use explorer_core::codec;
use explorer_core::{Block, Transaction, TxRef, TxSpan};
use serde::Serialize;

use crate::error::StoreError;
use crate::keys;
use crate::kv::KvStore;

/// Outcome of a query operation.
///
/// `NotFound` and `Corrupt` are both absence from the caller's point of
/// view, but only the latter signals an index-consistency violation
/// worth alerting on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup<T> {
    /// The record was found and fully assembled.
    Found(T),
    /// The primary key is absent from the index.
    NotFound,
    /// A secondary reference failed to resolve; detail says which.
    Corrupt(String),
}

impl<T> Lookup<T> {
    /// Unwrap into `Some` only for a found record.
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            _ => None,
        }
    }

    /// Recast a non-`Found` outcome for a different payload type.
    ///
    /// Panics if the outcome is `Found`; callers match that arm first.
    fn recast<U>(self) -> Lookup<U> {
        match self {
            Lookup::Found(_) => unreachable!("recast of a Found lookup"),
            Lookup::NotFound => Lookup::NotFound,
            Lookup::Corrupt(detail) => Lookup::Corrupt(detail),
        }
    }
}

/// Time and value predicate applied to an address's transaction
/// references. All bounds are inclusive.
#[derive(Clone, Copy, Debug)]
pub struct TxFilter {
    /// Earliest accepted timestamp, seconds.
    pub time_from: u64,
    /// Latest accepted timestamp, seconds.
    pub time_to: u64,
    /// Smallest accepted transferred value.
    pub value_from: u128,
    /// Largest accepted transferred value.
    pub value_to: u128,
}

impl TxFilter {
    /// A filter that accepts every reference.
    pub fn all() -> Self {
        Self {
            time_from: 0,
            time_to: u64::MAX,
            value_from: 0,
            value_to: u128::MAX,
        }
    }

    /// Whether a reference passes the predicate.
    pub fn matches(&self, r: &TxRef) -> bool {
        self.time_from <= r.timestamp
            && r.timestamp <= self.time_to
            && self.value_from <= r.value
            && r.value <= self.value_to
    }
}

/// A block with its transaction span resolved into the owned records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BlockView {
    /// Block hash.
    pub hash: String,
    /// Hash of the preceding block.
    pub parent_hash: String,
    /// Block number.
    pub number: u64,
    /// Unix timestamp in seconds.
    pub timestamp: u64,
    /// Address credited with the block.
    pub miner: String,
    /// Total gas consumed.
    pub gas_used: u64,
    /// Gas limit at this block.
    pub gas_limit: u64,
    /// Owned transactions, ascending by index.
    pub transactions: Vec<Transaction>,
}

impl BlockView {
    fn assemble(block: Block, transactions: Vec<Transaction>) -> Self {
        Self {
            hash: block.hash,
            parent_hash: block.parent_hash,
            number: block.number,
            timestamp: block.timestamp,
            miner: block.miner,
            gas_used: block.gas_used,
            gas_limit: block.gas_limit,
            transactions,
        }
    }
}

/// An address with its reference lists resolved into filtered
/// transaction lists. Balance passes through unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AddressView {
    /// Balance, decimal string, exactly as stored.
    pub balance: String,
    /// Matching received transactions, original order.
    pub input_transactions: Vec<Transaction>,
    /// Matching sent transactions, original order.
    pub output_transactions: Vec<Transaction>,
}

/// Stateless query engine over one shared store handle.
pub struct QueryEngine<S: KvStore> {
    store: Arc<S>,
}

impl<S: KvStore> QueryEngine<S> {
    /// Create an engine over a shared store handle.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Get a block by its hash, transactions embedded.
    pub fn block_by_hash(&self, hash: &str) -> Result<Lookup<BlockView>, StoreError> {
        let Some(raw_index) = self.store.get(&keys::block_by_hash_key(hash))? else {
            debug!(hash, "block hash not mapped");
            return Ok(Lookup::NotFound);
        };
        let Some(number) = keys::decode_index(&raw_index) else {
            warn!(hash, "hash-block mapping holds a non-numeric index");
            return Ok(Lookup::Corrupt(format!(
                "hash-block mapping for {hash} is not a block number"
            )));
        };
        self.assemble_block(number)
    }

    /// Get the hash of the block at `number`.
    pub fn block_hash_by_index(&self, number: u64) -> Result<Lookup<String>, StoreError> {
        let Some(raw) = self.store.get(&keys::block_key(number))? else {
            return Ok(Lookup::NotFound);
        };
        let block = codec::decode_block(&raw)?;
        Ok(Lookup::Found(block.hash))
    }

    /// Get blocks whose timestamp lies in `[t_start, t_end]`, at most
    /// `limit` scan matches (`limit == 0` means unbounded).
    ///
    /// Timestamp keys are decimal strings, so the scan is lexicographic;
    /// the numeric bound re-check on the collected index values mirrors
    /// what the ingester's readers have always done. Matched indexes are
    /// then densified: every block in the contiguous `[min, max]` span
    /// of the matches is returned, including blocks the scan itself
    /// never matched.
    pub fn blocks_by_time(
        &self,
        limit: u64,
        t_start: u64,
        t_end: u64,
    ) -> Result<Lookup<Vec<BlockView>>, StoreError> {
        let start_key = keys::block_by_timestamp_key(t_start);
        let end_key = keys::block_by_timestamp_key(t_end);

        let mut indexes: Vec<u64> = Vec::new();
        for (_, raw_index) in self.store.range_iter(&start_key, &end_key)? {
            if limit != 0 && indexes.len() as u64 >= limit {
                break;
            }
            let Some(number) = keys::decode_index(&raw_index) else {
                warn!("timestamp-block mapping holds a non-numeric index");
                return Ok(Lookup::Corrupt(
                    "timestamp-block mapping holds a non-numeric index".into(),
                ));
            };
            if number >= t_start && number <= t_end {
                indexes.push(number);
            }
        }
        if indexes.is_empty() {
            return Ok(Lookup::NotFound);
        }

        indexes.sort_unstable();
        self.collect_block_span(indexes[0], *indexes.last().expect("non-empty"))
    }

    /// Get every block with number in `[start, end]` inclusive.
    ///
    /// There is no existence pre-check; an absent number inside the
    /// range fails the whole call rather than being skipped.
    pub fn blocks_by_index_range(
        &self,
        start: u64,
        end: u64,
    ) -> Result<Lookup<Vec<BlockView>>, StoreError> {
        self.collect_block_span(start, end)
    }

    /// Get a transaction by its hash.
    pub fn transaction_by_hash(&self, hash: &str) -> Result<Lookup<Transaction>, StoreError> {
        let Some(raw_index) = self.store.get(&keys::tx_by_hash_key(hash))? else {
            debug!(hash, "transaction hash not mapped");
            return Ok(Lookup::NotFound);
        };
        let Some(index) = keys::decode_index(&raw_index) else {
            warn!(hash, "tx-hash mapping holds a non-numeric index");
            return Ok(Lookup::Corrupt(format!(
                "tx-hash mapping for {hash} is not a transaction index"
            )));
        };
        match self.store.get(&keys::transaction_key(index))? {
            Some(raw) => Ok(Lookup::Found(codec::decode_transaction(&raw)?)),
            None => {
                warn!(hash, index, "mapped transaction record missing");
                Ok(Lookup::Corrupt(format!(
                    "transaction {index} mapped from {hash} is missing"
                )))
            }
        }
    }

    /// Get the transactions of the block with the given hash.
    ///
    /// Scan-based: enumerates whatever exists in the span's key
    /// interval. Unlike span reconstruction, a single missing index is
    /// not detectable here; the result is simply shorter.
    pub fn transactions_of_block_by_hash(
        &self,
        hash: &str,
    ) -> Result<Lookup<Vec<Transaction>>, StoreError> {
        let Some(raw_index) = self.store.get(&keys::block_by_hash_key(hash))? else {
            return Ok(Lookup::NotFound);
        };
        let Some(number) = keys::decode_index(&raw_index) else {
            warn!(hash, "hash-block mapping holds a non-numeric index");
            return Ok(Lookup::Corrupt(format!(
                "hash-block mapping for {hash} is not a block number"
            )));
        };
        self.transactions_of_block_by_index(number)
    }

    /// Get the transactions of the block at `number`. Scan-based, see
    /// [`Self::transactions_of_block_by_hash`].
    pub fn transactions_of_block_by_index(
        &self,
        number: u64,
    ) -> Result<Lookup<Vec<Transaction>>, StoreError> {
        let Some(raw) = self.store.get(&keys::block_key(number))? else {
            return Ok(Lookup::NotFound);
        };
        let block = codec::decode_block(&raw)?;
        let Some(span) = block.tx_span else {
            return Ok(Lookup::Found(Vec::new()));
        };

        let start_key = keys::transaction_key(span.start);
        let end_key = keys::transaction_key(span.end);
        let mut transactions = Vec::new();
        for (_, raw_tx) in self.store.range_iter(&start_key, &end_key)? {
            transactions.push(codec::decode_transaction(&raw_tx)?);
        }
        Ok(Lookup::Found(transactions))
    }

    /// Get an address's transactions matching `filter`, input side
    /// first, then output side, each in its stored order.
    pub fn transactions_of_address(
        &self,
        address: &str,
        filter: &TxFilter,
    ) -> Result<Lookup<Vec<Transaction>>, StoreError> {
        let Some(raw) = self.store.get(&keys::address_key(address))? else {
            debug!(address, "address not found");
            return Ok(Lookup::NotFound);
        };
        let record = codec::decode_address(&raw)?;

        let mut transactions = Vec::new();
        for refs in [&record.input_refs, &record.output_refs] {
            for r in refs.iter().filter(|r| filter.matches(r)) {
                match self.deref_tx(address, r)? {
                    Lookup::Found(tx) => transactions.push(tx),
                    other => return Ok(other.recast()),
                }
            }
        }
        Ok(Lookup::Found(transactions))
    }

    /// Get an address summary: balance plus the filtered transaction
    /// lists, capped at `max_tx` matches across both directions.
    ///
    /// The cap counter is shared by the input scan and the output scan,
    /// so it bounds the combined result, not each side.
    pub fn address_summary(
        &self,
        address: &str,
        filter: &TxFilter,
        max_tx: u64,
    ) -> Result<Lookup<AddressView>, StoreError> {
        let Some(raw) = self.store.get(&keys::address_key(address))? else {
            debug!(address, "address not found");
            return Ok(Lookup::NotFound);
        };
        let record = codec::decode_address(&raw)?;

        let mut matched = 0u64;
        let input_transactions =
            match self.collect_capped(address, &record.input_refs, filter, max_tx, &mut matched)? {
                Lookup::Found(txs) => txs,
                other => return Ok(other.recast()),
            };
        let output_transactions =
            match self.collect_capped(address, &record.output_refs, filter, max_tx, &mut matched)? {
                Lookup::Found(txs) => txs,
                other => return Ok(other.recast()),
            };

        Ok(Lookup::Found(AddressView {
            balance: record.balance,
            input_transactions,
            output_transactions,
        }))
    }

    /// Get the stored balance string of an address.
    pub fn balance(&self, address: &str) -> Result<Lookup<String>, StoreError> {
        let Some(raw) = self.store.get(&keys::address_key(address))? else {
            debug!(address, "address not found");
            return Ok(Lookup::NotFound);
        };
        let record = codec::decode_address(&raw)?;
        Ok(Lookup::Found(record.balance))
    }

    /// Load the block at `number` and reconstruct its transactions.
    fn assemble_block(&self, number: u64) -> Result<Lookup<BlockView>, StoreError> {
        let Some(raw) = self.store.get(&keys::block_key(number))? else {
            debug!(number, "block not found");
            return Ok(Lookup::NotFound);
        };
        let block = codec::decode_block(&raw)?;
        match self.reconstruct_span(block.number, block.tx_span)? {
            Lookup::Found(transactions) => {
                Ok(Lookup::Found(BlockView::assemble(block, transactions)))
            }
            other => Ok(other.recast()),
        }
    }

    /// Assemble every block in `[start, end]`, failing the whole call
    /// on the first absent block or corrupt span.
    fn collect_block_span(
        &self,
        start: u64,
        end: u64,
    ) -> Result<Lookup<Vec<BlockView>>, StoreError> {
        let mut blocks = Vec::new();
        for number in start..=end {
            match self.assemble_block(number)? {
                Lookup::Found(view) => blocks.push(view),
                other => return Ok(other.recast()),
            }
        }
        Ok(Lookup::Found(blocks))
    }

    /// Point-fetch every transaction in a declared span, in ascending
    /// order. Any single missing entry is a corruption signal for the
    /// whole operation; an absent span yields an empty list.
    fn reconstruct_span(
        &self,
        block_number: u64,
        span: Option<TxSpan>,
    ) -> Result<Lookup<Vec<Transaction>>, StoreError> {
        let Some(span) = span else {
            return Ok(Lookup::Found(Vec::new()));
        };
        let mut transactions = Vec::with_capacity(span.len() as usize);
        for index in span.iter() {
            match self.store.get(&keys::transaction_key(index))? {
                Some(raw) => transactions.push(codec::decode_transaction(&raw)?),
                None => {
                    warn!(block_number, index, "transaction missing from declared span");
                    return Ok(Lookup::Corrupt(format!(
                        "transaction {index} missing from block {block_number}'s declared span"
                    )));
                }
            }
        }
        Ok(Lookup::Found(transactions))
    }

    /// Dereference one address reference to its transaction record.
    fn deref_tx(&self, address: &str, r: &TxRef) -> Result<Lookup<Transaction>, StoreError> {
        match self.store.get(&keys::transaction_key(r.tx_index))? {
            Some(raw) => Ok(Lookup::Found(codec::decode_transaction(&raw)?)),
            None => {
                warn!(
                    address,
                    index = r.tx_index,
                    "referenced transaction missing"
                );
                Ok(Lookup::Corrupt(format!(
                    "transaction {} referenced by address {address} is missing",
                    r.tx_index
                )))
            }
        }
    }

    /// Dereference the references matching `filter`, stopping once the
    /// shared `matched` counter exceeds `max_tx`.
    fn collect_capped(
        &self,
        address: &str,
        refs: &[TxRef],
        filter: &TxFilter,
        max_tx: u64,
        matched: &mut u64,
    ) -> Result<Lookup<Vec<Transaction>>, StoreError> {
        let mut transactions = Vec::new();
        for r in refs.iter().filter(|r| filter.matches(r)) {
            *matched += 1;
            if *matched > max_tx {
                break;
            }
            match self.deref_tx(address, r)? {
                Lookup::Found(tx) => transactions.push(tx),
                other => return Ok(other.recast()),
            }
        }
        Ok(Lookup::Found(transactions))
    }
}
