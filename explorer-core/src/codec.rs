//! Wire codec for index records.
//!
//! Records are stored as bincode with a deterministic configuration
//! (fixed-size integers, little-endian, trailing bytes rejected), so the
//! same record always produces the same bytes. Two fields keep a legacy
//! text encoding inside the binary record, inherited from the ingester:
//!
//! - a block's transaction ownership is a `"<start>-<end>"` string,
//!   empty when the block owns no transactions;
//! - an address's reference lists are `|`-delimited lists of
//!   `index+timestamp+value` triples, empty for no references.
//!
//! Decoding resolves both into [`TxSpan`] / [`TxRef`] values so callers
//! never see the delimiters; encoding reproduces them byte-for-byte.

use bincode::Options;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::CodecError;
use crate::record::{Address, Block, Transaction, TxRef, TxSpan};

/// Deterministic bincode configuration shared by all record types.
fn config() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .reject_trailing_bytes()
}

fn to_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    config()
        .serialize(value)
        .map_err(|e| CodecError::EncodeFailed(e.to_string()))
}

fn from_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    config()
        .deserialize(bytes)
        .map_err(|e| CodecError::DecodeFailed(e.to_string()))
}

/// On-disk shape of a block record.
#[derive(Serialize, Deserialize)]
struct BlockWire {
    hash: String,
    parent_hash: String,
    number: u64,
    timestamp: u64,
    miner: String,
    gas_used: u64,
    gas_limit: u64,
    tx_index_range: String,
}

/// On-disk shape of an address record.
#[derive(Serialize, Deserialize)]
struct AddressWire {
    balance: String,
    input_tx_refs: String,
    output_tx_refs: String,
}

/// Render a span as the `"<start>-<end>"` wire string.
fn span_to_wire(span: Option<TxSpan>) -> String {
    match span {
        Some(span) => format!("{}-{}", span.start, span.end),
        None => String::new(),
    }
}

/// Parse the `"<start>-<end>"` wire string; empty means no span.
pub fn parse_span(raw: &str) -> Result<Option<TxSpan>, CodecError> {
    if raw.is_empty() {
        return Ok(None);
    }
    let malformed = || CodecError::MalformedField {
        field: "tx_index_range",
        value: raw.to_string(),
    };
    let (start, end) = raw.split_once('-').ok_or_else(malformed)?;
    let start: u64 = start.parse().map_err(|_| malformed())?;
    let end: u64 = end.parse().map_err(|_| malformed())?;
    TxSpan::new(start, end).ok_or_else(malformed).map(Some)
}

/// Render a reference list as the `|`-delimited wire string.
fn refs_to_wire(refs: &[TxRef]) -> String {
    refs.iter()
        .map(|r| format!("{}+{}+{}", r.tx_index, r.timestamp, r.value))
        .collect::<Vec<_>>()
        .join("|")
}

/// Parse a `|`-delimited reference list; empty means no references.
pub fn parse_refs(field: &'static str, raw: &str) -> Result<Vec<TxRef>, CodecError> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    raw.split('|')
        .map(|entry| {
            let malformed = || CodecError::MalformedField {
                field,
                value: entry.to_string(),
            };
            let mut parts = entry.split('+');
            let tx_index = parts.next().ok_or_else(malformed)?;
            let timestamp = parts.next().ok_or_else(malformed)?;
            let value = parts.next().ok_or_else(malformed)?;
            if parts.next().is_some() {
                return Err(malformed());
            }
            Ok(TxRef {
                tx_index: tx_index.parse().map_err(|_| malformed())?,
                timestamp: timestamp.parse().map_err(|_| malformed())?,
                value: value.parse().map_err(|_| malformed())?,
            })
        })
        .collect()
}

/// Encode a block record.
pub fn encode_block(block: &Block) -> Result<Vec<u8>, CodecError> {
    to_bytes(&BlockWire {
        hash: block.hash.clone(),
        parent_hash: block.parent_hash.clone(),
        number: block.number,
        timestamp: block.timestamp,
        miner: block.miner.clone(),
        gas_used: block.gas_used,
        gas_limit: block.gas_limit,
        tx_index_range: span_to_wire(block.tx_span),
    })
}

/// Decode a block record.
pub fn decode_block(bytes: &[u8]) -> Result<Block, CodecError> {
    let wire: BlockWire = from_bytes(bytes)?;
    Ok(Block {
        tx_span: parse_span(&wire.tx_index_range)?,
        hash: wire.hash,
        parent_hash: wire.parent_hash,
        number: wire.number,
        timestamp: wire.timestamp,
        miner: wire.miner,
        gas_used: wire.gas_used,
        gas_limit: wire.gas_limit,
    })
}

/// Encode a transaction record.
pub fn encode_transaction(tx: &Transaction) -> Result<Vec<u8>, CodecError> {
    to_bytes(tx)
}

/// Decode a transaction record.
pub fn decode_transaction(bytes: &[u8]) -> Result<Transaction, CodecError> {
    from_bytes(bytes)
}

/// Encode an address record.
pub fn encode_address(address: &Address) -> Result<Vec<u8>, CodecError> {
    to_bytes(&AddressWire {
        balance: address.balance.clone(),
        input_tx_refs: refs_to_wire(&address.input_refs),
        output_tx_refs: refs_to_wire(&address.output_refs),
    })
}

/// Decode an address record.
pub fn decode_address(bytes: &[u8]) -> Result<Address, CodecError> {
    let wire: AddressWire = from_bytes(bytes)?;
    Ok(Address {
        input_refs: parse_refs("input_tx_refs", &wire.input_tx_refs)?,
        output_refs: parse_refs("output_tx_refs", &wire.output_tx_refs)?,
        balance: wire.balance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block(span: Option<TxSpan>) -> Block {
        Block {
            hash: "0xaa01".into(),
            parent_hash: "0xaa00".into(),
            number: 7,
            timestamp: 1_600_000_007,
            miner: "0xfeed".into(),
            gas_used: 21_000,
            gas_limit: 8_000_000,
            tx_span: span,
        }
    }

    #[test]
    fn test_block_roundtrip_with_span() {
        let block = sample_block(TxSpan::new(10, 14));
        let decoded = decode_block(&encode_block(&block).unwrap()).unwrap();
        assert_eq!(decoded, block);
    }

    #[test]
    fn test_block_roundtrip_empty_span() {
        let block = sample_block(None);
        let decoded = decode_block(&encode_block(&block).unwrap()).unwrap();
        assert_eq!(decoded, block);
        assert!(decoded.tx_span.is_none());
    }

    #[test]
    fn test_transaction_roundtrip() {
        let tx = Transaction {
            hash: "0xbb01".into(),
            index: 42,
            block_number: 7,
            sender: "0x01".into(),
            recipient: "0x02".into(),
            value: "1000000000000000000".into(),
            gas: 21_000,
            gas_price: "20000000000".into(),
            input: "0x".into(),
            timestamp: 1_600_000_007,
        };
        let decoded = decode_transaction(&encode_transaction(&tx).unwrap()).unwrap();
        assert_eq!(decoded, tx);
    }

    #[test]
    fn test_address_roundtrip() {
        let address = Address {
            balance: "12345".into(),
            input_refs: vec![
                TxRef { tx_index: 1, timestamp: 100, value: 50 },
                TxRef { tx_index: 2, timestamp: 200, value: 150 },
            ],
            output_refs: vec![TxRef { tx_index: 3, timestamp: 300, value: 250 }],
        };
        let decoded = decode_address(&encode_address(&address).unwrap()).unwrap();
        assert_eq!(decoded, address);
    }

    #[test]
    fn test_address_roundtrip_no_refs() {
        let address = Address {
            balance: "0".into(),
            input_refs: vec![],
            output_refs: vec![],
        };
        let decoded = decode_address(&encode_address(&address).unwrap()).unwrap();
        assert_eq!(decoded, address);
    }

    #[test]
    fn test_parse_span_forms() {
        assert_eq!(parse_span("").unwrap(), None);
        assert_eq!(parse_span("3-9").unwrap(), TxSpan::new(3, 9));
        assert_eq!(parse_span("5-5").unwrap(), TxSpan::new(5, 5));
    }

    #[test]
    fn test_parse_span_rejects_garbage() {
        assert!(parse_span("3").is_err());
        assert!(parse_span("a-b").is_err());
        assert!(parse_span("9-3").is_err());
        assert!(parse_span("3-4-5").is_err());
    }

    #[test]
    fn test_parse_refs_rejects_garbage() {
        assert!(parse_refs("input_tx_refs", "1+2").is_err());
        assert!(parse_refs("input_tx_refs", "1+2+3+4").is_err());
        assert!(parse_refs("input_tx_refs", "x+2+3").is_err());
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        let mut bytes = encode_block(&sample_block(None)).unwrap();
        bytes.push(0);
        assert!(decode_block(&bytes).is_err());
    }
}
