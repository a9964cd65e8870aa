//! Error types for the explorer-core crate.

use std::fmt;

/// Errors produced while encoding or decoding index records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CodecError {
    /// Binary serialization failed.
    EncodeFailed(String),
    /// Binary deserialization failed.
    DecodeFailed(String),
    /// A delimited field inside a record did not match its format.
    MalformedField {
        /// Name of the offending field.
        field: &'static str,
        /// The raw field content.
        value: String,
    },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::EncodeFailed(e) => write!(f, "encode failed: {}", e),
            CodecError::DecodeFailed(e) => write!(f, "decode failed: {}", e),
            CodecError::MalformedField { field, value } => {
                write!(f, "malformed field {}: {:?}", field, value)
            }
        }
    }
}

impl std::error::Error for CodecError {}
