//! Error types for record and header decoding

use thiserror::Error;

/// Errors that can occur when decoding SAR raw product buffers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Buffer length is not a whole number of fixed-size records
    #[error("Truncated {record} file: {len} bytes is not a multiple of the {record_size} byte record size")]
    TruncatedRecord {
        record: &'static str,
        len: usize,
        record_size: usize,
    },

    /// Buffer is too short to contain the requested structure
    #[error("Buffer too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },

    /// Raw record layout could not be deserialized
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),
}

impl From<bincode::Error> for DecodeError {
    fn from(e: bincode::Error) -> Self {
        DecodeError::DeserializationFailed(e.to_string())
    }
}

impl DecodeError {
    /// Number of dangling bytes after the last complete record, if truncated.
    pub fn trailing_bytes(&self) -> Option<usize> {
        match self {
            DecodeError::TruncatedRecord {
                len, record_size, ..
            } => Some(len % record_size),
            DecodeError::TooShort { .. } | DecodeError::DeserializationFailed(_) => None,
        }
    }
}
