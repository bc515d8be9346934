//! Errors raised by file access, traversal and the product lifecycle

use std::io;

use sarraw_core::packet::SECONDARY_HEADER_SIZE;
use sarraw_core::DecodeError;
use thiserror::Error;

use crate::product::ProductState;

#[derive(Error, Debug)]
pub enum SarError {
    /// Missing or unreadable file, passed through unchanged
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Record file decoding failed (e.g. truncated record)
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Fewer bytes available than a header or user data read asked for
    #[error("Short read at offset {offset}: expected {expected} bytes, got {actual}")]
    ShortRead {
        offset: u64,
        expected: usize,
        actual: usize,
    },

    /// Declared data field too small to hold the secondary header
    #[error(
        "Invalid packet at offset {offset}: data field of {} bytes cannot hold the {} byte secondary header",
        *data_length_minus1 as u32 + 1,
        SECONDARY_HEADER_SIZE
    )]
    InvalidPacketLength {
        offset: u64,
        data_length_minus1: u16,
    },

    /// Sequence index outside the index file
    #[error("Packet index {index} out of range (product has {len} indexed packets)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Operation not allowed in the current lifecycle state
    #[error("Cannot {operation} while the product is {state}")]
    InvalidState {
        state: ProductState,
        operation: &'static str,
    },

    /// Configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for SarError {
    fn from(e: serde_json::Error) -> Self {
        SarError::Config(e.to_string())
    }
}

impl SarError {
    /// True for errors caused by data that ends early or is cut mid-record.
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            SarError::ShortRead { .. } | SarError::Decode(DecodeError::TruncatedRecord { .. })
        )
    }
}
