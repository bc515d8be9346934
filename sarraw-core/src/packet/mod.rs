//! Space packets of the data file.
//!
//! A packet is a 6-byte [`PrimaryHeader`], a 62-byte [`SecondaryHeader`] and
//! the radar user data. The primary header's data length field covers the
//! secondary header and user data and is stored minus one.
//!
//! # Example
//!
//! ```rust
//! use sarraw_core::packet::{Packet, HEADERS_SIZE};
//!
//! let mut bytes = vec![0u8; HEADERS_SIZE + 4];
//! bytes[4..6].copy_from_slice(&(62u16 + 4 - 1).to_be_bytes());
//!
//! let packet = Packet::from_bytes(&bytes).unwrap();
//! assert_eq!(packet.user_data.len(), 4);
//! assert_eq!(packet.total_size, 72);
//! ```

pub mod codes;
pub mod primary;
pub mod secondary;

use serde::Serialize;

use crate::error::DecodeError;

pub use primary::{PrimaryHeader, PrimaryHeaderRaw, PRIMARY_HEADER_SIZE};
pub use secondary::{SecondaryHeader, SecondaryHeaderRaw, SECONDARY_HEADER_SIZE};

/// Both headers together
pub const HEADERS_SIZE: usize = PRIMARY_HEADER_SIZE + SECONDARY_HEADER_SIZE;

/// User data length implied by a primary header, or `None` when the declared
/// data field cannot even hold the secondary header.
pub fn user_data_len(primary: &PrimaryHeader) -> Option<usize> {
    (primary.data_field_length() as usize).checked_sub(SECONDARY_HEADER_SIZE)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Packet {
    pub primary_header: PrimaryHeader,
    pub secondary_header: SecondaryHeader,
    /// Opaque radar samples
    #[serde(skip)]
    pub user_data: Vec<u8>,
    /// Bytes occupied on disk: data length minus one, plus one, plus the
    /// primary header
    pub total_size: u32,
}

impl Packet {
    /// Assemble a packet from decoded headers and its user data.
    pub fn new(
        primary_header: PrimaryHeader,
        secondary_header: SecondaryHeader,
        user_data: Vec<u8>,
    ) -> Self {
        let total_size = primary_header.packet_size();
        Self {
            primary_header,
            secondary_header,
            user_data,
            total_size,
        }
    }

    /// Decode a packet held entirely in `data` (trailing bytes are ignored).
    pub fn from_bytes(data: &[u8]) -> Result<Self, DecodeError> {
        let primary = PrimaryHeader::parse(data)?;
        let secondary = SecondaryHeader::parse(data.get(PRIMARY_HEADER_SIZE..).unwrap_or(&[]))?;
        let len = user_data_len(&primary).ok_or(DecodeError::TooShort {
            expected: SECONDARY_HEADER_SIZE,
            actual: primary.data_field_length() as usize,
        })?;
        let end = HEADERS_SIZE + len;
        if data.len() < end {
            return Err(DecodeError::TooShort {
                expected: end,
                actual: data.len(),
            });
        }
        Ok(Self::new(primary, secondary, data[HEADERS_SIZE..end].to_vec()))
    }

    /// Encode headers and user data. The data length field is written as
    /// stored in the primary header.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADERS_SIZE + self.user_data.len());
        out.extend_from_slice(&self.primary_header.to_bytes());
        out.extend_from_slice(&self.secondary_header.to_bytes());
        out.extend_from_slice(&self.user_data);
        out
    }

    /// Headers as one fixed array, e.g. for hashing or hex dumps
    pub fn header_bytes(&self) -> [u8; HEADERS_SIZE] {
        let mut out = [0u8; HEADERS_SIZE];
        out[..PRIMARY_HEADER_SIZE].copy_from_slice(&self.primary_header.to_bytes());
        out[PRIMARY_HEADER_SIZE..].copy_from_slice(&self.secondary_header.to_bytes());
        out
    }
}
