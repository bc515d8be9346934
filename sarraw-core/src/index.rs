//! Index file records (`<prefix>-index.dat`).
//!
//! Each record locates one packet (block) in the data file:
//!
//! | Offset | Size | Field              |
//! |--------|------|--------------------|
//! | 0      | 8    | date and time (f64)|
//! | 8      | 8    | delta time (f64)   |
//! | 16     | 4    | delta size         |
//! | 20     | 4    | data units offset  |
//! | 24     | 8    | byte offset        |
//! | 32     | 1    | variable size flag |
//! | 33     | 3    | spare (u24)        |
//!
//! The spare field is carried as a u32 whose high byte is always zero.

use serde::{Deserialize, Serialize};

use crate::codec::{f64_from_bytes, u24_from_bytes, u24_to_bytes, u32_from_bytes, u64_from_bytes};
use crate::error::DecodeError;

/// On-disk index record layout
#[derive(Deserialize, Debug, Copy, Clone)]
#[repr(C, packed)]
pub struct IndexRecordRaw {
    date_and_time: [u8; 8],
    delta_time: [u8; 8],
    delta_size: [u8; 4],
    data_units_offset: [u8; 4],
    byte_offset: [u8; 8],
    variable_size_flag: u8,
    spare: [u8; 3],
}

/// Index record size in bytes
pub const INDEX_RECORD_SIZE: usize = std::mem::size_of::<IndexRecordRaw>();

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PacketIndexEntry {
    pub date_and_time: f64,
    pub delta_time: f64,
    pub delta_size: u32,
    pub data_units_offset: u32,
    /// Seek position of the packet in the data file
    pub byte_offset: u64,
    pub variable_size_flag: u8,
    pub spare: u32,
}

impl PacketIndexEntry {
    /// Decode one record from the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() < INDEX_RECORD_SIZE {
            return Err(DecodeError::TooShort {
                expected: INDEX_RECORD_SIZE,
                actual: data.len(),
            });
        }
        let raw: IndexRecordRaw = bincode::deserialize(&data[..INDEX_RECORD_SIZE])?;
        Ok(raw.into())
    }

    /// Encode the record. Only the low 24 bits of `spare` are stored.
    pub fn to_bytes(&self) -> [u8; INDEX_RECORD_SIZE] {
        let mut buf = [0u8; INDEX_RECORD_SIZE];
        buf[0..8].copy_from_slice(&self.date_and_time.to_bits().to_be_bytes());
        buf[8..16].copy_from_slice(&self.delta_time.to_bits().to_be_bytes());
        buf[16..20].copy_from_slice(&self.delta_size.to_be_bytes());
        buf[20..24].copy_from_slice(&self.data_units_offset.to_be_bytes());
        buf[24..32].copy_from_slice(&self.byte_offset.to_be_bytes());
        buf[32] = self.variable_size_flag;
        buf[33..36].copy_from_slice(&u24_to_bytes(self.spare));
        buf
    }

    pub fn is_variable_size(&self) -> bool {
        self.variable_size_flag != 0
    }
}

impl From<IndexRecordRaw> for PacketIndexEntry {
    fn from(raw: IndexRecordRaw) -> Self {
        Self {
            date_and_time: f64_from_bytes(raw.date_and_time),
            delta_time: f64_from_bytes(raw.delta_time),
            delta_size: u32_from_bytes(raw.delta_size),
            data_units_offset: u32_from_bytes(raw.data_units_offset),
            byte_offset: u64_from_bytes(raw.byte_offset),
            variable_size_flag: raw.variable_size_flag,
            spare: u24_from_bytes(raw.spare),
        }
    }
}

/// Decode a whole index file.
pub fn decode_indices(data: &[u8]) -> Result<Vec<PacketIndexEntry>, DecodeError> {
    if data.len() % INDEX_RECORD_SIZE != 0 {
        return Err(DecodeError::TruncatedRecord {
            record: "index",
            len: data.len(),
            record_size: INDEX_RECORD_SIZE,
        });
    }

    data.chunks_exact(INDEX_RECORD_SIZE)
        .map(PacketIndexEntry::parse)
        .collect()
}
