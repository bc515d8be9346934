//! Space packet primary header (6 bytes).
//!
//! ```text
//!  byte 0          byte 1          byte 2..3          byte 4..5
//! ┌───┬───────────────────────┬──────────────────┬──────────────────────┐
//! │ver│  packet identifier    │ sequence control │ data length minus 1  │
//! │3b │  13b (type, sh, APID) │ 16b (flags, cnt) │ 16b                  │
//! └───┴───────────────────────┴──────────────────┴──────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use super::codes::{PacketType, SequenceFlags};
use crate::codec::{bitfield, u16_from_bytes, BitField, PackedGroup};
use crate::error::DecodeError;

/// On-disk primary header layout
#[derive(Deserialize, Debug, Copy, Clone)]
#[repr(C, packed)]
pub struct PrimaryHeaderRaw {
    packet_id: [u8; 2],
    sequence_control: [u8; 2],
    data_length: [u8; 2],
}

pub const PRIMARY_HEADER_SIZE: usize = std::mem::size_of::<PrimaryHeaderRaw>();

/// Bytes 0..2: version number and packet identifier
pub const PACKET_ID_GROUP: PackedGroup<2> = PackedGroup {
    name: "packetId",
    byte_offset: 0,
    byte_len: 2,
    fields: [
        BitField::new("versionNumber", 0, 3),
        BitField::new("packetIdentifier", 3, 13),
    ],
};

/// Sub-fields of the 13-bit packet identifier
pub const PACKET_TYPE: BitField = BitField::new("packetType", 0, 1);
pub const SECONDARY_HEADER_FLAG: BitField = BitField::new("secondaryHeaderFlag", 1, 1);
pub const APID: BitField = BitField::new("apid", 2, 11);

/// Sub-fields of the 16-bit sequence control word
pub const SEQUENCE_FLAGS: BitField = BitField::new("sequenceFlags", 0, 2);
pub const SEQUENCE_COUNT: BitField = BitField::new("sequenceCount", 2, 14);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryHeader {
    /// 3 bits
    pub version_number: u8,
    /// 13 bits: packet type, secondary header flag and APID
    pub packet_identifier: u16,
    pub sequence_control: u16,
    /// Packet data field length minus one
    pub data_length_minus1: u16,
}

impl PrimaryHeader {
    /// Decode a primary header from the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() < PRIMARY_HEADER_SIZE {
            return Err(DecodeError::TooShort {
                expected: PRIMARY_HEADER_SIZE,
                actual: data.len(),
            });
        }
        let raw: PrimaryHeaderRaw = bincode::deserialize(&data[..PRIMARY_HEADER_SIZE])?;
        Ok(raw.into())
    }

    pub fn to_bytes(&self) -> [u8; PRIMARY_HEADER_SIZE] {
        let mut buf = [0u8; PRIMARY_HEADER_SIZE];
        PACKET_ID_GROUP.pack(
            &mut buf,
            [self.version_number as u32, self.packet_identifier as u32],
        );
        buf[2..4].copy_from_slice(&self.sequence_control.to_be_bytes());
        buf[4..6].copy_from_slice(&self.data_length_minus1.to_be_bytes());
        buf
    }

    fn identifier_field(&self, field: BitField) -> u16 {
        bitfield(self.packet_identifier as u32, 13, field.offset, field.width) as u16
    }

    fn sequence_field(&self, field: BitField) -> u16 {
        bitfield(self.sequence_control as u32, 16, field.offset, field.width) as u16
    }

    pub fn packet_type(&self) -> PacketType {
        PacketType::from_value(self.identifier_field(PACKET_TYPE))
    }

    pub fn has_secondary_header(&self) -> bool {
        self.identifier_field(SECONDARY_HEADER_FLAG) == 1
    }

    /// Application process identifier (low 11 bits of the identifier)
    pub fn apid(&self) -> u16 {
        self.identifier_field(APID)
    }

    pub fn sequence_flags(&self) -> SequenceFlags {
        SequenceFlags::from_value(self.sequence_field(SEQUENCE_FLAGS))
    }

    pub fn sequence_count(&self) -> u16 {
        self.sequence_field(SEQUENCE_COUNT)
    }

    /// Length of the packet data field (secondary header + user data)
    pub fn data_field_length(&self) -> u32 {
        self.data_length_minus1 as u32 + 1
    }

    /// Length of the whole packet including this header
    pub fn packet_size(&self) -> u32 {
        self.data_field_length() + PRIMARY_HEADER_SIZE as u32
    }
}

impl From<PrimaryHeaderRaw> for PrimaryHeader {
    fn from(raw: PrimaryHeaderRaw) -> Self {
        let [version_number, packet_identifier] =
            PACKET_ID_GROUP.split(u16_from_bytes(raw.packet_id) as u32);
        Self {
            version_number: version_number as u8,
            packet_identifier: packet_identifier as u16,
            sequence_control: u16_from_bytes(raw.sequence_control),
            data_length_minus1: u16_from_bytes(raw.data_length),
        }
    }
}
