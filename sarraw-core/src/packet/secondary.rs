//! Instrument secondary header (62 bytes).
//!
//! Fields are decoded in strict byte order. Whole-byte fields are read with
//! the scalar codec; every sub-byte field belongs to one of the
//! [`PackedGroup`] tables below. Spare bits are decoded and kept like any
//! other field, since non-zero spares point at malformed or non-standard
//! downlinks.
//!
//! Widths follow the layout observed in the data, not the nominal instrument
//! document. TX pulse length, PRI, SWST and SWL are full 24-bit fields; rank
//! and TX pulse number are 5 bits. Changing any of these is a format
//! version decision.

use serde::{Deserialize, Serialize};

use super::codes::{BaqMode, Polarisation, SignalType, TestMode};
use crate::codec::{
    u16_from_bytes, u24_from_bytes, u24_to_bytes, u32_from_bytes, BitField, PackedGroup,
};
use crate::error::DecodeError;

/// On-disk secondary header layout. Bytes holding sub-byte fields are kept
/// whole and split through the packed group tables.
#[derive(Deserialize, Debug, Copy, Clone)]
#[repr(C, packed)]
pub struct SecondaryHeaderRaw {
    coarse_time: [u8; 4],
    fine_time: [u8; 2],
    sync_marker: [u8; 4],
    data_take_id: [u8; 4],
    ecc_number: u8,
    test_rx: [u8; 1],
    instrument_configuration_id: [u8; 4],
    data_word_index: u8,
    data_word: [u8; 2],
    space_packet_count: [u8; 4],
    pri_count: [u8; 4],
    baq: [u8; 1],
    baq_block_length: u8,
    spare_byte: u8,
    range_decimation: u8,
    rx_gain: u8,
    tx_ramp_rate: [u8; 2],
    tx_pulse_start_frequency: [u8; 2],
    tx_pulse_length: [u8; 3],
    rank: [u8; 1],
    pri: [u8; 3],
    swst: [u8; 3],
    swl: [u8; 3],
    polarisation: [u8; 1],
    beam: [u8; 2],
    cal: [u8; 1],
    signal: [u8; 1],
    swath_number: u8,
    number_of_quads: [u8; 2],
    filler_octet: u8,
}

pub const SECONDARY_HEADER_SIZE: usize = std::mem::size_of::<SecondaryHeaderRaw>();

/// Expected value of the sync marker
pub const SYNC_MARKER: u32 = 0x352E_F853;

/// Instrument reference frequency used by the timing fields (Hz)
pub const REFERENCE_FREQUENCY_HZ: f64 = 37.534_722_24e6;

// =============================================================================
// Packed bit groups
// =============================================================================

pub const TEST_RX_GROUP: PackedGroup<3> = PackedGroup {
    name: "testModeRxChannel",
    byte_offset: 15,
    byte_len: 1,
    fields: [
        BitField::new("firstSpareBit", 0, 1),
        BitField::new("testMode", 1, 3),
        BitField::new("RXChannelID", 4, 4),
    ],
};

pub const BAQ_GROUP: PackedGroup<2> = PackedGroup {
    name: "baqMode",
    byte_offset: 31,
    byte_len: 1,
    fields: [
        BitField::new("firstSpare3Bit", 0, 3),
        BitField::new("BAQMode", 3, 5),
    ],
};

pub const RANK_GROUP: PackedGroup<2> = PackedGroup {
    name: "rank",
    byte_offset: 43,
    byte_len: 1,
    fields: [
        BitField::new("secondSpare3Bit", 0, 3),
        BitField::new("rank", 3, 5),
    ],
};

pub const POLARISATION_GROUP: PackedGroup<4> = PackedGroup {
    name: "polarisation",
    byte_offset: 53,
    byte_len: 1,
    fields: [
        BitField::new("ssbFlag", 0, 1),
        BitField::new("polarisation", 1, 3),
        BitField::new("temperatureCompensation", 4, 2),
        BitField::new("firstSpare2Bit", 6, 2),
    ],
};

pub const BEAM_GROUP: PackedGroup<3> = PackedGroup {
    name: "beamAddress",
    byte_offset: 54,
    byte_len: 2,
    fields: [
        BitField::new("elevationBeamAddress", 0, 4),
        BitField::new("secondSpare2Bit", 4, 2),
        BitField::new("beamAddress", 6, 10),
    ],
};

pub const CAL_GROUP: PackedGroup<3> = PackedGroup {
    name: "calMode",
    byte_offset: 56,
    byte_len: 1,
    fields: [
        BitField::new("calMode", 0, 2),
        BitField::new("secondSpareBit", 2, 1),
        BitField::new("TXPulseNumber", 3, 5),
    ],
};

pub const SIGNAL_GROUP: PackedGroup<3> = PackedGroup {
    name: "signalType",
    byte_offset: 57,
    byte_len: 1,
    fields: [
        BitField::new("signalType", 0, 4),
        BitField::new("thirdSpare3Bit", 4, 3),
        BitField::new("swap", 7, 1),
    ],
};

/// Every field of the header as (name, bit offset from header start, width),
/// in wire order. The entries tile all 496 bits.
pub const SECONDARY_HEADER_LAYOUT: [BitField; 43] = [
    BitField::new("coarseTime", 0, 32),
    BitField::new("fineTime", 32, 16),
    BitField::new("syncMarker", 48, 32),
    BitField::new("dataTakeID", 80, 32),
    BitField::new("ECCNumber", 112, 8),
    BitField::new("firstSpareBit", 120, 1),
    BitField::new("testMode", 121, 3),
    BitField::new("RXChannelID", 124, 4),
    BitField::new("instrumentConfigurationID", 128, 32),
    BitField::new("dataWordIndex", 160, 8),
    BitField::new("dataWord", 168, 16),
    BitField::new("spacePacketCount", 184, 32),
    BitField::new("priCount", 216, 32),
    BitField::new("firstSpare3Bit", 248, 3),
    BitField::new("BAQMode", 251, 5),
    BitField::new("BAQBlockLength", 256, 8),
    BitField::new("spareByte", 264, 8),
    BitField::new("rangeDecimation", 272, 8),
    BitField::new("RXGain", 280, 8),
    BitField::new("TXRampRate", 288, 16),
    BitField::new("TXPulseStartFrequency", 304, 16),
    BitField::new("TXPulseLength", 320, 24),
    BitField::new("secondSpare3Bit", 344, 3),
    BitField::new("rank", 347, 5),
    BitField::new("PRI", 352, 24),
    BitField::new("SWST", 376, 24),
    BitField::new("SWL", 400, 24),
    BitField::new("ssbFlag", 424, 1),
    BitField::new("polarisation", 425, 3),
    BitField::new("temperatureCompensation", 428, 2),
    BitField::new("firstSpare2Bit", 430, 2),
    BitField::new("elevationBeamAddress", 432, 4),
    BitField::new("secondSpare2Bit", 436, 2),
    BitField::new("beamAddress", 438, 10),
    BitField::new("calMode", 448, 2),
    BitField::new("secondSpareBit", 450, 1),
    BitField::new("TXPulseNumber", 451, 5),
    BitField::new("signalType", 456, 4),
    BitField::new("thirdSpare3Bit", 460, 3),
    BitField::new("swap", 463, 1),
    BitField::new("swathNumber", 464, 8),
    BitField::new("numberOfQuads", 472, 16),
    BitField::new("fillerOctet", 488, 8),
];

// =============================================================================
// Secondary header
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryHeader {
    // Datation service
    pub coarse_time: u32,
    pub fine_time: u16,
    // Fixed ancillary data service
    pub sync_marker: u32,
    pub data_take_id: u32,
    pub ecc_number: u8,
    pub first_spare_bit: u8,
    pub test_mode: u8,
    pub rx_channel_id: u8,
    pub instrument_configuration_id: u32,
    // Sub-commutated ancillary data service
    pub data_word_index: u8,
    pub data_word: u16,
    // Counters service
    pub space_packet_count: u32,
    pub pri_count: u32,
    // Radar configuration support service
    pub first_spare_3bit: u8,
    pub baq_mode: u8,
    pub baq_block_length: u8,
    pub spare_byte: u8,
    pub range_decimation: u8,
    pub rx_gain: u8,
    pub tx_ramp_rate: u16,
    pub tx_pulse_start_frequency: u16,
    pub tx_pulse_length: u32,
    pub second_spare_3bit: u8,
    pub rank: u8,
    pub pri: u32,
    pub swst: u32,
    pub swl: u32,
    pub ssb_flag: u8,
    pub polarisation: u8,
    pub temperature_compensation: u8,
    pub first_spare_2bit: u8,
    pub elevation_beam_address: u8,
    pub second_spare_2bit: u8,
    pub beam_address: u16,
    pub cal_mode: u8,
    pub second_spare_bit: u8,
    pub tx_pulse_number: u8,
    pub signal_type: u8,
    pub third_spare_3bit: u8,
    pub swap: u8,
    pub swath_number: u8,
    // Radar sample count service
    pub number_of_quads: u16,
    pub filler_octet: u8,
}

impl SecondaryHeader {
    /// Decode a secondary header from the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() < SECONDARY_HEADER_SIZE {
            return Err(DecodeError::TooShort {
                expected: SECONDARY_HEADER_SIZE,
                actual: data.len(),
            });
        }
        let raw: SecondaryHeaderRaw = bincode::deserialize(&data[..SECONDARY_HEADER_SIZE])?;
        Ok(raw.into())
    }

    pub fn to_bytes(&self) -> [u8; SECONDARY_HEADER_SIZE] {
        let mut b = [0u8; SECONDARY_HEADER_SIZE];
        b[0..4].copy_from_slice(&self.coarse_time.to_be_bytes());
        b[4..6].copy_from_slice(&self.fine_time.to_be_bytes());
        b[6..10].copy_from_slice(&self.sync_marker.to_be_bytes());
        b[10..14].copy_from_slice(&self.data_take_id.to_be_bytes());
        b[14] = self.ecc_number;
        TEST_RX_GROUP.pack(
            &mut b,
            [
                self.first_spare_bit as u32,
                self.test_mode as u32,
                self.rx_channel_id as u32,
            ],
        );
        b[16..20].copy_from_slice(&self.instrument_configuration_id.to_be_bytes());
        b[20] = self.data_word_index;
        b[21..23].copy_from_slice(&self.data_word.to_be_bytes());
        b[23..27].copy_from_slice(&self.space_packet_count.to_be_bytes());
        b[27..31].copy_from_slice(&self.pri_count.to_be_bytes());
        BAQ_GROUP.pack(&mut b, [self.first_spare_3bit as u32, self.baq_mode as u32]);
        b[32] = self.baq_block_length;
        b[33] = self.spare_byte;
        b[34] = self.range_decimation;
        b[35] = self.rx_gain;
        b[36..38].copy_from_slice(&self.tx_ramp_rate.to_be_bytes());
        b[38..40].copy_from_slice(&self.tx_pulse_start_frequency.to_be_bytes());
        b[40..43].copy_from_slice(&u24_to_bytes(self.tx_pulse_length));
        RANK_GROUP.pack(&mut b, [self.second_spare_3bit as u32, self.rank as u32]);
        b[44..47].copy_from_slice(&u24_to_bytes(self.pri));
        b[47..50].copy_from_slice(&u24_to_bytes(self.swst));
        b[50..53].copy_from_slice(&u24_to_bytes(self.swl));
        POLARISATION_GROUP.pack(
            &mut b,
            [
                self.ssb_flag as u32,
                self.polarisation as u32,
                self.temperature_compensation as u32,
                self.first_spare_2bit as u32,
            ],
        );
        BEAM_GROUP.pack(
            &mut b,
            [
                self.elevation_beam_address as u32,
                self.second_spare_2bit as u32,
                self.beam_address as u32,
            ],
        );
        CAL_GROUP.pack(
            &mut b,
            [
                self.cal_mode as u32,
                self.second_spare_bit as u32,
                self.tx_pulse_number as u32,
            ],
        );
        SIGNAL_GROUP.pack(
            &mut b,
            [
                self.signal_type as u32,
                self.third_spare_3bit as u32,
                self.swap as u32,
            ],
        );
        b[58] = self.swath_number;
        b[59..61].copy_from_slice(&self.number_of_quads.to_be_bytes());
        b[61] = self.filler_octet;
        b
    }

    /// Field values in [`SECONDARY_HEADER_LAYOUT`] order.
    pub fn field_values(&self) -> [(&'static str, u32); 43] {
        let values = [
            self.coarse_time,
            self.fine_time as u32,
            self.sync_marker,
            self.data_take_id,
            self.ecc_number as u32,
            self.first_spare_bit as u32,
            self.test_mode as u32,
            self.rx_channel_id as u32,
            self.instrument_configuration_id,
            self.data_word_index as u32,
            self.data_word as u32,
            self.space_packet_count,
            self.pri_count,
            self.first_spare_3bit as u32,
            self.baq_mode as u32,
            self.baq_block_length as u32,
            self.spare_byte as u32,
            self.range_decimation as u32,
            self.rx_gain as u32,
            self.tx_ramp_rate as u32,
            self.tx_pulse_start_frequency as u32,
            self.tx_pulse_length,
            self.second_spare_3bit as u32,
            self.rank as u32,
            self.pri,
            self.swst,
            self.swl,
            self.ssb_flag as u32,
            self.polarisation as u32,
            self.temperature_compensation as u32,
            self.first_spare_2bit as u32,
            self.elevation_beam_address as u32,
            self.second_spare_2bit as u32,
            self.beam_address as u32,
            self.cal_mode as u32,
            self.second_spare_bit as u32,
            self.tx_pulse_number as u32,
            self.signal_type as u32,
            self.third_spare_3bit as u32,
            self.swap as u32,
            self.swath_number as u32,
            self.number_of_quads as u32,
            self.filler_octet as u32,
        ];
        let mut out = [("", 0u32); 43];
        for (slot, (field, value)) in out
            .iter_mut()
            .zip(SECONDARY_HEADER_LAYOUT.iter().zip(values))
        {
            *slot = (field.name, value);
        }
        out
    }

    pub fn has_valid_sync_marker(&self) -> bool {
        self.sync_marker == SYNC_MARKER
    }

    /// True if any reserved bit or byte is set.
    pub fn has_nonzero_spares(&self) -> bool {
        self.first_spare_bit != 0
            || self.first_spare_3bit != 0
            || self.spare_byte != 0
            || self.second_spare_3bit != 0
            || self.first_spare_2bit != 0
            || self.second_spare_2bit != 0
            || self.second_spare_bit != 0
            || self.third_spare_3bit != 0
    }

    pub fn test_mode(&self) -> TestMode {
        TestMode::from_value(self.test_mode)
    }

    pub fn baq_mode(&self) -> BaqMode {
        BaqMode::from_value(self.baq_mode)
    }

    pub fn polarisation(&self) -> Polarisation {
        Polarisation::from_value(self.polarisation)
    }

    pub fn signal_type(&self) -> SignalType {
        SignalType::from_value(self.signal_type)
    }

    /// Receiver gain in dB (0.5 dB steps, attenuation)
    pub fn rx_gain_db(&self) -> f64 {
        -0.5 * self.rx_gain as f64
    }

    pub fn pri_seconds(&self) -> f64 {
        self.pri as f64 / REFERENCE_FREQUENCY_HZ
    }

    pub fn swst_seconds(&self) -> f64 {
        self.swst as f64 / REFERENCE_FREQUENCY_HZ
    }

    pub fn swl_seconds(&self) -> f64 {
        self.swl as f64 / REFERENCE_FREQUENCY_HZ
    }

    /// Complex samples in the echo window (two per quad)
    pub fn number_of_samples(&self) -> u32 {
        2 * self.number_of_quads as u32
    }
}

impl From<SecondaryHeaderRaw> for SecondaryHeader {
    fn from(raw: SecondaryHeaderRaw) -> Self {
        let [first_spare_bit, test_mode, rx_channel_id] =
            TEST_RX_GROUP.split(raw.test_rx[0] as u32);
        let [first_spare_3bit, baq_mode] = BAQ_GROUP.split(raw.baq[0] as u32);
        let [second_spare_3bit, rank] = RANK_GROUP.split(raw.rank[0] as u32);
        let [ssb_flag, polarisation, temperature_compensation, first_spare_2bit] =
            POLARISATION_GROUP.split(raw.polarisation[0] as u32);
        let [elevation_beam_address, second_spare_2bit, beam_address] =
            BEAM_GROUP.split(u16_from_bytes(raw.beam) as u32);
        let [cal_mode, second_spare_bit, tx_pulse_number] = CAL_GROUP.split(raw.cal[0] as u32);
        let [signal_type, third_spare_3bit, swap] = SIGNAL_GROUP.split(raw.signal[0] as u32);

        Self {
            coarse_time: u32_from_bytes(raw.coarse_time),
            fine_time: u16_from_bytes(raw.fine_time),
            sync_marker: u32_from_bytes(raw.sync_marker),
            data_take_id: u32_from_bytes(raw.data_take_id),
            ecc_number: raw.ecc_number,
            first_spare_bit: first_spare_bit as u8,
            test_mode: test_mode as u8,
            rx_channel_id: rx_channel_id as u8,
            instrument_configuration_id: u32_from_bytes(raw.instrument_configuration_id),
            data_word_index: raw.data_word_index,
            data_word: u16_from_bytes(raw.data_word),
            space_packet_count: u32_from_bytes(raw.space_packet_count),
            pri_count: u32_from_bytes(raw.pri_count),
            first_spare_3bit: first_spare_3bit as u8,
            baq_mode: baq_mode as u8,
            baq_block_length: raw.baq_block_length,
            spare_byte: raw.spare_byte,
            range_decimation: raw.range_decimation,
            rx_gain: raw.rx_gain,
            tx_ramp_rate: u16_from_bytes(raw.tx_ramp_rate),
            tx_pulse_start_frequency: u16_from_bytes(raw.tx_pulse_start_frequency),
            tx_pulse_length: u24_from_bytes(raw.tx_pulse_length),
            second_spare_3bit: second_spare_3bit as u8,
            rank: rank as u8,
            pri: u24_from_bytes(raw.pri),
            swst: u24_from_bytes(raw.swst),
            swl: u24_from_bytes(raw.swl),
            ssb_flag: ssb_flag as u8,
            polarisation: polarisation as u8,
            temperature_compensation: temperature_compensation as u8,
            first_spare_2bit: first_spare_2bit as u8,
            elevation_beam_address: elevation_beam_address as u8,
            second_spare_2bit: second_spare_2bit as u8,
            beam_address: beam_address as u16,
            cal_mode: cal_mode as u8,
            second_spare_bit: second_spare_bit as u8,
            tx_pulse_number: tx_pulse_number as u8,
            signal_type: signal_type as u8,
            third_spare_3bit: third_spare_3bit as u8,
            swap: swap as u8,
            swath_number: raw.swath_number,
            number_of_quads: u16_from_bytes(raw.number_of_quads),
            filler_octet: raw.filler_octet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Read a field of up to 32 bits at an absolute bit offset, bit by bit.
    fn read_bits(data: &[u8], field: &BitField) -> u32 {
        (field.offset..field.offset + field.width).fold(0u32, |acc, bit| {
            let byte = data[(bit / 8) as usize];
            (acc << 1) | ((byte >> (7 - bit % 8)) & 1) as u32
        })
    }

    fn sample_bytes() -> [u8; SECONDARY_HEADER_SIZE] {
        let mut b = [0u8; SECONDARY_HEADER_SIZE];
        for (i, byte) in b.iter_mut().enumerate() {
            *byte = (i as u8).wrapping_mul(37).wrapping_add(11);
        }
        b[6..10].copy_from_slice(&SYNC_MARKER.to_be_bytes());
        b
    }

    #[test]
    fn test_layout_tiles_every_bit() {
        let mut cursor = 0;
        for field in SECONDARY_HEADER_LAYOUT.iter() {
            assert_eq!(field.offset, cursor, "gap or overlap before {}", field.name);
            assert!(field.width > 0 && field.width <= 32);
            cursor += field.width;
        }
        assert_eq!(cursor as usize, SECONDARY_HEADER_SIZE * 8);
    }

    #[test]
    fn test_groups_are_partitions() {
        assert!(TEST_RX_GROUP.is_partition());
        assert!(BAQ_GROUP.is_partition());
        assert!(RANK_GROUP.is_partition());
        assert!(POLARISATION_GROUP.is_partition());
        assert!(BEAM_GROUP.is_partition());
        assert!(CAL_GROUP.is_partition());
        assert!(SIGNAL_GROUP.is_partition());
    }

    #[test]
    fn test_groups_agree_with_layout() {
        fn check<const N: usize>(group: &PackedGroup<N>) {
            for field in group.fields.iter() {
                let absolute = group.byte_offset as u32 * 8 + field.offset;
                let entry = SECONDARY_HEADER_LAYOUT
                    .iter()
                    .find(|f| f.name == field.name)
                    .unwrap();
                assert_eq!(entry.offset, absolute, "{}", field.name);
                assert_eq!(entry.width, field.width, "{}", field.name);
            }
        }
        check(&TEST_RX_GROUP);
        check(&BAQ_GROUP);
        check(&RANK_GROUP);
        check(&POLARISATION_GROUP);
        check(&BEAM_GROUP);
        check(&CAL_GROUP);
        check(&SIGNAL_GROUP);
    }

    #[test]
    fn test_raw_layout_matches_groups() {
        use std::mem::offset_of;

        assert_eq!(SECONDARY_HEADER_SIZE, 62);
        assert_eq!(offset_of!(SecondaryHeaderRaw, test_rx), TEST_RX_GROUP.byte_offset);
        assert_eq!(offset_of!(SecondaryHeaderRaw, baq), BAQ_GROUP.byte_offset);
        assert_eq!(offset_of!(SecondaryHeaderRaw, rank), RANK_GROUP.byte_offset);
        assert_eq!(
            offset_of!(SecondaryHeaderRaw, polarisation),
            POLARISATION_GROUP.byte_offset
        );
        assert_eq!(offset_of!(SecondaryHeaderRaw, beam), BEAM_GROUP.byte_offset);
        assert_eq!(offset_of!(SecondaryHeaderRaw, cal), CAL_GROUP.byte_offset);
        assert_eq!(offset_of!(SecondaryHeaderRaw, signal), SIGNAL_GROUP.byte_offset);
        assert_eq!(offset_of!(SecondaryHeaderRaw, swath_number), 58);
    }

    #[test]
    fn test_decode_matches_layout_table() {
        let bytes = sample_bytes();
        let header = SecondaryHeader::parse(&bytes).unwrap();
        for (field, (name, value)) in SECONDARY_HEADER_LAYOUT.iter().zip(header.field_values()) {
            assert_eq!(field.name, name);
            assert_eq!(read_bits(&bytes, field), value, "{}", name);
        }
    }

    #[test]
    fn test_roundtrip() {
        let bytes = sample_bytes();
        assert_eq!(SecondaryHeader::parse(&bytes).unwrap().to_bytes(), bytes);

        let ones = [0xFF; SECONDARY_HEADER_SIZE];
        assert_eq!(SecondaryHeader::parse(&ones).unwrap().to_bytes(), ones);
    }

    #[test]
    fn test_sub_byte_fields() {
        let mut b = [0u8; SECONDARY_HEADER_SIZE];
        b[15] = 0b1_110_0101;
        b[31] = 0b101_01100;
        b[43] = 0b010_10011;
        b[53] = 0b1_110_10_01;
        b[54] = 0b1001_10_11;
        b[55] = 0b0000_0001;
        b[56] = 0b10_1_00111;
        b[57] = 0b0000_101_1;

        let h = SecondaryHeader::parse(&b).unwrap();
        assert_eq!((h.first_spare_bit, h.test_mode, h.rx_channel_id), (1, 0b110, 0b0101));
        assert_eq!((h.first_spare_3bit, h.baq_mode), (0b101, 12));
        assert_eq!(h.baq_mode(), BaqMode::FdbaqMode0);
        assert_eq!((h.second_spare_3bit, h.rank), (0b010, 0b10011));
        assert_eq!(
            (h.ssb_flag, h.polarisation, h.temperature_compensation, h.first_spare_2bit),
            (1, 0b110, 0b10, 0b01)
        );
        assert_eq!(h.polarisation(), Polarisation::VV);
        assert_eq!(
            (h.elevation_beam_address, h.second_spare_2bit, h.beam_address),
            (0b1001, 0b10, 0b11_0000_0001)
        );
        assert_eq!((h.cal_mode, h.second_spare_bit, h.tx_pulse_number), (0b10, 1, 0b00111));
        assert_eq!((h.signal_type, h.third_spare_3bit, h.swap), (0, 0b101, 1));
        assert_eq!(h.signal_type(), SignalType::Echo);
        assert!(h.has_nonzero_spares());
    }

    #[test]
    fn test_24_bit_fields() {
        let mut b = [0u8; SECONDARY_HEADER_SIZE];
        b[40..43].copy_from_slice(&[0x00, 0x06, 0x5A]);
        b[44..47].copy_from_slice(&[0x00, 0xA6, 0x21]);
        b[47..50].copy_from_slice(&[0x00, 0x1C, 0x00]);
        b[50..53].copy_from_slice(&[0x00, 0x5A, 0x7C]);
        let h = SecondaryHeader::parse(&b).unwrap();
        assert_eq!(h.tx_pulse_length, 0x065A);
        assert_eq!(h.pri, 0xA621);
        assert_eq!(h.swst, 0x1C00);
        assert_eq!(h.swl, 0x5A7C);
        assert!((h.pri_seconds() - 0xA621 as f64 / REFERENCE_FREQUENCY_HZ).abs() < 1e-15);
        assert!(!h.has_nonzero_spares());
    }

    #[test]
    fn test_diagnostics() {
        let h = SecondaryHeader::parse(&sample_bytes()).unwrap();
        assert!(h.has_valid_sync_marker());
        let zeros = SecondaryHeader::parse(&[0u8; SECONDARY_HEADER_SIZE]).unwrap();
        assert!(!zeros.has_valid_sync_marker());

        let mut b = [0u8; SECONDARY_HEADER_SIZE];
        b[35] = 8;
        b[59..61].copy_from_slice(&[0x01, 0x00]);
        let h = SecondaryHeader::parse(&b).unwrap();
        assert_eq!(h.rx_gain_db(), -4.0);
        assert_eq!(h.number_of_samples(), 512);
    }

    #[test]
    fn test_decode_slice_too_short() {
        assert_eq!(
            SecondaryHeader::parse(&[0u8; 61]),
            Err(DecodeError::TooShort {
                expected: 62,
                actual: 61
            })
        );
        assert!(SecondaryHeader::parse(&[0u8; 70]).is_ok());
    }
}
