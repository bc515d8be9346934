//! Annotation file records (`<prefix>-annot.dat`).
//!
//! One fixed-size record per downlinked packet, in downlink order:
//!
//! | Offset | Size | Field                |
//! |--------|------|----------------------|
//! | 0      | 8    | sensing time         |
//! | 8      | 8    | downlink time        |
//! | 16     | 2    | packet length        |
//! | 18     | 2    | frame count          |
//! | 20     | 2    | missing frame count  |
//! | 22     | 1    | CRC flag             |
//! | 23     | 1    | VCID                 |
//! | 24     | 1    | channel              |
//! | 25     | 1    | spare                |

use serde::{Deserialize, Serialize};

use crate::codec::u16_from_bytes;
use crate::error::DecodeError;
use crate::time::{Time, TimeRaw};

/// On-disk annotation record layout
#[derive(Deserialize, Debug, Copy, Clone)]
#[repr(C, packed)]
pub struct AnnotationRecordRaw {
    sensing_time: TimeRaw,
    downlink_time: TimeRaw,
    packet_length: [u8; 2],
    frame_count: [u8; 2],
    missing_frame_count: [u8; 2],
    crc_flag: u8,
    vcid: u8,
    channel: u8,
    spare: u8,
}

/// Annotation record size in bytes
pub const ANNOTATION_RECORD_SIZE: usize = std::mem::size_of::<AnnotationRecordRaw>();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PacketAnnotation {
    pub sensing_time: Time,
    pub downlink_time: Time,
    pub packet_length: u16,
    pub frame_count: u16,
    pub missing_frame_count: u16,
    pub crc_flag: u8,
    pub vcid: u8,
    pub channel: u8,
    pub spare: u8,
}

impl PacketAnnotation {
    /// Decode one record from the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() < ANNOTATION_RECORD_SIZE {
            return Err(DecodeError::TooShort {
                expected: ANNOTATION_RECORD_SIZE,
                actual: data.len(),
            });
        }
        let raw: AnnotationRecordRaw = bincode::deserialize(&data[..ANNOTATION_RECORD_SIZE])?;
        Ok(raw.into())
    }

    pub fn to_bytes(&self) -> [u8; ANNOTATION_RECORD_SIZE] {
        let mut buf = [0u8; ANNOTATION_RECORD_SIZE];
        buf[0..8].copy_from_slice(&self.sensing_time.to_bytes());
        buf[8..16].copy_from_slice(&self.downlink_time.to_bytes());
        buf[16..18].copy_from_slice(&self.packet_length.to_be_bytes());
        buf[18..20].copy_from_slice(&self.frame_count.to_be_bytes());
        buf[20..22].copy_from_slice(&self.missing_frame_count.to_be_bytes());
        buf[22] = self.crc_flag;
        buf[23] = self.vcid;
        buf[24] = self.channel;
        buf[25] = self.spare;
        buf
    }

    /// Downlink latency in milliseconds (downlink minus sensing).
    pub fn latency_ms(&self) -> i64 {
        self.downlink_time.epoch_millis() - self.sensing_time.epoch_millis()
    }
}

impl From<AnnotationRecordRaw> for PacketAnnotation {
    fn from(raw: AnnotationRecordRaw) -> Self {
        Self {
            sensing_time: raw.sensing_time.into(),
            downlink_time: raw.downlink_time.into(),
            packet_length: u16_from_bytes(raw.packet_length),
            frame_count: u16_from_bytes(raw.frame_count),
            missing_frame_count: u16_from_bytes(raw.missing_frame_count),
            crc_flag: raw.crc_flag,
            vcid: raw.vcid,
            channel: raw.channel,
            spare: raw.spare,
        }
    }
}

/// Decode a whole annotation file.
///
/// The buffer must hold a whole number of records; trailing bytes are an
/// error rather than being dropped.
pub fn decode_annotations(data: &[u8]) -> Result<Vec<PacketAnnotation>, DecodeError> {
    if data.len() % ANNOTATION_RECORD_SIZE != 0 {
        return Err(DecodeError::TruncatedRecord {
            record: "annotation",
            len: data.len(),
            record_size: ANNOTATION_RECORD_SIZE,
        });
    }

    data.chunks_exact(ANNOTATION_RECORD_SIZE)
        .map(PacketAnnotation::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: [u8; ANNOTATION_RECORD_SIZE] = [
        0x00, 0x01, 0x00, 0x00, 0x00, 0x64, 0x00, 0x05, // sensing: day 1, 100 ms, 5 us
        0x00, 0x02, 0x00, 0x00, 0x00, 0xC8, 0x00, 0x0A, // downlink: day 2, 200 ms, 10 us
        0x03, 0xE8, // packet length = 1000
        0x00, 0x03, // frames
        0x00, 0x00, // missing frames
        1, 3, 7, 0, // crc, vcid, channel, spare
    ];

    #[test]
    fn test_record_size() {
        assert_eq!(ANNOTATION_RECORD_SIZE, 26);
    }

    #[test]
    fn test_decode_record() {
        let a = PacketAnnotation::parse(&RECORD).unwrap();
        assert_eq!(a.sensing_time, Time::new(1, 100, 5));
        assert_eq!(a.downlink_time, Time::new(2, 200, 10));
        assert_eq!(a.packet_length, 1000);
        assert_eq!(a.frame_count, 3);
        assert_eq!(a.missing_frame_count, 0);
        assert_eq!(a.crc_flag, 1);
        assert_eq!(a.vcid, 3);
        assert_eq!(a.channel, 7);
        assert_eq!(a.spare, 0);
        assert_eq!(a.latency_ms(), 86_400_000 + 100);
    }

    #[test]
    fn test_decode_file_and_reencode() {
        let mut second = RECORD;
        second[17] = 0xE9;
        second[25] = 0xAA;
        let data = [RECORD, second].concat();

        let records = decode_annotations(&data).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].packet_length, 1001);
        assert_eq!(records[1].spare, 0xAA);

        let reencoded: Vec<u8> = records.iter().flat_map(|r| r.to_bytes()).collect();
        assert_eq!(reencoded, data);
    }

    #[test]
    fn test_parse_short_record() {
        assert_eq!(
            PacketAnnotation::parse(&RECORD[..20]),
            Err(DecodeError::TooShort {
                expected: ANNOTATION_RECORD_SIZE,
                actual: 20
            })
        );
    }

    #[test]
    fn test_empty_file() {
        assert!(decode_annotations(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_truncated_file() {
        let data = [&RECORD[..], &RECORD[..3]].concat();
        assert_eq!(
            decode_annotations(&data),
            Err(DecodeError::TruncatedRecord {
                record: "annotation",
                len: ANNOTATION_RECORD_SIZE + 3,
                record_size: ANNOTATION_RECORD_SIZE,
            })
        );
    }
}
