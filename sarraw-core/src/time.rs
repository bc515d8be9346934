//! Day-segmented timestamps used by the annotation file.
//!
//! Layout (8 bytes, big-endian):
//! - u16: days since the epoch
//! - u32: milliseconds of the day
//! - u16: microseconds within the millisecond
//!
//! The epoch is 2000-01-01T00:00:00 UTC, pinned as a constant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codec::{u16_from_bytes, u32_from_bytes};
use crate::error::DecodeError;

/// On-disk timestamp layout
#[derive(Deserialize, Debug, Copy, Clone)]
#[repr(C, packed)]
pub struct TimeRaw {
    day_count: [u8; 2],
    ms_of_day: [u8; 4],
    us_remainder: [u8; 2],
}

/// Encoded size of a [`Time`]
pub const TIME_SIZE: usize = std::mem::size_of::<TimeRaw>();

/// 2000-01-01T00:00:00Z as Unix milliseconds
pub const EPOCH_2000_UNIX_MS: i64 = 946_684_800_000;

/// Milliseconds per day
pub const MS_PER_DAY: i64 = 86_400_000;

/// Decoded annotation timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Time {
    /// Days since 2000-01-01
    pub day_count: u16,
    /// Milliseconds since the start of the day
    pub ms_of_day: u32,
    /// Sub-millisecond remainder in microseconds, not folded into
    /// [`Time::epoch_millis`]
    pub us_remainder: u16,
}

impl Time {
    pub fn new(day_count: u16, ms_of_day: u32, us_remainder: u16) -> Self {
        Self {
            day_count,
            ms_of_day,
            us_remainder,
        }
    }

    /// Decode a timestamp from the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() < TIME_SIZE {
            return Err(DecodeError::TooShort {
                expected: TIME_SIZE,
                actual: data.len(),
            });
        }
        let raw: TimeRaw = bincode::deserialize(&data[..TIME_SIZE])?;
        Ok(raw.into())
    }

    pub fn to_bytes(&self) -> [u8; TIME_SIZE] {
        let mut buf = [0u8; TIME_SIZE];
        buf[0..2].copy_from_slice(&self.day_count.to_be_bytes());
        buf[2..6].copy_from_slice(&self.ms_of_day.to_be_bytes());
        buf[6..8].copy_from_slice(&self.us_remainder.to_be_bytes());
        buf
    }

    /// Unix time in milliseconds.
    pub fn epoch_millis(&self) -> i64 {
        EPOCH_2000_UNIX_MS + self.day_count as i64 * MS_PER_DAY + self.ms_of_day as i64
    }

    /// Wall-clock view at millisecond resolution.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.epoch_millis())
    }
}

impl From<TimeRaw> for Time {
    fn from(raw: TimeRaw) -> Self {
        Self {
            day_count: u16_from_bytes(raw.day_count),
            ms_of_day: u32_from_bytes(raw.ms_of_day),
            us_remainder: u16_from_bytes(raw.us_remainder),
        }
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.datetime() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
            None => write!(
                f,
                "day {} + {} ms + {} us",
                self.day_count, self.ms_of_day, self.us_remainder
            ),
        }
    }
}
