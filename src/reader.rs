//! Space packet traversal over a [`DataSource`].
//!
//! A packet is read in two steps: the 68 header bytes first, then exactly the
//! user data length the primary header declares.
//!
//! ```text
//!  offset
//!    │
//!    ▼
//!    ┌─────────┬─────────────┬────────────────────┬─────────┐
//!    │ primary │  secondary  │     user data      │ padding │ next packet ...
//!    │   6 B   │    62 B     │  N + 1 - 62 bytes  │         │
//!    └─────────┴─────────────┴────────────────────┴─────────┘
//!    ◄──────────── total_size = N + 1 + 6 ──────────►
//! ```
//!
//! Sequential traversal moves from one packet to the next by `total_size`
//! plus a configurable padding (one byte by default), and stops once the
//! offset reaches the end of the source.

use log::{debug, trace, warn};
use sarraw_core::packet::{
    user_data_len, Packet, PrimaryHeader, SecondaryHeader, HEADERS_SIZE, PRIMARY_HEADER_SIZE,
};

use crate::config::DEFAULT_INTER_PACKET_PADDING;
use crate::error::SarError;
use crate::source::DataSource;

/// Read exactly `len` bytes at `offset` or fail with [`SarError::ShortRead`].
pub fn read_exact_at<S: DataSource + ?Sized>(
    source: &S,
    offset: u64,
    len: usize,
) -> Result<Vec<u8>, SarError> {
    let mut buf = vec![0u8; len];
    let actual = source.read_at(offset, &mut buf)?;
    if actual < len {
        return Err(SarError::ShortRead {
            offset,
            expected: len,
            actual,
        });
    }
    Ok(buf)
}

#[derive(Debug)]
pub struct PacketReader<S> {
    source: S,
    padding: u64,
}

impl<S: DataSource> PacketReader<S> {
    pub fn new(source: S) -> Self {
        Self::with_padding(source, DEFAULT_INTER_PACKET_PADDING)
    }

    pub fn with_padding(source: S, padding: u64) -> Self {
        Self { source, padding }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    pub fn padding(&self) -> u64 {
        self.padding
    }

    /// Length of the underlying data in bytes.
    pub fn len(&self) -> Result<u64, SarError> {
        Ok(self.source.len()?)
    }

    pub fn is_empty(&self) -> Result<bool, SarError> {
        Ok(self.len()? == 0)
    }

    /// Decode the packet starting at byte `offset`.
    pub fn read_packet_at(&self, offset: u64) -> Result<Packet, SarError> {
        let headers = read_exact_at(&self.source, offset, HEADERS_SIZE)?;
        let primary = PrimaryHeader::parse(&headers)?;
        let secondary = SecondaryHeader::parse(&headers[PRIMARY_HEADER_SIZE..])?;

        let len = user_data_len(&primary).ok_or(SarError::InvalidPacketLength {
            offset,
            data_length_minus1: primary.data_length_minus1,
        })?;
        let user_data = read_exact_at(&self.source, offset + HEADERS_SIZE as u64, len)?;

        trace!(
            "Packet at {}: apid {:#x} seq {} user data {} bytes",
            offset,
            primary.apid(),
            primary.sequence_count(),
            len
        );
        Ok(Packet::new(primary, secondary, user_data))
    }

    /// Offset of the packet that follows `packet`, which starts at `offset`.
    pub fn next_offset(&self, offset: u64, packet: &Packet) -> u64 {
        offset
            .saturating_add(packet.total_size as u64)
            .saturating_add(self.padding)
    }

    /// Iterate packets from offset 0 to the end of the source.
    ///
    /// The iterator yields an error at most once and then ends.
    pub fn packets(&self) -> Result<Packets<'_, S>, SarError> {
        let end = self.len()?;
        Ok(Packets {
            reader: self,
            offset: 0,
            end,
            failed: false,
        })
    }

    /// Decode every packet in order. Any failure aborts the whole traversal.
    pub fn read_all(&self) -> Result<Vec<Packet>, SarError> {
        let packets = self.packets()?.collect::<Result<Vec<_>, _>>()?;
        debug!("Decoded {} packets", packets.len());
        Ok(packets)
    }
}

/// Sequential packet iterator returned by [`PacketReader::packets`].
#[derive(Debug)]
pub struct Packets<'a, S> {
    reader: &'a PacketReader<S>,
    offset: u64,
    end: u64,
    failed: bool,
}

impl<S> Packets<'_, S> {
    /// Offset the next packet will be read from.
    pub fn offset(&self) -> u64 {
        self.offset
    }
}

impl<S: DataSource> Iterator for Packets<'_, S> {
    type Item = Result<Packet, SarError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.end {
            return None;
        }
        match self.reader.read_packet_at(self.offset) {
            Ok(packet) => {
                self.offset = self.reader.next_offset(self.offset, &packet);
                Some(Ok(packet))
            }
            Err(e) => {
                warn!("Packet traversal stopped at offset {}: {}", self.offset, e);
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl<S: DataSource> std::iter::FusedIterator for Packets<'_, S> {}
