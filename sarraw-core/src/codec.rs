//! Big-endian scalar codec and bitfield extraction.
//!
//! Records are first deserialized with bincode into raw structs of byte
//! arrays; the helpers here turn those arrays into numbers. Every multi-byte
//! value in the annotation, index and packet files is stored big-endian.
//! Sub-byte fields are described declaratively with [`BitField`] and
//! [`PackedGroup`] tables, so a header layout can be read straight off its
//! table instead of from shift/mask chains.
//!
//! All functions here are pure and reentrant. The 64-bit reinterpretations
//! are done with local `from_bits`/`from_be_bytes`, never through a shared
//! scratch buffer.

// =============================================================================
// Scalars
// =============================================================================

/// Compose a big-endian u16.
#[inline]
pub fn u16_from_bytes(bytes: [u8; 2]) -> u16 {
    u16::from_be_bytes(bytes)
}

/// Compose a big-endian 24-bit value into a u32 (implicit zero high byte).
#[inline]
pub fn u24_from_bytes(bytes: [u8; 3]) -> u32 {
    u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]])
}

/// Compose a big-endian u32.
#[inline]
pub fn u32_from_bytes(bytes: [u8; 4]) -> u32 {
    u32::from_be_bytes(bytes)
}

/// Compose a big-endian u64.
///
/// The full 64-bit range is kept. Callers that narrow the result to a type
/// with fewer exact integer bits (an `f64` holds 53) own that precision loss.
#[inline]
pub fn u64_from_bytes(bytes: [u8; 8]) -> u64 {
    u64::from_be_bytes(bytes)
}

/// Reinterpret 8 big-endian bytes as an IEEE-754 binary64 value.
///
/// Byte 0 is the most significant byte of the bit pattern.
#[inline]
pub fn f64_from_bytes(bytes: [u8; 8]) -> f64 {
    f64::from_bits(u64::from_be_bytes(bytes))
}

/// Low 24 bits of `value` as 3 big-endian bytes.
#[inline]
pub fn u24_to_bytes(value: u32) -> [u8; 3] {
    let b = value.to_be_bytes();
    [b[1], b[2], b[3]]
}

// =============================================================================
// Bitfields
// =============================================================================

#[inline]
fn low_mask(width: u32) -> u32 {
    u32::MAX.checked_shr(32u32.saturating_sub(width)).unwrap_or(0)
}

/// Extract `width` bits starting `offset` bits below the MSB of a
/// `group_bits`-wide group.
///
/// `offset + width <= group_bits <= 32` is a caller contract. It is asserted
/// in debug builds; release builds mask instead of panicking.
///
/// ```
/// use sarraw_core::codec::bitfield;
/// // 0b101_10110: a 3-bit field followed by a 5-bit field
/// assert_eq!(bitfield(0b1011_0110, 8, 0, 3), 0b101);
/// assert_eq!(bitfield(0b1011_0110, 8, 3, 5), 0b10110);
/// ```
#[inline]
pub fn bitfield(group: u32, group_bits: u32, offset: u32, width: u32) -> u32 {
    debug_assert!(group_bits <= 32, "bit group wider than 32 bits");
    debug_assert!(
        offset + width <= group_bits,
        "field at offset {} width {} overruns a {} bit group",
        offset,
        width,
        group_bits
    );
    let shift = group_bits.saturating_sub(offset.saturating_add(width));
    group.checked_shr(shift).unwrap_or(0) & low_mask(width)
}

/// Inverse of [`bitfield`]: replace the field bits of `group` with `value`.
///
/// Bits of `value` above `width` are dropped.
#[inline]
pub fn insert_bitfield(group: u32, group_bits: u32, offset: u32, width: u32, value: u32) -> u32 {
    debug_assert!(group_bits <= 32, "bit group wider than 32 bits");
    debug_assert!(
        offset + width <= group_bits,
        "field at offset {} width {} overruns a {} bit group",
        offset,
        width,
        group_bits
    );
    let shift = group_bits.saturating_sub(offset.saturating_add(width));
    let mask = low_mask(width).checked_shl(shift).unwrap_or(0);
    (group & !mask) | (value.checked_shl(shift).unwrap_or(0) & mask)
}

/// A named field inside a packed bit group, positioned from the MSB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    pub name: &'static str,
    /// Bit offset from the most significant bit of the group
    pub offset: u32,
    /// Width in bits
    pub width: u32,
}

impl BitField {
    pub const fn new(name: &'static str, offset: u32, width: u32) -> Self {
        Self {
            name,
            offset,
            width,
        }
    }

    /// Largest value the field can hold.
    pub fn max_value(&self) -> u32 {
        low_mask(self.width)
    }

    pub fn extract(&self, group: u32, group_bits: u32) -> u32 {
        bitfield(group, group_bits, self.offset, self.width)
    }

    pub fn insert(&self, group: u32, group_bits: u32, value: u32) -> u32 {
        insert_bitfield(group, group_bits, self.offset, self.width, value)
    }
}

/// A run of 1 to 4 header bytes read as one big-endian group and split into
/// `N` bit fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedGroup<const N: usize> {
    pub name: &'static str,
    /// Byte offset of the group from the start of its header
    pub byte_offset: usize,
    /// Group length in bytes (1..=4)
    pub byte_len: usize,
    /// Fields in MSB-first order
    pub fields: [BitField; N],
}

impl<const N: usize> PackedGroup<N> {
    /// Width of the group in bits.
    pub const fn bits(&self) -> u32 {
        (self.byte_len * 8) as u32
    }

    /// Split a raw group value into its field values, in table order.
    pub fn split(&self, group: u32) -> [u32; N] {
        let bits = self.bits();
        self.fields.map(|field| field.extract(group, bits))
    }

    /// Combine field values (table order) into a raw group value.
    pub fn join(&self, values: [u32; N]) -> u32 {
        let bits = self.bits();
        self.fields
            .iter()
            .zip(values)
            .fold(0u32, |group, (field, value)| field.insert(group, bits, value))
    }

    /// Read the raw group value from `header`.
    ///
    /// # Panics
    ///
    /// Panics if `header` is shorter than `byte_offset + byte_len`.
    pub fn read(&self, header: &[u8]) -> u32 {
        header[self.byte_offset..self.byte_offset + self.byte_len]
            .iter()
            .fold(0u32, |acc, &b| (acc << 8) | b as u32)
    }

    /// Write a raw group value into `header`.
    ///
    /// # Panics
    ///
    /// Panics if `header` is shorter than `byte_offset + byte_len`.
    pub fn write(&self, header: &mut [u8], group: u32) {
        let bytes = &mut header[self.byte_offset..self.byte_offset + self.byte_len];
        for (i, b) in bytes.iter_mut().enumerate() {
            let shift = 8 * (self.byte_len - 1 - i);
            *b = (group >> shift) as u8;
        }
    }

    /// Read the group from `header` and split it, in table order.
    ///
    /// # Panics
    ///
    /// Panics if `header` is shorter than `byte_offset + byte_len`.
    pub fn unpack(&self, header: &[u8]) -> [u32; N] {
        self.split(self.read(header))
    }

    /// Pack field values (table order) into `header`.
    ///
    /// # Panics
    ///
    /// Panics if `header` is shorter than `byte_offset + byte_len`.
    pub fn pack(&self, header: &mut [u8], values: [u32; N]) {
        self.write(header, self.join(values));
    }

    /// True when the fields cover every bit of the group exactly once.
    pub fn is_partition(&self) -> bool {
        let mut cursor = 0;
        for field in &self.fields {
            if field.width == 0 || field.offset != cursor {
                return false;
            }
            cursor += field.width;
        }
        cursor == self.bits()
    }
}
