//! # sarraw-core
//!
//! Platform-independent decoders for SAR raw (Level-0) products.
//!
//! This crate contains pure decoding logic with **zero I/O dependencies**.
//! Every function works on caller-owned, fully-buffered bytes, so the same
//! code serves the file-backed reader in `sarraw` and any other host
//! (memory-mapped files, WASM, test fixtures).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  sarraw-core (pure, no file access)                         │
//! │  ├── codec       (big-endian scalars, bit field tables)     │
//! │  ├── time        (day/ms/us timestamps, 2000-01-01 epoch)   │
//! │  ├── annotation  (26-byte annotation records)               │
//! │  ├── index       (36-byte index records)                    │
//! │  └── packet      (primary + secondary space packet headers) │
//! └─────────────────────────────────────────────────────────────┘
//!                              ▲
//!                 ┌────────────┴────────────┐
//!                 │  sarraw                 │
//!                 │  (DataSource, reader,   │
//!                 │   SarProduct)           │
//!                 └─────────────────────────┘
//! ```
//!
//! ## Key Modules
//!
//! - [`codec`] - Scalar decoding and declarative bit field extraction
//! - [`time`] - Annotation timestamps
//! - [`annotation`] - Annotation file decoding
//! - [`index`] - Index file decoding
//! - [`packet`] - Space packet headers and typed header codes
//!
//! ## Example: Decoding an Annotation File
//!
//! ```rust
//! use sarraw_core::annotation::{decode_annotations, ANNOTATION_RECORD_SIZE};
//!
//! let data = vec![0u8; ANNOTATION_RECORD_SIZE * 3]; // Real file contents
//! let annotations = decode_annotations(&data).unwrap();
//! assert_eq!(annotations.len(), 3);
//! ```
//!
//! ## Example: Decoding Packet Headers
//!
//! ```rust
//! use sarraw_core::packet::{PrimaryHeader, SecondaryHeader};
//!
//! let primary = PrimaryHeader::parse(&[0x0C, 0x1C, 0xC0, 0x01, 0x48, 0x09]).unwrap();
//! assert_eq!(primary.apid(), 0x41C);
//! assert_eq!(primary.data_field_length(), 0x480A);
//!
//! let secondary = SecondaryHeader::parse(&[0u8; 62]).unwrap();
//! println!("BAQ mode {:?}, swath {}", secondary.baq_mode(), secondary.swath_number);
//! ```

pub mod annotation;
pub mod codec;
pub mod error;
pub mod index;
pub mod packet;
pub mod time;

// Re-export commonly used types
pub use annotation::{decode_annotations, PacketAnnotation, ANNOTATION_RECORD_SIZE};
pub use codec::{BitField, PackedGroup};
pub use error::DecodeError;
pub use index::{decode_indices, PacketIndexEntry, INDEX_RECORD_SIZE};
pub use packet::{Packet, PrimaryHeader, SecondaryHeader, HEADERS_SIZE};
pub use time::Time;
