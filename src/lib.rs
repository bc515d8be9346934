//! # sarraw
//!
//! File access for SAR raw (Level-0) products.
//!
//! A product is three files sharing a path prefix: fixed-size annotation
//! records, fixed-size index records, and a stream of CCSDS space packets
//! carrying the radar echoes. Byte-level decoding lives in [`sarraw_core`];
//! this crate adds file handling, packet traversal and the product lifecycle.
//!
//! ```text
//!   SarProduct ──► ProductConfig   (<prefix> + suffixes, padding)
//!       │
//!       ├── decode_annotations(<prefix>-annot.dat)
//!       ├── decode_indices(<prefix>-index.dat)
//!       └── PacketReader<FileSource>(<prefix>.dat)
//!                   │
//!                   └── Packet { primary, secondary, user_data }
//! ```

pub mod config;
pub mod error;
pub mod product;
pub mod reader;
pub mod source;

pub use sarraw_core;
pub use sarraw_core::{Packet, PacketAnnotation, PacketIndexEntry, PrimaryHeader, SecondaryHeader};

pub use config::ProductConfig;
pub use error::SarError;
pub use product::{ProductState, SarProduct};
pub use reader::{PacketReader, Packets};
pub use source::{DataSource, FileSource, MemorySource};
