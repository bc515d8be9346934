//! A SAR raw product: annotation, index and packet data files sharing one
//! path prefix.
//!
//! # Lifecycle
//!
//! ```text
//!                init() ok                dispose()
//!  Uninitialized ─────────────► Ready ─────────────► Disposed
//!       │  ▲                      │
//!       └──┘ init() failed        └── reads, queries
//! ```
//!
//! Annotation and index files are small and decoded eagerly by `init()`.
//! The packet data file is kept open and read on demand.
//!
//! # Example
//!
//! ```rust,no_run
//! use sarraw::SarProduct;
//!
//! let mut product = SarProduct::new("/data/s1a-iw-raw-s-vv-20231018t061532");
//! product.init()?;
//! println!("{} packets", product.packet_count()?);
//! let first = product.read_packet_at(0)?;
//! println!("{:?}", first.secondary_header.signal_type());
//! product.dispose()?;
//! # Ok::<(), sarraw::SarError>(())
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use sarraw_core::{decode_annotations, decode_indices, Packet, PacketAnnotation, PacketIndexEntry};
use serde::{Deserialize, Serialize};

use crate::config::ProductConfig;
use crate::error::SarError;
use crate::reader::{PacketReader, Packets};
use crate::source::FileSource;

// =============================================================================
// Product State
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductState {
    /// Created, files not read yet
    Uninitialized,
    /// Records decoded and data file open
    Ready,
    /// Data file released
    Disposed,
}

impl fmt::Display for ProductState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductState::Uninitialized => write!(f, "uninitialized"),
            ProductState::Ready => write!(f, "ready"),
            ProductState::Disposed => write!(f, "disposed"),
        }
    }
}

/// Everything `init()` produces, committed in one assignment.
#[derive(Debug)]
struct Loaded {
    annotations: Vec<PacketAnnotation>,
    indices: Vec<PacketIndexEntry>,
    reader: PacketReader<FileSource>,
}

#[derive(Debug)]
enum Inner {
    Uninitialized,
    Ready(Loaded),
    Disposed,
}

// =============================================================================
// SarProduct
// =============================================================================

#[derive(Debug)]
pub struct SarProduct {
    prefix: PathBuf,
    config: ProductConfig,
    inner: Inner,
}

impl SarProduct {
    /// Product at `prefix` with the default file suffixes.
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        Self::with_config(prefix, ProductConfig::default())
    }

    pub fn with_config(prefix: impl Into<PathBuf>, config: ProductConfig) -> Self {
        Self {
            prefix: prefix.into(),
            config,
            inner: Inner::Uninitialized,
        }
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    pub fn config(&self) -> &ProductConfig {
        &self.config
    }

    pub fn state(&self) -> ProductState {
        match self.inner {
            Inner::Uninitialized => ProductState::Uninitialized,
            Inner::Ready(_) => ProductState::Ready,
            Inner::Disposed => ProductState::Disposed,
        }
    }

    pub fn annotation_path(&self) -> PathBuf {
        self.config.annotation_path(&self.prefix)
    }

    pub fn index_path(&self) -> PathBuf {
        self.config.index_path(&self.prefix)
    }

    pub fn data_path(&self) -> PathBuf {
        self.config.data_path(&self.prefix)
    }

    /// Decode the annotation and index files and open the data file.
    ///
    /// On failure the product stays `Uninitialized` and `init()` may be
    /// retried.
    pub fn init(&mut self) -> Result<(), SarError> {
        if !matches!(self.inner, Inner::Uninitialized) {
            return Err(self.invalid_state("initialize"));
        }

        let annotation_path = self.annotation_path();
        let annotations = decode_annotations(&read_file(&annotation_path)?)?;
        debug!(
            "Decoded {} annotation records from {}",
            annotations.len(),
            annotation_path.display()
        );

        let index_path = self.index_path();
        let indices = decode_indices(&read_file(&index_path)?)?;
        debug!(
            "Decoded {} index records from {}",
            indices.len(),
            index_path.display()
        );

        let data_path = self.data_path();
        let source = FileSource::open(&data_path).inspect_err(|e| {
            warn!("Cannot open {}: {}", data_path.display(), e);
        })?;
        let reader = PacketReader::with_padding(source, self.config.inter_packet_padding);

        if annotations.len() != indices.len() {
            debug!(
                "Annotation count {} differs from index count {}",
                annotations.len(),
                indices.len()
            );
        }
        info!(
            "Product {} ready: {} annotations, {} index entries",
            self.prefix.display(),
            annotations.len(),
            indices.len()
        );

        self.inner = Inner::Ready(Loaded {
            annotations,
            indices,
            reader,
        });
        Ok(())
    }

    pub fn annotations(&self) -> Result<&[PacketAnnotation], SarError> {
        Ok(&self.loaded("read annotations")?.annotations)
    }

    pub fn indices(&self) -> Result<&[PacketIndexEntry], SarError> {
        Ok(&self.loaded("read indices")?.indices)
    }

    /// Number of packets listed in the index file.
    pub fn packet_count(&self) -> Result<usize, SarError> {
        Ok(self.loaded("count packets")?.indices.len())
    }

    /// Size of the packet data file in bytes.
    pub fn data_len(&self) -> Result<u64, SarError> {
        self.loaded("query the data file")?.reader.len()
    }

    /// Decode the packet starting at byte `offset` of the data file.
    pub fn read_packet(&self, offset: u64) -> Result<Packet, SarError> {
        self.loaded("read packets")?.reader.read_packet_at(offset)
    }

    /// Decode the `index`-th packet, located through the index file.
    pub fn read_packet_at(&self, index: usize) -> Result<Packet, SarError> {
        let loaded = self.loaded("read packets")?;
        let entry = loaded
            .indices
            .get(index)
            .ok_or(SarError::IndexOutOfRange {
                index,
                len: loaded.indices.len(),
            })?;
        loaded.reader.read_packet_at(entry.byte_offset)
    }

    /// Sequential traversal of the data file from offset 0.
    pub fn packets(&self) -> Result<Packets<'_, FileSource>, SarError> {
        self.loaded("read packets")?.reader.packets()
    }

    pub fn read_all(&self) -> Result<Vec<Packet>, SarError> {
        self.loaded("read packets")?.reader.read_all()
    }

    /// Release the data file. Every later call fails with
    /// [`SarError::InvalidState`].
    pub fn dispose(&mut self) -> Result<(), SarError> {
        if matches!(self.inner, Inner::Disposed) {
            return Err(self.invalid_state("dispose"));
        }
        self.inner = Inner::Disposed;
        debug!("Product {} disposed", self.prefix.display());
        Ok(())
    }

    fn loaded(&self, operation: &'static str) -> Result<&Loaded, SarError> {
        match &self.inner {
            Inner::Ready(loaded) => Ok(loaded),
            _ => Err(self.invalid_state(operation)),
        }
    }

    fn invalid_state(&self, operation: &'static str) -> SarError {
        SarError::InvalidState {
            state: self.state(),
            operation,
        }
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, SarError> {
    fs::read(path).map_err(|e| {
        warn!("Cannot read {}: {}", path.display(), e);
        SarError::Io(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sarraw_core::packet::{HEADERS_SIZE, SECONDARY_HEADER_SIZE};
    use sarraw_core::{DecodeError, Time, ANNOTATION_RECORD_SIZE};
    use std::io;
    use tempfile::TempDir;

    fn packet_bytes(seq: u16, user_len: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; HEADERS_SIZE + user_len];
        bytes[0] = 0x0C;
        bytes[1] = 0x1C;
        bytes[2..4].copy_from_slice(&(0xC000 | seq).to_be_bytes());
        let dlm1 = (SECONDARY_HEADER_SIZE + user_len - 1) as u16;
        bytes[4..6].copy_from_slice(&dlm1.to_be_bytes());
        bytes[HEADERS_SIZE..].fill(seq as u8);
        bytes
    }

    fn annotation(i: u16) -> PacketAnnotation {
        PacketAnnotation {
            sensing_time: Time::new(8691, 22_532_000 + i as u32, 0),
            downlink_time: Time::new(8691, 22_533_500 + i as u32, 0),
            packet_length: 1000,
            frame_count: i,
            missing_frame_count: 0,
            crc_flag: 0,
            vcid: 3,
            channel: 1,
            spare: 0,
        }
    }

    fn index_entry(byte_offset: u64, delta_size: u32) -> PacketIndexEntry {
        PacketIndexEntry {
            date_and_time: 8691.26,
            delta_time: 0.0,
            delta_size,
            data_units_offset: 0,
            byte_offset,
            variable_size_flag: 0,
            spare: 0,
        }
    }

    /// Writes a product with one packet per user data length and returns
    /// the directory and prefix.
    fn write_product(user_lens: &[usize]) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("s1-test");
        let config = ProductConfig::default();

        let mut data = Vec::new();
        let mut annot = Vec::new();
        let mut index = Vec::new();
        for (seq, &len) in user_lens.iter().enumerate() {
            let packet = packet_bytes(seq as u16, len);
            let entry = index_entry(data.len() as u64, packet.len() as u32);
            index.extend_from_slice(&entry.to_bytes());
            annot.extend_from_slice(&annotation(seq as u16).to_bytes());
            data.extend(packet);
            data.push(0);
        }
        fs::write(config.annotation_path(&prefix), annot).unwrap();
        fs::write(config.index_path(&prefix), index).unwrap();
        fs::write(config.data_path(&prefix), data).unwrap();
        (dir, prefix)
    }

    #[test]
    fn test_init_and_read() {
        let (_dir, prefix) = write_product(&[10, 20, 30]);
        let mut product = SarProduct::new(&prefix);
        assert_eq!(product.state(), ProductState::Uninitialized);
        product.init().unwrap();
        assert_eq!(product.state(), ProductState::Ready);

        assert_eq!(product.packet_count().unwrap(), 3);
        assert_eq!(product.annotations().unwrap().len(), 3);
        assert_eq!(product.annotations().unwrap()[2], annotation(2));
        assert_eq!(product.indices().unwrap()[1].byte_offset, 79);
        assert_eq!(
            product.data_len().unwrap(),
            (3 * HEADERS_SIZE + 60 + 3) as u64
        );

        let packet = product.read_packet_at(1).unwrap();
        assert_eq!(packet.primary_header.sequence_count(), 1);
        assert_eq!(packet.user_data, vec![1u8; 20]);
        assert_eq!(product.read_packet(79).unwrap(), packet);
    }

    #[test]
    fn test_read_all_matches_index() {
        let lens = [0, 5, 1000, 62, 3];
        let (_dir, prefix) = write_product(&lens);
        let mut product = SarProduct::new(&prefix);
        product.init().unwrap();

        let all = product.read_all().unwrap();
        assert_eq!(all.len(), lens.len());
        for (i, packet) in all.iter().enumerate() {
            assert_eq!(packet, &product.read_packet_at(i).unwrap());
            assert_eq!(
                packet.total_size,
                product.indices().unwrap()[i].delta_size
            );
        }
        assert_eq!(product.packets().unwrap().count(), lens.len());
    }

    #[test]
    fn test_index_out_of_range() {
        let (_dir, prefix) = write_product(&[4, 4]);
        let mut product = SarProduct::new(&prefix);
        product.init().unwrap();

        let len = product.indices().unwrap().len();
        match product.read_packet_at(len) {
            Err(SarError::IndexOutOfRange { index, len: 2 }) => assert_eq!(index, len),
            other => panic!("Expected IndexOutOfRange, got {:?}", other),
        }
        // Failure leaves the product usable
        assert_eq!(product.state(), ProductState::Ready);
        assert!(product.read_packet_at(1).is_ok());
    }

    #[test]
    fn test_init_missing_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let mut product = SarProduct::new(dir.path().join("does-not-exist"));
        match product.init() {
            Err(SarError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("Expected Io error, got {:?}", other),
        }
        assert_eq!(product.state(), ProductState::Uninitialized);
    }

    #[test]
    fn test_init_missing_data_file_is_atomic() {
        let (_dir, prefix) = write_product(&[4]);
        let mut product = SarProduct::new(&prefix);
        fs::remove_file(product.data_path()).unwrap();

        assert!(matches!(product.init(), Err(SarError::Io(_))));
        assert_eq!(product.state(), ProductState::Uninitialized);
        assert!(matches!(
            product.annotations(),
            Err(SarError::InvalidState {
                state: ProductState::Uninitialized,
                ..
            })
        ));
    }

    #[test]
    fn test_init_retry_after_failure() {
        let (_dir, prefix) = write_product(&[4]);
        let mut product = SarProduct::new(&prefix);
        let data = fs::read(product.data_path()).unwrap();
        fs::remove_file(product.data_path()).unwrap();
        assert!(product.init().is_err());

        fs::write(product.data_path(), data).unwrap();
        product.init().unwrap();
        assert_eq!(product.packet_count().unwrap(), 1);
    }

    #[test]
    fn test_truncated_annotation_file() {
        let (_dir, prefix) = write_product(&[4, 4]);
        let mut product = SarProduct::new(&prefix);
        let mut annot = fs::read(product.annotation_path()).unwrap();
        annot.truncate(ANNOTATION_RECORD_SIZE + 3);
        fs::write(product.annotation_path(), annot).unwrap();

        match product.init() {
            Err(SarError::Decode(DecodeError::TruncatedRecord { record_size, .. })) => {
                assert_eq!(record_size, ANNOTATION_RECORD_SIZE)
            }
            other => panic!("Expected TruncatedRecord, got {:?}", other),
        }
        assert_eq!(product.state(), ProductState::Uninitialized);
    }

    #[test]
    fn test_empty_product() {
        let (_dir, prefix) = write_product(&[]);
        let mut product = SarProduct::new(&prefix);
        product.init().unwrap();
        assert_eq!(product.packet_count().unwrap(), 0);
        assert!(product.read_all().unwrap().is_empty());
        assert!(matches!(
            product.read_packet_at(0),
            Err(SarError::IndexOutOfRange { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_state_errors() {
        let (_dir, prefix) = write_product(&[4]);
        let mut product = SarProduct::new(&prefix);

        assert!(matches!(
            product.read_all(),
            Err(SarError::InvalidState {
                state: ProductState::Uninitialized,
                operation: "read packets"
            })
        ));

        product.init().unwrap();
        assert!(matches!(
            product.init(),
            Err(SarError::InvalidState {
                state: ProductState::Ready,
                operation: "initialize"
            })
        ));

        product.dispose().unwrap();
        assert_eq!(product.state(), ProductState::Disposed);
        assert!(matches!(
            product.read_packet_at(0),
            Err(SarError::InvalidState {
                state: ProductState::Disposed,
                ..
            })
        ));
        assert!(matches!(
            product.indices(),
            Err(SarError::InvalidState { .. })
        ));
        assert!(matches!(
            product.dispose(),
            Err(SarError::InvalidState {
                state: ProductState::Disposed,
                operation: "dispose"
            })
        ));
        assert!(matches!(product.init(), Err(SarError::InvalidState { .. })));
    }

    #[test]
    fn test_dispose_before_init() {
        let mut product = SarProduct::new("unused");
        product.dispose().unwrap();
        assert_eq!(product.state(), ProductState::Disposed);
    }

    #[test]
    fn test_custom_suffixes_and_padding() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("raw");
        let config = ProductConfig::from_json_str(
            r#"{
                "annotationSuffix": ".annot",
                "indexSuffix": ".idx",
                "dataSuffix": ".bin",
                "interPacketPadding": 0
            }"#,
        )
        .unwrap();

        let first = packet_bytes(0, 6);
        let second = packet_bytes(1, 9);
        let mut annot = annotation(0).to_bytes().to_vec();
        annot.extend_from_slice(&annotation(1).to_bytes());
        let mut index = index_entry(0, first.len() as u32).to_bytes().to_vec();
        let entry = index_entry(first.len() as u64, second.len() as u32);
        index.extend_from_slice(&entry.to_bytes());
        fs::write(dir.path().join("raw.annot"), annot).unwrap();
        fs::write(dir.path().join("raw.idx"), index).unwrap();
        fs::write(dir.path().join("raw.bin"), [first, second].concat()).unwrap();

        let mut product = SarProduct::with_config(&prefix, config);
        product.init().unwrap();
        let all = product.read_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1], product.read_packet_at(1).unwrap());
        assert_eq!(all[1].user_data.len(), 9);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(ProductState::Uninitialized.to_string(), "uninitialized");
        assert_eq!(ProductState::Ready.to_string(), "ready");
        assert_eq!(ProductState::Disposed.to_string(), "disposed");
    }
}
