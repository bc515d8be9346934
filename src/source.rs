//! Random-access byte sources for the packet data file.
//!
//! Packet traversal only ever needs "give me N bytes at offset X", so the
//! reader is generic over [`DataSource`] instead of tied to [`File`]. The
//! same traversal code then runs against a real data file or an in-memory
//! buffer in tests.
//!
//! ```text
//!   PacketReader<S: DataSource>
//!          │ read_at(offset, buf)
//!          ▼
//!   ┌──────────────┐   ┌──────────────┐
//!   │  FileSource  │   │ MemorySource │
//!   │ Mutex<File>  │   │   Vec<u8>    │
//!   └──────────────┘   └──────────────┘
//! ```
//!
//! Reads take `&self`. [`FileSource`] serialises seek-then-read pairs behind a
//! mutex so concurrent callers never interleave on the shared file cursor.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use log::{debug, trace};

/// Positioned, read-only access to a byte sequence.
pub trait DataSource {
    /// Total length in bytes.
    fn len(&self) -> io::Result<u64>;

    /// Fill `buf` from `offset`, returning the number of bytes copied.
    ///
    /// Fewer than `buf.len()` bytes are returned only when the source ends
    /// first. An offset at or past the end yields `Ok(0)`.
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize>;

    fn is_empty(&self) -> io::Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl<S: DataSource + ?Sized> DataSource for &S {
    fn len(&self) -> io::Result<u64> {
        (**self).len()
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_at(offset, buf)
    }
}

// =============================================================================
// File-backed source
// =============================================================================

/// Data file opened once and shared by all reads.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileSource {
    /// Open `path` for reading.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        debug!("Opened data file {}", path.display());
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataSource for FileSource {
    fn len(&self) -> io::Result<u64> {
        let file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(file.metadata()?.len())
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        // Every read seeks first, so a poisoned cursor position is harmless.
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        file.seek(SeekFrom::Start(offset))?;

        let mut filled = 0;
        while filled < buf.len() {
            match file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        trace!(
            "{}: read {}/{} bytes at offset {}",
            self.path.display(),
            filled,
            buf.len(),
            offset
        );
        Ok(filled)
    }
}

// =============================================================================
// In-memory source
// =============================================================================

/// Whole data file held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySource {
    data: Vec<u8>,
}

impl MemorySource {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for MemorySource {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl DataSource for MemorySource {
    fn len(&self) -> io::Result<u64> {
        Ok(self.data.len() as u64)
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        let start = match usize::try_from(offset) {
            Ok(start) if start < self.data.len() => start,
            _ => return Ok(0),
        };
        let n = buf.len().min(self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;
    use std::thread;

    fn sample() -> Vec<u8> {
        (0..=255u8).collect()
    }

    #[test]
    fn test_memory_source_reads() {
        let source = MemorySource::new(sample());
        assert_eq!(source.len().unwrap(), 256);
        assert!(!source.is_empty().unwrap());

        let mut buf = [0u8; 4];
        assert_eq!(source.read_at(10, &mut buf).unwrap(), 4);
        assert_eq!(buf, [10, 11, 12, 13]);

        // Short at the end, nothing past it
        assert_eq!(source.read_at(254, &mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[254, 255]);
        assert_eq!(source.read_at(256, &mut buf).unwrap(), 0);
        assert_eq!(source.read_at(u64::MAX, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_empty_memory_source() {
        let source = MemorySource::default();
        assert!(source.is_empty().unwrap());
        let mut buf = [0u8; 1];
        assert_eq!(source.read_at(0, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_file_source_matches_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.dat");
        File::create(&path).unwrap().write_all(&sample()).unwrap();

        let file = FileSource::open(&path).unwrap();
        let memory = MemorySource::new(sample());
        assert_eq!(file.path(), path.as_path());
        assert_eq!(file.len().unwrap(), memory.len().unwrap());

        for offset in [0u64, 1, 100, 250, 255, 256, 300] {
            let mut a = [0u8; 8];
            let mut b = [0u8; 8];
            let n = file.read_at(offset, &mut a).unwrap();
            assert_eq!(n, memory.read_at(offset, &mut b).unwrap());
            assert_eq!(a[..n], b[..n], "offset {}", offset);
        }
    }

    #[test]
    fn test_file_source_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSource::open(dir.path().join("nope.dat")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_file_source_concurrent_reads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.dat");
        File::create(&path).unwrap().write_all(&sample()).unwrap();
        let source = Arc::new(FileSource::open(&path).unwrap());

        let handles: Vec<_> = (0..8u8)
            .map(|t| {
                let source = Arc::clone(&source);
                thread::spawn(move || {
                    for round in 0..50u8 {
                        let offset = (t as u64 * 31 + round as u64) % 250;
                        let mut buf = [0u8; 6];
                        assert_eq!(source.read_at(offset, &mut buf).unwrap(), 6);
                        let expected: Vec<u8> = (offset as u8..offset as u8 + 6).collect();
                        assert_eq!(&buf[..], &expected[..]);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
    }

    #[test]
    fn test_borrowed_source() {
        let source = MemorySource::new(sample());
        let borrowed: &MemorySource = &source;
        let mut buf = [0u8; 2];
        assert_eq!(DataSource::read_at(&borrowed, 5, &mut buf).unwrap(), 2);
        assert_eq!(buf, [5, 6]);
    }
}
