//! Product file naming and traversal settings.
//!
//! A product is addressed by a path prefix. The three files are found by
//! appending a suffix to it:
//!
//! ```text
//!   <prefix>-annot.dat   annotation records
//!   <prefix>-index.dat   index records
//!   <prefix>.dat         space packets
//! ```
//!
//! The defaults match what the ground segment writes. A JSON file with any
//! subset of the fields (camelCase) overrides them:
//!
//! ```json
//! { "dataSuffix": ".raw", "interPacketPadding": 0 }
//! ```

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::SarError;

pub const DEFAULT_ANNOTATION_SUFFIX: &str = "-annot.dat";
pub const DEFAULT_INDEX_SUFFIX: &str = "-index.dat";
pub const DEFAULT_DATA_SUFFIX: &str = ".dat";

/// Bytes skipped after each packet during sequential traversal.
pub const DEFAULT_INTER_PACKET_PADDING: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ProductConfig {
    pub annotation_suffix: String,
    pub index_suffix: String,
    pub data_suffix: String,
    pub inter_packet_padding: u64,
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            annotation_suffix: DEFAULT_ANNOTATION_SUFFIX.to_string(),
            index_suffix: DEFAULT_INDEX_SUFFIX.to_string(),
            data_suffix: DEFAULT_DATA_SUFFIX.to_string(),
            inter_packet_padding: DEFAULT_INTER_PACKET_PADDING,
        }
    }
}

impl ProductConfig {
    pub fn from_json_str(json: &str) -> Result<Self, SarError> {
        let config: ProductConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file. Unreadable files give [`SarError::Io`],
    /// malformed contents [`SarError::Config`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SarError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        debug!("Loaded product config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Suffixes must be distinct and non-empty, otherwise two of the
    /// product files would resolve to the same path.
    pub fn validate(&self) -> Result<(), SarError> {
        let suffixes = [
            ("annotationSuffix", &self.annotation_suffix),
            ("indexSuffix", &self.index_suffix),
            ("dataSuffix", &self.data_suffix),
        ];
        for (name, suffix) in suffixes {
            if suffix.is_empty() {
                return Err(SarError::Config(format!("{} must not be empty", name)));
            }
        }
        for (i, (a_name, a)) in suffixes.iter().enumerate() {
            for (b_name, b) in &suffixes[i + 1..] {
                if a == b {
                    return Err(SarError::Config(format!(
                        "{} and {} are both \"{}\"",
                        a_name, b_name, a
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn annotation_path(&self, prefix: &Path) -> PathBuf {
        with_suffix(prefix, &self.annotation_suffix)
    }

    pub fn index_path(&self, prefix: &Path) -> PathBuf {
        with_suffix(prefix, &self.index_suffix)
    }

    pub fn data_path(&self, prefix: &Path) -> PathBuf {
        with_suffix(prefix, &self.data_suffix)
    }
}

/// Plain string append; `Path::with_extension` would eat a dot in the prefix.
fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
