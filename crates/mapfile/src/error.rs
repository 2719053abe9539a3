use std::io;

use thiserror::Error;

/// Everything that can go wrong while opening or traversing a MAPT file.
///
/// `OddPropertySlot` is a usage error the caller can recover from. All other
/// variants mean the file is unusable (or not a MAPT file at all) and abort
/// the current query.
#[derive(Debug, Error)]
pub enum MapFileError {
    #[error("failed to open map file: {0}")]
    Io(#[from] io::Error),

    #[error("bad MAPT magic {found:?}")]
    BadMagic { found: [u8; 4] },

    #[error("unsupported MAPT version {0}")]
    UnsupportedVersion(u32),

    #[error("read of {len} bytes at offset {offset} exceeds file size {size}")]
    OutOfBounds { offset: u64, len: u64, size: u64 },

    #[error("{what} index {index} out of range (count {count})")]
    CountOutOfRange {
        what: &'static str,
        index: u64,
        count: u64,
    },

    #[error("unknown geometry type tag {0}")]
    UnknownGeometry(u8),

    #[error("properties are key/value pairs starting at even string slots, got slot {0}")]
    OddPropertySlot(u32),
}

impl MapFileError {
    /// True for errors caused by how the reader was called rather than by
    /// the file contents.
    pub fn is_usage_error(&self) -> bool {
        matches!(self, MapFileError::OddPropertySlot(_))
    }
}

pub type Result<T, E = MapFileError> = std::result::Result<T, E>;
