//! Error Types Shared Across the Redo Pipeline
//!
//! Covers the failure modes of the low-level file surfaces: a log file whose
//! header does not carry the expected magic bytes, a header checksum that
//! does not verify, or a file too short to hold a header at all.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid log file magic")]
    InvalidMagic,

    #[error("log header checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { stored: u32, computed: u32 },

    #[error("log header truncated: {0} bytes")]
    TruncatedHeader(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
