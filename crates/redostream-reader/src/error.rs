//! Reader Error Taxonomy
//!
//! Startup validation failures, the fatal streaming conditions, and
//! conversions from the layers below. The split matters operationally:
//!
//! - Configuration problems (`NotArchiveLog`, `SupplementalLogMissing`,
//!   `ResetlogsMismatch`) fail startup and are never retried.
//! - `SequenceGap` and `BuffersExhausted` are fatal mid-stream; the runtime
//!   writes a final checkpoint and stops.
//! - Catalog errors are transient: logged, and the next loop iteration
//!   re-enters the connection check.
//! - Checkpoint write failures are logged and do not stop the stream.

use thiserror::Error;

use redostream_core::SequenceNum;

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("database is not in ARCHIVELOG mode; enable archiving and restart")]
    NotArchiveLog,

    #[error("minimal supplemental logging is disabled; add supplemental log data and restart")]
    SupplementalLogMissing,

    #[error("database incarnation changed: checkpoint resetlogs {previous}, current {current}")]
    ResetlogsMismatch { previous: u32, current: u32 },

    #[error("bootstrap failed: {0}")]
    BootstrapFailed(String),

    #[error("no readable member in online log group {group}")]
    NoUsableMember { group: i64 },

    #[error("archived log gap: need sequence {wanted}, next available is {found}")]
    SequenceGap {
        wanted: SequenceNum,
        found: SequenceNum,
    },

    #[error("transaction chunk buffers exhausted ({capacity} allocated)")]
    BuffersExhausted { capacity: usize },

    #[error("transaction {xid:#x} already open")]
    TransactionAlreadyOpen { xid: u64 },

    #[error("too many concurrent transactions (limit {limit})")]
    TransactionLimitExceeded { limit: usize },

    #[error("log processing failed for {path}: {detail}")]
    ProcessFailed { path: String, detail: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog error: {0}")]
    Catalog(#[from] redostream_catalog::CatalogError),

    #[error(transparent)]
    Core(#[from] redostream_core::Error),

    #[error("checkpoint serialization: {0}")]
    CheckpointJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReaderError>;
