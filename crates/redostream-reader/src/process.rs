//! Per-File Log Reader Contract
//!
//! The runtime drives each selected log file through a [`LogReader`]; the
//! record-level redo format lives entirely behind this trait. The contract
//! the implementation must honor:
//!
//! - Verify the descriptor's sequence against the in-file header. For an
//!   online log, a mismatch means the database recycled the group mid-read:
//!   return [`ProcessOutcome::SequenceSwitched`] after leaving the
//!   partial-read progress on the descriptor, so the runtime can resume
//!   from the archived copy at the exact byte already processed.
//! - Stream records, mutating the transaction bookkeeping through the
//!   context (open / append / commit / rollback) and emitting committed row
//!   events to the command buffer in ascending SCN order.
//! - Advance [`ReaderContext::database_scn`] as commits are fully
//!   processed; never touch the sequence counter - advancing it is the
//!   runtime's exclusive responsibility.
//! - Treat unparseable input as an error; the runtime considers parse
//!   failures fatal.

use async_trait::async_trait;
use tokio::sync::mpsc;

use redostream_core::{ByteOrder, RowEvent, Scn};

use crate::config::ReaderConfig;
use crate::error::Result;
use crate::logfile::RedoLog;
use crate::schema::SchemaDictionary;
use crate::transaction::{ChunkArena, OpenTransactions};

/// Terminal status of one `process_log` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The file was read to its end; the runtime advances to the next
    /// sequence.
    Completed,

    /// An online log's header no longer matches the expected sequence; the
    /// runtime falls back to the archived copy.
    SequenceSwitched,
}

/// Everything a log reader needs from the runtime while streaming one file.
pub struct ReaderContext<'a> {
    /// Byte order bound at bootstrap.
    pub order: ByteOrder,

    /// Read-only table lookup by object number.
    pub schema: &'a SchemaDictionary,

    /// Open-transaction bookkeeping, owned by the runtime.
    pub transactions: &'a mut OpenTransactions,

    /// Chunk pool backing transaction payloads.
    pub arena: &'a mut ChunkArena,

    /// Producer side of the downstream command buffer.
    pub events: &'a mpsc::Sender<RowEvent>,

    /// Dump and trace switches, plus `direct_read` for file opening.
    pub config: &'a ReaderConfig,

    /// Last fully-processed commit number; the reader moves this forward
    /// as it emits commits.
    pub database_scn: &'a mut Scn,
}

/// Reads one redo log file at a time on behalf of the runtime.
#[async_trait]
pub trait LogReader: Send {
    async fn process_log(
        &mut self,
        log: &mut RedoLog,
        ctx: ReaderContext<'_>,
    ) -> Result<ProcessOutcome>;
}
