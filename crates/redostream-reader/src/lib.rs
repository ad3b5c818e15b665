//! redostream reader
//!
//! The redo-stream orchestrator: a single long-running task that discovers
//! the source database's online and archived redo logs, plays them forward
//! in strict ascending sequence order from a durable checkpoint, and hands
//! committed row changes to a downstream command buffer in commit order.
//!
//! ## Architecture
//!
//! ```text
//!              ┌────────────────┐    catalog queries    ┌──────────┐
//!              │ CatalogClient  │◄──────────────────────┤          │
//!              └────────────────┘                       │  Reader  │
//!  online logs ───► reload / process ──────────────────►│  Runtime │──► RowEvents
//!  archived logs ─► heap pop / process ────────────────►│          │
//!              ┌────────────────┐   load / store        └──────────┘
//!              │ <database>.json│◄──────────────────────── checkpoint
//!              └────────────────┘
//! ```
//!
//! The per-file record parser stays behind the [`LogReader`] trait; this
//! crate owns everything around it - position tracking, file selection,
//! the overwritten-online-log recovery, transaction bookkeeping, and
//! checkpointing.

pub mod checkpoint;
pub mod config;
pub mod error;
pub mod logfile;
pub mod process;
pub mod runtime;
pub mod schema;
pub mod transaction;

pub use checkpoint::{CheckpointStore, ReadPosition};
pub use config::{ReaderConfig, TableFilter, TRACE2_REDO, TRACE_DETAIL, TRACE_FULL, TRACE_INFO};
pub use error::{ReaderError, Result};
pub use logfile::{ArchiveQueue, OnlineLogSet, ReadState, RedoHeader, RedoLog};
pub use process::{LogReader, ProcessOutcome, ReaderContext};
pub use runtime::ReaderRuntime;
pub use schema::{SchemaDictionary, TableColumn, TableObject};
pub use transaction::{ChunkArena, ChunkHandle, OpenTransactions, Transaction};
