//! redostream core types
//!
//! Shared foundation for the redo-stream pipeline: the endian-parameterized
//! byte codec (including the database's SCN field encodings), the row-event
//! type handed to the downstream command buffer, and the common error type.

pub mod codec;
pub mod error;
pub mod event;

pub use codec::{ByteOrder, SCN_48BIT_LIMIT, ZERO_SCN};
pub use error::{Error, Result};
pub use event::{RowEvent, RowOp};

/// System commit number. The database assigns one to every commit;
/// monotonically increasing per incarnation.
pub type Scn = u64;

/// Redo log sequence number, monotone within a resetlogs incarnation.
pub type SequenceNum = u32;

/// Resetlogs identifier naming a database incarnation.
pub type ResetlogsId = u32;
