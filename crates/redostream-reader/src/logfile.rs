//! Redo Log Descriptors and Registries
//!
//! The runtime tracks two populations of redo log files:
//!
//! - **Online logs** ([`OnlineLogSet`]): one descriptor per group, built
//!   once at startup from the catalog's member listing. The database
//!   recycles these files in place, so each refresh cycle re-reads their
//!   headers to observe the current sequence.
//! - **Archived logs** ([`ArchiveQueue`]): a min-heap of descriptors by
//!   sequence, rebuilt from the catalog whenever the online race is lost.
//!   The heap owns its descriptors; a pop transfers ownership and the
//!   descriptor is dropped after use.
//!
//! ## Header Block
//!
//! The first 512 bytes of every redo log file carry the fields the
//! registry needs, in the platform byte order bound at bootstrap:
//!
//! ```text
//! ┌───────┬────────────┬──────────┬───────────┬───────────┬──────────┬───────┐
//! │ Magic │ Block Size │ Sequence │ Resetlogs │ First SCN │ Next SCN │ CRC32 │
//! │ REDO  │ (4 bytes)  │ (4 bytes)│ (4 bytes) │ (8 bytes) │ (8 bytes)│(4 b.) │
//! └───────┴────────────┴──────────┴───────────┴───────────┴──────────┴───────┘
//! ```
//!
//! The CRC covers the 32 bytes before it. SCNs use the regular field
//! encoding. Record-level layout beyond the header block belongs to the
//! log reader, not this module.
//!
//! ## Partial-Read State
//!
//! When the database overwrites an online log mid-read, the bytes already
//! consumed stay valid in the archived copy of the same sequence. The
//! in-flight progress ([`ReadState`]) is *moved* from the abandoned online
//! descriptor into the archived one - a one-shot ownership transfer; the
//! source descriptor is left with no state and must not be resumed.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::BTreeMap;
use std::path::PathBuf;

use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};

use redostream_catalog::{ArchivedLogRow, OnlineLogRow};
use redostream_core::{error as core_error, ByteOrder, ResetlogsId, Scn, SequenceNum};

use crate::error::{ReaderError, Result};

/// Size of the header block at the start of every redo log file.
pub const HEADER_BLOCK_SIZE: usize = 512;

/// Magic bytes opening the header block.
pub const HEADER_MAGIC: [u8; 4] = *b"REDO";

/// Group number used by archived descriptors.
pub const GROUP_ARCHIVED: i64 = 0;

/// Decoded form of the header block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedoHeader {
    pub block_size: u32,
    pub sequence: SequenceNum,
    pub resetlogs: ResetlogsId,
    pub first_scn: Scn,
    pub next_scn: Scn,
}

impl RedoHeader {
    /// Decode a header block. The buffer must hold at least
    /// [`HEADER_BLOCK_SIZE`] bytes.
    pub fn decode(buf: &[u8], order: ByteOrder) -> core_error::Result<Self> {
        if buf.len() < HEADER_BLOCK_SIZE {
            return Err(core_error::Error::TruncatedHeader(buf.len()));
        }
        if buf[..4] != HEADER_MAGIC {
            return Err(core_error::Error::InvalidMagic);
        }
        let stored = order.read_u32(&buf[32..36]);
        let computed = crc32fast::hash(&buf[..32]);
        if stored != computed {
            return Err(core_error::Error::ChecksumMismatch { stored, computed });
        }
        Ok(Self {
            block_size: order.read_u32(&buf[4..8]),
            sequence: order.read_u32(&buf[8..12]),
            resetlogs: order.read_u32(&buf[12..16]),
            first_scn: order.read_scn(&buf[16..24]),
            next_scn: order.read_scn(&buf[24..32]),
        })
    }

    /// Encode a header block, the exact inverse of [`RedoHeader::decode`].
    pub fn encode(&self, order: ByteOrder) -> [u8; HEADER_BLOCK_SIZE] {
        let mut buf = [0u8; HEADER_BLOCK_SIZE];
        buf[..4].copy_from_slice(&HEADER_MAGIC);
        order.write_u32(&mut buf[4..8], self.block_size);
        order.write_u32(&mut buf[8..12], self.sequence);
        order.write_u32(&mut buf[12..16], self.resetlogs);
        order.write_scn(&mut buf[16..24], self.first_scn);
        order.write_scn(&mut buf[24..32], self.next_scn);
        let crc = crc32fast::hash(&buf[..32]);
        order.write_u32(&mut buf[32..36], crc);
        buf
    }
}

/// In-flight progress of a partially read log file.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReadState {
    /// Byte offset of the next unread block.
    pub block_offset: u64,

    /// In-flight record bytes spanning the read boundary.
    pub scratch: Vec<u8>,
}

/// One redo log file: an online group member or an archived copy.
#[derive(Debug)]
pub struct RedoLog {
    pub path: PathBuf,

    /// Online group number; [`GROUP_ARCHIVED`] for archived copies.
    pub group: i64,

    pub sequence: SequenceNum,
    pub first_scn: Scn,
    pub next_scn: Scn,

    read_state: Option<ReadState>,
}

impl RedoLog {
    /// Descriptor for an online group member. Sequence and SCNs are
    /// unknown until the first [`RedoLog::reload`].
    pub fn online(group: i64, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            group,
            sequence: 0,
            first_scn: 0,
            next_scn: 0,
            read_state: None,
        }
    }

    /// Descriptor for an archived copy, fully described by the catalog.
    pub fn archived(row: &ArchivedLogRow) -> Self {
        Self {
            path: PathBuf::from(&row.path),
            group: GROUP_ARCHIVED,
            sequence: row.sequence,
            first_scn: row.first_scn,
            next_scn: row.next_scn,
            read_state: None,
        }
    }

    pub fn is_archived(&self) -> bool {
        self.group == GROUP_ARCHIVED
    }

    /// Re-read the header block and refresh sequence and SCNs. Called on
    /// every refresh cycle for online descriptors; the sequence changes
    /// when the database recycles the group.
    pub async fn reload(&mut self, order: ByteOrder) -> Result<()> {
        let mut file = tokio::fs::File::open(&self.path).await?;
        let mut buf = [0u8; HEADER_BLOCK_SIZE];
        let mut filled = 0;
        while filled < HEADER_BLOCK_SIZE {
            let n = file.read(&mut buf[filled..]).await?;
            if n == 0 {
                return Err(core_error::Error::TruncatedHeader(filled).into());
            }
            filled += n;
        }
        let header = RedoHeader::decode(&buf, order)?;
        self.sequence = header.sequence;
        self.first_scn = header.first_scn;
        self.next_scn = header.next_scn;
        Ok(())
    }

    /// Current partial-read progress, if any. Maintained by the log reader
    /// while a file is being streamed.
    pub fn read_state(&self) -> Option<&ReadState> {
        self.read_state.as_ref()
    }

    pub fn read_state_mut(&mut self) -> &mut ReadState {
        self.read_state.get_or_insert_with(ReadState::default)
    }

    /// Move the partial-read state out of this descriptor, leaving it
    /// consumed. Used when abandoning an overwritten online log.
    pub fn take_read_state(&mut self) -> Option<ReadState> {
        self.read_state.take()
    }

    /// Adopt partial-read state taken from another descriptor of the same
    /// sequence, so reading resumes at the exact byte already processed.
    pub fn resume_from(&mut self, state: ReadState) {
        self.read_state = Some(state);
    }

    /// Discard any partial-read state after the file completed.
    pub fn clear_read_state(&mut self) {
        self.read_state = None;
    }
}

/// The online population: one descriptor per group.
#[derive(Debug, Default)]
pub struct OnlineLogSet {
    logs: BTreeMap<i64, RedoLog>,
}

impl OnlineLogSet {
    /// Build the set from the catalog's member listing. Rows arrive grouped
    /// by ascending group id with preferred members first; the first member
    /// whose file exists wins its group. A group with no readable member
    /// fails startup.
    pub async fn discover(rows: &[OnlineLogRow]) -> Result<Self> {
        let mut logs: BTreeMap<i64, RedoLog> = BTreeMap::new();
        let mut seen: Option<i64> = None;

        for row in rows {
            if let Some(group) = seen {
                if group != row.group && !logs.contains_key(&group) {
                    return Err(ReaderError::NoUsableMember { group });
                }
            }
            seen = Some(row.group);

            if logs.contains_key(&row.group) {
                continue;
            }
            if tokio::fs::metadata(&row.member).await.is_ok() {
                info!(group = row.group, member = %row.member, "found online log member");
                logs.insert(row.group, RedoLog::online(row.group, &row.member));
            }
        }

        if let Some(group) = seen {
            if !logs.contains_key(&group) {
                return Err(ReaderError::NoUsableMember { group });
            }
        }

        Ok(Self { logs })
    }

    /// Re-read every descriptor's header. A member that is momentarily
    /// unreadable (the database is recycling it) keeps its previous header
    /// fields and is retried next cycle.
    pub async fn refresh(&mut self, order: ByteOrder) {
        for log in self.logs.values_mut() {
            if let Err(e) = log.reload(order).await {
                warn!(path = %log.path.display(), error = %e, "online log header not readable, keeping previous");
            }
        }
    }

    /// Descriptor currently carrying the given sequence, if any.
    pub fn find_sequence(&mut self, sequence: SequenceNum) -> Option<&mut RedoLog> {
        self.logs
            .values_mut()
            .find(|log| log.sequence == sequence)
    }

    /// True when some group has already moved past the given sequence -
    /// the race for the online copy is lost.
    pub fn has_higher(&self, sequence: SequenceNum) -> bool {
        self.logs.values().any(|log| log.sequence > sequence)
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RedoLog> {
        self.logs.values()
    }
}

/// Heap entry ordering archived descriptors by ascending sequence; path
/// breaks ties deterministically.
#[derive(Debug)]
struct BySequence(RedoLog);

impl PartialEq for BySequence {
    fn eq(&self, other: &Self) -> bool {
        self.0.sequence == other.0.sequence && self.0.path == other.0.path
    }
}

impl Eq for BySequence {}

impl PartialOrd for BySequence {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BySequence {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0
            .sequence
            .cmp(&other.0.sequence)
            .then_with(|| self.0.path.cmp(&other.0.path))
    }
}

/// The archived population: owning min-heap by sequence.
///
/// Duplicate sequences from multiple archive destinations coexist in the
/// heap; only the first popped descriptor of a sequence is processed, the
/// rest fall below the advancing read position and are discarded.
#[derive(Debug, Default)]
pub struct ArchiveQueue {
    heap: BinaryHeap<Reverse<BySequence>>,
}

impl ArchiveQueue {
    /// Replace the queue's contents from a fresh catalog listing.
    pub fn rebuild(&mut self, rows: &[ArchivedLogRow]) {
        self.heap.clear();
        for row in rows {
            self.heap.push(Reverse(BySequence(RedoLog::archived(row))));
        }
        debug!(archived = self.heap.len(), "archive queue rebuilt");
    }

    pub fn push(&mut self, log: RedoLog) {
        self.heap.push(Reverse(BySequence(log)));
    }

    /// Remove and return the lowest-sequence descriptor, transferring
    /// ownership to the caller.
    pub fn pop(&mut self) -> Option<RedoLog> {
        self.heap.pop().map(|Reverse(BySequence(log))| log)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
