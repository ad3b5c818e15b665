//! Transaction Bookkeeping
//!
//! Open transactions outlive individual log files, so their accumulated
//! redo payload must be owned by the long-running side of the pipeline,
//! not by any per-file reader. Three pieces cooperate here:
//!
//! - [`ChunkArena`]: a fixed pool of fixed-size buffers with a free list.
//!   Allocation is O(1); running out means the upstream load exceeds the
//!   configured `redo_buffers` and is fatal by design.
//! - [`Transaction`]: one open transaction - its id, the sequence where it
//!   first appeared, and the chunk handles holding its payload.
//! - [`OpenTransactions`]: the id map plus a min-heap over first sequences.
//!   The heap answers exactly one question - "what is the oldest log any
//!   open transaction still needs?" - and is consulted only when a
//!   checkpoint is written. Entries are removed lazily: a popped entry
//!   whose transaction is gone is simply skipped.

use std::collections::{BinaryHeap, HashMap};
use std::cmp::Reverse;

use tracing::info;

use redostream_core::{Scn, SequenceNum};

use crate::error::{ReaderError, Result};

/// Handle to one chunk in the arena. Only the arena can turn a handle back
/// into bytes, and releasing returns the chunk to the free list.
#[derive(Debug, PartialEq, Eq)]
pub struct ChunkHandle(usize);

/// Fixed-capacity pool of transaction chunk buffers.
#[derive(Debug)]
pub struct ChunkArena {
    chunks: Vec<Box<[u8]>>,
    free: Vec<usize>,
    chunk_size: usize,
}

impl ChunkArena {
    pub fn new(count: usize, chunk_size: usize) -> Self {
        let chunks = (0..count)
            .map(|_| vec![0u8; chunk_size].into_boxed_slice())
            .collect();
        // LIFO free list: most recently released chunk is reused first.
        let free = (0..count).rev().collect();
        Self {
            chunks,
            free,
            chunk_size,
        }
    }

    /// Pop a free chunk. Exhaustion is fatal: the configuration bounds the
    /// redo payload that may be in flight at once.
    pub fn alloc(&mut self) -> Result<ChunkHandle> {
        match self.free.pop() {
            Some(index) => Ok(ChunkHandle(index)),
            None => Err(ReaderError::BuffersExhausted {
                capacity: self.chunks.len(),
            }),
        }
    }

    /// Return a chunk to the free list.
    pub fn release(&mut self, handle: ChunkHandle) {
        self.free.push(handle.0);
    }

    pub fn chunk(&self, handle: &ChunkHandle) -> &[u8] {
        &self.chunks[handle.0]
    }

    pub fn chunk_mut(&mut self, handle: &ChunkHandle) -> &mut [u8] {
        &mut self.chunks[handle.0]
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn capacity(&self) -> usize {
        self.chunks.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }
}

/// One open transaction accumulating redo across log files.
#[derive(Debug)]
pub struct Transaction {
    pub xid: u64,

    /// Sequence of the log in which the transaction first appeared. Fixed
    /// for the transaction's lifetime; the checkpoint floor derives from
    /// it.
    pub first_sequence: SequenceNum,

    /// SCN of the transaction's first change.
    pub start_scn: Scn,

    chunks: Vec<ChunkHandle>,

    /// Bytes used in the last chunk.
    pub tail_used: usize,
}

impl Transaction {
    fn new(xid: u64, first_sequence: SequenceNum, start_scn: Scn) -> Self {
        Self {
            xid,
            first_sequence,
            start_scn,
            chunks: Vec::new(),
            tail_used: 0,
        }
    }

    /// Attach a freshly allocated chunk to the tail of the payload.
    pub fn push_chunk(&mut self, handle: ChunkHandle) {
        self.chunks.push(handle);
        self.tail_used = 0;
    }

    pub fn chunks(&self) -> &[ChunkHandle] {
        &self.chunks
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}

/// The set of open transactions plus the checkpoint-floor heap.
#[derive(Debug)]
pub struct OpenTransactions {
    by_xid: HashMap<u64, Transaction>,
    // (first_sequence, xid); stale entries are skipped on peek.
    floor: BinaryHeap<Reverse<(SequenceNum, u64)>>,
    limit: usize,
}

impl Default for OpenTransactions {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenTransactions {
    pub fn new() -> Self {
        Self::with_limit(usize::MAX)
    }

    /// Bound the number of simultaneously open transactions.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            by_xid: HashMap::new(),
            floor: BinaryHeap::new(),
            limit,
        }
    }

    /// Open a transaction. The first sequence is recorded for the
    /// checkpoint floor and never changes.
    pub fn begin(
        &mut self,
        xid: u64,
        first_sequence: SequenceNum,
        start_scn: Scn,
    ) -> Result<&mut Transaction> {
        if self.by_xid.contains_key(&xid) {
            return Err(ReaderError::TransactionAlreadyOpen { xid });
        }
        if self.by_xid.len() >= self.limit {
            return Err(ReaderError::TransactionLimitExceeded { limit: self.limit });
        }
        self.floor.push(Reverse((first_sequence, xid)));
        Ok(self
            .by_xid
            .entry(xid)
            .or_insert_with(|| Transaction::new(xid, first_sequence, start_scn)))
    }

    pub fn get_mut(&mut self, xid: u64) -> Option<&mut Transaction> {
        self.by_xid.get_mut(&xid)
    }

    pub fn contains(&self, xid: u64) -> bool {
        self.by_xid.contains_key(&xid)
    }

    /// Close a transaction (commit or rollback), releasing its chunks back
    /// to the arena. The heap entry is left behind and skipped lazily.
    pub fn finish(&mut self, xid: u64, arena: &mut ChunkArena) -> bool {
        match self.by_xid.remove(&xid) {
            Some(transaction) => {
                for handle in transaction.chunks {
                    arena.release(handle);
                }
                true
            }
            None => false,
        }
    }

    /// The oldest first-sequence among open transactions, or `None` when
    /// none are open. Pops stale heap entries as it goes.
    pub fn min_first_sequence(&mut self) -> Option<SequenceNum> {
        while let Some(&Reverse((sequence, xid))) = self.floor.peek() {
            let live = self
                .by_xid
                .get(&xid)
                .map(|t| t.first_sequence == sequence)
                .unwrap_or(false);
            if live {
                return Some(sequence);
            }
            self.floor.pop();
        }
        None
    }

    pub fn len(&self) -> usize {
        self.by_xid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_xid.is_empty()
    }

    /// Shutdown diagnostic: how much is still in flight.
    pub fn dump(&self, arena: &ChunkArena) {
        info!(
            free_buffers = arena.free_count(),
            total_buffers = arena.capacity(),
            "transaction buffers"
        );
        if !self.by_xid.is_empty() {
            info!(open = self.by_xid.len(), "transactions still open");
            for transaction in self.by_xid.values() {
                info!(
                    xid = format_args!("{:#x}", transaction.xid),
                    first_sequence = transaction.first_sequence,
                    start_scn = transaction.start_scn,
                    chunks = transaction.chunk_count(),
                    "open transaction"
                );
            }
        }
    }
}
