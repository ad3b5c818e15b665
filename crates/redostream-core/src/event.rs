//! Row Events
//!
//! This module defines [`RowEvent`] - the unit of output the redo pipeline
//! hands to the downstream command buffer.
//!
//! ## What is a Row Event?
//!
//! One committed row-level change decoded from the redo stream:
//! - Which commit it belongs to (`scn`)
//! - Which transaction produced it (`xid`)
//! - Which table object it touched (`object_id`)
//! - What happened ([`RowOp`])
//! - The decoded column payload (opaque bytes to this layer)
//!
//! Events leave the pipeline in ascending SCN order within a log sequence,
//! and sequences are played in ascending order, so the consumer observes a
//! commit-ordered stream.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// The kind of change a [`RowEvent`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowOp {
    Insert,
    Update,
    Delete,
    Commit,
    Rollback,
}

/// A single committed row change, emitted to the command buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowEvent {
    /// System commit number this change was committed under.
    pub scn: u64,

    /// Transaction identifier.
    pub xid: u64,

    /// Object number of the table this change touched.
    pub object_id: u32,

    /// What happened to the row.
    pub op: RowOp,

    /// Decoded column data; opaque at this layer.
    pub payload: Bytes,
}

impl RowEvent {
    pub fn new(scn: u64, xid: u64, object_id: u32, op: RowOp, payload: Bytes) -> Self {
        Self {
            scn,
            xid,
            object_id,
            op,
            payload,
        }
    }

    /// Estimate the in-memory size of this event in bytes.
    pub fn estimated_size(&self) -> usize {
        8 + // scn
        8 + // xid
        4 + // object_id
        1 + // op
        self.payload.len()
    }
}
