//! Catalog Query Result Shapes
//!
//! Typed rows for the fixed set of catalog queries the reader issues. The
//! shapes are part of the operational contract with the source database:
//! each struct mirrors one SELECT list in [`crate::sql`].

use redostream_core::{ResetlogsId, Scn, SequenceNum};
use serde::{Deserialize, Serialize};

/// Everything learned from the one-time bootstrap query against the
/// database and incarnation views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapInfo {
    /// Database logging mode; must be `ARCHIVELOG` for streaming to work.
    pub log_mode: String,

    /// Whether minimal supplemental logging is enabled (`YES`/`NO`).
    pub supplemental_log_min: String,

    /// Platform endianness as reported by the transportable-platform view
    /// (`Big` or `Little`).
    pub endianness: String,

    /// Current system commit number at bootstrap time.
    pub current_scn: Scn,

    /// Identifier of the current database incarnation.
    pub resetlogs: ResetlogsId,

    /// Version banner string, used to distinguish the 11g family.
    pub version_banner: String,

    /// Database name from the session context.
    pub db_name: String,
}

impl BootstrapInfo {
    /// True when the version banner belongs to the 11g family, which has no
    /// container concept.
    pub fn is_11g(&self) -> bool {
        self.version_banner.contains("Database 11g")
    }
}

/// One member row of the online logfile listing, ordered so that the first
/// readable member of each group wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlineLogRow {
    /// Online log group number.
    pub group: i64,

    /// Path of one member of the group.
    pub member: String,
}

/// One row of the archived-log listing for a resetlogs incarnation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedLogRow {
    /// Path of the archived copy.
    pub path: String,

    /// Redo log sequence number of the archived copy.
    pub sequence: SequenceNum,

    /// First change number covered by the file.
    pub first_scn: Scn,

    /// First change number of the following file.
    pub next_scn: Scn,
}

/// One table row from the schema listing.
///
/// `objd` is `None` for partitioned and index-organized tables, which the
/// dictionary skips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub objn: u32,
    pub objd: Option<u32>,
    /// Cluster-column count as reported by the catalog. Carried through but
    /// stored as zero by the dictionary; see DESIGN.md.
    pub clu_cols: Option<u64>,
    pub owner: String,
    pub name: String,
    pub dependencies: bool,
}

/// One column row for a table, ordered by segment column number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRow {
    pub col_no: u64,
    pub seg_col_no: u64,
    pub name: String,
    pub type_no: u64,
    pub length: u64,
    pub precision: Option<i64>,
    pub scale: Option<i64>,
    pub num_pk: u64,
    pub nullable: bool,
}
