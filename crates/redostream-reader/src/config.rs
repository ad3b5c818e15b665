//! Reader Configuration
//!
//! Constructor inputs for the redo-stream runtime: connection identity,
//! pacing, buffer sizing, and the diagnostic trace switches.
//!
//! ## Trace Switches
//!
//! Structured logging is always on; `trace` and `trace2` gate *extra*
//! diagnostics the way the wire-level tooling expects:
//!
//! - `trace >= TRACE_DETAIL`: per-recovery notices (overwritten online log,
//!   archive continuation)
//! - `trace >= TRACE_FULL`: per-checkpoint timing lines
//! - `trace2 & TRACE2_REDO`: per-refresh log-scan diagnostics

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Baseline diagnostics: startup summary, shutdown transaction dump.
pub const TRACE_INFO: u64 = 1;
/// Adds recovery-path notices.
pub const TRACE_DETAIL: u64 = 2;
/// Adds checkpoint timing detail.
pub const TRACE_FULL: u64 = 3;

/// `trace2` bit enabling per-refresh redo-scan diagnostics.
pub const TRACE2_REDO: u64 = 0x0002;

/// A schema mask to seed the dictionary with, plus per-mask options passed
/// through to the registered objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFilter {
    /// `OWNER.NAME` LIKE pattern.
    pub mask: String,

    /// Option bits attached to every object the mask matches.
    #[serde(default)]
    pub options: u64,
}

/// Configuration for one reader instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Instance alias used in logs.
    pub alias: String,

    /// Database name; also names the checkpoint document
    /// (`<database>.json`).
    pub database: String,

    /// Catalog credentials and connect descriptor. The catalog client
    /// implementation consumes these; the runtime only carries them.
    pub user: String,
    pub passwd: String,
    pub connect_string: String,

    /// Diagnostic level (`TRACE_INFO` / `TRACE_DETAIL` / `TRACE_FULL`).
    #[serde(default = "default_trace")]
    pub trace: u64,

    /// Diagnostic bitmask (`TRACE2_*`).
    #[serde(default)]
    pub trace2: u64,

    /// Dump decoded redo records while reading (consumed by the log
    /// reader).
    #[serde(default)]
    pub dump_redo_log: u64,

    /// Dump raw record bytes while reading (consumed by the log reader).
    #[serde(default)]
    pub dump_raw_data: u64,

    /// Open log files with O_DIRECT (consumed by the log reader).
    #[serde(default)]
    pub direct_read: bool,

    /// Sleep between online-log refresh attempts, in microseconds.
    #[serde(default = "default_redo_read_sleep_us")]
    pub redo_read_sleep_us: u64,

    /// Elapsed seconds between forced checkpoint writes.
    #[serde(default = "default_checkpoint_interval_s")]
    pub checkpoint_interval_s: u64,

    /// Number of transaction chunk buffers in the arena.
    #[serde(default = "default_redo_buffers")]
    pub redo_buffers: usize,

    /// Size of each transaction chunk buffer in bytes.
    #[serde(default = "default_redo_buffer_size")]
    pub redo_buffer_size: usize,

    /// Upper bound on simultaneously open transactions.
    #[serde(default = "default_max_concurrent_transactions")]
    pub max_concurrent_transactions: usize,

    /// Directory holding the checkpoint document.
    #[serde(default = "default_checkpoint_dir")]
    pub checkpoint_dir: PathBuf,

    /// Schema masks seeded into the dictionary at startup.
    #[serde(default)]
    pub tables: Vec<TableFilter>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            alias: String::new(),
            database: String::new(),
            user: String::new(),
            passwd: String::new(),
            connect_string: String::new(),
            trace: default_trace(),
            trace2: 0,
            dump_redo_log: 0,
            dump_raw_data: 0,
            direct_read: false,
            redo_read_sleep_us: default_redo_read_sleep_us(),
            checkpoint_interval_s: default_checkpoint_interval_s(),
            redo_buffers: default_redo_buffers(),
            redo_buffer_size: default_redo_buffer_size(),
            max_concurrent_transactions: default_max_concurrent_transactions(),
            checkpoint_dir: default_checkpoint_dir(),
            tables: Vec::new(),
        }
    }
}

fn default_trace() -> u64 {
    TRACE_INFO
}

fn default_redo_read_sleep_us() -> u64 {
    10_000
}

fn default_checkpoint_interval_s() -> u64 {
    10
}

fn default_redo_buffers() -> usize {
    64
}

fn default_redo_buffer_size() -> usize {
    64 * 1024
}

fn default_max_concurrent_transactions() -> usize {
    1024
}

fn default_checkpoint_dir() -> PathBuf {
    PathBuf::from(".")
}
