//! redostream catalog client
//!
//! This crate defines the typed contract for the handful of read-only
//! queries the redo reader issues against the source database's catalog
//! views: the bootstrap snapshot, the current online sequence, the online
//! and archived log listings, and the schema-seeding table/column queries.
//!
//! ## Why a Trait?
//!
//! The reader never speaks SQL itself; it consumes typed rows. Keeping the
//! client behind `Arc<dyn CatalogClient>` lets deployments bind whatever
//! driver reaches their server, and lets the test suite script the catalog
//! precisely (log switches mid-scenario, connection loss, version
//! differences) without a database.
//!
//! The literal statement text each call is expected to execute lives in
//! [`sql`]; the result shapes in [`types`].
//!
//! ## Error Model
//!
//! Individual queries fail loudly with a [`CatalogError`] and are not
//! retried by the client. The runtime re-establishes the session via
//! [`CatalogClient::ensure_connected`] on its next loop iteration, with a
//! 5-second backoff, until shutdown.

pub mod error;
pub mod sql;
pub mod types;

pub use error::{CatalogError, Result};
pub use types::{ArchivedLogRow, BootstrapInfo, ColumnRow, OnlineLogRow, TableRow};

use async_trait::async_trait;
use redostream_core::{ResetlogsId, SequenceNum};

/// Typed access to the source database's catalog views.
///
/// Implementations must be `Send + Sync` so the reader can hold the client
/// as `Arc<dyn CatalogClient>` inside its long-running task.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Establish (or re-establish) the database session. Idempotent when
    /// already connected.
    async fn ensure_connected(&self) -> Result<()>;

    /// Run the bootstrap query ([`sql::BOOTSTRAP`]): logging mode,
    /// supplemental logging, endianness, current SCN, incarnation, version
    /// banner, and database name.
    async fn bootstrap(&self) -> Result<BootstrapInfo>;

    /// Sequence of the online log currently being written
    /// ([`sql::CURRENT_ONLINE_SEQUENCE`]). Consulted only when no prior
    /// read position exists.
    async fn current_online_sequence(&self) -> Result<SequenceNum>;

    /// Session container id ([`sql::CONTAINER_ID`]). Only called for
    /// versions past the 11g family.
    async fn container_id(&self) -> Result<u32>;

    /// Online log members ordered `(group ASC, is_recovery_dest_file DESC,
    /// member ASC)` ([`sql::ONLINE_LOGFILES`]).
    async fn list_online_logfiles(&self) -> Result<Vec<OnlineLogRow>>;

    /// Archived logs with `sequence >= sequence_floor` in the given
    /// incarnation, ordered `(sequence, dest_id)` ([`sql::ARCHIVED_LOGS`]).
    /// Duplicate sequences from multiple destinations are returned as-is.
    async fn list_archived_logs(
        &self,
        sequence_floor: SequenceNum,
        resetlogs: ResetlogsId,
    ) -> Result<Vec<ArchivedLogRow>>;

    /// Tables matching an `OWNER.NAME` LIKE mask ([`sql::TABLES_BY_MASK`]).
    async fn list_tables(&self, mask: &str) -> Result<Vec<TableRow>>;

    /// Columns of one table ordered by segment column number
    /// ([`sql::COLUMNS_BY_OBJN`]).
    async fn list_columns(&self, objn: u32) -> Result<Vec<ColumnRow>>;
}
