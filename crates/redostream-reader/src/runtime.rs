//! Redo-Stream Runtime
//!
//! The long-running loop that plays the redo stream forward without gaps.
//! One instance owns the whole pipeline state: the durable read position,
//! the online and archived log registries, the schema dictionary, the
//! transaction bookkeeping, and the producer side of the command buffer.
//!
//! ## Lifecycle
//!
//! 1. **Startup**: load the checkpoint document, connect to the catalog
//!    (retrying every 5 seconds until shutdown), run the bootstrap query,
//!    bind the byte order, verify the incarnation, seed the read position
//!    when no checkpoint existed, build the online set, and seed the schema
//!    dictionary. Configuration problems (not in archivelog mode,
//!    supplemental logging off, incarnation change) fail startup and are
//!    never retried.
//! 2. **Streaming**: alternate two phases until shutdown.
//!    - *Phase A* drains online logs: refresh headers, process the group
//!      carrying the next sequence, advance, checkpoint. When no group
//!      carries it but one has moved past it, the race for the online copy
//!      is lost and the loop falls through to Phase B.
//!    - *Phase B* drains archived logs in ascending sequence order. A
//!      missing sequence while a higher one exists is a hard gap. When the
//!      previous online read ended mid-file, its partial-read state is
//!      moved into the matching archived descriptor so not a byte is read
//!      twice.
//! 3. **Shutdown**: observed at iteration boundaries; writes a final
//!    checkpoint and dumps the open-transaction diagnostics.
//!
//! ## Threading
//!
//! Everything runs on one task. The only shared state is the producer side
//! of the command buffer and the shutdown flag, which is only ever read
//! here.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use redostream_catalog::CatalogClient;
use redostream_core::{ByteOrder, RowEvent};

use crate::checkpoint::{CheckpointStore, ReadPosition};
use crate::config::{ReaderConfig, TRACE2_REDO, TRACE_DETAIL, TRACE_FULL};
use crate::error::{ReaderError, Result};
use crate::logfile::{ArchiveQueue, OnlineLogSet, ReadState};
use crate::process::{LogReader, ProcessOutcome, ReaderContext};
use crate::schema::SchemaDictionary;
use crate::transaction::{ChunkArena, OpenTransactions};

/// Backoff between catalog connection attempts.
const RECONNECT_BACKOFF: Duration = Duration::from_secs(5);

/// The redo-stream orchestrator.
pub struct ReaderRuntime<R: LogReader> {
    config: ReaderConfig,
    catalog: Arc<dyn CatalogClient>,
    reader: R,
    events: mpsc::Sender<RowEvent>,
    shutdown: Arc<AtomicBool>,

    checkpoints: CheckpointStore,
    position: ReadPosition,
    order: ByteOrder,
    container_id: u32,

    online: OnlineLogSet,
    archive: ArchiveQueue,
    schema: SchemaDictionary,
    transactions: OpenTransactions,
    arena: ChunkArena,

    last_checkpoint: Instant,
}

impl<R: LogReader> ReaderRuntime<R> {
    pub fn new(
        config: ReaderConfig,
        catalog: Arc<dyn CatalogClient>,
        reader: R,
        events: mpsc::Sender<RowEvent>,
    ) -> Self {
        let checkpoints = CheckpointStore::new(&config.checkpoint_dir, &config.database);
        let arena = ChunkArena::new(config.redo_buffers, config.redo_buffer_size);
        let transactions = OpenTransactions::with_limit(config.max_concurrent_transactions);
        Self {
            config,
            catalog,
            reader,
            events,
            shutdown: Arc::new(AtomicBool::new(false)),
            checkpoints,
            position: ReadPosition::default(),
            order: ByteOrder::LittleEndian,
            container_id: 0,
            online: OnlineLogSet::default(),
            archive: ArchiveQueue::default(),
            schema: SchemaDictionary::new(),
            transactions,
            arena,
            last_checkpoint: Instant::now(),
        }
    }

    /// Flag an external signal handler can set to stop the loop at the
    /// next iteration boundary.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Byte order bound at bootstrap.
    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    /// Run until shutdown or a fatal error. Writes a final checkpoint and
    /// dumps transaction diagnostics on the way out - except when startup
    /// validation itself failed, which must leave the previous checkpoint
    /// untouched.
    pub async fn run(mut self) -> Result<()> {
        info!(
            database = %self.config.database,
            alias = %self.config.alias,
            "redo reader starting"
        );

        if let Err(e) = self.initialize().await {
            error!(database = %self.config.database, error = %e, "startup failed");
            return Err(e);
        }
        if self.shutdown_requested() {
            return Ok(());
        }

        let result = self.stream().await;
        if let Err(e) = &result {
            error!(database = %self.config.database, error = %e, "redo stream terminated");
        }

        self.write_checkpoint(true).await;
        self.transactions.dump(&self.arena);
        result
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    /// Connect to the catalog, retrying with a fixed backoff until it
    /// succeeds or shutdown is requested. Returns false on shutdown.
    async fn ensure_catalog(&self) -> bool {
        loop {
            if self.shutdown_requested() {
                return false;
            }
            match self.catalog.ensure_connected().await {
                Ok(()) => return true,
                Err(e) => {
                    error!(
                        database = %self.config.database,
                        error = %e,
                        "cannot connect to database, retrying in 5s"
                    );
                }
            }
            tokio::time::sleep(RECONNECT_BACKOFF).await;
        }
    }

    async fn initialize(&mut self) -> Result<()> {
        self.position = self.checkpoints.load().await;

        if !self.ensure_catalog().await {
            return Ok(());
        }

        let info = self.catalog.bootstrap().await?;

        if info.log_mode != "ARCHIVELOG" {
            return Err(ReaderError::NotArchiveLog);
        }
        if info.supplemental_log_min != "YES" {
            return Err(ReaderError::SupplementalLogMissing);
        }

        self.order = if info.endianness == "Big" {
            ByteOrder::BigEndian
        } else {
            ByteOrder::LittleEndian
        };

        if self.position.resetlogs != 0 && self.position.resetlogs != info.resetlogs {
            return Err(ReaderError::ResetlogsMismatch {
                previous: self.position.resetlogs,
                current: info.resetlogs,
            });
        }
        self.position.resetlogs = info.resetlogs;

        info!(version = %info.version_banner, db = %info.db_name, "database identified");

        self.container_id = if info.is_11g() {
            0
        } else {
            let con_id = self.catalog.container_id().await?;
            info!(container = con_id, "container bound");
            con_id
        };

        // An empty checkpoint seeds from the log the database is writing
        // right now.
        if self.position.sequence == 0 || self.position.scn == 0 {
            self.position.sequence = self.catalog.current_online_sequence().await?;
            self.position.scn = info.current_scn;
        }

        info!(
            sequence = self.position.sequence,
            scn = self.position.scn,
            resetlogs = self.position.resetlogs,
            "read position established"
        );

        if self.position.sequence == 0 || self.position.scn == 0 {
            return Err(ReaderError::BootstrapFailed(
                "no current online log sequence".to_string(),
            ));
        }

        let rows = self.catalog.list_online_logfiles().await?;
        self.online = OnlineLogSet::discover(&rows).await?;

        for filter in &self.config.tables {
            self.schema
                .seed(self.catalog.as_ref(), &filter.mask, filter.options)
                .await?;
        }

        Ok(())
    }

    /// The two-phase drain loop.
    async fn stream(&mut self) -> Result<()> {
        // Partial-read state carried from an overwritten online log to its
        // archived copy, keyed by the sequence it belongs to.
        let mut pending_switch: Option<(u32, ReadState)> = None;

        loop {
            if self.shutdown_requested() {
                return Ok(());
            }
            let mut logs_processed = false;

            // ---- Phase A: drain online logs ----
            if self.config.trace2 & TRACE2_REDO != 0 {
                debug!("checking online redo logs");
            }
            self.online.refresh(self.order).await;

            loop {
                if self.shutdown_requested() {
                    return Ok(());
                }
                let wanted = self.position.sequence;

                if self.config.trace2 & TRACE2_REDO != 0 {
                    debug!(sequence = wanted, "searching online redo log");
                    for log in self.online.iter() {
                        debug!(path = %log.path.display(), sequence = log.sequence, "online candidate");
                    }
                }

                if self.online.find_sequence(wanted).is_none() {
                    if self.online.has_higher(wanted) {
                        // Race lost: the group we need was recycled before
                        // we opened it. The archive has the copy.
                        break;
                    }
                    tokio::time::sleep(Duration::from_micros(self.config.redo_read_sleep_us))
                        .await;
                    if self.shutdown_requested() {
                        return Ok(());
                    }
                    self.online.refresh(self.order).await;
                    continue;
                }

                logs_processed = true;
                let Some(log) = self.online.find_sequence(wanted) else {
                    continue;
                };
                let outcome = self
                    .reader
                    .process_log(
                        log,
                        ReaderContext {
                            order: self.order,
                            schema: &self.schema,
                            transactions: &mut self.transactions,
                            arena: &mut self.arena,
                            events: &self.events,
                            config: &self.config,
                            database_scn: &mut self.position.scn,
                        },
                    )
                    .await?;

                let switched = match outcome {
                    ProcessOutcome::SequenceSwitched => {
                        pending_switch = log.take_read_state().map(|state| (wanted, state));
                        true
                    }
                    ProcessOutcome::Completed => {
                        log.clear_read_state();
                        false
                    }
                };

                if switched {
                    if self.config.trace >= TRACE_DETAIL {
                        info!(sequence = wanted, "online redo log overwritten by new data");
                    }
                    break;
                }

                self.position.sequence = wanted + 1;
                self.write_checkpoint(false).await;
                if self.shutdown_requested() {
                    return Ok(());
                }
            }

            // ---- Phase B: drain archived logs ----
            if self.shutdown_requested() {
                return Ok(());
            }
            if self.config.trace2 & TRACE2_REDO != 0 {
                debug!("checking archive redo logs");
            }
            if !self.ensure_catalog().await {
                return Ok(());
            }
            match self
                .catalog
                .list_archived_logs(self.position.sequence, self.position.resetlogs)
                .await
            {
                Ok(rows) => self.archive.rebuild(&rows),
                Err(e) => {
                    error!(error = %e, "cannot list archived logs");
                }
            }

            while let Some(mut redo) = self.archive.pop() {
                if self.config.trace2 & TRACE2_REDO != 0 {
                    debug!(
                        wanted = self.position.sequence,
                        found = redo.sequence,
                        "searching archived redo log"
                    );
                }

                if redo.sequence < self.position.sequence {
                    // Already processed, e.g. a duplicate from a second
                    // archive destination. The popped descriptor is dropped.
                    continue;
                }
                if redo.sequence > self.position.sequence {
                    return Err(ReaderError::SequenceGap {
                        wanted: self.position.sequence,
                        found: redo.sequence,
                    });
                }

                if let Some((sequence, state)) = pending_switch.take() {
                    if sequence == redo.sequence {
                        if self.config.trace >= TRACE_DETAIL {
                            info!(
                                sequence,
                                "continuing broken online redo log read with archived copy"
                            );
                        }
                        redo.resume_from(state);
                    }
                }

                if self.shutdown_requested() {
                    return Ok(());
                }
                logs_processed = true;
                let outcome = self
                    .reader
                    .process_log(
                        &mut redo,
                        ReaderContext {
                            order: self.order,
                            schema: &self.schema,
                            transactions: &mut self.transactions,
                            arena: &mut self.arena,
                            events: &self.events,
                            config: &self.config,
                            database_scn: &mut self.position.scn,
                        },
                    )
                    .await?;

                match outcome {
                    ProcessOutcome::Completed => {
                        self.position.sequence = redo.sequence + 1;
                        self.write_checkpoint(false).await;
                        // `redo` is dropped here; the pop transferred sole
                        // ownership out of the heap.
                    }
                    ProcessOutcome::SequenceSwitched => {
                        return Err(ReaderError::ProcessFailed {
                            path: redo.path.display().to_string(),
                            detail: "archived log reported a sequence switch".to_string(),
                        });
                    }
                }
            }

            self.maybe_interval_checkpoint().await;

            if !logs_processed {
                tokio::time::sleep(Duration::from_micros(self.config.redo_read_sleep_us)).await;
            }
        }
    }

    /// Persist the current position. The stored sequence floats down to the
    /// oldest log any open transaction still needs, so a restart re-reads
    /// everything an uncommitted transaction depends on. Write failures are
    /// logged and the stream continues; the next successful write
    /// supersedes.
    async fn write_checkpoint(&mut self, at_shutdown: bool) {
        let floor = self
            .transactions
            .min_first_sequence()
            .map(|f| f.min(self.position.sequence))
            .unwrap_or(self.position.sequence);
        let persisted = ReadPosition {
            sequence: floor,
            scn: self.position.scn,
            resetlogs: self.position.resetlogs,
        };

        if self.config.trace >= TRACE_FULL {
            debug!(
                floor,
                next = self.position.sequence,
                scn = self.position.scn,
                elapsed_s = self.last_checkpoint.elapsed().as_secs(),
                "writing checkpoint"
            );
        }

        if let Err(e) = self.checkpoints.store(persisted).await {
            warn!(
                database = %self.config.database,
                error = %e,
                "checkpoint write failed"
            );
        }
        self.last_checkpoint = Instant::now();

        if at_shutdown {
            info!(
                database = %self.config.database,
                container = self.container_id,
                sequence = floor,
                scn = self.position.scn,
                resetlogs = self.position.resetlogs,
                "final checkpoint written"
            );
        }
    }

    /// Force a checkpoint when too much wall time has passed since the
    /// last one, so an idle stream still persists its position.
    async fn maybe_interval_checkpoint(&mut self) {
        let elapsed = self.last_checkpoint.elapsed().as_secs();
        if elapsed > self.config.checkpoint_interval_s {
            if self.config.trace >= TRACE_FULL {
                debug!(elapsed_s = elapsed, "checkpoint interval elapsed, forcing write");
            }
            self.write_checkpoint(false).await;
        }
    }
}
