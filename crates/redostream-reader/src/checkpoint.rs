//! Durable Read Position
//!
//! The reader survives restarts through one small JSON document,
//! `<database>.json`, holding the last safe position in the redo stream:
//!
//! ```text
//! {
//!   "database": "ORCL",
//!   "sequence": 42,
//!   "scn": 9000,
//!   "resetlogs": 7
//! }
//! ```
//!
//! ## Read Semantics (tolerant)
//!
//! A missing document is a fresh start: the position comes back zeroed and
//! bootstrap seeds it from the database. A document that fails to parse, or
//! that names a different database, is logged and treated the same way -
//! the process keeps running on a zeroed position rather than refusing to
//! start.
//!
//! ## Write Semantics (atomic)
//!
//! Writes go to a temporary sibling file first and are renamed over the
//! document, so a crash mid-write leaves the previous good state intact.
//! The persisted sequence is the *floor*: the oldest log still needed,
//! which is the minimum of the next sequence to read and the first
//! sequence of every open transaction.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use redostream_core::{ResetlogsId, Scn, SequenceNum};

use crate::error::Result;

/// The reader's position in the redo stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadPosition {
    /// Next redo log sequence to read (or the open-transaction floor when
    /// persisted).
    pub sequence: SequenceNum,

    /// Last fully-processed system commit number.
    pub scn: Scn,

    /// Incarnation the position belongs to.
    pub resetlogs: ResetlogsId,
}

#[derive(Debug, Serialize, Deserialize)]
struct CheckpointDoc {
    database: String,
    sequence: SequenceNum,
    scn: Scn,
    resetlogs: ResetlogsId,
}

/// Reads and writes the `<database>.json` position document.
#[derive(Debug)]
pub struct CheckpointStore {
    database: String,
    path: PathBuf,
    tmp_path: PathBuf,
}

impl CheckpointStore {
    pub fn new(dir: impl AsRef<Path>, database: &str) -> Self {
        let path = dir.as_ref().join(format!("{}.json", database));
        let tmp_path = dir.as_ref().join(format!("{}.json.tmp", database));
        Self {
            database: database.to_string(),
            path,
            tmp_path,
        }
    }

    /// Path of the checkpoint document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted position. Missing, malformed, or mismatched
    /// documents all yield a zeroed position; only the malformed and
    /// mismatched cases are logged.
    pub async fn load(&self) -> ReadPosition {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no checkpoint document, starting fresh");
                return ReadPosition::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read checkpoint document");
                return ReadPosition::default();
            }
        };

        let doc: CheckpointDoc = match serde_json::from_str(&raw) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "checkpoint document does not parse");
                return ReadPosition::default();
            }
        };

        if doc.database != self.database {
            warn!(
                path = %self.path.display(),
                expected = %self.database,
                found = %doc.database,
                "checkpoint document names a different database"
            );
            return ReadPosition::default();
        }

        ReadPosition {
            sequence: doc.sequence,
            scn: doc.scn,
            resetlogs: doc.resetlogs,
        }
    }

    /// Persist a position atomically (write temp sibling, rename over).
    pub async fn store(&self, position: ReadPosition) -> Result<()> {
        let doc = CheckpointDoc {
            database: self.database.clone(),
            sequence: position.sequence,
            scn: position.scn,
            resetlogs: position.resetlogs,
        };
        let body = serde_json::to_string_pretty(&doc)?;
        tokio::fs::write(&self.tmp_path, body.as_bytes()).await?;
        tokio::fs::rename(&self.tmp_path, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_missing_is_zeroed() {
        let dir = TempDir::new().unwrap();
        let store = CheckpointStore::new(dir.path(), "ORCL");
        assert_eq!(store.load().await, ReadPosition::default());
    }

    #[tokio::test]
    async fn test_store_then_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = CheckpointStore::new(dir.path(), "ORCL");
        let position = ReadPosition {
            sequence: 42,
            scn: 9000,
            resetlogs: 7,
        };
        store.store(position).await.unwrap();
        assert_eq!(store.load().await, position);
    }

    #[tokio::test]
    async fn test_document_keys_and_values() {
        let dir = TempDir::new().unwrap();
        let store = CheckpointStore::new(dir.path(), "ORCL");
        store
            .store(ReadPosition {
                sequence: 42,
                scn: 9000,
                resetlogs: 7,
            })
            .await
            .unwrap();

        let raw = tokio::fs::read_to_string(store.path()).await.unwrap();
        let val: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(val["database"], "ORCL");
        assert_eq!(val["sequence"], 42);
        assert_eq!(val["scn"], 9000);
        assert_eq!(val["resetlogs"], 7);
    }

    #[tokio::test]
    async fn test_load_parse_error_is_zeroed() {
        let dir = TempDir::new().unwrap();
        let store = CheckpointStore::new(dir.path(), "ORCL");
        tokio::fs::write(store.path(), b"{ not json").await.unwrap();
        assert_eq!(store.load().await, ReadPosition::default());
    }

    #[tokio::test]
    async fn test_load_wrong_database_is_zeroed() {
        let dir = TempDir::new().unwrap();
        // A valid document for a different database, sitting under our name.
        let body = r#"{"database":"OTHER","sequence":5,"scn":100,"resetlogs":1}"#;
        tokio::fs::write(dir.path().join("ORCL.json"), body).await.unwrap();

        let store = CheckpointStore::new(dir.path(), "ORCL");
        assert_eq!(store.load().await, ReadPosition::default());
    }

    #[tokio::test]
    async fn test_store_overwrites_previous() {
        let dir = TempDir::new().unwrap();
        let store = CheckpointStore::new(dir.path(), "ORCL");
        for sequence in [10u32, 11, 12] {
            store
                .store(ReadPosition {
                    sequence,
                    scn: sequence as u64 * 100,
                    resetlogs: 7,
                })
                .await
                .unwrap();
        }
        let loaded = store.load().await;
        assert_eq!(loaded.sequence, 12);
        assert_eq!(loaded.scn, 1200);
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let store = CheckpointStore::new(dir.path(), "ORCL");
        store
            .store(ReadPosition {
                sequence: 1,
                scn: 1,
                resetlogs: 1,
            })
            .await
            .unwrap();
        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries, vec!["ORCL.json".to_string()]);
    }
}
