//! `CheckpointSaver` (spec §4.11, §6): durable `(thread_id, checkpoint_id)`
//! records so `resume()` can pick up at the exact suspended node. Grounded
//! on `ghostline-cost::SqliteCostLedger`'s WAL/PRAGMA conventions for the
//! SQLite-backed implementation.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use ghostline_core::model::WorkflowState;
use rusqlite::{params, Connection};
use serde_json::Value;
use tracing::info;

use crate::errors::CheckpointResult;

/// One persisted snapshot of a workflow's state.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    pub thread_id: String,
    pub checkpoint_id: String,
    pub parent_checkpoint_id: Option<String>,
    pub state: WorkflowState,
    pub metadata: Value,
}

pub trait CheckpointSaver: Send + Sync {
    fn save(
        &self,
        thread_id: &str,
        checkpoint_id: &str,
        parent_checkpoint_id: Option<&str>,
        state: &WorkflowState,
        metadata: Value,
    ) -> CheckpointResult<()>;

    /// The most recently saved checkpoint for `thread_id`, or `None` if the
    /// workflow has never been checkpointed.
    fn load_latest(&self, thread_id: &str) -> CheckpointResult<Option<Checkpoint>>;
}

/// In-process saver for dev/tests (spec §4.11: "at minimum an in-process
/// saver for dev"). Concurrent access across distinct `thread_id`s is
/// safe; same-`thread_id` access must be serialized by the caller, as
/// required by spec §5.
#[derive(Default)]
pub struct MemCheckpointSaver {
    by_thread: Mutex<HashMap<String, Vec<Checkpoint>>>,
}

impl MemCheckpointSaver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CheckpointSaver for MemCheckpointSaver {
    fn save(
        &self,
        thread_id: &str,
        checkpoint_id: &str,
        parent_checkpoint_id: Option<&str>,
        state: &WorkflowState,
        metadata: Value,
    ) -> CheckpointResult<()> {
        let mut guard = self.by_thread.lock().unwrap();
        guard.entry(thread_id.to_string()).or_default().push(Checkpoint {
            thread_id: thread_id.to_string(),
            checkpoint_id: checkpoint_id.to_string(),
            parent_checkpoint_id: parent_checkpoint_id.map(str::to_string),
            state: state.clone(),
            metadata,
        });
        Ok(())
    }

    fn load_latest(&self, thread_id: &str) -> CheckpointResult<Option<Checkpoint>> {
        let guard = self.by_thread.lock().unwrap();
        Ok(guard.get(thread_id).and_then(|v| v.last().cloned()))
    }
}

const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS workflow_checkpoints (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    thread_id TEXT NOT NULL,
    checkpoint_id TEXT NOT NULL,
    parent_checkpoint_id TEXT,
    checkpoint_data BLOB NOT NULL,
    metadata TEXT NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE(thread_id, checkpoint_id)
);
CREATE INDEX IF NOT EXISTS idx_workflow_checkpoints_thread ON workflow_checkpoints(thread_id, created_at);
"#;

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;")
}

/// Database-backed saver for production (spec §4.11). One row per
/// `(thread_id, checkpoint_id)`; `checkpoint_data` is the full
/// `WorkflowState` serialized as JSON bytes.
pub struct SqliteCheckpointSaver {
    conn: Mutex<Connection>,
}

impl SqliteCheckpointSaver {
    pub fn open_in_memory() -> CheckpointResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    pub fn open(path: &str) -> CheckpointResult<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> CheckpointResult<Self> {
        configure_connection(&conn)?;
        conn.execute_batch(SCHEMA_V1)?;
        info!("checkpoint store schema ready");
        Ok(Self { conn: Mutex::new(conn) })
    }
}

impl CheckpointSaver for SqliteCheckpointSaver {
    fn save(
        &self,
        thread_id: &str,
        checkpoint_id: &str,
        parent_checkpoint_id: Option<&str>,
        state: &WorkflowState,
        metadata: Value,
    ) -> CheckpointResult<()> {
        let data = serde_json::to_vec(state)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO workflow_checkpoints
                (thread_id, checkpoint_id, parent_checkpoint_id, checkpoint_data, metadata, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                thread_id,
                checkpoint_id,
                parent_checkpoint_id,
                data,
                metadata.to_string(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn load_latest(&self, thread_id: &str) -> CheckpointResult<Option<Checkpoint>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT checkpoint_id, parent_checkpoint_id, checkpoint_data, metadata
             FROM workflow_checkpoints
             WHERE thread_id = ?1
             ORDER BY id DESC LIMIT 1",
        )?;
        let row = stmt
            .query_row(params![thread_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Vec<u8>>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .ok();

        let Some((checkpoint_id, parent_checkpoint_id, data, metadata)) = row else {
            return Ok(None);
        };
        let state: WorkflowState = serde_json::from_slice(&data)?;
        let metadata: Value = serde_json::from_str(&metadata).unwrap_or(Value::Null);
        Ok(Some(Checkpoint {
            thread_id: thread_id.to_string(),
            checkpoint_id,
            parent_checkpoint_id,
            state,
            metadata,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghostline_core::model::WorkflowState;
    use serde_json::json;

    #[test]
    fn mem_saver_returns_most_recent_checkpoint() {
        let saver = MemCheckpointSaver::new();
        let s1 = WorkflowState::new("w1", "p1", "u1", 3, 2000);
        let mut s2 = s1.clone();
        s2.progress = 50;

        saver.save("w1", "c1", None, &s1, json!({})).unwrap();
        saver.save("w1", "c2", Some("c1"), &s2, json!({})).unwrap();

        let latest = saver.load_latest("w1").unwrap().unwrap();
        assert_eq!(latest.checkpoint_id, "c2");
        assert_eq!(latest.state.progress, 50);
    }

    #[test]
    fn sqlite_saver_round_trips_state() {
        let saver = SqliteCheckpointSaver::open_in_memory().unwrap();
        let state = WorkflowState::new("w1", "p1", "u1", 3, 2000);
        saver.save("w1", "c1", None, &state, json!({"note": "first"})).unwrap();

        let latest = saver.load_latest("w1").unwrap().unwrap();
        assert_eq!(latest.state.workflow_id, "w1");
        assert_eq!(latest.metadata, json!({"note": "first"}));
    }

    #[test]
    fn unknown_thread_id_yields_none() {
        let saver = MemCheckpointSaver::new();
        assert!(saver.load_latest("missing").unwrap().is_none());
    }
}
