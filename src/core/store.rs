//! SQLite-backed persistent baseline storage.

use super::error::Result;
use super::types::BaselineEntry;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Persistent mapping from absolute file path to its last-recorded
/// fingerprint and metadata. One table, one row per monitored file.
///
/// The connection is owned by the store and closed when it is dropped.
/// Single-writer, single-reader: no internal locking is provided, so a
/// store must not be shared across threads without external
/// synchronization.
#[derive(Debug)]
pub struct BaselineStore {
    conn: Connection,
}

impl BaselineStore {
    /// Open (or create) the baseline database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = BaselineStore { conn };
        store.init_schema()?;
        debug!(database = %path.display(), "baseline store opened");
        Ok(store)
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = BaselineStore { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS monitored_files (
                path            TEXT PRIMARY KEY,
                digest          TEXT NOT NULL,
                size            INTEGER NOT NULL,
                modified_at     REAL NOT NULL,
                created_at      REAL NOT NULL,
                permission_bits INTEGER NOT NULL,
                recorded_at     REAL NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Upsert an entry, replacing any existing row for the same path.
    /// Stamps `recorded_at` with the current wall-clock time.
    pub fn put(&self, entry: &BaselineEntry) -> Result<()> {
        let recorded_at = now_epoch();
        self.conn.execute(
            "INSERT OR REPLACE INTO monitored_files
             (path, digest, size, modified_at, created_at, permission_bits, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entry.path,
                entry.digest,
                entry.size,
                entry.modified_at,
                entry.created_at,
                entry.permission_bits,
                recorded_at,
            ],
        )?;
        Ok(())
    }

    /// Point lookup by absolute path.
    pub fn get(&self, path: &str) -> Result<Option<BaselineEntry>> {
        let entry = self
            .conn
            .query_row(
                "SELECT path, digest, size, modified_at, created_at, permission_bits, recorded_at
                 FROM monitored_files WHERE path = ?1",
                params![path],
                |row| {
                    Ok(BaselineEntry {
                        path: row.get(0)?,
                        digest: row.get(1)?,
                        size: row.get(2)?,
                        modified_at: row.get(3)?,
                        created_at: row.get(4)?,
                        permission_bits: row.get(5)?,
                        recorded_at: row.get(6)?,
                    })
                },
            )
            .optional()?;
        Ok(entry)
    }

    /// Every path currently in the baseline. Reads the durable state at
    /// call time; nothing is cached.
    pub fn all_paths(&self) -> Result<BTreeSet<String>> {
        let mut stmt = self.conn.prepare("SELECT path FROM monitored_files")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut paths = BTreeSet::new();
        for row in rows {
            paths.insert(row?);
        }
        Ok(paths)
    }

    /// Delete the entry for `path`. Absent rows are a no-op, not an error.
    pub fn remove(&self, path: &str) -> Result<()> {
        self.conn.execute(
            "DELETE FROM monitored_files WHERE path = ?1",
            params![path],
        )?;
        Ok(())
    }

    /// Number of entries in the baseline.
    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM monitored_files", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// True when the baseline contains no entries.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

fn now_epoch() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
