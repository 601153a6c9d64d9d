//! SQLite progress store
//!
//! This module provides a SQLite-based implementation of the ProgressStore
//! and FrontierStore traits. Both live in the same database file.

use crate::storage::schema::{initialize_schema, CRAWL_KEY, CURSOR_KEY, FINGERPRINT_KEY};
use crate::storage::traits::{
    FrontierSnapshot, FrontierStore, PageStatus, ProgressStore, StorageError, StorageResult,
};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

/// SQLite-backed checkpoint store
///
/// The database is opened lazily: if it cannot be opened now, the failure is
/// logged and every later operation tries again.
pub struct SqliteProgressStore {
    path: PathBuf,
    conn: Option<Connection>,
}

impl SqliteProgressStore {
    /// Opens (or creates) the progress database at `path`
    pub fn open(path: &Path) -> Self {
        let conn = match open_connection(path) {
            Ok(conn) => Some(conn),
            Err(e) => {
                tracing::error!("Failed to open progress database {}: {}", path.display(), e);
                None
            }
        };

        Self {
            path: path.to_path_buf(),
            conn,
        }
    }

    /// Path of the backing database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connection(&mut self) -> StorageResult<&Connection> {
        if self.conn.is_none() {
            self.conn = Some(open_connection(&self.path)?);
        }
        self.conn
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable(self.path.display().to_string()))
    }

    fn read_value(&mut self, key: &str) -> StorageResult<Option<String>> {
        let conn = self.connection()?;
        let value = conn
            .query_row(
                "SELECT value FROM progress WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write_value(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let conn = self.connection()?;
        upsert_value(conn, key, value, &now)?;
        Ok(())
    }

    fn read_pages(&mut self) -> StorageResult<Vec<(String, u32, PageStatus)>> {
        let conn = self.connection()?;
        let mut stmt =
            conn.prepare("SELECT url, depth, status FROM crawl_frontier ORDER BY seq")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u32>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut pages = Vec::new();
        for row in rows {
            let (url, depth, status) = row?;
            let status = PageStatus::parse(&status).ok_or(StorageError::Corrupt {
                key: "crawl_frontier.status",
                value: status,
            })?;
            pages.push((url, depth, status));
        }
        Ok(pages)
    }

    fn read_cursor(&mut self) -> StorageResult<Option<usize>> {
        match self.read_value(CURSOR_KEY)? {
            None => Ok(None),
            Some(value) => value
                .trim()
                .parse::<usize>()
                .map(Some)
                .map_err(|_| StorageError::Corrupt {
                    key: CURSOR_KEY,
                    value,
                }),
        }
    }
}

impl ProgressStore for SqliteProgressStore {
    fn load(&mut self) -> usize {
        match self.read_cursor() {
            Ok(Some(cursor)) => cursor,
            Ok(None) => 0,
            Err(e) => {
                tracing::warn!("Could not read saved progress, starting from 0: {}", e);
                0
            }
        }
    }

    fn save(&mut self, cursor: usize) -> StorageResult<()> {
        self.write_value(CURSOR_KEY, &cursor.to_string())
    }

    fn reset(&mut self) -> StorageResult<()> {
        let conn = self.connection()?;
        conn.execute(
            "DELETE FROM progress WHERE key IN (?1, ?2)",
            params![CURSOR_KEY, FINGERPRINT_KEY],
        )?;
        Ok(())
    }

    fn load_fingerprint(&mut self) -> Option<String> {
        match self.read_value(FINGERPRINT_KEY) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Could not read input fingerprint: {}", e);
                None
            }
        }
    }

    fn save_fingerprint(&mut self, fingerprint: &str) -> StorageResult<()> {
        self.write_value(FINGERPRINT_KEY, fingerprint)
    }
}

impl FrontierStore for SqliteProgressStore {
    fn load_frontier(&mut self, seed: &str, max_depth: u32) -> Option<FrontierSnapshot> {
        let expected = crawl_key(seed, max_depth);
        match self.read_value(CRAWL_KEY) {
            Ok(Some(saved)) if saved == expected => {}
            Ok(Some(saved)) => {
                tracing::info!("Saved crawl ({}) does not match this one; starting over", saved);
                return None;
            }
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Could not read saved crawl, starting over: {}", e);
                return None;
            }
        }

        match self.read_pages() {
            Ok(pages) => Some(FrontierSnapshot::from_pages(pages)),
            Err(e) => {
                tracing::warn!("Could not read saved crawl frontier, starting over: {}", e);
                None
            }
        }
    }

    fn begin_frontier(
        &mut self,
        seed: &str,
        max_depth: u32,
        admitted: &[(String, u32)],
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let conn = self.connection()?;
        let tx = conn.unchecked_transaction()?;
        tx.execute("DELETE FROM crawl_frontier", [])?;
        upsert_value(&tx, CRAWL_KEY, &crawl_key(seed, max_depth), &now)?;
        insert_pending(&tx, admitted, &now)?;
        tx.commit()?;
        Ok(())
    }

    fn record_visit(
        &mut self,
        url: &str,
        status: PageStatus,
        admitted: &[(String, u32)],
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let conn = self.connection()?;
        let tx = conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE crawl_frontier SET status = ?1, updated_at = ?2 WHERE url = ?3",
            params![status.as_str(), now, url],
        )?;
        insert_pending(&tx, admitted, &now)?;
        tx.commit()?;
        Ok(())
    }

    fn reset_frontier(&mut self) -> StorageResult<()> {
        let conn = self.connection()?;
        let tx = conn.unchecked_transaction()?;
        tx.execute("DELETE FROM crawl_frontier", [])?;
        tx.execute("DELETE FROM progress WHERE key = ?1", params![CRAWL_KEY])?;
        tx.commit()?;
        Ok(())
    }
}

fn crawl_key(seed: &str, max_depth: u32) -> String {
    format!("{} {}", max_depth, seed)
}

fn upsert_value(conn: &Connection, key: &str, value: &str, now: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO progress (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value, now],
    )?;
    Ok(())
}

fn insert_pending(conn: &Connection, admitted: &[(String, u32)], now: &str) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT OR IGNORE INTO crawl_frontier (url, depth, status, updated_at)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for (url, depth) in admitted {
        stmt.execute(params![url, depth, PageStatus::Pending.as_str(), now])?;
    }
    Ok(())
}

fn open_connection(path: &Path) -> StorageResult<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;

    // Every checkpoint must survive a crash right after it was written
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = FULL;
    ",
    )?;

    initialize_schema(&conn)?;

    Ok(conn)
}
