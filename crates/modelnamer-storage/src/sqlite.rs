//! SQLite-backed display-name store.
//!
//! One table keyed by `(model_id, description_hash)`, with secondary indexes on
//! `model_id` and `created_at` so the age sweep does not scan the table. The
//! hash column holds the metadata fingerprint; its name is kept so existing
//! `cache.db` files open unchanged.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC text, which keeps string
//! comparison in SQL consistent with chronological order. Rows written with
//! the older `2006-01-02 15:04:05.999999999-07:00` layout are rewritten when
//! the database is opened.

use crate::{CacheEntry, CacheKey, NameStore, StorageError, StorageResult};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS display_name_cache (
    model_id TEXT NOT NULL,
    description_hash TEXT NOT NULL,
    display_name TEXT NOT NULL,
    created_at DATETIME NOT NULL,
    PRIMARY KEY (model_id, description_hash)
);

CREATE INDEX IF NOT EXISTS idx_model_id ON display_name_cache(model_id);
CREATE INDEX IF NOT EXISTS idx_created_at ON display_name_cache(created_at);
";

/// SQLite file storage.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and initialize the schema.
    ///
    /// Creates parent directories if necessary.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        debug!(path = %path.display(), "Opening display-name cache");
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StorageResult<Self> {
        conn.execute_batch(SCHEMA)?;
        normalize_timestamps(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))
    }
}

fn encode_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_timestamp(raw: &str) -> StorageResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    decode_legacy_timestamp(raw).ok_or_else(|| StorageError::invalid_timestamp(raw))
}

/// Accepts `2006-01-02 15:04:05.999999999-07:00` and
/// `2006-01-02 15:04:05.999999999 -0700 MST`, with any trailing tokens ignored.
fn decode_legacy_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let mut parts = raw.split_whitespace();
    let date = parts.next()?;
    let time = parts.next()?;
    let parsed = match parts.next() {
        Some(offset) => DateTime::parse_from_str(
            &format!("{date} {time} {offset}"),
            "%Y-%m-%d %H:%M:%S%.f %z",
        ),
        None => DateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M:%S%.f%:z"),
    };
    parsed.ok().map(|ts| ts.with_timezone(&Utc))
}

/// Rewrite every `created_at` not already in the stored RFC 3339 layout.
///
/// Rows whose timestamp cannot be read are dropped; the name is regenerated
/// on the next run.
fn normalize_timestamps(conn: &Connection) -> StorageResult<()> {
    let legacy: Vec<(i64, String)> = {
        let mut stmt = conn.prepare(
            "SELECT rowid, CAST(created_at AS TEXT) FROM display_name_cache
             WHERE created_at NOT GLOB '[0-9][0-9][0-9][0-9]-[0-9][0-9]-[0-9][0-9]T*Z'",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let legacy = rows.collect::<rusqlite::Result<_>>()?;
        legacy
    };
    if legacy.is_empty() {
        return Ok(());
    }

    for (rowid, raw) in &legacy {
        match decode_timestamp(raw) {
            Ok(ts) => {
                conn.execute(
                    "UPDATE display_name_cache SET created_at = ?1 WHERE rowid = ?2",
                    params![encode_timestamp(ts), rowid],
                )?;
            }
            Err(_) => {
                warn!(created_at = %raw, "Dropping cache entry with unreadable timestamp");
                conn.execute(
                    "DELETE FROM display_name_cache WHERE rowid = ?1",
                    params![rowid],
                )?;
            }
        }
    }
    info!(rows = legacy.len(), "Normalized cache timestamps");
    Ok(())
}

type RawRow = (String, String, String, String);

fn raw_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn into_entry((model_id, hash, display_name, created_at): RawRow) -> StorageResult<CacheEntry> {
    Ok(CacheEntry {
        key: CacheKey::new(model_id, hash),
        display_name,
        created_at: decode_timestamp(&created_at)?,
    })
}

#[async_trait]
impl NameStore for SqliteStore {
    async fn get(&self, key: &CacheKey) -> StorageResult<Option<CacheEntry>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT model_id, description_hash, display_name, created_at
                 FROM display_name_cache
                 WHERE model_id = ?1 AND description_hash = ?2",
                params![key.model_id, key.fingerprint],
                raw_row,
            )
            .optional()?;

        row.map(into_entry).transpose()
    }

    async fn put(&self, entry: &CacheEntry) -> StorageResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO display_name_cache
             (model_id, description_hash, display_name, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.key.model_id,
                entry.key.fingerprint,
                entry.display_name,
                encode_timestamp(entry.created_at),
            ],
        )?;
        Ok(())
    }

    async fn remove_created_before(&self, cutoff: DateTime<Utc>) -> StorageResult<u64> {
        let conn = self.lock()?;
        let removed = conn.execute(
            "DELETE FROM display_name_cache WHERE created_at < ?1",
            params![encode_timestamp(cutoff)],
        )?;
        Ok(removed as u64)
    }

    async fn count(&self) -> StorageResult<u64> {
        let conn = self.lock()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM display_name_cache", [], |row| {
                row.get(0)
            })?;
        Ok(count.max(0) as u64)
    }

    async fn list(&self, model_id: Option<&str>) -> StorageResult<Vec<CacheEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT model_id, description_hash, display_name, created_at
             FROM display_name_cache
             WHERE ?1 IS NULL OR model_id = ?1
             ORDER BY model_id, description_hash",
        )?;
        let rows = stmt.query_map(params![model_id], raw_row)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(into_entry(row?)?);
        }
        Ok(entries)
    }
}
