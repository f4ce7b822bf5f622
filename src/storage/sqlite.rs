//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the RecordStore trait.

use crate::music::MusicRecord;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{RecordStore, StorageError, StorageResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;

/// SQLite record store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates the database file and ensures the schema exists
    ///
    /// # Arguments
    ///
    /// * `path` - Database file; missing parent directories are created
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Open store with the schema in place
    /// * `Err(StorageError::Io)` - The parent directory could not be created
    /// * `Err(StorageError::Sqlite)` - SQLite failed to open or initialize the file
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl RecordStore for SqliteStore {
    fn insert_record(&mut self, record: &MusicRecord) -> StorageResult<i64> {
        self.conn.execute(
            "INSERT INTO music_records (url, project, artist, date, scraped_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.url,
                record.project,
                record.artist,
                record.date,
                record.scraped_at.to_rfc3339()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn count_records(&self) -> StorageResult<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM music_records", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn list_records(&self) -> StorageResult<Vec<MusicRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, url, project, artist, date, scraped_at
             FROM music_records ORDER BY id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, url, project, artist, date, scraped_at) = row?;
            let scraped_at = DateTime::parse_from_rfc3339(&scraped_at)
                .map_err(|e| StorageError::Corrupt {
                    id,
                    message: format!("bad scraped_at '{}': {}", scraped_at, e),
                })?
                .with_timezone(&Utc);

            records.push(MusicRecord {
                url,
                project,
                artist,
                date,
                scraped_at,
            });
        }

        Ok(records)
    }
}
