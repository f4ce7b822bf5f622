//! Database schema definitions
//!
//! This module contains the SQL schema for the scraped record database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per scraped music page
CREATE TABLE IF NOT EXISTS music_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    project TEXT,
    artist TEXT,
    date TEXT,
    scraped_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_music_records_url ON music_records(url);
CREATE INDEX IF NOT EXISTS idx_music_records_artist ON music_records(artist);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
