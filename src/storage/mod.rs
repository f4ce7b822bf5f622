//! Storage module for persisting scraped records
//!
//! This module handles the SQLite database that receives music records:
//! - Schema management
//! - Record insertion and listing

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{RecordStore, StorageError, StorageResult};

use std::path::Path;

/// Opens (creating if needed) the record database at `path`
pub fn open_store(path: &Path) -> StorageResult<SqliteStore> {
    SqliteStore::open(path)
}
