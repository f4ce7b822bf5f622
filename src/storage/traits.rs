//! Storage traits and error types
//!
//! This module defines the trait interface for record storage backends and
//! associated error types.

use crate::music::MusicRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt row {id}: {message}")]
    Corrupt { id: i64, message: String },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Destination for scraped music records
///
/// Only scraped output is stored; crawl progress (frontier, visited set) never is.
pub trait RecordStore {
    /// Stores a record and returns its row ID
    fn insert_record(&mut self, record: &MusicRecord) -> StorageResult<i64>;

    /// Returns the number of stored records
    fn count_records(&self) -> StorageResult<u64>;

    /// Returns every stored record in insertion order
    fn list_records(&self) -> StorageResult<Vec<MusicRecord>>;
}
