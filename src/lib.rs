//! chh-collector: a polite single-site music data crawler
//!
//! This crate crawls a site breadth-first from a set of seed URLs, visiting every
//! page at most once, and hands each fetched page to a pluggable visitor. The
//! bundled visitor scrapes song, artist and release date fields from music pages.

pub mod config;
pub mod crawler;
pub mod music;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for chh-collector operations
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Frontier error: {0}")]
    Frontier(#[from] FrontierError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern in config: {0}")]
    InvalidPattern(String),
}

/// Errors raised by the URL frontier
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrontierError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type alias for chh-collector operations
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlControl, CrawlController, CrawlOutcome, CrawlReport, Page, Visitor};
pub use music::{MusicRecord, MusicVisitor};
pub use url::LinkFilter;
