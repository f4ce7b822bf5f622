//! Music data scraping
//!
//! This module turns crawled music pages into records:
//! - Field extraction from the page title and `<time>` element
//! - The visitor that scrapes matching pages and persists the results

mod record;
mod scrape;
mod visitor;

pub use record::MusicRecord;
pub use scrape::{normalize_title, scrape_artist, scrape_date, scrape_project, scrape_record};
pub use visitor::MusicVisitor;

use crate::config::Config;
use crate::storage::open_store;
use std::path::Path;

/// Builds the music visitor for a run, attaching the record store when one is configured
///
/// # Arguments
///
/// * `config` - The full configuration; `[visitor]` and `[output]` are used
///
/// # Returns
///
/// * `Ok(MusicVisitor)` - Ready to hand to the crawl
/// * `Err(CollectorError::Pattern)` - A visitor pattern does not compile
/// * `Err(CollectorError::Storage)` - The database could not be opened
pub fn build_visitor(config: &Config) -> crate::Result<MusicVisitor> {
    let visitor = MusicVisitor::from_config(&config.visitor)?;

    match &config.output.database_path {
        Some(path) => {
            tracing::info!("Storing records in {}", path);
            let store = open_store(Path::new(path))?;
            Ok(visitor.with_store(Box::new(store)))
        }
        None => Ok(visitor),
    }
}
