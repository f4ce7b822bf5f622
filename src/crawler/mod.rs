//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The URL frontier with visit-once semantics
//! - HTTP fetching with a courtesy delay
//! - HTML parsing and link extraction
//! - The visitor capability and stop signal
//! - The sequential crawl loop

mod controller;
mod fetcher;
mod frontier;
mod parser;
mod visitor;

pub use controller::{CrawlController, CrawlOutcome, CrawlReport, CrawlState, CrawlStats};
pub use fetcher::{
    build_http_client, FetchError, Fetcher, DEFAULT_COURTESY_DELAY, DEFAULT_REQUEST_TIMEOUT,
};
pub use frontier::Frontier;
pub use parser::{extract_links, Page};
pub use visitor::{CrawlControl, Visitor};

use crate::config::Config;
use crate::CollectorError;

/// Runs a complete crawl with the given visitor
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client from the fetcher and user agent settings
/// 2. Seed the frontier
/// 3. Fetch, visit and expand pages until the frontier drains or `control` is stopped
///
/// # Example
///
/// ```no_run
/// use chh_collector::config::load_config;
/// use chh_collector::crawler::{crawl, CrawlControl};
/// use chh_collector::music::MusicVisitor;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("collector.toml"))?;
/// let visitor = MusicVisitor::from_config(&config.visitor)?;
/// let report = crawl(&config, visitor, CrawlControl::new()).await?;
/// println!("total links visited: {}", report.total_links_visited);
/// # Ok(())
/// # }
/// ```
pub async fn crawl<V: Visitor>(
    config: &Config,
    visitor: V,
    control: CrawlControl,
) -> Result<CrawlReport, CollectorError> {
    let fetcher = Fetcher::new(&config.fetcher, config.user_agent.as_ref())?;
    let mut controller =
        CrawlController::new(config.crawler.clone(), fetcher, visitor)?.with_control(control);
    Ok(controller.run().await)
}
