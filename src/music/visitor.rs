//! Visitor that scrapes music pages during a crawl

use crate::config::VisitorConfig;
use crate::crawler::{CrawlControl, Page, Visitor};
use crate::music::scrape::scrape_record;
use crate::storage::RecordStore;
use regex::Regex;

/// Scrapes a record from every visited page whose location matches the record pattern
///
/// Records are logged and, when a store is attached, persisted. A failed insert is
/// logged and the crawl goes on.
pub struct MusicVisitor {
    record_pattern: Regex,
    follow_pattern: Option<Regex>,
    max_visits: Option<u64>,
    visits: u64,
    records_scraped: u64,
    store: Option<Box<dyn RecordStore>>,
}

impl MusicVisitor {
    /// Compiles the visitor patterns from its configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Record pattern (searched), optional follow pattern (anchored to
    ///   the whole URL) and optional visit limit
    ///
    /// # Returns
    ///
    /// * `Ok(MusicVisitor)` - Visitor without a record store
    /// * `Err(regex::Error)` - A pattern does not compile
    pub fn from_config(config: &VisitorConfig) -> Result<Self, regex::Error> {
        let follow_pattern = config
            .follow_pattern
            .as_deref()
            .map(|pattern| Regex::new(&format!("^(?:{})$", pattern)))
            .transpose()?;

        Ok(Self {
            record_pattern: Regex::new(&config.record_pattern)?,
            follow_pattern,
            max_visits: config.max_visits,
            visits: 0,
            records_scraped: 0,
            store: None,
        })
    }

    /// Persists every scraped record into `store`
    ///
    /// # Arguments
    ///
    /// * `store` - Destination for records; insert failures are logged, not returned
    pub fn with_store(mut self, store: Box<dyn RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Pages handed to this visitor so far
    pub fn visits(&self) -> u64 {
        self.visits
    }

    pub fn records_scraped(&self) -> u64 {
        self.records_scraped
    }

    pub fn store(&self) -> Option<&dyn RecordStore> {
        self.store.as_deref()
    }

    /// Returns true if the page at `location` should be scraped
    ///
    /// # Arguments
    ///
    /// * `location` - Final URL of a fetched page; the record pattern may match anywhere in it
    pub fn is_record_page(&self, location: &str) -> bool {
        self.record_pattern.is_match(location)
    }
}

impl Visitor for MusicVisitor {
    fn on_visit(&mut self, page: &Page, control: &CrawlControl) {
        tracing::info!("Currently visiting url: {}", page.location);

        self.visits += 1;
        if let Some(max) = self.max_visits {
            if self.visits >= max {
                tracing::info!("Reached {} visits", max);
                control.stop();
            }
        }

        if !self.is_record_page(&page.location) {
            return;
        }

        let record = scrape_record(page);
        tracing::info!("Scraped: {}", record);
        self.records_scraped += 1;

        if let Some(store) = self.store.as_mut() {
            if let Err(e) = store.insert_record(&record) {
                tracing::error!("Failed to store record for {}: {}", record.url, e);
            }
        }
    }

    fn should_visit(&self, url: &str) -> bool {
        self.follow_pattern
            .as_ref()
            .map_or(true, |pattern| pattern.is_match(url))
    }
}
