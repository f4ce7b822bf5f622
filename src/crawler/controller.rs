//! Crawl controller - the fetch, visit, expand loop
//!
//! The controller owns the frontier, the link filter, the fetcher and the
//! visitor for the duration of one crawl. It runs strictly sequentially: the
//! next URL is not dequeued until the current page's links have been queued.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::Page;
use crate::crawler::visitor::{CrawlControl, Visitor};
use crate::url::{is_valid_url, LinkFilter};
use crate::CollectorError;
use std::fmt;
use std::time::Instant;

/// Lifecycle of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// Seeds are loaded, nothing fetched yet
    Idle,
    /// The loop is pulling URLs from the frontier
    Running,
    /// The frontier ran out of URLs
    Draining,
    /// A stop was requested
    Stopped,
    /// The loop has returned
    Finished,
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Stopped => "stopped",
            Self::Finished => "finished",
        };
        write!(f, "{}", name)
    }
}

/// How a finished crawl ended; both are normal completions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// Every queued URL was processed
    Exhausted,
    /// The visitor (or another holder of the control) requested a stop
    Stopped,
}

/// Running counters of a crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Pages fetched successfully, whether or not the visitor saw them
    pub total_links_visited: u64,
}

/// Result of [`CrawlController::run`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlReport {
    pub total_links_visited: u64,
    pub outcome: CrawlOutcome,
}

/// Main crawl orchestration structure
pub struct CrawlController<V: Visitor> {
    config: CrawlerConfig,
    frontier: Frontier,
    filter: LinkFilter,
    fetcher: Fetcher,
    visitor: V,
    control: CrawlControl,
    stats: CrawlStats,
    state: CrawlState,
    outcome: Option<CrawlOutcome>,
}

impl<V: Visitor> CrawlController<V> {
    /// Creates a controller with its frontier seeded from `config`
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlController)` - Ready to run, in the `Idle` state
    /// * `Err(CollectorError)` - A seed URL was empty
    pub fn new(config: CrawlerConfig, fetcher: Fetcher, visitor: V) -> Result<Self, CollectorError> {
        for seed in config.seed_urls.iter().filter(|seed| !is_valid_url(seed)) {
            tracing::warn!("Seed url {} does not look valid; it will fail when fetched", seed);
        }

        let frontier = Frontier::with_seeds(&config.seed_urls)?;
        let filter = LinkFilter::new(&config);

        Ok(Self {
            config,
            frontier,
            filter,
            fetcher,
            visitor,
            control: CrawlControl::new(),
            stats: CrawlStats::default(),
            state: CrawlState::Idle,
            outcome: None,
        })
    }

    /// Replaces the stop signal, e.g. with one shared with a Ctrl-C handler
    pub fn with_control(mut self, control: CrawlControl) -> Self {
        self.control = control;
        self
    }

    /// Returns a handle that can stop this crawl
    pub fn control(&self) -> CrawlControl {
        self.control.clone()
    }

    /// Runs the crawl until the frontier drains or a stop is requested
    ///
    /// For every URL taken from the frontier:
    /// 1. Fetch it; on failure log and move on (no retry, not counted)
    /// 2. Count it as visited
    /// 3. Hand the page to the visitor, unless it is a seed and seed pages are not scraped
    /// 4. If a stop was requested, end without following this page's links
    /// 5. Queue every link accepted by the link filter and the visitor
    pub async fn run(&mut self) -> CrawlReport {
        if let Some(outcome) = self.outcome {
            tracing::warn!("Crawl already finished; not running again");
            return self.report(outcome);
        }

        tracing::info!("Starting the web crawler...");
        tracing::info!("Seed urls: {:?}", self.config.seed_urls);
        self.transition(CrawlState::Running);

        let start_time = Instant::now();

        let outcome = loop {
            if !self.control.is_running() {
                break CrawlOutcome::Stopped;
            }

            let url = match self.frontier.next_url() {
                Some(url) => url,
                None => break CrawlOutcome::Exhausted,
            };

            let page = match self.fetcher.fetch(&url).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::error!("Failed to fetch {}: {}", url, e);
                    continue;
                }
            };

            self.stats.total_links_visited += 1;

            if !self.config.scrape_seed_urls && self.config.is_seed(&url) {
                tracing::debug!("Not scraping seed url {}", url);
            } else {
                self.visitor.on_visit(&page, &self.control);

                if !self.control.is_running() {
                    break CrawlOutcome::Stopped;
                }
            }

            self.enqueue_links(&page);

            if self.stats.total_links_visited % 10 == 0 {
                tracing::info!(
                    "Progress: {} pages visited, {} in frontier",
                    self.stats.total_links_visited,
                    self.frontier.pending_len()
                );
            }
        };

        self.transition(match outcome {
            CrawlOutcome::Exhausted => CrawlState::Draining,
            CrawlOutcome::Stopped => CrawlState::Stopped,
        });
        self.transition(CrawlState::Finished);
        self.outcome = Some(outcome);

        tracing::info!(
            "The web crawler has finished: {} pages visited in {:?}",
            self.stats.total_links_visited,
            start_time.elapsed()
        );

        self.report(outcome)
    }

    /// Queues the links of `page` that pass both link predicates
    fn enqueue_links(&mut self, page: &Page) {
        let before = self.frontier.pending_len();

        for link in &page.links {
            if !self.filter.should_visit(link) || !self.visitor.should_visit(link) {
                continue;
            }

            if let Err(e) = self.frontier.add_url(link) {
                tracing::warn!("Could not queue {}: {}", link, e);
            }
        }

        tracing::debug!(
            "Queued {} of {} links from {}",
            self.frontier.pending_len() - before,
            page.links.len(),
            page.location
        );
    }

    fn transition(&mut self, to: CrawlState) {
        tracing::debug!("Crawl state: {} -> {}", self.state, to);
        self.state = to;
    }

    fn report(&self, outcome: CrawlOutcome) -> CrawlReport {
        CrawlReport {
            total_links_visited: self.stats.total_links_visited,
            outcome,
        }
    }

    pub fn total_links_visited(&self) -> u64 {
        self.stats.total_links_visited
    }

    pub fn stats(&self) -> CrawlStats {
        self.stats
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn visitor(&self) -> &V {
        &self.visitor
    }

    pub fn into_visitor(self) -> V {
        self.visitor
    }
}
