use crate::crawler::{DEFAULT_COURTESY_DELAY, DEFAULT_REQUEST_TIMEOUT};
use serde::Deserialize;
use std::time::Duration;

/// Pages whose location matches this pattern are scraped for music data
pub const DEFAULT_RECORD_PATTERN: &str = r"http://www\.rapzilla\.com/rz/music/freemp3s/\d+.";

/// Main configuration structure for chh-collector
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: Option<UserAgentConfig>,
    #[serde(default)]
    pub visitor: VisitorConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawl scope configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URLs the crawl starts from, in order
    #[serde(rename = "seed-urls")]
    pub seed_urls: Vec<String>,

    /// When false, only URLs starting with one of the seed URLs are followed
    #[serde(rename = "follow-external-links", default)]
    pub follow_external_links: bool,

    /// When false, seed pages are only mined for links and never handed to the visitor
    #[serde(rename = "scrape-seed-urls", default = "default_scrape_seed_urls")]
    pub scrape_seed_urls: bool,
}

fn default_scrape_seed_urls() -> bool {
    true
}

impl CrawlerConfig {
    /// Creates a config that stays on the seed prefixes and scrapes seed pages
    pub fn new<I, S>(seed_urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            seed_urls: seed_urls.into_iter().map(Into::into).collect(),
            follow_external_links: false,
            scrape_seed_urls: default_scrape_seed_urls(),
        }
    }

    pub fn with_follow_external_links(mut self, follow: bool) -> Self {
        self.follow_external_links = follow;
        self
    }

    pub fn with_scrape_seed_urls(mut self, scrape: bool) -> Self {
        self.scrape_seed_urls = scrape;
        self
    }

    /// Returns true if `url` is exactly one of the configured seed URLs
    pub fn is_seed(&self, url: &str) -> bool {
        self.seed_urls.iter().any(|seed| seed == url)
    }
}

/// Fetch pacing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Pause before every request (milliseconds)
    #[serde(rename = "courtesy-delay-ms", default = "default_courtesy_delay_ms")]
    pub courtesy_delay_ms: u64,

    /// Connect and overall request timeout (milliseconds)
    #[serde(rename = "request-timeout-ms", default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_courtesy_delay_ms() -> u64 {
    DEFAULT_COURTESY_DELAY.as_millis() as u64
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_millis() as u64
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            courtesy_delay_ms: default_courtesy_delay_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl FetcherConfig {
    pub fn courtesy_delay(&self) -> Duration {
        Duration::from_millis(self.courtesy_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the identity as `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn user_agent_string(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Settings for the music visitor
#[derive(Debug, Clone, Deserialize)]
pub struct VisitorConfig {
    /// Regex searched in the page location to decide whether to scrape a record
    #[serde(rename = "record-pattern", default = "default_record_pattern")]
    pub record_pattern: String,

    /// Regex a discovered URL must fully match to be followed
    #[serde(rename = "follow-pattern", default)]
    pub follow_pattern: Option<String>,

    /// Stop the crawl after this many visited pages
    #[serde(rename = "max-visits", default)]
    pub max_visits: Option<u64>,
}

fn default_record_pattern() -> String {
    DEFAULT_RECORD_PATTERN.to_string()
}

impl Default for VisitorConfig {
    fn default() -> Self {
        Self {
            record_pattern: default_record_pattern(),
            follow_pattern: None,
            max_visits: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// SQLite database receiving scraped records
    #[serde(rename = "database-path", default)]
    pub database_path: Option<String>,
}
