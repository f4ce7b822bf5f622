//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with the configured user agent and timeout
//! - The courtesy pause taken before every request
//! - A single GET per URL, with no retries
//! - Classifying failures into [`FetchError`]

use crate::config::{FetcherConfig, UserAgentConfig};
use crate::crawler::parser::Page;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Pause taken before every request
pub const DEFAULT_COURTESY_DELAY: Duration = Duration::from_millis(1000);

/// Connect and overall timeout of a single request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(3000);

/// Why a page could not be fetched
///
/// The crawl loop treats every variant the same way: the URL is skipped and
/// never retried.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP {status_code} for {url}")]
    Status { url: String, status_code: u16 },

    #[error("Unsupported content type {content_type:?} for {url}")]
    UnsupportedContentType { url: String, content_type: String },
}

/// Builds an HTTP client with proper configuration
///
/// When no user agent identity is configured, `chh-collector/<version>` is sent.
///
/// # Example
///
/// ```no_run
/// use chh_collector::config::FetcherConfig;
/// use chh_collector::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default(), None).unwrap();
/// ```
pub fn build_http_client(
    config: &FetcherConfig,
    user_agent: Option<&UserAgentConfig>,
) -> Result<Client, reqwest::Error> {
    let user_agent = user_agent
        .map(UserAgentConfig::user_agent_string)
        .unwrap_or_else(|| format!("chh-collector/{}", env!("CARGO_PKG_VERSION")));

    Client::builder()
        .user_agent(user_agent)
        .timeout(config.request_timeout())
        .connect_timeout(config.request_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages one at a time with a fixed pause before each request
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    courtesy_delay: Duration,
}

impl Fetcher {
    /// Creates a fetcher with its own HTTP client
    ///
    /// # Arguments
    ///
    /// * `config` - Courtesy delay and request timeout
    /// * `user_agent` - Crawler identity; a generic `chh-collector/<version>` when absent
    ///
    /// # Returns
    ///
    /// * `Ok(Fetcher)` - Ready to fetch
    /// * `Err(reqwest::Error)` - The HTTP client could not be built
    pub fn new(
        config: &FetcherConfig,
        user_agent: Option<&UserAgentConfig>,
    ) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config, user_agent)?;
        Ok(Self::with_client(client, config.courtesy_delay()))
    }

    pub fn with_client(client: Client, courtesy_delay: Duration) -> Self {
        Self {
            client,
            courtesy_delay,
        }
    }

    pub fn courtesy_delay(&self) -> Duration {
        self.courtesy_delay
    }

    /// Fetches and parses a single URL
    ///
    /// # Request Flow
    ///
    /// 1. Sleep for the courtesy delay (always, whatever the outcome)
    /// 2. Send one GET request, following redirects
    /// 3. Reject non-2xx statuses and non-HTML/XML content types
    /// 4. Parse the body and resolve its links against the final URL
    ///
    /// # Returns
    ///
    /// * `Ok(Page)` - The parsed page with its absolute links
    /// * `Err(FetchError)` - The URL, transport, status or content type was unusable
    pub async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        self.courtesy_pause().await;

        let request_url = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let response = self
            .client
            .get(request_url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status_code: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if let Some(content_type) = content_type {
            if !is_supported_content_type(&content_type) {
                return Err(FetchError::UnsupportedContentType {
                    url: url.to_string(),
                    content_type,
                });
            }
        }

        let location = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| classify_error(url, e))?;

        Ok(Page::from_html(url, &location, body))
    }

    async fn courtesy_pause(&self) {
        if self.courtesy_delay.is_zero() {
            return;
        }
        tracing::debug!("Sleeping for {:?}", self.courtesy_delay);
        tokio::time::sleep(self.courtesy_delay).await;
    }
}

fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

/// Accepts `text/*`, `application/xml` and `application/*+xml`
fn is_supported_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    mime.starts_with("text/")
        || mime == "application/xml"
        || (mime.starts_with("application/") && mime.ends_with("+xml"))
}
