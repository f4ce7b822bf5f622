use crate::config::CrawlerConfig;
use crate::url::is_valid_url;

/// Links ending with one of these suffixes are never queued
pub const IGNORED_EXTENSIONS: &[&str] = &[".css", ".js", ".gif", ".jpg", ".png", ".mp3", ".zip", ".gz"];

/// Link policy applied to every URL discovered on a page
///
/// A link is accepted only when it passes all three checks, evaluated cheapest
/// first:
/// 1. External-link policy: unless external links are followed, the URL must
///    start with one of the seed URLs (literal string prefix)
/// 2. Extension blacklist: the URL must not end with an [`IGNORED_EXTENSIONS`] entry
/// 3. Syntax: the URL must be a valid absolute `http`/`https` URI
///
/// # Examples
///
/// ```
/// use chh_collector::config::CrawlerConfig;
/// use chh_collector::url::LinkFilter;
///
/// let filter = LinkFilter::new(&CrawlerConfig::new(["http://a.com/"]));
/// assert!(filter.should_visit("http://a.com/page"));
/// assert!(!filter.should_visit("http://a.com/style.css"));
/// assert!(!filter.should_visit("http://other.com/page"));
/// ```
#[derive(Debug, Clone)]
pub struct LinkFilter {
    seed_urls: Vec<String>,
    follow_external_links: bool,
}

impl LinkFilter {
    /// Creates a filter from the crawl scope settings
    ///
    /// # Arguments
    ///
    /// * `config` - Supplies the seed URL prefixes and the external-link policy
    pub fn new(config: &CrawlerConfig) -> Self {
        Self {
            seed_urls: config.seed_urls.clone(),
            follow_external_links: config.follow_external_links,
        }
    }

    /// Decides whether a discovered link should be added to the frontier
    ///
    /// # Arguments
    ///
    /// * `url` - An absolute URL found on a fetched page
    ///
    /// # Returns
    ///
    /// * `true` - The link passes the external, extension and syntax checks
    /// * `false` - Any check failed; the rejection is not reported further
    pub fn should_visit(&self, url: &str) -> bool {
        let accepted = self.follows(url) && !has_ignored_extension(url) && is_valid_url(url);
        tracing::trace!("should_visit({}) = {}", url, accepted);
        accepted
    }

    /// Returns true if the URL does not begin with any seed URL
    pub fn is_external(&self, url: &str) -> bool {
        !self.seed_urls.iter().any(|seed| url.starts_with(seed.as_str()))
    }

    fn follows(&self, url: &str) -> bool {
        self.follow_external_links || !self.is_external(url)
    }
}

/// Evaluates the link policy for a single URL against a configuration
pub fn should_visit(url: &str, config: &CrawlerConfig) -> bool {
    LinkFilter::new(config).should_visit(url)
}

/// Case-sensitive suffix match of the whole URL against [`IGNORED_EXTENSIONS`]
pub fn has_ignored_extension(url: &str) -> bool {
    IGNORED_EXTENSIONS.iter().any(|ext| url.ends_with(ext))
}
