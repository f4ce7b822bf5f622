//! HTML parsing for fetched pages
//!
//! Turns a response body into a [`Page`]: the document plus the absolute target
//! of every `<a href>` it contains, resolved the way a browser would.

use scraper::{Html, Selector};
use url::Url;

/// A fetched page, alive for a single crawl iteration
#[derive(Debug, Clone)]
pub struct Page {
    /// The URL taken from the frontier
    pub url: String,

    /// Final location after redirects
    pub location: String,

    /// Raw HTML body
    pub body: String,

    /// Absolute targets of all anchors, in document order
    pub links: Vec<String>,
}

impl Page {
    /// Builds a page from an HTML body, resolving links against `location`
    ///
    /// # Example
    ///
    /// ```
    /// use chh_collector::crawler::Page;
    /// use url::Url;
    ///
    /// let location = Url::parse("http://site.test/list").unwrap();
    /// let page = Page::from_html(
    ///     "http://site.test/list",
    ///     &location,
    ///     r#"<a href="/item/1">One</a>"#.to_string(),
    /// );
    /// assert_eq!(page.links, vec!["http://site.test/item/1".to_string()]);
    /// ```
    pub fn from_html(url: &str, location: &Url, body: String) -> Self {
        let links = extract_links(&body, location);

        Self {
            url: url.to_string(),
            location: location.to_string(),
            body,
            links,
        }
    }

    /// Parses the body into a queryable document
    pub fn document(&self) -> Html {
        Html::parse_document(&self.body)
    }
}

/// Extracts the absolute `href` of every anchor in the HTML
///
/// Relative references are resolved against the document's `<base href>` when
/// present, otherwise against `location`. References that cannot be resolved
/// are dropped.
pub fn extract_links(html: &str, location: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let base = document_base(&document, location);

    let a_selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, &base))
        .collect()
}

/// Returns the base URL for relative links in the document
fn document_base(document: &Html, location: &Url) -> Url {
    Selector::parse("base[href]")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .and_then(|element| element.value().attr("href"))
                .and_then(|href| location.join(href.trim()).ok())
        })
        .unwrap_or_else(|| location.clone())
}

fn resolve_link(href: &str, base: &Url) -> Option<String> {
    match base.join(href.trim()) {
        Ok(absolute) => Some(absolute.to_string()),
        Err(e) => {
            tracing::debug!("Dropping unresolvable link {:?}: {}", href, e);
            None
        }
    }
}
