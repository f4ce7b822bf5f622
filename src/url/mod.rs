//! URL handling module for chh-collector
//!
//! This module decides which discovered links are worth queueing: the external-link
//! policy relative to the seed prefixes, the file extension blacklist, and URL
//! syntax validation.

mod filter;

pub use filter::{has_ignored_extension, should_visit, LinkFilter, IGNORED_EXTENSIONS};

use url::Url;

/// Schemes the fetcher can GET
pub const FETCHABLE_SCHEMES: &[&str] = &["http", "https"];

/// Checks that a string is a well-formed, fetchable absolute URL
///
/// `Url::parse` is lenient and silently percent-encodes characters such as spaces,
/// so the raw string is checked for characters a URI reference cannot contain
/// before parsing. Only `http` and `https` URLs are accepted.
///
/// # Arguments
///
/// * `candidate` - The absolute URL to check
///
/// # Returns
///
/// * `true` if the URL parses, is a valid URI and can be fetched with a GET
///
/// # Examples
///
/// ```
/// use chh_collector::url::is_valid_url;
///
/// assert!(is_valid_url("http://example.com/page?q=1"));
/// assert!(!is_valid_url("not a url"));
/// assert!(!is_valid_url("/relative/path"));
/// assert!(!is_valid_url("http://example.com/a b"));
/// assert!(!is_valid_url("javascript:void(0)"));
/// ```
pub fn is_valid_url(candidate: &str) -> bool {
    if candidate.chars().any(is_forbidden_uri_char) || !has_valid_escapes(candidate) {
        return false;
    }

    match Url::parse(candidate) {
        Ok(url) => FETCHABLE_SCHEMES.contains(&url.scheme()),
        Err(_) => false,
    }
}

fn is_forbidden_uri_char(c: char) -> bool {
    c.is_ascii_control()
        || matches!(
            c,
            ' ' | '"' | '<' | '>' | '\\' | '^' | '`' | '{' | '|' | '}'
        )
}

/// Every `%` must introduce a two digit hex escape
fn has_valid_escapes(candidate: &str) -> bool {
    let bytes = candidate.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            match escape {
                Some([a, b]) if a.is_ascii_hexdigit() && b.is_ascii_hexdigit() => i += 3,
                _ => return false,
            }
        } else {
            i += 1;
        }
    }
    true
}
