//! Field extraction for music pages
//!
//! Music pages carry their data in two places:
//! - `<title>`: `Free Download: Artist – Project` (the dash may be an en dash)
//! - `<time>`: `Created: <date>`
//!
//! A field is `None` when its element is missing, repeated, or has no usable text.

use crate::crawler::Page;
use crate::music::MusicRecord;
use chrono::Utc;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static ARTIST_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^Free.*:\s+)|(\s*-.*)").unwrap());
static PROJECT_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^.*-\s*").unwrap());
static CREATED_LABEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Created:\s*").unwrap());

/// Scrapes every field of a page into a record
pub fn scrape_record(page: &Page) -> MusicRecord {
    let document = page.document();

    MusicRecord {
        url: page.location.clone(),
        project: scrape_project(&document),
        artist: scrape_artist(&document),
        date: scrape_date(&document),
        scraped_at: Utc::now(),
    }
}

/// Artist: the title text between the `Free...:` label and the first dash
pub fn scrape_artist(document: &Html) -> Option<String> {
    let title = dashed_title(document)?;
    non_empty(ARTIST_NOISE.replace_all(&title, "").trim())
}

/// Project: the title text after the last dash
pub fn scrape_project(document: &Html) -> Option<String> {
    let title = dashed_title(document)?;
    non_empty(PROJECT_PREFIX.replace(&title, "").trim())
}

/// Date: the contents of the single `<time>` element without its `Created:` label
pub fn scrape_date(document: &Html) -> Option<String> {
    let time = single_element(document, "time")?;
    non_empty(CREATED_LABEL.replace_all(&time.inner_html(), "").trim())
}

/// Replaces en dashes (including their mis-decoded form) and escaped ampersands
pub fn normalize_title(title: &str) -> String {
    title
        .replace("\u{e2}\u{20ac}\u{201c}", "-")
        .replace('\u{2013}', "-")
        .replace("&amp;", "&")
}

/// Normalized text of the only `<title>`, if it contains a dash
fn dashed_title(document: &Html) -> Option<String> {
    let element = single_element(document, "title")?;
    let title = normalize_title(&element.text().collect::<String>());

    if title.contains('-') {
        Some(title)
    } else {
        tracing::debug!("The title tag did not contain a dash: {}", title);
        None
    }
}

fn single_element<'a>(document: &'a Html, tag: &str) -> Option<scraper::ElementRef<'a>> {
    let selector = Selector::parse(tag).ok()?;
    let mut matches = document.select(&selector);
    let first = matches.next()?;

    if matches.next().is_some() {
        tracing::debug!("Multiple {} elements were found", tag);
        return None;
    }

    Some(first)
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn doc(html: &str) -> Html {
        Html::parse_document(html)
    }

    #[test]
    fn test_scrape_artist_and_project() {
        let document =
            doc("<html><head><title>Free Download: Lecrae - Church Clothes</title></head></html>");

        assert_eq!(scrape_artist(&document).as_deref(), Some("Lecrae"));
        assert_eq!(scrape_project(&document).as_deref(), Some("Church Clothes"));
    }

    #[test]
    fn test_en_dash_is_normalized() {
        let document =
            doc("<html><head><title>Free Mixtape: KB \u{2013} 100</title></head></html>");

        assert_eq!(scrape_artist(&document).as_deref(), Some("KB"));
        assert_eq!(scrape_project(&document).as_deref(), Some("100"));
    }

    #[test]
    fn test_escaped_ampersand_in_title() {
        let document = doc(
            "<html><head><title>Free Download: Andy Mineo &amp;amp; Wordsplayed - Magic &amp; Bird</title></head></html>",
        );

        assert_eq!(
            scrape_artist(&document).as_deref(),
            Some("Andy Mineo & Wordsplayed")
        );
        assert_eq!(scrape_project(&document).as_deref(), Some("Magic & Bird"));
    }

    #[test]
    fn test_project_takes_text_after_last_dash() {
        let document = doc("<html><head><title>Free Download: Trip Lee - Rise - Deluxe</title></head></html>");

        assert_eq!(scrape_artist(&document).as_deref(), Some("Trip Lee"));
        assert_eq!(scrape_project(&document).as_deref(), Some("Deluxe"));
    }

    #[test]
    fn test_title_without_label() {
        let document = doc("<html><head><title>Propaganda - Crimson Cord</title></head></html>");

        assert_eq!(scrape_artist(&document).as_deref(), Some("Propaganda"));
        assert_eq!(scrape_project(&document).as_deref(), Some("Crimson Cord"));
    }

    #[test]
    fn test_title_without_dash() {
        let document = doc("<html><head><title>Music Directory</title></head></html>");

        assert_eq!(scrape_artist(&document), None);
        assert_eq!(scrape_project(&document), None);
    }

    #[test]
    fn test_missing_title() {
        let document = doc("<html><head></head><body></body></html>");

        assert_eq!(scrape_artist(&document), None);
        assert_eq!(scrape_project(&document), None);
    }

    #[test]
    fn test_scrape_date() {
        let document = doc("<html><body><time>Created: 12 March 2014</time></body></html>");
        assert_eq!(scrape_date(&document).as_deref(), Some("12 March 2014"));
    }

    #[test]
    fn test_scrape_date_without_label() {
        let document = doc("<html><body><time>2014-03-12</time></body></html>");
        assert_eq!(scrape_date(&document).as_deref(), Some("2014-03-12"));
    }

    #[test]
    fn test_multiple_time_elements() {
        let document =
            doc("<html><body><time>Created: 1 May</time><time>Created: 2 May</time></body></html>");
        assert_eq!(scrape_date(&document), None);
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("A \u{2013} B"), "A - B");
        assert_eq!(normalize_title("A \u{e2}\u{20ac}\u{201c} B"), "A - B");
        assert_eq!(normalize_title("A &amp; B"), "A & B");
    }

    #[test]
    fn test_scrape_record_uses_location() {
        let location = Url::parse("http://www.rapzilla.com/rz/music/freemp3s/42-song").unwrap();
        let page = Page::from_html(
            "http://www.rapzilla.com/rz/music/freemp3s/42-song",
            &location,
            "<html><head><title>Free Download: Social Club - Misfits</title></head>\
             <body><time>Created: 1 June 2015</time></body></html>"
                .to_string(),
        );

        let record = scrape_record(&page);

        assert_eq!(record.url, "http://www.rapzilla.com/rz/music/freemp3s/42-song");
        assert_eq!(record.artist.as_deref(), Some("Social Club"));
        assert_eq!(record.project.as_deref(), Some("Misfits"));
        assert_eq!(record.date.as_deref(), Some("1 June 2015"));
    }
}
