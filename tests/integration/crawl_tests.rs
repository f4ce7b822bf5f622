//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full fetch, visit, expand cycle end-to-end.

use chh_collector::config::{Config, CrawlerConfig, FetcherConfig, VisitorConfig};
use chh_collector::crawler::{
    crawl, CrawlControl, CrawlController, CrawlOutcome, CrawlState, Fetcher, Page, Visitor,
};
use chh_collector::music::MusicVisitor;
use chh_collector::storage::SqliteStore;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Visitor that remembers every location it was handed
#[derive(Default)]
struct RecordingVisitor {
    visited: Vec<String>,
    stop_after: Option<usize>,
}

impl Visitor for RecordingVisitor {
    fn on_visit(&mut self, page: &Page, control: &CrawlControl) {
        self.visited.push(page.location.clone());
        if Some(self.visited.len()) == self.stop_after {
            control.stop();
        }
    }
}

/// Very short pacing so the suite stays fast
fn test_fetcher_config() -> FetcherConfig {
    FetcherConfig {
        courtesy_delay_ms: 10,
        request_timeout_ms: 3000,
    }
}

fn test_config(crawler: CrawlerConfig) -> Config {
    Config {
        crawler,
        fetcher: test_fetcher_config(),
        user_agent: None,
        visitor: VisitorConfig::default(),
        output: Default::default(),
    }
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

/// Mounts `/` linking to two items (one of them twice) and an external page
async fn mount_listing(server: &MockServer, external: &str) {
    let listing = format!(
        r#"<html><body>
            <a href="/item/1">One</a>
            <a href="/item/2">Two</a>
            <a href="/item/1">One again</a>
            <a href="/style.css">Style</a>
            <a href="{}/elsewhere">Elsewhere</a>
        </body></html>"#,
        external
    );

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(listing))
        .mount(server)
        .await;
}

async fn mount_item(server: &MockServer, item: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/item/{}", item)))
        .respond_with(html(format!(
            "<html><body><h1>Item {}</h1><a href=\"/\">Home</a></body></html>",
            item
        )))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let server = MockServer::start().await;
    let external = MockServer::start().await;
    let seed = format!("{}/", server.uri());

    mount_listing(&server, &external.uri()).await;
    mount_item(&server, "1", 1).await;
    mount_item(&server, "2", 1).await;

    Mock::given(method("GET"))
        .respond_with(html("<html></html>".to_string()))
        .expect(0)
        .mount(&external)
        .await;

    let config = test_config(CrawlerConfig::new([seed.clone()]).with_scrape_seed_urls(false));
    let mut visitor = RecordingVisitor::default();

    let report = crawl(&config, &mut visitor, CrawlControl::new())
        .await
        .expect("crawl should start");

    // The seed counts as visited but is never handed to the visitor
    assert_eq!(report.outcome, CrawlOutcome::Exhausted);
    assert_eq!(report.total_links_visited, 3);
    assert_eq!(
        visitor.visited,
        vec![
            format!("{}/item/1", server.uri()),
            format!("{}/item/2", server.uri()),
        ]
    );
}

#[tokio::test]
async fn test_listing_seed_prefix_excludes_sibling_paths() {
    let server = MockServer::start().await;
    let seed = format!("{}/list", server.uri());

    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(html(
            r#"<html><body>
                <a href="/list">List</a>
                <a href="/item/1">One</a>
                <a href="/item/2">Two</a>
                <a href="http://external.test/x">Elsewhere</a>
            </body></html>"#
                .to_string(),
        ))
        .expect(1)
        .mount(&server)
        .await;
    mount_item(&server, "1", 0).await;
    mount_item(&server, "2", 0).await;

    let config = test_config(CrawlerConfig::new([seed]).with_scrape_seed_urls(false));
    let mut visitor = RecordingVisitor::default();

    let report = crawl(&config, &mut visitor, CrawlControl::new())
        .await
        .unwrap();

    // `/item/N` does not start with the `/list` seed, so it counts as external
    assert_eq!(report.outcome, CrawlOutcome::Exhausted);
    assert_eq!(report.total_links_visited, 1);
    assert!(visitor.visited.is_empty());
}

#[tokio::test]
async fn test_visit_order_is_breadth_first() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<a href="/a">A</a><a href="/b">B</a>"#.to_string(),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(r#"<a href="/a/deep">Deep</a>"#.to_string()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html("<p>b</p>".to_string()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a/deep"))
        .respond_with(html(r#"<a href="/">Home</a>"#.to_string()))
        .mount(&server)
        .await;

    let config = test_config(CrawlerConfig::new([seed.clone()]));
    let mut visitor = RecordingVisitor::default();

    let report = crawl(&config, &mut visitor, CrawlControl::new())
        .await
        .unwrap();

    let base = server.uri();
    assert_eq!(
        visitor.visited,
        vec![
            seed,
            format!("{}/a", base),
            format!("{}/b", base),
            format!("{}/a/deep", base),
        ]
    );
    assert_eq!(report.total_links_visited, 4);
}

#[tokio::test]
async fn test_visitor_stop_ends_crawl() {
    let server = MockServer::start().await;
    let external = MockServer::start().await;
    let seed = format!("{}/", server.uri());

    mount_listing(&server, &external.uri()).await;
    mount_item(&server, "1", 1).await;
    mount_item(&server, "2", 0).await;

    let config = test_config(CrawlerConfig::new([seed]));
    let mut visitor = RecordingVisitor {
        stop_after: Some(2),
        ..Default::default()
    };

    let report = crawl(&config, &mut visitor, CrawlControl::new())
        .await
        .unwrap();

    assert_eq!(report.outcome, CrawlOutcome::Stopped);
    assert_eq!(report.total_links_visited, 2);
    assert_eq!(visitor.visited.len(), 2);
}

#[tokio::test]
async fn test_failed_fetch_is_not_counted() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<a href="/missing">Missing</a><a href="/present">Present</a>"#.to_string(),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/present"))
        .respond_with(html("<p>here</p>".to_string()))
        .mount(&server)
        .await;

    let config = test_config(CrawlerConfig::new([seed]));
    let mut visitor = RecordingVisitor::default();

    let report = crawl(&config, &mut visitor, CrawlControl::new())
        .await
        .unwrap();

    assert_eq!(report.outcome, CrawlOutcome::Exhausted);
    assert_eq!(report.total_links_visited, 2);
    assert!(!visitor
        .visited
        .contains(&format!("{}/missing", server.uri())));
}

#[tokio::test]
async fn test_external_links_followed_when_enabled() {
    let server = MockServer::start().await;
    let external = MockServer::start().await;
    let seed = format!("{}/", server.uri());

    mount_listing(&server, &external.uri()).await;
    mount_item(&server, "1", 1).await;
    mount_item(&server, "2", 1).await;

    Mock::given(method("GET"))
        .and(path("/elsewhere"))
        .respond_with(html("<p>elsewhere</p>".to_string()))
        .expect(1)
        .mount(&external)
        .await;

    let config =
        test_config(CrawlerConfig::new([seed]).with_follow_external_links(true));
    let mut visitor = RecordingVisitor::default();

    crawl(&config, &mut visitor, CrawlControl::new())
        .await
        .unwrap();

    assert!(visitor
        .visited
        .contains(&format!("{}/elsewhere", external.uri())));
}

#[tokio::test]
async fn test_stopped_before_start_fetches_nothing() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());

    Mock::given(method("GET"))
        .respond_with(html("<p>never</p>".to_string()))
        .expect(0)
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(&test_fetcher_config(), None).unwrap();
    let mut controller =
        CrawlController::new(CrawlerConfig::new([seed]), fetcher, RecordingVisitor::default())
            .unwrap();
    controller.control().stop();

    let report = controller.run().await;

    assert_eq!(report.outcome, CrawlOutcome::Stopped);
    assert_eq!(report.total_links_visited, 0);
    assert_eq!(controller.state(), CrawlState::Finished);
}

#[tokio::test]
async fn test_music_visitor_scrapes_into_store() {
    let server = MockServer::start().await;
    let base = server.uri();
    let seed = format!("{}/music/", base);

    Mock::given(method("GET"))
        .and(path("/music/"))
        .respond_with(html(
            r#"<a href="/music/101-gravity">Gravity</a><a href="/music/news">News</a>"#
                .to_string(),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/music/101-gravity"))
        .respond_with(html(
            "<html><head><title>Free Download: Lecrae \u{2013} Gravity</title></head>\
             <body><time>Created: 4 September 2012</time></body></html>"
                .to_string(),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/music/news"))
        .respond_with(html("<html><head><title>News</title></head></html>".to_string()))
        .mount(&server)
        .await;

    let visitor_config = VisitorConfig {
        record_pattern: format!(r"{}/music/\d+.", regex::escape(&base)),
        follow_pattern: None,
        max_visits: None,
    };
    let visitor = MusicVisitor::from_config(&visitor_config)
        .unwrap()
        .with_store(Box::new(SqliteStore::open_in_memory().unwrap()));

    let fetcher = Fetcher::new(&test_fetcher_config(), None).unwrap();
    let mut controller = CrawlController::new(
        CrawlerConfig::new([seed]).with_scrape_seed_urls(false),
        fetcher,
        visitor,
    )
    .unwrap();

    let report = controller.run().await;
    assert_eq!(report.total_links_visited, 3);

    let visitor = controller.into_visitor();
    assert_eq!(visitor.visits(), 2);
    assert_eq!(visitor.records_scraped(), 1);

    let records = visitor.store().unwrap().list_records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].url, format!("{}/music/101-gravity", base));
    assert_eq!(records[0].artist.as_deref(), Some("Lecrae"));
    assert_eq!(records[0].project.as_deref(), Some("Gravity"));
    assert_eq!(records[0].date.as_deref(), Some("4 September 2012"));
}
