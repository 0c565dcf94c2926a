//! Integration tests for the crawl engine
//!
//! Most tests drive the engine over a fixed in-memory link graph to make
//! concurrency and termination behavior observable without a network. The
//! final tests use wiremock to exercise the HTTP parser end-to-end.

use async_trait::async_trait;
use lexicrawl::clock::{Clock, ManualClock, SystemClock};
use lexicrawl::config::{CrawlConfig, FetchConfig};
use lexicrawl::crawler::CrawlEngine;
use lexicrawl::parser::{HttpPageParser, PageData, PageParser};
use lexicrawl::ParseError;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Parser over a fixed in-memory link graph, with a tiny yield per call to
/// shuffle task interleavings
struct GraphParser {
    pages: HashMap<String, PageData>,
}

impl GraphParser {
    fn new(pages: &[(&str, &[(&str, u64)], &[&str])]) -> Self {
        let pages = pages
            .iter()
            .map(|(url, words, links)| {
                (
                    url.to_string(),
                    PageData {
                        word_counts: words
                            .iter()
                            .map(|(word, count)| (word.to_string(), *count))
                            .collect(),
                        links: links.iter().map(|link| link.to_string()).collect(),
                    },
                )
            })
            .collect();
        Self { pages }
    }
}

#[async_trait]
impl PageParser for GraphParser {
    async fn parse(&self, url: &str) -> Result<PageData, ParseError> {
        tokio::task::yield_now().await;
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ParseError::MalformedUrl(url.to_string()))
    }
}

fn test_config(max_depth: u32) -> CrawlConfig {
    CrawlConfig {
        start_urls: vec!["a".to_string()],
        max_depth,
        timeout_seconds: 60,
        popular_word_count: 10,
        target_parallelism: 4,
        ignored_urls: vec![],
        ignored_words: vec![],
    }
}

fn engine(config: &CrawlConfig, parser: GraphParser) -> CrawlEngine {
    CrawlEngine::new(config, Arc::new(parser), Arc::new(SystemClock)).unwrap()
}

#[tokio::test]
async fn test_depth_zero_visits_nothing() {
    let parser = GraphParser::new(&[("a", &[("x", 1)], &[])]);
    let result = engine(&test_config(0), parser)
        .crawl(&["a".to_string()])
        .await;

    assert_eq!(result.urls_visited, 0);
    assert!(result.word_counts.is_empty());
}

#[tokio::test]
async fn test_diamond_graph_visits_each_url_once() {
    // A -> {B, C}, B -> D, C -> D: two tasks race to claim D
    for _ in 0..50 {
        let parser = GraphParser::new(&[
            ("a", &[("a", 1)], &["b", "c"]),
            ("b", &[("b", 1)], &["d"]),
            ("c", &[("c", 1)], &["d"]),
            ("d", &[("d", 1)], &[]),
        ]);
        let result = engine(&test_config(5), parser)
            .crawl(&["a".to_string()])
            .await;

        assert_eq!(result.urls_visited, 4);
        // D parsed exactly once, so its word counted exactly once
        let counts: HashMap<String, u64> = result.word_counts.into_iter().collect();
        assert_eq!(counts.get("d"), Some(&1));
    }
}

#[tokio::test]
async fn test_expired_deadline_visits_nothing() {
    // Zero timeout: the deadline equals the engine's start instant, and the
    // manual clock never moves, so every task sees it as already passed.
    let mut config = test_config(5);
    config.timeout_seconds = 0;

    let parser = GraphParser::new(&[("a", &[("x", 1)], &["b"])]);
    let clock: Arc<dyn Clock> = Arc::new(ManualClock::new());
    let engine = CrawlEngine::new(&config, Arc::new(parser), clock).unwrap();

    let result = engine.crawl(&["a".to_string()]).await;
    assert_eq!(result.urls_visited, 0);
    assert!(result.word_counts.is_empty());
}

#[tokio::test]
async fn test_deadline_passing_mid_parse_finishes_that_page_only() {
    // A parser that burns the whole time budget during the root's parse.
    // The root task is already past its deadline check, so it completes and
    // merges its counts; only its children observe the expired deadline.
    struct SlowParser {
        clock: Arc<ManualClock>,
    }

    #[async_trait]
    impl PageParser for SlowParser {
        async fn parse(&self, _url: &str) -> Result<PageData, ParseError> {
            self.clock.advance(Duration::from_secs(120));
            Ok(PageData {
                word_counts: HashMap::from([("root".to_string(), 2)]),
                links: vec!["child1".to_string(), "child2".to_string()],
            })
        }
    }

    let clock = Arc::new(ManualClock::new());
    let parser = SlowParser {
        clock: clock.clone(),
    };

    let mut config = test_config(5);
    config.timeout_seconds = 60;

    let engine = CrawlEngine::new(&config, Arc::new(parser), clock).unwrap();
    let result = engine.crawl(&["root".to_string()]).await;

    // The in-flight parse was never interrupted; its results landed
    assert_eq!(result.urls_visited, 1);
    assert_eq!(result.word_counts, vec![("root".to_string(), 2)]);
}

#[tokio::test]
async fn test_ignored_starting_url_skips_whole_subtree() {
    let mut config = test_config(5);
    config.ignored_urls = vec!["https://example\\.com/skip.*".to_string()];
    config.start_urls = vec!["https://example.com/skipped".to_string()];

    let parser = GraphParser::new(&[(
        "https://example.com/skipped",
        &[("x", 1)],
        &["https://example.com/child"],
    )]);
    let result = engine(&config, parser)
        .crawl(&["https://example.com/skipped".to_string()])
        .await;

    assert_eq!(result.urls_visited, 0);
    assert!(result.word_counts.is_empty());
}

#[tokio::test]
async fn test_ignored_pattern_is_whole_string_match() {
    let mut config = test_config(5);
    // Bare substring pattern must not exclude URLs that merely contain it
    config.ignored_urls = vec!["skip".to_string()];

    let parser = GraphParser::new(&[("https://example.com/skip-me-not", &[("x", 1)], &[])]);
    let result = engine(&config, parser)
        .crawl(&["https://example.com/skip-me-not".to_string()])
        .await;

    assert_eq!(result.urls_visited, 1);
}

#[tokio::test]
async fn test_aggregation_sums_counts_across_pages() {
    let parser = GraphParser::new(&[
        ("a", &[("x", 2)], &["b"]),
        ("b", &[("x", 3), ("y", 1)], &[]),
    ]);
    let result = engine(&test_config(2), parser)
        .crawl(&["a".to_string()])
        .await;

    assert_eq!(result.urls_visited, 2);
    assert_eq!(
        result.word_counts,
        vec![("x".to_string(), 5), ("y".to_string(), 1)]
    );
}

#[tokio::test]
async fn test_popular_word_count_bounds_result() {
    let parser = GraphParser::new(&[(
        "a",
        &[("one", 1), ("two", 2), ("three", 3), ("four", 4)],
        &[],
    )]);
    let mut config = test_config(2);
    config.popular_word_count = 2;

    let result = engine(&config, parser).crawl(&["a".to_string()]).await;

    assert_eq!(
        result.word_counts,
        vec![("four".to_string(), 4), ("three".to_string(), 3)]
    );
}

#[tokio::test]
async fn test_parse_failure_is_isolated() {
    // "missing" is not in the graph, so parsing it fails; its sibling and
    // the overall crawl must be unaffected.
    let parser = GraphParser::new(&[
        ("a", &[("a", 1)], &["missing", "b"]),
        ("b", &[("b", 1)], &[]),
    ]);
    let result = engine(&test_config(3), parser)
        .crawl(&["a".to_string()])
        .await;

    // The failing URL was claimed before the parse, so it counts as visited
    assert_eq!(result.urls_visited, 3);
    let counts: HashMap<String, u64> = result.word_counts.into_iter().collect();
    assert_eq!(counts.get("a"), Some(&1));
    assert_eq!(counts.get("b"), Some(&1));
}

#[tokio::test]
async fn test_multiple_starting_urls_share_state() {
    // Both roots link to the shared page; it must be parsed only once
    let parser = GraphParser::new(&[
        ("a", &[("a", 1)], &["shared"]),
        ("b", &[("b", 1)], &["shared"]),
        ("shared", &[("s", 1)], &[]),
    ]);
    let result = engine(&test_config(3), parser)
        .crawl(&["a".to_string(), "b".to_string()])
        .await;

    assert_eq!(result.urls_visited, 3);
    let counts: HashMap<String, u64> = result.word_counts.into_iter().collect();
    assert_eq!(counts.get("s"), Some(&1));
}

#[tokio::test]
async fn test_cyclic_graph_terminates() {
    let parser = GraphParser::new(&[
        ("a", &[("w", 1)], &["b"]),
        ("b", &[("w", 1)], &["c"]),
        ("c", &[("w", 1)], &["a"]),
    ]);
    let result = engine(&test_config(10), parser)
        .crawl(&["a".to_string()])
        .await;

    assert_eq!(result.urls_visited, 3);
    let counts: HashMap<String, u64> = result.word_counts.into_iter().collect();
    assert_eq!(counts.get("w"), Some(&3));
}

#[tokio::test]
async fn test_http_crawl_end_to_end() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(
                format!(
                    r#"<html><body>
                    <p>rust rust crawler</p>
                    <a href="{}/page1">Page 1</a>
                    </body></html>"#,
                    base_url
                ),
                "text/html",
            ),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html><body><p>rust pages</p></body></html>", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let fetch = FetchConfig {
        user_agent: "TestCrawler/1.0".to_string(),
        request_timeout_seconds: 5,
    };
    let parser = Arc::new(HttpPageParser::new(&fetch, &[]).unwrap());

    let mut config = test_config(3);
    config.start_urls = vec![format!("{}/", base_url)];

    let engine = CrawlEngine::new(&config, parser, Arc::new(SystemClock)).unwrap();
    let result = engine.crawl(&config.start_urls).await;

    assert_eq!(result.urls_visited, 2);
    let counts: HashMap<String, u64> = result.word_counts.into_iter().collect();
    assert_eq!(counts.get("rust"), Some(&3));
    assert_eq!(counts.get("crawler"), Some(&1));
    assert_eq!(counts.get("pages"), Some(&1));
}

#[tokio::test]
async fn test_http_crawl_skips_non_success_pages() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(
                format!(
                    r#"<html><body>
                    <p>index</p>
                    <a href="{}/gone">Gone</a>
                    </body></html>"#,
                    base_url
                ),
                "text/html",
            ),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let fetch = FetchConfig {
        user_agent: "TestCrawler/1.0".to_string(),
        request_timeout_seconds: 5,
    };
    let parser = Arc::new(HttpPageParser::new(&fetch, &[]).unwrap());

    let mut config = test_config(3);
    config.start_urls = vec![format!("{}/", base_url)];

    let engine = CrawlEngine::new(&config, parser, Arc::new(SystemClock)).unwrap();
    let result = engine.crawl(&config.start_urls).await;

    // The 404 page is claimed but contributes nothing
    assert_eq!(result.urls_visited, 2);
    let counts: HashMap<String, u64> = result.word_counts.into_iter().collect();
    assert_eq!(counts.get("index"), Some(&1));
    assert_eq!(counts.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_diamond_on_multi_thread_runtime() {
    // Same diamond race on a real multi-threaded runtime
    for _ in 0..20 {
        let parser = GraphParser::new(&[
            ("a", &[("a", 1)], &["b", "c"]),
            ("b", &[("b", 1)], &["d"]),
            ("c", &[("c", 1)], &["d"]),
            ("d", &[("d", 1)], &[]),
        ]);
        let result = engine(&test_config(5), parser)
            .crawl(&["a".to_string()])
            .await;

        assert_eq!(result.urls_visited, 4);
        let counts: HashMap<String, u64> = result.word_counts.into_iter().collect();
        assert_eq!(counts.get("d"), Some(&1));
    }
}
