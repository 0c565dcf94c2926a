//! Crawl engine - drives one whole crawl invocation
//!
//! The engine owns everything a crawl needs that outlives a single task:
//! the configured limits, the compiled URL exclusion patterns, the parser
//! capability, and the clock. `crawl()` computes the deadline once, forks
//! one root task per starting URL, blocks on the join barrier over the
//! whole task tree, then reduces the aggregate counts to the final result.

use crate::clock::Clock;
use crate::config::{compile_patterns, CrawlConfig};
use crate::crawler::state::SharedCrawlState;
use crate::crawler::task::{crawl_page, CrawlContext};
use crate::crawler::words::top_words;
use crate::parser::PageParser;
use crate::ConfigError;
use regex::Regex;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// Final, immutable result of one crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlResult {
    /// Top-frequency words, highest count first
    pub word_counts: Vec<(String, u64)>,

    /// Number of distinct URLs claimed during the crawl
    pub urls_visited: usize,
}

// Serialized with `wordCounts` as an order-preserving JSON object so the
// ranking survives the trip through serialization.
impl Serialize for CrawlResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct OrderedCounts<'a>(&'a [(String, u64)]);

        impl Serialize for OrderedCounts<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for (word, count) in self.0 {
                    map.serialize_entry(word, count)?;
                }
                map.end()
            }
        }

        let mut state = serializer.serialize_struct("CrawlResult", 2)?;
        state.serialize_field("wordCounts", &OrderedCounts(&self.word_counts))?;
        state.serialize_field("urlsVisited", &self.urls_visited)?;
        state.end()
    }
}

/// Parallel crawl driver
///
/// # Example
///
/// ```no_run
/// use lexicrawl::clock::SystemClock;
/// use lexicrawl::config::{CrawlConfig, FetchConfig};
/// use lexicrawl::crawler::CrawlEngine;
/// use lexicrawl::parser::HttpPageParser;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// # let crawl_config: CrawlConfig = todo!();
/// let parser = Arc::new(HttpPageParser::new(&FetchConfig::default(), &[])?);
/// let engine = CrawlEngine::new(&crawl_config, parser, Arc::new(SystemClock))?;
/// let result = engine.crawl(&crawl_config.start_urls).await;
/// println!("visited {} pages", result.urls_visited);
/// # Ok(())
/// # }
/// ```
pub struct CrawlEngine {
    clock: Arc<dyn Clock>,
    parser: Arc<dyn PageParser>,
    max_depth: u32,
    timeout: Duration,
    popular_word_count: usize,
    ignored_urls: Vec<Regex>,
}

impl CrawlEngine {
    /// Creates an engine from the crawl configuration
    ///
    /// This is the only place a crawl can fail towards the caller: pattern
    /// compilation errors surface here, at construction, never mid-traversal.
    pub fn new(
        config: &CrawlConfig,
        parser: Arc<dyn PageParser>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        let ignored_urls = compile_patterns(&config.ignored_urls)?;

        Ok(Self {
            clock,
            parser,
            max_depth: config.max_depth,
            timeout: Duration::from_secs(config.timeout_seconds),
            popular_word_count: config.popular_word_count,
            ignored_urls,
        })
    }

    /// Crawls everything reachable from the starting URLs
    ///
    /// Blocks (asynchronously) until the entire task tree has completed,
    /// then reduces the aggregate counts to the top-N ranking. Individual
    /// page failures never surface here; they are logged and skipped.
    pub async fn crawl(&self, starting_urls: &[String]) -> CrawlResult {
        let started = self.clock.now();
        // Validation bounds the configured timeout, but an engine built
        // directly must not overflow Instant arithmetic either.
        let deadline = started
            .checked_add(self.timeout)
            .unwrap_or_else(|| started + Duration::from_secs(crate::config::MAX_TIMEOUT_SECONDS));
        let ctx = Arc::new(CrawlContext {
            deadline,
            ignored_urls: self.ignored_urls.clone(),
            state: SharedCrawlState::new(),
            parser: Arc::clone(&self.parser),
            clock: Arc::clone(&self.clock),
        });

        tracing::info!(
            "Starting crawl: {} starting URLs, max depth {}, timeout {:?}",
            starting_urls.len(),
            self.max_depth,
            self.timeout
        );

        let mut roots = JoinSet::new();
        for url in starting_urls {
            roots.spawn(crawl_page(Arc::clone(&ctx), url.clone(), self.max_depth));
        }

        while let Some(joined) = roots.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Root crawl task failed: {}", e);
            }
        }

        let counts = ctx.state.snapshot_counts();
        let urls_visited = ctx.state.urls_visited();

        tracing::info!(
            "Crawl finished: {} URLs visited, {} distinct words, took {:?}",
            urls_visited,
            counts.len(),
            self.clock.now() - started
        );

        CrawlResult {
            word_counts: top_words(&counts, self.popular_word_count),
            urls_visited,
        }
    }

    /// Available hardware parallelism
    ///
    /// A throughput hint for sizing the worker pool; it has no effect on
    /// crawl correctness.
    pub fn max_parallelism() -> usize {
        std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(1)
    }
}
