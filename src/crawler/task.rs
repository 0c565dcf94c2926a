//! Recursive crawl task
//!
//! One task is one attempt to process a single URL at a specific remaining
//! depth. A task that gets past its entry checks parses the page, merges
//! the page's word counts into the shared state, then forks one child task
//! per discovered link and waits for all of them (the join barrier) before
//! completing. The task tree therefore mirrors the link graph down to the
//! depth limit, and a crawl is finished exactly when its root tasks return.

use crate::clock::Clock;
use crate::crawler::state::SharedCrawlState;
use crate::parser::PageParser;
use futures::future::BoxFuture;
use regex::Regex;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

/// Immutable context shared by every task in one crawl invocation
pub(crate) struct CrawlContext {
    /// Absolute cutoff; no parsing starts at or after this instant
    pub deadline: Instant,

    /// Anchored patterns; a matching URL and its subtree are skipped
    pub ignored_urls: Vec<Regex>,

    /// The visited set and word counts all tasks write into
    pub state: SharedCrawlState,

    /// External page parser capability
    pub parser: Arc<dyn PageParser>,

    /// Time source for deadline checks
    pub clock: Arc<dyn Clock>,
}

/// Processes one URL and, recursively, everything reachable below it
///
/// The entry checks run in a fixed order, each short-circuiting the rest:
/// depth exhausted, deadline passed, URL ignored, URL already claimed.
/// Exactly one of any set of racing tasks for the same URL proceeds past
/// the visited-set insert.
///
/// The deadline check is cooperative: a task already inside the parser call
/// when the deadline passes finishes normally and merges its counts; only
/// its children then observe the expired deadline and stop.
///
/// A parse failure is localized: the URL stays claimed, contributes no
/// counts and no children, and siblings continue untouched.
pub(crate) fn crawl_page(
    ctx: Arc<CrawlContext>,
    url: String,
    remaining_depth: u32,
) -> BoxFuture<'static, ()> {
    Box::pin(async move {
        if remaining_depth == 0 {
            return;
        }

        if ctx.clock.now() >= ctx.deadline {
            tracing::debug!("Deadline passed, skipping {}", url);
            return;
        }

        if ctx.ignored_urls.iter().any(|pattern| pattern.is_match(&url)) {
            tracing::debug!("Ignored by pattern: {}", url);
            return;
        }

        if !ctx.state.mark_visited(&url) {
            return;
        }

        let page = match ctx.parser.parse(&url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", url, e);
                return;
            }
        };

        tracing::debug!(
            "Parsed {}: {} distinct words, {} links",
            url,
            page.word_counts.len(),
            page.links.len()
        );

        ctx.state.merge_counts(page.word_counts);

        // Fork one child per link, then join them all before returning
        let mut children = JoinSet::new();
        for link in page.links {
            children.spawn(crawl_page(Arc::clone(&ctx), link, remaining_depth - 1));
        }

        while let Some(joined) = children.join_next().await {
            if let Err(e) = joined {
                // A panicking child must not take its siblings down
                tracing::error!("Crawl task failed: {}", e);
            }
        }
    })
}
