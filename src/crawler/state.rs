//! Shared concurrent crawl state
//!
//! One [`SharedCrawlState`] lives for exactly one crawl invocation. It holds
//! the only two pieces of mutable state the racing tasks share: the visited
//! set and the aggregated word counts. Both support safe concurrent access
//! from an unbounded number of tasks, and neither operation holds a lock
//! across anything but the single map entry it touches.

use dashmap::{DashMap, DashSet};
use std::collections::HashMap;

/// De-duplication set and word-count accumulator for one crawl
#[derive(Debug, Default)]
pub struct SharedCrawlState {
    /// URLs that some task has claimed; entries never leave
    visited: DashSet<String>,

    /// Aggregated word counts over all parsed pages
    counts: DashMap<String, u64>,
}

impl SharedCrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claims a URL for processing
    ///
    /// Returns `true` if this caller inserted the URL and therefore owns
    /// processing it; `false` if another task got there first. This single
    /// test-and-insert is the only safeguard against double-processing a URL
    /// discovered by two tasks at once.
    pub fn mark_visited(&self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    /// Number of URLs claimed so far
    pub fn urls_visited(&self) -> usize {
        self.visited.len()
    }

    /// Merges one page's word counts into the shared totals
    ///
    /// Addition is commutative and associative, so concurrent merges from
    /// sibling tasks land in any order without loss. Zero counts are the
    /// additive identity and are skipped so they never materialize an entry.
    pub fn merge_counts(&self, page_counts: HashMap<String, u64>) {
        for (word, count) in page_counts {
            if count == 0 {
                continue;
            }
            *self.counts.entry(word).or_insert(0) += count;
        }
    }

    /// Snapshots the aggregated counts
    ///
    /// Only meaningful after every task has completed; the crawl engine
    /// calls this once, after the join barrier on the root tasks.
    pub fn snapshot_counts(&self) -> HashMap<String, u64> {
        self.counts
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}
