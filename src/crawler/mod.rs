//! Crawler module for parallel link-graph traversal
//!
//! This module contains the core crawling logic, including:
//! - Shared concurrent crawl state (visited set, word counts)
//! - The recursive fork/join crawl task
//! - The top-N word-frequency reduction
//! - The crawl engine driving a whole crawl invocation

mod engine;
mod state;
mod task;
mod words;

pub use engine::{CrawlEngine, CrawlResult};
pub use state::SharedCrawlState;
pub use words::top_words;
