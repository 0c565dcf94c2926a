//! Lexicrawl: a parallel word-frequency web crawler
//!
//! This crate crawls the link graph reachable from a set of starting URLs,
//! counting word occurrences on every visited page. The crawl is bounded by
//! a depth limit, a wall-clock deadline, and a list of URL exclusion
//! patterns, and the final result is the top-N most frequent words across
//! all visited pages.

pub mod clock;
pub mod config;
pub mod crawler;
pub mod output;
pub mod parser;
pub mod profiler;

use thiserror::Error;

/// Main error type for Lexicrawl operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Page parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid exclusion pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// Errors produced while fetching or parsing a single page
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Expected HTML for {url}, got {content_type}")]
    ContentMismatch { url: String, content_type: String },

    #[error("Malformed URL: {0}")]
    MalformedUrl(String),
}

/// Result type alias for Lexicrawl operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use clock::{Clock, SystemClock};
pub use config::Config;
pub use crawler::{CrawlEngine, CrawlResult};
pub use parser::{PageData, PageParser};
