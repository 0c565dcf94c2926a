//! Page parser capability
//!
//! The crawl engine never fetches pages itself; it depends on the
//! [`PageParser`] trait, a black box that turns a URL into the words and
//! links found on that page. This module also provides the production
//! implementation, [`HttpPageParser`], which fetches pages over HTTP and
//! extracts content with scraper.

mod html;
mod http;

pub use html::extract_page_data;
pub use http::{build_http_client, HttpPageParser};

use crate::ParseError;
use async_trait::async_trait;
use std::collections::HashMap;

/// Words and links extracted from a single page
#[derive(Debug, Clone, Default)]
pub struct PageData {
    /// Occurrence count per word on this page
    pub word_counts: HashMap<String, u64>,

    /// Absolute URLs found on this page, in document order
    pub links: Vec<String>,
}

/// Turns a URL into the words and links on that page
///
/// Implementations may be slow and may fail; the crawl engine treats a
/// failed parse as a localized event and continues with the rest of the
/// traversal.
#[async_trait]
pub trait PageParser: Send + Sync {
    async fn parse(&self, url: &str) -> Result<PageData, ParseError>;
}
