//! HTTP page parser implementation
//!
//! This module fetches pages over HTTP and feeds them through the HTML
//! extractor, including:
//! - Building an HTTP client with user agent and timeouts
//! - GET requests with content-type checking
//! - Error classification into [`ParseError`]

use crate::config::{compile_patterns, FetchConfig};
use crate::parser::html::extract_page_data;
use crate::parser::{PageData, PageParser};
use crate::{ConfigError, ParseError};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetch configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.request_timeout_seconds))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// A [`PageParser`] that fetches pages over HTTP
///
/// One instance (and its pooled client) is shared by every crawl task.
pub struct HttpPageParser {
    client: Client,
    ignored_words: Vec<Regex>,
}

impl HttpPageParser {
    /// Creates a parser from the fetch configuration and ignored-word patterns
    pub fn new(
        fetch: &FetchConfig,
        ignored_words: &[String],
    ) -> Result<Self, crate::CrawlerError> {
        let client = build_http_client(fetch).map_err(|e| {
            crate::CrawlerError::Config(ConfigError::Validation(format!(
                "failed to build HTTP client: {}",
                e
            )))
        })?;
        let ignored_words = compile_patterns(ignored_words)?;
        Ok(Self {
            client,
            ignored_words,
        })
    }
}

#[async_trait]
impl PageParser for HttpPageParser {
    async fn parse(&self, url: &str) -> Result<PageData, ParseError> {
        // Discovered links can be arbitrary strings; reject what we cannot
        // fetch before issuing a request.
        let request_url = parse_crawlable_url(url)?;

        let response = self.client.get(request_url).send().await.map_err(|e| {
            if e.is_timeout() {
                ParseError::Timeout {
                    url: url.to_string(),
                }
            } else {
                ParseError::Http {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ParseError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !content_type.contains("text/html") {
            return Err(ParseError::ContentMismatch {
                url: url.to_string(),
                content_type,
            });
        }

        // Resolve links against the final URL after any redirects
        let final_url = response.url().clone();

        let body = response.text().await.map_err(|e| ParseError::Http {
            url: url.to_string(),
            source: e,
        })?;

        Ok(extract_page_data(&body, &final_url, &self.ignored_words))
    }
}

/// Parses a URL string, rejecting anything the crawler cannot fetch
pub(crate) fn parse_crawlable_url(url: &str) -> Result<Url, ParseError> {
    let parsed = Url::parse(url).map_err(|_| ParseError::MalformedUrl(url.to_string()))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ParseError::MalformedUrl(url.to_string()));
    }
    Ok(parsed)
}
