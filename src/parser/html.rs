//! HTML content extraction
//!
//! This module turns raw HTML into [`PageData`]:
//! - words from the visible text of the document, lowercased and split on
//!   non-alphanumeric characters
//! - links from `<a href="...">` tags, resolved to absolute URLs
//!
//! Words matching an ignored-word pattern are dropped at extraction time so
//! they never reach the shared counts.

use crate::parser::PageData;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

/// Extracts words and links from an HTML document
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The base URL for resolving relative links
/// * `ignored_words` - Anchored patterns; matching words are not counted
///
/// # Returns
///
/// The words and links found on the page
pub fn extract_page_data(html: &str, base_url: &Url, ignored_words: &[Regex]) -> PageData {
    let document = Html::parse_document(html);

    let mut page = PageData::default();

    for word in extract_words(&document) {
        if ignored_words.iter().any(|pattern| pattern.is_match(&word)) {
            continue;
        }
        *page.word_counts.entry(word).or_insert(0) += 1;
    }

    page.links = extract_links(&document, base_url);

    page
}

/// Extracts all words from the visible text of the document body
///
/// Only text nodes under `<body>` count; `<title>`, `<script>`, and
/// `<style>` content never reaches the word counts. Words are lowercased
/// and split on any non-alphanumeric character; empty fragments are
/// dropped.
fn extract_words(document: &Html) -> Vec<String> {
    let mut words = Vec::new();

    let body_selector = match Selector::parse("body") {
        Ok(selector) => selector,
        Err(_) => return words,
    };
    let body = match document.select(&body_selector).next() {
        Some(body) => body,
        None => return words,
    };

    // Walk the body subtree, pruning script and style elements
    let mut stack: Vec<_> = body.children().collect();
    while let Some(node) = stack.pop() {
        if let Some(element) = node.value().as_element() {
            if element.name() == "script" || element.name() == "style" {
                continue;
            }
        }

        if let Some(text) = node.value().as_text() {
            for fragment in text.split(|c: char| !c.is_alphanumeric()) {
                if fragment.is_empty() {
                    continue;
                }
                words.push(fragment.to_lowercase());
            }
        }

        stack.extend(node.children());
    }

    words
}

/// Extracts all valid links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            // Skip if it has the download attribute
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - invalid URLs or non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
