use crate::config::parser::compile_patterns;
use crate::config::types::{Config, CrawlConfig, FetchConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound for `timeout-seconds` (one week)
///
/// Keeps deadline arithmetic far away from `Instant` overflow.
pub const MAX_TIMEOUT_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawler)?;
    validate_fetch_config(&config.fetch)?;
    Ok(())
}

/// Validates crawl configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    // max_depth and popular_word_count are unsigned, so zero is the only
    // boundary and both are legal (they yield an empty crawl/result).

    if config.start_urls.is_empty() {
        return Err(ConfigError::Validation(
            "start-urls must contain at least one URL".to_string(),
        ));
    }

    for raw in &config.start_urls {
        let url = Url::parse(raw)
            .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", raw, e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "'{}': only http and https URLs can be crawled",
                raw
            )));
        }
    }

    if config.timeout_seconds > MAX_TIMEOUT_SECONDS {
        return Err(ConfigError::Validation(format!(
            "timeout-seconds must be <= {}, got {}",
            MAX_TIMEOUT_SECONDS, config.timeout_seconds
        )));
    }

    if config.target_parallelism < 1 {
        return Err(ConfigError::Validation(format!(
            "target-parallelism must be >= 1, got {}",
            config.target_parallelism
        )));
    }

    // Fail early on malformed patterns rather than mid-crawl
    compile_patterns(&config.ignored_urls)?;
    compile_patterns(&config.ignored_words)?;

    Ok(())
}

/// Validates fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_seconds < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-seconds must be >= 1, got {}",
            config.request_timeout_seconds
        )));
    }

    Ok(())
}
