use serde::Deserialize;

/// Main configuration structure for Lexicrawl
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// URLs the crawl starts from
    #[serde(rename = "start-urls")]
    pub start_urls: Vec<String>,

    /// Maximum link depth to follow from the starting URLs
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Wall-clock budget for the whole crawl, in seconds
    #[serde(rename = "timeout-seconds")]
    pub timeout_seconds: u64,

    /// Number of top-frequency words to keep in the result
    #[serde(rename = "popular-word-count")]
    pub popular_word_count: usize,

    /// Desired worker parallelism (throughput hint, capped by the host)
    #[serde(rename = "target-parallelism", default = "default_parallelism")]
    pub target_parallelism: usize,

    /// Patterns excluding URLs from the crawl (whole-string match)
    #[serde(rename = "ignored-urls", default)]
    pub ignored_urls: Vec<String>,

    /// Patterns excluding words from the counts (whole-string match)
    #[serde(rename = "ignored-words", default)]
    pub ignored_words: Vec<String>,
}

/// HTTP fetch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// User agent sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout, in seconds
    #[serde(rename = "request-timeout-seconds", default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Where to write the JSON crawl result; empty means stdout
    #[serde(rename = "results-path", default)]
    pub results_path: String,

    /// Where to append the profile report; empty means skip it
    #[serde(rename = "profile-path", default)]
    pub profile_path: String,
}

fn default_parallelism() -> usize {
    1
}

fn default_user_agent() -> String {
    format!("lexicrawl/{}", env!("CARGO_PKG_VERSION"))
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}
