use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use regex::Regex;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use lexicrawl::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Max depth: {}", config.crawler.max_depth);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

/// Compiles exclusion patterns with whole-string match semantics
///
/// Each pattern is anchored so that it must match the entire candidate
/// string, never a substring. A URL that merely contains a match is not
/// excluded.
///
/// # Arguments
///
/// * `patterns` - The raw pattern strings from the configuration
///
/// # Returns
///
/// * `Ok(Vec<Regex>)` - All patterns compiled
/// * `Err(ConfigError)` - The first pattern that failed to compile
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| {
                ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                }
            })
        })
        .collect()
}
