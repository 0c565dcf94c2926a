//! Result output
//!
//! Serializes the final [`CrawlResult`] as JSON, either to a file or, when
//! no path is configured, to stdout.

use crate::crawler::CrawlResult;
use crate::Result;
use std::io::Write;
use std::path::Path;

/// Writes the crawl result as pretty-printed JSON
///
/// # Arguments
///
/// * `result` - The crawl result to serialize
/// * `path` - Target file; `None` writes to stdout
pub fn write_result(result: &CrawlResult, path: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;

    match path {
        Some(path) => {
            std::fs::write(path, json.as_bytes())?;
            tracing::info!("Result written to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(json.as_bytes())?;
            handle.write_all(b"\n")?;
        }
    }

    Ok(())
}
