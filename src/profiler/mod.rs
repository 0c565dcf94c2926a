//! Call-timing profiler
//!
//! An explicit decorator, selected at construction time, that times parser
//! calls and accumulates per-method statistics. Wrapping the parser in a
//! [`ProfiledParser`] is all it takes; the crawl engine stays unaware of
//! whether its parser is instrumented.

use crate::clock::Clock;
use crate::parser::{PageData, PageParser};
use crate::ParseError;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use dashmap::DashMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Accumulated timing for one instrumented method
#[derive(Debug, Clone, Copy, Default)]
pub struct MethodStats {
    pub calls: u64,
    pub total: Duration,
}

/// Concurrency-safe accumulator of per-method call timings
#[derive(Debug, Default)]
pub struct ProfilingState {
    records: DashMap<&'static str, MethodStats>,
}

impl ProfilingState {
    /// Adds one observed call duration for the given method
    pub fn record(&self, method: &'static str, elapsed: Duration) {
        let mut stats = self.records.entry(method).or_default();
        stats.calls += 1;
        stats.total += elapsed;
    }

    /// Accumulated stats for one method, if it was ever called
    pub fn stats(&self, method: &str) -> Option<MethodStats> {
        self.records.get(method).map(|entry| *entry.value())
    }

    fn write(&self, writer: &mut impl Write) -> std::io::Result<()> {
        // Sorted for a stable report
        let mut methods: Vec<&'static str> =
            self.records.iter().map(|entry| *entry.key()).collect();
        methods.sort_unstable();

        for method in methods {
            if let Some(stats) = self.stats(method) {
                writeln!(
                    writer,
                    "  {} - {} calls, {:?} total",
                    method, stats.calls, stats.total
                )?;
            }
        }
        Ok(())
    }
}

/// Records and reports call timings for one program run
pub struct Profiler {
    clock: Arc<dyn Clock>,
    state: ProfilingState,
    started_at: DateTime<Local>,
}

impl Profiler {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: ProfilingState::default(),
            started_at: Local::now(),
        }
    }

    /// Wraps a parser so every `parse` call is timed through this profiler
    pub fn wrap_parser(self: &Arc<Self>, parser: Arc<dyn PageParser>) -> Arc<dyn PageParser> {
        Arc::new(ProfiledParser {
            inner: parser,
            profiler: Arc::clone(self),
        })
    }

    /// The accumulated per-method statistics
    pub fn state(&self) -> &ProfilingState {
        &self.state
    }

    /// Writes the profile report to the given writer
    pub fn write_report(&self, writer: &mut impl Write) -> std::io::Result<()> {
        writeln!(writer, "Run at {}", self.started_at.to_rfc2822())?;
        self.state.write(writer)?;
        writeln!(writer)
    }

    /// Appends the profile report to a file, creating it if needed
    pub fn write_report_to(&self, path: &Path) -> std::io::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        self.write_report(&mut file)
    }
}

/// A [`PageParser`] decorator that times every call
struct ProfiledParser {
    inner: Arc<dyn PageParser>,
    profiler: Arc<Profiler>,
}

#[async_trait]
impl PageParser for ProfiledParser {
    async fn parse(&self, url: &str) -> Result<PageData, ParseError> {
        let start = self.profiler.clock.now();
        let result = self.inner.parse(url).await;
        // Failed calls are timed too
        let elapsed = self.profiler.clock.now() - start;
        self.profiler.state.record("PageParser::parse", elapsed);
        result
    }
}
