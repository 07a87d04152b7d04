//! Per-attempt reporting for HTTP requests
//!
//! Every completed attempt, successful or not, is turned into an
//! [`AttemptRecord`] and handed to an [`AttemptObserver`]. The default
//! observer writes structured `tracing` events; tests and applications can
//! plug in their own sink through [`crate::ClientBuilder::observer`].

use http::Method;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};
use url::Url;

/// What happened during one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// A response was received with the given status code.
    Status(u16),
    /// The transport failed before a complete response was received.
    TransportError(String),
}

/// One record per attempt, produced by the backoff executor.
#[derive(Debug, Clone)]
pub struct AttemptRecord {
    /// Zero-based attempt index
    pub attempt: u32,
    /// Delay slept before this attempt (zero for the first)
    pub delay: Duration,
    /// Time from send to full response
    pub latency: Duration,
    /// HTTP method on the wire
    pub method: Method,
    /// Target URL
    pub url: Url,
    /// Status code or transport failure
    pub outcome: AttemptOutcome,
    /// Whether the executor accepted this attempt as a success
    pub succeeded: bool,
}

impl AttemptRecord {
    /// Status code, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self.outcome {
            AttemptOutcome::Status(status) => Some(status),
            AttemptOutcome::TransportError(_) => None,
        }
    }

    /// The one-line rendering used by simple sinks.
    pub fn log_line(&self) -> String {
        match &self.outcome {
            AttemptOutcome::Status(status) => format!(
                "Layer responded after {}ms with status code {} for {} request to {}",
                self.latency.as_millis(),
                status,
                self.method,
                self.url
            ),
            AttemptOutcome::TransportError(message) => format!(
                "Layer request failed after {}ms with transport error ({}) for {} request to {}",
                self.latency.as_millis(),
                message,
                self.method,
                self.url
            ),
        }
    }
}

/// Sink for attempt records.
pub trait AttemptObserver: Send + Sync {
    /// Called once per completed attempt, in attempt order.
    fn on_attempt(&self, record: &AttemptRecord);
}

/// Observer that emits `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl AttemptObserver for TracingObserver {
    fn on_attempt(&self, record: &AttemptRecord) {
        match &record.outcome {
            AttemptOutcome::Status(status) if record.succeeded => info!(
                attempt = record.attempt,
                delay_ms = record.delay.as_millis(),
                latency_ms = record.latency.as_millis(),
                status = *status,
                method = %record.method,
                url = %record.url,
                "Layer request completed"
            ),
            AttemptOutcome::Status(status) => warn!(
                attempt = record.attempt,
                delay_ms = record.delay.as_millis(),
                latency_ms = record.latency.as_millis(),
                status = *status,
                method = %record.method,
                url = %record.url,
                "Layer request rejected"
            ),
            AttemptOutcome::TransportError(error) => warn!(
                attempt = record.attempt,
                delay_ms = record.delay.as_millis(),
                latency_ms = record.latency.as_millis(),
                error = %error,
                method = %record.method,
                url = %record.url,
                "Layer request failed"
            ),
        }
    }
}

/// Observer that keeps every record in memory.
///
/// Clones share the same buffer, so a clone can be handed to the client and
/// this one inspected afterwards.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    records: Arc<Mutex<Vec<AttemptRecord>>>,
}

impl RecordingObserver {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records seen so far.
    pub fn records(&self) -> Vec<AttemptRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Number of records seen so far.
    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AttemptObserver for RecordingObserver {
    fn on_attempt(&self, record: &AttemptRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record.clone());
        }
    }
}

/// Observer that forwards the formatted line to a closure.
pub struct LineObserver<F> {
    sink: F,
}

impl<F> LineObserver<F>
where
    F: Fn(&str) + Send + Sync,
{
    /// Wrap a line sink.
    pub fn new(sink: F) -> Self {
        Self { sink }
    }
}

impl<F> AttemptObserver for LineObserver<F>
where
    F: Fn(&str) + Send + Sync,
{
    fn on_attempt(&self, record: &AttemptRecord) {
        (self.sink)(&record.log_line());
    }
}

/// Timer for measuring attempt latency on the runtime's monotonic clock.
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    /// Start a new timer
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Install a global `tracing` subscriber filtered by `RUST_LOG`.
///
/// Falls back to `layer_client=info` when `RUST_LOG` is unset. Returns an
/// error if a global subscriber is already installed.
#[cfg(feature = "trace")]
pub fn init_tracing() -> crate::Result<()> {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("layer_client=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| crate::Error::Other(anyhow::anyhow!(e)))
}
