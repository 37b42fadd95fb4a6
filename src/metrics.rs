// Prometheus metrics for outbound delivery monitoring
//
// Collected per outbound call:
// - Request durations, labeled by provider and final status (histogram)
// - Request totals, labeled by provider and final status (counter)
// - Errors reported to the capture sink, labeled by scope (counter)

use std::sync::Arc;
use std::time::Instant;

use lazy_static::lazy_static;
use prometheus::{CounterVec, Encoder, HistogramVec, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Arc<Registry> = Arc::new(Registry::new());

    pub static ref OUTGOING_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        prometheus::HistogramOpts::new(
            "outgoing_request_duration_seconds",
            "Duration of outbound delivery requests in seconds"
        ),
        &["provider", "status"]
    ).expect("Failed to create outgoing request duration metric");

    pub static ref OUTGOING_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        prometheus::Opts::new(
            "outgoing_requests_total",
            "Total number of outbound delivery requests"
        ),
        &["provider", "status"]
    ).expect("Failed to create outgoing requests total metric");

    pub static ref CAPTURED_ERRORS_TOTAL: CounterVec = CounterVec::new(
        prometheus::Opts::new(
            "captured_errors_total",
            "Total number of errors reported to the capture sink"
        ),
        &["scope"]
    ).expect("Failed to create captured errors metric");
}

/// Provider labels for outbound delivery metrics.
pub mod provider {
    /// Owner-registered webhook deliveries.
    pub const WEBHOOK: &str = "webhook";
    /// Push-notification gateway deliveries.
    pub const GATEWAY: &str = "gateway";
}

/// Status label for a completed request.
pub const STATUS_SUCCESS: &str = "success";
/// Status label for a failed request.
pub const STATUS_FAILURE: &str = "failure";

/// Registers all metrics with the registry - call once at startup.
///
/// # Errors
///
/// Returns an error if a metric is already registered.
pub fn init() -> prometheus::Result<()> {
    REGISTRY.register(Box::new(OUTGOING_REQUEST_DURATION_SECONDS.clone()))?;
    REGISTRY.register(Box::new(OUTGOING_REQUESTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(CAPTURED_ERRORS_TOTAL.clone()))?;
    Ok(())
}

/// Gathers all metrics in Prometheus text format.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn gather() -> prometheus::Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Timer for a single outbound delivery attempt.
///
/// Start it immediately before the request and call [`finish`] with the
/// final outcome on every exit path. Consuming `self` makes a second
/// observation for the same attempt impossible.
///
/// [`finish`]: OutgoingTimer::finish
#[derive(Debug)]
pub struct OutgoingTimer {
    provider: &'static str,
    start: Instant,
}

impl OutgoingTimer {
    /// Starts timing an outbound request for the given provider.
    #[must_use]
    pub fn start(provider: &'static str) -> Self {
        Self {
            provider,
            start: Instant::now(),
        }
    }

    /// Records the attempt's duration and outcome.
    pub fn finish(self, success: bool) {
        let status = if success {
            STATUS_SUCCESS
        } else {
            STATUS_FAILURE
        };
        let elapsed = self.start.elapsed().as_secs_f64();

        OUTGOING_REQUEST_DURATION_SECONDS
            .with_label_values(&[self.provider, status])
            .observe(elapsed);
        OUTGOING_REQUESTS_TOTAL
            .with_label_values(&[self.provider, status])
            .inc();
    }
}
