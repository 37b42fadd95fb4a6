//! Error-capture sink for unexpected external failures.
//!
//! Directory fetches and notification sends fail without failing the
//! dispatch that triggered them; those errors are handed to an
//! [`ErrorCapture`] implementation instead of being propagated. Invalid
//! caller input (such as a malformed webhook URL) is returned to the
//! caller directly and never reaches this sink.

use crate::metrics::CAPTURED_ERRORS_TOTAL;

/// Scope labels identifying where a captured error originated.
pub mod scope {
    /// Subscriber-directory fetch from the push gateway.
    pub const SUBSCRIBER_DIRECTORY: &str = "subscriber_directory";
    /// Batched notification send to the push gateway.
    pub const GATEWAY_NOTIFY: &str = "gateway_notify";
}

/// Sink for errors that are absorbed rather than propagated.
///
/// Implementations forward the error to an external collector, a log,
/// or a test double. The pipeline guarantees at most one capture per
/// failed external call.
pub trait ErrorCapture: Send + Sync {
    /// Reports an absorbed error with the scope it originated from.
    fn capture(&self, scope: &'static str, error: &dyn std::error::Error);
}

/// Default capture sink: structured log plus a labeled counter.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingCapture;

impl ErrorCapture for TracingCapture {
    fn capture(&self, scope: &'static str, error: &dyn std::error::Error) {
        CAPTURED_ERRORS_TOTAL.with_label_values(&[scope]).inc();
        tracing::error!("[{scope}] {error}");
    }
}
