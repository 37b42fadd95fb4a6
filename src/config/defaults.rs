//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default maximum accounts per notify request.
pub const MAX_ACCOUNTS_PER_REQUEST: usize = 500;

/// Default gateway request quota in requests per second.
pub const PER_SECOND_RATE_LIMIT: f64 = 2.0;

/// Default safety margin added to the inter-batch pause, in seconds.
pub const WAIT_ERROR_MARGIN_SECS: f64 = 0.25;

/// Default timeout for outbound requests in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default notification-type label.
pub const NOTIFICATION_TYPE: &str = "entry_created";

/// Default outbound request timeout as Duration.
#[must_use]
pub const fn request_timeout() -> Duration {
    Duration::from_secs(REQUEST_TIMEOUT_SECS)
}

/// Environment variable names for gateway credentials.
///
/// Read once during configuration resolution, never re-read at runtime.
pub mod env {
    /// Push gateway base URL.
    pub const GATEWAY_URL: &str = "RELAY_GATEWAY_URL";
    /// Gateway project identifier.
    pub const PROJECT_ID: &str = "RELAY_PROJECT_ID";
    /// Gateway project secret.
    pub const PROJECT_SECRET: &str = "RELAY_PROJECT_SECRET";
    /// Notification-type label.
    pub const NOTIFICATION_TYPE: &str = "RELAY_NOTIFICATION_TYPE";
}
