//! Error types for gateway operations.

use thiserror::Error;

use crate::net::HttpError;

/// Error type for calls against the push-notification gateway.
///
/// All variants are external-dependency failures: the dispatcher
/// captures them and degrades (empty directory, undelivered batch)
/// instead of failing the dispatch.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The network request failed.
    #[error("Gateway request failed: {0}")]
    Transport(#[from] HttpError),

    /// The gateway responded with a non-2xx status.
    #[error("Gateway returned {status}: {}", body.as_deref().unwrap_or("<no body>"))]
    Status {
        /// The response status code
        status: http::StatusCode,
        /// Response body, if readable as text
        body: Option<String>,
    },

    /// The response body could not be decoded.
    #[error("Failed to decode gateway response: {0}")]
    Decode(#[from] serde_json::Error),
}
