//! Error types for webhook delivery.

use thiserror::Error;

use crate::net::HttpError;

/// Error type for a single webhook delivery.
///
/// [`WebhookError::InvalidUrl`] is caller input rejected before any
/// network activity; the remaining variants describe a failed attempt
/// against a well-formed destination.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The destination URL does not parse as an absolute URL.
    ///
    /// Surfaced synchronously to the caller; never reported to the
    /// error-capture sink.
    #[error("Invalid webhook URL '{url}': {reason}")]
    InvalidUrl {
        /// The rejected URL string
        url: String,
        /// Reason for rejection
        reason: String,
    },

    /// The event payload could not be encoded.
    #[error("Failed to encode event payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// The network request failed.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The destination responded with a non-2xx status.
    #[error("Webhook endpoint returned {status}: {}", body.as_deref().unwrap_or("<no body>"))]
    NonSuccessStatus {
        /// The response status code
        status: http::StatusCode,
        /// Response body, if readable as text
        body: Option<String>,
    },
}

impl WebhookError {
    /// Returns true when the error is the tagged invalid-URL case.
    #[must_use]
    pub const fn is_invalid_url(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl { .. } | Self::Http(HttpError::InvalidUrl(_))
        )
    }
}
