//! One-shot event delivery to webhook subscribers.

use url::Url;

use crate::event::Event;
use crate::metrics::{OutgoingTimer, provider};
use crate::net::{HttpClient, HttpRequest};

use super::WebhookError;

/// Outcome of a successful webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// The destination the event was delivered to.
    pub url: Url,
    /// The 2xx status the destination responded with.
    pub status: http::StatusCode,
}

/// Delivers raw event JSON to owner-registered webhook URLs.
///
/// Each delivery is a single POST with no authentication and no
/// retries; the subscriber sees exactly the event the pipeline
/// received. Destinations are validated before any network activity,
/// and every attempt is timed against the `webhook` provider metric.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
///
/// # Example
///
/// ```no_run
/// use notify_relay::event::{Event, EventKind};
/// use notify_relay::net::ReqwestClient;
/// use notify_relay::webhook::EventWebhook;
///
/// # async fn example() {
/// let webhook = EventWebhook::new(ReqwestClient::new());
/// let event = Event {
///     id: "subject/0xabc".to_string(),
///     kind: EventKind::SubjectStart,
///     subject_id: "demo.group".to_string(),
///     expire: 1_700_000_000,
/// };
/// match webhook.send(&event, "https://hooks.example.com/inbox").await {
///     Ok(receipt) => println!("delivered to {}", receipt.url),
///     Err(e) => println!("delivery failed: {e}"),
/// }
/// # }
/// ```
#[derive(Debug)]
pub struct EventWebhook<H> {
    client: H,
}

impl<H> EventWebhook<H> {
    /// Creates a new webhook sender over the given HTTP client.
    #[must_use]
    pub const fn new(client: H) -> Self {
        Self { client }
    }
}

impl<H: HttpClient> EventWebhook<H> {
    /// Delivers the event to the given destination URL.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::InvalidUrl`] without touching the
    /// network when `url` is malformed. Otherwise performs exactly one
    /// request and returns [`WebhookError::Http`] or
    /// [`WebhookError::NonSuccessStatus`] when it fails.
    pub async fn send(&self, event: &Event, url: &str) -> Result<DeliveryReceipt, WebhookError> {
        let url = Url::parse(url).map_err(|e| WebhookError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let request = HttpRequest::post(url.clone()).with_json(event)?;

        let timer = OutgoingTimer::start(provider::WEBHOOK);
        let result = self.execute(request).await;
        timer.finish(result.is_ok());

        result.map(|status| DeliveryReceipt { url, status })
    }

    /// Executes the single delivery attempt.
    async fn execute(&self, request: HttpRequest) -> Result<http::StatusCode, WebhookError> {
        let response = self.client.request(request).await?;

        if response.is_success() {
            return Ok(response.status);
        }

        Err(WebhookError::NonSuccessStatus {
            status: response.status,
            body: response.body_text().map(ToString::to_string),
        })
    }
}
