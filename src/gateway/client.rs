//! Gateway API client for the subscriber directory and notify endpoint.

use http::HeaderValue;
use http::header::AUTHORIZATION;
use serde::Serialize;
use url::Url;

use crate::metrics::{OutgoingTimer, provider};
use crate::net::{HttpClient, HttpRequest};

use super::GatewayError;

/// Client for the push-notification gateway's project-scoped API.
///
/// Both endpoints live under `{base}/{project_id}/` and require bearer
/// authentication with the project secret. The configuration layer
/// validates the base URL and pre-builds the authorization header, so
/// this client only assembles endpoints and payloads.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
#[derive(Debug)]
pub struct NotifyGateway<H> {
    client: H,
    base_url: Url,
    project_id: String,
    auth_header: HeaderValue,
}

/// Request body for the batched notify endpoint.
#[derive(Serialize)]
struct NotifyPayload<'a, N> {
    accounts: &'a [String],
    notification: &'a N,
}

impl<H> NotifyGateway<H> {
    /// Creates a gateway client.
    ///
    /// `base_url` must be a base URL (validated by the configuration
    /// layer); `auth_header` is the pre-built `Bearer` value for the
    /// project secret.
    #[must_use]
    pub const fn new(
        client: H,
        base_url: Url,
        project_id: String,
        auth_header: HeaderValue,
    ) -> Self {
        Self {
            client,
            base_url,
            project_id,
            auth_header,
        }
    }

    /// Builds `{base}/{project_id}/{leaf}`.
    fn endpoint(&self, leaf: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&self.project_id).push(leaf);
        }
        url
    }
}

impl<H: HttpClient> NotifyGateway<H> {
    /// Fetches the full subscriber directory.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] when the request fails, the gateway
    /// responds with a non-2xx status, or the body is not a JSON string
    /// array. The caller treats any of these as an empty directory.
    pub async fn fetch_subscribers(&self) -> Result<Vec<String>, GatewayError> {
        let request = HttpRequest::get(self.endpoint("subscribers"))
            .with_header(AUTHORIZATION, self.auth_header.clone());

        let response = self.client.request(request).await?;
        if !response.is_success() {
            return Err(GatewayError::Status {
                status: response.status,
                body: response.body_text().map(ToString::to_string),
            });
        }

        Ok(response.json()?)
    }

    /// Sends one notification to a batch of external-form accounts.
    ///
    /// The attempt is timed against the `gateway` provider metric on
    /// every exit path, including acknowledgment-decode failures.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] when the request fails, the gateway
    /// responds with a non-2xx status, or the acknowledgment body does
    /// not decode. The batch is not retried.
    pub async fn send_notification<N: Serialize + Sync>(
        &self,
        notification: &N,
        accounts: &[String],
    ) -> Result<serde_json::Value, GatewayError> {
        let payload = NotifyPayload {
            accounts,
            notification,
        };
        let request = HttpRequest::post(self.endpoint("notify"))
            .with_header(AUTHORIZATION, self.auth_header.clone())
            .with_json(&payload)?;

        let timer = OutgoingTimer::start(provider::GATEWAY);
        let result = self.execute_notify(request).await;
        timer.finish(result.is_ok());

        result
    }

    /// Executes the single notify attempt through to a decoded
    /// acknowledgment.
    async fn execute_notify(
        &self,
        request: HttpRequest,
    ) -> Result<serde_json::Value, GatewayError> {
        let response = self.client.request(request).await?;

        if !response.is_success() {
            return Err(GatewayError::Status {
                status: response.status,
                body: response.body_text().map(ToString::to_string),
            });
        }

        Ok(response.json()?)
    }
}
