//! Application execution logic.
//!
//! This module assembles the delivery pipeline from the validated
//! configuration and drives the `test` and `send` subcommands.

use std::path::{Path, PathBuf};

use thiserror::Error;

use notify_relay::config::ValidatedConfig;
use notify_relay::dispatch::{DispatchReport, Dispatcher, MessageFormat};
use notify_relay::event::{DispatchRequest, Event, EventKind};
use notify_relay::gateway::{Batcher, NotifyGateway};
use notify_relay::net::ReqwestClient;
use notify_relay::metrics;
use notify_relay::webhook::{EventWebhook, WebhookError};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to build the HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// Failed to read the dispatch request file.
    #[error("Failed to read dispatch request '{}': {source}", path.display())]
    RequestRead {
        /// Path to the request file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the dispatch request file.
    #[error("Failed to parse dispatch request '{}': {source}", path.display())]
    RequestParse {
        /// Path to the request file
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Test webhook delivery failed.
    #[error("Webhook delivery failed: {0}")]
    Webhook(#[from] WebhookError),
}

/// The operation requested on the command line.
#[derive(Debug, Clone, Copy)]
pub enum Task<'a> {
    /// Deliver a sample event to a webhook URL.
    Test {
        /// Destination webhook URL
        url: &'a str,
    },
    /// Run the notification pipeline for a dispatch request file.
    Send {
        /// Path to the JSON request file
        request: &'a Path,
    },
}

/// Executes the requested task against the validated configuration.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built, the request
/// file is unreadable, or a test webhook delivery fails. Dispatch
/// itself never fails; its outcome is logged from the report.
pub async fn execute(config: ValidatedConfig, task: Task<'_>) -> Result<(), RunError> {
    if let Err(e) = metrics::init() {
        tracing::warn!("Metrics registration failed: {e}");
    }

    let client = build_http_client(&config)?;

    match task {
        Task::Test { url } => run_test(client, url).await,
        Task::Send { request } => run_send(&config, client, request).await,
    }
}

/// Builds the production HTTP client with the configured timeout.
fn build_http_client(config: &ValidatedConfig) -> Result<ReqwestClient, RunError> {
    let inner = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .map_err(RunError::HttpClient)?;

    Ok(ReqwestClient::from_client(inner))
}

/// Delivers a fixed sample event to the given URL.
async fn run_test(client: ReqwestClient, url: &str) -> Result<(), RunError> {
    let webhook = EventWebhook::new(client);
    let event = sample_event();

    let receipt = webhook.send(&event, url).await?;
    tracing::info!("Delivered test event to {} ({})", receipt.url, receipt.status);

    Ok(())
}

/// Runs the full notification pipeline for a request file.
async fn run_send(
    config: &ValidatedConfig,
    client: ReqwestClient,
    path: &Path,
) -> Result<(), RunError> {
    let request = load_request(path)?;
    let dispatcher = build_dispatcher(config, client);

    let report = dispatcher
        .dispatch(&request.event, &request.subject, &request.recipients)
        .await;
    log_report(&report);

    if config.verbose {
        match metrics::gather() {
            Ok(rendered) => tracing::debug!("Delivery metrics:\n{rendered}"),
            Err(e) => tracing::warn!("Failed to gather metrics: {e}"),
        }
    }

    Ok(())
}

/// Assembles the dispatcher from validated configuration.
fn build_dispatcher(config: &ValidatedConfig, client: ReqwestClient) -> Dispatcher<ReqwestClient> {
    let gateway = NotifyGateway::new(
        client,
        config.gateway_url.clone(),
        config.project_id.clone(),
        config.auth_header.clone(),
    );

    let batcher = Batcher::new()
        .with_max_accounts_per_request(config.max_accounts_per_request)
        .with_wait_time(config.wait_time);

    let mut format = MessageFormat::new(config.notification_type.clone());
    if let Some(ref template) = config.body_template {
        format = format.with_body_template(template);
    }

    Dispatcher::new(gateway, batcher, format)
}

/// Loads and parses a dispatch request file.
fn load_request(path: &Path) -> Result<DispatchRequest, RunError> {
    let content = std::fs::read_to_string(path).map_err(|e| RunError::RequestRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| RunError::RequestParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Logs the aggregate outcome of a dispatch.
fn log_report(report: &DispatchReport) {
    if let Some(reason) = report.skipped {
        tracing::info!("Dispatch skipped: {reason:?}");
        return;
    }

    tracing::info!(
        "Dispatch complete: {} resolved, {}/{} batch(es) delivered",
        report.resolved,
        report.delivered_batches(),
        report.batches,
    );
    if report.failed_batches > 0 {
        tracing::warn!("{} batch(es) failed to deliver", report.failed_batches);
    }
}

/// Fixed sample event used by the `test` subcommand.
fn sample_event() -> Event {
    Event {
        id: "subject/0x38c654c0f81b63ea1839ec3b221fad6ecba474aa0c4e8b4e8bc957f70100e753"
            .to_string(),
        kind: EventKind::SubjectStart,
        subject_id: "demo.group".to_string(),
        expire: 1_647_343_155,
    }
}
