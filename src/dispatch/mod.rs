//! The orchestrating entry point of the notification pipeline.
//!
//! This module provides:
//! - The per-event pipeline driver ([`Dispatcher`])
//! - The aggregate delivery report ([`DispatchReport`], [`SkipReason`])
//! - Notification formatting ([`MessageFormat`], [`NotificationMessage`])

mod message;

#[cfg(test)]
mod dispatch_tests;

pub use message::{DEFAULT_BODY_TEMPLATE, MessageFormat, NotificationMessage};

use crate::capture::{ErrorCapture, TracingCapture, scope};
use crate::event::{Event, Subject};
use crate::gateway::{Batcher, Directory, NotifyGateway};
use crate::net::HttpClient;
use crate::time::{Sleeper, TokioSleeper};

/// Why a dispatch produced no notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The event kind is not the entry-creation kind.
    NotSubjectStart,
    /// The subject carries no owning group identity.
    NoOwningGroup,
}

/// Aggregate outcome of one dispatch.
///
/// The dispatch itself never fails; downstream failures are captured
/// and summarized here. A report with `skipped` set means the pipeline
/// terminated before any outbound call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Set when the pipeline terminated without notifying.
    pub skipped: Option<SkipReason>,
    /// Recipients resolved to an external form.
    pub resolved: usize,
    /// Notification batches attempted.
    pub batches: usize,
    /// Notification batches whose send failed.
    pub failed_batches: usize,
}

impl DispatchReport {
    /// Report for a dispatch that terminated before notifying.
    #[must_use]
    pub const fn skipped(reason: SkipReason) -> Self {
        Self {
            skipped: Some(reason),
            resolved: 0,
            batches: 0,
            failed_batches: 0,
        }
    }

    /// Number of batches delivered successfully.
    #[must_use]
    pub const fn delivered_batches(&self) -> usize {
        self.batches - self.failed_batches
    }
}

/// Drives one event through cross-referencing, formatting, and batched
/// delivery.
///
/// Stateless across calls: every dispatch re-fetches the subscriber
/// directory and carries no memory of earlier events. Failures in the
/// directory fetch or in individual batch sends are reported to the
/// [`ErrorCapture`] sink and absorbed; the triggering event's own
/// processing is never blocked by delivery problems.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
/// - `S`: The sleeper used for batch pacing (defaults to [`TokioSleeper`])
/// - `C`: The error-capture sink (defaults to [`TracingCapture`])
#[derive(Debug)]
pub struct Dispatcher<H, S = TokioSleeper, C = TracingCapture> {
    gateway: NotifyGateway<H>,
    batcher: Batcher<S>,
    format: MessageFormat,
    capture: C,
}

impl<H> Dispatcher<H, TokioSleeper, TracingCapture> {
    /// Creates a dispatcher with the default sleeper and capture sink.
    #[must_use]
    pub const fn new(
        gateway: NotifyGateway<H>,
        batcher: Batcher<TokioSleeper>,
        format: MessageFormat,
    ) -> Self {
        Self {
            gateway,
            batcher,
            format,
            capture: TracingCapture,
        }
    }
}

impl<H, S, C> Dispatcher<H, S, C> {
    /// Replaces the batcher, switching its sleeper implementation.
    ///
    /// This is primarily useful for testing to avoid pacing delays.
    #[must_use]
    pub fn with_batcher<S2>(self, batcher: Batcher<S2>) -> Dispatcher<H, S2, C> {
        Dispatcher {
            gateway: self.gateway,
            batcher,
            format: self.format,
            capture: self.capture,
        }
    }

    /// Replaces the error-capture sink.
    #[must_use]
    pub fn with_capture<C2>(self, capture: C2) -> Dispatcher<H, S, C2> {
        Dispatcher {
            gateway: self.gateway,
            batcher: self.batcher,
            format: self.format,
            capture,
        }
    }
}

impl<H: HttpClient, S: Sleeper, C: ErrorCapture> Dispatcher<H, S, C> {
    /// Runs the pipeline for one event.
    ///
    /// Always completes: skip conditions and downstream failures are
    /// reflected in the returned report, never raised to the caller.
    pub async fn dispatch(
        &self,
        event: &Event,
        subject: &Subject,
        recipients: &[String],
    ) -> DispatchReport {
        if !event.kind.is_subject_start() {
            tracing::debug!("Ignoring event {} with kind {}", event.id, event.kind);
            return DispatchReport::skipped(SkipReason::NotSubjectStart);
        }

        let Some(group) = subject.owning_group() else {
            tracing::debug!("Subject {} has no owning group, nothing to notify", subject.id);
            return DispatchReport::skipped(SkipReason::NoOwningGroup);
        };

        tracing::info!(
            "Dispatching event {} for group {group} to {} recipient(s)",
            event.id,
            recipients.len(),
        );

        let resolved = self.cross_reference(recipients).await;
        if resolved.is_empty() {
            tracing::debug!("No recipients resolved for event {}", event.id);
            return DispatchReport::default();
        }

        let message = self.format.format(subject);
        let outcome = self
            .batcher
            .run(&resolved, |accounts| {
                let gateway = &self.gateway;
                let capture = &self.capture;
                let message = &message;
                async move {
                    match gateway.send_notification(message, &accounts).await {
                        Ok(_ack) => {
                            tracing::debug!("Notified batch of {} account(s)", accounts.len());
                            Ok(())
                        }
                        Err(e) => {
                            tracing::warn!("Notification batch failed: {e}");
                            capture.capture(scope::GATEWAY_NOTIFY, &e);
                            Err(e)
                        }
                    }
                }
            })
            .await;

        DispatchReport {
            skipped: None,
            resolved: resolved.len(),
            batches: outcome.chunks,
            failed_batches: outcome.failed,
        }
    }

    /// Resolves internal recipients against a fresh directory fetch.
    ///
    /// A failed fetch degrades to an empty directory: the dispatch
    /// notifies nobody rather than failing.
    async fn cross_reference(&self, recipients: &[String]) -> Vec<String> {
        let entries = match self.gateway.fetch_subscribers().await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Failed to fetch subscriber directory: {e}");
                self.capture.capture(scope::SUBSCRIBER_DIRECTORY, &e);
                Vec::new()
            }
        };

        Directory::from_entries(entries).resolve(recipients)
    }
}
