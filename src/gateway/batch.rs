//! Batch slicing and rate-limit pacing for gateway sends.

use std::time::Duration;

use crate::time::{Sleeper, TokioSleeper};

/// Computes the inter-chunk pause for a gateway request quota.
///
/// The pause is `1 / requests_per_second` plus a safety margin, so the
/// observed request rate stays below the quota even with scheduling
/// jitter.
///
/// # Panics
///
/// Panics if the resulting duration is negative or not finite; the
/// configuration layer validates both inputs before this is called.
#[must_use]
pub fn wait_time_for_rate(requests_per_second: f64, error_margin_secs: f64) -> Duration {
    Duration::from_secs_f64(1.0 / requests_per_second + error_margin_secs)
}

/// Outcome of one batched delivery pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Number of chunks attempted.
    pub chunks: usize,
    /// Number of chunks whose send failed.
    pub failed: usize,
}

impl BatchOutcome {
    /// Number of chunks delivered successfully.
    #[must_use]
    pub const fn delivered(&self) -> usize {
        self.chunks - self.failed
    }
}

/// Slices recipients into bounded chunks and paces their delivery.
///
/// The gateway enforces a global requests-per-second quota and a
/// maximum number of accounts per request. Chunks are sent strictly
/// sequentially with a pause between consecutive sends; the pause after
/// the final chunk is skipped. A chunk's failure never halts the chunks
/// behind it.
///
/// # Type Parameters
///
/// - `S`: The sleeper implementation for inter-chunk pauses (defaults
///   to [`TokioSleeper`])
#[derive(Debug)]
pub struct Batcher<S = TokioSleeper> {
    max_accounts_per_request: usize,
    wait_time: Duration,
    sleeper: S,
}

impl Batcher<TokioSleeper> {
    /// Default maximum accounts per notify request.
    pub const DEFAULT_MAX_ACCOUNTS_PER_REQUEST: usize = 500;

    /// Default inter-chunk pause: 2 requests per second plus a 0.25s
    /// safety margin.
    pub const DEFAULT_WAIT_TIME: Duration = Duration::from_millis(750);

    /// Creates a batcher with the default gateway quota settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_accounts_per_request: Self::DEFAULT_MAX_ACCOUNTS_PER_REQUEST,
            wait_time: Self::DEFAULT_WAIT_TIME,
            sleeper: TokioSleeper,
        }
    }
}

impl Default for Batcher<TokioSleeper> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Batcher<S> {
    /// Sets the maximum number of accounts per chunk.
    ///
    /// # Panics
    ///
    /// Panics if `max` is zero.
    #[must_use]
    pub const fn with_max_accounts_per_request(mut self, max: usize) -> Self {
        assert!(max >= 1, "max accounts per request must be at least 1");
        self.max_accounts_per_request = max;
        self
    }

    /// Sets the pause between consecutive chunk sends.
    #[must_use]
    pub const fn with_wait_time(mut self, wait_time: Duration) -> Self {
        self.wait_time = wait_time;
        self
    }

    /// Sets a custom sleeper for inter-chunk pauses.
    ///
    /// This is primarily useful for testing to avoid actual delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> Batcher<S2> {
        Batcher {
            max_accounts_per_request: self.max_accounts_per_request,
            wait_time: self.wait_time,
            sleeper,
        }
    }

    /// Returns the configured chunk size limit.
    #[must_use]
    pub const fn max_accounts_per_request(&self) -> usize {
        self.max_accounts_per_request
    }

    /// Returns the configured inter-chunk pause.
    #[must_use]
    pub const fn wait_time(&self) -> Duration {
        self.wait_time
    }
}

impl<S: Sleeper> Batcher<S> {
    /// Sends every account through `send_chunk` in bounded, paced,
    /// strictly sequential chunks.
    ///
    /// Each chunk is an independent best-effort send: a failure is
    /// counted in the outcome and the remaining chunks still go out.
    /// An empty account list produces no sends and no pauses.
    pub async fn run<F, Fut, E>(&self, accounts: &[String], mut send_chunk: F) -> BatchOutcome
    where
        F: FnMut(Vec<String>) -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        let mut outcome = BatchOutcome::default();
        let mut chunks = accounts.chunks(self.max_accounts_per_request).peekable();

        while let Some(chunk) = chunks.next() {
            outcome.chunks += 1;
            if send_chunk(chunk.to_vec()).await.is_err() {
                outcome.failed += 1;
            }

            // The quota is global to the gateway, so the next chunk may
            // only start after the pause. Nothing follows the last
            // chunk, so its pause is skipped.
            if chunks.peek().is_some() {
                self.sleeper.sleep(self.wait_time).await;
            }
        }

        outcome
    }
}
