//! Sleep abstraction for testability.
//!
//! This module provides a [`Sleeper`] trait that allows injecting mock
//! sleepers in tests while using real tokio delays in production. The
//! batch pacer depends on it so pacing tests run instantly.

use std::time::Duration;

/// Abstraction over asynchronous delays.
///
/// Implementations suspend the current task for the given duration,
/// allowing tests to replace real waits with instant or recording
/// substitutes.
///
/// # Example
///
/// ```
/// use notify_relay::time::{InstantSleeper, Sleeper};
/// use std::time::Duration;
///
/// # async fn example() {
/// let sleeper = InstantSleeper;
/// sleeper.sleep(Duration::from_secs(60)).await; // returns immediately
/// # }
/// ```
pub trait Sleeper: Send + Sync {
    /// Suspends the current task for the given duration.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}

/// Production sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sleeper that completes immediately regardless of duration.
///
/// Intended for tests that exercise pacing logic without real delays.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantSleeper;

impl Sleeper for InstantSleeper {
    async fn sleep(&self, _duration: Duration) {}
}
