//! Delivery client for owner-registered webhook URLs.
//!
//! This module provides:
//! - One-shot event delivery to a caller-supplied URL ([`EventWebhook`])
//! - Per-delivery outcome reporting ([`DeliveryReceipt`])
//! - Error taxonomy distinguishing invalid input from network failure
//!   ([`WebhookError`])

mod error;
mod sender;


pub use error::WebhookError;
pub use sender::{DeliveryReceipt, EventWebhook};
