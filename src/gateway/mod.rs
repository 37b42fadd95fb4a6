//! Push-notification gateway integration.
//!
//! This module provides:
//! - The gateway API client ([`NotifyGateway`]) for the subscriber
//!   directory and the batched notify endpoint
//! - Identity cross-referencing from internal recipient identifiers to
//!   the gateway's chain-namespaced form ([`Directory`])
//! - Batch slicing and rate-limit pacing ([`Batcher`])

mod batch;
mod client;
mod directory;
mod error;


pub use batch::{BatchOutcome, Batcher, wait_time_for_rate};
pub use client::NotifyGateway;
pub use directory::Directory;
pub use error::GatewayError;
