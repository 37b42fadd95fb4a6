//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// notify-relay: Event Notification Fan-Out
///
/// Relays entry-creation events to owner-registered webhooks and a
/// rate-limited push-notification gateway.
#[derive(Debug, Parser)]
#[command(name = "notify-relay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Push gateway base URL (required for send mode)
    #[arg(long = "gateway-url", global = true)]
    pub gateway_url: Option<String>,

    /// Gateway project identifier (required for send mode)
    #[arg(long = "project-id", global = true)]
    pub project_id: Option<String>,

    /// Gateway project secret (prefer the RELAY_PROJECT_SECRET
    /// environment variable over this flag)
    #[arg(long = "project-secret", global = true)]
    pub project_secret: Option<String>,

    /// Notification-type label attached to every push message
    #[arg(long = "notification-type", global = true)]
    pub notification_type: Option<String>,

    /// Maximum accounts per notify request
    #[arg(long = "max-accounts")]
    pub max_accounts: Option<usize>,

    /// Gateway request quota in requests per second
    #[arg(long = "requests-per-second")]
    pub requests_per_second: Option<f64>,

    /// Safety margin added to the inter-batch pause, in seconds
    #[arg(long = "wait-margin")]
    pub wait_error_margin: Option<f64>,

    /// Timeout for outbound requests in seconds
    #[arg(long = "request-timeout")]
    pub request_timeout: Option<u64>,

    /// Handlebars template for the notification body
    #[arg(long = "body-template")]
    pub body_template: Option<String>,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for notify-relay
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "notify-relay.toml")]
        output: PathBuf,
    },

    /// Deliver a sample event to a webhook URL
    Test {
        /// Destination webhook URL
        #[arg(long)]
        url: String,
    },

    /// Run the notification pipeline for a dispatch request file
    Send {
        /// Path to a JSON file with the event, subject, and recipients
        #[arg(long, value_name = "FILE")]
        request: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}
