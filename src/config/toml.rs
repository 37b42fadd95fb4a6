//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments and environment fallbacks.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Push gateway configuration section
    #[serde(default)]
    pub gateway: GatewaySection,

    /// Rate-limit and timeout configuration
    #[serde(default)]
    pub limits: LimitsSection,

    /// Notification formatting configuration
    #[serde(default)]
    pub notification: NotificationSection,
}

/// Push gateway configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    /// Gateway base URL
    pub url: Option<String>,

    /// Project identifier (path segment on every gateway call)
    pub project_id: Option<String>,

    /// Project secret for bearer authentication
    pub project_secret: Option<String>,

    /// Notification-type label attached to every push message
    pub notification_type: Option<String>,
}

/// Rate-limit and timeout configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsSection {
    /// Maximum accounts per notify request
    pub max_accounts_per_request: Option<usize>,

    /// Gateway request quota in requests per second
    pub requests_per_second: Option<f64>,

    /// Safety margin added to the inter-batch pause, in seconds
    pub wait_error_margin: Option<f64>,

    /// Timeout for outbound requests in seconds
    pub request_timeout: Option<u64>,
}

/// Notification formatting configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationSection {
    /// Handlebars template for the notification body
    pub body_template: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# notify-relay Configuration File

[gateway]
# Push gateway base URL (required)
# url = "https://notify.example.com"

# Project identifier, used as a path segment on every gateway call (required)
# project_id = "your-project-id"

# Project secret for bearer authentication (required)
# Prefer the RELAY_PROJECT_SECRET environment variable over this file
# project_secret = "your-project-secret"

# Notification-type label attached to every push message (default: entry_created)
# notification_type = "entry_created"

[limits]
# Maximum accounts per notify request (default: 500)
max_accounts_per_request = 500

# Gateway request quota in requests per second (default: 2.0)
requests_per_second = 2.0

# Safety margin added to the inter-batch pause, in seconds (default: 0.25)
wait_error_margin = 0.25

# Timeout for outbound requests in seconds (default: 30)
request_timeout = 30

[notification]
# Handlebars template for the notification body
# Available variables: {{group}}, {{title}}
# body_template = "🟢 New entry from @{{group}}\n\n"
"#
    .to_string()
}
