//! Validated configuration after merging CLI, TOML, and environment
//! sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use handlebars::Handlebars;
use http::HeaderValue;
use url::Url;

use crate::gateway::wait_time_for_rate;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Gateway credentials read from the process environment.
///
/// Captured once during configuration resolution so the merge logic is
/// testable without mutating real environment variables.
#[derive(Debug, Default)]
pub struct EnvConfig {
    /// Gateway base URL from [`defaults::env::GATEWAY_URL`]
    pub gateway_url: Option<String>,
    /// Project identifier from [`defaults::env::PROJECT_ID`]
    pub project_id: Option<String>,
    /// Project secret from [`defaults::env::PROJECT_SECRET`]
    pub project_secret: Option<String>,
    /// Notification-type label from [`defaults::env::NOTIFICATION_TYPE`]
    pub notification_type: Option<String>,
}

impl EnvConfig {
    /// Reads gateway credentials from the process environment.
    #[must_use]
    pub fn from_process_env() -> Self {
        Self {
            gateway_url: std::env::var(defaults::env::GATEWAY_URL).ok(),
            project_id: std::env::var(defaults::env::PROJECT_ID).ok(),
            project_secret: std::env::var(defaults::env::PROJECT_SECRET).ok(),
            notification_type: std::env::var(defaults::env::NOTIFICATION_TYPE).ok(),
        }
    }
}

/// Fully validated configuration ready for use by the application.
///
/// This struct represents a complete, validated configuration where all
/// required fields are present and all values have been validated. It
/// is constructed once at startup and passed by reference; nothing
/// re-reads the environment after that.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args, optional
/// TOML config, and captured environment values. The function validates
/// all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Push gateway base URL (required, must be a base URL)
    pub gateway_url: Url,

    /// Gateway project identifier (required)
    pub project_id: String,

    /// Pre-built bearer Authorization header for the project secret
    pub auth_header: HeaderValue,

    /// Notification-type label attached to every push message
    pub notification_type: String,

    /// Maximum accounts per notify request
    pub max_accounts_per_request: usize,

    /// Pause between consecutive notify batches
    pub wait_time: Duration,

    /// Timeout for outbound requests
    pub request_timeout: Duration,

    /// Handlebars body template override (optional)
    pub body_template: Option<String>,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ gateway: {}, project: {}, type: {}, max_accounts: {}, \
             wait: {}ms, timeout: {}s, body_template: {} }}",
            self.gateway_url,
            self.project_id,
            self.notification_type,
            self.max_accounts_per_request,
            self.wait_time.as_millis(),
            self.request_timeout.as_secs(),
            if self.body_template.is_some() {
                "custom"
            } else {
                "default"
            },
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments, optional
    /// TOML config, and captured environment values.
    ///
    /// CLI arguments take precedence over TOML values, which take
    /// precedence over the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required gateway fields are missing (`url`, `project_id`,
    ///   `project_secret`)
    /// - The gateway URL is invalid or not a base URL
    /// - A rate-limit or timeout value is out of range
    /// - The project secret is not a valid header value
    /// - The body template has invalid Handlebars syntax
    pub fn from_raw(
        cli: &Cli,
        toml: Option<&TomlConfig>,
        env: &EnvConfig,
    ) -> Result<Self, ConfigError> {
        let gateway_url = Self::resolve_gateway_url(cli, toml, env)?;
        let project_id = Self::resolve_project_id(cli, toml, env)?;
        let auth_header = Self::resolve_auth_header(cli, toml, env)?;
        let notification_type = Self::resolve_notification_type(cli, toml, env);
        let max_accounts_per_request = Self::resolve_max_accounts(cli, toml)?;
        let wait_time = Self::resolve_wait_time(cli, toml)?;
        let request_timeout = Self::resolve_request_timeout(cli, toml)?;
        let body_template = Self::resolve_body_template(cli, toml)?;

        Ok(Self {
            gateway_url,
            project_id,
            auth_header,
            notification_type,
            max_accounts_per_request,
            wait_time,
            request_timeout,
            body_template,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI, optional config file,
    /// and the process environment.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref(), &EnvConfig::from_process_env())
    }

    fn resolve_gateway_url(
        cli: &Cli,
        toml: Option<&TomlConfig>,
        env: &EnvConfig,
    ) -> Result<Url, ConfigError> {
        let url_str = cli
            .gateway_url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.gateway.url.as_deref()))
            .or_else(|| env.gateway_url.as_deref())
            .ok_or_else(|| {
                ConfigError::missing(
                    field::GATEWAY_URL,
                    "Use --gateway-url, set gateway.url in the config file, \
                     or set RELAY_GATEWAY_URL",
                )
            })?;

        let url = Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })?;

        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl {
                url: url_str.to_string(),
                reason: "must be a base URL".to_string(),
            });
        }

        Ok(url)
    }

    fn resolve_project_id(
        cli: &Cli,
        toml: Option<&TomlConfig>,
        env: &EnvConfig,
    ) -> Result<String, ConfigError> {
        cli.project_id
            .as_deref()
            .or_else(|| toml.and_then(|t| t.gateway.project_id.as_deref()))
            .or_else(|| env.project_id.as_deref())
            .map(ToString::to_string)
            .ok_or_else(|| {
                ConfigError::missing(
                    field::PROJECT_ID,
                    "Use --project-id, set gateway.project_id in the config file, \
                     or set RELAY_PROJECT_ID",
                )
            })
    }

    fn resolve_auth_header(
        cli: &Cli,
        toml: Option<&TomlConfig>,
        env: &EnvConfig,
    ) -> Result<HeaderValue, ConfigError> {
        let secret = cli
            .project_secret
            .as_deref()
            .or_else(|| toml.and_then(|t| t.gateway.project_secret.as_deref()))
            .or_else(|| env.project_secret.as_deref())
            .ok_or_else(|| {
                ConfigError::missing(
                    field::PROJECT_SECRET,
                    "Use --project-secret, set gateway.project_secret in the \
                     config file, or set RELAY_PROJECT_SECRET",
                )
            })?;

        let mut value = HeaderValue::from_str(&format!("Bearer {secret}")).map_err(|e| {
            ConfigError::InvalidSecret {
                reason: e.to_string(),
            }
        })?;
        value.set_sensitive(true);

        Ok(value)
    }

    fn resolve_notification_type(cli: &Cli, toml: Option<&TomlConfig>, env: &EnvConfig) -> String {
        cli.notification_type
            .as_deref()
            .or_else(|| toml.and_then(|t| t.gateway.notification_type.as_deref()))
            .or_else(|| env.notification_type.as_deref())
            .unwrap_or(defaults::NOTIFICATION_TYPE)
            .to_string()
    }

    fn resolve_max_accounts(cli: &Cli, toml: Option<&TomlConfig>) -> Result<usize, ConfigError> {
        let max = cli
            .max_accounts
            .or_else(|| toml.and_then(|t| t.limits.max_accounts_per_request))
            .unwrap_or(defaults::MAX_ACCOUNTS_PER_REQUEST);

        if max == 0 {
            return Err(ConfigError::InvalidLimit {
                field: "max_accounts_per_request",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(max)
    }

    fn resolve_wait_time(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        let requests_per_second = cli
            .requests_per_second
            .or_else(|| toml.and_then(|t| t.limits.requests_per_second))
            .unwrap_or(defaults::PER_SECOND_RATE_LIMIT);

        let margin = cli
            .wait_error_margin
            .or_else(|| toml.and_then(|t| t.limits.wait_error_margin))
            .unwrap_or(defaults::WAIT_ERROR_MARGIN_SECS);

        if !requests_per_second.is_finite() || requests_per_second <= 0.0 {
            return Err(ConfigError::InvalidLimit {
                field: "requests_per_second",
                reason: "must be a positive finite number".to_string(),
            });
        }

        if !margin.is_finite() || margin < 0.0 {
            return Err(ConfigError::InvalidLimit {
                field: "wait_error_margin",
                reason: "must be a non-negative finite number".to_string(),
            });
        }

        Ok(wait_time_for_rate(requests_per_second, margin))
    }

    fn resolve_request_timeout(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Duration, ConfigError> {
        let seconds = cli
            .request_timeout
            .or_else(|| toml.and_then(|t| t.limits.request_timeout))
            .unwrap_or(defaults::REQUEST_TIMEOUT_SECS);

        if seconds == 0 {
            return Err(ConfigError::InvalidLimit {
                field: "request_timeout",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_secs(seconds))
    }

    fn resolve_body_template(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<String>, ConfigError> {
        let template = cli
            .body_template
            .clone()
            .or_else(|| toml.and_then(|t| t.notification.body_template.clone()));

        // Validate Handlebars syntax if a template is provided
        if let Some(ref tmpl) = template {
            Self::validate_template(tmpl)?;
        }

        Ok(template)
    }

    fn validate_template(template: &str) -> Result<(), ConfigError> {
        let hbs = Handlebars::new();
        // Compile-check only; render with empty context to validate syntax
        hbs.render_template(template, &serde_json::json!({}))
            .map_err(|e| ConfigError::InvalidTemplate {
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
