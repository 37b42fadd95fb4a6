//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
///
/// Covers errors from parsing, validation, and file operations. These
/// are the only errors surfaced to the operator as process-exit
/// failures, and only at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write configuration file (for init command).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Missing required field that must be provided by CLI, config
    /// file, or environment.
    #[error("Missing required field: {field}. {hint}")]
    MissingRequired {
        /// Name of the missing field
        field: &'static str,
        /// Hint for how to provide the value
        hint: &'static str,
    },

    /// Invalid gateway URL provided.
    #[error("Invalid gateway URL '{url}': {reason}")]
    InvalidUrl {
        /// The invalid URL string
        url: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid rate-limit or timeout value.
    #[error("Invalid value for {field}: {reason}")]
    InvalidLimit {
        /// Name of the field
        field: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// The project secret cannot be used in an Authorization header.
    #[error("Invalid project secret: {reason}")]
    InvalidSecret {
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid body template (Handlebars syntax error).
    #[error("Invalid body template: {reason}")]
    InvalidTemplate {
        /// Reason for invalidity
        reason: String,
    },
}

/// Well-known field names for `MissingRequired` errors.
///
/// Use these constants for compile-time safety when matching field names.
pub mod field {
    /// The gateway base URL field.
    pub const GATEWAY_URL: &str = "gateway.url";
    /// The gateway project identifier field.
    pub const PROJECT_ID: &str = "gateway.project_id";
    /// The gateway project secret field.
    pub const PROJECT_SECRET: &str = "gateway.project_secret";
}

impl ConfigError {
    /// Creates a `MissingRequired` error for a required field.
    #[must_use]
    pub const fn missing(field: &'static str, hint: &'static str) -> Self {
        Self::MissingRequired { field, hint }
    }
}
