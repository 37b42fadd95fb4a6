//! Configuration layer for notify-relay.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Environment fallbacks for gateway credentials ([`EnvConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority
//! (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Environment variables** - Gateway credentials only (see
//!    [`defaults::env`])
//! 4. **Built-in defaults** - Hardcoded default values
//!
//! The required gateway fields (`url`, `project_id`, `project_secret`)
//! have no defaults; they must arrive through one of the first three
//! sources. Everything is resolved exactly once at startup into a
//! [`ValidatedConfig`] that is passed by reference from then on.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod toml_tests;

pub use cli::{Cli, Command};
pub use error::{ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{EnvConfig, ValidatedConfig, write_default_config};
