//! notify-relay: Event Notification Fan-Out
//!
//! Entry point for the notify-relay application.

use notify_relay::config::{Cli, Command, ValidatedConfig, write_default_config};
use std::process::ExitCode;

mod app;
mod run;

use app::{exit_code, print_config_hint, setup_tracing};
use run::Task;

/// Main entry point.
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // The init subcommand runs before configuration is required
    let task = match &cli.command {
        Some(Command::Init { output }) => return handle_init(output),
        Some(Command::Test { url }) => Task::Test { url },
        Some(Command::Send { request }) => Task::Send { request },
        None => {
            eprintln!("No command specified. Run 'notify-relay --help' for usage.");
            return exit_code::CONFIG_ERROR;
        }
    };

    // Load and validate configuration
    let config = match ValidatedConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            print_config_hint(&e);
            return exit_code::CONFIG_ERROR;
        }
    };

    // Setup logging and run
    setup_tracing(config.verbose);
    tracing::info!("{config}");

    run_application(config, task)
}

/// Handles the `init` subcommand.
fn handle_init(output: &std::path::Path) -> ExitCode {
    match write_default_config(output) {
        Ok(()) => {
            println!("Configuration template written to: {}", output.display());
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

/// Runs the requested task with the given configuration.
fn run_application(config: ValidatedConfig, task: Task<'_>) -> ExitCode {
    let runtime = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");

    match runtime.block_on(run::execute(config, task)) {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            tracing::error!("Application error: {e}");
            exit_code::runtime_error()
        }
    }
}
