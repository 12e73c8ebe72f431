//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `censys_cli` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger, API client and Ctrl-C initialization
//! - Exit codes
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use censys_cli::app::{run_command, Outcome};
use censys_cli::config::Cli;
use censys_cli::initialization::{init_cancellation, init_client, init_logger_with};

/// Exit code when results were printed but a walk was interrupted.
const EXIT_PARTIAL: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    // Load CENSYS_API_TOKEN and friends from .env, if present
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();
    let config = cli.to_config();

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    let client = init_client(&config).context("Failed to initialize API client")?;
    let cancel = init_cancellation();

    match run_command(&cli, &config, client.as_ref(), &cancel).await {
        Ok(Outcome::Complete) => Ok(()),
        Ok(Outcome::Partial) => process::exit(EXIT_PARTIAL),
        Err(e) => {
            eprintln!("censys error: {:#}", e);
            process::exit(1);
        }
    }
}
