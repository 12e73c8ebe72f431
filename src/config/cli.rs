//! Command-line options.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

use crate::app::parse_time;
use crate::config::constants::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, ENV_API_TOKEN, ENV_BASE_URL, ENV_ORGANIZATION_ID,
};
use crate::config::types::{Config, LogFormat, LogLevel, OutputFormat};

/// Command-line options for the `censys` binary.
///
/// # Examples
///
/// ```bash
/// # Rare pivots for a host
/// censys censeye 203.0.113.7 --rarity-max 50
///
/// # A host's timeline for January
/// censys history host 203.0.113.7 --from 2024-01-01 --to 2024-01-31
///
/// # Daily snapshots of a web property, as JSON
/// censys --output json history webproperty example.com:443 --from 2024-01-01 --to 2024-01-07
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "censys",
    version,
    about = "Finds rare pivots and walks asset history on the Censys Platform."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Result format: plain|json
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Plain)]
    pub output: OutputFormat,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Organization ID sent with every request
    #[arg(long, global = true, env = ENV_ORGANIZATION_ID)]
    pub org_id: Option<String>,

    /// Personal access token
    #[arg(long, global = true, env = ENV_API_TOKEN, hide_env_values = true)]
    pub token: Option<String>,

    /// API base URL
    #[arg(long, global = true, env = ENV_BASE_URL, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,
}

impl Cli {
    /// Runtime configuration for the client and logger.
    pub fn to_config(&self) -> Config {
        Config {
            api_token: self.token.clone().unwrap_or_default(),
            organization_id: self.org_id.clone(),
            base_url: self.base_url.clone(),
            timeout_seconds: self.timeout_seconds,
            log_level: self.log_level.clone(),
            log_format: self.log_format.clone(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report rare field/value pivots for a host
    Censeye(CenseyeArgs),
    /// Walk an asset's history over a time window
    History {
        #[command(subcommand)]
        target: HistoryTarget,
    },
}

#[derive(Debug, Args)]
pub struct CenseyeArgs {
    /// Host ID (IP address)
    pub host_id: String,

    /// Read the host document from this JSON file instead of fetching it
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// CensEye rule configuration (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Lowest count reported as interesting (overrides the configuration)
    #[arg(long)]
    pub rarity_min: Option<u64>,

    /// Highest count reported as interesting (overrides the configuration)
    #[arg(long)]
    pub rarity_max: Option<u64>,
}

#[derive(Debug, Subcommand)]
pub enum HistoryTarget {
    /// Timeline events of a host, newest first
    Host(HistoryArgs),
    /// One snapshot per day of a web property
    Webproperty(HistoryArgs),
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Asset ID (IP for hosts, `hostname:port` for web properties)
    pub id: String,

    /// Window start (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_parser = parse_time)]
    pub from: DateTime<Utc>,

    /// Window end (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_parser = parse_time)]
    pub to: DateTime<Utc>,
}
