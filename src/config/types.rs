//! Configuration types.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and runtime configuration.

use clap::ValueEnum;
use strum_macros::{Display as DisplayMacro, EnumIter as EnumIterMacro};

use crate::config::constants::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, RETRY_INITIAL_DELAY_MS, RETRY_MAX_ATTEMPTS, USER_AGENT,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Result output format for command results written to stdout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, DisplayMacro, EnumIterMacro)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned text with highlighted interesting rows
    Plain,
    /// Pretty-printed JSON
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use censys_cli::Config;
///
/// let config = Config {
///     api_token: "censys_pat".to_string(),
///     organization_id: Some("my-org".to_string()),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Personal access token sent as a bearer token
    pub api_token: String,

    /// Organization ID used when a command does not name one
    pub organization_id: Option<String>,

    /// API base URL
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// Maximum attempts per API call, including the first one
    pub retry_max_attempts: usize,

    /// Delay before the first retry in milliseconds
    pub retry_initial_delay_ms: u64,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            organization_id: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            retry_max_attempts: RETRY_MAX_ATTEMPTS,
            retry_initial_delay_ms: RETRY_INITIAL_DELAY_MS,
            user_agent: USER_AGENT.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}
