//! censys_cli library: CensEye pivot discovery and asset history walks
//!
//! This library talks to the Censys Platform API v3 and provides:
//! - CensEye: compiles a host document into field/value rules, counts how many
//!   hosts share each one, and reports the rare ones
//! - History walkers: a host's event timeline (backward, cursor-driven) and a
//!   web property's daily snapshots (forward, one request per day)
//!
//! Long walks honor a [`CancellationToken`](tokio_util::sync::CancellationToken)
//! between API calls and return what they collected as a [`PartialResult`].
//!
//! # Example
//!
//! ```no_run
//! use censys_cli::initialization::init_client;
//! use censys_cli::{get_host_history, Config};
//! use chrono::{Duration, Utc};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     api_token: std::env::var("CENSYS_API_TOKEN")?,
//!     ..Default::default()
//! };
//! let client = init_client(&config)?;
//! let cancel = CancellationToken::new();
//!
//! let to = Utc::now();
//! let history =
//!     get_host_history(&*client, &cancel, None, "203.0.113.7", to - Duration::days(30), to)
//!         .await?;
//! println!("{} events", history.data.len());
//! if let Some(e) = &history.partial_error {
//!     eprintln!("incomplete: {}", e);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

pub mod app;
pub mod censeye;
pub mod client;
pub mod config;
mod error_handling;
pub mod history;
pub mod initialization;
pub mod meta;

// Re-export public API
pub use censeye::{investigate_host, investigate_host_by_id, Investigation, ReportEntry, Rule};
pub use client::{CensysApi, CensysClient};
pub use config::{CenseyeConfig, Config, LogFormat, LogLevel, OutputFormat, RarityBounds};
pub use error_handling::{
    ApiError, ApiErrorKind, CenseyeError, CompileError, ConfigError, HistoryError,
    InitializationError,
};
pub use history::{get_host_history, get_web_property_history, PartialResult};
pub use meta::ResponseMeta;
