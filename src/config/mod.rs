//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (endpoints, timeouts, pagination limits, defaults)
//! - Runtime configuration and CLI option types
//! - The CensEye rule configuration

mod censeye;
mod cli;
mod constants;
mod types;

pub use cli::{CenseyeArgs, Cli, Command, HistoryArgs, HistoryTarget};
pub use censeye::{CenseyeConfig, ExtractionRule, FilterSpec, RarityBounds};
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel, OutputFormat};
