//! Command-line application support.
//!
//! This module provides time parsing for window bounds, result rendering,
//! and subcommand execution used by the `censys` binary.

mod commands;
mod output;
mod time;

// Re-export public API
pub use commands::{run_command, Outcome};
pub use output::{render_host_history, render_investigation, render_web_property_history};
pub use time::parse_time;
