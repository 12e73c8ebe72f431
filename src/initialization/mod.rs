//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - Logger
//! - Censys API client
//! - Cancellation token wired to Ctrl-C
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;

use tokio_util::sync::CancellationToken;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;

/// Creates a cancellation token that is cancelled on Ctrl-C.
///
/// Walkers check the token between API calls, so an interrupted history walk
/// still returns what it collected so far as a partial result.
pub fn init_cancellation() -> CancellationToken {
    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupt received, stopping after the current request");
            signal_token.cancel();
        }
    });
    token
}
