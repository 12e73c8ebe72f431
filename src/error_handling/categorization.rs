//! Error categorization and retry strategy.
//!
//! This module decides which API failures are transient and configures the
//! backoff used by the HTTP client.

use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;

use super::types::{ApiError, ApiErrorKind};

/// Creates an exponential backoff retry strategy.
///
/// Returns a retry strategy configured with:
/// - Initial delay: `initial_delay_ms` milliseconds
/// - Backoff factor: `RETRY_FACTOR` (doubles delay each retry)
/// - Maximum delay: `RETRY_MAX_DELAY_SECS` seconds
/// - At most `max_attempts - 1` retries after the initial attempt
///
/// `ExponentialBackoff` yields `base^n * factor`, so the growth rate is the
/// base and the initial delay is folded into the factor.
pub fn get_retry_strategy(
    initial_delay_ms: u64,
    max_attempts: usize,
) -> impl Iterator<Item = Duration> {
    let factor = crate::config::RETRY_FACTOR;
    ExponentialBackoff::from_millis(factor)
        .factor((initial_delay_ms / factor).max(1))
        .max_delay(Duration::from_secs(crate::config::RETRY_MAX_DELAY_SECS))
        .take(max_attempts.saturating_sub(1))
}

/// Determines if an API error is worth retrying.
///
/// Timeouts, connection failures, rate limiting (429) and server errors (5xx)
/// are transient. Client errors, decode failures and bad URLs are permanent.
pub fn is_retriable_error(error: &ApiError) -> bool {
    matches!(
        error.kind(),
        ApiErrorKind::TooManyRequests
            | ApiErrorKind::ServerError
            | ApiErrorKind::Timeout
            | ApiErrorKind::Connect
            | ApiErrorKind::Transport
    )
}
