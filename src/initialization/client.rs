//! API client initialization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::client::CensysClient;
use crate::config::{Config, ENV_API_TOKEN};
use crate::error_handling::InitializationError;

/// Initializes the Censys API client.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from the configuration
/// - Per-request timeout from the configuration
/// - Rustls TLS backend (no native TLS)
///
/// and wraps it in a [`CensysClient`] carrying the token, base URL and retry policy.
///
/// # Errors
///
/// Returns `InitializationError::MissingSetting` if no API token is configured,
/// `InvalidBaseUrl` if the base URL does not parse, or `HttpClientError` if the
/// HTTP client cannot be built.
pub fn init_client(config: &Config) -> Result<Arc<CensysClient>, InitializationError> {
    if config.api_token.trim().is_empty() {
        return Err(InitializationError::MissingSetting(format!(
            "API token (pass --token or set {})",
            ENV_API_TOKEN
        )));
    }

    let http = ClientBuilder::new()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .build()?;

    let client = CensysClient::new(
        http,
        &config.base_url,
        config.api_token.trim(),
        config.retry_initial_delay_ms,
        config.retry_max_attempts,
    )?;
    log::debug!("Initialized API client for {}", client.base_url());
    Ok(Arc::new(client))
}
