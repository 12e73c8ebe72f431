//! HTTP implementation of the Censys Platform API.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::ACCEPT;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_retry::RetryIf;
use url::Url;

use super::types::{
    ApiResponse, CountCondition, Envelope, ErrorBody, HistoryEvent, HostResult, TimelinePage,
    TimelineResult, ValueCountsBody, ValueCountsResult, WebPropertyBody, WebPropertyResult,
};
use super::CensysApi;
use crate::error_handling::{get_retry_strategy, is_retriable_error, ApiError};
use crate::meta::CallMeta;

/// Maximum number of characters of a non-JSON error body kept in error messages
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Censys Platform API client.
///
/// Authenticates with a personal access token and retries transient failures
/// (timeouts, connection errors, 429, 5xx) with exponential backoff.
#[derive(Debug, Clone)]
pub struct CensysClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
    retry_initial_delay_ms: u64,
    retry_max_attempts: usize,
}

impl CensysClient {
    /// Creates a client on top of a configured `reqwest::Client`.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if `base_url` is not an absolute URL.
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        token: impl Into<String>,
        retry_initial_delay_ms: u64,
        retry_max_attempts: usize,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
            token: token.into(),
            retry_initial_delay_ms,
            retry_max_attempts: retry_max_attempts.max(1),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(
        &self,
        segments: &[&str],
        org_id: Option<&str>,
        query: &[(&str, String)],
    ) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        if org_id.is_some() || !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            if let Some(org) = org_id {
                pairs.append_pair("organization_id", org);
            }
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Sends one request with retries and decodes the `result` envelope.
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> Result<ApiResponse<T>, ApiError> {
        let start = Instant::now();
        let attempts = AtomicU32::new(0);
        let strategy = get_retry_strategy(self.retry_initial_delay_ms, self.retry_max_attempts);

        let (status, text) = RetryIf::start(
            strategy,
            || {
                attempts.fetch_add(1, Ordering::SeqCst);
                self.send_once(method.clone(), url.clone(), body.as_ref())
            },
            |e: &ApiError| {
                let retry = is_retriable_error(e);
                if retry {
                    log::debug!("Retrying {} {} after {}: {}", method, url, e.kind(), e);
                }
                retry
            },
        )
        .await?;

        let envelope: Envelope<T> = serde_json::from_str(&text)?;
        let meta = CallMeta {
            method: method.to_string(),
            url: url.to_string(),
            status,
            latency: start.elapsed(),
            attempts: attempts.load(Ordering::SeqCst),
        };
        log::debug!(
            "{} {} -> {} in {:?} ({} attempt{})",
            meta.method,
            meta.url,
            meta.status,
            meta.latency,
            meta.attempts,
            if meta.attempts == 1 { "" } else { "s" }
        );

        Ok(ApiResponse {
            data: envelope.result,
            meta,
        })
    }

    async fn send_once(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<(u16, String), ApiError> {
        let mut request = self
            .http
            .request(method, url.clone())
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|source| ApiError::Request {
            url: url.to_string(),
            source,
        })?;
        let status = response.status();
        let text = response.text().await.map_err(|source| ApiError::Request {
            url: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            let fallback = if text.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                text.chars().take(MAX_ERROR_BODY_CHARS).collect()
            };
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.message(&fallback))
                .unwrap_or(fallback);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok((status.as_u16(), text))
    }
}

fn format_time(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl CensysApi for CensysClient {
    async fn host(
        &self,
        org_id: Option<&str>,
        host_id: &str,
    ) -> Result<ApiResponse<Value>, ApiError> {
        let url = self.endpoint(&["v3", "global", "asset", "host", host_id], org_id, &[])?;
        let response = self.execute::<HostResult>(Method::GET, url, None).await?;
        Ok(ApiResponse {
            data: response.data.resource,
            meta: response.meta,
        })
    }

    async fn host_timeline_page(
        &self,
        org_id: Option<&str>,
        host_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<ApiResponse<TimelinePage>, ApiError> {
        let url = self.endpoint(
            &["v3", "global", "asset", "host", host_id, "timeline"],
            org_id,
            &[("start_time", format_time(from)), ("end_time", format_time(to))],
        )?;
        let response = self.execute::<TimelineResult>(Method::GET, url, None).await?;
        Ok(ApiResponse {
            data: TimelinePage {
                events: response
                    .data
                    .events
                    .into_iter()
                    .map(HistoryEvent::from_value)
                    .collect(),
                scanned_to: response.data.scanned_to,
            },
            meta: response.meta,
        })
    }

    async fn web_property_snapshot(
        &self,
        org_id: Option<&str>,
        property_id: &str,
        at: DateTime<Utc>,
    ) -> Result<ApiResponse<Vec<Value>>, ApiError> {
        let url = self.endpoint(&["v3", "global", "asset", "webproperty"], org_id, &[])?;
        let body = serde_json::to_value(WebPropertyBody {
            webproperty_ids: [property_id],
            at_time: format_time(at),
        })?;
        let response = self
            .execute::<Vec<WebPropertyResult>>(Method::POST, url, Some(body))
            .await?;
        Ok(ApiResponse {
            data: response
                .data
                .into_iter()
                .map(|r| r.resource)
                .filter(|r| !r.is_null())
                .collect(),
            meta: response.meta,
        })
    }

    async fn value_counts(
        &self,
        org_id: Option<&str>,
        query: Option<&str>,
        conditions: &[CountCondition],
    ) -> Result<ApiResponse<Vec<u64>>, ApiError> {
        let url = self.endpoint(&["v3", "threat-hunting", "value-counts"], org_id, &[])?;
        let body = serde_json::to_value(ValueCountsBody {
            query,
            and_count_conditions: conditions,
        })?;
        let response = self
            .execute::<ValueCountsResult>(Method::POST, url, Some(body))
            .await?;
        Ok(ApiResponse {
            data: response
                .data
                .and_count_results
                .iter()
                .map(|c| c.value())
                .collect(),
            meta: response.meta,
        })
    }
}
