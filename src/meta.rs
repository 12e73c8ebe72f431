//! Response metadata.
//!
//! Every API call reports how it went (method, URL, status, latency, attempts).
//! Operations spanning several calls expose the metadata of the last
//! successful call, with latency and page count replaced by operation-wide
//! totals.

use std::time::Duration;

use serde::Serialize;

/// Diagnostics for a single API call, as measured by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallMeta {
    /// HTTP method
    pub method: String,
    /// Requested URL (without credentials)
    pub url: String,
    /// HTTP status of the final attempt
    pub status: u16,
    /// Time spent in this call, retries included
    pub latency: Duration,
    /// Number of attempts the client made (1 when no retry happened)
    pub attempts: u32,
}

/// Externally visible metadata for an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseMeta {
    pub method: String,
    pub url: String,
    pub status: u16,
    /// Call latency, or total wall-clock time for multi-page operations
    #[serde(serialize_with = "serialize_duration_ms", rename = "latency_ms")]
    pub latency: Duration,
    /// Attempts made by the client for the last successful call
    pub attempts: u32,
    /// Number of page fetches made by the operation, including a failing one
    pub page_count: u32,
}

impl ResponseMeta {
    /// Builds the visible metadata for a single call.
    pub fn from_raw(raw: CallMeta) -> Self {
        Self {
            method: raw.method,
            url: raw.url,
            status: raw.status,
            latency: raw.latency,
            attempts: raw.attempts,
            page_count: 1,
        }
    }

    /// Replaces latency and page count with operation-wide totals.
    pub fn with_totals(mut self, elapsed: Duration, page_count: u32) -> Self {
        self.latency = elapsed;
        self.page_count = page_count;
        self
    }
}

fn serialize_duration_ms<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}
