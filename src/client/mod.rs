//! Censys API access.
//!
//! The rest of the crate talks to the platform through the [`CensysApi`] trait,
//! so walkers and the CensEye service can run against the real HTTP client or
//! a scripted test double.

mod http;
mod types;

use std::future::Future;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error_handling::ApiError;

pub use http::CensysClient;
pub use types::{ApiResponse, CountCondition, FieldValuePairBody, HistoryEvent, TimelinePage};

/// Operations the core needs from the platform.
///
/// Each call is a single request (the implementation may retry internally)
/// and returns decoded data plus call diagnostics.
pub trait CensysApi: Sync {
    /// Fetches the current host document.
    fn host(
        &self,
        org_id: Option<&str>,
        host_id: &str,
    ) -> impl Future<Output = Result<ApiResponse<Value>, ApiError>> + Send;

    /// Fetches one page of a host's event timeline for `[from, to]`.
    fn host_timeline_page(
        &self,
        org_id: Option<&str>,
        host_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> impl Future<Output = Result<ApiResponse<TimelinePage>, ApiError>> + Send;

    /// Fetches the web property records as they were at `at`.
    fn web_property_snapshot(
        &self,
        org_id: Option<&str>,
        property_id: &str,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<ApiResponse<Vec<Value>>, ApiError>> + Send;

    /// Counts matching hosts for each condition. Count `i` belongs to condition `i`;
    /// the API may return fewer counts than conditions.
    fn value_counts(
        &self,
        org_id: Option<&str>,
        query: Option<&str>,
        conditions: &[CountCondition],
    ) -> impl Future<Output = Result<ApiResponse<Vec<u64>>, ApiError>> + Send;
}
