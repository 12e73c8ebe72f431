// Shared test helpers: a scripted, in-memory stand-in for the Censys API.
//
// Each endpoint pops its next response from a queue and records the call, so
// tests can assert both on results and on the exact sequence of requests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use censys_cli::client::{ApiResponse, CountCondition, HistoryEvent, TimelinePage};
use censys_cli::meta::CallMeta;
use censys_cli::{ApiError, CensysApi};

/// A recorded API call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Host(String),
    Timeline {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
    WebProperty(DateTime<Utc>),
    ValueCounts {
        query: Option<String>,
        conditions: usize,
    },
}

#[derive(Default)]
pub struct ScriptedApi {
    host: Mutex<VecDeque<Result<Value, ApiError>>>,
    timeline: Mutex<VecDeque<Result<TimelinePage, ApiError>>>,
    web_property: Mutex<VecDeque<Result<Vec<Value>, ApiError>>>,
    value_counts: Mutex<VecDeque<Result<Vec<u64>, ApiError>>>,
    calls: Mutex<Vec<Call>>,
    orgs: Mutex<Vec<Option<String>>>,
    /// Cancels the token once this many calls have been made
    cancel_after: Option<(usize, CancellationToken)>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(self, response: Result<Value, ApiError>) -> Self {
        self.host.lock().unwrap().push_back(response);
        self
    }

    pub fn with_timeline_page(self, response: Result<TimelinePage, ApiError>) -> Self {
        self.timeline.lock().unwrap().push_back(response);
        self
    }

    pub fn with_snapshot(self, response: Result<Vec<Value>, ApiError>) -> Self {
        self.web_property.lock().unwrap().push_back(response);
        self
    }

    pub fn with_counts(self, response: Result<Vec<u64>, ApiError>) -> Self {
        self.value_counts.lock().unwrap().push_back(response);
        self
    }

    pub fn cancel_after(mut self, calls: usize, token: &CancellationToken) -> Self {
        self.cancel_after = Some((calls, token.clone()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Organization ID passed with each call, in call order
    pub fn orgs(&self) -> Vec<Option<String>> {
        self.orgs.lock().unwrap().clone()
    }

    fn record(&self, org_id: Option<&str>, call: Call) {
        self.orgs.lock().unwrap().push(org_id.map(str::to_string));
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        if let Some((after, token)) = &self.cancel_after {
            if calls.len() >= *after {
                token.cancel();
            }
        }
    }

    fn next<T>(queue: &Mutex<VecDeque<Result<T, ApiError>>>, name: &str) -> Result<ApiResponse<T>, ApiError> {
        let next = queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected {} call", name));
        next.map(|data| ApiResponse {
            data,
            meta: meta(name),
        })
    }
}

fn meta(name: &str) -> CallMeta {
    CallMeta {
        method: "GET".to_string(),
        url: format!("https://api.example.test/{}", name),
        status: 200,
        latency: Duration::from_millis(5),
        attempts: 1,
    }
}

impl CensysApi for ScriptedApi {
    async fn host(
        &self,
        org_id: Option<&str>,
        host_id: &str,
    ) -> Result<ApiResponse<Value>, ApiError> {
        self.record(org_id, Call::Host(host_id.to_string()));
        Self::next(&self.host, "host")
    }

    async fn host_timeline_page(
        &self,
        org_id: Option<&str>,
        _host_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<ApiResponse<TimelinePage>, ApiError> {
        self.record(org_id, Call::Timeline { from, to });
        Self::next(&self.timeline, "timeline")
    }

    async fn web_property_snapshot(
        &self,
        org_id: Option<&str>,
        _property_id: &str,
        at: DateTime<Utc>,
    ) -> Result<ApiResponse<Vec<Value>>, ApiError> {
        self.record(org_id, Call::WebProperty(at));
        Self::next(&self.web_property, "webproperty")
    }

    async fn value_counts(
        &self,
        org_id: Option<&str>,
        query: Option<&str>,
        conditions: &[CountCondition],
    ) -> Result<ApiResponse<Vec<u64>>, ApiError> {
        self.record(org_id, Call::ValueCounts {
            query: query.map(str::to_string),
            conditions: conditions.len(),
        });
        Self::next(&self.value_counts, "value_counts")
    }
}

pub fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

pub fn server_error(message: &str) -> ApiError {
    ApiError::Status {
        status: 503,
        message: message.to_string(),
    }
}

/// A timeline page of `n` events with the given cursor.
pub fn page(n: usize, scanned_to: Option<DateTime<Utc>>) -> TimelinePage {
    TimelinePage {
        events: (0..n)
            .map(|i| HistoryEvent::from_value(json!({"resource": {"seq": i}})))
            .collect(),
        scanned_to,
    }
}
