//! Request and response types for the Censys API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::censeye::Rule;
use crate::meta::CallMeta;

/// A decoded response together with the call diagnostics.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub data: T,
    pub meta: CallMeta,
}

/// One observation from a host's event timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEvent {
    /// When the event was observed, if the API reported it
    pub event_time: Option<DateTime<Utc>>,
    /// Raw event resource
    pub resource: Value,
}

impl HistoryEvent {
    /// Builds an event from the API representation (`{"resource": {...}}`).
    ///
    /// The event time is read from `resource.event_time` when it parses as RFC 3339.
    pub fn from_value(value: Value) -> Self {
        let resource = match value {
            Value::Object(mut map) => map.remove("resource").unwrap_or(Value::Object(map)),
            other => other,
        };
        let event_time = resource
            .get("event_time")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));
        Self {
            event_time,
            resource,
        }
    }
}

/// One page of a host timeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimelinePage {
    pub events: Vec<HistoryEvent>,
    /// How far back this page's results cover; `None` when the API reports no cursor
    pub scanned_to: Option<DateTime<Utc>>,
}

/// Wire shape of a field/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValuePairBody {
    pub field: String,
    pub value: String,
}

/// Wire mirror of a rule, sent to the value-counts endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountCondition {
    pub field_value_pairs: Vec<FieldValuePairBody>,
}

impl From<&Rule> for CountCondition {
    fn from(rule: &Rule) -> Self {
        Self {
            field_value_pairs: rule
                .pairs()
                .iter()
                .map(|pair| FieldValuePairBody {
                    field: pair.field.clone(),
                    value: pair.value.clone(),
                })
                .collect(),
        }
    }
}

/// Every successful response is wrapped in `{"result": ...}`.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub(crate) result: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HostResult {
    #[serde(default)]
    pub(crate) resource: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TimelineResult {
    #[serde(default)]
    pub(crate) events: Vec<Value>,
    #[serde(default)]
    pub(crate) scanned_to: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WebPropertyResult {
    #[serde(default)]
    pub(crate) resource: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ValueCountsResult {
    #[serde(default)]
    pub(crate) and_count_results: Vec<CountResult>,
}

/// The counting API reports counts as numbers; be lenient about floats.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum CountResult {
    Int(u64),
    Float(f64),
    Object { count: u64 },
}

impl CountResult {
    pub(crate) fn value(&self) -> u64 {
        match self {
            CountResult::Int(n) => *n,
            CountResult::Float(f) if *f > 0.0 => *f as u64,
            CountResult::Float(_) => 0,
            CountResult::Object { count } => *count,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ValueCountsBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) query: Option<&'a str>,
    pub(crate) and_count_conditions: &'a [CountCondition],
}

#[derive(Debug, Serialize)]
pub(crate) struct WebPropertyBody<'a> {
    pub(crate) webproperty_ids: [&'a str; 1],
    pub(crate) at_time: String,
}

/// Error bodies look like `{"title": ..., "detail": ...}` or `{"error": ...}`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub(crate) detail: Option<String>,
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) error: Option<String>,
}

impl ErrorBody {
    pub(crate) fn message(self, fallback: &str) -> String {
        self.detail
            .or(self.title)
            .or(self.error)
            .unwrap_or_else(|| fallback.to_string())
    }
}
