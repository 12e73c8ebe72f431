//! Daily sampling of a web property.

use std::time::Instant;

use chrono::{DateTime, Days, Utc};
use serde::Serialize;
use serde_json::Value;

use super::{HistoryWalker, PartialResult, Step};
use crate::client::CensysApi;
use crate::config::WEB_PROPERTY_IDENTITY_FIELDS;
use crate::error_handling::HistoryError;
use crate::meta::ResponseMeta;

/// The web property as observed at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebPropertySnapshot {
    pub time: DateTime<Utc>,
    /// The property had data beyond its identity at this time
    pub exists: bool,
    /// Records returned for this time; `None` when the fetch failed or returned nothing
    pub data: Option<Vec<Value>>,
}

/// Steps one calendar day at a time from `from` to `to` inclusive.
///
/// A failed day after the first one is recorded as a missing snapshot and the
/// walk continues; only the first such error is kept.
#[derive(Debug)]
pub struct WebPropertyHistoryWalker {
    org_id: Option<String>,
    property_id: String,
    cursor: DateTime<Utc>,
    to: DateTime<Utc>,
    expected_days: i64,
    snapshots: Vec<WebPropertySnapshot>,
    requests: u32,
    last_meta: Option<ResponseMeta>,
    first_error: Option<HistoryError>,
    started: Instant,
}

impl WebPropertyHistoryWalker {
    pub fn new(
        org_id: Option<&str>,
        property_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Self {
        Self {
            org_id: org_id.map(str::to_string),
            property_id: property_id.to_string(),
            cursor: from,
            to,
            expected_days: expected_day_count(from, to),
            snapshots: Vec::new(),
            requests: 0,
            last_meta: None,
            first_error: None,
            started: Instant::now(),
        }
    }

    /// Days the walk is expected to cover, counted on day-truncated dates.
    ///
    /// The loop itself compares full timestamps, so the actual number of
    /// requests can differ from this by one.
    pub fn expected_days(&self) -> i64 {
        self.expected_days
    }

    pub fn snapshots(&self) -> &[WebPropertySnapshot] {
        &self.snapshots
    }
}

/// Inclusive day span between the calendar dates of `from` and `to`.
pub(crate) fn expected_day_count(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    ((to.date_naive() - from.date_naive()).num_days() + 1).max(0)
}

impl HistoryWalker for WebPropertyHistoryWalker {
    type Output = Vec<WebPropertySnapshot>;

    async fn step<C: CensysApi>(&mut self, client: &C) -> Result<Step, HistoryError> {
        if self.cursor > self.to {
            return Ok(Step::Done);
        }

        let at = self.cursor;
        self.requests += 1;
        log::debug!(
            "Fetching {} at {} (day {}/{})",
            self.property_id,
            at,
            self.requests,
            self.expected_days
        );

        match client
            .web_property_snapshot(self.org_id.as_deref(), &self.property_id, at)
            .await
        {
            Ok(response) => {
                self.last_meta = Some(ResponseMeta::from_raw(response.meta));
                let records = response.data;
                let exists = record_exists(&records);
                self.snapshots.push(WebPropertySnapshot {
                    time: at,
                    exists,
                    data: (!records.is_empty()).then_some(records),
                });
            }
            Err(e) if self.requests == 1 => return Err(e.into()),
            Err(e) => {
                // usually just means the property did not exist yet on this day
                log::debug!("No snapshot for {} at {}: {}", self.property_id, at, e);
                if self.first_error.is_none() {
                    self.first_error = Some(e.into());
                }
                self.snapshots.push(WebPropertySnapshot {
                    time: at,
                    exists: false,
                    data: None,
                });
            }
        }

        match self.cursor.checked_add_days(Days::new(1)) {
            Some(next) => self.cursor = next,
            None => return Ok(Step::Done),
        }
        if self.cursor <= self.to {
            Ok(Step::Continue)
        } else {
            Ok(Step::Done)
        }
    }

    fn has_progress(&self) -> bool {
        !self.snapshots.is_empty()
    }

    fn finish(self, interruption: Option<HistoryError>) -> PartialResult<Vec<WebPropertySnapshot>> {
        let elapsed = self.started.elapsed();
        PartialResult {
            data: self.snapshots,
            meta: self
                .last_meta
                .map(|m| m.with_totals(elapsed, self.requests)),
            partial_error: interruption.or(self.first_error),
        }
    }
}

/// True unless there are no records or the only record holds nothing beyond
/// its hostname and port.
pub fn record_exists(records: &[Value]) -> bool {
    match records {
        [] => false,
        [only] => has_content(only),
        _ => true,
    }
}

fn has_content(record: &Value) -> bool {
    match record {
        Value::Object(map) => map
            .iter()
            .any(|(key, value)| !WEB_PROPERTY_IDENTITY_FIELDS.contains(&key.as_str()) && is_set(value)),
        other => is_set(other),
    }
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}
