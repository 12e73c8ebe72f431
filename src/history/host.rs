//! Backward pagination over a host's event timeline.

use std::time::Instant;

use chrono::{DateTime, Utc};

use super::{HistoryWalker, PartialResult, Step};
use crate::client::{CensysApi, HistoryEvent};
use crate::config::HOST_TIMELINE_PAGE_SIZE;
use crate::error_handling::HistoryError;
use crate::meta::ResponseMeta;

/// Walks `[from, to]` backward, one timeline page at a time.
///
/// Each page covers `[from, current_to]`; a full page moves `current_to` back
/// to the page's scanned-to cursor. The walk ends on an empty page, a short
/// page, a cursor at or before `from`, or a fetch error.
#[derive(Debug)]
pub struct HostHistoryWalker {
    org_id: Option<String>,
    host_id: String,
    from: DateTime<Utc>,
    current_to: DateTime<Utc>,
    events: Vec<HistoryEvent>,
    /// Page fetches issued, including a failing one
    attempts: u32,
    successful_pages: u32,
    last_meta: Option<ResponseMeta>,
    error: Option<HistoryError>,
    started: Instant,
}

impl HostHistoryWalker {
    pub fn new(
        org_id: Option<&str>,
        host_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Self {
        Self {
            org_id: org_id.map(str::to_string),
            host_id: host_id.to_string(),
            from,
            current_to: to,
            events: Vec::new(),
            attempts: 0,
            successful_pages: 0,
            last_meta: None,
            error: None,
            started: Instant::now(),
        }
    }

    /// End of the window the next page will request.
    pub fn current_to(&self) -> DateTime<Utc> {
        self.current_to
    }

    pub fn events(&self) -> &[HistoryEvent] {
        &self.events
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

impl HistoryWalker for HostHistoryWalker {
    type Output = Vec<HistoryEvent>;

    async fn step<C: CensysApi>(&mut self, client: &C) -> Result<Step, HistoryError> {
        self.attempts += 1;
        log::debug!(
            "Fetching timeline page {} for {} ({} .. {})",
            self.attempts,
            self.host_id,
            self.from,
            self.current_to
        );

        let response = match client
            .host_timeline_page(
                self.org_id.as_deref(),
                &self.host_id,
                self.from,
                self.current_to,
            )
            .await
        {
            Ok(response) => response,
            Err(e) if self.successful_pages == 0 => return Err(e.into()),
            Err(e) => {
                log::warn!(
                    "Timeline page {} for {} failed, keeping {} events: {}",
                    self.attempts,
                    self.host_id,
                    self.events.len(),
                    e
                );
                self.error = Some(e.into());
                return Ok(Step::Done);
            }
        };

        self.successful_pages += 1;
        self.last_meta = Some(ResponseMeta::from_raw(response.meta));
        let page = response.data;

        if page.events.is_empty() {
            return Ok(Step::Done);
        }
        let page_len = page.events.len();
        self.events.extend(page.events);
        if page_len < HOST_TIMELINE_PAGE_SIZE {
            return Ok(Step::Done);
        }

        match page.scanned_to {
            Some(cursor) if cursor > self.from => {
                if cursor >= self.current_to {
                    log::warn!(
                        "Timeline cursor for {} did not move back ({} >= {}), stopping",
                        self.host_id,
                        cursor,
                        self.current_to
                    );
                    return Ok(Step::Done);
                }
                self.current_to = cursor;
                Ok(Step::Continue)
            }
            _ => Ok(Step::Done),
        }
    }

    fn has_progress(&self) -> bool {
        self.successful_pages > 0
    }

    fn finish(self, interruption: Option<HistoryError>) -> PartialResult<Vec<HistoryEvent>> {
        let elapsed = self.started.elapsed();
        PartialResult {
            data: self.events,
            meta: self
                .last_meta
                .map(|m| m.with_totals(elapsed, self.attempts)),
            partial_error: interruption.or(self.error),
        }
    }
}
