//! History walkers.
//!
//! Two time-windowed pagination state machines:
//! - [`HostHistoryWalker`] pages backward through a host's event timeline,
//!   following the server's scanned-to cursor.
//! - [`WebPropertyHistoryWalker`] samples a web property once per calendar day.
//!
//! A sequential driver checks the caller's cancellation token before every
//! step, so a walk only ever stops between API calls. Whatever was collected
//! before an interruption is returned as a partial result.

mod host;
mod webproperty;

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::client::{CensysApi, HistoryEvent};
use crate::error_handling::HistoryError;
use crate::meta::ResponseMeta;

pub use host::HostHistoryWalker;
pub use webproperty::{record_exists, WebPropertyHistoryWalker, WebPropertySnapshot};

/// Outcome of one walker step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// More pages/days remain
    Continue,
    /// The walk reached a termination condition
    Done,
}

/// A successful result that may carry a secondary, non-fatal error.
///
/// When `partial_error` is set, `data` still holds everything collected
/// before the interruption.
#[derive(Debug, Serialize)]
pub struct PartialResult<T> {
    pub data: T,
    /// Metadata of the last successful call, with operation-wide totals
    pub meta: Option<ResponseMeta>,
    #[serde(serialize_with = "serialize_partial_error")]
    pub partial_error: Option<HistoryError>,
}

impl<T> PartialResult<T> {
    pub fn is_partial(&self) -> bool {
        self.partial_error.is_some()
    }
}

fn serialize_partial_error<S>(err: &Option<HistoryError>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match err {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

/// A resumable walk driven one API call at a time.
pub trait HistoryWalker {
    type Output;

    /// Issues the next API call and updates the walk state.
    ///
    /// An `Err` is a hard failure: nothing usable was collected.
    fn step<C: CensysApi>(
        &mut self,
        client: &C,
    ) -> impl Future<Output = Result<Step, HistoryError>> + Send;

    /// True once at least one call succeeded, making a partial result possible.
    fn has_progress(&self) -> bool;

    /// Consumes the walker into its result. `interruption` takes precedence
    /// over any error the walker recorded itself.
    fn finish(self, interruption: Option<HistoryError>) -> PartialResult<Self::Output>;
}

/// Runs a walker to completion, checking `cancel` before every step.
///
/// # Errors
///
/// Returns the walker's hard failure, or `HistoryError::Cancelled` if the
/// token fires before anything succeeded.
pub async fn drive<W, C>(
    mut walker: W,
    client: &C,
    cancel: &CancellationToken,
) -> Result<PartialResult<W::Output>, HistoryError>
where
    W: HistoryWalker,
    C: CensysApi,
{
    loop {
        if cancel.is_cancelled() {
            if !walker.has_progress() {
                return Err(HistoryError::Cancelled);
            }
            log::warn!("Walk cancelled, returning partial results");
            return Ok(walker.finish(Some(HistoryError::Cancelled)));
        }
        match walker.step(client).await? {
            Step::Continue => {}
            Step::Done => break,
        }
    }
    Ok(walker.finish(None))
}

/// Collects a host's timeline events in `[from, to]`, newest window first.
///
/// # Errors
///
/// Fails only when the first page fails or the walk is cancelled before the
/// first page succeeded. Later failures come back as a partial result.
pub async fn get_host_history<C: CensysApi>(
    client: &C,
    cancel: &CancellationToken,
    org_id: Option<&str>,
    host_id: &str,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<PartialResult<Vec<HistoryEvent>>, HistoryError> {
    let walker = HostHistoryWalker::new(org_id, host_id, from, to);
    let result = drive(walker, client, cancel).await?;
    log::info!(
        "Collected {} events for host {} over {} page(s)",
        result.data.len(),
        host_id,
        result.meta.as_ref().map_or(0, |m| m.page_count)
    );
    Ok(result)
}

/// Samples a web property once per day from `from` to `to` inclusive.
///
/// # Errors
///
/// Fails only when the first day's request fails or the walk is cancelled
/// before any snapshot was taken. Failures on later days are tolerated.
pub async fn get_web_property_history<C: CensysApi>(
    client: &C,
    cancel: &CancellationToken,
    org_id: Option<&str>,
    property_id: &str,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<PartialResult<Vec<WebPropertySnapshot>>, HistoryError> {
    let walker = WebPropertyHistoryWalker::new(org_id, property_id, from, to);
    let result = drive(walker, client, cancel).await?;
    log::info!(
        "Collected {} daily snapshots for {} ({} with data)",
        result.data.len(),
        property_id,
        result.data.iter().filter(|s| s.exists).count()
    );
    Ok(result)
}
