//! CensEye: pivot discovery for a host.
//!
//! Compiles a host document into candidate field/value rules, filters and
//! deduplicates them, counts how many hosts match each one, and reports the
//! rare ones. Rules whose count falls inside the rarity bounds are the
//! interesting pivots.

mod compiler;
mod filter;
mod query;
mod report;
mod rule;

use std::time::Instant;

use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::client::{CensysApi, CountCondition};
use crate::config::{CenseyeConfig, RarityBounds};
use crate::error_handling::CenseyeError;
use crate::meta::ResponseMeta;

pub use compiler::{compile_rules, compile_rules_at, is_headers_pattern, is_key_value_object};
pub use filter::{apply_filters, dedup_rules, matches_field_filter, matches_regex_filter};
pub use query::{render_query, search_url_with_base, to_query, to_search_url};
pub use report::{ReportBuilder, ReportEntry};
pub use rule::{FieldValuePair, Rule};

/// Result of investigating one host.
#[derive(Debug, Clone, Serialize)]
pub struct Investigation {
    /// Report entries, most common first
    pub entries: Vec<ReportEntry>,
    /// Rules produced by the compiler
    pub rules_compiled: usize,
    /// Rules left after filtering and deduplication (the ones counted)
    pub rules_counted: usize,
    /// Metadata of the counting calls; `None` when nothing needed counting
    pub meta: Option<ResponseMeta>,
}

/// Builds a report with the default services field and search links.
pub fn build_report(
    rules: &[Rule],
    counts: &[u64],
    rarity_min: u64,
    rarity_max: u64,
) -> Vec<ReportEntry> {
    ReportBuilder::new(
        RarityBounds {
            min: rarity_min,
            max: rarity_max,
        },
        crate::config::SERVICES_FIELD,
    )
    .with_search_url_base(Some(crate::config::SEARCH_URL_BASE))
    .build(rules, counts)
}

/// Fetches a host and investigates it.
///
/// # Errors
///
/// Returns `CenseyeError::Api` if fetching the host or any count fails.
pub async fn investigate_host_by_id<C: CensysApi>(
    client: &C,
    cancel: &CancellationToken,
    org_id: Option<&str>,
    host_id: &str,
    rarity: RarityBounds,
    config: &CenseyeConfig,
) -> Result<Investigation, CenseyeError> {
    if cancel.is_cancelled() {
        return Err(CenseyeError::Cancelled);
    }
    let host = client.host(org_id, host_id).await?;
    log::info!("Fetched host {} in {:?}", host_id, host.meta.latency);
    investigate_host(client, cancel, org_id, &host.data, rarity, config).await
}

/// Investigates a host document.
///
/// Rules are counted in batches of `config.batch_size`. Within a batch, count
/// `i` belongs to rule `i` and missing counts are zero. The cancellation token
/// is checked before each batch.
///
/// # Errors
///
/// Returns `CenseyeError::Compile` if the document root is not an object,
/// `CenseyeError::Api` if a counting call fails, and `CenseyeError::Cancelled`
/// if the token fires before counting completes.
pub async fn investigate_host<C: CensysApi>(
    client: &C,
    cancel: &CancellationToken,
    org_id: Option<&str>,
    document: &Value,
    rarity: RarityBounds,
    config: &CenseyeConfig,
) -> Result<Investigation, CenseyeError> {
    let start = Instant::now();
    let compiled = compile_rules(document, config)?;
    let rules_compiled = compiled.len();
    let rules = apply_filters(compiled, config);

    let mut counts: Vec<u64> = Vec::with_capacity(rules.len());
    let mut last_meta = None;
    let mut batches = 0u32;

    for batch in rules.chunks(config.batch_size.max(1)) {
        if cancel.is_cancelled() {
            return Err(CenseyeError::Cancelled);
        }
        let conditions: Vec<CountCondition> = batch.iter().map(CountCondition::from).collect();
        batches += 1;
        let response = client
            .value_counts(org_id, config.base_query.as_deref(), &conditions)
            .await?;

        if response.data.len() < batch.len() {
            log::warn!(
                "Value counts returned {} results for {} conditions; missing counts treated as 0",
                response.data.len(),
                batch.len()
            );
        }
        counts.extend((0..batch.len()).map(|i| response.data.get(i).copied().unwrap_or(0)));
        last_meta = Some(ResponseMeta::from_raw(response.meta));
    }

    let entries = ReportBuilder::new(rarity, &config.services_field)
        .with_search_url_base(config.search_url_base.as_deref())
        .build(&rules, &counts);

    let interesting = entries.iter().filter(|e| e.interesting).count();
    log::info!(
        "Compiled {} rules, counted {} in {} batch{}, {} entries ({} interesting)",
        rules_compiled,
        rules.len(),
        batches,
        if batches == 1 { "" } else { "es" },
        entries.len(),
        interesting
    );

    Ok(Investigation {
        entries,
        rules_compiled,
        rules_counted: rules.len(),
        meta: last_meta.map(|m| m.with_totals(start.elapsed(), batches)),
    })
}
