//! Rarity report.
//!
//! Joins rules with their host counts and flags the rare ones.

use serde::Serialize;

use super::query::{render_query, search_url_with_base};
use super::rule::Rule;
use crate::config::RarityBounds;

/// One pivot in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    /// Number of hosts matching the query
    pub count: u64,
    /// Rendered query
    pub query: String,
    /// Count falls inside the rarity bounds
    pub interesting: bool,
    /// Link to the platform search page for the query
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_url: Option<String>,
}

/// Builds report entries from rules and their positional counts.
#[derive(Debug, Clone)]
pub struct ReportBuilder<'a> {
    rarity: RarityBounds,
    services_field: &'a str,
    search_url_base: Option<&'a str>,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(rarity: RarityBounds, services_field: &'a str) -> Self {
        Self {
            rarity,
            services_field,
            search_url_base: None,
        }
    }

    /// Attaches search links built on `base` to every entry.
    pub fn with_search_url_base(mut self, base: Option<&'a str>) -> Self {
        self.search_url_base = base;
        self
    }

    /// Pairs `rules[i]` with `counts[i]` (0 when missing), drops counts of 0 or 1,
    /// and sorts by count descending then query ascending.
    pub fn build(&self, rules: &[Rule], counts: &[u64]) -> Vec<ReportEntry> {
        let mut entries: Vec<ReportEntry> = rules
            .iter()
            .enumerate()
            .filter_map(|(i, rule)| {
                let count = counts.get(i).copied().unwrap_or(0);
                if count <= 1 {
                    return None;
                }
                let query = render_query(rule, self.services_field);
                let search_url = self
                    .search_url_base
                    .map(|base| search_url_with_base(base, &query));
                Some(ReportEntry {
                    count,
                    interesting: self.rarity.contains(count),
                    query,
                    search_url,
                })
            })
            .collect();

        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.query.cmp(&b.query)));
        entries
    }
}
