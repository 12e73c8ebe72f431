//! CensEye rule configuration.
//!
//! The configuration is data, not code: it is loaded once (from a JSON file or
//! the built-in defaults), validated, and then passed explicitly into the rule
//! compiler, filters and report builder.

use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use crate::config::constants::{
    DEFAULT_EXTRACTION_RULES, DEFAULT_FIELD_FILTERS, DEFAULT_KEY_VALUE_PREFIXES,
    DEFAULT_RARITY_MAX, DEFAULT_RARITY_MIN, SEARCH_URL_BASE, SERVICES_FIELD,
    VALUE_COUNTS_BATCH_SIZE,
};
use crate::error_handling::ConfigError;

/// A group of service fields whose observed values are combined into one rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExtractionRule {
    /// Field names relative to a service object (dotted sub-paths allowed)
    pub fields: Vec<String>,
}

impl ExtractionRule {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

/// A field filter, classified when the configuration is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSpec {
    /// Matches one field exactly
    Exact(String),
    /// Matches every field starting with the prefix (prefix keeps its trailing dot)
    Prefix(String),
}

impl FilterSpec {
    /// Classifies a configured filter string. A trailing `.` marks a prefix filter.
    pub fn parse(raw: &str) -> Self {
        if raw.ends_with('.') {
            FilterSpec::Prefix(raw.to_string())
        } else {
            FilterSpec::Exact(raw.to_string())
        }
    }

    pub fn matches(&self, field: &str) -> bool {
        match self {
            FilterSpec::Exact(f) => field == f,
            FilterSpec::Prefix(p) => field.starts_with(p.as_str()),
        }
    }
}

/// Inclusive count range marking a rule as interesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RarityBounds {
    pub min: u64,
    pub max: u64,
}

impl Default for RarityBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_RARITY_MIN,
            max: DEFAULT_RARITY_MAX,
        }
    }
}

impl RarityBounds {
    pub fn contains(&self, count: u64) -> bool {
        self.min <= count && count <= self.max
    }

    /// Replaces either bound, rejecting an inverted result.
    pub fn with_overrides(self, min: Option<u64>, max: Option<u64>) -> Result<Self, ConfigError> {
        let bounds = Self {
            min: min.unwrap_or(self.min),
            max: max.unwrap_or(self.max),
        };
        if bounds.min > bounds.max {
            return Err(ConfigError::RarityBounds {
                min: bounds.min,
                max: bounds.max,
            });
        }
        Ok(bounds)
    }
}

/// On-disk shape of the configuration. Every field is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawCenseyeConfig {
    rarity: RarityBounds,
    filters: Vec<String>,
    regex_filters: Vec<String>,
    key_value_prefixes: Vec<String>,
    extraction_rules: Vec<ExtractionRule>,
    services_field: String,
    batch_size: usize,
    search_url_base: Option<String>,
    base_query: Option<String>,
}

impl Default for RawCenseyeConfig {
    fn default() -> Self {
        Self {
            rarity: RarityBounds::default(),
            filters: DEFAULT_FIELD_FILTERS.iter().map(|s| s.to_string()).collect(),
            regex_filters: Vec::new(),
            key_value_prefixes: DEFAULT_KEY_VALUE_PREFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            extraction_rules: DEFAULT_EXTRACTION_RULES
                .iter()
                .map(|fields| ExtractionRule::new(fields.iter().copied()))
                .collect(),
            services_field: SERVICES_FIELD.to_string(),
            batch_size: VALUE_COUNTS_BATCH_SIZE,
            search_url_base: Some(SEARCH_URL_BASE.to_string()),
            base_query: None,
        }
    }
}

/// Validated CensEye configuration.
#[derive(Debug, Clone)]
pub struct CenseyeConfig {
    /// Default interesting count range (the CLI may override it per call)
    pub rarity: RarityBounds,
    /// Exact and prefix field filters
    pub filters: Vec<FilterSpec>,
    /// Filters applied to the rendered query string
    pub regex_filters: Vec<Regex>,
    /// Object paths treated as key-value maps
    pub key_value_prefixes: Vec<String>,
    /// Service field groups to combine
    pub extraction_rules: Vec<ExtractionRule>,
    /// Name of the repeated service array at the document root
    pub services_field: String,
    /// Conditions per value-counts request (at least 1)
    pub batch_size: usize,
    /// Search page base; `None` disables search links in the report
    pub search_url_base: Option<String>,
    /// Optional query scoping every value count
    pub base_query: Option<String>,
}

impl Default for CenseyeConfig {
    fn default() -> Self {
        let raw = RawCenseyeConfig::default();
        Self {
            rarity: raw.rarity,
            filters: raw.filters.iter().map(|f| FilterSpec::parse(f)).collect(),
            regex_filters: Vec::new(),
            key_value_prefixes: raw.key_value_prefixes,
            extraction_rules: raw.extraction_rules,
            services_field: raw.services_field,
            batch_size: raw.batch_size,
            search_url_base: raw.search_url_base,
            base_query: raw.base_query,
        }
    }
}

impl CenseyeConfig {
    /// Parses and validates a JSON configuration document.
    ///
    /// Missing keys fall back to the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the JSON is malformed, a regex filter does not
    /// compile, or the rarity bounds are inverted.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawCenseyeConfig = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Loads the configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&content)?;
        log::debug!(
            "Loaded CensEye config from {}: {} filters, {} regex filters, {} extraction rules",
            path.display(),
            config.filters.len(),
            config.regex_filters.len(),
            config.extraction_rules.len()
        );
        Ok(config)
    }

    fn from_raw(raw: RawCenseyeConfig) -> Result<Self, ConfigError> {
        if raw.rarity.min > raw.rarity.max {
            return Err(ConfigError::RarityBounds {
                min: raw.rarity.min,
                max: raw.rarity.max,
            });
        }

        let regex_filters = raw
            .regex_filters
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ConfigError::Regex {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            rarity: raw.rarity,
            filters: raw.filters.iter().map(|f| FilterSpec::parse(f)).collect(),
            regex_filters,
            key_value_prefixes: raw.key_value_prefixes,
            extraction_rules: raw
                .extraction_rules
                .into_iter()
                .filter(|rule| !rule.fields.is_empty())
                .collect(),
            services_field: raw.services_field,
            batch_size: raw.batch_size.max(1),
            search_url_base: raw.search_url_base.filter(|base| !base.is_empty()),
            base_query: raw.base_query.filter(|q| !q.trim().is_empty()),
        })
    }

    /// Returns true if the path is configured as a key-value object.
    pub fn is_key_value_prefix(&self, path: &str) -> bool {
        self.key_value_prefixes.iter().any(|p| p == path)
    }
}
