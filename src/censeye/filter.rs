//! Rule filtering and deduplication.
//!
//! Runs before the counting call so noisy or unique fields never cost an API
//! round trip.

use std::collections::HashSet;

use super::query::render_query;
use super::rule::Rule;
use crate::config::CenseyeConfig;

/// Applies field filters, regex filters and deduplication, in that order.
pub fn apply_filters(rules: Vec<Rule>, config: &CenseyeConfig) -> Vec<Rule> {
    let total = rules.len();
    let kept: Vec<Rule> = rules
        .into_iter()
        .filter(|rule| !matches_field_filter(rule, config))
        .filter(|rule| !matches_regex_filter(rule, config))
        .collect();
    let filtered = total - kept.len();
    let deduped = dedup_rules(kept);
    log::debug!(
        "Filtered {} of {} rules, {} unique rules remain",
        filtered,
        total,
        deduped.len()
    );
    deduped
}

/// True if any pair's field is caught by an exact or prefix filter.
pub fn matches_field_filter(rule: &Rule, config: &CenseyeConfig) -> bool {
    rule.pairs()
        .iter()
        .any(|pair| config.filters.iter().any(|f| f.matches(&pair.field)))
}

/// True if any regex filter matches the rendered query.
pub fn matches_regex_filter(rule: &Rule, config: &CenseyeConfig) -> bool {
    if config.regex_filters.is_empty() {
        return false;
    }
    let query = render_query(rule, &config.services_field);
    config.regex_filters.iter().any(|re| re.is_match(&query))
}

/// Drops later duplicates (same pairs in any order), keeping first occurrences in order.
pub fn dedup_rules(rules: Vec<Rule>) -> Vec<Rule> {
    let mut seen = HashSet::with_capacity(rules.len());
    rules
        .into_iter()
        .filter(|rule| seen.insert(rule.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::censeye::FieldValuePair;
    use crate::config::FilterSpec;
    use regex::Regex;

    fn config(filters: &[&str], regexes: &[&str]) -> CenseyeConfig {
        CenseyeConfig {
            filters: filters.iter().map(|f| FilterSpec::parse(f)).collect(),
            regex_filters: regexes.iter().map(|r| Regex::new(r).unwrap()).collect(),
            ..CenseyeConfig::default()
        }
    }

    fn pair_rule(a: (&str, &str), b: (&str, &str)) -> Rule {
        Rule::new(vec![
            FieldValuePair::new(a.0, a.1),
            FieldValuePair::new(b.0, b.1),
        ])
    }

    #[test]
    fn test_exact_and_prefix_filters() {
        let config = config(&["ip", "location."], &[]);
        let rules = vec![
            Rule::single("ip", "1.1.1.1"),
            Rule::single("location.city", "Berlin"),
            Rule::single("location", "x"),
            Rule::single("ip_version", "4"),
        ];
        assert_eq!(
            apply_filters(rules, &config),
            vec![Rule::single("location", "x"), Rule::single("ip_version", "4")]
        );
    }

    #[test]
    fn test_any_filtered_pair_drops_the_whole_rule() {
        let config = config(&["services.banner_hex"], &[]);
        let rules = vec![pair_rule(
            ("services.port", "22"),
            ("services.banner_hex", "abcd"),
        )];
        assert!(apply_filters(rules, &config).is_empty());
    }

    #[test]
    fn test_prefix_filter_is_case_sensitive() {
        let config = config(&["Location."], &[]);
        let rules = vec![Rule::single("location.city", "Berlin")];
        assert_eq!(apply_filters(rules.clone(), &config), rules);
    }

    #[test]
    fn test_regex_filter_matches_rendered_query() {
        let config = config(&[], &[r#"^services:\(port="(80|443)""#]);
        let rules = vec![
            pair_rule(("services.port", "80"), ("services.protocol", "HTTP")),
            pair_rule(("services.port", "8080"), ("services.protocol", "HTTP")),
        ];
        assert_eq!(
            apply_filters(rules, &config),
            vec![pair_rule(
                ("services.port", "8080"),
                ("services.protocol", "HTTP")
            )]
        );
    }

    #[test]
    fn test_dedup_is_order_independent() {
        let a = pair_rule(("services.port", "22"), ("services.protocol", "SSH"));
        let b = pair_rule(("services.protocol", "SSH"), ("services.port", "22"));

        let forward = dedup_rules(vec![a.clone(), b.clone()]);
        let backward = dedup_rules(vec![b.clone(), a.clone()]);
        assert_eq!(forward.len(), 1);
        assert_eq!(forward, backward);
        // first occurrence wins, keeping its pair order
        assert_eq!(forward[0].pairs()[0].field, "services.port");
        assert_eq!(backward[0].pairs()[0].field, "services.protocol");
    }

    #[test]
    fn test_dedup_preserves_first_occurrence_order() {
        let rules = vec![
            Rule::single("a", "1"),
            Rule::single("b", "2"),
            Rule::single("a", "1"),
            Rule::single("c", "3"),
            Rule::single("b", "2"),
        ];
        assert_eq!(
            dedup_rules(rules),
            vec![
                Rule::single("a", "1"),
                Rule::single("b", "2"),
                Rule::single("c", "3"),
            ]
        );
    }
}
