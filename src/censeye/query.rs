//! Query rendering.
//!
//! Turns a rule into a platform query string and a shareable search link.

use super::rule::{FieldValuePair, Rule};
use crate::config::{SEARCH_URL_BASE, SERVICES_FIELD};

/// Renders a rule with the default services field name.
pub fn to_query(rule: &Rule) -> String {
    render_query(rule, SERVICES_FIELD)
}

/// Renders a rule as a query string.
///
/// - empty rule: `""`
/// - one pair: `field="value"`
/// - several pairs under the services field: `services:(a="1" and b="2")`
/// - several pairs otherwise: `a="1" and b="2"`
pub fn render_query(rule: &Rule, services_field: &str) -> String {
    match rule.pairs() {
        [] => String::new(),
        [pair] => render_pair(&pair.field, &pair.value),
        pairs => {
            let scope = format!("{}.", services_field);
            let stripped: Option<Vec<&str>> = pairs
                .iter()
                .map(|p| p.field.strip_prefix(scope.as_str()))
                .collect();
            match stripped {
                Some(fields) => {
                    let inner = fields
                        .iter()
                        .zip(pairs)
                        .map(|(field, pair)| render_pair(field, &pair.value))
                        .collect::<Vec<_>>()
                        .join(" and ");
                    format!("{}:({})", services_field, inner)
                }
                None => pairs
                    .iter()
                    .map(|FieldValuePair { field, value }| render_pair(field, value))
                    .collect::<Vec<_>>()
                    .join(" and "),
            }
        }
    }
}

fn render_pair(field: &str, value: &str) -> String {
    format!("{}={}", field, quote(value))
}

/// Double-quotes a value, escaping backslashes and quotes.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Search link for a query on the default platform search page.
pub fn to_search_url(query: &str) -> String {
    search_url_with_base(SEARCH_URL_BASE, query)
}

/// Percent-encodes the query and appends it to `base` (which ends in `q=`).
pub fn search_url_with_base(base: &str, query: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("{}{}", base, encoded)
}
