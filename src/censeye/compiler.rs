//! Rule compiler.
//!
//! Walks a host document and emits candidate single-field and multi-field
//! pivot rules. Odd document shapes are skipped, never fatal: the only hard
//! error is a root that is not an object.

use serde_json::{Map, Value};

use super::rule::{FieldValuePair, Rule};
use crate::config::{CenseyeConfig, ExtractionRule};
use crate::error_handling::CompileError;

/// Compiles every rule derivable from a host document.
///
/// # Errors
///
/// Returns `CompileError::RootNotObject` if the document root is not an object.
pub fn compile_rules(document: &Value, config: &CenseyeConfig) -> Result<Vec<Rule>, CompileError> {
    if !document.is_object() {
        return Err(CompileError::RootNotObject(type_name(document)));
    }
    let rules = compile_rules_at(document, "", config);
    log::debug!("Compiled {} candidate rules", rules.len());
    Ok(rules)
}

/// Compiles the rules for a subtree located at `prefix`.
pub fn compile_rules_at(value: &Value, prefix: &str, config: &CenseyeConfig) -> Vec<Rule> {
    let mut rules = Vec::new();
    walk(prefix, value, config, &mut rules);
    rules
}

fn walk(prefix: &str, value: &Value, config: &CenseyeConfig, out: &mut Vec<Rule>) {
    match value {
        Value::Null => {}
        Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            if let Some(v) = scalar_string(value) {
                out.push(Rule::single(prefix, v));
            }
        }
        Value::Array(items) => {
            if prefix == config.services_field && items.iter().any(Value::is_object) {
                compile_service_rules(items, config, out);
                return;
            }
            // scalars stay on the array's own path, one rule each
            for item in items {
                walk(prefix, item, config, out);
            }
        }
        Value::Object(map) => {
            if map.is_empty() {
                return;
            }
            // the root is always a schema object, never a key-value map
            if !prefix.is_empty() && is_key_value_object(prefix, map, config) {
                for key in map.keys() {
                    out.push(Rule::single(prefix, key.as_str()));
                }
                return;
            }
            for (key, child) in map {
                walk(&join_path(prefix, key), child, config, out);
            }
        }
    }
}

/// Emits the configured multi-field rules for each service object.
///
/// A service only yields rules for an extraction rule when every field of the
/// rule has at least one value in that service.
fn compile_service_rules(services: &[Value], config: &CenseyeConfig, out: &mut Vec<Rule>) {
    for (index, service) in services.iter().enumerate() {
        let Value::Object(service) = service else {
            log::debug!(
                "Skipping {}[{}]: expected an object, found {}",
                config.services_field,
                index,
                type_name(service)
            );
            continue;
        };

        for extraction in &config.extraction_rules {
            let Some(value_sets) = service_value_sets(service, extraction, config) else {
                continue;
            };
            for combination in cartesian_product(&value_sets) {
                out.push(
                    extraction
                        .fields
                        .iter()
                        .zip(combination)
                        .map(|(field, value)| {
                            FieldValuePair::new(join_path(&config.services_field, field), value)
                        })
                        .collect(),
                );
            }
        }
    }
}

/// Distinct values of each field of `extraction` in one service, or `None` if
/// any field is missing.
fn service_value_sets(
    service: &Map<String, Value>,
    extraction: &ExtractionRule,
    config: &CenseyeConfig,
) -> Option<Vec<Vec<String>>> {
    extraction
        .fields
        .iter()
        .map(|field| {
            let segments: Vec<&str> = field.split('.').collect();
            let full_path = join_path(&config.services_field, field);
            let mut values = Vec::new();
            collect_field_values(service, &segments, &full_path, config, &mut values);
            (!values.is_empty()).then_some(values)
        })
        .collect()
}

fn collect_field_values(
    map: &Map<String, Value>,
    segments: &[&str],
    full_path: &str,
    config: &CenseyeConfig,
    out: &mut Vec<String>,
) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };
    if let Some(child) = map.get(*first) {
        collect_value(child, rest, full_path, config, out);
    }
}

fn collect_value(
    value: &Value,
    rest: &[&str],
    full_path: &str,
    config: &CenseyeConfig,
    out: &mut Vec<String>,
) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_value(item, rest, full_path, config, out);
            }
        }
        Value::Object(map) if !rest.is_empty() => {
            collect_field_values(map, rest, full_path, config, out);
        }
        Value::Object(map) => {
            if !map.is_empty() && is_key_value_object(full_path, map, config) {
                for key in map.keys() {
                    push_distinct(out, key.clone());
                }
            }
        }
        _ if rest.is_empty() => {
            if let Some(v) = scalar_string(value) {
                push_distinct(out, v);
            }
        }
        _ => {}
    }
}

fn push_distinct(out: &mut Vec<String>, value: String) {
    if !out.contains(&value) {
        out.push(value);
    }
}

/// Every combination picking one value from each set, in set order.
fn cartesian_product(sets: &[Vec<String>]) -> Vec<Vec<String>> {
    sets.iter().fold(vec![Vec::new()], |acc, set| {
        acc.iter()
            .flat_map(|prefix| {
                set.iter().map(move |value| {
                    let mut combination = prefix.clone();
                    combination.push(value.clone());
                    combination
                })
            })
            .collect()
    })
}

/// Returns true if the object's keys are data rather than field names.
///
/// Either the path is a configured key-value prefix, or the object follows the
/// headers pattern: `{Name: {subfield: ["..."]}}`.
pub fn is_key_value_object(path: &str, map: &Map<String, Value>, config: &CenseyeConfig) -> bool {
    config.is_key_value_prefix(path) || is_headers_pattern(map)
}

/// Every child is a non-empty object whose fields are all arrays of strings.
pub fn is_headers_pattern(map: &Map<String, Value>) -> bool {
    !map.is_empty()
        && map.values().all(|child| match child {
            Value::Object(inner) => !inner.is_empty() && inner.values().all(is_string_array),
            _ => false,
        })
}

fn is_string_array(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.iter().all(Value::is_string),
        _ => false,
    }
}

/// Natural string form of a scalar. Empty strings carry no pivot value.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
