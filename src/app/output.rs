//! Result rendering for stdout.
//!
//! Plain output is meant for terminals (colored, one row per item); JSON
//! output is the serialized result, pretty-printed.

use std::fmt::Write as _;

use colored::Colorize;
use serde::Serialize;

use crate::censeye::Investigation;
use crate::client::HistoryEvent;
use crate::config::OutputFormat;
use crate::history::{PartialResult, WebPropertySnapshot};

fn to_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Renders a CensEye report. Interesting pivots are highlighted and starred.
pub fn render_investigation(
    investigation: &Investigation,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    if format == OutputFormat::Json {
        return to_json(investigation);
    }

    let mut out = String::new();
    if investigation.entries.is_empty() {
        let _ = writeln!(
            out,
            "No pivots shared with other hosts ({} rules checked)",
            investigation.rules_counted
        );
        return Ok(out);
    }

    let _ = writeln!(out, "{:>10}  {}", "COUNT".bold(), "QUERY".bold());
    for entry in &investigation.entries {
        let row = format!(
            "{:>10} {} {}",
            entry.count,
            if entry.interesting { "*" } else { " " },
            entry.query
        );
        if entry.interesting {
            let _ = writeln!(out, "{}", row.green());
        } else {
            let _ = writeln!(out, "{}", row);
        }
        if let Some(url) = &entry.search_url {
            let _ = writeln!(out, "{:>10}   {}", "", url.dimmed());
        }
    }
    let interesting = investigation.entries.iter().filter(|e| e.interesting).count();
    let _ = writeln!(
        out,
        "{} pivot{} ({} interesting) from {} rules",
        investigation.entries.len(),
        if investigation.entries.len() == 1 { "" } else { "s" },
        interesting,
        investigation.rules_counted
    );
    Ok(out)
}

/// Renders host timeline events, one compact JSON resource per line.
pub fn render_host_history(
    result: &PartialResult<Vec<HistoryEvent>>,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    if format == OutputFormat::Json {
        return to_json(result);
    }

    let mut out = String::new();
    for event in &result.data {
        let time = event
            .event_time
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{}  {}",
            time.cyan(),
            serde_json::to_string(&event.resource)?
        );
    }
    let _ = writeln!(
        out,
        "{} event{}{}",
        result.data.len(),
        if result.data.len() == 1 { "" } else { "s" },
        partial_suffix(result)
    );
    Ok(out)
}

/// Renders daily web property snapshots.
pub fn render_web_property_history(
    result: &PartialResult<Vec<WebPropertySnapshot>>,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    if format == OutputFormat::Json {
        return to_json(result);
    }

    let mut out = String::new();
    for snapshot in &result.data {
        let records = snapshot.data.as_ref().map_or(0, Vec::len);
        let status = if snapshot.exists {
            "present".green()
        } else {
            "absent".red()
        };
        let _ = writeln!(
            out,
            "{}  {:<8}  {} record{}",
            snapshot.time.format("%Y-%m-%d %H:%M:%S"),
            status,
            records,
            if records == 1 { "" } else { "s" }
        );
    }
    let present = result.data.iter().filter(|s| s.exists).count();
    let _ = writeln!(
        out,
        "{} of {} days with data{}",
        present,
        result.data.len(),
        partial_suffix(result)
    );
    Ok(out)
}

fn partial_suffix<T>(result: &PartialResult<T>) -> String {
    match &result.partial_error {
        Some(e) => format!(" {}", format!("(partial: {})", e).yellow()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::censeye::ReportEntry;
    use crate::error_handling::HistoryError;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn investigation() -> Investigation {
        Investigation {
            entries: vec![
                ReportEntry {
                    count: 250,
                    query: r#"services.port="443""#.to_string(),
                    interesting: false,
                    search_url: None,
                },
                ReportEntry {
                    count: 3,
                    query: r#"services.software.product="nginx""#.to_string(),
                    interesting: true,
                    search_url: Some("https://platform.censys.io/search?q=x".to_string()),
                },
            ],
            rules_compiled: 10,
            rules_counted: 8,
            meta: None,
        }
    }

    #[test]
    fn test_render_investigation_plain() {
        colored::control::set_override(false);
        let out = render_investigation(&investigation(), OutputFormat::Plain).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].contains("COUNT"));
        assert!(lines[1].contains("250") && lines[1].contains(r#"services.port="443""#));
        assert!(!lines[1].contains('*'));
        assert!(lines[2].contains("* services.software.product"));
        assert!(lines[3].contains("https://platform.censys.io/search?q=x"));
        assert!(out.ends_with("2 pivots (1 interesting) from 8 rules\n"));
    }

    #[test]
    fn test_render_investigation_empty() {
        let empty = Investigation {
            entries: vec![],
            rules_compiled: 0,
            rules_counted: 0,
            meta: None,
        };
        let out = render_investigation(&empty, OutputFormat::Plain).unwrap();
        assert!(out.starts_with("No pivots"));
    }

    #[test]
    fn test_render_investigation_json() {
        let out = render_investigation(&investigation(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["entries"][1]["interesting"], json!(true));
        assert_eq!(value["rules_counted"], json!(8));
        assert!(value["entries"][0].get("search_url").is_none());
    }

    #[test]
    fn test_render_partial_history() {
        colored::control::set_override(false);
        let result = PartialResult {
            data: vec![HistoryEvent::from_value(json!({
                "resource": {"event_time": "2024-01-02T00:00:00Z", "service_scanned": {}}
            }))],
            meta: None,
            partial_error: Some(HistoryError::Cancelled),
        };
        let plain = render_host_history(&result, OutputFormat::Plain).unwrap();
        assert!(plain.starts_with("2024-01-02T00:00:00+00:00"));
        assert!(plain.contains("1 event (partial: "));

        let value: serde_json::Value =
            serde_json::from_str(&render_host_history(&result, OutputFormat::Json).unwrap())
                .unwrap();
        assert!(value["partial_error"].is_string());
        assert_eq!(value["data"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_render_web_property_history() {
        colored::control::set_override(false);
        let day = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let result = PartialResult {
            data: vec![
                WebPropertySnapshot {
                    time: day,
                    exists: true,
                    data: Some(vec![json!({"hostname": "example.com", "port": 443, "endpoints": [1]})]),
                },
                WebPropertySnapshot {
                    time: day + chrono::Days::new(1),
                    exists: false,
                    data: None,
                },
            ],
            meta: None,
            partial_error: None,
        };
        let out = render_web_property_history(&result, OutputFormat::Plain).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("2024-01-01 00:00:00  present"));
        assert!(lines[0].ends_with("1 record"));
        assert!(lines[1].contains("absent") && lines[1].ends_with("0 records"));
        assert_eq!(lines[2], "1 of 2 days with data");
    }
}
