//! Subcommand execution.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::output::{render_host_history, render_investigation, render_web_property_history};
use crate::censeye::{investigate_host, investigate_host_by_id, Investigation};
use crate::client::CensysApi;
use crate::config::{
    CenseyeArgs, CenseyeConfig, Cli, Command, Config, HistoryArgs, HistoryTarget,
};
use crate::history::{get_host_history, get_web_property_history, PartialResult};

/// How a command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Everything requested was collected
    Complete,
    /// Results were printed, but the walk was interrupted
    Partial,
}

/// Runs the parsed subcommand against `client` and prints the result to stdout.
///
/// Requests are scoped to `config.organization_id`.
///
/// # Errors
///
/// Returns an error for hard failures: unreadable configuration or input,
/// a failing first request, or cancellation before anything was collected.
pub async fn run_command<C: CensysApi>(
    cli: &Cli,
    config: &Config,
    client: &C,
    cancel: &CancellationToken,
) -> Result<Outcome> {
    let org_id = config.organization_id.as_deref();
    match &cli.command {
        Command::Censeye(args) => {
            let investigation = run_censeye(args, client, cancel, org_id).await?;
            print!("{}", render_investigation(&investigation, cli.output)?);
            Ok(Outcome::Complete)
        }
        Command::History {
            target: HistoryTarget::Host(args),
        } => {
            check_window(args)?;
            let result = get_host_history(client, cancel, org_id, &args.id, args.from, args.to)
                .await
                .with_context(|| format!("Failed to fetch history for host {}", args.id))?;
            print!("{}", render_host_history(&result, cli.output)?);
            Ok(report_partial(&result))
        }
        Command::History {
            target: HistoryTarget::Webproperty(args),
        } => {
            check_window(args)?;
            let result =
                get_web_property_history(client, cancel, org_id, &args.id, args.from, args.to)
                    .await
                    .with_context(|| {
                        format!("Failed to fetch history for web property {}", args.id)
                    })?;
            print!("{}", render_web_property_history(&result, cli.output)?);
            Ok(report_partial(&result))
        }
    }
}

async fn run_censeye<C: CensysApi>(
    args: &CenseyeArgs,
    client: &C,
    cancel: &CancellationToken,
    org_id: Option<&str>,
) -> Result<Investigation> {
    let config = match &args.config {
        Some(path) => CenseyeConfig::load(path)
            .with_context(|| format!("Failed to load CensEye config {}", path.display()))?,
        None => CenseyeConfig::default(),
    };
    let rarity = config
        .rarity
        .with_overrides(args.rarity_min, args.rarity_max)
        .context("Invalid rarity bounds")?;

    let investigation = match &args.input {
        Some(path) => {
            let document = read_document(path)?;
            investigate_host(client, cancel, org_id, &document, rarity, &config).await
        }
        None => investigate_host_by_id(client, cancel, org_id, &args.host_id, rarity, &config).await,
    };
    investigation.with_context(|| format!("CensEye failed for host {}", args.host_id))
}

/// Reads a host document, accepting either the bare resource or the API's
/// `{"result": {"resource": ...}}` envelope.
fn read_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read host document {}", path.display()))?;
    let mut document: Value = serde_json::from_str(&content)
        .with_context(|| format!("Host document {} is not valid JSON", path.display()))?;
    for key in ["result", "resource"] {
        let inner = document.get_mut(key).map(Value::take);
        if let Some(inner) = inner {
            document = inner;
        }
    }
    Ok(document)
}

fn check_window(args: &HistoryArgs) -> Result<()> {
    if args.from > args.to {
        anyhow::bail!(
            "--from ({}) is after --to ({})",
            args.from.to_rfc3339(),
            args.to.to_rfc3339()
        );
    }
    Ok(())
}

fn report_partial<T>(result: &PartialResult<T>) -> Outcome {
    match &result.partial_error {
        Some(e) => {
            log::warn!("Results are incomplete: {}", e);
            Outcome::Partial
        }
        None => Outcome::Complete,
    }
}
