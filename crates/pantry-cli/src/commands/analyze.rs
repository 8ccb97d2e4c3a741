//! Analyze command: collect history, infer preferences, persist snapshots

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate};
use pantry_core::source::CollectProgressCallback;
use pantry_core::{
    analyze_with, collect_history_with_progress, persist, AnalysisOutcome, CollectOptions,
    DeliverySource, History, PicnicSource, PurchaseRecord,
};
use tracing::debug;

use super::{format_price, load_config, load_stored_history, open_store};

/// Alternatives shown per category in the summary
const SUMMARY_ALTERNATIVES: usize = 2;

/// Flags of `pantry analyze`
#[derive(Debug, Clone, Default)]
pub struct AnalyzeArgs {
    pub from_history: bool,
    pub no_save: bool,
    pub json: bool,
    pub max_deliveries: Option<usize>,
}

pub async fn cmd_analyze(config_path: Option<&Path>, args: AnalyzeArgs) -> Result<()> {
    let config = load_config(config_path)?;
    let rules = config.rule_table().context("Invalid category rules")?;

    let records = if args.from_history {
        let store = open_store(&config)?;
        let records = load_stored_history(&store)?;
        println!(
            "📂 Loaded {} stored records from {}",
            records.len(),
            store.snapshot_dir().display()
        );
        records
    } else {
        let token = std::env::var("PICNIC_AUTH_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "PICNIC_AUTH_TOKEN is not set. Export a session token or use --from-history."
                )
            })?;
        let source = PicnicSource::with_base_url(&config.source.base_url(), token.trim());

        let mut options = config.source.collect_options();
        if let Some(max) = args.max_deliveries {
            options.max_deliveries = max;
        }

        let history = fetch_history(&source, &options).await?;
        print_collection(&history);
        history.records
    };

    let outcome = analyze_with(&records, &rules);

    if outcome.is_empty() {
        // Keep the previous snapshots rather than replacing them with nothing
        println!("ℹ️  No purchase records; stored snapshots left unchanged");
    } else if config.snapshots.enabled && !args.no_save {
        let store = open_store(&config)?;
        let report = persist(&store, &records, outcome.analysis());
        if report.is_complete() {
            println!("💾 Snapshots saved to {}", store.snapshot_dir().display());
        } else {
            for error in &report.errors {
                println!("⚠️  Snapshot not saved ({})", error);
            }
        }
    }

    if args.json {
        println!("{}", render_json(&outcome)?);
    } else {
        println!("{}", render_summary(&outcome, &records));
    }

    Ok(())
}

/// Collect history from a source, logging per-delivery progress
pub async fn fetch_history(
    source: &dyn DeliverySource,
    options: &CollectOptions,
) -> Result<History> {
    let progress: CollectProgressCallback = Box::new(|current, total| {
        debug!("Fetching delivery {}/{}", current, total);
    });
    collect_history_with_progress(source, options, Some(progress))
        .await
        .with_context(|| format!("Failed to list deliveries from {}", source.name()))
}

fn print_collection(history: &History) {
    println!(
        "📦 Collected {} purchase records from {} of {} deliveries",
        history.records.len(),
        history.deliveries_fetched,
        history.deliveries_listed
    );
    if !history.skipped_deliveries.is_empty() {
        println!(
            "⚠️  Skipped {} deliveries (run with --verbose for details)",
            history.skipped_deliveries.len()
        );
    }
}

/// Earliest and latest purchase date among records with a parseable timestamp
pub fn history_span(records: &[PurchaseRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let dates = records.iter().filter_map(|r| {
        DateTime::parse_from_rfc3339(&r.occurred_at)
            .ok()
            .map(|dt| dt.date_naive())
    });
    dates.fold(None, |span, date| match span {
        None => Some((date, date)),
        Some((first, last)) => Some((first.min(date), last.max(date))),
    })
}

/// JSON document for `--json`
pub fn render_json(outcome: &AnalysisOutcome) -> Result<String> {
    let value = match outcome.analysis() {
        Some(analysis) => serde_json::json!({
            "fingerprint": analysis.fingerprint()?,
            "analysis": analysis,
        }),
        None => serde_json::json!({ "recordCount": 0 }),
    };
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Human-facing summary of an analysis
pub fn render_summary(outcome: &AnalysisOutcome, records: &[PurchaseRecord]) -> String {
    let Some(analysis) = outcome.analysis() else {
        return "No products found in the purchase history.".to_string();
    };

    let mut lines = Vec::new();

    lines.push(String::new());
    match history_span(records) {
        Some((first, last)) => lines.push(format!(
            "🛒 {} purchases of {} products, {} to {}",
            analysis.record_count,
            analysis.ranked.len(),
            first.format("%Y-%m-%d"),
            last.format("%Y-%m-%d")
        )),
        None => lines.push(format!(
            "🛒 {} purchases of {} products",
            analysis.record_count,
            analysis.ranked.len()
        )),
    }

    lines.push(String::new());
    lines.push("📊 Most purchased".to_string());
    lines.push("   ─────────────────────────────────────────────────────────────".to_string());
    for (i, product) in analysis.display_products().iter().enumerate() {
        lines.push(format!(
            "   {}. {} ({}x) {}",
            i + 1,
            product.name,
            product.occurrence_count,
            format_price(product.price_cents)
        ));
    }

    lines.push(String::new());
    lines.push("🧺 Preferences".to_string());
    lines.push("   ─────────────────────────────────────────────────────────────".to_string());
    if analysis.preferences.is_empty() {
        lines.push("   No product matched a category rule.".to_string());
    }
    for (category, preference) in &analysis.preferences {
        let default = &preference.default;
        lines.push(format!(
            "   {} {}: {} [{}] ({}x)",
            category.emoji(),
            category,
            default.name,
            default.product_id,
            default.occurrence_count
        ));
        if !preference.alternatives.is_empty() {
            let names: Vec<_> = preference
                .alternatives
                .iter()
                .take(SUMMARY_ALTERNATIVES)
                .map(|p| p.name.as_str())
                .collect();
            lines.push(format!("      also: {}", names.join(", ")));
        }
    }

    let unclassified = analysis.unclassified().len();
    if unclassified > 0 {
        lines.push(String::new());
        lines.push(format!("❓ {} products matched no category", unclassified));
    }

    if let Ok(fingerprint) = analysis.fingerprint() {
        lines.push(String::new());
        lines.push(format!("🔑 Fingerprint: {}", &fingerprint[..16]));
    }

    lines.join("\n")
}
