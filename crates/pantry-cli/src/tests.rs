//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use pantry_core::{
    analyze, CollectOptions, LocalSnapshotStore, MockSource, PurchaseRecord, RuleTable,
    SnapshotStore,
};
use tempfile::TempDir;

use crate::commands::{self, format_price, AnalyzeArgs};

fn record(id: &str, name: &str, price_cents: u32, occurred_at: &str) -> PurchaseRecord {
    PurchaseRecord {
        product_id: id.to_string(),
        name: name.to_string(),
        price_cents,
        unit_label: "1 stuk".to_string(),
        quantity: 1,
        occurred_at: occurred_at.to_string(),
    }
}

fn sample_records() -> Vec<PurchaseRecord> {
    vec![
        record("m1", "Halfvolle melk", 115, "2024-03-08T17:00:00+01:00"),
        record("m1", "Halfvolle melk", 115, "2024-03-01T17:00:00+01:00"),
        record("m1", "Halfvolle melk", 115, "2024-02-23T17:00:00+01:00"),
        record("m2", "Volle melk", 125, "2024-02-23T17:00:00+01:00"),
        record("m3", "Havermelk", 0, "2024-02-16T17:00:00+01:00"),
        record("m4", "Sojamelk", 199, "2024-02-16T17:00:00+01:00"),
        record("g1", "Cadeaubon", 2500, "2024-02-16T17:00:00+01:00"),
    ]
}

/// Temp dir with a config file whose snapshot dir lives inside it
fn setup_config() -> (TempDir, PathBuf, PathBuf) {
    let dir = TempDir::new().unwrap();
    let snapshots = dir.path().join("snapshots");
    let config = dir.path().join("config.toml");
    std::fs::write(
        &config,
        format!(
            "[source]\nthrottle_ms = 0\n\n[snapshots]\ndir = \"{}\"\nenabled = true\n",
            snapshots.display()
        ),
    )
    .unwrap();
    (dir, config, snapshots)
}

fn store_history(snapshots: &Path, records: &[PurchaseRecord]) -> LocalSnapshotStore {
    let store = LocalSnapshotStore::new(snapshots).unwrap();
    store.save_history(records).unwrap();
    store
}

// ========== Helper Tests ==========

#[test]
fn test_format_price() {
    assert_eq!(format_price(0), "?");
    assert_eq!(format_price(5), "€0.05");
    assert_eq!(format_price(115), "€1.15");
    assert_eq!(format_price(2500), "€25.00");
}

#[test]
fn test_history_span() {
    let span = commands::history_span(&sample_records()).unwrap();
    assert_eq!(span.0, NaiveDate::from_ymd_opt(2024, 2, 16).unwrap());
    assert_eq!(span.1, NaiveDate::from_ymd_opt(2024, 3, 8).unwrap());

    let unparsable = vec![record("x", "Melk", 0, "")];
    assert!(commands::history_span(&unparsable).is_none());
}

// ========== Summary Rendering Tests ==========

#[test]
fn test_render_summary_empty() {
    let outcome = analyze(&[]).unwrap();
    let text = commands::render_summary(&outcome, &[]);
    assert!(text.contains("No products found"));
}

#[test]
fn test_render_summary() {
    let records = sample_records();
    let outcome = analyze(&records).unwrap();
    let text = commands::render_summary(&outcome, &records);

    assert!(text.contains("2024-02-16 to 2024-03-08"));
    assert!(text.contains("1. Halfvolle melk (3x) €1.15"));
    assert!(text.contains("Havermelk (1x) ?"));
    assert!(text.contains("dairy-milk: Halfvolle melk [m1] (3x)"));
    // Three alternatives exist, two are shown
    assert!(text.contains("also: Volle melk, Havermelk"));
    assert!(!text.contains("also: Volle melk, Havermelk, Sojamelk"));
    assert!(text.contains("1 products matched no category"));
}

#[test]
fn test_render_summary_prints_full_names() {
    let long_name = "Biologische halfvolle melk van de boerderij, extra romig 1 liter";
    assert!(long_name.chars().count() > 48);
    let records = vec![
        record("m1", long_name, 129, "2024-03-08T17:00:00+01:00"),
        record("m1", long_name, 129, "2024-03-01T17:00:00+01:00"),
    ];
    let outcome = analyze(&records).unwrap();
    let text = commands::render_summary(&outcome, &records);

    assert!(text.contains(&format!("1. {} (2x) €1.29", long_name)));
    assert!(text.contains(&format!("dairy-milk: {} [m1] (2x)", long_name)));
    assert!(!text.contains("..."));
}

#[test]
fn test_render_json() {
    let records = sample_records();
    let outcome = analyze(&records).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&commands::render_json(&outcome).unwrap()).unwrap();

    assert_eq!(json["fingerprint"].as_str().unwrap().len(), 64);
    assert_eq!(json["analysis"]["recordCount"], 7);
    assert_eq!(
        json["analysis"]["topProducts"].as_array().unwrap().len(),
        5
    );
    assert!(json["analysis"].get("record_count").is_none());
    assert_eq!(
        json["analysis"]["preferences"]["dairy-milk"]["default"]["productId"],
        "m1"
    );

    let empty: serde_json::Value =
        serde_json::from_str(&commands::render_json(&analyze(&[]).unwrap()).unwrap()).unwrap();
    assert_eq!(empty["recordCount"], 0);
}

// ========== Classify / Resolve Tests ==========

#[test]
fn test_describe_classification() {
    let rules = RuleTable::grocery().unwrap();

    let text = commands::describe_classification(&rules, "Oude kaas plak");
    assert!(text.contains("→ cheese"));
    assert!(text.contains("pattern:"));

    let text = commands::describe_classification(&rules, "Cadeaubon");
    assert!(text.contains("→ other (no rule matched)"));
}

#[test]
fn test_describe_resolution() {
    let rules = RuleTable::grocery().unwrap();
    let analysis = analyze(&sample_records())
        .unwrap()
        .into_analysis()
        .unwrap();

    let text = commands::describe_resolution(&analysis.preferences, &rules, "melk");
    assert!(text.contains("→ dairy-milk (category name)"));
    assert!(text.contains("✅ Halfvolle melk [m1] €1.15 (3x)"));
    assert!(text.contains("• Sojamelk [m4]"));

    let text = commands::describe_resolution(&analysis.preferences, &rules, "brood");
    assert!(text.contains("no purchases yet"));

    let text = commands::describe_resolution(&analysis.preferences, &rules, "cadeaubon");
    assert!(text.contains("No category matches"));
}

#[test]
fn test_cmd_classify() {
    let (_dir, config, _) = setup_config();
    assert!(commands::cmd_classify(Some(&config), "Halfvolle melk").is_ok());
}

#[test]
fn test_cmd_resolve_requires_preferences() {
    let (_dir, config, _) = setup_config();
    let result = commands::cmd_resolve(Some(&config), "melk");
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("No stored preferences"));
}

// ========== Analyze Command Tests ==========

#[tokio::test]
async fn test_fetch_history_from_mock_source() {
    let source = MockSource::new()
        .with_delivery("D-2", "2024-02-09T17:00:00Z", &[("s1", "Halfvolle melk", 2)])
        .with_delivery("D-1", "2024-02-02T17:00:00Z", &[("s2", "Volkoren brood", 1)])
        .failing("D-1");
    let options = CollectOptions {
        throttle: Duration::ZERO,
        ..Default::default()
    };

    let history = commands::fetch_history(&source, &options).await.unwrap();
    assert_eq!(history.records.len(), 1);
    assert_eq!(history.skipped_deliveries.len(), 1);

    let failing = MockSource::new().failing_list();
    let err = commands::fetch_history(&failing, &options)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Failed to list deliveries"));
}

#[tokio::test]
async fn test_cmd_analyze_from_history_persists_preferences() {
    let (_dir, config, snapshots) = setup_config();
    let store = store_history(&snapshots, &sample_records());

    let args = AnalyzeArgs {
        from_history: true,
        ..Default::default()
    };
    commands::cmd_analyze(Some(&config), args).await.unwrap();

    let preferences = store.load_preferences().unwrap().unwrap();
    assert_eq!(
        preferences[&pantry_core::Category::DairyMilk]
            .default
            .product_id,
        "m1"
    );
}

#[tokio::test]
async fn test_cmd_analyze_no_save() {
    let (_dir, config, snapshots) = setup_config();
    let store = store_history(&snapshots, &sample_records());

    let args = AnalyzeArgs {
        from_history: true,
        no_save: true,
        json: true,
        ..Default::default()
    };
    commands::cmd_analyze(Some(&config), args).await.unwrap();
    assert!(store.load_preferences().unwrap().is_none());
}

#[tokio::test]
async fn test_cmd_analyze_empty_history_writes_nothing() {
    let (_dir, config, snapshots) = setup_config();
    let store = store_history(&snapshots, &[]);

    let args = AnalyzeArgs {
        from_history: true,
        ..Default::default()
    };
    commands::cmd_analyze(Some(&config), args).await.unwrap();

    // No preferences appear next to an empty history
    assert!(store.load_history().unwrap().unwrap().is_empty());
    assert!(store.load_preferences().unwrap().is_none());
}

#[tokio::test]
async fn test_cmd_analyze_from_missing_history() {
    let (_dir, config, _) = setup_config();
    let args = AnalyzeArgs {
        from_history: true,
        ..Default::default()
    };
    let result = commands::cmd_analyze(Some(&config), args).await;
    assert!(result.is_err());
}

// ========== Export Command Tests ==========

#[test]
fn test_cmd_export_csv_to_file() {
    let (dir, config, snapshots) = setup_config();
    store_history(&snapshots, &sample_records());
    let output = dir.path().join("top.csv");

    commands::cmd_export(Some(&config), "csv", Some(&output)).unwrap();

    let csv = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines.len(), 6);
    assert!(lines[0].starts_with("rank,productId,name"));
    assert!(lines[1].starts_with("1,m1,Halfvolle melk"));
}

#[test]
fn test_cmd_export_json_to_file() {
    let (dir, config, snapshots) = setup_config();
    store_history(&snapshots, &sample_records());
    let output = dir.path().join("top.json");

    commands::cmd_export(Some(&config), "json", Some(&output)).unwrap();

    let products: Vec<pantry_core::ProductStats> =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(products.len(), 5);
    assert_eq!(products[0].occurrence_count, 3);
}

#[test]
fn test_cmd_export_invalid_format() {
    let (dir, config, snapshots) = setup_config();
    store_history(&snapshots, &sample_records());
    let output = dir.path().join("top.xml");

    assert!(commands::cmd_export(Some(&config), "xml", Some(&output)).is_err());
    assert!(!output.exists());
}
