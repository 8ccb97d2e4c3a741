//! Resolve command: intent → preferred product

use std::path::Path;

use anyhow::{Context, Result};
use pantry_core::{resolve_intent, Preferences, ResolvedBy, RuleTable, SnapshotStore};

use super::{format_price, load_config, open_store};

pub fn cmd_resolve(config_path: Option<&Path>, intent: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let rules = config.rule_table().context("Invalid category rules")?;
    let store = open_store(&config)?;

    let preferences = store.load_preferences()?.ok_or_else(|| {
        anyhow::anyhow!("No stored preferences found. Run 'pantry analyze' first.")
    })?;

    println!("{}", describe_resolution(&preferences, &rules, intent));
    Ok(())
}

/// Text shown for a resolved (or unresolved) intent
pub fn describe_resolution(preferences: &Preferences, rules: &RuleTable, intent: &str) -> String {
    let Some(resolution) = resolve_intent(preferences, rules, intent) else {
        return format!("No category matches \"{}\"", intent.trim());
    };

    let via = match resolution.resolved_by {
        ResolvedBy::Alias => "category name",
        ResolvedBy::Rule => "rule match",
    };

    let Some(preference) = resolution.preference else {
        return format!(
            "{} \"{}\" → {} ({}), but it has no purchases yet",
            resolution.category.emoji(),
            intent.trim(),
            resolution.category,
            via
        );
    };

    let default = &preference.default;
    let mut lines = vec![format!(
        "{} \"{}\" → {} ({})",
        resolution.category.emoji(),
        intent.trim(),
        resolution.category,
        via
    )];
    lines.push(format!(
        "   ✅ {} [{}] {} ({}x)",
        default.name,
        default.product_id,
        format_price(default.price_cents),
        default.occurrence_count
    ));
    for alternative in &preference.alternatives {
        lines.push(format!(
            "   • {} [{}] {} ({}x)",
            alternative.name,
            alternative.product_id,
            format_price(alternative.price_cents),
            alternative.occurrence_count
        ));
    }
    lines.join("\n")
}
