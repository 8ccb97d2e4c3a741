//! Classify command: match a product name against the rule table

use std::path::Path;

use anyhow::{Context, Result};
use pantry_core::RuleTable;

use super::load_config;

pub fn cmd_classify(config_path: Option<&Path>, name: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let rules = config.rule_table().context("Invalid category rules")?;

    println!("{}", describe_classification(&rules, name));
    Ok(())
}

/// Category of `name` and the rule that assigned it
pub fn describe_classification(rules: &RuleTable, name: &str) -> String {
    match rules.matching_rule(name) {
        Some(rule) => format!(
            "{} \"{}\" → {} (pattern: {})",
            rule.category.emoji(),
            name,
            rule.category,
            rule.pattern()
        ),
        None => {
            let fallback = rules.classify_name(name);
            format!(
                "{} \"{}\" → {} (no rule matched)",
                fallback.emoji(),
                name,
                fallback
            )
        }
    }
}
