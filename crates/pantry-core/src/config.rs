//! Configuration loading
//!
//! Config is loaded with a two-layer resolution:
//! 1. Explicit path (must exist), or the override in the data dir
//!    (~/.local/share/pantry/config.toml)
//! 2. Fall back to embedded defaults (compiled into binary) when no explicit
//!    path is given and the data dir has no override
//!
//! Environment variables `PICNIC_COUNTRY` and `PANTRY_SNAPSHOT_DIR` take
//! precedence over both layers.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::categorize::{CategoryRule, RuleTable};
use crate::error::{Error, Result};
use crate::models::Category;
use crate::snapshot::default_snapshot_dir;
use crate::source::{default_base_url, CollectOptions, DEFAULT_MAX_DELIVERIES, DEFAULT_THROTTLE};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/pantry.toml");

/// Delivery source settings
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub country: String,
    /// Explicit API base URL; derived from `country` when unset
    pub base_url: Option<String>,
    pub max_deliveries: usize,
    pub throttle: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            country: "NL".to_string(),
            base_url: None,
            max_deliveries: DEFAULT_MAX_DELIVERIES,
            throttle: DEFAULT_THROTTLE,
        }
    }
}

impl SourceConfig {
    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| default_base_url(&self.country))
    }

    pub fn collect_options(&self) -> CollectOptions {
        CollectOptions {
            max_deliveries: self.max_deliveries,
            throttle: self.throttle,
        }
    }
}

/// Snapshot store settings
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    pub dir: PathBuf,
    pub enabled: bool,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            dir: default_snapshot_dir(),
            enabled: true,
        }
    }
}

/// A user rule from the config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleConfig {
    pub category: Category,
    pub pattern: String,
}

/// Full Pantry configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub source: SourceConfig,
    pub snapshots: SnapshotConfig,
    /// Evaluated ahead of the built-in rule table, in file order
    pub rules: Vec<RuleConfig>,
}

impl Config {
    /// Load config, applying environment overrides
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let mut config = load_config(override_path)?;
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(country) = std::env::var("PICNIC_COUNTRY") {
            if !country.trim().is_empty() {
                self.source.country = country.trim().to_string();
            }
        }
        if let Ok(dir) = std::env::var("PANTRY_SNAPSHOT_DIR") {
            if !dir.trim().is_empty() {
                self.snapshots.dir = PathBuf::from(dir.trim());
            }
        }
    }

    /// Built-in rule table with the configured rules ahead of it
    pub fn rule_table(&self) -> Result<RuleTable> {
        let overrides = self
            .rules
            .iter()
            .map(|rule| CategoryRule::new(rule.category, &rule.pattern))
            .collect::<Result<Vec<_>>>()?;
        RuleTable::grocery_with_overrides(overrides)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("pantry").join("config.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<Config> {
    // An explicit path must exist; only the implicit data-dir file is optional
    let path = match override_path {
        Some(path) if !path.exists() => {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|p| p.exists()),
    };

    let content = match path {
        Some(path) => fs::read_to_string(&path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?,
        None => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    source: Option<RawSource>,
    snapshots: Option<RawSnapshots>,
    #[serde(default)]
    rules: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    country: Option<String>,
    base_url: Option<String>,
    max_deliveries: Option<usize>,
    throttle_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawSnapshots {
    dir: Option<PathBuf>,
    enabled: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    category: String,
    pattern: String,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = Config::default();

    if let Some(source) = raw.source {
        if let Some(country) = source.country {
            config.source.country = country;
        }
        config.source.base_url = source.base_url.filter(|u| !u.trim().is_empty());
        if let Some(max) = source.max_deliveries {
            config.source.max_deliveries = max;
        }
        if let Some(ms) = source.throttle_ms {
            config.source.throttle = Duration::from_millis(ms);
        }
    }

    if let Some(snapshots) = raw.snapshots {
        if let Some(dir) = snapshots.dir {
            config.snapshots.dir = dir;
        }
        if let Some(enabled) = snapshots.enabled {
            config.snapshots.enabled = enabled;
        }
    }

    for rule in raw.rules {
        let category: Category = rule
            .category
            .parse()
            .map_err(|e: String| Error::Config(e))?;
        if category.is_fallback() {
            return Err(Error::Config(format!(
                "Rule for '{}' cannot target the fallback category",
                rule.pattern
            )));
        }
        config.rules.push(RuleConfig {
            category,
            pattern: rule.pattern,
        });
    }

    Ok(config)
}
