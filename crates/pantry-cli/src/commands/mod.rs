//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `analyze` - Fetch or reload history, analyze, persist, render summary
//! - `resolve` - Intent resolution against stored preferences
//! - `classify` - Rule table lookup for a single product name
//! - `export` - Top-products export of the stored history

pub mod analyze;
pub mod classify;
pub mod export;
pub mod resolve;

// Re-export command functions for main.rs
pub use analyze::*;
pub use classify::*;
pub use export::*;
pub use resolve::*;

use std::path::Path;

use anyhow::{Context, Result};
use pantry_core::{Config, LocalSnapshotStore, PurchaseRecord, SnapshotStore};

/// Load config from an explicit path or the default locations
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    Config::load(path).context("Failed to load configuration")
}

/// Open the snapshot store the config points at
pub fn open_store(config: &Config) -> Result<LocalSnapshotStore> {
    LocalSnapshotStore::new(&config.snapshots.dir).with_context(|| {
        format!(
            "Failed to open snapshot directory {}",
            config.snapshots.dir.display()
        )
    })
}

/// Stored history, or an error telling the user how to create it
pub fn load_stored_history(store: &dyn SnapshotStore) -> Result<Vec<PurchaseRecord>> {
    store
        .load_history()?
        .ok_or_else(|| anyhow::anyhow!("No stored history found. Run 'pantry analyze' first."))
}

/// Format a price in cents as euros, `?` when unknown
pub fn format_price(cents: u32) -> String {
    if cents == 0 {
        "?".to_string()
    } else {
        format!("€{}.{:02}", cents / 100, cents % 100)
    }
}
