//! Snapshot storage with pluggable backends
//!
//! Two documents are persisted after an analysis run:
//! 1. The full purchase history (array of purchase records)
//! 2. The category → preference mapping
//!
//! # Architecture
//!
//! - `SnapshotStore` trait defines the interface for storage backends
//! - `LocalSnapshotStore` writes pretty-printed JSON files to a directory
//! - `MemorySnapshotStore` keeps documents in memory (tests)
//!
//! Persistence is best-effort: `persist` reports failed writes but never
//! touches the analysis it was handed.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::Analysis;
use crate::error::Result;
use crate::models::{Preferences, PurchaseRecord};

mod local;
mod memory;

pub use local::LocalSnapshotStore;
pub use memory::MemorySnapshotStore;

/// File name of the history document
pub const HISTORY_FILE: &str = "history.json";

/// File name of the preferences document
pub const PREFERENCES_FILE: &str = "preferences.json";

/// Trait for snapshot storage backends
pub trait SnapshotStore: Send + Sync {
    /// Human-readable name for this store
    fn name(&self) -> &str;

    /// Replace the stored purchase history
    fn save_history(&self, records: &[PurchaseRecord]) -> Result<()>;

    /// Stored purchase history, `None` if nothing was stored yet
    fn load_history(&self) -> Result<Option<Vec<PurchaseRecord>>>;

    /// Replace the stored preferences
    fn save_preferences(&self, preferences: &Preferences) -> Result<()>;

    /// Stored preferences, `None` if nothing was stored yet
    fn load_preferences(&self) -> Result<Option<Preferences>>;
}

/// Outcome of a best-effort persist
#[derive(Debug, Clone, Default, Serialize)]
pub struct PersistReport {
    pub history_saved: bool,
    pub preferences_saved: bool,
    /// One message per failed write
    pub errors: Vec<String>,
}

impl PersistReport {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Write the history and the analysis' preferences, logging failures
///
/// Without an analysis (no purchase records) an empty preferences document
/// is written, so the two snapshots never describe different histories.
pub fn persist(
    store: &dyn SnapshotStore,
    history: &[PurchaseRecord],
    analysis: Option<&Analysis>,
) -> PersistReport {
    let mut report = PersistReport::default();

    match store.save_history(history) {
        Ok(()) => {
            info!("Saved {} history records to {}", history.len(), store.name());
            report.history_saved = true;
        }
        Err(e) => {
            warn!("Failed to save history to {}: {}", store.name(), e);
            report.errors.push(format!("history: {}", e));
        }
    }

    let empty = Preferences::new();
    let preferences = analysis.map(|a| &a.preferences).unwrap_or(&empty);
    match store.save_preferences(preferences) {
        Ok(()) => {
            info!(
                "Saved {} category preferences to {}",
                preferences.len(),
                store.name()
            );
            report.preferences_saved = true;
        }
        Err(e) => {
            warn!("Failed to save preferences to {}: {}", store.name(), e);
            report.errors.push(format!("preferences: {}", e));
        }
    }

    report
}

/// Default snapshot directory
pub fn default_snapshot_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pantry")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::error::Error;

    fn records() -> Vec<PurchaseRecord> {
        vec![PurchaseRecord {
            product_id: "s1".to_string(),
            name: "Halfvolle melk".to_string(),
            price_cents: 115,
            unit_label: "1 liter".to_string(),
            quantity: 1,
            occurred_at: "2024-01-01T10:00:00Z".to_string(),
        }]
    }

    /// Store whose writes always fail
    struct BrokenStore;

    impl SnapshotStore for BrokenStore {
        fn name(&self) -> &str {
            "broken"
        }
        fn save_history(&self, _: &[PurchaseRecord]) -> Result<()> {
            Err(Error::Snapshot("disk full".into()))
        }
        fn load_history(&self) -> Result<Option<Vec<PurchaseRecord>>> {
            Ok(None)
        }
        fn save_preferences(&self, _: &Preferences) -> Result<()> {
            Err(Error::Snapshot("disk full".into()))
        }
        fn load_preferences(&self) -> Result<Option<Preferences>> {
            Ok(None)
        }
    }

    #[test]
    fn test_persist_writes_both_documents() {
        let store = MemorySnapshotStore::new();
        let records = records();
        let analysis = analyze(&records).unwrap().into_analysis().unwrap();

        let report = persist(&store, &records, Some(&analysis));
        assert!(report.is_complete());
        assert!(report.history_saved && report.preferences_saved);
        assert_eq!(store.load_history().unwrap().unwrap(), records);
        assert_eq!(
            store.load_preferences().unwrap().unwrap(),
            analysis.preferences
        );
    }

    #[test]
    fn test_persist_failure_keeps_analysis() {
        let records = records();
        let analysis = analyze(&records).unwrap().into_analysis().unwrap();
        let before = analysis.preferences.clone();

        let report = persist(&BrokenStore, &records, Some(&analysis));
        assert!(!report.is_complete());
        assert_eq!(report.errors.len(), 2);
        assert!(!report.history_saved);
        assert_eq!(analysis.preferences, before);
    }

    #[test]
    fn test_persist_without_analysis_clears_preferences() {
        let store = MemorySnapshotStore::new();
        let report = persist(&store, &[], None);
        assert!(report.history_saved);
        assert!(report.preferences_saved);
        assert_eq!(store.load_history().unwrap(), Some(vec![]));
        assert_eq!(store.load_preferences().unwrap(), Some(Preferences::new()));
    }

    #[test]
    fn test_empty_run_after_full_run_keeps_snapshots_consistent() {
        let store = MemorySnapshotStore::new();
        let records = records();
        let analysis = analyze(&records).unwrap().into_analysis().unwrap();
        persist(&store, &records, Some(&analysis));
        assert_eq!(store.load_preferences().unwrap().unwrap().len(), 1);

        let empty = analyze(&[]).unwrap();
        let report = persist(&store, &[], empty.analysis());
        assert!(report.is_complete());
        assert!(store.load_history().unwrap().unwrap().is_empty());
        assert!(store.load_preferences().unwrap().unwrap().is_empty());
    }
}
