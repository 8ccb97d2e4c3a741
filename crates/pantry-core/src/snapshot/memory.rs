//! In-memory snapshot store

use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::models::{Preferences, PurchaseRecord};

use super::SnapshotStore;

/// Snapshot store that keeps documents in memory
#[derive(Default)]
pub struct MemorySnapshotStore {
    history: Mutex<Option<Vec<PurchaseRecord>>>,
    preferences: Mutex<Option<Preferences>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> Error {
    Error::Snapshot("snapshot lock poisoned".into())
}

impl SnapshotStore for MemorySnapshotStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn save_history(&self, records: &[PurchaseRecord]) -> Result<()> {
        *self.history.lock().map_err(poisoned)? = Some(records.to_vec());
        Ok(())
    }

    fn load_history(&self) -> Result<Option<Vec<PurchaseRecord>>> {
        Ok(self.history.lock().map_err(poisoned)?.clone())
    }

    fn save_preferences(&self, preferences: &Preferences) -> Result<()> {
        *self.preferences.lock().map_err(poisoned)? = Some(preferences.clone());
        Ok(())
    }

    fn load_preferences(&self) -> Result<Option<Preferences>> {
        Ok(self.preferences.lock().map_err(poisoned)?.clone())
    }
}
