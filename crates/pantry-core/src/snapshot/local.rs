//! Local filesystem snapshot store

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::{SnapshotStore, HISTORY_FILE, PREFERENCES_FILE};
use crate::error::{Error, Result};
use crate::models::{Preferences, PurchaseRecord};

/// Snapshot store writing JSON documents into a directory
pub struct LocalSnapshotStore {
    /// Directory where snapshots are stored
    snapshot_dir: PathBuf,
}

impl LocalSnapshotStore {
    /// Create a new local store
    ///
    /// Creates the snapshot directory if it doesn't exist.
    pub fn new(snapshot_dir: impl Into<PathBuf>) -> Result<Self> {
        let snapshot_dir = snapshot_dir.into();

        if !snapshot_dir.exists() {
            fs::create_dir_all(&snapshot_dir).map_err(|e| {
                Error::Snapshot(format!(
                    "Failed to create snapshot directory {}: {}",
                    snapshot_dir.display(),
                    e
                ))
            })?;
            info!("Created snapshot directory: {}", snapshot_dir.display());
        }

        Ok(Self { snapshot_dir })
    }

    /// Get the snapshot directory path
    pub fn snapshot_dir(&self) -> &Path {
        &self.snapshot_dir
    }

    pub fn history_path(&self) -> PathBuf {
        self.snapshot_dir.join(HISTORY_FILE)
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.snapshot_dir.join(PREFERENCES_FILE)
    }

    /// Write via a temp file in the same directory, then rename into place
    fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        let tmp = NamedTempFile::new_in(&self.snapshot_dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| Error::Io(e.error))?;
        debug!("Wrote snapshot {}", path.display());
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let value = serde_json::from_str(&content).map_err(|e| {
            Error::Snapshot(format!("Corrupt snapshot {}: {}", path.display(), e))
        })?;
        Ok(Some(value))
    }
}

impl SnapshotStore for LocalSnapshotStore {
    fn name(&self) -> &str {
        "local"
    }

    fn save_history(&self, records: &[PurchaseRecord]) -> Result<()> {
        self.write_json(&self.history_path(), records)
    }

    fn load_history(&self) -> Result<Option<Vec<PurchaseRecord>>> {
        self.read_json(&self.history_path())
    }

    fn save_preferences(&self, preferences: &Preferences) -> Result<()> {
        self.write_json(&self.preferences_path(), preferences)
    }

    fn load_preferences(&self) -> Result<Option<Preferences>> {
        self.read_json(&self.preferences_path())
    }
}
