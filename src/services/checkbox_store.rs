//! Checkbox state persistence
//!
//! Stores the per-row "bought" / "on sale" marks so they survive restarts.
//! The whole mapping lives in one JSON document named after the storage key.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::types::{CheckboxState, Result, StoreWarning, UndermineError};

/// Storage key for the checkbox mapping
pub const STORAGE_KEY: &str = "checkbox_states_v1";

/// Key-value persistence for checkbox marks
pub trait CheckboxStore {
    /// Read the persisted mapping. A missing store is an empty mapping.
    fn load(&self) -> std::result::Result<CheckboxState, StoreWarning>;

    /// Replace the persisted mapping
    fn save(&self, state: &CheckboxState) -> Result<()>;
}

/// JSON file store under the data directory
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(format!("{}.json", STORAGE_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CheckboxStore for JsonFileStore {
    /// Uses a shared file lock for concurrent read safety.
    fn load(&self) -> std::result::Result<CheckboxState, StoreWarning> {
        if !self.path.exists() {
            return Ok(CheckboxState::new());
        }

        let file = File::open(&self.path)
            .map_err(|e| StoreWarning::LoadFailed(format!("Failed to open store: {}", e)))?;

        file.lock_shared().map_err(|e| {
            StoreWarning::LoadFailed(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut content = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut content);
        let _ = file.unlock();
        read.map_err(|e| StoreWarning::LoadFailed(format!("Failed to read store: {}", e)))?;

        let state: CheckboxState = serde_json::from_str(&content)
            .map_err(|e| StoreWarning::Corrupted(format!("Corrupted store file: {}", e)))?;

        debug!(path = %self.path.display(), entries = state.len(), "checkbox store loaded");
        Ok(state)
    }

    /// Save using atomic write (temp file + rename) with exclusive lock.
    fn save(&self, state: &CheckboxState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string(state)
            .map_err(|e| UndermineError::Store(format!("Serialization failed: {}", e)))?;

        let temp_path = self.path.with_extension("json.tmp");
        {
            let mut file = File::create(&temp_path)
                .map_err(|e| UndermineError::Store(format!("Failed to create temp file: {}", e)))?;
            file.write_all(content.as_bytes())
                .map_err(|e| UndermineError::Store(format!("Failed to write temp file: {}", e)))?;
            file.sync_all()
                .map_err(|e| UndermineError::Store(format!("Failed to sync temp file: {}", e)))?;
        }

        let target = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;

        target
            .lock_exclusive()
            .map_err(|e| UndermineError::Store(format!("Failed to acquire write lock: {}", e)))?;

        fs::rename(&temp_path, &self.path)
            .map_err(|e| UndermineError::Store(format!("Failed to rename temp file: {}", e)))?;

        let _ = target.unlock();
        Ok(())
    }
}

/// In-memory store for tests
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    pub state: std::cell::RefCell<CheckboxState>,
    pub saves: std::cell::Cell<usize>,
    pub fail_writes: bool,
}

#[cfg(test)]
impl CheckboxStore for MemoryStore {
    fn load(&self) -> std::result::Result<CheckboxState, StoreWarning> {
        Ok(self.state.borrow().clone())
    }

    fn save(&self, state: &CheckboxState) -> Result<()> {
        if self.fail_writes {
            return Err(UndermineError::Store("disk full".into()));
        }
        self.saves.set(self.saves.get() + 1);
        *self.state.borrow_mut() = state.clone();
        Ok(())
    }
}
