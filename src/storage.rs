//! Storage layer for trellolite
//!
//! The whole application state is persisted as one JSON document. Two
//! backends implement [`StateBackend`]:
//!
//! - [`Storage`]: a data directory on disk
//! - [`MemoryStorage`]: an in-process blob, for tests and embedding
//!
//! # Directory Structure
//!
//! ```text
//! <data_dir>/
//!   trellolite.toml              # Optional configuration
//!   trellolite_data.json         # Persisted AppState
//!   trellolite_data.json.lock    # Advisory write lock
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use directories::ProjectDirs;

use crate::error::{Error, Result};
use crate::lock::{self, DEFAULT_LOCK_TIMEOUT_MS};
use crate::model::AppState;

/// Default name of the persisted state file (the fixed storage key)
pub const STATE_FILE: &str = "trellolite_data.json";

/// Name of the optional configuration file inside the data directory
pub const CONFIG_FILE: &str = "trellolite.toml";

/// Where a [`crate::store::Store`] reads and writes its state.
pub trait StateBackend {
    /// Raw persisted document, or `None` when nothing has been saved yet
    fn read_raw(&self) -> Result<Option<String>>;

    /// Replace the persisted document
    fn write_raw(&self, contents: &str) -> Result<()>;

    /// Decode the persisted state; `Ok(None)` when absent
    fn load(&self) -> Result<Option<AppState>> {
        match self.read_raw()? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, state: &AppState) -> Result<()> {
        let json = serde_json::to_string_pretty(state)?;
        self.write_raw(&json)
    }
}

/// On-disk storage rooted at a data directory
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
    state_file: String,
}

impl Storage {
    pub fn new(data_dir: PathBuf) -> Self {
        Self::with_state_file(data_dir, STATE_FILE)
    }

    pub fn with_state_file(data_dir: PathBuf, state_file: impl Into<String>) -> Self {
        Self {
            data_dir,
            state_file: state_file.into(),
        }
    }

    /// Platform data directory (e.g. `~/.local/share/trellolite`)
    pub fn default_data_dir() -> Result<PathBuf> {
        ProjectDirs::from("", "", "trellolite")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                Error::InvalidConfig(
                    "could not determine a data directory; pass --data-dir".to_string(),
                )
            })
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn state_file(&self) -> PathBuf {
        self.data_dir.join(&self.state_file)
    }

    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }

    /// Create the data directory if needed
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}

impl StateBackend for Storage {
    fn read_raw(&self) -> Result<Option<String>> {
        let path = self.state_file();
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn write_raw(&self, contents: &str) -> Result<()> {
        lock::write_atomic_locked(self.state_file(), contents.as_bytes(), DEFAULT_LOCK_TIMEOUT_MS)
    }
}

/// In-memory backend. Clones share the same blob, so a test can keep a handle
/// and inspect what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    blob: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-loaded with an arbitrary document
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            blob: Arc::new(Mutex::new(Some(raw.into()))),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.blob
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl StateBackend for MemoryStorage {
    fn read_raw(&self) -> Result<Option<String>> {
        Ok(self.raw())
    }

    fn write_raw(&self, contents: &str) -> Result<()> {
        let mut blob = self
            .blob
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *blob = Some(contents.to_string());
        Ok(())
    }
}
