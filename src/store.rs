//! Scoped key-value persistence for dashboard state
//!
//! The aggregator writes through on every mutation and reads back exactly once
//! at startup. Both directions are fail-soft: a missing or unreadable value is
//! "no prior state", never an error, and a failed write only logs a warning.

use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// Persistence keys, namespaced by the store's scope directory.
///
/// No schema version is stored; any value that fails to deserialize is
/// treated as absent.
pub mod keys {
    /// Serialized snapshot window
    pub const HISTORY: &str = "history";
    /// Wall-clock time of the last applied update
    pub const LAST_UPDATE: &str = "last_update";
    /// Pause flag
    pub const PAUSED: &str = "paused";
    /// Last HTTP-code breakdown (overview pie)
    pub const PIE: &str = "pie";
    /// Last per-URL totals (overview bars)
    pub const BAR: &str = "bar";
}

/// Scoped key-value store
pub trait StateStore {
    /// Read a value; `None` when absent or unreadable
    fn get(&self, key: &str) -> Option<Value>;

    /// Write a value; failures are logged, never raised
    fn set(&self, key: &str, value: &Value);
}

/// File-backed store: one JSON file per key under a scope directory
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: PathBuf) -> anyhow::Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Default scope directory: `<data dir>/logboard`
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("logboard")
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StateStore for FileStore {
    fn get(&self, key: &str) -> Option<Value> {
        let raw = fs::read_to_string(self.path_for(key)).ok()?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding malformed persisted value");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &Value) {
        let path = self.path_for(key);
        if let Err(e) = fs::write(&path, value.to_string()) {
            tracing::warn!(key, path = %path.display(), error = %e, "failed to persist value");
        }
    }
}

/// In-memory store for tests
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &Value) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.clone());
        }
    }
}
