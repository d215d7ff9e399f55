//! JSON file backed [`KeyValueStore`].

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use convo_core::{Conversation, CoreError, KeyValueStore};
use tracing::debug;

/// Key holding the conversation records as a JSON array.
pub const CONVERSATIONS_KEY: &str = "conversations";

/// Stores every key in one JSON object on disk.
///
/// Each call reads the file afresh; writes replace it whole.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved conversation records; none when nothing was saved yet.
    pub fn conversations(&self) -> convo_core::Result<Vec<Conversation>> {
        match self.get(CONVERSATIONS_KEY)? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| CoreError::Serialization(format!("{CONVERSATIONS_KEY}: {e}"))),
            None => Ok(Vec::new()),
        }
    }

    /// Replace the saved conversation records.
    pub fn save_conversations(&self, records: &[Conversation]) -> convo_core::Result<()> {
        let raw =
            serde_json::to_string(records).map_err(|e| CoreError::Serialization(e.to_string()))?;
        self.set(CONVERSATIONS_KEY, &raw)
    }

    fn load(&self) -> convo_core::Result<BTreeMap<String, String>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(storage_error(&self.path, e)),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|e| {
            CoreError::Serialization(format!("{}: {}", self.path.display(), e))
        })
    }

    fn save(&self, values: &BTreeMap<String, String>) -> convo_core::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| storage_error(parent, e))?;
        }
        let raw = serde_json::to_string_pretty(values)
            .map_err(|e| CoreError::Serialization(e.to_string()))?;
        fs::write(&self.path, raw).map_err(|e| storage_error(&self.path, e))?;
        debug!(path = %self.path.display(), keys = values.len(), "State file written");
        Ok(())
    }
}

fn storage_error(path: &Path, e: std::io::Error) -> CoreError {
    CoreError::Storage(format!("{}: {}", path.display(), e))
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> convo_core::Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> convo_core::Result<()> {
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        self.save(&values)
    }

    fn remove(&self, key: &str) -> convo_core::Result<()> {
        let mut values = self.load()?;
        if values.remove(key).is_some() {
            self.save(&values)?;
        }
        Ok(())
    }
}
