//! Key-value persistence collaborator.
//!
//! The controller only ever stores the recent-searches list, but it talks
//! to storage through this narrow get/set seam so the backing medium stays
//! swappable (in-memory for tests, a JSON file for the CLI, browser
//! storage for an embedding shell).

use std::{collections::HashMap, fs, path::PathBuf};

use anyhow::anyhow;
use directories::ProjectDirs;

pub trait KvStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// A single JSON object on disk. Reads happen once at open; every `set`
/// rewrites the file. Write failures are logged and swallowed — persistence
/// here is best-effort.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at the platform data directory.
    pub fn open_default() -> anyhow::Result<Self> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform data directory"))?;
        Ok(Self::open(dirs.data_dir().join("store.json")))
    }

    /// Open the store at an explicit path. A missing or unreadable file
    /// starts empty.
    pub fn open(path: PathBuf) -> Self {
        let entries = fs::read_to_string(&path)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok())
            .unwrap_or_default();
        Self { path, entries }
    }

    fn flush(&self) {
        if let Some(parent) = self.path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                tracing::warn!(path = %parent.display(), error = %err, "could not create store directory");
                return;
            }
        }
        match serde_json::to_string_pretty(&self.entries) {
            Ok(json) => {
                if let Err(err) = fs::write(&self.path, json) {
                    tracing::warn!(path = %self.path.display(), error = %err, "could not write store file");
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not serialize store contents");
            }
        }
    }
}

impl KvStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush();
    }
}
