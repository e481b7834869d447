//! JSON file store for the native binary
//!
//! The whole map is one JSON object. Writes go to `<path>.tmp` and are
//! renamed over the store so a crash never leaves a half-written file.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::KeyValueStore;
use crate::error::StoreError;

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(Self { path, entries })
    }

    /// Open the store, or start empty if it cannot be read. The next write
    /// replaces an unreadable file.
    pub fn open_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(path.clone()) {
            Ok(store) => store,
            Err(e) => {
                log::warn!("Starting with an empty store: {}", e);
                Self {
                    path,
                    entries: BTreeMap::new(),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }

    fn flush_or_warn(&self) {
        if let Err(e) = self.flush() {
            log::warn!("Store write dropped: {}", e);
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush_or_warn();
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.flush_or_warn();
        }
    }
}
