//! Browser LocalStorage store

use web_sys::Storage;

use super::KeyValueStore;

/// LocalStorage, or nothing when the browser refuses access
/// (private mode, disabled storage). Without storage every read is absent and
/// every write is dropped.
pub struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    pub fn new() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - nothing will be saved");
        }
        Self { storage }
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if storage.set_item(key, value).is_err() {
                log::warn!("LocalStorage write failed for '{}'", key);
            }
        }
    }

    fn remove(&mut self, key: &str) {
        if let Some(storage) = &self.storage {
            if storage.remove_item(key).is_err() {
                log::warn!("LocalStorage remove failed for '{}'", key);
            }
        }
    }
}
