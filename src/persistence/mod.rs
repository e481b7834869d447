//! Key-value persistence
//!
//! Features:
//! - String keys to string values, the shape of browser LocalStorage
//! - In-memory store for tests and as the fallback when storage is missing
//! - JSON file store for the native binary (atomic tmp + rename writes)
//! - LocalStorage store in the browser
//!
//! Stores never surface errors to callers: a failed read is an absent key and
//! a failed write is logged and dropped.

use std::collections::BTreeMap;

use crate::consts::{KEY_EVENT_NAME, KEY_TARGET_DATE, KEY_THEME};
use crate::countdown::EventTarget;
use crate::theme::Theme;

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;

/// String key-value store surviving restarts
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// Volatile store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Everything the widget restores on load. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedState {
    pub name: Option<String>,
    pub date: Option<String>,
    pub theme: Option<Theme>,
}

impl SavedState {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let non_empty = |key: &str| store.get(key).filter(|v| !v.is_empty());
        Self {
            name: non_empty(KEY_EVENT_NAME),
            date: non_empty(KEY_TARGET_DATE),
            theme: store.get(KEY_THEME).and_then(|t| Theme::from_str(&t)),
        }
    }
}

/// Persist name and date together
pub fn save_event(store: &mut dyn KeyValueStore, target: &EventTarget) {
    store.set(KEY_EVENT_NAME, &target.name);
    store.set(KEY_TARGET_DATE, &target.date);
    log::info!("Event saved: '{}' at {}", target.name, target.date);
}

pub fn save_theme(store: &mut dyn KeyValueStore, theme: Theme) {
    store.set(KEY_THEME, theme.as_str());
}

/// Forget the saved event and theme
pub fn clear_saved(store: &mut dyn KeyValueStore) {
    store.remove(KEY_EVENT_NAME);
    store.remove(KEY_TARGET_DATE);
    store.remove(KEY_THEME);
    log::info!("Saved event cleared");
}
