//! Widget settings
//!
//! Read as JSON from their own key, separately from the event. The tick
//! period and particle count are fixed in `consts` and not configurable.

use serde::Deserialize;

use crate::consts::KEY_SETTINGS;
use crate::persistence::KeyValueStore;

/// Widget settings/preferences
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Confetti on arrival
    pub particles: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self { particles: true }
    }
}

impl Settings {
    /// Load settings from the store, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        if let Some(json) = store.get(KEY_SETTINGS) {
            match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults_when_absent() {
        let store = MemoryStore::new();
        assert_eq!(Settings::load(&store), Settings::default());
        assert!(Settings::default().particles);
    }

    #[test]
    fn test_particles_toggle_loads() {
        let mut store = MemoryStore::new();
        store.set(KEY_SETTINGS, r#"{"particles":false}"#);
        assert!(!Settings::load(&store).particles);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let mut store = MemoryStore::new();
        store.set(
            KEY_SETTINGS,
            r#"{"particles":false,"particle_count":0,"tick_period_ms":4294967295}"#,
        );
        assert_eq!(Settings::load(&store), Settings { particles: false });
    }

    #[test]
    fn test_malformed_json_falls_back() {
        let mut store = MemoryStore::new();
        store.set(KEY_SETTINGS, "{not json");
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_wrong_type_falls_back() {
        let mut store = MemoryStore::new();
        store.set(KEY_SETTINGS, r#"{"particles":"yes"}"#);
        assert_eq!(Settings::load(&store), Settings::default());
    }
}
