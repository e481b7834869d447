//! Theme and background toggles
//!
//! The theme is persisted as `dark`/`light`; the background index lives only
//! for the lifetime of the page.

use serde::{Deserialize, Serialize};

/// Color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn is_dark(&self) -> bool {
        *self == Theme::Dark
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Background presets, cycled in order
pub const BACKGROUNDS: [&str; 4] = [
    "linear-gradient(135deg, #f5f7fa 0%, #c3cfe2 100%)",
    "linear-gradient(120deg, #a1c4fd 0%, #c2e9fb 100%)",
    "linear-gradient(to top, #cfd9df 0%, #e2ebf0 100%)",
    "#f4f6f8",
];

/// Position in the background cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Background {
    index: usize,
}

impl Background {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn css(&self) -> &'static str {
        BACKGROUNDS[self.index]
    }

    /// Move to the next preset, wrapping around
    pub fn advance(&mut self) -> &'static str {
        self.index = (self.index + 1) % BACKGROUNDS.len();
        self.css()
    }
}
