//! D-Day Countdown - a countdown widget with a confetti celebration
//!
//! Core modules:
//! - `countdown`: Remaining-time decomposition and the repeating-tick engine
//! - `celebration`: Confetti particle simulation and its frame loop
//! - `persistence`: Key-value stores (memory, LocalStorage, JSON file)
//! - `platform`: Clock/timer/frame/canvas abstractions and their backends
//! - `app`: Controller that wires input events to the engines
//! - `ui`: Presentation adapter trait and the headless adapter

pub mod app;
pub mod celebration;
pub mod countdown;
pub mod date;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod theme;
pub mod ui;

pub use app::{CountdownApp, InputEvent, Services};
pub use celebration::{Celebration, Particle};
pub use countdown::{
    CountdownDisplay, CountdownEngine, CountdownPhase, EventTarget, Remaining, TickOutcome,
};
pub use error::{SetError, StoreError};
pub use persistence::{KeyValueStore, MemoryStore};
pub use settings::Settings;
pub use theme::{Background, Theme};

/// Widget configuration constants
pub mod consts {
    /// Repeating tick period (ms)
    pub const TICK_PERIOD_MS: u32 = 1000;

    /// Millisecond spans used by the countdown decomposition
    pub const MS_PER_SECOND: i64 = 1000;
    pub const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
    pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
    pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

    /// Confetti particles per celebration
    pub const PARTICLE_COUNT: usize = 100;
    /// Confetti palette
    pub const CONFETTI_COLORS: [&str; 5] = ["#a864fd", "#29cdff", "#78ff44", "#ff718d", "#fdff6a"];
    /// Particle radius range [min, max)
    pub const PARTICLE_SIZE: (f32, f32) = (5.0, 15.0);
    /// Horizontal drift range [min, max)
    pub const PARTICLE_VX: (f32, f32) = (-2.0, 2.0);
    /// Fall speed range [min, max), pixels per frame
    pub const PARTICLE_VY: (f32, f32) = (2.0, 7.0);
    /// Height a recycled particle re-enters at
    pub const RESPAWN_Y: f32 = -10.0;

    /// Label used when the event has no name
    pub const DEFAULT_EVENT_LABEL: &str = "D-Day";
    /// Alert shown when "set" is missing the name or date
    pub const MISSING_INPUT_ALERT: &str = "이벤트 이름과 날짜를 모두 입력해주세요.";

    /// LocalStorage keys
    pub const KEY_EVENT_NAME: &str = "dday-event-name";
    pub const KEY_TARGET_DATE: &str = "dday-target-date";
    pub const KEY_THEME: &str = "dday-theme";
    pub const KEY_SETTINGS: &str = "dday-settings";
}

/// Title shown above the countdown for an event
#[inline]
pub fn title_for(name: &str) -> String {
    format!("{} D-Day", name)
}

/// Message shown once the target instant has passed
#[inline]
pub fn arrival_message(name: &str) -> String {
    let label = if name.is_empty() {
        consts::DEFAULT_EVENT_LABEL
    } else {
        name
    };
    format!("🎉 {} 도착! 🎉", label)
}
