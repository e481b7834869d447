//! Countdown engine
//!
//! Wall-clock state machine driven by a repeating tick. The engine owns the
//! tick handle; callers only see `start`, `tick` and `stop`.
//!
//! ```text
//! Idle -> Running -> Expired
//!           ^  |
//!           +--+  (start again at any time)
//! ```
//!
//! The event is re-read on every tick, so clearing the date while running
//! freezes the countdown at its last values instead of resetting it.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::date::parse_target_ms;
use crate::error::SetError;
use crate::platform::{IntervalTimer, TimerId};

/// The event being counted down to, as currently entered
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventTarget {
    pub name: String,
    /// Raw date value, parsed on every tick
    pub date: String,
}

impl EventTarget {
    pub fn new(name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            date: date.into(),
        }
    }

    /// Build the target for a "set" action: the name is trimmed and both
    /// name and date must be non-empty.
    pub fn validated(name: &str, date: &str) -> Result<Self, SetError> {
        let name = name.trim();
        if name.is_empty() || date.is_empty() {
            return Err(SetError::MissingInput);
        }
        Ok(Self::new(name, date))
    }

    /// Target instant in epoch milliseconds, if the date parses
    pub fn target_ms(&self) -> Option<i64> {
        parse_target_ms(&self.date)
    }
}

/// Remaining time split into display units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remaining {
    pub days: i64,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl Remaining {
    /// Decompose a non-negative distance. `None` once the target has passed.
    pub fn from_distance_ms(distance: i64) -> Option<Self> {
        if distance < 0 {
            return None;
        }
        Some(Self {
            days: distance / MS_PER_DAY,
            hours: ((distance % MS_PER_DAY) / MS_PER_HOUR) as u8,
            minutes: ((distance % MS_PER_HOUR) / MS_PER_MINUTE) as u8,
            seconds: ((distance % MS_PER_MINUTE) / MS_PER_SECOND) as u8,
        })
    }

    /// Days unpadded, the rest zero-padded to two digits
    pub fn display(&self) -> CountdownDisplay {
        CountdownDisplay {
            days: self.days.to_string(),
            hours: format!("{:02}", self.hours),
            minutes: format!("{:02}", self.minutes),
            seconds: format!("{:02}", self.seconds),
        }
    }
}

/// The four countdown fields as shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownDisplay {
    pub days: String,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownPhase {
    #[default]
    Idle,
    Running,
    Expired,
}

/// Result of one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Date unparseable or engine not running; nothing changes
    Skipped,
    /// Target still ahead
    Updated(CountdownDisplay),
    /// Target passed on this tick; the repeating tick is gone
    Arrived { message: String },
}

/// Repeating-tick countdown. At most one tick is installed at any time.
pub struct CountdownEngine {
    timer: Box<dyn IntervalTimer>,
    handle: Option<TimerId>,
    phase: CountdownPhase,
    period_ms: u32,
    last: Option<Remaining>,
}

impl CountdownEngine {
    pub fn new(timer: Box<dyn IntervalTimer>, period_ms: u32) -> Self {
        Self {
            timer,
            handle: None,
            phase: CountdownPhase::Idle,
            period_ms,
            last: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> CountdownPhase {
        self.phase
    }

    /// Whether a repeating tick is installed
    pub fn is_ticking(&self) -> bool {
        self.handle.is_some()
    }

    /// Last successfully computed remaining time
    pub fn last_remaining(&self) -> Option<Remaining> {
        self.last
    }

    // ── Operations ───────────────────────────────────────────────────

    /// (Re)start toward `target`. Any installed tick is cancelled first, then
    /// one tick runs synchronously so the first frame never shows zeros. The
    /// repeating tick is only installed if that tick did not already arrive.
    pub fn start(&mut self, target: &EventTarget, now_ms: i64) -> TickOutcome {
        self.cancel_tick();
        self.phase = CountdownPhase::Running;
        let outcome = self.tick(target, now_ms);
        if self.phase == CountdownPhase::Running {
            self.handle = Some(self.timer.start_interval(self.period_ms));
        }
        log::info!(
            "Countdown started for '{}' ({:?})",
            target.name,
            self.phase
        );
        outcome
    }

    /// Recompute remaining time
    pub fn tick(&mut self, target: &EventTarget, now_ms: i64) -> TickOutcome {
        if self.phase != CountdownPhase::Running {
            return TickOutcome::Skipped;
        }
        let Some(target_ms) = target.target_ms() else {
            log::debug!("Tick skipped: unparseable date '{}'", target.date);
            return TickOutcome::Skipped;
        };

        match Remaining::from_distance_ms(target_ms - now_ms) {
            Some(remaining) => {
                self.last = Some(remaining);
                TickOutcome::Updated(remaining.display())
            }
            None => {
                self.cancel_tick();
                self.phase = CountdownPhase::Expired;
                log::info!("Countdown arrived for '{}'", target.name);
                TickOutcome::Arrived {
                    message: crate::arrival_message(&target.name),
                }
            }
        }
    }

    /// Cancel the tick and return to Idle. Safe to call in any phase.
    pub fn stop(&mut self) {
        self.cancel_tick();
        self.phase = CountdownPhase::Idle;
    }

    fn cancel_tick(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.timer.cancel_interval(handle);
        }
    }
}

impl Drop for CountdownEngine {
    fn drop(&mut self) {
        self.cancel_tick();
    }
}
