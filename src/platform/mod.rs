//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (wall clock)
//! - Repeating ticks (`setInterval` on web)
//! - Frame callbacks (`requestAnimationFrame` on web)
//! - Drawing surface (Canvas 2D on web)
//!
//! Handles returned by the schedulers are owned by exactly one engine and
//! never leave it.

use glam::Vec2;

pub mod manual;
#[cfg(target_arch = "wasm32")]
pub mod web;

/// Id of an installed repeating tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub i32);

/// Id of a pending frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub i32);

/// Wall clock in epoch milliseconds
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// Installs repeating ticks. The backend invokes the owner's tick handler
/// every `period_ms` until the id is cancelled.
pub trait IntervalTimer {
    fn start_interval(&mut self, period_ms: u32) -> TimerId;
    fn cancel_interval(&mut self, id: TimerId);
}

/// Requests one-shot frame callbacks synchronized to display refresh.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameId;
    fn cancel_frame(&mut self, id: FrameId);
}

/// A 2D drawing surface
pub trait Canvas {
    fn resize(&mut self, width: u32, height: u32);
    fn size(&self) -> (u32, u32);
    fn clear(&mut self);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str);
}

/// Clock reading the system time through chrono
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}
