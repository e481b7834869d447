//! Manually driven platform backends
//!
//! Nothing here fires on its own: the owner advances the clock and decides
//! when ticks and frames run. Used by the native binary and by tests. Every
//! backend is a cheap handle over shared state, so a clone kept outside the
//! controller observes what the controller did.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;

use super::{Canvas, Clock, FrameId, FrameScheduler, IntervalTimer, TimerId};

/// Clock that only moves when told to
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<i64>>,
}

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now: Rc::new(Cell::new(now_ms)),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, ms: i64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.get()
    }
}

#[derive(Debug, Default)]
struct TimerLog {
    next_id: i32,
    active: Vec<(TimerId, u32)>,
    started: usize,
    cancelled: usize,
}

/// Interval timer that records installs and cancellations
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    log: Rc<RefCell<TimerLog>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of intervals currently installed
    pub fn active_count(&self) -> usize {
        self.log.borrow().active.len()
    }

    pub fn is_active(&self) -> bool {
        self.active_count() > 0
    }

    /// Period of the first installed interval
    pub fn period_ms(&self) -> Option<u32> {
        self.log.borrow().active.first().map(|(_, period)| *period)
    }

    pub fn started(&self) -> usize {
        self.log.borrow().started
    }

    pub fn cancelled(&self) -> usize {
        self.log.borrow().cancelled
    }
}

impl IntervalTimer for ManualTimer {
    fn start_interval(&mut self, period_ms: u32) -> TimerId {
        let mut log = self.log.borrow_mut();
        log.next_id += 1;
        let id = TimerId(log.next_id);
        log.active.push((id, period_ms));
        log.started += 1;
        id
    }

    fn cancel_interval(&mut self, id: TimerId) {
        let mut log = self.log.borrow_mut();
        let before = log.active.len();
        log.active.retain(|(active, _)| *active != id);
        if log.active.len() != before {
            log.cancelled += 1;
        }
    }
}

#[derive(Debug, Default)]
struct FrameLog {
    next_id: i32,
    pending: Vec<FrameId>,
    requested: usize,
}

/// Frame scheduler that records pending requests
#[derive(Debug, Clone, Default)]
pub struct ManualFrames {
    log: Rc<RefCell<FrameLog>>,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frame requests not yet delivered or cancelled
    pub fn pending_count(&self) -> usize {
        self.log.borrow().pending.len()
    }

    pub fn requested(&self) -> usize {
        self.log.borrow().requested
    }

    /// Take the pending requests, as the browser does right before it runs
    /// the frame callbacks.
    pub fn deliver(&self) -> usize {
        let mut log = self.log.borrow_mut();
        let delivered = log.pending.len();
        log.pending.clear();
        delivered
    }
}

impl FrameScheduler for ManualFrames {
    fn request_frame(&mut self) -> FrameId {
        let mut log = self.log.borrow_mut();
        log.next_id += 1;
        let id = FrameId(log.next_id);
        log.pending.push(id);
        log.requested += 1;
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        self.log.borrow_mut().pending.retain(|pending| *pending != id);
    }
}

/// A filled circle drawn on a `RecordingCanvas`
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
    pub color: String,
}

#[derive(Debug, Default)]
struct CanvasLog {
    size: (u32, u32),
    clears: usize,
    circles: Vec<Circle>,
}

/// Canvas that keeps the circles drawn since the last clear
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    log: Rc<RefCell<CanvasLog>>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clears(&self) -> usize {
        self.log.borrow().clears
    }

    pub fn circles(&self) -> Vec<Circle> {
        self.log.borrow().circles.clone()
    }
}

impl Canvas for RecordingCanvas {
    fn resize(&mut self, width: u32, height: u32) {
        self.log.borrow_mut().size = (width, height);
    }

    fn size(&self) -> (u32, u32) {
        self.log.borrow().size
    }

    fn clear(&mut self) {
        let mut log = self.log.borrow_mut();
        log.clears += 1;
        log.circles.clear();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str) {
        self.log.borrow_mut().circles.push(Circle {
            center,
            radius,
            color: color.to_string(),
        });
    }
}
