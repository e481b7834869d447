//! Browser backends: `setInterval`, `requestAnimationFrame`, Canvas 2D, `Date.now()`
//!
//! Each scheduler owns one callback closure for its whole lifetime and
//! registers it again on every start/request. Cancelling only unregisters it.

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::{Canvas, Clock, FrameId, FrameScheduler, IntervalTimer, TimerId};

/// Clock backed by `Date.now()`
#[derive(Debug, Clone, Copy, Default)]
pub struct WebClock;

impl Clock for WebClock {
    fn now_ms(&self) -> i64 {
        js_sys::Date::now() as i64
    }
}

/// `setInterval`/`clearInterval` around a single tick callback
pub struct WebIntervalTimer {
    window: Window,
    callback: Closure<dyn FnMut()>,
}

impl WebIntervalTimer {
    pub fn new(window: Window, on_tick: impl FnMut() + 'static) -> Self {
        Self {
            window,
            callback: Closure::<dyn FnMut()>::new(on_tick),
        }
    }
}

impl IntervalTimer for WebIntervalTimer {
    fn start_interval(&mut self, period_ms: u32) -> TimerId {
        let id = self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                self.callback.as_ref().unchecked_ref(),
                i32::try_from(period_ms).unwrap_or(i32::MAX),
            )
            .unwrap_or_else(|e| {
                log::error!("setInterval failed: {:?}", e);
                0
            });
        TimerId(id)
    }

    fn cancel_interval(&mut self, id: TimerId) {
        self.window.clear_interval_with_handle(id.0);
    }
}

/// `requestAnimationFrame`/`cancelAnimationFrame` around a single frame callback
pub struct WebFrames {
    window: Window,
    callback: Closure<dyn FnMut(f64)>,
}

impl WebFrames {
    pub fn new(window: Window, on_frame: impl FnMut(f64) + 'static) -> Self {
        Self {
            window,
            callback: Closure::<dyn FnMut(f64)>::new(on_frame),
        }
    }
}

impl FrameScheduler for WebFrames {
    fn request_frame(&mut self) -> FrameId {
        let id = self
            .window
            .request_animation_frame(self.callback.as_ref().unchecked_ref())
            .unwrap_or_else(|e| {
                log::error!("requestAnimationFrame failed: {:?}", e);
                0
            });
        FrameId(id)
    }

    fn cancel_frame(&mut self, id: FrameId) {
        let _ = self.window.cancel_animation_frame(id.0);
    }
}

/// Canvas 2D drawing surface
pub struct WebCanvas {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl WebCanvas {
    /// `None` if the element has no 2D context
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx })
    }
}

impl Canvas for WebCanvas {
    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn clear(&mut self) {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w as f64, h as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        let _ = self.ctx.arc(
            center.x as f64,
            center.y as f64,
            radius as f64,
            0.0,
            std::f64::consts::TAU,
        );
        self.ctx.fill();
    }
}
