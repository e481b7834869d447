//! Confetti celebration
//!
//! A fixed-size set of particles falling through the canvas. Particles that
//! leave the bottom are recycled in place at the top, keeping their color,
//! size and velocity, so the set never grows or shrinks while running.
//!
//! One frame loop at most: `start` is a no-op while a frame is pending and
//! `stop` cancels it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::platform::{Canvas, FrameId, FrameScheduler};

/// A single confetti dot
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: &'static str,
    pub size: f32,
}

/// Uniform sample in [lo, hi)
fn uniform(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    lo + rng.random::<f32>() * (hi - lo)
}

impl Particle {
    /// Fresh particle somewhere in the band above the visible area
    pub fn spawn(rng: &mut Pcg32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(uniform(rng, 0.0, width), uniform(rng, -height, 0.0)),
            vel: Vec2::new(
                uniform(rng, PARTICLE_VX.0, PARTICLE_VX.1),
                uniform(rng, PARTICLE_VY.0, PARTICLE_VY.1),
            ),
            color: CONFETTI_COLORS[rng.random_range(0..CONFETTI_COLORS.len())],
            size: uniform(rng, PARTICLE_SIZE.0, PARTICLE_SIZE.1),
        }
    }

    /// Same particle re-entering just above the top edge at a new x.
    /// Velocity is carried over rather than re-drawn.
    pub fn respawn(&self, rng: &mut Pcg32, width: f32) -> Self {
        Self {
            pos: Vec2::new(uniform(rng, 0.0, width), RESPAWN_Y),
            vel: self.vel,
            color: self.color,
            size: self.size,
        }
    }
}

/// Owner of the particle set and its frame loop
pub struct Celebration {
    frames: Box<dyn FrameScheduler>,
    canvas: Box<dyn Canvas>,
    rng: Pcg32,
    particles: Vec<Particle>,
    pending: Option<FrameId>,
}

impl Celebration {
    pub fn new(frames: Box<dyn FrameScheduler>, canvas: Box<dyn Canvas>, seed: u64) -> Self {
        Self {
            frames,
            canvas,
            rng: Pcg32::seed_from_u64(seed),
            particles: Vec::with_capacity(PARTICLE_COUNT),
            pending: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Begin the celebration sized to `viewport`. Returns false if one is
    /// already running.
    pub fn start(&mut self, viewport: (u32, u32)) -> bool {
        if self.is_running() {
            return false;
        }
        self.canvas.resize(viewport.0, viewport.1);
        let (w, h) = (viewport.0 as f32, viewport.1 as f32);
        self.particles.clear();
        for _ in 0..PARTICLE_COUNT {
            let particle = Particle::spawn(&mut self.rng, w, h);
            self.particles.push(particle);
        }
        log::info!(
            "Celebration started ({} particles, {}x{})",
            self.particles.len(),
            viewport.0,
            viewport.1
        );
        self.draw_frame();
        true
    }

    /// Frame callback. Ignored unless a frame was requested and not cancelled.
    pub fn frame(&mut self) {
        if self.pending.take().is_none() {
            return;
        }
        self.draw_frame();
    }

    /// Draw, advance, recycle, then request the next frame
    fn draw_frame(&mut self) {
        let (w, h) = self.canvas.size();
        let (w, h) = (w as f32, h as f32);
        self.canvas.clear();
        for p in self.particles.iter_mut() {
            self.canvas.fill_circle(p.pos, p.size, p.color);
            p.pos += p.vel;
            if p.pos.y > h {
                *p = p.respawn(&mut self.rng, w);
            }
        }

        self.pending = Some(self.frames.request_frame());
    }

    /// Viewport changed: resize the surface only; particles keep their
    /// positions. Ignored when not running.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.is_running() {
            self.canvas.resize(width, height);
        }
    }

    /// Cancel the frame loop, drop the particles and clear the surface.
    /// Safe to call when not running.
    pub fn stop(&mut self) {
        let was_running = self.is_running();
        if let Some(id) = self.pending.take() {
            self.frames.cancel_frame(id);
        }
        self.particles.clear();
        self.canvas.clear();
        if was_running {
            log::info!("Celebration stopped");
        }
    }
}

impl Drop for Celebration {
    fn drop(&mut self) {
        if let Some(id) = self.pending.take() {
            self.frames.cancel_frame(id);
        }
    }
}
