//! Fixed timestep loop
//!
//! Accumulates frame time and runs as many constant-size updates as fit,
//! then renders once. Frame delivery rate never changes simulation results.

use crate::platform::{FrameHandle, FrameScheduler};

/// What a single frame did
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// Fixed updates run this frame
    pub updates: u32,
    /// Leftover fraction of a step (0..1), for render interpolation
    pub alpha: f32,
    /// Whether render was called
    pub rendered: bool,
}

/// Fixed-step driver bound to a host frame scheduler
#[derive(Debug)]
pub struct FixedLoop<S: FrameScheduler> {
    scheduler: S,
    /// Step length in seconds
    step: f64,
    /// Optional cap on a single frame's elapsed time
    max_frame_delta: Option<f64>,
    accumulator: f64,
    running: bool,
    pending: Option<FrameHandle>,
    total_updates: u64,
}

impl<S: FrameScheduler> FixedLoop<S> {
    /// Loop running `hz` updates per second of elapsed time
    pub fn new(scheduler: S, hz: f32) -> Self {
        let hz = if hz.is_finite() && hz > 0.0 { hz } else { 60.0 };
        Self {
            scheduler,
            step: 1.0 / hz as f64,
            max_frame_delta: None,
            accumulator: 0.0,
            running: false,
            pending: None,
            total_updates: 0,
        }
    }

    /// Cap how much elapsed time one frame may contribute
    pub fn with_max_frame_delta(mut self, max: Option<f32>) -> Self {
        self.max_frame_delta = max.filter(|m| m.is_finite() && *m > 0.0).map(f64::from);
        self
    }

    /// Step length in seconds
    pub fn step(&self) -> f32 {
        self.step as f32
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn total_updates(&self) -> u64 {
        self.total_updates
    }

    /// Frame callback currently requested from the host
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Begin requesting frames. Calling again while running does nothing.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.accumulator = 0.0;
        self.pending = Some(self.scheduler.request_frame());
        log::debug!("fixed loop started ({:.4}s step)", self.step);
    }

    /// Stop and release any pending frame. Calling again does nothing.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        log::debug!("fixed loop stopped after {} updates", self.total_updates);
    }

    /// Host frame callback.
    ///
    /// `elapsed` is the wall-clock time in seconds since the previous
    /// callback. Runs `update(step)` for every whole step in the accumulator,
    /// then `render(alpha)` exactly once, then requests the next frame. Does
    /// nothing once stopped.
    pub fn frame<U, R>(&mut self, elapsed: f32, mut update: U, mut render: R) -> FrameStats
    where
        U: FnMut(f32),
        R: FnMut(f32),
    {
        if !self.running {
            return FrameStats::default();
        }
        // This callback consumed the outstanding request
        self.pending = None;

        let mut elapsed = if elapsed.is_finite() {
            f64::from(elapsed.max(0.0))
        } else {
            0.0
        };
        if let Some(max) = self.max_frame_delta {
            elapsed = elapsed.min(max);
        }
        self.accumulator += elapsed;

        let step = self.step as f32;
        let mut updates = 0;
        while self.accumulator >= self.step {
            update(step);
            self.accumulator -= self.step;
            updates += 1;
        }
        self.total_updates += u64::from(updates);

        let alpha = (self.accumulator / self.step) as f32;
        render(alpha);

        self.pending = Some(self.scheduler.request_frame());

        FrameStats {
            updates,
            alpha,
            rendered: true,
        }
    }
}
