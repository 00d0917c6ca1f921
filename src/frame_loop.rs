//! The per-frame update and render cycle.
//!
//! [`RenderLoop`] owns no GPU state. It reads a [`Clock`], drives a
//! [`FrameTarget`] in a fixed order and asks a [`FrameScheduler`] for the
//! next frame, which keeps it testable without a window.

use std::{cell::Cell, fmt::Display, time::Duration};

use instant::Instant;
use winit::window::Window;

use crate::stats::{FrameReport, FrameStats};

/// Monotonic elapsed time since the clock was created.
pub trait Clock {
    fn elapsed(&self) -> Duration;
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn elapsed(&self) -> Duration {
        (**self).elapsed()
    }
}

/// Asks the host for another frame at display refresh rate.
pub trait FrameScheduler {
    fn request_frame(&self);
}

impl FrameScheduler for Window {
    fn request_frame(&self) {
        self.request_redraw();
    }
}

/// A scheduler that also delivers the frames it was asked for.
pub trait FrameSource: FrameScheduler {
    /// Blocks until the next frame is due. `false` means the host is tearing down.
    fn next_frame(&mut self) -> bool;
}

/// What the loop updates and draws each frame.
pub trait FrameTarget {
    type Error;

    /// Writes the elapsed seconds into the time-driven uniforms.
    fn write_time(&mut self, elapsed: f32);

    /// Advances the camera controls and uploads the camera.
    fn update_controls(&mut self);

    fn render(&mut self) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
}

#[derive(Debug)]
pub struct RenderLoop<C> {
    clock: C,
    state: LoopState,
    frames: u64,
    stats: Option<FrameStats>,
}

impl<C: Clock> RenderLoop<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            state: LoopState::Idle,
            frames: 0,
            stats: None,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Number of frames rendered since the loop started.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn stats_enabled(&self) -> bool {
        self.stats.is_some()
    }

    pub fn set_stats_enabled(&mut self, enabled: bool) {
        match (enabled, self.stats.is_some()) {
            (true, false) => self.stats = Some(FrameStats::default()),
            (false, true) => self.stats = None,
            _ => (),
        }
    }

    /// Moves the loop to `Running` and requests the first frame. Later calls do nothing.
    pub fn start(&mut self, scheduler: &impl FrameScheduler) {
        if self.state == LoopState::Running {
            return;
        }
        self.state = LoopState::Running;
        log::debug!("render loop started");
        scheduler.request_frame();
    }

    /// Runs one frame: time, controls, render, then the next frame request.
    ///
    /// The next frame is requested even when rendering failed. Returns the
    /// render error for the host to handle.
    pub fn tick<T: FrameTarget>(
        &mut self,
        target: &mut T,
        scheduler: &impl FrameScheduler,
    ) -> Result<Option<FrameReport>, T::Error> {
        if self.state == LoopState::Idle {
            return Ok(None);
        }
        let elapsed = self.clock.elapsed();
        target.write_time(elapsed.as_secs_f32());
        target.update_controls();
        let rendered = target.render();
        scheduler.request_frame();
        rendered?;

        self.frames += 1;
        let report = self.stats.as_mut().and_then(|stats| stats.record(elapsed));
        if let Some(report) = &report {
            log::info!("{}", report);
        }
        Ok(report)
    }

    /// Drives `target` until `source` reports teardown. Render errors are
    /// logged and the loop carries on.
    pub fn run<T, S>(&mut self, target: &mut T, source: &mut S)
    where
        T: FrameTarget,
        T::Error: Display,
        S: FrameSource,
    {
        self.start(&*source);
        while source.next_frame() {
            if let Err(e) = self.tick(target, &*source) {
                log::error!("Unable to render {}", e);
            }
        }
        self.state = LoopState::Idle;
    }
}
