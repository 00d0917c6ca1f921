//! Frame timing statistics for the performance overlay.

use std::time::Duration;

/// Summary of the frames recorded during one report interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub frames: u32,
    pub fps: f32,
    pub average: Duration,
    pub worst: Duration,
}

impl std::fmt::Display for FrameReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.1} fps, {:.2} ms avg, {:.2} ms worst",
            self.fps,
            self.average.as_secs_f64() * 1000.0,
            self.worst.as_secs_f64() * 1000.0
        )
    }
}

#[derive(Debug, Clone)]
pub struct FrameStats {
    interval: Duration,
    last_frame: Option<Duration>,
    window_start: Option<Duration>,
    frames: u32,
    total: Duration,
    worst: Duration,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl FrameStats {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_frame: None,
            window_start: None,
            frames: 0,
            total: Duration::ZERO,
            worst: Duration::ZERO,
        }
    }

    /// Records a frame at clock reading `now`. Returns a report once per interval.
    pub fn record(&mut self, now: Duration) -> Option<FrameReport> {
        let window_start = *self.window_start.get_or_insert(now);
        if let Some(last) = self.last_frame.replace(now) {
            let frame_time = now.saturating_sub(last);
            self.frames += 1;
            self.total += frame_time;
            self.worst = self.worst.max(frame_time);
        }

        let span = now.saturating_sub(window_start);
        if span < self.interval || self.frames == 0 {
            return None;
        }
        let report = FrameReport {
            frames: self.frames,
            fps: self.frames as f32 / span.as_secs_f32(),
            average: self.total / self.frames,
            worst: self.worst,
        };
        self.window_start = Some(now);
        self.frames = 0;
        self.total = Duration::ZERO;
        self.worst = Duration::ZERO;
        Some(report)
    }

    /// Forgets the running interval, e.g. after the overlay was hidden.
    pub fn reset(&mut self) {
        *self = Self::new(self.interval);
    }
}
