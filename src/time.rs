//! Frame timing.
//!
//! The simulations advance by a fixed amount per frame, not per second, so
//! the delta here is informational: it feeds FPS sampling and the frame
//! rate monitor. Frame intervals are treated as variable.
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//! // once per frame:
//! clock.tick();
//! log::debug!("frame {} at {:.1} fps", clock.frame(), clock.fps());
//! ```

use std::time::{Duration, Instant};

/// Frame counter with periodic FPS sampling.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_frame: Option<Instant>,
    delta_secs: f32,
    frame_count: u64,
    fps: f32,
    /// Set when a new FPS sample was taken on the latest tick.
    fps_sampled: bool,
    fps_frame_count: u64,
    fps_window_start: Option<Instant>,
    fps_interval: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_interval(Duration::from_millis(500))
    }

    /// A clock that samples FPS every `interval`.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            last_frame: None,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_sampled: false,
            fps_frame_count: 0,
            fps_window_start: None,
            fps_interval: interval,
        }
    }

    /// Record a frame happening now.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Record a frame at `now`. Hosts with their own clock call this directly.
    pub fn tick_at(&mut self, now: Instant) {
        self.delta_secs = match self.last_frame {
            Some(last) => now.saturating_duration_since(last).as_secs_f32(),
            None => 0.0,
        };
        self.last_frame = Some(now);
        self.frame_count += 1;
        self.fps_sampled = false;

        let window_start = *self.fps_window_start.get_or_insert(now);
        let window = now.saturating_duration_since(window_start);
        if window >= self.fps_interval {
            let frames = self.frame_count - self.fps_frame_count;
            self.fps = frames as f32 / window.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_window_start = Some(now);
            self.fps_sampled = true;
        }
    }

    /// Forget the last frame time so the gap spent paused does not show up
    /// as one long frame.
    pub fn resume(&mut self) {
        self.last_frame = None;
        self.fps_window_start = None;
        self.fps_frame_count = self.frame_count;
    }

    /// Seconds between the last two ticks.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total ticks since creation.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Latest FPS sample, 0 until the first sample.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Whether the latest tick produced a new FPS sample.
    #[inline]
    pub fn fps_sampled(&self) -> bool {
        self.fps_sampled
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_has_zero_delta() {
        let mut clock = FrameClock::new();
        clock.tick_at(Instant::now());
        assert_eq!(clock.frame(), 1);
        assert_eq!(clock.delta(), 0.0);
    }

    #[test]
    fn variable_deltas_are_measured() {
        let start = Instant::now();
        let mut clock = FrameClock::new();
        clock.tick_at(start);
        clock.tick_at(start + Duration::from_millis(16));
        assert!((clock.delta() - 0.016).abs() < 1e-4);
        clock.tick_at(start + Duration::from_millis(50));
        assert!((clock.delta() - 0.034).abs() < 1e-4);
    }

    #[test]
    fn fps_sampled_each_interval() {
        let start = Instant::now();
        let mut clock = FrameClock::with_interval(Duration::from_millis(500));
        clock.tick_at(start);
        for i in 1..=30 {
            clock.tick_at(start + Duration::from_millis(i * 1000 / 60));
        }
        assert!(clock.fps_sampled());
        assert!((clock.fps() - 60.0).abs() < 3.0, "fps was {}", clock.fps());
    }

    #[test]
    fn resume_skips_paused_gap() {
        let start = Instant::now();
        let mut clock = FrameClock::new();
        clock.tick_at(start);
        clock.resume();
        clock.tick_at(start + Duration::from_secs(10));
        assert_eq!(clock.delta(), 0.0);
    }
}
