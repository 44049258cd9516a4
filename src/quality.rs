//! Quality tiers and frame-rate monitoring.

use serde::{Deserialize, Serialize};

use crate::time::FrameClock;

/// Below this many frames per second the host should consider a lower tier.
pub const LOW_FPS_THRESHOLD: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    /// Desktop-class entity counts.
    #[default]
    Full,
    /// Trimmed counts for phones, tablets and slow machines.
    Reduced,
}

impl QualityTier {
    pub fn particle_count(self) -> usize {
        match self {
            Self::Full => 100,
            Self::Reduced => 30,
        }
    }

    pub fn shape_count(self) -> usize {
        match self {
            Self::Full => 20,
            Self::Reduced => 8,
        }
    }

    /// The next tier down, if any.
    pub fn lower(self) -> Option<Self> {
        match self {
            Self::Full => Some(Self::Reduced),
            Self::Reduced => None,
        }
    }
}

impl std::str::FromStr for QualityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" | "desktop" => Ok(Self::Full),
            "reduced" | "mobile" => Ok(Self::Reduced),
            other => Err(format!("unknown quality tier '{}' (expected full or reduced)", other)),
        }
    }
}

/// Watches FPS samples and flags sustained low frame rates.
#[derive(Debug, Clone)]
pub struct FrameRateMonitor {
    threshold: f32,
    low: bool,
}

impl FrameRateMonitor {
    pub fn new(threshold: f32) -> Self {
        Self { threshold, low: false }
    }

    /// Inspect the clock after a tick. Returns `true` only on the sample
    /// where the frame rate first drops below the threshold.
    pub fn observe(&mut self, clock: &FrameClock) -> bool {
        if !clock.fps_sampled() {
            return false;
        }
        let was_low = self.low;
        self.low = clock.fps() < self.threshold;
        self.low && !was_low
    }

    /// Whether the latest sample was below the threshold.
    #[inline]
    pub fn is_low(&self) -> bool {
        self.low
    }

    #[inline]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

impl Default for FrameRateMonitor {
    fn default() -> Self {
        Self::new(LOW_FPS_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn clock_at_fps(fps: u64, frames: u64) -> FrameClock {
        let start = Instant::now();
        let mut clock = FrameClock::with_interval(Duration::from_millis(500));
        for i in 0..frames {
            clock.tick_at(start + Duration::from_micros(i * 1_000_000 / fps));
        }
        clock
    }

    #[test]
    fn tier_parses_aliases() {
        assert_eq!("mobile".parse::<QualityTier>().unwrap(), QualityTier::Reduced);
        assert_eq!("Full".parse::<QualityTier>().unwrap(), QualityTier::Full);
        assert!("ultra".parse::<QualityTier>().is_err());
    }

    #[test]
    fn lower_tier_chain_ends() {
        assert_eq!(QualityTier::Full.lower(), Some(QualityTier::Reduced));
        assert_eq!(QualityTier::Reduced.lower(), None);
    }

    #[test]
    fn slow_clock_trips_monitor_once() {
        // 20 fps: a sample lands on frame 11 (t = 500ms).
        let clock = clock_at_fps(20, 11);
        assert!(clock.fps_sampled());
        let mut monitor = FrameRateMonitor::default();
        assert!(monitor.observe(&clock));
        assert!(monitor.is_low());
        // Same sample observed again does not re-trigger.
        assert!(!monitor.observe(&clock));
    }

    #[test]
    fn fast_clock_stays_quiet() {
        let clock = clock_at_fps(60, 31);
        let mut monitor = FrameRateMonitor::default();
        assert!(!monitor.observe(&clock));
        assert!(!monitor.is_low());
    }
}
