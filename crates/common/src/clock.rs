//! Frame clock for the render loop.
//!
//! The frame driver counts frames from process start; warm-up gating and
//! throughput logging are derived from this count.

use std::time::Instant;

/// Monotonic frame counter anchored to the moment the loop started.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// The instant the loop started.
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339 string).
    epoch_wall: String,

    /// Frames advanced so far.
    frames: u64,
}

impl FrameClock {
    /// Create a new frame clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
            frames: 0,
        }
    }

    /// Advance by one frame and return the new frame number (first frame is 1).
    pub fn advance(&mut self) -> u64 {
        self.frames += 1;
        self.frames
    }

    /// Number of frames advanced so far.
    pub fn frame_number(&self) -> u64 {
        self.frames
    }

    /// Seconds elapsed since the loop started.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at loop start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// Average frame rate since start. Zero before any time has passed.
    pub fn average_fps(&self) -> f64 {
        Self::rate(self.frames, self.elapsed_secs())
    }

    /// Frames per second for a frame count over a duration.
    pub fn rate(frames: u64, secs: f64) -> f64 {
        if secs <= 0.0 {
            0.0
        } else {
            frames as f64 / secs
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_starts_at_zero() {
        let clock = FrameClock::start();
        assert_eq!(clock.frame_number(), 0);
        assert!(clock.elapsed_secs() < 1.0);
        assert!(!clock.epoch_wall().is_empty());
    }

    #[test]
    fn test_advance_counts_frames() {
        let mut clock = FrameClock::start();
        assert_eq!(clock.advance(), 1);
        assert_eq!(clock.advance(), 2);
        assert_eq!(clock.frame_number(), 2);
    }

    #[test]
    fn test_rate() {
        assert!((FrameClock::rate(120, 2.0) - 60.0).abs() < 1e-9);
        assert_eq!(FrameClock::rate(10, 0.0), 0.0);
    }
}
