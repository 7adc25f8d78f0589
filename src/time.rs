//! Tick clock for driving the engine.
//!
//! The engine itself never reads the wall clock: every operation takes `now`
//! in milliseconds. [`TickClock`] is the host-side helper that produces those
//! timestamps, either from real time or from a fixed step for deterministic
//! headless runs.
//!
//! # Example
//!
//! ```ignore
//! let mut clock = TickClock::new();
//!
//! // In your frame loop:
//! let now = clock.tick();
//! let frame = engine.tick(now);
//! ```

use std::time::{Duration, Instant};

/// Millisecond timestamps for engine ticks.
#[derive(Debug)]
pub struct TickClock {
    /// When the clock was created.
    start: Instant,
    /// Timestamp handed out by the last tick.
    now_ms: f64,
    /// Time between the last two ticks.
    delta_ms: f64,
    /// Ticks since start.
    frame_count: u64,
    /// Calculated ticks per second (updated periodically).
    fps: f64,
    fps_frame_count: u64,
    fps_update_ms: f64,
    fps_update_interval: Duration,
    /// When set, each tick advances by exactly this much instead of real time.
    fixed_step_ms: Option<f64>,
}

impl TickClock {
    /// Real-time clock starting from now.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            now_ms: 0.0,
            delta_ms: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_ms: 0.0,
            fps_update_interval: Duration::from_millis(500),
            fixed_step_ms: None,
        }
    }

    /// Deterministic clock advancing `step_ms` per tick.
    pub fn fixed(step_ms: f64) -> Self {
        Self {
            fixed_step_ms: Some(step_ms),
            ..Self::new()
        }
    }

    /// Advance one tick and return the new timestamp in milliseconds.
    pub fn tick(&mut self) -> f64 {
        let next = match self.fixed_step_ms {
            Some(step) => self.now_ms + step,
            None => self.start.elapsed().as_secs_f64() * 1000.0,
        };
        self.delta_ms = next - self.now_ms;
        self.now_ms = next;
        self.frame_count += 1;

        let since_update = self.now_ms - self.fps_update_ms;
        if since_update >= self.fps_update_interval.as_secs_f64() * 1000.0 {
            let frames = self.frame_count - self.fps_frame_count;
            self.fps = frames as f64 / (since_update / 1000.0);
            self.fps_frame_count = self.frame_count;
            self.fps_update_ms = self.now_ms;
        }

        self.now_ms
    }

    /// Timestamp of the last tick.
    #[inline]
    pub fn now(&self) -> f64 {
        self.now_ms
    }

    /// Milliseconds between the last two ticks.
    #[inline]
    pub fn delta(&self) -> f64 {
        self.delta_ms
    }

    /// Ticks since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Ticks per second, refreshed twice a second.
    #[inline]
    pub fn fps(&self) -> f64 {
        self.fps
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}
