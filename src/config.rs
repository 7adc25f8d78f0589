//! Engine configuration.
//!
//! Every tunable constant of the engine lives in [`EngineConfig`]. Defaults
//! reproduce the stock behavior; a JSON file can override any subset:
//!
//! ```json
//! {
//!   "particle_count": 4000,
//!   "initial_attractor": "thomas",
//!   "transition_duration_ms": 2000.0,
//!   "seed": 42
//! }
//! ```

use crate::attractor::Attractor;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::Path;

/// Configuration for an [`Engine`](crate::Engine).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed population size.
    pub particle_count: usize,
    /// Field that is current at start.
    pub initial_attractor: Attractor,
    /// Length of an animated switch, in time units (ms).
    pub transition_duration_ms: f64,
    /// Cooldown after a gesture-triggered switch, in time units (ms).
    pub debounce_ms: f64,
    /// Particles further than this from the origin are respawned.
    pub divergence_bound: f32,
    /// Lower clamp on view distance when computing the display scale.
    pub min_view_distance: f32,
    /// Fewest burn-in steps for a freshly seeded particle.
    pub burn_in_min: u32,
    /// Burn-in step count upper bound (exclusive).
    pub burn_in_max: u32,
    /// A finger is curled when tip-to-wrist < `curl_ratio` × base-to-wrist.
    pub curl_ratio: f32,
    /// Curled fingers (of four) needed to call the hand closed.
    pub curled_fingers_to_close: usize,
    /// Fraction of the remaining gap the camera covers per tick.
    pub camera_smoothing: f32,
    /// Fraction of the remaining gap the view distance covers per tick while morphing.
    pub distance_easing: f32,
    /// Camera height at the top or bottom edge of the frame.
    pub camera_height: f32,
    /// Idle orbit speed, radians per tick.
    pub auto_orbit_speed: f32,
    /// RNG seed; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            particle_count: 8000,
            initial_attractor: Attractor::Lorenz,
            transition_duration_ms: 1200.0,
            debounce_ms: 1000.0,
            divergence_bound: 200.0,
            min_view_distance: 5.0,
            burn_in_min: 50,
            burn_in_max: 350,
            curl_ratio: 1.2,
            curled_fingers_to_close: 3,
            camera_smoothing: 0.1,
            distance_easing: 0.02,
            camera_height: 20.0,
            auto_orbit_speed: 0.003,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the starting attractor.
    pub fn with_attractor(mut self, attractor: Attractor) -> Self {
        self.initial_attractor = attractor;
        self
    }

    /// Make every random draw reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the animated switch duration.
    pub fn with_transition_duration(mut self, ms: f64) -> Self {
        self.transition_duration_ms = ms;
        self
    }

    /// Burn-in step range as a `Range`.
    pub fn burn_in(&self) -> Range<u32> {
        self.burn_in_min..self.burn_in_max
    }

    /// Check that the values make sense together.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));
        if self.particle_count == 0 {
            return fail("particle_count must be at least 1");
        }
        if self.burn_in_min >= self.burn_in_max {
            return fail("burn_in_min must be below burn_in_max");
        }
        if !(self.transition_duration_ms > 0.0) {
            return fail("transition_duration_ms must be positive");
        }
        if !(self.debounce_ms >= 0.0) {
            return fail("debounce_ms must be non-negative");
        }
        if !(self.divergence_bound > 0.0) || !(self.min_view_distance > 0.0) {
            return fail("divergence_bound and min_view_distance must be positive");
        }
        if !(self.curl_ratio > 0.0 && self.curl_ratio.is_finite()) {
            return fail("curl_ratio must be positive and finite");
        }
        if !self.camera_height.is_finite() || !self.auto_orbit_speed.is_finite() {
            return fail("camera_height and auto_orbit_speed must be finite");
        }
        if self.curled_fingers_to_close == 0 || self.curled_fingers_to_close > 4 {
            return fail("curled_fingers_to_close must be between 1 and 4");
        }
        for (name, factor) in [
            ("camera_smoothing", self.camera_smoothing),
            ("distance_easing", self.distance_easing),
        ] {
            if !(factor > 0.0 && factor <= 1.0) {
                return Err(ConfigError::Invalid(format!("{} must be in (0, 1]", name)));
            }
        }
        Ok(())
    }
}
