//! Seeding helpers for particle initialization.
//!
//! Every particle starts the same way: a uniform draw from the unit cube,
//! shifted by the field's seed offset, then a randomized burn-in so it already
//! sits on the attractor when it first appears. Respawned particles skip the
//! burn-in.

use crate::attractor::AttractorField;
use crate::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;

/// Saturation of particle colors.
const PALETTE_SATURATION: f32 = 0.75;
/// Brightness of particle colors.
const PALETTE_VALUE: f32 = 1.0;

/// Random source plus the seeding parameters shared by all draws.
pub struct Seeder {
    /// Number of burn-in steps is drawn from this range per particle.
    pub burn_in: Range<u32>,
    /// Magnitude beyond which a point counts as diverged.
    pub bound: f32,
    rng: SmallRng,
}

impl Seeder {
    /// Create a seeder. With `seed` set, every draw is reproducible.
    pub fn new(seed: Option<u64>, burn_in: Range<u32>, bound: f32) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self { burn_in, bound, rng }
    }

    /// Random point inside a cube of given half-size, centered at origin.
    pub fn random_in_cube(&mut self, half_size: f32) -> Vec3 {
        Vec3::new(
            self.rng.gen_range(-half_size..=half_size),
            self.rng.gen_range(-half_size..=half_size),
            self.rng.gen_range(-half_size..=half_size),
        )
    }

    /// Fresh point in the seeding cube for `field`, without burn-in.
    ///
    /// This is the cheap respawn used by divergence repair.
    pub fn reseed(&mut self, field: &AttractorField) -> Vec3 {
        self.random_in_cube(1.0) + field.seed_offset
    }

    /// Fresh point that has been integrated onto the attractor.
    ///
    /// Runs between `burn_in.start` and `burn_in.end - 1` Euler steps, or
    /// exactly `burn_in.start` when the range is empty. If the burn-in runs
    /// away, falls back to a plain reseed.
    pub fn burned_in(&mut self, field: &AttractorField) -> Vec3 {
        let steps = if self.burn_in.is_empty() {
            self.burn_in.start
        } else {
            self.rng.gen_range(self.burn_in.clone())
        };
        let mut p = self.reseed(field);
        for _ in 0..steps {
            p = field.advance(p, 1.0);
        }
        if is_contained(p, self.bound) {
            p
        } else {
            self.reseed(field)
        }
    }

    /// Random color from the field's hue band.
    pub fn field_color(&mut self, field: &AttractorField) -> Vec3 {
        let hue = field.color_base_hue + self.rng.gen::<f32>() * field.color_hue_range;
        hsv_to_rgb(hue.rem_euclid(1.0), PALETTE_SATURATION, PALETTE_VALUE)
    }
}

/// Whether `p` is finite and within `bound` of the origin.
#[inline]
pub fn is_contained(p: Vec3, bound: f32) -> bool {
    p.is_finite() && p.length() <= bound
}

/// Convert HSV to RGB.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Vec3 {
    let c = v * s;
    let x = c * (1.0 - ((h * 6.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match (h * 6.0) as u32 % 6 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Vec3::new(r + m, g + m, b + m)
}
