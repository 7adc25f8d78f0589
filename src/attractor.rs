//! The attractor catalog.
//!
//! Each [`Attractor`] variant names one chaotic system and carries an
//! immutable [`AttractorField`]: the vector field itself plus the parameters
//! that control how particles on it are integrated, placed and colored.
//!
//! # Fields
//!
//! | Id | System | Step |
//! |----|--------|------|
//! | `lorenz` | dx = σ(y-x), dy = x(ρ-z)-y, dz = xy-βz | 0.005 |
//! | `aizawa` | six-parameter torus-like flow | 0.01 |
//! | `thomas` | cyclically symmetric, dx = sin(y) - bx | 0.05 |
//! | `halvorsen` | cyclically symmetric, dx = -ax - 4y - 4z - y² | 0.004 |
//! | `dadras` | five-parameter quadratic flow | 0.005 |
//!
//! ```ignore
//! let field = lookup("aizawa")?;
//! let velocity = field.derivative(Vec3::new(0.1, 0.0, 0.0));
//! ```

use crate::error::{MorphError, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the built-in chaotic systems.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attractor {
    #[default]
    Lorenz,
    Aizawa,
    Thomas,
    Halvorsen,
    Dadras,
}

impl Attractor {
    /// Every attractor, in cycling order.
    pub const ALL: [Attractor; 5] = [
        Attractor::Lorenz,
        Attractor::Aizawa,
        Attractor::Thomas,
        Attractor::Halvorsen,
        Attractor::Dadras,
    ];

    /// Stable string id.
    pub fn id(&self) -> &'static str {
        self.field().id
    }

    /// The immutable parameter record for this attractor.
    pub fn field(&self) -> &'static AttractorField {
        match self {
            Attractor::Lorenz => &LORENZ,
            Attractor::Aizawa => &AIZAWA,
            Attractor::Thomas => &THOMAS,
            Attractor::Halvorsen => &HALVORSEN,
            Attractor::Dadras => &DADRAS,
        }
    }

    /// The attractor after this one, wrapping around.
    pub fn next(&self) -> Attractor {
        let idx = Self::ALL.iter().position(|a| a == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Attractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Attractor {
    type Err = MorphError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.id() == s)
            .ok_or_else(|| MorphError::UnknownField(s.to_string()))
    }
}

/// A vector field plus its per-field rendering and behavior parameters.
///
/// Pure data: nothing here mutates after construction.
#[derive(Debug)]
pub struct AttractorField {
    /// String id, unique within the catalog.
    pub id: &'static str,
    /// Forward Euler step per tick.
    pub time_step: f32,
    /// Multiplier from simulation space to display space.
    pub display_scale: f32,
    /// Camera distance the field is framed for.
    pub view_distance: f32,
    /// Added to positions before scaling, recentres the attractor on the origin.
    pub spatial_offset: Vec3,
    /// Added to fresh seed points, for basins that lie away from the origin.
    pub seed_offset: Vec3,
    /// Lowest hue of the particle palette (0.0-1.0).
    pub color_base_hue: f32,
    /// Width of the hue band above `color_base_hue`.
    pub color_hue_range: f32,
    derivative: fn(Vec3) -> Vec3,
}

impl AttractorField {
    /// Instantaneous velocity at `p`.
    #[inline]
    pub fn derivative(&self, p: Vec3) -> Vec3 {
        (self.derivative)(p)
    }

    /// One forward Euler step of this field, with the step scaled by `weight`.
    ///
    /// The derivative is always evaluated in full; only the step shrinks.
    #[inline]
    pub fn advance(&self, p: Vec3, weight: f32) -> Vec3 {
        p + self.derivative(p) * (self.time_step * weight)
    }

    /// Factor that keeps apparent spread stable as the camera zooms.
    #[inline]
    pub fn distance_scale(&self, view_distance: f32, min_view_distance: f32) -> f32 {
        self.view_distance / view_distance.max(min_view_distance)
    }

    /// Map a simulated position into display space.
    #[inline]
    pub fn to_render(&self, p: Vec3, distance_scale: f32) -> Vec3 {
        (p + self.spatial_offset) * self.display_scale * distance_scale
    }

    fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| MorphError::InvalidField {
            id: self.id,
            reason: reason.to_string(),
        };
        if !(self.time_step > 0.0) {
            return Err(invalid("time step must be positive"));
        }
        if !(self.view_distance > 0.0) {
            return Err(invalid("view distance must be positive"));
        }
        if !(self.display_scale > 0.0) {
            return Err(invalid("display scale must be positive"));
        }
        if !(0.0..1.0).contains(&self.color_base_hue) || !(self.color_hue_range >= 0.0) {
            return Err(invalid("hue base must be in [0, 1) and hue range non-negative"));
        }
        if !self.spatial_offset.is_finite() || !self.seed_offset.is_finite() {
            return Err(invalid("offsets must be finite"));
        }
        Ok(())
    }
}

/// Find a field by its string id.
pub fn lookup(id: &str) -> Result<&'static AttractorField> {
    id.parse::<Attractor>().map(|a| a.field())
}

/// Check every field in the catalog. Called once at engine start.
pub fn validate_catalog() -> Result<()> {
    Attractor::ALL.iter().try_for_each(|a| a.field().validate())
}

// ========== Catalog ==========

static LORENZ: AttractorField = AttractorField {
    id: "lorenz",
    time_step: 0.005,
    display_scale: 0.5,
    view_distance: 35.0,
    spatial_offset: Vec3::new(0.0, 0.0, -25.0),
    seed_offset: Vec3::new(0.0, 0.0, 20.0),
    color_base_hue: 0.55,
    color_hue_range: 0.15,
    derivative: lorenz,
};

static AIZAWA: AttractorField = AttractorField {
    id: "aizawa",
    time_step: 0.01,
    display_scale: 6.0,
    view_distance: 25.0,
    spatial_offset: Vec3::new(0.0, 0.0, -0.75),
    seed_offset: Vec3::ZERO,
    color_base_hue: 0.78,
    color_hue_range: 0.15,
    derivative: aizawa,
};

static THOMAS: AttractorField = AttractorField {
    id: "thomas",
    time_step: 0.05,
    display_scale: 2.5,
    view_distance: 30.0,
    spatial_offset: Vec3::ZERO,
    seed_offset: Vec3::ZERO,
    color_base_hue: 0.08,
    color_hue_range: 0.1,
    derivative: thomas,
};

static HALVORSEN: AttractorField = AttractorField {
    id: "halvorsen",
    time_step: 0.004,
    display_scale: 1.2,
    view_distance: 40.0,
    spatial_offset: Vec3::new(2.5, 2.5, 2.5),
    seed_offset: Vec3::ZERO,
    color_base_hue: 0.33,
    color_hue_range: 0.12,
    derivative: halvorsen,
};

static DADRAS: AttractorField = AttractorField {
    id: "dadras",
    time_step: 0.005,
    display_scale: 1.0,
    view_distance: 40.0,
    spatial_offset: Vec3::ZERO,
    seed_offset: Vec3::ZERO,
    color_base_hue: 0.0,
    color_hue_range: 0.12,
    derivative: dadras,
};

fn lorenz(p: Vec3) -> Vec3 {
    const SIGMA: f32 = 10.0;
    const RHO: f32 = 28.0;
    const BETA: f32 = 8.0 / 3.0;
    Vec3::new(
        SIGMA * (p.y - p.x),
        p.x * (RHO - p.z) - p.y,
        p.x * p.y - BETA * p.z,
    )
}

fn aizawa(p: Vec3) -> Vec3 {
    const A: f32 = 0.95;
    const B: f32 = 0.7;
    const C: f32 = 0.6;
    const D: f32 = 3.5;
    const E: f32 = 0.25;
    const F: f32 = 0.1;
    let Vec3 { x, y, z } = p;
    Vec3::new(
        (z - B) * x - D * y,
        D * x + (z - B) * y,
        C + A * z - z * z * z / 3.0 - (x * x + y * y) * (1.0 + E * z) + F * z * x * x * x,
    )
}

fn thomas(p: Vec3) -> Vec3 {
    const B: f32 = 0.208186;
    Vec3::new(
        p.y.sin() - B * p.x,
        p.z.sin() - B * p.y,
        p.x.sin() - B * p.z,
    )
}

fn halvorsen(p: Vec3) -> Vec3 {
    const A: f32 = 1.89;
    let Vec3 { x, y, z } = p;
    Vec3::new(
        -A * x - 4.0 * y - 4.0 * z - y * y,
        -A * y - 4.0 * z - 4.0 * x - z * z,
        -A * z - 4.0 * x - 4.0 * y - x * x,
    )
}

fn dadras(p: Vec3) -> Vec3 {
    const A: f32 = 3.0;
    const B: f32 = 2.7;
    const C: f32 = 1.7;
    const D: f32 = 2.0;
    const E: f32 = 9.0;
    let Vec3 { x, y, z } = p;
    Vec3::new(
        y - A * x + B * y * z,
        C * y - x * z + z,
        D * x * y - E * z,
    )
}
