//! Particle population and the steady-state tick.
//!
//! A [`Simulation`] owns a fixed number of particles on the current
//! attractor, advances them one forward Euler step per tick, and keeps two
//! flat render buffers (positions and colors) that are rewritten in place
//! every tick. Index `i` in either buffer is always the same particle.
//!
//! The step size is the field's own `time_step`; it is not scaled by wall
//! clock time, so simulation speed follows the tick rate.

use crate::attractor::{Attractor, AttractorField};
use crate::spawn::{is_contained, Seeder};
use crate::Vec3;
use tracing::debug;

/// One simulated point and its display color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Position in the current field's simulation space.
    pub position: Vec3,
    /// RGB, each channel 0-1.
    pub color: Vec3,
}

/// The particle population for the current attractor.
pub struct Simulation {
    pub(crate) attractor: Attractor,
    pub(crate) particles: Vec<Particle>,
    pub(crate) positions: Vec<Vec3>,
    pub(crate) colors: Vec<Vec3>,
    pub(crate) seeder: Seeder,
    pub(crate) min_view_distance: f32,
}

impl Simulation {
    /// Seed `count` particles on `attractor`.
    pub fn new(attractor: Attractor, count: usize, seeder: Seeder, min_view_distance: f32) -> Self {
        let mut sim = Self {
            attractor,
            particles: Vec::with_capacity(count),
            positions: vec![Vec3::ZERO; count],
            colors: vec![Vec3::ZERO; count],
            seeder,
            min_view_distance,
        };
        sim.seed_population(attractor);
        sim
    }

    /// Replace every particle with a burned-in point on `attractor`.
    ///
    /// Population size does not change. Render buffers are refreshed at the
    /// field's own view distance.
    pub fn seed_population(&mut self, attractor: Attractor) {
        let field = attractor.field();
        let count = self.positions.len();
        self.attractor = attractor;
        self.particles.clear();
        for _ in 0..count {
            let position = self.seeder.burned_in(field);
            let color = self.seeder.field_color(field);
            self.particles.push(Particle { position, color });
        }
        self.refresh_buffers(field.view_distance);
    }

    /// Advance every particle one step and rewrite the render buffers.
    ///
    /// Returns how many particles were respawned because they diverged.
    pub fn step(&mut self, view_distance: f32) -> usize {
        let field = self.attractor.field();
        let scale = field.distance_scale(view_distance, self.min_view_distance);
        let mut repaired = 0;

        for ((p, pos), col) in self
            .particles
            .iter_mut()
            .zip(self.positions.iter_mut())
            .zip(self.colors.iter_mut())
        {
            let (next, was_repaired) =
                repair(&mut self.seeder, field, field.advance(p.position, 1.0));
            repaired += was_repaired as usize;
            p.position = next;
            *pos = field.to_render(next, scale);
            *col = p.color;
        }

        if repaired > 0 {
            debug!(field = field.id, repaired, "Respawned diverged particles");
        }
        repaired
    }

    /// Recompute render buffers from current state without stepping.
    pub fn refresh_buffers(&mut self, view_distance: f32) {
        let field = self.attractor.field();
        let scale = field.distance_scale(view_distance, self.min_view_distance);
        for ((p, pos), col) in self
            .particles
            .iter()
            .zip(self.positions.iter_mut())
            .zip(self.colors.iter_mut())
        {
            *pos = field.to_render(p.position, scale);
            *col = p.color;
        }
    }

    /// The attractor particles currently live on.
    pub fn attractor(&self) -> Attractor {
        self.attractor
    }

    /// Read-only view of the particles.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Population size.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the population is empty.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Flat render positions, `[x0, y0, z0, x1, ...]`.
    pub fn positions(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Flat render colors, index-aligned with [`positions`](Self::positions).
    pub fn colors(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }
}

/// Keep `p` if it is contained, otherwise reseed it under `field`.
///
/// The flag is true when a reseed happened.
pub(crate) fn repair(seeder: &mut Seeder, field: &AttractorField, p: Vec3) -> (Vec3, bool) {
    if is_contained(p, seeder.bound) {
        (p, false)
    } else {
        (seeder.reseed(field), true)
    }
}
