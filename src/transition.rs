//! Animated morphing between two attractors.
//!
//! While a [`Transition`] runs, every particle carries two states: its
//! position on the outgoing field and a freshly seeded target on the
//! incoming field. Both are integrated every tick, each with its step scaled
//! by its blend weight, and the render buffers show the eased blend of the
//! two. When progress reaches 1 the targets become the positions and the
//! incoming field becomes current.
//!
//! Transitions cannot be cancelled by another animated request; a request
//! made while one is running is dropped.

use crate::attractor::Attractor;
use crate::simulation::{repair, Simulation};
use crate::Vec3;
use tracing::{debug, info};

/// Symmetric cubic ease-in-out over `[0, 1]`.
pub fn ease_in_out_cubic(progress: f64) -> f64 {
    if progress < 0.5 {
        4.0 * progress * progress * progress
    } else {
        1.0 - (-2.0 * progress + 2.0).powi(3) / 2.0
    }
}

/// Per-particle state that only exists while morphing.
#[derive(Clone, Copy, Debug)]
struct Slot {
    target: Vec3,
    color_start: Vec3,
    color_end: Vec3,
}

/// Outcome of one transition tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransitionStatus {
    /// Still blending.
    Running {
        /// Linear progress, 0-1.
        progress: f64,
        /// Eased blend weight of the incoming field.
        ease: f64,
    },
    /// Finished this tick; the attractor is now current.
    Complete(Attractor),
}

/// A single in-flight morph.
pub struct Transition {
    next: Attractor,
    start_time: f64,
    duration: f64,
    progress: f64,
    ease: f64,
    slots: Vec<Slot>,
}

impl Transition {
    /// Snapshot colors and seed a burned-in target on `next` for every particle.
    fn begin(sim: &mut Simulation, next: Attractor, now: f64, duration: f64) -> Self {
        let field = next.field();
        let seeder = &mut sim.seeder;
        let slots = sim
            .particles
            .iter()
            .map(|p| Slot {
                target: seeder.burned_in(field),
                color_start: p.color,
                color_end: seeder.field_color(field),
            })
            .collect();

        Self {
            next,
            start_time: now,
            duration,
            progress: 0.0,
            ease: 0.0,
            slots,
        }
    }

    /// Advance both trajectories of every particle and blend the render buffers.
    ///
    /// `view_distance` eases toward the incoming field's framing distance by
    /// `distance_easing` of the remaining gap, independent of the blend curve.
    fn tick(
        &mut self,
        sim: &mut Simulation,
        now: f64,
        view_distance: &mut f32,
        distance_easing: f32,
    ) -> TransitionStatus {
        let elapsed = (now - self.start_time).max(0.0);
        self.progress = (elapsed / self.duration).min(1.0);
        self.ease = ease_in_out_cubic(self.progress);

        let old = sim.attractor.field();
        let new = self.next.field();
        let old_scale = old.distance_scale(*view_distance, sim.min_view_distance);
        let new_scale = new.distance_scale(*view_distance, sim.min_view_distance);
        let w_new = self.ease as f32;
        let w_old = 1.0 - w_new;
        let mut repaired = 0;

        for (((p, slot), pos), col) in sim
            .particles
            .iter_mut()
            .zip(self.slots.iter_mut())
            .zip(sim.positions.iter_mut())
            .zip(sim.colors.iter_mut())
        {
            let (from, r_old) = repair(&mut sim.seeder, old, old.advance(p.position, w_old));
            let (to, r_new) = repair(&mut sim.seeder, new, new.advance(slot.target, w_new));
            repaired += r_old as usize + r_new as usize;
            p.position = from;
            slot.target = to;

            *pos = old.to_render(from, old_scale) * w_old + new.to_render(to, new_scale) * w_new;
            *col = slot.color_start * w_old + slot.color_end * w_new;
        }

        if repaired > 0 {
            debug!(from = old.id, to = new.id, repaired, "Respawned diverged particles mid-transition");
        }

        *view_distance += (new.view_distance - *view_distance) * distance_easing;

        if self.progress >= 1.0 {
            for (p, slot) in sim.particles.iter_mut().zip(&self.slots) {
                p.position = slot.target;
                p.color = slot.color_end;
            }
            sim.attractor = self.next;
            TransitionStatus::Complete(self.next)
        } else {
            TransitionStatus::Running {
                progress: self.progress,
                ease: self.ease,
            }
        }
    }

    /// The incoming attractor.
    pub fn next(&self) -> Attractor {
        self.next
    }

    /// Linear progress as of the last tick.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Eased blend weight as of the last tick.
    pub fn ease(&self) -> f64 {
        self.ease
    }

    /// When the transition began.
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Total length in time units.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Current target positions on the incoming field, index-aligned with particles.
    pub fn targets(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.slots.iter().map(|s| s.target)
    }
}

/// Owns the at-most-one active [`Transition`].
pub struct TransitionController {
    active: Option<Transition>,
    duration: f64,
    distance_easing: f32,
}

impl TransitionController {
    /// Create an idle controller.
    pub fn new(duration: f64, distance_easing: f32) -> Self {
        Self {
            active: None,
            duration,
            distance_easing,
        }
    }

    /// Start morphing `sim` toward `next`.
    ///
    /// Returns `false` without touching any state when a transition is
    /// already running or `next` is the current attractor.
    pub fn begin(&mut self, sim: &mut Simulation, next: Attractor, now: f64) -> bool {
        if let Some(t) = &self.active {
            debug!(requested = %next, in_flight = %t.next, "Dropped switch request during transition");
            return false;
        }
        if next == sim.attractor() {
            debug!(requested = %next, "Dropped switch request to current attractor");
            return false;
        }

        info!(from = %sim.attractor(), to = %next, duration = self.duration, "Transition started");
        self.active = Some(Transition::begin(sim, next, now, self.duration));
        true
    }

    /// Run one transition tick, if one is active.
    ///
    /// On completion the transition is dropped along with its per-particle state.
    pub fn tick(&mut self, sim: &mut Simulation, now: f64, view_distance: &mut f32) -> Option<TransitionStatus> {
        let transition = self.active.as_mut()?;
        let status = transition.tick(sim, now, view_distance, self.distance_easing);
        if let TransitionStatus::Complete(attractor) = status {
            info!(attractor = %attractor, "Transition complete");
            self.active = None;
        }
        Some(status)
    }

    /// Drop any in-flight transition without committing it.
    pub fn cancel(&mut self) -> Option<Attractor> {
        self.active.take().map(|t| t.next)
    }

    /// Whether a transition is running.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// The running transition, if any.
    pub fn active(&self) -> Option<&Transition> {
        self.active.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attractor::AttractorField;
    use crate::spawn::Seeder;

    fn setup(count: usize) -> (Simulation, TransitionController) {
        let sim = Simulation::new(
            Attractor::Lorenz,
            count,
            Seeder::new(Some(5), 50..350, 200.0),
            5.0,
        );
        (sim, TransitionController::new(1200.0, 0.02))
    }

    #[test]
    fn test_ease_endpoints_and_midpoint() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(0.5), 0.5);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert!((ease_in_out_cubic(0.25) - 0.0625).abs() < 1e-12);
        assert!((ease_in_out_cubic(0.75) - 0.9375).abs() < 1e-12);
    }

    #[test]
    fn test_ease_is_monotonic() {
        let mut last = 0.0;
        for i in 0..=100 {
            let e = ease_in_out_cubic(i as f64 / 100.0);
            assert!(e >= last);
            last = e;
        }
    }

    #[test]
    fn test_begin_rejects_current_field() {
        let (mut sim, mut ctl) = setup(16);
        let before: Vec<_> = sim.particles().to_vec();
        assert!(!ctl.begin(&mut sim, Attractor::Lorenz, 0.0));
        assert!(!ctl.is_active());
        assert_eq!(sim.particles(), &before[..]);
    }

    #[test]
    fn test_begin_rejected_while_active() {
        let (mut sim, mut ctl) = setup(16);
        let mut view = 35.0;
        assert!(ctl.begin(&mut sim, Attractor::Aizawa, 0.0));
        ctl.tick(&mut sim, 300.0, &mut view);
        let progress = ctl.active().unwrap().progress();

        assert!(!ctl.begin(&mut sim, Attractor::Thomas, 300.0));
        let t = ctl.active().unwrap();
        assert_eq!(t.next(), Attractor::Aizawa);
        assert_eq!(t.progress(), progress);
    }

    #[test]
    fn test_twelve_steps_of_100_complete() {
        let (mut sim, mut ctl) = setup(32);
        let mut view = 35.0;
        ctl.begin(&mut sim, Attractor::Aizawa, 0.0);

        for step in 1..=12 {
            let status = ctl.tick(&mut sim, step as f64 * 100.0, &mut view).unwrap();
            if step < 12 {
                assert!(matches!(status, TransitionStatus::Running { .. }), "finished early at {}", step);
            } else {
                assert_eq!(status, TransitionStatus::Complete(Attractor::Aizawa));
            }
        }
        assert!(!ctl.is_active());
        assert_eq!(sim.attractor(), Attractor::Aizawa);
        assert!(ctl.tick(&mut sim, 1300.0, &mut view).is_none());
    }

    #[test]
    fn test_commit_uses_last_targets_exactly() {
        let (mut sim, mut ctl) = setup(32);
        let mut view = 35.0;
        ctl.begin(&mut sim, Attractor::Aizawa, 0.0);
        ctl.tick(&mut sim, 1100.0, &mut view);

        // The final tick runs with ease 1, advancing each target by a full step.
        let field = Attractor::Aizawa.field();
        let expected: Vec<Vec3> = ctl
            .active()
            .unwrap()
            .targets()
            .map(|t| field.advance(t, 1.0))
            .collect();

        let status = ctl.tick(&mut sim, 1200.0, &mut view).unwrap();
        assert_eq!(status, TransitionStatus::Complete(Attractor::Aizawa));
        for (p, e) in sim.particles().iter().zip(&expected) {
            assert_eq!(p.position, *e);
        }
    }

    #[test]
    fn test_midpoint_blends_colors_evenly() {
        let (mut sim, mut ctl) = setup(8);
        let mut view = 35.0;
        let start: Vec<Vec3> = sim.particles().iter().map(|p| p.color).collect();
        ctl.begin(&mut sim, Attractor::Thomas, 0.0);
        let status = ctl.tick(&mut sim, 600.0, &mut view).unwrap();
        assert_eq!(status, TransitionStatus::Running { progress: 0.5, ease: 0.5 });

        let colors = sim.colors();
        for (i, c0) in start.iter().enumerate() {
            let blended = Vec3::from_slice(&colors[i * 3..i * 3 + 3]);
            // Halfway between start and some color on the incoming palette.
            let end = blended * 2.0 - *c0;
            assert!(end.min_element() >= -1e-4 && end.max_element() <= 1.0 + 1e-4);
        }
    }

    #[test]
    fn test_view_distance_eases_two_percent_per_tick() {
        let (mut sim, mut ctl) = setup(4);
        let mut view = 35.0;
        ctl.begin(&mut sim, Attractor::Aizawa, 0.0);
        ctl.tick(&mut sim, 16.0, &mut view);
        assert!((view - (35.0 - 10.0 * 0.02)).abs() < 1e-5);
        ctl.tick(&mut sim, 32.0, &mut view);
        let expected = 34.8 + (25.0 - 34.8) * 0.02;
        assert!((view - expected).abs() < 1e-4);
    }

    #[test]
    fn test_each_trajectory_respawns_on_its_own_field() {
        let (mut sim, mut ctl) = setup(8);
        let mut view = 35.0;
        ctl.begin(&mut sim, Attractor::Aizawa, 0.0);
        if let Some(t) = ctl.active.as_mut() {
            t.slots[2].target = Vec3::NAN;
        }
        sim.particles[1].position = Vec3::splat(1e6);

        ctl.tick(&mut sim, 100.0, &mut view);

        let in_cube = |p: Vec3, field: &AttractorField| {
            (p - field.seed_offset).abs().max_element() <= 1.0 + 1e-4
        };
        let target = ctl.active().unwrap().targets().nth(2).unwrap();
        assert!(in_cube(target, Attractor::Aizawa.field()), "target {:?}", target);
        let position = sim.particles()[1].position;
        assert!(in_cube(position, Attractor::Lorenz.field()), "position {:?}", position);
    }

    #[test]
    fn test_outputs_stay_finite_through_transition() {
        let (mut sim, mut ctl) = setup(200);
        let mut view = 35.0;
        ctl.begin(&mut sim, Attractor::Halvorsen, 0.0);
        let mut now = 0.0;
        while ctl.is_active() {
            now += 16.0;
            ctl.tick(&mut sim, now, &mut view);
            assert!(sim.positions().iter().all(|v| v.is_finite()));
            assert!(sim.colors().iter().all(|v| v.is_finite()));
        }
        assert_eq!(sim.attractor(), Attractor::Halvorsen);
    }

    #[test]
    fn test_cancel_drops_transition() {
        let (mut sim, mut ctl) = setup(4);
        ctl.begin(&mut sim, Attractor::Dadras, 0.0);
        assert_eq!(ctl.cancel(), Some(Attractor::Dadras));
        assert!(!ctl.is_active());
        assert_eq!(sim.attractor(), Attractor::Lorenz);
    }
}
