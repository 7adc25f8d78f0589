//! Camera control from palm position, with idle auto-orbit.
//!
//! With a hand in view the palm's horizontal position picks an azimuth around
//! the origin and its vertical position picks the camera height. The camera
//! glides toward that target by a fixed fraction per tick. Without a hand the
//! camera slowly orbits the origin while its radius glides toward the current
//! view distance at the same rate.
//!
//! The controller also owns the view distance itself, which the transition
//! controller eases toward the incoming field while morphing.

use crate::{Vec2, Vec3};
use glam::Quat;
use std::f32::consts::PI;

/// Where the camera is and what it looks at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::Z,
            look_at: Vec3::ZERO,
        }
    }
}

/// Receiver for camera poses, typically the renderer's camera.
pub trait CameraSink {
    fn apply(&mut self, pose: &CameraPose);
}

/// Storing the pose is the simplest sink.
impl CameraSink for CameraPose {
    fn apply(&mut self, pose: &CameraPose) {
        *self = *pose;
    }
}

/// Smoothed hand-driven camera.
#[derive(Debug)]
pub struct ViewpointController {
    position: Vec3,
    view_distance: f32,
    auto_orbit: bool,
    /// Fraction of the remaining gap covered per tick (per axis).
    pub smoothing: f32,
    /// Camera height at the frame's top/bottom edge.
    pub height: f32,
    /// Idle orbit speed, radians per tick.
    pub orbit_speed: f32,
}

impl ViewpointController {
    /// Start on the +Z axis at `view_distance`, orbiting.
    pub fn new(view_distance: f32, smoothing: f32, height: f32, orbit_speed: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, view_distance),
            view_distance,
            auto_orbit: true,
            smoothing,
            height,
            orbit_speed,
        }
    }

    /// Target camera position for a palm at `palm` (frame coordinates, 0-1).
    pub fn target_for(&self, palm: Vec2, radius: f32) -> Vec3 {
        let n = palm * 2.0 - Vec2::ONE;
        let azimuth = n.x * PI;
        Vec3::new(azimuth.sin() * radius, n.y * -self.height, azimuth.cos() * radius)
    }

    /// Move the camera one tick and hand the pose to `sink`.
    ///
    /// `field_distance` is the current field's framing distance, used as the
    /// orbit radius while a hand steers the camera.
    pub fn update(&mut self, palm: Option<Vec2>, field_distance: f32, sink: &mut dyn CameraSink) -> CameraPose {
        match palm {
            Some(palm) => {
                self.auto_orbit = false;
                let target = self.target_for(palm, field_distance);
                self.position += (target - self.position) * self.smoothing;
            }
            None => {
                self.auto_orbit = true;
                let rotated = Quat::from_rotation_y(self.orbit_speed) * self.position;
                let radius = rotated.length();
                let radius = radius + (self.view_distance - radius) * self.smoothing;
                self.position = rotated.try_normalize().unwrap_or(Vec3::Z) * radius;
            }
        }

        let pose = self.pose();
        sink.apply(&pose);
        pose
    }

    /// Current pose without moving.
    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position,
            look_at: Vec3::ZERO,
        }
    }

    /// Whether the idle orbit is running.
    pub fn auto_orbit(&self) -> bool {
        self.auto_orbit
    }

    /// Distance used for display scaling and the idle orbit.
    pub fn view_distance(&self) -> f32 {
        self.view_distance
    }

    /// Jump the view distance, used for immediate switches.
    pub fn set_view_distance(&mut self, distance: f32) {
        self.view_distance = distance;
    }

    pub(crate) fn view_distance_mut(&mut self) -> &mut f32 {
        &mut self.view_distance
    }
}
