//! # attractor-morph
//!
//! Particles tracing strange attractors, with smooth morphing between fields
//! and hand-gesture control.
//!
//! The engine is a pure per-tick state machine. It never renders, opens a
//! window or talks to a camera: the host feeds it timestamps and optional
//! hand-landmark frames, and reads back flat position/color buffers and a
//! camera pose.
//!
//! ## Quick Start
//!
//! ```ignore
//! use attractor_morph::prelude::*;
//!
//! let mut engine = Engine::new(EngineConfig::default())?;
//! let sender = engine.hand_sender();          // give this to the detector
//! engine.set_detector_status(DetectorStatus::Ready);
//!
//! let mut clock = TickClock::new();
//! loop {
//!     let out = engine.tick(clock.tick());
//!     renderer.upload(out.positions, out.colors);
//!     renderer.set_camera(out.camera);
//!     for event in out.events {
//!         println!("{:?}", event);
//!     }
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Attractors
//!
//! [`Attractor`] is a closed set of chaotic systems. Each carries an
//! immutable [`AttractorField`]: the vector field, its Euler step, and how it
//! is scaled, offset and colored for display.
//!
//! ### Switching
//!
//! [`Engine::request_switch`] either reseeds the population on the new field
//! immediately or starts a [`Transition`], during which every particle is
//! integrated on both fields at once and blended with a cubic ease.
//!
//! ### Gestures
//!
//! Closing an open hand fires one switch request to the next attractor; a
//! debounce window swallows repeats. The palm position steers the camera.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (transitions at `info`, gesture edges
//! and divergence repairs at `debug`). Install a subscriber to see them.

pub mod attractor;
pub mod config;
mod engine;
pub mod error;
pub mod gesture;
pub mod input;
mod simulation;
mod spawn;
pub mod time;
pub mod transition;
pub mod viewpoint;

pub use attractor::{lookup, Attractor, AttractorField};
pub use config::EngineConfig;
pub use engine::{Engine, EngineEvent, SwitchOutcome, TickOutput};
pub use error::{ConfigError, MorphError, Result};
pub use gesture::{GestureClassifier, GestureConfig, GestureReading, GestureStatus, HandFrame};
pub use glam::{Vec2, Vec3};
pub use input::{DetectorStatus, HandInbox, HandSender};
pub use simulation::{Particle, Simulation};
pub use spawn::{hsv_to_rgb, Seeder};
pub use time::TickClock;
pub use transition::{ease_in_out_cubic, Transition, TransitionController, TransitionStatus};
pub use viewpoint::{CameraPose, CameraSink, ViewpointController};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use attractor_morph::prelude::*;
/// ```
pub mod prelude {
    pub use crate::attractor::{Attractor, AttractorField};
    pub use crate::config::EngineConfig;
    pub use crate::engine::{Engine, EngineEvent, SwitchOutcome, TickOutput};
    pub use crate::gesture::{GestureStatus, HandFrame};
    pub use crate::input::{DetectorStatus, HandSender};
    pub use crate::time::TickClock;
    pub use crate::viewpoint::{CameraPose, CameraSink};
    pub use crate::{Vec2, Vec3};
}
