//! The per-tick orchestrator.
//!
//! [`Engine`] wires the components together in the order data flows through
//! them each frame:
//!
//! 1. drain the hand inbox (at most one frame)
//! 2. classify the hand; a fired request cycles to the next attractor
//! 3. steer the camera from the palm, or orbit when no hand is present
//! 4. run the transition tick if morphing, otherwise the steady step
//! 5. hand back the render buffers, camera pose and notifications
//!
//! Nothing here runs on a timer. The host calls [`Engine::tick`] once per
//! rendered frame with the current time in milliseconds.

use crate::attractor::{validate_catalog, Attractor};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::gesture::{GestureClassifier, GestureConfig, GestureStatus};
use crate::input::{DetectorStatus, HandInbox, HandSender};
use crate::simulation::Simulation;
use crate::spawn::Seeder;
use crate::transition::{Transition, TransitionController, TransitionStatus};
use crate::viewpoint::{CameraPose, CameraSink, ViewpointController};
use tracing::{debug, info, warn};

/// Notifications produced during a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineEvent {
    /// A closed-hand gesture asked to move on to this attractor.
    SwitchRequested(Attractor),
    /// This attractor became current, by a finished transition or an
    /// immediate switch.
    AttractorSwitched(Attractor),
}

/// What a switch request did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// Population replaced on the spot.
    Immediate,
    /// An animated transition began.
    Started,
    /// Nothing changed: already current, or a transition is running.
    Ignored,
}

/// Everything the renderer and UI need from one tick.
#[derive(Debug)]
pub struct TickOutput<'a> {
    /// Flat positions, 3 floats per particle.
    pub positions: &'a [f32],
    /// Flat RGB colors (0-1), index-aligned with `positions`.
    pub colors: &'a [f32],
    pub camera: CameraPose,
    pub events: Vec<EngineEvent>,
    pub gesture: GestureStatus,
    pub detector: &'a DetectorStatus,
    /// Transition state when morphing this tick.
    pub transition: Option<TransitionStatus>,
}

/// Attractor particle engine with gesture-driven switching.
pub struct Engine {
    config: EngineConfig,
    simulation: Simulation,
    transitions: TransitionController,
    gesture: GestureClassifier,
    viewpoint: ViewpointController,
    inbox: HandInbox,
    detector: DetectorStatus,
    pending: Vec<EngineEvent>,
}

impl Engine {
    /// Validate `config` and the attractor catalog, then seed the population.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        validate_catalog()?;

        let attractor = config.initial_attractor;
        let seeder = Seeder::new(config.seed, config.burn_in(), config.divergence_bound);
        let simulation = Simulation::new(
            attractor,
            config.particle_count,
            seeder,
            config.min_view_distance,
        );
        let viewpoint = ViewpointController::new(
            attractor.field().view_distance,
            config.camera_smoothing,
            config.camera_height,
            config.auto_orbit_speed,
        );
        let gesture = GestureClassifier::new(GestureConfig {
            curl_ratio: config.curl_ratio,
            fingers_to_close: config.curled_fingers_to_close,
            debounce_ms: config.debounce_ms,
        });
        let transitions =
            TransitionController::new(config.transition_duration_ms, config.distance_easing);

        info!(
            attractor = %attractor,
            particles = config.particle_count,
            seeded = config.seed.is_some(),
            "Engine ready"
        );

        Ok(Self {
            config,
            simulation,
            transitions,
            gesture,
            viewpoint,
            inbox: HandInbox::new(),
            detector: DetectorStatus::default(),
            pending: Vec::new(),
        })
    }

    /// Switch to `attractor`, animated or not.
    ///
    /// Animated requests are dropped while a transition runs or when the
    /// attractor is already current. Immediate requests discard any running
    /// transition, reseed the population and jump the view distance.
    pub fn request_switch(&mut self, attractor: Attractor, animate: bool, now: f64) -> SwitchOutcome {
        if animate {
            return if self.transitions.begin(&mut self.simulation, attractor, now) {
                SwitchOutcome::Started
            } else {
                SwitchOutcome::Ignored
            };
        }

        if !self.transitions.is_active() && attractor == self.simulation.attractor() {
            debug!(requested = %attractor, "Immediate switch to current attractor ignored");
            return SwitchOutcome::Ignored;
        }
        if let Some(abandoned) = self.transitions.cancel() {
            debug!(abandoned = %abandoned, "Discarded running transition");
        }

        let distance = attractor.field().view_distance;
        self.simulation.seed_population(attractor);
        self.viewpoint.set_view_distance(distance);
        self.pending.push(EngineEvent::AttractorSwitched(attractor));
        info!(attractor = %attractor, "Switched immediately");
        SwitchOutcome::Immediate
    }

    /// [`request_switch`](Self::request_switch) by string id.
    ///
    /// Unknown ids are rejected and leave all state untouched.
    pub fn request_switch_named(&mut self, id: &str, animate: bool, now: f64) -> Result<SwitchOutcome> {
        let attractor = id.parse::<Attractor>().map_err(|e| {
            warn!(id, "Rejected switch to unknown attractor");
            e
        })?;
        Ok(self.request_switch(attractor, animate, now))
    }

    /// Report the detector's lifecycle. Frames are ignored unless `Ready`.
    pub fn set_detector_status(&mut self, status: DetectorStatus) {
        if status == self.detector {
            return;
        }
        match &status {
            DetectorStatus::Failed(reason) => {
                warn!(reason = %reason, "Hand detector failed, hand control disabled")
            }
            other => debug!(status = %other, "Hand detector status changed"),
        }
        self.detector = status;
    }

    /// Advance one frame.
    pub fn tick(&mut self, now: f64) -> TickOutput<'_> {
        let mut pose = CameraPose::default();
        self.tick_with_camera(now, &mut pose)
    }

    /// Advance one frame, also writing the camera pose to `camera`.
    pub fn tick_with_camera(&mut self, now: f64, camera: &mut dyn CameraSink) -> TickOutput<'_> {
        let pending_frame = self.inbox.take();
        let frame = pending_frame.filter(|_| self.detector.is_ready());

        let reading = self.gesture.update(frame.as_ref(), now);
        if reading.switch_requested {
            let next = self.simulation.attractor().next();
            self.pending.push(EngineEvent::SwitchRequested(next));
            self.request_switch(next, true, now);
        }

        let field_distance = self.simulation.attractor().field().view_distance;
        let pose = self
            .viewpoint
            .update(frame.as_ref().map(|f| f.palm()), field_distance, camera);

        let transition = self.transitions.tick(
            &mut self.simulation,
            now,
            self.viewpoint.view_distance_mut(),
        );
        match transition {
            Some(TransitionStatus::Complete(attractor)) => {
                self.pending.push(EngineEvent::AttractorSwitched(attractor));
            }
            Some(TransitionStatus::Running { .. }) => {}
            None => {
                self.simulation.step(self.viewpoint.view_distance());
            }
        }

        TickOutput {
            positions: self.simulation.positions(),
            colors: self.simulation.colors(),
            camera: pose,
            events: std::mem::take(&mut self.pending),
            gesture: reading.status,
            detector: &self.detector,
            transition,
        }
    }

    /// The current attractor (the outgoing one while morphing).
    pub fn attractor(&self) -> Attractor {
        self.simulation.attractor()
    }

    /// The running transition, if any.
    pub fn transition(&self) -> Option<&Transition> {
        self.transitions.active()
    }

    /// Whether a transition is running.
    pub fn is_transitioning(&self) -> bool {
        self.transitions.is_active()
    }

    /// Read-only access to the particle population.
    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Current view distance used for display scaling.
    pub fn view_distance(&self) -> f32 {
        self.viewpoint.view_distance()
    }

    /// Camera state.
    pub fn viewpoint(&self) -> &ViewpointController {
        &self.viewpoint
    }

    /// Handle for the hand detector to push frames through.
    pub fn hand_sender(&self) -> HandSender {
        self.inbox.sender()
    }

    /// The inbox drained each tick.
    pub fn inbox(&self) -> &HandInbox {
        &self.inbox
    }

    /// Current detector status.
    pub fn detector_status(&self) -> &DetectorStatus {
        &self.detector
    }

    /// Configuration the engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
