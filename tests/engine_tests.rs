//! Integration tests for the engine.
//!
//! These drive [`Engine`] only through its public surface: timestamps in,
//! hand frames through the sender, buffers and events out.

use attractor_morph::gesture::{landmark, LANDMARK_COUNT};
use attractor_morph::prelude::*;
use attractor_morph::{MorphError, TransitionStatus};

fn engine(count: usize) -> Engine {
    Engine::new(EngineConfig::new().with_particle_count(count).with_seed(42)).unwrap()
}

fn hand(closed: bool) -> HandFrame {
    let mut points = [Vec3::new(0.5, 0.9, 0.0); LANDMARK_COUNT];
    for (i, &(base, tip)) in landmark::FINGERS.iter().enumerate() {
        let x = 0.44 + i as f32 * 0.04;
        points[base] = Vec3::new(x, 0.7, 0.0);
        points[tip] = Vec3::new(x, if closed { 0.8 } else { 0.45 }, 0.0);
    }
    HandFrame::new(points)
}

fn ready(count: usize) -> (Engine, HandSender) {
    let mut e = engine(count);
    e.set_detector_status(DetectorStatus::Ready);
    let sender = e.hand_sender();
    (e, sender)
}

// ============================================================================
// Transitions
// ============================================================================

#[test]
fn test_transition_lorenz_to_aizawa() {
    let mut e = engine(200);
    assert_eq!(e.request_switch(Attractor::Aizawa, true, 0.0), SwitchOutcome::Started);

    let out = e.tick(600.0);
    assert_eq!(
        out.transition,
        Some(TransitionStatus::Running {
            progress: 0.5,
            ease: 0.5
        })
    );
    assert_eq!(e.attractor(), Attractor::Lorenz);

    let targets: Vec<Vec3> = e.transition().unwrap().targets().collect();
    let field = Attractor::Aizawa.field();

    let out = e.tick(1200.0);
    assert_eq!(out.transition, Some(TransitionStatus::Complete(Attractor::Aizawa)));
    assert_eq!(out.events, vec![EngineEvent::AttractorSwitched(Attractor::Aizawa)]);

    assert_eq!(e.attractor(), Attractor::Aizawa);
    assert!(!e.is_transitioning());
    for (p, t) in e.simulation().particles().iter().zip(&targets) {
        assert_eq!(p.position, field.advance(*t, 1.0));
    }
}

#[test]
fn test_transition_blends_colors() {
    let mut e = engine(50);
    let start: Vec<f32> = e.simulation().colors().to_vec();
    e.request_switch(Attractor::Thomas, true, 0.0);

    let out = e.tick(600.0);
    let mid = out.colors.to_vec();
    let out = e.tick(1200.0);
    let end = out.colors.to_vec();

    for ((s, m), f) in start.iter().zip(&mid).zip(&end) {
        assert!((m - (s * 0.5 + f * 0.5)).abs() < 1e-5);
    }
}

#[test]
fn test_switch_requests_dropped_while_morphing() {
    let mut e = engine(50);
    assert_eq!(e.request_switch(Attractor::Thomas, true, 0.0), SwitchOutcome::Started);
    e.tick(100.0);
    assert_eq!(e.request_switch(Attractor::Dadras, true, 200.0), SwitchOutcome::Ignored);
    assert_eq!(e.transition().unwrap().next(), Attractor::Thomas);
    assert_eq!(e.transition().unwrap().start_time(), 0.0);
}

#[test]
fn test_switch_to_current_is_noop() {
    let mut e = engine(50);
    assert_eq!(e.request_switch(Attractor::Lorenz, true, 0.0), SwitchOutcome::Ignored);
    assert!(!e.is_transitioning());
}

#[test]
fn test_view_distance_eases_toward_target() {
    let mut e = engine(20);
    e.request_switch(Attractor::Halvorsen, true, 0.0);
    let mut last = e.view_distance();
    for tick in 1..=20 {
        e.tick(tick as f64 * 16.0);
        let now = e.view_distance();
        assert!(now > last && now < 40.0);
        last = now;
    }
}

// ============================================================================
// Gestures
// ============================================================================

#[test]
fn test_close_after_open_fires_once() {
    let (mut e, sender) = ready(30);
    sender.push(hand(false));
    assert_eq!(e.tick(0.0).gesture, GestureStatus::HandOpen);

    sender.push(hand(true));
    let out = e.tick(16.0);
    assert_eq!(out.gesture, GestureStatus::HandClosed);
    assert_eq!(out.events, vec![EngineEvent::SwitchRequested(Attractor::Aizawa)]);

    sender.push(hand(true));
    assert!(e.tick(32.0).events.is_empty());
}

#[test]
fn test_hand_appearing_closed_does_not_fire() {
    let (mut e, sender) = ready(30);
    sender.push(hand(true));
    let out = e.tick(0.0);
    assert_eq!(out.gesture, GestureStatus::HandClosed);
    assert!(out.events.is_empty());
    assert!(!e.is_transitioning());
}

#[test]
fn test_debounce_through_inbox() {
    let (mut e, sender) = ready(30);
    let mut requested = Vec::new();
    let script = [
        (0.0, false),
        (16.0, true),
        (100.0, false),
        (200.0, true),
        (1100.0, false),
        (1200.0, true),
    ];
    for (now, closed) in script {
        sender.push(hand(closed));
        let out = e.tick(now);
        requested.extend(out.events.iter().filter_map(|ev| match ev {
            EngineEvent::SwitchRequested(a) => Some((now, *a)),
            _ => None,
        }));
    }

    // The second close is debounced, the third is requested but lands while
    // the first transition is still running.
    assert_eq!(
        requested,
        vec![(16.0, Attractor::Aizawa), (1200.0, Attractor::Aizawa)]
    );
    assert_eq!(e.transition().unwrap().next(), Attractor::Aizawa);
    assert_eq!(e.transition().unwrap().start_time(), 16.0);
}

#[test]
fn test_losing_hand_resets_edge() {
    let (mut e, sender) = ready(30);
    sender.push(hand(false));
    e.tick(0.0);
    e.tick(16.0);
    sender.push(hand(true));
    assert!(e.tick(32.0).events.is_empty());
}

#[test]
fn test_last_pushed_frame_wins() {
    let (mut e, sender) = ready(30);
    sender.push(hand(false));
    e.tick(0.0);
    sender.push(hand(false));
    sender.push(hand(true));
    assert_eq!(e.tick(16.0).gesture, GestureStatus::HandClosed);
}

#[test]
fn test_no_hand_orbits_camera() {
    let mut e = engine(10);
    let first = e.tick(0.0).camera.position;
    let second = e.tick(16.0).camera.position;
    assert!(e.viewpoint().auto_orbit());
    assert!(first.distance(second) > 0.0);
    assert!((second.length() - e.view_distance()).abs() < 1e-3);
}

#[test]
fn test_camera_sink_receives_pose() {
    let (mut e, sender) = ready(10);
    let mut sink = CameraPose::default();
    sender.push(hand(false));
    let pose = e.tick_with_camera(0.0, &mut sink).camera;
    assert_eq!(pose, sink);
    assert!(!e.viewpoint().auto_orbit());
}

// ============================================================================
// Stability
// ============================================================================

#[test]
fn test_every_field_stays_finite() {
    for attractor in Attractor::ALL {
        let mut e = Engine::new(
            EngineConfig::new()
                .with_particle_count(100)
                .with_attractor(attractor)
                .with_seed(7),
        )
        .unwrap();
        for tick in 0..500 {
            let out = e.tick(tick as f64 * 16.0);
            assert!(out.positions.iter().all(|v| v.is_finite()), "{}", attractor);
        }
        assert!(e
            .simulation()
            .particles()
            .iter()
            .all(|p| p.position.is_finite() && p.position.length() <= 200.0));
    }
}

#[test]
fn test_seeded_engines_match() {
    let mut a = engine(64);
    let mut b = engine(64);
    for tick in 0..50 {
        let now = tick as f64 * 16.0;
        assert_eq!(a.tick(now).positions, b.tick(now).positions);
    }
}

// ============================================================================
// Immediate switching and errors
// ============================================================================

#[test]
fn test_immediate_switch_reseeds() {
    let mut e = engine(100);
    assert_eq!(e.request_switch(Attractor::Dadras, false, 0.0), SwitchOutcome::Immediate);
    assert_eq!(e.attractor(), Attractor::Dadras);
    assert_eq!(e.view_distance(), 40.0);
    assert_eq!(e.simulation().len(), 100);
    let out = e.tick(16.0);
    assert_eq!(out.events, vec![EngineEvent::AttractorSwitched(Attractor::Dadras)]);
}

#[test]
fn test_unknown_field_rejected() {
    let mut e = engine(10);
    let err = e.request_switch_named("chua", false, 0.0).unwrap_err();
    assert!(matches!(err, MorphError::UnknownField(ref id) if id == "chua"));
    assert_eq!(e.attractor(), Attractor::Lorenz);
}

#[test]
fn test_config_from_json() {
    let config = EngineConfig::from_json(r#"{"particle_count": 12, "initial_attractor": "thomas"}"#)
        .unwrap();
    let e = Engine::new(config).unwrap();
    assert_eq!(e.attractor(), Attractor::Thomas);
    assert_eq!(e.simulation().len(), 12);
}
