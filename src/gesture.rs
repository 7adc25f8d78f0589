//! Open/closed hand classification with edge-triggered switch requests.
//!
//! The classifier looks at one optional [`HandFrame`] per tick. A fist is
//! detected from how far each fingertip sits from the wrist relative to its
//! knuckle; closing the hand after it was seen open fires a single switch
//! request, after which a debounce window swallows further closings.
//!
//! Losing the hand clears the edge detector, so a hand that reappears already
//! closed never fires on its own.

use crate::{Vec2, Vec3};
use tracing::debug;

/// Number of landmarks in a hand frame.
pub const LANDMARK_COUNT: usize = 21;

/// Landmark indices used by the classifier.
pub mod landmark {
    pub const WRIST: usize = 0;
    pub const INDEX_BASE: usize = 5;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_BASE: usize = 9;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_BASE: usize = 13;
    pub const RING_TIP: usize = 16;
    pub const PINKY_BASE: usize = 17;
    pub const PINKY_TIP: usize = 20;
    /// Reference point for viewpoint control.
    pub const PALM_CENTER: usize = MIDDLE_BASE;

    /// (base, tip) for index, middle, ring and pinky.
    pub const FINGERS: [(usize, usize); 4] = [
        (INDEX_BASE, INDEX_TIP),
        (MIDDLE_BASE, MIDDLE_TIP),
        (RING_BASE, RING_TIP),
        (PINKY_BASE, PINKY_TIP),
    ];
}

/// One detected hand: 21 landmarks with x, y normalized to the frame (0-1).
///
/// `z` is relative depth when the detector supplies it, 0 otherwise.
#[derive(Clone, Debug, PartialEq)]
pub struct HandFrame {
    landmarks: [Vec3; LANDMARK_COUNT],
}

impl HandFrame {
    /// Wrap a full set of landmarks.
    pub fn new(landmarks: [Vec3; LANDMARK_COUNT]) -> Self {
        Self { landmarks }
    }

    /// Build from a detector's point list. `None` unless exactly 21 points.
    pub fn from_slice(points: &[Vec3]) -> Option<Self> {
        let landmarks: [Vec3; LANDMARK_COUNT] = points.try_into().ok()?;
        Some(Self { landmarks })
    }

    /// Landmark `index` (see [`landmark`]), `None` past the last one.
    #[inline]
    pub fn landmark(&self, index: usize) -> Option<Vec3> {
        self.landmarks.get(index).copied()
    }

    /// All landmarks.
    pub fn landmarks(&self) -> &[Vec3; LANDMARK_COUNT] {
        &self.landmarks
    }

    /// Palm reference point in frame coordinates.
    pub fn palm(&self) -> Vec2 {
        self.landmarks[landmark::PALM_CENTER].truncate()
    }
}

/// Hand state shown to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureStatus {
    /// No hand this tick.
    NoHand,
    HandOpen,
    HandClosed,
}

/// Thresholds for classification and debounce.
#[derive(Clone, Debug)]
pub struct GestureConfig {
    /// Finger counts as curled when tip-to-wrist < ratio × base-to-wrist.
    pub curl_ratio: f32,
    /// How many of the four fingers must be curled for a fist.
    pub fingers_to_close: usize,
    /// Time after a fired request during which closings are ignored.
    pub debounce_ms: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            curl_ratio: 1.2,
            fingers_to_close: 3,
            debounce_ms: 1000.0,
        }
    }
}

/// Result of classifying one tick's input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureReading {
    pub status: GestureStatus,
    /// True on the tick an open hand closed outside the debounce window.
    pub switch_requested: bool,
}

/// Edge-triggered fist detector.
#[derive(Debug, Default)]
pub struct GestureClassifier {
    pub config: GestureConfig,
    last_closed: Option<bool>,
    debounce_until: Option<f64>,
}

impl GestureClassifier {
    /// Create a classifier with the given thresholds.
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            last_closed: None,
            debounce_until: None,
        }
    }

    /// Whether `frame` shows a closed hand.
    pub fn is_closed(&self, frame: &HandFrame) -> bool {
        let points = frame.landmarks();
        let wrist = points[landmark::WRIST];
        let curled = landmark::FINGERS
            .iter()
            .filter(|&&(base, tip)| {
                let tip_dist = points[tip].distance(wrist);
                let base_dist = points[base].distance(wrist);
                tip_dist < self.config.curl_ratio * base_dist
            })
            .count();
        curled >= self.config.fingers_to_close
    }

    /// Classify this tick's frame and report whether a switch should fire.
    pub fn update(&mut self, frame: Option<&HandFrame>, now: f64) -> GestureReading {
        let Some(frame) = frame else {
            self.last_closed = None;
            return GestureReading {
                status: GestureStatus::NoHand,
                switch_requested: false,
            };
        };

        let closed = self.is_closed(frame);
        let edge = closed && self.last_closed == Some(false);
        let debounced = self.debounce_until.is_some_and(|until| now < until);
        let fired = edge && !debounced;

        if fired {
            self.debounce_until = Some(now + self.config.debounce_ms);
            debug!(now, "Hand closed, switch requested");
        } else if edge {
            debug!(now, "Hand closed inside debounce window, ignored");
        }
        self.last_closed = Some(closed);

        GestureReading {
            status: if closed {
                GestureStatus::HandClosed
            } else {
                GestureStatus::HandOpen
            },
            switch_requested: fired,
        }
    }

    /// Last observed hand state; `None` after the hand was lost.
    pub fn last_closed(&self) -> Option<bool> {
        self.last_closed
    }

    /// Forget all state.
    pub fn reset(&mut self) {
        self.last_closed = None;
        self.debounce_until = None;
    }
}
