//! Hand-frame delivery from the external landmark detector.
//!
//! The detector runs at its own pace and pushes results through a
//! [`HandSender`]. The engine drains the matching [`HandInbox`] once per
//! tick. The inbox holds a single frame: a newer push overwrites an older one
//! that was never drained, and a tick that finds the slot empty runs with no
//! hand.
//!
//! # Usage
//!
//! ```ignore
//! let sender = engine.hand_sender();
//! detector.on_result(move |points| {
//!     if let Some(frame) = HandFrame::from_slice(points) {
//!         sender.push(frame);
//!     }
//! });
//! ```

use crate::gesture::HandFrame;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// Lifecycle of the external detector, shown to the user.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum DetectorStatus {
    /// Model still loading; hand control inactive.
    #[default]
    Initializing,
    /// Frames are being delivered.
    Ready,
    /// Detector could not start. Hand control stays inactive, the
    /// simulation is unaffected.
    Failed(String),
}

impl DetectorStatus {
    /// Whether hand frames should be acted on.
    pub fn is_ready(&self) -> bool {
        matches!(self, DetectorStatus::Ready)
    }
}

impl fmt::Display for DetectorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectorStatus::Initializing => f.write_str("initializing"),
            DetectorStatus::Ready => f.write_str("ready"),
            DetectorStatus::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

type Slot = Arc<Mutex<Option<HandFrame>>>;

fn lock(slot: &Slot) -> MutexGuard<'_, Option<HandFrame>> {
    // The slot only ever holds a whole frame, so a poisoned lock is still usable.
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Single-slot, last-write-wins mailbox drained by the engine.
#[derive(Debug, Default)]
pub struct HandInbox {
    slot: Slot,
}

impl HandInbox {
    /// Create an empty inbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for the detector side. Cheap to clone, `Send`.
    pub fn sender(&self) -> HandSender {
        HandSender {
            slot: Arc::clone(&self.slot),
        }
    }

    /// Deliver a frame directly (same-thread detectors).
    pub fn push(&self, frame: HandFrame) {
        *lock(&self.slot) = Some(frame);
    }

    /// Take the pending frame, leaving the slot empty.
    pub fn take(&self) -> Option<HandFrame> {
        lock(&self.slot).take()
    }

    /// Whether a frame is waiting.
    pub fn is_pending(&self) -> bool {
        lock(&self.slot).is_some()
    }
}

/// Detector-side handle to a [`HandInbox`].
#[derive(Clone, Debug)]
pub struct HandSender {
    slot: Slot,
}

impl HandSender {
    /// Deliver a frame, replacing any undrained one.
    pub fn push(&self, frame: HandFrame) {
        *lock(&self.slot) = Some(frame);
    }
}
