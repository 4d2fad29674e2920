//! Gesture session: both classifiers plus calibration behind one entry point.
//!
//! The session owns all per-stream state. Frames go in through
//! [`GestureSession::evaluate`], which yields a [`FrameOutcome`] holding at
//! most one blink and at most one tilt. Blinks counted toward calibration
//! never appear as consumer blinks, so marking cannot happen while
//! calibrating.

use crate::blink::{BlinkClassifier, BlinkEvent};
use crate::calibration::{CalibrationController, CalibrationStep};
use crate::config::Config;
use crate::landmarks::LandmarkFrame;
use crate::tilt::{TiltClassifier, TiltDirection, TiltEvent};
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

/// Consumer-side gesture notifications
pub trait GestureListener {
    /// A blink outside calibration
    fn on_blink(&mut self) {}

    /// A confirmed left tilt
    fn on_tilt_left(&mut self) {}

    /// A confirmed right tilt
    fn on_tilt_right(&mut self) {}

    /// A blink was counted toward calibration
    fn on_calibration_progress(&mut self, _blinks: u32, _target: u32) {}

    /// Calibration reached its target
    fn on_calibration_complete(&mut self) {}
}

/// What one evaluation produced
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameOutcome {
    /// Whether the classifiers ran for this frame
    pub evaluated: bool,
    /// Whether the frame carried a face
    pub face_present: bool,
    /// Blink delivered to the consumer
    pub blink: Option<BlinkEvent>,
    /// Tilt delivered to the consumer
    pub tilt: Option<TiltEvent>,
    /// Calibration progress caused by this frame's blink
    pub calibration: Option<CalibrationStep>,
}

impl FrameOutcome {
    /// Forward this outcome's events to a listener
    pub fn dispatch<L: GestureListener + ?Sized>(&self, listener: &mut L) {
        if self.blink.is_some() {
            listener.on_blink();
        }
        match self.calibration {
            Some(CalibrationStep::Progress { blinks, target }) => listener.on_calibration_progress(blinks, target),
            Some(CalibrationStep::Completed) => listener.on_calibration_complete(),
            Some(CalibrationStep::NotCalibrating) | None => {}
        }
        match self.tilt {
            Some(TiltEvent::Left) => listener.on_tilt_left(),
            Some(TiltEvent::Right) => listener.on_tilt_right(),
            None => {}
        }
    }

    /// True when any event was produced
    #[must_use]
    pub fn has_events(&self) -> bool {
        self.blink.is_some() || self.tilt.is_some() || self.calibration.is_some()
    }
}

/// Snapshot of session state for UI feedback
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GestureStatus {
    /// Session started and not stopped
    pub running: bool,
    /// Last frame carried a face
    pub face_present: bool,
    /// A closure is currently confirmed
    pub is_blinking: bool,
    /// Confirmed tilt direction
    pub tilt_direction: TiltDirection,
    /// Calibration is running
    pub calibrating: bool,
    /// Blinks counted toward calibration
    pub calibration_blinks: u32,
    /// Session blinks since the last count reset
    pub blink_count: u32,
    /// Left tilts since the last count reset
    pub tilt_left_count: u32,
    /// Right tilts since the last count reset
    pub tilt_right_count: u32,
    /// Frames the classifiers ran on
    pub frames_evaluated: u64,
    /// Frames that arrived without a face
    pub frames_without_face: u64,
    /// Averaged eye openness of the last evaluated frame
    pub openness: Option<f64>,
    /// Head roll of the last evaluated frame
    pub roll_degrees: Option<f64>,
}

/// Per-stream gesture state
#[derive(Debug, Clone)]
pub struct GestureSession {
    blink: BlinkClassifier,
    tilt: TiltClassifier,
    calibration: CalibrationController,
    calibrate_on_start: bool,
    required_points: usize,
    running: bool,
    face_present: bool,
    last_timestamp_ms: Option<u64>,
    frames_evaluated: u64,
    frames_without_face: u64,
}

impl GestureSession {
    /// Build a stopped session from configuration
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            blink: BlinkClassifier::new(config.blink.clone(), config.landmarks.clone()),
            tilt: TiltClassifier::new(config.tilt.clone(), config.landmarks.clone()),
            calibration: CalibrationController::new(&config.calibration),
            calibrate_on_start: config.calibration.enabled,
            required_points: config.landmarks.required_points(),
            running: false,
            face_present: false,
            last_timestamp_ms: None,
            frames_evaluated: 0,
            frames_without_face: 0,
        }
    }

    /// Reset all state and begin accepting frames, entering calibration if enabled
    pub fn start(&mut self) {
        self.clear();
        if self.calibrate_on_start {
            self.calibration.begin();
        }
        self.running = true;
        info!("Gesture session started");
    }

    /// Stop accepting frames and reset all state
    pub fn stop(&mut self) {
        if self.running {
            info!(
                "Gesture session stopped after {} frames ({} without face)",
                self.frames_evaluated, self.frames_without_face
            );
        }
        self.clear();
        self.running = false;
    }

    /// Zero blink and tilt counters without stopping
    pub fn reset_counts(&mut self) {
        self.blink.reset_counts();
        self.tilt.reset_counts();
        debug!("Gesture counters reset");
    }

    /// Leave calibration early. Returns true if calibration was running.
    pub fn skip_calibration(&mut self) -> bool {
        let skipped = self.calibration.skip();
        if skipped {
            self.blink.reset_counts();
        }
        skipped
    }

    /// Evaluate one frame. `None` or an empty frame means no face was detected;
    /// classifier state is then left untouched.
    pub fn evaluate(&mut self, frame: Option<&LandmarkFrame>, now_ms: u64) -> FrameOutcome {
        if !self.running {
            debug!("Frame at {now_ms} ms ignored: session not running");
            return FrameOutcome::default();
        }

        if let Some(last) = self.last_timestamp_ms {
            if now_ms < last {
                warn!("Out-of-order frame at {now_ms} ms rejected (last accepted {last} ms)");
                return FrameOutcome {
                    face_present: frame.is_some_and(|f| !f.is_empty()),
                    ..FrameOutcome::default()
                };
            }
        }
        self.last_timestamp_ms = Some(now_ms);

        let Some(frame) = frame.filter(|f| !f.is_empty()) else {
            if self.face_present {
                debug!("Face lost at {now_ms} ms");
            }
            self.face_present = false;
            self.frames_without_face += 1;
            return FrameOutcome::default();
        };

        self.face_present = true;
        self.frames_evaluated += 1;
        if frame.len() < self.required_points {
            debug!(
                "Frame at {now_ms} ms has {} of {} landmarks; missing points read as neutral",
                frame.len(),
                self.required_points
            );
        }

        let raw_blink = self.blink.evaluate(frame, now_ms);
        let tilt = self.tilt.evaluate(frame, now_ms);

        let mut outcome = FrameOutcome {
            evaluated: true,
            face_present: true,
            blink: None,
            tilt,
            calibration: None,
        };

        if let Some(blink) = raw_blink {
            match self.calibration.record_blink() {
                CalibrationStep::NotCalibrating => outcome.blink = Some(blink),
                step @ CalibrationStep::Progress { .. } => outcome.calibration = Some(step),
                step @ CalibrationStep::Completed => {
                    self.blink.reset_counts();
                    outcome.calibration = Some(step);
                }
            }
        }

        outcome
    }

    /// Current state for UI feedback
    #[must_use]
    pub fn status(&self) -> GestureStatus {
        let (tilt_left_count, tilt_right_count) = self.tilt.counts();
        GestureStatus {
            running: self.running,
            face_present: self.face_present,
            is_blinking: self.blink.is_eye_closed(),
            tilt_direction: self.tilt.confirmed_direction(),
            calibrating: self.calibration.is_active(),
            calibration_blinks: self.calibration.blinks(),
            blink_count: self.blink.blink_count(),
            tilt_left_count,
            tilt_right_count,
            frames_evaluated: self.frames_evaluated,
            frames_without_face: self.frames_without_face,
            openness: self.blink.last_openness(),
            roll_degrees: self.tilt.last_angle(),
        }
    }

    fn clear(&mut self) {
        self.blink.reset();
        self.tilt.reset();
        self.calibration.reset();
        self.face_present = false;
        self.last_timestamp_ms = None;
        self.frames_evaluated = 0;
        self.frames_without_face = 0;
    }
}

/// A session shared between a frame producer and other threads.
///
/// Only one evaluation runs at a time. A frame that arrives while another
/// evaluation still holds the session is dropped rather than queued.
#[derive(Debug, Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<GestureSession>>,
    dropped_busy: Arc<AtomicU64>,
}

impl SharedSession {
    /// Wrap a session for sharing
    #[must_use]
    pub fn new(session: GestureSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
            dropped_busy: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Evaluate unless an evaluation is already in progress
    pub fn try_evaluate(&self, frame: Option<&LandmarkFrame>, now_ms: u64) -> Option<FrameOutcome> {
        let mut session = match self.inner.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => {
                self.dropped_busy.fetch_add(1, Ordering::Relaxed);
                debug!("Frame at {now_ms} ms dropped: evaluation in progress");
                return None;
            }
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        };
        Some(session.evaluate(frame, now_ms))
    }

    /// Exclusive access for lifecycle calls and status reads
    pub fn lock(&self) -> MutexGuard<'_, GestureSession> {
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Frames dropped because the session was busy
    #[must_use]
    pub fn dropped_busy(&self) -> u64 {
        self.dropped_busy.load(Ordering::Relaxed)
    }
}
