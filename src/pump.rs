//! Frame pump: pulls frames from the landmark collaborator and feeds the session.
//!
//! The pump owns delivery policy only. It throttles to a fixed interval by
//! frame timestamp, drops frames while an evaluation is still in flight, and
//! can be stopped from another thread through a [`PumpHandle`].

use crate::config::PumpConfig;
use crate::landmarks::LandmarkFrame;
use crate::session::{GestureListener, SharedSession};
use crate::{Error, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// One frame as produced by the inference collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFrame {
    /// Capture time in milliseconds
    pub timestamp_ms: u64,
    /// Landmarks of the tracked face, `None` when no face was found
    #[serde(default)]
    pub landmarks: Option<LandmarkFrame>,
}

impl SourceFrame {
    /// Frame with a detected face
    #[must_use]
    pub fn with_face(timestamp_ms: u64, landmarks: LandmarkFrame) -> Self {
        Self {
            timestamp_ms,
            landmarks: Some(landmarks),
        }
    }

    /// Frame where no face was detected
    #[must_use]
    pub fn without_face(timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms,
            landmarks: None,
        }
    }
}

/// Boundary to the camera and landmark inference collaborator
pub trait FrameSource {
    /// Next frame, or `None` once the source is exhausted
    fn next_frame(&mut self) -> Result<Option<SourceFrame>>;

    /// Release the underlying device
    fn release(&mut self) {}
}

/// Frames replayed from a YAML recording
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    frames: VecDeque<SourceFrame>,
}

impl ReplaySource {
    /// Replay an in-memory frame list
    #[must_use]
    pub fn from_frames(frames: Vec<SourceFrame>) -> Self {
        Self { frames: frames.into() }
    }

    /// Load a recording: a YAML sequence of `{timestamp_ms, landmarks}` entries
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::SourceUnavailable(format!("Cannot read recording {}: {e}", path.display())))?;
        Self::from_yaml(&content)
    }

    /// Parse a recording from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let frames: Vec<SourceFrame> = serde_yaml::from_str(content)?;
        info!("Loaded recording with {} frames", frames.len());
        Ok(Self::from_frames(frames))
    }

    /// Frames left to replay
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for ReplaySource {
    fn next_frame(&mut self) -> Result<Option<SourceFrame>> {
        Ok(self.frames.pop_front())
    }

    fn release(&mut self) {
        self.frames.clear();
    }
}

/// Delivery counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PumpStats {
    /// Frames handed to the session
    pub delivered: u64,
    /// Frames skipped by the interval throttle
    pub throttled: u64,
    /// Frames dropped because an evaluation was in flight
    pub dropped_busy: u64,
}

/// Cross-thread stop signal for a running pump
#[derive(Debug, Clone, Default)]
pub struct PumpHandle {
    stop: Arc<AtomicBool>,
}

impl PumpHandle {
    /// Ask the pump to return after the current frame
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Whether a stop was requested
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }
}

/// Throttled frame delivery loop
#[derive(Debug)]
pub struct FramePump {
    config: PumpConfig,
    last_delivered_ms: Option<u64>,
    stats: PumpStats,
    handle: PumpHandle,
}

impl FramePump {
    /// Create a pump with the given delivery policy
    #[must_use]
    pub fn new(config: PumpConfig) -> Self {
        Self {
            config,
            last_delivered_ms: None,
            stats: PumpStats::default(),
            handle: PumpHandle::default(),
        }
    }

    /// Handle that can stop this pump from elsewhere
    #[must_use]
    pub fn handle(&self) -> PumpHandle {
        self.handle.clone()
    }

    /// Throttle decision for a frame timestamp. Admitting a frame moves the
    /// throttle window forward.
    pub fn admit(&mut self, timestamp_ms: u64) -> bool {
        let due = self
            .last_delivered_ms
            .map_or(true, |last| timestamp_ms.saturating_sub(last) >= self.config.interval_ms);
        if due {
            self.last_delivered_ms = Some(timestamp_ms);
        }
        due
    }

    /// Pump every frame from `source` into `session` until the source is
    /// exhausted or the pump is stopped, dispatching events to `listener`.
    pub fn run<S, L>(&mut self, source: &mut S, session: &SharedSession, listener: &mut L) -> Result<PumpStats>
    where
        S: FrameSource + ?Sized,
        L: GestureListener + ?Sized,
    {
        let wall_start = Instant::now();
        let mut first_ts = None;

        while !self.handle.is_stopped() {
            let Some(frame) = source.next_frame()? else {
                debug!("Frame source exhausted");
                break;
            };

            if !self.admit(frame.timestamp_ms) {
                self.stats.throttled += 1;
                continue;
            }

            if self.config.realtime {
                let origin = *first_ts.get_or_insert(frame.timestamp_ms);
                let target = Duration::from_millis(frame.timestamp_ms.saturating_sub(origin));
                if let Some(wait) = target.checked_sub(wall_start.elapsed()) {
                    std::thread::sleep(wait);
                }
            }

            match session.try_evaluate(frame.landmarks.as_ref(), frame.timestamp_ms) {
                Some(outcome) => {
                    self.stats.delivered += 1;
                    outcome.dispatch(listener);
                }
                None => self.stats.dropped_busy += 1,
            }
        }

        Ok(self.stats)
    }

    /// Delivery counters so far
    #[must_use]
    pub fn stats(&self) -> PumpStats {
        self.stats
    }

    /// Clear the throttle window, counters and stop flag
    pub fn reset(&mut self) {
        self.last_delivered_ms = None;
        self.stats = PumpStats::default();
        self.handle.stop.store(false, Ordering::SeqCst);
    }
}
