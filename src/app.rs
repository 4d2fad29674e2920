//! Main application module for gesture-driven review control.

use crate::{
    config::Config,
    error::{Error, Result},
    pump::{FramePump, FrameSource, PumpHandle, PumpStats},
    session::{GestureListener, GestureSession, GestureStatus, SharedSession},
};
use log::{info, warn};
use serde::Serialize;

/// Message shown when the camera or landmark model cannot be used
pub const MANUAL_FALLBACK_HINT: &str = "Gesture control unavailable; manual button control remains available";

/// Listener that logs gestures as review actions and counts them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventTally {
    /// Blinks delivered (mark photo)
    pub marks: u32,
    /// Left tilts (previous photo)
    pub previous: u32,
    /// Right tilts (next photo)
    pub next: u32,
    /// Blinks consumed by calibration
    pub calibration_blinks: u32,
    /// Calibrations completed
    pub calibrations_completed: u32,
}

impl GestureListener for EventTally {
    fn on_blink(&mut self) {
        self.marks += 1;
        info!("Blink: mark photo");
    }

    fn on_tilt_left(&mut self) {
        self.previous += 1;
        info!("Tilt left: previous photo");
    }

    fn on_tilt_right(&mut self) {
        self.next += 1;
        info!("Tilt right: next photo");
    }

    fn on_calibration_progress(&mut self, blinks: u32, target: u32) {
        self.calibration_blinks += 1;
        info!("Calibration blink {blinks}/{target}");
    }

    fn on_calibration_complete(&mut self) {
        self.calibration_blinks += 1;
        self.calibrations_completed += 1;
        info!("Calibration complete, blink to mark photos");
    }
}

/// End-of-run report
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    /// Frame delivery counters
    pub pump: PumpStats,
    /// Session state when the source ran out
    pub status: GestureStatus,
}

/// Owns the session, the pump and the frame source between `start` and `stop`
pub struct GestureApp {
    config: Config,
    session: SharedSession,
    pump: FramePump,
    source: Option<Box<dyn FrameSource>>,
}

impl GestureApp {
    /// Create an idle application
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        info!("Initializing gesture application");

        let session = SharedSession::new(GestureSession::new(&config));
        let pump = FramePump::new(config.pump.clone());

        Ok(Self {
            config,
            session,
            pump,
            source: None,
        })
    }

    /// Acquire the frame source and reset all state
    pub fn start(&mut self, source: Box<dyn FrameSource>) {
        if let Some(mut previous) = self.source.replace(source) {
            warn!("Replacing a frame source that was never stopped");
            previous.release();
        }
        self.pump.reset();
        self.session.lock().start();
    }

    /// Release the frame source and reset all state
    pub fn stop(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.release();
        }
        self.pump.reset();
        self.session.lock().stop();
    }

    /// Zero gesture counters without releasing the source
    pub fn reset_counts(&self) {
        self.session.lock().reset_counts();
    }

    /// Leave calibration early
    pub fn skip_calibration(&self) -> bool {
        self.session.lock().skip_calibration()
    }

    /// Drive frames until the source is exhausted or the pump is stopped
    pub fn run<L: GestureListener + ?Sized>(&mut self, listener: &mut L) -> Result<RunSummary> {
        let source = self
            .source
            .as_mut()
            .ok_or_else(|| Error::SessionError("run called before start".to_string()))?;

        info!(
            "Pumping frames every {} ms{}",
            self.config.pump.interval_ms,
            if self.config.pump.realtime { " in real time" } else { "" }
        );
        let pump = self.pump.run(source.as_mut(), &self.session, listener)?;

        Ok(RunSummary {
            pump,
            status: self.status(),
        })
    }

    /// Handle that stops a running pump
    #[must_use]
    pub fn pump_handle(&self) -> PumpHandle {
        self.pump.handle()
    }

    /// Shared session, for a second producer thread
    #[must_use]
    pub fn session(&self) -> SharedSession {
        self.session.clone()
    }

    /// Current session state
    #[must_use]
    pub fn status(&self) -> GestureStatus {
        self.session.lock().status()
    }
}

impl Drop for GestureApp {
    fn drop(&mut self) {
        if self.source.is_some() {
            self.stop();
        }
    }
}
