//! Calibration controller.
//!
//! Active at the start of a review session. Blinks observed while active are
//! counted toward the target instead of reaching the consumer; reaching the
//! target (or skipping) deactivates calibration and tells the caller to reset
//! the blink classifier's counters.

use crate::config::CalibrationConfig;
use log::info;

/// Calibration phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalibrationPhase {
    /// Not calibrating; gestures reach the consumer
    #[default]
    Inactive,
    /// Counting calibration blinks
    Active {
        /// Blinks counted so far
        blinks: u32,
    },
}

/// Result of feeding one blink to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationStep {
    /// Calibration was not running; the blink belongs to the consumer
    NotCalibrating,
    /// Blink counted, calibration still running
    Progress {
        /// Blinks counted so far
        blinks: u32,
        /// Blinks required
        target: u32,
    },
    /// Target reached; calibration is now inactive
    Completed,
}

/// Blink-count calibration state machine
#[derive(Debug, Clone)]
pub struct CalibrationController {
    target_blinks: u32,
    phase: CalibrationPhase,
}

impl CalibrationController {
    /// Create an inactive controller
    #[must_use]
    pub fn new(config: &CalibrationConfig) -> Self {
        Self {
            target_blinks: config.target_blinks.max(1),
            phase: CalibrationPhase::Inactive,
        }
    }

    /// Enter the active phase with a zero count
    pub fn begin(&mut self) {
        info!("Calibration started: blink {} times", self.target_blinks);
        self.phase = CalibrationPhase::Active { blinks: 0 };
    }

    /// Count one blink event
    pub fn record_blink(&mut self) -> CalibrationStep {
        let CalibrationPhase::Active { blinks } = self.phase else {
            return CalibrationStep::NotCalibrating;
        };

        let blinks = blinks + 1;
        if blinks >= self.target_blinks {
            info!("Calibration complete after {blinks} blinks");
            self.phase = CalibrationPhase::Inactive;
            return CalibrationStep::Completed;
        }

        info!("Calibration blink {blinks}/{}", self.target_blinks);
        self.phase = CalibrationPhase::Active { blinks };
        CalibrationStep::Progress {
            blinks,
            target: self.target_blinks,
        }
    }

    /// Abandon calibration. Returns true if it was running.
    pub fn skip(&mut self) -> bool {
        if self.is_active() {
            info!("Calibration skipped");
            self.phase = CalibrationPhase::Inactive;
            true
        } else {
            false
        }
    }

    /// Drop back to inactive without logging
    pub fn reset(&mut self) {
        self.phase = CalibrationPhase::Inactive;
    }

    /// Whether calibration is running
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.phase, CalibrationPhase::Active { .. })
    }

    /// Blinks counted in the current calibration, 0 when inactive
    #[must_use]
    pub fn blinks(&self) -> u32 {
        match self.phase {
            CalibrationPhase::Active { blinks } => blinks,
            CalibrationPhase::Inactive => 0,
        }
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> CalibrationPhase {
        self.phase
    }
}
