//! Head tilt classifier.
//!
//! Roll angle is mapped to a raw direction per frame. A direction held for
//! enough consecutive frames is confirmed, and each excursion away from
//! neutral fires at most one event: after firing, the classifier sits in
//! [`TiltState::ExcursionFired`] and only a neutral frame leads back out.

use crate::config::TiltConfig;
use crate::geometry::head_roll_angle;
use crate::landmarks::{LandmarkFrame, LandmarkLayout};
use log::debug;
use serde::Serialize;
use std::fmt;

/// Raw or confirmed head roll direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TiltDirection {
    /// Within the neutral band
    #[default]
    Neutral,
    /// Rolled left past the threshold
    Left,
    /// Rolled right past the threshold
    Right,
}

impl TiltDirection {
    /// Classify a roll angle against a symmetric threshold
    #[must_use]
    pub fn from_angle(angle_degrees: f64, threshold_degrees: f64) -> Self {
        if angle_degrees > threshold_degrees {
            Self::Right
        } else if angle_degrees < -threshold_degrees {
            Self::Left
        } else {
            Self::Neutral
        }
    }
}

impl fmt::Display for TiltDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Neutral => write!(f, "neutral"),
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// A fired tilt gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiltEvent {
    /// Head tilted left and held
    Left,
    /// Head tilted right and held
    Right,
}

impl TiltEvent {
    fn from_direction(direction: TiltDirection) -> Option<Self> {
        match direction {
            TiltDirection::Left => Some(Self::Left),
            TiltDirection::Right => Some(Self::Right),
            TiltDirection::Neutral => None,
        }
    }
}

/// Excursion state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiltState {
    /// Head in the neutral band; the next excursion is armed
    #[default]
    Neutral,
    /// Tilted, not yet fired for this excursion
    ExcursionPending {
        /// Latest raw direction
        direction: TiltDirection,
        /// Consecutive frames in `direction`
        run: u32,
    },
    /// Tilted and already fired; waits for neutral
    ExcursionFired {
        /// Latest raw direction
        direction: TiltDirection,
        /// Consecutive frames in `direction`
        run: u32,
    },
}

/// Stateful tilt classifier for one landmark stream
#[derive(Debug, Clone)]
pub struct TiltClassifier {
    config: TiltConfig,
    layout: LandmarkLayout,
    state: TiltState,
    last_fire_ms: Option<u64>,
    left_count: u32,
    right_count: u32,
    last_angle: Option<f64>,
}

impl TiltClassifier {
    /// Create a classifier with the given thresholds and landmark mapping
    #[must_use]
    pub fn new(config: TiltConfig, layout: LandmarkLayout) -> Self {
        Self {
            config,
            layout,
            state: TiltState::Neutral,
            last_fire_ms: None,
            left_count: 0,
            right_count: 0,
            last_angle: None,
        }
    }

    /// Evaluate one frame
    pub fn evaluate(&mut self, frame: &LandmarkFrame, now_ms: u64) -> Option<TiltEvent> {
        let (left_ear, right_ear) = frame.ear_pair(&self.layout);
        self.evaluate_angle(head_roll_angle(left_ear, right_ear), now_ms)
    }

    /// Evaluate an already computed roll angle in degrees
    pub fn evaluate_angle(&mut self, angle_degrees: f64, now_ms: u64) -> Option<TiltEvent> {
        self.last_angle = Some(angle_degrees);
        let direction = TiltDirection::from_angle(angle_degrees, self.config.threshold_degrees);

        self.state = match (self.state, direction) {
            (_, TiltDirection::Neutral) => TiltState::Neutral,
            (TiltState::Neutral, d) => TiltState::ExcursionPending { direction: d, run: 1 },
            (TiltState::ExcursionPending { direction: prev, run }, d) => TiltState::ExcursionPending {
                direction: d,
                run: next_run(prev, run, d),
            },
            (TiltState::ExcursionFired { direction: prev, run }, d) => TiltState::ExcursionFired {
                direction: d,
                run: next_run(prev, run, d),
            },
        };

        let TiltState::ExcursionPending { direction, run } = self.state else {
            return None;
        };
        if run < self.config.consecutive_frames {
            return None;
        }

        let debounced = self
            .last_fire_ms
            .map_or(true, |last| now_ms.saturating_sub(last) >= self.config.debounce_ms);
        if !debounced {
            debug!("Tilt {direction} at {now_ms} ms held back by debounce");
            return None;
        }

        let event = TiltEvent::from_direction(direction)?;
        self.state = TiltState::ExcursionFired { direction, run };
        self.last_fire_ms = Some(now_ms);
        match event {
            TiltEvent::Left => self.left_count = self.left_count.saturating_add(1),
            TiltEvent::Right => self.right_count = self.right_count.saturating_add(1),
        }
        debug!("Tilt {direction} fired at {now_ms} ms (roll {angle_degrees:.1}°)");

        Some(event)
    }

    /// Direction confirmed by the consecutive-frame run, for display
    #[must_use]
    pub fn confirmed_direction(&self) -> TiltDirection {
        match self.state {
            TiltState::Neutral => TiltDirection::Neutral,
            TiltState::ExcursionPending { direction, run } | TiltState::ExcursionFired { direction, run } => {
                if run >= self.config.consecutive_frames {
                    direction
                } else {
                    TiltDirection::Neutral
                }
            }
        }
    }

    /// Current excursion state
    #[must_use]
    pub fn state(&self) -> TiltState {
        self.state
    }

    /// Roll angle of the most recent frame
    #[must_use]
    pub fn last_angle(&self) -> Option<f64> {
        self.last_angle
    }

    /// Left and right tilts fired since the last count reset
    #[must_use]
    pub fn counts(&self) -> (u32, u32) {
        (self.left_count, self.right_count)
    }

    /// Zero the fired counts, keeping the excursion latch and debounce
    pub fn reset_counts(&mut self) {
        self.left_count = 0;
        self.right_count = 0;
    }

    /// Return to the freshly constructed state
    pub fn reset(&mut self) {
        self.state = TiltState::Neutral;
        self.last_fire_ms = None;
        self.left_count = 0;
        self.right_count = 0;
        self.last_angle = None;
    }
}

impl Default for TiltClassifier {
    fn default() -> Self {
        Self::new(TiltConfig::default(), LandmarkLayout::default())
    }
}

fn next_run(previous: TiltDirection, run: u32, current: TiltDirection) -> u32 {
    if previous == current {
        run.saturating_add(1)
    } else {
        1
    }
}
