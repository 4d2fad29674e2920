//! Configuration management for the gesture detection pipeline

use crate::constants::{
    DEFAULT_BLINK_CONFIRM_FRAMES, DEFAULT_BLINK_DEBOUNCE_MS, DEFAULT_BLINK_THRESHOLD,
    DEFAULT_CALIBRATION_TARGET_BLINKS, DEFAULT_MIN_EYES_OPEN_MS, DEFAULT_PUMP_INTERVAL_MS,
    DEFAULT_TILT_CONFIRM_FRAMES, DEFAULT_TILT_DEBOUNCE_MS, DEFAULT_TILT_THRESHOLD_DEGREES,
};
use crate::landmarks::LandmarkLayout;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Blink classifier configuration
    pub blink: BlinkConfig,

    /// Tilt classifier configuration
    pub tilt: TiltConfig,

    /// Calibration configuration
    pub calibration: CalibrationConfig,

    /// Frame pump configuration
    pub pump: PumpConfig,

    /// Landmark index mapping
    pub landmarks: LandmarkLayout,
}

/// Blink detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkConfig {
    /// Average eye openness below which a frame counts as closed
    pub threshold: f64,

    /// Minimum time between two blink events
    pub debounce_ms: u64,

    /// Consecutive closed frames needed to confirm a closure
    pub consecutive_frames: u32,

    /// Eyes must have been open longer than this before a closure counts
    pub min_eyes_open_ms: u64,
}

/// Head tilt detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiltConfig {
    /// Roll angle beyond which the head counts as tilted
    pub threshold_degrees: f64,

    /// Minimum time between two tilt events
    pub debounce_ms: u64,

    /// Consecutive same-direction frames needed to confirm a tilt
    pub consecutive_frames: u32,
}

/// Calibration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Run calibration when a session starts
    pub enabled: bool,

    /// Blinks required to finish calibration
    pub target_blinks: u32,
}

/// Frame pump parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PumpConfig {
    /// Minimum spacing between delivered frames
    pub interval_ms: u64,

    /// Pace replayed frames against the wall clock
    pub realtime: bool,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_BLINK_THRESHOLD,
            debounce_ms: DEFAULT_BLINK_DEBOUNCE_MS,
            consecutive_frames: DEFAULT_BLINK_CONFIRM_FRAMES,
            min_eyes_open_ms: DEFAULT_MIN_EYES_OPEN_MS,
        }
    }
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            threshold_degrees: DEFAULT_TILT_THRESHOLD_DEGREES,
            debounce_ms: DEFAULT_TILT_DEBOUNCE_MS,
            consecutive_frames: DEFAULT_TILT_CONFIRM_FRAMES,
        }
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            target_blinks: DEFAULT_CALIBRATION_TARGET_BLINKS,
        }
    }
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_PUMP_INTERVAL_MS,
            realtime: false,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_yaml()?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Render configuration as YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.blink.threshold > 0.0 && self.blink.threshold < 1.0) {
            return Err(Error::ConfigError(
                "Blink threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        if self.blink.consecutive_frames == 0 {
            return Err(Error::ConfigError(
                "Blink confirmation frames must be greater than 0".to_string(),
            ));
        }

        if !(self.tilt.threshold_degrees > 0.0 && self.tilt.threshold_degrees < 90.0) {
            return Err(Error::ConfigError(
                "Tilt threshold must be between 0 and 90 degrees".to_string(),
            ));
        }
        if self.tilt.consecutive_frames == 0 {
            return Err(Error::ConfigError(
                "Tilt confirmation frames must be greater than 0".to_string(),
            ));
        }

        if self.calibration.enabled && self.calibration.target_blinks == 0 {
            return Err(Error::ConfigError(
                "Calibration target must be greater than 0 when calibration is enabled".to_string(),
            ));
        }

        if self.pump.interval_ms == 0 {
            return Err(Error::ConfigError("Pump interval must be greater than 0".to_string()));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Face Gesture Configuration

# Blink detection
blink:
  threshold: 0.18
  debounce_ms: 500
  consecutive_frames: 2
  min_eyes_open_ms: 150

# Head tilt detection
tilt:
  threshold_degrees: 15.0
  debounce_ms: 600
  consecutive_frames: 3

# Calibration
calibration:
  enabled: true
  target_blinks: 3

# Frame pump
pump:
  interval_ms: 50
  realtime: false

# Landmark indices (Face Mesh)
landmarks:
  left_eye: [362, 385, 387, 263, 373, 380]
  right_eye: [33, 160, 158, 133, 153, 144]
  left_ear: 234
  right_ear: 454
"#;
