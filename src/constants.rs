//! Constants used throughout the library

/// Number of points in a Face Mesh frame with iris refinement
pub const NUM_FACE_MESH_LANDMARKS_WITH_IRIS: usize = 478;

/// Points making up one eye sample
pub const EYE_SAMPLE_POINTS: usize = 6;

/// Left eye indices: outer corner, upper lid x2, inner corner, lower lid x2
pub const LEFT_EYE_INDICES: [usize; EYE_SAMPLE_POINTS] = [362, 385, 387, 263, 373, 380];

/// Right eye indices in the same order as the left eye
pub const RIGHT_EYE_INDICES: [usize; EYE_SAMPLE_POINTS] = [33, 160, 158, 133, 153, 144];

/// Left ear (tragion area) landmark
pub const LEFT_EAR_INDEX: usize = 234;

/// Right ear (tragion area) landmark
pub const RIGHT_EAR_INDEX: usize = 454;

/// Openness reported for degenerate eye geometry
pub const FULLY_OPEN_RATIO: f64 = 1.0;

/// Blink detection defaults
pub const DEFAULT_BLINK_THRESHOLD: f64 = 0.18;
pub const DEFAULT_BLINK_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_BLINK_CONFIRM_FRAMES: u32 = 2;
pub const DEFAULT_MIN_EYES_OPEN_MS: u64 = 150;

/// Tilt detection defaults
pub const DEFAULT_TILT_THRESHOLD_DEGREES: f64 = 15.0;
pub const DEFAULT_TILT_DEBOUNCE_MS: u64 = 600;
pub const DEFAULT_TILT_CONFIRM_FRAMES: u32 = 3;

/// Calibration default
pub const DEFAULT_CALIBRATION_TARGET_BLINKS: u32 = 3;

/// Frame pump interval (20 Hz)
pub const DEFAULT_PUMP_INTERVAL_MS: u64 = 50;

/// Numeric precision epsilon
pub const EPSILON: f64 = 1e-10;
