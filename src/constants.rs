//! Constants used throughout the library

/// Number of facial landmarks for full face
pub const NUM_FACIAL_LANDMARKS: usize = 68;

/// Number of landmarks in each hierarchical eye model
pub const NUM_EYE_LANDMARKS: usize = 28;

/// Leading eye-model landmarks that outline the iris
pub const NUM_IRIS_LANDMARKS: usize = 8;

/// Face landmark indices of the image-left and image-right corners of the
/// left eye model; the right eye model is offset by `EYE_CORNER_STRIDE`
pub const EYE_CORNER_LEFT_INDEX: usize = 36;
pub const EYE_CORNER_RIGHT_INDEX: usize = 39;
pub const EYE_CORNER_STRIDE: usize = 6;

/// Default hierarchical model names for the two eyes
pub const LEFT_EYE_MODEL_NAME: &str = "left_eye_28";
pub const RIGHT_EYE_MODEL_NAME: &str = "right_eye_28";

/// Eyeball centre offset from the eye socket, in head-local millimetres
pub const EYEBALL_OFFSET: [f64; 3] = [0.0, -3.5, 7.0];

/// Fraction of the full gaze deflection applied to eye bones
pub const DEFAULT_GAZE_DAMPING: f64 = 0.25;

/// Tracker depth treated as the avatar's zero position
pub const DEFAULT_DEPTH_ORIGIN: f64 = 1000.0;

/// Tracker millimetres to avatar units (1 m = 12.5 units, halved)
pub const DEFAULT_POSITION_SCALE: f64 = 12.5 / 1000.0 / 2.0;

/// Size of the dense action unit vector (codes 0..=45)
pub const AU_SIZE: usize = 46;

/// Full-scale action unit regression intensity
pub const ACTION_UNIT_MAX_INTENSITY: f64 = 5.0;

/// Gain applied to mouth-shape action units
pub const DEFAULT_MOUTH_GAIN: f64 = 2.0;

/// Mouth "I" is suppressed once "A" or "U" reach this weight
pub const DEFAULT_MOUTH_EXCLUSION_THRESHOLD: f64 = 0.1;

/// Blink action unit intensity above which the eyes are fully closed
pub const DEFAULT_BLINK_THRESHOLD: f64 = 0.2;

/// Numeric precision epsilon
pub const EPSILON: f64 = 1e-10;
