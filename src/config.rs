//! Configuration management for the keyframe mapping layer

use crate::{
    constants::{
        ACTION_UNIT_MAX_INTENSITY, DEFAULT_BLINK_THRESHOLD, DEFAULT_DEPTH_ORIGIN, DEFAULT_GAZE_DAMPING,
        DEFAULT_MOUTH_EXCLUSION_THRESHOLD, DEFAULT_MOUTH_GAIN, DEFAULT_POSITION_SCALE, EYEBALL_OFFSET,
        LEFT_EYE_MODEL_NAME, NUM_EYE_LANDMARKS, NUM_IRIS_LANDMARKS, RIGHT_EYE_MODEL_NAME,
    },
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Mapping configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Capabilities of the tracking model
    pub tracker: TrackerConfig,

    /// Gaze estimation parameters
    pub gaze: GazeConfig,

    /// Head rotation and position conversion
    pub head: HeadConfig,

    /// Expression rule parameters
    pub expression: ExpressionConfig,
}

/// Part models the tracker exposes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Hierarchical part model names, in the order the tracker reports
    /// their landmarks
    pub part_models: Vec<String>,

    /// Name of the left eye model
    pub left_eye_model: String,

    /// Name of the right eye model
    pub right_eye_model: String,
}

/// Gaze estimation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GazeConfig {
    /// Eyeball centre relative to the eye socket, head-local
    pub eyeball_offset: [f64; 3],

    /// Leading eye landmarks that outline the iris
    pub iris_landmarks: usize,

    /// Fraction of the gaze deflection applied to the eye bones (0.0-1.0)
    pub damping: f64,
}

/// Head pose conversion parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadConfig {
    /// Tracker depth mapped to the avatar's zero position
    pub depth_origin: f64,

    /// Tracker units to avatar units
    pub position_scale: f64,
}

/// Expression rule parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpressionConfig {
    /// Full-scale action unit intensity
    pub max_intensity: f64,

    /// Gain on mouth-shape action units
    pub mouth_gain: f64,

    /// "I" mouth is suppressed once "A" or "U" reach this weight
    pub mouth_exclusion_threshold: f64,

    /// Blink intensity above which the eyes close fully
    pub blink_threshold: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            part_models: vec![LEFT_EYE_MODEL_NAME.to_string(), RIGHT_EYE_MODEL_NAME.to_string()],
            left_eye_model: LEFT_EYE_MODEL_NAME.to_string(),
            right_eye_model: RIGHT_EYE_MODEL_NAME.to_string(),
        }
    }
}

impl Default for GazeConfig {
    fn default() -> Self {
        Self {
            eyeball_offset: EYEBALL_OFFSET,
            iris_landmarks: NUM_IRIS_LANDMARKS,
            damping: DEFAULT_GAZE_DAMPING,
        }
    }
}

impl Default for HeadConfig {
    fn default() -> Self {
        Self {
            depth_origin: DEFAULT_DEPTH_ORIGIN,
            position_scale: DEFAULT_POSITION_SCALE,
        }
    }
}

impl Default for ExpressionConfig {
    fn default() -> Self {
        Self {
            max_intensity: ACTION_UNIT_MAX_INTENSITY,
            mouth_gain: DEFAULT_MOUTH_GAIN,
            mouth_exclusion_threshold: DEFAULT_MOUTH_EXCLUSION_THRESHOLD,
            blink_threshold: DEFAULT_BLINK_THRESHOLD,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` naming the first invalid setting
    pub fn validate(&self) -> Result<()> {
        if self.tracker.left_eye_model.is_empty() || self.tracker.right_eye_model.is_empty() {
            return Err(Error::ConfigError("Eye model names must not be empty".to_string()));
        }

        if !self.gaze.eyeball_offset.iter().all(|v| v.is_finite()) {
            return Err(Error::ConfigError("Eyeball offset must be finite".to_string()));
        }
        if self.gaze.iris_landmarks == 0 || self.gaze.iris_landmarks > NUM_EYE_LANDMARKS {
            return Err(Error::ConfigError(format!(
                "Iris landmark count must be between 1 and {NUM_EYE_LANDMARKS}"
            )));
        }
        if !(0.0..=1.0).contains(&self.gaze.damping) {
            return Err(Error::ConfigError("Gaze damping must be between 0.0 and 1.0".to_string()));
        }

        if !self.head.depth_origin.is_finite() {
            return Err(Error::ConfigError("Depth origin must be finite".to_string()));
        }
        if !self.head.position_scale.is_finite() || self.head.position_scale <= 0.0 {
            return Err(Error::ConfigError("Position scale must be greater than 0".to_string()));
        }

        if !self.expression.max_intensity.is_finite() || self.expression.max_intensity <= 0.0 {
            return Err(Error::ConfigError(
                "Max action unit intensity must be greater than 0".to_string(),
            ));
        }
        if !self.expression.mouth_gain.is_finite() || self.expression.mouth_gain < 0.0 {
            return Err(Error::ConfigError("Mouth gain must not be negative".to_string()));
        }
        if !(0.0..=1.0).contains(&self.expression.mouth_exclusion_threshold) {
            return Err(Error::ConfigError(
                "Mouth exclusion threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.expression.blink_threshold) {
            return Err(Error::ConfigError(
                "Blink threshold must be between 0.0 and 1.0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Face keyframe mapping configuration

# Tracking model capabilities
tracker:
  part_models: ["left_eye_28", "right_eye_28"]
  left_eye_model: "left_eye_28"
  right_eye_model: "right_eye_28"

# Gaze estimation
gaze:
  eyeball_offset: [0.0, -3.5, 7.0]
  iris_landmarks: 8
  damping: 0.25

# Head pose conversion (1 m = 12.5 units, halved)
head:
  depth_origin: 1000.0
  position_scale: 0.00625

# Expression rules
expression:
  max_intensity: 5.0
  mouth_gain: 2.0
  mouth_exclusion_threshold: 0.1
  blink_threshold: 0.2
"#;
