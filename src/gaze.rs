//! Eye gaze estimation from tracked 3D eye landmarks.
//!
//! The tracker lifts a 28-point landmark model per eye into camera space. The
//! pupil is the centroid of the iris ring; the eyeball centre sits behind
//! the midpoint of the two eyelid corners. Because the pupil's depth is the
//! noisiest coordinate, it is re-derived from the corners' depths before the
//! ray is formed.

use crate::{
    config::{GazeConfig, TrackerConfig},
    constants::{
        EPSILON, EYE_CORNER_LEFT_INDEX, EYE_CORNER_RIGHT_INDEX, EYE_CORNER_STRIDE,
        NUM_FACIAL_LANDMARKS,
    },
    keyframe::Bone,
    tracking::FrameInput,
    Error, Result,
};
use log::{debug, info};
use nalgebra::{Matrix3, Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which tracked eye
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EyeSide {
    Left,
    Right,
}

impl EyeSide {
    /// Both eyes, in emission order
    pub const BOTH: [Self; 2] = [Self::Right, Self::Left];

    /// Face landmark indices of this eye's image-left and image-right corners
    #[must_use]
    pub const fn corner_indices(self) -> (usize, usize) {
        let offset = match self {
            Self::Left => 0,
            Self::Right => EYE_CORNER_STRIDE,
        };
        (EYE_CORNER_LEFT_INDEX + offset, EYE_CORNER_RIGHT_INDEX + offset)
    }

    /// Avatar bone driven by this tracked eye. The tracker's eyes are
    /// mirrored onto the avatar.
    #[must_use]
    pub const fn bone(self) -> Bone {
        match self {
            Self::Left => Bone::RightEye,
            Self::Right => Bone::LeftEye,
        }
    }
}

impl fmt::Display for EyeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// Part-model index of each eye, resolved once from the tracker's model list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EyeModelTable {
    left: Option<usize>,
    right: Option<usize>,
}

impl EyeModelTable {
    /// Look up the eye models by name. When a name occurs more than once the
    /// last occurrence wins.
    #[must_use]
    pub fn resolve<S: AsRef<str>>(model_names: &[S], left_name: &str, right_name: &str) -> Self {
        let find = |wanted: &str| model_names.iter().rposition(|name| name.as_ref() == wanted);
        Self {
            left: find(left_name),
            right: find(right_name),
        }
    }

    /// Resolve against the configured tracker capabilities
    #[must_use]
    pub fn from_config(tracker: &TrackerConfig) -> Self {
        Self::resolve(
            tracker.part_models.as_slice(),
            &tracker.left_eye_model,
            &tracker.right_eye_model,
        )
    }

    /// Part index of an eye's landmark model
    ///
    /// # Errors
    ///
    /// Returns `GazeModelUnavailable` if the tracker has no model for this eye
    pub fn part_index(&self, side: EyeSide) -> Result<usize> {
        let index = match side {
            EyeSide::Left => self.left,
            EyeSide::Right => self.right,
        };
        index.ok_or(Error::GazeModelUnavailable(side))
    }

    /// Whether the tracker exposes any eye model at all
    #[must_use]
    pub const fn has_any(&self) -> bool {
        self.left.is_some() || self.right.is_some()
    }
}

/// Gaze direction of one eye in camera space.
///
/// Unit length when available; the zero vector means no gaze could be
/// estimated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GazeRay(Vector3<f64>);

impl GazeRay {
    /// The "no gaze" value
    #[must_use]
    pub fn unavailable() -> Self {
        Self(Vector3::zeros())
    }

    /// Normalize a direction into a ray
    ///
    /// # Errors
    ///
    /// Returns `DegenerateInput` if the direction is zero-length or not finite
    pub fn from_direction(direction: Vector3<f64>) -> Result<Self> {
        let norm = direction.norm();
        if !norm.is_finite() || norm < EPSILON {
            return Err(Error::DegenerateInput(format!(
                "gaze direction has length {norm}"
            )));
        }
        Ok(Self(direction / norm))
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.0.norm_squared() > 0.0
    }

    #[must_use]
    pub const fn direction(&self) -> &Vector3<f64> {
        &self.0
    }
}

/// Pupil position after depth correction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthCorrection {
    /// Corrected pupil position
    pub pupil: Point3<f64>,
    /// Position of the reprojected pupil between the right (0) and left (1)
    /// corner, clamped
    pub t: f64,
}

/// Rotation matrix for Euler angles applied about X, then Y, then Z
#[must_use]
pub fn euler_to_rotation_matrix(euler: &Vector3<f64>) -> Matrix3<f64> {
    let (s1, c1) = euler.x.sin_cos();
    let (s2, c2) = euler.y.sin_cos();
    let (s3, c3) = euler.z.sin_cos();

    Matrix3::new(
        c2 * c3,
        -c2 * s3,
        s2,
        c1 * s3 + c3 * s1 * s2,
        c1 * c3 - s1 * s2 * s3,
        -c2 * s1,
        s1 * s3 - c1 * c3 * s2,
        c3 * s1 + c1 * s2 * s3,
        c1 * c2,
    )
}

/// Centroid of the leading `iris_count` eye landmarks
///
/// # Errors
///
/// Returns `DegenerateInput` if fewer landmarks are available
#[allow(clippy::cast_precision_loss)] // Landmark counts are tiny
pub fn pupil_position(eye_landmarks: &[Point3<f64>], iris_count: usize) -> Result<Point3<f64>> {
    if iris_count == 0 || eye_landmarks.len() < iris_count {
        return Err(Error::DegenerateInput(format!(
            "expected at least {iris_count} iris landmarks, got {}",
            eye_landmarks.len()
        )));
    }

    let sum = eye_landmarks[..iris_count]
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Ok(Point3::from(sum / iris_count as f64))
}

/// Re-derive the pupil's depth from the eyelid corners.
///
/// The pupil and both corners are reprojected onto the plane `z = depth`;
/// the pupil's x position between the reprojected corners selects a depth
/// between the corners' own depths.
///
/// # Errors
///
/// Returns `DegenerateInput` if a point lies on the camera plane or the
/// corners reproject onto the same x
pub fn correct_pupil_depth(
    pupil: &Point3<f64>,
    left_corner: &Point3<f64>,
    right_corner: &Point3<f64>,
    depth: f64,
) -> Result<DepthCorrection> {
    for (name, z) in [("pupil", pupil.z), ("left corner", left_corner.z), ("right corner", right_corner.z)] {
        if z.abs() < EPSILON {
            return Err(Error::DegenerateInput(format!("{name} lies on the camera plane")));
        }
    }

    let reproject_x = |p: &Point3<f64>| p.x * depth / p.z;
    let left_x = reproject_x(left_corner);
    let right_x = reproject_x(right_corner);
    let pupil_x = reproject_x(pupil);

    let span = left_x - right_x;
    if !span.is_finite() || span.abs() < EPSILON {
        return Err(Error::DegenerateInput("eyelid corners reproject to one point".to_string()));
    }

    let t = ((pupil_x - right_x) / span).clamp(0.0, 1.0);
    let new_z = (left_corner.z - right_corner.z).mul_add(t, right_corner.z);

    Ok(DepthCorrection {
        pupil: Point3::new(pupil.x * new_z / pupil.z, pupil.y * new_z / pupil.z, new_z),
        t,
    })
}

/// Custom gaze estimator working on posed eye landmarks
#[derive(Debug, Clone)]
pub struct GazeEstimator {
    models: EyeModelTable,
    eyeball_offset: Vector3<f64>,
    iris_landmarks: usize,
}

impl GazeEstimator {
    /// Create an estimator for the given eye model table
    #[must_use]
    pub fn new(models: EyeModelTable, config: &GazeConfig) -> Self {
        info!("Initializing GazeEstimator with eye models {models:?}");
        Self {
            models,
            eyeball_offset: Vector3::from(config.eyeball_offset),
            iris_landmarks: config.iris_landmarks,
        }
    }

    /// Eye models this estimator resolved
    #[must_use]
    pub const fn models(&self) -> &EyeModelTable {
        &self.models
    }

    /// Estimate the gaze ray of one eye
    ///
    /// # Errors
    ///
    /// Returns `GazeModelUnavailable` if the eye has no landmark model, and
    /// `InvalidInput` or `DegenerateInput` if the frame's landmarks cannot
    /// produce a ray
    pub fn estimate(&self, side: EyeSide, frame: &FrameInput) -> Result<GazeRay> {
        let part = self.models.part_index(side)?;

        let eye_landmarks = frame.part_landmarks.get(part).ok_or_else(|| {
            Error::InvalidInput(format!("frame has no landmarks for part model {part}"))
        })?;
        if frame.face_landmarks.len() != NUM_FACIAL_LANDMARKS {
            return Err(Error::InvalidInput(format!(
                "Expected {} face landmarks, got {}",
                NUM_FACIAL_LANDMARKS,
                frame.face_landmarks.len()
            )));
        }

        let rotation = euler_to_rotation_matrix(&frame.head_pose.rotation);
        let pupil = pupil_position(eye_landmarks, self.iris_landmarks)?;

        let (left_idx, right_idx) = side.corner_indices();
        let left_corner = frame.face_landmarks[left_idx];
        let right_corner = frame.face_landmarks[right_idx];
        let socket_centre = Point3::from((left_corner.coords + right_corner.coords) / 2.0);
        let eyeball_centre = socket_centre + rotation * self.eyeball_offset;

        let corrected = correct_pupil_depth(&pupil, &left_corner, &right_corner, socket_centre.z)?;
        // Intrinsics only annotate the log; the ray is camera-space geometry
        let pixel = frame
            .camera
            .validate()
            .ok()
            .and_then(|()| frame.camera.project(&corrected.pupil));
        debug!(
            "{side} eye: pupil {:?} (t={:.3}, px={:?}), eyeball centre {:?}",
            corrected.pupil, corrected.t, pixel, eyeball_centre
        );

        GazeRay::from_direction(corrected.pupil - eyeball_centre)
    }

    /// Like [`estimate`](Self::estimate), reporting failure as the zero ray
    #[must_use]
    pub fn estimate_or_unavailable(&self, side: EyeSide, frame: &FrameInput) -> GazeRay {
        self.estimate(side, frame).unwrap_or_else(|e| {
            debug!("No gaze for {side} eye: {e}");
            GazeRay::unavailable()
        })
    }
}
