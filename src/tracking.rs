//! Per-frame output of the external tracking oracle.
//!
//! Landmark detection, head pose fitting and action unit regression happen
//! upstream; these types carry their results into the mapping layer.

use crate::{Error, Result};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Head pose in camera space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HeadPose {
    /// Translation in tracker millimetres
    pub translation: Vector3<f64>,
    /// Pitch, yaw and roll in radians
    pub rotation: Vector3<f64>,
}

impl HeadPose {
    /// Build from the tracker's `[tx, ty, tz, pitch, yaw, roll]` layout
    #[must_use]
    pub fn from_array(pose: [f64; 6]) -> Self {
        Self {
            translation: Vector3::new(pose[0], pose[1], pose[2]),
            rotation: Vector3::new(pose[3], pose[4], pose[5]),
        }
    }

    #[must_use]
    pub fn pitch(&self) -> f64 {
        self.rotation.x
    }

    #[must_use]
    pub fn yaw(&self) -> f64 {
        self.rotation.y
    }

    #[must_use]
    pub fn roll(&self) -> f64 {
        self.rotation.z
    }
}

/// Pinhole camera intrinsics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
}

impl CameraIntrinsics {
    /// Typical intrinsics for an uncalibrated camera: focal length equal to
    /// the image width, principal point at the image centre
    #[must_use]
    pub fn from_frame_size(width: u32, height: u32) -> Self {
        let focal = f64::from(width);
        Self {
            fx: focal,
            fy: focal,
            cx: f64::from(width) / 2.0,
            cy: f64::from(height) / 2.0,
        }
    }

    /// Check that the focal lengths can project points
    ///
    /// # Errors
    ///
    /// Returns an error if a focal length is zero, negative or not finite
    pub fn validate(&self) -> Result<()> {
        let finite = [self.fx, self.fy, self.cx, self.cy].iter().all(|v| v.is_finite());
        if !finite || self.fx <= 0.0 || self.fy <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "Invalid camera intrinsics: fx={}, fy={}, cx={}, cy={}",
                self.fx, self.fy, self.cx, self.cy
            )));
        }
        Ok(())
    }

    /// Project a camera-space point to pixel coordinates
    #[must_use]
    pub fn project(&self, point: &Point3<f64>) -> Option<(f64, f64)> {
        if point.z.abs() < crate::constants::EPSILON {
            return None;
        }
        Some((
            self.fx * point.x / point.z + self.cx,
            self.fy * point.y / point.z + self.cy,
        ))
    }
}

impl Default for CameraIntrinsics {
    fn default() -> Self {
        Self::from_frame_size(640, 480)
    }
}

/// Everything the oracle reports for one successfully tracked frame
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameInput {
    /// Head pose
    pub head_pose: HeadPose,
    /// Camera model the landmarks were lifted with
    pub camera: CameraIntrinsics,
    /// 68 face landmarks in camera space
    pub face_landmarks: Vec<Point3<f64>>,
    /// Landmarks of each hierarchical part model, in the tracker's model order
    pub part_landmarks: Vec<Vec<Point3<f64>>>,
    /// Action unit classification report (label → presence)
    pub au_presence: Vec<(String, f64)>,
    /// Action unit regression report (label → intensity)
    pub au_intensity: Vec<(String, f64)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_pose_from_array() {
        let pose = HeadPose::from_array([1.0, 2.0, 3.0, 0.1, 0.2, 0.3]);
        assert_eq!(pose.translation, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(pose.pitch(), 0.1);
        assert_eq!(pose.yaw(), 0.2);
        assert_eq!(pose.roll(), 0.3);
    }

    #[test]
    fn test_camera_from_frame_size() {
        let camera = CameraIntrinsics::from_frame_size(640, 480);
        assert_eq!(camera.fx, 640.0);
        assert_eq!(camera.cx, 320.0);
        assert_eq!(camera.cy, 240.0);
        assert!(camera.validate().is_ok());
    }

    #[test]
    fn test_camera_validate_rejects_zero_focal() {
        let camera = CameraIntrinsics { fx: 0.0, ..CameraIntrinsics::default() };
        assert!(camera.validate().is_err());

        let camera = CameraIntrinsics { fy: f64::NAN, ..CameraIntrinsics::default() };
        assert!(camera.validate().is_err());
    }

    #[test]
    fn test_camera_project() {
        let camera = CameraIntrinsics::from_frame_size(640, 480);
        let (u, v) = camera.project(&Point3::new(0.0, 0.0, 500.0)).unwrap();
        assert_eq!((u, v), (320.0, 240.0));
        assert!(camera.project(&Point3::new(1.0, 1.0, 0.0)).is_none());
    }
}
