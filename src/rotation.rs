//! Head and eye rotation composition in the avatar's bone convention.
//!
//! The tracker works in camera space: right-handed, x to the image right,
//! y down, z away from the camera. Avatar bones use y up and look down −z.
//! Converting between them flips the signs of the pitch (X) and roll (Z)
//! rotations and of every Y coordinate.

use crate::{
    config::{GazeConfig, HeadConfig},
    gaze::GazeRay,
    tracking::HeadPose,
    Error, Result,
};
use log::debug;
use nalgebra::{Unit, UnitQuaternion, Vector3};

/// Direction an unrotated avatar head faces
#[must_use]
pub fn head_forward() -> Vector3<f64> {
    -Vector3::z()
}

/// Shortest-arc rotation carrying `from` onto `to`.
///
/// Antiparallel vectors turn half-way around an axis perpendicular to
/// `from`.
///
/// # Errors
///
/// Returns `DegenerateInput` if either vector is zero-length
pub fn shortest_arc(from: &Vector3<f64>, to: &Vector3<f64>) -> Result<UnitQuaternion<f64>> {
    if from.norm_squared() == 0.0 || to.norm_squared() == 0.0 {
        return Err(Error::DegenerateInput("shortest arc of a zero vector".to_string()));
    }

    if let Some(rotation) = UnitQuaternion::rotation_between(from, to) {
        return Ok(rotation);
    }

    // Antiparallel: any perpendicular axis works
    let candidate = from.cross(&Vector3::x());
    let perpendicular = if candidate.norm_squared() > 1e-12 {
        candidate
    } else {
        from.cross(&Vector3::y())
    };
    Ok(UnitQuaternion::from_axis_angle(
        &Unit::new_normalize(perpendicular),
        std::f64::consts::PI,
    ))
}

/// Converts head poses and gaze rays into bone rotations
#[derive(Debug, Clone)]
pub struct RotationComposer {
    depth_origin: f64,
    position_scale: f64,
    gaze_damping: f64,
}

impl Default for RotationComposer {
    fn default() -> Self {
        Self::new(&HeadConfig::default(), &GazeConfig::default())
    }
}

impl RotationComposer {
    #[must_use]
    pub fn new(head: &HeadConfig, gaze: &GazeConfig) -> Self {
        Self {
            depth_origin: head.depth_origin,
            position_scale: head.position_scale,
            gaze_damping: gaze.damping,
        }
    }

    /// Head bone rotation: `Rx(-pitch) * Ry(yaw) * Rz(-roll)`
    #[must_use]
    pub fn head_rotation(&self, pose: &HeadPose) -> UnitQuaternion<f64> {
        let rotation = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -pose.pitch())
            * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), pose.yaw())
            * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), -pose.roll());

        let (x, y, z) = rotation.euler_angles();
        debug!(
            "head: {:.2},{:.2},{:.2}",
            x.to_degrees(),
            y.to_degrees(),
            z.to_degrees()
        );
        rotation
    }

    /// Centre bone offset: Y flipped, depth relative to the origin, scaled
    /// to avatar units
    #[must_use]
    pub fn center_position(&self, pose: &HeadPose) -> Vector3<f64> {
        let t = &pose.translation;
        Vector3::new(t.x, -t.y, t.z - self.depth_origin) * self.position_scale
    }

    /// Eye bone rotation turning the head's forward direction toward the
    /// gaze, damped toward identity
    ///
    /// # Errors
    ///
    /// Returns `DegenerateInput` if the gaze ray is unavailable
    pub fn eye_rotation(&self, gaze: &GazeRay, head: &UnitQuaternion<f64>) -> Result<UnitQuaternion<f64>> {
        if !gaze.is_available() {
            return Err(Error::DegenerateInput("gaze ray unavailable".to_string()));
        }

        let forward = head * head_forward();
        let d = gaze.direction();
        let target = Vector3::new(d.x, -d.y, d.z);

        let arc = shortest_arc(&forward, &target)?;
        Ok(UnitQuaternion::identity()
            .try_slerp(&arc, self.gaze_damping, 1e-9)
            .unwrap_or_else(UnitQuaternion::identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose(pitch: f64, yaw: f64, roll: f64) -> HeadPose {
        HeadPose::from_array([0.0, 0.0, 0.0, pitch, yaw, roll])
    }

    #[test]
    fn test_zero_pose_is_identity() {
        let composer = RotationComposer::default();
        let rotation = composer.head_rotation(&pose(0.0, 0.0, 0.0));
        assert!(rotation.angle() < 1e-12);
    }

    #[test]
    fn test_head_rotation_axis_signs() {
        let composer = RotationComposer::default();
        let angle: f64 = 0.4;

        // Pitch flips sign
        let q = composer.head_rotation(&pose(angle, 0.0, 0.0));
        assert!((q.i + (angle / 2.0).sin()).abs() < 1e-12);

        // Yaw keeps sign
        let q = composer.head_rotation(&pose(0.0, angle, 0.0));
        assert!((q.j - (angle / 2.0).sin()).abs() < 1e-12);

        // Roll flips sign
        let q = composer.head_rotation(&pose(0.0, 0.0, angle));
        assert!((q.k + (angle / 2.0).sin()).abs() < 1e-12);
    }

    #[test]
    fn test_head_rotation_is_deterministic() {
        let composer = RotationComposer::default();
        let p = pose(0.12, -0.34, 0.56);
        let a = composer.head_rotation(&p);
        let b = composer.head_rotation(&p);
        assert_eq!(a.coords, b.coords);
    }

    #[test]
    fn test_center_position() {
        let composer = RotationComposer::default();
        let origin = composer.center_position(&HeadPose::default());
        assert_eq!(origin.x, 0.0);
        assert_eq!(origin.y, 0.0);
        assert!((origin.z + 6.25).abs() < 1e-9);

        let moved = composer.center_position(&HeadPose::from_array([80.0, 40.0, 1000.0, 0.0, 0.0, 0.0]));
        assert!((moved.x - 0.5).abs() < 1e-9);
        assert!((moved.y + 0.25).abs() < 1e-9);
        assert!(moved.z.abs() < 1e-9);
    }

    #[test]
    fn test_eye_rotation_forward_gaze_is_identity() {
        let composer = RotationComposer::default();
        let gaze = GazeRay::from_direction(Vector3::new(0.0, 0.0, -1.0)).unwrap();
        let rotation = composer.eye_rotation(&gaze, &UnitQuaternion::identity()).unwrap();
        assert!(rotation.angle() < 1e-9);
    }

    #[test]
    fn test_eye_rotation_is_damped() {
        let composer = RotationComposer::default();
        let deflection: f64 = 0.6;
        let gaze = GazeRay::from_direction(Vector3::new(deflection.sin(), 0.0, -deflection.cos())).unwrap();

        let rotation = composer.eye_rotation(&gaze, &UnitQuaternion::identity()).unwrap();

        assert!((rotation.angle() - deflection * 0.25).abs() < 1e-9);
        // Turning -z toward +x is a rotation about -y
        let axis = rotation.axis().unwrap();
        assert!((axis.y + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_eye_rotation_flips_gaze_y() {
        let composer = RotationComposer::default();
        // Camera-space downward gaze (+y) looks down on the avatar (-y)
        let gaze = GazeRay::from_direction(Vector3::new(0.0, 0.3, -1.0)).unwrap();
        let rotation = composer.eye_rotation(&gaze, &UnitQuaternion::identity()).unwrap();
        let looked = rotation * head_forward();
        assert!(looked.y < 0.0);
    }

    #[test]
    fn test_eye_rotation_relative_to_head() {
        let composer = RotationComposer::default();
        let head = composer.head_rotation(&pose(0.0, 0.3, 0.0));
        let forward = head * head_forward();
        // Gaze exactly along the turned head (Y unaffected by yaw)
        let gaze = GazeRay::from_direction(forward).unwrap();
        let rotation = composer.eye_rotation(&gaze, &head).unwrap();
        assert!(rotation.angle() < 1e-9);
    }

    #[test]
    fn test_eye_rotation_unavailable_gaze() {
        let composer = RotationComposer::default();
        assert!(matches!(
            composer.eye_rotation(&GazeRay::unavailable(), &UnitQuaternion::identity()),
            Err(Error::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_shortest_arc_antiparallel() {
        let from = head_forward();
        let arc = shortest_arc(&from, &-from).unwrap();
        let turned = arc * from;
        assert!((turned + from).norm() < 1e-9);
    }
}
