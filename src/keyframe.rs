//! Keyframe records handed to the downstream smoothing and serialization
//! stages.

use crate::expression::Morph;
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Serialize, Serializer};
use std::fmt;

/// Bones driven by this layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bone {
    Head,
    /// Whole-body translation
    Center,
    LeftEye,
    RightEye,
}

impl Bone {
    /// Identifier of the bone on the target avatar
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Head => "頭",
            Self::Center => "センター",
            Self::LeftEye => "左目",
            Self::RightEye => "右目",
        }
    }
}

impl fmt::Display for Bone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Bone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RotationKeyframe {
    pub bone: Bone,
    pub frame: u32,
    /// Stored as `[x, y, z, w]`
    pub rotation: UnitQuaternion<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionKeyframe {
    pub bone: Bone,
    pub frame: u32,
    /// Offset in avatar units
    pub position: Vector3<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MorphKeyframe {
    pub morph: Morph,
    pub frame: u32,
    /// Weight in `[0, 1]`
    pub weight: f64,
}

/// Keyframes produced for one input frame, per channel in emission order
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FrameOutput {
    pub frame: u32,
    pub rotations: Vec<RotationKeyframe>,
    pub positions: Vec<PositionKeyframe>,
    pub morphs: Vec<MorphKeyframe>,
}

impl FrameOutput {
    #[must_use]
    pub fn new(frame: u32) -> Self {
        Self {
            frame,
            ..Self::default()
        }
    }

    pub fn add_rotation(&mut self, bone: Bone, rotation: UnitQuaternion<f64>) {
        self.rotations.push(RotationKeyframe {
            bone,
            frame: self.frame,
            rotation,
        });
    }

    pub fn add_position(&mut self, bone: Bone, position: Vector3<f64>) {
        self.positions.push(PositionKeyframe {
            bone,
            frame: self.frame,
            position,
        });
    }

    pub fn add_morph(&mut self, morph: Morph, weight: f64) {
        self.morphs.push(MorphKeyframe {
            morph,
            frame: self.frame,
            weight,
        });
    }

    /// Rotation keyframe of a bone, if one was emitted
    #[must_use]
    pub fn rotation(&self, bone: Bone) -> Option<&RotationKeyframe> {
        self.rotations.iter().find(|k| k.bone == bone)
    }

    /// Position keyframe of a bone, if one was emitted
    #[must_use]
    pub fn position(&self, bone: Bone) -> Option<&PositionKeyframe> {
        self.positions.iter().find(|k| k.bone == bone)
    }

    /// Weight emitted for a morph
    #[must_use]
    pub fn morph(&self, morph: Morph) -> Option<f64> {
        self.morphs.iter().find(|k| k.morph == morph).map(|k| k.weight)
    }

    /// Total number of keyframes across all channels
    #[must_use]
    pub fn len(&self) -> usize {
        self.rotations.len() + self.positions.len() + self.morphs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
