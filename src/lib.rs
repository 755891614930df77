//! Facial tracking to avatar keyframe mapping.
//!
//! This library turns the per-frame output of a facial tracker (head pose,
//! 3D face and eye landmarks, action unit reports) into animation keyframes
//! for an avatar skeleton:
//! - head rotation and body position keyframes from the head pose
//! - eye bone rotations from a custom gaze estimator
//! - blendshape weights from a fixed action unit rule table
//!
//! The mapping for one frame consists of:
//! 1. Action unit extraction into a normalized vector
//! 2. Gaze estimation by reprojecting the pupil onto the eyelid depth
//! 3. Head and eye rotation composition in the avatar's axis convention
//! 4. Expression mapping from action units to blendshapes
//! 5. Frame assembly into timestamped keyframes
//!
//! Smoothing, keyframe reduction, renaming and file output are left to
//! downstream stages.
//!
//! # Examples
//!
//! ## Single Frame
//!
//! ```no_run
//! use face_keyframes::{
//!     assembler::FrameAssembler,
//!     config::Config,
//!     keyframe::Bone,
//!     tracking::{FrameInput, HeadPose},
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let assembler = FrameAssembler::new(&Config::default())?;
//!
//! let input = FrameInput {
//!     head_pose: HeadPose::from_array([12.0, -4.0, 650.0, 0.1, -0.2, 0.05]),
//!     au_presence: vec![("AU12_c".to_string(), 1.0)],
//!     au_intensity: vec![("AU12_r".to_string(), 3.0)],
//!     ..FrameInput::default()
//! };
//!
//! let output = assembler.assemble(0, &input);
//! if let Some(head) = output.rotation(Bone::Head) {
//!     println!("Head rotation: {:?}", head.rotation);
//! }
//! for morph in &output.morphs {
//!     println!("{}: {:.2}", morph.morph, morph.weight);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Streaming a Recording
//!
//! ```no_run
//! use face_keyframes::{assembler::FrameAssembler, config::Config, tracking::FrameInput};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let assembler = FrameAssembler::new(&Config::default())?;
//!
//! // `None` marks frames where the tracker lost the face
//! let recording: Vec<Option<FrameInput>> = vec![Some(FrameInput::default()), None];
//!
//! for output in assembler.stream(recording) {
//!     println!("frame {}: {} keyframes", output.frame, output.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Individual Stages
//!
//! ```no_run
//! use face_keyframes::{
//!     action_units::{ActionUnit, ActionUnitExtractor},
//!     expression::{ExpressionMapper, Morph},
//! };
//!
//! let au = ActionUnitExtractor::default().extract(&[("AU26_c", 1.0)], &[("AU26_r", 1.5)]);
//! assert_eq!(au.get(ActionUnit::JawDrop), 0.3);
//!
//! let weights = ExpressionMapper::default().map(&au);
//! println!("A: {:.2}", weights.get(Morph::MouthA));
//! ```

/// Action unit parsing and normalization
pub mod action_units;

/// Eye gaze estimation from eye landmarks
pub mod gaze;

/// Head and eye rotation composition
pub mod rotation;

/// Action unit to blendshape rules
pub mod expression;

/// Per-frame keyframe assembly
pub mod assembler;

/// Keyframe records
pub mod keyframe;

/// Tracker output types
pub mod tracking;

/// Error types and result handling
pub mod error;

/// Constants used throughout the library
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
