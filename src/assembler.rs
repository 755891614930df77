//! Frame assembly: runs every mapping stage for one tracked frame and
//! packages the results as keyframes.

use crate::{
    action_units::ActionUnitExtractor,
    config::Config,
    expression::ExpressionMapper,
    gaze::{EyeModelTable, EyeSide, GazeEstimator},
    keyframe::{Bone, FrameOutput},
    rotation::RotationComposer,
    tracking::FrameInput,
    Result,
};
use log::{debug, info, warn};

/// Turns tracked frames into keyframes.
///
/// Holds only immutable parameters, so one assembler can serve frames from
/// several threads.
#[derive(Debug, Clone)]
pub struct FrameAssembler {
    extractor: ActionUnitExtractor,
    gaze: GazeEstimator,
    rotation: RotationComposer,
    expression: ExpressionMapper,
}

impl FrameAssembler {
    /// Create an assembler from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let eye_models = EyeModelTable::from_config(&config.tracker);
        if !eye_models.has_any() {
            info!("Tracker exposes no eye models; gaze keyframes disabled");
        }

        Ok(Self {
            extractor: ActionUnitExtractor::new(config.expression.max_intensity),
            gaze: GazeEstimator::new(eye_models, &config.gaze),
            rotation: RotationComposer::new(&config.head, &config.gaze),
            expression: ExpressionMapper::new(&config.expression),
        })
    }

    /// Produce all keyframes for one tracked frame
    #[must_use]
    pub fn assemble(&self, frame: u32, input: &FrameInput) -> FrameOutput {
        let mut output = FrameOutput::new(frame);

        // Head
        let head = self.rotation.head_rotation(&input.head_pose);
        output.add_rotation(Bone::Head, head);
        output.add_position(Bone::Center, self.rotation.center_position(&input.head_pose));

        // Expression
        let au = self.extractor.extract(&input.au_presence, &input.au_intensity);
        for (morph, weight) in self.expression.map(&au).iter() {
            output.add_morph(morph, weight);
        }

        // Gaze
        if self.gaze.models().has_any() {
            for side in EyeSide::BOTH {
                let eye = self
                    .gaze
                    .estimate(side, input)
                    .and_then(|ray| self.rotation.eye_rotation(&ray, &head));
                match eye {
                    Ok(rotation) => output.add_rotation(side.bone(), rotation),
                    Err(e) => warn!("Frame {frame}: skipping {side} eye rotation: {e}"),
                }
            }
        }

        debug!("Frame {frame}: {} keyframes", output.len());
        output
    }

    /// Lazily assemble a sequence of tracker results.
    ///
    /// Each item is one video frame; `None` marks a frame the tracker lost.
    /// Frame indices count every item, so lost frames leave gaps.
    pub fn stream<I>(&self, frames: I) -> FrameStream<'_, I::IntoIter>
    where
        I: IntoIterator<Item = Option<FrameInput>>,
    {
        FrameStream {
            assembler: self,
            frames: frames.into_iter(),
            next_index: 0,
        }
    }
}

/// Iterator returned by [`FrameAssembler::stream`]
pub struct FrameStream<'a, I> {
    assembler: &'a FrameAssembler,
    frames: I,
    next_index: u32,
}

impl<I> Iterator for FrameStream<'_, I>
where
    I: Iterator<Item = Option<FrameInput>>,
{
    type Item = FrameOutput;

    fn next(&mut self) -> Option<FrameOutput> {
        loop {
            let frame = self.next_index;
            let input = self.frames.next()?;
            self.next_index = self.next_index.saturating_add(1);

            match input {
                Some(input) => return Some(self.assembler.assemble(frame, &input)),
                None => debug!("Frame {frame}: not tracked"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::TrackerConfig, expression::Morph};
    use nalgebra::UnitQuaternion;

    #[test]
    fn test_eye_bones_are_mirrored() {
        assert_eq!(EyeSide::Left.bone(), Bone::RightEye);
        assert_eq!(EyeSide::Right.bone(), Bone::LeftEye);
    }

    #[test]
    fn test_assemble_zero_frame() {
        let assembler = FrameAssembler::new(&Config::default()).unwrap();
        let output = assembler.assemble(0, &FrameInput::default());

        let head = output.rotation(Bone::Head).unwrap();
        assert!(head.rotation.angle_to(&UnitQuaternion::identity()) < 1e-12);
        let center = output.position(Bone::Center).unwrap();
        assert!((center.position.z + 6.25).abs() < 1e-9);
        assert_eq!(output.morphs.len(), Morph::COUNT);
        assert!(output.morphs.iter().all(|k| k.weight == 0.0));
        // No landmarks: eye rotations are skipped, not faked
        assert!(output.rotation(Bone::LeftEye).is_none());
        assert!(output.rotation(Bone::RightEye).is_none());
    }

    #[test]
    fn test_assembler_without_eye_models() {
        let config = Config {
            tracker: TrackerConfig {
                part_models: Vec::new(),
                ..TrackerConfig::default()
            },
            ..Config::default()
        };
        let assembler = FrameAssembler::new(&config).unwrap();
        let output = assembler.assemble(3, &FrameInput::default());
        assert_eq!(output.rotations.len(), 1);
        assert_eq!(output.frame, 3);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Config::default();
        config.gaze.damping = -1.0;
        assert!(FrameAssembler::new(&config).is_err());
    }

    #[test]
    fn test_stream_skips_untracked_frames() {
        let assembler = FrameAssembler::new(&Config::default()).unwrap();
        let frames = vec![
            Some(FrameInput::default()),
            None,
            None,
            Some(FrameInput::default()),
        ];

        let indices: Vec<u32> = assembler.stream(frames).map(|output| output.frame).collect();
        assert_eq!(indices, vec![0, 3]);
    }
}
