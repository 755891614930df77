//! Action unit to blendshape rules.
//!
//! A fixed rule table, not a learned model. Conflicting pairs (blink against
//! cheek raise, troubled brows against a pleased face) are emitted as-is
//! and left to a later pass over the whole morph sequence.

use crate::{
    action_units::{ActionUnit, ActionUnitVector},
    config::ExpressionConfig,
};
use serde::{Serialize, Serializer};
use std::fmt;

/// Blendshapes driven by the rule table, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Morph {
    /// "A" vowel, open jaw
    MouthA,
    /// "I" vowel, parted lips
    MouthI,
    /// "U" vowel, tightened lips
    MouthU,
    Smile,
    FrownCorner,
    Blink,
    CheekRaise,
    Surprise,
    BrowInnerRaise,
    BrowOuterRaise,
    Anger,
    BrowDown,
    BrowUp,
}

impl Morph {
    pub const COUNT: usize = 13;

    pub const ALL: [Self; Self::COUNT] = [
        Self::MouthA,
        Self::MouthI,
        Self::MouthU,
        Self::Smile,
        Self::FrownCorner,
        Self::Blink,
        Self::CheekRaise,
        Self::Surprise,
        Self::BrowInnerRaise,
        Self::BrowOuterRaise,
        Self::Anger,
        Self::BrowDown,
        Self::BrowUp,
    ];

    /// Identifier of the morph on the target avatar
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MouthA => "あ",
            Self::MouthI => "い",
            Self::MouthU => "う",
            Self::Smile => "にやり",
            Self::FrownCorner => "∧",
            Self::Blink => "まばたき",
            Self::CheekRaise => "CheekRaiser",
            Self::Surprise => "びっくり",
            Self::BrowInnerRaise => "困る",
            Self::BrowOuterRaise => "真面目",
            Self::Anger => "怒り",
            Self::BrowDown => "下",
            Self::BrowUp => "上",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Morph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Morph {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Clamp a weight into `[0, 1]`; NaN becomes 0
#[must_use]
pub fn clamp_weight(weight: f64) -> f64 {
    if weight.is_nan() {
        0.0
    } else {
        weight.clamp(0.0, 1.0)
    }
}

/// One weight per [`Morph`], each in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MorphWeights([f64; Morph::COUNT]);

impl MorphWeights {
    #[must_use]
    pub const fn get(&self, morph: Morph) -> f64 {
        self.0[morph.index()]
    }

    fn set(&mut self, morph: Morph, weight: f64) {
        self.0[morph.index()] = clamp_weight(weight);
    }

    /// Weights in emission order
    pub fn iter(&self) -> impl Iterator<Item = (Morph, f64)> + '_ {
        Morph::ALL.iter().map(move |&morph| (morph, self.get(morph)))
    }
}

/// Maps an action unit vector to blendshape weights
#[derive(Debug, Clone)]
pub struct ExpressionMapper {
    mouth_gain: f64,
    mouth_exclusion_threshold: f64,
    blink_threshold: f64,
}

impl Default for ExpressionMapper {
    fn default() -> Self {
        Self::new(&ExpressionConfig::default())
    }
}

impl ExpressionMapper {
    #[must_use]
    pub fn new(config: &ExpressionConfig) -> Self {
        Self {
            mouth_gain: config.mouth_gain,
            mouth_exclusion_threshold: config.mouth_exclusion_threshold,
            blink_threshold: config.blink_threshold,
        }
    }

    /// Apply the rule table. Every weight, including pass-through ones, is
    /// clamped to `[0, 1]`.
    #[must_use]
    pub fn map(&self, au: &ActionUnitVector) -> MorphWeights {
        let mut weights = MorphWeights::default();

        // Mouth
        // Suppression reads the unclamped products so a NaN "A" or "U" still suppresses "I"
        let mouth_a = au.get(ActionUnit::JawDrop) * self.mouth_gain;
        let mouth_u = au.get(ActionUnit::LipTightener) * self.mouth_gain;
        let mouth_i = if mouth_a < self.mouth_exclusion_threshold && mouth_u < self.mouth_exclusion_threshold {
            au.get(ActionUnit::LipPart) * self.mouth_gain
        } else {
            0.0
        };
        weights.set(Morph::MouthA, mouth_a);
        weights.set(Morph::MouthI, mouth_i);
        weights.set(Morph::MouthU, mouth_u);
        weights.set(Morph::Smile, au.get(ActionUnit::LipCornerPuller));
        weights.set(Morph::FrownCorner, au.get(ActionUnit::LipCornerDepressor));

        // Eyes
        let blink = if au.get(ActionUnit::Blink) > self.blink_threshold {
            1.0
        } else {
            au.get(ActionUnit::LidTightener)
        };
        weights.set(Morph::Blink, blink);
        weights.set(Morph::CheekRaise, au.get(ActionUnit::CheekRaiser));
        weights.set(Morph::Surprise, au.get(ActionUnit::UpperLidRaiser));

        // Brows
        weights.set(Morph::BrowInnerRaise, au.get(ActionUnit::InnerBrowRaiser));
        weights.set(Morph::BrowOuterRaise, au.get(ActionUnit::OuterBrowRaiser));
        weights.set(Morph::Anger, au.get(ActionUnit::NoseWrinkler));
        weights.set(Morph::BrowDown, au.get(ActionUnit::BrowLowerer));
        weights.set(Morph::BrowUp, au.get(ActionUnit::UpperLidRaiser));

        weights
    }
}
