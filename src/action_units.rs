//! Action unit extraction from the tracker's labeled presence and intensity
//! reports.
//!
//! The tracker reports each action unit twice: a classification (`"AU12_c"`,
//! zero when the unit is absent) and a regression (`"AU12_r"`, intensity in
//! `0.0..=5.0`). [`ActionUnitExtractor`] folds both into an
//! [`ActionUnitVector`] of normalized intensities.

use crate::{
    constants::{ACTION_UNIT_MAX_INTENSITY, AU_SIZE},
    Error, Result,
};
use log::warn;

/// Action units the expression rules read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ActionUnit {
    InnerBrowRaiser = 1,
    OuterBrowRaiser = 2,
    BrowLowerer = 4,
    UpperLidRaiser = 5,
    CheekRaiser = 6,
    LidTightener = 7,
    NoseWrinkler = 9,
    UpperLipRaiser = 10,
    LipCornerPuller = 12,
    Dimpler = 14,
    LipCornerDepressor = 15,
    ChinRaiser = 17,
    LipStretcher = 20,
    LipTightener = 23,
    /// Also fires for the "I" mouth shape
    LipPart = 25,
    JawDrop = 26,
    LipSuck = 28,
    Blink = 45,
}

impl ActionUnit {
    /// Bounds-checked code of this unit
    #[must_use]
    pub const fn code(self) -> ActionUnitCode {
        ActionUnitCode(self as u8)
    }
}

/// Action unit code guaranteed to index an [`ActionUnitVector`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionUnitCode(u8);

impl ActionUnitCode {
    /// Parse the two-digit code embedded at byte offset 2 of a label
    /// (`"AU05_r"` → 5).
    ///
    /// # Errors
    ///
    /// Returns `MalformedLabel` if the label has no two ASCII digits at that
    /// offset, or `UnknownActionUnit` if the code does not fit the vector.
    pub fn from_label(label: &str) -> Result<Self> {
        let digits = label
            .as_bytes()
            .get(2..4)
            .filter(|d| d.iter().all(u8::is_ascii_digit))
            .ok_or_else(|| Error::MalformedLabel(label.to_string()))?;

        let code = (digits[0] - b'0') * 10 + (digits[1] - b'0');
        Self::try_from(code)
    }

    /// Index into the dense vector
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for ActionUnitCode {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        if usize::from(code) < AU_SIZE {
            Ok(Self(code))
        } else {
            Err(Error::UnknownActionUnit(code))
        }
    }
}

impl From<ActionUnit> for ActionUnitCode {
    fn from(unit: ActionUnit) -> Self {
        unit.code()
    }
}

/// Normalized action unit intensities indexed by code
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionUnitVector([f64; AU_SIZE]);

impl Default for ActionUnitVector {
    fn default() -> Self {
        Self([0.0; AU_SIZE])
    }
}

impl ActionUnitVector {
    /// All-zero vector
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Intensity of a unit
    #[must_use]
    pub fn get(&self, code: impl Into<ActionUnitCode>) -> f64 {
        self.0[code.into().index()]
    }

    /// Set the intensity of a unit
    pub fn set(&mut self, code: impl Into<ActionUnitCode>, value: f64) {
        self.0[code.into().index()] = value;
    }

    /// Builder-style [`set`](Self::set)
    #[must_use]
    pub fn with(mut self, code: impl Into<ActionUnitCode>, value: f64) -> Self {
        self.set(code, value);
        self
    }

    /// Raw dense view
    #[must_use]
    pub const fn as_array(&self) -> &[f64; AU_SIZE] {
        &self.0
    }
}

/// Folds presence and intensity reports into an [`ActionUnitVector`]
#[derive(Debug, Clone)]
pub struct ActionUnitExtractor {
    max_intensity: f64,
}

impl Default for ActionUnitExtractor {
    fn default() -> Self {
        Self::new(ACTION_UNIT_MAX_INTENSITY)
    }
}

impl ActionUnitExtractor {
    /// Create an extractor normalizing by `max_intensity`
    ///
    /// # Panics
    ///
    /// Panics if `max_intensity` is not a positive finite number
    #[must_use]
    pub fn new(max_intensity: f64) -> Self {
        assert!(
            max_intensity.is_finite() && max_intensity > 0.0,
            "Max intensity must be positive"
        );
        Self { max_intensity }
    }

    /// Build the normalized vector for one frame.
    ///
    /// A code contributes only when its presence value is nonzero and it
    /// appears in the intensity report. Entries whose label cannot be parsed
    /// are skipped.
    pub fn extract<P, I>(&self, presence: &[(P, f64)], intensity: &[(I, f64)]) -> ActionUnitVector
    where
        P: AsRef<str>,
        I: AsRef<str>,
    {
        let mut valid = [false; AU_SIZE];
        for (label, value) in presence {
            if let Some(code) = Self::parse_or_skip(label.as_ref()) {
                valid[code.index()] = *value != 0.0;
            }
        }

        let mut vector = ActionUnitVector::new();
        for (label, value) in intensity {
            if let Some(code) = Self::parse_or_skip(label.as_ref()) {
                if valid[code.index()] {
                    vector.set(code, value / self.max_intensity);
                }
            }
        }

        vector
    }

    fn parse_or_skip(label: &str) -> Option<ActionUnitCode> {
        match ActionUnitCode::from_label(label) {
            Ok(code) => Some(code),
            Err(e) => {
                warn!("Skipping action unit entry: {e}");
                None
            }
        }
    }
}
