//! Filter state snapshot.

use std::fmt;
use std::str::FromStr;

use crate::error::FilterError;

/// Lowest accepted intensity.
pub const MIN_INTENSITY: u8 = 0;
/// Highest accepted intensity.
pub const MAX_INTENSITY: u8 = 100;
/// Intensity used when nothing has been stored yet.
pub const DEFAULT_INTENSITY: u8 = 50;

/// The selected tint direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    /// No tint, whatever the intensity.
    #[default]
    Neutral,
    /// Red stays at full strength; green and blue attenuate.
    Warm,
    /// Blue stays at full strength; green and red attenuate.
    Cool,
}

impl FilterMode {
    /// All modes, in presentation order.
    pub const ALL: [FilterMode; 3] = [FilterMode::Neutral, FilterMode::Warm, FilterMode::Cool];

    /// The stored name of this mode (`neutral`, `warm` or `cool`).
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMode::Neutral => "neutral",
            FilterMode::Warm => "warm",
            FilterMode::Cool => "cool",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "neutral" => Ok(FilterMode::Neutral),
            "warm" => Ok(FilterMode::Warm),
            "cool" | "cold" => Ok(FilterMode::Cool),
            _ => Err(FilterError::InvalidMode(s.trim().to_string())),
        }
    }
}

/// A snapshot of the filter's user-facing position.
///
/// Use [`FilterController::state`](crate::FilterController::state) to obtain a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterState {
    /// The selected tint direction.
    pub mode: FilterMode,
    /// Tint strength (0-100).
    pub intensity: u8,
}

impl FilterState {
    /// Create a state, validating the intensity.
    ///
    /// # Errors
    /// Returns [`FilterError::InvalidArgument`] if `intensity` is outside 0-100.
    pub fn new(mode: FilterMode, intensity: i32) -> Result<Self, FilterError> {
        Ok(Self {
            mode,
            intensity: validate_intensity(intensity)?,
        })
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            mode: FilterMode::Neutral,
            intensity: DEFAULT_INTENSITY,
        }
    }
}

/// Check that `value` is a valid intensity and narrow it.
pub(crate) fn validate_intensity(value: i32) -> Result<u8, FilterError> {
    match u8::try_from(value) {
        Ok(v) if (MIN_INTENSITY..=MAX_INTENSITY).contains(&v) => Ok(v),
        _ => Err(FilterError::InvalidArgument {
            value,
            min: MIN_INTENSITY.into(),
            max: MAX_INTENSITY.into(),
        }),
    }
}
