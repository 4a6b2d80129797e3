//! User speech preferences and validation.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::VoiceSelection;

/// Default pitch multiplier.
pub const DEFAULT_PITCH: f64 = 1.0;

/// Default speaking rate multiplier.
pub const DEFAULT_RATE: f64 = 1.0;

/// Accepted pitch values.
pub const PITCH_RANGE: RangeInclusive<f64> = 0.0..=2.0;

/// Accepted rate values.
pub const RATE_RANGE: RangeInclusive<f64> = 0.1..=10.0;

/// Per-user speech preferences.
///
/// Field names match the stored record (`pitch`, `rate`, `currentVoice`).
/// Missing fields fall back to defaults so that partially written records
/// still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub pitch: f64,
    pub rate: f64,
    pub current_voice: Option<VoiceSelection>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            pitch: DEFAULT_PITCH,
            rate: DEFAULT_RATE,
            current_voice: None,
        }
    }
}

impl UserPreferences {
    /// Index of the selected voice, if any.
    #[must_use]
    pub fn selected_voice_index(&self) -> Option<usize> {
        self.current_voice.as_ref().map(|v| v.index)
    }
}

/// Preference validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PreferenceError {
    #[error("Pitch must be between 0 and 2, got {0}")]
    InvalidPitch(f64),

    #[error("Rate must be between 0.1 and 10, got {0}")]
    InvalidRate(f64),
}

/// Validate preference values before they are sent to the engine or store.
pub fn validate_preferences(prefs: &UserPreferences) -> Result<(), PreferenceError> {
    if !PITCH_RANGE.contains(&prefs.pitch) {
        return Err(PreferenceError::InvalidPitch(prefs.pitch));
    }
    if !RATE_RANGE.contains(&prefs.rate) {
        return Err(PreferenceError::InvalidRate(prefs.rate));
    }
    Ok(())
}
