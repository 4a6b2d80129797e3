//! Domain types for the speech core.
//!
//! These are pure data structures with no infrastructure dependencies.

mod platform;
mod preferences;
mod voice;

pub use platform::{DEFAULT_PRIMING_DELAY, PlatformProfile};
pub use preferences::{
    DEFAULT_PITCH, DEFAULT_RATE, PITCH_RANGE, PreferenceError, RATE_RANGE, UserPreferences,
    validate_preferences,
};
pub use voice::{IndexedVoice, Voice, VoiceSelection, index_voices};
