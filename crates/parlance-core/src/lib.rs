//! Core domain types and port definitions for parlance.
//!
//! This crate holds the pure data shapes shared by every other crate
//! (voices, user preferences, platform profile) and the port traits the
//! speech core calls through:
//!
//! - [`SpeechEngine`]: the platform text-to-speech engine
//! - [`PreferenceStore`]: the remote per-user document store
//! - [`IdentityProvider`]: the session's current user
//!
//! No adapter lives here. Concrete stores are in `parlance-db`, the speech
//! state machine in `parlance-voice`.

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    DEFAULT_PITCH, DEFAULT_PRIMING_DELAY, DEFAULT_RATE, IndexedVoice, PITCH_RANGE,
    PlatformProfile, PreferenceError, RATE_RANGE, UserPreferences, Voice, VoiceSelection,
    index_voices, validate_preferences,
};
pub use ports::{
    Document, EngineError, EngineStatus, IdentityProvider, PreferenceStore, PreferenceStoreError,
    SETTINGS_COLLECTION, SpeechEngine, StaticIdentity, StatusStream, UtteranceRequest,
};

#[cfg(feature = "test-utils")]
pub use ports::MockPreferenceStore;
