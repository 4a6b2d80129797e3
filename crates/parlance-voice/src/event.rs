//! Events emitted by the speech core to the UI / application layer.

use crate::playback::PlaybackState;

/// Events emitted by [`SpeakService`](crate::SpeakService).
#[derive(Debug, Clone, PartialEq)]
pub enum SpeakEvent {
    /// Playback state changed.
    StateChanged(PlaybackState),

    /// The engine confirmed it started speaking this text.
    SpeakingStarted { text: String },

    /// The active utterance ended (finished, cancelled or stopped).
    SpeakingFinished,

    /// The voice catalog was republished.
    CatalogUpdated { count: usize },

    /// Preferences were loaded for a user.
    PreferencesLoaded { user_id: String },

    /// Preferences were written back to the store.
    PreferencesSaved,
}
