//! Speech core error types.

use parlance_core::{EngineError, PreferenceError, PreferenceStoreError};

/// Errors that can occur in the speech core.
///
/// Catalog and priming failures never show up here: they are logged and
/// retried or ignored.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    /// The preference store failed (record missing, transport, bad shape).
    #[error(transparent)]
    Store(#[from] PreferenceStoreError),

    /// The engine refused to start an utterance.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A preference value is out of range.
    #[error(transparent)]
    InvalidPreference(#[from] PreferenceError),

    /// `save` was called before a successful `load`.
    #[error("No preference record loaded; call load before save")]
    NoRecordLoaded,

    /// The identity provider has no current user.
    #[error("No user is signed in")]
    NotSignedIn,

    /// The requested voice index is not in the catalog.
    #[error("No voice at catalog index {0}")]
    UnknownVoice(usize),
}
