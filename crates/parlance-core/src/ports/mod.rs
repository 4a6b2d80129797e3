//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the speech core expects from the
//! platform and from infrastructure. They contain no implementation details
//! and use only domain types.
//!
//! # Design Rules
//!
//! - No `sqlx` or engine SDK types in any signature
//! - Engine requests are fire-and-forget; status arrives on a stream
//! - Store methods are document-shaped, not preference-shaped, so the
//!   mapping to [`UserPreferences`](crate::UserPreferences) stays in one place

pub mod identity;
pub mod preference_store;
pub mod speech_engine;

use thiserror::Error;

pub use identity::{IdentityProvider, StaticIdentity};
#[cfg(feature = "test-utils")]
pub use preference_store::MockPreferenceStore;
pub use preference_store::{Document, PreferenceStore, SETTINGS_COLLECTION};
pub use speech_engine::{EngineStatus, SpeechEngine, StatusStream, UtteranceRequest};

/// Errors returned by [`PreferenceStore`] operations.
///
/// This error type abstracts away transport and storage details so the
/// synchronizer can surface them to its caller unmodified.
#[derive(Debug, Error)]
pub enum PreferenceStoreError {
    /// No record exists under the requested key.
    #[error("Not found: {collection}/{key}")]
    NotFound { collection: String, key: String },

    /// The store could not be reached or the request failed in transit.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The record exists but its fields do not have the expected shape.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

impl PreferenceStoreError {
    /// Convenience constructor for [`PreferenceStoreError::NotFound`].
    pub fn not_found(collection: impl Into<String>, key: impl Into<String>) -> Self {
        Self::NotFound {
            collection: collection.into(),
            key: key.into(),
        }
    }
}

/// Errors an engine can report synchronously when asked to start speaking.
///
/// Most engine failures (unsupported voice, muted output) are not reported
/// at all: the engine simply produces no audio.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine is not available on this platform.
    #[error("Speech engine unavailable: {0}")]
    Unavailable(String),

    /// The engine refused the utterance.
    #[error("Utterance rejected: {0}")]
    Rejected(String),
}
