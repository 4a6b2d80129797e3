//! Speech core for parlance: voice catalog, playback state machine and
//! preference synchronization.
//!
//! [`SpeakService`] is the entry point. It owns a [`VoiceCatalog`], a
//! [`PlaybackController`] and a [`PreferenceSynchronizer`], all built over
//! the ports defined in `parlance-core`, so any engine or store can be
//! injected (including fakes in tests).

#![deny(unused_crate_dependencies)]

pub mod catalog;
pub mod error;
pub mod event;
pub mod playback;
pub mod preferences;
pub mod service;

// Re-export key types for convenience
pub use catalog::{CatalogConfig, VoiceCatalog};
pub use error::SpeechError;
pub use event::SpeakEvent;
pub use playback::{PlaybackController, PlaybackState, SpeakOutcome};
pub use preferences::{PreferenceSynchronizer, RecordRef};
pub use service::{SpeakService, SpeakServiceConfig, SpeakServiceDeps};

// Dev-dependency only used by the integration tests
#[cfg(test)]
use async_trait as _;
