//! Speech engine port: the platform text-to-speech capability.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::EngineError;
use crate::domain::{DEFAULT_PITCH, DEFAULT_RATE, Voice};

/// Status reported by the engine for one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EngineStatus {
    /// The engine accepted the utterance and began rendering.
    Started,
    /// Audio is playing (also reported after a resume).
    Playing,
    /// The utterance is suspended and can be resumed.
    Paused,
    /// The utterance finished naturally.
    Done,
    /// The utterance was cancelled before it finished.
    Cancelled,
}

impl EngineStatus {
    /// Whether this status ends the utterance.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Cancelled)
    }
}

/// Per-utterance status stream.
///
/// The engine drops its sender once the utterance reaches a terminal status.
pub type StatusStream = mpsc::UnboundedReceiver<EngineStatus>;

/// One request to render text as speech.
#[derive(Debug, Clone, PartialEq)]
pub struct UtteranceRequest {
    pub text: String,

    /// Voice to speak with; `None` lets the engine pick its default.
    pub voice: Option<Voice>,

    pub pitch: f64,
    pub rate: f64,
}

impl UtteranceRequest {
    /// Request with default voice, pitch and rate.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: None,
            pitch: DEFAULT_PITCH,
            rate: DEFAULT_RATE,
        }
    }
}

/// Backend-agnostic platform speech engine.
///
/// Every control method returns immediately; the effect is observed later
/// through the [`StatusStream`] returned by [`start_utterance`].
/// Implementations must be `Send + Sync` so a single handle can be shared
/// for the whole session.
///
/// [`start_utterance`]: SpeechEngine::start_utterance
pub trait SpeechEngine: Send + Sync {
    /// Voices the engine currently knows about.
    ///
    /// May be empty right after startup while the platform is still
    /// enumerating voices.
    fn list_voices(&self) -> Vec<Voice>;

    /// Queue an utterance and return its status stream.
    fn start_utterance(&self, request: &UtteranceRequest) -> Result<StatusStream, EngineError>;

    /// Suspend the active utterance.
    fn pause_active(&self);

    /// Continue a suspended utterance.
    fn resume_active(&self);

    /// Cancel any pending or active utterance.
    fn cancel_active(&self);
}
