//! Logging speech engine for terminals without a speech backend.
//!
//! Utterances are written to the log instead of rendered as audio. Each
//! one completes immediately: the status stream carries `Started` then
//! `Done`.

use parlance_core::{
    EngineError, EngineStatus, SpeechEngine, StatusStream, UtteranceRequest, Voice,
};
use tokio::sync::mpsc;

/// Voices advertised by [`LogSpeechEngine::with_builtin_voices`].
const BUILTIN_VOICES: &[(&str, &str)] = &[
    ("Anna", "de-DE"),
    ("Thomas", "fr-FR"),
    ("Karen", "en-AU"),
    ("Moira", "en-IE"),
    ("Daniel", "en-GB"),
    ("Samantha", "en-US"),
];

/// [`SpeechEngine`] that logs utterances through `tracing`.
pub struct LogSpeechEngine {
    voices: Vec<Voice>,
}

impl LogSpeechEngine {
    pub const fn new(voices: Vec<Voice>) -> Self {
        Self { voices }
    }

    /// Engine with a small fixed set of voices in several languages.
    pub fn with_builtin_voices() -> Self {
        let voices = BUILTIN_VOICES
            .iter()
            .map(|(name, lang)| Voice {
                uri: format!("log:{name}"),
                ..Voice::new(*name, *lang)
            })
            .collect();
        Self::new(voices)
    }
}

impl SpeechEngine for LogSpeechEngine {
    fn list_voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    fn start_utterance(&self, request: &UtteranceRequest) -> Result<StatusStream, EngineError> {
        if request.text.trim().is_empty() {
            tracing::debug!("Blank utterance");
        } else {
            tracing::info!(
                voice = request.voice.as_ref().map_or("default", |v| v.name.as_str()),
                pitch = request.pitch,
                rate = request.rate,
                "{}",
                request.text
            );
        }

        let (tx, rx) = mpsc::unbounded_channel();
        // Receiver is alive, sends cannot fail
        let _ = tx.send(EngineStatus::Started);
        let _ = tx.send(EngineStatus::Done);
        Ok(rx)
    }

    fn pause_active(&self) {
        tracing::debug!("pause requested");
    }

    fn resume_active(&self) {
        tracing::debug!("resume requested");
    }

    fn cancel_active(&self) {
        tracing::debug!("cancel requested");
    }
}
