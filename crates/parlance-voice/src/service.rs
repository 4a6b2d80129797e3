//! `SpeakService`: the facade the application talks to.
//!
//! Composes the three parts of the speech core:
//!
//! ```text
//!   PreferenceSynchronizer ──(pitch, rate, voice index)──┐
//!                                                        ▼
//!   VoiceCatalog ──(indexed voices, fallback)──→ PlaybackController ──→ SpeechEngine
//! ```
//!
//! Every mutation takes `&mut self`, so one owner drives the whole core
//! and no locking is needed. Engine status is pulled in by the playback
//! controller before each decision.

use std::sync::Arc;

use parlance_core::{
    IdentityProvider, IndexedVoice, PlatformProfile, PreferenceStore, SpeechEngine,
    UserPreferences, UtteranceRequest, VoiceSelection,
};
use tokio::sync::{mpsc, watch};

use crate::catalog::{CatalogConfig, VoiceCatalog};
use crate::error::SpeechError;
use crate::event::SpeakEvent;
use crate::playback::{PlaybackController, PlaybackState, SpeakOutcome};
use crate::preferences::PreferenceSynchronizer;

/// Text of the priming utterance.
const PRIMING_TEXT: &str = " ";

/// Configuration for the speak service.
#[derive(Debug, Clone, Default)]
pub struct SpeakServiceConfig {
    /// Voice catalog filtering and polling.
    pub catalog: CatalogConfig,

    /// Detected platform quirks.
    pub platform: PlatformProfile,
}

/// Injected collaborators.
pub struct SpeakServiceDeps {
    pub engine: Arc<dyn SpeechEngine>,
    pub store: Arc<dyn PreferenceStore>,
    pub identity: Arc<dyn IdentityProvider>,
}

/// Text-to-speech controller with persisted per-user preferences.
pub struct SpeakService {
    catalog: VoiceCatalog,
    playback: PlaybackController,
    preferences: PreferenceSynchronizer,
    identity: Arc<dyn IdentityProvider>,
    platform: PlatformProfile,

    /// Whether a priming utterance has been issued this session.
    primed: bool,

    event_tx: mpsc::UnboundedSender<SpeakEvent>,
}

impl SpeakService {
    /// Create a new service.
    ///
    /// Returns the service and a receiver for [`SpeakEvent`]s.
    #[must_use]
    pub fn new(
        deps: SpeakServiceDeps,
        config: SpeakServiceConfig,
    ) -> (Self, mpsc::UnboundedReceiver<SpeakEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let service = Self {
            catalog: VoiceCatalog::new(Arc::clone(&deps.engine), config.catalog),
            playback: PlaybackController::new(deps.engine, event_tx.clone()),
            preferences: PreferenceSynchronizer::new(deps.store),
            identity: deps.identity,
            platform: config.platform,
            primed: false,
            event_tx,
        };

        (service, event_rx)
    }

    // ── Exposed state ──────────────────────────────────────────────

    /// Filtered, indexed voice list.
    pub fn voices(&self) -> &[IndexedVoice] {
        self.catalog.voices()
    }

    pub fn pitch(&self) -> f64 {
        self.preferences.preferences().pitch
    }

    pub fn rate(&self) -> f64 {
        self.preferences.preferences().rate
    }

    pub fn current_voice(&self) -> Option<&VoiceSelection> {
        self.preferences.preferences().current_voice.as_ref()
    }

    pub fn preferences(&self) -> &UserPreferences {
        self.preferences.preferences()
    }

    pub fn is_speaking(&self) -> bool {
        self.playback.is_speaking()
    }

    pub fn speaking_text(&self) -> Option<&str> {
        self.playback.speaking_text()
    }

    pub const fn state(&self) -> PlaybackState {
        self.playback.state()
    }

    /// Observe voice catalog readiness.
    pub fn catalog_ready(&self) -> watch::Receiver<bool> {
        self.catalog.subscribe_ready()
    }

    // ── Preference edits ───────────────────────────────────────────

    pub fn set_pitch(&mut self, pitch: f64) -> Result<(), SpeechError> {
        self.preferences.set_pitch(pitch)
    }

    pub fn set_rate(&mut self, rate: f64) -> Result<(), SpeechError> {
        self.preferences.set_rate(rate)
    }

    /// Select a voice by catalog index.
    pub fn select_voice(&mut self, index: usize) -> Result<(), SpeechError> {
        let selection = self
            .catalog
            .voices()
            .get(index)
            .map(IndexedVoice::to_selection)
            .ok_or(SpeechError::UnknownVoice(index))?;
        self.preferences.select_voice(Some(selection));
        Ok(())
    }

    // ── Playback ───────────────────────────────────────────────────

    /// Speak `text` with the cached voice, pitch and rate.
    ///
    /// Toggles off when the same text is already speaking and resumes when
    /// paused. See [`PlaybackController::speak`].
    pub fn speak(&mut self, text: impl Into<String>) -> Result<SpeakOutcome, SpeechError> {
        let request = self.utterance(text.into());
        self.playback.speak(request)
    }

    pub fn pause(&mut self) -> bool {
        self.playback.pause()
    }

    pub fn stop_speak(&mut self) {
        self.playback.stop();
    }

    /// Apply queued engine statuses without waiting.
    pub fn poll_status(&mut self) -> usize {
        self.playback.poll_status()
    }

    /// Wait for the outstanding utterance to end.
    pub async fn wait_until_finished(&mut self) {
        self.playback.wait_until_finished().await;
    }

    // ── Preferences sync ───────────────────────────────────────────

    /// Load the signed-in user's preferences.
    pub async fn init_user_settings(&mut self) -> Result<(), SpeechError> {
        let user_id = self
            .identity
            .current_user_id()
            .ok_or(SpeechError::NotSignedIn)?;

        self.preferences.load(&user_id).await?;
        self.emit(SpeakEvent::PreferencesLoaded { user_id });
        Ok(())
    }

    /// Persist the cached preferences to the loaded record.
    pub async fn save_user_settings(&mut self) -> Result<(), SpeechError> {
        self.preferences.save().await?;
        self.emit(SpeakEvent::PreferencesSaved);
        Ok(())
    }

    // ── Engine setup ───────────────────────────────────────────────

    /// Resolve the voice catalog, default the voice, and prime the engine.
    ///
    /// Never fails: an empty catalog is logged and left for the next call.
    pub async fn set_speech_synthesis(&mut self) {
        if !self.catalog.wait_until_ready().await {
            self.emit(SpeakEvent::CatalogUpdated { count: 0 });
            return;
        }
        self.emit(SpeakEvent::CatalogUpdated {
            count: self.catalog.voices().len(),
        });

        self.preferences
            .ensure_voice_selected(self.catalog.default_voice());

        if self.platform.requires_priming && !self.primed {
            tokio::time::sleep(self.platform.priming_delay).await;
            self.prime_engine();
        }
    }

    /// Issue the throwaway utterance some platforms need before real speech.
    ///
    /// Workaround for engines that stay silent until one utterance has been
    /// queued. Skipped while another utterance is outstanding; the next
    /// settle tries again until one priming utterance has been issued.
    /// Failures are logged at debug level and otherwise ignored.
    fn prime_engine(&mut self) {
        self.playback.poll_status();
        if self.playback.current_request().is_some()
            || self.playback.state() != PlaybackState::Idle
        {
            tracing::debug!(platform = %self.platform.name, "Engine busy, skipping priming");
            return;
        }

        let request = self.utterance(PRIMING_TEXT.to_string());
        match self.playback.speak(request) {
            Ok(_) => {
                self.primed = true;
                tracing::debug!(platform = %self.platform.name, "Priming utterance issued");
            }
            Err(e) => tracing::debug!(
                platform = %self.platform.name,
                error = %e,
                "Priming utterance failed, ignoring"
            ),
        }
    }

    // ── Internal helpers ───────────────────────────────────────────

    /// Build a request from the cached preferences.
    ///
    /// A selected index with no catalog entry leaves the voice unset, so the
    /// engine falls back to its own default.
    fn utterance(&self, text: String) -> UtteranceRequest {
        let prefs = self.preferences.preferences();
        let voice = prefs
            .selected_voice_index()
            .and_then(|i| self.catalog.voice_at(i))
            .cloned();

        UtteranceRequest {
            text,
            voice,
            pitch: prefs.pitch,
            rate: prefs.rate,
        }
    }

    fn emit(&self, event: SpeakEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::trace!("Speak event receiver dropped");
        }
    }
}
