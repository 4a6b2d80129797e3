//! Playback controller: the speech state machine.
//!
//! ```text
//!            speak (engine: started)          pause (engine: paused)
//!   Idle ─────────────────────────→ Speaking ─────────────────────→ Paused
//!    ▲                                 │  ▲                            │
//!    │      stop / done / cancelled    │  └── speak → resume ──────────┘
//!    └─────────────────────────────────┴───────────────────────────────┘
//! ```
//!
//! User intent (speak/pause/stop) is turned into engine requests. State only
//! moves when the engine reports back on the utterance's status stream,
//! except `stop`, which drops to `Idle` immediately.

use std::sync::Arc;

use parlance_core::{EngineStatus, SpeechEngine, StatusStream, UtteranceRequest};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use crate::error::SpeechError;
use crate::event::SpeakEvent;

/// Current state of playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackState {
    /// No utterance outstanding.
    #[default]
    Idle,

    /// The engine is rendering audio.
    Speaking,

    /// The engine holds a suspended utterance.
    Paused,
}

/// What a call to [`PlaybackController::speak`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakOutcome {
    /// A new utterance was handed to the engine.
    Started,

    /// The paused utterance was resumed; the requested text was not queued.
    Resumed,

    /// The same text was already playing, so playback was stopped.
    Stopped,
}

/// Drives the engine for at most one utterance at a time.
pub struct PlaybackController {
    engine: Arc<dyn SpeechEngine>,
    state: PlaybackState,

    /// Pending or active utterance.
    request: Option<UtteranceRequest>,

    /// Status stream of `request`. Replaced, never merged, when a new
    /// utterance starts.
    status_rx: Option<StatusStream>,

    event_tx: mpsc::UnboundedSender<SpeakEvent>,
}

impl PlaybackController {
    pub fn new(engine: Arc<dyn SpeechEngine>, event_tx: mpsc::UnboundedSender<SpeakEvent>) -> Self {
        Self {
            engine,
            state: PlaybackState::Idle,
            request: None,
            status_rx: None,
            event_tx,
        }
    }

    pub const fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_speaking(&self) -> bool {
        self.state == PlaybackState::Speaking
    }

    /// Text of the pending or active utterance.
    pub fn speaking_text(&self) -> Option<&str> {
        self.request.as_ref().map(|r| r.text.as_str())
    }

    /// The pending or active utterance.
    pub const fn current_request(&self) -> Option<&UtteranceRequest> {
        self.request.as_ref()
    }

    // ── User intent ────────────────────────────────────────────────

    /// Speak, resume or toggle off.
    ///
    /// - same text already speaking → stop
    /// - paused → resume the paused utterance, ignoring `request`
    /// - otherwise → cancel anything outstanding and start `request`
    pub fn speak(&mut self, request: UtteranceRequest) -> Result<SpeakOutcome, SpeechError> {
        self.poll_status();

        if self.is_speaking() && self.speaking_text() == Some(request.text.as_str()) {
            tracing::debug!("Same text already speaking, toggling off");
            self.stop();
            return Ok(SpeakOutcome::Stopped);
        }

        if self.state == PlaybackState::Paused {
            if self.speaking_text() != Some(request.text.as_str()) {
                tracing::debug!("Paused utterance resumed; new text discarded");
            }
            self.engine.resume_active();
            return Ok(SpeakOutcome::Resumed);
        }

        if self.request.take().is_some() {
            // Never two starts without a cancel in between.
            self.engine.cancel_active();
            self.status_rx = None;
            self.emit(SpeakEvent::SpeakingFinished);
        }

        tracing::debug!(
            text_len = request.text.len(),
            voice = request.voice.as_ref().map(|v| v.name.as_str()),
            pitch = request.pitch,
            rate = request.rate,
            "Starting utterance"
        );

        match self.engine.start_utterance(&request) {
            Ok(status_rx) => {
                self.status_rx = Some(status_rx);
                self.request = Some(request);
                Ok(SpeakOutcome::Started)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Engine refused utterance");
                self.request = None;
                self.set_state(PlaybackState::Idle);
                Err(e.into())
            }
        }
    }

    /// Ask the engine to suspend the active utterance.
    ///
    /// Returns `false` (and does nothing) unless currently speaking. The
    /// state becomes `Paused` once the engine reports it.
    pub fn pause(&mut self) -> bool {
        self.poll_status();

        if !self.is_speaking() {
            tracing::debug!(state = ?self.state, "Pause ignored, not speaking");
            return false;
        }
        self.engine.pause_active();
        true
    }

    /// Cancel any pending or active utterance and go idle.
    pub fn stop(&mut self) {
        self.engine.cancel_active();
        self.status_rx = None;
        let had_utterance = self.request.take().is_some();

        let was = self.state;
        self.set_state(PlaybackState::Idle);
        if had_utterance || was != PlaybackState::Idle {
            self.emit(SpeakEvent::SpeakingFinished);
        }
    }

    // ── Engine status ──────────────────────────────────────────────

    /// Apply every status the engine has queued so far.
    ///
    /// Returns the number of statuses applied.
    pub fn poll_status(&mut self) -> usize {
        let mut applied = 0;
        loop {
            let Some(rx) = self.status_rx.as_mut() else {
                break;
            };
            match rx.try_recv() {
                Ok(status) => {
                    self.apply_status(status);
                    applied += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.status_rx = None;
                    break;
                }
            }
        }
        applied
    }

    /// Wait for the next engine status and apply it.
    ///
    /// Returns `None` when no utterance is outstanding or its stream ended.
    pub async fn next_status(&mut self) -> Option<EngineStatus> {
        let rx = self.status_rx.as_mut()?;
        match rx.recv().await {
            Some(status) => {
                self.apply_status(status);
                Some(status)
            }
            None => {
                self.status_rx = None;
                None
            }
        }
    }

    /// Wait until the outstanding utterance ends.
    ///
    /// A paused utterance keeps this waiting until it is resumed or stopped
    /// from elsewhere, so only call it when that cannot block forever.
    pub async fn wait_until_finished(&mut self) {
        while self.next_status().await.is_some() {}
    }

    fn apply_status(&mut self, status: EngineStatus) {
        tracing::trace!(?status, "Engine status");
        match status {
            EngineStatus::Started => {
                self.set_state(PlaybackState::Speaking);
                if let Some(text) = self.speaking_text().map(str::to_owned) {
                    self.emit(SpeakEvent::SpeakingStarted { text });
                }
            }
            EngineStatus::Playing => self.set_state(PlaybackState::Speaking),
            EngineStatus::Paused => self.set_state(PlaybackState::Paused),
            EngineStatus::Done | EngineStatus::Cancelled => {
                self.request = None;
                self.status_rx = None;
                self.set_state(PlaybackState::Idle);
                self.emit(SpeakEvent::SpeakingFinished);
            }
        }
    }

    // ── Internal helpers ───────────────────────────────────────────

    /// Transition to a new state and emit a state-change event.
    fn set_state(&mut self, new_state: PlaybackState) {
        if self.state != new_state {
            tracing::debug!(old = ?self.state, new = ?new_state, "Playback state transition");
            self.state = new_state;
            self.emit(SpeakEvent::StateChanged(new_state));
        }
    }

    /// Emit an event. A dropped receiver is logged at trace level.
    fn emit(&self, event: SpeakEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::trace!("Speak event receiver dropped");
        }
    }
}
